//! HTTP API module for the UK Tax Calculation Engine.
//!
//! This module provides the REST API endpoints for running a tax
//! calculation, the salary and pension analyses, and listing the supported
//! tax years.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculationRequest, ChildBenefitsRequest, FirstHomesRequest, IncomeSweepRequest,
    MAX_ANALYSIS_POINTS, MAX_MONEY, PensionContributionsRequest, PensionSavingsRequest,
};
pub use response::{
    ApiError, CalculationResponse, FirstHomesResponse, IncomeSweepResponse,
    PensionSavingsResponse, TaxYearsResponse,
};
pub use state::AppState;

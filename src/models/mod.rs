//! Core data models for the UK Tax Calculation Engine.
//!
//! This module contains the inputs, results and audit records shared by the
//! calculation pipeline, the analysis helpers and the HTTP API.

mod audit;
mod breakdown;
mod inputs;
mod tax_result;

pub(crate) use audit::AuditRecorder;
pub use audit::{AuditStep, AuditTrace};
pub use breakdown::{BreakdownItem, CalculationResult};
pub use inputs::{ChildBenefitsInput, PensionContributionsInput, StudentLoanPlan, TaxInputs};
pub use tax_result::TaxCalculationResult;

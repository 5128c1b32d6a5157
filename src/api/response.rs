//! Response types for the UK Tax Calculation Engine API.
//!
//! This module defines the success payloads, the error response structure
//! and the mapping from engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{FirstHomesPoint, IncomeSweepPoint, PensionSavingsPoint};
use crate::error::EngineError;
use crate::models::{AuditTrace, TaxCalculationResult};

/// Response body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the result.
    pub engine_version: String,
    /// The tax year the constants were taken from.
    pub tax_year: String,
    /// The full breakdown.
    pub result: TaxCalculationResult,
    /// One step per calculation stage.
    pub audit_trace: AuditTrace,
}

/// Response body for the `/analysis/income-sweep` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSweepResponse {
    /// The tax year analysed.
    pub tax_year: String,
    /// One entry per salary, ascending.
    pub points: Vec<IncomeSweepPoint>,
}

/// Response body for the `/analysis/pension-savings` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionSavingsResponse {
    /// The tax year analysed.
    pub tax_year: String,
    /// One entry per contribution level, ascending.
    pub points: Vec<PensionSavingsPoint>,
}

/// Response body for the `/analysis/first-homes` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstHomesResponse {
    /// Salary needed above the cap to match purchasing power at the cap.
    pub equivalent_gross_income: Decimal,
    /// One entry per salary, ascending.
    pub points: Vec<FirstHomesPoint>,
}

/// Response body for the `/tax-years` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearsResponse {
    /// Every supported tax year, oldest first.
    pub tax_years: Vec<String>,
    /// The newest supported tax year.
    pub latest: Option<String>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::UnknownTaxYear { tax_year } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "UNKNOWN_TAX_YEAR",
                    format!("Unknown tax year: {}", tax_year),
                    "Use GET /tax-years for the supported tax years",
                ),
            ),
            EngineError::InvalidInput { field, message } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid field '{}': {}", field, message),
                    format!("The field '{}' failed validation", field),
                ),
            ),
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { tax_year, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Invalid configuration",
                    format!("Tax year {}: {}", tax_year, message),
                ),
            },
        }
    }
}

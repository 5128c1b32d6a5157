//! Error types for the UK Tax Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading tax-year constants
//! or running a calculation.

use thiserror::Error;

/// The main error type for the UK Tax Calculation Engine.
///
/// The calculation pipeline itself only fails on configuration problems. The
/// `InvalidInput` variant comes from the analysis helpers (a zero point or
/// step count) and from the HTTP API, which validates caller-supplied values
/// before handing them to the engine.
///
/// # Example
///
/// ```
/// use uk_tax_engine::error::EngineError;
///
/// let error = EngineError::UnknownTaxYear {
///     tax_year: "1999/00".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown tax year: 1999/00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No constants are available for the requested tax year.
    #[error("Unknown tax year: {tax_year}")]
    UnknownTaxYear {
        /// The tax-year key that was requested (e.g., "2024/25").
        tax_year: String,
    },

    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but breaks an invariant of the constants table.
    #[error("Invalid configuration for tax year '{tax_year}': {message}")]
    InvalidConfig {
        /// The tax year whose constants are invalid.
        tax_year: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// A caller-supplied value was rejected before calculation.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

//! Tax-year constants: loading, validation and lookup.
//!
//! The per-tax-year constants (allowances, band tables, NI thresholds,
//! student loan thresholds, child benefit rates) are a versioned dataset kept
//! outside the engine in YAML files, one per tax year. The dataset shipped in
//! `config/tax_years/` is also embedded into the crate.
//!
//! # Example
//!
//! ```
//! use uk_tax_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::builtin().unwrap();
//! println!("Latest tax year: {:?}", config.latest_tax_year());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ChildBenefitRates, IncomeTaxConstants, NationalInsuranceConstants, StudentLoanConstants,
    StudentLoanThresholds, TaxAllowanceConstants, TaxBand, TaxYearConstants, TaxYearTable,
};

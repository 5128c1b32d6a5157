//! Tax saved by personal pension contributions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::calculate_taxes;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::TaxInputs;

use super::{clamped_percentage, evenly_spaced};

/// One personal contribution level in a pension savings analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionSavingsPoint {
    /// Annual personal pension contribution.
    pub pension_contribution: Decimal,
    /// Combined taxes saved compared with no personal contribution.
    pub tax_savings: Decimal,
    /// Tax savings as a percentage of the contribution.
    pub tax_savings_percentage: Decimal,
    /// Combined taxes as a percentage of gross earnings.
    pub effective_tax_rate: Decimal,
}

/// Varies the personal contribution from zero towards gross earnings.
///
/// Contributions are `i * gross / steps` for `i in 0..steps`, where gross is
/// salary plus bonus. Everything except the personal contribution is held
/// fixed.
///
/// # Errors
///
/// * `EngineError::InvalidInput` if `steps` is zero
/// * `EngineError::UnknownTaxYear` if the tax year is not in the dataset
pub fn pension_savings(
    inputs: &TaxInputs,
    config: &ConfigLoader,
    steps: u32,
) -> EngineResult<Vec<PensionSavingsPoint>> {
    let gross = inputs.annual_gross_salary + inputs.annual_gross_bonus;
    let contributions = evenly_spaced("steps", gross, steps)?;

    let baseline = calculate_taxes(&inputs.with_personal_contribution(Decimal::ZERO), config)?;

    contributions
        .map(|pension_contribution| {
            let result =
                calculate_taxes(&inputs.with_personal_contribution(pension_contribution), config)?;
            let tax_savings = baseline.combined_taxes - result.combined_taxes;

            Ok(PensionSavingsPoint {
                pension_contribution,
                tax_savings,
                tax_savings_percentage: clamped_percentage(tax_savings, pension_contribution),
                effective_tax_rate: clamped_percentage(result.combined_taxes, gross),
            })
        })
        .collect()
}

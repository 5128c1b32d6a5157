//! Take-home pay and tax rates across a range of salaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::calculate_taxes;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::TaxInputs;

use super::{PERCENT_DP, clamped_percentage, evenly_spaced};

/// One salary in an income sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSweepPoint {
    /// Annual gross salary (bonus is zero).
    pub gross_income: Decimal,
    /// Income tax, employee NI and student loan repayments.
    pub combined_taxes: Decimal,
    /// Adjusted net income less combined taxes.
    pub take_home_pay: Decimal,
    /// Pension pot plus take-home pay plus child benefits.
    pub your_money: Decimal,
    /// Combined taxes as a percentage of gross income.
    pub effective_tax_rate: Decimal,
    /// Change in combined taxes per unit of gross income since the previous
    /// point, as a percentage. `None` for the first point.
    pub marginal_rate: Option<Decimal>,
}

/// Sweeps salary from zero towards `max_gross_income` in `points` steps.
///
/// Gross values are `i * max_gross_income / points` for `i in 0..points`, so
/// `max_gross_income` itself is excluded. All other inputs are held fixed.
///
/// # Errors
///
/// * `EngineError::InvalidInput` if `points` is zero
/// * `EngineError::UnknownTaxYear` if the tax year is not in the dataset
///
/// # Examples
///
/// ```
/// use uk_tax_engine::analysis::income_sweep;
/// use uk_tax_engine::config::ConfigLoader;
/// use uk_tax_engine::models::TaxInputs;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
/// let sweep = income_sweep(&inputs, config, Decimal::new(200000, 0), 200).unwrap();
/// assert_eq!(sweep.len(), 200);
/// assert!(sweep[0].marginal_rate.is_none());
/// ```
pub fn income_sweep(
    inputs: &TaxInputs,
    config: &ConfigLoader,
    max_gross_income: Decimal,
    points: u32,
) -> EngineResult<Vec<IncomeSweepPoint>> {
    let mut sweep: Vec<IncomeSweepPoint> = Vec::with_capacity(points as usize);

    for gross_income in evenly_spaced("points", max_gross_income, points)? {
        let result = calculate_taxes(&inputs.with_salary(gross_income), config)?;

        let marginal_rate = sweep.last().and_then(|previous| {
            let delta_gross = gross_income - previous.gross_income;
            if delta_gross.is_zero() {
                return None;
            }
            let delta_taxes = result.combined_taxes - previous.combined_taxes;
            Some((delta_taxes / delta_gross * Decimal::ONE_HUNDRED).round_dp(PERCENT_DP))
        });

        sweep.push(IncomeSweepPoint {
            gross_income,
            combined_taxes: result.combined_taxes,
            take_home_pay: result.take_home_pay,
            your_money: result.your_money,
            effective_tax_rate: clamped_percentage(result.combined_taxes, gross_income),
            marginal_rate,
        });
    }

    Ok(sweep)
}

//! Sensitivity analyses built on repeated calls to the calculation pipeline.
//!
//! Each helper holds every input fixed except one (salary or personal
//! pension contribution), re-runs [`calculate_taxes`](crate::calculation::calculate_taxes)
//! across a range of values, and reports the figures a chart would plot.

mod first_homes;
mod income_sweep;
mod pension_savings;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

pub use first_homes::{
    FirstHomesPoint, FirstHomesRegion, first_homes_chart, first_homes_discount_rate,
    first_homes_equivalent_income,
};
pub use income_sweep::{IncomeSweepPoint, income_sweep};
pub use pension_savings::{PensionSavingsPoint, pension_savings};

/// Decimal places kept on reported percentages.
const PERCENT_DP: u32 = 2;

/// Returns `part / whole` as a percentage clamped to `[0, 100]`, or zero
/// when `whole` is zero.
pub(crate) fn clamped_percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp(PERCENT_DP)
}

/// Returns the `count` evenly spaced values `i * max / count` for `i in 0..count`.
pub(crate) fn evenly_spaced(
    field: &str,
    max: Decimal,
    count: u32,
) -> EngineResult<impl Iterator<Item = Decimal>> {
    if count == 0 {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    let divisor = Decimal::from(count);
    Ok((0..count).map(move |i| Decimal::from(i) * max / divisor))
}

//! Tax allowance calculation.
//!
//! The personal allowance is reduced by £1 for every £2 of adjusted net
//! income above the taper threshold, never below zero. The blind person's
//! allowance is added on top and is not tapered.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;
use crate::models::{BreakdownItem, CalculationResult};

/// Breakdown label for the (tapered) personal allowance.
pub const PERSONAL_ALLOWANCE_LABEL: &str = "Personal Allowance";

/// Breakdown label for the blind person's allowance.
pub const BLIND_ALLOWANCE_LABEL: &str = "Blind Person's Allowance";

/// Returns the taper rate: £1 of allowance lost per £2 of excess income.
pub fn personal_allowance_taper_rate() -> Decimal {
    Decimal::new(5, 1)
}

/// Calculates the tax-free allowance for an adjusted net income.
///
/// # Arguments
///
/// * `adjusted_net_income` - Gross earnings less pension contributions
/// * `is_blind` - Whether the blind person's allowance applies
/// * `constants` - The tax-year constants
///
/// # Returns
///
/// A result whose breakdown always holds the personal allowance line, plus a
/// blind person's allowance line when `is_blind` is set.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_tax_allowance;
/// use uk_tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let constants = ConfigLoader::builtin().unwrap().get_tax_year("2024/25").unwrap();
/// let result = calculate_tax_allowance(Decimal::new(110000, 0), false, constants);
/// assert_eq!(result.total, Decimal::new(7570, 0));
/// ```
pub fn calculate_tax_allowance(
    adjusted_net_income: Decimal,
    is_blind: bool,
    constants: &TaxYearConstants,
) -> CalculationResult {
    let allowance = &constants.tax_allowance;

    let mut personal_allowance = allowance.basic_allowance;
    if adjusted_net_income > allowance.taper_threshold {
        let reduction = ((adjusted_net_income - allowance.taper_threshold)
            * personal_allowance_taper_rate())
        .floor();
        personal_allowance = (allowance.basic_allowance - reduction).max(Decimal::ZERO);
    }

    let mut breakdown = vec![BreakdownItem::labeled(
        PERSONAL_ALLOWANCE_LABEL,
        personal_allowance,
    )];

    let mut blind_allowance = Decimal::ZERO;
    if is_blind {
        blind_allowance = allowance.blind_persons_allowance;
        breakdown.push(BreakdownItem::labeled(BLIND_ALLOWANCE_LABEL, blind_allowance));
    }

    CalculationResult::new(personal_allowance + blind_allowance, breakdown)
}

//! Income tax calculation.
//!
//! Taxable income is charged band by band, from the lowest band upwards,
//! using either the Scottish or the rest-of-UK table.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;
use crate::models::{BreakdownItem, CalculationResult};

/// Calculates income tax on taxable income.
///
/// Each band touched by the income contributes one breakdown line holding the
/// band's rate and the tax charged in it. The walk stops as soon as income is
/// exhausted, so untouched bands do not appear. The top band is unbounded.
///
/// # Arguments
///
/// * `taxable_income` - Income after allowances
/// * `constants` - The tax-year constants
/// * `resident_in_scotland` - Selects the Scottish band table
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_income_tax;
/// use uk_tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let constants = ConfigLoader::builtin().unwrap().get_tax_year("2024/25").unwrap();
/// let result = calculate_income_tax(Decimal::new(50000, 0), constants, false);
/// // 37,700 at 20% + 12,300 at 40%
/// assert_eq!(result.total, Decimal::new(12460, 0));
/// assert_eq!(result.breakdown.len(), 2);
/// ```
pub fn calculate_income_tax(
    taxable_income: Decimal,
    constants: &TaxYearConstants,
    resident_in_scotland: bool,
) -> CalculationResult {
    let bands = constants.income_tax.bands(resident_in_scotland);

    let mut breakdown = Vec::new();
    let mut total = Decimal::ZERO;
    let mut remaining = taxable_income;
    let mut previous_limit = Decimal::ZERO;

    for band in bands {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable_in_band = match band.upper_limit {
            Some(limit) => remaining.min(limit - previous_limit),
            None => remaining,
        };
        let tax_in_band = taxable_in_band * band.rate;

        total += tax_in_band;
        remaining -= taxable_in_band;
        breakdown.push(BreakdownItem::rate_band(band.rate, tax_in_band));

        if let Some(limit) = band.upper_limit {
            previous_limit = limit;
        }
    }

    CalculationResult::new(total, breakdown)
}

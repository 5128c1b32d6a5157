//! National Insurance calculation.
//!
//! Class 1 contributions are charged in two bands: from the relevant
//! threshold up to the upper earnings limit at the main rate, and above the
//! upper earnings limit at the additional rate. Employees use the primary
//! threshold, employers the secondary threshold.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;
use crate::models::{BreakdownItem, CalculationResult};

/// Whose contribution is being calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contributor {
    /// Employee (primary) contributions.
    Employee,
    /// Employer (secondary) contributions.
    Employer,
}

/// Calculates Class 1 National Insurance on income after salary sacrifice.
///
/// When `no_ni` is set the result is zero with an empty breakdown, whatever
/// the income. Bands with nothing charged emit no line.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::{Contributor, calculate_national_insurance};
/// use uk_tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let constants = ConfigLoader::builtin().unwrap().get_tax_year("2024/25").unwrap();
/// let result = calculate_national_insurance(Decimal::new(30000, 0), constants, Contributor::Employee, false);
/// // (30,000 - 12,570) at 8%
/// assert_eq!(result.total, Decimal::new(139440, 2));
/// ```
pub fn calculate_national_insurance(
    income: Decimal,
    constants: &TaxYearConstants,
    contributor: Contributor,
    no_ni: bool,
) -> CalculationResult {
    if no_ni {
        return CalculationResult::zero();
    }

    let ni = &constants.national_insurance;
    let (threshold, rates) = match contributor {
        Contributor::Employee => (ni.primary_threshold, ni.employee_rates),
        Contributor::Employer => (ni.secondary_threshold, ni.employer_rates),
    };

    let mut breakdown = Vec::new();
    let mut total = Decimal::ZERO;
    let mut remaining = (income - threshold).max(Decimal::ZERO);

    if remaining > Decimal::ZERO {
        let in_main_band = remaining.min(ni.upper_earnings_limit - threshold);
        if in_main_band > Decimal::ZERO {
            let contribution = in_main_band * rates[0];
            total += contribution;
            remaining -= in_main_band;
            breakdown.push(BreakdownItem::rate_band(rates[0], contribution));
        }
    }

    if remaining > Decimal::ZERO {
        let contribution = remaining * rates[1];
        total += contribution;
        breakdown.push(BreakdownItem::rate_band(rates[1], contribution));
    }

    CalculationResult::new(total, breakdown)
}

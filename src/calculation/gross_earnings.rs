//! Gross earnings calculation.

use rust_decimal::Decimal;

use crate::models::{BreakdownItem, CalculationResult};

/// Breakdown label for the salary line.
pub const SALARY_LABEL: &str = "Annual Gross Salary";

/// Breakdown label for the bonus line.
pub const BONUS_LABEL: &str = "Annual Gross Bonus";

/// Sums salary and bonus into gross earnings.
///
/// Both lines are always present in the breakdown, even when zero.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_gross_earnings;
/// use rust_decimal::Decimal;
///
/// let result = calculate_gross_earnings(Decimal::new(50000, 0), Decimal::new(5000, 0));
/// assert_eq!(result.total, Decimal::new(55000, 0));
/// assert_eq!(result.breakdown.len(), 2);
/// ```
pub fn calculate_gross_earnings(
    annual_gross_salary: Decimal,
    annual_gross_bonus: Decimal,
) -> CalculationResult {
    CalculationResult::new(
        annual_gross_salary + annual_gross_bonus,
        vec![
            BreakdownItem::labeled(SALARY_LABEL, annual_gross_salary),
            BreakdownItem::labeled(BONUS_LABEL, annual_gross_bonus),
        ],
    )
}

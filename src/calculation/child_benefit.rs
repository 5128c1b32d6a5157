//! Child benefit and the High Income Child Benefit Charge (HICBC).

use rust_decimal::Decimal;

use crate::config::ChildBenefitRates;
use crate::models::{BreakdownItem, CalculationResult, ChildBenefitsInput};

/// Breakdown label for the annual benefit amount.
pub const CHILD_BENEFITS_LABEL: &str = "Child Benefits";

/// Breakdown label for the (negative) high income charge.
pub const HICBC_LABEL: &str = "HICBC";

const WEEKS_PER_YEAR: u32 = 52;

/// Adjusted net income above which the charge applies.
pub fn hicbc_threshold() -> Decimal {
    Decimal::new(50000, 0)
}

/// Income above the threshold per 1% of charge.
pub fn hicbc_step() -> Decimal {
    Decimal::new(100, 0)
}

/// Returns the HICBC as a whole percentage of the benefit, capped at 100.
pub fn hicbc_percentage(adjusted_net_income: Decimal) -> Decimal {
    if adjusted_net_income <= hicbc_threshold() {
        return Decimal::ZERO;
    }
    ((adjusted_net_income - hicbc_threshold()) / hicbc_step())
        .floor()
        .min(Decimal::ONE_HUNDRED)
}

/// Calculates annual child benefit less the high income charge.
///
/// Returns zero with an empty breakdown when no benefit is claimed.
/// Otherwise the breakdown always has a "Child Benefits" line and an
/// "HICBC" line, the latter zero or negative.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_child_benefits;
/// use uk_tax_engine::config::ConfigLoader;
/// use uk_tax_engine::models::ChildBenefitsInput;
/// use rust_decimal::Decimal;
///
/// let constants = ConfigLoader::builtin().unwrap().get_tax_year("2024/25").unwrap();
/// let claim = ChildBenefitsInput { child_benefits_taken: true, number_of_children: 2 };
///
/// // 55,000 is 50% into the clawback
/// let result = calculate_child_benefits(
///     Decimal::new(55000, 0),
///     &claim,
///     &constants.child_benefit_rates,
/// );
/// assert_eq!(result.total, Decimal::new(110630, 2));
/// ```
pub fn calculate_child_benefits(
    adjusted_net_income: Decimal,
    child_benefits: &ChildBenefitsInput,
    rates: &ChildBenefitRates,
) -> CalculationResult {
    if !child_benefits.child_benefits_taken {
        return CalculationResult::zero();
    }

    let weeks = Decimal::from(WEEKS_PER_YEAR);
    let additional_children = Decimal::from(child_benefits.number_of_children.saturating_sub(1));
    let benefit =
        rates.first_child_rate * weeks + additional_children * rates.additional_child_rate * weeks;

    let charge = benefit * hicbc_percentage(adjusted_net_income) / Decimal::ONE_HUNDRED;
    // keep the no-charge line at +0 rather than -0
    let hicbc = if charge.is_zero() { Decimal::ZERO } else { -charge };

    CalculationResult::new(
        benefit + hicbc,
        vec![
            BreakdownItem::labeled(CHILD_BENEFITS_LABEL, benefit),
            BreakdownItem::labeled(HICBC_LABEL, hicbc),
        ],
    )
}

//! Pension contribution calculation.
//!
//! This module works out what goes into the pension pot from salary
//! sacrifice, auto-enrolment and personal contributions, and how much cash
//! income is left after salary sacrifice for National Insurance and student
//! loan purposes.

use rust_decimal::Decimal;

use crate::models::{BreakdownItem, CalculationResult, PensionContributionsInput};

/// Breakdown label for salary sacrifice contributions.
pub const SALARY_SACRIFICE_LABEL: &str = "Salary sacrifice";

/// Breakdown label for auto-enrolment contributions.
pub const AUTO_ENROLMENT_LABEL: &str = "Auto enrolment";

/// Breakdown label for grossed personal contributions.
pub const GROSS_PERSONAL_LABEL: &str = "Gross Personal";

/// Returns the relief-at-source gross-up factor, 100/80 for a 20% basic rate.
pub fn relief_at_source_factor() -> Decimal {
    Decimal::new(125, 2)
}

/// The pension pot and the cash income left after salary sacrifice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PensionPotResult {
    /// Contributions by source.
    pub pension_pot: CalculationResult,
    /// Gross earnings less salary sacrifice (and auto-enrolment when it is
    /// taken by sacrifice), floored at zero before auto-enrolment.
    pub income_after_salary_sacrifice: Decimal,
}

/// Grosses up a personal contribution when relief at source applies.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::gross_pension_contribution;
/// use rust_decimal::Decimal;
///
/// assert_eq!(gross_pension_contribution(Decimal::new(800, 0), true), Decimal::new(1000, 0));
/// assert_eq!(gross_pension_contribution(Decimal::new(800, 0), false), Decimal::new(800, 0));
/// ```
pub fn gross_pension_contribution(contribution: Decimal, tax_relief_at_source: bool) -> Decimal {
    if tax_relief_at_source {
        contribution * relief_at_source_factor()
    } else {
        contribution
    }
}

/// Calculates the pension pot and income after salary sacrifice.
///
/// # Arguments
///
/// * `gross_earnings` - Total gross earnings
/// * `contributions` - Salary sacrifice (GBP), auto-enrolment (percent) and
///   personal (GBP) contributions
/// * `auto_enrolment_as_salary_sacrifice` - Whether auto-enrolment also
///   reduces cash pay; otherwise it comes out of net pay
/// * `tax_relief_at_source` - Whether personal contributions are grossed up
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_pension_pot;
/// use uk_tax_engine::models::PensionContributionsInput;
/// use rust_decimal::Decimal;
///
/// let contributions = PensionContributionsInput {
///     auto_enrolment: Decimal::new(5, 0),
///     salary_sacrifice: Decimal::new(5000, 0),
///     personal: Decimal::ZERO,
/// };
/// let result = calculate_pension_pot(Decimal::new(50000, 0), &contributions, true, false);
/// // 5% of 45,000 = 2,250 taken by sacrifice on top of the 5,000
/// assert_eq!(result.income_after_salary_sacrifice, Decimal::new(42750, 0));
/// assert_eq!(result.pension_pot.total, Decimal::new(7250, 0));
/// ```
pub fn calculate_pension_pot(
    gross_earnings: Decimal,
    contributions: &PensionContributionsInput,
    auto_enrolment_as_salary_sacrifice: bool,
    tax_relief_at_source: bool,
) -> PensionPotResult {
    let mut income_after_salary_sacrifice =
        (gross_earnings - contributions.salary_sacrifice).max(Decimal::ZERO);

    let auto_enrolment_contribution =
        income_after_salary_sacrifice * contributions.auto_enrolment / Decimal::ONE_HUNDRED;

    if auto_enrolment_as_salary_sacrifice {
        income_after_salary_sacrifice -= auto_enrolment_contribution;
    }

    let grossed_personal_contribution =
        gross_pension_contribution(contributions.personal, tax_relief_at_source);

    let pension_pot = CalculationResult::new(
        contributions.salary_sacrifice + auto_enrolment_contribution + grossed_personal_contribution,
        vec![
            BreakdownItem::labeled(SALARY_SACRIFICE_LABEL, contributions.salary_sacrifice),
            BreakdownItem::labeled(AUTO_ENROLMENT_LABEL, auto_enrolment_contribution),
            BreakdownItem::labeled(GROSS_PERSONAL_LABEL, grossed_personal_contribution),
        ],
    );

    PensionPotResult {
        pension_pot,
        income_after_salary_sacrifice,
    }
}

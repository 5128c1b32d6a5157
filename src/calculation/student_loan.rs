//! Student loan repayment calculation.
//!
//! Plans 1, 2, 4 and 5 share one repayment: selected plans are ordered by
//! threshold and each plan takes the slice of income between its own
//! threshold and the next plan's, all at the shared default rate. The sum is
//! floored to whole pounds and the fractional remainder is taken off the
//! trailing non-zero lines so the breakdown still adds up. A postgraduate
//! loan is repaid independently on top.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;
use crate::models::{BreakdownItem, CalculationResult, StudentLoanPlan};

/// Calculates student loan repayments on income after salary sacrifice.
///
/// # Arguments
///
/// * `income` - Income after salary sacrifice
/// * `plans` - Selected plans, in any order
/// * `constants` - The tax-year constants
///
/// # Returns
///
/// A zero result with an empty breakdown when no plan is selected.
/// Otherwise one line per non-postgraduate plan (ascending threshold), then
/// a postgraduate line if that plan is selected. A plan without a threshold
/// for the tax year repays nothing.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_student_loan_repayments;
/// use uk_tax_engine::config::ConfigLoader;
/// use uk_tax_engine::models::StudentLoanPlan;
/// use rust_decimal::Decimal;
///
/// let constants = ConfigLoader::builtin().unwrap().get_tax_year("2024/25").unwrap();
/// let result = calculate_student_loan_repayments(
///     Decimal::new(50000, 0),
///     &[StudentLoanPlan::Plan2, StudentLoanPlan::Postgrad],
///     constants,
/// );
/// assert_eq!(result.total, Decimal::new(2043 + 1740, 0));
/// ```
pub fn calculate_student_loan_repayments(
    income: Decimal,
    plans: &[StudentLoanPlan],
    constants: &TaxYearConstants,
) -> CalculationResult {
    if plans.is_empty() {
        return CalculationResult::zero();
    }

    let loan = &constants.student_loan;
    let thresholds = &loan.thresholds;

    let mut undergraduate: Vec<StudentLoanPlan> =
        plans.iter().copied().filter(|p| !p.is_postgrad()).collect();
    // missing thresholds (plan not yet introduced) sort last
    undergraduate.sort_by_key(|plan| {
        let threshold = thresholds.for_plan(*plan);
        (threshold.is_none(), threshold)
    });

    let mut breakdown = Vec::with_capacity(plans.len());
    let mut undergraduate_total = Decimal::ZERO;

    for (index, plan) in undergraduate.iter().enumerate() {
        let next_threshold = undergraduate
            .get(index + 1)
            .and_then(|next| thresholds.for_plan(*next));

        let amount = match thresholds.for_plan(*plan) {
            Some(threshold) if income > threshold => {
                let upper = next_threshold.map_or(income, |next| income.min(next));
                // a duplicate plan shares its threshold with the next entry
                (upper - threshold).max(Decimal::ZERO) * loan.default_rate
            }
            _ => Decimal::ZERO,
        };

        undergraduate_total += amount;
        breakdown.push(BreakdownItem::labeled(plan.label(), amount));
    }

    let floored_total = undergraduate_total.floor();
    absorb_remainder(&mut breakdown, undergraduate_total - floored_total);

    let mut postgrad_total = Decimal::ZERO;
    if plans.iter().any(|p| p.is_postgrad()) {
        if let Some(threshold) = thresholds.postgrad {
            if income > threshold {
                postgrad_total = ((income - threshold) * loan.postgrad_rate).floor();
            }
        }
        breakdown.push(BreakdownItem::labeled(
            StudentLoanPlan::Postgrad.label(),
            postgrad_total,
        ));
    }

    CalculationResult::new(floored_total + postgrad_total, breakdown)
}

/// Takes `remainder` off the breakdown, starting from the last non-zero line
/// and moving backwards until it is used up.
fn absorb_remainder(breakdown: &mut [BreakdownItem], mut remainder: Decimal) {
    for item in breakdown.iter_mut().rev() {
        if remainder <= Decimal::ZERO {
            break;
        }
        let amount = item.amount_mut();
        if *amount > Decimal::ZERO {
            let deduction = (*amount).min(remainder);
            *amount -= deduction;
            remainder -= deduction;
        }
    }
}

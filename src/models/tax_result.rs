//! The full output record of a tax calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationResult;

/// The complete breakdown produced by one call to the orchestrator.
///
/// Built fresh on every call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Salary plus bonus.
    pub gross_earnings: CalculationResult,
    /// Gross earnings less total pension contributions, floored at zero.
    pub adjusted_net_income: Decimal,
    /// Personal allowance (tapered) plus blind person's allowance.
    pub tax_allowance: CalculationResult,
    /// Adjusted net income less the tax allowance, floored at zero.
    pub taxable_income: Decimal,
    /// Income tax by band.
    pub income_tax: CalculationResult,
    /// Employee Class 1 National Insurance.
    pub employee_ni: CalculationResult,
    /// Employer Class 1 National Insurance (not deducted from the individual).
    pub employer_ni: CalculationResult,
    /// Student loan repayments by plan.
    pub student_loan_repayments: CalculationResult,
    /// Income tax plus employee NI plus student loan repayments.
    pub combined_taxes: Decimal,
    /// Child benefit less the High Income Child Benefit Charge.
    pub child_benefits: CalculationResult,
    /// Adjusted net income less combined taxes.
    pub take_home_pay: Decimal,
    /// Pension contributions by source.
    pub pension_pot: CalculationResult,
    /// Pension pot plus take-home pay plus child benefits.
    pub your_money: Decimal,
}

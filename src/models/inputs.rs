//! Calculation inputs.
//!
//! This module defines [`TaxInputs`], the single strongly-typed bundle of
//! earnings and personal circumstances the engine consumes per calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A student loan repayment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLoanPlan {
    /// Plan 1.
    Plan1,
    /// Plan 2.
    Plan2,
    /// Plan 4 (Scotland).
    Plan4,
    /// Plan 5.
    Plan5,
    /// Postgraduate loan, repaid on top of any other plan.
    Postgrad,
}

impl StudentLoanPlan {
    /// All plans, in declaration order.
    pub const ALL: [StudentLoanPlan; 5] = [
        StudentLoanPlan::Plan1,
        StudentLoanPlan::Plan2,
        StudentLoanPlan::Plan4,
        StudentLoanPlan::Plan5,
        StudentLoanPlan::Postgrad,
    ];

    /// Returns the display label used in breakdown lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use uk_tax_engine::models::StudentLoanPlan;
    ///
    /// assert_eq!(StudentLoanPlan::Plan2.label(), "Plan 2");
    /// assert_eq!(StudentLoanPlan::Postgrad.label(), "Postgraduate");
    /// ```
    pub fn label(self) -> &'static str {
        match self {
            StudentLoanPlan::Plan1 => "Plan 1",
            StudentLoanPlan::Plan2 => "Plan 2",
            StudentLoanPlan::Plan4 => "Plan 4",
            StudentLoanPlan::Plan5 => "Plan 5",
            StudentLoanPlan::Postgrad => "Postgraduate",
        }
    }

    /// Returns true for the postgraduate loan.
    pub fn is_postgrad(self) -> bool {
        self == StudentLoanPlan::Postgrad
    }
}

impl fmt::Display for StudentLoanPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Child benefit claim details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitsInput {
    /// Whether child benefit is claimed at all.
    pub child_benefits_taken: bool,
    /// Number of children claimed for (at least 1 when claimed).
    pub number_of_children: u32,
}

impl Default for ChildBenefitsInput {
    fn default() -> Self {
        Self {
            child_benefits_taken: false,
            number_of_children: 1,
        }
    }
}

/// Pension contributions made by the individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PensionContributionsInput {
    /// Auto-enrolment contribution as a percentage of post-sacrifice pay.
    pub auto_enrolment: Decimal,
    /// Annual salary sacrifice in GBP.
    pub salary_sacrifice: Decimal,
    /// Annual personal (net) contribution in GBP.
    pub personal: Decimal,
}

/// Everything a single tax calculation needs besides the constants table.
///
/// All monetary fields are annual GBP amounts and are assumed to be
/// non-negative; validation is the caller's concern.
///
/// # Example
///
/// ```
/// use uk_tax_engine::models::TaxInputs;
/// use rust_decimal::Decimal;
///
/// let inputs = TaxInputs::new("2024/25", Decimal::new(50000, 0));
/// assert_eq!(inputs.annual_gross_bonus, Decimal::ZERO);
/// assert!(inputs.student_loan_plans.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInputs {
    /// Tax-year key (e.g., "2024/25").
    pub tax_year: String,
    /// Student loan plans being repaid.
    pub student_loan_plans: Vec<StudentLoanPlan>,
    /// Annual gross salary.
    pub annual_gross_salary: Decimal,
    /// Annual gross bonus.
    pub annual_gross_bonus: Decimal,
    /// Whether Scottish income tax bands apply.
    pub resident_in_scotland: bool,
    /// Whether National Insurance is excluded (e.g., above state pension age).
    pub no_ni: bool,
    /// Whether the blind person's allowance applies.
    pub blind: bool,
    /// Child benefit claim details.
    pub child_benefits: ChildBenefitsInput,
    /// Pension contributions.
    pub pension_contributions: PensionContributionsInput,
    /// Whether auto-enrolment contributions are taken by salary sacrifice.
    pub auto_enrolment_as_salary_sacrifice: bool,
    /// Whether personal contributions receive basic-rate relief at source.
    pub tax_relief_at_source: bool,
}

impl TaxInputs {
    /// Creates inputs for a salary with every other option at its neutral value.
    pub fn new(tax_year: impl Into<String>, annual_gross_salary: Decimal) -> Self {
        Self {
            tax_year: tax_year.into(),
            student_loan_plans: Vec::new(),
            annual_gross_salary,
            annual_gross_bonus: Decimal::ZERO,
            resident_in_scotland: false,
            no_ni: false,
            blind: false,
            child_benefits: ChildBenefitsInput::default(),
            pension_contributions: PensionContributionsInput::default(),
            auto_enrolment_as_salary_sacrifice: false,
            tax_relief_at_source: false,
        }
    }

    /// Returns a copy with salary replaced and bonus cleared.
    pub fn with_salary(&self, annual_gross_salary: Decimal) -> Self {
        Self {
            annual_gross_salary,
            annual_gross_bonus: Decimal::ZERO,
            ..self.clone()
        }
    }

    /// Returns a copy with the personal pension contribution replaced.
    pub fn with_personal_contribution(&self, personal: Decimal) -> Self {
        let mut inputs = self.clone();
        inputs.pension_contributions.personal = personal;
        inputs
    }
}

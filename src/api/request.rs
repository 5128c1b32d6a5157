//! Request types for the UK Tax Calculation Engine API.
//!
//! This module defines the JSON request structures for the calculation and
//! analysis endpoints, and the checks that stand in for form validation
//! before inputs reach the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::FirstHomesRegion;
use crate::error::{EngineError, EngineResult};
use crate::models::{ChildBenefitsInput, PensionContributionsInput, StudentLoanPlan, TaxInputs};

/// Largest number of points or steps an analysis request may ask for.
pub const MAX_ANALYSIS_POINTS: u32 = 5000;

/// Largest monetary amount accepted in a request, in pounds.
pub const MAX_MONEY: i64 = 1_000_000_000_000;

/// Request body for the `/calculate` endpoint.
///
/// Only `tax_year` and `annual_gross_salary` are required; everything else
/// defaults to its neutral value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The tax-year key (e.g., "2024/25").
    pub tax_year: String,
    /// Student loan plans being repaid.
    #[serde(default)]
    pub student_loan_plans: Vec<StudentLoanPlan>,
    /// Annual gross salary.
    pub annual_gross_salary: Decimal,
    /// Annual gross bonus.
    #[serde(default)]
    pub annual_gross_bonus: Decimal,
    /// Whether Scottish income tax bands apply.
    #[serde(default)]
    pub resident_in_scotland: bool,
    /// Whether National Insurance is excluded.
    #[serde(default)]
    pub no_ni: bool,
    /// Whether the blind person's allowance applies.
    #[serde(default)]
    pub blind: bool,
    /// Child benefit claim details.
    #[serde(default)]
    pub child_benefits: ChildBenefitsRequest,
    /// Pension contributions.
    #[serde(default)]
    pub pension_contributions: PensionContributionsRequest,
    /// Whether auto-enrolment contributions are taken by salary sacrifice.
    #[serde(default)]
    pub auto_enrolment_as_salary_sacrifice: bool,
    /// Whether personal contributions receive relief at source.
    #[serde(default)]
    pub tax_relief_at_source: bool,
}

/// Child benefit details in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildBenefitsRequest {
    /// Whether child benefit is claimed.
    #[serde(default)]
    pub child_benefits_taken: bool,
    /// Number of children claimed for.
    #[serde(default = "default_number_of_children")]
    pub number_of_children: u32,
}

fn default_number_of_children() -> u32 {
    1
}

impl Default for ChildBenefitsRequest {
    fn default() -> Self {
        Self {
            child_benefits_taken: false,
            number_of_children: default_number_of_children(),
        }
    }
}

/// Pension contributions in a calculation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PensionContributionsRequest {
    /// Auto-enrolment percentage (0 to 100).
    #[serde(default)]
    pub auto_enrolment: Decimal,
    /// Annual salary sacrifice.
    #[serde(default)]
    pub salary_sacrifice: Decimal,
    /// Annual personal contribution.
    #[serde(default)]
    pub personal: Decimal,
}

/// Request body for the `/analysis/income-sweep` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeSweepRequest {
    /// The inputs held fixed while salary varies.
    pub inputs: CalculationRequest,
    /// Upper end of the salary range (exclusive).
    pub max_gross_income: Decimal,
    /// Number of salaries to evaluate.
    pub points: u32,
}

/// Request body for the `/analysis/pension-savings` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionSavingsRequest {
    /// The inputs held fixed while the personal contribution varies.
    pub inputs: CalculationRequest,
    /// Number of contribution levels to evaluate.
    pub steps: u32,
}

/// Request body for the `/analysis/first-homes` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstHomesRequest {
    /// The inputs held fixed while salary varies.
    pub inputs: CalculationRequest,
    /// Where the home is bought.
    pub region: FirstHomesRegion,
    /// Upper end of the salary range (exclusive).
    pub max_gross_income: Decimal,
    /// Number of salaries to evaluate.
    pub points: u32,
}

impl TryFrom<CalculationRequest> for TaxInputs {
    type Error = EngineError;

    fn try_from(req: CalculationRequest) -> EngineResult<Self> {
        money("annual_gross_salary", req.annual_gross_salary)?;
        money("annual_gross_bonus", req.annual_gross_bonus)?;

        let pension = &req.pension_contributions;
        money("pension_contributions.salary_sacrifice", pension.salary_sacrifice)?;
        money("pension_contributions.personal", pension.personal)?;
        if pension.auto_enrolment < Decimal::ZERO || pension.auto_enrolment > Decimal::ONE_HUNDRED
        {
            return Err(invalid(
                "pension_contributions.auto_enrolment",
                "must be between 0 and 100",
            ));
        }

        if req.child_benefits.child_benefits_taken && req.child_benefits.number_of_children < 1 {
            return Err(invalid(
                "child_benefits.number_of_children",
                "must be at least 1 when child benefit is claimed",
            ));
        }

        Ok(TaxInputs {
            tax_year: req.tax_year,
            student_loan_plans: req.student_loan_plans,
            annual_gross_salary: req.annual_gross_salary,
            annual_gross_bonus: req.annual_gross_bonus,
            resident_in_scotland: req.resident_in_scotland,
            no_ni: req.no_ni,
            blind: req.blind,
            child_benefits: ChildBenefitsInput {
                child_benefits_taken: req.child_benefits.child_benefits_taken,
                number_of_children: req.child_benefits.number_of_children,
            },
            pension_contributions: PensionContributionsInput {
                auto_enrolment: req.pension_contributions.auto_enrolment,
                salary_sacrifice: req.pension_contributions.salary_sacrifice,
                personal: req.pension_contributions.personal,
            },
            auto_enrolment_as_salary_sacrifice: req.auto_enrolment_as_salary_sacrifice,
            tax_relief_at_source: req.tax_relief_at_source,
        })
    }
}

/// Checks an analysis point or step count is within `1..=MAX_ANALYSIS_POINTS`.
pub fn validate_point_count(field: &str, count: u32) -> EngineResult<u32> {
    if (1..=MAX_ANALYSIS_POINTS).contains(&count) {
        Ok(count)
    } else {
        Err(invalid(
            field,
            format!("must be between 1 and {}", MAX_ANALYSIS_POINTS),
        ))
    }
}

/// Checks a monetary request field lies within `0..=MAX_MONEY`.
pub fn money(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(invalid(field, "must not be negative"))
    } else if value > Decimal::from(MAX_MONEY) {
        Err(invalid(field, format!("must not exceed {}", MAX_MONEY)))
    } else {
        Ok(value)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}

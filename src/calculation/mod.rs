//! Calculation logic for the UK Tax Calculation Engine.
//!
//! This module contains the pure calculation stages: gross earnings, pension
//! contributions, the tapered personal allowance, banded income tax,
//! employee and employer National Insurance, student loan repayments across
//! concurrent plans, child benefit with its high income charge, and the
//! pipeline that sequences them.

mod child_benefit;
mod gross_earnings;
mod income_tax;
mod national_insurance;
mod pension;
mod student_loan;
mod tax_allowance;
mod taxes;

pub use child_benefit::{
    CHILD_BENEFITS_LABEL, HICBC_LABEL, calculate_child_benefits, hicbc_percentage, hicbc_step,
    hicbc_threshold,
};
pub use gross_earnings::{BONUS_LABEL, SALARY_LABEL, calculate_gross_earnings};
pub use income_tax::calculate_income_tax;
pub use national_insurance::{Contributor, calculate_national_insurance};
pub use pension::{
    AUTO_ENROLMENT_LABEL, GROSS_PERSONAL_LABEL, PensionPotResult, SALARY_SACRIFICE_LABEL,
    calculate_pension_pot, gross_pension_contribution, relief_at_source_factor,
};
pub use student_loan::calculate_student_loan_repayments;
pub use tax_allowance::{
    BLIND_ALLOWANCE_LABEL, PERSONAL_ALLOWANCE_LABEL, calculate_tax_allowance,
    personal_allowance_taper_rate,
};
pub use taxes::{calculate_taxes, calculate_taxes_with_audit};

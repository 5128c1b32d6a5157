//! The calculation pipeline.
//!
//! [`calculate_taxes`] runs every stage in dependency order: gross earnings,
//! pension contributions, adjusted net income, allowance, taxable income,
//! income tax, National Insurance, student loans, combined taxes, child
//! benefit, take-home pay and finally "your money". Each stage only consumes
//! the outputs of earlier ones.

use std::time::Instant;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::config::{ConfigLoader, TaxYearConstants};
use crate::error::EngineResult;
use crate::models::{
    AuditRecorder, AuditTrace, CalculationResult, TaxCalculationResult, TaxInputs,
};

use super::child_benefit::{calculate_child_benefits, hicbc_percentage};
use super::gross_earnings::calculate_gross_earnings;
use super::income_tax::calculate_income_tax;
use super::national_insurance::{Contributor, calculate_national_insurance};
use super::pension::calculate_pension_pot;
use super::student_loan::calculate_student_loan_repayments;
use super::tax_allowance::calculate_tax_allowance;

/// Calculates the full tax breakdown for one set of inputs.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTaxYear`](crate::error::EngineError::UnknownTaxYear)
/// when `inputs.tax_year` is not in the dataset. No other input can fail.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::calculation::calculate_taxes;
/// use uk_tax_engine::config::ConfigLoader;
/// use uk_tax_engine::models::TaxInputs;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let inputs = TaxInputs::new("2024/25", Decimal::new(50000, 0));
///
/// let result = calculate_taxes(&inputs, config).unwrap();
/// assert_eq!(result.taxable_income, Decimal::new(37430, 0));
/// assert_eq!(result.income_tax.total, Decimal::new(7486, 0));
/// ```
pub fn calculate_taxes(
    inputs: &TaxInputs,
    config: &ConfigLoader,
) -> EngineResult<TaxCalculationResult> {
    let constants = config.get_tax_year(&inputs.tax_year)?;
    Ok(run_pipeline(inputs, constants, &mut AuditRecorder::disabled()))
}

/// Calculates the full tax breakdown and records an audit step per stage.
///
/// The result is identical to [`calculate_taxes`].
///
/// # Errors
///
/// Same as [`calculate_taxes`].
pub fn calculate_taxes_with_audit(
    inputs: &TaxInputs,
    config: &ConfigLoader,
) -> EngineResult<(TaxCalculationResult, AuditTrace)> {
    let start_time = Instant::now();
    let constants = config.get_tax_year(&inputs.tax_year)?;

    let mut recorder = AuditRecorder::enabled();
    let result = run_pipeline(inputs, constants, &mut recorder);

    let trace = AuditTrace {
        steps: recorder.into_steps(),
        duration_us: start_time.elapsed().as_micros() as u64,
    };
    Ok((result, trace))
}

fn run_pipeline(
    inputs: &TaxInputs,
    constants: &TaxYearConstants,
    audit: &mut AuditRecorder,
) -> TaxCalculationResult {
    let gross_earnings =
        calculate_gross_earnings(inputs.annual_gross_salary, inputs.annual_gross_bonus);
    audit.record("gross_earnings", "Gross Earnings", || {
        (
            json!({
                "annual_gross_salary": inputs.annual_gross_salary,
                "annual_gross_bonus": inputs.annual_gross_bonus,
            }),
            json!(gross_earnings),
            format!(
                "Salary {} plus bonus {} = {}",
                inputs.annual_gross_salary, inputs.annual_gross_bonus, gross_earnings.total
            ),
        )
    });

    let pension = calculate_pension_pot(
        gross_earnings.total,
        &inputs.pension_contributions,
        inputs.auto_enrolment_as_salary_sacrifice,
        inputs.tax_relief_at_source,
    );
    let pension_pot = pension.pension_pot;
    let income_after_salary_sacrifice = pension.income_after_salary_sacrifice;
    audit.record("pension_contributions", "Pension Contributions", || {
        (
            json!({
                "gross_earnings": gross_earnings.total,
                "contributions": inputs.pension_contributions,
                "auto_enrolment_as_salary_sacrifice": inputs.auto_enrolment_as_salary_sacrifice,
                "tax_relief_at_source": inputs.tax_relief_at_source,
            }),
            json!({
                "pension_pot": pension_pot,
                "income_after_salary_sacrifice": income_after_salary_sacrifice,
            }),
            format!(
                "Pension pot {}; income after salary sacrifice {}",
                pension_pot.total, income_after_salary_sacrifice
            ),
        )
    });

    let adjusted_net_income = (gross_earnings.total - pension_pot.total).max(Decimal::ZERO);
    audit.record("adjusted_net_income", "Adjusted Net Income", || {
        (
            json!({
                "gross_earnings": gross_earnings.total,
                "pension_pot": pension_pot.total,
            }),
            json!({ "adjusted_net_income": adjusted_net_income }),
            format!(
                "max(0, {} - {}) = {}",
                gross_earnings.total, pension_pot.total, adjusted_net_income
            ),
        )
    });

    let tax_allowance = calculate_tax_allowance(adjusted_net_income, inputs.blind, constants);
    audit.record("tax_allowance", "Tax Allowance", || {
        let allowance = &constants.tax_allowance;
        (
            json!({
                "adjusted_net_income": adjusted_net_income,
                "blind": inputs.blind,
                "basic_allowance": allowance.basic_allowance,
                "taper_threshold": allowance.taper_threshold,
            }),
            json!(tax_allowance),
            if adjusted_net_income > allowance.taper_threshold {
                format!(
                    "Personal allowance tapered by 1 for every 2 above {}; total allowance {}",
                    allowance.taper_threshold, tax_allowance.total
                )
            } else {
                format!("Untapered allowance {}", tax_allowance.total)
            },
        )
    });

    let taxable_income = (adjusted_net_income - tax_allowance.total).max(Decimal::ZERO);
    audit.record("taxable_income", "Taxable Income", || {
        (
            json!({
                "adjusted_net_income": adjusted_net_income,
                "tax_allowance": tax_allowance.total,
            }),
            json!({ "taxable_income": taxable_income }),
            format!(
                "max(0, {} - {}) = {}",
                adjusted_net_income, tax_allowance.total, taxable_income
            ),
        )
    });

    let income_tax = calculate_income_tax(taxable_income, constants, inputs.resident_in_scotland);
    audit.record("income_tax", "Income Tax", || {
        (
            json!({
                "taxable_income": taxable_income,
                "resident_in_scotland": inputs.resident_in_scotland,
                "bands": constants.income_tax.bands(inputs.resident_in_scotland),
            }),
            json!(income_tax),
            format!(
                "{} bands charged on {}; income tax {}",
                income_tax.breakdown.len(),
                taxable_income,
                income_tax.total
            ),
        )
    });

    let employee_ni = calculate_national_insurance(
        income_after_salary_sacrifice,
        constants,
        Contributor::Employee,
        inputs.no_ni,
    );
    audit.record("employee_ni", "Employee National Insurance", || {
        ni_audit(
            income_after_salary_sacrifice,
            constants.national_insurance.primary_threshold,
            inputs.no_ni,
            &employee_ni,
        )
    });

    let employer_ni = calculate_national_insurance(
        income_after_salary_sacrifice,
        constants,
        Contributor::Employer,
        inputs.no_ni,
    );
    audit.record("employer_ni", "Employer National Insurance", || {
        ni_audit(
            income_after_salary_sacrifice,
            constants.national_insurance.secondary_threshold,
            inputs.no_ni,
            &employer_ni,
        )
    });

    let student_loan_repayments = calculate_student_loan_repayments(
        income_after_salary_sacrifice,
        &inputs.student_loan_plans,
        constants,
    );
    audit.record("student_loan", "Student Loan Repayments", || {
        (
            json!({
                "income": income_after_salary_sacrifice,
                "plans": inputs.student_loan_plans,
                "thresholds": constants.student_loan.thresholds,
            }),
            json!(student_loan_repayments),
            if inputs.student_loan_plans.is_empty() {
                "No student loan plans".to_string()
            } else {
                format!(
                    "Repayments floored to whole pounds; total {}",
                    student_loan_repayments.total
                )
            },
        )
    });

    let combined_taxes = income_tax.total + employee_ni.total + student_loan_repayments.total;
    audit.record("combined_taxes", "Combined Taxes", || {
        (
            json!({
                "income_tax": income_tax.total,
                "employee_ni": employee_ni.total,
                "student_loan_repayments": student_loan_repayments.total,
            }),
            json!({ "combined_taxes": combined_taxes }),
            format!(
                "{} + {} + {} = {} (employer NI excluded)",
                income_tax.total, employee_ni.total, student_loan_repayments.total, combined_taxes
            ),
        )
    });

    let child_benefits = calculate_child_benefits(
        adjusted_net_income,
        &inputs.child_benefits,
        &constants.child_benefit_rates,
    );
    audit.record("child_benefits", "Child Benefits", || {
        (
            json!({
                "adjusted_net_income": adjusted_net_income,
                "claim": inputs.child_benefits,
                "rates": constants.child_benefit_rates,
            }),
            json!(child_benefits),
            if inputs.child_benefits.child_benefits_taken {
                format!(
                    "HICBC at {}%; child benefits {}",
                    hicbc_percentage(adjusted_net_income),
                    child_benefits.total
                )
            } else {
                "Child benefit not claimed".to_string()
            },
        )
    });

    let take_home_pay = adjusted_net_income - combined_taxes;
    audit.record("take_home_pay", "Take Home Pay", || {
        (
            json!({
                "adjusted_net_income": adjusted_net_income,
                "combined_taxes": combined_taxes,
            }),
            json!({ "take_home_pay": take_home_pay }),
            format!("{} - {} = {}", adjusted_net_income, combined_taxes, take_home_pay),
        )
    });

    let your_money = pension_pot.total + take_home_pay + child_benefits.total;
    audit.record("your_money", "Your Money", || {
        (
            json!({
                "pension_pot": pension_pot.total,
                "take_home_pay": take_home_pay,
                "child_benefits": child_benefits.total,
            }),
            json!({ "your_money": your_money }),
            format!(
                "{} + {} + {} = {}",
                pension_pot.total, take_home_pay, child_benefits.total, your_money
            ),
        )
    });

    debug!(
        tax_year = %inputs.tax_year,
        gross = %gross_earnings.total,
        adjusted_net_income = %adjusted_net_income,
        combined_taxes = %combined_taxes,
        "Tax calculation completed"
    );

    TaxCalculationResult {
        gross_earnings,
        adjusted_net_income,
        tax_allowance,
        taxable_income,
        income_tax,
        employee_ni,
        employer_ni,
        student_loan_repayments,
        combined_taxes,
        child_benefits,
        take_home_pay,
        pension_pot,
        your_money,
    }
}

fn ni_audit(
    income: Decimal,
    threshold: Decimal,
    no_ni: bool,
    result: &CalculationResult,
) -> (serde_json::Value, serde_json::Value, String) {
    let reasoning = if no_ni {
        "National Insurance excluded".to_string()
    } else {
        format!("Charged on income above {}; total {}", threshold, result.total)
    };
    (
        json!({ "income": income, "threshold": threshold, "no_ni": no_ni }),
        json!(result),
        reasoning,
    )
}

//! Configuration types for tax-year constants.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the per-tax-year YAML files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::StudentLoanPlan;

/// Weekly child benefit rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitRates {
    /// Weekly amount paid for the eldest (or only) child.
    pub first_child_rate: Decimal,
    /// Weekly amount paid for each additional child.
    pub additional_child_rate: Decimal,
}

/// Personal allowance constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAllowanceConstants {
    /// The untapered personal allowance.
    pub basic_allowance: Decimal,
    /// Adjusted net income above which the personal allowance is tapered.
    pub taper_threshold: Decimal,
    /// Blind person's allowance, added on top of the personal allowance.
    pub blind_persons_allowance: Decimal,
}

/// Class 1 National Insurance constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalInsuranceConstants {
    /// Lower earnings limit (not charged, validated against the thresholds).
    pub lower_earnings_limit: Decimal,
    /// Threshold above which employee contributions are due.
    pub primary_threshold: Decimal,
    /// Threshold above which employer contributions are due.
    pub secondary_threshold: Decimal,
    /// Boundary between the main and the upper contribution band.
    pub upper_earnings_limit: Decimal,
    /// Employer rates: `[main band, above upper earnings limit]`.
    pub employer_rates: [Decimal; 2],
    /// Employee rates: `[main band, above upper earnings limit]`.
    pub employee_rates: [Decimal; 2],
}

/// Annual repayment thresholds per student loan plan.
///
/// A `None` threshold means the plan did not exist in that tax year; such a
/// plan sorts after every finite threshold and never repays anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLoanThresholds {
    /// Plan 1 threshold.
    pub plan1: Option<Decimal>,
    /// Plan 2 threshold.
    pub plan2: Option<Decimal>,
    /// Plan 4 threshold.
    pub plan4: Option<Decimal>,
    /// Plan 5 threshold.
    pub plan5: Option<Decimal>,
    /// Postgraduate loan threshold.
    pub postgrad: Option<Decimal>,
}

impl StudentLoanThresholds {
    /// Returns the threshold for a plan, `None` meaning unbounded.
    pub fn for_plan(&self, plan: StudentLoanPlan) -> Option<Decimal> {
        match plan {
            StudentLoanPlan::Plan1 => self.plan1,
            StudentLoanPlan::Plan2 => self.plan2,
            StudentLoanPlan::Plan4 => self.plan4,
            StudentLoanPlan::Plan5 => self.plan5,
            StudentLoanPlan::Postgrad => self.postgrad,
        }
    }
}

/// Student loan constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLoanConstants {
    /// Rate shared by plans 1, 2, 4 and 5.
    pub default_rate: Decimal,
    /// Rate for the postgraduate loan.
    pub postgrad_rate: Decimal,
    /// Repayment thresholds per plan.
    pub thresholds: StudentLoanThresholds,
}

/// A single income tax band.
///
/// Serialized as the two-element array `[rate, upper_limit]` where a `null`
/// upper limit marks the unbounded top band.
///
/// # Example
///
/// ```
/// use uk_tax_engine::config::TaxBand;
///
/// let band: TaxBand = serde_json::from_str("[0.45, null]").unwrap();
/// assert!(band.upper_limit.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Decimal, Option<Decimal>)", into = "(Decimal, Option<Decimal>)")]
pub struct TaxBand {
    /// Marginal rate charged within the band.
    pub rate: Decimal,
    /// Cumulative upper limit of taxable income for the band.
    pub upper_limit: Option<Decimal>,
}

impl From<(Decimal, Option<Decimal>)> for TaxBand {
    fn from((rate, upper_limit): (Decimal, Option<Decimal>)) -> Self {
        Self { rate, upper_limit }
    }
}

impl From<TaxBand> for (Decimal, Option<Decimal>) {
    fn from(band: TaxBand) -> Self {
        (band.rate, band.upper_limit)
    }
}

/// Income tax band tables for both jurisdictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxConstants {
    /// Scottish bands, ascending by upper limit.
    pub scotland: Vec<TaxBand>,
    /// England, Wales and Northern Ireland bands, ascending by upper limit.
    pub rest_of_uk: Vec<TaxBand>,
}

impl IncomeTaxConstants {
    /// Returns the band table for the given residency.
    pub fn bands(&self, resident_in_scotland: bool) -> &[TaxBand] {
        if resident_in_scotland {
            &self.scotland
        } else {
            &self.rest_of_uk
        }
    }
}

/// All constants for a single tax year.
///
/// Instances are immutable once loaded; one exists per tax-year key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    /// The tax-year key (e.g., "2024/25").
    pub tax_year: String,
    /// Child benefit rates.
    pub child_benefit_rates: ChildBenefitRates,
    /// Personal allowance constants.
    pub tax_allowance: TaxAllowanceConstants,
    /// National Insurance constants.
    pub national_insurance: NationalInsuranceConstants,
    /// Student loan constants.
    pub student_loan: StudentLoanConstants,
    /// Income tax bands.
    pub income_tax: IncomeTaxConstants,
}

/// The complete constants table, keyed by tax year.
///
/// Keys are `YYYY/YY` strings, so the map's ordering is chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxYearTable {
    years: BTreeMap<String, TaxYearConstants>,
}

impl TaxYearTable {
    /// Creates a table from already-validated constants.
    pub fn new(years: BTreeMap<String, TaxYearConstants>) -> Self {
        Self { years }
    }

    /// Returns the constants for a tax year, if present.
    pub fn get(&self, tax_year: &str) -> Option<&TaxYearConstants> {
        self.years.get(tax_year)
    }

    /// Returns all tax-year keys in chronological order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    /// Returns the most recent tax-year key.
    pub fn latest(&self) -> Option<&str> {
        self.years.keys().next_back().map(String::as_str)
    }

    /// Returns the number of tax years in the table.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Returns true when the table holds no tax years.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

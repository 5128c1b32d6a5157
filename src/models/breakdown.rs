//! Decomposable monetary results.
//!
//! Every quantity the engine produces that can be split into parts (income
//! tax by band, pension pot by source, child benefit less its clawback) is a
//! [`CalculationResult`]: a total plus the [`BreakdownItem`]s that make it up.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line in a breakdown.
///
/// Lines produced by banded arithmetic carry the marginal rate of the band;
/// all other lines carry a descriptive label.
///
/// # Example
///
/// ```
/// use uk_tax_engine::models::BreakdownItem;
/// use rust_decimal::Decimal;
///
/// let line = BreakdownItem::labeled("Auto enrolment", Decimal::new(1500, 0));
/// assert_eq!(line.amount(), Decimal::new(1500, 0));
/// assert_eq!(line.label(), Some("Auto enrolment"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakdownItem {
    /// Amount charged within a band at a marginal rate.
    RateBand {
        /// The marginal rate as a fraction (e.g., 0.20).
        rate: Decimal,
        /// The amount attributed to the band.
        amount: Decimal,
    },
    /// Amount attributed to a named component.
    Labeled {
        /// Human-readable name of the component.
        label: String,
        /// The amount attributed to the component.
        amount: Decimal,
    },
}

impl BreakdownItem {
    /// Creates a rate-band line.
    pub fn rate_band(rate: Decimal, amount: Decimal) -> Self {
        Self::RateBand { rate, amount }
    }

    /// Creates a labeled line.
    pub fn labeled(label: impl Into<String>, amount: Decimal) -> Self {
        Self::Labeled {
            label: label.into(),
            amount,
        }
    }

    /// Returns the amount of the line.
    pub fn amount(&self) -> Decimal {
        match self {
            Self::RateBand { amount, .. } | Self::Labeled { amount, .. } => *amount,
        }
    }

    pub(crate) fn amount_mut(&mut self) -> &mut Decimal {
        match self {
            Self::RateBand { amount, .. } | Self::Labeled { amount, .. } => amount,
        }
    }

    /// Returns the marginal rate for rate-band lines.
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            Self::RateBand { rate, .. } => Some(*rate),
            Self::Labeled { .. } => None,
        }
    }

    /// Returns the label for labeled lines.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::RateBand { .. } => None,
            Self::Labeled { label, .. } => Some(label),
        }
    }
}

/// A monetary total and the lines that make it up.
///
/// # Example
///
/// ```
/// use uk_tax_engine::models::{BreakdownItem, CalculationResult};
/// use rust_decimal::Decimal;
///
/// let result = CalculationResult::from_breakdown(vec![
///     BreakdownItem::labeled("Annual Gross Salary", Decimal::new(50000, 0)),
///     BreakdownItem::labeled("Annual Gross Bonus", Decimal::new(5000, 0)),
/// ]);
/// assert_eq!(result.total, Decimal::new(55000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The total amount.
    pub total: Decimal,
    /// The components of the total.
    pub breakdown: Vec<BreakdownItem>,
}

impl CalculationResult {
    /// A zero total with no breakdown lines.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates a result with an explicit total.
    pub fn new(total: Decimal, breakdown: Vec<BreakdownItem>) -> Self {
        Self { total, breakdown }
    }

    /// Creates a result whose total is the sum of its lines.
    pub fn from_breakdown(breakdown: Vec<BreakdownItem>) -> Self {
        let total = breakdown.iter().map(BreakdownItem::amount).sum();
        Self { total, breakdown }
    }

    /// Sums the amounts of the breakdown lines.
    pub fn breakdown_total(&self) -> Decimal {
        self.breakdown.iter().map(BreakdownItem::amount).sum()
    }

    /// Finds the amount of the first line with the given label.
    pub fn labeled_amount(&self, label: &str) -> Option<Decimal> {
        self.breakdown
            .iter()
            .find(|item| item.label() == Some(label))
            .map(BreakdownItem::amount)
    }
}

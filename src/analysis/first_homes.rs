//! First Homes scheme affordability.
//!
//! Buyers earning at or below the regional income cap may purchase at a
//! discount; above the cap the full price applies, which produces a cliff in
//! affordability just past the cap.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::calculation::calculate_taxes;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::TaxInputs;

use super::{PERCENT_DP, evenly_spaced};

/// The region a First Homes purchase is made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstHomesRegion {
    /// Greater London.
    London,
    /// Anywhere in England outside London.
    OutsideLondon,
}

impl FirstHomesRegion {
    /// Maximum house price before discount.
    pub fn max_house_price(self) -> Decimal {
        match self {
            FirstHomesRegion::London => Decimal::new(420_000, 0),
            FirstHomesRegion::OutsideLondon => Decimal::new(250_000, 0),
        }
    }

    /// Highest gross income that remains eligible.
    pub fn income_cap(self) -> Decimal {
        match self {
            FirstHomesRegion::London => Decimal::new(90_000, 0),
            FirstHomesRegion::OutsideLondon => Decimal::new(80_000, 0),
        }
    }

    /// Price paid by an eligible buyer.
    pub fn discounted_price(self) -> Decimal {
        self.max_house_price() * first_homes_discount_rate()
    }
}

/// The fraction of the price an eligible buyer pays.
pub fn first_homes_discount_rate() -> Decimal {
    Decimal::new(5, 1)
}

const SEARCH_CEILING: i64 = 1_000_000;
const SEARCH_PRECISION: i64 = 100;
const RESULT_ROUNDING: i64 = 1_000;

/// Affordability at one gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstHomesPoint {
    /// Annual gross salary (bonus is zero).
    pub gross_income: Decimal,
    /// Take-home pay at that salary.
    pub take_home_pay: Decimal,
    /// Price payable: discounted when eligible, full otherwise.
    pub house_price: Decimal,
    /// Take-home pay as a percentage of the payable price.
    pub percent_of_house_price: Decimal,
    /// Whether the salary is within the income cap.
    pub is_eligible: bool,
}

/// Sweeps salary and reports take-home pay against the payable house price.
///
/// # Errors
///
/// * `EngineError::InvalidInput` if `points` is zero
/// * `EngineError::UnknownTaxYear` if the tax year is not in the dataset
pub fn first_homes_chart(
    inputs: &TaxInputs,
    config: &ConfigLoader,
    region: FirstHomesRegion,
    max_gross_income: Decimal,
    points: u32,
) -> EngineResult<Vec<FirstHomesPoint>> {
    evenly_spaced("points", max_gross_income, points)?
        .map(|gross_income| {
            let take_home_pay = take_home_at(inputs, config, gross_income)?;
            let is_eligible = gross_income <= region.income_cap();
            let house_price = if is_eligible {
                region.discounted_price()
            } else {
                region.max_house_price()
            };

            Ok(FirstHomesPoint {
                gross_income,
                take_home_pay,
                house_price,
                percent_of_house_price: (take_home_pay / house_price * Decimal::ONE_HUNDRED)
                    .round_dp(PERCENT_DP),
                is_eligible,
            })
        })
        .collect()
}

/// Finds the salary above the cap whose take-home pay buys as much at full
/// price as the take-home pay at the cap buys at the discounted price.
///
/// Bisects between the cap and 1,000,000 until the interval is no wider than
/// 100, then rounds the upper bound to the nearest 1,000. Returns 1,000,000
/// when no salary in range reaches the target.
///
/// # Errors
///
/// Returns `EngineError::UnknownTaxYear` if the tax year is not in the dataset.
///
/// # Examples
///
/// ```
/// use uk_tax_engine::analysis::{FirstHomesRegion, first_homes_equivalent_income};
/// use uk_tax_engine::config::ConfigLoader;
/// use uk_tax_engine::models::TaxInputs;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
/// let income = first_homes_equivalent_income(&inputs, config, FirstHomesRegion::OutsideLondon).unwrap();
/// assert!(income > FirstHomesRegion::OutsideLondon.income_cap());
/// ```
pub fn first_homes_equivalent_income(
    inputs: &TaxInputs,
    config: &ConfigLoader,
    region: FirstHomesRegion,
) -> EngineResult<Decimal> {
    let price_multiplier = region.max_house_price() / region.discounted_price();
    let target = take_home_at(inputs, config, region.income_cap())? * price_multiplier;

    let precision = Decimal::from(SEARCH_PRECISION);
    let mut low = region.income_cap();
    let mut high = Decimal::from(SEARCH_CEILING);

    while high - low > precision {
        let mid = (low + high) / Decimal::TWO;
        if take_home_at(inputs, config, mid)? < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    let thousands = (high / Decimal::from(RESULT_ROUNDING))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Ok(thousands * Decimal::from(RESULT_ROUNDING))
}

fn take_home_at(
    inputs: &TaxInputs,
    config: &ConfigLoader,
    gross_income: Decimal,
) -> EngineResult<Decimal> {
    Ok(calculate_taxes(&inputs.with_salary(gross_income), config)?.take_home_pay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config() -> &'static ConfigLoader {
        ConfigLoader::builtin().unwrap()
    }

    #[test]
    fn test_region_constants() {
        assert_eq!(FirstHomesRegion::London.discounted_price(), dec("210000"));
        assert_eq!(FirstHomesRegion::OutsideLondon.discounted_price(), dec("125000"));
        assert_eq!(FirstHomesRegion::London.income_cap(), dec("90000"));
        assert_eq!(FirstHomesRegion::OutsideLondon.max_house_price(), dec("250000"));
    }

    #[test]
    fn test_region_serde() {
        let region: FirstHomesRegion = serde_json::from_str("\"outside_london\"").unwrap();
        assert_eq!(region, FirstHomesRegion::OutsideLondon);
    }

    #[test]
    fn test_chart_eligibility_cliff() {
        let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
        // 0, 20k, 40k, 60k, 80k, 100k, ...
        let chart = first_homes_chart(
            &inputs,
            config(),
            FirstHomesRegion::OutsideLondon,
            dec("200000"),
            10,
        )
        .unwrap();

        assert!(chart[4].is_eligible);
        assert_eq!(chart[4].gross_income, dec("80000"));
        assert_eq!(chart[4].house_price, dec("125000"));

        assert!(!chart[5].is_eligible);
        assert_eq!(chart[5].house_price, dec("250000"));
        assert!(chart[5].percent_of_house_price < chart[4].percent_of_house_price);
    }

    #[test]
    fn test_chart_zero_income() {
        let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
        let chart =
            first_homes_chart(&inputs, config(), FirstHomesRegion::London, dec("100000"), 1)
                .unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].percent_of_house_price, Decimal::ZERO);
    }

    #[test]
    fn test_equivalent_income_doubles_take_home() {
        let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
        let region = FirstHomesRegion::OutsideLondon;
        let income = first_homes_equivalent_income(&inputs, config(), region).unwrap();

        assert_eq!(income % dec("1000"), Decimal::ZERO);
        assert!(income > region.income_cap());

        let target = take_home_at(&inputs, config(), region.income_cap()).unwrap() * dec("2");
        // rounding to the nearest 1,000 moves at most 500 + 100 from the crossing
        let near_below = take_home_at(&inputs, config(), income - dec("600")).unwrap();
        let near_above = take_home_at(&inputs, config(), income + dec("600")).unwrap();
        assert!(near_below < target);
        assert!(near_above >= target);
    }

    #[test]
    fn test_equivalent_income_unknown_year() {
        let inputs = TaxInputs::new("2003/04", Decimal::ZERO);
        let err =
            first_homes_equivalent_income(&inputs, config(), FirstHomesRegion::London).unwrap_err();
        assert!(matches!(err, EngineError::UnknownTaxYear { .. }));
    }

    #[test]
    fn test_chart_zero_points_rejected() {
        let inputs = TaxInputs::new("2024/25", Decimal::ZERO);
        let err = first_homes_chart(&inputs, config(), FirstHomesRegion::London, dec("1"), 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }
}

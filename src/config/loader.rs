//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! constants from YAML files, validating them, and looking them up by key.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::{TaxBand, TaxYearConstants, TaxYearTable};

/// The dataset shipped with the crate, embedded at compile time.
const BUILTIN_TAX_YEARS: &[(&str, &str)] = &[
    (
        "2017-18.yaml",
        include_str!("../../config/tax_years/2017-18.yaml"),
    ),
    (
        "2018-19.yaml",
        include_str!("../../config/tax_years/2018-19.yaml"),
    ),
    (
        "2019-20.yaml",
        include_str!("../../config/tax_years/2019-20.yaml"),
    ),
    (
        "2020-21.yaml",
        include_str!("../../config/tax_years/2020-21.yaml"),
    ),
    (
        "2021-22.yaml",
        include_str!("../../config/tax_years/2021-22.yaml"),
    ),
    (
        "2022-23.yaml",
        include_str!("../../config/tax_years/2022-23.yaml"),
    ),
    (
        "2023-24.yaml",
        include_str!("../../config/tax_years/2023-24.yaml"),
    ),
    (
        "2024-25.yaml",
        include_str!("../../config/tax_years/2024-25.yaml"),
    ),
    (
        "2025-26.yaml",
        include_str!("../../config/tax_years/2025-26.yaml"),
    ),
];

static BUILTIN: OnceLock<EngineResult<ConfigLoader>> = OnceLock::new();

/// Loads and provides access to tax-year constants.
///
/// # Directory Structure
///
/// A configuration directory holds one YAML document per tax year:
/// ```text
/// config/tax_years/
/// ├── 2023-24.yaml
/// ├── 2024-25.yaml
/// └── 2025-26.yaml
/// ```
///
/// Each document carries its own `tax_year` key; the file name is only used
/// in error messages.
///
/// # Example
///
/// ```
/// use uk_tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::builtin()?;
/// let constants = loader.get_tax_year("2024/25")?;
/// assert_eq!(constants.tax_allowance.basic_allowance.to_string(), "12570");
/// # Ok::<(), uk_tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    table: TaxYearTable,
}

impl ConfigLoader {
    /// Loads every `*.yaml` file in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The directory is missing or contains no YAML files (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - Any record breaks a table invariant, or two files declare the same
    ///   tax year (`InvalidConfig`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use uk_tax_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/tax_years")?;
    /// # Ok::<(), uk_tax_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.is_dir() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut documents = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let file = entry.path();
            if file.extension().is_some_and(|ext| ext == "yaml") {
                let file_str = file.display().to_string();
                let content =
                    fs::read_to_string(&file).map_err(|_| EngineError::ConfigNotFound {
                        path: file_str.clone(),
                    })?;
                documents.push((file_str, content));
            }
        }

        if documents.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax year files found)", dir_str),
            });
        }

        // read_dir order is platform dependent
        documents.sort();
        Self::from_yaml_documents(&documents)
    }

    /// Builds a loader from in-memory YAML documents given as `(name, text)`.
    pub fn from_yaml_documents<N, T>(documents: &[(N, T)]) -> EngineResult<Self>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut years = BTreeMap::new();

        for (name, text) in documents {
            let name = name.as_ref();
            let constants: TaxYearConstants =
                serde_yaml::from_str(text.as_ref()).map_err(|e| EngineError::ConfigParseError {
                    path: name.to_string(),
                    message: e.to_string(),
                })?;

            validate(&constants)?;
            debug!(file = name, tax_year = %constants.tax_year, "Loaded tax year constants");

            let key = constants.tax_year.clone();
            if years.insert(key.clone(), constants).is_some() {
                return Err(EngineError::InvalidConfig {
                    tax_year: key,
                    message: format!("declared more than once (again in {})", name),
                });
            }
        }

        let table = TaxYearTable::new(years);
        info!(
            tax_years = table.len(),
            latest = table.latest().unwrap_or("-"),
            "Tax year table loaded"
        );
        Ok(Self { table })
    }

    /// Returns the dataset shipped with the crate.
    ///
    /// The embedded files are parsed on first use and shared for the rest of
    /// the process.
    pub fn builtin() -> EngineResult<&'static ConfigLoader> {
        BUILTIN
            .get_or_init(|| Self::from_yaml_documents(BUILTIN_TAX_YEARS))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the underlying constants table.
    pub fn table(&self) -> &TaxYearTable {
        &self.table
    }

    /// Gets the constants for a tax year.
    ///
    /// # Returns
    ///
    /// Returns the constants if found, or `UnknownTaxYear`. There is no
    /// fallback year.
    pub fn get_tax_year(&self, tax_year: &str) -> EngineResult<&TaxYearConstants> {
        self.table
            .get(tax_year)
            .ok_or_else(|| EngineError::UnknownTaxYear {
                tax_year: tax_year.to_string(),
            })
    }

    /// Returns all known tax-year keys in chronological order.
    pub fn tax_years(&self) -> Vec<&str> {
        self.table.keys().collect()
    }

    /// Returns the most recent tax-year key.
    pub fn latest_tax_year(&self) -> Option<&str> {
        self.table.latest()
    }
}

/// Checks a single record against the invariants of the constants table.
fn validate(constants: &TaxYearConstants) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidConfig {
        tax_year: constants.tax_year.clone(),
        message,
    };

    if !is_valid_tax_year_key(&constants.tax_year) {
        return Err(invalid(
            "tax year key must look like YYYY/YY with consecutive years".to_string(),
        ));
    }

    validate_bands("scotland", &constants.income_tax.scotland).map_err(&invalid)?;
    validate_bands("rest_of_uk", &constants.income_tax.rest_of_uk).map_err(&invalid)?;

    let ni = &constants.national_insurance;
    for (name, rate) in [
        ("employee_rates[0]", ni.employee_rates[0]),
        ("employee_rates[1]", ni.employee_rates[1]),
        ("employer_rates[0]", ni.employer_rates[0]),
        ("employer_rates[1]", ni.employer_rates[1]),
        ("student_loan.default_rate", constants.student_loan.default_rate),
        ("student_loan.postgrad_rate", constants.student_loan.postgrad_rate),
    ] {
        if !is_fractional_rate(rate) {
            return Err(invalid(format!("{} must be in [0, 1), got {}", name, rate)));
        }
    }

    if ni.lower_earnings_limit > ni.primary_threshold
        || ni.primary_threshold > ni.upper_earnings_limit
    {
        return Err(invalid(
            "national insurance requires lower_earnings_limit <= primary_threshold <= upper_earnings_limit"
                .to_string(),
        ));
    }
    if ni.secondary_threshold > ni.upper_earnings_limit {
        return Err(invalid(
            "national insurance requires secondary_threshold <= upper_earnings_limit".to_string(),
        ));
    }

    Ok(())
}

fn validate_bands(jurisdiction: &str, bands: &[TaxBand]) -> Result<(), String> {
    let Some((last, rest)) = bands.split_last() else {
        return Err(format!("{} has no income tax bands", jurisdiction));
    };

    if last.upper_limit.is_some() {
        return Err(format!("{}: the last band must be unbounded", jurisdiction));
    }

    let mut previous = Decimal::ZERO;
    for (index, band) in rest.iter().enumerate() {
        let Some(limit) = band.upper_limit else {
            return Err(format!(
                "{}: band {} is unbounded but is not the last band",
                jurisdiction, index
            ));
        };
        if limit <= previous {
            return Err(format!(
                "{}: band limits must be strictly ascending ({} after {})",
                jurisdiction, limit, previous
            ));
        }
        previous = limit;
    }

    if let Some(band) = bands.iter().find(|b| !is_fractional_rate(b.rate)) {
        return Err(format!(
            "{}: rate {} must be in [0, 1)",
            jurisdiction, band.rate
        ));
    }

    Ok(())
}

fn is_fractional_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate < Decimal::ONE
}

/// Accepts keys such as "2024/25".
fn is_valid_tax_year_key(key: &str) -> bool {
    let Some((start, end)) = key.split_once('/') else {
        return false;
    };
    if start.len() != 4 || end.len() != 2 {
        return false;
    }
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(start), Ok(end)) => (start + 1) % 100 == end,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/tax_years"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn document(tax_year: &str, rest_of_uk: &str) -> String {
        format!(
            r#"
tax_year: "{tax_year}"
child_benefit_rates:
  first_child_rate: 25.60
  additional_child_rate: 16.95
tax_allowance:
  basic_allowance: 12570
  taper_threshold: 100000
  blind_persons_allowance: 3070
national_insurance:
  lower_earnings_limit: 6396
  primary_threshold: 12570
  secondary_threshold: 9100
  upper_earnings_limit: 50270
  employer_rates: [0.138, 0.138]
  employee_rates: [0.08, 0.02]
student_loan:
  default_rate: 0.09
  postgrad_rate: 0.06
  thresholds:
    plan1: 24990
    plan2: 27295
    plan4: 31395
    plan5: null
    postgrad: 21000
income_tax:
  scotland:
    - [0.19, 2306]
    - [0.48, null]
  rest_of_uk: {rest_of_uk}
"#
        )
    }

    const VALID_BANDS: &str = "[[0.20, 37700], [0.40, 125140], [0.45, null]]";

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.tax_years().first(), Some(&"2017/18"));
        assert_eq!(loader.latest_tax_year(), Some("2025/26"));
    }

    #[test]
    fn test_builtin_matches_directory() {
        let builtin = ConfigLoader::builtin().unwrap();
        let loaded = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(builtin.table(), loaded.table());
    }

    #[test]
    fn test_get_tax_year_2024_25() {
        let loader = ConfigLoader::builtin().unwrap();
        let constants = loader.get_tax_year("2024/25").unwrap();

        assert_eq!(constants.tax_allowance.basic_allowance, dec("12570"));
        assert_eq!(constants.tax_allowance.blind_persons_allowance, dec("3070"));
        assert_eq!(constants.national_insurance.employee_rates[0], dec("0.08"));
        assert_eq!(
            constants.student_loan.thresholds.plan2,
            Some(dec("27295"))
        );
        assert_eq!(constants.child_benefit_rates.first_child_rate, dec("25.60"));
        assert_eq!(constants.income_tax.rest_of_uk.len(), 3);
        assert_eq!(constants.income_tax.scotland.len(), 6);
    }

    #[test]
    fn test_unavailable_plan_threshold_is_none() {
        let loader = ConfigLoader::builtin().unwrap();
        let constants = loader.get_tax_year("2020/21").unwrap();
        assert_eq!(constants.student_loan.thresholds.plan4, None);
        assert_eq!(constants.student_loan.thresholds.plan5, None);
    }

    #[test]
    fn test_unknown_tax_year_returns_error() {
        let loader = ConfigLoader::builtin().unwrap();

        match loader.get_tax_year("1999/00") {
            Err(EngineError::UnknownTaxYear { tax_year }) => assert_eq!(tax_year, "1999/00"),
            other => panic!("Expected UnknownTaxYear, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("/nonexistent/path"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_from_documents_single_year() {
        let loader =
            ConfigLoader::from_yaml_documents(&[("test.yaml", document("2024/25", VALID_BANDS))])
                .unwrap();
        assert_eq!(loader.tax_years(), vec!["2024/25"]);
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_documents(&[("bad.yaml", "tax_year: [unclosed")]);

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "bad.yaml"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_tax_year_rejected() {
        let result = ConfigLoader::from_yaml_documents(&[
            ("a.yaml", document("2024/25", VALID_BANDS)),
            ("b.yaml", document("2024/25", VALID_BANDS)),
        ]);

        match result {
            Err(EngineError::InvalidConfig { tax_year, message }) => {
                assert_eq!(tax_year, "2024/25");
                assert!(message.contains("b.yaml"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_bounded_last_band_rejected() {
        let result = ConfigLoader::from_yaml_documents(&[(
            "test.yaml",
            document("2024/25", "[[0.20, 37700], [0.40, 125140]]"),
        )]);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_descending_bands_rejected() {
        let result = ConfigLoader::from_yaml_documents(&[(
            "test.yaml",
            document("2024/25", "[[0.20, 125140], [0.40, 37700], [0.45, null]]"),
        )]);

        match result {
            Err(EngineError::InvalidConfig { message, .. }) => {
                assert!(message.contains("ascending"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_of_one_rejected() {
        let result = ConfigLoader::from_yaml_documents(&[(
            "test.yaml",
            document("2024/25", "[[0.20, 37700], [1.0, null]]"),
        )]);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_malformed_tax_year_key_rejected() {
        let result = ConfigLoader::from_yaml_documents(&[(
            "test.yaml",
            document("2024/26", VALID_BANDS),
        )]);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_tax_year_key_format() {
        assert!(is_valid_tax_year_key("2024/25"));
        assert!(is_valid_tax_year_key("1999/00"));
        assert!(!is_valid_tax_year_key("2024-25"));
        assert!(!is_valid_tax_year_key("2024/2025"));
        assert!(!is_valid_tax_year_key("24/25"));
        assert!(!is_valid_tax_year_key("abcd/ef"));
    }

    #[test]
    fn test_every_builtin_year_has_unbounded_top_band() {
        let loader = ConfigLoader::builtin().unwrap();
        for key in loader.tax_years() {
            let constants = loader.get_tax_year(key).unwrap();
            assert!(constants.income_tax.scotland.last().unwrap().upper_limit.is_none());
            assert!(constants.income_tax.rest_of_uk.last().unwrap().upper_limit.is_none());
        }
    }
}

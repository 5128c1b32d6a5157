//! Integration tests for the UK Tax Calculation Engine.
//!
//! This test suite covers:
//! - Reference scenarios through the library entry point
//! - Scottish bands, allowance tapering and the blind person's allowance
//! - Every shipped tax year
//! - The HTTP API: calculation, analyses, tax-year listing and error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use uk_tax_engine::api::{AppState, create_router};
use uk_tax_engine::calculation::calculate_taxes;
use uk_tax_engine::config::ConfigLoader;
use uk_tax_engine::models::{ChildBenefitsInput, StudentLoanPlan, TaxInputs};

// =============================================================================
// Test Helpers
// =============================================================================

fn config() -> &'static ConfigLoader {
    ConfigLoader::builtin().expect("Failed to load built-in dataset")
}

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/tax_years").expect("Failed to load config");
    create_router(AppState::new(config))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal serialized as a JSON string.
fn json_decimal(value: &Value) -> Decimal {
    decimal(value.as_str().expect("decimal should serialize as a string"))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(create_router_for_test(), request).await
}

// =============================================================================
// SECTION 1: Reference Scenarios
// =============================================================================

#[test]
fn test_basic_salary_scenario() {
    let inputs = TaxInputs::new("2024/25", decimal("50000"));
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(result.tax_allowance.total, decimal("12570"));
    assert_eq!(result.taxable_income, decimal("37430"));
    assert_eq!(result.income_tax.total, decimal("7486"));
}

#[test]
fn test_salary_sacrifice_scenario() {
    let mut inputs = TaxInputs::new("2024/25", decimal("50000"));
    inputs.pension_contributions.salary_sacrifice = decimal("5000");
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(result.adjusted_net_income, decimal("45000"));
    assert_eq!(result.pension_pot.total, decimal("5000"));
}

#[test]
fn test_plan2_scenario() {
    let mut inputs = TaxInputs::new("2024/25", decimal("50000"));
    inputs.student_loan_plans = vec![StudentLoanPlan::Plan2];
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(result.student_loan_repayments.total, decimal("2043"));
}

#[test]
fn test_stacked_postgrad_scenario() {
    let mut inputs = TaxInputs::new("2024/25", decimal("50000"));
    inputs.student_loan_plans = vec![StudentLoanPlan::Postgrad, StudentLoanPlan::Plan2];
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(result.student_loan_repayments.total, decimal("3783"));
    assert_eq!(
        result.student_loan_repayments.labeled_amount("Postgraduate"),
        Some(decimal("1740"))
    );
}

#[test]
fn test_child_benefit_clawback_scenario() {
    let mut inputs = TaxInputs::new("2024/25", decimal("55000"));
    inputs.child_benefits = ChildBenefitsInput {
        child_benefits_taken: true,
        number_of_children: 2,
    };
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(
        result.child_benefits.labeled_amount("Child Benefits"),
        Some(decimal("2212.60"))
    );
    assert_eq!(result.child_benefits.total, decimal("1106.30"));
}

// =============================================================================
// SECTION 2: Allowances and Jurisdictions
// =============================================================================

#[test]
fn test_scottish_taxpayer_at_50000() {
    let mut inputs = TaxInputs::new("2024/25", decimal("50000"));
    inputs.resident_in_scotland = true;
    let result = calculate_taxes(&inputs, config()).unwrap();

    // 2,306 @ 19% + 11,685 @ 20% + 17,101 @ 21% + 6,338 @ 42%
    assert_eq!(result.income_tax.total, decimal("9028.31"));
    assert_eq!(result.income_tax.breakdown.len(), 4);
    // NI does not depend on residency
    assert_eq!(result.employee_ni.total, decimal("2994.40"));
}

#[test]
fn test_personal_allowance_taper() {
    let inputs = TaxInputs::new("2024/25", decimal("110000"));
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(result.tax_allowance.total, decimal("7570"));
    assert_eq!(result.taxable_income, decimal("102430"));
    // 37,700 @ 20% + 64,730 @ 40%
    assert_eq!(result.income_tax.total, decimal("33432"));
}

#[test]
fn test_blind_allowance_survives_full_taper() {
    let mut inputs = TaxInputs::new("2024/25", decimal("125140"));
    inputs.blind = true;
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(
        result.tax_allowance.labeled_amount("Personal Allowance"),
        Some(Decimal::ZERO)
    );
    assert_eq!(
        result.tax_allowance.labeled_amount("Blind Person's Allowance"),
        Some(decimal("3070"))
    );
    assert_eq!(result.tax_allowance.total, decimal("3070"));
}

#[test]
fn test_relief_at_source_grosses_up_personal_contribution() {
    let mut inputs = TaxInputs::new("2024/25", decimal("60000"));
    inputs.pension_contributions.personal = decimal("4000");
    inputs.tax_relief_at_source = true;
    let result = calculate_taxes(&inputs, config()).unwrap();

    assert_eq!(
        result.pension_pot.labeled_amount("Gross Personal"),
        Some(decimal("5000"))
    );
    assert_eq!(result.adjusted_net_income, decimal("55000"));
}

#[test]
fn test_every_shipped_tax_year_calculates() {
    let config = config();
    for tax_year in config.tax_years() {
        let mut inputs = TaxInputs::new(tax_year, decimal("75000"));
        inputs.student_loan_plans = StudentLoanPlan::ALL.to_vec();
        inputs.child_benefits.child_benefits_taken = true;

        let result = calculate_taxes(&inputs, config).unwrap();
        assert!(result.take_home_pay < result.adjusted_net_income, "{tax_year}");
        assert_eq!(
            result.student_loan_repayments.breakdown_total(),
            result.student_loan_repayments.total,
            "{tax_year}"
        );
    }
}

// =============================================================================
// SECTION 3: HTTP API
// =============================================================================

#[tokio::test]
async fn test_api_calculate_returns_full_result() {
    let (status, json) = post_json(
        "/calculate",
        json!({
            "tax_year": "2024/25",
            "annual_gross_salary": "50000",
            "student_loan_plans": ["plan2"],
            "pension_contributions": { "salary_sacrifice": "5000" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tax_year"], "2024/25");
    assert_eq!(json["engine_version"], env!("CARGO_PKG_VERSION"));
    assert!(json["calculation_id"].is_string());

    let result = &json["result"];
    assert_eq!(json_decimal(&result["adjusted_net_income"]), decimal("45000"));
    // plan 2 on 45,000: 17,705 * 9% = 1,593.45
    assert_eq!(
        json_decimal(&result["student_loan_repayments"]["total"]),
        decimal("1593")
    );

    let breakdown = result["income_tax"]["breakdown"].as_array().unwrap();
    assert_eq!(breakdown[0]["kind"], "rate_band");
    assert_eq!(json_decimal(&breakdown[0]["rate"]), decimal("0.20"));

    let pension = result["pension_pot"]["breakdown"].as_array().unwrap();
    assert_eq!(pension[0]["kind"], "labeled");
    assert_eq!(pension[0]["label"], "Salary sacrifice");
}

#[tokio::test]
async fn test_api_calculate_includes_audit_trace() {
    let (status, json) = post_json(
        "/calculate",
        json!({ "tax_year": "2024/25", "annual_gross_salary": 50000 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let steps = json["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 13);
    assert_eq!(steps[0]["rule_id"], "gross_earnings");
    assert_eq!(steps[12]["rule_id"], "your_money");
}

#[tokio::test]
async fn test_api_tax_years() {
    let request = Request::builder()
        .method("GET")
        .uri("/tax-years")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    let years = json["tax_years"].as_array().unwrap();
    assert_eq!(years.len(), 9);
    assert_eq!(years[0], "2017/18");
    assert_eq!(json["latest"], "2025/26");
}

#[tokio::test]
async fn test_api_income_sweep() {
    let (status, json) = post_json(
        "/analysis/income-sweep",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 0 },
            "max_gross_income": 200000,
            "points": 200
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 200);
    assert!(points[0]["marginal_rate"].is_null());
    assert_eq!(json_decimal(&points[50]["gross_income"]), decimal("50000"));
    assert_eq!(json_decimal(&points[50]["combined_taxes"]), decimal("10480.40"));
}

#[tokio::test]
async fn test_api_pension_savings() {
    let (status, json) = post_json(
        "/analysis/pension-savings",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 60000 },
            "steps": 12
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(json_decimal(&points[1]["tax_savings_percentage"]), decimal("40"));
}

#[tokio::test]
async fn test_api_first_homes() {
    let (status, json) = post_json(
        "/analysis/first-homes",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 0 },
            "region": "london",
            "max_gross_income": 200000,
            "points": 20
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let equivalent = json_decimal(&json["equivalent_gross_income"]);
    assert!(equivalent > decimal("90000"));
    assert_eq!(equivalent % decimal("1000"), Decimal::ZERO);

    let points = json["points"].as_array().unwrap();
    // 90,000 is the ninth step of 10,000 and still eligible
    assert_eq!(points[9]["is_eligible"], true);
    assert_eq!(points[10]["is_eligible"], false);
    assert_eq!(json_decimal(&points[9]["house_price"]), decimal("210000"));
}

// =============================================================================
// SECTION 4: Error Cases
// =============================================================================

#[tokio::test]
async fn test_api_unknown_tax_year() {
    let (status, json) = post_json(
        "/calculate",
        json!({ "tax_year": "2099/00", "annual_gross_salary": 50000 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UNKNOWN_TAX_YEAR");
}

#[tokio::test]
async fn test_api_negative_bonus_rejected() {
    let (status, json) = post_json(
        "/calculate",
        json!({
            "tax_year": "2024/25",
            "annual_gross_salary": 50000,
            "annual_gross_bonus": -100
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("annual_gross_bonus"));
}

#[tokio::test]
async fn test_api_oversized_earnings_rejected() {
    let (status, json) = post_json(
        "/calculate",
        json!({
            "tax_year": "2024/25",
            "annual_gross_salary": "50000000000000000000000000000",
            "annual_gross_bonus": "50000000000000000000000000000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("annual_gross_salary"));
}

#[tokio::test]
async fn test_api_oversized_sweep_range_rejected() {
    let (status, json) = post_json(
        "/analysis/income-sweep",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 0 },
            "max_gross_income": "1000000000000.01",
            "points": 10
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("max_gross_income"));
}

#[tokio::test]
async fn test_api_too_many_points_rejected() {
    let (status, json) = post_json(
        "/analysis/income-sweep",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 0 },
            "max_gross_income": 200000,
            "points": 5001
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_api_unknown_region_rejected() {
    let (status, json) = post_json(
        "/analysis/first-homes",
        json!({
            "inputs": { "tax_year": "2024/25", "annual_gross_salary": 0 },
            "region": "wales",
            "max_gross_income": 200000,
            "points": 20
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_api_missing_content_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/calculate")
        .body(Body::from(r#"{"tax_year": "2024/25", "annual_gross_salary": 1}"#))
        .unwrap();
    let (status, json) = send(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_CONTENT_TYPE");
}

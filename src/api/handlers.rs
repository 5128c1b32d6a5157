//! HTTP request handlers for the UK Tax Calculation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{
    first_homes_chart, first_homes_equivalent_income, income_sweep, pension_savings,
};
use crate::calculation::calculate_taxes_with_audit;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::TaxInputs;

use super::request::{
    CalculationRequest, FirstHomesRequest, IncomeSweepRequest, PensionSavingsRequest,
    money, validate_point_count,
};
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, FirstHomesResponse, IncomeSweepResponse,
    PensionSavingsResponse, TaxYearsResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/analysis/income-sweep", post(income_sweep_handler))
        .route("/analysis/pension-savings", post(pension_savings_handler))
        .route("/analysis/first-homes", post(first_homes_handler))
        .route("/tax-years", get(tax_years_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts calculation inputs and returns the full breakdown with its audit
/// trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<CalculationResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = extract(payload, correlation_id)?;
    let inputs = TaxInputs::try_from(request).map_err(|err| failure(correlation_id, err))?;

    let start_time = Instant::now();
    let (result, audit_trace) = calculate_taxes_with_audit(&inputs, state.config())
        .map_err(|err| failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        tax_year = %inputs.tax_year,
        take_home_pay = %result.take_home_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );

    Ok(Json(CalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        tax_year: inputs.tax_year,
        result,
        audit_trace,
    }))
}

/// Handler for POST /analysis/income-sweep endpoint.
async fn income_sweep_handler(
    State(state): State<AppState>,
    payload: Result<Json<IncomeSweepRequest>, JsonRejection>,
) -> ApiResult<IncomeSweepResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing income sweep request");

    let request = extract(payload, correlation_id)?;
    let start_time = Instant::now();
    let response =
        run_income_sweep(request, state.config()).map_err(|err| failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        points = response.points.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Income sweep completed successfully"
    );
    Ok(Json(response))
}

/// Handler for POST /analysis/pension-savings endpoint.
async fn pension_savings_handler(
    State(state): State<AppState>,
    payload: Result<Json<PensionSavingsRequest>, JsonRejection>,
) -> ApiResult<PensionSavingsResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pension savings request");

    let request = extract(payload, correlation_id)?;
    let start_time = Instant::now();
    let response = run_pension_savings(request, state.config())
        .map_err(|err| failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        steps = response.points.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Pension savings analysis completed successfully"
    );
    Ok(Json(response))
}

/// Handler for POST /analysis/first-homes endpoint.
async fn first_homes_handler(
    State(state): State<AppState>,
    payload: Result<Json<FirstHomesRequest>, JsonRejection>,
) -> ApiResult<FirstHomesResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing first homes request");

    let request = extract(payload, correlation_id)?;
    let start_time = Instant::now();
    let response =
        run_first_homes(request, state.config()).map_err(|err| failure(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        equivalent_gross_income = %response.equivalent_gross_income,
        duration_us = start_time.elapsed().as_micros(),
        "First homes analysis completed successfully"
    );
    Ok(Json(response))
}

fn run_income_sweep(
    request: IncomeSweepRequest,
    config: &ConfigLoader,
) -> EngineResult<IncomeSweepResponse> {
    let points = validate_point_count("points", request.points)?;
    let max_gross_income = money("max_gross_income", request.max_gross_income)?;
    let inputs = TaxInputs::try_from(request.inputs)?;

    Ok(IncomeSweepResponse {
        points: income_sweep(&inputs, config, max_gross_income, points)?,
        tax_year: inputs.tax_year,
    })
}

fn run_pension_savings(
    request: PensionSavingsRequest,
    config: &ConfigLoader,
) -> EngineResult<PensionSavingsResponse> {
    let steps = validate_point_count("steps", request.steps)?;
    let inputs = TaxInputs::try_from(request.inputs)?;

    Ok(PensionSavingsResponse {
        points: pension_savings(&inputs, config, steps)?,
        tax_year: inputs.tax_year,
    })
}

fn run_first_homes(
    request: FirstHomesRequest,
    config: &ConfigLoader,
) -> EngineResult<FirstHomesResponse> {
    let points = validate_point_count("points", request.points)?;
    let max_gross_income = money("max_gross_income", request.max_gross_income)?;
    let inputs = TaxInputs::try_from(request.inputs)?;

    Ok(FirstHomesResponse {
        equivalent_gross_income: first_homes_equivalent_income(&inputs, config, request.region)?,
        points: first_homes_chart(&inputs, config, request.region, max_gross_income, points)?,
    })
}

/// Handler for GET /tax-years endpoint.
async fn tax_years_handler(State(state): State<AppState>) -> Json<TaxYearsResponse> {
    let config = state.config();
    Json(TaxYearsResponse {
        tax_years: config.tax_years().into_iter().map(String::from).collect(),
        latest: config.latest_tax_year().map(String::from),
    })
}

/// Unwraps a JSON body or converts the rejection into an API error.
fn extract<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(ApiErrorResponse::bad_request(error))
}

fn failure(correlation_id: Uuid, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    err.into()
}

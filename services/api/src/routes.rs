use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use patent_valuation::error::AppError;
use patent_valuation::form::{lenient_f64, lenient_f64_list};
use patent_valuation::portfolio::{portfolio_router, PortfolioRepository, PortfolioService};
use patent_valuation::scoring::{score_patent, BibliographicIndicators, ScoreResult};
use patent_valuation::valuation::{
    cost_approach, dcf, market_approach, quality_score_multi_impact, quality_score_weighted,
    real_options, reference_benchmarks, reference_weights, rnpv, Benchmark, CostValuation,
    DcfValuation, DepreciationInputs, MarketAdjustments, MarketValuation, MultiImpactScore,
    OptionParameters, QualityWeights, RealOptionValuation, RnpvValuation, Scenario,
    WeightedQualityScore,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

fn neutral() -> f64 {
    1.0
}

fn default_alpha() -> f64 {
    QualityWeights::default().alpha
}

fn default_beta() -> f64 {
    QualityWeights::default().beta
}

fn default_gamma() -> f64 {
    QualityWeights::default().gamma
}

/// A single form value; text that does not start with a number reads as 0.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct FormNumber(#[serde(deserialize_with = "lenient_f64")] pub(crate) f64);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DcfRequest {
    #[serde(default, deserialize_with = "lenient_f64_list")]
    pub(crate) cash_flows: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) discount_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScenarioInput {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) cash_flow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) probability: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RnpvRequest {
    #[serde(default)]
    pub(crate) scenarios: Vec<ScenarioInput>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) discount_rate: f64,
}

impl RnpvRequest {
    fn scenarios(&self) -> Vec<Scenario> {
        self.scenarios
            .iter()
            .map(|input| Scenario::new(input.cash_flow, input.probability))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RealOptionsRequest {
    #[serde(rename = "S", default, deserialize_with = "lenient_f64")]
    pub(crate) underlying_value: f64,
    #[serde(rename = "K", default, deserialize_with = "lenient_f64")]
    pub(crate) exercise_cost: f64,
    #[serde(rename = "T", default, deserialize_with = "lenient_f64")]
    pub(crate) years_to_expiry: f64,
    #[serde(rename = "r", default, deserialize_with = "lenient_f64")]
    pub(crate) risk_free_rate: f64,
    #[serde(rename = "sigma", default, deserialize_with = "lenient_f64")]
    pub(crate) volatility: f64,
}

impl From<RealOptionsRequest> for OptionParameters {
    fn from(request: RealOptionsRequest) -> Self {
        OptionParameters {
            underlying_value: request.underlying_value,
            exercise_cost: request.exercise_cost,
            years_to_expiry: request.years_to_expiry,
            risk_free_rate: request.risk_free_rate,
            volatility: request.volatility,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CostRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) reproduction_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) physical_depreciation: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) functional_depreciation: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) economic_depreciation: f64,
}

impl From<CostRequest> for DepreciationInputs {
    fn from(request: CostRequest) -> Self {
        DepreciationInputs {
            reproduction_cost: request.reproduction_cost,
            physical: request.physical_depreciation,
            functional: request.functional_depreciation,
            economic: request.economic_depreciation,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarketRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) comparable_price: f64,
    #[serde(default = "neutral", deserialize_with = "lenient_f64")]
    pub(crate) territory_adjustment: f64,
    #[serde(default = "neutral", deserialize_with = "lenient_f64")]
    pub(crate) life_adjustment: f64,
    #[serde(default = "neutral", deserialize_with = "lenient_f64")]
    pub(crate) technology_adjustment: f64,
    #[serde(default = "neutral", deserialize_with = "lenient_f64")]
    pub(crate) revenue_adjustment: f64,
}

impl MarketRequest {
    fn adjustments(&self) -> MarketAdjustments {
        MarketAdjustments {
            territory: self.territory_adjustment,
            life: self.life_adjustment,
            technology: self.technology_adjustment,
            revenue: self.revenue_adjustment,
        }
    }
}

/// Benchmarks and weights fall back to the reference set when omitted.
#[derive(Debug, Deserialize)]
pub(crate) struct WeightedQualityRequest {
    #[serde(default)]
    pub(crate) indicators: BTreeMap<String, FormNumber>,
    #[serde(default)]
    pub(crate) benchmarks: Option<BTreeMap<String, Benchmark>>,
    #[serde(default)]
    pub(crate) weights: Option<BTreeMap<String, FormNumber>>,
}

fn plain_values(values: BTreeMap<String, FormNumber>) -> BTreeMap<String, f64> {
    values
        .into_iter()
        .map(|(key, FormNumber(value))| (key, value))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MultiImpactRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) market_impact: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) technology_impact: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub(crate) assignee_impact: f64,
    #[serde(default = "default_alpha", deserialize_with = "lenient_f64")]
    pub(crate) alpha: f64,
    #[serde(default = "default_beta", deserialize_with = "lenient_f64")]
    pub(crate) beta: f64,
    #[serde(default = "default_gamma", deserialize_with = "lenient_f64")]
    pub(crate) gamma: f64,
}

/// Stateless calculator endpoints.
pub(crate) fn valuation_routes() -> Router {
    Router::new()
        .route("/api/v1/valuations/dcf", post(dcf_endpoint))
        .route("/api/v1/valuations/rnpv", post(rnpv_endpoint))
        .route("/api/v1/valuations/real-options", post(real_options_endpoint))
        .route("/api/v1/valuations/cost", post(cost_endpoint))
        .route("/api/v1/valuations/market", post(market_endpoint))
        .route(
            "/api/v1/valuations/quality/weighted",
            post(weighted_quality_endpoint),
        )
        .route(
            "/api/v1/valuations/quality/multi-impact",
            post(multi_impact_endpoint),
        )
        .route("/api/v1/scoring", post(scoring_endpoint))
}

pub(crate) fn with_portfolio_routes<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: PortfolioRepository + 'static,
{
    portfolio_router(service)
        .merge(valuation_routes())
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dcf_endpoint(
    Json(request): Json<DcfRequest>,
) -> Result<Json<DcfValuation>, AppError> {
    Ok(Json(dcf(&request.cash_flows, request.discount_rate)?))
}

pub(crate) async fn rnpv_endpoint(
    Json(request): Json<RnpvRequest>,
) -> Result<Json<RnpvValuation>, AppError> {
    Ok(Json(rnpv(&request.scenarios(), request.discount_rate)?))
}

pub(crate) async fn real_options_endpoint(
    Json(request): Json<RealOptionsRequest>,
) -> Result<Json<RealOptionValuation>, AppError> {
    Ok(Json(real_options(&OptionParameters::from(request))?))
}

pub(crate) async fn cost_endpoint(Json(request): Json<CostRequest>) -> Json<CostValuation> {
    Json(cost_approach(&DepreciationInputs::from(request)))
}

pub(crate) async fn market_endpoint(Json(request): Json<MarketRequest>) -> Json<MarketValuation> {
    Json(market_approach(
        request.comparable_price,
        &request.adjustments(),
    ))
}

pub(crate) async fn weighted_quality_endpoint(
    Json(request): Json<WeightedQualityRequest>,
) -> Json<WeightedQualityScore> {
    let benchmarks = request.benchmarks.unwrap_or_else(reference_benchmarks);
    let weights = request
        .weights
        .map(plain_values)
        .unwrap_or_else(reference_weights);

    Json(quality_score_weighted(
        &plain_values(request.indicators),
        &benchmarks,
        &weights,
    ))
}

pub(crate) async fn multi_impact_endpoint(
    Json(request): Json<MultiImpactRequest>,
) -> Result<Json<MultiImpactScore>, AppError> {
    let weights = QualityWeights {
        alpha: request.alpha,
        beta: request.beta,
        gamma: request.gamma,
    };
    Ok(Json(quality_score_multi_impact(
        request.market_impact,
        request.technology_impact,
        request.assignee_impact,
        &weights,
    )?))
}

pub(crate) async fn scoring_endpoint(
    Json(indicators): Json<BibliographicIndicators>,
) -> Json<ScoreResult> {
    Json(score_patent(&indicators))
}

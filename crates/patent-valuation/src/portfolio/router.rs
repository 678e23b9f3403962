use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NewWorkstream, PatentDetail, PatentDraft, PatentId, VaultFilter};
use super::repository::{PortfolioRepository, RepositoryError};
use super::service::{PortfolioService, PortfolioServiceError};
use crate::scoring::BibliographicIndicators;

const DEFAULT_FEED_LIMIT: usize = 20;

/// Router builder exposing the patent vault, workstreams, and intelligence feed.
pub fn portfolio_router<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: PortfolioRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/patents",
            post(register_handler::<R>).get(vault_handler::<R>),
        )
        .route("/api/v1/patents/:patent_id", get(patent_handler::<R>))
        .route(
            "/api/v1/patents/:patent_id/indicators",
            put(rescore_handler::<R>),
        )
        .route("/api/v1/portfolio/metrics", get(metrics_handler::<R>))
        .route(
            "/api/v1/workstreams",
            get(workstreams_handler::<R>).post(add_workstream_handler::<R>),
        )
        .route("/api/v1/intelligence", get(intelligence_handler::<R>))
        .with_state(service)
}

fn error_response(error: PortfolioServiceError) -> Response {
    let status = match &error {
        PortfolioServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PortfolioServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PortfolioServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Json(draft): Json<PatentDraft>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.register(draft) {
        Ok(patent) => (StatusCode::CREATED, Json(patent)).into_response(),
        Err(PortfolioServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "a patent with this number already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn vault_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Query(filter): Query<VaultFilter>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.vault(&filter) {
        Ok(patents) => (StatusCode::OK, Json(patents)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn patent_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(patent_id): Path<u64>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.get(PatentId(patent_id)) {
        Ok(patent) => (StatusCode::OK, Json(PatentDetail::from(patent))).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn rescore_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(patent_id): Path<u64>,
    Json(indicators): Json<BibliographicIndicators>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.rescore(PatentId(patent_id), indicators) {
        Ok(patent) => (StatusCode::OK, Json(patent)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn metrics_handler<R>(State(service): State<Arc<PortfolioService<R>>>) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.metrics() {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn workstreams_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.workstreams() {
        Ok(workstreams) => (StatusCode::OK, Json(workstreams)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn add_workstream_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Json(workstream): Json<NewWorkstream>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.add_workstream(workstream) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(other) => error_response(other),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeedQuery {
    #[serde(default)]
    limit: Option<usize>,
}

pub(crate) async fn intelligence_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Query(query): Query<FeedQuery>,
) -> Response
where
    R: PortfolioRepository + 'static,
{
    match service.intelligence(query.limit.unwrap_or(DEFAULT_FEED_LIMIT)) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(other) => error_response(other),
    }
}

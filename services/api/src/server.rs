use crate::cli::ServeArgs;
use crate::infra::{sample_portfolio, AppState, InMemoryPortfolioRepository};
use crate::routes::with_portfolio_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use patent_valuation::config::AppConfig;
use patent_valuation::error::AppError;
use patent_valuation::portfolio::PortfolioService;
use patent_valuation::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPortfolioRepository::default());
    let portfolio_service = Arc::new(PortfolioService::new(repository));
    if config.portfolio.seed_data {
        portfolio_service.seed(sample_portfolio())?;
    }

    let app = with_portfolio_routes(portfolio_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "patent valuation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

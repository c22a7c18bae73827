use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryGrantLedger, InMemoryHistoryStore};
use crate::routes::with_award_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use club_awards::awards::AwardEngine;
use club_awards::config::AppConfig;
use club_awards::error::AppError;
use club_awards::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let history = Arc::new(InMemoryHistoryStore::default());
    let ledger = Arc::new(InMemoryGrantLedger::default());
    let engine = Arc::new(
        AwardEngine::new(history, ledger).with_active_window(config.sweep.active_window_days),
    );

    let app = with_award_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "award engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

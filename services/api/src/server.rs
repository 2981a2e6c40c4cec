use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use school_outcomes::config::AppConfig;
use school_outcomes::dashboard::DashboardState;
use school_outcomes::error::AppError;
use school_outcomes::pipeline::{PreparedDatasets, SchoolKind};
use school_outcomes::telemetry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let datasets = PreparedDatasets::prepare(&config.data)?;
    for kind in SchoolKind::ordered() {
        info!(dataset = %kind, regions = datasets.joined(kind).len(), "joined dataset ready");
    }
    let dashboard = DashboardState::new(Arc::new(datasets), config.dashboard.default_limit);

    let app = with_service_routes(dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "school outcomes dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{seeded_stores, AppState, InMemoryApplicationRepository, InMemoryDirectory};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement_core::config::AppConfig;
use placement_core::error::AppError;
use placement_core::placement::PlacementService;
use placement_core::telemetry;
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

    let (repository, directory) = if config.placement.seed_demo_data {
        seeded_stores()?
    } else {
        (
            InMemoryApplicationRepository::default(),
            InMemoryDirectory::default(),
        )
    };
    let service = Arc::new(PlacementService::new(
        Arc::new(repository),
        Arc::new(directory),
    ));

    let app = with_placement_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = config.placement.seed_demo_data,
        "placement pipeline ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

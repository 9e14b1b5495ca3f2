use crate::cli::ServeArgs;
use crate::infra::{service_with_store, AppState, InMemorySessionStore};
use crate::routes::with_quiz_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use readiness_quiz::config::AppConfig;
use readiness_quiz::error::AppError;
use readiness_quiz::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

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

    let store = InMemorySessionStore::new(config.quiz.session_ttl());
    spawn_idle_sweep(store.clone());
    let quiz_service = service_with_store(store, config.quiz.clone());

    let app = with_quiz_routes(quiz_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        denominator = config.quiz.score_denominator.label(),
        "readiness quiz service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_idle_sweep(store: InMemorySessionStore) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = store.evict_idle(Instant::now()) {
                warn!(error = %err, "idle session sweep failed");
            }
        }
    });
}

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryApplicantRepository, InMemoryJobDirectory, InMemoryScheduleRepository,
    KeywordCvExtractor,
};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::telemetry;
use hireflow::workflows::recruitment::{HeuristicScorer, RecruitmentService, VerdictPolicy};
use std::sync::Arc;
use std::sync::atomic::Ordering;
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

    let policy = if config.screening.weighted_verdicts {
        VerdictPolicy::WeightedPoints
    } else {
        VerdictPolicy::BucketBased
    };

    let service = Arc::new(RecruitmentService::new(
        Arc::new(InMemoryJobDirectory::seeded()),
        Arc::new(InMemoryApplicantRepository::default()),
        Arc::new(InMemoryScheduleRepository::default()),
        Arc::new(HeuristicScorer),
        Arc::new(KeywordCvExtractor),
        policy,
    ));

    let app = with_recruitment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

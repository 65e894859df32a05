use crate::cli::ServeArgs;
use crate::infra::{
    spawn_settlement_worker, AppState, ChannelSettlementScheduler, InMemoryStore,
    LoggingEventPublisher,
};
use crate::routes::with_engine_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use collabnet::config::AppConfig;
use collabnet::error::AppError;
use collabnet::matching::{CompatibilityScorer, MatchingState, ReputationLedger};
use collabnet::partnerships::{AnalyticsAggregator, PartnershipService, PartnershipState};
use collabnet::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
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

    let store = Arc::new(InMemoryStore::default());
    let events = Arc::new(LoggingEventPublisher);
    let (settlement_tx, settlement_rx) = mpsc::unbounded_channel();
    let scheduler = Arc::new(ChannelSettlementScheduler::new(settlement_tx));

    let service = Arc::new(PartnershipService::new(
        store.clone(),
        events.clone(),
        scheduler,
        &config.engine,
    ));
    spawn_settlement_worker(service.clone(), settlement_rx);

    let matching = Arc::new(MatchingState {
        profiles: store.clone(),
        ledger: Arc::new(ReputationLedger::new(store.clone(), events.clone())),
        scorer: CompatibilityScorer::new(),
    });
    let partnerships = Arc::new(PartnershipState {
        service,
        analytics: Arc::new(AnalyticsAggregator::new(store)),
    });

    let app = with_engine_routes(matching, partnerships)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "partnership lifecycle engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

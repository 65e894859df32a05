use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use collabnet::events::EventPublisher;
use collabnet::matching::{matching_router, MatchingState};
use collabnet::partnerships::{partnership_router, PartnershipState, SettlementScheduler};
use collabnet::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_engine_routes<R, E, S>(
    matching: Arc<MatchingState<R, E>>,
    partnerships: Arc<PartnershipState<R, E, S>>,
) -> axum::Router
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    matching_router(matching)
        .merge(partnership_router(partnerships))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

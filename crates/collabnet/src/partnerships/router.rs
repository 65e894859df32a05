use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::events::EventPublisher;
use crate::matching::profile::CollaboratorId;
use crate::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
};

use super::analytics::AnalyticsAggregator;
use super::domain::{
    Campaign, ContractParty, ContractSpec, DeliverableId, DeliverableSubmission, MetricsUpdate,
    PartnershipId, ProposalContent, ProposalDecision,
};
use super::service::PartnershipService;
use super::settlement::SettlementScheduler;

/// Shared state behind the partnership endpoints.
pub struct PartnershipState<R, E, S> {
    pub service: Arc<PartnershipService<R, E, S>>,
    pub analytics: Arc<AnalyticsAggregator<R>>,
}

#[derive(Debug, Deserialize)]
pub struct PartnershipRequest {
    pub initiator_id: CollaboratorId,
    pub counterparty_id: CollaboratorId,
    pub campaign: Campaign,
    pub contract: ContractSpec,
}

#[derive(Debug, Deserialize)]
pub struct ProposalResponseRequest {
    #[serde(flatten)]
    pub decision: ProposalDecision,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub party: ContractParty,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_window_days() -> i64 {
    30
}

/// Router builder exposing the partnership lifecycle and read-side
/// analytics.
pub fn partnership_router<R, E, S>(state: Arc<PartnershipState<R, E, S>>) -> Router
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    Router::new()
        .route("/api/v1/partnerships", post(create_handler::<R, E, S>))
        .route(
            "/api/v1/partnerships/:partnership_id",
            get(get_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/proposal",
            post(proposal_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/proposal/response",
            post(response_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/contract",
            get(contract_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/contract/sign",
            post(sign_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/deliverables",
            post(submit_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/deliverables/:deliverable_id/approve",
            post(approve_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/metrics",
            post(metrics_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/payment",
            post(payment_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/payment/fail",
            post(fail_payment_handler::<R, E, S>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id/cancel",
            post(cancel_handler::<R, E, S>),
        )
        .route(
            "/api/v1/collaborators/:collaborator_id/partnerships/active",
            get(active_handler::<R, E, S>),
        )
        .route(
            "/api/v1/collaborators/:collaborator_id/analytics",
            get(analytics_handler::<R, E, S>),
        )
        .with_state(state)
}

macro_rules! respond {
    ($status:expr, $result:expr) => {
        match $result {
            Ok(value) => ($status, axum::Json(value)).into_response(),
            Err(err) => AppError::from(err).into_response(),
        }
    };
}

pub(crate) async fn create_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    axum::Json(request): axum::Json<PartnershipRequest>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    respond!(
        StatusCode::CREATED,
        state.service.create_partnership(
            request.initiator_id,
            request.counterparty_id,
            request.campaign,
            request.contract,
        )
    )
}

pub(crate) async fn get_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::OK, state.service.get(&id))
}

pub(crate) async fn proposal_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(content): axum::Json<ProposalContent>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::ACCEPTED, state.service.send_proposal(&id, content))
}

pub(crate) async fn response_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(request): axum::Json<ProposalResponseRequest>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(
        StatusCode::OK,
        state
            .service
            .respond_to_proposal(&id, request.decision, request.message)
    )
}

pub(crate) async fn contract_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::OK, state.service.get_contract(&id))
}

pub(crate) async fn sign_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(request): axum::Json<SignRequest>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::OK, state.service.sign_contract(&id, request.party))
}

pub(crate) async fn submit_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(submission): axum::Json<DeliverableSubmission>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(
        StatusCode::CREATED,
        state.service.submit_deliverable(&id, submission)
    )
}

pub(crate) async fn approve_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path((partnership_id, deliverable_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ApprovalRequest>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    let deliverable = DeliverableId(deliverable_id);
    respond!(
        StatusCode::OK,
        state
            .service
            .approve_deliverable(&id, &deliverable, request.feedback)
    )
}

pub(crate) async fn metrics_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(update): axum::Json<MetricsUpdate>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(
        StatusCode::OK,
        state.service.record_campaign_metrics(&id, update)
    )
}

pub(crate) async fn payment_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::ACCEPTED, state.service.process_payment(&id))
}

pub(crate) async fn fail_payment_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(StatusCode::OK, state.service.fail_payment(&id))
}

#[derive(Debug, Deserialize)]
pub struct CancellationRequest {
    pub reason: String,
}

pub(crate) async fn cancel_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(partnership_id): Path<String>,
    axum::Json(request): axum::Json<CancellationRequest>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = PartnershipId(partnership_id);
    respond!(
        StatusCode::OK,
        state.service.cancel_partnership(&id, request.reason)
    )
}

pub(crate) async fn active_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(collaborator_id): Path<String>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = CollaboratorId(collaborator_id);
    respond!(StatusCode::OK, state.service.active_partnerships(&id))
}

pub(crate) async fn analytics_handler<R, E, S>(
    State(state): State<Arc<PartnershipState<R, E, S>>>,
    Path(collaborator_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Response
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    let id = CollaboratorId(collaborator_id);
    let window = Duration::days(query.window_days.max(1));
    respond!(
        StatusCode::OK,
        state.analytics.aggregate(&id, window, Utc::now())
    )
}

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::events::EventPublisher;
use crate::repository::{ProfileRepository, RepositoryError};

use super::profile::{
    Availability, CollaborationPreferences, CollaboratorId, CollaboratorProfile, ExperienceLevel,
};
use super::reputation::{ReputationAction, ReputationLedger};
use super::scorer::CompatibilityScorer;

/// Shared state behind the matching endpoints.
pub struct MatchingState<P, E> {
    pub profiles: Arc<P>,
    pub ledger: Arc<ReputationLedger<P, E>>,
    pub scorer: CompatibilityScorer,
}

static COLLABORATOR_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_collaborator_id() -> CollaboratorId {
    let id = COLLABORATOR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CollaboratorId(format!("col-{id:06}"))
}

/// Registration payload. Reputation and partnership counters always start
/// at zero.
#[derive(Debug, Deserialize)]
pub struct CollaboratorRegistration {
    pub display_name: String,
    pub location: String,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    pub experience: ExperienceLevel,
    pub availability: Availability,
    #[serde(default)]
    pub preferences: CollaborationPreferences,
}

#[derive(Debug, Deserialize)]
pub struct ReputationAdjustment {
    pub action: ReputationAction,
    #[serde(default)]
    pub points: Option<u64>,
}

/// Router builder exposing profile registration, reputation, and
/// compatibility scoring.
pub fn matching_router<P, E>(state: Arc<MatchingState<P, E>>) -> Router
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    Router::new()
        .route("/api/v1/collaborators", post(register_handler::<P, E>))
        .route(
            "/api/v1/collaborators/:collaborator_id",
            get(profile_handler::<P, E>),
        )
        .route(
            "/api/v1/collaborators/:collaborator_id/reputation",
            post(reputation_handler::<P, E>),
        )
        .route(
            "/api/v1/match/score/:first_id/:second_id",
            get(score_handler::<P, E>),
        )
        .with_state(state)
}

pub(crate) async fn register_handler<P, E>(
    State(state): State<Arc<MatchingState<P, E>>>,
    axum::Json(registration): axum::Json<CollaboratorRegistration>,
) -> Response
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    let profile = CollaboratorProfile {
        id: next_collaborator_id(),
        display_name: registration.display_name,
        location: registration.location,
        genres: registration.genres,
        skills: registration.skills,
        experience: registration.experience,
        availability: registration.availability,
        preferences: registration.preferences,
        reputation: 0,
        completed_partnerships: 0,
        active: true,
        created_at: Utc::now(),
    };

    match state.profiles.insert(profile.clone()) {
        Ok(()) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(RepositoryError::Conflict) => {
            let payload = json!({ "error": "collaborator already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn profile_handler<P, E>(
    State(state): State<Arc<MatchingState<P, E>>>,
    Path(collaborator_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    let id = CollaboratorId(collaborator_id);
    match state.profiles.fetch(&id) {
        Ok(Some(profile)) => {
            let achievements = state.ledger.achievements(&id);
            let payload = json!({
                "profile": profile,
                "achievements": achievements,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({ "error": format!("collaborator {} not found", id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reputation_handler<P, E>(
    State(state): State<Arc<MatchingState<P, E>>>,
    Path(collaborator_id): Path<String>,
    axum::Json(adjustment): axum::Json<ReputationAdjustment>,
) -> Response
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    let id = CollaboratorId(collaborator_id);
    // Adjustments are best-effort; an unknown id reads back as null rather
    // than failing the caller.
    let reputation = state.ledger.adjust(&id, adjustment.action, adjustment.points);
    let payload = json!({
        "collaborator_id": id.0,
        "reputation": reputation,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn score_handler<P, E>(
    State(state): State<Arc<MatchingState<P, E>>>,
    Path((first_id, second_id)): Path<(String, String)>,
) -> Response
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    let first = CollaboratorId(first_id);
    let second = CollaboratorId(second_id);

    let fetch = |id: &CollaboratorId| state.profiles.fetch(id);
    match (fetch(&first), fetch(&second)) {
        (Ok(Some(a)), Ok(Some(b))) => {
            let result = state.scorer.score(&a, &b);
            (StatusCode::OK, axum::Json(result)).into_response()
        }
        (Ok(None), _) => {
            let payload = json!({ "error": format!("collaborator {} not found", first.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        (_, Ok(None)) => {
            let payload = json!({ "error": format!("collaborator {} not found", second.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        (Err(err), _) | (_, Err(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

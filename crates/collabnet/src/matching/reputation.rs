use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::{EngineEvent, EventPublisher};
use crate::matching::profile::CollaboratorId;
use crate::repository::ProfileRepository;

/// Actions that move a collaborator's reputation, with their default deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationAction {
    ProjectCompleted,
    PositiveReview,
    CollaborationStarted,
    GroupContribution,
    NegativeReview,
    ProjectAbandoned,
}

impl ReputationAction {
    pub const fn default_delta(self) -> i64 {
        match self {
            Self::ProjectCompleted => 50,
            Self::PositiveReview => 25,
            Self::CollaborationStarted => 10,
            Self::GroupContribution => 5,
            Self::NegativeReview => -25,
            Self::ProjectAbandoned => -30,
        }
    }

    /// Whether an override should count against the score.
    const fn is_penalty(self) -> bool {
        matches!(self, Self::NegativeReview | Self::ProjectAbandoned)
    }
}

/// A one-time badge awarded on an ascending reputation crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub threshold: u64,
    pub badge: &'static str,
    pub title: &'static str,
}

const MILESTONES: [Milestone; 5] = [
    Milestone {
        threshold: 100,
        badge: "newcomer",
        title: "Platform Newcomer",
    },
    Milestone {
        threshold: 500,
        badge: "collaborator",
        title: "Active Collaborator",
    },
    Milestone {
        threshold: 1000,
        badge: "veteran",
        title: "Platform Veteran",
    },
    Milestone {
        threshold: 2000,
        badge: "expert",
        title: "Collaboration Expert",
    },
    Milestone {
        threshold: 5000,
        badge: "legend",
        title: "Platform Legend",
    },
];

pub fn milestones() -> &'static [Milestone] {
    &MILESTONES
}

/// Tracks reputation per collaborator and raises milestone achievements.
/// Adjustments are best-effort: unknown ids and storage hiccups are logged
/// no-ops so reputation never destabilizes an unrelated flow.
pub struct ReputationLedger<P, E> {
    profiles: Arc<P>,
    events: Arc<E>,
    unlocked: Mutex<HashMap<CollaboratorId, BTreeSet<&'static str>>>,
}

impl<P, E> ReputationLedger<P, E>
where
    P: ProfileRepository + 'static,
    E: EventPublisher + 'static,
{
    pub fn new(profiles: Arc<P>, events: Arc<E>) -> Self {
        Self {
            profiles,
            events,
            unlocked: Mutex::new(HashMap::new()),
        }
    }

    /// Apply an action (optionally overriding the default point value) and
    /// return the new score, or `None` when the collaborator is unknown.
    pub fn adjust(
        &self,
        id: &CollaboratorId,
        action: ReputationAction,
        override_points: Option<u64>,
    ) -> Option<u64> {
        let mut profile = match self.profiles.fetch(id) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(collaborator = %id.0, "reputation adjustment for unknown collaborator ignored");
                return None;
            }
            Err(err) => {
                warn!(collaborator = %id.0, error = %err, "reputation adjustment skipped");
                return None;
            }
        };

        let magnitude = override_points.unwrap_or_else(|| action.default_delta().unsigned_abs());
        let delta = if action.is_penalty() {
            -(magnitude as i64)
        } else {
            magnitude as i64
        };

        let old_score = profile.reputation;
        let new_score = (old_score as i64 + delta).max(0) as u64;
        profile.reputation = new_score;
        if action == ReputationAction::ProjectCompleted {
            profile.completed_partnerships += 1;
        }

        if let Err(err) = self.profiles.update(profile) {
            warn!(collaborator = %id.0, error = %err, "reputation update not persisted");
            return None;
        }

        self.check_milestones(id, old_score, new_score);
        Some(new_score)
    }

    /// Record ascending threshold crossings, at most once per badge.
    fn check_milestones(&self, id: &CollaboratorId, old_score: u64, new_score: u64) {
        for milestone in &MILESTONES {
            if new_score < milestone.threshold || old_score >= milestone.threshold {
                continue;
            }

            let newly_unlocked = {
                let mut unlocked = self.unlocked.lock().expect("achievement table poisoned");
                unlocked
                    .entry(id.clone())
                    .or_default()
                    .insert(milestone.badge)
            };
            if !newly_unlocked {
                continue;
            }

            if let Err(err) = self.events.publish(EngineEvent::AchievementUnlocked {
                collaborator_id: id.clone(),
                badge: milestone.badge,
                title: milestone.title,
                reputation: new_score,
            }) {
                warn!(collaborator = %id.0, badge = milestone.badge, error = %err, "achievement event dropped");
            }
        }
    }

    /// Badges unlocked so far for a collaborator, in threshold order.
    pub fn achievements(&self, id: &CollaboratorId) -> Vec<&'static str> {
        let unlocked = self.unlocked.lock().expect("achievement table poisoned");
        let earned = match unlocked.get(id) {
            Some(earned) => earned,
            None => return Vec::new(),
        };
        MILESTONES
            .iter()
            .filter(|milestone| earned.contains(milestone.badge))
            .map(|milestone| milestone.badge)
            .collect()
    }
}

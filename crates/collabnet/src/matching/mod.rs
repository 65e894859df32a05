//! Collaborator matching: profiles, the weighted compatibility scorer, and
//! the reputation ledger with its milestone achievements.

pub mod profile;
pub mod reputation;
pub mod router;
pub mod scorer;

pub use profile::{
    Availability, CollaborationPreferences, CollaboratorId, CollaboratorProfile, ExperienceLevel,
};
pub use reputation::{milestones, Milestone, ReputationAction, ReputationLedger};
pub use router::{matching_router, MatchingState};
pub use scorer::{
    CollaborationHistory, CompatibilityResult, CompatibilityScorer, FactorScore, MatchFactor,
    NoSharedHistory, RecommendationTier, ScoringWeights,
};

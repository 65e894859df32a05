mod factors;

use serde::Serialize;

use super::profile::{CollaboratorId, CollaboratorProfile};

/// Named sub-factors contributing to a compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    GenreOverlap,
    SkillComplementarity,
    ExperienceAlignment,
    Location,
    Availability,
    CollaborationHistory,
    Reputation,
    PreferenceAlignment,
}

impl MatchFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GenreOverlap => "genre overlap",
            Self::SkillComplementarity => "skill complementarity",
            Self::ExperienceAlignment => "experience alignment",
            Self::Location => "location",
            Self::Availability => "availability",
            Self::CollaborationHistory => "collaboration history",
            Self::Reputation => "reputation",
            Self::PreferenceAlignment => "preference alignment",
        }
    }
}

/// Discrete contribution to a compatibility result, for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub factor: MatchFactor,
    pub score: f32,
    pub weight: f32,
}

/// Coarse recommendation band derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl RecommendationTier {
    pub(crate) fn for_score(total: u8) -> Self {
        match total {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

/// Fixed factor weights. The defaults sum to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub genre_overlap: f32,
    pub skill_complementarity: f32,
    pub experience_alignment: f32,
    pub location: f32,
    pub availability: f32,
    pub collaboration_history: f32,
    pub reputation: f32,
    pub preference_alignment: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            genre_overlap: 0.25,
            skill_complementarity: 0.20,
            experience_alignment: 0.15,
            location: 0.10,
            availability: 0.10,
            collaboration_history: 0.05,
            reputation: 0.10,
            preference_alignment: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f32 {
        self.genre_overlap
            + self.skill_complementarity
            + self.experience_alignment
            + self.location
            + self.availability
            + self.collaboration_history
            + self.reputation
            + self.preference_alignment
    }

    fn for_factor(&self, factor: MatchFactor) -> f32 {
        match factor {
            MatchFactor::GenreOverlap => self.genre_overlap,
            MatchFactor::SkillComplementarity => self.skill_complementarity,
            MatchFactor::ExperienceAlignment => self.experience_alignment,
            MatchFactor::Location => self.location,
            MatchFactor::Availability => self.availability,
            MatchFactor::CollaborationHistory => self.collaboration_history,
            MatchFactor::Reputation => self.reputation,
            MatchFactor::PreferenceAlignment => self.preference_alignment,
        }
    }
}

/// Source of the pairwise collaboration-history bonus. The default
/// implementation knows of no shared history.
pub trait CollaborationHistory: Send + Sync {
    fn history_bonus(&self, a: &CollaboratorId, b: &CollaboratorId) -> f32;
}

/// No prior-collaboration store wired in; every pair scores zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSharedHistory;

impl CollaborationHistory for NoSharedHistory {
    fn history_bonus(&self, _a: &CollaboratorId, _b: &CollaboratorId) -> f32 {
        0.0
    }
}

/// Scored result for a pair of profiles. Immutable once computed; callers may
/// cache it but the engine never persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityResult {
    pub total_score: u8,
    pub factors: Vec<FactorScore>,
    pub recommendation: RecommendationTier,
    pub strengths: Vec<MatchFactor>,
    pub improvements: Vec<MatchFactor>,
}

const STRENGTH_THRESHOLD: f32 = 70.0;
const IMPROVEMENT_THRESHOLD: f32 = 50.0;

/// Stateless pairwise scorer. Deterministic given the two profile snapshots;
/// reputation is read from the snapshots rather than looked up live.
pub struct CompatibilityScorer<H = NoSharedHistory> {
    weights: ScoringWeights,
    history: H,
}

impl Default for CompatibilityScorer<NoSharedHistory> {
    fn default() -> Self {
        Self::new()
    }
}

impl CompatibilityScorer<NoSharedHistory> {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
            history: NoSharedHistory,
        }
    }
}

impl<H: CollaborationHistory> CompatibilityScorer<H> {
    pub fn with_history(history: H) -> Self {
        Self {
            weights: ScoringWeights::default(),
            history,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, a: &CollaboratorProfile, b: &CollaboratorProfile) -> CompatibilityResult {
        let raw = [
            (
                MatchFactor::GenreOverlap,
                factors::genre_overlap(&a.genres, &b.genres),
            ),
            (
                MatchFactor::SkillComplementarity,
                factors::skill_complementarity(&a.skills, &b.skills),
            ),
            (
                MatchFactor::ExperienceAlignment,
                factors::experience_alignment(a.experience, b.experience),
            ),
            (
                MatchFactor::Location,
                factors::location_score(&a.location, &b.location),
            ),
            (
                MatchFactor::Availability,
                factors::availability_match(a.availability, b.availability),
            ),
            (
                MatchFactor::CollaborationHistory,
                self.history.history_bonus(&a.id, &b.id).clamp(0.0, 100.0),
            ),
            (
                MatchFactor::Reputation,
                factors::reputation_score(a.reputation, b.reputation),
            ),
            (
                MatchFactor::PreferenceAlignment,
                factors::preference_alignment(&a.preferences, &b.preferences),
            ),
        ];

        let mut factors = Vec::with_capacity(raw.len());
        let mut weighted_total = 0.0f32;
        for (factor, score) in raw {
            let weight = self.weights.for_factor(factor);
            weighted_total += score * weight;
            factors.push(FactorScore {
                factor,
                score,
                weight,
            });
        }

        let total_score = weighted_total.round().clamp(0.0, 100.0) as u8;

        let strengths = factors
            .iter()
            .filter(|entry| entry.score >= STRENGTH_THRESHOLD)
            .map(|entry| entry.factor)
            .collect();
        let improvements = factors
            .iter()
            .filter(|entry| entry.score < IMPROVEMENT_THRESHOLD)
            .map(|entry| entry.factor)
            .collect();

        CompatibilityResult {
            total_score,
            recommendation: RecommendationTier::for_score(total_score),
            factors,
            strengths,
            improvements,
        }
    }
}

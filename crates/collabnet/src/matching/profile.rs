use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollaboratorId(pub String);

/// Ordered career levels used for experience alignment scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Professional,
}

impl ExperienceLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Beginner,
            Self::Intermediate,
            Self::Advanced,
            Self::Professional,
        ]
    }

    pub(crate) fn index(self) -> i32 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Professional => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Professional => "professional",
        }
    }
}

/// How much time a collaborator can commit to joint work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    FullTime,
    PartTime,
    Occasional,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Occasional => "occasional",
        }
    }
}

/// Boolean collaboration preferences compared pairwise during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationPreferences {
    pub remote: bool,
    pub local: bool,
    pub paid: bool,
    pub equity: bool,
    pub credit: bool,
}

impl Default for CollaborationPreferences {
    fn default() -> Self {
        Self {
            remote: true,
            local: true,
            paid: false,
            equity: true,
            credit: true,
        }
    }
}

impl CollaborationPreferences {
    pub(crate) fn flags(&self) -> [bool; 5] {
        [self.remote, self.local, self.paid, self.equity, self.credit]
    }
}

/// A collaborator's matching profile. Reputation is mutated only through the
/// reputation ledger; profiles are deactivated rather than deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorProfile {
    pub id: CollaboratorId,
    pub display_name: String,
    pub location: String,
    pub genres: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub experience: ExperienceLevel,
    pub availability: Availability,
    pub preferences: CollaborationPreferences,
    pub reputation: u64,
    pub completed_partnerships: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CollaboratorProfile {
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

use std::collections::BTreeSet;

use super::super::profile::{Availability, CollaborationPreferences, ExperienceLevel};

/// Fallback used for distinct locations; the matcher is deliberately coarse
/// and performs no geodistance lookups.
const DEFAULT_LOCATION_SCORE: f32 = 50.0;

pub(crate) fn genre_overlap(genres_a: &BTreeSet<String>, genres_b: &BTreeSet<String>) -> f32 {
    let union = genres_a.union(genres_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = genres_a.intersection(genres_b).count();
    intersection as f32 / union as f32 * 100.0
}

pub(crate) fn skill_complementarity(skills_a: &BTreeSet<String>, skills_b: &BTreeSet<String>) -> f32 {
    let total = skills_a.len() + skills_b.len();
    if total == 0 {
        return 0.0;
    }
    let unique = skills_a.symmetric_difference(skills_b).count();
    unique as f32 / total as f32 * 100.0
}

pub(crate) fn experience_alignment(a: ExperienceLevel, b: ExperienceLevel) -> f32 {
    let gap = (a.index() - b.index()).abs() as f32;
    (100.0 - gap * 25.0).max(0.0)
}

pub(crate) fn location_score(a: &str, b: &str) -> f32 {
    if a == b {
        100.0
    } else {
        DEFAULT_LOCATION_SCORE
    }
}

pub(crate) fn availability_match(a: Availability, b: Availability) -> f32 {
    use Availability::{FullTime, Occasional, PartTime};
    match (a, b) {
        (FullTime, FullTime) | (PartTime, PartTime) | (Occasional, Occasional) => 100.0,
        (FullTime, PartTime) | (PartTime, FullTime) => 70.0,
        (FullTime, Occasional) | (Occasional, FullTime) => 30.0,
        (PartTime, Occasional) | (Occasional, PartTime) => 60.0,
    }
}

pub(crate) fn reputation_score(reputation_a: u64, reputation_b: u64) -> f32 {
    let average = (reputation_a + reputation_b) as f32 / 2.0;
    (average / 50.0).min(100.0)
}

pub(crate) fn preference_alignment(
    prefs_a: &CollaborationPreferences,
    prefs_b: &CollaborationPreferences,
) -> f32 {
    let flags_a = prefs_a.flags();
    let flags_b = prefs_b.flags();
    let matching = flags_a
        .iter()
        .zip(flags_b.iter())
        .filter(|(a, b)| a == b)
        .count();
    matching as f32 / flags_a.len() as f32 * 100.0
}

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::matching::profile::CollaboratorId;
use crate::partnerships::analytics::AnalyticsAggregator;
use crate::partnerships::domain::{PartnershipId, ProposalContent, ProposalDecision};
use crate::repository::PartnershipRepository;

use super::common::{campaign, contract_spec, fixed_compensation, harness, seed_profiles, submission, Harness};

fn activate(harness: &Harness, counterparty: &str, base: f64) -> PartnershipId {
    let partnership = harness
        .service
        .create_partnership(
            CollaboratorId("artist-1".to_string()),
            CollaboratorId(counterparty.to_string()),
            campaign(),
            contract_spec(1, fixed_compensation(base)),
        )
        .expect("create");
    harness
        .service
        .send_proposal(
            &partnership.id,
            ProposalContent {
                subject: "Collab?".to_string(),
                message: "Interested?".to_string(),
                deadline: None,
            },
        )
        .expect("send");
    harness
        .service
        .respond_to_proposal(&partnership.id, ProposalDecision::Accepted, "yes".to_string())
        .expect("accept");
    partnership.id
}

fn complete(harness: &Harness, id: &PartnershipId, platform: &str, reach: u64) {
    let deliverable = harness
        .service
        .submit_deliverable(id, submission(platform, reach))
        .expect("submit");
    harness
        .service
        .approve_deliverable(id, &deliverable.id, None)
        .expect("approve");
    harness.service.complete_payment(id).expect("complete");
}

#[test]
fn summary_rolls_up_statuses_spend_and_platforms() {
    let harness = harness();
    seed_profiles(
        &harness.store,
        &["artist-1", "creator-1", "creator-2", "creator-3"],
    );
    let initiator = CollaboratorId("artist-1".to_string());

    let done = activate(&harness, "creator-1", 750.0);
    complete(&harness, &done, "instagram", 10_000);

    let running = activate(&harness, "creator-2", 500.0);
    harness
        .service
        .submit_deliverable(&running, submission("tiktok", 5_000))
        .expect("submit");

    let dropped = activate(&harness, "creator-3", 300.0);
    harness
        .service
        .cancel_partnership(&dropped, "missed deadline".to_string())
        .expect("cancel");

    let aggregator = AnalyticsAggregator::new(harness.store.clone());
    let summary = aggregator
        .aggregate(&initiator, Duration::days(30), Utc::now())
        .expect("aggregate");

    assert_eq!(summary.partnerships.total, 3);
    assert_eq!(summary.partnerships.active, 1);
    assert_eq!(summary.partnerships.completed, 1);
    assert_eq!(summary.partnerships.cancelled, 1);

    assert_eq!(summary.performance.total_reach, 15_000);
    assert!((summary.performance.average_reach - 5_000.0).abs() < f64::EPSILON);

    // Only the settled payment counts as spend.
    assert_eq!(summary.financial.total_spent, 750.0);
    assert!((summary.financial.average_partnership_cost - 250.0).abs() < f64::EPSILON);
    assert!((summary.financial.cost_per_thousand_reach - 50.0).abs() < f64::EPSILON);

    assert_eq!(summary.platforms.len(), 2);
    let instagram = summary.platforms.get("instagram").expect("instagram stats");
    assert_eq!(instagram.count, 1);
    assert_eq!(instagram.reach, 10_000);
}

#[test]
fn partnerships_created_before_the_window_are_excluded() {
    let harness = harness();
    seed_profiles(&harness.store, &["artist-1", "creator-1", "creator-2"]);
    let initiator = CollaboratorId("artist-1".to_string());

    let old = activate(&harness, "creator-1", 400.0);
    let mut stale = PartnershipRepository::fetch(harness.store.as_ref(), &old)
        .expect("fetch")
        .expect("present");
    stale.created_at = Utc::now() - Duration::days(90);
    PartnershipRepository::update(harness.store.as_ref(), stale).expect("backdate");

    activate(&harness, "creator-2", 600.0);

    let aggregator = AnalyticsAggregator::new(harness.store.clone());
    let summary = aggregator
        .aggregate(&initiator, Duration::days(30), Utc::now())
        .expect("aggregate");
    assert_eq!(summary.partnerships.total, 1);
    assert_eq!(summary.partnerships.active, 1);
}

#[test]
fn empty_history_yields_a_zeroed_summary() {
    let harness = harness();
    seed_profiles(&harness.store, &["artist-1"]);

    let aggregator = AnalyticsAggregator::new(Arc::clone(&harness.store));
    let summary = aggregator
        .aggregate(
            &CollaboratorId("artist-1".to_string()),
            Duration::days(30),
            Utc::now(),
        )
        .expect("aggregate");

    assert_eq!(summary.partnerships.total, 0);
    assert_eq!(summary.financial.total_spent, 0.0);
    assert_eq!(summary.financial.cost_per_thousand_reach, 0.0);
    assert!(summary.platforms.is_empty());
}

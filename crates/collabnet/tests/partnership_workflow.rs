use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use collabnet::config::EngineConfig;
use collabnet::events::{EngineEvent, EventError, EventPublisher};
use collabnet::matching::{
    Availability, CollaborationPreferences, CollaboratorId, CollaboratorProfile,
    CompatibilityScorer, ExperienceLevel, RecommendationTier, ReputationAction, ReputationLedger,
};
use collabnet::partnerships::{
    Campaign, Compensation, CompensationKind, Contract, ContractId, ContractParty, ContractSpec,
    ContractStatus, DeliverableMetrics, DeliverableSubmission, ManualSettlementQueue, Partnership,
    PartnershipId, PartnershipService, PartnershipStatus, Payment, PaymentId, PaymentStatus,
    PerformanceBonus, ProposalContent, ProposalDecision, Timeline,
};
use collabnet::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
    RepositoryError,
};

#[derive(Default)]
struct MemoryStore {
    profiles: Mutex<HashMap<CollaboratorId, CollaboratorProfile>>,
    partnerships: Mutex<HashMap<PartnershipId, Partnership>>,
    contracts: Mutex<HashMap<ContractId, Contract>>,
    payments: Mutex<HashMap<PaymentId, Payment>>,
}

impl ProfileRepository for MemoryStore {
    fn insert(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("lock");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &CollaboratorId) -> Result<Option<CollaboratorProfile>, RepositoryError> {
        Ok(self.profiles.lock().expect("lock").get(id).cloned())
    }

    fn update(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("lock");
        if !guard.contains_key(&profile.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }
}

impl PartnershipRepository for MemoryStore {
    fn insert(&self, partnership: Partnership) -> Result<(), RepositoryError> {
        let mut guard = self.partnerships.lock().expect("lock");
        if guard.contains_key(&partnership.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(partnership.id.clone(), partnership);
        Ok(())
    }

    fn fetch(&self, id: &PartnershipId) -> Result<Option<Partnership>, RepositoryError> {
        Ok(self.partnerships.lock().expect("lock").get(id).cloned())
    }

    fn update(&self, partnership: Partnership) -> Result<(), RepositoryError> {
        let mut guard = self.partnerships.lock().expect("lock");
        if !guard.contains_key(&partnership.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(partnership.id.clone(), partnership);
        Ok(())
    }

    fn for_initiator(&self, id: &CollaboratorId) -> Result<Vec<Partnership>, RepositoryError> {
        let guard = self.partnerships.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|partnership| &partnership.initiator_id == id)
            .cloned()
            .collect())
    }
}

impl ContractRepository for MemoryStore {
    fn insert_contract(&self, contract: Contract) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("lock");
        if guard.contains_key(&contract.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(contract.id.clone(), contract);
        Ok(())
    }

    fn fetch_contract(&self, id: &ContractId) -> Result<Option<Contract>, RepositoryError> {
        Ok(self.contracts.lock().expect("lock").get(id).cloned())
    }

    fn update_contract(&self, contract: Contract) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("lock");
        if !guard.contains_key(&contract.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(contract.id.clone(), contract);
        Ok(())
    }
}

impl PaymentRepository for MemoryStore {
    fn insert_payment(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.payments.lock().expect("lock");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id.clone(), payment);
        Ok(())
    }

    fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError> {
        Ok(self.payments.lock().expect("lock").get(id).cloned())
    }

    fn update_payment(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.payments.lock().expect("lock");
        if !guard.contains_key(&payment.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(payment.id.clone(), payment);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryEvents {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemoryEvents {
    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&EngineEvent) -> bool,
    {
        self.events
            .lock()
            .expect("lock")
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

impl EventPublisher for MemoryEvents {
    fn publish(&self, event: EngineEvent) -> Result<(), EventError> {
        self.events.lock().expect("lock").push(event);
        Ok(())
    }
}

fn profile(id: &str, genres: &[&str], skills: &[&str]) -> CollaboratorProfile {
    CollaboratorProfile {
        id: CollaboratorId(id.to_string()),
        display_name: id.to_string(),
        location: "Nashville".to_string(),
        genres: genres.iter().map(|genre| genre.to_string()).collect::<BTreeSet<_>>(),
        skills: skills.iter().map(|skill| skill.to_string()).collect::<BTreeSet<_>>(),
        experience: ExperienceLevel::Advanced,
        availability: Availability::PartTime,
        preferences: CollaborationPreferences::default(),
        reputation: 0,
        completed_partnerships: 0,
        active: true,
        created_at: Utc::now(),
    }
}

/// One full pass through the system: score two collaborators, run a
/// partnership from creation to settled payment, and grow the payee's
/// reputation off the completed project.
#[test]
fn full_partnership_lifecycle_from_match_to_reputation() {
    let store = Arc::new(MemoryStore::default());
    let events = Arc::new(MemoryEvents::default());
    let settlements = Arc::new(ManualSettlementQueue::new());
    let service = PartnershipService::new(
        store.clone(),
        events.clone(),
        settlements.clone(),
        &EngineConfig {
            settlement_delay_secs: 0,
        },
    );

    let artist = profile("artist-9", &["pop", "indie"], &["vocals", "songwriting"]);
    let creator = profile("creator-9", &["pop"], &["video_production", "editing"]);
    ProfileRepository::insert(store.as_ref(), artist.clone()).expect("seed artist");
    ProfileRepository::insert(store.as_ref(), creator.clone()).expect("seed creator");

    // Matching: shared genre, fully complementary skills.
    let result = CompatibilityScorer::new().score(&artist, &creator);
    assert!(result.total_score >= 60, "expected a workable match, got {}", result.total_score);
    assert!(matches!(
        result.recommendation,
        RecommendationTier::Good | RecommendationTier::Excellent
    ));

    // Lifecycle: create, propose, accept, sign, deliver, approve, settle.
    let now = Utc::now();
    let partnership = service
        .create_partnership(
            artist.id.clone(),
            creator.id.clone(),
            Campaign {
                name: "EP launch".to_string(),
                campaign_type: "music_promotion".to_string(),
                objectives: vec!["streams".to_string()],
            },
            ContractSpec {
                template_id: "music_promotion".to_string(),
                custom_terms: Default::default(),
                deliverables: vec!["Instagram post".to_string(), "Story mention".to_string()],
                timeline: Timeline {
                    start_date: now,
                    end_date: now + Duration::days(21),
                },
                compensation: Compensation {
                    kind: CompensationKind::Hybrid,
                    base_amount: 1_000.0,
                    performance_bonus: PerformanceBonus {
                        reach_threshold: Some(10_000),
                        reach_bonus: 200.0,
                        ..Default::default()
                    },
                    revenue_share_percentage: 0.0,
                },
                exclusivity: "non-exclusive".to_string(),
                usage_rights: "promotional use".to_string(),
            },
        )
        .expect("create");

    service
        .send_proposal(
            &partnership.id,
            ProposalContent {
                subject: "EP launch collab".to_string(),
                message: "Two posts over three weeks".to_string(),
                deadline: None,
            },
        )
        .expect("propose");
    service
        .respond_to_proposal(&partnership.id, ProposalDecision::Accepted, "in".to_string())
        .expect("accept");

    service
        .sign_contract(&partnership.id, ContractParty::Initiator)
        .expect("initiator signs");
    let contract = service
        .sign_contract(&partnership.id, ContractParty::Counterparty)
        .expect("counterparty signs");
    assert_eq!(contract.status, ContractStatus::Executed);

    let mut approved_last = None;
    for platform in ["instagram", "instagram"] {
        let deliverable = service
            .submit_deliverable(
                &partnership.id,
                DeliverableSubmission {
                    kind: "instagram_post".to_string(),
                    title: "EP teaser".to_string(),
                    description: String::new(),
                    url: None,
                    platform: platform.to_string(),
                    published_at: Utc::now(),
                    metrics: DeliverableMetrics {
                        views: 8_000,
                        likes: 500,
                        comments: 80,
                        shares: 40,
                        reach: 6_000,
                        impressions: 9_000,
                    },
                },
            )
            .expect("submit");
        approved_last = Some(
            service
                .approve_deliverable(&partnership.id, &deliverable.id, None)
                .expect("approve"),
        );
    }
    let progress = approved_last.expect("approved");
    assert_eq!(progress.approved, 2);

    // Combined reach 12k clears the 10k bonus threshold.
    let in_flight = service.get(&partnership.id).expect("get");
    assert_eq!(in_flight.status, PartnershipStatus::PaymentProcessing);

    let tasks = settlements.drain();
    assert_eq!(tasks.len(), 1);
    let payment = service
        .complete_payment(&tasks[0].partnership_id)
        .expect("settle");
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.amount, 1_200.0);
    assert_eq!(payment.payee_id, creator.id);

    let finished = service.get(&partnership.id).expect("get");
    assert_eq!(finished.status, PartnershipStatus::Completed);
    assert_eq!(
        events.count(|event| matches!(event, EngineEvent::PaymentCompleted { .. })),
        1
    );

    // Reputation: the completed project bumps the payee and increments the
    // partnership counter.
    let ledger = ReputationLedger::new(store.clone(), events.clone());
    let score = ledger
        .adjust(&creator.id, ReputationAction::ProjectCompleted, None)
        .expect("known collaborator");
    assert_eq!(score, 50);
    let stored = ProfileRepository::fetch(store.as_ref(), &creator.id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.completed_partnerships, 1);
}

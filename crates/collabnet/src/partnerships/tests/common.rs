use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::config::EngineConfig;
use crate::events::{EngineEvent, EventError, EventPublisher};
use crate::matching::profile::{
    Availability, CollaborationPreferences, CollaboratorId, CollaboratorProfile, ExperienceLevel,
};
use crate::partnerships::domain::{
    Campaign, Compensation, CompensationKind, Contract, ContractId, ContractSpec,
    DeliverableMetrics, DeliverableSubmission, Partnership, PartnershipId, Payment, PaymentId,
    PerformanceBonus, ProposalContent, ProposalDecision, Timeline,
};
use crate::partnerships::service::PartnershipService;
use crate::partnerships::settlement::ManualSettlementQueue;
use crate::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
    RepositoryError,
};

/// Single in-memory store backing every repository trait, mirroring how the
/// api crate wires the engine.
#[derive(Default)]
pub(super) struct InMemoryStore {
    profiles: Mutex<HashMap<CollaboratorId, CollaboratorProfile>>,
    partnerships: Mutex<HashMap<PartnershipId, Partnership>>,
    contracts: Mutex<HashMap<ContractId, Contract>>,
    payments: Mutex<HashMap<PaymentId, Payment>>,
}

impl ProfileRepository for InMemoryStore {
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

impl PartnershipRepository for InMemoryStore {
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

impl ContractRepository for InMemoryStore {
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

impl PaymentRepository for InMemoryStore {
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
pub(super) struct CapturingEvents {
    events: Mutex<Vec<EngineEvent>>,
}

impl CapturingEvents {
    pub(super) fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("lock").clone()
    }

    pub(super) fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&EngineEvent) -> bool,
    {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

impl EventPublisher for CapturingEvents {
    fn publish(&self, event: EngineEvent) -> Result<(), EventError> {
        self.events.lock().expect("lock").push(event);
        Ok(())
    }
}

pub(super) type TestService = PartnershipService<InMemoryStore, CapturingEvents, ManualSettlementQueue>;

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) store: Arc<InMemoryStore>,
    pub(super) events: Arc<CapturingEvents>,
    pub(super) settlements: Arc<ManualSettlementQueue>,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::default());
    let events = Arc::new(CapturingEvents::default());
    let settlements = Arc::new(ManualSettlementQueue::new());
    let service = PartnershipService::new(
        store.clone(),
        events.clone(),
        settlements.clone(),
        &EngineConfig {
            settlement_delay_secs: 0,
        },
    );
    Harness {
        service,
        store,
        events,
        settlements,
    }
}

pub(super) fn profile(id: &str) -> CollaboratorProfile {
    CollaboratorProfile {
        id: CollaboratorId(id.to_string()),
        display_name: id.to_string(),
        location: "Austin".to_string(),
        genres: BTreeSet::from(["pop".to_string()]),
        skills: BTreeSet::from(["vocals".to_string()]),
        experience: ExperienceLevel::Intermediate,
        availability: Availability::PartTime,
        preferences: CollaborationPreferences::default(),
        reputation: 0,
        completed_partnerships: 0,
        active: true,
        created_at: Utc::now(),
    }
}

pub(super) fn seed_profiles(store: &InMemoryStore, ids: &[&str]) {
    for id in ids {
        ProfileRepository::insert(store, profile(id)).expect("seed profile");
    }
}

pub(super) fn fixed_compensation(base: f64) -> Compensation {
    Compensation {
        kind: CompensationKind::Fixed,
        base_amount: base,
        performance_bonus: PerformanceBonus::default(),
        revenue_share_percentage: 0.0,
    }
}

pub(super) fn hybrid_compensation(base: f64) -> Compensation {
    Compensation {
        kind: CompensationKind::Hybrid,
        base_amount: base,
        performance_bonus: PerformanceBonus {
            reach_threshold: Some(10_000),
            reach_bonus: 200.0,
            engagement_threshold: Some(1_000),
            engagement_bonus: 150.0,
            conversion_threshold: Some(50),
            conversion_bonus: 300.0,
            ..Default::default()
        },
        revenue_share_percentage: 0.0,
    }
}

pub(super) fn contract_spec(slots: usize, compensation: Compensation) -> ContractSpec {
    let now = Utc::now();
    ContractSpec {
        template_id: "music_promotion".to_string(),
        custom_terms: Default::default(),
        deliverables: (0..slots).map(|i| format!("Instagram post {}", i + 1)).collect(),
        timeline: Timeline {
            start_date: now,
            end_date: now + Duration::days(30),
        },
        compensation,
        exclusivity: "non-exclusive".to_string(),
        usage_rights: "promotional use".to_string(),
    }
}

pub(super) fn campaign() -> Campaign {
    Campaign {
        name: "Summer single push".to_string(),
        campaign_type: "music_promotion".to_string(),
        objectives: vec!["awareness".to_string()],
    }
}

pub(super) fn submission(platform: &str, reach: u64) -> DeliverableSubmission {
    DeliverableSubmission {
        kind: "instagram_post".to_string(),
        title: "Launch post".to_string(),
        description: "Feed post with the single".to_string(),
        url: Some("https://instagram.com/p/abc".to_string()),
        platform: platform.to_string(),
        published_at: Utc::now(),
        metrics: DeliverableMetrics {
            views: reach / 2,
            likes: 120,
            comments: 30,
            shares: 10,
            reach,
            impressions: reach,
        },
    }
}

/// Walks a fresh partnership to `active`: create, propose, accept.
pub(super) fn activated(harness: &Harness, spec: ContractSpec) -> PartnershipId {
    seed_profiles(&harness.store, &["artist-1", "creator-1"]);
    let partnership = harness
        .service
        .create_partnership(
            CollaboratorId("artist-1".to_string()),
            CollaboratorId("creator-1".to_string()),
            campaign(),
            spec,
        )
        .expect("create");
    harness
        .service
        .send_proposal(
            &partnership.id,
            ProposalContent {
                subject: "Collab?".to_string(),
                message: "Let's work together".to_string(),
                deadline: None,
            },
        )
        .expect("propose");
    harness
        .service
        .respond_to_proposal(&partnership.id, ProposalDecision::Accepted, "in".to_string())
        .expect("accept");
    partnership.id
}

use crate::matching::profile::CollaboratorId;
use crate::partnerships::domain::{ContractId, DeliverableId, PartnershipId, PaymentId, ProposalId};
use serde::Serialize;

/// Trait describing the engine's outbound event hook. Downstream consumers
/// (notifications, analytics, UI push) subscribe behind this seam; the engine
/// does not know who listens.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: EngineEvent) -> Result<(), EventError>;
}

/// Event dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

/// Named events emitted across the partnership and reputation workflows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    PartnershipCreated {
        partnership_id: PartnershipId,
        initiator_id: CollaboratorId,
        counterparty_id: CollaboratorId,
    },
    ProposalSent {
        partnership_id: PartnershipId,
        proposal_id: ProposalId,
    },
    ProposalResponded {
        partnership_id: PartnershipId,
        decision: String,
    },
    ContractGenerated {
        partnership_id: PartnershipId,
        contract_id: ContractId,
    },
    ContractExecuted {
        partnership_id: PartnershipId,
        contract_id: ContractId,
    },
    DeliverableSubmitted {
        partnership_id: PartnershipId,
        deliverable_id: DeliverableId,
    },
    DeliverableApproved {
        partnership_id: PartnershipId,
        deliverable_id: DeliverableId,
        progress: f64,
    },
    PaymentInitiated {
        partnership_id: PartnershipId,
        payment_id: PaymentId,
        amount: f64,
    },
    PaymentCompleted {
        partnership_id: PartnershipId,
        payment_id: PaymentId,
        amount: f64,
    },
    PartnershipCancelled {
        partnership_id: PartnershipId,
        reason: String,
    },
    AchievementUnlocked {
        collaborator_id: CollaboratorId,
        badge: &'static str,
        title: &'static str,
        reputation: u64,
    },
}

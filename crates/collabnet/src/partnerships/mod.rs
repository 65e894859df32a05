//! Partnership lifecycle: the state machine from creation through proposal,
//! contract, deliverable approval, and payment, plus the template catalogue,
//! the payment calculator, the settlement seam, and read-side analytics.

pub mod analytics;
pub mod domain;
pub mod payment;
pub mod router;
pub mod service;
pub mod settlement;
pub mod templates;

#[cfg(test)]
mod tests;

pub use analytics::{AnalyticsAggregator, AnalyticsSummary};
pub use domain::{
    Campaign, Compensation, CompensationKind, Contract, ContractAmendment, ContractId,
    ContractParty, ContractSpec, ContractStatus, Deliverable, DeliverableId, DeliverableMetrics,
    DeliverableSubmission, MetricsUpdate, Partnership, PartnershipId, PartnershipMetrics,
    PartnershipStatus, Payment, PaymentId, PaymentStatus, PerformanceBonus, Proposal,
    ProposalContent, ProposalDecision, Timeline,
};
pub use payment::PaymentCalculator;
pub use router::{partnership_router, PartnershipState};
pub use service::PartnershipService;
pub use settlement::{
    ManualSettlementQueue, SettlementError, SettlementScheduler, SettlementTask,
};
pub use templates::{ContractTemplate, ContractTemplateRegistry};

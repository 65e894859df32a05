use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::profile::CollaboratorId;

/// Identifier wrappers for the lifecycle entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartnershipId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliverableId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

/// Lifecycle states for a partnership. `Rejected`, `Completed`, and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipStatus {
    Pending,
    ProposalSent,
    Negotiating,
    Active,
    Rejected,
    DeliverablesComplete,
    PaymentProcessing,
    Completed,
    Cancelled,
}

impl PartnershipStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ProposalSent => "proposal_sent",
            Self::Negotiating => "negotiating",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::DeliverablesComplete => "deliverables_complete",
            Self::PaymentProcessing => "payment_processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }
}

/// Campaign metadata supplied at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub campaign_type: String,
    #[serde(default)]
    pub objectives: Vec<String>,
}

/// How the counterparty is compensated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationKind {
    Fixed,
    Performance,
    Hybrid,
    RevenueShare,
}

impl CompensationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Performance => "performance",
            Self::Hybrid => "hybrid",
            Self::RevenueShare => "revenue_share",
        }
    }

    /// Performance bonuses only apply to metrics-linked compensation.
    pub(crate) const fn earns_bonus(self) -> bool {
        matches!(self, Self::Performance | Self::Hybrid)
    }
}

/// Threshold-gated bonus rules. Each satisfied threshold adds its bonus;
/// the thresholds are independent, not exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceBonus {
    #[serde(default)]
    pub reach_threshold: Option<u64>,
    #[serde(default)]
    pub reach_bonus: f64,
    #[serde(default)]
    pub engagement_threshold: Option<u64>,
    #[serde(default)]
    pub engagement_bonus: f64,
    #[serde(default)]
    pub conversion_threshold: Option<u64>,
    #[serde(default)]
    pub conversion_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub kind: CompensationKind,
    pub base_amount: f64,
    #[serde(default)]
    pub performance_bonus: PerformanceBonus,
    #[serde(default)]
    pub revenue_share_percentage: f64,
}

/// Campaign window for the contracted work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Caller-supplied contract shape: a template reference plus overrides and
/// the concrete deliverable slots the partnership must fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub template_id: String,
    #[serde(default)]
    pub custom_terms: BTreeMap<String, String>,
    pub deliverables: Vec<String>,
    pub timeline: Timeline,
    pub compensation: Compensation,
    #[serde(default = "default_exclusivity")]
    pub exclusivity: String,
    #[serde(default)]
    pub usage_rights: String,
}

fn default_exclusivity() -> String {
    "non-exclusive".to_string()
}

/// Counter-offer payload: every populated field shallowly replaces the
/// corresponding contract field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractAmendment {
    #[serde(default)]
    pub custom_terms: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub deliverables: Option<Vec<String>>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub compensation: Option<Compensation>,
    #[serde(default)]
    pub exclusivity: Option<String>,
    #[serde(default)]
    pub usage_rights: Option<String>,
}

impl ContractSpec {
    pub(crate) fn merge(&mut self, amendment: ContractAmendment) {
        if let Some(custom_terms) = amendment.custom_terms {
            self.custom_terms = custom_terms;
        }
        if let Some(deliverables) = amendment.deliverables {
            self.deliverables = deliverables;
        }
        if let Some(timeline) = amendment.timeline {
            self.timeline = timeline;
        }
        if let Some(compensation) = amendment.compensation {
            self.compensation = compensation;
        }
        if let Some(exclusivity) = amendment.exclusivity {
            self.exclusivity = exclusivity;
        }
        if let Some(usage_rights) = amendment.usage_rights {
            self.usage_rights = usage_rights;
        }
    }
}

/// Per-channel counters reported with a submitted deliverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverableMetrics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub reach: u64,
    #[serde(default)]
    pub impressions: u64,
}

impl DeliverableMetrics {
    pub fn engagement(&self) -> u64 {
        self.likes + self.comments + self.shares
    }
}

/// A concrete piece of content submitted against a partnership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: DeliverableId,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub platform: String,
    pub published_at: DateTime<Utc>,
    pub metrics: DeliverableMetrics,
    pub approved: bool,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Caller payload for `submit_deliverable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverableSubmission {
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    pub platform: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub metrics: DeliverableMetrics,
}

/// Monotonically accumulated campaign metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnershipMetrics {
    pub reach: u64,
    pub engagement: u64,
    pub conversions: u64,
    pub revenue: f64,
}

impl PartnershipMetrics {
    pub(crate) fn absorb_deliverable(&mut self, metrics: &DeliverableMetrics) {
        self.reach += metrics.reach;
        self.engagement += metrics.engagement();
    }

    pub(crate) fn absorb_update(&mut self, update: &MetricsUpdate) {
        self.reach += update.reach;
        self.engagement += update.engagement;
        self.conversions += update.conversions;
        self.revenue += update.revenue;
    }
}

/// Additive metric deltas reported outside deliverable submission (tracking
/// pixels, conversion callbacks, revenue attribution).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsUpdate {
    #[serde(default)]
    pub reach: u64,
    #[serde(default)]
    pub engagement: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub revenue: f64,
}

/// Entries in a partnership's ordered communication log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommunicationEntry {
    ProposalSent {
        proposal_id: ProposalId,
        subject: String,
        message: String,
        deadline: DateTime<Utc>,
        sent_at: DateTime<Utc>,
    },
    ProposalResponse {
        decision: String,
        message: String,
        responded_at: DateTime<Utc>,
    },
}

/// Recorded when a partnership is cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cancellation {
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
}

/// The contractual collaboration record between two parties, progressing
/// through the fixed lifecycle. Never deleted; rejection and cancellation
/// are terminal states, not removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub id: PartnershipId,
    pub initiator_id: CollaboratorId,
    pub counterparty_id: CollaboratorId,
    pub campaign: Campaign,
    pub contract: ContractSpec,
    pub status: PartnershipStatus,
    pub communications: Vec<CommunicationEntry>,
    /// Submitted deliverables grouped by type, in submission order.
    pub deliverables: BTreeMap<String, Vec<Deliverable>>,
    pub metrics: PartnershipMetrics,
    pub contract_id: Option<ContractId>,
    pub payment_id: Option<PaymentId>,
    pub cancellation: Option<Cancellation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partnership {
    pub fn all_deliverables(&self) -> impl Iterator<Item = &Deliverable> {
        self.deliverables.values().flatten()
    }

    pub fn approved_count(&self) -> usize {
        self.all_deliverables()
            .filter(|deliverable| deliverable.approved)
            .count()
    }

    pub fn submitted_count(&self) -> usize {
        self.all_deliverables().count()
    }

    /// Number of deliverable slots the contract requires. The gate counts
    /// approved deliverables against slots, not distinct types.
    pub fn required_deliverables(&self) -> usize {
        self.contract.deliverables.len()
    }

    pub(crate) fn find_deliverable_mut(&mut self, id: &DeliverableId) -> Option<&mut Deliverable> {
        self.deliverables
            .values_mut()
            .flatten()
            .find(|deliverable| &deliverable.id == id)
    }
}

/// Proposal handed back to the caller from `send_proposal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub partnership_id: PartnershipId,
    pub subject: String,
    pub message: String,
    pub deadline: DateTime<Utc>,
    pub sent_at: DateTime<Utc>,
}

/// Caller payload for `send_proposal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalContent {
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Decision carried by `respond_to_proposal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ProposalDecision {
    Accepted,
    Rejected,
    CounterOffer(ContractAmendment),
}

impl ProposalDecision {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::CounterOffer(_) => "counter_offer",
        }
    }
}

/// Signing parties on a generated contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractParty {
    Initiator,
    Counterparty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub signed_by: CollaboratorId,
    pub signed_at: DateTime<Utc>,
}

/// Both slots must fill before a contract can become `Executed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractSignatures {
    pub initiator: Option<Signature>,
    pub counterparty: Option<Signature>,
}

impl ContractSignatures {
    pub fn fully_signed(&self) -> bool {
        self.initiator.is_some() && self.counterparty.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    PendingSignatures,
    Executed,
    Terminated,
}

impl ContractStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingSignatures => "pending_signatures",
            Self::Executed => "executed",
            Self::Terminated => "terminated",
        }
    }
}

/// Materialized contract: template defaults overridden by custom terms, plus
/// the structured fields carried on the partnership's contract spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub partnership_id: PartnershipId,
    pub template_id: String,
    /// Flattened term text, template defaults first, custom terms winning
    /// on key collision.
    pub terms: BTreeMap<String, String>,
    pub deliverables: Vec<String>,
    pub timeline: Timeline,
    pub compensation: Compensation,
    pub exclusivity: String,
    pub usage_rights: String,
    pub signatures: ContractSignatures,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

/// Itemization reported alongside a payment. The processing fee is
/// informational and not withheld from the payable amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub base_amount: f64,
    pub performance_bonus: f64,
    pub processing_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub partnership_id: PartnershipId,
    pub payee_id: CollaboratorId,
    pub amount: f64,
    pub currency: String,
    pub kind: CompensationKind,
    pub breakdown: PaymentBreakdown,
    pub status: PaymentStatus,
    pub scheduled_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub method: String,
}

/// Progress view returned by `approve_deliverable`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApprovalProgress {
    pub approved: usize,
    pub submitted: usize,
    pub required: usize,
    /// Approved fraction over everything submitted so far.
    pub fraction: f64,
}

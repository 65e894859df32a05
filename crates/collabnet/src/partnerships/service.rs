use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventPublisher};
use crate::matching::profile::CollaboratorId;
use crate::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
    RepositoryError,
};

use super::domain::{
    ApprovalProgress, Campaign, CommunicationEntry, Contract, ContractId, ContractParty,
    ContractSignatures, ContractSpec, ContractStatus, Deliverable, DeliverableId,
    DeliverableSubmission, MetricsUpdate, Partnership, PartnershipId, PartnershipStatus, Payment,
    PaymentId, PaymentStatus, Proposal, ProposalContent, ProposalDecision, ProposalId, Signature,
};
use super::payment::PaymentCalculator;
use super::settlement::{SettlementScheduler, SettlementTask};
use super::templates::ContractTemplateRegistry;

const DEFAULT_PROPOSAL_DEADLINE_DAYS: i64 = 7;
const CONTRACT_SIGNING_WINDOW_DAYS: i64 = 30;

static PARTNERSHIP_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROPOSAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CONTRACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DELIVERABLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_partnership_id() -> PartnershipId {
    let id = PARTNERSHIP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PartnershipId(format!("prt-{id:06}"))
}

fn next_proposal_id() -> ProposalId {
    let id = PROPOSAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProposalId(format!("prp-{id:06}"))
}

fn next_contract_id() -> ContractId {
    let id = CONTRACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContractId(format!("ctr-{id:06}"))
}

fn next_deliverable_id() -> DeliverableId {
    let id = DELIVERABLE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DeliverableId(format!("dlv-{id:06}"))
}

fn next_payment_id() -> PaymentId {
    let id = PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PaymentId(format!("pay-{id:06}"))
}

/// The partnership lifecycle engine. Drives the state machine from creation
/// through proposal, contract, deliverable approval, and payment, persisting
/// through the repository seam and announcing transitions through the event
/// seam.
///
/// Every state-mutating operation for one partnership id serializes on a
/// per-id lock, so an approval gate, a settlement callback, and a
/// cancellation can never interleave on the same record.
pub struct PartnershipService<R, E, S> {
    repository: Arc<R>,
    events: Arc<E>,
    scheduler: Arc<S>,
    templates: ContractTemplateRegistry,
    calculator: PaymentCalculator,
    settlement_delay: Duration,
    locks: Mutex<HashMap<PartnershipId, Arc<Mutex<()>>>>,
}

impl<R, E, S> PartnershipService<R, E, S>
where
    R: ProfileRepository
        + PartnershipRepository
        + ContractRepository
        + PaymentRepository
        + 'static,
    E: EventPublisher + 'static,
    S: SettlementScheduler + 'static,
{
    pub fn new(repository: Arc<R>, events: Arc<E>, scheduler: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            repository,
            events,
            scheduler,
            templates: ContractTemplateRegistry::standard(),
            calculator: PaymentCalculator,
            settlement_delay: Duration::seconds(config.settlement_delay_secs as i64),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a partnership in `pending` between two registered, active
    /// collaborators.
    pub fn create_partnership(
        &self,
        initiator_id: CollaboratorId,
        counterparty_id: CollaboratorId,
        campaign: Campaign,
        contract: ContractSpec,
    ) -> Result<Partnership, EngineError> {
        if initiator_id == counterparty_id {
            return Err(EngineError::Validation(
                "a collaborator cannot partner with themselves".to_string(),
            ));
        }
        for id in [&initiator_id, &counterparty_id] {
            let profile = ProfileRepository::fetch(self.repository.as_ref(), id)?
                .ok_or_else(|| EngineError::not_found("collaborator", id.0.clone()))?;
            if !profile.active {
                return Err(EngineError::Validation(format!(
                    "collaborator {} is deactivated",
                    id.0
                )));
            }
        }

        let now = Utc::now();
        let partnership = Partnership {
            id: next_partnership_id(),
            initiator_id: initiator_id.clone(),
            counterparty_id: counterparty_id.clone(),
            campaign,
            contract,
            status: PartnershipStatus::Pending,
            communications: Vec::new(),
            deliverables: Default::default(),
            metrics: Default::default(),
            contract_id: None,
            payment_id: None,
            cancellation: None,
            created_at: now,
            updated_at: now,
        };

        PartnershipRepository::insert(self.repository.as_ref(), partnership.clone())?;
        info!(partnership = %partnership.id.0, "partnership created");
        self.events.publish(EngineEvent::PartnershipCreated {
            partnership_id: partnership.id.clone(),
            initiator_id,
            counterparty_id,
        })?;
        Ok(partnership)
    }

    /// Send (or re-send, while negotiating) a proposal to the counterparty.
    /// Unspecified deadlines default to seven days out.
    pub fn send_proposal(
        &self,
        partnership_id: &PartnershipId,
        content: ProposalContent,
    ) -> Result<Proposal, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if !matches!(
            partnership.status,
            PartnershipStatus::Pending | PartnershipStatus::Negotiating
        ) {
            return Err(EngineError::InvalidState {
                operation: "send a proposal",
                status: partnership.status,
            });
        }

        let now = Utc::now();
        let proposal = Proposal {
            id: next_proposal_id(),
            partnership_id: partnership_id.clone(),
            subject: content.subject,
            message: content.message,
            deadline: content
                .deadline
                .unwrap_or(now + Duration::days(DEFAULT_PROPOSAL_DEADLINE_DAYS)),
            sent_at: now,
        };

        partnership.communications.push(CommunicationEntry::ProposalSent {
            proposal_id: proposal.id.clone(),
            subject: proposal.subject.clone(),
            message: proposal.message.clone(),
            deadline: proposal.deadline,
            sent_at: now,
        });
        partnership.status = PartnershipStatus::ProposalSent;
        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;

        self.events.publish(EngineEvent::ProposalSent {
            partnership_id: partnership_id.clone(),
            proposal_id: proposal.id.clone(),
        })?;
        Ok(proposal)
    }

    /// Record the counterparty's decision. Acceptance activates the
    /// partnership and materializes its contract; a counter-offer merges the
    /// amendment and returns to negotiation.
    pub fn respond_to_proposal(
        &self,
        partnership_id: &PartnershipId,
        decision: ProposalDecision,
        message: String,
    ) -> Result<Partnership, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if !matches!(
            partnership.status,
            PartnershipStatus::ProposalSent | PartnershipStatus::Negotiating
        ) {
            return Err(EngineError::InvalidState {
                operation: "respond to a proposal",
                status: partnership.status,
            });
        }

        let now = Utc::now();
        let decision_label = decision.label();
        partnership.communications.push(CommunicationEntry::ProposalResponse {
            decision: decision_label.to_string(),
            message,
            responded_at: now,
        });

        match decision {
            ProposalDecision::Accepted => {
                partnership.status = PartnershipStatus::Active;
                self.generate_contract(&mut partnership, now)?;
            }
            ProposalDecision::Rejected => {
                partnership.status = PartnershipStatus::Rejected;
            }
            ProposalDecision::CounterOffer(amendment) => {
                partnership.status = PartnershipStatus::Negotiating;
                partnership.contract.merge(amendment);
            }
        }

        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership.clone())?;

        self.events.publish(EngineEvent::ProposalResponded {
            partnership_id: partnership_id.clone(),
            decision: decision_label.to_string(),
        })?;
        Ok(partnership)
    }

    /// Materialize a contract from the partnership's spec: template defaults
    /// first, custom terms winning on key collision, draft status, and a
    /// 30-day signing window. Only reachable through proposal acceptance.
    fn generate_contract(
        &self,
        partnership: &mut Partnership,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let spec = &partnership.contract;
        let mut terms = match self.templates.get(&spec.template_id) {
            Some(template) => template.terms(),
            None => {
                warn!(
                    template = %spec.template_id,
                    partnership = %partnership.id.0,
                    "unknown contract template, falling back to empty defaults"
                );
                Default::default()
            }
        };
        terms.extend(spec.custom_terms.clone());

        let contract = Contract {
            id: next_contract_id(),
            partnership_id: partnership.id.clone(),
            template_id: spec.template_id.clone(),
            terms,
            deliverables: spec.deliverables.clone(),
            timeline: spec.timeline,
            compensation: spec.compensation.clone(),
            exclusivity: spec.exclusivity.clone(),
            usage_rights: spec.usage_rights.clone(),
            signatures: ContractSignatures::default(),
            status: ContractStatus::Draft,
            created_at: now,
            expires_at: now + Duration::days(CONTRACT_SIGNING_WINDOW_DAYS),
        };

        let contract_id = contract.id.clone();
        self.repository.insert_contract(contract)?;
        partnership.contract_id = Some(contract_id.clone());

        self.events.publish(EngineEvent::ContractGenerated {
            partnership_id: partnership.id.clone(),
            contract_id,
        })?;
        Ok(())
    }

    /// Fill one party's signature slot. The first signature moves the
    /// contract to `pending_signatures`, the second to `executed`.
    pub fn sign_contract(
        &self,
        partnership_id: &PartnershipId,
        party: ContractParty,
    ) -> Result<Contract, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let partnership = self.load(partnership_id)?;
        let contract_id = partnership.contract_id.clone().ok_or_else(|| {
            EngineError::Validation(format!(
                "partnership {} has no generated contract",
                partnership_id.0
            ))
        })?;
        let mut contract = self
            .repository
            .fetch_contract(&contract_id)?
            .ok_or_else(|| EngineError::not_found("contract", contract_id.0.clone()))?;

        if !matches!(
            contract.status,
            ContractStatus::Draft | ContractStatus::PendingSignatures
        ) {
            return Err(EngineError::ContractState(contract.status));
        }
        let now = Utc::now();
        if now > contract.expires_at {
            return Err(EngineError::Validation(format!(
                "contract {} signing window expired",
                contract_id.0
            )));
        }

        let (slot, signer) = match party {
            ContractParty::Initiator => (
                &mut contract.signatures.initiator,
                partnership.initiator_id.clone(),
            ),
            ContractParty::Counterparty => (
                &mut contract.signatures.counterparty,
                partnership.counterparty_id.clone(),
            ),
        };
        if slot.is_some() {
            return Err(EngineError::Validation(format!(
                "contract {} already signed by {}",
                contract_id.0, signer.0
            )));
        }
        *slot = Some(Signature {
            signed_by: signer,
            signed_at: now,
        });

        let fully_signed = contract.signatures.fully_signed();
        contract.status = if fully_signed {
            ContractStatus::Executed
        } else {
            ContractStatus::PendingSignatures
        };
        self.repository.update_contract(contract.clone())?;

        if fully_signed {
            info!(contract = %contract_id.0, "contract fully signed");
            self.events.publish(EngineEvent::ContractExecuted {
                partnership_id: partnership_id.clone(),
                contract_id,
            })?;
        }
        Ok(contract)
    }

    /// Record a submitted deliverable under its type. Submission never
    /// approves and never transitions state, but the payload's metrics
    /// accumulate onto the partnership immediately.
    pub fn submit_deliverable(
        &self,
        partnership_id: &PartnershipId,
        submission: DeliverableSubmission,
    ) -> Result<Deliverable, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status.is_terminal() {
            return Err(EngineError::InvalidState {
                operation: "submit a deliverable",
                status: partnership.status,
            });
        }

        let now = Utc::now();
        let deliverable = Deliverable {
            id: next_deliverable_id(),
            kind: submission.kind.clone(),
            title: submission.title,
            description: submission.description,
            url: submission.url,
            platform: submission.platform,
            published_at: submission.published_at,
            metrics: submission.metrics,
            approved: false,
            feedback: None,
            submitted_at: now,
            approved_at: None,
        };

        partnership.metrics.absorb_deliverable(&deliverable.metrics);
        partnership
            .deliverables
            .entry(submission.kind)
            .or_default()
            .push(deliverable.clone());
        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;

        self.events.publish(EngineEvent::DeliverableSubmitted {
            partnership_id: partnership_id.clone(),
            deliverable_id: deliverable.id.clone(),
        })?;
        Ok(deliverable)
    }

    /// Fold externally reported metric deltas (conversion callbacks, revenue
    /// attribution) into the partnership's running totals.
    pub fn record_campaign_metrics(
        &self,
        partnership_id: &PartnershipId,
        update: MetricsUpdate,
    ) -> Result<Partnership, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        partnership.metrics.absorb_update(&update);
        partnership.updated_at = Utc::now();
        PartnershipRepository::update(self.repository.as_ref(), partnership.clone())?;
        Ok(partnership)
    }

    /// Approve one deliverable, stamping time and feedback. Once the
    /// approved count reaches the contract's deliverable slot count the
    /// partnership completes its deliverables and payment kicks off,
    /// exactly once.
    pub fn approve_deliverable(
        &self,
        partnership_id: &PartnershipId,
        deliverable_id: &DeliverableId,
        feedback: Option<String>,
    ) -> Result<ApprovalProgress, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status.is_terminal()
            || partnership.status == PartnershipStatus::PaymentProcessing
        {
            return Err(EngineError::InvalidState {
                operation: "approve a deliverable",
                status: partnership.status,
            });
        }

        let now = Utc::now();
        {
            let deliverable = partnership
                .find_deliverable_mut(deliverable_id)
                .ok_or_else(|| EngineError::not_found("deliverable", deliverable_id.0.clone()))?;
            deliverable.approved = true;
            deliverable.feedback = feedback;
            deliverable.approved_at = Some(now);
        }

        let approved = partnership.approved_count();
        let submitted = partnership.submitted_count();
        let required = partnership.required_deliverables();
        let fraction = if submitted == 0 {
            0.0
        } else {
            approved as f64 / submitted as f64
        };

        if approved == required && partnership.payment_id.is_none() {
            partnership.status = PartnershipStatus::DeliverablesComplete;
            self.initiate_payment(&mut partnership, now)?;
        }
        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;

        self.events.publish(EngineEvent::DeliverableApproved {
            partnership_id: partnership_id.clone(),
            deliverable_id: deliverable_id.clone(),
            progress: fraction,
        })?;
        Ok(ApprovalProgress {
            approved,
            submitted,
            required,
            fraction,
        })
    }

    /// Explicitly start payment for a partnership whose deliverables are
    /// complete but whose automatic trigger did not run (a prior failed
    /// payment, for instance).
    pub fn process_payment(&self, partnership_id: &PartnershipId) -> Result<Payment, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status != PartnershipStatus::DeliverablesComplete {
            return Err(EngineError::InvalidState {
                operation: "process payment",
                status: partnership.status,
            });
        }
        let payment = self.initiate_payment(&mut partnership, Utc::now())?;
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;
        Ok(payment)
    }

    /// Create the processing payment, move the partnership into
    /// `payment_processing`, and hand settlement to the scheduler. Callers
    /// hold the per-id lock.
    fn initiate_payment(
        &self,
        partnership: &mut Partnership,
        now: DateTime<Utc>,
    ) -> Result<Payment, EngineError> {
        if partnership.payment_id.is_some() {
            return Err(EngineError::Validation(format!(
                "partnership {} already has a payment in flight",
                partnership.id.0
            )));
        }

        let breakdown = self
            .calculator
            .breakdown(&partnership.contract.compensation, &partnership.metrics);
        let amount = self.calculator.total(&breakdown);

        let payment = Payment {
            id: next_payment_id(),
            partnership_id: partnership.id.clone(),
            payee_id: partnership.counterparty_id.clone(),
            amount,
            currency: "USD".to_string(),
            kind: partnership.contract.compensation.kind,
            breakdown,
            status: PaymentStatus::Processing,
            scheduled_at: now,
            processed_at: None,
            method: "bank_transfer".to_string(),
        };

        self.repository.insert_payment(payment.clone())?;
        partnership.payment_id = Some(payment.id.clone());
        partnership.status = PartnershipStatus::PaymentProcessing;

        self.scheduler.schedule(SettlementTask {
            partnership_id: partnership.id.clone(),
            payment_id: payment.id.clone(),
            settle_after: now + self.settlement_delay,
        })?;
        info!(
            partnership = %partnership.id.0,
            payment = %payment.id.0,
            amount,
            "payment initiated"
        );
        self.events.publish(EngineEvent::PaymentInitiated {
            partnership_id: partnership.id.clone(),
            payment_id: payment.id.clone(),
            amount,
        })?;
        Ok(payment)
    }

    /// Settlement completion callback. Flips the in-flight payment to
    /// `completed` and the partnership with it.
    pub fn complete_payment(&self, partnership_id: &PartnershipId) -> Result<Payment, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status != PartnershipStatus::PaymentProcessing {
            return Err(EngineError::InvalidState {
                operation: "complete payment",
                status: partnership.status,
            });
        }
        let (payment_id, mut payment) = self.in_flight_payment(&partnership)?;

        let now = Utc::now();
        payment.status = PaymentStatus::Completed;
        payment.processed_at = Some(now);
        self.repository.update_payment(payment.clone())?;

        partnership.status = PartnershipStatus::Completed;
        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;

        info!(partnership = %partnership_id.0, payment = %payment_id.0, "payment completed");
        self.events.publish(EngineEvent::PaymentCompleted {
            partnership_id: partnership_id.clone(),
            payment_id,
            amount: payment.amount,
        })?;
        Ok(payment)
    }

    /// Mark the in-flight payment failed and return the partnership to
    /// `deliverables_complete` so the caller can retry via
    /// `process_payment`.
    pub fn fail_payment(&self, partnership_id: &PartnershipId) -> Result<Payment, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status != PartnershipStatus::PaymentProcessing {
            return Err(EngineError::InvalidState {
                operation: "fail payment",
                status: partnership.status,
            });
        }
        let (payment_id, mut payment) = self.in_flight_payment(&partnership)?;

        payment.status = PaymentStatus::Failed;
        self.repository.update_payment(payment.clone())?;

        partnership.payment_id = None;
        partnership.status = PartnershipStatus::DeliverablesComplete;
        partnership.updated_at = Utc::now();
        PartnershipRepository::update(self.repository.as_ref(), partnership)?;

        warn!(partnership = %partnership_id.0, payment = %payment_id.0, "payment failed");
        Ok(payment)
    }

    /// Cancel a partnership, recording the reason. Rejected from terminal
    /// states and from `payment_processing`, where the in-flight payment
    /// always wins.
    pub fn cancel_partnership(
        &self,
        partnership_id: &PartnershipId,
        reason: String,
    ) -> Result<Partnership, EngineError> {
        let lock = self.lock_handle(partnership_id);
        let _guard = hold(&lock)?;

        let mut partnership = self.load(partnership_id)?;
        if partnership.status.is_terminal()
            || partnership.status == PartnershipStatus::PaymentProcessing
        {
            return Err(EngineError::InvalidState {
                operation: "cancel",
                status: partnership.status,
            });
        }

        let now = Utc::now();
        partnership.status = PartnershipStatus::Cancelled;
        partnership.cancellation = Some(super::domain::Cancellation {
            reason: reason.clone(),
            cancelled_at: now,
        });
        partnership.updated_at = now;
        PartnershipRepository::update(self.repository.as_ref(), partnership.clone())?;

        info!(partnership = %partnership_id.0, %reason, "partnership cancelled");
        self.events.publish(EngineEvent::PartnershipCancelled {
            partnership_id: partnership_id.clone(),
            reason,
        })?;
        Ok(partnership)
    }

    /// Fetch a partnership for API responses.
    pub fn get(&self, partnership_id: &PartnershipId) -> Result<Partnership, EngineError> {
        self.load(partnership_id)
    }

    pub fn get_contract(&self, partnership_id: &PartnershipId) -> Result<Contract, EngineError> {
        let partnership = self.load(partnership_id)?;
        let contract_id = partnership.contract_id.ok_or_else(|| {
            EngineError::Validation(format!(
                "partnership {} has no generated contract",
                partnership_id.0
            ))
        })?;
        self.repository
            .fetch_contract(&contract_id)?
            .ok_or_else(|| EngineError::not_found("contract", contract_id.0))
    }

    /// Active partnerships initiated by a collaborator, soonest contract end
    /// date first.
    pub fn active_partnerships(
        &self,
        initiator_id: &CollaboratorId,
    ) -> Result<Vec<Partnership>, EngineError> {
        let mut partnerships: Vec<Partnership> = self
            .repository
            .for_initiator(initiator_id)?
            .into_iter()
            .filter(|partnership| partnership.status == PartnershipStatus::Active)
            .collect();
        partnerships.sort_by_key(|partnership| partnership.contract.timeline.end_date);
        Ok(partnerships)
    }

    fn load(&self, partnership_id: &PartnershipId) -> Result<Partnership, EngineError> {
        PartnershipRepository::fetch(self.repository.as_ref(), partnership_id)?
            .ok_or_else(|| EngineError::not_found("partnership", partnership_id.0.clone()))
    }

    fn in_flight_payment(
        &self,
        partnership: &Partnership,
    ) -> Result<(PaymentId, Payment), EngineError> {
        let payment_id = partnership.payment_id.clone().ok_or_else(|| {
            EngineError::Validation(format!(
                "partnership {} has no payment in flight",
                partnership.id.0
            ))
        })?;
        let payment = self
            .repository
            .fetch_payment(&payment_id)?
            .ok_or_else(|| EngineError::not_found("payment", payment_id.0.clone()))?;
        Ok((payment_id, payment))
    }

    fn lock_handle(&self, partnership_id: &PartnershipId) -> Arc<Mutex<()>> {
        match self.locks.lock() {
            Ok(mut locks) => locks
                .entry(partnership_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
            // A poisoned registry still hands out a usable lock.
            Err(poisoned) => poisoned
                .into_inner()
                .entry(partnership_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        }
    }
}

fn hold(lock: &Arc<Mutex<()>>) -> Result<std::sync::MutexGuard<'_, ()>, EngineError> {
    lock.lock().map_err(|_| {
        EngineError::Repository(RepositoryError::Unavailable(
            "partnership lock poisoned".to_string(),
        ))
    })
}

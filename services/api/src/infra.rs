use collabnet::events::{EngineEvent, EventError, EventPublisher};
use collabnet::matching::{CollaboratorId, CollaboratorProfile};
use collabnet::partnerships::{
    Contract, ContractId, Partnership, PartnershipId, PartnershipService, Payment, PaymentId,
    SettlementError, SettlementScheduler, SettlementTask,
};
use collabnet::repository::{
    ContractRepository, PartnershipRepository, PaymentRepository, ProfileRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage backing every repository trait. Durable storage
/// slots in behind the same traits once the platform needs it.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    profiles: Mutex<HashMap<CollaboratorId, CollaboratorProfile>>,
    partnerships: Mutex<HashMap<PartnershipId, Partnership>>,
    contracts: Mutex<HashMap<ContractId, Contract>>,
    payments: Mutex<HashMap<PaymentId, Payment>>,
}

impl ProfileRepository for InMemoryStore {
    fn insert(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &CollaboratorId) -> Result<Option<CollaboratorProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        if !guard.contains_key(&profile.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }
}

impl PartnershipRepository for InMemoryStore {
    fn insert(&self, partnership: Partnership) -> Result<(), RepositoryError> {
        let mut guard = self.partnerships.lock().expect("partnership mutex poisoned");
        if guard.contains_key(&partnership.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(partnership.id.clone(), partnership);
        Ok(())
    }

    fn fetch(&self, id: &PartnershipId) -> Result<Option<Partnership>, RepositoryError> {
        let guard = self.partnerships.lock().expect("partnership mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, partnership: Partnership) -> Result<(), RepositoryError> {
        let mut guard = self.partnerships.lock().expect("partnership mutex poisoned");
        if !guard.contains_key(&partnership.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(partnership.id.clone(), partnership);
        Ok(())
    }

    fn for_initiator(&self, id: &CollaboratorId) -> Result<Vec<Partnership>, RepositoryError> {
        let guard = self.partnerships.lock().expect("partnership mutex poisoned");
        Ok(guard
            .values()
            .filter(|partnership| &partnership.initiator_id == id)
            .cloned()
            .collect())
    }
}

impl ContractRepository for InMemoryStore {
    fn insert_contract(&self, contract: Contract) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("contract mutex poisoned");
        if guard.contains_key(&contract.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(contract.id.clone(), contract);
        Ok(())
    }

    fn fetch_contract(&self, id: &ContractId) -> Result<Option<Contract>, RepositoryError> {
        let guard = self.contracts.lock().expect("contract mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_contract(&self, contract: Contract) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("contract mutex poisoned");
        if !guard.contains_key(&contract.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(contract.id.clone(), contract);
        Ok(())
    }
}

impl PaymentRepository for InMemoryStore {
    fn insert_payment(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.payments.lock().expect("payment mutex poisoned");
        if guard.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(payment.id.clone(), payment);
        Ok(())
    }

    fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let guard = self.payments.lock().expect("payment mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_payment(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut guard = self.payments.lock().expect("payment mutex poisoned");
        if !guard.contains_key(&payment.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(payment.id.clone(), payment);
        Ok(())
    }
}

/// Publisher that surfaces engine events on the service log. Replaced by a
/// real transport when downstream consumers exist.
#[derive(Default, Clone)]
pub(crate) struct LoggingEventPublisher;

impl EventPublisher for LoggingEventPublisher {
    fn publish(&self, event: EngineEvent) -> Result<(), EventError> {
        info!(?event, "engine event");
        Ok(())
    }
}

/// Scheduler that hands settlement tasks to the background worker over an
/// unbounded channel.
pub(crate) struct ChannelSettlementScheduler {
    sender: mpsc::UnboundedSender<SettlementTask>,
}

impl ChannelSettlementScheduler {
    pub(crate) fn new(sender: mpsc::UnboundedSender<SettlementTask>) -> Self {
        Self { sender }
    }
}

impl SettlementScheduler for ChannelSettlementScheduler {
    fn schedule(&self, task: SettlementTask) -> Result<(), SettlementError> {
        self.sender
            .send(task)
            .map_err(|err| SettlementError::Unavailable(err.to_string()))
    }
}

pub(crate) type ApiService =
    PartnershipService<InMemoryStore, LoggingEventPublisher, ChannelSettlementScheduler>;

/// Drains the settlement channel, waiting out each task's settle-after
/// timestamp before completing the payment. Settlement failures are logged
/// and leave the payment in processing for manual follow-up.
pub(crate) fn spawn_settlement_worker(
    service: Arc<ApiService>,
    mut receiver: mpsc::UnboundedReceiver<SettlementTask>,
) {
    tokio::spawn(async move {
        while let Some(task) = receiver.recv().await {
            let wait = (task.settle_after - chrono::Utc::now())
                .to_std()
                .unwrap_or_default();
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }

            match service.complete_payment(&task.partnership_id) {
                Ok(payment) => info!(
                    partnership_id = %task.partnership_id.0,
                    payment_id = %payment.id.0,
                    amount = payment.amount,
                    "payment settled"
                ),
                Err(err) => warn!(
                    partnership_id = %task.partnership_id.0,
                    payment_id = %task.payment_id.0,
                    %err,
                    "settlement failed"
                ),
            }
        }
    });
}

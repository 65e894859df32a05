use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::domain::{PartnershipId, PaymentId};

/// A payment waiting to settle. The engine hands these to a scheduler when a
/// payment enters processing; whoever drives the scheduler calls back into
/// `complete_payment` once `settle_after` has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementTask {
    pub partnership_id: PartnershipId,
    pub payment_id: PaymentId,
    pub settle_after: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("settlement scheduler unavailable: {0}")]
    Unavailable(String),
}

/// Seam between the lifecycle engine and whatever executes settlements.
/// Implementations must not block; they enqueue and return.
pub trait SettlementScheduler: Send + Sync {
    fn schedule(&self, task: SettlementTask) -> Result<(), SettlementError>;
}

/// In-process queue that records tasks for an external driver to drain.
/// Suited to tests and the demo runner, where settlement timing is driven
/// explicitly rather than by a background worker.
#[derive(Debug, Default)]
pub struct ManualSettlementQueue {
    tasks: Mutex<VecDeque<SettlementTask>>,
}

impl ManualSettlementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued task, oldest first.
    pub fn drain(&self) -> Vec<SettlementTask> {
        match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettlementScheduler for ManualSettlementQueue {
    fn schedule(&self, task: SettlementTask) -> Result<(), SettlementError> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| SettlementError::Unavailable("queue poisoned".to_string()))?;
        tasks.push_back(task);
        Ok(())
    }
}

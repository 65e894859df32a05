use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::matching::profile::CollaboratorId;
use crate::repository::{PartnershipRepository, PaymentRepository};

use super::domain::{Partnership, PartnershipStatus, PaymentStatus};

/// Per-platform deliverable rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub count: u64,
    pub reach: u64,
    pub engagement: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceTotals {
    pub total_reach: u64,
    pub total_engagement: u64,
    pub average_reach: f64,
    pub average_engagement: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FinancialTotals {
    pub total_spent: f64,
    pub average_partnership_cost: f64,
    pub cost_per_thousand_reach: f64,
}

/// Read-side report over one initiator's partnerships inside a lookback
/// window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub window_days: i64,
    pub partnerships: StatusCounts,
    pub performance: PerformanceTotals,
    pub financial: FinancialTotals,
    pub platforms: BTreeMap<String, PlatformStats>,
}

/// Aggregates stored partnerships and payments into a summary. Pure reads;
/// never mutates and never blocks the lifecycle engine's writers.
pub struct AnalyticsAggregator<R> {
    repository: Arc<R>,
}

impl<R> AnalyticsAggregator<R>
where
    R: PartnershipRepository + PaymentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn aggregate(
        &self,
        initiator_id: &CollaboratorId,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsSummary, EngineError> {
        let cutoff = now - window;
        let all = self.repository.for_initiator(initiator_id)?;
        let recent: Vec<&Partnership> = all
            .iter()
            .filter(|partnership| partnership.created_at >= cutoff)
            .collect();

        let mut summary = AnalyticsSummary {
            window_days: window.num_days(),
            ..Default::default()
        };

        summary.partnerships.total = recent.len();
        for partnership in &recent {
            match partnership.status {
                PartnershipStatus::Active => summary.partnerships.active += 1,
                PartnershipStatus::Completed => summary.partnerships.completed += 1,
                PartnershipStatus::Cancelled => summary.partnerships.cancelled += 1,
                _ => {}
            }
            summary.performance.total_reach += partnership.metrics.reach;
            summary.performance.total_engagement += partnership.metrics.engagement;

            for deliverable in partnership.all_deliverables() {
                let stats = summary
                    .platforms
                    .entry(deliverable.platform.clone())
                    .or_default();
                stats.count += 1;
                stats.reach += deliverable.metrics.reach;
                stats.engagement += deliverable.metrics.engagement();
            }
        }

        // Spend covers every initiated payment settled inside the window,
        // whether or not its partnership was created there.
        let mut total_spent = 0.0;
        for partnership in &all {
            let Some(payment_id) = &partnership.payment_id else {
                continue;
            };
            if let Some(payment) = self.repository.fetch_payment(payment_id)? {
                let settled_in_window = payment
                    .processed_at
                    .is_some_and(|processed_at| processed_at >= cutoff);
                if payment.status == PaymentStatus::Completed && settled_in_window {
                    total_spent += payment.amount;
                }
            }
        }

        if !recent.is_empty() {
            let count = recent.len() as f64;
            summary.performance.average_reach = summary.performance.total_reach as f64 / count;
            summary.performance.average_engagement =
                summary.performance.total_engagement as f64 / count;
            summary.financial.average_partnership_cost = total_spent / count;
        }
        summary.financial.total_spent = total_spent;
        if summary.performance.total_reach > 0 {
            summary.financial.cost_per_thousand_reach =
                total_spent / summary.performance.total_reach as f64 * 1000.0;
        }

        Ok(summary)
    }
}

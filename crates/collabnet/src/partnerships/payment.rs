use super::domain::{Compensation, PartnershipMetrics, PaymentBreakdown};

/// Processing fee rate reported on every payment breakdown. The fee is
/// informational only and is not withheld from the payable amount.
const PROCESSING_FEE_RATE: f64 = 0.029;

/// Computes payable amounts from a contract's compensation terms and the
/// campaign metrics accumulated on a partnership.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCalculator;

impl PaymentCalculator {
    /// Base amount plus every threshold bonus the metrics satisfy. Bonuses
    /// are additive and only apply to performance-linked compensation.
    pub fn breakdown(
        &self,
        compensation: &Compensation,
        metrics: &PartnershipMetrics,
    ) -> PaymentBreakdown {
        let performance_bonus = if compensation.kind.earns_bonus() {
            self.performance_bonus(compensation, metrics)
        } else {
            0.0
        };
        let base_amount = compensation.base_amount;
        PaymentBreakdown {
            base_amount,
            performance_bonus,
            processing_fee: (base_amount + performance_bonus) * PROCESSING_FEE_RATE,
        }
    }

    pub fn total(&self, breakdown: &PaymentBreakdown) -> f64 {
        breakdown.base_amount + breakdown.performance_bonus
    }

    fn performance_bonus(&self, compensation: &Compensation, metrics: &PartnershipMetrics) -> f64 {
        let rules = &compensation.performance_bonus;
        let mut bonus = 0.0;
        if let Some(threshold) = rules.reach_threshold {
            if metrics.reach >= threshold {
                bonus += rules.reach_bonus;
            }
        }
        if let Some(threshold) = rules.engagement_threshold {
            if metrics.engagement >= threshold {
                bonus += rules.engagement_bonus;
            }
        }
        if let Some(threshold) = rules.conversion_threshold {
            if metrics.conversions >= threshold {
                bonus += rules.conversion_bonus;
            }
        }
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partnerships::domain::{CompensationKind, PerformanceBonus};

    fn hybrid(base: f64) -> Compensation {
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

    #[test]
    fn base_plus_every_satisfied_threshold() {
        let metrics = PartnershipMetrics {
            reach: 12_000,
            engagement: 950,
            conversions: 60,
            revenue: 0.0,
        };
        let calculator = PaymentCalculator;
        let breakdown = calculator.breakdown(&hybrid(1_000.0), &metrics);
        assert_eq!(breakdown.base_amount, 1_000.0);
        assert_eq!(breakdown.performance_bonus, 500.0);
        assert_eq!(calculator.total(&breakdown), 1_500.0);
    }

    #[test]
    fn exact_threshold_counts_as_met() {
        let metrics = PartnershipMetrics {
            reach: 10_000,
            engagement: 0,
            conversions: 0,
            revenue: 0.0,
        };
        let breakdown = PaymentCalculator.breakdown(&hybrid(1_000.0), &metrics);
        assert_eq!(breakdown.performance_bonus, 200.0);
    }

    #[test]
    fn fixed_compensation_never_earns_bonuses() {
        let metrics = PartnershipMetrics {
            reach: 1_000_000,
            engagement: 50_000,
            conversions: 5_000,
            revenue: 0.0,
        };
        let mut compensation = hybrid(800.0);
        compensation.kind = CompensationKind::Fixed;
        let calculator = PaymentCalculator;
        let breakdown = calculator.breakdown(&compensation, &metrics);
        assert_eq!(breakdown.performance_bonus, 0.0);
        assert_eq!(calculator.total(&breakdown), 800.0);
    }

    #[test]
    fn fee_is_reported_but_never_deducted() {
        let metrics = PartnershipMetrics::default();
        let calculator = PaymentCalculator;
        let breakdown = calculator.breakdown(&hybrid(1_000.0), &metrics);
        assert!((breakdown.processing_fee - 29.0).abs() < f64::EPSILON);
        assert_eq!(calculator.total(&breakdown), 1_000.0);
    }
}

use crate::infra::{InMemoryStore, LoggingEventPublisher};
use chrono::{Duration, Utc};
use clap::Args;
use collabnet::config::EngineConfig;
use collabnet::error::AppError;
use collabnet::matching::{
    Availability, CollaborationPreferences, CollaboratorId, CollaboratorProfile,
    CompatibilityScorer, ExperienceLevel, ReputationAction, ReputationLedger,
};
use collabnet::partnerships::{
    AnalyticsAggregator, Campaign, Compensation, CompensationKind, ContractParty, ContractSpec,
    DeliverableMetrics, DeliverableSubmission, ManualSettlementQueue, PartnershipService,
    PerformanceBonus, ProposalContent, ProposalDecision, Timeline,
};
use collabnet::repository::ProfileRepository;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Base compensation for the demo contract, in USD.
    #[arg(long, default_value_t = 1000.0)]
    pub(crate) base_amount: f64,
    /// Contract template to build the demo agreement from.
    #[arg(long, default_value = "music_promotion")]
    pub(crate) template: String,
    /// Skip the analytics rollup at the end of the demo.
    #[arg(long)]
    pub(crate) skip_analytics: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        base_amount,
        template,
        skip_analytics,
    } = args;

    println!("Partnership lifecycle demo");

    let store = Arc::new(InMemoryStore::default());
    let events = Arc::new(LoggingEventPublisher);
    let settlements = Arc::new(ManualSettlementQueue::new());
    let config = EngineConfig {
        settlement_delay_secs: 0,
    };
    let service = PartnershipService::new(
        store.clone(),
        events.clone(),
        settlements.clone(),
        &config,
    );
    let ledger = ReputationLedger::new(store.clone(), events);

    let artist = demo_profile("artist-demo", "Nova Reyes", &["pop", "indie"], &["vocals"]);
    let creator = demo_profile(
        "creator-demo",
        "Jordan Vale",
        &["pop", "electronic"],
        &["video production"],
    );
    ProfileRepository::insert(store.as_ref(), artist.clone())?;
    ProfileRepository::insert(store.as_ref(), creator.clone())?;
    println!(
        "- Registered {} and {}",
        artist.display_name, creator.display_name
    );

    let result = CompatibilityScorer::new().score(&artist, &creator);
    println!(
        "\nCompatibility: {}/100 ({})",
        result.total_score,
        result.recommendation.label()
    );
    for factor in &result.factors {
        println!(
            "  - {}: {:.0} (weight {:.2})",
            factor.factor.label(),
            factor.score,
            factor.weight
        );
    }

    let now = Utc::now();
    let partnership = service.create_partnership(
        artist.id.clone(),
        creator.id.clone(),
        Campaign {
            name: "Single launch".to_string(),
            campaign_type: "music_promotion".to_string(),
            objectives: vec!["reach".to_string(), "engagement".to_string()],
        },
        ContractSpec {
            template_id: template,
            custom_terms: BTreeMap::new(),
            deliverables: vec!["short_video".to_string(), "story_post".to_string()],
            timeline: Timeline {
                start_date: now,
                end_date: now + Duration::days(30),
            },
            compensation: Compensation {
                kind: CompensationKind::Hybrid,
                base_amount,
                performance_bonus: PerformanceBonus {
                    reach_threshold: Some(10_000),
                    reach_bonus: 200.0,
                    engagement_threshold: Some(1_000),
                    engagement_bonus: 150.0,
                    conversion_threshold: None,
                    conversion_bonus: 0.0,
                },
                revenue_share_percentage: 0.0,
            },
            exclusivity: "non-exclusive".to_string(),
            usage_rights: String::new(),
        },
    )?;
    println!(
        "\nPartnership {} created ({})",
        partnership.id.0,
        partnership.status.label()
    );

    let proposal = service.send_proposal(
        &partnership.id,
        ProposalContent {
            subject: "Single launch collaboration".to_string(),
            message: "Two short-form videos over the launch month.".to_string(),
            deadline: None,
        },
    )?;
    println!("- Proposal {} sent", proposal.id.0);

    service.respond_to_proposal(
        &partnership.id,
        ProposalDecision::Accepted,
        "Looking forward to it.".to_string(),
    )?;
    let contract = service.get_contract(&partnership.id)?;
    println!(
        "- Accepted; contract {} drafted with {} terms",
        contract.id.0,
        contract.terms.len()
    );
    for (key, value) in &contract.terms {
        println!("    {key}: {value}");
    }

    service.sign_contract(&partnership.id, ContractParty::Initiator)?;
    let contract = service.sign_contract(&partnership.id, ContractParty::Counterparty)?;
    println!("- Contract executed ({})", contract.status.label());

    for (kind, title, reach) in [
        ("short_video", "Launch teaser", 7_000),
        ("story_post", "Behind the scenes", 6_500),
    ] {
        let deliverable = service.submit_deliverable(
            &partnership.id,
            DeliverableSubmission {
                kind: kind.to_string(),
                title: title.to_string(),
                description: String::new(),
                url: None,
                platform: "instagram".to_string(),
                published_at: Utc::now(),
                metrics: DeliverableMetrics {
                    views: reach + 2_000,
                    likes: 600,
                    comments: 40,
                    shares: 25,
                    reach,
                    impressions: reach + 3_000,
                },
            },
        )?;
        let progress = service.approve_deliverable(&partnership.id, &deliverable.id, None)?;
        println!(
            "- Approved {title}: {}/{} deliverables done",
            progress.approved, progress.required
        );
    }

    let partnership = service.get(&partnership.id)?;
    println!(
        "\nPayment initiated ({}); campaign reach {}, engagement {}",
        partnership.status.label(),
        partnership.metrics.reach,
        partnership.metrics.engagement
    );

    for task in settlements.drain() {
        let payment = service.complete_payment(&task.partnership_id)?;
        println!(
            "- Settled {} to {}: {:.2} {} (base {:.2} + bonus {:.2}, fee {:.2})",
            payment.id.0,
            payment.payee_id.0,
            payment.amount,
            payment.currency,
            payment.breakdown.base_amount,
            payment.breakdown.performance_bonus,
            payment.breakdown.processing_fee
        );
    }
    let partnership = service.get(&partnership.id)?;
    println!("- Partnership {}", partnership.status.label());

    if let Some(score) = ledger.adjust(&creator.id, ReputationAction::ProjectCompleted, None) {
        println!("\nReputation: {} now at {score} points", creator.id.0);
        for badge in ledger.achievements(&creator.id) {
            println!("  - achievement unlocked: {badge}");
        }
    }

    if skip_analytics {
        return Ok(());
    }

    let analytics = AnalyticsAggregator::new(store);
    let summary = analytics.aggregate(&artist.id, Duration::days(30), Utc::now())?;
    println!("\nAnalytics (last {} days)", summary.window_days);
    println!(
        "- {} partnerships ({} completed) | spend {:.2} | reach {}",
        summary.partnerships.total,
        summary.partnerships.completed,
        summary.financial.total_spent,
        summary.performance.total_reach
    );
    for (platform, stats) in &summary.platforms {
        println!(
            "  - {platform}: {} deliverables | reach {} | engagement {}",
            stats.count, stats.reach, stats.engagement
        );
    }

    Ok(())
}

fn demo_profile(
    id: &str,
    name: &str,
    genres: &[&str],
    skills: &[&str],
) -> CollaboratorProfile {
    CollaboratorProfile {
        id: CollaboratorId(id.to_string()),
        display_name: name.to_string(),
        location: "Austin".to_string(),
        genres: genres.iter().map(|genre| genre.to_string()).collect(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        experience: ExperienceLevel::Intermediate,
        availability: Availability::PartTime,
        preferences: CollaborationPreferences::default(),
        reputation: 0,
        completed_partnerships: 0,
        active: true,
        created_at: Utc::now(),
    }
}

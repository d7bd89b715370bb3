use crate::infra::{
    default_credit_engine, InMemoryAssessmentRepository, InMemoryInvoiceRepository,
    InMemoryPolicyRepository,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use finsight::error::AppError;
use finsight::scoring::credit::{InvoiceScoringService, InvoiceSubmission, LineItem};
use finsight::scoring::insurance::{
    AssessmentPreferences, BusinessAssessment, InsuranceAdvisorService, NewPolicy, StaticCatalog,
    DEFAULT_REMINDER_WINDOW_DAYS,
};
use finsight::scoring::UserId;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// User identifier the demo data is recorded under.
    #[arg(long, default_value = "demo-msme")]
    pub(crate) user: String,
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the insurance portion of the demo.
    #[arg(long)]
    pub(crate) skip_insurance: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        user,
        today,
        skip_insurance,
    } = args;

    let user = UserId(user);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Credit scoring demo");
    let credit = InvoiceScoringService::new(
        Arc::new(InMemoryInvoiceRepository::default()),
        Arc::new(default_credit_engine()),
    );

    for submission in demo_invoices(today) {
        let number = submission.invoice_number.clone();
        match credit.record_invoice(user.clone(), submission) {
            Ok(recorded) => {
                println!(
                    "- Recorded {} -> score {:.2} ({})",
                    number,
                    recorded.record.credit_score,
                    recorded.record.credit_score_data.score_category.label()
                );
                for (factor, breakdown) in &recorded.record.credit_score_data.factor_breakdown {
                    println!(
                        "    {}: {:.1} weighted {:.1} ({})",
                        factor.label(),
                        breakdown.individual_score,
                        breakdown.weighted_score,
                        breakdown.comment
                    );
                }
            }
            Err(err) => println!("- Submission {} rejected: {}", number, err),
        }
    }

    match credit.dashboard(&user) {
        Ok(dashboard) => println!(
            "Dashboard: {:.1} ({}) across {} invoices",
            dashboard.credit_score, dashboard.category, dashboard.total_invoices
        ),
        Err(err) => println!("Dashboard unavailable: {}", err),
    }

    if skip_insurance {
        return Ok(());
    }

    println!("\nInsurance advisory demo");
    let insurance = InsuranceAdvisorService::new(
        Arc::new(StaticCatalog::standard()),
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryPolicyRepository::default()),
    );

    let outcome = match insurance.assess(user.clone(), demo_assessment()) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("Assessment rejected: {}", err);
            return Ok(());
        }
    };

    let profile = &outcome.record.profile;
    println!(
        "Risk score {} ({}) for a {} business with assets ₹{:.0}",
        profile.risk_score,
        profile.risk_level.label(),
        profile.business_size.label(),
        profile.asset_total
    );
    for component in &profile.components {
        println!(
            "  - {}: +{} ({})",
            component.factor.label(),
            component.score,
            component.notes
        );
    }

    if !outcome.record.priority_risks.is_empty() {
        println!("Priority risks:");
        for risk in &outcome.record.priority_risks {
            println!("  - {} (severity {})", risk.concern, risk.severity);
        }
    }

    println!("Recommendations:");
    for offer in &outcome.record.recommendations {
        println!(
            "  - {} by {} | match {} | premium ≈ ₹{:.0} | {}",
            offer.policy_name, offer.provider, offer.match_score, offer.premium_estimate,
            offer.compliance_badge
        );
        println!("    {}", offer.reason);
    }

    let policy = NewPolicy {
        policy_name: "Fire & Theft Insurance".to_string(),
        provider: "Oriental Insurance".to_string(),
        policy_type: "asset_protection".to_string(),
        premium: 10_000.0,
        coverage: 1_500_000.0,
        start_date: today - Duration::days(330),
        expiry_date: today + Duration::days(35),
    };
    match insurance.add_policy(user.clone(), policy) {
        Ok(stored) => println!(
            "\nTracked policy {} expiring {} (renewal from {})",
            stored.policy_name, stored.expiry_date, stored.renewal_date
        ),
        Err(err) => println!("\nPolicy tracking rejected: {}", err),
    }

    match insurance.reminders(&user, today, DEFAULT_REMINDER_WINDOW_DAYS) {
        Ok(due) => {
            println!("Renewal reminders:");
            for view in due {
                println!(
                    "  - {} in {} days ({})",
                    view.policy.policy_name,
                    view.days_to_expiry,
                    view.renewal_status.label()
                );
            }
        }
        Err(err) => println!("Reminders unavailable: {}", err),
    }

    Ok(())
}

fn demo_invoices(today: NaiveDate) -> Vec<InvoiceSubmission> {
    vec![
        InvoiceSubmission {
            invoice_number: "INV-2025-001".to_string(),
            client: "Meridian Traders".to_string(),
            date: Some(today - Duration::days(45)),
            payment_terms: Some("NET 30".to_string()),
            industry: Some("retail".to_string()),
            total_amount: 118_000.0,
            currency: Some("INR".to_string()),
            tax_amount: 18_000.0,
            extra_charges: 0.0,
            line_items: vec![LineItem {
                description: "Wholesale stock".to_string(),
                amount: 100_000.0,
            }],
        },
        InvoiceSubmission {
            invoice_number: "INV-2025-002".to_string(),
            client: "Sunrise Hospitality".to_string(),
            date: Some(today - Duration::days(10)),
            payment_terms: Some("NET 45".to_string()),
            industry: Some("hospitality".to_string()),
            total_amount: 59_000.0,
            currency: None,
            tax_amount: 0.0,
            extra_charges: 0.0,
            line_items: vec![
                LineItem {
                    description: "Catering services".to_string(),
                    amount: 40_000.0,
                },
                LineItem {
                    description: "Event staffing".to_string(),
                    amount: 10_000.0,
                },
            ],
        },
    ]
}

fn demo_assessment() -> BusinessAssessment {
    let mut assets = BTreeMap::new();
    assets.insert("inventory".to_string(), 800_000.0);
    assets.insert("equipment".to_string(), 400_000.0);
    BusinessAssessment {
        business_type: "retail".to_string(),
        industry: Some("retail".to_string()),
        employee_count: 15,
        assets,
        primary_concerns: vec!["fire".to_string(), "theft".to_string()],
        preferences: AssessmentPreferences {
            focus: Some("fire".to_string()),
            budget_level: Some("standard".to_string()),
        },
    }
}

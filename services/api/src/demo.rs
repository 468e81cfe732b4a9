use crate::infra::{
    format_usd, parse_date, InMemoryCampaignRepository, InMemoryLeadRepository, InMemoryNotifier,
    InMemoryProfessionalRepository, InMemoryTicketRepository,
};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::Args;
use cleanmatch::error::AppError;
use cleanmatch::marketplace::billing::{Discount, DiscountTerms, PaymentMethod};
use cleanmatch::marketplace::leads::{
    LeadRequest, LeadService, LeadServiceError, MeritRewards, ServiceType,
};
use cleanmatch::marketplace::merit::next_level_threshold;
use cleanmatch::marketplace::professionals::{
    ProfessionalProfile, ProfessionalService, ProfessionalServiceError, RegistrationSubmission,
    VerificationStatus,
};
use cleanmatch::marketplace::roster::RosterImporter;
use cleanmatch::marketplace::support::{SupportDesk, SupportError};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the support desk portion of the demo.
    #[arg(long)]
    pub(crate) skip_support: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterImportArgs {
    /// Roster CSV export to onboard
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Mark every imported professional as verified
    #[arg(long)]
    pub(crate) verify: bool,
    /// Print the ranked directory for this ZIP after the import
    #[arg(long)]
    pub(crate) zip: Option<String>,
}

type DemoProfessionals = ProfessionalService<
    InMemoryProfessionalRepository,
    InMemoryCampaignRepository,
    InMemoryNotifier,
>;
type DemoLeads =
    LeadService<InMemoryLeadRepository, InMemoryProfessionalRepository, InMemoryNotifier>;

/// Anything the scripted walkthrough can trip over.
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Professional(#[from] ProfessionalServiceError),
    #[error(transparent)]
    Lead(#[from] LeadServiceError),
    #[error(transparent)]
    Support(#[from] SupportError),
}

fn build_services() -> (Arc<DemoProfessionals>, DemoLeads, Arc<InMemoryNotifier>) {
    let profiles = Arc::new(InMemoryProfessionalRepository::default());
    let campaigns = Arc::new(InMemoryCampaignRepository::default());
    let lead_store = Arc::new(InMemoryLeadRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());

    let professionals = Arc::new(ProfessionalService::new(
        profiles.clone(),
        campaigns,
        notifier.clone(),
    ));
    let leads = LeadService::new(
        lead_store,
        profiles,
        notifier.clone(),
        MeritRewards::default(),
    );

    (professionals, leads, notifier)
}

pub(crate) fn run_roster_import(args: RosterImportArgs) -> Result<(), AppError> {
    let RosterImportArgs { csv, verify, zip } = args;

    let import = RosterImporter::from_path(csv)?;
    let (professionals, _, _) = build_services();

    let mut registered = 0usize;
    let mut rejected = 0usize;
    for entry in import.entries {
        let stored = match professionals.register(entry.submission) {
            Ok(stored) => stored,
            Err(err) => {
                println!("- row rejected: {err}");
                rejected += 1;
                continue;
            }
        };
        if let Some(rating) = entry.rating {
            if let Err(err) = professionals.set_rating(&stored.professional_id, rating) {
                println!("- rating skipped for {}: {err}", stored.full_name);
            }
        }
        if verify {
            if let Err(err) =
                professionals.moderate(&stored.professional_id, VerificationStatus::Verified)
            {
                println!("- verification skipped for {}: {err}", stored.full_name);
            }
        }
        registered += 1;
    }

    println!(
        "Roster import: {registered} registered, {rejected} rejected, {} skipped at parse time",
        import.skipped_rows
    );

    if let Some(zip) = zip {
        match professionals.search(zip.trim()) {
            Ok(results) => {
                println!("\nDirectory for {zip} ({} match(es))", results.len());
                for profile in &results {
                    print_directory_line(profile);
                }
            }
            Err(err) => println!("Directory unavailable: {err}"),
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, skip_support } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    if let Err(err) = demo_scenario(today, skip_support) {
        println!("Demo aborted: {err}");
    }

    Ok(())
}

fn demo_scenario(today: NaiveDate, skip_support: bool) -> Result<(), DemoError> {
    let now = Utc::now();

    println!("CleanMatch marketplace demo (evaluated {today})");

    let (professionals, leads, notifier) = build_services();

    println!("\nRegistration and moderation");
    let mesa = professionals.register(crew("Mesa Verde Cleaning", "94103", 15))?;
    let harbor = professionals.register(crew("Harbor Shine", "94110", 10))?;
    let pending = professionals.register(crew("Dust Bunnies Collective", "94103", 25))?;

    for (id, rating) in [(&mesa.professional_id, 4.6), (&harbor.professional_id, 4.9)] {
        professionals.moderate(id, VerificationStatus::Verified)?;
        professionals.set_rating(id, rating)?;
    }
    println!("- {} -> verified", mesa.full_name);
    println!("- {} -> verified", harbor.full_name);
    println!("- {} -> pending review", pending.full_name);

    println!("\nMerit seeding");
    let seeded =
        professionals.adjust_points(&mesa.professional_id, 295, "onboarding training", None, now)?;
    let threshold_note = match next_level_threshold(seeded.profile.level()) {
        Some(threshold) => format!("{} points to next tier", threshold - seeded.profile.points),
        None => "top tier".to_string(),
    };
    println!(
        "- {}: {} points, {} ({threshold_note})",
        seeded.profile.full_name,
        seeded.profile.points,
        seeded.profile.level().label()
    );

    println!("\nSubscriptions");
    let mesa_sub =
        professionals.pay_subscription(&mesa.professional_id, PaymentMethod::CreditCard, None, today)?;
    println!(
        "- {}: {} on {} ({})",
        mesa.full_name,
        format_usd(mesa_sub.last_payment_cents),
        mesa_sub.plan.label(),
        mesa_sub
            .billing_history
            .last()
            .map(|record| record.status.label())
            .unwrap_or("paid")
    );

    professionals.pay_subscription(
        &harbor.professional_id,
        PaymentMethod::BankTransfer,
        None,
        today,
    )?;
    professionals.grant_discount(
        &harbor.professional_id,
        Discount {
            terms: DiscountTerms::FullExemption,
            description: "founders program exemption".to_string(),
            starts_on: today,
            ends_on: today + Duration::days(90),
        },
    )?;
    let harbor_renewal = professionals.pay_subscription(
        &harbor.professional_id,
        PaymentMethod::BankTransfer,
        None,
        today + Duration::days(30),
    )?;
    println!(
        "- {}: {} renewal ({})",
        harbor.full_name,
        format_usd(harbor_renewal.last_payment_cents),
        harbor_renewal
            .billing_history
            .last()
            .map(|record| record.status.label())
            .unwrap_or("paid")
    );

    println!("\nDirectory search for 94110");
    for profile in &professionals.search("94110")? {
        print_directory_line(profile);
    }

    println!("\nLead flow");
    let lead = leads.submit(
        LeadRequest {
            client_name: "Dana Whitfield".to_string(),
            client_email: "dana@example.com".to_string(),
            zip_code: "94110".to_string(),
            service_type: ServiceType::Deep,
            bedrooms: 3,
            bathrooms: 2,
            requested_date: today + Duration::days(7),
        },
        now,
    )?;
    println!(
        "- Lead {} ({} clean, {}bd/{}ba in {})",
        lead.lead_id.0,
        lead.request.service_type.label(),
        lead.request.bedrooms,
        lead.request.bathrooms,
        lead.request.zip_code
    );

    let eligible = leads.eligible_professionals(&lead.lead_id)?;
    println!("- Broadcast to {} eligible crew(s)", eligible.len());

    let acceptance = leads.accept(&lead.lead_id, &mesa.professional_id, now)?;
    match acceptance.transition {
        Some(transition) => println!(
            "- {} accepted -> {} points, {} ({} from {})",
            acceptance.professional.full_name,
            acceptance.professional.points,
            acceptance.professional.level().label(),
            transition.direction_label(),
            transition.from.label()
        ),
        None => println!(
            "- {} accepted -> {} points",
            acceptance.professional.full_name, acceptance.professional.points
        ),
    }

    let completed = leads.complete(&lead.lead_id, &mesa.professional_id)?;
    println!(
        "- Lead {} -> {}",
        completed.lead_id.0,
        completed.status.label()
    );

    println!("\nPromo rollover (read 70 days later)");
    match professionals.subscription_status(&mesa.professional_id, today + Duration::days(70))? {
        Some(subscription) => println!(
            "- {}: {} at {}/mo",
            mesa.full_name,
            subscription.plan.label(),
            format_usd(subscription.plan.monthly_rate_cents())
        ),
        None => println!("- {}: no subscription on file", mesa.full_name),
    }

    if !skip_support {
        println!("\nSupport desk");
        let desk = SupportDesk::new(Arc::new(InMemoryTicketRepository::default()));
        let ticket = desk.open(
            Some(harbor.professional_id.clone()),
            "Billing question",
            "Why was my renewal exempted?",
            now,
        )?;
        println!("- Opened {} ({})", ticket.ticket_id.0, ticket.subject);
        let resolved = desk.resolve(&ticket.ticket_id, now)?;
        println!("- Resolved {}", resolved.ticket_id.0);
    }

    println!("\nNotification log");
    let events = notifier.events();
    if events.is_empty() {
        println!("- none dispatched");
    } else {
        for notice in events {
            let details = notice
                .details
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            if details.is_empty() {
                println!("- {} -> {}", notice.template, notice.professional_id.0);
            } else {
                println!(
                    "- {} -> {} ({details})",
                    notice.template, notice.professional_id.0
                );
            }
        }
    }

    Ok(())
}

fn crew(name: &str, base_zip: &str, radius: u32) -> RegistrationSubmission {
    RegistrationSubmission {
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        phone: "555-0100".to_string(),
        base_zip: base_zip.to_string(),
        service_radius_miles: radius,
        zip_codes: Vec::new(),
    }
}

fn print_directory_line(profile: &ProfessionalProfile) {
    println!(
        "- {} | {} | {} points | rating {:.1} | {}",
        profile.full_name,
        profile.level().label(),
        profile.points,
        profile.rating,
        profile.verification.label()
    );
}

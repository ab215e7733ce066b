use crate::infra::parse_date;
use chrono::{NaiveDate, Utc};
use clap::Args;
use contact_enrichment::config::AppConfig;
use contact_enrichment::error::AppError;
use contact_enrichment::telemetry;
use contact_enrichment::workflows::enrichment::{
    plan_for_fields, ContactEnrichmentService, EnrichmentOutcome, EnrichmentPlan,
    HubSpotContactStore, ReferenceData,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EnrichArgs {
    /// CRM contact id to enrich
    #[arg(long)]
    pub(crate) contact_id: String,
    /// Date stamped into the enrichment note (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Contact email address
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Contact job title
    #[arg(long)]
    pub(crate) job_title: Option<String>,
    /// Date stamped into the enrichment note (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_enrich(args: EnrichArgs) -> Result<(), AppError> {
    let EnrichArgs { contact_id, today } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let reference = Arc::new(ReferenceData::load(&config.reference_data)?);
    let store = Arc::new(HubSpotContactStore::new(
        &config.crm.base_url,
        config.crm.require_access_token()?,
        config.crm.timeout,
    )?);
    let service = ContactEnrichmentService::new(store.clone(), store, reference);

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = service.enrich_contact_on(Some(&contact_id), today).await;
    render_outcome(&contact_id, &outcome);

    outcome_result(outcome)
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let PreviewArgs {
        email,
        job_title,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let reference = ReferenceData::load(&config.reference_data)?;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());

    let plan = plan_for_fields(email.as_deref(), job_title.as_deref(), &reference, today);
    render_plan(&plan);

    Ok(())
}

/// Invalid input and failures surface as errors so the process exits non-zero.
fn outcome_result(outcome: EnrichmentOutcome) -> Result<(), AppError> {
    match outcome {
        EnrichmentOutcome::InvalidInput => {
            Err(AppError::Enrichment("Contact ID is required".to_string()))
        }
        EnrichmentOutcome::Failure { message } => Err(AppError::Enrichment(message)),
        EnrichmentOutcome::NoEnrichmentFound { .. } | EnrichmentOutcome::Enriched { .. } => {
            Ok(())
        }
    }
}

fn render_outcome(contact_id: &str, outcome: &EnrichmentOutcome) {
    match outcome {
        EnrichmentOutcome::InvalidInput => println!("Contact ID is required"),
        EnrichmentOutcome::NoEnrichmentFound { domain } => {
            println!("No enrichment data found for contact {contact_id}");
            println!("Domain: {}", domain.as_deref().unwrap_or("(none)"));
        }
        EnrichmentOutcome::Enriched { updates, summary } => {
            println!("Contact {contact_id} enriched successfully");
            for (property, value) in updates.properties() {
                println!("- {property}: {value}");
            }
            println!("{}", summary.enrichment_note);
        }
        EnrichmentOutcome::Failure { message } => {
            println!("Enrichment failed for contact {contact_id}: {message}");
        }
    }
}

fn render_plan(plan: &EnrichmentPlan) {
    println!("Enrichment preview");
    println!("Domain: {}", plan.domain.as_deref().unwrap_or("(none)"));

    if plan.has_updates() {
        println!("\nFields that would be written");
        for (property, value) in plan.updates.properties() {
            println!("- {property}: {value}");
        }
    } else {
        println!("\nFields that would be written: none");
    }

    println!("\n{}", plan.note);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_enrichment::workflows::enrichment::{ContactUpdates, EnrichmentSummary};

    #[test]
    fn failed_outcomes_become_errors() {
        let error = outcome_result(EnrichmentOutcome::Failure {
            message: "contact not found".to_string(),
        })
        .expect_err("failure is an error");
        assert_eq!(error.to_string(), "enrichment failed: contact not found");

        assert!(matches!(
            outcome_result(EnrichmentOutcome::InvalidInput),
            Err(AppError::Enrichment(_))
        ));
    }

    #[test]
    fn preview_installs_logging_and_plans_offline() {
        let args = PreviewArgs {
            email: Some("jane@acme.com".to_string()),
            job_title: Some("Director of Sales".to_string()),
            today: NaiveDate::from_ymd_opt(2025, 3, 14),
        };
        run_preview(args).expect("preview runs");
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn completed_outcomes_succeed() {
        assert!(outcome_result(EnrichmentOutcome::NoEnrichmentFound { domain: None }).is_ok());
        assert!(outcome_result(EnrichmentOutcome::Enriched {
            updates: ContactUpdates::default(),
            summary: EnrichmentSummary {
                seniority: None,
                department: None,
                company_size: None,
                enrichment_note: "Enriched on 2025-03-14.".to_string(),
            },
        })
        .is_ok());
    }
}

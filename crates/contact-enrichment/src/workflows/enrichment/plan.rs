use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{ContactRecord, ContactUpdates, EnrichmentSummary, TitleClassification};
use super::email::extract_domain;
use super::reference::ReferenceData;

const UNKNOWN: &str = "Unknown";

/// Everything inferred for one contact, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentPlan {
    pub domain: Option<String>,
    pub updates: ContactUpdates,
    pub classification: Option<TitleClassification>,
    pub company_size: Option<String>,
    pub note: String,
}

impl EnrichmentPlan {
    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }

    pub fn summary(&self) -> EnrichmentSummary {
        EnrichmentSummary {
            seniority: self
                .classification
                .as_ref()
                .map(|classification| classification.seniority.clone()),
            department: self
                .classification
                .as_ref()
                .map(|classification| classification.department.clone()),
            company_size: self.company_size.clone(),
            enrichment_note: self.note.clone(),
        }
    }
}

/// Runs domain extraction, company resolution, and title classification for a
/// contact and merges the results.
pub fn plan_enrichment(
    record: &ContactRecord,
    reference: &ReferenceData,
    today: NaiveDate,
) -> EnrichmentPlan {
    plan_for_fields(
        record.email.as_deref(),
        record.jobtitle.as_deref(),
        reference,
        today,
    )
}

/// Same as [`plan_enrichment`] for callers holding raw field values.
pub fn plan_for_fields(
    email: Option<&str>,
    job_title: Option<&str>,
    reference: &ReferenceData,
    today: NaiveDate,
) -> EnrichmentPlan {
    let domain = extract_domain(email);
    let company = reference.companies.resolve(domain.as_deref());
    let classification = reference.patterns.classify(job_title);

    let updates = ContactUpdates::from_company(&company);
    let note = enrichment_note(today, classification.as_ref(), company.size.as_deref());

    EnrichmentPlan {
        domain,
        updates,
        classification,
        company_size: company.size,
        note,
    }
}

/// `Enriched on YYYY-MM-DD. Seniority: .., Department: .., Company Size: ..`
pub fn enrichment_note(
    today: NaiveDate,
    classification: Option<&TitleClassification>,
    company_size: Option<&str>,
) -> String {
    let seniority = classification.map_or(UNKNOWN, |c| c.seniority.as_str());
    let department = classification.map_or(UNKNOWN, |c| c.department.as_str());
    let company_size = company_size.unwrap_or(UNKNOWN);

    format!(
        "Enriched on {}. Seniority: {}, Department: {}, Company Size: {}",
        today.format("%Y-%m-%d"),
        seniority,
        department,
        company_size
    )
}

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ContactId, ContactUpdates, EnrichmentSummary};
use super::plan::plan_enrichment;
use super::reference::ReferenceData;
use super::store::{ContactReader, ContactWriter};

/// Result of a single enrichment request, as handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// No usable contact id was supplied; nothing was fetched.
    InvalidInput,
    /// The contact was read but the reference data had nothing to write.
    NoEnrichmentFound { domain: Option<String> },
    /// Company fields were written back to the contact.
    Enriched {
        updates: ContactUpdates,
        summary: EnrichmentSummary,
    },
    /// The contact store failed during fetch or update.
    Failure { message: String },
}

/// Reads a contact, infers its attributes, and writes back company fields.
pub struct ContactEnrichmentService<R, W> {
    reader: Arc<R>,
    writer: Arc<W>,
    reference: Arc<ReferenceData>,
}

impl<R, W> Clone for ContactEnrichmentService<R, W> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
            reference: self.reference.clone(),
        }
    }
}

impl<R, W> ContactEnrichmentService<R, W>
where
    R: ContactReader + 'static,
    W: ContactWriter + 'static,
{
    pub fn new(reader: Arc<R>, writer: Arc<W>, reference: Arc<ReferenceData>) -> Self {
        Self {
            reader,
            writer,
            reference,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Enriches a contact, stamping the note with today's UTC date.
    pub async fn enrich_contact(&self, contact_id: Option<&str>) -> EnrichmentOutcome {
        self.enrich_contact_on(contact_id, Utc::now().date_naive())
            .await
    }

    /// Enriches a contact: one read, then at most one write.
    pub async fn enrich_contact_on(
        &self,
        contact_id: Option<&str>,
        today: NaiveDate,
    ) -> EnrichmentOutcome {
        let Some(contact_id) = ContactId::parse(contact_id) else {
            return EnrichmentOutcome::InvalidInput;
        };

        let record = match self.reader.get_by_id(&contact_id).await {
            Ok(record) => record,
            Err(err) => {
                warn!(%contact_id, error = %err, "contact fetch failed");
                return EnrichmentOutcome::Failure {
                    message: err.to_string(),
                };
            }
        };

        let plan = plan_enrichment(&record, &self.reference, today);
        if !plan.has_updates() {
            info!(%contact_id, domain = ?plan.domain, "no enrichment data found");
            return EnrichmentOutcome::NoEnrichmentFound {
                domain: plan.domain,
            };
        }

        if let Err(err) = self.writer.update(&contact_id, &plan.updates).await {
            warn!(%contact_id, error = %err, "contact update failed");
            return EnrichmentOutcome::Failure {
                message: err.to_string(),
            };
        }

        info!(
            %contact_id,
            fields = plan.updates.properties().len(),
            "contact enriched"
        );
        let summary = plan.summary();
        EnrichmentOutcome::Enriched {
            updates: plan.updates,
            summary,
        }
    }
}

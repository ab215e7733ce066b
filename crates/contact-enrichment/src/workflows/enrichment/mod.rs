//! Contact enrichment pipeline.
//!
//! Email domain extraction, company lookup, and job-title classification are
//! total functions over read-only reference tables. Only the contact store
//! adapters can fail; the service folds their errors into a single
//! [`EnrichmentOutcome::Failure`].

pub mod companies;
pub mod domain;
pub mod email;
pub mod hubspot;
pub mod plan;
pub mod reference;
pub mod router;
pub mod service;
pub mod store;
pub mod titles;

#[cfg(test)]
mod tests;

pub use companies::CompanyTable;
pub use domain::{
    CompanyProfile, ContactId, ContactRecord, ContactUpdates, EnrichmentSummary,
    TitleClassification, CONTACT_PROPERTIES,
};
pub use email::extract_domain;
pub use hubspot::HubSpotContactStore;
pub use plan::{enrichment_note, plan_enrichment, plan_for_fields, EnrichmentPlan};
pub use reference::{ReferenceData, ReferenceDataError};
pub use router::{enrichment_router, outcome_response};
pub use service::{ContactEnrichmentService, EnrichmentOutcome};
pub use store::{ContactReader, ContactWriter, StoreError};
pub use titles::{PatternTable, TitlePattern};

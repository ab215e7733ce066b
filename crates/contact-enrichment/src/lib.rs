//! Contact enrichment: infers company profile, seniority, and department for a
//! CRM contact from its email domain and job title, then writes the company
//! fields back to the contact store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::enrichment::companies::CompanyTable;
use crate::workflows::enrichment::domain::{
    CompanyProfile, ContactId, ContactRecord, ContactUpdates,
};
use crate::workflows::enrichment::reference::ReferenceData;
use crate::workflows::enrichment::service::ContactEnrichmentService;
use crate::workflows::enrichment::store::{ContactReader, ContactWriter, StoreError};
use crate::workflows::enrichment::titles::{PatternTable, TitlePattern};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

pub(super) fn reference() -> ReferenceData {
    let mut companies = CompanyTable::new();
    companies.insert(
        "acme.com",
        CompanyProfile {
            name: Some("Acme Corp".to_string()),
            industry: Some("Tech".to_string()),
            size: Some("201-500".to_string()),
            location: Some("San Francisco, CA".to_string()),
        },
    );
    let patterns = PatternTable::new(vec![
        TitlePattern::new(["vp", "vice president"], "VP", "Leadership"),
        TitlePattern::new(["sales"], "Individual Contributor", "Sales"),
        TitlePattern::new(["manager"], "Manager", "Operations"),
    ]);
    ReferenceData::new(companies, patterns)
}

pub(super) fn contact(id: &str, email: Option<&str>, jobtitle: Option<&str>) -> ContactRecord {
    ContactRecord {
        id: id.to_string(),
        email: email.map(str::to_string),
        jobtitle: jobtitle.map(str::to_string),
        firstname: Some("Jane".to_string()),
        ..ContactRecord::default()
    }
}

/// Store double that records every call and can be told to fail.
#[derive(Default)]
pub(super) struct MemoryStore {
    contacts: Mutex<HashMap<String, ContactRecord>>,
    writes: Mutex<Vec<(ContactId, ContactUpdates)>>,
    reads: AtomicUsize,
    fail_reads: Mutex<Option<String>>,
    fail_writes: Mutex<Option<String>>,
}

impl MemoryStore {
    pub(super) fn with_contact(record: ContactRecord) -> Self {
        let store = Self::default();
        store.put(record);
        store
    }

    pub(super) fn put(&self, record: ContactRecord) {
        self.contacts
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    pub(super) fn fail_reads_with(&self, message: &str) {
        *self.fail_reads.lock().expect("store mutex poisoned") = Some(message.to_string());
    }

    pub(super) fn fail_writes_with(&self, message: &str) {
        *self.fail_writes.lock().expect("store mutex poisoned") = Some(message.to_string());
    }

    pub(super) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(super) fn writes(&self) -> Vec<(ContactId, ContactUpdates)> {
        self.writes.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl ContactReader for MemoryStore {
    async fn get_by_id(&self, id: &ContactId) -> Result<ContactRecord, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_reads.lock().expect("store mutex poisoned").clone() {
            return Err(StoreError::Transport(message));
        }
        self.contacts
            .lock()
            .expect("store mutex poisoned")
            .get(id.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ContactWriter for MemoryStore {
    async fn update(&self, id: &ContactId, updates: &ContactUpdates) -> Result<(), StoreError> {
        if let Some(message) = self.fail_writes.lock().expect("store mutex poisoned").clone() {
            return Err(StoreError::Transport(message));
        }
        self.writes
            .lock()
            .expect("store mutex poisoned")
            .push((id.clone(), updates.clone()));
        Ok(())
    }
}

pub(super) fn service(
    store: Arc<MemoryStore>,
) -> ContactEnrichmentService<MemoryStore, MemoryStore> {
    ContactEnrichmentService::new(store.clone(), store, Arc::new(reference()))
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

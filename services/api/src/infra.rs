use async_trait::async_trait;
use chrono::NaiveDate;
use contact_enrichment::workflows::enrichment::{
    ContactId, ContactReader, ContactRecord, ContactUpdates, ContactWriter, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Contact store kept in process memory, for local runs without CRM credentials.
#[derive(Default, Clone)]
pub(crate) struct InMemoryContactStore {
    contacts: Arc<Mutex<HashMap<String, ContactRecord>>>,
}

impl InMemoryContactStore {
    pub(crate) fn seeded() -> Self {
        let store = Self::default();
        for record in sample_contacts() {
            store.insert(record);
        }
        store
    }

    pub(crate) fn insert(&self, record: ContactRecord) {
        let mut guard = self.contacts.lock().expect("contact store mutex poisoned");
        guard.insert(record.id.clone(), record);
    }

    pub(crate) fn get(&self, id: &str) -> Option<ContactRecord> {
        let guard = self.contacts.lock().expect("contact store mutex poisoned");
        guard.get(id).cloned()
    }
}

#[async_trait]
impl ContactReader for InMemoryContactStore {
    async fn get_by_id(&self, id: &ContactId) -> Result<ContactRecord, StoreError> {
        self.get(id.as_str()).ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ContactWriter for InMemoryContactStore {
    async fn update(&self, id: &ContactId, updates: &ContactUpdates) -> Result<(), StoreError> {
        let mut guard = self.contacts.lock().expect("contact store mutex poisoned");
        let record = guard.get_mut(id.as_str()).ok_or(StoreError::NotFound)?;
        if let Some(company) = &updates.company {
            record.company = Some(company.clone());
        }
        if let Some(industry) = &updates.industry {
            record.industry = Some(industry.clone());
        }
        if let Some(city) = &updates.city {
            record.city = Some(city.clone());
        }
        Ok(())
    }
}

fn sample_contacts() -> Vec<ContactRecord> {
    let contact = |id: &str, email: &str, jobtitle: &str, firstname: &str| ContactRecord {
        id: id.to_string(),
        email: Some(email.to_string()),
        jobtitle: Some(jobtitle.to_string()),
        firstname: Some(firstname.to_string()),
        ..ContactRecord::default()
    };

    vec![
        contact("1001", "jane@acme.com", "VP of Sales", "Jane"),
        contact("1002", "bob@www.acme.com", "Account Executive", "Bob"),
        contact("1003", "x@unknown.io", "Chief Marketing Officer", "Xavier"),
        contact("1004", "gilfoyle@piedpiper.com", "", "Bertram"),
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

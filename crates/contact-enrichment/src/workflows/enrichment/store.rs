use async_trait::async_trait;

use super::domain::{ContactId, ContactRecord, ContactUpdates};

/// Read side of the remote contact store.
#[async_trait]
pub trait ContactReader: Send + Sync {
    async fn get_by_id(&self, id: &ContactId) -> Result<ContactRecord, StoreError>;
}

/// Write side of the remote contact store.
#[async_trait]
pub trait ContactWriter: Send + Sync {
    async fn update(&self, id: &ContactId, updates: &ContactUpdates) -> Result<(), StoreError>;
}

/// Failures raised by contact store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("contact not found")]
    NotFound,
    #[error("contact store rejected credentials")]
    Unauthorized,
    #[error("contact store unavailable: {0}")]
    Transport(String),
}

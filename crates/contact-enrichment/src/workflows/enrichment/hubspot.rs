//! HubSpot CRM adapter for the contact store traits.
//!
//! Credentials and endpoints are handed in at construction; nothing here reads
//! process environment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ContactId, ContactRecord, ContactUpdates, CONTACT_PROPERTIES};
use super::store::{ContactReader, ContactWriter, StoreError};

const ERROR_BODY_LIMIT: usize = 200;

/// Contact store backed by the HubSpot CRM v3 objects API.
#[derive(Clone)]
pub struct HubSpotContactStore {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl HubSpotContactStore {
    pub fn new(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| StoreError::Transport(format!("invalid CRM base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!(
                "invalid CRM base url: {base_url}"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            access_token: access_token.into(),
        })
    }

    fn contact_url(&self, id: &ContactId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["crm", "v3", "objects", "contacts", id.as_str()]);
        }
        url
    }
}

#[async_trait]
impl ContactReader for HubSpotContactStore {
    async fn get_by_id(&self, id: &ContactId) -> Result<ContactRecord, StoreError> {
        let url = self.contact_url(id);
        debug!(contact_id = %id, "fetching contact from CRM");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("properties", CONTACT_PROPERTIES.join(","))])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await?;
        let contact: HubSpotContact = response.json().await.map_err(transport_error)?;
        Ok(contact.into_record())
    }
}

#[async_trait]
impl ContactWriter for HubSpotContactStore {
    async fn update(&self, id: &ContactId, updates: &ContactUpdates) -> Result<(), StoreError> {
        let url = self.contact_url(id);
        debug!(contact_id = %id, fields = updates.properties().len(), "updating contact in CRM");

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.access_token)
            .json(&UpdateRequest {
                properties: updates,
            })
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(StoreError::NotFound),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Transport(format!(
                "CRM returned {}: {}",
                status,
                body.chars().take(ERROR_BODY_LIMIT).collect::<String>()
            )))
        }
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

#[derive(Debug, Deserialize)]
struct HubSpotContact {
    id: String,
    #[serde(default)]
    properties: HubSpotProperties,
}

#[derive(Debug, Default, Deserialize)]
struct HubSpotProperties {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    jobtitle: Option<String>,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl HubSpotContact {
    fn into_record(self) -> ContactRecord {
        let HubSpotProperties {
            email,
            jobtitle,
            firstname,
            lastname,
            company,
            industry,
            city,
        } = self.properties;

        ContactRecord {
            id: self.id,
            email,
            jobtitle,
            firstname,
            lastname,
            company,
            industry,
            city,
        }
    }
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    properties: &'a ContactUpdates,
}

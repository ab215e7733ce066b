use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a contact in the remote CRM.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

impl ContactId {
    /// Builds an id from caller input, rejecting missing or blank values.
    /// Accepted ids are kept verbatim.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|value| !value.trim().is_empty())
            .map(|value| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact properties read from the CRM before enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub jobtitle: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Property names requested from the CRM when fetching a contact.
pub const CONTACT_PROPERTIES: [&str; 7] = [
    "email",
    "jobtitle",
    "firstname",
    "lastname",
    "company",
    "industry",
    "city",
];

/// Reference profile for a company. Missing fields are unknown, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CompanyProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.industry.is_none()
            && self.size.is_none()
            && self.location.is_none()
    }

    /// Drops blank values so that an empty string never stands in for "unknown".
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            industry: non_blank(self.industry),
            size: non_blank(self.size),
            location: non_blank(self.location),
        }
    }

    /// City portion of `location`: text before the first comma, trimmed.
    pub fn city(&self) -> Option<String> {
        let location = self.location.as_deref()?;
        let city = location.split(',').next().unwrap_or(location).trim();
        if city.is_empty() {
            None
        } else {
            Some(city.to_string())
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Seniority and department inferred from a job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleClassification {
    pub seniority: String,
    pub department: String,
}

/// Company fields to write back onto the contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl ContactUpdates {
    pub fn from_company(company: &CompanyProfile) -> Self {
        Self {
            company: company.name.clone(),
            industry: company.industry.clone(),
            city: company.city(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.industry.is_none() && self.city.is_none()
    }

    /// CRM property map for the update call, containing only populated fields.
    pub fn properties(&self) -> BTreeMap<&'static str, &str> {
        let mut properties = BTreeMap::new();
        if let Some(company) = self.company.as_deref() {
            properties.insert("company", company);
        }
        if let Some(industry) = self.industry.as_deref() {
            properties.insert("industry", industry);
        }
        if let Some(city) = self.city.as_deref() {
            properties.insert("city", city);
        }
        properties
    }
}

/// Human-facing summary attached to a successful enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentSummary {
    pub seniority: Option<String>,
    pub department: Option<String>,
    pub company_size: Option<String>,
    pub enrichment_note: String,
}

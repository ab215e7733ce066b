use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::domain::CompanyProfile;

const WWW_PREFIX: &str = "www.";

/// Company reference data keyed by lower-case email domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyTable {
    profiles: HashMap<String, CompanyProfile>,
}

impl CompanyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile unless the domain is already present.
    pub fn insert(&mut self, domain: &str, profile: CompanyProfile) -> bool {
        let key = domain.trim().to_lowercase();
        if self.profiles.contains_key(&key) {
            return false;
        }
        self.profiles.insert(key, profile.normalized());
        true
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, domain: &str) -> Option<&CompanyProfile> {
        self.profiles.get(domain)
    }

    /// Looks up a domain exactly, then once more with a leading `www.` removed.
    ///
    /// Unknown or absent domains resolve to an empty profile.
    pub fn resolve(&self, domain: Option<&str>) -> CompanyProfile {
        let Some(domain) = domain else {
            return CompanyProfile::default();
        };

        if let Some(profile) = self.profiles.get(domain) {
            return profile.clone();
        }

        domain
            .strip_prefix(WWW_PREFIX)
            .and_then(|bare| self.profiles.get(bare))
            .cloned()
            .unwrap_or_default()
    }

    /// Parses a JSON object mapping domains to profiles.
    ///
    /// Entries are taken in document order, so when two keys normalize to the
    /// same domain the one written first wins.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let entries: OrderedEntries = serde_json::from_reader(reader)?;
        Ok(entries.0.into_iter().collect())
    }

    /// Parses a CSV export with `domain,name,industry,size,location` columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = Self::new();

        for row in csv_reader.deserialize::<CompanyRow>() {
            let row = row?;
            table.insert(
                &row.domain,
                CompanyProfile {
                    name: row.name,
                    industry: row.industry,
                    size: row.size,
                    location: row.location,
                },
            );
        }

        Ok(table)
    }
}

impl FromIterator<(String, CompanyProfile)> for CompanyTable {
    fn from_iter<I: IntoIterator<Item = (String, CompanyProfile)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (domain, profile) in iter {
            table.insert(&domain, profile);
        }
        table
    }
}

/// Domain/profile pairs in the order they appear in the source object.
struct OrderedEntries(Vec<(String, CompanyProfile)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping domains to company profiles")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, CompanyProfile>()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    domain: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    size: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn acme() -> CompanyProfile {
        CompanyProfile {
            name: Some("Acme Corp".to_string()),
            industry: Some("Tech".to_string()),
            size: Some("201-500".to_string()),
            location: Some("San Francisco, CA".to_string()),
        }
    }

    fn table() -> CompanyTable {
        let mut table = CompanyTable::new();
        table.insert("acme.com", acme());
        table
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let mut table = table();
        let www_profile = CompanyProfile {
            name: Some("Acme Web".to_string()),
            ..CompanyProfile::default()
        };
        table.insert("www.acme.com", www_profile.clone());

        assert_eq!(table.resolve(Some("www.acme.com")), www_profile);
        assert_eq!(table.resolve(Some("acme.com")), acme());
    }

    #[test]
    fn resolve_strips_leading_www_once() {
        let table = table();
        assert_eq!(table.resolve(Some("www.acme.com")), acme());
        assert!(table.resolve(Some("www.www.acme.com")).is_empty());
        assert!(table.resolve(Some("mail.www.acme.com")).is_empty());
    }

    #[test]
    fn resolve_unknown_or_absent_domain_is_empty() {
        let table = table();
        assert!(table.resolve(None).is_empty());
        assert!(table.resolve(Some("unknown.io")).is_empty());
    }

    #[test]
    fn bare_www_looks_up_empty_key() {
        let mut table = table();
        let blank_key = CompanyProfile {
            industry: Some("Placeholder".to_string()),
            ..CompanyProfile::default()
        };
        table.insert("", blank_key.clone());
        assert_eq!(table.resolve(Some("www.")), blank_key);
    }

    #[test]
    fn json_loader_normalizes_keys_and_blank_fields() {
        let json = r#"{
            "Acme.com": { "name": "Acme Corp", "industry": "", "location": "Denver, CO" }
        }"#;
        let table = CompanyTable::from_json_reader(Cursor::new(json)).expect("parses");
        let profile = table.resolve(Some("acme.com"));
        assert_eq!(profile.name.as_deref(), Some("Acme Corp"));
        assert!(profile.industry.is_none());
        assert!(profile.size.is_none());
        assert_eq!(profile.city().as_deref(), Some("Denver"));
    }

    #[test]
    fn json_loader_keeps_first_key_when_keys_differ_only_by_case() {
        let json = r#"{
            "acme.com": { "name": "Lower" },
            "ACME.com": { "name": "Upper" },
            " Acme.COM ": { "name": "Padded" }
        }"#;
        for _ in 0..16 {
            let table = CompanyTable::from_json_reader(Cursor::new(json)).expect("parses");
            assert_eq!(table.len(), 1);
            assert_eq!(table.resolve(Some("acme.com")).name.as_deref(), Some("Lower"));
        }

        let reversed = r#"{ "ACME.com": { "name": "Upper" }, "acme.com": { "name": "Lower" } }"#;
        let table = CompanyTable::from_json_reader(Cursor::new(reversed)).expect("parses");
        assert_eq!(table.resolve(Some("acme.com")).name.as_deref(), Some("Upper"));
    }

    #[test]
    fn json_loader_rejects_non_object_documents() {
        assert!(CompanyTable::from_json_reader(Cursor::new("[]")).is_err());
    }

    #[test]
    fn csv_loader_keeps_first_row_for_duplicate_domains() {
        let csv = "domain,name,industry,size,location\n\
acme.com,Acme Corp,Tech,201-500,\"San Francisco, CA\"\n\
acme.com,Acme Duplicate,,,\n\
initech.com,Initech,,51-200,\n";
        let table = CompanyTable::from_csv_reader(Cursor::new(csv)).expect("parses");
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(Some("acme.com")), acme());

        let initech = table.resolve(Some("initech.com"));
        assert_eq!(initech.size.as_deref(), Some("51-200"));
        assert!(initech.industry.is_none());
        assert!(initech.location.is_none());
    }
}

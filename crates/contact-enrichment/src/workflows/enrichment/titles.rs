use std::collections::BTreeSet;
use std::io::Read;

use serde::Deserialize;

use super::domain::TitleClassification;

/// Keywords that map a job title to a seniority and department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePattern {
    keywords: BTreeSet<String>,
    pub seniority: String,
    pub department: String,
}

impl TitlePattern {
    /// Keywords are lower-cased; blank keywords are dropped so they cannot
    /// match every title.
    pub fn new<I, S>(
        keywords: I,
        seniority: impl Into<String>,
        department: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().to_lowercase())
            .filter(|keyword| !keyword.trim().is_empty())
            .collect();

        Self {
            keywords,
            seniority: seniority.into(),
            department: department.into(),
        }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    fn matches(&self, lowered_title: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_title.contains(keyword.as_str()))
    }

    fn classification(&self) -> TitleClassification {
        TitleClassification {
            seniority: self.seniority.clone(),
            department: self.department.clone(),
        }
    }
}

/// Ordered title patterns. Earlier patterns take priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternTable {
    patterns: Vec<TitlePattern>,
}

impl PatternTable {
    pub fn new(patterns: Vec<TitlePattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[TitlePattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Classifies a job title using the first pattern with any keyword
    /// contained in the lower-cased title.
    pub fn classify(&self, job_title: Option<&str>) -> Option<TitleClassification> {
        let job_title = job_title.filter(|title| !title.is_empty())?;
        let lowered = job_title.to_lowercase();

        self.patterns
            .iter()
            .find(|pattern| pattern.matches(&lowered))
            .map(TitlePattern::classification)
    }

    /// Parses `{"patterns": [{"keywords": [...], "seniority": ..., "department": ...}]}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let document: PatternDocument = serde_json::from_reader(reader)?;
        let patterns = document
            .patterns
            .into_iter()
            .map(|entry| TitlePattern::new(entry.keywords, entry.seniority, entry.department))
            .collect();
        Ok(Self::new(patterns))
    }
}

#[derive(Debug, Deserialize)]
struct PatternDocument {
    patterns: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
struct PatternEntry {
    keywords: Vec<String>,
    seniority: String,
    department: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table() -> PatternTable {
        PatternTable::new(vec![
            TitlePattern::new(["vp", "vice president"], "VP", "Leadership"),
            TitlePattern::new(["sales"], "Individual Contributor", "Sales"),
            TitlePattern::new(["manager"], "Manager", "Operations"),
        ])
    }

    #[test]
    fn first_matching_pattern_wins() {
        let classification = table()
            .classify(Some("VP of Sales"))
            .expect("title classifies");
        assert_eq!(classification.seniority, "VP");
        assert_eq!(classification.department, "Leadership");

        let classification = table()
            .classify(Some("Sales Manager"))
            .expect("title classifies");
        assert_eq!(classification.department, "Sales");
    }

    #[test]
    fn any_keyword_in_a_pattern_matches() {
        let classification = table()
            .classify(Some("Vice President, Customer Success"))
            .expect("title classifies");
        assert_eq!(classification.seniority, "VP");
    }

    #[test]
    fn empty_absent_or_unmatched_titles_do_not_classify() {
        assert!(table().classify(None).is_none());
        assert!(table().classify(Some("")).is_none());
        assert!(table().classify(Some("Barista")).is_none());
        assert!(PatternTable::default().classify(Some("VP")).is_none());
    }

    #[test]
    fn keywords_are_normalized_on_construction() {
        let pattern = TitlePattern::new(["Director", " ", "HEAD OF"], "Director", "Leadership");
        let keywords: Vec<&str> = pattern.keywords().collect();
        assert_eq!(keywords, vec!["director", "head of"]);
    }

    #[test]
    fn json_loader_preserves_pattern_order() {
        let json = r#"{
            "patterns": [
                { "keywords": ["engineer"], "seniority": "IC", "department": "Engineering" },
                { "keywords": ["engineering manager"], "seniority": "Manager", "department": "Engineering" }
            ]
        }"#;
        let table = PatternTable::from_json_reader(Cursor::new(json)).expect("parses");
        assert_eq!(table.len(), 2);

        let classification = table
            .classify(Some("Engineering Manager"))
            .expect("classifies");
        assert_eq!(classification.seniority, "IC");
    }
}

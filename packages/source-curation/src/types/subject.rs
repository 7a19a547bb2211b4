//! The historical figure being researched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CurationError, Result};

/// A normalized subject name.
///
/// Whitespace is collapsed on construction; an empty name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(CurationError::invalid("subject", "must not be empty"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-safe form: punctuation removed, lowercase, words joined by underscores.
    pub fn identifier(&self) -> String {
        self.0
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// URL-encoded form for query strings.
    pub fn query(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    /// Path-segment form, e.g. `Albert_Einstein`.
    pub fn slug(&self) -> String {
        urlencoding::encode(&self.0.replace(' ', "_")).into_owned()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subject {
    type Error = CurationError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapsed() {
        let subject = Subject::parse("  Marie   Curie \n").unwrap();
        assert_eq!(subject.as_str(), "Marie Curie");
    }

    #[test]
    fn test_empty_rejected() {
        let err = Subject::parse("   ").unwrap_err();
        assert!(matches!(err, CurationError::InvalidInput { ref field, .. } if field == "subject"));
    }

    #[test]
    fn test_identifier_and_query() {
        let subject = Subject::parse("Martin Luther King, Jr.").unwrap();
        assert_eq!(subject.identifier(), "martin_luther_king_jr");
        assert_eq!(subject.query(), "Martin%20Luther%20King%2C%20Jr.");
        assert_eq!(subject.slug(), "Martin_Luther_King%2C_Jr.");
    }

    #[test]
    fn test_deserialize_validates() {
        let subject: Subject = serde_json::from_str("\"Ada  Lovelace\"").unwrap();
        assert_eq!(subject.as_str(), "Ada Lovelace");
        assert!(serde_json::from_str::<Subject>("\"\"").is_err());
    }
}

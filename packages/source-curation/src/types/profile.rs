//! Structured profile of a subject, produced by the character analyzer.

use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MAX_LIST_ITEMS: usize = 5;
pub const MAX_SEARCH_TERMS: usize = 8;

lazy_static! {
    static ref LIFE_SPAN: Regex = Regex::new(r"(\d{3,4})\s*(?:–|—|-|to)\s*(\d{3,4})").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
    static ref MODERN_CENTURY: Regex = Regex::new(r"(?i)\b(19th|20th|21st)\s+century").unwrap();
}

/// Profile of a historical figure.
///
/// Optional fields stay `None` when unknown; list fields are bounded and
/// `search_terms` always contains `"{name} biography"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub period: Option<String>,
    pub nationality: Option<String>,
    pub field: Option<String>,
    pub specialty: Option<String>,
    #[serde(default)]
    pub key_events: Vec<String>,
    #[serde(default)]
    pub related_entities: Vec<String>,
    #[serde(default)]
    pub search_terms: Vec<String>,
}

/// Shape the LLM is asked to reply with.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProfileReply {
    /// Life span or era, e.g. "1879-1955"
    pub period: Option<String>,
    pub nationality: Option<String>,
    /// Primary field of activity, e.g. "physics", "politics", "painting"
    pub field: Option<String>,
    pub specialty: Option<String>,
    /// Up to five defining events
    #[serde(default)]
    pub key_events: Vec<String>,
    /// Up to five related people or institutions
    #[serde(default)]
    pub related_entities: Vec<String>,
    /// Five to eight English search queries
    #[serde(default)]
    pub search_terms: Vec<String>,
}

impl CharacterProfile {
    /// Minimal profile used when analysis fails.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            period: None,
            nationality: None,
            field: None,
            specialty: None,
            key_events: Vec::new(),
            related_entities: Vec::new(),
            search_terms: vec![
                format!("{} biography", name),
                format!("{} life history", name),
                format!("{} historical records", name),
            ],
        }
    }

    /// Build a profile from a model reply, enforcing list bounds.
    pub fn from_reply(name: &str, reply: ProfileReply) -> Self {
        let anchor = format!("{} biography", name);
        let mut search_terms = clean_list(reply.search_terms, MAX_SEARCH_TERMS);
        if !search_terms.iter().any(|t| t.eq_ignore_ascii_case(&anchor)) {
            search_terms.insert(0, anchor);
            search_terms.truncate(MAX_SEARCH_TERMS);
        }

        Self {
            name: name.to_string(),
            period: clean(reply.period),
            nationality: clean(reply.nationality),
            field: clean(reply.field),
            specialty: clean(reply.specialty),
            key_events: clean_list(reply.key_events, MAX_LIST_ITEMS),
            related_entities: clean_list(reply.related_entities, MAX_LIST_ITEMS),
            search_terms,
        }
    }

    /// Most specific descriptor available: specialty, then field, then nationality.
    pub fn hint(&self) -> Option<&str> {
        self.specialty
            .as_deref()
            .or(self.field.as_deref())
            .or(self.nationality.as_deref())
    }

    /// Birth and death years parsed from `period`, e.g. "1879–1955".
    pub fn life_span_years(&self) -> Option<(i32, i32)> {
        let period = self.period.as_deref()?;
        let caps = LIFE_SPAN.captures(period)?;
        let start = caps.get(1)?.as_str().parse().ok()?;
        let end = caps.get(2)?.as_str().parse().ok()?;
        Some((start, end))
    }

    /// Whether the subject lived in the news-archive era (19th century onward).
    pub fn is_contemporary(&self) -> bool {
        let Some(period) = self.period.as_deref() else {
            return false;
        };
        if MODERN_CENTURY.is_match(period) {
            return true;
        }
        YEAR.captures_iter(period)
            .filter_map(|c| c.get(1)?.as_str().parse::<i32>().ok())
            .any(|year| year >= 1850)
    }

    /// Lowercased field, specialty and key events, for keyword matching.
    pub fn descriptor_text(&self) -> String {
        [self.field.as_deref(), self.specialty.as_deref()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .chain(self.key_events.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

fn clean_list(items: Vec<String>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out.truncate(max);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply() -> ProfileReply {
        ProfileReply {
            period: Some("1879–1955".into()),
            nationality: Some("German-American".into()),
            field: Some("physics".into()),
            specialty: Some("theoretical physics".into()),
            key_events: (1..=7).map(|i| format!("event {}", i)).collect(),
            related_entities: vec!["Niels Bohr".into(), "".into(), "Niels Bohr".into()],
            search_terms: vec!["Einstein relativity".into(), "Einstein Nobel Prize 1921".into()],
        }
    }

    #[test]
    fn test_fallback_has_three_terms() {
        let profile = CharacterProfile::fallback("Ada Lovelace");
        assert_eq!(profile.search_terms.len(), 3);
        assert_eq!(profile.search_terms[0], "Ada Lovelace biography");
        assert!(profile.field.is_none());
    }

    #[test]
    fn test_from_reply_bounds_lists() {
        let profile = CharacterProfile::from_reply("Albert Einstein", reply());

        assert_eq!(profile.key_events.len(), MAX_LIST_ITEMS);
        assert_eq!(profile.related_entities, vec!["Niels Bohr".to_string()]);
        assert_eq!(profile.search_terms[0], "Albert Einstein biography");
        assert_eq!(profile.search_terms.len(), 3);
    }

    #[test]
    fn test_hint_prefers_specialty() {
        let mut profile = CharacterProfile::from_reply("Albert Einstein", reply());
        assert_eq!(profile.hint(), Some("theoretical physics"));

        profile.specialty = None;
        assert_eq!(profile.hint(), Some("physics"));

        profile.field = None;
        assert_eq!(profile.hint(), Some("German-American"));
    }

    #[test]
    fn test_life_span_and_era() {
        let profile = CharacterProfile::from_reply("Albert Einstein", reply());
        assert_eq!(profile.life_span_years(), Some((1879, 1955)));
        assert!(profile.is_contemporary());

        let mut ancient = CharacterProfile::fallback("Julius Caesar");
        ancient.period = Some("100 BC - 44 BC".into());
        assert!(!ancient.is_contemporary());

        ancient.period = Some("late 19th century".into());
        assert!(ancient.is_contemporary());
    }

    #[test]
    fn test_unknown_values_dropped() {
        let mut r = reply();
        r.nationality = Some("Unknown".into());
        let profile = CharacterProfile::from_reply("Albert Einstein", r);
        assert!(profile.nationality.is_none());
    }
}

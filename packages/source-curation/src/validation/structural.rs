//! Structural checks on a source reference.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::SourceItem;

pub const EMPTY_TITLE_ISSUE: &str = "Title is empty or missing";

lazy_static! {
    static ref URL_GRAMMAR: Regex = Regex::new(
        r"^https?://[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*(?::\d{1,5})?(?:[/?#][^\s]*)?$"
    )
    .unwrap();
    static ref DATE_GRAMMAR: Regex = Regex::new(r"^\d{4}(?:-\d{2}(?:-\d{2})?)?$").unwrap();
}

/// Issues that make a reference structurally invalid; empty when valid.
pub fn structural_issues(item: &SourceItem) -> Vec<String> {
    let mut issues = Vec::new();

    if item.title.trim().is_empty() {
        issues.push(EMPTY_TITLE_ISSUE.to_string());
    }
    if let Some(url) = item.url.as_deref() {
        if !is_well_formed_url(url) {
            issues.push(format!("URL is malformed: {}", url));
        }
    }
    if let Some(date) = item.publication_date.as_deref() {
        if !DATE_GRAMMAR.is_match(date.trim()) {
            issues.push(format!(
                "Publication date '{}' is not in YYYY, YYYY-MM or YYYY-MM-DD form",
                date
            ));
        }
    }

    issues
}

/// `http(s)://` followed by a well-formed authority.
pub fn is_well_formed_url(url: &str) -> bool {
    URL_GRAMMAR.is_match(url.trim())
}

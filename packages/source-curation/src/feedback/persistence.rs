//! The JSON tracking document behind the feedback store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::types::SuccessCase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingDocument {
    pub cases: Vec<SuccessCase>,
    pub last_updated: DateTime<Utc>,
}

/// Read the cases stored at `path`; a missing file is an empty history.
pub fn load(path: &Path) -> Result<Vec<SuccessCase>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: TrackingDocument = serde_json::from_str(&raw)?;
    Ok(document.cases)
}

/// Rewrite the document through a sibling temp file and a rename.
pub fn save(path: &Path, cases: &[SuccessCase]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let document = TrackingDocument {
        cases: cases.to_vec(),
        last_updated: Utc::now(),
    };
    let body = serde_json::to_string_pretty(&document)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

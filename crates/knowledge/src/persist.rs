//! JSON file persistence for the fact base.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated store behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::facts::{EntityRecord, FactBase};
use crate::store::StoreError;

/// On-disk layout of a persisted store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreDocument {
    pub iri: String,
    pub saved_at: DateTime<Utc>,
    pub entities: Vec<EntityRecord>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn save(path: &Path, iri: &str, facts: &FactBase) -> Result<PathBuf, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let document = StoreDocument {
        iri: iri.to_string(),
        saved_at: Utc::now(),
        entities: facts.records().to_vec(),
    };
    let bytes = serde_json::to_vec_pretty(&document).map_err(StoreError::Encode)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(io_error(&tmp))?;
    fs::rename(&tmp, path).map_err(io_error(path))?;

    tracing::debug!(path = %path.display(), entities = facts.len(), "knowledge store saved");
    Ok(path.to_path_buf())
}

pub fn load(path: &Path) -> Result<StoreDocument, StoreError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

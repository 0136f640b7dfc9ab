// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A JSON file snapshot of complaints and feed checkpoints.

use rti_tracker::ComplaintCache;
use rti_tracker_domain::Complaint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors produced while writing the cache file.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file or its directory could not be written.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded.
    #[error("Cache encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snapshot {
    complaints: Vec<Complaint>,
    checkpoints: BTreeMap<String, String>,
}

/// Complaint cache stored as a single JSON document.
///
/// A missing file reads as an empty cache. So does a corrupt one, after a
/// warning, so a damaged snapshot never blocks startup.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    /// Creates a cache backed by the file at `path`.
    ///
    /// The file is created on the first write.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Snapshot, CacheError> {
        let text: String = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&text) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt complaint cache");
                Ok(Snapshot::default())
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let encoded: String = serde_json::to_string_pretty(snapshot)?;
        let staging: PathBuf = self.path.with_extension("json.tmp");
        std::fs::write(&staging, encoded)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl ComplaintCache for JsonFileCache {
    type Error = CacheError;

    fn read(&self) -> Result<Vec<Complaint>, Self::Error> {
        Ok(self.load()?.complaints)
    }

    fn write(&mut self, complaints: &[Complaint]) -> Result<(), Self::Error> {
        let mut snapshot: Snapshot = self.load()?;
        snapshot.complaints = complaints.to_vec();
        self.save(&snapshot)
    }

    fn read_checkpoint(&self, source: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.load()?.checkpoints.remove(source))
    }

    fn write_checkpoint(&mut self, source: &str, value: &str) -> Result<(), Self::Error> {
        let mut snapshot: Snapshot = self.load()?;
        snapshot
            .checkpoints
            .insert(source.to_string(), value.to_string());
        self.save(&snapshot)
    }
}

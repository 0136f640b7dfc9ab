// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attachment blobs kept in a directory.
//!
//! Each attachment is two files named after its id: `<id>.bin` with the
//! bytes and `<id>.json` with the metadata.

use rti_tracker::{AttachmentStore, StoredAttachment, new_attachment_ref};
use rti_tracker_domain::AttachmentRef;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors produced by the attachment directory.
#[derive(Error, Debug)]
pub enum AttachmentError {
    /// A blob or metadata file could not be read or written.
    #[error("Attachment I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A metadata file could not be encoded or decoded.
    #[error("Attachment metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Attachment blobs stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, AttachmentError> {
        let root: PathBuf = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the directory holding the blobs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.bin"))
    }

    fn meta_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

/// Ids are generated by the store; anything else cannot name a blob and
/// must never be turned into a path.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn remove_if_present(path: &Path) -> Result<(), std::io::Error> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl AttachmentStore for FsAttachmentStore {
    type Error = AttachmentError;

    fn put(
        &mut self,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        added_at: &str,
    ) -> Result<AttachmentRef, Self::Error> {
        let meta: AttachmentRef = new_attachment_ref(name, mime_type, bytes, added_at);

        std::fs::write(self.blob_path(&meta.id), bytes)?;
        std::fs::write(self.meta_path(&meta.id), serde_json::to_vec_pretty(&meta)?)?;

        debug!(id = %meta.id, size = meta.size, "Stored attachment");
        Ok(meta)
    }

    fn read(&self, id: &str) -> Result<Option<StoredAttachment>, Self::Error> {
        if !is_valid_id(id) {
            return Ok(None);
        }

        let meta_bytes: Vec<u8> = match std::fs::read(self.meta_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: AttachmentRef = serde_json::from_slice(&meta_bytes)?;
        let bytes: Vec<u8> = std::fs::read(self.blob_path(id))?;

        Ok(Some(StoredAttachment { meta, bytes }))
    }

    fn delete(&mut self, id: &str) -> Result<(), Self::Error> {
        if !is_valid_id(id) {
            return Ok(());
        }

        remove_if_present(&self.blob_path(id))?;
        remove_if_present(&self.meta_path(id))?;
        debug!(id, "Deleted attachment");
        Ok(())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory collaborators for tests and ephemeral servers.

use crate::store::{AttachmentStore, ComplaintCache, StoredAttachment, new_attachment_ref};
use rti_tracker_domain::{AttachmentRef, Complaint};
use std::collections::HashMap;
use std::convert::Infallible;

/// A complaint cache that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    complaints: Vec<Complaint>,
    checkpoints: HashMap<String, String>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache already holding these complaints.
    #[must_use]
    pub fn with_complaints(complaints: Vec<Complaint>) -> Self {
        Self {
            complaints,
            checkpoints: HashMap::new(),
        }
    }
}

impl ComplaintCache for MemoryCache {
    type Error = Infallible;

    fn read(&self) -> Result<Vec<Complaint>, Self::Error> {
        Ok(self.complaints.clone())
    }

    fn write(&mut self, complaints: &[Complaint]) -> Result<(), Self::Error> {
        self.complaints = complaints.to_vec();
        Ok(())
    }

    fn read_checkpoint(&self, source: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.checkpoints.get(source).cloned())
    }

    fn write_checkpoint(&mut self, source: &str, value: &str) -> Result<(), Self::Error> {
        self.checkpoints
            .insert(source.to_string(), value.to_string());
        Ok(())
    }
}

/// Attachment blobs held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttachments {
    blobs: HashMap<String, StoredAttachment>,
}

impl MemoryAttachments {
    /// Creates an empty attachment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns true if no blobs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl AttachmentStore for MemoryAttachments {
    type Error = Infallible;

    fn put(
        &mut self,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        added_at: &str,
    ) -> Result<AttachmentRef, Self::Error> {
        let meta: AttachmentRef = new_attachment_ref(name, mime_type, bytes, added_at);

        self.blobs.insert(
            meta.id.clone(),
            StoredAttachment {
                meta: meta.clone(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(meta)
    }

    fn read(&self, id: &str) -> Result<Option<StoredAttachment>, Self::Error> {
        Ok(self.blobs.get(id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<(), Self::Error> {
        self.blobs.remove(id);
        Ok(())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Local collaborators chosen at startup.
//!
//! A path on the command line selects the file-backed implementation;
//! without one the server keeps the data in memory.

use rti_tracker::{
    AttachmentStore, ComplaintCache, ComplaintStore, MemoryAttachments, MemoryCache,
    StoredAttachment,
};
use rti_tracker_domain::{AttachmentRef, Complaint};
use rti_tracker_persistence::{
    AttachmentError, CacheError, FsAttachmentStore, JsonFileCache, Persistence,
};
use std::path::Path;

/// The store the server runs on.
pub type ServerStore = ComplaintStore<Persistence, CacheBackend, AttachmentBackend>;

/// Complaint snapshot cache.
#[derive(Debug)]
pub enum CacheBackend {
    /// A JSON file on disk.
    File(JsonFileCache),
    /// Process memory only.
    Memory(MemoryCache),
}

impl CacheBackend {
    /// Selects the file cache when a path is given.
    #[must_use]
    pub fn from_path(path: Option<&Path>) -> Self {
        path.map_or_else(
            || Self::Memory(MemoryCache::new()),
            |p| Self::File(JsonFileCache::new(p)),
        )
    }
}

impl ComplaintCache for CacheBackend {
    type Error = CacheError;

    fn read(&self) -> Result<Vec<Complaint>, Self::Error> {
        match self {
            Self::File(cache) => cache.read(),
            Self::Memory(cache) => cache.read().map_err(|never| match never {}),
        }
    }

    fn write(&mut self, complaints: &[Complaint]) -> Result<(), Self::Error> {
        match self {
            Self::File(cache) => cache.write(complaints),
            Self::Memory(cache) => cache.write(complaints).map_err(|never| match never {}),
        }
    }

    fn read_checkpoint(&self, source: &str) -> Result<Option<String>, Self::Error> {
        match self {
            Self::File(cache) => cache.read_checkpoint(source),
            Self::Memory(cache) => cache
                .read_checkpoint(source)
                .map_err(|never| match never {}),
        }
    }

    fn write_checkpoint(&mut self, source: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            Self::File(cache) => cache.write_checkpoint(source, value),
            Self::Memory(cache) => cache
                .write_checkpoint(source, value)
                .map_err(|never| match never {}),
        }
    }
}

/// Attachment blob storage.
#[derive(Debug)]
pub enum AttachmentBackend {
    /// A directory on disk.
    Directory(FsAttachmentStore),
    /// Process memory only.
    Memory(MemoryAttachments),
}

impl AttachmentBackend {
    /// Selects the directory store when a path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn from_path(path: Option<&Path>) -> Result<Self, AttachmentError> {
        match path {
            Some(root) => Ok(Self::Directory(FsAttachmentStore::new(root)?)),
            None => Ok(Self::Memory(MemoryAttachments::new())),
        }
    }
}

impl AttachmentStore for AttachmentBackend {
    type Error = AttachmentError;

    fn put(
        &mut self,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        added_at: &str,
    ) -> Result<AttachmentRef, Self::Error> {
        match self {
            Self::Directory(store) => store.put(name, mime_type, bytes, added_at),
            Self::Memory(store) => store
                .put(name, mime_type, bytes, added_at)
                .map_err(|never| match never {}),
        }
    }

    fn read(&self, id: &str) -> Result<Option<StoredAttachment>, Self::Error> {
        match self {
            Self::Directory(store) => store.read(id),
            Self::Memory(store) => store.read(id).map_err(|never| match never {}),
        }
    }

    fn delete(&mut self, id: &str) -> Result<(), Self::Error> {
        match self {
            Self::Directory(store) => store.delete(id),
            Self::Memory(store) => store.delete(id).map_err(|never| match never {}),
        }
    }
}

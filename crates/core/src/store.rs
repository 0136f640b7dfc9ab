// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The complaint store and the collaborators it is built from.
//!
//! A [`ComplaintStore`] is constructed once and passed by reference to
//! whatever needs it. It owns the in-memory [`State`] and three injected
//! collaborators:
//!
//! - a [`ComplaintRemote`], the authoritative source of records,
//! - a [`ComplaintCache`], a best-effort local snapshot,
//! - an [`AttachmentStore`] holding attachment blobs.
//!
//! Every mutation goes to the remote first. When the remote is unavailable
//! the same lifecycle rules are applied locally instead, so the store keeps
//! working offline. Cache and attachment failures are logged and never fail
//! the operation that triggered them.

use crate::apply::apply;
use crate::command::Command;
use crate::error::CoreError;
use crate::feed::{Feed, FeedProfile, FeedSync, sync_from_feed};
use crate::merge::{Reconciliation, reconcile_counted};
use crate::moment::{Moment, new_id};
use crate::state::{Change, State, TransitionResult};
use rti_tracker_domain::{
    AttachmentRef, Complaint, ComplaintDraft, ComplaintPatch, NaturalKey, SyncRun,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// The authoritative source of complaint records.
pub trait ComplaintRemote {
    /// The error reported when a request fails.
    type Error: std::fmt::Display;

    /// Fetches every complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached.
    fn fetch_all(&mut self) -> Result<Vec<Complaint>, Self::Error>;

    /// Creates a complaint, or folds it into the one with the same natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached or refuses the record.
    fn create(&mut self, draft: &ComplaintDraft, now: &Moment) -> Result<Complaint, Self::Error>;

    /// Updates a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached or refuses the change.
    fn update(
        &mut self,
        id: &str,
        patch: &ComplaintPatch,
        now: &Moment,
    ) -> Result<Complaint, Self::Error>;

    /// Deletes a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached or has no such record.
    fn delete(&mut self, id: &str) -> Result<(), Self::Error>;

    /// Upserts records by natural key, returning them as stored.
    ///
    /// A record whose key is already stored keeps the stored id, documents
    /// and recorded resolution time.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached.
    fn bulk_upsert(&mut self, complaints: &[Complaint]) -> Result<Vec<Complaint>, Self::Error>;

    /// Records an import or feed synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be reached.
    fn record_sync_run(&mut self, _run: &SyncRun) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Returns the rule violation when the remote refused a request, as
    /// opposed to being unavailable. Refusals are returned to the caller
    /// instead of triggering the local fallback.
    fn rejection(_error: &Self::Error) -> Option<CoreError> {
        None
    }
}

/// A local snapshot of complaints and feed checkpoints.
pub trait ComplaintCache {
    /// The error reported when the snapshot cannot be read or written.
    type Error: std::fmt::Display;

    /// Reads the cached complaints.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    fn read(&self) -> Result<Vec<Complaint>, Self::Error>;

    /// Replaces the cached complaints.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn write(&mut self, complaints: &[Complaint]) -> Result<(), Self::Error>;

    /// Reads the last `syncedAt` stored for a feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    fn read_checkpoint(&self, source: &str) -> Result<Option<String>, Self::Error>;

    /// Stores the `syncedAt` of the last imported feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn write_checkpoint(&mut self, source: &str, value: &str) -> Result<(), Self::Error>;
}

/// An attachment blob together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    pub meta: AttachmentRef,
    pub bytes: Vec<u8>,
}

/// Prefix of generated attachment ids.
pub const ATTACHMENT_ID_PREFIX: &str = "att";

/// MIME type recorded when an upload does not name one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Builds the metadata for a new blob under a freshly generated id.
#[must_use]
pub fn new_attachment_ref(
    name: &str,
    mime_type: &str,
    bytes: &[u8],
    added_at: &str,
) -> AttachmentRef {
    let mime_type: &str = if mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type
    };

    AttachmentRef {
        id: new_id(ATTACHMENT_ID_PREFIX),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
        added_at: added_at.to_string(),
    }
}

/// Storage for attachment blobs, keyed by attachment id.
pub trait AttachmentStore {
    /// The error reported when a blob cannot be stored or read.
    type Error: std::fmt::Display;

    /// Stores a blob under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be stored.
    fn put(
        &mut self,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        added_at: &str,
    ) -> Result<AttachmentRef, Self::Error>;

    /// Reads a blob, or `None` if no blob has this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be read.
    fn read(&self, id: &str) -> Result<Option<StoredAttachment>, Self::Error>;

    /// Deletes a blob. Deleting a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be removed.
    fn delete(&mut self, id: &str) -> Result<(), Self::Error>;
}

/// Counts reported by a bulk upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertSummary {
    /// Records accepted.
    pub upserted: usize,
    /// Records that did not exist before.
    pub inserted: usize,
    /// Records folded into an existing complaint.
    pub updated: usize,
}

/// Outcome of a feed synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedSyncSummary {
    /// Complaints that did not exist before.
    pub imported: usize,
    /// True if the feed had already been imported.
    pub skipped: bool,
    /// The feed's `syncedAt`, if any.
    pub synced_at: Option<String>,
}

/// The single owner of complaint state for a process.
#[derive(Debug)]
pub struct ComplaintStore<R, C, A> {
    remote: R,
    cache: C,
    attachments: A,
    state: State,
}

impl<R, C, A> ComplaintStore<R, C, A>
where
    R: ComplaintRemote,
    C: ComplaintCache,
    A: AttachmentStore,
{
    /// Creates a store seeded from the cache.
    ///
    /// Call [`ComplaintStore::load`] to refresh from the remote.
    pub fn new(remote: R, cache: C, attachments: A) -> Self {
        let cached: Vec<Complaint> = read_cache(&cache);
        Self {
            remote,
            cache,
            attachments,
            state: State::from_complaints(cached),
        }
    }

    /// Returns every known complaint.
    #[must_use]
    pub fn complaints(&self) -> &[Complaint] {
        &self.state.complaints
    }

    /// Returns a complaint by opaque id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Complaint> {
        self.state.find(id)
    }

    /// Returns the remote collaborator.
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Returns the cache collaborator.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the attachment collaborator.
    pub const fn attachments(&self) -> &A {
        &self.attachments
    }

    /// Returns the remote collaborator mutably.
    pub const fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    /// Refreshes state from the remote, falling back to the cache.
    ///
    /// Returns the number of complaints now held.
    pub fn load(&mut self) -> usize {
        match self.remote.fetch_all() {
            Ok(complaints) => {
                self.state = State::from_complaints(complaints);
                self.persist();
                info!(count = self.state.len(), "Loaded complaints from remote");
            }
            Err(e) => {
                warn!(error = %e, "Remote unavailable, loading cached complaints");
                self.state = State::from_complaints(read_cache(&self.cache));
            }
        }
        self.state.len()
    }

    /// Creates a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the record violates a domain rule.
    pub fn create(&mut self, draft: ComplaintDraft, now: &Moment) -> Result<Complaint, CoreError> {
        match self.remote.create(&draft, now) {
            Ok(saved) => {
                self.state.upsert(saved.clone());
                self.persist();
                Ok(saved)
            }
            Err(e) => {
                Self::check_rejection(&e, "create")?;
                let change: Change = self.apply_locally(Command::Create(draft), now)?;
                changed_complaint(change)
            }
        }
    }

    /// Updates a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the complaint does not exist or the change
    /// violates a domain rule.
    pub fn update(
        &mut self,
        id: &str,
        patch: ComplaintPatch,
        now: &Moment,
    ) -> Result<Complaint, CoreError> {
        match self.remote.update(id, &patch, now) {
            Ok(saved) => {
                self.state.upsert(saved.clone());
                self.persist();
                Ok(saved)
            }
            Err(e) => {
                Self::check_rejection(&e, "update")?;
                let change: Change = self.apply_locally(
                    Command::Update {
                        id: id.to_string(),
                        patch,
                    },
                    now,
                )?;
                changed_complaint(change)
            }
        }
    }

    /// Deletes a complaint and releases its attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if the complaint does not exist.
    pub fn delete(&mut self, id: &str, now: &Moment) -> Result<(), CoreError> {
        let remote_deleted: bool = match self.remote.delete(id) {
            Ok(()) => true,
            Err(e) => {
                Self::check_rejection(&e, "delete")?;
                false
            }
        };

        match self.apply_locally(Command::Delete { id: id.to_string() }, now) {
            Ok(Change::Deleted { released, .. }) => {
                self.release(&released);
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(CoreError::ComplaintNotFound(_)) if remote_deleted => {
                debug!(id, "Deleted complaint was not cached locally");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Replaces every complaint locally, deduplicating by natural key.
    pub fn set_complaints(&mut self, complaints: Vec<Complaint>, now: &Moment) -> usize {
        match self.apply_locally(Command::ReplaceAll(complaints), now) {
            Ok(Change::Replaced { count }) => count,
            Ok(_) | Err(_) => self.state.len(),
        }
    }

    /// Removes every complaint from local state and the cache.
    pub fn clear_all(&mut self, now: &Moment) {
        if let Err(e) = self.apply_locally(Command::Clear, now) {
            warn!(error = %e, "Failed to clear complaints");
        }
    }

    /// Reconciles records into the store by natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote refuses the records.
    pub fn bulk_upsert(&mut self, incoming: Vec<Complaint>) -> Result<UpsertSummary, CoreError> {
        let keys: HashSet<NaturalKey> = incoming.iter().map(Complaint::natural_key).collect();
        let received: usize = incoming.len();
        let reconciled: Reconciliation = reconcile_counted(&self.state.complaints, incoming);

        let stored: Vec<Complaint> =
            self.push_reconciled(&reconciled.complaints, &keys, "bulk upsert")?;

        self.state = State::from_complaints(adopt_stored(reconciled.complaints, stored));
        self.persist();

        Ok(UpsertSummary {
            upserted: received,
            inserted: reconciled.inserted,
            updated: reconciled.updated,
        })
    }

    /// Imports a portal feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote refuses the imported records.
    pub fn sync_feed(
        &mut self,
        feed: Feed,
        profile: &FeedProfile,
        force: bool,
        now: &Moment,
    ) -> Result<FeedSyncSummary, CoreError> {
        let stored_checkpoint: Option<String> = self
            .cache
            .read_checkpoint(&profile.portal_name)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read feed checkpoint");
                None
            });

        let outcome: FeedSync = sync_from_feed(
            &self.state.complaints,
            feed,
            profile,
            stored_checkpoint.as_deref(),
            force,
            now,
        );

        let FeedSync::Applied {
            complaints,
            imported,
            checkpoint,
        } = outcome
        else {
            info!(portal = %profile.portal_name, "Feed already imported, skipping");
            self.record_sync(&profile.portal_name, "skipped", 0, None, now);
            return Ok(FeedSyncSummary {
                imported: 0,
                skipped: true,
                synced_at: stored_checkpoint,
            });
        };

        let keys: HashSet<NaturalKey> = complaints
            .iter()
            .filter(|c| c.portal_name == profile.portal_name)
            .map(Complaint::natural_key)
            .collect();
        let stored: Vec<Complaint> = self.push_reconciled(&complaints, &keys, "feed sync")?;

        self.state = State::from_complaints(adopt_stored(complaints, stored));
        self.persist();

        if let Some(value) = checkpoint.as_deref()
            && let Err(e) = self.cache.write_checkpoint(&profile.portal_name, value)
        {
            warn!(error = %e, "Failed to store feed checkpoint");
        }

        info!(portal = %profile.portal_name, imported, "Feed synchronized");
        self.record_sync(&profile.portal_name, "ok", imported, checkpoint.clone(), now);

        Ok(FeedSyncSummary {
            imported,
            skipped: false,
            synced_at: checkpoint,
        })
    }

    /// Stores a blob and attaches it to a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the complaint does not exist or the blob cannot
    /// be stored.
    pub fn attach_document(
        &mut self,
        complaint_id: &str,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
        now: &Moment,
    ) -> Result<AttachmentRef, CoreError> {
        let Some(current) = self.state.find(complaint_id) else {
            return Err(CoreError::ComplaintNotFound(complaint_id.to_string()));
        };
        let mut documents: Vec<AttachmentRef> = current.documents.clone();

        let meta: AttachmentRef = self
            .attachments
            .put(name, mime_type, bytes, now.timestamp())
            .map_err(|e| CoreError::AttachmentUnavailable(e.to_string()))?;
        documents.push(meta.clone());

        let patch: ComplaintPatch = ComplaintPatch {
            documents: Some(documents),
            ..ComplaintPatch::default()
        };
        if let Err(e) = self.update(complaint_id, patch, now) {
            self.release(std::slice::from_ref(&meta));
            return Err(e);
        }

        Ok(meta)
    }

    /// Reads an attachment blob.
    ///
    /// # Errors
    ///
    /// Returns an error if no blob has this id or it cannot be read.
    pub fn read_document(&self, id: &str) -> Result<StoredAttachment, CoreError> {
        match self.attachments.read(id) {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(CoreError::AttachmentNotFound(id.to_string())),
            Err(e) => Err(CoreError::AttachmentUnavailable(e.to_string())),
        }
    }

    fn apply_locally(&mut self, command: Command, now: &Moment) -> Result<Change, CoreError> {
        let result: TransitionResult = apply(&self.state, command, now)?;
        self.state = result.new_state;
        self.persist();
        Ok(result.change)
    }

    fn check_rejection(error: &R::Error, operation: &str) -> Result<(), CoreError> {
        if let Some(rejected) = R::rejection(error) {
            return Err(rejected);
        }
        warn!(error = %error, operation, "Remote unavailable, applying locally");
        Ok(())
    }

    /// Sends the reconciled records whose keys were touched to the remote.
    ///
    /// Returns the records as the remote stored them, or nothing when the
    /// remote is unavailable.
    fn push_reconciled(
        &mut self,
        reconciled: &[Complaint],
        keys: &HashSet<NaturalKey>,
        operation: &str,
    ) -> Result<Vec<Complaint>, CoreError> {
        let touched: Vec<Complaint> = reconciled
            .iter()
            .filter(|c| keys.contains(&c.natural_key()))
            .cloned()
            .collect();

        match self.remote.bulk_upsert(&touched) {
            Ok(stored) => {
                debug!(
                    count = stored.len(),
                    operation,
                    "Remote accepted reconciled complaints"
                );
                Ok(stored)
            }
            Err(e) => Self::check_rejection(&e, operation).map(|()| Vec::new()),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.cache.write(&self.state.complaints) {
            warn!(error = %e, "Failed to write complaint cache");
        }
    }

    fn release(&mut self, documents: &[AttachmentRef]) {
        for doc in documents {
            if let Err(e) = self.attachments.delete(&doc.id) {
                warn!(error = %e, attachment = %doc.id, "Failed to release attachment");
            }
        }
    }

    fn record_sync(
        &mut self,
        source: &str,
        status: &str,
        imported: usize,
        message: Option<String>,
        now: &Moment,
    ) {
        let run: SyncRun = SyncRun {
            id: None,
            source: source.to_string(),
            status: status.to_string(),
            count_imported: u32::try_from(imported).unwrap_or(u32::MAX),
            message,
            created_at: now.timestamp().to_string(),
        };
        if let Err(e) = self.remote.record_sync_run(&run) {
            warn!(error = %e, "Failed to record sync run");
        }
    }
}

/// Replaces local records with the remote's stored copy of the same
/// complaint, so ids and documents follow the remote.
fn adopt_stored(mut complaints: Vec<Complaint>, stored: Vec<Complaint>) -> Vec<Complaint> {
    let positions: HashMap<NaturalKey, usize> = complaints
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.natural_key(), idx))
        .collect();

    for record in stored {
        if let Some(slot) = positions
            .get(&record.natural_key())
            .and_then(|idx| complaints.get_mut(*idx))
        {
            *slot = record;
        }
    }

    complaints
}

fn read_cache<C: ComplaintCache>(cache: &C) -> Vec<Complaint> {
    cache.read().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read complaint cache");
        Vec::new()
    })
}

fn changed_complaint(change: Change) -> Result<Complaint, CoreError> {
    match change {
        Change::Created(c) | Change::Merged(c) | Change::Updated(c) => Ok(c),
        Change::Deleted { complaint, .. } => Err(CoreError::ComplaintNotFound(complaint.id)),
        Change::Replaced { .. } | Change::Cleared => {
            Err(CoreError::ComplaintNotFound(String::new()))
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod feed;
mod memory;
mod merge;
mod moment;
mod state;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, complaint_from_draft, patch_complaint};
pub use command::Command;
pub use error::CoreError;
pub use feed::{
    Feed, FeedComplaint, FeedProfile, FeedSync, feed_item_to_complaint, normalize_status,
    sync_from_feed,
};
pub use memory::{MemoryAttachments, MemoryCache};
pub use merge::{
    COMPLAINT_ID_PREFIX, Reconciliation, dedupe, merge_record, natural_key, normalize_inserted,
    reconcile, reconcile_counted,
};
pub use moment::{Moment, new_id};
pub use state::{Change, State, TransitionResult};
pub use store::{
    ATTACHMENT_ID_PREFIX, AttachmentStore, ComplaintCache, ComplaintRemote, ComplaintStore,
    DEFAULT_MIME_TYPE, FeedSyncSummary, StoredAttachment, UpsertSummary, new_attachment_ref,
};

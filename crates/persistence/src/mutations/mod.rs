// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations for the persistence layer.
//!
//! - `complaints`: Complaint inserts, updates, deletes and keyed upserts
//! - `sync_runs`: Import history

pub mod complaints;
pub mod sync_runs;

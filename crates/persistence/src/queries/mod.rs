// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! - `complaints`: Complaint lookups and listings
//! - `sync_runs`: Import history

pub mod complaints;
pub mod sync_runs;

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

//! Track which draft commits are known to be durably backed up on a
//! remote service.
//!
//! The backed-up set is ancestry closed and only ever grows, so it is
//! never stored in full. Instead a small file per remote records its
//! heads: the set of commits whose non-public ancestor closure equals
//! the backed-up set. [`BackupState`] loads that file, falls back to
//! asking the backup service when the file is missing or unusable, and
//! re-minimizes the heads as new backup confirmations arrive.
//!
//! The commit graph, the backup service and the transaction coordinator
//! are external collaborators, consumed through the traits in this
//! crate. Nothing here decides *when* a commit becomes backed up; that
//! is the service's job.

mod error;
mod graph;
mod state;
mod store;

pub use crate::error::ProtocolError;
pub use crate::graph::BackupService;
pub use crate::graph::CommitGraph;
pub use crate::graph::FileGenerator;
pub use crate::graph::Transaction;
pub use crate::graph::WriteLocation;
pub use crate::state::BackupState;

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

//! Seams to the external collaborators: the local commit graph, the
//! remote backup service, and the transaction coordinator.

use std::collections::HashSet;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use types::Node;

/// Read-only ancestry queries against the local commit graph.
///
/// "Non-public" restricts results to draft commits. Backup tracking
/// only applies to commits that are not yet immutable shared history:
/// public commits are replicated through other channels and are never
/// part of the tracked set.
pub trait CommitGraph {
    /// All non-public ancestors (inclusive) of `roots` that are known
    /// to the local graph. Roots that are unknown or public contribute
    /// nothing.
    fn non_public_ancestors(&self, roots: &HashSet<Node>) -> Result<HashSet<Node>>;

    /// All visible non-public commits in the local graph.
    fn visible_non_public(&self) -> Result<HashSet<Node>>;

    /// Heads of `set`: members with no descendant also in `set`.
    ///
    /// Callers pass ancestry-closed sets, for which this is the minimal
    /// generating set under ancestor closure.
    fn heads(&self, set: &HashSet<Node>) -> Result<HashSet<Node>>;

    /// Whether the local graph knows about `node` at all.
    fn is_known(&self, node: &Node) -> bool;
}

/// Remote authority that knows which commits are durably backed up.
pub trait BackupService {
    /// For each queried node, in order, whether the remote has it
    /// backed up. The response must have the same length as the query;
    /// responses are matched to nodes by position.
    ///
    /// May fail with a transport or protocol error. Retry policy, if
    /// any, lives behind this trait, not in front of it.
    fn backed_up(&self, nodes: &[Node]) -> Result<Vec<bool>>;
}

/// A deferred file write, run by the transaction coordinator.
pub type FileGenerator = Box<dyn FnOnce(&mut dyn Write) -> io::Result<()>>;

/// Where a deferred write lands, relative to the repository layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteLocation {
    /// The store shared across working copies of the same repository.
    Shared,
}

/// Seam to an external transaction coordinator.
///
/// Registering a file generator defers the write: the coordinator runs
/// the generator exactly once, atomically together with the
/// transaction's other files, iff the commit succeeds. Nothing is
/// written if the transaction is rolled back.
pub trait Transaction {
    fn add_file_generator(
        &mut self,
        genid: &str,
        path: PathBuf,
        location: WriteLocation,
        generator: FileGenerator,
    );
}

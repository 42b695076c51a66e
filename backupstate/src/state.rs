/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use types::Node;

use crate::error::ProtocolError;
use crate::graph::BackupService;
use crate::graph::CommitGraph;
use crate::graph::Transaction;
use crate::store::HeadsFileStore;

/// Tracks which draft commits have been successfully backed up on one
/// remote.
///
/// The tracked set is the non-public ancestor closure of a small set of
/// heads, which is all that is kept in memory and on disk. The heads
/// are re-minimized on every [`update`](BackupState::update), so their
/// number grows with divergent branches, not with individual backup
/// confirmations.
///
/// One instance owns the state for one `(graph, remote)` pairing.
/// Access is synchronous and single-threaded; callers serialize use of
/// an instance, typically under the surrounding repository lock.
pub struct BackupState<'a, G> {
    graph: &'a G,
    store: HeadsFileStore,
    heads: HashSet<Node>,
    backed_up: Option<HashSet<Node>>,
}

impl<'a, G: CommitGraph> BackupState<'a, G> {
    /// Load the backup state for `remote_name` from `dir`, rebuilding
    /// it from the backup service when no usable local state exists.
    ///
    /// A heads file with an unrecognized version tag or written for a
    /// different remote is discarded, not migrated: rebuilding from the
    /// service is always correct, merely more expensive. Heads naming
    /// commits no longer known to the local graph are dropped; they
    /// contribute nothing to the closure.
    pub fn open(
        graph: &'a G,
        dir: impl AsRef<Path>,
        remote_name: &str,
        service: &dyn BackupService,
    ) -> Result<Self> {
        let store = HeadsFileStore::new(dir, remote_name);
        let mut state = BackupState {
            graph,
            store,
            heads: HashSet::new(),
            backed_up: None,
        };
        match state.store.read()? {
            Some(heads) => {
                state.heads = heads.into_iter().filter(|h| graph.is_known(h)).collect();
            }
            None => state.init_from_service(service)?,
        }
        Ok(state)
    }

    /// Rebuild the backed-up set by asking the backup service about
    /// every visible draft commit not already implied by the current
    /// heads.
    ///
    /// A service failure is treated as "no new information": the state
    /// ends up valid, just conservative. Opening the state never fails
    /// because the service is unreachable.
    fn init_from_service(&mut self, service: &dyn BackupService) -> Result<()> {
        let implied = self.graph.non_public_ancestors(&self.heads)?;
        let mut unknown: Vec<Node> = self
            .graph
            .visible_non_public()?
            .into_iter()
            .filter(|n| !implied.contains(n))
            .collect();
        // Stable query order; responses are matched by position.
        unknown.sort_unstable();

        let mut confirmed = HashSet::new();
        if !unknown.is_empty() {
            match query_backed_up(service, &unknown) {
                Ok(flags) => {
                    for (node, backed_up) in unknown.iter().zip(flags) {
                        if backed_up {
                            confirmed.insert(*node);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!("backup service query failed ({}), assuming nothing new", e);
                }
            }
        }
        self.update(confirmed, None)
    }

    /// Record that `new_nodes`, and implicitly their non-public
    /// ancestors, are backed up.
    ///
    /// The heads become `heads(closure(heads) + closure(new_nodes))`:
    /// monotone (the tracked set never shrinks) and minimal (no head is
    /// an ancestor of another). The result is persisted before this
    /// returns, either atomically in place or deferred into `txn`, and
    /// the memoized backed-up set is invalidated.
    pub fn update(
        &mut self,
        new_nodes: HashSet<Node>,
        txn: Option<&mut dyn Transaction>,
    ) -> Result<()> {
        let mut closure = self.graph.non_public_ancestors(&self.heads)?;
        closure.extend(self.graph.non_public_ancestors(&new_nodes)?);
        self.heads = self.graph.heads(&closure)?;
        self.backed_up = None;
        tracing::debug!("backedupheads updated to {} heads", self.heads.len());
        self.store.write(&self.heads, txn)
    }

    /// The current heads. Their non-public ancestor closure is the
    /// backed-up set.
    pub fn heads(&self) -> &HashSet<Node> {
        &self.heads
    }

    /// The full backed-up set: the non-public ancestor closure of the
    /// heads still known to the local graph. Computed on first access
    /// and memoized until the next [`update`](BackupState::update).
    pub fn backed_up(&mut self) -> Result<&HashSet<Node>> {
        if self.backed_up.is_none() {
            let known: HashSet<Node> = self
                .heads
                .iter()
                .filter(|h| self.graph.is_known(h))
                .copied()
                .collect();
            self.backed_up = Some(self.graph.non_public_ancestors(&known)?);
        }
        Ok(self.backed_up.as_ref().expect("memoized above"))
    }
}

/// Query the service, enforcing the ordered request/response contract
/// at the boundary.
fn query_backed_up(service: &dyn BackupService, nodes: &[Node]) -> Result<Vec<bool>> {
    let flags = service.backed_up(nodes)?;
    if flags.len() != nodes.len() {
        return Err(ProtocolError::ResponseLengthMismatch {
            sent: nodes.len(),
            got: flags.len(),
        }
        .into());
    }
    Ok(flags)
}

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched change feed.
//!
//! Observers hear about each edit as it happens. Consumers that would rather
//! catch up periodically (a renderer, an autosave, an index) drain the dirty
//! channels instead:
//!
//! 1. **SIDE**: drained with dependents, so every node whose effective side
//!    may have changed is listed, parents before children.
//! 2. **CONTENT** / **FOLDING**: drained as marked; each content clone of an
//!    edited node is listed.
//! 3. **TOPOLOGY**: parents whose child list changed.
//!
//! [`MapChanges`] uses raw slot indices, like [`NodeId::index`]. A slot that
//! was freed since it was marked is not reported.
//!
//! [`NodeId::index`]: super::NodeId::index

use alloc::vec::Vec;

use crate::dirty;

use super::store::NodeMap;

/// The set of changes accumulated since the last drain.
#[derive(Clone, Debug, Default)]
pub struct MapChanges {
    /// Nodes whose effective side may have changed.
    pub sides: Vec<u32>,
    /// Nodes whose shared content changed.
    pub content: Vec<u32>,
    /// Nodes whose folding state changed.
    pub folding: Vec<u32>,
    /// Nodes whose child list changed.
    pub topology: Vec<u32>,
    /// Nodes created since the last drain.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last drain.
    pub removed: Vec<u32>,
}

impl MapChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.sides.clear();
        self.content.clear();
        self.folding.clear();
        self.topology.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
            && self.content.is_empty()
            && self.folding.is_empty()
            && self.topology.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl NodeMap {
    /// Drains every dirty channel and returns what changed.
    pub fn drain_changes(&mut self) -> MapChanges {
        let mut changes = MapChanges::default();
        self.drain_changes_into(&mut changes);
        changes
    }

    /// Like [`drain_changes`](Self::drain_changes), but reuses a
    /// caller-provided buffer.
    pub fn drain_changes_into(&mut self, changes: &mut MapChanges) {
        changes.clear();

        changes.sides = self
            .dirty
            .drain(dirty::SIDE)
            .affected()
            .deterministic()
            .run()
            .collect();
        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        changes.folding = self
            .dirty
            .drain(dirty::FOLDING)
            .deterministic()
            .run()
            .collect();
        changes.topology = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        for list in [
            &mut changes.sides,
            &mut changes.content,
            &mut changes.folding,
            &mut changes.topology,
        ] {
            list.retain(|idx| !self.free_list.contains(idx));
        }

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

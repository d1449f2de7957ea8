// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clone-group membership.
//!
//! Every node belongs to exactly one group per [`CloneType`]. A group records
//! two things:
//!
//! - **Membership**: the node instances that are clones of one another. This
//!   is the clone relationship itself and only changes when clones are
//!   created, converted, swapped, or destroyed.
//! - **Attached bookkeeping**: the subset of members currently reachable from
//!   the live map root. [`attach`](CloneGroup::attach) and
//!   [`detach`](CloneGroup::detach) only touch this subset.
//!
//! A standalone node is the single member of both of its groups, so
//! [`Clones::size`] is never zero.

use alloc::vec::Vec;

use super::id::NodeId;
use super::store::NodeMap;

/// The two kinds of clone relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloneType {
    /// Whole-subtree clone: structure is cloned, content is shared at each
    /// level.
    Tree,
    /// Content clone: only the shared data is common, positions are
    /// independent.
    Content,
}

impl CloneType {
    /// Both clone types, in slot order.
    pub const ALL: [Self; 2] = [Self::Tree, Self::Content];

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Tree => 0,
            Self::Content => 1,
        }
    }
}

/// One equivalence class of clones, stored in the map's group arena.
#[derive(Clone, Debug)]
pub(crate) struct CloneGroup {
    pub(crate) kind: CloneType,
    /// Member slots in join order.
    pub(crate) members: Vec<u32>,
    /// Members currently attached to the live map.
    pub(crate) attached: Vec<u32>,
}

impl CloneGroup {
    pub(crate) fn new(kind: CloneType, first: u32) -> Self {
        Self {
            kind,
            members: alloc::vec![first],
            attached: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, idx: u32) -> bool {
        self.members.contains(&idx)
    }

    pub(crate) fn join(&mut self, idx: u32) {
        debug_assert!(!self.contains(idx), "slot {idx} is already a member");
        self.members.push(idx);
    }

    /// Removes `idx` from membership and attached bookkeeping.
    ///
    /// Returns `true` if the group is now empty.
    pub(crate) fn leave(&mut self, idx: u32) -> bool {
        self.members.retain(|&m| m != idx);
        self.attached.retain(|&m| m != idx);
        self.members.is_empty()
    }

    /// Records `idx` as attached. Repeated calls are no-ops.
    pub(crate) fn attach(&mut self, idx: u32) {
        if !self.attached.contains(&idx) {
            self.attached.push(idx);
        }
    }

    /// Forgets that `idx` is attached. Repeated calls are no-ops.
    pub(crate) fn detach(&mut self, idx: u32) {
        self.attached.retain(|&m| m != idx);
    }

    pub(crate) fn is_attached(&self, idx: u32) -> bool {
        self.attached.contains(&idx)
    }

    /// Re-points the member entry for `old` to `new`.
    pub(crate) fn replace(&mut self, old: u32, new: u32) {
        for member in &mut self.members {
            if *member == old {
                *member = new;
            }
        }
        for member in &mut self.attached {
            if *member == old {
                *member = new;
            }
        }
    }
}

/// A read-only view of one node's clone group.
///
/// Created by [`NodeMap::clones`].
#[derive(Clone, Copy)]
pub struct Clones<'a> {
    map: &'a NodeMap,
    group: &'a CloneGroup,
}

impl core::fmt::Debug for Clones<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clones")
            .field("kind", &self.group.kind)
            .field("members", &self.group.members)
            .field("attached", &self.group.attached)
            .finish()
    }
}

impl<'a> Clones<'a> {
    pub(crate) fn new(map: &'a NodeMap, group: &'a CloneGroup) -> Self {
        Self { map, group }
    }

    /// Returns which clone relationship this group tracks.
    #[must_use]
    pub fn kind(&self) -> CloneType {
        self.group.kind
    }

    /// Returns the number of members, attached or not. Always at least 1.
    #[must_use]
    pub fn size(&self) -> usize {
        self.group.members.len()
    }

    /// Returns the number of members attached to the live map.
    #[must_use]
    pub fn attached_len(&self) -> usize {
        self.group.attached.len()
    }

    /// Returns whether `node` is a member.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.map.is_alive(node) && self.group.contains(node.idx)
    }

    /// Returns whether `node` is a member attached to the live map.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.map.is_alive(node) && self.group.is_attached(node.idx)
    }

    /// Iterates over the members in join order.
    pub fn iter(self) -> impl Iterator<Item = NodeId> + 'a {
        let Self { map, group } = self;
        group.members.iter().map(move |&idx| map.handle(idx))
    }

    /// Iterates over the attached members.
    pub fn attached(self) -> impl Iterator<Item = NodeId> + 'a {
        let Self { map, group } = self;
        group.attached.iter().map(move |&idx| map.handle(idx))
    }
}

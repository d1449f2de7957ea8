// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications and the observer contract.
//!
//! Three kinds of observer are notified by a [`NodeMap`]:
//!
//! - **[`NodeView`]**: registered per node with
//!   [`NodeMap::add_viewer`]. Receives structural events for the node it
//!   watches and content changes of that node.
//! - **[`MapChangeListener`]**: registered once per map. Receives every
//!   insert, delete, and move.
//! - **[`NodeChangeListener`]**: registered once per map. Receives every
//!   content change, once per content clone.
//!
//! All methods default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! # Ordering
//!
//! - Insert: map listeners, then the parent's viewers.
//! - Delete: the parent's viewers, then map listeners.
//! - Move: the old parent's viewers receive a delete, then map listeners
//!   receive the move, then the new parent's viewers receive an insert.
//! - Content change: for each member of the edited node's CONTENT clone
//!   group, node-change listeners and then that member's viewers receive an
//!   event retargeted to the member.
//!
//! # Reentrancy
//!
//! Observers are called after the edit has completed, with a shared borrow
//! of the map, so they always see a consistent tree. Every fan-out iterates
//! over a snapshot of the observer list and of the clone-group membership
//! taken before the first callback. Further mutations an observer wants to
//! make must be deferred until the triggering call returns.
//!
//! A panicking observer aborts the remaining fan-out of that call; the tree
//! edit itself has already been applied.

use alloc::string::String;

use crate::node::{NodeId, NodeMap, Side};

/// Which part of a node changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeProperty {
    /// Plain text.
    Text,
    /// XML-serialized text.
    XmlText,
    /// Icon list.
    Icons,
    /// Folding state.
    Folding,
    /// History timestamps.
    History,
    /// Side hint.
    Side,
    /// Clone-group membership.
    Clones,
    /// Anything else; viewers should refresh everything.
    Unknown,
}

/// An old or new value carried by a [`NodeChangeEvent`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChangeValue {
    /// No value recorded.
    #[default]
    None,
    /// A text value.
    Text(String),
    /// A boolean flag.
    Flag(bool),
    /// A side hint.
    Side(Side),
    /// A count, e.g. the number of icons.
    Count(usize),
}

/// A content change on one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeChangeEvent {
    /// The node this event is delivered for.
    pub node: NodeId,
    /// Which property changed.
    pub property: NodeProperty,
    /// The value before the change.
    pub old_value: ChangeValue,
    /// The value after the change.
    pub new_value: ChangeValue,
}

impl NodeChangeEvent {
    /// Creates an event for `node`.
    #[must_use]
    pub fn new(
        node: NodeId,
        property: NodeProperty,
        old_value: ChangeValue,
        new_value: ChangeValue,
    ) -> Self {
        Self {
            node,
            property,
            old_value,
            new_value,
        }
    }

    /// Creates an event without old or new values.
    #[must_use]
    pub fn refresh(node: NodeId, property: NodeProperty) -> Self {
        Self::new(node, property, ChangeValue::None, ChangeValue::None)
    }

    /// Returns the same change retargeted at another content clone.
    #[must_use]
    pub fn for_node(&self, node: NodeId) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }
}

/// A child inserted under a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeInsertionEvent {
    /// The new parent.
    pub parent: NodeId,
    /// The inserted child.
    pub child: NodeId,
    /// The child's index in the parent after insertion.
    pub index: usize,
}

/// A child removed from a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeDeletionEvent {
    /// The former parent.
    pub parent: NodeId,
    /// The removed child.
    pub child: NodeId,
    /// The child's index in the parent before removal.
    pub index: usize,
}

/// A child moved from one parent position to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMoveEvent {
    /// The parent before the move.
    pub old_parent: NodeId,
    /// The index under the old parent before the move.
    pub old_index: usize,
    /// The parent after the move.
    pub new_parent: NodeId,
    /// The index under the new parent after the move.
    pub new_index: usize,
    /// The moved node.
    pub child: NodeId,
}

impl NodeMoveEvent {
    /// Returns the removal half of the move.
    #[must_use]
    pub fn deletion(&self) -> NodeDeletionEvent {
        NodeDeletionEvent {
            parent: self.old_parent,
            child: self.child,
            index: self.old_index,
        }
    }

    /// Returns the insertion half of the move.
    #[must_use]
    pub fn insertion(&self) -> NodeInsertionEvent {
        NodeInsertionEvent {
            parent: self.new_parent,
            child: self.child,
            index: self.new_index,
        }
    }
}

/// Observes one node.
pub trait NodeView {
    /// Called on the parent's viewers after a child was inserted.
    fn on_node_inserted(&self, map: &NodeMap, e: &NodeInsertionEvent) {
        _ = (map, e);
    }

    /// Called on the parent's viewers after a child was removed.
    fn on_node_deleted(&self, map: &NodeMap, e: &NodeDeletionEvent) {
        _ = (map, e);
    }

    /// Called after the watched node's content changed.
    fn node_changed(&self, map: &NodeMap, e: &NodeChangeEvent) {
        _ = (map, e);
    }
}

/// Observes every structural change of a map.
pub trait MapChangeListener {
    /// Called after a child was inserted.
    fn on_node_inserted(&self, map: &NodeMap, e: &NodeInsertionEvent) {
        _ = (map, e);
    }

    /// Called after a child was removed.
    fn on_node_deleted(&self, map: &NodeMap, e: &NodeDeletionEvent) {
        _ = (map, e);
    }

    /// Called after a child was moved.
    fn on_node_moved(&self, map: &NodeMap, e: &NodeMoveEvent) {
        _ = (map, e);
    }
}

/// Observes every content change of a map.
pub trait NodeChangeListener {
    /// Called once per content clone of the changed node.
    fn node_changed(&self, map: &NodeMap, e: &NodeChangeEvent) {
        _ = (map, e);
    }
}

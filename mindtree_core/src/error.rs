// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for node tree operations.
//!
//! Stale [`NodeId`](crate::node::NodeId) handles are programming errors and
//! panic. Everything a well-behaved caller can still trigger (a bad child
//! index, an illegal move, a refused clone) is reported as a [`NodeError`].

use alloc::string::String;

use thiserror::Error;

/// Errors returned by structural and cloning operations on a
/// [`NodeMap`](crate::node::NodeMap).
///
/// A failing operation leaves the map unchanged.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NodeError {
    /// A child index was outside `0..=len` (insert) or `0..len` (remove).
    #[error("child index {index} out of bounds (child count {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of children at the time of the request.
        len: usize,
    },

    /// The node carries an encryption extension, so its content cannot be
    /// shared with a clone.
    #[error("cannot clone the content of an encrypted node")]
    CloneEncryptedNode,

    /// The node already has a parent and must be removed first.
    #[error("node already has a parent")]
    HasParent,

    /// The operation needs a parent but the node has none.
    #[error("node has no parent")]
    NoParent,

    /// The new parent is the node itself or one of its descendants.
    #[error("cannot move a node into its own subtree")]
    WouldCreateCycle,

    /// The map root cannot be inserted, moved, or destroyed.
    #[error("operation not allowed on the map root")]
    RootNode,

    /// The ID is already registered to another node.
    #[error("id {0} is already registered")]
    DuplicateId(String),

    /// The selected nodes do not share a parent.
    #[error("selected nodes have different parents")]
    DifferentParents,
}

impl NodeError {
    /// Returns `true` if this error is the clone refusal for access-restricted
    /// content.
    #[must_use]
    pub fn is_clone_restriction(&self) -> bool {
        matches!(self, Self::CloneEncryptedNode)
    }
}

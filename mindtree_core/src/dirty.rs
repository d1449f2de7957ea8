// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Mindtree uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! tell a layout consumer which nodes need another look since the last
//! [`NodeMap::drain_changes`](crate::node::NodeMap::drain_changes). Each
//! channel represents an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`SIDE`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. A node's effective side is inherited from its
//!   ancestors, so marking a node marks its whole subtree.
//!
//! - **Local-only**: [`CONTENT`] and [`FOLDING`] are marked with the default
//!   policy. A content mutation marks every content clone of the edited node
//!   individually, since they share the same data.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on the parent whose child list
//!   changed (insert, remove, move, clone-tree construction).

use understory_dirty::Channel;

/// Side hint changed; the effective side of the whole subtree may differ.
pub const SIDE: Channel = Channel::new(0);

/// Shared content (text, icons, extensions, history) changed.
pub const CONTENT: Channel = Channel::new(1);

/// Folding state changed.
pub const FOLDING: Channel = Channel::new(2);

/// Child list changed.
pub const TOPOLOGY: Channel = Channel::new(3);

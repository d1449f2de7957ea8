// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mind-map node data model.
//!
//! A *node* is one entry of a mind-map tree. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: parent, ordered children, and a preferred child (the one most
//!   recently inserted at an explicit position).
//! - Per-instance properties: a [`Side`] hint, an optional string ID,
//!   individual extensions, and registered viewers.
//! - Content: a [`SharedNodeData`] payload (text, icons, history, folding,
//!   shared extensions) that may be shared with other nodes.
//!
//! # Clones
//!
//! Nodes can be clones of one another in two senses, see [`CloneType`]. A
//! CONTENT clone shares the payload only. A TREE clone additionally mirrors
//! structure: [`NodeMap::clone_tree`] copies a whole subtree whose nodes each
//! share content with the node they mirror. Every node belongs to exactly one
//! group per clone type, and TREE membership implies CONTENT membership.
//!
//! Clone groups also record which members are *attached*, that is reachable
//! from the map root. Inserting under an attached parent attaches the whole
//! inserted subtree; removing it detaches it again.
//!
//! # Dirty tracking
//!
//! Mutations mark the channels in [`dirty`](crate::dirty):
//!
//! - **SIDE**: propagates to all descendants, since sides are inherited.
//! - **CONTENT** / **FOLDING**: marked on every content clone of the edited
//!   node.
//! - **TOPOLOGY**: marked on the parent whose child list changed.
//!
//! [`NodeMap::drain_changes`] collects them into a [`MapChanges`].

mod changes;
mod cloner;
mod clones;
mod content;
mod id;
mod layout;
mod level;
mod notify;
mod shared;
mod side;
mod store;
mod traverse;
mod visibility;

pub use changes::MapChanges;
pub use clones::{CloneType, Clones};
pub use id::{INVALID, NodeId};
pub use level::{MapViewLayout, Selection, ViewSettings};
pub use shared::{HistoryInformation, NamedIcon, SharedNodeData};
pub use side::Side;
pub use store::NodeMap;
pub use traverse::{Ancestors, Children, Descendants};

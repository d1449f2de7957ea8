// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree and clone semantics for mind maps.
//!
//! `mindtree_core` holds the document model of a mind map: an ordered tree of
//! nodes whose content can be shared between several positions (clones). It
//! is `no_std` compatible (with `alloc`) and stores nodes in struct-of-arrays
//! form behind generational index handles.
//!
//! # Architecture
//!
//! ```text
//!   caller edit ──► NodeMap ──► observers (NodeView, listeners)
//!                      │
//!                      └──► dirty channels ──► NodeMap::drain_changes()
//!                                                   │
//!                                                   ▼
//!                                              MapChanges
//! ```
//!
//! **[`node`]**: The node arena with topology, clone groups, shared content,
//! side resolution, and level changes.
//!
//! **[`event`]**: Change events and the observer traits notified after each
//! edit.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`, for
//! consumers that catch up in batches.
//!
//! **[`extension`]**: Typed extension slots that other features hang state
//! on, plus the marker extensions the core consults.
//!
//! **[`filter`]**: The visibility filter capability.
//!
//! **[`choice`]**: Selection model for enumerated properties.
//!
//! **[`error`]**: [`NodeError`](error::NodeError).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod choice;
pub mod dirty;
pub mod error;
pub mod event;
pub mod extension;
pub mod filter;
pub mod node;

pub use error::NodeError;

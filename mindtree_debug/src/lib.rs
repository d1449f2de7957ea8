// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event recording, pretty-printing, and JSON export for mindtree
//! diagnostics.
//!
//! This crate provides observer implementations for development and
//! post-mortem analysis of a [`NodeMap`](mindtree_core::node::NodeMap):
//!
//! - [`pretty::PrettyPrintView`]: one human-readable line per event, plus an
//!   indented outline dump of a subtree.
//! - [`recorder::RecorderListener`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json`]: writes recorded events or a subtree snapshot as JSON.

pub mod json;
pub mod pretty;
pub mod recorder;

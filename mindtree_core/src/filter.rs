// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility filtering capability.

use crate::node::{NodeId, NodeMap};

/// Decides whether a node passes the active filter.
///
/// Supplied by a filtering subsystem outside the core; visibility queries
/// such as [`NodeMap::is_visible`] take an `Option<&dyn Filter>` where `None`
/// means "everything is visible".
pub trait Filter {
    /// Returns `true` if `node` satisfies the filter.
    fn is_visible(&self, map: &NodeMap, node: NodeId) -> bool;
}

impl<F: Fn(&NodeMap, NodeId) -> bool> Filter for F {
    fn is_visible(&self, map: &NodeMap, node: NodeId) -> bool {
        self(map, node)
    }
}

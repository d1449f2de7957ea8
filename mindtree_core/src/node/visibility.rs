// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter-aware visibility queries.
//!
//! A hidden summary node only anchors its group: it never has visible content
//! of its own, yet counts as visible so that its subtree stays reachable.

use crate::extension::SummaryNode;
use crate::filter::Filter;

use super::id::NodeId;
use super::store::NodeMap;

impl NodeMap {
    /// Returns whether `node` is a hidden summary node.
    #[must_use]
    pub fn is_hidden_summary(&self, node: NodeId) -> bool {
        self.extension::<SummaryNode>(node)
            .is_some_and(|summary| summary.hidden)
    }

    fn satisfies(&self, node: NodeId, filter: Option<&dyn Filter>) -> bool {
        filter.is_none_or(|f| f.is_visible(self, node))
    }

    /// Returns whether `node` shows content under `filter`.
    #[must_use]
    pub fn has_visible_content(&self, node: NodeId, filter: Option<&dyn Filter>) -> bool {
        !self.is_hidden_summary(node) && self.satisfies(node, filter)
    }

    /// Returns whether `node` is visible under `filter`.
    #[must_use]
    pub fn is_visible(&self, node: NodeId, filter: Option<&dyn Filter>) -> bool {
        self.is_hidden_summary(node) || self.satisfies(node, filter)
    }

    /// Returns whether `node` or any descendant shows content.
    #[must_use]
    pub fn subtree_has_visible_content(&self, node: NodeId, filter: Option<&dyn Filter>) -> bool {
        self.descendants(node)
            .any(|n| self.has_visible_content(n, filter))
    }

    /// Returns whether any descendant of `node` shows content.
    #[must_use]
    pub fn child_subtrees_have_visible_content(
        &self,
        node: NodeId,
        filter: Option<&dyn Filter>,
    ) -> bool {
        self.children(node)
            .any(|child| self.subtree_has_visible_content(child, filter))
    }

    /// Returns the nearest ancestor-or-self with visible content.
    #[must_use]
    pub fn visible_ancestor_or_self(
        &self,
        node: NodeId,
        filter: Option<&dyn Filter>,
    ) -> Option<NodeId> {
        core::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| self.has_visible_content(n, filter))
    }

    /// Returns the number of ancestors.
    #[must_use]
    pub fn node_level(&self, node: NodeId) -> usize {
        self.depth(node)
    }

    /// Returns the number of ancestors visible under `filter`.
    #[must_use]
    pub fn node_level_filtered(&self, node: NodeId, filter: Option<&dyn Filter>) -> usize {
        self.ancestors(node)
            .filter(|&n| self.is_visible(n, filter))
            .count()
    }
}

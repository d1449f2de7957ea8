// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side hints and left/right resolution.
//!
//! A node's effective side is relative to a layout root. Direct children of
//! the layout root decide by their own hint; deeper nodes inherit the side of
//! their parent. A child of the layout root with a `Default` hint falls back
//! to the side its parent has relative to the map root, which lets a subtree
//! shown as its own layout root keep the orientation it has in the whole map.

use alloc::vec::Vec;

use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::event::{ChangeValue, NodeChangeEvent, NodeProperty};
use crate::extension::FreeNode;

use super::clones::CloneType;
use super::id::{INVALID, NodeId};
use super::side::Side;
use super::store::NodeMap;

impl NodeMap {
    /// Returns the side hint of `node`.
    #[must_use]
    pub fn side(&self, node: NodeId) -> Side {
        self.validate(node);
        self.side[node.idx as usize]
    }

    /// Sets the side hint.
    ///
    /// Inside a cloned subtree the hint is applied to every TREE clone of
    /// `node`, keeping the copies laid out alike. Otherwise only `node`
    /// changes. Each node whose hint actually changed receives a
    /// [`NodeProperty::Side`] change.
    pub fn set_side(&mut self, node: NodeId, side: Side) {
        let targets: Vec<u32> = if self.is_clone_tree_node(node) {
            self.group(node.idx, CloneType::Tree).members.clone()
        } else {
            alloc::vec![node.idx]
        };
        let mut changed = Vec::new();
        for idx in targets {
            let old = core::mem::replace(&mut self.side[idx as usize], side);
            if old != side {
                self.dirty.mark_with(idx, dirty::SIDE, &EagerPolicy);
                changed.push((idx, old));
            }
        }
        for (idx, old) in changed {
            self.fire_single_node_changed(&NodeChangeEvent::new(
                self.handle(idx),
                NodeProperty::Side,
                ChangeValue::Side(old),
                ChangeValue::Side(side),
            ));
        }
    }

    /// Returns whether `node` is laid out on the left of `root`.
    #[must_use]
    pub fn is_left(&self, node: NodeId, root: NodeId) -> bool {
        self.validate(node);
        self.validate(root);
        let idx = node.idx;
        self.would_be_left_idx(root.idx, self.side[idx as usize], self.parent[idx as usize])
    }

    /// Returns whether `node` would be on the left of `root` if it were a
    /// child of `parent`.
    ///
    /// A node without a parent is never on the left.
    #[must_use]
    pub fn would_be_left(&self, node: NodeId, root: NodeId, parent: Option<NodeId>) -> bool {
        self.validate(node);
        self.validate(root);
        let parent = parent.map_or(INVALID, |p| {
            self.validate(p);
            p.idx
        });
        self.would_be_left_idx(root.idx, self.side[node.idx as usize], parent)
    }

    fn would_be_left_idx(&self, mut root: u32, mut side: Side, mut parent: u32) -> bool {
        loop {
            if parent == INVALID {
                return false;
            }
            if parent == root {
                if side != Side::Default {
                    return side == Side::Left;
                }
                // Inherit the parent's side relative to the map root.
                root = self.root;
            }
            side = self.side[parent as usize];
            parent = self.parent[parent as usize];
        }
    }

    /// Suggests the side for a new child of `node`.
    ///
    /// Only the layout root balances its children; any other node gets
    /// [`Side::Default`]. Hidden summaries and free nodes are not counted.
    /// As soon as more than half of the counted children are on the right
    /// the suggestion is [`Side::Left`], otherwise [`Side::Right`]. A root
    /// without countable children gets [`Side::Right`].
    #[must_use]
    pub fn suggest_new_child_side(&self, node: NodeId, root: NodeId) -> Side {
        self.validate(root);
        if node != root {
            return Side::Default;
        }
        let children: Vec<NodeId> = self.children(node).collect();
        let mut in_tree = children.len();
        let mut right = 0;
        for child in children {
            if self.is_hidden_summary(child) || self.contains_extension::<FreeNode>(child) {
                in_tree -= 1;
            } else if !self.is_left(child, node) {
                right += 1;
            }
            if right > in_tree / 2 {
                return Side::Left;
            }
        }
        Side::Right
    }

    /// Pins every child whose hint is `Default` to the side it currently
    /// resolves to relative to `node`.
    pub fn set_child_node_sides_as_now(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            if self.side(child) == Side::Default {
                let left = self.is_left(child, node);
                self.set_side(child, Side::from_left(left));
            }
        }
    }

    /// Returns the index of the first child after `index` whose side matches
    /// `left_side`. `None` starts the scan at the first child.
    #[must_use]
    pub fn next_node_index(
        &self,
        node: NodeId,
        root: NodeId,
        index: Option<usize>,
        left_side: bool,
    ) -> Option<usize> {
        let start = index.map_or(0, |i| i + 1);
        let count = self.child_count(node);
        (start..count).find(|&i| self.child_side_matches(node, root, i, left_side))
    }

    /// Returns the index of the last child before `index` whose side matches
    /// `left_side`.
    #[must_use]
    pub fn previous_node_index(
        &self,
        node: NodeId,
        root: NodeId,
        index: usize,
        left_side: bool,
    ) -> Option<usize> {
        let end = index.min(self.child_count(node));
        (0..end)
            .rev()
            .find(|&i| self.child_side_matches(node, root, i, left_side))
    }

    fn child_side_matches(&self, node: NodeId, root: NodeId, i: usize, left_side: bool) -> bool {
        self.child_at(node, i)
            .is_some_and(|child| self.is_left(child, root) == left_side)
    }
}

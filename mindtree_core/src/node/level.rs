// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moves and level changes (promote/demote a selection).

use alloc::vec::Vec;

use crate::error::NodeError;
use crate::event::NodeMoveEvent;
use crate::extension::{FreeNode, SummaryNode};

use super::id::{INVALID, NodeId};
use super::side::Side;
use super::store::NodeMap;

/// How the map view arranges nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapViewLayout {
    /// Children fan out to the sides of their parent.
    #[default]
    Map,
    /// An indented list. Promoting a node takes its following siblings
    /// along as its new children.
    Outline,
}

/// View capabilities consulted by level changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewSettings {
    /// Current layout.
    pub layout: MapViewLayout,
    /// Whether the view can show nodes on the left of the layout root.
    pub left_tree_supported: bool,
}

/// The nodes a level change applies to.
#[derive(Clone, Copy, Debug)]
pub struct Selection<'a> {
    /// The layout root the selection is shown under.
    pub root: NodeId,
    /// The focused node.
    pub selected: NodeId,
    /// Every selected node, including `selected`. All must share its parent.
    pub nodes: &'a [NodeId],
}

impl NodeMap {
    /// Moves `node` to `index` under `new_parent`.
    ///
    /// Notifies the old parent's viewers of a deletion, map listeners of the
    /// move, and the new parent's viewers of an insertion. Attachment follows
    /// the new parent.
    ///
    /// # Errors
    ///
    /// - [`NodeError::NoParent`] if `node` has no parent.
    /// - [`NodeError::RootNode`] if `node` is the map root.
    /// - [`NodeError::WouldCreateCycle`] if `new_parent` is `node` or one of
    ///   its descendants.
    /// - [`NodeError::IndexOutOfBounds`] if `index` exceeds the child count
    ///   of `new_parent` without `node`.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale.
    pub fn move_node(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: usize,
    ) -> Result<(), NodeError> {
        self.check_move(node, new_parent)?;
        let c = node.idx;
        let old_p = self.parent[c as usize];
        let len =
            self.children[new_parent.idx as usize].len() - usize::from(old_p == new_parent.idx);
        if index > len {
            return Err(NodeError::IndexOutOfBounds { index, len });
        }
        let old_index = self.children[old_p as usize]
            .iter()
            .position(|&s| s == c)
            .ok_or(NodeError::NoParent)?;

        self.remove_raw(old_p, old_index);
        self.insert_raw(new_parent.idx, c, Some(index));
        tracing::debug!(node = c, from = old_p, to = new_parent.idx, index, "moved node");
        self.fire_node_moved(&NodeMoveEvent {
            old_parent: self.handle(old_p),
            old_index,
            new_parent,
            new_index: index,
            child: node,
        });
        Ok(())
    }

    /// Moves `nodes` in order to consecutive positions starting at `index`
    /// under `new_parent`.
    ///
    /// `index` counts the children of `new_parent` that are not being moved,
    /// so `0` places the nodes first and the number of remaining children
    /// places them last. A node named more than once moves once, at its
    /// first mention. Every node is checked before anything moves.
    ///
    /// # Errors
    ///
    /// As for [`move_node`](Self::move_node), with the bound taken over the
    /// children that stay.
    pub fn move_nodes(
        &mut self,
        nodes: &[NodeId],
        new_parent: NodeId,
        index: usize,
    ) -> Result<(), NodeError> {
        self.validate(new_parent);
        let mut moving: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &node in nodes {
            self.check_move(node, new_parent)?;
            if !moving.contains(&node) {
                moving.push(node);
            }
        }
        let staying: Vec<u32> = self.children[new_parent.idx as usize]
            .iter()
            .copied()
            .filter(|c| !moving.iter().any(|n| n.idx == *c))
            .collect();
        if index > staying.len() {
            return Err(NodeError::IndexOutOfBounds {
                index,
                len: staying.len(),
            });
        }

        // Each node lands right before this sibling, or last when there is none.
        let anchor = staying.get(index).copied();
        for node in moving {
            let siblings = &self.children[new_parent.idx as usize];
            let anchor_at = anchor
                .and_then(|a| siblings.iter().position(|&c| c == a))
                .unwrap_or(siblings.len());
            let before_anchor = self.parent[node.idx as usize] == new_parent.idx
                && siblings
                    .iter()
                    .position(|&c| c == node.idx)
                    .is_some_and(|at| at < anchor_at);
            self.move_node(node, new_parent, anchor_at - usize::from(before_anchor))?;
        }
        Ok(())
    }

    fn check_move(&self, node: NodeId, new_parent: NodeId) -> Result<(), NodeError> {
        self.validate(node);
        self.validate(new_parent);
        if node.idx == self.root {
            return Err(NodeError::RootNode);
        }
        if self.parent[node.idx as usize] == INVALID {
            return Err(NodeError::NoParent);
        }
        if node == new_parent || self.is_descendant_idx(new_parent.idx, node.idx) {
            return Err(NodeError::WouldCreateCycle);
        }
        Ok(())
    }

    /// Handles the "move left" gesture.
    ///
    /// On the left side of a left/right layout this demotes the selection,
    /// everywhere else it promotes it.
    ///
    /// # Errors
    ///
    /// [`NodeError::NoParent`] when the focused node has no parent,
    /// [`NodeError::DifferentParents`] when the selection spans parents.
    pub fn change_level_left(
        &mut self,
        selection: &Selection<'_>,
        view: ViewSettings,
    ) -> Result<(), NodeError> {
        if view.left_tree_supported && self.is_left(selection.selected, selection.root) {
            self.move_downwards(selection)
        } else {
            self.move_upwards(selection, view)
        }
    }

    /// Handles the "move right" gesture, mirroring
    /// [`change_level_left`](Self::change_level_left).
    ///
    /// # Errors
    ///
    /// As for [`change_level_left`](Self::change_level_left).
    pub fn change_level_right(
        &mut self,
        selection: &Selection<'_>,
        view: ViewSettings,
    ) -> Result<(), NodeError> {
        if view.left_tree_supported && self.is_left(selection.selected, selection.root) {
            self.move_upwards(selection, view)
        } else {
            self.move_downwards(selection)
        }
    }

    /// Returns the common parent and the selection in sibling order.
    fn checked_selection(
        &self,
        selection: &Selection<'_>,
    ) -> Result<(NodeId, Vec<NodeId>), NodeError> {
        let parent = self.parent(selection.selected).ok_or(NodeError::NoParent)?;
        let mut nodes = selection.nodes.to_vec();
        if !nodes.contains(&selection.selected) {
            nodes.push(selection.selected);
        }
        for &node in &nodes {
            if self.parent(node) != Some(parent) {
                return Err(NodeError::DifferentParents);
            }
        }
        nodes.sort_by_key(|&node| self.index_of(parent, node));
        nodes.dedup();
        Ok((parent, nodes))
    }

    fn move_downwards(&mut self, selection: &Selection<'_>) -> Result<(), NodeError> {
        let (parent, nodes) = self.checked_selection(selection)?;
        let own = self.index_of(parent, selection.selected).unwrap_or_default();
        let count = self.child_count(parent);
        let target = (0..own)
            .rev()
            .chain(own + 1..count)
            .filter_map(|i| self.child_at(parent, i))
            .find(|&candidate| self.can_move_to(selection, &nodes, candidate));
        let Some(target) = target else {
            tracing::trace!(node = selection.selected.idx, "no sibling to demote into");
            return Ok(());
        };
        for &node in &nodes {
            self.remove_extension::<FreeNode>(node);
        }
        let at = self.child_count(target);
        self.move_nodes(&nodes, target, at)
    }

    fn can_move_to(&self, selection: &Selection<'_>, nodes: &[NodeId], candidate: NodeId) -> bool {
        !nodes.contains(&candidate)
            && self.is_left(selection.selected, selection.root)
                == self.is_left(candidate, selection.root)
            && (self.has_children(candidate) || !self.is_hidden_summary(candidate))
    }

    fn move_upwards(
        &mut self,
        selection: &Selection<'_>,
        view: ViewSettings,
    ) -> Result<(), NodeError> {
        let (parent, nodes) = self.checked_selection(selection)?;
        if parent == selection.root {
            if !view.left_tree_supported {
                return Ok(());
            }
            let left = self.is_left(selection.selected, selection.root);
            let side = Side::from_left(!left);
            for &node in &nodes {
                self.set_side(node, side);
            }
            return Ok(());
        }

        let grandparent = self.parent(parent).ok_or(NodeError::NoParent)?;
        let position = self.index_of(grandparent, parent).map_or(0, |i| i + 1);
        let followers = if view.layout == MapViewLayout::Outline {
            self.find_moved_children(parent, &nodes)
        } else {
            Vec::new()
        };
        for &node in &nodes {
            self.remove_extension::<FreeNode>(node);
        }
        self.move_nodes(&nodes, grandparent, position)?;
        for (&node, children) in nodes.iter().zip(followers) {
            self.move_nodes(&children, node, 0)?;
        }
        Ok(())
    }

    /// For each moved node, collects the siblings that follow it up to the
    /// next moved node. Leading summary nodes are left behind.
    fn find_moved_children(&self, parent: NodeId, moved: &[NodeId]) -> Vec<Vec<NodeId>> {
        let mut result: Vec<Vec<NodeId>> = Vec::with_capacity(moved.len());
        for child in self.children(parent) {
            if moved.get(result.len()) == Some(&child) {
                result.push(Vec::new());
            } else if let Some(list) = result.last_mut()
                && (!list.is_empty() || !self.contains_extension::<SummaryNode>(child))
            {
                list.push(child);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    /// root -> [a, b, c], a -> [a1]
    fn fixture() -> (NodeMap, [NodeId; 5]) {
        let mut map = NodeMap::new();
        let root = map.create_node_with_text("root");
        map.set_root(root).unwrap();
        let a = map.create_node_with_text("a");
        let b = map.create_node_with_text("b");
        let c = map.create_node_with_text("c");
        let a1 = map.create_node_with_text("a1");
        map.append(root, a).unwrap();
        map.append(root, b).unwrap();
        map.append(root, c).unwrap();
        map.append(a, a1).unwrap();
        (map, [root, a, b, c, a1])
    }

    fn kids(map: &NodeMap, node: NodeId) -> Vec<NodeId> {
        map.children(node).collect()
    }

    #[test]
    fn move_node_within_parent() {
        let (mut map, [root, a, b, c, _]) = fixture();
        map.move_node(a, root, 2).unwrap();
        assert_eq!(kids(&map, root), vec![b, c, a]);
        assert_eq!(
            map.move_node(a, root, 3),
            Err(NodeError::IndexOutOfBounds { index: 3, len: 2 })
        );
    }

    #[test]
    fn move_node_rejects_cycles_and_root() {
        let (mut map, [root, a, _, _, a1]) = fixture();
        assert_eq!(map.move_node(a, a1, 0), Err(NodeError::WouldCreateCycle));
        assert_eq!(map.move_node(root, a, 0), Err(NodeError::RootNode));
    }

    #[test]
    fn move_nodes_keeps_order() {
        let (mut map, [root, a, b, c, a1]) = fixture();
        map.move_nodes(&[b, c], a, 0).unwrap();
        assert_eq!(kids(&map, a), vec![b, c, a1]);
        assert_eq!(kids(&map, root), vec![a]);
    }

    #[test]
    fn move_nodes_index_counts_remaining_children() {
        let (mut map, [root, a, b, c, _]) = fixture();
        map.move_nodes(&[a], root, 2).unwrap();
        assert_eq!(kids(&map, root), vec![b, c, a]);

        let (mut map, [root, a, b, c, _]) = fixture();
        assert_eq!(
            map.move_nodes(&[a], root, 3),
            Err(NodeError::IndexOutOfBounds { index: 3, len: 2 })
        );
        assert_eq!(kids(&map, root), vec![a, b, c]);

        let (mut map, [root, a, b, c, _]) = fixture();
        map.move_nodes(&[c, a], root, 0).unwrap();
        assert_eq!(kids(&map, root), vec![c, a, b]);

        let (mut map, [root, a, b, c, _]) = fixture();
        map.move_nodes(&[a, c], root, 1).unwrap();
        assert_eq!(kids(&map, root), vec![b, a, c]);
    }

    #[test]
    fn move_nodes_moves_repeated_node_once() {
        let (mut map, [root, a, b, c, _]) = fixture();
        map.move_nodes(&[b, b], root, 0).unwrap();
        assert_eq!(kids(&map, root), vec![b, a, c]);

        let (mut map, [root, a, b, c, a1]) = fixture();
        map.move_nodes(&[c, b, c], a, 1).unwrap();
        assert_eq!(kids(&map, a), vec![a1, c, b]);
        assert_eq!(kids(&map, root), vec![a]);
    }

    #[test]
    fn repeated_selection_demotes_once() {
        let (mut map, [root, a, b, c, a1]) = fixture();
        let selection = Selection {
            root,
            selected: b,
            nodes: &[b, b],
        };
        map.change_level_right(&selection, ViewSettings::default())
            .unwrap();
        assert_eq!(kids(&map, root), vec![a, c]);
        assert_eq!(kids(&map, a), vec![a1, b]);
    }

    #[test]
    fn demote_moves_under_previous_sibling() {
        let (mut map, [root, a, b, _, a1]) = fixture();
        map.put_extension(b, FreeNode);
        let selection = Selection {
            root,
            selected: b,
            nodes: &[b],
        };
        map.change_level_right(&selection, ViewSettings::default())
            .unwrap();
        assert_eq!(kids(&map, a), vec![a1, b]);
        assert!(!map.contains_extension::<FreeNode>(b));
    }

    #[test]
    fn demote_first_child_uses_next_sibling() {
        let (mut map, [root, a, b, _, _]) = fixture();
        let selection = Selection {
            root,
            selected: a,
            nodes: &[a],
        };
        map.change_level_right(&selection, ViewSettings::default())
            .unwrap();
        assert_eq!(map.parent(a), Some(b));
    }

    #[test]
    fn promote_moves_after_parent() {
        let (mut map, [root, a, b, _, a1]) = fixture();
        let selection = Selection {
            root,
            selected: a1,
            nodes: &[a1],
        };
        map.change_level_left(&selection, ViewSettings::default())
            .unwrap();
        assert_eq!(map.parent(a1), Some(root));
        assert_eq!(map.index_in_parent(a1), Some(1));
        assert_eq!(map.index_in_parent(b), Some(2));
        assert!(map.is_leaf(a));
    }

    #[test]
    fn promote_at_selection_root_flips_side() {
        let (mut map, [root, a, _, _, _]) = fixture();
        let selection = Selection {
            root,
            selected: a,
            nodes: &[a],
        };
        map.change_level_left(&selection, ViewSettings::default())
            .unwrap();
        assert_eq!(map.side(a), Side::Default, "needs left-tree support");

        let view = ViewSettings {
            left_tree_supported: true,
            ..ViewSettings::default()
        };
        map.change_level_left(&selection, view).unwrap();
        assert_eq!(map.side(a), Side::Left);
        // Now on the left: "left" demotes into the nearest left sibling,
        // of which there is none.
        map.change_level_left(&selection, view).unwrap();
        assert_eq!(map.parent(a), Some(root));
        map.change_level_right(&selection, view).unwrap();
        assert_eq!(map.side(a), Side::Right);
    }

    #[test]
    fn outline_promote_takes_following_siblings() {
        let mut map = NodeMap::new();
        let root = map.create_node();
        map.set_root(root).unwrap();
        let p = map.create_node();
        map.append(root, p).unwrap();
        let [x, s, y, z] = [0; 4].map(|_| map.create_node());
        for n in [x, s, y, z] {
            map.append(p, n).unwrap();
        }
        map.put_extension(s, SummaryNode::default());

        let selection = Selection {
            root,
            selected: x,
            nodes: &[x],
        };
        let view = ViewSettings {
            layout: MapViewLayout::Outline,
            left_tree_supported: false,
        };
        map.change_level_left(&selection, view).unwrap();
        assert_eq!(kids(&map, root), vec![p, x]);
        assert_eq!(kids(&map, x), vec![y, z]);
        assert_eq!(kids(&map, p), vec![s], "leading summary stays");
    }

    #[test]
    fn selection_errors() {
        let (mut map, [root, a, _, _, a1]) = fixture();
        let at_root = Selection {
            root,
            selected: root,
            nodes: &[root],
        };
        assert_eq!(
            map.change_level_left(&at_root, ViewSettings::default()),
            Err(NodeError::NoParent)
        );
        let mixed = Selection {
            root,
            selected: a,
            nodes: &[a, a1],
        };
        assert_eq!(
            map.change_level_right(&mixed, ViewSettings::default()),
            Err(NodeError::DifferentParents)
        );
    }
}

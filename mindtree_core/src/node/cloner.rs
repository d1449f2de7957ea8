// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clone creation, conversion, and clone-relationship queries.

use alloc::vec;
use alloc::vec::Vec;

use crate::dirty;
use crate::error::NodeError;
use crate::event::{NodeChangeEvent, NodeProperty};
use crate::extension::Encrypted;

use super::clones::{CloneType, Clones};
use super::id::{INVALID, NodeId};
use super::store::NodeMap;

/// Builds a tree clone level by level.
///
/// Every created node joins the TREE and CONTENT groups of the original it
/// mirrors, so the whole new subtree is one structural copy sharing content
/// at each position.
struct Cloner<'a> {
    map: &'a mut NodeMap,
    originals: Vec<u32>,
}

impl<'a> Cloner<'a> {
    fn new(map: &'a mut NodeMap) -> Self {
        Self {
            map,
            originals: Vec::new(),
        }
    }

    fn clone_tree(&mut self, original: u32) -> u32 {
        let top = self.clone_node(original);
        let mut pending = vec![(original, top)];
        while let Some((original, clone)) = pending.pop() {
            let children = self.map.children[original as usize].clone();
            for child in children {
                let child_clone = self.clone_node(child);
                self.map.push_child_raw(clone, child_clone);
                pending.push((child, child_clone));
            }
        }
        top
    }

    fn clone_node(&mut self, original: u32) -> u32 {
        let clone = self.map.alloc_clone_slot();
        self.map.join_clone(clone, original, CloneType::Tree);
        self.map.side[clone as usize] = self.map.side[original as usize];
        self.originals.push(original);
        clone
    }
}

impl NodeMap {
    // -- Creation --

    /// Creates a structural copy of the subtree at `node`.
    ///
    /// The returned node is the detached root of the copy. Each copied node
    /// is a TREE clone (and therefore a CONTENT clone) of the node it
    /// mirrors. Side hints are copied; IDs, viewers, and individual
    /// extensions are not.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clone_tree(&mut self, node: NodeId) -> NodeId {
        self.validate(node);
        let mut cloner = Cloner::new(self);
        let clone = cloner.clone_tree(node.idx);
        let originals = cloner.originals;
        tracing::debug!(
            original = node.idx,
            clone,
            count = originals.len(),
            "cloned tree"
        );
        for original in originals {
            self.fire_node_changed(&NodeChangeEvent::refresh(
                self.handle(original),
                NodeProperty::Clones,
            ));
        }
        self.handle(clone)
    }

    /// Creates a detached node sharing the content of `node`.
    ///
    /// The new node is a CONTENT clone only: it has no children and its own
    /// singleton TREE group.
    ///
    /// # Errors
    ///
    /// [`NodeError::CloneEncryptedNode`] if `node` carries an
    /// [`Encrypted`] extension.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clone_content(&mut self, node: NodeId) -> Result<NodeId, NodeError> {
        self.validate(node);
        if self.contains_extension::<Encrypted>(node) {
            tracing::debug!(node = node.idx, "refusing to clone encrypted content");
            return Err(NodeError::CloneEncryptedNode);
        }
        let clone = self.alloc_clone_slot();
        self.join_clone(clone, node.idx, CloneType::Content);
        tracing::debug!(original = node.idx, clone, "cloned content");
        self.fire_node_changed(&NodeChangeEvent::refresh(node, NodeProperty::Clones));
        Ok(self.handle(clone))
    }

    /// Makes `node` a clone of `source`.
    ///
    /// `node` leaves its current groups and adopts the content of `source`.
    /// With [`CloneType::Tree`] it joins both groups of `source`; with
    /// [`CloneType::Content`] it joins the CONTENT group and gets a fresh
    /// TREE group of its own. Attachment state is preserved. Its previous
    /// content is dropped once no other clone refers to it.
    ///
    /// # Errors
    ///
    /// [`NodeError::CloneEncryptedNode`] when requesting a CONTENT clone of
    /// an encrypted source.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn convert_to_clone(
        &mut self,
        node: NodeId,
        source: NodeId,
        kind: CloneType,
    ) -> Result<(), NodeError> {
        self.validate(node);
        self.validate(source);
        if node == source {
            return Ok(());
        }
        if kind == CloneType::Content && self.contains_extension::<Encrypted>(source) {
            return Err(NodeError::CloneEncryptedNode);
        }
        let n = node.idx;
        let was_attached = self.is_attached_idx(n);
        let mut previous = Vec::new();
        for kind in CloneType::ALL {
            previous.extend(self.leave_group(n, kind));
        }
        self.join_clone(n, source.idx, kind);
        if was_attached {
            self.attach_clones(n);
        }
        self.dirty.mark(n, dirty::CONTENT);

        previous.sort_unstable();
        previous.dedup();
        for idx in previous {
            self.fire_single_node_changed(&NodeChangeEvent::refresh(
                self.handle(idx),
                NodeProperty::Clones,
            ));
        }
        self.fire_node_changed(&NodeChangeEvent::refresh(node, NodeProperty::Clones));
        Ok(())
    }

    /// Creates an independent copy of `node` with its own content.
    ///
    /// With `with_children` the whole subtree is copied. The copy is
    /// detached and shares no clone group with the original.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn duplicate(&mut self, node: NodeId, with_children: bool) -> NodeId {
        self.validate(node);
        let copy = self.duplicate_idx(node.idx, with_children);
        self.handle(copy)
    }

    fn duplicate_idx(&mut self, idx: u32, with_children: bool) -> u32 {
        let top = self.duplicate_one(idx);
        if !with_children {
            return top;
        }
        let mut pending = vec![(idx, top)];
        while let Some((from, to)) = pending.pop() {
            let children = self.children[from as usize].clone();
            for child in children {
                let child_copy = self.duplicate_one(child);
                self.push_child_raw(to, child_copy);
                pending.push((child, child_copy));
            }
        }
        top
    }

    fn duplicate_one(&mut self, idx: u32) -> u32 {
        let data = self.data(idx).clone();
        let copy = self.create_node_with(data).idx;
        self.side[copy as usize] = self.side[idx as usize];
        self.individual[copy as usize] = self.individual[idx as usize].clone();
        copy
    }

    /// Exchanges the content and clone-group identity of two nodes.
    ///
    /// Afterwards `a` holds what `b` held before and vice versa: its text,
    /// extensions, and the clone groups it belongs to. A node that was a
    /// content clone of `a` is now a content clone of `b`. Positions in the
    /// tree, IDs, and viewers stay with the instances.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn swap_data(&mut self, a: NodeId, b: NodeId) {
        self.validate(a);
        self.validate(b);
        if a == b {
            return;
        }
        let (x, y) = (a.idx, b.idx);
        let x_attached = self.is_attached_idx(x);
        let y_attached = self.is_attached_idx(y);
        self.detach_clones(x);
        self.detach_clones(y);

        for kind in CloneType::ALL {
            let gx = self.clones[x as usize][kind.slot()];
            let gy = self.clones[y as usize][kind.slot()];
            if gx != gy {
                self.groups[gx as usize].replace(x, y);
                self.groups[gy as usize].replace(y, x);
            }
        }
        self.clones.swap(x as usize, y as usize);
        self.shared.swap(x as usize, y as usize);

        if x_attached {
            self.attach_clones(x);
        }
        if y_attached {
            self.attach_clones(y);
        }
        self.mark_content_clones(x, dirty::CONTENT);
        self.mark_content_clones(y, dirty::CONTENT);
        tracing::debug!(a = x, b = y, "swapped node data");

        self.fire_node_changed(&NodeChangeEvent::refresh(a, NodeProperty::Unknown));
        self.fire_node_changed(&NodeChangeEvent::refresh(b, NodeProperty::Unknown));
    }

    pub(crate) fn join_clone(&mut self, idx: u32, original: u32, kind: CloneType) {
        let content = self.clones[original as usize][CloneType::Content.slot()];
        self.groups[content as usize].join(idx);
        let tree = match kind {
            CloneType::Tree => {
                let tree = self.clones[original as usize][CloneType::Tree.slot()];
                self.groups[tree as usize].join(idx);
                tree
            }
            CloneType::Content => self.new_group(CloneType::Tree, idx),
        };
        self.clones[idx as usize] = [tree, content];
        self.shared[idx as usize] = self.shared[original as usize];
    }

    // -- Queries --

    /// Returns the clone group of `node` for `kind`.
    #[must_use]
    pub fn clones(&self, node: NodeId, kind: CloneType) -> Clones<'_> {
        self.validate(node);
        Clones::new(self, self.group(node.idx, kind))
    }

    /// Returns the TREE clone group of `node`.
    #[must_use]
    pub fn subtree_clones(&self, node: NodeId) -> Clones<'_> {
        self.clones(node, CloneType::Tree)
    }

    /// Returns the CONTENT clone group of `node`.
    #[must_use]
    pub fn all_clones(&self, node: NodeId) -> Clones<'_> {
        self.clones(node, CloneType::Content)
    }

    /// Returns whether `node` is a clone of anything, in either sense.
    #[must_use]
    pub fn is_clone_node(&self, node: NodeId) -> bool {
        self.subtree_clones(node).size() > 1 || self.all_clones(node).size() > 1
    }

    /// Returns whether `node` starts a cloned subtree.
    ///
    /// True for a parentless node, for a node whose TREE group is larger
    /// than its parent's, and for a content-only clone (singleton TREE
    /// group, larger CONTENT group).
    #[must_use]
    pub fn is_clone_tree_root(&self, node: NodeId) -> bool {
        let tree = self.subtree_clones(node).size();
        let parent = self.parent[node.idx as usize];
        parent == INVALID
            || self.group(parent, CloneType::Tree).members.len() < tree
            || (tree == 1 && self.all_clones(node).size() > 1)
    }

    /// Returns whether `node` lies strictly inside a cloned subtree, sharing
    /// its TREE group size with its parent.
    #[must_use]
    pub fn is_clone_tree_node(&self, node: NodeId) -> bool {
        let tree = self.subtree_clones(node).size();
        let parent = self.parent[node.idx as usize];
        parent != INVALID
            && tree > 1
            && self.group(parent, CloneType::Tree).members.len() == tree
    }

    /// Returns the nearest ancestor-or-self that has no parent or is a clone
    /// tree root.
    #[must_use]
    pub fn subtree_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        loop {
            match self.parent(current) {
                Some(parent) if !self.is_clone_tree_root(current) => current = parent,
                _ => return current,
            }
        }
    }

    /// Returns whether the subtree at `node` contains a TREE clone of
    /// `other` (including `other` itself).
    #[must_use]
    pub fn subtree_contains_clone_of(&self, node: NodeId, other: NodeId) -> bool {
        let group = self.subtree_clones(other);
        self.descendants(node).any(|n| group.contains(n))
    }

    /// Returns whether `node` is in the TREE clone group of `other`.
    #[must_use]
    pub fn is_subtree_clone_of(&self, node: NodeId, other: NodeId) -> bool {
        self.validate(node);
        self.subtree_clones(node).contains(other)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::extension::SummaryNode;
    use crate::node::Side;

    fn small_tree(map: &mut NodeMap) -> (NodeId, NodeId, NodeId) {
        let a = map.create_node_with_text("a");
        let b = map.create_node_with_text("b");
        let c = map.create_node_with_text("c");
        map.append(a, b).unwrap();
        map.append(b, c).unwrap();
        (a, b, c)
    }

    #[test]
    fn clone_tree_mirrors_structure() {
        let mut map = NodeMap::new();
        let (a, b, c) = small_tree(&mut map);
        map.set_side(b, Side::Left);
        let a2 = map.clone_tree(a);

        assert_eq!(map.parent(a2), None);
        assert!(!map.is_attached(a2));
        let b2 = map.child_at(a2, 0).unwrap();
        let c2 = map.child_at(b2, 0).unwrap();
        assert_eq!(map.text(c2), "c");
        assert_eq!(map.side(b2), Side::Left);

        assert!(map.subtree_clones(a).contains(a2));
        assert!(map.subtree_clones(b).contains(b2));
        assert!(map.all_clones(c).contains(c2));
        assert!(map.is_clone_tree_root(a2));
        assert!(map.is_clone_tree_node(b2));
        assert!(!map.is_clone_tree_root(b2));
        assert_eq!(map.subtree_root(c2), a2);
        assert!(map.is_subtree_clone_of(c2, c));
        assert!(map.subtree_contains_clone_of(a2, b));
        assert!(!map.subtree_contains_clone_of(b2, a));
    }

    #[test]
    fn clone_content_shares_data_only() {
        let mut map = NodeMap::new();
        let (a, _, _) = small_tree(&mut map);
        let a2 = map.clone_content(a).unwrap();
        assert_eq!(map.child_count(a2), 0);
        assert_eq!(map.subtree_clones(a2).size(), 1);
        assert_eq!(map.all_clones(a2).size(), 2);
        assert!(map.is_clone_node(a2));
        assert!(map.is_clone_tree_root(a2));
        map.set_text(a, "shared");
        assert_eq!(map.text(a2), "shared");
    }

    #[test]
    fn encrypted_content_cannot_be_cloned() {
        let mut map = NodeMap::new();
        let a = map.create_node();
        map.put_extension(a, Encrypted { accessible: true });
        assert_eq!(map.clone_content(a), Err(NodeError::CloneEncryptedNode));
        assert_eq!(map.all_clones(a).size(), 1);
        assert_eq!(map.node_count(), 1);
    }

    #[test]
    fn duplicate_is_independent() {
        let mut map = NodeMap::new();
        let (a, _, _) = small_tree(&mut map);
        map.put_extension(a, SummaryNode { hidden: false });
        let copy = map.duplicate(a, true);
        assert!(!map.is_clone_node(copy));
        assert_eq!(map.descendants(copy).count(), 3);
        map.set_text(copy, "copy");
        assert_eq!(map.text(a), "a");
        assert!(map.contains_extension::<SummaryNode>(copy));

        let shallow = map.duplicate(a, false);
        assert!(map.is_leaf(shallow));
    }

    #[test]
    fn deep_chains_clone_and_duplicate() {
        const DEPTH: usize = 10_000;
        let mut map = NodeMap::new();
        let top = map.create_node_with_text("0");
        let mut tip = top;
        for _ in 1..DEPTH {
            let next = map.create_node();
            map.append(tip, next).unwrap();
            tip = next;
        }
        map.set_text(tip, "tip");

        let clone = map.clone_tree(top);
        let copy = map.duplicate(top, true);
        for root in [clone, copy] {
            let mut depth = 1;
            let mut current = root;
            while let Some(child) = map.child_at(current, 0) {
                current = child;
                depth += 1;
            }
            assert_eq!(depth, DEPTH);
            assert_eq!(map.text(current), "tip");
        }
        let (first, first_clone) = (map.child_at(top, 0), map.child_at(clone, 0));
        assert!(map.is_subtree_clone_of(first_clone.unwrap(), first.unwrap()));
        assert!(!map.is_clone_node(copy));
    }

    #[test]
    fn clone_tree_keeps_sibling_order() {
        let mut map = NodeMap::new();
        let p = map.create_node_with_text("p");
        for text in ["x", "y", "z"] {
            let child = map.create_node_with_text(text);
            map.append(p, child).unwrap();
        }
        let first = map.child_at(p, 0).unwrap();
        let grandchild = map.create_node_with_text("x1");
        map.append(first, grandchild).unwrap();

        for copy in [map.clone_tree(p), map.duplicate(p, true)] {
            let texts: Vec<_> = map.children(copy).map(|c| map.text(c)).collect();
            assert_eq!(texts, vec!["x", "y", "z"]);
            let first = map.child_at(copy, 0).unwrap();
            assert_eq!(map.text(map.child_at(first, 0).unwrap()), "x1");
        }
    }

    #[test]
    fn convert_to_clone_adopts_content() {
        let mut map = NodeMap::new();
        let src = map.create_node_with_text("src");
        let other = map.create_node_with_text("other");
        let n = map.create_node_with_text("n");
        map.convert_to_clone(n, other, CloneType::Content).unwrap();
        assert_eq!(map.text(n), "other");

        map.convert_to_clone(n, src, CloneType::Tree).unwrap();
        assert_eq!(map.text(n), "src");
        assert_eq!(map.all_clones(other).size(), 1, "left the old group");
        assert!(map.subtree_clones(src).contains(n));
        assert_eq!(
            map.all_clones(src).iter().collect::<Vec<_>>(),
            vec![src, n]
        );
    }

    #[test]
    fn swap_data_exchanges_content_and_groups() {
        let mut map = NodeMap::new();
        let x = map.create_node_with_text("x");
        let y = map.create_node_with_text("y");
        let z = map.clone_content(x).unwrap();
        map.swap_data(x, y);

        assert_eq!(map.text(x), "y");
        assert_eq!(map.text(y), "x");
        assert!(map.all_clones(z).contains(y));
        assert!(!map.all_clones(z).contains(x));
        assert_eq!(map.all_clones(x).size(), 1);
    }

    #[test]
    fn destroying_a_clone_shrinks_its_groups() {
        let mut map = NodeMap::new();
        let a = map.create_node_with_text("a");
        let b = map.clone_tree(a);
        map.destroy_node(b).unwrap();
        assert_eq!(map.subtree_clones(a).size(), 1);
        assert_eq!(map.all_clones(a).size(), 1);
        assert_eq!(map.text(a), "a", "content survives while referenced");
    }
}

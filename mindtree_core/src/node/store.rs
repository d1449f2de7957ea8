// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage with allocation, topology, attachment, and map-level services.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::error::NodeError;
use crate::event::{
    MapChangeListener, NodeChangeEvent, NodeChangeListener, NodeDeletionEvent, NodeInsertionEvent,
    NodeProperty, NodeView,
};
use crate::extension::ExtensionMap;

use super::clones::{CloneGroup, CloneType};
use super::id::{INVALID, NodeId};
use super::shared::{NamedIcon, SharedNodeData};
use super::side::Side;
use super::traverse::{Ancestors, Children, Descendants};

/// Storage for every node of one mind map.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Clone groups and shared content live in two side arenas; each node slot
/// points at one group per [`CloneType`] and at one content slot. All nodes
/// of a CONTENT group point at the same content slot.
pub struct NodeMap {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) preferred_child: Vec<u32>,

    // -- Per-instance properties --
    pub(crate) side: Vec<Side>,
    pub(crate) ids: Vec<Option<String>>,
    pub(crate) individual: Vec<ExtensionMap>,
    pub(crate) viewers: Vec<Vec<Rc<dyn NodeView>>>,

    // -- Clone bookkeeping --
    pub(crate) clones: Vec<[u32; 2]>,
    pub(crate) shared: Vec<u32>,
    pub(crate) groups: Vec<CloneGroup>,
    pub(crate) free_groups: Vec<u32>,
    pub(crate) contents: Vec<SharedNodeData>,
    pub(crate) free_contents: Vec<u32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Map --
    pub(crate) root: u32,
    pub(crate) registry: BTreeMap<String, u32>,
    pub(crate) next_id: u64,
    pub(crate) icon_registry: BTreeSet<NamedIcon>,
    pub(crate) map_listeners: Vec<Rc<dyn MapChangeListener>>,
    pub(crate) change_listeners: Vec<Rc<dyn NodeChangeListener>>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl fmt::Debug for NodeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMap")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("root", &self.root)
            .field("groups", &(self.groups.len() - self.free_groups.len()))
            .field("map_listeners", &self.map_listeners.len())
            .field("change_listeners", &self.change_listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for NodeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeMap {
    /// Creates an empty map with no root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            preferred_child: Vec::new(),
            side: Vec::new(),
            ids: Vec::new(),
            individual: Vec::new(),
            viewers: Vec::new(),
            clones: Vec::new(),
            shared: Vec::new(),
            groups: Vec::new(),
            free_groups: Vec::new(),
            contents: Vec::new(),
            free_contents: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            root: INVALID,
            registry: BTreeMap::new(),
            next_id: 1,
            icon_registry: BTreeSet::new(),
            map_listeners: Vec::new(),
            change_listeners: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a standalone node with empty text.
    ///
    /// The node is detached, has no parent, and is the only member of its
    /// TREE and CONTENT clone groups.
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(SharedNodeData::default())
    }

    /// Creates a standalone node holding `text`.
    pub fn create_node_with_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node_with(SharedNodeData::with_text(text))
    }

    pub(crate) fn create_node_with(&mut self, data: SharedNodeData) -> NodeId {
        let idx = self.alloc_slot();
        let tree = self.new_group(CloneType::Tree, idx);
        let content = self.new_group(CloneType::Content, idx);
        self.clones[idx as usize] = [tree, content];
        self.shared[idx as usize] = self.new_content(data);
        tracing::trace!(node = idx, "created node");
        self.handle(idx)
    }

    /// Destroys a detached node and its whole subtree, freeing the slots for
    /// reuse.
    ///
    /// Each destroyed node leaves its clone groups; remaining members of those
    /// groups receive a [`NodeProperty::Clones`] change. Content is freed once
    /// no content clone refers to it.
    ///
    /// # Errors
    ///
    /// [`NodeError::HasParent`] if the node is still linked into a parent
    /// (remove it first), [`NodeError::RootNode`] for the map root.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<(), NodeError> {
        self.validate(node);
        let top = node.idx;
        if self.parent[top as usize] != INVALID {
            return Err(NodeError::HasParent);
        }
        if top == self.root {
            return Err(NodeError::RootNode);
        }

        let doomed: Vec<u32> = self.descendants(node).map(|id| id.idx).collect();
        let mut survivors = Vec::new();
        for &idx in &doomed {
            for kind in CloneType::ALL {
                survivors.extend(self.leave_group(idx, kind));
            }
            if let Some(id) = self.ids[idx as usize].take() {
                self.registry.remove(&id);
            }
            self.viewers[idx as usize].clear();
            self.children[idx as usize].clear();
            self.parent[idx as usize] = INVALID;
            self.preferred_child[idx as usize] = INVALID;
            self.clones[idx as usize] = [INVALID; 2];
            self.shared[idx as usize] = INVALID;

            self.dirty.remove_key(idx);
            // Bump generation so old handles immediately fail validation.
            self.generation[idx as usize] += 1;
            self.free_list.push(idx);
            self.pending_removed.push(idx);
        }
        tracing::debug!(node = top, count = doomed.len(), "destroyed subtree");

        survivors.sort_unstable();
        survivors.dedup();
        survivors.retain(|idx| !doomed.contains(idx));
        for idx in survivors {
            let event = NodeChangeEvent::refresh(self.handle(idx), NodeProperty::Clones);
            self.fire_single_node_changed(&event);
        }
        Ok(())
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Root API --

    /// Makes `node` the map root and attaches its subtree.
    ///
    /// A previous root is detached together with its subtree.
    ///
    /// # Errors
    ///
    /// [`NodeError::HasParent`] if `node` has a parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_root(&mut self, node: NodeId) -> Result<(), NodeError> {
        self.validate(node);
        if self.parent[node.idx as usize] != INVALID {
            return Err(NodeError::HasParent);
        }
        let old = self.root;
        if old == node.idx {
            return Ok(());
        }
        if old != INVALID {
            self.detach(old);
        }
        self.root = node.idx;
        self.attach(node.idx);
        self.dirty.mark_with(node.idx, dirty::SIDE, &EagerPolicy);
        tracing::debug!(root = node.idx, "set map root");
        Ok(())
    }

    /// Returns the map root, if one has been set.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.opt_handle(self.root)
    }

    /// Returns whether `node` is the map root.
    #[must_use]
    pub fn is_root(&self, node: NodeId) -> bool {
        self.validate(node);
        node.idx == self.root
    }

    // -- Topology API --

    /// Inserts `child` under `parent`.
    ///
    /// With `Some(index)` the child is inserted at that position and becomes
    /// the parent's preferred child. With `None` it is appended and the
    /// preferred child is left alone. Attaches the child's subtree if the
    /// parent is attached, then notifies map listeners and the parent's
    /// viewers.
    ///
    /// # Errors
    ///
    /// - [`NodeError::IndexOutOfBounds`] if `index > child_count(parent)`.
    /// - [`NodeError::HasParent`] if `child` already has a parent.
    /// - [`NodeError::RootNode`] if `child` is the map root.
    /// - [`NodeError::WouldCreateCycle`] if `parent` is `child` or one of its
    ///   descendants.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn insert(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    ) -> Result<(), NodeError> {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        if self.parent[c as usize] != INVALID {
            return Err(NodeError::HasParent);
        }
        if c == self.root {
            return Err(NodeError::RootNode);
        }
        if p == c || self.is_descendant_idx(p, c) {
            return Err(NodeError::WouldCreateCycle);
        }
        let len = self.children[p as usize].len();
        if let Some(index) = index
            && index > len
        {
            return Err(NodeError::IndexOutOfBounds { index, len });
        }

        let index = self.insert_raw(p, c, index);
        self.fire_node_inserted(&NodeInsertionEvent {
            parent,
            child,
            index,
        });
        Ok(())
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// Shorthand for [`insert`](Self::insert) with `None`.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        self.insert(parent, child, None)
    }

    /// Removes the child at `index` from `parent` and returns it.
    ///
    /// If the removed child was the preferred child, the preference moves to
    /// the following sibling, else the preceding one, else nowhere. The
    /// removed subtree is detached. Notifies the parent's viewers, then map
    /// listeners.
    ///
    /// # Errors
    ///
    /// [`NodeError::IndexOutOfBounds`] if `index >= child_count(parent)`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, parent: NodeId, index: usize) -> Result<NodeId, NodeError> {
        self.validate(parent);
        let p = parent.idx;
        let len = self.children[p as usize].len();
        if index >= len {
            return Err(NodeError::IndexOutOfBounds { index, len });
        }

        let c = self.remove_raw(p, index);
        let child = self.handle(c);
        self.fire_node_removed(&NodeDeletionEvent {
            parent,
            child,
            index,
        });
        Ok(child)
    }

    /// Updates the parent link of `node` and its attachment state.
    ///
    /// This is the attach/detach trigger used by [`insert`](Self::insert) and
    /// [`remove`](Self::remove); it does not touch any child list.
    ///
    /// - No parent → attached parent: the subtree is attached.
    /// - Attached parent → no parent or a detached parent: the subtree is
    ///   detached.
    /// - No parent while attached (the map root): the subtree is detached.
    /// - Anything else leaves attachment unchanged.
    ///
    /// Detaching an already detached node is a no-op.
    ///
    /// The caller keeps child lists consistent: `node` should appear in the
    /// child list of `new_parent`, and in no other, once the surrounding
    /// edit is done. Prefer [`insert`](Self::insert), [`remove`](Self::remove)
    /// or [`move_node`](Self::move_node), which keep both sides in step.
    ///
    /// # Errors
    ///
    /// [`NodeError::WouldCreateCycle`] if `new_parent` is `node` or one of
    /// its descendants. Nothing changes in that case.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale.
    pub fn set_parent(
        &mut self,
        node: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<(), NodeError> {
        self.validate(node);
        let new = match new_parent {
            Some(p) => {
                self.validate(p);
                if p.idx == node.idx || self.is_descendant_idx(p.idx, node.idx) {
                    return Err(NodeError::WouldCreateCycle);
                }
                p.idx
            }
            None => INVALID,
        };
        self.set_parent_idx(node.idx, new);
        Ok(())
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_handle(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node, in display
    /// order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns the child at `index`, if any.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.validate(id);
        self.children[id.idx as usize]
            .get(index)
            .map(|&c| self.handle(c))
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns whether the node has children.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        self.child_count(id) != 0
    }

    /// Returns whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.child_count(id) == 0
    }

    /// Returns the position of `child` among the children of `parent`.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.validate(parent);
        self.validate(child);
        self.children[parent.idx as usize]
            .iter()
            .position(|&c| c == child.idx)
    }

    /// Returns the position of `node` among its siblings.
    #[must_use]
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.index_of(parent, node)
    }

    /// Returns the most recently explicitly positioned child.
    #[must_use]
    pub fn preferred_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_handle(self.preferred_child[id.idx as usize])
    }

    /// Returns an iterator over the ancestors of a node, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, self.parent[id.idx as usize])
    }

    /// Returns a depth-first pre-order iterator over `id` and its descendants.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns the number of ancestors.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Returns the path from the topmost ancestor down to `id`, inclusive.
    #[must_use]
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path.push(id);
        path
    }

    /// Returns whether `ancestor` is a proper ancestor of `node`.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.validate(node);
        self.validate(ancestor);
        self.is_descendant_idx(node.idx, ancestor.idx)
    }

    /// Returns whether `node` is currently attached to the live map.
    ///
    /// A node is attached while its TREE clone group records it as attached,
    /// which holds exactly when it is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.validate(node);
        self.is_attached_idx(node.idx)
    }

    // -- ID registry --

    /// Returns the node's ID, assigning a fresh `ID_<n>` on first use.
    pub fn create_id(&mut self, node: NodeId) -> &str {
        self.validate(node);
        let idx = node.idx as usize;
        if self.ids[idx].is_none() {
            let id = loop {
                let candidate = format!("ID_{}", self.next_id);
                self.next_id += 1;
                if !self.registry.contains_key(&candidate) {
                    break candidate;
                }
            };
            self.registry.insert(id.clone(), node.idx);
            self.ids[idx] = Some(id);
        }
        self.ids[idx].as_deref().unwrap_or_default()
    }

    /// Returns the node's ID, if one has been assigned.
    #[must_use]
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.validate(node);
        self.ids[node.idx as usize].as_deref()
    }

    /// Assigns an explicit ID, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`NodeError::DuplicateId`] if another node already uses `value`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_id(&mut self, node: NodeId, value: impl Into<String>) -> Result<(), NodeError> {
        self.validate(node);
        let value = value.into();
        match self.registry.get(&value) {
            Some(&owner) if owner == node.idx => return Ok(()),
            Some(_) => return Err(NodeError::DuplicateId(value)),
            None => {}
        }
        if let Some(old) = self.ids[node.idx as usize].take() {
            self.registry.remove(&old);
        }
        self.registry.insert(value.clone(), node.idx);
        self.ids[node.idx as usize] = Some(value);
        Ok(())
    }

    /// Looks up a node by ID.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<NodeId> {
        self.registry.get(id).map(|&idx| self.handle(idx))
    }

    // -- Observer registration --

    /// Registers a viewer on `node`.
    pub fn add_viewer(&mut self, node: NodeId, viewer: Rc<dyn NodeView>) {
        self.validate(node);
        self.viewers[node.idx as usize].push(viewer);
    }

    /// Unregisters a viewer by identity. Returns whether it was registered.
    pub fn remove_viewer(&mut self, node: NodeId, viewer: &Rc<dyn NodeView>) -> bool {
        self.validate(node);
        let viewers = &mut self.viewers[node.idx as usize];
        let before = viewers.len();
        viewers.retain(|v| !Rc::ptr_eq(v, viewer));
        viewers.len() != before
    }

    /// Returns the viewers registered on `node`.
    #[must_use]
    pub fn viewers(&self, node: NodeId) -> &[Rc<dyn NodeView>] {
        self.validate(node);
        &self.viewers[node.idx as usize]
    }

    /// Returns whether any viewer is registered on `node`.
    #[must_use]
    pub fn has_viewers(&self, node: NodeId) -> bool {
        !self.viewers(node).is_empty()
    }

    /// Calls `visitor` with each viewer of `node`.
    pub fn accept_view_visitor(&self, node: NodeId, mut visitor: impl FnMut(&dyn NodeView)) {
        for viewer in self.viewers(node) {
            visitor(viewer.as_ref());
        }
    }

    /// Registers a listener for every structural change of this map.
    pub fn add_map_change_listener(&mut self, listener: Rc<dyn MapChangeListener>) {
        self.map_listeners.push(listener);
    }

    /// Unregisters a map-change listener by identity.
    pub fn remove_map_change_listener(&mut self, listener: &Rc<dyn MapChangeListener>) -> bool {
        let before = self.map_listeners.len();
        self.map_listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.map_listeners.len() != before
    }

    /// Registers a listener for every content change of this map.
    pub fn add_node_change_listener(&mut self, listener: Rc<dyn NodeChangeListener>) {
        self.change_listeners.push(listener);
    }

    /// Unregisters a node-change listener by identity.
    pub fn remove_node_change_listener(&mut self, listener: &Rc<dyn NodeChangeListener>) -> bool {
        let before = self.change_listeners.len();
        self.change_listeners.retain(|l| !Rc::ptr_eq(l, listener));
        self.change_listeners.len() != before
    }

    /// Returns every icon ever added to a node of this map, by name.
    pub fn icon_registry(&self) -> impl Iterator<Item = &NamedIcon> {
        self.icon_registry.iter()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn opt_handle(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    pub(crate) fn group(&self, idx: u32, kind: CloneType) -> &CloneGroup {
        &self.groups[self.clones[idx as usize][kind.slot()] as usize]
    }

    pub(crate) fn data(&self, idx: u32) -> &SharedNodeData {
        &self.contents[self.shared[idx as usize] as usize]
    }

    pub(crate) fn data_mut(&mut self, idx: u32) -> &mut SharedNodeData {
        &mut self.contents[self.shared[idx as usize] as usize]
    }

    fn alloc_slot(&mut self) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.preferred_child[i] = INVALID;
            self.side[i] = Side::Default;
            self.ids[i] = None;
            self.individual[i] = ExtensionMap::new();
            self.viewers[i].clear();
            self.clones[i] = [INVALID; 2];
            self.shared[i] = INVALID;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.preferred_child.push(INVALID);
            self.side.push(Side::Default);
            self.ids.push(None);
            self.individual.push(ExtensionMap::new());
            self.viewers.push(Vec::new());
            self.clones.push([INVALID; 2]);
            self.shared.push(INVALID);
            self.generation.push(0);
            idx
        };
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        idx
    }

    /// Allocates an empty node slot for the cloner; the caller assigns its
    /// clone groups and content.
    pub(crate) fn alloc_clone_slot(&mut self) -> u32 {
        self.alloc_slot()
    }

    pub(crate) fn new_group(&mut self, kind: CloneType, first: u32) -> u32 {
        let group = CloneGroup::new(kind, first);
        if let Some(gid) = self.free_groups.pop() {
            self.groups[gid as usize] = group;
            gid
        } else {
            self.groups.push(group);
            u32::try_from(self.groups.len() - 1).unwrap_or(INVALID)
        }
    }

    fn new_content(&mut self, data: SharedNodeData) -> u32 {
        if let Some(cid) = self.free_contents.pop() {
            self.contents[cid as usize] = data;
            cid
        } else {
            self.contents.push(data);
            u32::try_from(self.contents.len() - 1).unwrap_or(INVALID)
        }
    }

    /// Removes `idx` from its group of `kind`, freeing the group (and for
    /// CONTENT, the shared data) once empty.
    ///
    /// Returns the remaining members.
    pub(crate) fn leave_group(&mut self, idx: u32, kind: CloneType) -> Vec<u32> {
        let gid = self.clones[idx as usize][kind.slot()];
        let group = &mut self.groups[gid as usize];
        if group.leave(idx) {
            self.free_groups.push(gid);
            if kind == CloneType::Content {
                let cid = self.shared[idx as usize];
                self.contents[cid as usize] = SharedNodeData::default();
                self.free_contents.push(cid);
            }
            Vec::new()
        } else {
            group.members.clone()
        }
    }

    pub(crate) fn is_attached_idx(&self, idx: u32) -> bool {
        self.group(idx, CloneType::Tree).is_attached(idx)
    }

    pub(crate) fn is_descendant_idx(&self, node: u32, ancestor: u32) -> bool {
        let mut current = self.parent[node as usize];
        while current != INVALID {
            if current == ancestor {
                return true;
            }
            current = self.parent[current as usize];
        }
        false
    }

    pub(crate) fn set_parent_idx(&mut self, node: u32, new: u32) {
        let old = self.parent[node as usize];
        let new_attached = new != INVALID && self.is_attached_idx(new);
        if old == INVALID && new_attached {
            self.attach(node);
        } else if (old != INVALID && self.is_attached_idx(old) && !new_attached)
            || (new == INVALID && self.is_attached_idx(node))
        {
            self.detach(node);
        }
        self.parent[node as usize] = new;
    }

    /// Inserts without validation or notification. Returns the final index.
    pub(crate) fn insert_raw(&mut self, p: u32, c: u32, index: Option<usize>) -> usize {
        let index = match index {
            Some(index) => {
                self.children[p as usize].insert(index, c);
                self.preferred_child[p as usize] = c;
                index
            }
            None => {
                self.children[p as usize].push(c);
                self.children[p as usize].len() - 1
            }
        };
        self.set_parent_idx(c, p);
        self.link_dirty(p, c);
        tracing::trace!(parent = p, child = c, index, "inserted node");
        index
    }

    /// Appends into a detached subtree under construction.
    pub(crate) fn push_child_raw(&mut self, p: u32, c: u32) {
        self.children[p as usize].push(c);
        self.set_parent_idx(c, p);
        self.link_dirty(p, c);
    }

    /// Removes without validation or notification. Returns the removed slot.
    pub(crate) fn remove_raw(&mut self, p: u32, index: usize) -> u32 {
        let siblings = &self.children[p as usize];
        let c = siblings[index];
        if self.preferred_child[p as usize] == c {
            self.preferred_child[p as usize] = if siblings.len() > index + 1 {
                siblings[index + 1]
            } else if index > 0 {
                siblings[index - 1]
            } else {
                INVALID
            };
        }
        self.set_parent_idx(c, INVALID);
        self.children[p as usize].remove(index);

        self.dirty.remove_dependency(c, p, dirty::SIDE);
        self.dirty.mark_with(c, dirty::SIDE, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
        tracing::trace!(parent = p, child = c, index, "removed node");
        c
    }

    fn link_dirty(&mut self, p: u32, c: u32) {
        // Child depends on parent for SIDE.
        let _ = self.dirty.add_dependency(c, p, dirty::SIDE);
        self.dirty.mark_with(c, dirty::SIDE, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Records the whole subtree at `idx` as attached in every clone group.
    pub(crate) fn attach(&mut self, idx: u32) {
        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            self.attach_clones(n);
            stack.extend(self.children[n as usize].iter().copied());
        }
    }

    /// Removes the whole subtree at `idx` from every group's attached set.
    pub(crate) fn detach(&mut self, idx: u32) {
        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            self.detach_clones(n);
            stack.extend(self.children[n as usize].iter().copied());
        }
    }

    pub(crate) fn attach_clones(&mut self, idx: u32) {
        for kind in CloneType::ALL {
            let gid = self.clones[idx as usize][kind.slot()];
            self.groups[gid as usize].attach(idx);
        }
    }

    pub(crate) fn detach_clones(&mut self, idx: u32) {
        for kind in CloneType::ALL {
            let gid = self.clones[idx as usize][kind.slot()];
            self.groups[gid as usize].detach(idx);
        }
    }
}

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use mindtree_core::event::{
    MapChangeListener, NodeChangeEvent, NodeChangeListener, NodeDeletionEvent,
    NodeInsertionEvent, NodeMoveEvent, NodeView,
};
use mindtree_core::node::{NodeId, NodeMap};

/// One observed callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seen {
    ViewInserted(NodeId),
    ViewDeleted(NodeId),
    ViewChanged(NodeId),
    MapInserted(NodeId),
    MapDeleted(NodeId),
    MapMoved(NodeId),
    Changed(NodeId),
}

/// Records every callback it receives, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub seen: RefCell<Vec<Seen>>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn take(&self) -> Vec<Seen> {
        self.seen.take()
    }

    fn push(&self, seen: Seen) {
        self.seen.borrow_mut().push(seen);
    }
}

impl NodeView for Recorder {
    fn on_node_inserted(&self, _: &NodeMap, e: &NodeInsertionEvent) {
        self.push(Seen::ViewInserted(e.child));
    }

    fn on_node_deleted(&self, _: &NodeMap, e: &NodeDeletionEvent) {
        self.push(Seen::ViewDeleted(e.child));
    }

    fn node_changed(&self, _: &NodeMap, e: &NodeChangeEvent) {
        self.push(Seen::ViewChanged(e.node));
    }
}

impl MapChangeListener for Recorder {
    fn on_node_inserted(&self, _: &NodeMap, e: &NodeInsertionEvent) {
        self.push(Seen::MapInserted(e.child));
    }

    fn on_node_deleted(&self, _: &NodeMap, e: &NodeDeletionEvent) {
        self.push(Seen::MapDeleted(e.child));
    }

    fn on_node_moved(&self, _: &NodeMap, e: &NodeMoveEvent) {
        self.push(Seen::MapMoved(e.child));
    }
}

impl NodeChangeListener for Recorder {
    fn node_changed(&self, _: &NodeMap, e: &NodeChangeEvent) {
        self.push(Seen::Changed(e.node));
    }
}

/// A map with an attached root.
pub fn rooted_map() -> (NodeMap, NodeId) {
    let mut map = NodeMap::new();
    let root = map.create_node_with_text("root");
    map.set_root(root).unwrap();
    (map, root)
}

/// Appends a new child with `text`.
pub fn add_child(map: &mut NodeMap, parent: NodeId, text: &str) -> NodeId {
    let child = map.create_node_with_text(text);
    map.append(parent, child).unwrap();
    child
}

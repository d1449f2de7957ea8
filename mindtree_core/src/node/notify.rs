// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer fan-out.
//!
//! See [`crate::event`] for the ordering and reentrancy contract.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::event::{
    MapChangeListener, NodeChangeEvent, NodeChangeListener, NodeDeletionEvent,
    NodeInsertionEvent, NodeMoveEvent, NodeView,
};

use super::clones::CloneType;
use super::store::NodeMap;

impl NodeMap {
    /// Delivers a content change to every content clone of `event.node`.
    ///
    /// Each member receives a copy of the event retargeted to itself, first
    /// through the node-change listeners and then through its own viewers.
    /// Use this after editing state that lives outside the built-in content
    /// operations, such as a shared extension.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn fire_node_changed(&self, event: &NodeChangeEvent) {
        self.validate(event.node);
        let members = self.group(event.node.idx, CloneType::Content).members.clone();
        let listeners = self.change_listener_snapshot();
        for idx in members {
            let retargeted = event.for_node(self.handle(idx));
            for listener in &listeners {
                listener.node_changed(self, &retargeted);
            }
            for viewer in self.viewer_snapshot(idx) {
                viewer.node_changed(self, &retargeted);
            }
        }
    }

    /// Delivers a change to `event.node` only, skipping its content clones.
    pub(crate) fn fire_single_node_changed(&self, event: &NodeChangeEvent) {
        for listener in self.change_listener_snapshot() {
            listener.node_changed(self, event);
        }
        for viewer in self.viewer_snapshot(event.node.idx) {
            viewer.node_changed(self, event);
        }
    }

    pub(crate) fn fire_node_inserted(&self, event: &NodeInsertionEvent) {
        for listener in self.map_listener_snapshot() {
            listener.on_node_inserted(self, event);
        }
        for viewer in self.viewer_snapshot(event.parent.idx) {
            viewer.on_node_inserted(self, event);
        }
    }

    pub(crate) fn fire_node_removed(&self, event: &NodeDeletionEvent) {
        for viewer in self.viewer_snapshot(event.parent.idx) {
            viewer.on_node_deleted(self, event);
        }
        for listener in self.map_listener_snapshot() {
            listener.on_node_deleted(self, event);
        }
    }

    pub(crate) fn fire_node_moved(&self, event: &NodeMoveEvent) {
        let deletion = event.deletion();
        for viewer in self.viewer_snapshot(event.old_parent.idx) {
            viewer.on_node_deleted(self, &deletion);
        }
        for listener in self.map_listener_snapshot() {
            listener.on_node_moved(self, event);
        }
        let insertion = event.insertion();
        for viewer in self.viewer_snapshot(event.new_parent.idx) {
            viewer.on_node_inserted(self, &insertion);
        }
    }

    fn viewer_snapshot(&self, idx: u32) -> Vec<Rc<dyn NodeView>> {
        self.viewers[idx as usize].clone()
    }

    fn map_listener_snapshot(&self) -> Vec<Rc<dyn MapChangeListener>> {
        self.map_listeners.clone()
    }

    fn change_listener_snapshot(&self) -> Vec<Rc<dyn NodeChangeListener>> {
        self.change_listeners.clone()
    }
}

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable event output.
//!
//! [`PrettyPrintView`] implements all three observer traits and writes one
//! line per event to a [`Write`](std::io::Write) destination (default:
//! stderr). Node handles are printed as their raw slot index.

use std::cell::RefCell;
use std::io::Write;

use mindtree_core::choice::Choice;
use mindtree_core::event::{
    MapChangeListener, NodeChangeEvent, NodeChangeListener, NodeDeletionEvent,
    NodeInsertionEvent, NodeMoveEvent, NodeView,
};
use mindtree_core::node::{NodeId, NodeMap, Side};

/// Writes human-readable event lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintView<W: Write = Box<dyn Write>> {
    writer: RefCell<W>,
}

impl<W: Write> std::fmt::Debug for PrettyPrintView<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintView").finish_non_exhaustive()
    }
}

impl PrettyPrintView {
    /// Creates a view that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a view that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintView<W> {
    /// Creates a view that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Consumes the view and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Writes an indented outline of the subtree rooted at `node`.
    ///
    /// Each line starts with `+` for a folded node and `-` otherwise. An
    /// explicit side hint is appended as `<LEFT>` or `<RIGHT>`, and a node
    /// with content clones is marked with the size of its content group.
    pub fn write_outline(&self, map: &NodeMap, node: NodeId) {
        let base = map.depth(node);
        let mut w = self.writer.borrow_mut();
        for n in map.descendants(node) {
            let indent = (map.depth(n) - base) * 2;
            let marker = if map.is_folded(n) { '+' } else { '-' };
            let _ = write!(w, "{:indent$}{marker} {}", "", map.text(n));
            let side = map.side(n);
            if side != Side::Default {
                let _ = write!(w, " <{}>", side.name());
            }
            let clones = map.all_clones(n).size();
            if clones > 1 {
                let _ = write!(w, " (clones={clones})");
            }
            let _ = writeln!(w);
        }
    }
}

impl<W: Write> NodeView for PrettyPrintView<W> {
    fn on_node_inserted(&self, _map: &NodeMap, e: &NodeInsertionEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[view insert] parent={} child={} index={}",
            e.parent.index(),
            e.child.index(),
            e.index,
        );
    }

    fn on_node_deleted(&self, _map: &NodeMap, e: &NodeDeletionEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[view delete] parent={} child={} index={}",
            e.parent.index(),
            e.child.index(),
            e.index,
        );
    }

    fn node_changed(&self, _map: &NodeMap, e: &NodeChangeEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[view changed] node={} property={:?}",
            e.node.index(),
            e.property,
        );
    }
}

impl<W: Write> MapChangeListener for PrettyPrintView<W> {
    fn on_node_inserted(&self, _map: &NodeMap, e: &NodeInsertionEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[insert] parent={} child={} index={}",
            e.parent.index(),
            e.child.index(),
            e.index,
        );
    }

    fn on_node_deleted(&self, _map: &NodeMap, e: &NodeDeletionEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[delete] parent={} child={} index={}",
            e.parent.index(),
            e.child.index(),
            e.index,
        );
    }

    fn on_node_moved(&self, _map: &NodeMap, e: &NodeMoveEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[move] child={} from={}:{} to={}:{}",
            e.child.index(),
            e.old_parent.index(),
            e.old_index,
            e.new_parent.index(),
            e.new_index,
        );
    }
}

impl<W: Write> NodeChangeListener for PrettyPrintView<W> {
    fn node_changed(&self, _map: &NodeMap, e: &NodeChangeEvent) {
        let _ = writeln!(
            self.writer.borrow_mut(),
            "[changed] node={} property={:?} old={:?} new={:?}",
            e.node.index(),
            e.property,
            e.old_value,
            e.new_value,
        );
    }
}

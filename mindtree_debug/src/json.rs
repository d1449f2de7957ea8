// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export.
//!
//! [`export`] turns bytes from a [`RecorderListener`](super::recorder::RecorderListener)
//! into a JSON array of event objects. [`snapshot`] and [`export_tree`]
//! capture the current state of a subtree, including side hints and clone
//! group sizes, for diffing between runs.

use std::io::{self, Write};

use serde_json::{Value, json};

use mindtree_core::choice::Choice;
use mindtree_core::node::{NodeId, NodeMap};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .map(|recorded| match recorded {
            RecordedEvent::Inserted {
                parent,
                child,
                index,
            } => json!({
                "kind": "insert",
                "parent": parent,
                "child": child,
                "index": index,
            }),
            RecordedEvent::Deleted {
                parent,
                child,
                index,
            } => json!({
                "kind": "delete",
                "parent": parent,
                "child": child,
                "index": index,
            }),
            RecordedEvent::Moved {
                child,
                old_parent,
                old_index,
                new_parent,
                new_index,
            } => json!({
                "kind": "move",
                "child": child,
                "from": { "parent": old_parent, "index": old_index },
                "to": { "parent": new_parent, "index": new_index },
            }),
            RecordedEvent::Changed { node, property } => json!({
                "kind": "change",
                "node": node,
                "property": format!("{property:?}"),
            }),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &events)?;
    writeln!(writer)?;
    Ok(())
}

/// Returns a JSON description of the subtree rooted at `node`.
#[must_use]
pub fn snapshot(map: &NodeMap, node: NodeId) -> Value {
    let children: Vec<Value> = map.children(node).map(|c| snapshot(map, c)).collect();
    let icons: Vec<&str> = map.icons(node).iter().map(|icon| icon.name()).collect();
    json!({
        "slot": node.index(),
        "id": map.id(node),
        "text": map.text(node),
        "side": map.side(node).name(),
        "folded": map.is_folded(node),
        "icons": icons,
        "tree_clones": map.subtree_clones(node).size(),
        "content_clones": map.all_clones(node).size(),
        "children": children,
    })
}

/// Writes [`snapshot`] of `node` as pretty-printed JSON.
pub fn export_tree(map: &NodeMap, node: NodeId, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &snapshot(map, node))?;
    writeln!(writer)?;
    Ok(())
}

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recorder.
//!
//! [`RecorderListener`] implements [`MapChangeListener`] and
//! [`NodeChangeListener`] and appends each event to an in-memory byte
//! buffer. Each record is a one-byte tag followed by fixed-width
//! little-endian fields. Nodes are stored as raw slot indices.
//!
//! Use [`decode`] to iterate over the recorded events.

use std::cell::RefCell;

use mindtree_core::event::{
    MapChangeListener, NodeChangeEvent, NodeChangeListener, NodeDeletionEvent,
    NodeInsertionEvent, NodeMoveEvent, NodeProperty,
};
use mindtree_core::node::NodeMap;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

const TAG_INSERTED: u8 = 1;
const TAG_DELETED: u8 = 2;
const TAG_MOVED: u8 = 3;
const TAG_CHANGED: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderListener
// ---------------------------------------------------------------------------

/// Records map events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderListener {
    buf: RefCell<Vec<u8>>,
}

impl RecorderListener {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Takes the recorded bytes, leaving the recorder empty.
    pub fn take(&self) -> Vec<u8> {
        self.buf.take()
    }

    /// Returns the number of recorded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    fn record(&self, tag: u8, fields: &[u32]) {
        let mut buf = self.buf.borrow_mut();
        buf.push(tag);
        for field in fields {
            buf.extend_from_slice(&field.to_le_bytes());
        }
    }
}

fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

fn property_code(property: NodeProperty) -> u32 {
    match property {
        NodeProperty::Text => 0,
        NodeProperty::XmlText => 1,
        NodeProperty::Icons => 2,
        NodeProperty::Folding => 3,
        NodeProperty::History => 4,
        NodeProperty::Side => 5,
        NodeProperty::Clones => 6,
        NodeProperty::Unknown => 7,
    }
}

fn property_from_code(code: u32) -> NodeProperty {
    match code {
        0 => NodeProperty::Text,
        1 => NodeProperty::XmlText,
        2 => NodeProperty::Icons,
        3 => NodeProperty::Folding,
        4 => NodeProperty::History,
        5 => NodeProperty::Side,
        6 => NodeProperty::Clones,
        _ => NodeProperty::Unknown,
    }
}

impl MapChangeListener for RecorderListener {
    fn on_node_inserted(&self, _map: &NodeMap, e: &NodeInsertionEvent) {
        self.record(
            TAG_INSERTED,
            &[e.parent.index(), e.child.index(), index_u32(e.index)],
        );
    }

    fn on_node_deleted(&self, _map: &NodeMap, e: &NodeDeletionEvent) {
        self.record(
            TAG_DELETED,
            &[e.parent.index(), e.child.index(), index_u32(e.index)],
        );
    }

    fn on_node_moved(&self, _map: &NodeMap, e: &NodeMoveEvent) {
        self.record(
            TAG_MOVED,
            &[
                e.child.index(),
                e.old_parent.index(),
                index_u32(e.old_index),
                e.new_parent.index(),
                index_u32(e.new_index),
            ],
        );
    }
}

impl NodeChangeListener for RecorderListener {
    fn node_changed(&self, _map: &NodeMap, e: &NodeChangeEvent) {
        self.record(TAG_CHANGED, &[e.node.index(), property_code(e.property)]);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A child was inserted.
    Inserted {
        /// Parent slot.
        parent: u32,
        /// Child slot.
        child: u32,
        /// Position under the parent.
        index: u32,
    },
    /// A child was removed.
    Deleted {
        /// Parent slot.
        parent: u32,
        /// Child slot.
        child: u32,
        /// Former position under the parent.
        index: u32,
    },
    /// A child was moved.
    Moved {
        /// Child slot.
        child: u32,
        /// Former parent slot.
        old_parent: u32,
        /// Former position.
        old_index: u32,
        /// New parent slot.
        new_parent: u32,
        /// New position.
        new_index: u32,
    },
    /// A node's content changed.
    Changed {
        /// Node slot.
        node: u32,
        /// Which property changed.
        property: NodeProperty,
    },
}

/// Decodes a byte slice produced by [`RecorderListener`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_INSERTED => Some(RecordedEvent::Inserted {
                parent: self.read_u32()?,
                child: self.read_u32()?,
                index: self.read_u32()?,
            }),
            TAG_DELETED => Some(RecordedEvent::Deleted {
                parent: self.read_u32()?,
                child: self.read_u32()?,
                index: self.read_u32()?,
            }),
            TAG_MOVED => Some(RecordedEvent::Moved {
                child: self.read_u32()?,
                old_parent: self.read_u32()?,
                old_index: self.read_u32()?,
                new_parent: self.read_u32()?,
                new_index: self.read_u32()?,
            }),
            TAG_CHANGED => Some(RecordedEvent::Changed {
                node: self.read_u32()?,
                property: property_from_code(self.read_u32()?),
            }),
            // Unknown tag: stop.
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

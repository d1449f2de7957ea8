// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::NodeMap;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeMap::children`].
#[derive(Debug)]
pub struct Children<'a> {
    map: &'a NodeMap,
    inner: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(map: &'a NodeMap, slots: &'a [u32]) -> Self {
        Self {
            map,
            inner: slots.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().map(|&idx| self.map.handle(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.inner.next_back().map(|&idx| self.map.handle(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// An iterator over the ancestors of a node, nearest first.
///
/// Created by [`NodeMap::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    map: &'a NodeMap,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(map: &'a NodeMap, first: u32) -> Self {
        Self {
            map,
            current: first,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.map.parent[idx as usize];
        Some(self.map.handle(idx))
    }
}

/// A depth-first pre-order iterator over a subtree, starting at its root.
///
/// Created by [`NodeMap::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    map: &'a NodeMap,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(map: &'a NodeMap, start: u32) -> Self {
        Self {
            map,
            stack: alloc::vec![start],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Reverse so the first child is visited next.
        self.stack
            .extend(self.map.children[idx as usize].iter().rev().copied());
        Some(self.map.handle(idx))
    }
}

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed extension slots.
//!
//! Unrelated features (encryption, summaries, free positioning, styles) hang
//! state off a node without the core knowing their concrete types. Each
//! extension is stored under its own [`TypeId`], so a subsystem registers an
//! extension simply by choosing a type for it; lookups downcast back to that
//! type.
//!
//! The core consults a handful of marker extensions defined here:
//! [`Encrypted`], [`SummaryNode`], [`FreeNode`] and [`AlwaysUnfolded`].

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::any::{Any, TypeId};
use core::fmt;

/// A value that can be attached to a node.
///
/// Implemented for every `'static` type that is `Debug + Clone`; the clone is
/// needed when a node is duplicated into an independent copy.
pub trait Extension: Any + fmt::Debug {
    /// Returns a boxed copy of this extension.
    fn clone_extension(&self) -> Box<dyn Extension>;
}

impl<T: Any + fmt::Debug + Clone> Extension for T {
    fn clone_extension(&self) -> Box<dyn Extension> {
        Box::new(self.clone())
    }
}

/// A map from extension type to extension value.
#[derive(Debug, Default)]
pub struct ExtensionMap {
    entries: BTreeMap<TypeId, Box<dyn Extension>>,
}

impl Clone for ExtensionMap {
    fn clone(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (*key, (**value).clone_extension()))
                .collect(),
        }
    }
}

impl ExtensionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the extension of type `T`, if present.
    #[must_use]
    pub fn get<T: Extension>(&self) -> Option<&T> {
        let value: &dyn Any = self.entries.get(&TypeId::of::<T>())?.as_ref();
        value.downcast_ref::<T>()
    }

    /// Returns the extension of type `T` mutably, if present.
    #[must_use]
    pub fn get_mut<T: Extension>(&mut self) -> Option<&mut T> {
        let value: &mut dyn Any = self.entries.get_mut(&TypeId::of::<T>())?.as_mut();
        value.downcast_mut::<T>()
    }

    /// Returns whether an extension of type `T` is present.
    #[must_use]
    pub fn contains<T: Extension>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Stores `extension`, returning the previous value of the same type.
    pub fn put<T: Extension>(&mut self, extension: T) -> Option<T> {
        let previous = self.entries.insert(TypeId::of::<T>(), Box::new(extension))?;
        downcast_box(previous)
    }

    /// Removes and returns the extension of type `T`.
    pub fn remove<T: Extension>(&mut self) -> Option<T> {
        let removed = self.entries.remove(&TypeId::of::<T>())?;
        downcast_box(removed)
    }

    /// Returns the number of stored extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no extension is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the stored extension values in key order.
    pub fn values(&self) -> impl Iterator<Item = &dyn Extension> {
        self.entries.values().map(Box::as_ref)
    }
}

fn downcast_box<T: Extension>(value: Box<dyn Extension>) -> Option<T> {
    let value: Box<dyn Any> = value;
    value.downcast::<T>().ok().map(|boxed| *boxed)
}

/// Marks a node whose content is access-controlled.
///
/// Content clones of such a node are refused, and an inaccessible node never
/// reports itself folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encrypted {
    /// Whether the content is currently decrypted.
    pub accessible: bool,
}

/// Marks a summary node (a node summarizing a group of its preceding
/// siblings).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryNode {
    /// A hidden summary only anchors its group and has no visible content.
    pub hidden: bool,
}

/// Marks a freely positioned node; it does not take part in side balancing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeNode;

/// Marks a node that must never be folded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlwaysUnfolded;

// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content shared by every content clone of a logical node.

use alloc::string::String;
use alloc::vec::Vec;

use crate::extension::ExtensionMap;

/// A named icon attached to a node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NamedIcon(pub String);

impl NamedIcon {
    /// Creates an icon from its registry name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Creation and modification timestamps, in milliseconds since the Unix
/// epoch.
///
/// The core never reads a clock; timestamps are supplied by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryInformation {
    /// When the node was created.
    pub created_at: u64,
    /// When the node's content was last modified.
    pub last_modified_at: u64,
}

/// The content payload of a node.
///
/// All nodes in the same CONTENT clone group refer to one `SharedNodeData`, so
/// a mutation through any of them is visible through all of them. A fresh
/// copy is made only when a node becomes independent (see
/// [`NodeMap::duplicate`](super::NodeMap::duplicate)).
#[derive(Clone, Debug, Default)]
pub struct SharedNodeData {
    pub(crate) text: String,
    pub(crate) xml_text: Option<String>,
    pub(crate) history: HistoryInformation,
    pub(crate) icons: Vec<NamedIcon>,
    pub(crate) extensions: ExtensionMap,
    pub(crate) folded: bool,
}

impl SharedNodeData {
    /// Creates content holding `text`.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the plain text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the XML-serialized text, if it has been set.
    #[must_use]
    pub fn xml_text(&self) -> Option<&str> {
        self.xml_text.as_deref()
    }

    /// Returns the history timestamps.
    #[must_use]
    pub fn history(&self) -> HistoryInformation {
        self.history
    }

    /// Returns the icons in display order.
    #[must_use]
    pub fn icons(&self) -> &[NamedIcon] {
        &self.icons
    }

    /// Returns the shared extensions.
    #[must_use]
    pub fn extensions(&self) -> &ExtensionMap {
        &self.extensions
    }

    /// Returns the stored folding flag, ignoring accessibility.
    #[must_use]
    pub fn folded(&self) -> bool {
        self.folded
    }
}

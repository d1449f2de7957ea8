// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content access and mutation.
//!
//! Everything here reads or writes the [`SharedNodeData`] of a node, so a
//! change made through one content clone is visible through all of them.
//! Mutations mark [`CONTENT`](crate::dirty::CONTENT) (or
//! [`FOLDING`](crate::dirty::FOLDING)) on every content clone and then fan
//! out through [`NodeMap::fire_node_changed`].

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use understory_dirty::Channel;

use crate::dirty;
use crate::error::NodeError;
use crate::event::{ChangeValue, NodeChangeEvent, NodeProperty};
use crate::extension::{AlwaysUnfolded, Encrypted, Extension, ExtensionMap};

use super::clones::CloneType;
use super::id::NodeId;
use super::shared::{HistoryInformation, NamedIcon, SharedNodeData};
use super::store::NodeMap;

impl NodeMap {
    /// Returns the content shared by all content clones of `node`.
    #[must_use]
    pub fn shared_data(&self, node: NodeId) -> &SharedNodeData {
        self.validate(node);
        self.data(node.idx)
    }

    // -- Text --

    /// Returns the plain text.
    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        self.shared_data(node).text()
    }

    /// Replaces the plain text.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.validate(node);
        let text = text.into();
        let old = mem::replace(&mut self.data_mut(node.idx).text, text.clone());
        if old == text {
            return;
        }
        self.mark_content_clones(node.idx, dirty::CONTENT);
        self.fire_node_changed(&NodeChangeEvent::new(
            node,
            NodeProperty::Text,
            ChangeValue::Text(old),
            ChangeValue::Text(text),
        ));
    }

    /// Returns the XML-serialized text, if set.
    #[must_use]
    pub fn xml_text(&self, node: NodeId) -> Option<&str> {
        self.shared_data(node).xml_text()
    }

    /// Replaces the XML-serialized text.
    pub fn set_xml_text(&mut self, node: NodeId, xml: Option<String>) {
        self.validate(node);
        let data = self.data_mut(node.idx);
        if data.xml_text == xml {
            return;
        }
        data.xml_text = xml;
        self.mark_content_clones(node.idx, dirty::CONTENT);
        self.fire_node_changed(&NodeChangeEvent::refresh(node, NodeProperty::XmlText));
    }

    // -- Icons --

    /// Returns the icons in display order.
    #[must_use]
    pub fn icons(&self, node: NodeId) -> &[NamedIcon] {
        self.shared_data(node).icons()
    }

    /// Returns the icon at `position`.
    #[must_use]
    pub fn icon(&self, node: NodeId, position: usize) -> Option<&NamedIcon> {
        self.icons(node).get(position)
    }

    /// Appends an icon and records it in the map's icon registry.
    pub fn add_icon(&mut self, node: NodeId, icon: NamedIcon) {
        self.validate(node);
        let len = self.data(node.idx).icons.len();
        self.insert_icon(node, icon, len);
    }

    /// Inserts an icon at `position`.
    ///
    /// # Errors
    ///
    /// [`NodeError::IndexOutOfBounds`] if `position` exceeds the icon count.
    pub fn add_icon_at(
        &mut self,
        node: NodeId,
        icon: NamedIcon,
        position: usize,
    ) -> Result<(), NodeError> {
        self.validate(node);
        let len = self.data(node.idx).icons.len();
        if position > len {
            return Err(NodeError::IndexOutOfBounds {
                index: position,
                len,
            });
        }
        self.insert_icon(node, icon, position);
        Ok(())
    }

    fn insert_icon(&mut self, node: NodeId, icon: NamedIcon, position: usize) {
        self.icon_registry.insert(icon.clone());
        let icons = &mut self.data_mut(node.idx).icons;
        let before = icons.len();
        icons.insert(position, icon);
        self.icons_changed(node, before);
    }

    /// Removes the last icon. Returns the number of remaining icons.
    pub fn remove_last_icon(&mut self, node: NodeId) -> usize {
        self.validate(node);
        let icons = &mut self.data_mut(node.idx).icons;
        let before = icons.len();
        if icons.pop().is_some() {
            self.icons_changed(node, before);
        }
        before.saturating_sub(1)
    }

    /// Removes the icon at `position`. Returns the number of remaining icons.
    ///
    /// # Errors
    ///
    /// [`NodeError::IndexOutOfBounds`] if there is no icon at `position`.
    pub fn remove_icon_at(&mut self, node: NodeId, position: usize) -> Result<usize, NodeError> {
        self.validate(node);
        let icons = &mut self.data_mut(node.idx).icons;
        let before = icons.len();
        if position >= before {
            return Err(NodeError::IndexOutOfBounds {
                index: position,
                len: before,
            });
        }
        icons.remove(position);
        self.icons_changed(node, before);
        Ok(before - 1)
    }

    fn icons_changed(&mut self, node: NodeId, before: usize) {
        let after = self.data(node.idx).icons.len();
        self.mark_content_clones(node.idx, dirty::CONTENT);
        self.fire_node_changed(&NodeChangeEvent::new(
            node,
            NodeProperty::Icons,
            ChangeValue::Count(before),
            ChangeValue::Count(after),
        ));
    }

    // -- History --

    /// Returns the creation and modification timestamps.
    #[must_use]
    pub fn history(&self, node: NodeId) -> HistoryInformation {
        self.shared_data(node).history()
    }

    /// Replaces the timestamps.
    pub fn set_history(&mut self, node: NodeId, history: HistoryInformation) {
        self.validate(node);
        self.data_mut(node.idx).history = history;
        self.mark_content_clones(node.idx, dirty::CONTENT);
        self.fire_node_changed(&NodeChangeEvent::refresh(node, NodeProperty::History));
    }

    // -- Folding --

    /// Returns whether the node's content is accessible (not encrypted, or
    /// currently decrypted).
    #[must_use]
    pub fn is_accessible(&self, node: NodeId) -> bool {
        self.extension::<Encrypted>(node)
            .is_none_or(|encrypted| encrypted.accessible)
    }

    /// Returns whether the node is folded. Inaccessible nodes never are.
    #[must_use]
    pub fn is_folded(&self, node: NodeId) -> bool {
        self.shared_data(node).folded && self.is_accessible(node)
    }

    /// Folds or unfolds the node.
    ///
    /// The stored flag only changes when the request differs from the
    /// current state and the node is accessible. A node carrying
    /// [`AlwaysUnfolded`] stores `false` regardless. A
    /// [`NodeProperty::Folding`] change is fired either way.
    pub fn set_folded(&mut self, node: NodeId, folded: bool) {
        let was_folded = self.is_folded(node);
        if was_folded != folded && self.is_accessible(node) {
            let stored = folded && !self.contains_extension::<AlwaysUnfolded>(node);
            self.data_mut(node.idx).folded = stored;
            self.mark_content_clones(node.idx, dirty::FOLDING);
        }
        self.fire_node_changed(&NodeChangeEvent::new(
            node,
            NodeProperty::Folding,
            ChangeValue::Flag(was_folded),
            ChangeValue::Flag(folded),
        ));
    }

    // -- Shared extensions --

    /// Returns the shared extension of type `T`.
    #[must_use]
    pub fn extension<T: Extension>(&self, node: NodeId) -> Option<&T> {
        self.shared_data(node).extensions.get::<T>()
    }

    /// Returns the shared extension of type `T` mutably.
    ///
    /// Changes made this way are not announced; call
    /// [`fire_node_changed`](Self::fire_node_changed) when observers care.
    pub fn extension_mut<T: Extension>(&mut self, node: NodeId) -> Option<&mut T> {
        self.validate(node);
        self.data_mut(node.idx).extensions.get_mut::<T>()
    }

    /// Returns whether a shared extension of type `T` is present.
    #[must_use]
    pub fn contains_extension<T: Extension>(&self, node: NodeId) -> bool {
        self.shared_data(node).extensions.contains::<T>()
    }

    /// Stores a shared extension, returning the previous value of that type.
    pub fn put_extension<T: Extension>(&mut self, node: NodeId, extension: T) -> Option<T> {
        self.validate(node);
        let previous = self.data_mut(node.idx).extensions.put(extension);
        self.mark_content_clones(node.idx, dirty::CONTENT);
        previous
    }

    /// Removes a shared extension.
    pub fn remove_extension<T: Extension>(&mut self, node: NodeId) -> Option<T> {
        self.validate(node);
        let removed = self.data_mut(node.idx).extensions.remove::<T>();
        if removed.is_some() {
            self.mark_content_clones(node.idx, dirty::CONTENT);
        }
        removed
    }

    // -- Individual extensions --

    /// Returns the per-instance extensions, which content clones do not
    /// share.
    #[must_use]
    pub fn individual_extensions(&self, node: NodeId) -> &ExtensionMap {
        self.validate(node);
        &self.individual[node.idx as usize]
    }

    /// Returns the per-instance extension of type `T`.
    #[must_use]
    pub fn individual_extension<T: Extension>(&self, node: NodeId) -> Option<&T> {
        self.individual_extensions(node).get::<T>()
    }

    /// Stores a per-instance extension.
    pub fn put_individual_extension<T: Extension>(
        &mut self,
        node: NodeId,
        extension: T,
    ) -> Option<T> {
        self.validate(node);
        self.individual[node.idx as usize].put(extension)
    }

    /// Removes a per-instance extension.
    pub fn remove_individual_extension<T: Extension>(&mut self, node: NodeId) -> Option<T> {
        self.validate(node);
        self.individual[node.idx as usize].remove::<T>()
    }

    pub(crate) fn mark_content_clones(&mut self, idx: u32, channel: Channel) {
        let members: Vec<u32> = self.group(idx, CloneType::Content).members.clone();
        for member in members {
            self.dirty.mark(member, channel);
        }
    }
}

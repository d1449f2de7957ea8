// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bound selection model for enumerated node properties.
//!
//! A [`ChoiceProperty`] pairs the stored value names of a property with the
//! descriptors a UI would display for them. Tagged enums such as
//! [`Side`](crate::node::Side) implement [`Choice`] and build a property with
//! [`ChoiceProperty::of`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::NamedIcon;

/// Display descriptor for one choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedContent {
    /// Label shown to the user.
    pub text: String,
    /// Optional icon shown next to the label.
    pub icon: Option<NamedIcon>,
}

impl RenderedContent {
    /// Creates a text-only descriptor.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
        }
    }

    /// Adds an icon.
    #[must_use]
    pub fn with_icon(mut self, icon: NamedIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// An enumeration whose variants can be offered as choices.
pub trait Choice: Copy + 'static {
    /// Every variant, in presentation order.
    const ALL: &'static [Self];

    /// Stable name stored as the property value.
    fn name(self) -> &'static str;

    /// How the variant is displayed. Defaults to its name.
    fn rendered(self) -> RenderedContent {
        RenderedContent::text(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Selection {
    None,
    Index(usize),
    Custom(String),
}

/// A named single-choice property.
#[derive(Clone, Debug)]
pub struct ChoiceProperty {
    name: String,
    values: Vec<String>,
    displayed: Vec<RenderedContent>,
    selection: Selection,
    editable: bool,
    enabled: bool,
}

impl ChoiceProperty {
    /// Creates a property from value names and their display descriptors.
    ///
    /// Nothing is selected until [`set_value`](Self::set_value) is called.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = String>,
        displayed: impl IntoIterator<Item = RenderedContent>,
    ) -> Self {
        let values: Vec<String> = values.into_iter().collect();
        let displayed: Vec<RenderedContent> = displayed.into_iter().collect();
        debug_assert_eq!(values.len(), displayed.len(), "one descriptor per value");
        Self {
            name: name.into(),
            values,
            displayed,
            selection: Selection::None,
            editable: false,
            enabled: true,
        }
    }

    /// Creates a property whose descriptors are the value names themselves.
    pub fn from_values<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let displayed: Vec<RenderedContent> =
            values.iter().map(|v| RenderedContent::text(v.clone())).collect();
        Self::new(name, values, displayed)
    }

    /// Creates a property offering every variant of `T`.
    pub fn of<T: Choice>(name: impl Into<String>) -> Self {
        Self::new(
            name,
            T::ALL.iter().map(|c| String::from(c.name())),
            T::ALL.iter().map(|c| c.rendered()),
        )
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored value of the current selection.
    ///
    /// Custom text typed into an editable property is returned as is.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.selection {
            Selection::None => None,
            Selection::Index(i) => self.values.get(*i).map(String::as_str),
            Selection::Custom(text) => Some(text),
        }
    }

    /// Returns the index of the selected value, if it is one of the choices.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match self.selection {
            Selection::Index(i) => Some(i),
            _ => None,
        }
    }

    /// Selects `value`.
    ///
    /// Unknown values are kept verbatim when the property is editable.
    /// Otherwise a warning is logged and the first choice is selected.
    pub fn set_value(&mut self, value: &str) {
        if let Some(i) = self.values.iter().position(|v| v == value) {
            self.selection = Selection::Index(i);
        } else if self.editable {
            self.selection = Selection::Custom(String::from(value));
        } else {
            tracing::warn!(
                property = %self.name,
                value,
                choices = ?self.values,
                "value is not one of the choices"
            );
            if !self.values.is_empty() {
                self.selection = Selection::Index(0);
            }
        }
    }

    /// Replaces the choices and selects the first one.
    pub fn update_entries(
        &mut self,
        values: impl IntoIterator<Item = String>,
        displayed: impl IntoIterator<Item = RenderedContent>,
    ) {
        self.values = values.into_iter().collect();
        self.displayed = displayed.into_iter().collect();
        debug_assert_eq!(self.values.len(), self.displayed.len());
        self.selection = if self.values.is_empty() {
            Selection::None
        } else {
            Selection::Index(0)
        };
    }

    /// Returns the stored value names.
    #[must_use]
    pub fn possible_values(&self) -> &[String] {
        &self.values
    }

    /// Returns the display descriptors, parallel to
    /// [`possible_values`](Self::possible_values).
    #[must_use]
    pub fn displayed(&self) -> &[RenderedContent] {
        &self.displayed
    }

    /// Allows values outside the choices.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Returns whether values outside the choices are accepted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Enables or disables the property.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the property is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Side;

    #[test]
    fn of_enum_lists_every_variant() {
        let prop = ChoiceProperty::of::<Side>("side");
        assert_eq!(
            prop.possible_values(),
            ["DEFAULT", "LEFT", "RIGHT", "AS_SIBLING"]
        );
        assert_eq!(prop.displayed()[3], RenderedContent::text("As sibling"));
        assert_eq!(prop.value(), None);
    }

    #[test]
    fn known_value_is_selected() {
        let mut prop = ChoiceProperty::of::<Side>("side");
        prop.set_value("RIGHT");
        assert_eq!(prop.value(), Some("RIGHT"));
        assert_eq!(prop.selected_index(), Some(2));
    }

    #[test]
    fn unknown_value_falls_back_to_first() {
        let mut prop = ChoiceProperty::from_values("style", ["fork", "bubble"]);
        prop.set_value("bubble");
        prop.set_value("cloud");
        assert_eq!(prop.value(), Some("fork"));
    }

    #[test]
    fn unknown_value_on_empty_choices_keeps_nothing() {
        let mut prop = ChoiceProperty::from_values::<&str>("empty", []);
        prop.set_value("x");
        assert_eq!(prop.value(), None);
    }

    #[test]
    fn editable_keeps_custom_text() {
        let mut prop = ChoiceProperty::from_values("font", ["Serif", "Sans"]);
        prop.set_editable(true);
        prop.set_value("Monospace");
        assert_eq!(prop.value(), Some("Monospace"));
        assert_eq!(prop.selected_index(), None);
    }

    #[test]
    fn update_entries_selects_first() {
        let mut prop = ChoiceProperty::from_values("a", ["x", "y"]);
        prop.set_value("y");
        prop.update_entries(
            [String::from("p"), String::from("q")],
            [RenderedContent::text("P"), RenderedContent::text("Q")],
        );
        assert_eq!(prop.value(), Some("p"));
    }
}

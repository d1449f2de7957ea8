// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-direction hint.

use crate::choice::{Choice, RenderedContent};

/// Which side of a layout root a node is drawn on.
///
/// `Default` means "inherit": the effective side is resolved upward through
/// the ancestry by [`NodeMap::is_left`](super::NodeMap::is_left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// No explicit hint.
    #[default]
    Default,
    /// Drawn to the left of the layout root.
    Left,
    /// Drawn to the right of the layout root.
    Right,
    /// Placed on the same side as the sibling it was created next to.
    AsSibling,
}

impl Side {
    /// Returns the explicit side for a resolved left/right answer.
    #[must_use]
    pub const fn from_left(left: bool) -> Self {
        if left { Self::Left } else { Self::Right }
    }
}

impl Choice for Side {
    const ALL: &'static [Self] = &[Self::Default, Self::Left, Self::Right, Self::AsSibling];

    fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::AsSibling => "AS_SIBLING",
        }
    }

    fn rendered(self) -> RenderedContent {
        let text = match self {
            Self::Default => "Default",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::AsSibling => "As sibling",
        };
        RenderedContent::text(text)
    }
}

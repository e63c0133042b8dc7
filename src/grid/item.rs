//! Descriptions of items handed to the packer.

use crate::types::{Anchor, GridRect, GridSize};

/// An item that should be placed on the grid.
///
/// A `GridItem` is only a description: the packer itself keeps nothing
/// but the identity and the grid rectangle the item ends up at. Creating
/// and destroying whatever visually represents the item is left to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    id: String,
    grid: Option<GridRect>,
    size_hint: Option<GridSize>,
    anchor: Anchor,
}

impl GridItem {
    /// Creates a new item with no saved position, no size hint,
    /// and a top-left anchor.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            grid: None,
            size_hint: None,
            anchor: Anchor::TopLeft,
        }
    }

    /// Sets the position the item was last known to occupy.
    pub fn with_grid(mut self, grid: GridRect) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Sets the default size used when the item has no saved position.
    pub fn with_size_hint(mut self, size: GridSize) -> Self {
        self.size_hint = Some(size);
        self
    }

    /// Sets the corner the item is placed from when it has no saved position.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// The stable identity of the item.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The saved position of the item, if any.
    pub fn grid(&self) -> Option<GridRect> {
        self.grid
    }

    /// The default size of the item, if it carries one.
    pub fn size_hint(&self) -> Option<GridSize> {
        self.size_hint
    }

    /// The corner the item is placed from.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}

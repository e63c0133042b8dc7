//! Persistence of item placements.
//!
//! The grid packer never reads or writes saved positions itself. Instead,
//! a [`PluginSpace`][1] consults a [`PlacementStore`] when it adds an item,
//! and writes placements back once they are settled. Every entry is keyed
//! by the item's identity string and stored in the same
//! `column,row,width,height` text form that [`GridRect`] parses from and
//! displays as.
//!
//! [1]: crate::desktop::PluginSpace

use std::collections::HashMap;

use tracing::warn;

use crate::types::{GridRect, PixelRect};

/// A key/value store holding the saved placement of each desktop item.
pub trait PlacementStore {
    /// The saved grid rectangle for the item, if one exists.
    fn grid_geometry(&self, id: &str) -> Option<GridRect>;

    /// Saves the grid rectangle for the item.
    fn set_grid_geometry(&mut self, id: &str, grid: GridRect);

    /// A pixel geometry saved by older versions, from before positions were
    /// kept in grid cells.
    ///
    /// The default implementation has no legacy data.
    fn legacy_geometry(&self, _id: &str) -> Option<PixelRect> {
        None
    }

    /// Removes every setting stored for the item.
    fn remove_settings(&mut self, id: &str);
}

/// A [`PlacementStore`] that keeps its entries in memory.
///
/// Entries are held in their textual form, so whatever is loaded
/// into it goes through the same parsing as a settings file would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    grids: HashMap<String, String>,
    legacy: HashMap<String, PixelRect>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw `column,row,width,height` entry for the item.
    pub fn insert_raw<K, V>(&mut self, id: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.grids.insert(id.into(), value.into());
    }

    /// Inserts a legacy pixel geometry for the item.
    pub fn insert_legacy<K: Into<String>>(&mut self, id: K, geom: PixelRect) {
        self.legacy.insert(id.into(), geom);
    }

    /// Returns the raw stored entry for the item.
    pub fn raw(&self, id: &str) -> Option<&str> {
        self.grids.get(id).map(String::as_str)
    }

    /// Returns true if nothing is stored for the item.
    pub fn is_unset(&self, id: &str) -> bool {
        !self.grids.contains_key(id) && !self.legacy.contains_key(id)
    }
}

impl PlacementStore for MemoryStore {
    fn grid_geometry(&self, id: &str) -> Option<GridRect> {
        let raw = self.grids.get(id)?;
        match raw.parse::<GridRect>() {
            Ok(grid) if grid.is_placed() && !grid.is_empty() => Some(grid),
            Ok(_) => None,
            Err(e) => {
                warn!("ignoring saved geometry for {}: {}", id, e);
                None
            }
        }
    }

    fn set_grid_geometry(&mut self, id: &str, grid: GridRect) {
        self.grids.insert(id.to_string(), grid.to_string());
    }

    fn legacy_geometry(&self, id: &str) -> Option<PixelRect> {
        self.legacy.get(id).copied().filter(|geom| !geom.is_empty())
    }

    fn remove_settings(&mut self, id: &str) {
        self.grids.remove(id);
        self.legacy.remove(id);
    }
}

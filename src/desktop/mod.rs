//! The desktop plugin area.
//!
//! A [`PluginSpace`] covers the part of one screen not reserved by panels.
//! It decides which desktop plugins and file launchers should exist, asks
//! a [`GridPacker`] where to put them, and keeps their placements in a
//! [`PlacementStore`] across sessions.
//!
//! The space never draws anything. Every change it makes is reported
//! back as a list of [`SpaceEvent`]s, which whatever owns the visual
//! representation of each item should apply in order.

pub mod ident;
pub mod workarea;

use custom_debug_derive::Debug;
use tracing::{debug, info, instrument, warn};

use crate::config::{no_checks, DeskConfig};
use crate::config::store::PlacementStore;
use crate::grid::{GridItem, GridPacker};
use crate::types::{GridRect, PixelRect};
use crate::Result;

#[doc(inline)]
pub use ident::{default_size_hint, PluginId, SizeHintFn};
#[doc(inline)]
pub use workarea::{work_area, PanelEdge, PanelStrip};

/// A change to the items on the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceEvent {
    /// A new item was placed.
    Placed {
        /// The identity of the item.
        id: String,
        /// Where the item sits on the grid.
        grid: GridRect,
        /// Where the item sits on screen.
        geometry: PixelRect,
    },
    /// An existing item should be moved or resized.
    Moved {
        /// The identity of the item.
        id: String,
        /// Where the item sits on the grid.
        grid: GridRect,
        /// Where the item sits on screen.
        geometry: PixelRect,
    },
    /// An item could not be placed and should be discarded.
    ///
    /// Its saved settings are kept, so it may come back once
    /// there is room for it again.
    Dropped {
        /// The identity of the item.
        id: String,
    },
    /// An item was removed for good, along with its saved settings.
    Removed {
        /// The identity of the item.
        id: String,
    },
}

impl SpaceEvent {
    /// The identity of the item the event concerns.
    pub fn id(&self) -> &str {
        match self {
            SpaceEvent::Placed { id, .. }
            | SpaceEvent::Moved { id, .. }
            | SpaceEvent::Dropped { id }
            | SpaceEvent::Removed { id } => id,
        }
    }
}

/// The desktop plugin area of a single screen.
///
/// # Example
///
/// ```rust
/// use lumidesk::config::{DeskConfig, store::MemoryStore};
/// use lumidesk::desktop::{PluginSpace, SpaceEvent};
/// use lumidesk::types::{GridRect, PixelRect};
///
/// let area = PixelRect::new(0, 0, 500, 500);
/// let mut space = PluginSpace::new(DeskConfig::new(), MemoryStore::new(), 0, area).unwrap();
///
/// let events = space.load_items(&["clock".to_string()], &[]);
///
/// // plugins without a saved position come in from the bottom-right
/// assert!(matches!(
///     &events[..],
///     [SpaceEvent::Placed { grid, .. }] if *grid == GridRect::new(3, 3, 2, 2)
/// ));
/// ```
#[derive(Debug)]
pub struct PluginSpace<S: PlacementStore> {
    packer: GridPacker,
    #[debug(skip)]
    store: S,
    config: DeskConfig,
    /// The plugin identities that should be on the desktop.
    plugins: Vec<String>,
    /// The file paths that should have launchers on the desktop.
    files: Vec<String>,
    screen: usize,
    #[debug(skip)]
    size_hint: SizeHintFn,
}

impl<S: PlacementStore> PluginSpace<S> {
    /// Creates an empty plugin space for `screen`, covering `area`.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: DeskConfig, store: S, screen: usize, area: PixelRect) -> Result<Self> {
        config.validate(no_checks)?;

        let cell_size = config.resolve_grid_size(area.size.height);
        let packer = GridPacker::new(area, cell_size)?
            .with_orientation(config.orientation());

        debug!("new plugin space on screen {} over {:?}, grid size {}", screen, area, cell_size);

        Ok(Self {
            packer,
            store,
            config,
            plugins: Vec::new(),
            files: Vec::new(),
            screen,
            size_hint: default_size_hint,
        })
    }

    /// Replaces the function giving the default size of new items.
    pub fn with_size_hint(mut self, size_hint: SizeHintFn) -> Self {
        self.size_hint = size_hint;
        self
    }

    /// The packer holding the current placements.
    pub fn packer(&self) -> &GridPacker {
        &self.packer
    }

    /// The placement store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current configuration.
    ///
    /// This reflects any icon size changes made since the space was created.
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// The screen this space belongs to.
    pub fn screen(&self) -> usize {
        self.screen
    }

    /// The plugin identities last loaded.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// The file paths last loaded.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Where the item is on screen, if it is on the desktop.
    pub fn geometry(&self, id: &str) -> Option<PixelRect> {
        self.packer.get(id).map(|grid| self.packer.grid_to_pixel(grid))
    }

    /// Sets the area the desktop items may occupy.
    ///
    /// If no grid size is configured, the grid size is picked again for the
    /// new area. Call [`PluginSpace::update_geom`] afterwards to move items
    /// that no longer fit.
    pub fn set_desktop_area(&mut self, area: PixelRect) {
        self.packer.set_canvas(area);

        if self.config.grid_size().is_none() {
            let cell_size = self.config.resolve_grid_size(area.size.height);
            // resolved sizes are always positive
            if let Err(e) = self.packer.set_cell_size(cell_size) {
                warn!("could not resize grid: {}", e);
            }
        }
    }

    /// Brings every item back within the current desktop area.
    ///
    /// Items that are out of bounds are moved as close to their old spot
    /// as possible, or dropped if there is no room left. Every surviving
    /// item gets a `Moved` event, since its pixel geometry changes with
    /// the area and grid size even if its grid position does not.
    #[instrument(level = "debug", skip(self))]
    pub fn update_geom(&mut self) -> Vec<SpaceEvent> {
        let report = self.packer.revalidate_all();

        let mut events: Vec<SpaceEvent> = self.packer.iter()
            .map(|(id, grid)| SpaceEvent::Moved {
                id: id.to_string(),
                grid,
                geometry: self.packer.grid_to_pixel(grid),
            })
            .collect();

        for event in &events {
            if let SpaceEvent::Moved { id, grid, .. } = event {
                self.store.set_grid_geometry(id, *grid);
            }
        }

        for id in report.dropped {
            warn!("no place for {}, removing it for now", id);
            events.push(SpaceEvent::Dropped { id });
        }

        events
    }

    /// Sets the grid size to `size` pixels and updates every item.
    ///
    /// Fails without changing anything if `size` is not positive.
    pub fn set_icon_size(&mut self, size: i32) -> Result<Vec<SpaceEvent>> {
        self.packer.set_cell_size(size)?;
        self.config.set_grid_size(size);
        info!("desktop grid size is now {}", size);
        Ok(self.update_geom())
    }

    /// Grows the grid by one icon step.
    pub fn increase_icons(&mut self) -> Result<Vec<SpaceEvent>> {
        let size = self.packer.cell_size() + self.config.icon_step();
        self.set_icon_size(size)
    }

    /// Shrinks the grid by one icon step.
    ///
    /// Nothing happens if the grid is already below the minimum icon size.
    pub fn decrease_icons(&mut self) -> Result<Vec<SpaceEvent>> {
        let current = self.packer.cell_size();
        if current < self.config.min_icon_size() {
            debug!("grid size {} is already at the minimum", current);
            return Ok(Vec::new())
        }
        self.set_icon_size(current - self.config.icon_step())
    }

    /// Sets the plugins and files that should be on the desktop.
    ///
    /// The desktop is only reloaded if either list differs from the
    /// last one loaded.
    pub fn load_items(&mut self, plugins: &[String], files: &[String]) -> Vec<SpaceEvent> {
        let mut changed = false;
        if self.plugins != plugins {
            self.plugins = plugins.to_vec();
            changed = true;
        }
        if self.files != files {
            self.files = files.to_vec();
            changed = true;
        }

        if changed {
            self.reload()
        } else {
            Vec::new()
        }
    }

    /// Syncs the items on the desktop with the loaded lists.
    ///
    /// Items that are no longer listed are removed along with their saved
    /// settings. New plugins are then added, followed by new launchers,
    /// which fill in around the plugins.
    #[instrument(level = "debug", skip(self))]
    pub fn reload(&mut self) -> Vec<SpaceEvent> {
        let mut plugins = self.plugins.clone();
        let mut files = self.files.clone();
        let mut events = Vec::new();

        let existing: Vec<String> = self.packer.iter().map(|(id, _)| id.to_string()).collect();
        for id in existing {
            if let Some(idx) = plugins.iter().position(|p| *p == id) {
                plugins.remove(idx);
                continue
            }

            let ident = PluginId::parse(&id);
            if let Some(path) = ident.path() {
                if files.iter().any(|f| f == path) {
                    files.retain(|f| f != path);
                    continue
                }
            }

            debug!("{} is no longer listed", id);
            self.store.remove_settings(&id);
            self.packer.remove(&id);
            events.push(SpaceEvent::Removed { id });
        }

        for id in plugins {
            events.push(self.add_plugin(&id));
        }
        for path in files {
            events.push(self.add_file_item(&path));
        }

        events
    }

    /// Adds a single item to the desktop.
    ///
    /// The saved grid position is used if there is one, falling back to a
    /// saved pixel geometry, and then to a fresh spot sized by the size hint.
    pub fn add_plugin(&mut self, id: &str) -> SpaceEvent {
        let ident = PluginId::parse(id);

        let saved = self.store.grid_geometry(id).or_else(|| {
            self.store.legacy_geometry(id)
                .map(|geom| self.packer.pixel_to_grid(geom))
        });
        debug!("saved geometry for {}: {:?}", id, saved);

        let mut item = GridItem::new(id)
            .with_size_hint((self.size_hint)(&ident))
            .with_anchor(ident.anchor());
        if let Some(grid) = saved {
            item = item.with_grid(grid);
        }

        let grid = self.packer.add(item);
        if !grid.is_placed() {
            warn!("no available space for desktop item {}, ignoring it", id);
            return SpaceEvent::Dropped { id: id.to_string() }
        }

        self.store.set_grid_geometry(id, grid);
        SpaceEvent::Placed {
            id: id.to_string(),
            grid,
            geometry: self.packer.grid_to_pixel(grid),
        }
    }

    /// Adds a launcher for the file at `path`.
    pub fn add_file_item(&mut self, path: &str) -> SpaceEvent {
        let id = PluginId::launcher(path, self.screen).to_string();
        self.add_plugin(&id)
    }

    /// Removes an item at the user's request, forgetting its settings.
    ///
    /// Returns `None` if the item was not on the desktop.
    pub fn remove_item(&mut self, id: &str) -> Option<SpaceEvent> {
        self.packer.remove(id)?;
        self.store.remove_settings(id);

        match PluginId::parse(id) {
            PluginId::Launcher { path, .. } => self.files.retain(|f| *f != path),
            PluginId::Plugin(_) => self.plugins.retain(|p| p != id),
        }

        Some(SpaceEvent::Removed { id: id.to_string() })
    }

    /// Takes every item off the desktop and forgets the loaded lists.
    ///
    /// Saved settings are left alone.
    pub fn cleanup(&mut self) {
        self.packer.clear();
        self.plugins.clear();
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::store::MemoryStore;
    use crate::types::GridSize;
    use crate::DeskError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn space(width: i32, height: i32) -> PluginSpace<MemoryStore> {
        let area = PixelRect::new(0, 0, width, height);
        PluginSpace::new(DeskConfig::new(), MemoryStore::new(), 0, area).unwrap()
    }

    fn grids(events: &[SpaceEvent]) -> Vec<(&str, GridRect)> {
        events.iter()
            .filter_map(|e| match e {
                SpaceEvent::Placed { id, grid, .. } | SpaceEvent::Moved { id, grid, .. } => {
                    Some((id.as_str(), *grid))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_size_follows_screen() {
        assert_eq!(space(1920, 1040).packer().cell_size(), 100);
        assert_eq!(space(3840, 2120).packer().cell_size(), 200);

        let config = DeskConfig::builder().grid_size(64).finish(no_checks).unwrap();
        let area = PixelRect::new(0, 0, 3840, 2120);
        let space = PluginSpace::new(config, MemoryStore::new(), 0, area).unwrap();
        assert_eq!(space.packer().cell_size(), 64);
    }

    #[test_log::test]
    fn test_load_places_plugins_then_files() {
        let mut space = space(500, 500);

        let events = space.load_items(&strings(&["clock"]), &strings(&["/a", "/b"]));

        assert_eq!(grids(&events), vec![
            ("clock", GridRect::new(3, 3, 2, 2)),
            ("applauncher::/a---dlink0", GridRect::new(0, 0, 1, 1)),
            ("applauncher::/b---dlink0", GridRect::new(0, 1, 1, 1)),
        ]);
        assert_eq!(events[0], SpaceEvent::Placed {
            id: "clock".into(),
            grid: GridRect::new(3, 3, 2, 2),
            geometry: PixelRect::new(300, 300, 200, 200),
        });
        assert_eq!(space.store().raw("clock"), Some("3,3,2,2"));
        assert_eq!(space.store().raw("applauncher::/b---dlink0"), Some("0,1,1,1"));

        // same lists, nothing to do
        assert!(space.load_items(&strings(&["clock"]), &strings(&["/a", "/b"])).is_empty());
    }

    #[test]
    fn test_reload_removes_unlisted_items() {
        let mut space = space(500, 500);
        space.load_items(&strings(&["clock"]), &strings(&["/a", "/b"]));

        let events = space.load_items(&strings(&["clock", "notes"]), &strings(&["/b"]));

        assert_eq!(events[0], SpaceEvent::Removed { id: "applauncher::/a---dlink0".into() });
        assert_eq!(events[1].id(), "notes");
        assert_eq!(events.len(), 2);
        assert!(space.store().is_unset("applauncher::/a---dlink0"));
        assert_eq!(space.packer().len(), 3);
    }

    #[test]
    fn test_saved_positions_are_used() {
        let mut store = MemoryStore::new();
        store.insert_raw("notes", "1,1,1,1");
        store.insert_legacy("rss", PixelRect::new(210, 290, 150, 100));

        let area = PixelRect::new(0, 0, 500, 500);
        let mut space = PluginSpace::new(DeskConfig::new(), store, 0, area).unwrap();

        let events = space.load_items(&strings(&["notes", "rss"]), &[]);

        assert_eq!(grids(&events), vec![
            ("notes", GridRect::new(1, 1, 1, 1)),
            ("rss", GridRect::new(2, 3, 2, 1)),
        ]);
        // legacy geometry is rewritten in grid form
        assert_eq!(space.store().raw("rss"), Some("2,3,2,1"));
    }

    #[test]
    fn test_custom_size_hint() {
        fn wide(_: &PluginId) -> GridSize {
            GridSize::new(3, 1)
        }

        let mut space = space(500, 500).with_size_hint(wide);
        let event = space.add_file_item("/home/user/todo.txt");

        assert_eq!(event, SpaceEvent::Placed {
            id: "applauncher::/home/user/todo.txt---dlink0".into(),
            grid: GridRect::new(0, 0, 3, 1),
            geometry: PixelRect::new(0, 0, 300, 100),
        });
    }

    #[test_log::test]
    fn test_update_geom_moves_items_in() {
        let mut space = space(500, 500);
        space.load_items(&strings(&["clock"]), &strings(&["/a"]));

        space.set_desktop_area(PixelRect::new(0, 30, 300, 300));
        let events = space.update_geom();

        assert_eq!(grids(&events), vec![
            ("clock", GridRect::new(1, 1, 2, 2)),
            ("applauncher::/a---dlink0", GridRect::new(0, 0, 1, 1)),
        ]);
        assert_eq!(space.geometry("clock"), Some(PixelRect::new(100, 130, 200, 200)));
        assert_eq!(space.store().raw("clock"), Some("1,1,2,2"));
    }

    #[test]
    fn test_no_room_drops_item() {
        let mut space = space(100, 100);

        let events = space.load_items(&strings(&["a", "b"]), &[]);

        assert_eq!(events[0].id(), "a");
        assert_eq!(events[1], SpaceEvent::Dropped { id: "b".into() });
        assert!(space.store().is_unset("b"));
        assert_eq!(space.geometry("a"), Some(PixelRect::new(0, 0, 100, 100)));
    }

    #[test]
    fn test_icon_size_steps() {
        let mut space = space(500, 500);

        space.increase_icons().unwrap();
        assert_eq!(space.packer().cell_size(), 116);
        assert_eq!(space.config().grid_size(), Some(116));

        space.decrease_icons().unwrap();
        assert_eq!(space.packer().cell_size(), 100);

        space.set_icon_size(20).unwrap();
        assert!(space.decrease_icons().unwrap().is_empty());
        assert_eq!(space.packer().cell_size(), 20);

        assert!(matches!(space.set_icon_size(0), Err(DeskError::InvalidCellSize(0))));
        assert_eq!(space.config().grid_size(), Some(20));
    }

    #[test]
    fn test_remove_and_cleanup() {
        let mut space = space(500, 500);
        space.load_items(&strings(&["clock"]), &strings(&["/a"]));

        let removed = space.remove_item("applauncher::/a---dlink0");
        assert_eq!(removed, Some(SpaceEvent::Removed { id: "applauncher::/a---dlink0".into() }));
        assert!(space.files().is_empty());
        assert!(space.store().is_unset("applauncher::/a---dlink0"));
        assert_eq!(space.remove_item("applauncher::/a---dlink0"), None);

        space.cleanup();
        assert!(space.packer().is_empty());
        assert!(space.plugins().is_empty());
        assert_eq!(space.store().raw("clock"), Some("3,3,2,2"));
    }
}

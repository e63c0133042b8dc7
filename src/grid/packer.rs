//! The grid packer.

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::types::{
    Anchor, Direction, GridPoint, GridRect, GridSize, Orientation, PixelRect,
};
use crate::{DeskError, Result};

use super::item::GridItem;
use super::search::Search;

/// The outcome of [`GridPacker::revalidate_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revalidation {
    /// Items that were out of bounds and found a new spot.
    pub moved: Vec<(String, GridRect)>,
    /// Items that were out of bounds and could not be placed anywhere.
    /// They are no longer managed by the packer.
    pub dropped: Vec<String>,
}

impl Revalidation {
    /// Returns true if nothing had to move.
    pub fn is_clean(&self) -> bool {
        self.moved.is_empty() && self.dropped.is_empty()
    }
}

/// Places rectangular items on a uniform square grid without overlap.
///
/// The packer owns a pixel canvas, a cell size, and the grid rectangles
/// of every item it manages, keyed by the item's identity. Pixel geometry
/// is always derived from the grid rectangle as
/// `pixel = grid * cell_size + canvas origin`.
///
/// # Invariants
///
/// 1. No two managed items intersect.
/// 2. Every managed item lies within `columns() x rows()`, with the
///    exception of items left out of bounds by a canvas or cell size
///    change that has not yet been followed by [`revalidate_all`][1].
///
/// Items that cannot be placed are never kept: [`place`][2] returns
/// [`GridRect::UNPLACED`] and forgets the identity.
///
/// # Example
///
/// ```rust
/// use lumidesk::grid::GridPacker;
/// use lumidesk::types::{Direction, GridPoint, GridRect, GridSize, PixelRect};
///
/// let mut packer = GridPacker::new(PixelRect::new(0, 0, 500, 500), 100).unwrap();
///
/// for id in ["a", "b", "c"] {
///     packer.place(id, GridSize::new(1, 1), GridPoint::zeroed(), Direction::Forward);
/// }
///
/// assert_eq!(packer.get("c"), Some(GridRect::new(0, 2, 1, 1)));
/// ```
///
/// [1]: GridPacker::revalidate_all
/// [2]: GridPacker::place
#[derive(Debug, Clone)]
pub struct GridPacker {
    canvas: PixelRect,
    cell_size: i32,
    orientation: Orientation,
    items: IndexMap<String, GridRect>,
}

impl GridPacker {
    /// Creates an empty packer over `canvas` with cells of `cell_size` pixels.
    pub fn new(canvas: PixelRect, cell_size: i32) -> Result<Self> {
        if cell_size <= 0 {
            return Err(DeskError::InvalidCellSize(cell_size))
        }
        Ok(Self {
            canvas,
            cell_size,
            orientation: Orientation::default(),
            items: IndexMap::new(),
        })
    }

    /// Sets the fill order, returning the packer.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// The usable pixel rectangle.
    pub fn canvas(&self) -> PixelRect {
        self.canvas
    }

    /// Replaces the usable pixel rectangle.
    ///
    /// Items are not moved; follow this with [`GridPacker::revalidate_all`]
    /// to bring them back within bounds.
    pub fn set_canvas(&mut self, canvas: PixelRect) {
        debug!("canvas changed from {:?} to {:?}", self.canvas, canvas);
        self.canvas = canvas;
    }

    /// The size of one grid cell, in pixels.
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Replaces the size of one grid cell.
    ///
    /// Fails without changing anything if `size` is not positive. As with
    /// [`GridPacker::set_canvas`], items are not moved.
    pub fn set_cell_size(&mut self, size: i32) -> Result<()> {
        if size <= 0 {
            return Err(DeskError::InvalidCellSize(size))
        }
        debug!("cell size changed from {} to {}", self.cell_size, size);
        self.cell_size = size;
        Ok(())
    }

    /// The fill order of the grid.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Changes the fill order used by later searches.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// The number of grid columns, counting a partial column at the right edge.
    pub fn columns(&self) -> i32 {
        cells_in(self.canvas.size.width, self.cell_size)
    }

    /// The number of grid rows, counting a partial row at the bottom edge.
    pub fn rows(&self) -> i32 {
        cells_in(self.canvas.size.height, self.cell_size)
    }

    /// Returns true if `grid` is non-empty and lies within the grid.
    pub fn is_valid_grid(&self, grid: GridRect) -> bool {
        grid.is_placed()
            && !grid.is_empty()
            && grid.right() <= self.columns()
            && grid.bottom() <= self.rows()
    }

    /// Converts a grid rectangle to pixels on the canvas.
    pub fn grid_to_pixel(&self, grid: GridRect) -> PixelRect {
        grid.as_pixel(self.cell_size, self.canvas.point)
    }

    /// Converts a pixel rectangle on the canvas to the grid.
    pub fn pixel_to_grid(&self, geom: PixelRect) -> GridRect {
        geom.as_grid(self.cell_size, self.canvas.point)
    }

    /// Returns true if `grid` would intersect any item other than `id`.
    pub fn collides(&self, id: &str, grid: GridRect) -> bool {
        let px = self.grid_to_pixel(grid);
        self.items.iter()
            .filter(|(other, _)| other.as_str() != id)
            .any(|(_, other)| self.grid_to_pixel(*other).intersects(&px))
    }

    /// Returns true if `id` could occupy `grid` as it stands.
    pub fn fits(&self, id: &str, grid: GridRect) -> bool {
        self.is_valid_grid(grid) && !self.collides(id, grid)
    }

    fn search<'a>(&'a self, exclude: Option<&'a str>) -> Search<'a> {
        Search {
            placed: &self.items,
            columns: self.columns(),
            rows: self.rows(),
            cell_size: self.cell_size,
            origin: self.canvas.point,
            orientation: self.orientation,
            exclude,
        }
    }

    /// Searches for an open spot without changing anything.
    ///
    /// `preferred` is the (column, row) the search starts from. See
    /// [`GridPacker::place`] for the search order and fallbacks.
    pub fn find_open_spot(
        &self,
        id: Option<&str>,
        size: GridSize,
        preferred: GridPoint,
        direction: Direction,
    ) -> Option<GridRect> {
        self.search(id).find(size, preferred, direction)
    }

    /// Finds a spot for `id` and records it there.
    ///
    /// The preferred (column, row) origin is clamped so the item fits on
    /// the grid. Searching `Forward` walks the grid in the packer's
    /// [`Orientation`], jumping past any item it collides with. Searching
    /// `Backward` from a non-zero origin walks back toward (0, 0) instead,
    /// which keeps a relocated item near its old spot.
    ///
    /// A forward search from a non-zero origin that finds nothing is
    /// retried backward once. After that, an item spanning more than one
    /// cell in both dimensions shrinks by a cell in each dimension and the
    /// search restarts forward from (0, 0), until a spot is found or one
    /// side is down to a single cell. Items that are one cell wide or tall
    /// never shrink.
    ///
    /// Returns [`GridRect::UNPLACED`] if nothing fits, in which case `id`
    /// is no longer managed by the packer.
    #[instrument(level = "debug", skip(self))]
    pub fn place(
        &mut self,
        id: &str,
        size: GridSize,
        preferred: GridPoint,
        direction: Direction,
    ) -> GridRect {
        let found = self.find_open_spot(Some(id), size, preferred, direction);
        self.settle(id, found)
    }

    /// Adds an item to the grid, honouring its saved position if possible.
    ///
    /// - A saved position that is in bounds and free is kept as-is.
    /// - A saved position that is not is searched from, forward, at the
    ///   saved size.
    /// - Without a saved position the item's size hint (or a single cell)
    ///   is placed from its [`Anchor`]: forward from the top-left, or
    ///   backward from the bottom-right.
    pub fn add(&mut self, item: GridItem) -> GridRect {
        let id = item.id();

        let found = match item.grid() {
            Some(saved) if self.fits(id, saved) => Some(saved),
            Some(saved) => {
                debug!("saved spot {} for {} is unusable", saved, id);
                self.find_open_spot(Some(id), saved.size, saved.point, Direction::Forward)
            }
            None => {
                let size = item.size_hint().unwrap_or(GridSize::new(1, 1));
                let start = match item.anchor() {
                    Anchor::TopLeft => GridPoint::zeroed(),
                    Anchor::BottomRight => GridPoint::new(self.columns(), self.rows()),
                };
                self.find_open_spot(Some(id), size, start, item.anchor().direction())
            }
        };

        self.settle(id, found)
    }

    /// Replaces the managed set with `items`.
    ///
    /// Items with a saved position go first, so that freshly placed items
    /// fill in around them. Returns the identities that could not be placed.
    pub fn load<I>(&mut self, items: I) -> Vec<String>
    where
        I: IntoIterator<Item = GridItem>,
    {
        self.items.clear();

        let (fixed, fresh): (Vec<_>, Vec<_>) = items.into_iter()
            .partition(|item| item.grid().is_some());

        fixed.into_iter().chain(fresh)
            .filter_map(|item| {
                let id = item.id().to_string();
                (!self.add(item).is_placed()).then_some(id)
            })
            .collect()
    }

    /// Brings every item back within the current bounds.
    ///
    /// Only items whose rectangle no longer fits on the grid are searched
    /// for again, backward from their old spot. Items that are still in
    /// bounds are kept where they are without a collision check.
    pub fn revalidate_all(&mut self) -> Revalidation {
        let mut report = Revalidation::default();
        let ids: Vec<String> = self.items.keys().cloned().collect();

        for id in ids {
            let Some(grid) = self.items.get(&id).copied() else {
                continue
            };
            if self.is_valid_grid(grid) {
                continue
            }

            debug!("{} is out of bounds at {}, finding a new spot", id, grid);
            let found = self.find_open_spot(Some(&id), grid.size, grid.point, Direction::Backward);
            match found {
                Some(new) => {
                    self.items.insert(id.clone(), new);
                    report.moved.push((id, new));
                }
                None => {
                    warn!("no place left for {}, dropping it", id);
                    self.items.shift_remove(&id);
                    report.dropped.push(id);
                }
            }
        }

        report
    }

    /// Stops managing `id`, returning where it was.
    pub fn remove(&mut self, id: &str) -> Option<GridRect> {
        self.items.shift_remove(id)
    }

    /// Stops managing every item.
    pub fn clear(&mut self) {
        self.items.clear()
    }

    /// Where `id` is placed, if it is managed.
    pub fn get(&self, id: &str) -> Option<GridRect> {
        self.items.get(id).copied()
    }

    /// Returns true if `id` is managed.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Iterates over every managed item in the order it was first placed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, GridRect)> + '_ {
        self.items.iter().map(|(id, grid)| (id.as_str(), *grid))
    }

    /// The number of managed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items are managed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn settle(&mut self, id: &str, found: Option<GridRect>) -> GridRect {
        match found {
            Some(grid) => {
                debug!("placed {} at {}", id, grid);
                self.items.insert(id.to_string(), grid);
                grid
            }
            None => {
                warn!("no available space for {}", id);
                self.items.shift_remove(id);
                GridRect::UNPLACED
            }
        }
    }
}

/// Whole cells needed to cover `extent` pixels.
fn cells_in(extent: i32, cell_size: i32) -> i32 {
    let extent = extent.max(0);
    (extent + cell_size - 1) / cell_size
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::Point;

    use Direction::*;

    fn packer(width: i32, height: i32) -> GridPacker {
        GridPacker::new(PixelRect::new(0, 0, width, height), 100).unwrap()
    }

    fn one() -> GridSize {
        GridSize::new(1, 1)
    }

    fn assert_invariants(packer: &GridPacker) {
        let items: Vec<_> = packer.iter().collect();
        for (i, (a_id, a)) in items.iter().enumerate() {
            assert!(a.column() >= 0 && a.row() >= 0, "{a_id} at {a}");
            assert!(a.right() <= packer.columns(), "{a_id} at {a}");
            assert!(a.bottom() <= packer.rows(), "{a_id} at {a}");

            for (b_id, b) in &items[i + 1..] {
                let (pa, pb) = (packer.grid_to_pixel(*a), packer.grid_to_pixel(*b));
                assert!(!pa.intersects(&pb), "{a_id} at {a} overlaps {b_id} at {b}");
            }
        }
    }

    #[test]
    fn test_grid_dimensions_round_up() {
        let mut packer = packer(450, 500);
        assert_eq!((packer.columns(), packer.rows()), (5, 5));

        packer.set_canvas(PixelRect::new(0, 40, 1920, 1040));
        packer.set_cell_size(64).unwrap();
        assert_eq!((packer.columns(), packer.rows()), (30, 17));

        packer.set_canvas(PixelRect::new(0, 0, -20, 100));
        assert_eq!(packer.columns(), 0);
    }

    #[test]
    fn test_invalid_cell_size_is_rejected() {
        assert!(matches!(
            GridPacker::new(PixelRect::new(0, 0, 500, 500), 0),
            Err(DeskError::InvalidCellSize(0))
        ));

        let mut packer = packer(500, 500);
        assert!(packer.set_cell_size(-10).is_err());
        assert_eq!(packer.cell_size(), 100);
    }

    #[test_log::test]
    fn test_basic_fill() {
        let mut packer = packer(500, 500);

        let placed: Vec<_> = ["a", "b", "c"].iter()
            .map(|id| packer.place(id, one(), GridPoint::zeroed(), Forward))
            .collect();

        assert_eq!(placed, vec![
            GridRect::new(0, 0, 1, 1),
            GridRect::new(0, 1, 1, 1),
            GridRect::new(0, 2, 1, 1),
        ]);
        assert_invariants(&packer);
    }

    #[test]
    fn test_left_to_right_fill() {
        let mut packer = packer(500, 500).with_orientation(Orientation::LeftToRight);

        for id in ["a", "b", "c"] {
            packer.place(id, one(), GridPoint::zeroed(), Forward);
        }

        assert_eq!(packer.get("c"), Some(GridRect::new(2, 0, 1, 1)));
    }

    #[test]
    fn test_collision_skip() {
        let mut packer = packer(500, 500);
        packer.add(GridItem::new("tall").with_grid(GridRect::new(0, 0, 1, 2)));

        let placed = packer.place("new", one(), GridPoint::zeroed(), Forward);
        assert_eq!(placed, GridRect::new(0, 2, 1, 1));
    }

    #[test]
    fn test_preferred_origin_is_clamped() {
        let mut packer = packer(500, 500);

        let placed = packer.place("big", GridSize::new(2, 2), GridPoint::new(9, 9), Forward);
        assert_eq!(placed, GridRect::new(3, 3, 2, 2));
    }

    #[test]
    fn test_reversed_retry_finds_earlier_spot() {
        let mut packer = packer(200, 200);
        packer.add(GridItem::new("a").with_grid(GridRect::new(0, 1, 1, 1)));
        packer.add(GridItem::new("b").with_grid(GridRect::new(1, 0, 1, 1)));
        packer.add(GridItem::new("c").with_grid(GridRect::new(1, 1, 1, 1)));

        // nothing is free after (1, 1), so the search turns around
        let placed = packer.place("d", one(), GridPoint::new(1, 1), Forward);
        assert_eq!(placed, GridRect::new(0, 0, 1, 1));
        assert_invariants(&packer);
    }

    #[test]
    fn test_shrink_fallback() {
        let mut packer = packer(100, 100);

        let placed = packer.place("huge", GridSize::new(3, 3), GridPoint::zeroed(), Forward);
        assert_eq!(placed, GridRect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_shrink_fallback_uneven() {
        let mut packer = packer(200, 200);

        let placed = packer.place("block", GridSize::new(3, 2), GridPoint::zeroed(), Forward);
        assert_eq!(placed, GridRect::new(0, 0, 2, 1));
    }

    #[test_log::test]
    fn test_single_row_items_never_shrink() {
        let mut packer = packer(300, 100);
        packer.add(GridItem::new("a").with_grid(GridRect::new(0, 0, 1, 1)));
        packer.add(GridItem::new("b").with_grid(GridRect::new(2, 0, 1, 1)));

        // a 1x1 would fit at (1, 0), but only items spanning
        // more than one cell both ways are ever shrunk
        let placed = packer.place("wide", GridSize::new(2, 1), GridPoint::zeroed(), Forward);
        assert_eq!(placed, GridRect::UNPLACED);
        assert!(!packer.contains("wide"));

        let placed = packer.place("tall", GridSize::new(1, 3), GridPoint::zeroed(), Forward);
        assert_eq!(placed, GridRect::UNPLACED);
        assert_eq!(packer.len(), 2);
    }

    #[test_log::test]
    fn test_zero_grid_fails() {
        let mut packer = packer(0, 500);

        for size in [one(), GridSize::new(2, 3)] {
            let placed = packer.place("a", size, GridPoint::new(1, 1), Forward);
            assert_eq!(placed, GridRect::new(-1, -1, -1, -1));
        }
        assert!(packer.is_empty());
    }

    #[test]
    fn test_failed_place_forgets_item() {
        let mut packer = packer(100, 100);
        packer.place("a", one(), GridPoint::zeroed(), Forward);
        packer.add(GridItem::new("b").with_grid(GridRect::new(0, 0, 1, 1)));

        assert!(packer.contains("a"));
        assert!(!packer.contains("b"));

        // re-placing an item never collides with itself
        let again = packer.place("a", one(), GridPoint::zeroed(), Forward);
        assert_eq!(again, GridRect::new(0, 0, 1, 1));
        assert_eq!(packer.len(), 1);
    }

    #[test]
    fn test_no_overlap_and_bounds() {
        let mut packer = packer(800, 600);

        // a fixed LCG keeps the sequence reproducible
        let mut state = 0x2545_f491u32;
        let mut next = |m: u32| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            ((state >> 16) % m) as i32
        };

        for i in 0..40 {
            let size = GridSize::new(next(3) + 1, next(3) + 1);
            let origin = GridPoint::new(next(8), next(6));
            let dir = if next(2) == 0 { Forward } else { Backward };
            packer.place(&format!("item{i}"), size, origin, dir);
            assert_invariants(&packer);
        }
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut packer = packer(700, 400);
            let mut out = Vec::new();
            for i in 0..12 {
                let size = GridSize::new(1 + i % 3, 1 + i % 2);
                let origin = GridPoint::new(i % 5, i % 3);
                out.push(packer.place(&i.to_string(), size, origin, Forward));
            }
            out
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_add_respects_saved_and_anchor() {
        let mut packer = packer(500, 500);

        let saved = packer.add(GridItem::new("clock").with_grid(GridRect::new(2, 2, 2, 1)));
        assert_eq!(saved, GridRect::new(2, 2, 2, 1));

        // saved spot is taken: search forward from it at the saved size
        let moved = packer.add(GridItem::new("rss").with_grid(GridRect::new(2, 2, 1, 1)));
        assert_eq!(moved, GridRect::new(2, 3, 1, 1));

        let plugin = packer.add(
            GridItem::new("notes")
                .with_size_hint(GridSize::new(2, 2))
                .with_anchor(Anchor::BottomRight)
        );
        assert_eq!(plugin, GridRect::new(3, 3, 2, 2));

        let launcher = packer.add(GridItem::new("applauncher::/usr/share/applications/foo.desktop"));
        assert_eq!(launcher, GridRect::new(0, 0, 1, 1));
        assert_invariants(&packer);
    }

    #[test]
    fn test_load_places_fixed_items_first() {
        let mut packer = packer(300, 300);
        packer.place("stale", one(), GridPoint::zeroed(), Forward);

        let dropped = packer.load(vec![
            GridItem::new("fresh"),
            GridItem::new("fixed").with_grid(GridRect::new(0, 0, 1, 1)),
        ]);

        assert!(dropped.is_empty());
        assert!(!packer.contains("stale"));
        assert_eq!(packer.get("fixed"), Some(GridRect::new(0, 0, 1, 1)));
        assert_eq!(packer.get("fresh"), Some(GridRect::new(0, 1, 1, 1)));
    }

    #[test]
    fn test_load_reports_unplaceable() {
        let mut packer = packer(100, 100);

        let dropped = packer.load((0..3).map(|i| GridItem::new(format!("icon{i}"))));
        assert_eq!(dropped, vec!["icon1".to_string(), "icon2".to_string()]);
        assert_eq!(packer.len(), 1);
    }

    #[test]
    fn test_revalidate_moves_nearby() {
        let mut packer = packer(500, 500);
        packer.add(GridItem::new("corner").with_grid(GridRect::new(4, 4, 1, 1)));
        packer.add(GridItem::new("top").with_grid(GridRect::new(0, 0, 1, 1)));

        packer.set_canvas(PixelRect::new(0, 0, 300, 300));
        let report = packer.revalidate_all();

        assert_eq!(report.moved, vec![("corner".to_string(), GridRect::new(2, 2, 1, 1))]);
        assert!(report.dropped.is_empty());
        assert_eq!(packer.get("top"), Some(GridRect::new(0, 0, 1, 1)));
        assert_invariants(&packer);
    }

    #[test_log::test]
    fn test_revalidate_drop() {
        let mut packer = packer(500, 500);
        packer.add(GridItem::new("corner").with_grid(GridRect::new(4, 4, 1, 1)));
        for col in 0..3 {
            for row in 0..3 {
                packer.add(GridItem::new(format!("{col}x{row}")).with_grid(GridRect::new(col, row, 1, 1)));
            }
        }
        assert_eq!(packer.len(), 10);

        packer.set_canvas(PixelRect::new(0, 0, 300, 300));
        let report = packer.revalidate_all();

        assert_eq!(report.dropped, vec!["corner".to_string()]);
        assert!(!packer.contains("corner"));
        assert_eq!(packer.len(), 9);
        assert_invariants(&packer);
    }

    #[test]
    fn test_cell_size_change_revalidates() {
        let mut packer = packer(500, 500);
        packer.add(GridItem::new("wide").with_grid(GridRect::new(3, 0, 2, 1)));
        packer.add(GridItem::new("small").with_grid(GridRect::new(0, 0, 1, 1)));

        // 500px at 200px per cell is a 3x3 grid
        packer.set_cell_size(200).unwrap();
        let report = packer.revalidate_all();

        assert_eq!(report.moved, vec![("wide".to_string(), GridRect::new(1, 0, 2, 1))]);
        assert!(report.dropped.is_empty());
        assert_invariants(&packer);
    }

    #[test]
    fn test_in_bounds_items_are_trusted() {
        let mut packer = packer(500, 500);
        packer.add(GridItem::new("a").with_grid(GridRect::new(1, 1, 1, 1)));
        packer.add(GridItem::new("b").with_grid(GridRect::new(2, 2, 1, 1)));

        assert!(packer.revalidate_all().is_clean());
    }

    #[test]
    fn test_canvas_origin_moves_pixels_not_grid() {
        let mut packer = packer(500, 500);
        let grid = packer.place("a", one(), GridPoint::new(1, 0), Forward);

        packer.set_canvas(PixelRect::new(0, 40, 500, 500));
        assert!(packer.revalidate_all().is_clean());
        assert_eq!(packer.get("a"), Some(grid));
        assert_eq!(packer.grid_to_pixel(grid).point, Point::new(100, 40));
    }

    #[test]
    fn test_remove() {
        let mut packer = packer(500, 500);
        packer.place("a", one(), GridPoint::zeroed(), Forward);

        assert_eq!(packer.remove("a"), Some(GridRect::new(0, 0, 1, 1)));
        assert_eq!(packer.remove("a"), None);
        assert!(packer.is_empty());
    }
}

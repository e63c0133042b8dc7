//! The open-spot search behind [`GridPacker::place`][1].
//!
//! A search walks candidate origins in a fixed order and tests each one
//! against every placed item. On a collision it does not step one cell at
//! a time: the inner index jumps straight past the item it hit (or, when
//! scanning backward, to just before it), so occupied rectangles are
//! skipped whole.
//!
//! [1]: super::GridPacker::place

use indexmap::IndexMap;
use tracing::{instrument, trace};

use crate::types::{
    Direction, GridPoint, GridRect, GridSize, Orientation, Pixel, Point,
};

/// A single search over the grid, borrowing the packer's state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Search<'a> {
    pub(crate) placed: &'a IndexMap<String, GridRect>,
    pub(crate) columns: i32,
    pub(crate) rows: i32,
    pub(crate) cell_size: i32,
    pub(crate) origin: Point<i32, Pixel>,
    pub(crate) orientation: Orientation,
    /// The identity of the item being placed; it never collides with itself.
    pub(crate) exclude: Option<&'a str>,
}

impl Search<'_> {
    /// Finds an open spot for an item of `size`, starting at `start`.
    ///
    /// If the scan in `direction` fails from a non-zero origin, the scan is
    /// retried once in reverse from the same origin. If that also fails and
    /// the item spans more than one cell in both dimensions, the size shrinks
    /// by one cell in each dimension and the whole search restarts forward
    /// from the top-left corner.
    #[instrument(level = "trace", skip(self), fields(exclude = ?self.exclude))]
    pub(crate) fn find(
        &self,
        size: GridSize,
        start: GridPoint,
        direction: Direction
    ) -> Option<GridRect> {
        if size.is_empty() {
            return None
        }
        let GridSize { width, height, .. } = size;

        let mut row = start.y.clamp(0, self.rows.max(0));
        let mut col = start.x.clamp(0, self.columns.max(0));
        if row.saturating_add(height) > self.rows {
            row = self.rows - height;
        }
        if col.saturating_add(width) > self.columns {
            col = self.columns - width;
        }

        let fits = width <= self.columns && height <= self.rows;
        let found = match direction {
            _ if !fits => None,
            Direction::Backward if row > 0 || col > 0 => self.scan_backward(size, row, col),
            _ => self.scan_forward(size, row, col),
        };
        if found.is_some() {
            return found
        }

        if (row != 0 || col != 0) && direction == Direction::Forward {
            trace!("no spot after ({}, {}), searching backward", col, row);
            return self.find(size, GridPoint::new(col, row), Direction::Backward)
        }
        if width > 1 && height > 1 {
            // sizes that are still larger than the grid can never fit, skip past them
            let step = (width - self.columns).max(height - self.rows).max(1);
            if width - step < 1 || height - step < 1 {
                return None
            }
            let smaller = GridSize::new(width - step, height - step);
            trace!("no spot for {}x{}, retrying at {}x{}", width, height, smaller.width, smaller.height);
            return self.find(smaller, GridPoint::zeroed(), Direction::Forward)
        }
        None
    }

    /// Maps an (outer, inner) scan index pair onto a grid rectangle.
    fn candidate(&self, size: GridSize, outer: i32, inner: i32) -> GridRect {
        match self.orientation {
            Orientation::TopToBottom => GridRect::new(outer, inner, size.width, size.height),
            Orientation::LeftToRight => GridRect::new(inner, outer, size.width, size.height),
        }
    }

    /// The largest valid (outer, inner) indices for an item of `size`.
    fn limits(&self, size: GridSize) -> (i32, i32) {
        let max_col = self.columns - size.width;
        let max_row = self.rows - size.height;
        match self.orientation {
            Orientation::TopToBottom => (max_col, max_row),
            Orientation::LeftToRight => (max_row, max_col),
        }
    }

    fn split(&self, row: i32, col: i32) -> (i32, i32) {
        match self.orientation {
            Orientation::TopToBottom => (col, row),
            Orientation::LeftToRight => (row, col),
        }
    }

    fn scan_forward(&self, size: GridSize, row: i32, col: i32) -> Option<GridRect> {
        let (outer_max, inner_max) = self.limits(size);
        let (mut outer, mut inner) = self.split(row, col);

        while outer <= outer_max {
            while inner <= inner_max {
                let candidate = self.candidate(size, outer, inner);
                match self.collision(&candidate) {
                    None => return Some(candidate),
                    // resume just past the far edge of whatever we hit
                    Some(hit) => inner = match self.orientation {
                        Orientation::TopToBottom => hit.bottom(),
                        Orientation::LeftToRight => hit.right(),
                    },
                }
            }
            outer += 1;
            inner = 0;
        }
        None
    }

    fn scan_backward(&self, size: GridSize, row: i32, col: i32) -> Option<GridRect> {
        let (_, inner_max) = self.limits(size);
        let (mut outer, mut inner) = self.split(row, col);

        while outer >= 0 {
            while inner >= 0 {
                let candidate = self.candidate(size, outer, inner);
                match self.collision(&candidate) {
                    None => return Some(candidate),
                    // resume so that our far edge meets the near edge of the hit
                    Some(hit) => inner = match self.orientation {
                        Orientation::TopToBottom => hit.top() - size.height,
                        Orientation::LeftToRight => hit.left() - size.width,
                    },
                }
            }
            outer -= 1;
            inner = inner_max;
        }
        None
    }

    /// Returns the first placed item whose pixel geometry intersects `candidate`.
    fn collision(&self, candidate: &GridRect) -> Option<GridRect> {
        let px = candidate.as_pixel(self.cell_size, self.origin);

        self.placed.iter()
            .filter(|(id, _)| Some(id.as_str()) != self.exclude)
            .map(|(_, grid)| *grid)
            .find(|grid| grid.as_pixel(self.cell_size, self.origin).intersects(&px))
    }
}

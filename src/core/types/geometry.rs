//! Primitives for working with geometries.
//!
//! This module contains the core types [`Scale`], [`Point`], [`Size`], and [`Rectangle`],
//! which are the primitives the grid packer and the desktop plugin space use to describe
//! item positions, canvases and screen areas.
//!
//! All types in this module are generic over a [`Scalar`], the type of a single
//! coordinate. Desktop geometry is whole cells and whole pixels, so this is only
//! implemented for `i32`.
//!
//! ## Grid and Pixel Coordinate Spaces
//!
//! The `Point`, `Size`, and `Rectangle` types are additionally generic over a marker type that implements
//! [`GeometryKind`], which marks the type as acting in a certain coordinate space.
//! See the [`marker`] module documentation for additional details.
//!
//! Converting a grid rectangle to pixels is an upscale by the cell size followed by
//! an offset to the canvas origin:
//!
//! ```rust
//! use lumidesk::types::{GridRect, PixelRect, Point};
//!
//! let grid = GridRect::new(1, 2, 1, 1);
//! let px = grid.as_pixel(100, Point::new(0, 40));
//!
//! assert_eq!(px, PixelRect::new(100, 240, 100, 100));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Cardinal;
use crate::DeskError;

pub mod marker {
    //! Marker types for marking Size, Point and Rectangle kind, Grid or Pixel.
    //!
    //! This module contains the [`GeometryKind`] sealed trait,
    //! as well as its two implementors, [`Grid`] and [`Pixel`].
    //! These are used to mark whether a `Point` or `Rectangle` is expressed
    //! in grid cells (the persisted, logical unit of the desktop) or in pixels
    //! (always derived, never stored as ground truth).
    //!
    //! Grid and Pixel spaces are linked by the cell size and the canvas origin:
    //! `pixel = grid * cell_size + origin`. See [`GridRect::as_pixel`][1] and
    //! [`PixelRect::as_grid`][2].
    //!
    //! [1]: super::GridRect::as_pixel
    //! [2]: super::PixelRect::as_grid

    mod private {
        pub trait Sealed {}
    }

    use core::ops::{Add, Sub};

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    /// A sealed trait for marking types as Scalars, that can be used in Points and Rectangles.
    pub trait Scalar:
        Sized
        + Copy
        + PartialEq
        + PartialOrd
        + Add<Self, Output = Self>
        + Sub<Self, Output = Self>
        + Default
        + private::Sealed
    {
        /// The zero point of the Scalar. Usually, this is the additive identity of the Scalar.
        const ZERO: Self;

        /// Scale up this Scalar by a scale.
        fn upscale(self, other: Self) -> Self;

        #[inline]
        /// Check if the Scalar is greater than its zero.
        fn positive(self) -> bool {
            self > Self::ZERO
        }
    }

    impl private::Sealed for i32 {}

    impl Scalar for i32 {
        const ZERO: Self = 0;

        #[inline]
        fn upscale(self, other: Self) -> Self {
            self.saturating_mul(other)
        }
    }

    /// A sealed trait defining marker types `Grid` and `Pixel`.
    pub trait GeometryKind: Copy + PartialEq + private::Sealed {}

    macro_rules! __impl_geometrykind {
        {$(#[$outer:meta])? $targ:ident} => {
            $(
                #[$outer]
            )?
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $targ;

            impl private::Sealed for $targ {}
            impl GeometryKind for $targ {}
        };
    }

    __impl_geometrykind!{
        /// A type for marking geometrical types as measured in grid cells.
        Grid
    }
    __impl_geometrykind!{
        /// A type for marking geometrical types as measured in pixels.
        Pixel
    }
}

pub use marker::{GeometryKind, Grid, Pixel, Scalar};

/// A rectangle in grid cells: (column, row, width-in-cells, height-in-cells).
pub type GridRect = Rectangle<i32, Grid>;

/// A rectangle in pixels.
pub type PixelRect = Rectangle<i32, Pixel>;

/// A size in grid cells.
pub type GridSize = Size<i32, Grid>;

/// A (column, row) position on the grid.
pub type GridPoint = Point<i32, Grid>;

/// A two-dimensional Scale that can be used to scale [`Point`]s, [`Size`]s,
/// and [`Rectangle`]s.
///
/// A `Scale` tracks its scale factors independently in each dimension, to
/// allow for non-uniform scaling operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scale<N: Scalar> {
    /// The scale on the X-axis.
    pub x: N,
    /// The scale on the Y-axis.
    pub y: N,
}

impl<N: Scalar> Scale<N> {
    /// Returns a uniform Scale, where the `x` and `y` scale factors are equal.
    pub const fn uniform(factor: N) -> Scale<N> {
        Scale {
            x: factor, y: factor
        }
    }
}

/// A type for representing a point on a canvas or grid.
///
/// # Note
///
/// The (0, 0) reference is by default taken from the top left
/// corner of the 2D plane.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point<N: Scalar, Kind: GeometryKind> {
    /// The `Point`'s X-coordinate.
    pub x: N,
    /// The `Point`'s Y-coordinate.
    pub y: N,
    #[cfg_attr(feature = "serde", serde(skip))]
    _kind: PhantomData<Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Point<N, Kind> {
    /// Creates a new Point.
    pub const fn new(x: N, y: N) -> Point<N, Kind> {
        Point { x, y, _kind: PhantomData }
    }

    /// Creates a new Point where both coordinates are zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lumidesk::types::{Point, Pixel};
    ///
    /// let point1 = Point::<i32, Pixel>::zeroed();
    /// let point2 = Point::<i32, Pixel>::new(0, 0);
    ///
    /// assert_eq!(point1, point2);
    /// ```
    pub const fn zeroed() -> Point<N, Kind> {
        Point { x: N::ZERO, y: N::ZERO, _kind: PhantomData }
    }

    /// Upscales the Point by a given scale factor on the X and Y axes,
    /// with respect to the origin (0,0) at the top left of the coordinate space.
    pub fn upscale(self, scale: Scale<N>) -> Self {
        Point::new(self.x.upscale(scale.x), self.y.upscale(scale.y))
    }
}

/// A type for representing a 2D rectangular space, without
/// respect to its position on the coordinate space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<N: Scalar, Kind: GeometryKind> {
    /// The width of the Size.
    pub width: N,
    /// The height of the Size.
    pub height: N,

    #[cfg_attr(feature = "serde", serde(skip))]
    _kind: PhantomData<Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Size<N, Kind> {
    /// Creates a new Size.
    pub const fn new(width: N, height: N) -> Self {
        Self {
            width,
            height,
            _kind: PhantomData
        }
    }

    /// Returns true if the area of this size is zero or negative.
    pub fn is_empty(&self) -> bool {
        !self.width.positive() || !self.height.positive()
    }

    /// Upscales the Size by a given scale factor on the X and Y axes.
    pub fn upscale(self, scale: Scale<N>) -> Self {
        Size::new(self.width.upscale(scale.x), self.height.upscale(scale.y))
    }
}

/// A type for representing a 2D rectangular space, anchored to a
/// Point on the coordinate space.
///
/// # Note on Gravity
///
/// Rectangles follow the default of taking their gravity from the top-left
/// corner, that is, (0, 0) is considered the top left corner
/// of the canvas, and any increase is an offset to the right
/// or downwards.
#[repr(C)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle<N: Scalar, Kind: GeometryKind> {
    /// The point that the Rectangle is anchored to.
    pub point: Point<N, Kind>,
    /// The size of the Rectangle.
    pub size: Size<N, Kind>,
}

impl<N: Scalar, Kind: GeometryKind> Rectangle<N, Kind> {
    /// Constructs a new `Rectangle`.
    pub const fn new(x: N, y: N, w: N, h: N) -> Self {
        Rectangle {
            point: Point::new(x, y),
            size: Size::new(w, h)
        }
    }

    /// Returns true if the Rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// The leftmost coordinate covered by the Rectangle.
    #[inline]
    pub fn left(&self) -> N {
        self.point.x
    }

    /// The coordinate just past the right edge of the Rectangle.
    #[inline]
    pub fn right(&self) -> N {
        self.point.x + self.size.width
    }

    /// The topmost coordinate covered by the Rectangle.
    #[inline]
    pub fn top(&self) -> N {
        self.point.y
    }

    /// The coordinate just past the bottom edge of the Rectangle.
    #[inline]
    pub fn bottom(&self) -> N {
        self.point.y + self.size.height
    }

    /// Check whether this Rectangle encloses another Rectangle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lumidesk::types::PixelRect;
    ///
    /// let original = PixelRect::new(0, 0, 200, 100);
    ///
    /// let new = PixelRect::new(2, 2, 75, 50);
    ///
    /// assert!(original.contains(&new));
    /// ```
    pub fn contains(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Check whether this Rectangle shares any area with `other`.
    ///
    /// Rectangles that only touch along an edge do not intersect,
    /// and an empty Rectangle never intersects anything.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lumidesk::types::GridRect;
    ///
    /// let a = GridRect::new(0, 0, 1, 2);
    ///
    /// assert!(a.intersects(&GridRect::new(0, 1, 1, 1)));
    /// assert!(!a.intersects(&GridRect::new(0, 2, 1, 1)));
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false
        }

        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Trim off an area from a `Rectangle` from the side corresponding
    /// to `dir` (`Cardinal::Up` trims the top, `Cardinal::Down`
    /// trims the bottom).
    ///
    /// This returns a new Rectangle.
    #[must_use]
    pub fn trim(&self, trim: N, dir: Cardinal) -> Self {
        use Cardinal::*;
        let Rectangle { point, size } = *self;
        match dir {
            Up => Rectangle::new(point.x, point.y + trim, size.width, size.height - trim),
            Down => Rectangle::new(point.x, point.y, size.width, size.height - trim),
            Left => Rectangle::new(point.x + trim, point.y, size.width - trim, size.height),
            Right => Rectangle::new(point.x, point.y, size.width - trim, size.height),
        }
    }

    /// Returns a Rectangle upscaled by a given Scale.
    /// Also scales the Rectangle's position with respect to the origin (0, 0).
    pub fn upscale(self, scale: Scale<N>) -> Self {
        Self {
            point: self.point.upscale(scale),
            size: self.size.upscale(scale),
        }
    }
}

impl GridRect {
    /// The out-of-band rectangle signalling that no placement was found.
    pub const UNPLACED: GridRect = GridRect::new(-1, -1, -1, -1);

    /// Returns false for rectangles with a negative column or row,
    /// which includes [`GridRect::UNPLACED`].
    pub fn is_placed(&self) -> bool {
        self.point.x >= 0 && self.point.y >= 0
    }

    /// The column the rectangle is anchored at.
    #[inline]
    pub fn column(&self) -> i32 {
        self.point.x
    }

    /// The row the rectangle is anchored at.
    #[inline]
    pub fn row(&self) -> i32 {
        self.point.y
    }

    /// Converts the grid rectangle to pixels, given the size of one cell
    /// and the origin of the canvas.
    pub fn as_pixel(&self, cell_size: i32, origin: Point<i32, Pixel>) -> PixelRect {
        let Rectangle { point, size } = self.upscale(Scale::uniform(cell_size));

        Rectangle::new(
            point.x + origin.x,
            point.y + origin.y,
            size.width,
            size.height,
        )
    }
}

impl PixelRect {
    /// Converts a pixel rectangle onto the grid.
    ///
    /// The origin snaps to the nearest cell and the size rounds up to whole
    /// cells, never below one cell in either dimension.
    pub fn as_grid(&self, cell_size: i32, origin: Point<i32, Pixel>) -> GridRect {
        let snap = |v: i32| (v + cell_size / 2).div_euclid(cell_size);
        let cells = |v: i32| ((v + cell_size - 1) / cell_size).max(1);

        Rectangle::new(
            snap(self.point.x - origin.x),
            snap(self.point.y - origin.y),
            cells(self.size.width),
            cells(self.size.height),
        )
    }
}

/// Grid rectangles are persisted as `column,row,width,height`.
impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f, "{},{},{},{}",
            self.point.x, self.point.y, self.size.width, self.size.height
        )
    }
}

impl FromStr for GridRect {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(',')
            .map(|f| f.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DeskError::Parse(format!("grid rectangle {s:?}: {e}")))?;

        let &[x, y, w, h] = fields.as_slice() else {
            return Err(DeskError::Parse(
                format!("grid rectangle {s:?}: expected 4 fields, got {}", fields.len())
            ))
        };

        Ok(GridRect::new(x, y, w, h))
    }
}

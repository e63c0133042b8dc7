//! Basic core types used throughout this crate at a high level.

pub mod geometry;

pub use geometry::*;

use strum::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Specifies a direction.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// A cardinal direction.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    Up,
    Down,
    Left,
    Right,
}

/// The order in which the grid is filled.
///
/// With `TopToBottom`, each column is filled from the top down before
/// moving on to the next column (column-major). `LeftToRight` swaps the
/// nesting and fills each row before moving down to the next one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(test, derive(EnumIter))]
#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[strum(serialize_all = "kebab-case")]
pub enum Orientation {
    /// Scan columns left to right, rows top to bottom within each column.
    #[default]
    TopToBottom,
    /// Scan rows top to bottom, columns left to right within each row.
    LeftToRight,
}

/// The corner a freshly added item without a saved position grows from.
///
/// Desktop launchers fill in from the top-left; larger plugins are
/// dropped in from the bottom-right so the two rarely compete for space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[strum(serialize_all = "kebab-case")]
pub enum Anchor {
    /// Search forward from the top-left cell.
    #[default]
    TopLeft,
    /// Search backward from the bottom-right cell.
    BottomRight,
}

impl Anchor {
    /// The scan direction used when placing an item from this anchor.
    pub fn direction(&self) -> Direction {
        match self {
            Anchor::TopLeft => Direction::Forward,
            Anchor::BottomRight => Direction::Backward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_strings() {
        for orientation in Orientation::iter() {
            let parsed = orientation.as_ref().parse::<Orientation>().unwrap();
            assert_eq!(parsed, orientation);
        }

        assert_eq!(Orientation::TopToBottom.to_string(), "top-to-bottom");
        assert_eq!("left-to-right".parse::<Orientation>().unwrap(), Orientation::LeftToRight);
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_anchor_direction() {
        assert_eq!("bottom-right".parse::<Anchor>().unwrap(), Anchor::BottomRight);
        assert_eq!(Anchor::BottomRight.direction(), Direction::Backward);
        assert_eq!(Anchor::default().direction(), Direction::Forward);
    }
}

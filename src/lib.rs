//! # Lumidesk - desktop icons on a grid
//!
//! Lumidesk manages the desktop area of a lightweight desktop shell: the part of each
//! screen that is left over once panels have taken their share, and on which desktop
//! plugins (clocks, notes, feeds and the like) and file launchers sit. It does not draw
//! anything itself. Instead it decides where every item goes, keeps those decisions
//! valid as the screen or icon size changes, and reports every change back so that
//! whatever does the drawing can follow along.
//!
//! ## Design
//!
//! The desktop is divided into square cells, and every item occupies a whole number of
//! them. Positions are always kept in grid units; pixel geometry is derived from them on
//! demand, so a change of icon size or a panel moving never loses track of where an item
//! belongs.
//!
//! The crate is layered as follows:
//!
//! - [`grid`] holds the [`GridPacker`], which places rectangles on the grid without
//!   overlap and moves them back in bounds when the grid shrinks.
//! - [`desktop`] holds the [`PluginSpace`], which drives a packer for one screen: it
//!   works out which items should exist, where their saved positions are, and which
//!   events the drawing side has to apply.
//! - [`config`] holds [`DeskConfig`] and the [`PlacementStore`][1] trait, through which
//!   positions are saved across sessions.
//!
//! ### Failing to find space
//!
//! Running out of room on the desktop is expected, not exceptional: too many icons on a
//! small monitor simply means some of them do not get shown. Placement failures are
//! therefore never reported as a [`DeskError`]; the packer returns
//! [`GridRect::UNPLACED`][2] and the plugin space emits a
//! [`SpaceEvent::Dropped`][3] instead.
//!
//! ### Feature Flags
//!
//! - `serde` (default): `Serialize` and `Deserialize` for the geometry types and
//!   [`DeskConfig`].
//!
//! [1]: crate::config::store::PlacementStore
//! [2]: crate::types::GridRect::UNPLACED
//! [3]: crate::desktop::SpaceEvent::Dropped

#![warn(
    missing_debug_implementations,
    missing_docs
)]

pub mod config;
pub mod core;
pub mod desktop;
pub mod grid;

pub use crate::core::types;
#[doc(inline)]
pub use crate::config::DeskConfig;
#[doc(inline)]
pub use crate::desktop::{PluginSpace, SpaceEvent};
#[doc(inline)]
pub use crate::grid::{GridItem, GridPacker};

use thiserror::Error;

/// Everything that could go wrong while managing the desktop.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DeskError {
    /// A grid cell size that is not positive.
    #[error("Invalid cell size {0}: must be positive")]
    InvalidCellSize(i32),

    /// Unable to parse a stored value.
    #[error("Could not parse {0}")]
    Parse(String),

    /// One or more configuration invariants was not upheld.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for `Result<T, DeskError>`.
pub type Result<T> = std::result::Result<T, DeskError>;

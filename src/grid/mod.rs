//! Placement of desktop items on a uniform square grid.
//!
//! The desktop is divided into square cells of a configurable pixel size,
//! and every item occupies a whole number of cells. The [`GridPacker`]
//! keeps track of which cells are taken and searches for open spots when
//! an item is added, or when the grid shrinks out from under an item that
//! was already placed.
//!
//! All positions handled here are in grid units; use
//! [`GridPacker::grid_to_pixel`] to get the on-screen geometry.

pub mod item;
pub mod packer;
pub(crate) mod search;

#[doc(inline)]
pub use item::GridItem;
#[doc(inline)]
pub use packer::{GridPacker, Revalidation};

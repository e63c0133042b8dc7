//! This module contains the core types used within lumidesk.
//! It contains the geometry primitives and the small enums that
//! describe how items are laid out on the desktop grid.

/// Basic types used throughout lumidesk.
pub mod types;

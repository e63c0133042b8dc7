//! Computing the part of a screen left over for desktop items.

use strum::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Cardinal, PixelRect};

/// The screen edge a panel is docked to.
#[allow(missing_docs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum PanelEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<PanelEdge> for Cardinal {
    fn from(edge: PanelEdge) -> Cardinal {
        match edge {
            PanelEdge::Top => Cardinal::Up,
            PanelEdge::Bottom => Cardinal::Down,
            PanelEdge::Left => Cardinal::Left,
            PanelEdge::Right => Cardinal::Right,
        }
    }
}

/// A strip of the screen reserved by a panel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelStrip {
    /// The edge the panel is docked to.
    pub edge: PanelEdge,
    /// How far the panel reaches into the screen, in pixels.
    pub thickness: i32,
}

impl PanelStrip {
    /// Creates a new `PanelStrip`.
    pub fn new(edge: PanelEdge, thickness: i32) -> Self {
        Self { edge, thickness }
    }
}

/// Returns the area of `screen` not covered by any of `panels`.
///
/// The result never has a negative size; panels covering the whole
/// screen leave an empty rectangle.
pub fn work_area(screen: PixelRect, panels: &[PanelStrip]) -> PixelRect {
    let mut area = panels.iter().fold(screen, |area, panel| {
        area.trim(panel.thickness.max(0), panel.edge.into())
    });
    area.size.width = area.size.width.max(0);
    area.size.height = area.size.height.max(0);
    area
}

//! Types for configuring a `PluginSpace`.
//!
//! This module contains [`DeskConfig`], the configuration object read by
//! a [`PluginSpace`][1] when it is created, and [`DeskConfigBuilder`] to
//! construct one.
//!
//! [1]: crate::desktop::PluginSpace

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Orientation;
use crate::{Result, DeskError::*};

/// The cell size used when none is configured.
pub const DEFAULT_GRID_SIZE: i32 = 100;

/// The cell size used when none is configured and the screen is very tall.
pub const LARGE_GRID_SIZE: i32 = 200;

/// Available heights above this many pixels select [`LARGE_GRID_SIZE`].
pub const LARGE_SCREEN_HEIGHT: i32 = 2000;

/// The central configuration object for the desktop grid.
///
/// # Construction
///
/// To build a DeskConfig, use the [`DeskConfigBuilder`] type.
///
/// # Example
///
/// ```rust
/// use lumidesk::config::{DeskConfig, no_checks};
///
/// // create a default config that upholds all invariants
/// let config = DeskConfig::new();
///
/// config.validate(no_checks).expect("invalid config");
/// assert_eq!(config.resolve_grid_size(1080), 100);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    /// The explicitly configured cell size, in pixels.
    pub(crate) grid_size: Option<i32>,
    /// The fill order of the grid.
    pub(crate) orientation: Orientation,
    /// How many pixels each icon size increase or decrease steps by.
    pub(crate) icon_step: i32,
    /// Icon sizes below this cannot be decreased any further.
    pub(crate) min_icon_size: i32,
}

/// A const function that simply returns Ok. Pass this into validate if you have no
/// user-defined checks to run.
pub const fn no_checks(_: &DeskConfig) -> Result<()> {
    Ok(())
}

impl DeskConfig {
    /// Returns the default construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a [`DeskConfigBuilder`] to build your Config with the
    /// 'builder' idiom.
    pub fn builder() -> DeskConfigBuilder {
        DeskConfigBuilder::new()
    }

    /// Checks the configuration to verify that all invariants are upheld.
    ///
    /// If you have no code you want to insert, pass in [`no_checks`] as a
    /// function pointer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lumidesk::config::DeskConfig;
    /// use lumidesk::DeskError::*;
    ///
    /// let config = DeskConfig::builder()
    ///     .grid_size(64)
    ///     .finish(|cfg: &DeskConfig| {
    ///         if cfg.grid_size() == Some(64) {
    ///             Ok(())
    ///         } else {
    ///             Err(InvalidConfig("expected a 64px grid".into()))
    ///         }
    ///     })
    ///     .expect("config was invalid!");
    ///
    /// assert_eq!(config.resolve_grid_size(4000), 64);
    /// ```
    pub fn validate<F>(&self, checks: F) -> Result<()>
    where
        F: FnOnce(&DeskConfig) -> Result<()>,
    {
        if let Some(size) = self.grid_size {
            if size <= 0 {
                return Err(InvalidCellSize(size));
            }
        }
        if self.icon_step <= 0 {
            return Err(InvalidConfig(format!("icon step must be positive, got {}", self.icon_step)));
        }
        if self.min_icon_size <= self.icon_step {
            return Err(InvalidConfig(format!(
                "minimum icon size {} must exceed the icon step {}",
                self.min_icon_size, self.icon_step
            )));
        }
        checks(self)?;
        Ok(())
    }

    /// The explicitly configured cell size, if any.
    pub fn grid_size(&self) -> Option<i32> {
        self.grid_size
    }

    /// The fill order of the grid.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The step applied by icon size increases and decreases.
    pub fn icon_step(&self) -> i32 {
        self.icon_step
    }

    /// The smallest icon size a decrease may start from.
    pub fn min_icon_size(&self) -> i32 {
        self.min_icon_size
    }

    /// Returns the cell size to use on a screen whose available area is
    /// `available_height` pixels tall.
    ///
    /// An explicit grid size always wins; otherwise very tall screens get
    /// a larger default.
    pub fn resolve_grid_size(&self, available_height: i32) -> i32 {
        match self.grid_size {
            Some(size) => size,
            None if available_height > LARGE_SCREEN_HEIGHT => LARGE_GRID_SIZE,
            None => DEFAULT_GRID_SIZE,
        }
    }

    /// Stores a new explicit cell size.
    pub(crate) fn set_grid_size(&mut self, size: i32) {
        self.grid_size = Some(size);
    }
}

impl Default for DeskConfig {
    fn default() -> DeskConfig {
        DeskConfig {
            grid_size: None,
            orientation: Orientation::TopToBottom,
            icon_step: 16,
            min_icon_size: 32,
        }
    }
}

/// A helper type to construct a [`DeskConfig`].
#[derive(Debug, Default)]
pub struct DeskConfigBuilder {
    inner: DeskConfig,
}

impl DeskConfigBuilder {
    /// Creates a new `DeskConfigBuilder`.
    pub fn new() -> Self {
        Self {
            inner: DeskConfig::default(),
        }
    }

    /// Sets an explicit cell size, in pixels.
    pub fn grid_size(mut self, size: i32) -> Self {
        self.inner.grid_size = Some(size);
        self
    }

    /// Sets the fill order of the grid.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.inner.orientation = orientation;
        self
    }

    /// Sets the step applied by icon size increases and decreases.
    pub fn icon_step(mut self, step: i32) -> Self {
        self.inner.icon_step = step;
        self
    }

    /// Sets the smallest icon size a decrease may start from.
    pub fn min_icon_size(mut self, size: i32) -> Self {
        self.inner.min_icon_size = size;
        self
    }

    /// Finishes Config construction, validates it and returns
    /// a completed config if validation is successful.
    ///
    /// You can supply an additional `check` to run
    /// additional code to validate your config.
    pub fn finish<F>(self, check: F) -> Result<DeskConfig>
    where
        F: FnOnce(&DeskConfig) -> Result<()>,
    {
        let config = self.inner;
        config.validate(check)?;
        Ok(config)
    }
}

//! Identities of items on the desktop.
//!
//! Every item in a [`PluginSpace`][1] is keyed by a string identity. Items
//! created for files on the desktop use a structured identity of the form
//!
//! ```text
//! applauncher::<path>---dlink<screen>
//! ```
//!
//! while any other identity names a desktop plugin.
//!
//! [1]: super::PluginSpace

use std::fmt;

use crate::types::{Anchor, GridSize};

const LAUNCHER_PREFIX: &str = "applauncher::";
const SCREEN_MARKER: &str = "---dlink";

/// A parsed desktop item identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluginId {
    /// A launcher for a file on the desktop.
    Launcher {
        /// The path of the launched file.
        path: String,
        /// The screen the launcher lives on, if recorded.
        screen: Option<usize>,
    },
    /// Any other desktop plugin.
    Plugin(String),
}

impl PluginId {
    /// Parses an identity string. This never fails: anything that is
    /// not a launcher identity is a plugin.
    pub fn parse(id: &str) -> PluginId {
        let Some(rest) = id.strip_prefix(LAUNCHER_PREFIX) else {
            return PluginId::Plugin(id.to_string())
        };

        match rest.split_once(SCREEN_MARKER) {
            Some((path, screen)) => PluginId::Launcher {
                path: path.to_string(),
                screen: screen.parse().ok(),
            },
            None => PluginId::Launcher {
                path: rest.to_string(),
                screen: None,
            },
        }
    }

    /// Creates the identity of a launcher for `path` on `screen`.
    pub fn launcher<S: Into<String>>(path: S, screen: usize) -> PluginId {
        PluginId::Launcher {
            path: path.into(),
            screen: Some(screen),
        }
    }

    /// Returns true if this identifies a file launcher.
    pub fn is_launcher(&self) -> bool {
        matches!(self, PluginId::Launcher { .. })
    }

    /// The file path of a launcher.
    pub fn path(&self) -> Option<&str> {
        match self {
            PluginId::Launcher { path, .. } => Some(path),
            PluginId::Plugin(_) => None,
        }
    }

    /// The corner a new item with this identity is placed from.
    pub fn anchor(&self) -> Anchor {
        match self {
            PluginId::Launcher { .. } => Anchor::TopLeft,
            PluginId::Plugin(_) => Anchor::BottomRight,
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PluginId::Launcher { path, screen: Some(screen) } => {
                write!(f, "{LAUNCHER_PREFIX}{path}{SCREEN_MARKER}{screen}")
            }
            PluginId::Launcher { path, screen: None } => write!(f, "{LAUNCHER_PREFIX}{path}"),
            PluginId::Plugin(name) => f.write_str(name),
        }
    }
}

/// Returns the default size of an item that has no saved position.
pub type SizeHintFn = fn(&PluginId) -> GridSize;

/// The default [`SizeHintFn`]: launchers take a single cell,
/// plugins a 2x2 block.
pub fn default_size_hint(id: &PluginId) -> GridSize {
    match id {
        PluginId::Launcher { .. } => GridSize::new(1, 1),
        PluginId::Plugin(_) => GridSize::new(2, 2),
    }
}

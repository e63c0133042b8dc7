//! Types and helpers for configuring the desktop plugin space.

mod config;

#[doc(inline)]
pub use config::*;

pub mod store;

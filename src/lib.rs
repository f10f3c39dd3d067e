//! Tracker module decoder plugin.
//!
//! This crate exists to expose one dependency and a small set of feature
//! flags for hosts that load the plugin. The actual pieces live in the
//! workspace crates and are re-exported through `core-service`:
//!
//! - `desktop-shims` (default): JSON-file settings store from `bridge-desktop`
//! - `openmpt`: link the system libopenmpt and enable `OpenMptEngine`

pub use core_service::*;

//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the plugin crates:
//! - Logging and tracing bootstrap
//! - Forwarding of log events to the host logger
//!
//! ## Overview
//!
//! A plugin lives inside someone else's process. It must not install a global
//! subscriber behind the host's back, so nothing here runs implicitly: the
//! host (or the plugin entry point on its behalf) calls
//! [`logging::init_logging`] once with the configuration it wants.

pub mod error;
pub mod logging;

pub use error::{Error, Result};

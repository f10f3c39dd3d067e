//! # Desktop Bridge Implementations
//!
//! Default implementations of host capabilities for desktop players
//! (macOS, Windows, Linux) that do not hand the plugin their own storage.
//!
//! ## Overview
//!
//! - `SettingsStore` using a JSON file in the user configuration directory
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::JsonSettingsStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = JsonSettingsStore::open(JsonSettingsStore::default_path()?).await?;
//!     // Hand the store to the plugin factory
//! }
//! ```

mod settings;

pub use settings::JsonSettingsStore;

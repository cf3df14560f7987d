//! Configuration loading for Farlink.
//!
//! Reads a [`ControlFile`](schema::ControlFile) from RON, TOML, or JSON and
//! resolves it into the [`ControlConfig`](farlink_core::config::ControlConfig)
//! snapshot the core consumes. [`ConfigStore`] keeps the current snapshot
//! and swaps it on reload.

pub mod loader;
pub mod schema;
pub mod store;

pub use loader::{ConfigLoadError, Format, deserialize_file, detect_format, find_config_file};
pub use schema::{ControlFile, SchemaError};
pub use store::{ConfigStore, load_control_config};

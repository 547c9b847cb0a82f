//! Settings module for the editor
//!
//! Settings come from an optional TOML file; every field has a default.

pub mod editor_settings;

pub use editor_settings::{EditorSettings, SettingsError};

//! Core data models for the editor
//!
//! This module contains the structures a parsed profile is made of, separated
//! from the codec that produces them and the store that edits them.
//!
//! # Usage
//!
//! ```rust
//! use subconverter_editor::models::{ProxyGroup, Ruleset, RulesetType};
//!
//! let group = ProxyGroup::new("Proxy", "select").with_proxies(vec![".*".to_string()]);
//! assert_eq!(group.proxies.len(), 1);
//!
//! let ruleset = Ruleset::new("Direct", "[]GEOIP,CN");
//! assert_eq!(ruleset.kind(), RulesetType::Builtin);
//! ```

mod document;
mod proxy_group;
mod proxy_member;
mod ruleset;

pub use document::*;
pub use proxy_group::*;
pub use proxy_member::*;
pub use ruleset::*;

//! Text codec for subconverter external config profiles
//!
//! [`ini_codec`] turns profile text into a [`crate::models::Document`] and back;
//! [`member`] handles the encoding of individual proxy group members.

pub mod ini_codec;
pub mod member;

pub use ini_codec::{parse, parse_proxy_group, parse_ruleset, stringify};
pub use member::{extract_group_name, is_group_reference, parse_proxy_member};

use std::fmt;

use serde::Serialize;

/// Terminal targets that may appear behind the `[]` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecialTarget {
    Direct,
    Reject,
}

impl SpecialTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialTarget::Direct => "DIRECT",
            SpecialTarget::Reject => "REJECT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DIRECT" => Some(SpecialTarget::Direct),
            "REJECT" => Some(SpecialTarget::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for SpecialTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a proxy group's member list
///
/// Members are stored as raw strings on [`crate::models::ProxyGroup`] and only
/// turned into this enum when logic needs to tell them apart. Parsing and
/// serialization live in [`crate::parser::member`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProxyMember {
    /// `[]name`, a reference to another proxy group
    Group { name: String },
    /// `[]DIRECT` or `[]REJECT`
    Special { value: SpecialTarget },
    /// A pattern matched against proxy names
    Regex { pattern: String },
    /// An exact proxy name
    Literal { value: String },
}

impl ProxyMember {
    pub fn group(name: &str) -> Self {
        ProxyMember::Group {
            name: name.to_string(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ProxyMember::Group { .. })
    }

    /// Referenced group name, if this is a group reference
    pub fn group_name(&self) -> Option<&str> {
        match self {
            ProxyMember::Group { name } => Some(name),
            _ => None,
        }
    }
}

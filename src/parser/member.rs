use crate::constants::GROUP_REF_PREFIX;
use crate::models::{ProxyMember, SpecialTarget};

/// Classify a raw member string
pub fn parse_proxy_member(raw: &str) -> ProxyMember {
    if let Some(name) = raw.strip_prefix(GROUP_REF_PREFIX) {
        return match SpecialTarget::from_name(name) {
            Some(value) => ProxyMember::Special { value },
            None => ProxyMember::Group {
                name: name.to_string(),
            },
        };
    }
    if raw.contains('*') || raw.contains('\\') || raw.starts_with('(') {
        return ProxyMember::Regex {
            pattern: raw.to_string(),
        };
    }
    ProxyMember::Literal {
        value: raw.to_string(),
    }
}

/// Encode a member back into its raw string
pub fn stringify_proxy_member(member: &ProxyMember) -> String {
    match member {
        ProxyMember::Group { name } => format!("{}{}", GROUP_REF_PREFIX, name),
        ProxyMember::Special { value } => format!("{}{}", GROUP_REF_PREFIX, value.as_str()),
        ProxyMember::Regex { pattern } => pattern.clone(),
        ProxyMember::Literal { value } => value.clone(),
    }
}

/// Whether the raw member carries the `[]` prefix
///
/// This includes `[]DIRECT` and `[]REJECT`.
pub fn is_group_reference(raw: &str) -> bool {
    raw.starts_with(GROUP_REF_PREFIX)
}

/// Name behind the `[]` prefix, if any
pub fn extract_group_name(raw: &str) -> Option<&str> {
    raw.strip_prefix(GROUP_REF_PREFIX)
}

/// Group referenced by the raw member, excluding special targets
pub fn referenced_group(raw: &str) -> Option<&str> {
    extract_group_name(raw).filter(|name| SpecialTarget::from_name(name).is_none())
}

impl std::fmt::Display for ProxyMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&stringify_proxy_member(self))
    }
}

impl From<&str> for ProxyMember {
    fn from(raw: &str) -> Self {
        parse_proxy_member(raw)
    }
}

use serde::Serialize;

/// Well-known proxy group types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyGroupType {
    Select,
    URLTest,
    LoadBalance,
    Fallback,
}

impl ProxyGroupType {
    pub const ALL: [ProxyGroupType; 4] = [
        ProxyGroupType::Select,
        ProxyGroupType::URLTest,
        ProxyGroupType::LoadBalance,
        ProxyGroupType::Fallback,
    ];

    /// Get string representation of the proxy group type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "select",
            ProxyGroupType::URLTest => "url-test",
            ProxyGroupType::LoadBalance => "load-balance",
            ProxyGroupType::Fallback => "fallback",
        }
    }

    /// Short human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "Manual select",
            ProxyGroupType::URLTest => "Latency test",
            ProxyGroupType::LoadBalance => "Load balance",
            ProxyGroupType::Fallback => "Fallback",
        }
    }

    /// Parse a type string; freeform types return `None`
    pub fn from_type_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Whether groups of this type carry a test URL and interval
    pub fn has_health_check(&self) -> bool {
        matches!(self, ProxyGroupType::URLTest | ProxyGroupType::Fallback)
    }
}

/// A `custom_proxy_group=` entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProxyGroup {
    /// Name of the proxy group, unique across the document
    pub name: String,
    /// Group type, usually one of [`ProxyGroupType`] but kept freeform
    pub group_type: String,
    /// Raw member strings, see [`crate::models::ProxyMember`]
    pub proxies: Vec<String>,
    /// URL for health checks
    pub test_url: Option<String>,
    /// Interval in seconds between checks, kept as written
    pub interval: Option<String>,
    /// Tolerance for url-test groups
    pub tolerance: Option<String>,
}

impl ProxyGroup {
    /// Create an empty proxy group
    pub fn new(name: &str, group_type: &str) -> Self {
        Self {
            name: name.to_string(),
            group_type: group_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_proxies(mut self, proxies: Vec<String>) -> Self {
        self.proxies = proxies;
        self
    }

    /// Set the health-check pair
    pub fn with_health_check(mut self, test_url: &str, interval: &str) -> Self {
        self.test_url = Some(test_url.to_string());
        self.interval = Some(interval.to_string());
        self
    }

    pub fn with_tolerance(mut self, tolerance: &str) -> Self {
        self.tolerance = Some(tolerance.to_string());
        self
    }

    /// Known type of this group, if any
    pub fn known_type(&self) -> Option<ProxyGroupType> {
        ProxyGroupType::from_type_str(&self.group_type)
    }

    /// Whether the health-check fields are meaningful for this group
    pub fn has_health_check(&self) -> bool {
        self.known_type().is_some_and(|t| t.has_health_check())
    }

    /// Whether this group lists `[]name` as a member
    pub fn references(&self, name: &str) -> bool {
        self.proxies
            .iter()
            .any(|p| crate::parser::member::extract_group_name(p) == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_type_round_trip() {
        for t in ProxyGroupType::ALL {
            assert_eq!(ProxyGroupType::from_type_str(t.as_str()), Some(t));
        }
        assert_eq!(ProxyGroupType::from_type_str("relay"), None);
    }

    #[test]
    fn test_health_check_types() {
        assert!(ProxyGroup::new("A", "url-test").has_health_check());
        assert!(ProxyGroup::new("A", "fallback").has_health_check());
        assert!(!ProxyGroup::new("A", "select").has_health_check());
        assert!(!ProxyGroup::new("A", "custom").has_health_check());
    }

    #[test]
    fn test_references() {
        let group = ProxyGroup::new("A", "select")
            .with_proxies(vec!["[]B".to_string(), "C".to_string()]);
        assert!(group.references("B"));
        assert!(!group.references("C"));
    }
}

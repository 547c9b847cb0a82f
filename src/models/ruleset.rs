use serde::Serialize;

/// Source markers that select a built-in rule provider
const BUILTIN_MARKERS: [&str; 3] = ["[]GEOSITE", "[]GEOIP", "[]FINAL"];

/// Kind of rule source, derived from the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetType {
    List,
    Remote,
    Builtin,
    Local,
}

impl RulesetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetType::List => "list",
            RulesetType::Remote => "remote",
            RulesetType::Builtin => "builtin",
            RulesetType::Local => "local",
        }
    }

    /// Classify a ruleset source
    ///
    /// `List` is part of the vocabulary but never produced here.
    pub fn from_source(source: &str) -> Self {
        if BUILTIN_MARKERS.iter().any(|m| source.contains(m)) {
            RulesetType::Builtin
        } else if source.starts_with("http") {
            RulesetType::Remote
        } else {
            RulesetType::Local
        }
    }
}

/// A `ruleset=` entry binding a rule source to a target group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Ruleset {
    /// Target proxy group
    pub name: String,
    /// Rule source, also the identity of the ruleset within a section
    pub source: String,
    /// Update interval in seconds, kept as written
    pub interval: Option<String>,
}

impl Ruleset {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            interval: None,
        }
    }

    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = Some(interval.to_string());
        self
    }

    /// Kind of this ruleset, always computed from `source`
    pub fn kind(&self) -> RulesetType {
        RulesetType::from_source(&self.source)
    }
}

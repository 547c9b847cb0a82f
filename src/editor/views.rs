//! Read-only views derived from a document

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Document, ProxyGroup, Ruleset, RulesetType};

/// Counts of proxy groups by type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl GroupStats {
    pub fn collect(document: &Document) -> Self {
        let mut stats = GroupStats::default();
        for group in document.groups() {
            stats.total += 1;
            *stats.by_type.entry(group.group_type.clone()).or_insert(0) += 1;
        }
        stats
    }
}

/// Counts of rulesets by kind and by target group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RulesetStats {
    pub total: usize,
    pub by_type: BTreeMap<RulesetType, usize>,
    pub by_group: BTreeMap<String, usize>,
}

impl RulesetStats {
    pub fn collect(document: &Document) -> Self {
        let mut stats = RulesetStats::default();
        for ruleset in document.rulesets() {
            stats.total += 1;
            *stats.by_type.entry(ruleset.kind()).or_insert(0) += 1;
            *stats.by_group.entry(ruleset.name.clone()).or_insert(0) += 1;
        }
        stats
    }
}

/// Search over proxy groups
///
/// The search term matches group names case-insensitively; an empty term
/// matches everything.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub search: String,
    pub group_type: Option<String>,
}

impl GroupFilter {
    pub fn matches(&self, group: &ProxyGroup) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = search.is_empty() || group.name.to_lowercase().contains(&search);
        let matches_type = self
            .group_type
            .as_ref()
            .map_or(true, |t| &group.group_type == t);
        matches_search && matches_type
    }

    /// Matching groups per section, skipping sections with no match
    pub fn apply<'a>(&self, document: &'a Document) -> Vec<(&'a str, Vec<&'a ProxyGroup>)> {
        document
            .sections
            .iter()
            .filter_map(|section| {
                let groups: Vec<_> = section
                    .proxy_groups
                    .iter()
                    .filter(|g| self.matches(g))
                    .collect();
                (!groups.is_empty()).then_some((section.name.as_str(), groups))
            })
            .collect()
    }
}

/// Search over rulesets by target group or source
#[derive(Debug, Clone, Default)]
pub struct RulesetFilter {
    pub search: String,
    pub kind: Option<RulesetType>,
}

impl RulesetFilter {
    pub fn matches(&self, ruleset: &Ruleset) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = search.is_empty()
            || ruleset.name.to_lowercase().contains(&search)
            || ruleset.source.to_lowercase().contains(&search);
        let matches_kind = self.kind.map_or(true, |k| ruleset.kind() == k);
        matches_search && matches_kind
    }

    pub fn apply<'a>(&self, document: &'a Document) -> Vec<&'a Ruleset> {
        document.rulesets().filter(|r| self.matches(r)).collect()
    }
}

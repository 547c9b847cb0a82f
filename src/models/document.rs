use linked_hash_map::LinkedHashMap;
use serde::Serialize;

use crate::constants::GLOBAL_SECTION;
use crate::models::{ProxyGroup, Ruleset};

/// A named block of a profile, delimited by a `[name]` header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Section name without brackets
    pub name: String,
    /// Plain `key=value` entries in first-seen order
    pub config: LinkedHashMap<String, String>,
    /// `ruleset=` lines in file order
    pub rulesets: Vec<Ruleset>,
    /// `custom_proxy_group=` lines in file order
    pub proxy_groups: Vec<ProxyGroup>,
    /// Every non-header line seen in this section, verbatim
    pub raw_lines: Vec<String>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            config: LinkedHashMap::new(),
            rulesets: Vec::new(),
            proxy_groups: Vec::new(),
            raw_lines: Vec::new(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.name == GLOBAL_SECTION
    }

    /// Set a config entry. An existing key keeps its position.
    pub fn set_config(&mut self, key: &str, value: &str) {
        if let Some(existing) = self.config.get_mut(key) {
            *existing = value.to_string();
        } else {
            self.config.insert(key.to_string(), value.to_string());
        }
    }

    /// Position of the first group with the given name
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.proxy_groups.iter().position(|g| g.name == name)
    }

    /// Position of the first ruleset with the given source
    pub fn ruleset_index(&self, source: &str) -> Option<usize> {
        self.rulesets.iter().position(|r| r.source == source)
    }
}

/// A parsed profile: an ordered list of sections, the first always `Global`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the `Global` section
    pub fn new() -> Self {
        Document {
            sections: vec![Section::new(GLOBAL_SECTION)],
        }
    }

    /// Build a document from explicit sections
    ///
    /// A `Global` section is prepended when the list does not start with one.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut document = Document { sections };
        if !document.sections.first().is_some_and(Section::is_global) {
            document.sections.insert(0, Section::new(GLOBAL_SECTION));
        }
        document
    }

    /// Get the first section with the given name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Get the first section with the given name for editing
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// All proxy groups across sections, in document order
    pub fn groups(&self) -> impl Iterator<Item = &ProxyGroup> {
        self.sections.iter().flat_map(|s| s.proxy_groups.iter())
    }

    /// All rulesets across sections, in document order
    pub fn rulesets(&self) -> impl Iterator<Item = &Ruleset> {
        self.sections.iter().flat_map(|s| s.rulesets.iter())
    }

    /// Flattened, owned copy of every proxy group
    pub fn all_groups(&self) -> Vec<ProxyGroup> {
        self.groups().cloned().collect()
    }

    /// Flattened, owned copy of every ruleset
    pub fn all_rulesets(&self) -> Vec<Ruleset> {
        self.rulesets().cloned().collect()
    }

    /// Find a group by name in any section
    pub fn find_group(&self, name: &str) -> Option<&ProxyGroup> {
        self.groups().find(|g| g.name == name)
    }

    /// Locate a group as `(section index, group index)`
    pub fn locate_group(&self, name: &str) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(si, s)| s.group_index(name).map(|gi| (si, gi)))
    }

    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    pub fn ruleset_count(&self) -> usize {
        self.rulesets().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_global() {
        let doc = Document::new();
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].is_global());
    }

    #[test]
    fn test_from_sections_prepends_global() {
        let doc = Document::from_sections(vec![Section::new("custom")]);
        assert_eq!(doc.sections[0].name, "Global");
        assert_eq!(doc.sections[1].name, "custom");

        let doc = Document::from_sections(vec![Section::new("Global"), Section::new("custom")]);
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn test_set_config_keeps_position() {
        let mut section = Section::new("common");
        section.set_config("a", "1");
        section.set_config("b", "2");
        section.set_config("a", "3");
        let entries: Vec<_> = section.config.iter().collect();
        assert_eq!(entries[0], (&"a".to_string(), &"3".to_string()));
        assert_eq!(entries[1], (&"b".to_string(), &"2".to_string()));
    }

    #[test]
    fn test_locate_group() {
        let mut custom = Section::new("custom");
        custom.proxy_groups.push(ProxyGroup::new("A", "select"));
        custom.proxy_groups.push(ProxyGroup::new("B", "select"));
        let doc = Document::from_sections(vec![custom]);
        assert_eq!(doc.locate_group("B"), Some((1, 1)));
        assert_eq!(doc.locate_group("C"), None);
        assert_eq!(doc.group_count(), 2);
    }
}

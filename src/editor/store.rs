use std::collections::HashSet;
use std::fmt;

use log::{debug, info, warn};

use crate::constants::CUSTOM_SECTION;
use crate::editor::error::EditError;
use crate::editor::graph::{check_name_collision, detect_cycle};
use crate::editor::history::HistoryLedger;
use crate::editor::views::{GroupStats, RulesetStats};
use crate::models::{Document, ProxyGroup, Ruleset, Section};
use crate::parser::{parse, stringify};

/// What a structured editor can currently show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructuredView<'a> {
    /// The text is blank
    Empty,
    /// The text parsed into sections
    Ready(&'a Document),
    /// The text is not blank but yielded no sections
    Malformed,
}

type Listener = Box<dyn FnMut(&str) + Send>;

/// Owner of a profile's text and the edits applied to it
///
/// The text is the source of truth. Every accepted edit works on a copy of
/// the parsed document, serializes it, and re-parses the result, so
/// [`DocumentStore::document`] always reflects [`DocumentStore::text`].
pub struct DocumentStore {
    text: String,
    document: Document,
    history: HistoryLedger,
    dirty: bool,
    revision: u64,
    listeners: Vec<Listener>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("text", &self.text)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a store holding `text`, clean and without history
    pub fn new(text: &str) -> Self {
        DocumentStore {
            text: text.to_string(),
            document: parse(text),
            history: HistoryLedger::default(),
            dirty: false,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Create a store with a custom undo depth
    pub fn with_history_limit(text: &str, limit: usize) -> Self {
        let mut store = Self::new(text);
        store.history = HistoryLedger::new(limit);
        store
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed projection of the current text
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Structured view state, making the degraded case explicit
    pub fn view(&self) -> StructuredView<'_> {
        if self.text.trim().is_empty() {
            StructuredView::Empty
        } else if self.document.sections.is_empty() {
            StructuredView::Malformed
        } else {
            StructuredView::Ready(&self.document)
        }
    }

    /// The parsed document, or an error when it cannot be shown structurally
    pub fn structured(&self) -> Result<&Document, EditError> {
        match self.view() {
            StructuredView::Malformed => Err(EditError::MalformedDocument),
            _ => Ok(&self.document),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after the text was persisted
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Number of times the text has been republished
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Register a callback invoked with the new text after every change
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the text wholesale, e.g. after loading another document
    ///
    /// History is discarded.
    pub fn reset(&mut self, text: &str, dirty: bool) {
        self.history.clear();
        self.dirty = dirty;
        self.publish(text.to_string());
    }

    /// Apply a raw text edit
    ///
    /// Marks the store dirty but records no history entry. Returns whether
    /// the text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.dirty = true;
        self.publish(text.to_string());
        true
    }

    /// Flattened list of all proxy groups
    pub fn all_groups(&self) -> Vec<ProxyGroup> {
        self.document.all_groups()
    }

    /// Flattened list of all rulesets
    pub fn all_rulesets(&self) -> Vec<Ruleset> {
        self.document.all_rulesets()
    }

    pub fn group_stats(&self) -> GroupStats {
        GroupStats::collect(&self.document)
    }

    pub fn ruleset_stats(&self) -> RulesetStats {
        RulesetStats::collect(&self.document)
    }

    // --- Undo / Redo ---

    /// Restore the text before the last edit. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.text) {
            Some(previous) => {
                debug!("Undo to revision {}", self.revision + 1);
                self.publish(previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.text) {
            Some(next) => {
                debug!("Redo to revision {}", self.revision + 1);
                self.publish(next);
                true
            }
            None => false,
        }
    }

    // --- Proxy groups ---

    /// Replace the group named `original_name` (or `group.name`) in place
    ///
    /// Fails when the group is renamed onto an existing name, or when its new
    /// members would reference back to it.
    pub fn update_group(
        &mut self,
        group: ProxyGroup,
        original_name: Option<&str>,
    ) -> Result<(), EditError> {
        let target = original_name.unwrap_or(&group.name).to_string();
        let mut groups = self.all_groups();

        if group.name != target
            && check_name_collision(&group.name, &groups, Some(target.as_str()))
        {
            warn!("Rejected rename of '{}' to existing name '{}'", target, group.name);
            return Err(EditError::NameCollision(group.name));
        }

        // the old entry does not exist after the edit
        if let Some(idx) = groups.iter().position(|g| g.name == target) {
            groups.remove(idx);
        }
        self.check_cycle(&group, &groups)?;

        let name = group.name.clone();
        self.mutate(&format!("Updated group '{}'", name), move |doc| {
            if let Some((si, gi)) = doc.locate_group(&target) {
                doc.sections[si].proxy_groups[gi] = group;
            }
        });
        Ok(())
    }

    /// Remove the first group with the given name; returns whether one was found
    pub fn delete_group(&mut self, name: &str) -> bool {
        self.mutate(&format!("Deleted group '{}'", name), |doc| {
            match doc.locate_group(name) {
                Some((si, gi)) => {
                    doc.sections[si].proxy_groups.remove(gi);
                    true
                }
                None => false,
            }
        })
    }

    /// Insert a copy right after `group` under a fresh name, which is returned
    ///
    /// Fails when `group` is not in the document, or when an existing
    /// reference to the fresh name would make the copy part of a cycle.
    pub fn duplicate_group(&mut self, group: &ProxyGroup) -> Result<String, EditError> {
        if self.document.locate_group(&group.name).is_none() {
            warn!("Cannot duplicate missing group '{}'", group.name);
            return Err(EditError::GroupNotFound(group.name.clone()));
        }

        let groups = self.all_groups();
        let new_name = unique_copy_name(&group.name, &groups);

        let mut copy = group.clone();
        copy.name = new_name.clone();
        self.check_cycle(&copy, &groups)?;

        self.mutate(&format!("Duplicated group '{}' as '{}'", group.name, new_name), |doc| {
            if let Some((si, gi)) = doc.locate_group(&group.name) {
                doc.sections[si].proxy_groups.insert(gi + 1, copy);
            }
        });
        Ok(new_name)
    }

    /// Add a new group
    ///
    /// The group goes into the `custom` section when there is one, otherwise
    /// into the first section that already has groups, otherwise into the
    /// first section.
    pub fn create_group(&mut self, group: ProxyGroup) -> Result<(), EditError> {
        let groups = self.all_groups();

        if check_name_collision(&group.name, &groups, None) {
            warn!("Rejected creation of duplicate group '{}'", group.name);
            return Err(EditError::NameCollision(group.name));
        }
        self.check_cycle(&group, &groups)?;

        let name = group.name.clone();
        self.mutate(&format!("Created group '{}'", name), move |doc| {
            let target = doc
                .sections
                .iter()
                .position(|s| s.name.eq_ignore_ascii_case(CUSTOM_SECTION))
                .or_else(|| doc.sections.iter().position(|s| !s.proxy_groups.is_empty()))
                .unwrap_or(0);
            if let Some(section) = doc.sections.get_mut(target) {
                section.proxy_groups.push(group);
            }
        });
        Ok(())
    }

    /// Reference `group` from every other group that does not already do so
    ///
    /// Groups that `group` already reaches are skipped, since referencing it
    /// from them would close a cycle. Returns the number of groups changed.
    pub fn add_to_all(&mut self, group: &ProxyGroup) -> usize {
        let member = crate::models::ProxyMember::group(&group.name).to_string();

        let groups = self.all_groups();
        let blocked: HashSet<String> = groups
            .iter()
            .filter(|g| g.name != group.name && !g.proxies.contains(&member))
            .filter_map(|g| {
                let mut candidate = g.proxies.clone();
                candidate.push(member.clone());
                detect_cycle(&g.name, &candidate, &groups).map(|path| {
                    warn!("Not adding '{}' to '{}': {}", group.name, g.name, path.join(" -> "));
                    g.name.clone()
                })
            })
            .collect();

        let count = self.mutate(&format!("Added '{}' to all groups", group.name), |doc| {
            let mut count = 0;
            for other in doc.sections.iter_mut().flat_map(|s| s.proxy_groups.iter_mut()) {
                if other.name != group.name
                    && !other.proxies.contains(&member)
                    && !blocked.contains(&other.name)
                {
                    other.proxies.push(member.clone());
                    count += 1;
                }
            }
            count
        });
        info!("Added '{}' to {} groups", group.name, count);
        count
    }

    /// Drop the reference to `group` from every group holding one
    ///
    /// Returns the number of groups changed.
    pub fn remove_from_all(&mut self, group: &ProxyGroup) -> usize {
        let member = crate::models::ProxyMember::group(&group.name).to_string();
        let count = self.mutate(&format!("Removed '{}' from all groups", group.name), |doc| {
            let mut count = 0;
            for other in doc.sections.iter_mut().flat_map(|s| s.proxy_groups.iter_mut()) {
                if let Some(idx) = other.proxies.iter().position(|p| *p == member) {
                    other.proxies.remove(idx);
                    count += 1;
                }
            }
            count
        });
        info!("Removed '{}' from {} groups", group.name, count);
        count
    }

    /// Move a group within one section; out-of-range sources are ignored
    pub fn reorder_group(&mut self, section_name: &str, old_index: usize, new_index: usize) {
        self.mutate(&format!("Reordered groups in [{}]", section_name), |doc| {
            if let Some(section) = doc.section_mut(section_name) {
                move_item(&mut section.proxy_groups, old_index, new_index);
            }
        });
    }

    // --- Rulesets ---

    /// Append a ruleset
    ///
    /// Target: the named section, else the first section holding rulesets,
    /// else `custom`, else the first section.
    pub fn create_ruleset(&mut self, ruleset: Ruleset, section_name: Option<&str>) {
        let label = format!("Created ruleset '{}' -> '{}'", ruleset.source, ruleset.name);
        self.mutate(&label, move |doc| {
            let target = section_name
                .and_then(|name| doc.sections.iter().position(|s| s.name == name))
                .or_else(|| doc.sections.iter().position(|s| !s.rulesets.is_empty()))
                .or_else(|| {
                    doc.sections
                        .iter()
                        .position(|s| s.name.eq_ignore_ascii_case(CUSTOM_SECTION))
                })
                .unwrap_or(0);
            if let Some(section) = doc.sections.get_mut(target) {
                section.rulesets.push(ruleset);
            }
        });
    }

    /// Replace the first ruleset whose source equals `original_source`
    ///
    /// Returns whether a ruleset was replaced.
    pub fn update_ruleset(
        &mut self,
        original_source: &str,
        updated: Ruleset,
        section_name: Option<&str>,
    ) -> bool {
        self.mutate(&format!("Updated ruleset '{}'", original_source), move |doc| {
            for section in scoped_sections(doc, section_name) {
                if let Some(idx) = section.ruleset_index(original_source) {
                    section.rulesets[idx] = updated;
                    return true;
                }
            }
            false
        })
    }

    /// Remove the first ruleset whose source equals `source`
    pub fn delete_ruleset(&mut self, source: &str, section_name: Option<&str>) -> bool {
        self.mutate(&format!("Deleted ruleset '{}'", source), |doc| {
            for section in scoped_sections(doc, section_name) {
                if let Some(idx) = section.ruleset_index(source) {
                    section.rulesets.remove(idx);
                    return true;
                }
            }
            false
        })
    }

    /// Move a ruleset within one section; out-of-range sources are ignored
    pub fn reorder_ruleset(&mut self, section_name: &str, old_index: usize, new_index: usize) {
        self.mutate(&format!("Reordered rulesets in [{}]", section_name), |doc| {
            if let Some(section) = doc.section_mut(section_name) {
                move_item(&mut section.rulesets, old_index, new_index);
            }
        });
    }

    // --- Internals ---

    fn check_cycle(&self, group: &ProxyGroup, groups: &[ProxyGroup]) -> Result<(), EditError> {
        match detect_cycle(&group.name, &group.proxies, groups) {
            Some(path) => {
                warn!("Rejected circular reference: {}", path.join(" -> "));
                Err(EditError::CycleDetected { path })
            }
            None => Ok(()),
        }
    }

    /// Record history, edit a copy of the document and republish it as text
    fn mutate<F, R>(&mut self, label: &str, edit: F) -> R
    where
        F: FnOnce(&mut Document) -> R,
    {
        self.history.record(&self.text);

        let mut document = self.document.clone();
        let result = edit(&mut document);
        let text = stringify(&document);

        self.dirty = true;
        self.publish(text);
        info!("{}", label);
        result
    }

    fn publish(&mut self, text: String) {
        self.document = parse(&text);
        self.text = text;
        self.revision += 1;
        for listener in self.listeners.iter_mut() {
            listener(self.text.as_str());
        }
    }
}

fn scoped_sections<'a>(
    doc: &'a mut Document,
    section_name: Option<&'a str>,
) -> impl Iterator<Item = &'a mut Section> + 'a {
    doc.sections
        .iter_mut()
        .filter(move |s| section_name.map_or(true, |name| s.name == name))
}

fn move_item<T>(items: &mut Vec<T>, old_index: usize, new_index: usize) {
    if old_index >= items.len() {
        return;
    }
    let item = items.remove(old_index);
    let new_index = new_index.min(items.len());
    items.insert(new_index, item);
}

fn unique_copy_name(name: &str, groups: &[ProxyGroup]) -> String {
    let taken = |candidate: &str| groups.iter().any(|g| g.name == candidate);
    let mut candidate = format!("{} (copy)", name);
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{} (copy) {}", name, counter);
        counter += 1;
    }
    candidate
}

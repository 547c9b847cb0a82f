//! Checks over the group reference graph
//!
//! A group `A` points to group `B` when `A`'s members contain `[]B`. Edits
//! must keep group names unique and this graph acyclic.

use std::collections::{BTreeSet, HashMap, HashSet};

use linked_hash_map::LinkedHashMap;

use crate::models::{Document, ProxyGroup};
use crate::parser::member::referenced_group;

/// Look for a reference chain leading from `candidate_proxies` back to `subject`
///
/// `candidate_proxies` is the member list `subject` would have after the
/// edit; `all_groups` supplies everyone else's current members. Returns the
/// cycle as a list of group names starting and ending with `subject`.
/// References to groups that do not exist are ignored.
pub fn detect_cycle(
    subject: &str,
    candidate_proxies: &[String],
    all_groups: &[ProxyGroup],
) -> Option<Vec<String>> {
    let lookup: HashMap<&str, &ProxyGroup> =
        all_groups.iter().map(|g| (g.name.as_str(), g)).collect();

    // group name -> group whose member list led us there
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, &str)> = candidate_proxies
        .iter()
        .map(|m| (m.as_str(), subject))
        .collect();

    while let Some((member, via)) = stack.pop() {
        let Some(target) = referenced_group(member) else {
            continue;
        };

        if target == subject {
            return Some(cycle_path(subject, via, &parents));
        }

        if !visited.insert(target) {
            continue;
        }
        parents.insert(target, via);

        if let Some(group) = lookup.get(target) {
            stack.extend(group.proxies.iter().map(|m| (m.as_str(), target)));
        }
    }

    None
}

fn cycle_path(subject: &str, last: &str, parents: &HashMap<&str, &str>) -> Vec<String> {
    let mut path = vec![subject.to_string()];
    let mut current = last;
    while current != subject {
        path.push(current.to_string());
        match parents.get(current) {
            Some(parent) => current = *parent,
            None => break,
        }
    }
    path.push(subject.to_string());
    path.reverse();
    path
}

/// Whether `new_name` is taken by a group other than `excluding`
pub fn check_name_collision(
    new_name: &str,
    all_groups: &[ProxyGroup],
    excluding: Option<&str>,
) -> bool {
    all_groups
        .iter()
        .any(|g| g.name == new_name && Some(g.name.as_str()) != excluding)
}

/// A problem already present in a document, e.g. loaded from a hand-edited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIssue {
    /// More than one group carries this name
    DuplicateGroup { name: String, count: usize },
    /// A reference cycle through these groups
    Cycle { path: Vec<String> },
}

impl std::fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentIssue::DuplicateGroup { name, count } => {
                write!(f, "group \"{}\" is defined {} times", name, count)
            }
            DocumentIssue::Cycle { path } => write!(f, "circular reference {}", path.join(" -> ")),
        }
    }
}

/// Report duplicate group names and reference cycles in a document
///
/// Each cycle is reported once regardless of which member it was found from.
pub fn validate_document(document: &Document) -> Vec<DocumentIssue> {
    let groups = document.all_groups();
    let mut issues = Vec::new();

    let mut counts: LinkedHashMap<&str, usize> = LinkedHashMap::new();
    for group in &groups {
        *counts.entry(group.name.as_str()).or_insert(0) += 1;
    }
    for (name, count) in counts {
        if count > 1 {
            issues.push(DocumentIssue::DuplicateGroup {
                name: name.to_string(),
                count,
            });
        }
    }

    let mut seen_cycles: HashSet<BTreeSet<String>> = HashSet::new();
    for group in &groups {
        if let Some(path) = detect_cycle(&group.name, &group.proxies, &groups) {
            let members: BTreeSet<String> = path.iter().cloned().collect();
            if seen_cycles.insert(members) {
                issues.push(DocumentIssue::Cycle { path });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn group(name: &str, proxies: &[&str]) -> ProxyGroup {
        ProxyGroup::new(name, "select").with_proxies(proxies.iter().map(|s| s.to_string()).collect())
    }

    fn refs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_cycle_through_chain() {
        let groups = vec![group("A", &["[]B"]), group("B", &["[]C"]), group("C", &[])];
        let path = detect_cycle("C", &refs(&["[]A"]), &groups).unwrap();
        assert_eq!(path, vec!["C", "A", "B", "C"]);
    }

    #[test]
    fn test_detect_self_reference() {
        let groups = vec![group("A", &[])];
        let path = detect_cycle("A", &refs(&["[]A"]), &groups).unwrap();
        assert_eq!(path, vec!["A", "A"]);
    }

    #[test]
    fn test_no_cycle_for_acyclic_graph() {
        let groups = vec![
            group("A", &["[]B", "[]C"]),
            group("B", &["[]C", "[]DIRECT"]),
            group("C", &[".*"]),
        ];
        assert_eq!(detect_cycle("D", &refs(&["[]A", "[]B"]), &groups), None);
    }

    #[test]
    fn test_unrelated_cycle_terminates() {
        let groups = vec![group("A", &["[]B"]), group("B", &["[]A"])];
        assert_eq!(detect_cycle("X", &refs(&["[]A"]), &groups), None);
    }

    #[test]
    fn test_dead_link_closes_cycle_on_create() {
        let groups = vec![group("B", &["[]New"])];
        let path = detect_cycle("New", &refs(&["[]B"]), &groups).unwrap();
        assert_eq!(path, vec!["New", "B", "New"]);
    }

    #[test]
    fn test_special_targets_are_not_references() {
        let groups = vec![group("DIRECT", &["[]A"])];
        assert_eq!(detect_cycle("A", &refs(&["[]DIRECT"]), &groups), None);
    }

    #[test]
    fn test_name_collision() {
        let groups = vec![group("A", &[]), group("B", &[])];
        assert!(check_name_collision("B", &groups, None));
        assert!(check_name_collision("B", &groups, Some("A")));
        assert!(!check_name_collision("B", &groups, Some("B")));
        assert!(!check_name_collision("C", &groups, None));
    }

    #[test]
    fn test_validate_document() {
        let doc = parse(
            "[custom]\ncustom_proxy_group=A`select`[]B\ncustom_proxy_group=B`select`[]A\ncustom_proxy_group=C`select`.*\ncustom_proxy_group=C`select`.*",
        );
        let issues = validate_document(&doc);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            DocumentIssue::DuplicateGroup {
                name: "C".to_string(),
                count: 2
            }
        );
        assert_eq!(
            issues[1],
            DocumentIssue::Cycle {
                path: refs(&["A", "B", "A"])
            }
        );
    }

    #[test]
    fn test_validate_reports_duplicates_in_first_seen_order() {
        let doc = parse(
            "[custom]\ncustom_proxy_group=Z`select`.*\ncustom_proxy_group=A`select`.*\ncustom_proxy_group=A`select`.*\ncustom_proxy_group=Z`select`.*\ncustom_proxy_group=Z`select`.*",
        );
        assert_eq!(
            validate_document(&doc),
            vec![
                DocumentIssue::DuplicateGroup {
                    name: "Z".to_string(),
                    count: 3
                },
                DocumentIssue::DuplicateGroup {
                    name: "A".to_string(),
                    count: 2
                },
            ]
        );
    }
}

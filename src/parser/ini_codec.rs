//! Profile text codec
//!
//! Parsing is best effort and never fails: lines the editor does not
//! understand stay in [`Section::raw_lines`] and are otherwise ignored.
//! Serialization is canonical, so comments and unknown lines are not written
//! back.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{GROUP_FIELD_SEPARATOR, PROXY_GROUP_KEY, RULESET_KEY};
use crate::models::{Document, ProxyGroup, ProxyGroupType, Ruleset, Section};

static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.+)\]$").unwrap());
static INTERVAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Parse profile text into a document
///
/// The returned document always starts with the `Global` section, which
/// collects everything before the first header.
pub fn parse(content: &str) -> Document {
    let mut document = Document::new();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();

        if let Some(caps) = SECTION_HEADER.captures(trimmed) {
            document.sections.push(Section::new(&caps[1]));
            continue;
        }

        let Some(section) = document.sections.last_mut() else {
            continue;
        };
        section.raw_lines.push(line.to_string());

        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            debug!("Keeping line without key/value as raw text: {}", trimmed);
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            RULESET_KEY => section.rulesets.push(parse_ruleset(value)),
            PROXY_GROUP_KEY => section.proxy_groups.push(parse_proxy_group(value)),
            _ => section.set_config(key, value),
        }
    }

    document
}

/// Parse the value of a `ruleset=` line: `group,source[,interval]`
///
/// Fields after the interval are dropped.
pub fn parse_ruleset(value: &str) -> Ruleset {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();

    Ruleset {
        name: parts.first().copied().unwrap_or_default().to_string(),
        source: parts.get(1).copied().unwrap_or_default().to_string(),
        interval: parts
            .get(2)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    }
}

/// Parse the value of a `custom_proxy_group=` line
///
/// Format: ``name`type`member1`member2`...[`test_url`interval]``. The first
/// field that looks like a URL starts the health-check pair and ends the
/// member list; so does the first all-digit field, which is taken as the
/// interval.
pub fn parse_proxy_group(value: &str) -> ProxyGroup {
    let parts: Vec<&str> = value.split(GROUP_FIELD_SEPARATOR).map(str::trim).collect();

    let mut group = ProxyGroup::new(
        parts.first().copied().unwrap_or_default(),
        parts.get(1).copied().unwrap_or_default(),
    );

    let mut idx = 2;
    while idx < parts.len() {
        let part = parts[idx];
        if part.starts_with("http://") || part.starts_with("https://") {
            group.test_url = Some(part.to_string());
            group.interval = parts.get(idx + 1).map(|s| s.to_string());
            break;
        }
        if group.interval.is_none() && INTERVAL.is_match(part) {
            group.interval = Some(part.to_string());
            break;
        }
        if !part.is_empty() {
            group.proxies.push(part.to_string());
        }
        idx += 1;
    }

    group
}

/// Serialize a document back into profile text
///
/// Per section: config entries, then rulesets, then proxy groups. Raw lines
/// are not emitted. Only `url-test` groups get their test URL and interval
/// written out.
pub fn stringify(document: &Document) -> String {
    let mut output = String::new();

    for section in &document.sections {
        if !section.is_global() {
            output.push_str(&format!("\n[{}]\n", section.name));
        }

        for (key, value) in &section.config {
            output.push_str(&format!("{}={}\n", key, value));
        }

        for ruleset in &section.rulesets {
            output.push_str(&stringify_ruleset(ruleset));
            output.push('\n');
        }

        for group in &section.proxy_groups {
            output.push_str(&stringify_proxy_group(group));
            output.push('\n');
        }
    }

    output.trim().to_string()
}

/// Serialize one ruleset as a full `ruleset=` line
pub fn stringify_ruleset(ruleset: &Ruleset) -> String {
    let mut line = format!("{}={},{}", RULESET_KEY, ruleset.name, ruleset.source);
    if let Some(interval) = non_empty(&ruleset.interval) {
        line.push(',');
        line.push_str(interval);
    }
    line
}

/// Serialize one group as a full `custom_proxy_group=` line
pub fn stringify_proxy_group(group: &ProxyGroup) -> String {
    let mut parts: Vec<&str> = vec![group.name.as_str(), group.group_type.as_str()];
    parts.extend(group.proxies.iter().map(String::as_str));

    // fallback groups parse a health-check pair but do not get one written back
    if group.group_type == ProxyGroupType::URLTest.as_str() {
        if let (Some(test_url), Some(interval)) =
            (non_empty(&group.test_url), non_empty(&group.interval))
        {
            parts.push(test_url);
            parts.push(interval);
            if let Some(tolerance) = non_empty(&group.tolerance) {
                parts.push(tolerance);
            }
        }
    }

    let separator = GROUP_FIELD_SEPARATOR.to_string();
    format!("{}={}", PROXY_GROUP_KEY, parts.join(separator.as_str()))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RulesetType;

    #[test]
    fn test_parse_empty() {
        let doc = parse("");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "Global");
    }

    #[test]
    fn test_parse_section_header() {
        let doc = parse("[custom]\nsome_key=value");
        assert_eq!(doc.sections.len(), 2);
        let custom = doc.section("custom").unwrap();
        assert_eq!(custom.config.get("some_key").map(String::as_str), Some("value"));
        assert!(custom.raw_lines.iter().all(|l| l != "[custom]"));
    }

    #[test]
    fn test_parse_select_group() {
        let doc = parse("[custom]\ncustom_proxy_group=Proxy`select`.*\n");
        let groups = doc.all_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Proxy");
        assert_eq!(groups[0].group_type, "select");
        assert_eq!(groups[0].proxies, vec![".*"]);
    }

    #[test]
    fn test_parse_url_test_group() {
        let group =
            parse_proxy_group("Auto`url-test`.*`http://www.gstatic.com/generate_204`300");
        assert_eq!(group.name, "Auto");
        assert_eq!(group.group_type, "url-test");
        assert_eq!(group.proxies, vec![".*"]);
        assert_eq!(
            group.test_url.as_deref(),
            Some("http://www.gstatic.com/generate_204")
        );
        assert_eq!(group.interval.as_deref(), Some("300"));
        assert_eq!(group.tolerance, None);
    }

    #[test]
    fn test_parse_group_discards_fields_after_interval() {
        let group = parse_proxy_group("Auto`url-test`.*`http://t.co/204`300`50");
        assert_eq!(group.interval.as_deref(), Some("300"));
        assert_eq!(group.tolerance, None);
        assert_eq!(group.proxies, vec![".*"]);
    }

    #[test]
    fn test_parse_group_keeps_acl4ssr_interval_verbatim() {
        let group = parse_proxy_group("Auto`url-test`.*`http://t.co/204`300,,50");
        assert_eq!(group.interval.as_deref(), Some("300,,50"));
    }

    #[test]
    fn test_parse_group_numeric_member_becomes_interval() {
        let group = parse_proxy_group("G`select`[]A`123`[]B");
        assert_eq!(group.proxies, vec!["[]A"]);
        assert_eq!(group.interval.as_deref(), Some("123"));
    }

    #[test]
    fn test_parse_group_skips_empty_members() {
        let group = parse_proxy_group("G`select``[]A` ");
        assert_eq!(group.proxies, vec!["[]A"]);
    }

    #[test]
    fn test_parse_group_missing_type() {
        let group = parse_proxy_group("Lonely");
        assert_eq!(group.name, "Lonely");
        assert_eq!(group.group_type, "");
        assert!(group.proxies.is_empty());
    }

    #[test]
    fn test_parse_group_with_references() {
        let doc = parse("[custom]\ncustom_proxy_group=Main`select`[]SubGroup`[]DIRECT");
        let group = &doc.all_groups()[0];
        assert!(group.proxies.contains(&"[]SubGroup".to_string()));
        assert!(group.proxies.contains(&"[]DIRECT".to_string()));
    }

    #[test]
    fn test_parse_ruleset_types() {
        let builtin = parse_ruleset("Direct,[]GEOIP,cn,no-resolve");
        assert_eq!(builtin.kind(), RulesetType::Builtin);
        assert_eq!(builtin.source, "[]GEOIP");
        assert_eq!(builtin.interval.as_deref(), Some("cn"));

        let remote = parse_ruleset("Remote,https://x/y.list,86400");
        assert_eq!(remote.kind(), RulesetType::Remote);
        assert_eq!(remote.interval.as_deref(), Some("86400"));

        let local = parse_ruleset("Local, rules/LocalAreaNetwork.list ");
        assert_eq!(local.kind(), RulesetType::Local);
        assert_eq!(local.source, "rules/LocalAreaNetwork.list");
        assert_eq!(local.interval, None);

        let bare = parse_ruleset("OnlyName");
        assert_eq!(bare.source, "");
    }

    #[test]
    fn test_parse_keeps_comments_raw() {
        let doc = parse("; header comment\n\n[custom]\n; inner\nenable_rule_generator=true\nnot a pair");
        assert_eq!(doc.sections[0].raw_lines, vec!["; header comment", ""]);
        let custom = doc.section("custom").unwrap();
        assert_eq!(
            custom.raw_lines,
            vec!["; inner", "enable_rule_generator=true", "not a pair"]
        );
        assert_eq!(custom.config.len(), 1);
    }

    #[test]
    fn test_parse_duplicate_config_last_wins() {
        let doc = parse("a=1\nb=2\na=3");
        let global = &doc.sections[0];
        assert_eq!(global.config.get("a").map(String::as_str), Some("3"));
        assert_eq!(global.config.keys().next().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_parse_duplicate_sections_stay_separate() {
        let doc = parse("[custom]\na=1\n[custom]\nb=2");
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.sections[1].config.len(), 1);
        assert_eq!(doc.sections[2].config.len(), 1);
    }

    #[test]
    fn test_parse_crlf() {
        let doc = parse("[custom]\r\nruleset=A,[]FINAL\r\n");
        assert_eq!(doc.section("custom").unwrap().rulesets[0].source, "[]FINAL");
    }

    #[test]
    fn test_stringify_order() {
        let doc = parse(
            "[custom]\ncustom_proxy_group=P`select`.*\nruleset=P,[]FINAL\nenable_rule_generator=true",
        );
        assert_eq!(
            stringify(&doc),
            "[custom]\nenable_rule_generator=true\nruleset=P,[]FINAL\ncustom_proxy_group=P`select`.*"
        );
    }

    #[test]
    fn test_stringify_url_test_parameters() {
        let group = ProxyGroup::new("Auto", "url-test")
            .with_proxies(vec![".*".to_string()])
            .with_health_check("http://test.com", "300");
        assert_eq!(
            stringify_proxy_group(&group),
            "custom_proxy_group=Auto`url-test`.*`http://test.com`300"
        );

        let group = group.with_tolerance("50");
        assert_eq!(
            stringify_proxy_group(&group),
            "custom_proxy_group=Auto`url-test`.*`http://test.com`300`50"
        );
    }

    #[test]
    fn test_stringify_drops_fallback_health_check() {
        let group = parse_proxy_group("F`fallback`[]A`http://t.co/204`300");
        assert_eq!(group.test_url.as_deref(), Some("http://t.co/204"));
        assert_eq!(stringify_proxy_group(&group), "custom_proxy_group=F`fallback`[]A");
    }

    #[test]
    fn test_stringify_url_test_requires_both_fields() {
        let mut group = ProxyGroup::new("Auto", "url-test").with_proxies(vec![".*".to_string()]);
        group.test_url = Some("http://t.co/204".to_string());
        assert_eq!(stringify_proxy_group(&group), "custom_proxy_group=Auto`url-test`.*");
    }

    #[test]
    fn test_stringify_drops_comments() {
        let doc = parse("; comment\n[custom]\n; another\nruleset=A,[]FINAL");
        assert_eq!(stringify(&doc), "[custom]\nruleset=A,[]FINAL");
    }

    #[test]
    fn test_structural_round_trip() {
        let content = "[common]\napi_mode=false\n\n[custom]\nruleset=Direct,[]DIRECT\nruleset=Proxy,https://example.com/a.list,86400\ncustom_proxy_group=Test`select`.*\ncustom_proxy_group=Auto`url-test`.*`http://t.co/204`300";
        let first = parse(content);
        let second = parse(&stringify(&first));
        let names = |d: &Document| d.sections.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.group_count(), second.group_count());
        assert_eq!(first.ruleset_count(), second.ruleset_count());
        assert_eq!(first.all_groups(), second.all_groups());
    }

    #[test]
    fn test_stringify_idempotent() {
        let mut custom = Section::new("custom");
        custom.set_config("enable_rule_generator", "true");
        custom.rulesets.push(Ruleset::new("Proxy", "https://e.com/a.list").with_interval("86400"));
        custom.proxy_groups.push(
            ProxyGroup::new("Auto", "url-test")
                .with_proxies(vec!["[]DIRECT".to_string(), "HK.*".to_string()])
                .with_health_check("http://t.co/204", "300"),
        );
        let doc = Document::from_sections(vec![custom]);
        let once = stringify(&doc);
        assert_eq!(stringify(&parse(&once)), once);
    }
}

//! Changelog Extractor: pulls `add.version:`/`update.version:`/
//! `deprecated.version:`/`removed.version:` lines out of a raw description,
//! groups them by action, and renders a `.Changelog` AsciiDoc block. This is
//! deliberately independent of the Description Analyzer's `@version`
//! annotations — schemas mix both conventions and this extractor only ever
//! sees the line-oriented form.

use once_cell::sync::Lazy;
use regex::Regex;

static CHANGELOG_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(add|update|deprecated|removed)\.version:\s*(\S+)\s*$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogBuckets {
    pub add: Vec<String>,
    pub update: Vec<String>,
    pub deprecated: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangelogBuckets {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.update.is_empty() && self.deprecated.is_empty() && self.removed.is_empty()
    }

    pub fn all_versions(&self) -> impl Iterator<Item = &str> {
        self.add
            .iter()
            .chain(self.update.iter())
            .chain(self.deprecated.iter())
            .chain(self.removed.iter())
            .map(|s| s.as_str())
    }
}

/// Groups every `*.version:` line found in `description` into its bucket, in
/// first-seen order within each bucket.
pub fn extract_buckets(description: &str) -> ChangelogBuckets {
    let mut buckets = ChangelogBuckets::default();
    for caps in CHANGELOG_LINE_RE.captures_iter(description) {
        let version = caps[2].to_string();
        match &caps[1] {
            "add" => buckets.add.push(version),
            "update" => buckets.update.push(version),
            "deprecated" => buckets.deprecated.push(version),
            _ => buckets.removed.push(version),
        }
    }
    buckets
}

/// Renders the `.Changelog` AsciiDoc block, or an empty string if no
/// changelog lines were found anywhere in the description.
pub fn render(description: &str) -> String {
    let buckets = extract_buckets(description);
    if buckets.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n.Changelog\n");
    for (label, versions) in [
        ("add", &buckets.add),
        ("update", &buckets.update),
        ("deprecated", &buckets.deprecated),
        ("removed", &buckets.removed),
    ] {
        if versions.is_empty() {
            continue;
        }
        out.push_str("* ");
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&versions.join(", "));
        out.push('\n');
    }
    out
}

/// Removes every `*.version:` line from `description` so the Markup
/// Transformer never has to deal with them. Run before `transform()`.
pub fn strip_lines(description: &str) -> String {
    description
        .lines()
        .filter(|line| !CHANGELOG_LINE_RE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `true` if any extracted version is exactly `0.0.0` or `0.0.0.0`.
pub fn has_zero_version(description: &str) -> bool {
    extract_buckets(description)
        .all_versions()
        .any(|v| v == "0.0.0" || v == "0.0.0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_joins_multi_version_buckets() {
        let desc = "add.version: 1.0.0\nupdate.version: 1.2.3\nupdate.version: 2.0.5\n";
        assert_eq!(
            render(desc),
            "\n.Changelog\n* add: 1.0.0\n* update: 1.2.3, 2.0.5\n"
        );
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let desc = "removed.version: 3.0.0\n";
        assert_eq!(render(desc), "\n.Changelog\n* removed: 3.0.0\n");
    }

    #[test]
    fn no_matches_renders_empty_string() {
        assert_eq!(render("Just prose, no changelog here."), "");
    }

    #[test]
    fn strip_lines_removes_only_changelog_lines() {
        let desc = "Some text.\nadd.version: 1.0.0\nMore text.\n";
        let stripped = strip_lines(desc);
        assert!(!stripped.contains("add.version"));
        assert!(stripped.contains("Some text."));
        assert!(stripped.contains("More text."));
    }

    #[test]
    fn zero_version_detection() {
        assert!(has_zero_version("add.version: 0.0.0\n"));
        assert!(has_zero_version("deprecated.version: 0.0.0.0\n"));
        assert!(!has_zero_version("add.version: 1.0.0\n"));
    }
}

//! Pattern expansion: POSIX-glob plus `**` recursion and `{a,b,c}` brace
//! alternation, resolved against the filesystem into a sorted file list.

use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use walkdir::WalkDir;

use crate::error::CoreError;

const VALID_EXTENSIONS: [&str; 3] = ["graphql", "graphqls", "gql"];

pub fn has_valid_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VALID_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Expands `{a,b,c}` groups into the cartesian product of concrete patterns.
/// Handles multiple, non-nested groups via recursion on each produced branch.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    if let Some(start) = pattern.find('{') {
        if let Some(rel_end) = pattern[start..].find('}') {
            let end = start + rel_end;
            let prefix = &pattern[..start];
            let alternatives = &pattern[start + 1..end];
            let suffix = &pattern[end + 1..];

            let mut out = Vec::new();
            for alt in alternatives.split(',') {
                let combined = format!("{prefix}{alt}{suffix}");
                out.extend(expand_braces(&combined));
            }
            return out;
        }
    }
    vec![pattern.to_string()]
}

/// The longest leading run of path components that contains no glob
/// metacharacter, i.e. the directory a pattern's wildcard(s) are rooted at.
fn literal_prefix(pattern: &str) -> String {
    let is_absolute = pattern.starts_with('/');
    let parts: Vec<&str> = pattern.trim_start_matches('/').split('/').collect();

    let mut taken: Vec<&str> = Vec::new();
    for part in &parts {
        if part.chars().any(|c| matches!(c, '*' | '?' | '[' | ']' | '{' | '}')) {
            break;
        }
        taken.push(part);
    }

    // No wildcard anywhere: the whole pattern is a literal path, so the
    // directory prefix is everything but the final (filename) component.
    if taken.len() == parts.len() && !taken.is_empty() {
        taken.pop();
    }

    let body = taken.join("/");
    if is_absolute {
        format!("/{body}")
    } else {
        body
    }
}

/// Resolves a single (brace-free) pattern against the filesystem.
fn match_single_pattern(pattern: &str) -> Result<Vec<PathBuf>, CoreError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| CoreError::ConfigInvalid(format!("invalid pattern '{pattern}': {e}")))?;
    let matcher = glob.compile_matcher();

    let prefix = literal_prefix(pattern);
    let base_dir = if prefix.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(&prefix)
    };

    let mut out = Vec::new();
    for entry in WalkDir::new(&base_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(&base_dir).unwrap_or(path);
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        let candidate = if prefix.is_empty() {
            relative_str
        } else {
            format!("{}/{relative_str}", prefix.trim_end_matches('/'))
        };

        if matcher.is_match(&candidate) {
            out.push(path.to_path_buf());
        }
    }

    Ok(out)
}

/// Expands a pattern (with brace alternation and optional `**` recursion)
/// into an alphabetically-sorted, extension-filtered, deduplicated file list.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, CoreError> {
    let mut matches: Vec<PathBuf> = Vec::new();
    for branch in expand_braces(pattern) {
        matches.extend(match_single_pattern(&branch)?);
    }

    matches.retain(|p| has_valid_extension(p));
    matches.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    matches.dedup();

    if matches.is_empty() {
        return Err(CoreError::NoMatch {
            pattern: pattern.to_string(),
        });
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_single_brace_group() {
        let mut got = expand_braces("*.{graphql,gql}");
        got.sort();
        assert_eq!(got, vec!["*.gql".to_string(), "*.graphql".to_string()]);
    }

    #[test]
    fn expands_three_way_brace_group() {
        let mut got = expand_braces("*.{graphql,graphqls,gql}");
        got.sort();
        assert_eq!(
            got,
            vec![
                "*.gql".to_string(),
                "*.graphql".to_string(),
                "*.graphqls".to_string(),
            ]
        );
    }

    #[test]
    fn leaves_brace_free_pattern_untouched() {
        assert_eq!(expand_braces("schema/*.graphql"), vec!["schema/*.graphql"]);
    }

    #[test]
    fn literal_prefix_of_bare_wildcard_is_empty() {
        assert_eq!(literal_prefix("*.graphql"), "");
    }

    #[test]
    fn literal_prefix_stops_before_wildcard_segment() {
        assert_eq!(literal_prefix("schemas/*.graphql"), "schemas");
    }

    #[test]
    fn literal_prefix_of_recursive_pattern() {
        assert_eq!(literal_prefix("schemas/**/*.graphql"), "schemas");
    }

    #[test]
    fn literal_prefix_of_literal_path_excludes_filename() {
        assert_eq!(literal_prefix("schemas/user.graphql"), "schemas");
    }
}

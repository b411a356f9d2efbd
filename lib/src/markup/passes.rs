//! Individual Markup Transformer passes. Every function here is a pure
//! `&str -> String` transform; `transform()` in `mod.rs` drives them in the
//! fixed order the specification requires.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const ADMONITION_KEYWORDS: [&str; 5] = ["NOTE", "TIP", "IMPORTANT", "WARNING", "CAUTION"];

pub fn normalize_indentation(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();

    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<String> = lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(min_indent).collect()
            }
        })
        .collect();

    let start = dedented.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
    let end = dedented
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|p| p + 1)
        .unwrap_or(0);

    if start >= end {
        return String::new();
    }

    dedented[start..end].join("\n")
}

static MARKDOWN_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.*)$").unwrap());

pub fn markdown_headers(input: &str) -> String {
    MARKDOWN_HEADER_RE
        .replace_all(input, |caps: &Captures| {
            let level = caps[1].len() + 1;
            format!("{} {}", "=".repeat(level), &caps[2])
        })
        .into_owned()
}

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").unwrap());

pub fn fenced_code_blocks(input: &str) -> String {
    FENCE_RE
        .replace_all(input, |caps: &Captures| {
            let lang_raw = caps[1].trim();
            let lang = if lang_raw.is_empty() {
                "text".to_string()
            } else if lang_raw.eq_ignore_ascii_case("graphql") || lang_raw.eq_ignore_ascii_case("gql") {
                "kotlin".to_string()
            } else {
                lang_raw.to_string()
            };
            let body = caps[2].trim_end_matches('\n');
            let body = callouts(body);
            format!("[source,{lang}]\n----\n{body}\n----")
        })
        .into_owned()
}

static CALLOUT_PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)\((\d+)\)\s*$").unwrap());
static CALLOUT_SLASH_SLASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//\s*(\d+)\s*$").unwrap());
static CALLOUT_HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)#\s*(\d+)\s*$").unwrap());
static CALLOUT_BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*\s*(\d+)\s*\*/").unwrap());

pub fn callouts(input: &str) -> String {
    let step1 = CALLOUT_PAREN_RE.replace_all(input, "<$1>");
    let step2 = CALLOUT_SLASH_SLASH_RE.replace_all(&step1, "<$1>");
    let step3 = CALLOUT_HASH_RE.replace_all(&step2, "<$1>");
    let step4 = CALLOUT_BLOCK_COMMENT_RE.replace_all(&step3, "<$1>");
    step4.into_owned()
}

static HASH_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[#([A-Za-z0-9_\-]+)\]").unwrap());
static BARE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[([A-Za-z0-9_\-]+)\]$").unwrap());
static REF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{ref:([A-Za-z0-9_\-]+)\}").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{link:([^|}]+)\|([^}]+)\}").unwrap());

pub fn anchors_and_references(input: &str) -> String {
    let step1 = HASH_ANCHOR_RE.replace_all(input, "[[$1]]");
    let step2 = BARE_LABEL_RE.replace_all(&step1, |caps: &Captures| {
        let label = &caps[1];
        if ADMONITION_KEYWORDS.contains(&label.to_uppercase().as_str()) {
            caps[0].to_string()
        } else {
            format!("[[{label}]]")
        }
    });
    let step3 = REF_RE.replace_all(&step2, "<<$1>>");
    let step4 = LINK_RE.replace_all(&step3, "<<$1,$2>>");
    step4.into_owned()
}

fn is_table_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|') && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

pub fn tables(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim() == "|===" {
            out.push(lines[i].to_string());
            i += 1;
            while i < lines.len() {
                out.push(lines[i].to_string());
                let closed = lines[i].trim() == "|===";
                i += 1;
                if closed {
                    break;
                }
            }
            continue;
        }

        if lines[i].contains('|') {
            let start = i;
            let mut j = i;
            while j < lines.len() && lines[j].contains('|') && lines[j].trim() != "|===" {
                j += 1;
            }
            let region = &lines[start..j];
            out.push("[options=\"header\"]".to_string());
            out.push("|===".to_string());
            for row in region {
                if !is_table_separator_row(row) {
                    out.push(row.to_string());
                }
            }
            out.push("|===".to_string());
            i = j;
            continue;
        }

        out.push(lines[i].to_string());
        i += 1;
    }

    out.join("\n")
}

static BOLD_INLINE_ADMONITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\*\*(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\*\*:\s*(.+)$").unwrap()
});
static BARE_INLINE_ADMONITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(NOTE|TIP|IMPORTANT|WARNING|CAUTION):\s*(.+)$").unwrap());
static STANDALONE_ADMONITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\*\*(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\*\*\s*$").unwrap());

fn match_inline_admonition(line: &str) -> Option<(String, String)> {
    if let Some(caps) = BOLD_INLINE_ADMONITION_RE.captures(line) {
        return Some((caps[1].to_uppercase(), caps[2].to_string()));
    }
    if let Some(caps) = BARE_INLINE_ADMONITION_RE.captures(line) {
        return Some((caps[1].to_uppercase(), caps[2].to_string()));
    }
    None
}

fn match_standalone_admonition(line: &str) -> Option<String> {
    STANDALONE_ADMONITION_RE.captures(line).map(|c| c[1].to_uppercase())
}

pub fn admonitions(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some((kw, rest)) = match_inline_admonition(line) {
            out.push(format!("[{kw}]"));
            out.push("====".to_string());
            out.push(rest);
            out.push("====".to_string());
            i += 1;
            continue;
        }

        if let Some(kw) = match_standalone_admonition(line) {
            let mut content = Vec::new();
            let mut j = i + 1;
            while j < lines.len() {
                let l = lines[j];
                if l.trim().is_empty()
                    || match_inline_admonition(l).is_some()
                    || match_standalone_admonition(l).is_some()
                {
                    break;
                }
                content.push(l.to_string());
                j += 1;
            }
            out.push(format!("[{kw}]"));
            out.push("====".to_string());
            out.extend(content);
            out.push("====".to_string());
            i = j;
            continue;
        }

        out.push(line.to_string());
        i += 1;
    }

    out.join("\n")
}

static DEPRECATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@deprecated(\([^)]*\))?").unwrap());

pub fn deprecated_directives(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for m in DEPRECATED_RE.find_iter(input) {
        out.push_str(&input[last..m.start()]);
        let already_wrapped = input[..m.start()].ends_with('`') && input[m.end()..].starts_with('`');
        if already_wrapped {
            out.push_str(m.as_str());
        } else {
            out.push('`');
            out.push_str(m.as_str());
            out.push('`');
        }
        last = m.end();
    }
    out.push_str(&input[last..]);
    out
}

static ARGUMENTS_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:\.Arguments:|\*\*Arguments:\*\*)\s*$").unwrap());

pub fn arguments_heading(input: &str) -> String {
    ARGUMENTS_HEADING_RE.replace_all(input, ".Arguments").into_owned()
}

static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(^|\s)([-*]) ").unwrap());

pub fn list_normalization(input: &str) -> String {
    LIST_MARKER_RE.replace_all(input, "${1}* ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admonition_from_bold_form() {
        let got = admonitions("**NOTE**: Requires auth.");
        assert_eq!(got, "[NOTE]\n====\nRequires auth.\n====");
    }

    #[test]
    fn fenced_code_block_with_callouts() {
        let input = "```javascript\nconst x = 1; // 1\nconst y = 2; // 2\n```";
        let got = fenced_code_blocks(input);
        assert_eq!(
            got,
            "[source,javascript]\n----\nconst x = 1; <1>\nconst y = 2; <2>\n----"
        );
    }

    #[test]
    fn graphql_language_remaps_to_kotlin() {
        let got = fenced_code_blocks("```graphql\nquery { foo }\n```");
        assert!(got.starts_with("[source,kotlin]"));
    }

    #[test]
    fn empty_language_defaults_to_text() {
        let got = fenced_code_blocks("```\nplain\n```");
        assert!(got.starts_with("[source,text]"));
    }

    #[test]
    fn deprecated_gets_backtick_wrapped_once() {
        assert_eq!(deprecated_directives("Use @deprecated instead"), "Use `@deprecated` instead");
        assert_eq!(
            deprecated_directives("Use `@deprecated` instead"),
            "Use `@deprecated` instead"
        );
    }

    #[test]
    fn list_normalization_preserves_double_dash() {
        assert_eq!(list_normalization("- item one"), "* item one");
        assert_eq!(list_normalization("-- a horizontal rule"), "-- a horizontal rule");
    }

    #[test]
    fn arguments_heading_normalizes_both_shapes() {
        assert_eq!(arguments_heading(".Arguments:"), ".Arguments");
        assert_eq!(arguments_heading("**Arguments:**"), ".Arguments");
    }

    #[test]
    fn native_table_block_passes_through_verbatim() {
        let input = "|===\n| A | B\n|===";
        assert_eq!(tables(input), input);
    }

    #[test]
    fn markdown_table_gets_wrapped_and_separator_dropped() {
        let input = "| A | B |\n|---|---|\n| 1 | 2 |";
        let got = tables(input);
        assert!(got.starts_with("[options=\"header\"]\n|===\n"));
        assert!(!got.contains("---"));
        assert!(got.ends_with("|==="));
    }

    #[test]
    fn bare_square_bracket_label_becomes_anchor() {
        assert_eq!(anchors_and_references("[my-label]"), "[[my-label]]");
    }

    #[test]
    fn admonition_keyword_label_is_not_turned_into_anchor() {
        assert_eq!(anchors_and_references("[NOTE]"), "[NOTE]");
    }

    #[test]
    fn ref_and_link_shorthand_resolve() {
        assert_eq!(anchors_and_references("{ref:User}"), "<<User>>");
        assert_eq!(anchors_and_references("{link:User|the user type}"), "<<User,the user type>>");
    }
}

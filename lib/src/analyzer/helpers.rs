//! Small text-extraction helpers used both by the structured parser and
//! directly by the Renderer (e.g. for catalogue first-sentence rows).

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_BRACKETED_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[(\[{<]([^)\]}>]+)[)\]}>]\s*").unwrap());

/// Strips a leading `(T)`, `[T]`, `{T}`, or `<T>` type hint and returns
/// `(Some(T), rest)`, or `(None, text)` unchanged if no such hint is present.
pub fn extract_parameter_type(text: &str) -> (Option<String>, String) {
    match LEADING_BRACKETED_TYPE_RE.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).unwrap();
            let ty = caps[1].trim().to_string();
            (Some(ty), text[whole.end()..].to_string())
        }
        None => (None, text.to_string()),
    }
}

static DEFAULT_PAREN_COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(default:\s*([^)]+)\)").unwrap());
static DEFAULT_PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(default\s+([^)]+)\)").unwrap());
static DEFAULT_BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"default:\s*(\S+)").unwrap());

/// Strips `(default: X)`, `(default X)`, or `default: X` (in that priority
/// order) and returns `(Some(X), rest)`, or `(None, text)` if none match.
pub fn extract_default(text: &str) -> (Option<String>, String) {
    for re in [&*DEFAULT_PAREN_COLON_RE, &*DEFAULT_PAREN_RE, &*DEFAULT_BARE_RE] {
        if let Some(caps) = re.captures(text) {
            let whole = caps.get(0).unwrap();
            let value = caps[1].trim().to_string();
            let mut rest = String::with_capacity(text.len());
            rest.push_str(&text[..whole.start()]);
            rest.push_str(&text[whole.end()..]);
            return (Some(value), rest.trim().to_string());
        }
    }
    (None, text.to_string())
}

static LEADING_INTERNAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*INTERNAL\s*:?\s*").unwrap());
static LEADING_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\[[^\]]*\]\]\s*").unwrap());

/// Strips leading `INTERNAL` markers and AsciiDoc anchors, then returns
/// content up to the first `.` followed by whitespace or end-of-string; if no
/// such sentence boundary exists, returns the first 100 characters with an
/// ellipsis.
pub fn first_sentence(text: &str) -> String {
    let mut stripped = LEADING_INTERNAL_RE.replace(text, "").into_owned();
    stripped = LEADING_ANCHOR_RE.replace(&stripped, "").into_owned();
    let stripped = stripped.trim_start();

    let bytes = stripped.as_bytes();
    let mut boundary: Option<usize> = None;
    for (idx, ch) in stripped.char_indices() {
        if ch == '.' {
            let next = idx + ch.len_utf8();
            if next >= bytes.len() || stripped[next..].starts_with(char::is_whitespace) {
                boundary = Some(next);
                break;
            }
        }
    }

    match boundary {
        Some(end) => stripped[..end].trim().to_string(),
        None => {
            let char_count = stripped.chars().count();
            if char_count <= 100 {
                stripped.trim().to_string()
            } else {
                let truncated: String = stripped.chars().take(100).collect();
                format!("{}...", truncated.trim_end())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_parenthesized_type_hint() {
        let (ty, rest) = extract_parameter_type("(String) the user's handle");
        assert_eq!(ty.as_deref(), Some("String"));
        assert_eq!(rest.trim(), "the user's handle");
    }

    #[test]
    fn no_type_hint_leaves_text_untouched() {
        let (ty, rest) = extract_parameter_type("plain text");
        assert_eq!(ty, None);
        assert_eq!(rest, "plain text");
    }

    #[test]
    fn extracts_default_colon_form() {
        let (default, rest) = extract_default("the page size (default: 20)");
        assert_eq!(default.as_deref(), Some("20"));
        assert_eq!(rest, "the page size");
    }

    #[test]
    fn extracts_bare_default_form() {
        let (default, rest) = extract_default("the page size default: 20 items");
        assert_eq!(default.as_deref(), Some("20"));
        assert_eq!(rest, "the page size  items");
    }

    #[test]
    fn first_sentence_strips_internal_marker() {
        assert_eq!(first_sentence("INTERNAL: Fetches the user. See docs."), "Fetches the user.");
    }

    #[test]
    fn first_sentence_falls_back_to_truncation() {
        let long = "word ".repeat(40);
        let got = first_sentence(long.trim());
        assert!(got.ends_with("..."));
    }
}

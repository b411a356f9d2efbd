//! Description Analyzer: detects whether a free-text description uses `##`
//! sections or JSDoc-like `@param`/`@returns`/`@throws`/`@example` markers and,
//! if so, parses it into a [`ParsedDescription`]. Unstructured descriptions
//! pass straight through to the Markup Transformer untouched and carry only
//! `raw` plus their metrics.
//!
//! This module never fails: a malformed or idiosyncratic fragment simply
//! falls back to whatever partial structure it could recover.

mod helpers;

pub use helpers::{extract_default, extract_parameter_type, first_sentence};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    AnalyzerChangelogEntry, ChangelogActionKind, Complexity, DescriptionMetadata,
    DescriptionMetrics, ErrorEntry, Example, Parameter, ParsedDescription,
};

static HEADER_DETECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^##\s+\w+").unwrap());
static PARAM_DETECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@param\s+\w+").unwrap());
static RETURNS_DETECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@returns?\s+").unwrap());
static THROWS_DETECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@throws?\s+").unwrap());
static EXAMPLE_DETECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@example").unwrap());
static NAMED_HEADING_DETECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###?\s+(Overview|Parameters|Examples?)\b").unwrap());

static BLOCK_HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{2,3})\s+(.*)$").unwrap());

static PARAM_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@param\s+([\w.]+)\s*-?\s*(.*)$").unwrap());
static RETURNS_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@returns?\s+(.*)$").unwrap());
static THROWS_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@throws?\s+(\S+)\s*-?\s*(.*)$").unwrap());
static VERSION_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@version\s+(add|update|deprecate|remove)\.(\S+)\s*(.*)$").unwrap());
static VERSION_CONTINUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+-\s*(.*)$").unwrap());
static EXAMPLE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@example\s*(.*)$").unwrap());
static SINCE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@since\s+(\S+)\s*$").unwrap());
static DEPRECATED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@deprecated\s*(.*)$").unwrap());
static BETA_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@beta\s*$").unwrap());
static EXPERIMENTAL_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@experimental\s*$").unwrap());
static INTERNAL_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@internal\s*$").unwrap());
static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(\S*)\s*$").unwrap());

/// Does this description use `##`/`###` sections or JSDoc-like annotations?
pub fn is_structured(description: &str) -> bool {
    HEADER_DETECT_RE.is_match(description)
        || PARAM_DETECT_RE.is_match(description)
        || RETURNS_DETECT_RE.is_match(description)
        || THROWS_DETECT_RE.is_match(description)
        || EXAMPLE_DETECT_RE.is_match(description)
        || NAMED_HEADING_DETECT_RE.is_match(description)
}

enum SectionKind {
    Overview,
    Returns,
    Custom(String),
}

fn section_kind_for(title: &str) -> SectionKind {
    match title.trim().to_ascii_lowercase().as_str() {
        "overview" => SectionKind::Overview,
        "returns" | "return" => SectionKind::Returns,
        _ => SectionKind::Custom(title.trim().to_string()),
    }
}

fn title_mentions_example(title: &str) -> bool {
    title.to_ascii_lowercase().contains("example")
}

struct Block {
    title: Option<String>,
    lines: Vec<String>,
}

fn split_into_blocks(description: &str) -> Vec<Block> {
    let mut blocks = vec![Block {
        title: None,
        lines: Vec::new(),
    }];
    for line in description.lines() {
        if let Some(caps) = BLOCK_HEADER_RE.captures(line) {
            blocks.push(Block {
                title: Some(caps[2].trim().to_string()),
                lines: Vec::new(),
            });
        } else {
            blocks.last_mut().unwrap().lines.push(line.to_string());
        }
    }
    blocks
}

#[derive(Default)]
struct BlockResult {
    text: Vec<String>,
    example_ran: bool,
}

/// Accumulator for the structured-parse state threaded through every block.
#[derive(Default)]
struct ParseState {
    overview_lines: Vec<String>,
    returns: Option<String>,
    custom_sections: Vec<(String, Vec<String>)>,
    parameters: Vec<Parameter>,
    param_index: std::collections::HashMap<String, usize>,
    errors: Vec<ErrorEntry>,
    examples: Vec<Example>,
    changelog: Vec<AnalyzerChangelogEntry>,
    metadata: DescriptionMetadata,
}

impl ParseState {
    fn param_slot(&mut self, name: &str) -> &mut Parameter {
        if let Some(&idx) = self.param_index.get(name) {
            return &mut self.parameters[idx];
        }
        let idx = self.parameters.len();
        self.parameters.push(Parameter::new(name));
        self.param_index.insert(name.to_string(), idx);
        &mut self.parameters[idx]
    }

    fn add_param_line(&mut self, path: &str, desc: &str) {
        let (type_hint, after_type) = extract_parameter_type(desc);
        let (default, description) = extract_default(&after_type);

        match path.split_once('.') {
            None => {
                let slot = self.param_slot(path);
                slot.description = description;
                slot.type_hint = type_hint;
                slot.default = default;
            }
            Some((parent, child)) => {
                let parent_slot = self.param_slot(parent);
                if let Some(existing) = parent_slot.sub_params.iter_mut().find(|p| p.name == child) {
                    existing.description = description;
                    existing.type_hint = type_hint;
                    existing.default = default;
                } else {
                    let mut sub = Parameter::new(child);
                    sub.description = description;
                    sub.type_hint = type_hint;
                    sub.default = default;
                    parent_slot.sub_params.push(sub);
                }
            }
        }
    }
}

/// Processes one block's lines, extracting `@`-annotations into `state` and
/// returning the leftover plain-text lines plus whatever examples were pulled
/// out of fenced code blocks inside it.
fn process_block_lines(lines: &[String], treat_fences_as_examples: bool, state: &mut ParseState) -> Vec<String> {
    let mut text = Vec::new();
    let mut pending_example_title: Option<Option<String>> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_str();

        if let Some(caps) = PARAM_LINE_RE.captures(line) {
            state.add_param_line(&caps[1], caps[2].trim());
            i += 1;
            continue;
        }

        if let Some(caps) = VERSION_LINE_RE.captures(line) {
            let action = match &caps[1] {
                "add" => ChangelogActionKind::Add,
                "update" => ChangelogActionKind::Update,
                "deprecate" => ChangelogActionKind::Deprecate,
                _ => ChangelogActionKind::Remove,
            };
            let version = caps[2].to_string();
            let mut desc = caps[3].trim().to_string();
            let mut j = i + 1;
            while j < lines.len() {
                if let Some(cont) = VERSION_CONTINUATION_RE.captures(lines[j].as_str()) {
                    if !desc.is_empty() {
                        desc.push(' ');
                    }
                    desc.push_str(cont[1].trim());
                    j += 1;
                } else {
                    break;
                }
            }
            state.changelog.push(AnalyzerChangelogEntry {
                action,
                version,
                description: desc,
            });
            i = j;
            continue;
        }

        if let Some(caps) = THROWS_LINE_RE.captures(line) {
            state.errors.push(ErrorEntry {
                code: caps[1].to_string(),
                description: caps[2].trim().to_string(),
            });
            i += 1;
            continue;
        }

        if let Some(caps) = RETURNS_LINE_RE.captures(line) {
            state.returns = Some(caps[1].trim().to_string());
            i += 1;
            continue;
        }

        if let Some(caps) = EXAMPLE_LINE_RE.captures(line) {
            let title = caps[1].trim();
            pending_example_title = Some(if title.is_empty() { None } else { Some(title.to_string()) });
            i += 1;
            continue;
        }

        if let Some(caps) = SINCE_LINE_RE.captures(line) {
            state.metadata.since = Some(caps[1].to_string());
            i += 1;
            continue;
        }

        if let Some(caps) = DEPRECATED_LINE_RE.captures(line) {
            state.metadata.deprecated = Some(caps[1].trim().to_string());
            i += 1;
            continue;
        }

        if BETA_LINE_RE.is_match(line) {
            state.metadata.beta = true;
            i += 1;
            continue;
        }

        if EXPERIMENTAL_LINE_RE.is_match(line) {
            state.metadata.experimental = true;
            i += 1;
            continue;
        }

        if INTERNAL_LINE_RE.is_match(line) {
            state.metadata.internal = true;
            i += 1;
            continue;
        }

        if let Some(caps) = FENCE_OPEN_RE.captures(line) {
            let lang_raw = caps[1].trim();
            let mut code_lines = Vec::new();
            let mut j = i + 1;
            while j < lines.len() && lines[j].trim() != "```" {
                code_lines.push(lines[j].clone());
                j += 1;
            }
            let code = code_lines.join("\n");
            let wants_example = treat_fences_as_examples || pending_example_title.is_some();
            if wants_example {
                let language = if lang_raw.is_empty() {
                    "graphql".to_string()
                } else {
                    lang_raw.to_string()
                };
                let title = pending_example_title.take().flatten();
                state.examples.push(Example {
                    title,
                    language,
                    code,
                    description: None,
                });
            } else {
                text.push(line.to_string());
                text.extend(code_lines);
                text.push("```".to_string());
            }
            pending_example_title = None;
            i = j + 1;
            continue;
        }

        text.push(line.to_string());
        i += 1;
    }

    text
}

/// Parses a structured description into its typed section model.
pub fn parse_structured(description: &str) -> ParsedDescription {
    let blocks = split_into_blocks(description);
    let mut state = ParseState::default();

    for block in blocks {
        match &block.title {
            None => {
                let text = process_block_lines(&block.lines, false, &mut state);
                state.overview_lines.extend(text);
            }
            Some(title) => {
                let wants_examples = title_mentions_example(title);
                let text = process_block_lines(&block.lines, wants_examples, &mut state);
                match section_kind_for(title) {
                    SectionKind::Overview => state.overview_lines.extend(text),
                    SectionKind::Returns => {
                        let joined = text.join("\n").trim().to_string();
                        if !joined.is_empty() {
                            state.returns = Some(joined);
                        }
                    }
                    SectionKind::Custom(name) => {
                        if let Some(existing) = state.custom_sections.iter_mut().find(|(n, _)| n == &name) {
                            existing.1.extend(text);
                        } else {
                            state.custom_sections.push((name, text));
                        }
                    }
                }
            }
        }
    }

    let overview = state.overview_lines.join("\n").trim().to_string();
    let custom_sections: Vec<(String, String)> = state
        .custom_sections
        .into_iter()
        .map(|(name, lines)| (name, lines.join("\n").trim().to_string()))
        .filter(|(_, content)| !content.is_empty())
        .collect();

    let has_overview = !overview.is_empty();
    let has_parameters = !state.parameters.is_empty();
    let has_returns = state.returns.as_deref().is_some_and(|r| !r.trim().is_empty());
    let has_examples = !state.examples.is_empty();
    let has_errors = !state.errors.is_empty();
    let has_changelog = !state.changelog.is_empty();

    let word_count = description.split_whitespace().count();
    let metrics = compute_metrics(
        word_count,
        has_overview,
        has_parameters,
        has_returns,
        has_examples,
        has_errors,
        has_changelog,
    );

    ParsedDescription {
        is_structured: true,
        raw: description.to_string(),
        overview,
        parameters: state.parameters,
        returns: state.returns,
        errors: state.errors,
        examples: state.examples,
        changelog: state.changelog,
        metadata: state.metadata,
        custom_sections,
        metrics,
    }
}

fn compute_metrics(
    word_count: usize,
    has_overview: bool,
    has_parameters: bool,
    has_returns: bool,
    has_examples: bool,
    has_errors: bool,
    has_changelog: bool,
) -> DescriptionMetrics {
    let mut score = 0.0f32;
    if has_overview {
        score += 0.30;
    }
    if has_parameters {
        score += 0.20;
    }
    if has_returns {
        score += 0.20;
    }
    if has_examples {
        score += 0.15;
    }
    if has_errors {
        score += 0.15;
    }

    let complexity = if word_count <= 50 {
        Complexity::Simple
    } else if word_count <= 200 {
        Complexity::Moderate
    } else {
        Complexity::Complex
    };

    DescriptionMetrics {
        word_count,
        completeness_pct: (score * 100.0).round().clamp(0.0, 100.0) as u8,
        complexity,
        has_overview,
        has_parameters,
        has_returns,
        has_examples,
        has_errors,
        has_changelog,
    }
}

/// Parses an unstructured description: no section model, just `raw` and
/// metrics computed over the whole text as a single overview.
pub fn parse_unstructured(description: &str) -> ParsedDescription {
    let word_count = description.split_whitespace().count();
    let has_overview = !description.trim().is_empty();
    let metrics = compute_metrics(word_count, has_overview, false, false, false, false, false);

    ParsedDescription {
        is_structured: false,
        raw: description.to_string(),
        overview: String::new(),
        parameters: Vec::new(),
        returns: None,
        errors: Vec::new(),
        examples: Vec::new(),
        changelog: Vec::new(),
        metadata: DescriptionMetadata::default(),
        custom_sections: Vec::new(),
        metrics,
    }
}

/// Detects structure and routes to the matching parse strategy. Never fails.
pub fn analyze(description: &str) -> ParsedDescription {
    if is_structured(description) {
        parse_structured(description)
    } else {
        parse_unstructured(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstructured_description_has_no_sections() {
        let parsed = analyze("Just a plain sentence about this field.");
        assert!(!parsed.is_structured);
        assert!(parsed.parameters.is_empty());
    }

    #[test]
    fn detects_jsdoc_style_without_headers() {
        assert!(is_structured("Fetches a user.\n\n@param id - the user id\n@returns the user"));
    }

    #[test]
    fn param_order_follows_first_appearance() {
        let parsed = parse_structured("@param b - second\n@param a - first\n");
        let names: Vec<&str> = parsed.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn nested_sub_param_created_with_parent() {
        let parsed = parse_structured("@param filter.status - the status to filter by\n");
        assert_eq!(parsed.parameters.len(), 1);
        assert_eq!(parsed.parameters[0].name, "filter");
        assert_eq!(parsed.parameters[0].sub_params[0].name, "status");
    }

    #[test]
    fn param_line_extracts_type_hint_and_default() {
        let parsed = parse_structured("@param limit - (Int) max rows to return (default: 20)\n");
        let p = &parsed.parameters[0];
        assert_eq!(p.type_hint.as_deref(), Some("Int"));
        assert_eq!(p.default.as_deref(), Some("20"));
        assert_eq!(p.description, "max rows to return");
    }

    #[test]
    fn returns_last_one_wins() {
        let parsed = parse_structured("@returns first\n@returns second\n");
        assert_eq!(parsed.returns.as_deref(), Some("second"));
    }

    #[test]
    fn version_annotation_with_continuation_lines() {
        let parsed = parse_structured("@version add.1.0.0 introduced\n  - detail one\n  - detail two\n");
        assert_eq!(parsed.changelog.len(), 1);
        assert_eq!(parsed.changelog[0].version, "1.0.0");
        assert_eq!(parsed.changelog[0].description, "introduced detail one detail two");
    }

    #[test]
    fn overview_before_first_header_strips_at_lines() {
        let parsed = parse_structured("Fetches the thing.\n@since 1.2.0\n\n## Parameters\n@param id - the id\n");
        assert_eq!(parsed.overview, "Fetches the thing.");
        assert_eq!(parsed.metadata.since.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn unrecognized_heading_lands_in_custom_sections() {
        let parsed = parse_structured("## Notes\nSomething worth knowing.\n");
        assert_eq!(parsed.custom_sections, vec![("Notes".to_string(), "Something worth knowing.".to_string())]);
    }

    #[test]
    fn fenced_block_inside_example_heading_becomes_example() {
        let parsed = parse_structured("## Examples\n```graphql\nquery { ping }\n```\n");
        assert_eq!(parsed.examples.len(), 1);
        assert_eq!(parsed.examples[0].language, "graphql");
        assert!(parsed.examples[0].code.contains("ping"));
    }

    #[test]
    fn metrics_completeness_and_complexity() {
        let parsed = parse_structured(
            "Overview text here.\n@param id - the id\n@returns the value\n## Examples\n```graphql\nquery{x}\n```\n",
        );
        assert!(parsed.metrics.has_overview);
        assert!(parsed.metrics.has_parameters);
        assert!(parsed.metrics.has_returns);
        assert!(parsed.metrics.has_examples);
        assert!(!parsed.metrics.has_errors);
        assert_eq!(parsed.metrics.completeness_pct, 85);
        assert_eq!(parsed.metrics.complexity, Complexity::Simple);
    }
}

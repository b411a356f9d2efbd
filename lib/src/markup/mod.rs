//! Markup Transformer: rewrites Markdown-flavoured description text into
//! AsciiDoc. The ten passes run in a fixed order — later passes assume
//! earlier ones already ran (tables, for instance, must not eat a native
//! AsciiDoc `|===` block that admonitions or callouts haven't touched yet).
//! `transform` is idempotent: feeding it its own output is a no-op.

mod passes;

pub fn transform(input: &str) -> String {
    let text = passes::normalize_indentation(input);
    let text = passes::markdown_headers(&text);
    let text = passes::fenced_code_blocks(&text);
    let text = passes::callouts(&text);
    let text = passes::anchors_and_references(&text);
    let text = passes::tables(&text);
    let text = passes::admonitions(&text);
    let text = passes::deprecated_directives(&text);
    let text = passes::arguments_heading(&text);
    passes::list_normalization(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_is_idempotent() {
        let input = "  # Title\n\n  **NOTE**: Careful with @deprecated fields.\n\n  - one\n  - two\n";
        let once = transform(input);
        let twice = transform(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn full_pipeline_handles_header_admonition_and_list() {
        let input = "# Overview\n\n**WARNING**: This field is slow.\n\n- first\n- second\n";
        let got = transform(input);
        assert!(got.starts_with("== Overview"));
        assert!(got.contains("[WARNING]\n====\nThis field is slow.\n===="));
        assert!(got.contains("* first"));
        assert!(got.contains("* second"));
    }
}

//! Per-entity templates. None of these recurse through the schema — each is
//! handed exactly the `Definition`/`Field` it renders plus read-only access
//! to the `SchemaIndex` for cross-reference resolution.

use std::collections::HashMap;

use crate::analyzer;
use crate::changelog;
use crate::config::RenderOptions;
use crate::model::{Argument, DirectiveApplication, Field, Parameter, SchemaIndex};
use crate::resolver;

pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Looks up the raw (unprotected) text for `path` — a definition name or
/// `Definition.field` path — falling back to the SDL-parsed, protected
/// description when assembly never recorded one (e.g. a description with no
/// embedded code example).
pub fn raw_description<'a>(path: &str, fallback: &'a str, raw_descriptions: &'a HashMap<String, String>) -> &'a str {
    raw_descriptions.get(path).map(|s| s.as_str()).unwrap_or(fallback)
}

fn render_parameter_line(p: &Parameter, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut out = format!("{indent}* `{}`", p.name);
    if !p.description.trim().is_empty() {
        out.push_str(&format!(" - {}", crate::markup::transform(&p.description)));
    }
    out.push('\n');
    for sub in &p.sub_params {
        out.push_str(&render_parameter_line(sub, depth + 1));
    }
    out
}

/// Runs the full per-description pipeline (Description Analyzer →
/// Changelog-line stripping → Markup Transformer) and renders the result as
/// an AsciiDoc fragment, without the `.Changelog` block (callers add that
/// separately, gated on `include_changelog`).
pub fn render_description(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let parsed = analyzer::analyze(raw);
    let cleaned = changelog::strip_lines(raw);

    if !parsed.is_structured {
        return crate::markup::transform(&cleaned);
    }

    let mut out = String::new();

    if !parsed.overview.trim().is_empty() {
        out.push_str(&crate::markup::transform(&parsed.overview));
        out.push_str("\n\n");
    }

    if !parsed.parameters.is_empty() {
        out.push_str(".Parameters\n");
        for p in &parsed.parameters {
            out.push_str(&render_parameter_line(p, 0));
        }
        out.push('\n');
    }

    if let Some(returns) = &parsed.returns {
        if !returns.trim().is_empty() {
            out.push_str(".Returns\n");
            out.push_str(&crate::markup::transform(returns));
            out.push_str("\n\n");
        }
    }

    if !parsed.errors.is_empty() {
        out.push_str(".Errors\n");
        for e in &parsed.errors {
            out.push_str(&format!("* `{}`: {}\n", e.code, crate::markup::transform(&e.description)));
        }
        out.push('\n');
    }

    if !parsed.examples.is_empty() {
        out.push_str(".Examples\n");
        for ex in &parsed.examples {
            if let Some(title) = &ex.title {
                out.push_str(&format!(".{title}\n"));
            }
            out.push_str(&format!("[source,{}]\n----\n{}\n----\n\n", ex.language, ex.code));
        }
    }

    for (title, content) in &parsed.custom_sections {
        out.push_str(&format!(".{title}\n{}\n\n", crate::markup::transform(content)));
    }

    out.trim_end().to_string()
}

pub fn render_changelog_tag(raw: &str, options: &RenderOptions) -> String {
    if !options.include_changelog {
        return String::new();
    }
    let block = changelog::render(raw);
    if block.is_empty() {
        return String::new();
    }
    format!("// tag::changelog[]{block}// end::changelog[]\n")
}

/// Renders an arguments table. `owner_path` is the raw-description key
/// prefix the argument names hang off of — `Type.field` for an operation or
/// object/interface field, or just the directive name for a directive's own
/// arguments.
pub fn render_args_table(
    args: &[Argument],
    owner_path: &str,
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
) -> String {
    let mut out = String::from("[options=\"header\"]\n|===\n| Name | Type | Description | Default\n\n");
    for arg in args {
        let type_ref = resolver::resolve(&arg.type_expr, schema);
        let default = arg.default_value.clone().unwrap_or_default();
        let raw_path = format!("{owner_path}.{}", arg.name);
        let raw_desc = raw_description(&raw_path, &arg.description, raw_descriptions);
        out.push_str(&format!(
            "| {}\n| {}\n| {}\n| {}\n\n",
            arg.name,
            type_ref,
            render_description(raw_desc),
            default
        ));
    }
    out.push_str("|===\n");
    out
}

pub fn render_directives_block(directives: &[DirectiveApplication]) -> String {
    let mut out = String::from("\n.Directives\n");
    for d in directives {
        let args_str: Vec<String> = d.arguments.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        if args_str.is_empty() {
            out.push_str(&format!("* `@{}`\n", d.name));
        } else {
            out.push_str(&format!("* `@{}({})`\n", d.name, args_str.join(", ")));
        }
    }
    out
}

fn render_signature(field: &Field) -> String {
    if field.arguments.is_empty() {
        format!("{}: {}", field.name, resolver::resolve_for_signature(&field.type_expr))
    } else {
        let args: Vec<String> = field
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.name, resolver::resolve_for_signature(&a.type_expr)))
            .collect();
        format!(
            "{}({}): {}",
            field.name,
            args.join(", "),
            resolver::resolve_for_signature(&field.type_expr)
        )
    }
}

/// Renders one root operation (a field of `Query`/`Mutation`/`Subscription`).
pub fn render_operation(
    kind_tag: &str,
    owner_name: &str,
    field: &Field,
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
) -> String {
    let snake = to_snake_case(&field.name);
    let raw_path = format!("{owner_name}.{}", field.name);
    let raw_desc = raw_description(&raw_path, &field.description, raw_descriptions);

    let mut out = String::new();
    out.push_str(&format!("\n// tag::{kind_tag}-{}[]\n", field.name));
    out.push_str(&format!("=== {}\n", field.name));
    out.push_str(&format!("[[{}]]\n[[{snake}]]\n\n", field.name));

    out.push_str("// tag::description[]\n");
    out.push_str(&render_description(raw_desc));
    out.push_str("\n// end::description[]\n\n");

    out.push_str("// tag::definition[]\n");
    out.push_str(&format!("[source,graphql]\n----\n{}\n----\n", render_signature(field)));
    if !field.arguments.is_empty() {
        out.push_str("\n.Arguments\n");
        out.push_str(&render_args_table(&field.arguments, &raw_path, schema, raw_descriptions));
    }
    if !field.directives_applied.is_empty() {
        out.push_str(&render_directives_block(&field.directives_applied));
    }
    out.push_str("// end::definition[]\n");

    out.push_str(&render_changelog_tag(raw_desc, options));
    out.push_str(&format!("// end::{kind_tag}-{}[]\n", field.name));
    out
}

/// Renders a `fields` table; field order is preserved as declared in the SDL
/// (the invariant only requires alphabetical order *across* entities, never
/// within one).
pub fn render_fields_table(
    fields: &[Field],
    owner_name: &str,
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
) -> String {
    let mut out = String::from("[options=\"header\"]\n|===\n| Name | Type | Description\n\n");
    for f in fields {
        let raw_path = format!("{owner_name}.{}", f.name);
        let raw_desc = raw_description(&raw_path, &f.description, raw_descriptions);
        out.push_str(&format!(
            "| {}\n| {}\n| {}\n\n",
            f.name,
            resolver::resolve(&f.type_expr, schema),
            render_description(raw_desc)
        ));
    }
    out.push_str("|===\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("getUserById"), "get_user_by_id");
        assert_eq!(to_snake_case("ping"), "ping");
    }

    #[test]
    fn render_description_falls_back_to_markup_for_unstructured_text() {
        let got = render_description("# Title\n\nSome body text.");
        assert!(got.starts_with("== Title"));
    }

    #[test]
    fn render_description_handles_structured_sections() {
        let got = render_description("Overview text.\n@param id - the id\n@returns the value\n");
        assert!(got.contains("Overview text."));
        assert!(got.contains(".Parameters"));
        assert!(got.contains(".Returns"));
    }

    #[test]
    fn render_args_table_restores_raw_example_over_protected_placeholder() {
        let schema = SchemaIndex::default();
        let arg = Argument {
            name: "id".to_string(),
            type_expr: "ID!".to_string(),
            description: "[CODE_BLOCK_REMOVED]".to_string(),
            default_value: None,
        };
        let mut raw_descriptions = HashMap::new();
        raw_descriptions.insert(
            "Query.user.id".to_string(),
            "Example:\n[source,graphql]\n----\nquery { user(id: 1) }\n----\n".to_string(),
        );
        let table = render_args_table(&[arg], "Query.user", &schema, &raw_descriptions);
        assert!(table.contains("query { user(id: 1) }"));
        assert!(!table.contains("[CODE_BLOCK_REMOVED]"));
    }
}

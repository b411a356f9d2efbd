//! Renderer: drives the per-entity templates by composition (never by
//! recursing through the schema), sorts every collection alphabetically, and
//! brackets each section and entity in AsciiDoc tag markers for selective
//! inclusion downstream. The top-level entry point is [`generate`].

pub mod catalogue;
mod templates;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;

use crate::assembler;
use crate::assembler::pattern;
use crate::config::RenderOptions;
use crate::error::CoreError;
use crate::filter;
use crate::model::{Definition, DefinitionKind, Field, GenerationStats, SchemaIndex};
use crate::resolver;
use crate::sdl;

pub use templates::{render_description, to_snake_case};

/// The single pipeline entry point. Builds the full document (or, in
/// catalogue mode, the reduced summary-table document) and returns it
/// alongside the counts a caller can print as its own metrics table.
pub fn generate(options: &RenderOptions) -> Result<(String, GenerationStats), CoreError> {
    options.validate()?;

    let files = resolve_files(options)?;
    let assembled = assembler::assemble(&files)?;
    let schema = sdl::build_schema_index(&assembled.combined_sdl)?;

    let mut stats = GenerationStats {
        files_assembled: assembled.file_count,
        definitions_discovered: assembled.definitions_discovered,
        ..Default::default()
    };

    let span = tracing::info_span!("render", catalogue = options.catalogue, sections = 8);
    let _enter = span.enter();

    let text = if options.catalogue {
        catalogue::render(&schema, &assembled.raw_descriptions, options, &mut stats)
    } else {
        render_full(&schema, &assembled.raw_descriptions, options, &mut stats)
    };

    Ok((text, stats))
}

fn resolve_files(options: &RenderOptions) -> Result<Vec<PathBuf>, CoreError> {
    if let Some(file) = &options.schema_file {
        if !pattern::has_valid_extension(file) {
            return Err(CoreError::BadExtension { path: file.clone() });
        }
        return Ok(vec![file.clone()]);
    }
    let schema_pattern = options
        .schema_pattern
        .as_ref()
        .expect("validate() guarantees exactly one of schema_file/schema_pattern");
    pattern::expand_pattern(schema_pattern)
}

fn header_matter(options: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(":revdate: {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!(":commandline: {}\n", options.command_line.as_deref().unwrap_or("")));
    out.push_str("include::_attributes.adoc[]\n");
    out
}

fn section(tag: &str, title: &str, subject_plural: &str, body: String) -> String {
    let mut out = format!("\n// tag::{tag}[]\n== {title}\n\n");
    if body.trim().is_empty() {
        out.push_str(&format!("[NOTE]\n====\nNo {subject_plural} exist in this schema.\n===="));
        out.push('\n');
    } else {
        out.push_str(&body);
    }
    out.push_str(&format!("// end::{tag}[]\n"));
    out
}

fn sorted_names<'a>(defs: impl Iterator<Item = &'a Definition>, kind: DefinitionKind) -> Vec<&'a Definition> {
    let mut out: Vec<&Definition> = defs.filter(|d| d.kind == kind).collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn render_operations_section(
    kind_tag: &str,
    owner_name: Option<&str>,
    fields: &[Field],
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
    stats: &mut GenerationStats,
    counter: impl Fn(&mut GenerationStats),
) -> String {
    let Some(owner_name) = owner_name else {
        return String::new();
    };

    let mut included: Vec<&Field> = fields
        .iter()
        .filter(|f| filter::should_include(f, options, stats))
        .collect();
    included.sort_by(|a, b| a.name.cmp(&b.name));

    let mut body = String::new();
    for field in included {
        counter(stats);
        body.push_str(&templates::render_operation(kind_tag, owner_name, field, schema, raw_descriptions, options));
    }
    body
}

fn render_type_definition(
    kind_tag: &str,
    def: &Definition,
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
) -> String {
    let raw_desc = templates::raw_description(&def.name, &def.description, raw_descriptions);

    let mut out = String::new();
    out.push_str(&format!("\n// tag::{kind_tag}-{}[]\n", def.name));
    out.push_str(&format!("=== {}\n[[{}]]\n\n", def.name, def.name));

    out.push_str("// tag::description[]\n");
    out.push_str(&templates::render_description(raw_desc));
    out.push_str("\n// end::description[]\n\n");

    out.push_str("// tag::definition[]\n");
    if !def.interfaces_implemented.is_empty() {
        let impls: Vec<String> = def.interfaces_implemented.iter().map(|i| resolver::resolve(i, schema)).collect();
        out.push_str(&format!("Implements: {}\n\n", impls.join(", ")));
    }
    if !def.union_members.is_empty() {
        let mut members = def.union_members.clone();
        members.sort();
        let rendered: Vec<String> = members.iter().map(|m| resolver::resolve(m, schema)).collect();
        out.push_str(&format!("Union of: {}\n\n", rendered.join(", ")));
    }
    if !def.fields.is_empty() {
        out.push_str(&templates::render_fields_table(&def.fields, &def.name, schema, raw_descriptions));
    }
    if !def.directives_applied.is_empty() {
        out.push_str(&templates::render_directives_block(&def.directives_applied));
    }
    out.push_str("// end::definition[]\n");

    out.push_str(&templates::render_changelog_tag(raw_desc, options));
    out.push_str(&format!("// end::{kind_tag}-{}[]\n", def.name));
    out
}

fn render_enum_definition(def: &Definition, raw_descriptions: &HashMap<String, String>, options: &RenderOptions) -> String {
    let raw_desc = templates::raw_description(&def.name, &def.description, raw_descriptions);

    let mut out = String::new();
    out.push_str(&format!("\n// tag::enum-{}[]\n", def.name));
    out.push_str(&format!("=== {}\n[[{}]]\n\n", def.name, def.name));

    out.push_str("// tag::description[]\n");
    out.push_str(&templates::render_description(raw_desc));
    out.push_str("\n// end::description[]\n\n");

    out.push_str("// tag::definition[]\n.Values\n");
    for value in &def.enum_values {
        let raw_path = format!("{}.{}", def.name, value.name);
        let value_raw = templates::raw_description(&raw_path, &value.description, raw_descriptions);
        let rendered_desc = templates::render_description(value_raw);
        if rendered_desc.is_empty() {
            out.push_str(&format!("* `{}`\n", value.name));
        } else {
            out.push_str(&format!("* `{}` - {}\n", value.name, rendered_desc));
        }
    }
    out.push_str("// end::definition[]\n");

    out.push_str(&templates::render_changelog_tag(raw_desc, options));
    out.push_str(&format!("// end::enum-{}[]\n", def.name));
    out
}

fn render_directive_definition(def: &Definition, schema: &SchemaIndex, raw_descriptions: &HashMap<String, String>, options: &RenderOptions) -> String {
    let raw_desc = templates::raw_description(&def.name, &def.description, raw_descriptions);
    let shape = def.directive_shape.clone().unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!("\n// tag::directive-{}[]\n", def.name));
    out.push_str(&format!("=== @{}\n[[{}]]\n\n", def.name, def.name));

    out.push_str("// tag::description[]\n");
    out.push_str(&templates::render_description(raw_desc));
    out.push_str("\n// end::description[]\n\n");

    out.push_str("// tag::definition[]\n");
    out.push_str(&format!("Locations: {}\n\n", shape.locations.join(", ")));
    out.push_str(&format!("Repeatable: {}\n\n", shape.repeatable));
    if !def.arguments.is_empty() {
        out.push_str(".Arguments\n");
        out.push_str(&templates::render_args_table(&def.arguments, &def.name, schema, raw_descriptions));
    }
    out.push_str("// end::definition[]\n");

    out.push_str(&templates::render_changelog_tag(raw_desc, options));
    out.push_str(&format!("// end::directive-{}[]\n", def.name));
    out
}

fn render_scalar_definition(def: &Definition, raw_descriptions: &HashMap<String, String>, options: &RenderOptions) -> String {
    let raw_desc = templates::raw_description(&def.name, &def.description, raw_descriptions);

    let mut out = String::new();
    out.push_str(&format!("\n// tag::scalar-{}[]\n", def.name));
    out.push_str(&format!("=== {}\n[[{}]]\n\n", def.name, def.name));
    out.push_str("// tag::description[]\n");
    out.push_str(&templates::render_description(raw_desc));
    out.push_str("\n// end::description[]\n\n");
    out.push_str(&templates::render_changelog_tag(raw_desc, options));
    out.push_str(&format!("// end::scalar-{}[]\n", def.name));
    out
}

fn render_full(
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
    stats: &mut GenerationStats,
) -> String {
    let mut out = header_matter(options);

    if options.include_queries {
        let body = render_operations_section(
            "query",
            schema.query_type.as_deref(),
            schema.query_fields(),
            schema,
            raw_descriptions,
            options,
            stats,
            |s| s.queries += 1,
        );
        out.push_str(&section("queries", "Queries", "queries", body));
    }

    if options.include_mutations {
        let body = render_operations_section(
            "mutation",
            schema.mutation_type.as_deref(),
            schema.mutation_fields(),
            schema,
            raw_descriptions,
            options,
            stats,
            |s| s.mutations += 1,
        );
        out.push_str(&section("mutations", "Mutations", "mutations", body));
    }

    if options.include_subscriptions {
        let body = render_operations_section(
            "subscription",
            schema.subscription_type.as_deref(),
            schema.subscription_fields(),
            schema,
            raw_descriptions,
            options,
            stats,
            |s| s.subscriptions += 1,
        );
        out.push_str(&section("subscriptions", "Subscriptions", "subscriptions", body));
    }

    if options.include_types {
        let root_names = [
            schema.query_type.clone(),
            schema.mutation_type.clone(),
            schema.subscription_type.clone(),
        ];
        let objects_and_interfaces: Vec<&Definition> = schema
            .definitions
            .values()
            .filter(|d| matches!(d.kind, DefinitionKind::Object | DefinitionKind::Interface | DefinitionKind::Union))
            .filter(|d| !root_names.iter().any(|r| r.as_deref() == Some(d.name.as_str())))
            .collect();
        let mut sorted = objects_and_interfaces;
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let mut body = String::new();
        for def in sorted {
            stats.types += 1;
            let kind_tag = match def.kind {
                DefinitionKind::Interface => "interface",
                DefinitionKind::Union => "union",
                _ => "type",
            };
            body.push_str(&render_type_definition(kind_tag, def, schema, raw_descriptions, options));
        }
        out.push_str(&section("types", "Types", "types", body));
    }

    if options.include_enums {
        let mut body = String::new();
        for def in sorted_names(schema.definitions.values(), DefinitionKind::Enum) {
            stats.enums += 1;
            body.push_str(&render_enum_definition(def, raw_descriptions, options));
        }
        out.push_str(&section("enums", "Enums", "enums", body));
    }

    if options.include_inputs {
        let mut body = String::new();
        for def in sorted_names(schema.definitions.values(), DefinitionKind::Input) {
            stats.inputs += 1;
            body.push_str(&render_type_definition("input", def, schema, raw_descriptions, options));
        }
        out.push_str(&section("inputs", "Inputs", "inputs", body));
    }

    if options.include_directives {
        let mut body = String::new();
        for def in sorted_names(schema.definitions.values(), DefinitionKind::Directive) {
            stats.directives += 1;
            body.push_str(&render_directive_definition(def, schema, raw_descriptions, options));
        }
        out.push_str(&section("directives", "Directives", "directives", body));
    }

    if options.include_scalars {
        let mut body = String::new();
        for def in sorted_names(schema.definitions.values(), DefinitionKind::Scalar) {
            stats.scalars += 1;
            body.push_str(&render_scalar_definition(def, raw_descriptions, options));
        }
        out.push_str(&section("scalars", "Scalars", "scalars", body));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_schema(contents: &str) -> tempfile_schema::TempSchema {
        tempfile_schema::TempSchema::new(contents)
    }

    /// Minimal drop-cleanup temp-file helper; avoids pulling in a `tempfile`
    /// dependency just for these unit tests.
    mod tempfile_schema {
        use std::fs;
        use std::path::PathBuf;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        pub struct TempSchema {
            pub path: PathBuf,
        }

        impl TempSchema {
            pub fn new(contents: &str) -> Self {
                let id = COUNTER.fetch_add(1, Ordering::SeqCst);
                let mut path = std::env::temp_dir();
                path.push(format!("render_test_{}_{id}.graphql", std::process::id()));
                fs::write(&path, contents).unwrap();
                Self { path }
            }
        }

        impl Drop for TempSchema {
            fn drop(&mut self) {
                let _ = fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn generate_renders_all_sections_and_counts_stats() {
        let sdl = r#"
            """Fetches things."""
            type Query {
                ping: String
                """Finds a user by id."""
                user(id: ID!): User
            }

            """A registered user"""
            type User {
                id: ID!
                name: String
            }
        "#;
        let tmp = write_temp_schema(sdl);
        let mut writer = std::io::sink();
        writer.write_all(b"").unwrap();

        let mut options = RenderOptions::with_all_sections();
        options.schema_file = Some(tmp.path.clone());
        let (doc, stats) = generate(&options).unwrap();

        assert!(doc.contains("// tag::queries[]"));
        assert!(doc.contains("=== ping"));
        assert!(doc.contains("=== user"));
        assert!(doc.contains("=== User"));
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.types, 1);
    }

    #[test]
    fn empty_section_emits_note_admonition() {
        let sdl = "type Query { ping: String }\n";
        let tmp = write_temp_schema(sdl);
        let mut options = RenderOptions::with_all_sections();
        options.schema_file = Some(tmp.path.clone());
        let (doc, _stats) = generate(&options).unwrap();
        assert!(doc.contains("No mutations exist in this schema."));
    }

    // render_type_definition never touches the wall clock, unlike generate()'s
    // :revdate: header, so it snapshots cleanly.
    #[test]
    fn type_definition_snapshot() {
        let schema = SchemaIndex::default();
        let raw_descriptions = HashMap::new();
        let options = RenderOptions::with_all_sections();

        let mut def = Definition::new("User", DefinitionKind::Object);
        def.description = "A registered user.".to_string();
        def.fields = vec![
            Field {
                name: "id".to_string(),
                type_expr: "ID!".to_string(),
                description: "The user's unique identifier.".to_string(),
                arguments: Vec::new(),
                directives_applied: Vec::new(),
            },
            Field {
                name: "handle".to_string(),
                type_expr: "String".to_string(),
                description: "The `@`-prefixed display handle.".to_string(),
                arguments: Vec::new(),
                directives_applied: Vec::new(),
            },
        ];

        let rendered = render_type_definition("type", &def, &schema, &raw_descriptions, &options);
        insta::assert_snapshot!(rendered);
    }
}

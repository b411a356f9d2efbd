//! Catalogue mode: a reduced rendering that emits only three summary tables
//! (Queries, Mutations, Subscriptions) plus a short introduction, instead of
//! the full per-operation documentation.

use std::collections::HashMap;

use chrono::Utc;

use crate::analyzer;
use crate::changelog;
use crate::config::RenderOptions;
use crate::filter;
use crate::model::{CatalogueEntry, Field, GenerationStats, SchemaIndex};

use super::templates;

fn build_entries(
    fields: &[Field],
    owner_name: &str,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
    stats: &mut GenerationStats,
    counter: impl Fn(&mut GenerationStats),
) -> Vec<CatalogueEntry> {
    let mut included: Vec<&Field> = fields
        .iter()
        .filter(|f| filter::should_include(f, options, stats))
        .collect();
    included.sort_by(|a, b| a.name.cmp(&b.name));

    included
        .into_iter()
        .map(|f| {
            counter(stats);
            let raw_path = format!("{owner_name}.{}", f.name);
            let raw_desc = templates::raw_description(&raw_path, &f.description, raw_descriptions);
            let changelog_snippet = if options.include_changelog {
                let block = changelog::render(raw_desc);
                if block.is_empty() {
                    None
                } else {
                    Some(block.trim().to_string())
                }
            } else {
                None
            };
            CatalogueEntry {
                name: f.name.clone(),
                first_sentence_of_description: analyzer::first_sentence(raw_desc),
                changelog_snippet,
            }
        })
        .collect()
}

fn render_table(title: &str, entries: &[CatalogueEntry], with_changelog: bool) -> String {
    let mut out = format!("=== {title}\n\n");
    if entries.is_empty() {
        out.push_str(&format!("[NOTE]\n====\nNo {} exist in this schema.\n====\n\n", title.to_lowercase()));
        return out;
    }

    let header = if with_changelog {
        "| Name | Description | Changelog\n\n"
    } else {
        "| Name | Description\n\n"
    };
    out.push_str("[options=\"header\"]\n|===\n");
    out.push_str(header);
    for entry in entries {
        if with_changelog {
            out.push_str(&format!(
                "| {}\n| {}\n| {}\n\n",
                entry.name,
                entry.first_sentence_of_description,
                entry.changelog_snippet.as_deref().unwrap_or("")
            ));
        } else {
            out.push_str(&format!("| {}\n| {}\n\n", entry.name, entry.first_sentence_of_description));
        }
    }
    out.push_str("|===\n\n");
    out
}

/// Longest leading run of lowercase/digit characters, i.e. the first
/// camelCase "word" of an operation name (`createUser` → `create`).
fn camel_prefix(name: &str) -> String {
    let prefix: String = name.chars().take_while(|c| c.is_lowercase() || c.is_ascii_digit()).collect();
    if prefix.is_empty() {
        name.to_string()
    } else {
        prefix
    }
}

fn render_grouped_mutations_table(entries: &[CatalogueEntry], with_changelog: bool) -> String {
    let mut groups: Vec<(String, Vec<&CatalogueEntry>)> = Vec::new();
    for entry in entries {
        let prefix = camel_prefix(&entry.name);
        match groups.iter_mut().find(|(p, _)| p == &prefix) {
            Some((_, members)) => members.push(entry),
            None => groups.push((prefix, vec![entry])),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::from("=== Mutations\n\n");
    if groups.is_empty() {
        out.push_str("[NOTE]\n====\nNo mutations exist in this schema.\n====\n\n");
        return out;
    }

    for (prefix, members) in groups {
        out.push_str(&format!(".{prefix}\n"));
        let owned: Vec<CatalogueEntry> = members.into_iter().cloned().collect();
        out.push_str(&render_table_body(&owned, with_changelog));
    }
    out
}

fn render_table_body(entries: &[CatalogueEntry], with_changelog: bool) -> String {
    let header = if with_changelog {
        "| Name | Description | Changelog\n\n"
    } else {
        "| Name | Description\n\n"
    };
    let mut out = String::from("[options=\"header\"]\n|===\n");
    out.push_str(header);
    for entry in entries {
        if with_changelog {
            out.push_str(&format!(
                "| {}\n| {}\n| {}\n\n",
                entry.name,
                entry.first_sentence_of_description,
                entry.changelog_snippet.as_deref().unwrap_or("")
            ));
        } else {
            out.push_str(&format!("| {}\n| {}\n\n", entry.name, entry.first_sentence_of_description));
        }
    }
    out.push_str("|===\n\n");
    out
}

pub fn render(
    schema: &SchemaIndex,
    raw_descriptions: &HashMap<String, String>,
    options: &RenderOptions,
    stats: &mut GenerationStats,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(":revdate: {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!(":commandline: {}\n", options.command_line.as_deref().unwrap_or("")));
    out.push_str("include::_attributes.adoc[]\n\n");

    out.push_str("= GraphQL API Reference\n\n");
    if let Some(sub_title) = &options.sub_title {
        out.push_str(sub_title);
        out.push_str("\n\n");
    }
    out.push_str(
        "A GraphQL schema exposes its queryable surface through three kinds of root \
         operations: queries that read data, mutations that write it, and subscriptions \
         that stream updates. The tables below summarize every operation this schema exposes.\n\n",
    );

    let query_owner = schema.query_type.clone().unwrap_or_default();
    let queries = build_entries(schema.query_fields(), &query_owner, raw_descriptions, options, stats, |s| s.queries += 1);
    out.push_str(&render_table("Queries", &queries, options.include_changelog));

    let mutation_owner = schema.mutation_type.clone().unwrap_or_default();
    let mutations = build_entries(schema.mutation_fields(), &mutation_owner, raw_descriptions, options, stats, |s| {
        s.mutations += 1
    });
    if options.group_mutations_by_prefix {
        out.push_str(&render_grouped_mutations_table(&mutations, options.include_changelog));
    } else {
        out.push_str(&render_table("Mutations", &mutations, options.include_changelog));
    }

    let subscription_owner = schema.subscription_type.clone().unwrap_or_default();
    let subscriptions = build_entries(
        schema.subscription_fields(),
        &subscription_owner,
        raw_descriptions,
        options,
        stats,
        |s| s.subscriptions += 1,
    );
    out.push_str(&render_table("Subscriptions", &subscriptions, options.include_changelog));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_prefix_splits_on_first_uppercase() {
        assert_eq!(camel_prefix("createUser"), "create");
        assert_eq!(camel_prefix("updateUserEmail"), "update");
        assert_eq!(camel_prefix("ping"), "ping");
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefinitionKind {
    Object,
    Interface,
    Input,
    Enum,
    Scalar,
    Union,
    Directive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub type_expr: String,
    pub description: String,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveApplication {
    pub name: String,
    pub arguments: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_expr: String,
    pub description: String,
    pub arguments: Vec<Argument>,
    pub directives_applied: Vec<DirectiveApplication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub description: String,
    pub directives_applied: Vec<DirectiveApplication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DirectiveShape {
    /// SDL locations this directive may be applied at (e.g. `FIELD_DEFINITION`).
    pub locations: Vec<String>,
    pub repeatable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub description: String,
    pub fields: Vec<Field>,
    pub enum_values: Vec<EnumValue>,
    pub union_members: Vec<String>,
    pub interfaces_implemented: Vec<String>,
    pub directives_applied: Vec<DirectiveApplication>,
    /// Populated only for `kind == Directive`.
    pub directive_shape: Option<DirectiveShape>,
    /// Populated only for `kind == Directive`.
    pub arguments: Vec<Argument>,
}

impl Definition {
    pub fn new(name: impl Into<String>, kind: DefinitionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            fields: Vec::new(),
            enum_values: Vec::new(),
            union_members: Vec::new(),
            interfaces_implemented: Vec::new(),
            directives_applied: Vec::new(),
            directive_shape: None,
            arguments: Vec::new(),
        }
    }
}

/// The fully-assembled, immutable view of a schema: every named definition
/// plus pointers to the three root operation types.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    pub definitions: BTreeMap<String, Definition>,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

impl SchemaIndex {
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn is_user_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn query_fields(&self) -> &[Field] {
        self.root_fields(self.query_type.as_deref())
    }

    pub fn mutation_fields(&self) -> &[Field] {
        self.root_fields(self.mutation_type.as_deref())
    }

    pub fn subscription_fields(&self) -> &[Field] {
        self.root_fields(self.subscription_type.as_deref())
    }

    fn root_fields(&self, name: Option<&str>) -> &[Field] {
        name.and_then(|n| self.definitions.get(n))
            .map(|d| d.fields.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Documentation-quality metrics computed once per description at render
/// time and discarded; never persisted alongside the [`Definition`] itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionMetrics {
    pub word_count: usize,
    /// Weighted sum of the six presence booleans, clamped to `[0, 100]` and
    /// stored as an integer percentage to keep the type `Eq`.
    pub completeness_pct: u8,
    pub complexity: Complexity,
    pub has_overview: bool,
    pub has_parameters: bool,
    pub has_returns: bool,
    pub has_examples: bool,
    pub has_errors: bool,
    pub has_changelog: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Parameter {
    pub name: String,
    pub type_hint: Option<String>,
    pub description: String,
    pub default: Option<String>,
    pub sub_params: Vec<Parameter>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub title: Option<String>,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangelogActionKind {
    Add,
    Update,
    Deprecate,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerChangelogEntry {
    pub action: ChangelogActionKind,
    pub version: String,
    pub description: String,
}

/// Known `@since` / `@deprecated` / `@beta` / `@experimental` / `@internal`
/// metadata tokens recognized inside a structured description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DescriptionMetadata {
    pub since: Option<String>,
    pub deprecated: Option<String>,
    pub beta: bool,
    pub experimental: bool,
    pub internal: bool,
}

/// The typed section model the Description Analyzer produces for a single
/// free-text description. Derived lazily at render time and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDescription {
    pub is_structured: bool,
    pub raw: String,
    pub overview: String,
    pub parameters: Vec<Parameter>,
    pub returns: Option<String>,
    pub errors: Vec<ErrorEntry>,
    pub examples: Vec<Example>,
    pub changelog: Vec<AnalyzerChangelogEntry>,
    pub metadata: DescriptionMetadata,
    /// Ordered by first appearance; unrecognized `##`/`###` headings.
    pub custom_sections: Vec<(String, String)>,
    pub metrics: DescriptionMetrics,
}

/// A row in the catalogue-mode summary tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub name: String,
    pub first_sentence_of_description: String,
    pub changelog_snippet: Option<String>,
}

/// Counts returned alongside the rendered document so a caller can print its
/// own metrics table without the core knowing anything about table
/// formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub queries: usize,
    pub mutations: usize,
    pub subscriptions: usize,
    pub types: usize,
    pub enums: usize,
    pub inputs: usize,
    pub directives: usize,
    pub scalars: usize,

    pub excluded_internal: usize,
    pub excluded_deprecated: usize,
    pub excluded_preview: usize,
    pub excluded_legacy: usize,
    pub excluded_zero_version: usize,

    pub files_assembled: usize,
    pub definitions_discovered: usize,
}

pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];
pub const ROOT_TYPE_NAMES: [&str; 3] = ["Query", "Mutation", "Subscription"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

pub fn is_root_type_name(name: &str) -> bool {
    ROOT_TYPE_NAMES.contains(&name)
}

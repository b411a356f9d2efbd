use std::path::PathBuf;

/// Every fatal condition the pipeline can raise.
///
/// Markup transformation, description analysis and per-entity rendering never
/// produce a `CoreError` — only assembly, SDL parsing and configuration
/// validation can fail outright.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("pattern '{pattern}' matched no files")]
    NoMatch { pattern: String },

    #[error("'{path}' does not have a recognized SDL extension (.graphql, .graphqls, .gql)")]
    BadExtension { path: PathBuf },

    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{name}' is defined in both '{first_file}' and '{current_file}'")]
    DuplicateDefinition {
        name: String,
        first_file: PathBuf,
        current_file: PathBuf,
    },

    #[error("failed to parse assembled SDL: {0}")]
    SdlParse(String),
}

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "graphqls-to-asciidoc")]
#[command(about = "Turns GraphQL SDL into a single AsciiDoc reference document")]
#[command(version)]
pub struct Args {
    // Single SDL file to document; mutually exclusive with --pattern
    #[arg(long, conflicts_with = "pattern")]
    pub file: Option<PathBuf>,

    // Glob pattern (supports ** and {a,b,c}) expanding to the SDL sources
    #[arg(long, conflicts_with = "file")]
    pub pattern: Option<String>,

    // Where to write the rendered document; defaults to stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    // Switch to the reduced summary-table rendering
    #[arg(long)]
    pub catalogue: bool,

    // Subtitle inserted under the catalogue heading
    #[arg(long)]
    pub sub_title: Option<String>,

    #[arg(long)]
    pub include_internal: bool,
    #[arg(long)]
    pub include_deprecated: bool,
    #[arg(long)]
    pub include_preview: bool,
    #[arg(long)]
    pub include_legacy: bool,
    #[arg(long)]
    pub include_zero: bool,
    #[arg(long)]
    pub include_changelog: bool,

    // Section toggles; every section renders by default
    #[arg(long)]
    pub no_queries: bool,
    #[arg(long)]
    pub no_mutations: bool,
    #[arg(long)]
    pub no_subscriptions: bool,
    #[arg(long)]
    pub no_types: bool,
    #[arg(long)]
    pub no_enums: bool,
    #[arg(long)]
    pub no_inputs: bool,
    #[arg(long)]
    pub no_directives: bool,
    #[arg(long)]
    pub no_scalars: bool,

    // Group the catalogue mutations table by common camelCase prefix
    #[arg(long)]
    pub group_mutations_by_prefix: bool,

    // Print progress events and the generation metrics table
    #[arg(long, short)]
    pub verbose: bool,
}

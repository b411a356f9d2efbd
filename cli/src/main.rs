mod args;
mod output;

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use graphqls_to_asciidoc_core::RenderOptions;

use args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("graphqls_to_asciidoc_core=debug").init();
    }

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");

    let options = RenderOptions {
        schema_file: args.file,
        schema_pattern: args.pattern,
        catalogue: args.catalogue,
        sub_title: args.sub_title,
        include_internal: args.include_internal,
        include_deprecated: args.include_deprecated,
        include_preview: args.include_preview,
        include_legacy: args.include_legacy,
        include_zero: args.include_zero,
        include_changelog: args.include_changelog,
        include_queries: !args.no_queries,
        include_mutations: !args.no_mutations,
        include_subscriptions: !args.no_subscriptions,
        include_types: !args.no_types,
        include_enums: !args.no_enums,
        include_inputs: !args.no_inputs,
        include_directives: !args.no_directives,
        include_scalars: !args.no_scalars,
        verbose: args.verbose,
        group_mutations_by_prefix: args.group_mutations_by_prefix,
        command_line: Some(command_line),
    };

    let (document, stats) = graphqls_to_asciidoc_core::generate(&options).context("failed to generate document")?;

    match args.output {
        Some(path) => {
            let mut file = File::create(&path).with_context(|| format!("failed to create '{}'", path.display()))?;
            file.write_all(document.as_bytes())
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        None => {
            print!("{document}");
        }
    }

    if args.verbose {
        eprintln!("{}", output::format_stats(&stats));
    }

    Ok(())
}

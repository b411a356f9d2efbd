use graphqls_to_asciidoc_core::GenerationStats;

/// Renders the generation metrics as a plain-text table for `--verbose`
/// output; the core crate only returns raw counts and leaves formatting to
/// its caller.
pub fn format_stats(stats: &GenerationStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("files assembled:       {}\n", stats.files_assembled));
    out.push_str(&format!("definitions discovered: {}\n", stats.definitions_discovered));
    out.push_str("\nemitted:\n");
    out.push_str(&format!("  queries:       {}\n", stats.queries));
    out.push_str(&format!("  mutations:     {}\n", stats.mutations));
    out.push_str(&format!("  subscriptions: {}\n", stats.subscriptions));
    out.push_str(&format!("  types:         {}\n", stats.types));
    out.push_str(&format!("  enums:         {}\n", stats.enums));
    out.push_str(&format!("  inputs:        {}\n", stats.inputs));
    out.push_str(&format!("  directives:    {}\n", stats.directives));
    out.push_str(&format!("  scalars:       {}\n", stats.scalars));
    out.push_str("\nexcluded:\n");
    out.push_str(&format!("  internal:      {}\n", stats.excluded_internal));
    out.push_str(&format!("  deprecated:    {}\n", stats.excluded_deprecated));
    out.push_str(&format!("  preview:       {}\n", stats.excluded_preview));
    out.push_str(&format!("  legacy:        {}\n", stats.excluded_legacy));
    out.push_str(&format!("  zero-version:  {}\n", stats.excluded_zero_version));
    out
}

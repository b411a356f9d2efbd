//! Filter: decides whether an operation (a [`Field`] hanging off
//! `Query`/`Mutation`/`Subscription`) makes it into the rendered document.
//! Classification is heuristic and intentionally case-insensitive, kept for
//! schemas that predate directive-based deprecation/preview conventions.

use crate::changelog;
use crate::config::RenderOptions;
use crate::model::{Field, GenerationStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Internal,
    Deprecated,
    Preview,
    Legacy,
    ZeroVersion,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_uppercase().contains(&needle.to_ascii_uppercase())
}

pub fn is_internal(field: &Field) -> bool {
    field.name.to_ascii_lowercase().starts_with("internal") || contains_ci(&field.description, "INTERNAL")
}

pub fn is_deprecated(field: &Field) -> bool {
    field
        .directives_applied
        .iter()
        .any(|d| d.name.eq_ignore_ascii_case("deprecated"))
        || !changelog::extract_buckets(&field.description).deprecated.is_empty()
}

pub fn is_preview(field: &Field) -> bool {
    contains_ci(&field.description, "PREVIEW")
}

pub fn is_legacy(field: &Field) -> bool {
    contains_ci(&field.description, "LEGACY")
}

pub fn is_zero_version(field: &Field) -> bool {
    changelog::has_zero_version(&field.description)
}

/// Classifies `field` against every rule (not just the first match), in the
/// fixed order internal → deprecated → preview → legacy → zero-version.
pub fn classify(field: &Field) -> Vec<ExclusionReason> {
    let mut reasons = Vec::new();
    if is_internal(field) {
        reasons.push(ExclusionReason::Internal);
    }
    if is_deprecated(field) {
        reasons.push(ExclusionReason::Deprecated);
    }
    if is_preview(field) {
        reasons.push(ExclusionReason::Preview);
    }
    if is_legacy(field) {
        reasons.push(ExclusionReason::Legacy);
    }
    if is_zero_version(field) {
        reasons.push(ExclusionReason::ZeroVersion);
    }
    reasons
}

fn allowed(reason: ExclusionReason, options: &RenderOptions) -> bool {
    match reason {
        ExclusionReason::Internal => options.include_internal,
        ExclusionReason::Deprecated => options.include_deprecated,
        ExclusionReason::Preview => options.include_preview,
        ExclusionReason::Legacy => options.include_legacy,
        ExclusionReason::ZeroVersion => options.include_zero,
    }
}

fn bump_stat(reason: ExclusionReason, stats: &mut GenerationStats) {
    match reason {
        ExclusionReason::Internal => stats.excluded_internal += 1,
        ExclusionReason::Deprecated => stats.excluded_deprecated += 1,
        ExclusionReason::Preview => stats.excluded_preview += 1,
        ExclusionReason::Legacy => stats.excluded_legacy += 1,
        ExclusionReason::ZeroVersion => stats.excluded_zero_version += 1,
    }
}

/// Returns `true` if `field` should be included in the rendered document.
/// The first disallowed reason short-circuits and bumps the matching
/// `GenerationStats` counter; a field can match several reasons but only the
/// first one encountered is counted.
pub fn should_include(field: &Field, options: &RenderOptions, stats: &mut GenerationStats) -> bool {
    for reason in classify(field) {
        if !allowed(reason, options) {
            bump_stat(reason, stats);
            tracing::trace!(field = %field.name, reason = ?reason, "excluding operation");
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DirectiveApplication;

    fn field(name: &str, description: &str) -> Field {
        Field {
            name: name.to_string(),
            type_expr: "String".to_string(),
            description: description.to_string(),
            arguments: Vec::new(),
            directives_applied: Vec::new(),
        }
    }

    #[test]
    fn internal_by_name_prefix() {
        assert!(is_internal(&field("internalDebugDump", "")));
    }

    #[test]
    fn internal_by_description_marker() {
        assert!(is_internal(&field("debugDump", "INTERNAL: do not call")));
    }

    #[test]
    fn deprecated_by_directive_or_changelog_line() {
        let mut f = field("oldField", "plain");
        f.directives_applied.push(DirectiveApplication {
            name: "deprecated".to_string(),
            arguments: Vec::new(),
        });
        assert!(is_deprecated(&f));

        let via_changelog = field("oldField2", "deprecated.version: 1.0.0\n");
        assert!(is_deprecated(&via_changelog));
    }

    #[test]
    fn zero_version_detected_via_changelog() {
        assert!(is_zero_version(&field("f", "add.version: 0.0.0\n")));
    }

    #[test]
    fn should_include_bumps_the_matching_stat_and_short_circuits() {
        let f = field("internalThing", "PREVIEW feature, INTERNAL only");
        let mut options = RenderOptions::with_all_sections();
        options.include_internal = false;
        options.include_preview = false;
        let mut stats = GenerationStats::default();
        assert!(!should_include(&f, &options, &mut stats));
        assert_eq!(stats.excluded_internal, 1);
        assert_eq!(stats.excluded_preview, 0);
    }

    #[test]
    fn included_when_all_relaxations_granted() {
        let f = field("internalThing", "PREVIEW, LEGACY, INTERNAL, add.version: 0.0.0");
        let options = RenderOptions {
            include_internal: true,
            include_deprecated: true,
            include_preview: true,
            include_legacy: true,
            include_zero: true,
            ..RenderOptions::with_all_sections()
        };
        let mut stats = GenerationStats::default();
        assert!(should_include(&f, &options, &mut stats));
    }
}

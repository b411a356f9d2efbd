use std::path::PathBuf;

use crate::error::CoreError;

/// The single configuration surface the pipeline consumes. Built entirely by
/// the caller — the core never reads an environment variable or a config
/// file on its own.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub schema_file: Option<PathBuf>,
    pub schema_pattern: Option<String>,

    pub catalogue: bool,
    pub sub_title: Option<String>,

    pub include_internal: bool,
    pub include_deprecated: bool,
    pub include_preview: bool,
    pub include_legacy: bool,
    pub include_zero: bool,
    pub include_changelog: bool,

    pub include_queries: bool,
    pub include_mutations: bool,
    pub include_subscriptions: bool,
    pub include_types: bool,
    pub include_enums: bool,
    pub include_inputs: bool,
    pub include_directives: bool,
    pub include_scalars: bool,

    pub verbose: bool,
    pub group_mutations_by_prefix: bool,
    pub command_line: Option<String>,
}

impl RenderOptions {
    /// All section toggles on, no filter relaxations, non-catalogue mode.
    pub fn with_all_sections() -> Self {
        Self {
            include_queries: true,
            include_mutations: true,
            include_subscriptions: true,
            include_types: true,
            include_enums: true,
            include_inputs: true,
            include_directives: true,
            include_scalars: true,
            ..Default::default()
        }
    }

    /// Legacy alias: `exclude_internal` is the negation of `include_internal`.
    pub fn set_exclude_internal(&mut self, exclude_internal: bool) {
        self.include_internal = !exclude_internal;
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        match (&self.schema_file, &self.schema_pattern) {
            (Some(_), Some(_)) => Err(CoreError::ConfigInvalid(
                "schema_file and schema_pattern are mutually exclusive".into(),
            )),
            (None, None) => Err(CoreError::ConfigInvalid(
                "exactly one of schema_file or schema_pattern is required".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_both_selectors() {
        let mut opts = RenderOptions::with_all_sections();
        opts.schema_file = Some(PathBuf::from("a.graphql"));
        opts.schema_pattern = Some("*.graphql".into());
        assert!(matches!(
            opts.validate(),
            Err(CoreError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn rejects_neither_selector() {
        let opts = RenderOptions::with_all_sections();
        assert!(matches!(
            opts.validate(),
            Err(CoreError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn accepts_single_selector() {
        let mut opts = RenderOptions::with_all_sections();
        opts.schema_file = Some(PathBuf::from("a.graphql"));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn exclude_internal_is_negated_include() {
        let mut opts = RenderOptions::with_all_sections();
        opts.set_exclude_internal(true);
        assert!(!opts.include_internal);
        opts.set_exclude_internal(false);
        assert!(opts.include_internal);
    }
}

//! Type Reference Resolver: turns an SDL type expression (`[User!]!`) into
//! either an AsciiDoc cross-reference (user-defined base type) or a
//! backtick-wrapped literal (built-in scalar or otherwise unresolved name).
//! Recursion preserves the positions of `[`, `]` and any trailing `!`.

use crate::model::SchemaIndex;

/// Resolves `type_expr` against `schema`, emitting `<<Name,\`Name\`>>` for
/// user-defined base types and `` `Name!` `` (backtick-wrapped) otherwise.
pub fn resolve(type_expr: &str, schema: &SchemaIndex) -> String {
    resolve_inner(type_expr.trim(), schema)
}

fn resolve_inner(expr: &str, schema: &SchemaIndex) -> String {
    if let Some(rest) = expr.strip_prefix('[') {
        let (inner, suffix) = split_matching_bracket(rest);
        let resolved_inner = resolve_inner(inner, schema);
        return format!("[{resolved_inner}]{suffix}");
    }

    let required = expr.ends_with('!');
    let name = expr.strip_suffix('!').unwrap_or(expr);

    if schema.is_user_defined(name) {
        format!("<<{name},`{name}`>>{}", if required { "!" } else { "" })
    } else {
        format!("`{name}{}`", if required { "!" } else { "" })
    }
}

/// Finds the `]` matching the `[` already consumed by the caller, returning
/// the content between the brackets and whatever trails the closing `]`
/// (typically a `!`, possibly empty).
fn split_matching_bracket(rest: &str) -> (&str, &str) {
    let mut depth = 1i32;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return (&rest[..idx], &rest[idx + 1..]);
                }
            }
            _ => {}
        }
    }
    (rest, "")
}

/// Omits cross-references entirely: used inside code fences that render an
/// operation's bare signature, where a live `<<Name,...>>` link would be
/// meaningless.
pub fn resolve_for_signature(type_expr: &str) -> String {
    type_expr.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definition, DefinitionKind};

    fn schema_with(names: &[&str]) -> SchemaIndex {
        let mut schema = SchemaIndex::default();
        for name in names {
            schema
                .definitions
                .insert(name.to_string(), Definition::new(*name, DefinitionKind::Object));
        }
        schema
    }

    #[test]
    fn resolves_user_defined_list_type() {
        let schema = schema_with(&["User"]);
        assert_eq!(resolve("[User!]!", &schema), "[<<User,`User`>>!]!");
    }

    #[test]
    fn resolves_builtin_scalar_as_literal() {
        let schema = schema_with(&["User"]);
        assert_eq!(resolve("String!", &schema), "`String!`");
    }

    #[test]
    fn resolves_nested_list_types() {
        let schema = schema_with(&["Int_"]);
        assert_eq!(resolve("[[Int]]", &schema), "[[`Int`]]");
    }

    #[test]
    fn for_signature_omits_cross_references() {
        assert_eq!(resolve_for_signature("[User!]!"), "[User!]!");
    }
}

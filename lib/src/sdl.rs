//! SDL Adapter: a thin bridge to the external `graphql-parser` crate. Turns
//! the assembled SDL text into the immutable [`SchemaIndex`] the rest of the
//! pipeline reads from; never mutated after construction.

use graphql_parser::schema::{
    Definition, Directive, Document, EnumType, InputObjectType, InputValue, InterfaceType,
    ObjectType, ScalarType, Type, TypeDefinition, UnionType, Value,
};

use crate::error::CoreError;
use crate::model::{
    Argument, Definition as ModelDefinition, DefinitionKind, DirectiveApplication, DirectiveShape,
    EnumValue, Field, SchemaIndex,
};

pub fn build_schema_index(sdl_text: &str) -> Result<SchemaIndex, CoreError> {
    let document: Document<String> =
        graphql_parser::parse_schema::<String>(sdl_text).map_err(|e| CoreError::SdlParse(e.to_string()))?;

    let mut index = SchemaIndex::default();

    for definition in &document.definitions {
        match definition {
            Definition::SchemaDefinition(schema_def) => {
                index.query_type = schema_def.query.clone();
                index.mutation_type = schema_def.mutation.clone();
                index.subscription_type = schema_def.subscription.clone();
            }
            Definition::TypeDefinition(type_def) => {
                let def = convert_type_definition(type_def);
                index.definitions.insert(def.name.clone(), def);
            }
            Definition::DirectiveDefinition(directive_def) => {
                let mut def = ModelDefinition::new(directive_def.name.clone(), DefinitionKind::Directive);
                def.description = directive_def.description.clone().unwrap_or_default();
                def.arguments = convert_arguments(&directive_def.arguments);
                def.directive_shape = Some(DirectiveShape {
                    locations: directive_def
                        .locations
                        .iter()
                        .map(|loc| format!("{loc:?}"))
                        .collect(),
                    repeatable: directive_def.repeatable,
                });
                index.definitions.insert(def.name.clone(), def);
            }
            // Type extensions aren't merged into the base definition they
            // extend, so fields added via `extend type Query { ... }` in a
            // second file don't show up here — only the fields declared on
            // the original `type Query { ... }` block do.
            Definition::TypeExtension(_) => {}
        }
    }

    if index.query_type.is_none() && index.definitions.contains_key("Query") {
        index.query_type = Some("Query".to_string());
    }
    if index.mutation_type.is_none() && index.definitions.contains_key("Mutation") {
        index.mutation_type = Some("Mutation".to_string());
    }
    if index.subscription_type.is_none() && index.definitions.contains_key("Subscription") {
        index.subscription_type = Some("Subscription".to_string());
    }

    Ok(index)
}

fn convert_type_definition(type_def: &TypeDefinition<String>) -> ModelDefinition {
    match type_def {
        TypeDefinition::Scalar(scalar) => convert_scalar(scalar),
        TypeDefinition::Object(object) => convert_object(object),
        TypeDefinition::Interface(iface) => convert_interface(iface),
        TypeDefinition::Union(union_ty) => convert_union(union_ty),
        TypeDefinition::Enum(enum_ty) => convert_enum(enum_ty),
        TypeDefinition::InputObject(input) => convert_input(input),
    }
}

fn convert_scalar(scalar: &ScalarType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(scalar.name.clone(), DefinitionKind::Scalar);
    def.description = scalar.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&scalar.directives);
    def
}

fn convert_object(object: &ObjectType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(object.name.clone(), DefinitionKind::Object);
    def.description = object.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&object.directives);
    def.interfaces_implemented = object.implements_interfaces.clone();
    def.fields = convert_fields(&object.fields);
    def
}

fn convert_interface(iface: &InterfaceType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(iface.name.clone(), DefinitionKind::Interface);
    def.description = iface.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&iface.directives);
    def.fields = convert_fields(&iface.fields);
    def
}

fn convert_union(union_ty: &UnionType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(union_ty.name.clone(), DefinitionKind::Union);
    def.description = union_ty.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&union_ty.directives);
    def.union_members = union_ty.types.clone();
    def
}

fn convert_enum(enum_ty: &EnumType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(enum_ty.name.clone(), DefinitionKind::Enum);
    def.description = enum_ty.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&enum_ty.directives);
    def.enum_values = enum_ty
        .values
        .iter()
        .map(|v| EnumValue {
            name: v.name.clone(),
            description: v.description.clone().unwrap_or_default(),
            directives_applied: convert_directives(&v.directives),
        })
        .collect();
    def
}

fn convert_input(input: &InputObjectType<String>) -> ModelDefinition {
    let mut def = ModelDefinition::new(input.name.clone(), DefinitionKind::Input);
    def.description = input.description.clone().unwrap_or_default();
    def.directives_applied = convert_directives(&input.directives);
    def.fields = input
        .fields
        .iter()
        .map(|f| Field {
            name: f.name.clone(),
            type_expr: type_to_expr(&f.value_type),
            description: f.description.clone().unwrap_or_default(),
            arguments: Vec::new(),
            directives_applied: convert_directives(&f.directives),
        })
        .collect();
    def
}

fn convert_fields(fields: &[graphql_parser::schema::Field<String>]) -> Vec<Field> {
    fields
        .iter()
        .map(|f| Field {
            name: f.name.clone(),
            type_expr: type_to_expr(&f.field_type),
            description: f.description.clone().unwrap_or_default(),
            arguments: convert_arguments(&f.arguments),
            directives_applied: convert_directives(&f.directives),
        })
        .collect()
}

fn convert_arguments(args: &[InputValue<String>]) -> Vec<Argument> {
    args.iter()
        .map(|a| Argument {
            name: a.name.clone(),
            type_expr: type_to_expr(&a.value_type),
            description: a.description.clone().unwrap_or_default(),
            default_value: a.default_value.as_ref().map(value_to_string),
        })
        .collect()
}

fn convert_directives(directives: &[Directive<String>]) -> Vec<DirectiveApplication> {
    directives
        .iter()
        .map(|d| DirectiveApplication {
            name: d.name.clone(),
            arguments: d
                .arguments
                .iter()
                .map(|(name, value)| (name.clone(), value_to_string(value)))
                .collect(),
        })
        .collect()
}

pub fn type_to_expr(ty: &Type<String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::ListType(inner) => format!("[{}]", type_to_expr(inner)),
        Type::NonNullType(inner) => format!("{}!", type_to_expr(inner)),
    }
}

fn value_to_string(value: &Value<String>) -> String {
    match value {
        Value::Variable(v) => format!("${v}"),
        Value::Int(n) => n.as_i64().map(|v| v.to_string()).unwrap_or_default(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Enum(e) => e.clone(),
        Value::List(items) => {
            let rendered: Vec<String> = items.iter().map(value_to_string).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}: {}", value_to_string(v)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_object_fields_and_default_root_types() {
        let sdl = r#"
            type Query {
                user(id: ID!): User
            }

            """A registered user"""
            type User {
                id: ID!
                name: String
            }
        "#;
        let index = build_schema_index(sdl).unwrap();
        assert_eq!(index.query_type.as_deref(), Some("Query"));
        let user = index.get("User").unwrap();
        assert_eq!(user.description, "A registered user");
        assert_eq!(user.fields.len(), 2);
    }

    #[test]
    fn explicit_schema_block_overrides_default_root_names() {
        let sdl = r#"
            schema {
                query: RootQuery
            }
            type RootQuery {
                ping: String
            }
        "#;
        let index = build_schema_index(sdl).unwrap();
        assert_eq!(index.query_type.as_deref(), Some("RootQuery"));
    }
}

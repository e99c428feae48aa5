#![deny(missing_docs)]

//! # Field Extraction
//!
//! Turns the properties of an object schema into ordered field descriptors.

use crate::error::{AppError, AppResult};
use crate::oas::graph::SchemaNode;
use crate::oas::models::{FieldDescriptor, FieldType, SchemaKey};
use crate::oas::naming::Identifiers;
use crate::oas::resolver::TypeResolver;
use std::collections::HashMap;

/// Builds the fields of `node` in declared property order, plus the other
/// serializers they reference in first-use order.
pub fn build_fields(
    idents: &Identifiers,
    resolver: &TypeResolver<'_>,
    node: &SchemaNode,
) -> AppResult<(Vec<FieldDescriptor>, Vec<SchemaKey>)> {
    let graph = resolver.graph();
    let mut fields = Vec::with_capacity(node.properties.len());
    let mut depends_on: Vec<SchemaKey> = Vec::new();
    let mut attributes = HashMap::new();

    for (name, prop) in &node.properties {
        let prop_ptr = &graph.node(*prop).pointer;
        let attribute = idents.snake(name);
        if let Some(first) = attributes.insert(attribute.clone(), prop_ptr.clone()) {
            return Err(AppError::DuplicateFieldName {
                name: attribute,
                first,
                second: prop_ptr.clone(),
            });
        }

        let ty = resolver.field_type(*prop)?;
        if let Some(key) = innermost_object(&ty) {
            if *key != node.pointer && !depends_on.contains(key) {
                depends_on.push(key.clone());
            }
        }

        fields.push(FieldDescriptor {
            name: name.clone(),
            attribute,
            ty,
            required: node.required.contains(name),
            nullable: resolver.is_nullable(*prop),
            description: resolver.description(*prop),
            choices: resolver.canonical_node(*prop).enum_values.clone(),
        });
    }
    Ok((fields, depends_on))
}

fn innermost_object(ty: &FieldType) -> Option<&SchemaKey> {
    match ty {
        FieldType::Array { items } => innermost_object(items),
        other => other.object_key(),
    }
}

#![deny(missing_docs)]

//! # Serializer Descriptor Builder
//!
//! Builds one [`SerializerDescriptor`] per discovered object schema, in
//! first-discovery order.
//!
//! Naming runs in two phases so the outcome never depends on which schema is
//! reached first:
//! 1. Declared names (`definitions/<Name>`, `components/schemas/<Name>`) are
//!    claimed as-is; two that normalise alike fail with `DuplicateClassName`.
//! 2. Anonymous schemas get a name synthesized from their reference path,
//!    disambiguated with a numeric suffix when taken.

pub mod structs;

use crate::error::AppResult;
use crate::oas::context::GenerationContext;
use crate::oas::document::declared_schema_name;
use crate::oas::graph::NodeId;
use crate::oas::models::{SchemaKey, SerializerDescriptor};
use crate::oas::naming::synthesized_schema_name;
use crate::oas::resolver::TypeResolver;
use indexmap::IndexMap;
use structs::build_fields;
use tracing::debug;

/// Builds serializer descriptors for `objects` (canonical object nodes).
pub fn build_serializers(
    ctx: &mut GenerationContext,
    resolver: &TypeResolver<'_>,
    objects: &[NodeId],
) -> AppResult<IndexMap<SchemaKey, SerializerDescriptor>> {
    let graph = resolver.graph();
    let suffix = ctx.options.serializer_suffix.clone();
    let mut names: Vec<Option<(String, String, bool)>> = vec![None; objects.len()];

    for (slot, id) in objects.iter().enumerate() {
        let pointer = &graph.node(*id).pointer;
        if let Some(declared) = declared_schema_name(pointer) {
            let class = ctx.idents.class_name(declared, &suffix);
            let class = ctx.classes.claim(class, pointer)?;
            names[slot] = Some((class, declared.to_string(), true));
        }
    }

    for (slot, id) in objects.iter().enumerate() {
        if names[slot].is_some() {
            continue;
        }
        let pointer = &graph.node(*id).pointer;
        let synthesized = synthesized_schema_name(pointer);
        let class = ctx
            .classes
            .claim_unique(&ctx.idents, &synthesized, &suffix, pointer);
        names[slot] = Some((class, synthesized, false));
    }

    let mut serializers = IndexMap::with_capacity(objects.len());
    for (id, naming) in objects.iter().zip(names) {
        let node = graph.node(*id);
        let Some((serializer_class_name, name, declared)) = naming else {
            continue;
        };
        let (fields, depends_on) = build_fields(&ctx.idents, resolver, node)?;
        debug!(
            class = %serializer_class_name,
            schema = %node.pointer,
            fields = fields.len(),
            "Built serializer descriptor"
        );
        serializers.insert(
            node.pointer.clone(),
            SerializerDescriptor {
                serializer_class_name,
                name,
                declared,
                schema: node.pointer.clone(),
                description: node.description.clone(),
                fields,
                depends_on,
            },
        );
    }
    Ok(serializers)
}

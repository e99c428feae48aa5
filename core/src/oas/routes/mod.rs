#![deny(missing_docs)]

//! # Path/Operation Extractor
//!
//! Entry point for turning the parsed path table into verb descriptors.
//! Orchestrates Path Entries -> Builder -> IR Models, keeping paths and verbs
//! in declaration order.

pub mod builder;
pub mod template;

use crate::error::AppResult;
use crate::oas::context::GenerationContext;
use crate::oas::models::{SchemaKey, SerializerDescriptor, VerbDescriptor};
use crate::oas::paths::PathEntry;
use crate::oas::pointer::JsonPointer;
use crate::oas::resolver::TypeResolver;
use builder::build_verb;
use indexmap::IndexMap;
use tracing::debug;

/// The verbs of one path, standalone or not.
#[derive(Debug, Clone)]
pub struct PathVerbs {
    /// The raw path template.
    pub path: String,
    /// Location of the Path Item.
    pub pointer: JsonPointer,
    /// Verbs in declaration order.
    pub verbs: Vec<VerbDescriptor>,
}

/// Builds a verb descriptor for every operation of every path.
pub fn extract_operations(
    ctx: &mut GenerationContext,
    resolver: &TypeResolver<'_>,
    serializers: &IndexMap<SchemaKey, SerializerDescriptor>,
    paths: &[PathEntry],
) -> AppResult<Vec<PathVerbs>> {
    let mut extracted = Vec::with_capacity(paths.len());
    for entry in paths {
        let mut verbs = Vec::with_capacity(entry.operations.len());
        for op in &entry.operations {
            let verb = build_verb(ctx, resolver, serializers, &entry.template, op)?;
            debug!(
                path = %entry.template,
                verb = %verb.verb,
                function = %verb.function_name,
                standalone = verb.standalone,
                "Built verb descriptor"
            );
            verbs.push(verb);
        }
        extracted.push(PathVerbs {
            path: entry.template.clone(),
            pointer: entry.pointer.clone(),
            verbs,
        });
    }
    Ok(extracted)
}

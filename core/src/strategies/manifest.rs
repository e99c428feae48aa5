#![deny(missing_docs)]

//! # Manifest Strategy
//!
//! Renders the registry as one JSON document, `descriptors.json`, holding the
//! three collections a template consumes.

use crate::error::{AppError, AppResult};
use crate::oas::models::{EndpointDescriptor, IndividualHandler, SerializerDescriptor};
use crate::oas::registry::DocumentRegistry;
use crate::strategies::traits::{RenderStrategy, RenderedFile};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// File name of the manifest.
pub const MANIFEST_FILE: &str = "descriptors.json";

/// Strategy emitting the descriptor manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestStrategy;

#[derive(Serialize)]
struct Manifest<'a> {
    endpoints: &'a [EndpointDescriptor],
    serializers: IndexMap<String, &'a SerializerDescriptor>,
    individual_handlers: &'a [IndividualHandler],
}

impl RenderStrategy for ManifestStrategy {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn render(&self, registry: &DocumentRegistry) -> AppResult<Vec<RenderedFile>> {
        let manifest = Manifest {
            endpoints: registry.endpoints(),
            serializers: registry
                .serializers_in_dependency_order()
                .into_iter()
                .map(|s| (s.schema.to_string(), s))
                .collect(),
            individual_handlers: registry.individual_handlers(),
        };
        let mut contents = serde_json::to_string_pretty(&manifest)
            .map_err(|e| AppError::General(format!("Failed to serialize manifest: {}", e)))?;
        contents.push('\n');
        Ok(vec![RenderedFile {
            relative_path: PathBuf::from(MANIFEST_FILE),
            contents,
        }])
    }
}

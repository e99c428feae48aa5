#![deny(missing_docs)]

//! # Restgen Core
//!
//! Core library turning an OpenAPI / Swagger document into the descriptor
//! model (endpoints, serializers, standalone handlers) a code renderer consumes.

/// Shared error types.
pub mod error;

/// Build options.
pub mod config;

/// OpenAPI (OAS) descriptor pipeline.
pub mod oas;

/// Rendering Strategy Interfaces.
pub mod strategies;

pub use config::BuildOptions;
pub use error::{AppError, AppResult};
pub use oas::{
    BodyDescriptor, DocumentRegistry, EndpointDescriptor, FieldDescriptor, FieldType, HttpMethod,
    IndividualHandler, JsonPointer, OpenApiDocument, ParamLocation, ParameterDescriptor,
    RouteSegment, ScalarType, SchemaKey, SerializerDescriptor, SerializerRef, SpecFlavor,
    VerbDescriptor,
};
pub use strategies::{ManifestStrategy, RenderStrategy, RenderedFile};

/// Builds the descriptor registry of the YAML or JSON document at `path`.
pub fn build_registry(path: &std::path::Path, options: BuildOptions) -> AppResult<DocumentRegistry> {
    DocumentRegistry::from_path(path, options)
}

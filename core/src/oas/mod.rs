#![deny(missing_docs)]

//! # OpenAPI Descriptor Pipeline
//!
//! - **document** / **pointer** / **shims** / **paths**: Loading and raw decoding.
//! - **graph**: Schema Graph Loader (arena of schema nodes).
//! - **resolver**: Type Resolver (aliases, use-site types, discovery).
//! - **schemas**: Serializer Descriptor Builder.
//! - **routes**: Path/Operation Extractor.
//! - **endpoints**: Endpoint Grouper.
//! - **registry**: The Document Registry running all of the above.
//! - **models**: Intermediate Representation definitions.

pub mod context;
pub mod document;
pub mod endpoints;
pub mod graph;
pub mod models;
pub mod naming;
pub mod paths;
pub mod pointer;
pub mod registry;
pub mod resolver;
pub mod routes;
pub mod schemas;
pub mod shims;

// Re-export public API
pub use document::{OpenApiDocument, SpecFlavor};
pub use models::{
    BodyDescriptor, EndpointDescriptor, FieldDescriptor, FieldType, HttpMethod, IndividualHandler,
    ParamLocation, ParameterDescriptor, RouteSegment, ScalarType, SchemaKey, SerializerDescriptor,
    SerializerRef, VerbDescriptor,
};
pub use pointer::JsonPointer;
pub use registry::DocumentRegistry;

#![deny(missing_docs)]

//! # Resolver Module
//!
//! Logic for resolving schema nodes into use-site types.
//!
//! Handles:
//! - Alias canonicalization and cyclic alias detection.
//! - Discovery of the object schemas that become serializers.
//! - Parameter types (schema based and legacy Swagger 2.0 primitives).
//! - Success response selection.

pub mod params;
pub mod responses;
pub mod types;

pub use params::resolve_parameter_type;
pub use responses::select_success_response;
pub use types::{SerializerUsage, TypeResolver};

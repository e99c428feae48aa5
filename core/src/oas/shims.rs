#![deny(missing_docs)]

//! # Shims
//!
//! Structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI / Swagger YAML objects; schemas and
//! `$ref`-able objects are kept as raw JSON so the pointer of each one can be
//! tracked while they are resolved.

use crate::error::{AppError, AppResult};
use crate::oas::pointer::JsonPointer;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Decodes a shim, reporting failures at `at` plus the path inside the object.
pub(crate) fn decode<'a, T>(value: &'a JsonValue, at: &JsonPointer) -> AppResult<T>
where
    T: Deserialize<'a>,
{
    serde_path_to_error::deserialize(value).map_err(|e| {
        let inner = e.path().to_string();
        let location = if inner == "." {
            at.to_string()
        } else {
            format!("{} ({})", at, inner)
        };
        AppError::Parse {
            location,
            message: e.into_inner().to_string(),
        }
    })
}

/// An Operation Object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// Unique operation identifier.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Free text, may be multi-line.
    pub description: Option<String>,
    /// Grouping tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the operation is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Parameters (inline or `$ref`), kept raw.
    #[serde(default)]
    pub parameters: Vec<JsonValue>,
    /// OAS 3.x request body (inline or `$ref`), kept raw.
    pub request_body: Option<JsonValue>,
    /// Responses keyed by status code, in declaration order.
    pub responses: IndexMap<String, JsonValue>,
    /// Explicit function name override.
    #[serde(rename = "x-appgen-function-name")]
    pub function_name: Option<String>,
    /// Routes the operation to the standalone handler list.
    #[serde(rename = "x-appgen-standalone", default)]
    pub standalone: bool,
}

/// A Parameter Object (OAS 3.x fields plus Swagger 2.0 primitives).
#[derive(Debug, Clone, Deserialize)]
pub struct ShimParameter {
    /// Literal parameter name.
    pub name: String,
    /// Location of the parameter.
    #[serde(rename = "in")]
    pub location: String,
    /// Description.
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    pub required: Option<bool>,
    /// OAS 3.x schema, kept raw (its pointer is `<param>/schema`).
    pub schema: Option<JsonValue>,
    /// OAS 3.x media-type map, the alternative to `schema`.
    pub content: Option<IndexMap<String, JsonValue>>,
    /// Legacy Swagger 2.0 primitive type (e.g. string, integer).
    #[serde(rename = "type")]
    pub legacy_type: Option<String>,
    /// Legacy Swagger 2.0 format modifier.
    pub format: Option<String>,
    /// Legacy Swagger 2.0 array item description.
    pub items: Option<ShimLegacyItems>,
}

/// Legacy Swagger 2.0 array item schema for non-body parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ShimLegacyItems {
    /// Item type (string, integer, etc.).
    #[serde(rename = "type")]
    pub legacy_type: String,
    /// Item format.
    pub format: Option<String>,
}

/// An OAS 3.x Request Body Object.
#[derive(Debug, Clone, Deserialize)]
pub struct ShimRequestBody {
    /// Description.
    pub description: Option<String>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Media types, in declaration order.
    #[serde(default)]
    pub content: IndexMap<String, JsonValue>,
}

/// A Response Object.
#[derive(Debug, Clone, Deserialize)]
pub struct ShimResponse {
    /// Description.
    pub description: Option<String>,
    /// Swagger 2.0 response schema, kept raw.
    pub schema: Option<JsonValue>,
    /// OAS 3.x media types, in declaration order.
    pub content: Option<IndexMap<String, JsonValue>>,
}

/// Returns the `$ref` string of a raw object, if it is a Reference Object.
pub(crate) fn reference_of<'a>(value: &'a JsonValue, at: &JsonPointer) -> AppResult<Option<&'a str>> {
    match value.get("$ref") {
        None => Ok(None),
        Some(JsonValue::String(r)) => Ok(Some(r.as_str())),
        Some(_) => Err(AppError::parse_at(&at.child("$ref"), "value must be a string")),
    }
}

/// Picks the media type to read a body from: `application/json`, then any
/// `+json` type, then the first declared.
pub(crate) fn select_media_type(content: &IndexMap<String, JsonValue>) -> Option<&str> {
    if content.contains_key("application/json") {
        return Some("application/json");
    }
    content
        .keys()
        .find(|k| k.ends_with("+json"))
        .or_else(|| content.keys().next())
        .map(String::as_str)
}

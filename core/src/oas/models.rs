#![deny(missing_docs)]

//! # Descriptor Models
//!
//! Definition of the Intermediate Representation (IR) handed to renderers.
//!
//! Descriptors are immutable once built and reference each other only by
//! key (schema identity or name), so a renderer can consume them read-only
//! and in parallel.

use crate::oas::pointer::JsonPointer;
use serde::Serialize;
use std::fmt;

/// Identity of a serializer: the reference path of its canonical object schema.
pub type SchemaKey = JsonPointer;

/// HTTP methods an operation can be declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Maps a Path Item key (`get`, `post`, ...) to a method.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "get" => Self::Get,
            "put" => Self::Put,
            "post" => Self::Post,
            "delete" => Self::Delete,
            "options" => Self::Options,
            "head" => Self::Head,
            "patch" => Self::Patch,
            "trace" => Self::Trace,
            _ => return None,
        })
    }

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// URL Path parameter (e.g. /users/{id})
    Path,
    /// URL Query parameter (e.g. /users?page=1)
    Query,
    /// Request header.
    Header,
    /// Cookie value.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` field of a Parameter Object.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "path" => Self::Path,
            "query" => Self::Query,
            "header" => Self::Header,
            "cookie" => Self::Cookie,
            _ => return None,
        })
    }
}

/// Scalar JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
}

/// A type as seen at a use site (field, parameter, body, response).
///
/// Object schemas are never inlined: they are referenced by serializer identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// A scalar, with its `format` modifier if any.
    Scalar {
        /// The JSON type.
        scalar: ScalarType,
        /// Format modifier (`int64`, `date-time`, ...).
        #[serde(skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// A nested serializer.
    Object {
        /// Identity of the referenced serializer.
        schema: SchemaKey,
    },
    /// A homogeneous list.
    Array {
        /// Element type.
        items: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the serializer key when this is an object type.
    pub fn object_key(&self) -> Option<&SchemaKey> {
        match self {
            FieldType::Object { schema } => Some(schema),
            _ => None,
        }
    }

    /// Returns the scalar type when this is a scalar.
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            FieldType::Scalar { scalar, .. } => Some(*scalar),
            _ => None,
        }
    }
}

/// A reference from a use site to a serializer descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializerRef {
    /// Identity of the serializer.
    pub schema: SchemaKey,
    /// The serializer's class name.
    pub serializer_class_name: String,
}

/// One property of an object schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Property name on the wire.
    pub name: String,
    /// Normalised attribute identifier.
    pub attribute: String,
    /// Resolved property type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Listed in the schema's `required`.
    pub required: bool,
    /// Accepts `null`.
    pub nullable: bool,
    /// Property description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values when the property is an enumeration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<serde_json::Value>,
}

/// One generated serializer class per distinct object schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializerDescriptor {
    /// Unique class name.
    pub serializer_class_name: String,
    /// Canonical name the class name was derived from.
    pub name: String,
    /// Whether `name` was declared in the document or synthesized from the schema's path.
    pub declared: bool,
    /// Back-reference to the object schema.
    pub schema: SchemaKey,
    /// Schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declared property order.
    pub fields: Vec<FieldDescriptor>,
    /// Other serializers referenced by the fields, in first-use order.
    pub depends_on: Vec<SchemaKey>,
}

/// A parameter of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    /// Literal name, used as the lookup key at call time.
    pub name: String,
    /// Normalised identifier for generated signatures.
    pub identifier: String,
    /// Location.
    #[serde(rename = "in_")]
    pub in_: ParamLocation,
    /// Whether the parameter is mandatory (always true for path parameters).
    pub required: bool,
    /// Resolved type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The request body of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyDescriptor {
    /// The media type the schema was read from.
    pub media_type: String,
    /// Whether the body is mandatory.
    pub required: bool,
    /// Resolved body type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// The serializer for an object (or array-of-object) body.
    pub serializer_descriptor: Option<SerializerRef>,
    /// True when the body is a collection of `serializer_descriptor`.
    pub many: bool,
}

/// One operation: a (path, HTTP verb) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerbDescriptor {
    /// HTTP method.
    pub verb: HttpMethod,
    /// Unique function name.
    pub function_name: String,
    /// The declared `operationId`.
    pub operation_id: Option<String>,
    /// Source location of the operation.
    pub location: JsonPointer,
    /// Short summary.
    pub summary: Option<String>,
    /// Free text, may be multi-line.
    pub description: Option<String>,
    /// Grouping tags.
    pub tags: Vec<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Request body, if any.
    pub request_body: Option<BodyDescriptor>,
    /// Status code of the selected success response.
    pub response_status: Option<String>,
    /// Full type of the selected success response.
    pub response_type: Option<FieldType>,
    /// Serializer of the success response.
    pub serializer_descriptor: Option<SerializerRef>,
    /// True for a collection response.
    pub many: bool,
    /// Emitted as an independent handler instead of inside its endpoint class.
    pub standalone: bool,
}

impl VerbDescriptor {
    /// Parameters that flow into the generated function signature.
    pub fn path_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.in_ == ParamLocation::Path)
    }

    /// Parameters looked up from the request by literal name at call time.
    pub fn request_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.in_ != ParamLocation::Path)
    }
}

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteSegment {
    /// Fixed text.
    Literal {
        /// Segment text.
        value: String,
    },
    /// A `{name}` placeholder.
    Param {
        /// Literal placeholder name.
        name: String,
        /// Normalised identifier.
        identifier: String,
        /// The declared parameter type.
        #[serde(rename = "type")]
        ty: FieldType,
    },
}

/// One generated endpoint class per path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointDescriptor {
    /// Unique class name derived from the path.
    pub class_name: String,
    /// The raw path template.
    pub path: String,
    /// Typed route segments.
    pub route: Vec<RouteSegment>,
    /// Verbs in declaration order.
    pub verbs: Vec<VerbDescriptor>,
}

/// An operation emitted on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualHandler {
    /// The raw path template.
    pub path: String,
    /// Typed route segments.
    pub route: Vec<RouteSegment>,
    /// The operation.
    pub verb: VerbDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_keys() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("GET"), None);
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_param_location_keys() {
        assert_eq!(ParamLocation::from_key("cookie"), Some(ParamLocation::Cookie));
        assert_eq!(ParamLocation::from_key("formData"), None);
        assert_eq!(ParamLocation::from_key("body"), None);
    }

    #[test]
    fn test_parameter_serializes_canonical_in_field() {
        let p = ParameterDescriptor {
            name: "petId".into(),
            identifier: "pet_id".into(),
            in_: ParamLocation::Path,
            required: true,
            ty: FieldType::Scalar {
                scalar: ScalarType::Integer,
                format: None,
            },
            description: None,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["in_"], json!("path"));
        assert_eq!(v["type"], json!({"kind": "scalar", "scalar": "integer"}));
    }

    #[test]
    fn test_object_field_type_serializes_schema_identity() {
        let ty = FieldType::Array {
            items: Box::new(FieldType::Object {
                schema: JsonPointer::parse("#/definitions/Pet").unwrap(),
            }),
        };
        let v = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            v,
            json!({"kind": "array", "items": {"kind": "object", "schema": "#/definitions/Pet"}})
        );
    }
}

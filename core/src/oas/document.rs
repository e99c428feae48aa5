#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Parses raw YAML (or JSON) text into an order-preserving JSON tree and
//! detects the document dialect.
//!
//! YAML allows non-string mapping keys (`200:` is an integer); every key is
//! normalised to its string form so the rest of the pipeline only sees JSON.

use crate::error::{AppError, AppResult};
use crate::oas::pointer::JsonPointer;
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use std::path::Path;

/// The document dialect, which decides where schemas and bodies live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFlavor {
    /// Swagger 2.0 (`definitions`, `in: body`, `responses.*.schema`).
    Swagger2,
    /// OpenAPI 3.x (`components`, `requestBody`, `responses.*.content`).
    OpenApi3,
}

/// A loaded source document.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    raw: JsonValue,
    flavor: SpecFlavor,
}

impl OpenApiDocument {
    /// Parses YAML or JSON text.
    ///
    /// Verifies the presence of a valid `openapi` (3.x) or `swagger` (2.0) version field.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        let yaml: YamlValue = serde_yaml::from_str(text).map_err(|e| AppError::Parse {
            location: e
                .location()
                .map(|l| format!("line {} column {}", l.line(), l.column()))
                .unwrap_or_else(|| "document".to_string()),
            message: format!("Failed to parse OpenAPI YAML: {}", e),
        })?;
        let raw = yaml_to_json(yaml, &JsonPointer::root())?;
        let flavor = detect_flavor(&raw)?;
        Ok(Self { raw, flavor })
    }

    /// Reads and parses a document from disk.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// The raw JSON tree.
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// The detected dialect.
    pub fn flavor(&self) -> SpecFlavor {
        self.flavor
    }

    /// Looks up the value a pointer designates.
    pub fn resolve(&self, pointer: &JsonPointer) -> Option<&JsonValue> {
        pointer.lookup(&self.raw)
    }

    /// Location of the named-schema table for this dialect.
    pub fn schemas_pointer(&self) -> JsonPointer {
        match self.flavor {
            SpecFlavor::Swagger2 => JsonPointer::from_segments(["definitions"]),
            SpecFlavor::OpenApi3 => JsonPointer::from_segments(["components", "schemas"]),
        }
    }

    /// Returns the object at `pointer`, failing when present but not a mapping.
    pub fn object_at(&self, pointer: &JsonPointer) -> AppResult<Option<&Map<String, JsonValue>>> {
        match self.resolve(pointer) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::Object(map)) => Ok(Some(map)),
            Some(_) => Err(AppError::parse_at(pointer, "value must be an object")),
        }
    }
}

/// Returns the schema name when `pointer` addresses an entry of a named-schema table.
pub(crate) fn declared_schema_name(pointer: &JsonPointer) -> Option<&str> {
    match pointer.segments() {
        [section, name] if section == "definitions" => Some(name.as_str()),
        [components, schemas, name] if components == "components" && schemas == "schemas" => {
            Some(name.as_str())
        }
        _ => None,
    }
}

fn detect_flavor(raw: &JsonValue) -> AppResult<SpecFlavor> {
    let root = raw.as_object().ok_or_else(|| AppError::Parse {
        location: JsonPointer::root().to_string(),
        message: "document root must be a mapping".into(),
    })?;

    if let Some(version) = root.get("openapi") {
        let version = version_string(version);
        if version.starts_with("3.") {
            return Ok(SpecFlavor::OpenApi3);
        }
        return Err(AppError::Parse {
            location: "#/openapi".into(),
            message: format!(
                "Unsupported OpenAPI version: {}. Only 3.x is supported by this parser.",
                version
            ),
        });
    }
    if let Some(version) = root.get("swagger") {
        let version = version_string(version);
        if version.starts_with("2.") {
            return Ok(SpecFlavor::Swagger2);
        }
        return Err(AppError::Parse {
            location: "#/swagger".into(),
            message: format!(
                "Unsupported Swagger version: {}. Only 2.0 is supported for legacy compatibility.",
                version
            ),
        });
    }
    Err(AppError::Parse {
        location: JsonPointer::root().to_string(),
        message: "Invalid OpenAPI document: missing 'openapi' or 'swagger' version field.".into(),
    })
}

fn version_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

const MERGE_KEY: &str = "<<";

/// Applies a `<<` merge: one mapping or a sequence of mappings, earlier sources winning.
fn merge_into(
    out: &mut Map<String, JsonValue>,
    source: JsonValue,
    at: &JsonPointer,
) -> AppResult<()> {
    let sources = match source {
        JsonValue::Object(map) => vec![map],
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::Object(map) => Ok(map),
                _ => Err(AppError::parse_at(at, "merge sequence must contain only mappings")),
            })
            .collect::<AppResult<_>>()?,
        _ => {
            return Err(AppError::parse_at(
                at,
                "merge value must be a mapping or a sequence of mappings",
            ))
        }
    };
    for map in sources {
        for (key, item) in map {
            out.entry(key).or_insert(item);
        }
    }
    Ok(())
}

fn yaml_to_json(value: YamlValue, at: &JsonPointer) -> AppResult<JsonValue> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                JsonValue::Number(u.into())
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| AppError::parse_at(at, "non-finite number"))?
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_json(item, &at.child(i.to_string())))
                .collect::<AppResult<_>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut out = Map::new();
            let mut explicit = Vec::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = match key {
                    YamlValue::String(s) => s,
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    _ => return Err(AppError::parse_at(at, "mapping keys must be scalars")),
                };
                let child = at.child(key.clone());
                let item = yaml_to_json(item, &child)?;
                if key == MERGE_KEY {
                    merge_into(&mut out, item, &child)?;
                } else {
                    explicit.push((key, item));
                }
            }
            // Explicit keys override merged ones but keep the merged position.
            for (key, item) in explicit {
                out.insert(key, item);
            }
            JsonValue::Object(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger2_detected_with_integer_status_keys() {
        let yaml = r#"
swagger: "2.0"
info: {title: T, version: "1"}
paths:
  /ping:
    get:
      responses:
        200: {description: OK}
"#;
        let doc = OpenApiDocument::from_yaml_str(yaml).unwrap();
        assert_eq!(doc.flavor(), SpecFlavor::Swagger2);
        let p = JsonPointer::from_segments(["paths", "/ping", "get", "responses", "200"]);
        assert!(doc.resolve(&p).is_some());
    }

    #[test]
    fn test_openapi3_json_input() {
        let json = r#"{"openapi": "3.0.3", "info": {"title": "T", "version": "1"}, "paths": {}}"#;
        let doc = OpenApiDocument::from_yaml_str(json).unwrap();
        assert_eq!(doc.flavor(), SpecFlavor::OpenApi3);
        assert_eq!(doc.schemas_pointer().to_string(), "#/components/schemas");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let yaml = r#"
openapi: 3.0.0
paths:
  /zeta: {}
  /alpha: {}
  /mid: {}
"#;
        let doc = OpenApiDocument::from_yaml_str(yaml).unwrap();
        let paths = doc
            .object_at(&JsonPointer::from_segments(["paths"]))
            .unwrap()
            .unwrap();
        let keys: Vec<&str> = paths.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["/zeta", "/alpha", "/mid"]);
    }

    #[test]
    fn test_missing_version_fails() {
        let res = OpenApiDocument::from_yaml_str("info: {title: T}\npaths: {}\n");
        match res.unwrap_err() {
            AppError::Parse { message, .. } => {
                assert!(message.contains("missing 'openapi' or 'swagger'"))
            }
            other => panic!("Wrong error type: {other}"),
        }
    }

    #[test]
    fn test_unsupported_version_fails() {
        assert!(OpenApiDocument::from_yaml_str("openapi: 4.0.0\n").is_err());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let res = OpenApiDocument::from_yaml_str("openapi: [3.0\npaths: {");
        assert!(matches!(res, Err(AppError::Parse { .. })));
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let yaml = r#"
swagger: "2.0"
x-common: &common
  id: {type: integer}
  created: {type: string, format: date-time}
paths: {}
definitions:
  Pet:
    type: object
    properties:
      <<: *common
      name: {type: string}
  Tag:
    type: object
    properties:
      <<: [*common, {label: {type: string}}]
      id: {type: string}
"#;
        let doc = OpenApiDocument::from_yaml_str(yaml).unwrap();
        let pet = doc
            .object_at(&JsonPointer::parse("#/definitions/Pet/properties").unwrap())
            .unwrap()
            .unwrap();
        let keys: Vec<&str> = pet.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "created", "name"]);

        let tag = doc
            .object_at(&JsonPointer::parse("#/definitions/Tag/properties").unwrap())
            .unwrap()
            .unwrap();
        let keys: Vec<&str> = tag.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "created", "label"]);
        assert_eq!(tag["id"]["type"], "string");
    }

    #[test]
    fn test_merge_of_scalar_fails() {
        let res = OpenApiDocument::from_yaml_str("openapi: 3.0.0
paths:
  <<: 3
");
        match res.unwrap_err() {
            AppError::Parse { location, .. } => assert_eq!(location, "#/paths/<<"),
            other => panic!("Wrong error type: {other}"),
        }
    }

    #[test]
    fn test_declared_schema_name() {
        let swagger = JsonPointer::parse("#/definitions/Pet").unwrap();
        let oas3 = JsonPointer::parse("#/components/schemas/Pet").unwrap();
        let nested = JsonPointer::parse("#/definitions/Pet/properties/owner").unwrap();
        assert_eq!(declared_schema_name(&swagger), Some("Pet"));
        assert_eq!(declared_schema_name(&oas3), Some("Pet"));
        assert_eq!(declared_schema_name(&nested), None);
    }
}

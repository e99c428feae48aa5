#![deny(missing_docs)]

//! # Schema Graph Loader
//!
//! Loads every schema of a document into an arena of [`SchemaNode`]s keyed by
//! reference path. A `$ref` becomes an `alias` node pointing at the node of
//! its target, so reference cycles are plain edges in the arena and loading
//! never recurses.
//!
//! Loaded first: the named-schema table (`definitions` or
//! `components/schemas`), in declaration order. Then every schema site of
//! every operation; those sites become the graph's roots.

use crate::error::{AppError, AppResult};
use crate::oas::document::OpenApiDocument;
use crate::oas::paths::PathEntry;
use crate::oas::pointer::JsonPointer;
use crate::oas::shims::reference_of;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::VecDeque;

/// Index of a node in the [`SchemaGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Classification of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// Has named properties.
    Object,
    /// Homogeneous list.
    Array,
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// Stands for another node (`$ref`, single-entry `allOf`).
    Alias,
}

impl SchemaType {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "object" => Self::Object,
            "array" => Self::Array,
            // Swagger 2 file uploads and downloads.
            "string" | "file" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => return None,
        })
    }
}

/// One schema of the document.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Identity: where the schema is declared.
    pub pointer: JsonPointer,
    /// Classification.
    pub type_: SchemaType,
    /// Description.
    pub description: Option<String>,
    /// Format modifier of a scalar.
    pub format: Option<String>,
    /// Accepts `null` (`nullable`, `x-nullable`, or `null` in a type list).
    pub nullable: bool,
    /// Enumerated values.
    pub enum_values: Vec<JsonValue>,
    /// Properties of an object, in declaration order.
    pub properties: IndexMap<String, NodeId>,
    /// Required property names of an object.
    pub required: Vec<String>,
    /// Element schema of an array.
    pub items: Option<NodeId>,
    /// Target of an alias.
    pub target: Option<NodeId>,
}

impl SchemaNode {
    fn placeholder(pointer: JsonPointer) -> Self {
        Self {
            pointer,
            type_: SchemaType::Alias,
            description: None,
            format: None,
            nullable: false,
            enum_values: Vec::new(),
            properties: IndexMap::new(),
            required: Vec::new(),
            items: None,
            target: None,
        }
    }
}

/// Arena of all loaded schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
    index: IndexMap<JsonPointer, NodeId>,
    named: Vec<NodeId>,
    roots: Vec<NodeId>,
}

impl SchemaGraph {
    /// Loads the named schemas and every schema site of `paths`.
    pub fn load(doc: &OpenApiDocument, paths: &[PathEntry]) -> AppResult<Self> {
        let mut loader = Loader {
            doc,
            graph: SchemaGraph::default(),
            queue: VecDeque::new(),
        };

        let table = doc.schemas_pointer();
        if let Some(schemas) = doc.object_at(&table)? {
            for name in schemas.keys() {
                let id = loader.intern(table.child(name.clone()));
                loader.graph.named.push(id);
            }
        }

        for site in paths
            .iter()
            .flat_map(|p| &p.operations)
            .flat_map(|op| op.schema_sites())
        {
            let id = loader.intern(site.clone());
            loader.graph.roots.push(id);
        }

        loader.drain()?;
        Ok(loader.graph)
    }

    /// Returns a node.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Looks up a node by reference path.
    pub fn id_of(&self, pointer: &JsonPointer) -> Option<NodeId> {
        self.index.get(pointer).copied()
    }

    /// Named schemas in declaration order.
    pub fn named(&self) -> &[NodeId] {
        &self.named
    }

    /// Operation schema sites in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of loaded nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

struct Loader<'a> {
    doc: &'a OpenApiDocument,
    graph: SchemaGraph,
    queue: VecDeque<NodeId>,
}

impl<'a> Loader<'a> {
    /// Returns the node for `pointer`, scheduling it for loading when new.
    fn intern(&mut self, pointer: JsonPointer) -> NodeId {
        if let Some(id) = self.graph.index.get(&pointer) {
            return *id;
        }
        let id = NodeId(self.graph.nodes.len());
        self.graph.nodes.push(SchemaNode::placeholder(pointer.clone()));
        self.graph.index.insert(pointer, id);
        self.queue.push_back(id);
        id
    }

    fn drain(&mut self) -> AppResult<()> {
        while let Some(id) = self.queue.pop_front() {
            let pointer = self.graph.nodes[id.0].pointer.clone();
            let raw = self
                .doc
                .resolve(&pointer)
                .ok_or_else(|| AppError::parse_at(&pointer, "schema not found"))?;
            let node = self.build(pointer, raw)?;
            self.graph.nodes[id.0] = node;
        }
        Ok(())
    }

    fn build(&mut self, pointer: JsonPointer, raw: &'a JsonValue) -> AppResult<SchemaNode> {
        let obj = raw
            .as_object()
            .ok_or_else(|| AppError::parse_at(&pointer, "schema must be an object"))?;
        let mut node = SchemaNode::placeholder(pointer);
        node.description = string_field(obj, "description", &node.pointer)?;

        if let Some(reference) = reference_of(raw, &node.pointer)? {
            node.target = Some(self.reference_target(reference, &node.pointer)?);
            return Ok(node);
        }

        for keyword in ["oneOf", "anyOf", "not"] {
            if obj.contains_key(keyword) {
                return Err(AppError::parse_at(
                    &node.pointer,
                    format!("composition keyword '{}' is not supported", keyword),
                ));
            }
        }
        if let Some(all_of) = obj.get("allOf") {
            match all_of.as_array().map(Vec::as_slice) {
                Some([_]) => {
                    let entry = node.pointer.child("allOf").child("0");
                    node.target = Some(self.intern(entry));
                    return Ok(node);
                }
                _ => {
                    return Err(AppError::parse_at(
                        &node.pointer.child("allOf"),
                        "only a single-entry 'allOf' is supported",
                    ))
                }
            }
        }

        node.nullable = bool_field(obj, "nullable", &node.pointer)?
            || bool_field(obj, "x-nullable", &node.pointer)?;
        let (type_, null_in_type) = declared_type(obj, &node.pointer)?;
        node.nullable |= null_in_type;
        node.type_ = type_;
        node.format = string_field(obj, "format", &node.pointer)?;
        if node.format.is_none() && obj.get("type").and_then(JsonValue::as_str) == Some("file") {
            node.format = Some("binary".to_string());
        }
        if let Some(values) = obj.get("enum") {
            node.enum_values = values
                .as_array()
                .ok_or_else(|| AppError::parse_at(&node.pointer.child("enum"), "value must be an array"))?
                .clone();
        }

        match type_ {
            SchemaType::Object => {
                if let Some(props) = obj.get("properties") {
                    let props_ptr = node.pointer.child("properties");
                    let props = props
                        .as_object()
                        .ok_or_else(|| AppError::parse_at(&props_ptr, "value must be an object"))?;
                    for name in props.keys() {
                        let id = self.intern(props_ptr.child(name.clone()));
                        node.properties.insert(name.clone(), id);
                    }
                }
                node.required = required_list(obj, &node.pointer)?;
            }
            SchemaType::Array => {
                if !obj.contains_key("items") {
                    return Err(AppError::parse_at(
                        &node.pointer,
                        "array schema requires 'items'",
                    ));
                }
                node.items = Some(self.intern(node.pointer.child("items")));
            }
            _ => {}
        }
        Ok(node)
    }

    fn reference_target(&mut self, reference: &str, at: &JsonPointer) -> AppResult<NodeId> {
        let unresolved = || AppError::UnresolvedReference {
            reference: reference.to_string(),
            location: at.clone(),
        };
        let target = JsonPointer::parse(reference).map_err(|_| unresolved())?;
        if self.doc.resolve(&target).is_none() {
            return Err(unresolved());
        }
        Ok(self.intern(target))
    }
}

/// Reads `type`, returning the classification and whether `null` was listed.
fn declared_type(obj: &Map<String, JsonValue>, at: &JsonPointer) -> AppResult<(SchemaType, bool)> {
    let type_ptr = at.child("type");
    let (name, nullable) = match obj.get("type") {
        Some(JsonValue::String(name)) => (Some(name.as_str()), false),
        Some(JsonValue::Array(names)) => {
            let mut nullable = false;
            let mut concrete = Vec::new();
            for name in names {
                match name.as_str() {
                    Some("null") => nullable = true,
                    Some(other) => concrete.push(other),
                    None => return Err(AppError::parse_at(&type_ptr, "type names must be strings")),
                }
            }
            match concrete.as_slice() {
                [single] => (Some(*single), nullable),
                _ => {
                    return Err(AppError::parse_at(
                        &type_ptr,
                        "a type list must name exactly one type besides 'null'",
                    ))
                }
            }
        }
        Some(_) => return Err(AppError::parse_at(&type_ptr, "value must be a string")),
        None => (None, false),
    };

    let type_ = match name {
        Some(name) => SchemaType::from_name(name).ok_or_else(|| {
            AppError::parse_at(&type_ptr, format!("unsupported schema type '{}'", name))
        })?,
        None if obj.contains_key("properties") => SchemaType::Object,
        None if obj.contains_key("items") => SchemaType::Array,
        None => return Err(AppError::parse_at(at, "schema declares no type")),
    };
    Ok((type_, nullable))
}

fn string_field(obj: &Map<String, JsonValue>, key: &str, at: &JsonPointer) -> AppResult<Option<String>> {
    match obj.get(key) {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::parse_at(&at.child(key), "value must be a string")),
    }
}

fn bool_field(obj: &Map<String, JsonValue>, key: &str, at: &JsonPointer) -> AppResult<bool> {
    match obj.get(key) {
        None => Ok(false),
        Some(JsonValue::Bool(b)) => Ok(*b),
        Some(_) => Err(AppError::parse_at(&at.child(key), "value must be a boolean")),
    }
}

fn required_list(obj: &Map<String, JsonValue>, at: &JsonPointer) -> AppResult<Vec<String>> {
    let Some(raw) = obj.get("required") else {
        return Ok(Vec::new());
    };
    let invalid = || AppError::parse_at(&at.child("required"), "value must be a list of strings");
    raw.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::paths::parse_paths;

    fn load(yaml: &str) -> AppResult<SchemaGraph> {
        let doc = OpenApiDocument::from_yaml_str(yaml).unwrap();
        let paths = parse_paths(&doc)?;
        SchemaGraph::load(&doc, &paths)
    }

    fn node<'g>(graph: &'g SchemaGraph, pointer: &str) -> &'g SchemaNode {
        let id = graph.id_of(&JsonPointer::parse(pointer).unwrap()).unwrap();
        graph.node(id)
    }

    #[test]
    fn test_named_schemas_and_properties() {
        let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  Pet:
    type: object
    required: [name]
    properties:
      name: {type: string}
      age: {type: integer, format: int32}
      owner: {$ref: '#/definitions/Owner'}
  Owner:
    properties:
      email: {type: string, x-nullable: true}
"#;
        let graph = load(yaml).unwrap();
        assert_eq!(graph.named().len(), 2);
        let pet = node(&graph, "#/definitions/Pet");
        assert_eq!(pet.type_, SchemaType::Object);
        let names: Vec<&str> = pet.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "age", "owner"]);
        assert_eq!(pet.required, vec!["name".to_string()]);

        let owner_ref = graph.node(pet.properties["owner"]);
        assert_eq!(owner_ref.type_, SchemaType::Alias);
        let target = graph.node(owner_ref.target.unwrap());
        assert_eq!(target.pointer.to_string(), "#/definitions/Owner");
        assert_eq!(target.type_, SchemaType::Object);

        let email = node(&graph, "#/definitions/Owner/properties/email");
        assert!(email.nullable);
        assert_eq!(node(&graph, "#/definitions/Pet/properties/age").format.as_deref(), Some("int32"));
    }

    #[test]
    fn test_roots_follow_operation_order() {
        let yaml = r#"
openapi: 3.0.0
paths:
  /pets:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
components:
  schemas:
    Pet: {type: object, properties: {name: {type: string}}}
"#;
        let graph = load(yaml).unwrap();
        assert_eq!(graph.roots().len(), 1);
        let root = graph.node(graph.roots()[0]);
        assert_eq!(root.type_, SchemaType::Array);
        let items = graph.node(root.items.unwrap());
        assert_eq!(items.type_, SchemaType::Alias);
    }

    #[test]
    fn test_swagger_file_is_binary_string() {
        let yaml = r#"
swagger: "2.0"
paths:
  /report:
    get:
      responses:
        200:
          description: OK
          schema: {type: file}
"#;
        let graph = load(yaml).unwrap();
        let file = node(&graph, "#/paths/~1report/get/responses/200/schema");
        assert_eq!(file.type_, SchemaType::String);
        assert_eq!(file.format.as_deref(), Some("binary"));
    }

    #[test]
    fn test_array_without_items_fails() {
        let yaml = r#"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        tags: {type: array}
"#;
        match load(yaml).unwrap_err() {
            AppError::Parse { location, message } => {
                assert_eq!(location, "#/components/schemas/Pet/properties/tags");
                assert!(message.contains("requires 'items'"));
            }
            other => panic!("Wrong error type: {other}"),
        }
    }

    #[test]
    fn test_type_list_with_null() {
        let yaml = r#"
openapi: 3.1.0
paths: {}
components:
  schemas:
    Tag:
      type: object
      properties:
        label: {type: [string, "null"]}
"#;
        let graph = load(yaml).unwrap();
        let label = node(&graph, "#/components/schemas/Tag/properties/label");
        assert_eq!(label.type_, SchemaType::String);
        assert!(label.nullable);
    }

    #[test]
    fn test_single_entry_all_of_is_alias() {
        let yaml = r#"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Base: {type: object, properties: {id: {type: integer}}}
    Derived:
      allOf:
        - $ref: '#/components/schemas/Base'
"#;
        let graph = load(yaml).unwrap();
        let derived = node(&graph, "#/components/schemas/Derived");
        assert_eq!(derived.type_, SchemaType::Alias);
        let entry = graph.node(derived.target.unwrap());
        assert_eq!(entry.pointer.to_string(), "#/components/schemas/Derived/allOf/0");
    }

    #[test]
    fn test_multi_entry_composition_rejected() {
        let yaml = r#"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Either:
      oneOf:
        - {type: string}
        - {type: integer}
"#;
        assert!(matches!(load(yaml), Err(AppError::Parse { .. })));
    }

    #[test]
    fn test_dangling_reference() {
        let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  Pet:
    properties:
      owner: {$ref: '#/definitions/Missing'}
"#;
        match load(yaml).unwrap_err() {
            AppError::UnresolvedReference { reference, location } => {
                assert_eq!(reference, "#/definitions/Missing");
                assert_eq!(location.to_string(), "#/definitions/Pet/properties/owner");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_external_reference_is_unresolved() {
        let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  Pet: {$ref: 'common.yaml#/definitions/Pet'}
"#;
        assert!(matches!(load(yaml), Err(AppError::UnresolvedReference { .. })));
    }

    #[test]
    fn test_untyped_schema_rejected() {
        let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  Loose: {description: anything goes}
"#;
        match load(yaml).unwrap_err() {
            AppError::Parse { location, message } => {
                assert_eq!(location, "#/definitions/Loose");
                assert!(message.contains("no type"));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_alias_cycle_loads_without_looping() {
        let yaml = r#"
swagger: "2.0"
paths: {}
definitions:
  A: {$ref: '#/definitions/B'}
  B: {$ref: '#/definitions/A'}
"#;
        let graph = load(yaml).unwrap();
        assert_eq!(graph.len(), 2);
    }
}

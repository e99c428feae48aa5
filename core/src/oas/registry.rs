#![deny(missing_docs)]

//! # Document Registry
//!
//! Owns every descriptor of one generation run: the schema graph, the
//! serializers keyed by schema identity, the endpoints and the standalone
//! handlers.
//!
//! Built once by [`DocumentRegistry::build`], which runs the whole pipeline:
//! Load -> Resolve -> Build Serializers -> Extract Operations -> Group.
//! Any failure aborts the run; there are no partial registries. Once built the
//! registry is immutable and can be shared across rendering threads.

use crate::config::BuildOptions;
use crate::error::AppResult;
use crate::oas::context::GenerationContext;
use crate::oas::document::{OpenApiDocument, SpecFlavor};
use crate::oas::endpoints::group_endpoints;
use crate::oas::graph::SchemaGraph;
use crate::oas::models::{EndpointDescriptor, IndividualHandler, SchemaKey, SerializerDescriptor};
use crate::oas::paths::parse_paths;
use crate::oas::resolver::TypeResolver;
use crate::oas::routes::extract_operations;
use crate::oas::schemas::build_serializers;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{info, info_span};

/// All descriptors of one document.
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    flavor: SpecFlavor,
    graph: SchemaGraph,
    serializers: IndexMap<SchemaKey, SerializerDescriptor>,
    endpoints: Vec<EndpointDescriptor>,
    individual_handlers: Vec<IndividualHandler>,
}

impl DocumentRegistry {
    /// Runs the descriptor pipeline over a loaded document.
    pub fn build(doc: &OpenApiDocument, options: BuildOptions) -> AppResult<Self> {
        let span = info_span!("generate", flavor = ?doc.flavor());
        let _guard = span.enter();

        let paths = parse_paths(doc)?;
        let graph = SchemaGraph::load(doc, &paths)?;
        info!(
            paths = paths.len(),
            nodes = graph.len(),
            named = graph.named().len(),
            "Loaded schema graph"
        );

        let mut ctx = GenerationContext::new(options);
        let (serializers, grouped) = {
            let resolver = TypeResolver::new(&graph)?;
            let mut roots = graph.roots().to_vec();
            if ctx.options.include_unreferenced_schemas {
                roots.extend_from_slice(graph.named());
            }
            let objects = resolver.discover(&roots);
            info!(objects = objects.len(), "Resolved object schemas");

            let serializers = build_serializers(&mut ctx, &resolver, &objects)?;
            info!(serializers = serializers.len(), "Built serializer descriptors");

            let extracted = extract_operations(&mut ctx, &resolver, &serializers, &paths)?;
            let grouped = group_endpoints(&mut ctx, extracted)?;
            info!(
                endpoints = grouped.endpoints.len(),
                individual_handlers = grouped.individual_handlers.len(),
                "Grouped endpoints"
            );
            (serializers, grouped)
        };

        Ok(Self {
            flavor: doc.flavor(),
            graph,
            serializers,
            endpoints: grouped.endpoints,
            individual_handlers: grouped.individual_handlers,
        })
    }

    /// Parses YAML or JSON text and builds its registry.
    pub fn from_yaml_str(text: &str, options: BuildOptions) -> AppResult<Self> {
        Self::build(&OpenApiDocument::from_yaml_str(text)?, options)
    }

    /// Reads a document from disk and builds its registry.
    pub fn from_path(path: &Path, options: BuildOptions) -> AppResult<Self> {
        Self::build(&OpenApiDocument::from_path(path)?, options)
    }

    /// The dialect of the source document.
    pub fn flavor(&self) -> SpecFlavor {
        self.flavor
    }

    /// Every schema node of the document.
    pub fn schema_graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Serializers keyed by schema identity, in first-discovery order.
    pub fn serializers(&self) -> &IndexMap<SchemaKey, SerializerDescriptor> {
        &self.serializers
    }

    /// Looks up the serializer of an object schema.
    pub fn serializer(&self, schema: &SchemaKey) -> Option<&SerializerDescriptor> {
        self.serializers.get(schema)
    }

    /// Endpoints in first-seen path order.
    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    /// Standalone handlers in declaration order.
    pub fn individual_handlers(&self) -> &[IndividualHandler] {
        &self.individual_handlers
    }

    /// Serializers ordered so each follows the serializers its fields reference.
    ///
    /// Reference cycles are broken at the back edge; ties keep discovery order.
    pub fn serializers_in_dependency_order(&self) -> Vec<&SerializerDescriptor> {
        let mut visited = vec![false; self.serializers.len()];
        let mut order = Vec::with_capacity(self.serializers.len());
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..self.serializers.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push((start, 0));

            while let Some(&(current, next)) = stack.last() {
                let descriptor = &self.serializers[current];
                match descriptor.depends_on.get(next) {
                    Some(dep) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        if let Some(dep_index) = self.serializers.get_index_of(dep) {
                            if !visited[dep_index] {
                                visited[dep_index] = true;
                                stack.push((dep_index, 0));
                            }
                        }
                    }
                    None => {
                        stack.pop();
                        order.push(descriptor);
                    }
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(list: &[&SerializerDescriptor]) -> Vec<String> {
        list.iter().map(|s| s.serializer_class_name.clone()).collect()
    }

    #[test]
    fn test_dependency_order() {
        let yaml = r#"
swagger: "2.0"
paths:
  /orders:
    get:
      responses:
        200:
          description: OK
          schema: {$ref: '#/definitions/Order'}
definitions:
  Order:
    type: object
    properties:
      customer: {$ref: '#/definitions/Customer'}
      lines:
        type: array
        items: {$ref: '#/definitions/Line'}
  Customer:
    type: object
    properties:
      address: {$ref: '#/definitions/Address'}
  Address:
    type: object
    properties:
      city: {type: string}
  Line:
    type: object
    properties:
      sku: {type: string}
"#;
        let registry = DocumentRegistry::from_yaml_str(yaml, BuildOptions::default()).unwrap();
        let discovered: Vec<&SerializerDescriptor> = registry.serializers().values().collect();
        assert_eq!(
            classes(&discovered),
            vec!["OrderSerializer", "CustomerSerializer", "AddressSerializer", "LineSerializer"]
        );
        assert_eq!(
            classes(&registry.serializers_in_dependency_order()),
            vec!["AddressSerializer", "CustomerSerializer", "LineSerializer", "OrderSerializer"]
        );
    }

    #[test]
    fn test_dependency_order_with_cycle() {
        let yaml = r#"
swagger: "2.0"
paths:
  /a:
    get:
      responses:
        200:
          description: OK
          schema: {$ref: '#/definitions/A'}
definitions:
  A:
    type: object
    properties:
      b: {$ref: '#/definitions/B'}
  B:
    type: object
    properties:
      a: {$ref: '#/definitions/A'}
"#;
        let registry = DocumentRegistry::from_yaml_str(yaml, BuildOptions::default()).unwrap();
        assert_eq!(
            classes(&registry.serializers_in_dependency_order()),
            vec!["BSerializer", "ASerializer"]
        );
    }

    #[test]
    fn test_unreferenced_schemas_are_opt_in() {
        let yaml = r#"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Orphan: {type: object, properties: {id: {type: integer}}}
"#;
        let default = DocumentRegistry::from_yaml_str(yaml, BuildOptions::default()).unwrap();
        assert!(default.serializers().is_empty());

        let options = BuildOptions {
            include_unreferenced_schemas: true,
            ..BuildOptions::default()
        };
        let all = DocumentRegistry::from_yaml_str(yaml, options).unwrap();
        assert_eq!(all.serializers().len(), 1);
        let key = SchemaKey::parse("#/components/schemas/Orphan").unwrap();
        assert_eq!(all.serializer(&key).unwrap().serializer_class_name, "OrphanSerializer");
    }

    #[test]
    fn test_custom_suffixes() {
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
              schema: {$ref: '#/components/schemas/Pet'}
components:
  schemas:
    Pet: {type: object, properties: {name: {type: string}}}
"#;
        let options = BuildOptions::from_yaml_str("serializer-suffix: Schema\nendpoint-suffix: Resource\n").unwrap();
        let registry = DocumentRegistry::from_yaml_str(yaml, options).unwrap();
        assert_eq!(registry.endpoints()[0].class_name, "PetsResource");
        assert_eq!(
            registry.endpoints()[0].verbs[0]
                .serializer_descriptor
                .as_ref()
                .unwrap()
                .serializer_class_name,
            "PetSchema"
        );
    }
}

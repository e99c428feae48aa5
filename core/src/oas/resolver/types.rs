#![deny(missing_docs)]

//! # Type Resolution
//!
//! Follows alias chains to their canonical nodes, maps nodes to use-site
//! [`FieldType`]s and discovers the object schemas reachable from the
//! document's operations.

use crate::error::{AliasChain, AppError, AppResult};
use crate::oas::graph::{NodeId, SchemaGraph, SchemaNode, SchemaType};
use crate::oas::models::{FieldType, ScalarType, SchemaKey};
use std::collections::HashSet;

/// How a use site consumes a serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerUsage {
    /// Identity of the object schema.
    pub schema: SchemaKey,
    /// True when the site is an array of that object.
    pub many: bool,
}

/// Resolves schema nodes of one graph.
#[derive(Debug)]
pub struct TypeResolver<'g> {
    graph: &'g SchemaGraph,
    canonical: Vec<NodeId>,
}

impl<'g> TypeResolver<'g> {
    /// Computes the canonical target of every node.
    ///
    /// Fails with `CyclicAlias` when an alias chain never reaches a concrete node.
    pub fn new(graph: &'g SchemaGraph) -> AppResult<Self> {
        let mut canonical: Vec<Option<NodeId>> = vec![None; graph.len()];

        for (start, _) in graph.iter() {
            if canonical[start.index()].is_some() {
                continue;
            }
            let mut chain = vec![start];
            let mut current = start;
            let resolved = loop {
                if let Some(done) = canonical[current.index()] {
                    break done;
                }
                let node = graph.node(current);
                match (node.type_, node.target) {
                    (SchemaType::Alias, Some(next)) => {
                        if chain.contains(&next) {
                            let mut pointers: Vec<_> =
                                chain.iter().map(|id| graph.node(*id).pointer.clone()).collect();
                            pointers.push(graph.node(next).pointer.clone());
                            return Err(AppError::CyclicAlias {
                                chain: AliasChain(pointers),
                            });
                        }
                        chain.push(next);
                        current = next;
                    }
                    _ => break current,
                }
            };
            for id in chain {
                canonical[id.index()] = Some(resolved);
            }
        }

        Ok(Self {
            graph,
            canonical: canonical.into_iter().flatten().collect(),
        })
    }

    /// The graph being resolved.
    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    /// The first non-alias node reached from `id`.
    pub fn canonical(&self, id: NodeId) -> NodeId {
        self.canonical[id.index()]
    }

    /// The canonical node itself.
    pub fn canonical_node(&self, id: NodeId) -> &'g SchemaNode {
        self.graph.node(self.canonical(id))
    }

    /// Whether any node on the alias chain from `id` accepts `null`.
    pub fn is_nullable(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let node = self.graph.node(current);
            if node.nullable {
                return true;
            }
            match node.target {
                Some(next) if node.type_ == SchemaType::Alias => current = next,
                _ => return false,
            }
        }
    }

    /// The description closest to the use site.
    pub fn description(&self, id: NodeId) -> Option<String> {
        self.graph
            .node(id)
            .description
            .clone()
            .or_else(|| self.canonical_node(id).description.clone())
    }

    /// Maps a node to the type seen at a use site.
    ///
    /// Fails with `CyclicAlias` for an array that (transitively) contains itself.
    pub fn field_type(&self, id: NodeId) -> AppResult<FieldType> {
        let mut arrays = Vec::new();
        let mut current = self.canonical(id);
        loop {
            let node = self.graph.node(current);
            let inner = match node.type_ {
                SchemaType::Array => {
                    if arrays.contains(&current) {
                        arrays.push(current);
                        return Err(AppError::CyclicAlias {
                            chain: AliasChain(
                                arrays.iter().map(|a| self.graph.node(*a).pointer.clone()).collect(),
                            ),
                        });
                    }
                    arrays.push(current);
                    let items = node.items.ok_or_else(|| {
                        AppError::parse_at(&node.pointer, "array schema requires 'items'")
                    })?;
                    current = self.canonical(items);
                    continue;
                }
                SchemaType::Object => FieldType::Object {
                    schema: node.pointer.clone(),
                },
                other => FieldType::Scalar {
                    scalar: scalar_of(other),
                    format: node.format.clone(),
                },
            };
            return Ok(arrays.iter().fold(inner, |acc, _| FieldType::Array {
                items: Box::new(acc),
            }));
        }
    }

    /// The serializer a use site consumes: an object, or an array of objects (`many`).
    pub fn usage(&self, id: NodeId) -> Option<SerializerUsage> {
        let node = self.canonical_node(id);
        match node.type_ {
            SchemaType::Object => Some(SerializerUsage {
                schema: node.pointer.clone(),
                many: false,
            }),
            SchemaType::Array => {
                let items = self.canonical_node(node.items?);
                (items.type_ == SchemaType::Object).then(|| SerializerUsage {
                    schema: items.pointer.clone(),
                    many: true,
                })
            }
            _ => None,
        }
    }

    /// Canonical object nodes reachable from `roots`, in first-discovery order.
    ///
    /// Depth-first, pre-order, properties visited in declaration order.
    pub fn discover(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        let mut stack = Vec::new();

        for root in roots {
            stack.push(*root);
            while let Some(id) = stack.pop() {
                let id = self.canonical(id);
                if !visited.insert(id) {
                    continue;
                }
                let node = self.graph.node(id);
                match node.type_ {
                    SchemaType::Object => {
                        found.push(id);
                        stack.extend(node.properties.values().rev().copied());
                    }
                    SchemaType::Array => stack.extend(node.items),
                    _ => {}
                }
            }
        }
        found
    }
}

fn scalar_of(type_: SchemaType) -> ScalarType {
    match type_ {
        SchemaType::Integer => ScalarType::Integer,
        SchemaType::Number => ScalarType::Number,
        SchemaType::Boolean => ScalarType::Boolean,
        _ => ScalarType::String,
    }
}

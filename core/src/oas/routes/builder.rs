#![deny(missing_docs)]

//! # Verb Builder
//!
//! Logic that transforms one resolved [`OperationEntry`] into a [`VerbDescriptor`].

use crate::error::{AppError, AppResult};
use crate::oas::context::GenerationContext;
use crate::oas::graph::NodeId;
use crate::oas::models::{
    BodyDescriptor, ParamLocation, ParameterDescriptor, SchemaKey, SerializerDescriptor,
    SerializerRef, VerbDescriptor,
};
use crate::oas::naming::derive_handler_name;
use crate::oas::paths::OperationEntry;
use crate::oas::pointer::JsonPointer;
use crate::oas::resolver::{resolve_parameter_type, select_success_response, TypeResolver};
use crate::oas::routes::template::{parse_template, placeholders};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Builds the descriptor of one operation of `path`.
pub fn build_verb(
    ctx: &mut GenerationContext,
    resolver: &TypeResolver<'_>,
    serializers: &IndexMap<SchemaKey, SerializerDescriptor>,
    path: &str,
    op: &OperationEntry,
) -> AppResult<VerbDescriptor> {
    // 1. Function Name
    let function_name = match op.shim.function_name.as_ref().or(op.shim.operation_id.as_ref()) {
        Some(source) => ctx.idents.snake(source),
        None => ctx.idents.sanitize(&derive_handler_name(op.method, path)),
    };
    let function_name = ctx.functions.claim(function_name, &op.pointer)?;

    // 2. Parameters
    let mut parameters = Vec::with_capacity(op.parameters.len());
    let mut signature: HashMap<String, &str> = HashMap::new();
    for p in &op.parameters {
        let identifier = ctx.idents.snake(&p.shim.name);
        if p.location == ParamLocation::Path {
            if let Some(other) = signature.insert(identifier.clone(), &p.shim.name) {
                return Err(AppError::DuplicateParameter {
                    name: format!("{} / {}", other, p.shim.name),
                    operation: op.pointer.clone(),
                });
            }
        }
        let schema_description = p
            .schema
            .as_ref()
            .and_then(|s| resolver.graph().id_of(s))
            .and_then(|id| resolver.description(id));
        parameters.push(ParameterDescriptor {
            name: p.shim.name.clone(),
            identifier,
            in_: p.location,
            required: p.location == ParamLocation::Path || p.shim.required.unwrap_or(false),
            ty: resolve_parameter_type(resolver, p)?,
            description: p.shim.description.clone().or(schema_description),
        });
    }
    validate_path_parameters(path, &op.pointer, &parameters)?;

    // 3. Request Body
    let mut request_body = None;
    if let Some(body) = &op.request_body {
        if let Some(schema) = &body.schema {
            let id = node_id(resolver, schema)?;
            let usage = resolver.usage(id);
            request_body = Some(BodyDescriptor {
                media_type: body.media_type.clone(),
                required: body.required,
                ty: resolver.field_type(id)?,
                many: usage.as_ref().is_some_and(|u| u.many),
                serializer_descriptor: usage
                    .map(|u| serializer_ref(serializers, &u.schema))
                    .transpose()?,
            });
        }
    }

    // 4. Success Response
    let success = select_success_response(&op.responses);
    let mut response_type = None;
    let mut serializer_descriptor = None;
    let mut many = false;
    if let Some(schema) = success.and_then(|r| r.schema.as_ref()) {
        let id = node_id(resolver, schema)?;
        response_type = Some(resolver.field_type(id)?);
        if let Some(usage) = resolver.usage(id) {
            many = usage.many;
            serializer_descriptor = Some(serializer_ref(serializers, &usage.schema)?);
        }
    }

    Ok(VerbDescriptor {
        verb: op.method,
        function_name,
        operation_id: op.shim.operation_id.clone(),
        location: op.pointer.clone(),
        summary: op.shim.summary.clone(),
        description: op.shim.description.clone(),
        tags: op.shim.tags.clone(),
        deprecated: op.shim.deprecated,
        parameters,
        request_body,
        response_status: success.map(|r| r.status.clone()),
        response_type,
        serializer_descriptor,
        many,
        standalone: op.shim.standalone,
    })
}

/// Checks that path parameters and template placeholders match both ways.
fn validate_path_parameters(
    path: &str,
    operation: &JsonPointer,
    params: &[ParameterDescriptor],
) -> AppResult<()> {
    let parts = parse_template(path)?;
    let template_vars = placeholders(&parts);
    let declared: Vec<&str> = params
        .iter()
        .filter(|p| p.in_ == ParamLocation::Path)
        .map(|p| p.name.as_str())
        .collect();

    let missing_placeholders: Vec<String> = template_vars
        .iter()
        .filter(|name| !declared.contains(*name))
        .map(|name| name.to_string())
        .collect();
    let undeclared_parameters: Vec<String> = declared
        .iter()
        .filter(|name| !template_vars.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if missing_placeholders.is_empty() && undeclared_parameters.is_empty() {
        return Ok(());
    }
    Err(AppError::PathParameterMismatch {
        path: path.to_string(),
        operation: operation.clone(),
        missing_placeholders,
        undeclared_parameters,
    })
}

fn node_id(resolver: &TypeResolver<'_>, schema: &JsonPointer) -> AppResult<NodeId> {
    resolver
        .graph()
        .id_of(schema)
        .ok_or_else(|| AppError::General(format!("schema {} was not loaded", schema)))
}

fn serializer_ref(
    serializers: &IndexMap<SchemaKey, SerializerDescriptor>,
    schema: &SchemaKey,
) -> AppResult<SerializerRef> {
    let descriptor = serializers.get(schema).ok_or_else(|| {
        AppError::General(format!("no serializer was built for {}", schema))
    })?;
    Ok(SerializerRef {
        schema: schema.clone(),
        serializer_class_name: descriptor.serializer_class_name.clone(),
    })
}

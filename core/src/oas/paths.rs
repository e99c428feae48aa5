#![deny(missing_docs)]

//! # Path Table Parsing
//!
//! Walks `paths` in declaration order and decodes each operation into an
//! [`OperationEntry`]: shims plus the pointers of every schema the operation
//! declares. Reference Objects on path items, parameters, request bodies and
//! responses are followed within the document.
//!
//! Both the schema graph loader (which needs the schema sites) and the
//! operation extractor (which needs the shims) consume these entries.

use crate::error::{AliasChain, AppError, AppResult};
use crate::oas::document::{OpenApiDocument, SpecFlavor};
use crate::oas::models::{HttpMethod, ParamLocation};
use crate::oas::pointer::JsonPointer;
use crate::oas::shims::{
    decode, reference_of, select_media_type, ShimOperation, ShimParameter, ShimRequestBody,
    ShimResponse,
};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// One entry of the path table.
#[derive(Debug, Clone)]
pub struct PathEntry {
    /// The raw path template.
    pub template: String,
    /// Location of the Path Item.
    pub pointer: JsonPointer,
    /// Operations in declaration order.
    pub operations: Vec<OperationEntry>,
}

/// One operation with its references resolved.
#[derive(Debug, Clone)]
pub struct OperationEntry {
    /// HTTP method.
    pub method: HttpMethod,
    /// Location of the Operation Object.
    pub pointer: JsonPointer,
    /// Decoded operation fields.
    pub shim: ShimOperation,
    /// Operation parameters followed by inherited path-level parameters.
    pub parameters: Vec<ParameterEntry>,
    /// Request body (OAS 3.x `requestBody` or a Swagger 2.0 `in: body` parameter).
    pub request_body: Option<BodyEntry>,
    /// Responses in declaration order.
    pub responses: Vec<ResponseEntry>,
}

impl OperationEntry {
    /// Pointers of every schema this operation declares, in declaration order.
    pub fn schema_sites(&self) -> Vec<&JsonPointer> {
        self.parameters
            .iter()
            .filter_map(|p| p.schema.as_ref())
            .chain(self.request_body.as_ref().and_then(|b| b.schema.as_ref()))
            .chain(self.responses.iter().filter_map(|r| r.schema.as_ref()))
            .collect()
    }
}

/// A resolved parameter.
#[derive(Debug, Clone)]
pub struct ParameterEntry {
    /// Location of the (dereferenced) Parameter Object.
    pub pointer: JsonPointer,
    /// Classified location.
    pub location: ParamLocation,
    /// Decoded fields.
    pub shim: ShimParameter,
    /// Pointer of the parameter's schema, when it declares one.
    pub schema: Option<JsonPointer>,
}

/// A resolved request body.
#[derive(Debug, Clone)]
pub struct BodyEntry {
    /// Location of the (dereferenced) body declaration.
    pub pointer: JsonPointer,
    /// Media type the schema was read from.
    pub media_type: String,
    /// Whether the body is mandatory.
    pub required: bool,
    /// Pointer of the body schema.
    pub schema: Option<JsonPointer>,
}

/// A resolved response.
#[derive(Debug, Clone)]
pub struct ResponseEntry {
    /// Status code key (`200`, `2XX`, `default`).
    pub status: String,
    /// Location of the (dereferenced) Response Object.
    pub pointer: JsonPointer,
    /// Media type the schema was read from (OAS 3.x).
    pub media_type: Option<String>,
    /// Pointer of the response schema.
    pub schema: Option<JsonPointer>,
}

const PATH_ITEM_PASSIVE_KEYS: &[&str] = &["summary", "description", "servers"];

/// Parses the path table of a document.
pub fn parse_paths(doc: &OpenApiDocument) -> AppResult<Vec<PathEntry>> {
    let paths_ptr = JsonPointer::from_segments(["paths"]);
    let Some(paths) = doc.object_at(&paths_ptr)? else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for (template, raw_item) in paths {
        if template.starts_with("x-") {
            continue;
        }
        let item_ptr = paths_ptr.child(template.clone());
        if !template.starts_with('/') {
            return Err(AppError::parse_at(&item_ptr, "path must begin with '/'"));
        }
        let (resolved_ptr, item) = follow_refs(doc, &item_ptr, raw_item)?;
        let item = item
            .as_object()
            .ok_or_else(|| AppError::parse_at(&resolved_ptr, "path item must be an object"))?;

        let mut common = Vec::new();
        if let Some(raw_params) = item.get("parameters") {
            let list_ptr = resolved_ptr.child("parameters");
            let raw_params = raw_params
                .as_array()
                .ok_or_else(|| AppError::parse_at(&list_ptr, "value must be an array"))?;
            common = parse_parameter_list(doc, &list_ptr, raw_params)?;
        }

        let mut operations = Vec::new();
        for (key, raw_op) in item {
            if key.starts_with("x-")
                || key == "parameters"
                || key == "$ref"
                || PATH_ITEM_PASSIVE_KEYS.contains(&key.as_str())
            {
                continue;
            }
            let op_ptr = resolved_ptr.child(key.clone());
            let method = HttpMethod::from_key(key).ok_or_else(|| {
                AppError::parse_at(&op_ptr, format!("unknown path item field '{}'", key))
            })?;
            operations.push(parse_operation(doc, method, op_ptr, raw_op, &common)?);
        }

        entries.push(PathEntry {
            template: template.clone(),
            pointer: item_ptr,
            operations,
        });
    }
    Ok(entries)
}

/// Follows Reference Objects until a concrete object is reached.
pub(crate) fn follow_refs<'a>(
    doc: &'a OpenApiDocument,
    at: &JsonPointer,
    value: &'a JsonValue,
) -> AppResult<(JsonPointer, &'a JsonValue)> {
    let mut current_ptr = at.clone();
    let mut current = value;
    let mut chain = vec![current_ptr.clone()];
    let mut seen = HashSet::new();
    seen.insert(current_ptr.clone());

    while let Some(reference) = reference_of(current, &current_ptr)? {
        let unresolved = || AppError::UnresolvedReference {
            reference: reference.to_string(),
            location: current_ptr.clone(),
        };
        let target = JsonPointer::parse(reference).map_err(|_| unresolved())?;
        let next = doc.resolve(&target).ok_or_else(unresolved)?;
        chain.push(target.clone());
        if !seen.insert(target.clone()) {
            return Err(AppError::CyclicAlias {
                chain: AliasChain(chain),
            });
        }
        current_ptr = target;
        current = next;
    }
    Ok((current_ptr, current))
}

/// A parameter list entry before body parameters are split off.
enum RawParameter {
    Located(ParameterEntry),
    Body(BodyEntry),
}

fn parse_parameter_list(
    doc: &OpenApiDocument,
    list_ptr: &JsonPointer,
    items: &[JsonValue],
) -> AppResult<Vec<RawParameter>> {
    items
        .iter()
        .enumerate()
        .map(|(i, raw_param)| parse_parameter(doc, &list_ptr.child(i.to_string()), raw_param))
        .collect()
}

fn parse_parameter(
    doc: &OpenApiDocument,
    at: &JsonPointer,
    raw: &JsonValue,
) -> AppResult<RawParameter> {
    let (pointer, value) = follow_refs(doc, at, raw)?;
    let shim: ShimParameter = decode(value, &pointer)?;
    let schema = match (&shim.schema, &shim.content) {
        (Some(_), _) => Some(pointer.child("schema")),
        (None, Some(content)) => select_media_type(content).and_then(|mt| {
            content
                .get(mt)
                .and_then(|media| media_schema(media, &pointer.child("content").child(mt)))
        }),
        (None, None) => None,
    };

    if shim.location == "body" && doc.flavor() == SpecFlavor::Swagger2 {
        let schema = schema.ok_or_else(|| {
            AppError::parse_at(&pointer, "body parameter requires a 'schema'")
        })?;
        return Ok(RawParameter::Body(BodyEntry {
            required: shim.required.unwrap_or(false),
            pointer,
            media_type: "application/json".to_string(),
            schema: Some(schema),
        }));
    }

    let location = ParamLocation::from_key(&shim.location).ok_or_else(|| {
        AppError::parse_at(
            &pointer.child("in"),
            format!("unsupported parameter location '{}'", shim.location),
        )
    })?;
    Ok(RawParameter::Located(ParameterEntry {
        pointer,
        location,
        shim,
        schema,
    }))
}

fn parse_operation(
    doc: &OpenApiDocument,
    method: HttpMethod,
    pointer: JsonPointer,
    raw: &JsonValue,
    common: &[RawParameter],
) -> AppResult<OperationEntry> {
    let shim: ShimOperation = decode(raw, &pointer)?;
    let own = parse_parameter_list(doc, &pointer.child("parameters"), &shim.parameters)?;

    let mut parameters: Vec<ParameterEntry> = Vec::new();
    let mut request_body: Option<BodyEntry> = None;
    let mut seen = HashSet::new();

    // Operation params take precedence over Common params
    for p in own {
        match p {
            RawParameter::Located(p) => {
                if !seen.insert((p.shim.name.clone(), p.location)) {
                    return Err(AppError::DuplicateParameter {
                        name: p.shim.name.clone(),
                        operation: pointer.clone(),
                    });
                }
                parameters.push(p);
            }
            RawParameter::Body(b) => {
                if request_body.is_some() {
                    return Err(AppError::DuplicateParameter {
                        name: "body".into(),
                        operation: pointer.clone(),
                    });
                }
                request_body = Some(b);
            }
        }
    }
    for p in common {
        match p {
            RawParameter::Located(p) => {
                if seen.insert((p.shim.name.clone(), p.location)) {
                    parameters.push(p.clone());
                }
            }
            RawParameter::Body(b) => {
                if request_body.is_none() {
                    request_body = Some(b.clone());
                }
            }
        }
    }

    if let Some(raw_body) = &shim.request_body {
        request_body = Some(parse_request_body(doc, &pointer.child("requestBody"), raw_body)?);
    }

    let responses_ptr = pointer.child("responses");
    let mut responses = Vec::new();
    for (status, raw_response) in &shim.responses {
        if status.starts_with("x-") {
            continue;
        }
        responses.push(parse_response(
            doc,
            status,
            &responses_ptr.child(status.clone()),
            raw_response,
        )?);
    }

    Ok(OperationEntry {
        method,
        pointer,
        shim,
        parameters,
        request_body,
        responses,
    })
}

fn parse_request_body(
    doc: &OpenApiDocument,
    at: &JsonPointer,
    raw: &JsonValue,
) -> AppResult<BodyEntry> {
    let (pointer, value) = follow_refs(doc, at, raw)?;
    let shim: ShimRequestBody = decode(value, &pointer)?;
    let media_type = select_media_type(&shim.content)
        .ok_or_else(|| AppError::parse_at(&pointer, "request body declares no content"))?
        .to_string();
    let schema = shim
        .content
        .get(media_type.as_str())
        .and_then(|media| media_schema(media, &pointer.child("content").child(media_type.clone())));
    Ok(BodyEntry {
        pointer,
        media_type,
        required: shim.required,
        schema,
    })
}

fn parse_response(
    doc: &OpenApiDocument,
    status: &str,
    at: &JsonPointer,
    raw: &JsonValue,
) -> AppResult<ResponseEntry> {
    let (pointer, value) = follow_refs(doc, at, raw)?;
    let shim: ShimResponse = decode(value, &pointer)?;

    let (media_type, schema) = match (&shim.schema, &shim.content) {
        (Some(_), _) => (None, Some(pointer.child("schema"))),
        (None, Some(content)) => match select_media_type(content) {
            Some(mt) => {
                let schema = content
                    .get(mt)
                    .and_then(|media| media_schema(media, &pointer.child("content").child(mt)));
                (Some(mt.to_string()), schema)
            }
            None => (None, None),
        },
        (None, None) => (None, None),
    };

    Ok(ResponseEntry {
        status: status.to_string(),
        pointer,
        media_type,
        schema,
    })
}

fn media_schema(media: &JsonValue, at: &JsonPointer) -> Option<JsonPointer> {
    media.get("schema").map(|_| at.child("schema"))
}

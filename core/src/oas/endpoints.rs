#![deny(missing_docs)]

//! # Endpoint Grouper
//!
//! Groups verb descriptors by path into one [`EndpointDescriptor`] per path,
//! routing standalone-flagged verbs to the individual-handler list instead.

use crate::error::{AppError, AppResult};
use crate::oas::context::GenerationContext;
use crate::oas::models::{
    EndpointDescriptor, FieldType, IndividualHandler, ParamLocation, ParameterDescriptor,
    RouteSegment, VerbDescriptor,
};
use crate::oas::naming::path_class_base;
use crate::oas::routes::template::{parse_template, TemplatePart};
use crate::oas::routes::PathVerbs;
use tracing::debug;

/// The grouped outputs of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct GroupedEndpoints {
    /// One endpoint per path with at least one non-standalone verb, in first-seen order.
    pub endpoints: Vec<EndpointDescriptor>,
    /// Standalone operations in declaration order.
    pub individual_handlers: Vec<IndividualHandler>,
}

/// Groups the extracted verbs of every path.
pub fn group_endpoints(
    ctx: &mut GenerationContext,
    paths: Vec<PathVerbs>,
) -> AppResult<GroupedEndpoints> {
    let mut grouped = GroupedEndpoints::default();
    for entry in paths {
        if entry.verbs.is_empty() {
            continue;
        }
        let route = build_route(&entry.path, &entry.verbs)?;
        let (standalone, grouped_verbs): (Vec<_>, Vec<_>) =
            entry.verbs.into_iter().partition(|v| v.standalone);

        for verb in standalone {
            grouped.individual_handlers.push(IndividualHandler {
                path: entry.path.clone(),
                route: route.clone(),
                verb,
            });
        }

        if grouped_verbs.is_empty() {
            continue;
        }
        let class_name = ctx.classes.claim_unique(
            &ctx.idents,
            &path_class_base(&entry.path),
            &ctx.options.endpoint_suffix,
            &entry.pointer,
        );
        debug!(path = %entry.path, class = %class_name, verbs = grouped_verbs.len(), "Grouped endpoint");
        grouped.endpoints.push(EndpointDescriptor {
            class_name,
            path: entry.path,
            route,
            verbs: grouped_verbs,
        });
    }
    Ok(grouped)
}

/// Types every placeholder of `path` from the path parameters of its verbs.
fn build_route(path: &str, verbs: &[VerbDescriptor]) -> AppResult<Vec<RouteSegment>> {
    parse_template(path)?
        .into_iter()
        .map(|part| match part {
            TemplatePart::Literal(value) => Ok(RouteSegment::Literal { value }),
            TemplatePart::Placeholder(name) => {
                let declared: Vec<&ParameterDescriptor> = verbs
                    .iter()
                    .flat_map(|v| &v.parameters)
                    .filter(|p| p.in_ == ParamLocation::Path && p.name == name)
                    .collect();
                let Some(first) = declared.first() else {
                    return Err(AppError::PathParameterMismatch {
                        path: path.to_string(),
                        operation: verbs[0].location.clone(),
                        missing_placeholders: vec![name],
                        undeclared_parameters: Vec::new(),
                    });
                };
                if declared.iter().any(|p| !same_route_type(&p.ty, &first.ty)) {
                    return Err(AppError::InconsistentPathParameter {
                        path: path.to_string(),
                        name,
                    });
                }
                Ok(RouteSegment::Param {
                    identifier: first.identifier.clone(),
                    ty: first.ty.clone(),
                    name,
                })
            }
        })
        .collect()
}

/// Route types only care about the JSON type, not descriptions or formats.
fn same_route_type(a: &FieldType, b: &FieldType) -> bool {
    match (a, b) {
        (FieldType::Scalar { scalar: x, .. }, FieldType::Scalar { scalar: y, .. }) => x == y,
        (FieldType::Array { items: x }, FieldType::Array { items: y }) => same_route_type(x, y),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{HttpMethod, ScalarType};
    use crate::oas::pointer::JsonPointer;

    fn verb(method: HttpMethod, standalone: bool, params: Vec<ParameterDescriptor>) -> VerbDescriptor {
        VerbDescriptor {
            verb: method,
            function_name: format!("{}_x", method.as_str().to_lowercase()),
            operation_id: None,
            location: JsonPointer::root(),
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            parameters: params,
            request_body: None,
            response_status: None,
            response_type: None,
            serializer_descriptor: None,
            many: false,
            standalone,
        }
    }

    fn path_param(name: &str, scalar: ScalarType) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.into(),
            identifier: name.to_lowercase(),
            in_: ParamLocation::Path,
            required: true,
            ty: FieldType::Scalar {
                scalar,
                format: None,
            },
            description: None,
        }
    }

    fn path_verbs(path: &str, verbs: Vec<VerbDescriptor>) -> PathVerbs {
        PathVerbs {
            path: path.into(),
            pointer: JsonPointer::from_segments(["paths", path]),
            verbs,
        }
    }

    #[test]
    fn test_groups_by_path_in_order() {
        let mut ctx = GenerationContext::default();
        let grouped = group_endpoints(
            &mut ctx,
            vec![
                path_verbs("/pets", vec![verb(HttpMethod::Get, false, vec![]), verb(HttpMethod::Post, false, vec![])]),
                path_verbs(
                    "/pets/{petId}",
                    vec![verb(HttpMethod::Get, false, vec![path_param("petId", ScalarType::Integer)])],
                ),
            ],
        )
        .unwrap();
        let classes: Vec<&str> = grouped.endpoints.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(classes, vec!["PetsView", "PetsPetIdView"]);
        assert_eq!(grouped.endpoints[0].verbs.len(), 2);
        assert_eq!(
            grouped.endpoints[1].route,
            vec![
                RouteSegment::Literal { value: "/pets/".into() },
                RouteSegment::Param {
                    name: "petId".into(),
                    identifier: "petid".into(),
                    ty: FieldType::Scalar {
                        scalar: ScalarType::Integer,
                        format: None
                    },
                },
            ]
        );
    }

    #[test]
    fn test_standalone_verbs_are_routed_out() {
        let mut ctx = GenerationContext::default();
        let grouped = group_endpoints(
            &mut ctx,
            vec![
                path_verbs("/health", vec![verb(HttpMethod::Get, true, vec![])]),
                path_verbs("/pets", vec![verb(HttpMethod::Get, false, vec![]), verb(HttpMethod::Delete, true, vec![])]),
            ],
        )
        .unwrap();
        assert_eq!(grouped.endpoints.len(), 1);
        assert_eq!(grouped.endpoints[0].path, "/pets");
        assert_eq!(grouped.endpoints[0].verbs.len(), 1);
        let handlers: Vec<(&str, HttpMethod)> = grouped
            .individual_handlers
            .iter()
            .map(|h| (h.path.as_str(), h.verb.verb))
            .collect();
        assert_eq!(handlers, vec![("/health", HttpMethod::Get), ("/pets", HttpMethod::Delete)]);
    }

    #[test]
    fn test_class_names_are_disambiguated() {
        let mut ctx = GenerationContext::default();
        let grouped = group_endpoints(
            &mut ctx,
            vec![
                path_verbs("/pet-items", vec![verb(HttpMethod::Get, false, vec![])]),
                path_verbs("/pet_items", vec![verb(HttpMethod::Post, false, vec![])]),
            ],
        )
        .unwrap();
        let classes: Vec<&str> = grouped.endpoints.iter().map(|e| e.class_name.as_str()).collect();
        assert_eq!(classes, vec!["PetItemsView", "PetItems2View"]);
    }

    #[test]
    fn test_conflicting_placeholder_types() {
        let mut ctx = GenerationContext::default();
        let err = group_endpoints(
            &mut ctx,
            vec![path_verbs(
                "/pets/{petId}",
                vec![
                    verb(HttpMethod::Get, false, vec![path_param("petId", ScalarType::Integer)]),
                    verb(HttpMethod::Put, false, vec![path_param("petId", ScalarType::String)]),
                ],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InconsistentPathParameter { .. }));
    }
}

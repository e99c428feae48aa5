#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Maps a parameter to its use-site type. OAS 3.x parameters carry a
//! `schema` (resolved through the graph); Swagger 2.0 non-body parameters
//! carry a legacy primitive `type`/`format`/`items` triple instead.

use crate::error::{AppError, AppResult};
use crate::oas::models::{FieldType, ScalarType};
use crate::oas::paths::ParameterEntry;
use crate::oas::resolver::types::TypeResolver;
use crate::oas::shims::ShimParameter;

/// Resolves the type of a parameter.
pub fn resolve_parameter_type(
    resolver: &TypeResolver<'_>,
    param: &ParameterEntry,
) -> AppResult<FieldType> {
    if let Some(schema) = &param.schema {
        let id = resolver.graph().id_of(schema).ok_or_else(|| {
            AppError::General(format!("schema {} was not loaded", schema))
        })?;
        return resolver.field_type(id);
    }
    legacy_type(&param.shim).map_err(|message| AppError::parse_at(&param.pointer, message))
}

fn legacy_type(shim: &ShimParameter) -> Result<FieldType, String> {
    let Some(type_name) = shim.legacy_type.as_deref() else {
        return Err("parameter declares neither 'schema' nor 'type'".into());
    };
    if type_name == "array" {
        let items = shim
            .items
            .as_ref()
            .ok_or_else(|| "array parameter requires 'items'".to_string())?;
        return Ok(FieldType::Array {
            items: Box::new(FieldType::Scalar {
                scalar: legacy_scalar(&items.legacy_type)?,
                format: items.format.clone(),
            }),
        });
    }
    Ok(FieldType::Scalar {
        scalar: legacy_scalar(type_name)?,
        format: shim.format.clone(),
    })
}

fn legacy_scalar(type_name: &str) -> Result<ScalarType, String> {
    match type_name {
        "string" => Ok(ScalarType::String),
        "integer" => Ok(ScalarType::Integer),
        "number" => Ok(ScalarType::Number),
        "boolean" => Ok(ScalarType::Boolean),
        other => Err(format!("unsupported parameter type '{}'", other)),
    }
}

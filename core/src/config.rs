#![deny(missing_docs)]

//! # Build Options
//!
//! Knobs for one generation run, loaded from a YAML file.
//!
//! ```yaml
//! serializer-suffix: Serializer
//! endpoint-suffix: View
//! reserved-words: [type, id]
//! include-unreferenced-schemas: false
//! ```

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// Options controlling descriptor construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct BuildOptions {
    /// Appended to every serializer class name.
    pub serializer_suffix: String,
    /// Appended to every endpoint class name.
    pub endpoint_suffix: String,
    /// Words reserved on top of the built-in list.
    pub reserved_words: Vec<String>,
    /// Also build serializers for named schemas no operation reaches.
    pub include_unreferenced_schemas: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            serializer_suffix: "Serializer".to_string(),
            endpoint_suffix: "View".to_string(),
            reserved_words: Vec::new(),
            include_unreferenced_schemas: false,
        }
    }
}

impl BuildOptions {
    /// Parses options from YAML text.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text).map_err(|e| AppError::Parse {
            location: "build options".to_string(),
            message: e.to_string(),
        })
    }

    /// Reads options from a YAML file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

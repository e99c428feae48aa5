#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every variant aborts a generation run: descriptors are either produced
//! for the whole document or not at all.

use crate::oas::pointer::JsonPointer;
use derive_more::{Display, From};
use std::fmt;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: `String` errors default to `General`; every other variant is built explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed document syntax or structure.
    #[from(ignore)]
    #[display("Parse error at {location}: {message}")]
    Parse {
        /// Pointer into the document, or a line/column for syntax errors.
        location: String,
        /// Human-readable cause.
        message: String,
    },

    /// A `$ref` that points outside the loaded document or at nothing.
    #[from(ignore)]
    #[display("Unresolved reference '{reference}' at {location}")]
    UnresolvedReference {
        /// The raw `$ref` string.
        reference: String,
        /// Where the reference was declared.
        location: JsonPointer,
    },

    /// An alias chain that never reaches a concrete schema.
    #[from(ignore)]
    #[display("Cyclic alias chain: {chain}")]
    CyclicAlias {
        /// The reference paths forming the cycle, in traversal order.
        chain: AliasChain,
    },

    /// Two operations normalise to the same function name.
    #[from(ignore)]
    #[display("Duplicate function name '{name}' derived for {first} and {second}")]
    DuplicateFunctionName {
        /// The colliding identifier.
        name: String,
        /// Location that claimed the name first.
        first: JsonPointer,
        /// Location that collided with it.
        second: JsonPointer,
    },

    /// Two generated classes normalise to the same class name.
    #[from(ignore)]
    #[display("Duplicate class name '{name}' derived for {first} and {second}")]
    DuplicateClassName {
        /// The colliding identifier.
        name: String,
        /// Location that claimed the name first.
        first: JsonPointer,
        /// Location that collided with it.
        second: JsonPointer,
    },

    /// Two properties of one object normalise to the same attribute name.
    #[from(ignore)]
    #[display("Duplicate field name '{name}' derived for {first} and {second}")]
    DuplicateFieldName {
        /// The colliding identifier.
        name: String,
        /// First property location.
        first: JsonPointer,
        /// Second property location.
        second: JsonPointer,
    },

    /// A parameter declared twice, or two parameters sharing one identifier.
    #[from(ignore)]
    #[display("Duplicate parameter '{name}' in operation {operation}")]
    DuplicateParameter {
        /// The parameter name or identifier.
        name: String,
        /// The owning operation.
        operation: JsonPointer,
    },

    /// Declared path parameters and template placeholders disagree.
    #[from(ignore)]
    #[display(
        "Path parameter mismatch for '{path}' ({operation}): placeholders without parameter [{}], path parameters without placeholder [{}]",
        missing_placeholders.join(", "),
        undeclared_parameters.join(", ")
    )]
    PathParameterMismatch {
        /// The raw path template.
        path: String,
        /// The offending operation.
        operation: JsonPointer,
        /// Placeholders in the template no `in: path` parameter declares.
        missing_placeholders: Vec<String>,
        /// `in: path` parameters absent from the template.
        undeclared_parameters: Vec<String>,
    },

    /// The verbs of one path type the same placeholder differently.
    #[from(ignore)]
    #[display("Path parameter '{name}' of '{path}' is declared with conflicting types")]
    InconsistentPathParameter {
        /// The raw path template.
        path: String,
        /// The placeholder name.
        name: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// The reference paths of a cyclic alias chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasChain(pub Vec<JsonPointer>);

impl fmt::Display for AliasChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

impl AppError {
    /// Builds a `Parse` error located at a document pointer.
    pub fn parse_at(location: &JsonPointer, message: impl Into<String>) -> Self {
        AppError::Parse {
            location: location.to_string(),
            message: message.into(),
        }
    }
}

#![deny(missing_docs)]

//! # Generation Context
//!
//! Short-lived state of one generation run, passed by reference through every
//! stage: the options plus the class and function namespaces.

use crate::config::BuildOptions;
use crate::oas::naming::{Identifiers, NameKind, NameRegistry};

/// Mutable naming state for one run.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Options of the run.
    pub options: BuildOptions,
    /// Identifier normaliser (built-in plus configured reserved words).
    pub idents: Identifiers,
    /// Serializer and endpoint class names.
    pub classes: NameRegistry,
    /// Operation function names.
    pub functions: NameRegistry,
}

impl GenerationContext {
    /// A fresh context for one run.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            idents: Identifiers::new(&options.reserved_words),
            classes: NameRegistry::new(NameKind::Class),
            functions: NameRegistry::new(NameKind::Function),
            options,
        }
    }
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}

#![deny(missing_docs)]

//! # Render Strategy Trait
//!
//! Defines the interface a renderer implements to turn a built
//! [`DocumentRegistry`] into output files.

use crate::error::AppResult;
use crate::oas::registry::DocumentRegistry;
use std::path::PathBuf;

/// One file produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output directory.
    pub relative_path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// A strategy trait for decoupling output emission from descriptor building.
///
/// Implementors receive the registry read-only and must not assume any
/// particular call order between registries. Identifiers in the registry are
/// already valid code identifiers; renderers emit them verbatim.
pub trait RenderStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Renders the registry into files.
    fn render(&self, registry: &DocumentRegistry) -> AppResult<Vec<RenderedFile>>;
}

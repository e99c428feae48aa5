#![deny(missing_docs)]

//! # Strategies
//!
//! This module defines the seam between descriptor building and output emission.
//!
//! - **traits**: Defines `RenderStrategy` for implementing new renderers.
//! - **manifest**: The bundled renderer, a JSON descriptor manifest.

pub mod manifest;
pub mod traits;

// Re-export for easier access downstream
pub use manifest::{ManifestStrategy, MANIFEST_FILE};
pub use traits::{RenderStrategy, RenderedFile};

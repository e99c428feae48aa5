#![deny(missing_docs)]

//! # Generate Command
//!
//! Builds the descriptor registry of a document and writes the rendered files.

use std::fs;
use std::path::{Path, PathBuf};

use restgen_core::{BuildOptions, DocumentRegistry, RenderStrategy};
use tracing::info;

use crate::error::{CliError, CliResult};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI / Swagger document (YAML or JSON).
    pub input: PathBuf,

    /// Directory the rendered files are written to.
    #[clap(long, env = "RESTGEN_OUT_DIR")]
    pub out_dir: PathBuf,

    /// YAML file with build options.
    #[clap(long, env = "RESTGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Loads build options, falling back to defaults.
pub fn load_options(config: Option<&Path>) -> CliResult<BuildOptions> {
    match config {
        Some(path) => Ok(BuildOptions::from_path(path)?),
        None => Ok(BuildOptions::default()),
    }
}

/// Reads the input document and builds its registry.
pub fn build(input: &Path, config: Option<&Path>) -> CliResult<DocumentRegistry> {
    if !input.exists() {
        return Err(CliError::General(format!("Input document not found: {:?}", input)));
    }
    let options = load_options(config)?;
    Ok(DocumentRegistry::from_path(input, options)?)
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `strategy` - The renderer turning descriptors into files.
pub fn execute(args: &GenerateArgs, strategy: &impl RenderStrategy) -> CliResult<Vec<PathBuf>> {
    let registry = build(&args.input, args.config.as_deref())?;
    let files = strategy.render(&registry)?;

    fs::create_dir_all(&args.out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = args.out_dir.join(&file.relative_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, file.contents)?;
        info!(strategy = strategy.name(), path = %target.display(), "Wrote file");
        written.push(target);
    }
    Ok(written)
}

#![deny(missing_docs)]

//! # Check Command
//!
//! Builds the descriptors of a document without writing anything and prints a summary.

use std::path::PathBuf;

use restgen_core::DocumentRegistry;

use crate::error::CliResult;
use crate::generate::build;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the OpenAPI / Swagger document (YAML or JSON).
    pub input: PathBuf,

    /// YAML file with build options.
    #[clap(long, env = "RESTGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Executes the check, returning the printed summary.
pub fn execute(args: &CheckArgs) -> CliResult<String> {
    let registry = build(&args.input, args.config.as_deref())?;
    let summary = summarize(&registry);
    print!("{}", summary);
    Ok(summary)
}

/// One line per endpoint, standalone handler and serializer.
pub fn summarize(registry: &DocumentRegistry) -> String {
    let mut out = String::new();
    for endpoint in registry.endpoints() {
        let verbs: Vec<&str> = endpoint.verbs.iter().map(|v| v.verb.as_str()).collect();
        out.push_str(&format!(
            "endpoint   {} {} [{}]\n",
            endpoint.class_name,
            endpoint.path,
            verbs.join(", ")
        ));
    }
    for handler in registry.individual_handlers() {
        out.push_str(&format!(
            "standalone {} {} {}\n",
            handler.verb.function_name, handler.verb.verb, handler.path
        ));
    }
    for serializer in registry.serializers().values() {
        out.push_str(&format!(
            "serializer {} {} ({} fields)\n",
            serializer.serializer_class_name,
            serializer.schema,
            serializer.fields.len()
        ));
    }
    out
}

#![deny(missing_docs)]

//! # Logging
//!
//! Tracing initialisation. `RUST_LOG` controls the level; without it the CLI
//! logs warnings only, or debug output of both crates with `--verbose`.

use crate::error::{CliError, CliResult};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human readable.
    #[default]
    Pretty,
}

/// The filter used when `RUST_LOG` is unset. The binary logs under the `restgen` target.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,restgen=debug,restgen_core=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber, writing to stderr.
pub fn init_tracing(format: LogFormat, verbose: bool) -> CliResult<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer as _};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbose).into());

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::General(format!("Failed to initialise logging: {}", e)))
}

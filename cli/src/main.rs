#![deny(missing_docs)]

//! # Restgen CLI
//!
//! Command Line Interface for the descriptor model builder.
//!
//! Supported Commands:
//! - `generate`: Builds descriptors and writes the rendered files.
//! - `check`: Builds descriptors and prints a summary, writing nothing.

use clap::{Parser, Subcommand};
use restgen_core::ManifestStrategy;
use tracing::error;

use crate::error::CliResult;
use crate::logging::{init_tracing, LogFormat};

mod check;
mod error;
mod generate;
mod logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI descriptor model builder")]
struct Cli {
    /// Log output format.
    #[clap(long, global = true, value_enum, env = "RESTGEN_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Log pipeline progress (ignored when RUST_LOG is set).
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build descriptors and write the descriptor manifest.
    Generate(generate::GenerateArgs),
    /// Build descriptors and print a summary without writing files.
    Check(check::CheckArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose)?;

    let result = match &cli.command {
        Commands::Generate(args) => generate::execute(args, &ManifestStrategy).map(|written| {
            for path in written {
                println!("Generated {}", path.display());
            }
        }),
        Commands::Check(args) => check::execute(args).map(|_| ()),
    };

    if let Err(e) = &result {
        error!(error = %e, "Generation aborted");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "restgen",
            "generate",
            "api.yaml",
            "--out-dir",
            "out",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.input, std::path::PathBuf::from("api.yaml"));
                assert_eq!(args.out_dir, std::path::PathBuf::from("out"));
                assert!(args.config.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_generate_requires_out_dir() {
        if std::env::var_os("RESTGEN_OUT_DIR").is_none() {
            assert!(Cli::try_parse_from(["restgen", "generate", "api.yaml"]).is_err());
        }
    }
}

// src/cli.rs

//! CLI argument parsing using `clap` for the demo binary.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the `asyncbreak` demo binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "asyncbreak",
    version,
    about = "Demonstrate async causal-chain tracking and break diagnosis.",
    long_about = None
)]
pub struct CliArgs {
    /// Which demonstration to run.
    #[arg(long, value_enum, default_value = "broken")]
    pub scenario: Scenario,

    /// Optional TOML options file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Keep this library's own frames in captured descriptors.
    #[arg(long)]
    pub keep_internals: bool,

    /// Persist the failure as an HTML artifact instead of printing trees.
    #[arg(long)]
    pub artifact: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASYNCBREAK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Demo scenarios.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Context propagated properly; the check succeeds.
    Linked,
    /// A userland callback buffer severs the chain; the check fails.
    Broken,
    /// The broken scenario again, but across real tokio tasks and a channel.
    TokioBroken,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

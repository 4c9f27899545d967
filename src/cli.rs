//! CLI command definitions for the task-node-config binary.
//!
//! The binary is an operator tool: it resolves the node configuration the
//! same way a worker process would at startup and prints the result, so a
//! misconfigured node can be diagnosed without starting one.

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON, matching the wire contract field names
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Task node configuration inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to an override file (skips tier discovery)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Print the derived directory layout for a task
    TaskDirs {
        /// Opaque task identifier
        task_id: String,
    },
}

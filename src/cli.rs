//! CLI arguments and subcommands for procsnap.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Snapshot output formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procsnap",
    about = "Point-in-time snapshot of the process table",
    long_about = "Point-in-time snapshot of the process table.\n\n\
                  Reads every process record from the process-table pseudo-filesystem and \
                  reports CPU time, memory, page faults and parent/child lineage with \
                  normalized units.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (logs go to stderr); overrides the config file, default warn
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Process-table root (default /proc)
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,

    /// Command substring marking application processes (case-insensitive)
    #[arg(long, global = true)]
    pub app_family: Option<String>,

    /// Override the page size used to convert resident pages to bytes
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// Override the clock tick rate used to convert CPU ticks to seconds
    #[arg(long, global = true)]
    pub clock_ticks: Option<f64>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one snapshot and print it
    Snapshot {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Exit with status 1 if any record was malformed
        #[arg(long)]
        strict: bool,
    },

    /// Print the process lineage as a tree
    Tree {
        /// Only print the subtree under this pid
        #[arg(long)]
        root: Option<i32>,
    },

    /// Resource totals of an application process and its descendants
    Totals {
        /// Pid of the application's main process
        #[arg(long)]
        pid: i32,

        /// Further pids that belong to the same application
        #[arg(long = "other", value_delimiter = ',')]
        other: Vec<i32>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate configuration and system requirements
    Check,

    /// Print the effective configuration
    Config {
        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },
}

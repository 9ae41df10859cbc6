//! CLI argument definitions for schemafilter.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Apply a filter specification to a fixture of news items.
///
/// The specification uses the same encoding as a filter URL, e.g.
///
///   schemafilter --fixture inspections.yaml \
///       "by-date=2024-03-01,2024-03-31;by-cuisine=thai;locations=neighborhoods,downtown"
///
/// If a filter lacks arguments the prompt for the missing input is printed
/// instead of results. A street filter without a radius prints the
/// suggested redirect.
#[derive(Parser, Debug)]
#[command(name = "schemafilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Filter specification (`name=v1,v2;name2=v3`)
    #[arg(default_value = "")]
    pub spec: String,

    /// YAML fixture with the schema, fields, lookups, places and items
    #[arg(long, short = 'f', env = "SCHEMAFILTER_FIXTURE")]
    pub fixture: PathBuf,

    /// YAML settings file (multiple_cities, block radius choices)
    #[arg(long, short = 's', env = "SCHEMAFILTER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Request path used to build redirects (defaults to /<schema>/filter/<spec>/)
    #[arg(long)]
    pub path: Option<String>,

    /// Block radius remembered from an earlier visit
    #[arg(long)]
    pub block_radius: Option<String>,

    /// Reorder filters by cost before applying them
    #[arg(long)]
    pub normalize: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Log level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

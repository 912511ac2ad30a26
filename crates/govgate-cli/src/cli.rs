//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use govgate_kernel::config::Format;
use govgate_kernel::governance::RedactionStrategy;
use std::path::PathBuf;

/// GovGate - content governance gate for retrieval pipelines
#[derive(Parser)]
#[command(name = "govgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<OutputFormat>,

    /// Governance policy file (yaml, toml, json, ini, ron, json5)
    #[arg(short = 'c', long, global = true, env = "GOVGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate inbound text (user query); exits 1 when blocked
    Input {
        /// Text to check, or "-" to read stdin
        text: String,
    },

    /// Validate outbound text (generated answer); exits 1 when blocked
    Output {
        /// Text to check, or "-" to read stdin
        text: String,
    },

    /// Report PII entities and unsafe keywords without deciding
    Scan {
        /// Text to scan, or "-" to read stdin
        text: String,
    },

    /// Redact PII from text
    Redact {
        /// Text to redact, or "-" to read stdin
        text: String,

        /// How matches are rewritten
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Placeholder)]
        strategy: StrategyArg,
    },

    /// Print a JSON Lines audit log
    Audit {
        /// Audit log file
        path: PathBuf,
    },

    /// Print the effective policy after file, defaults and environment are combined
    Policy {
        /// Document format
        #[arg(short, long, value_enum, default_value_t = PolicyFormat::Yaml)]
        format: PolicyFormat,
    },
}

/// Formats the effective policy can be printed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyFormat {
    Yaml,
    Toml,
    Json,
}

impl From<PolicyFormat> for Format {
    fn from(format: PolicyFormat) -> Self {
        match format {
            PolicyFormat::Yaml => Format::Yaml,
            PolicyFormat::Toml => Format::Toml,
            PolicyFormat::Json => Format::Json,
        }
    }
}

/// Redaction strategies selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Placeholder,
    Mask,
    Hash,
    Remove,
}

impl From<StrategyArg> for RedactionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Placeholder => RedactionStrategy::Placeholder,
            StrategyArg::Mask => RedactionStrategy::Mask,
            StrategyArg::Hash => RedactionStrategy::Hash,
            StrategyArg::Remove => RedactionStrategy::Remove,
        }
    }
}

//! Output formatting for CLI commands

use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for automation
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Colored one-word decision label.
pub fn decision_label(passed: bool) -> String {
    if passed {
        "PASSED".green().bold().to_string()
    } else {
        "BLOCKED".red().bold().to_string()
    }
}

/// Print a bulleted list under a heading; prints nothing for an empty list.
pub fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", heading.bold());
    for item in items {
        println!("  - {item}");
    }
}

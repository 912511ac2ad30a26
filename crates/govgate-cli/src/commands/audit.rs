//! `govgate audit` command implementation

use crate::output::{OutputFormat, decision_label, print_json};
use colored::Colorize;
use govgate_foundation::governance::JsonlAuditLog;
use std::path::Path;

/// Execute `govgate audit`
pub fn run(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let entries = JsonlAuditLog::read_all(path)?;

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("{}", "No audit entries".dimmed());
            }
            for entry in &entries {
                println!(
                    "{}  {:<15} {}  {}",
                    entry.timestamp.to_rfc3339().dimmed(),
                    entry.action.to_string(),
                    decision_label(entry.verdict.passed),
                    entry.verdict.violations.join("; ")
                );
            }
        }
    }
    Ok(())
}

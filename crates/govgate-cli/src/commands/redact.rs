//! `govgate redact` command implementation

use super::{load_policy, read_text};
use crate::cli::StrategyArg;
use crate::output::{OutputFormat, print_json};
use govgate_foundation::governance::RegexPiiDetector;
use govgate_kernel::governance::PiiRedactor;
use std::path::Path;

/// Execute `govgate redact`
pub fn run(
    config: Option<&Path>,
    text: &str,
    strategy: StrategyArg,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let policy = load_policy(config)?;
    let detector = RegexPiiDetector::from_policy(&policy.pii)?;

    let text = read_text(text)?;
    let result = detector.redact(&text, &strategy.into());

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => println!("{}", result.redacted_text),
    }
    Ok(())
}

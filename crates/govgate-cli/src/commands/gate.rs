//! `govgate input` / `govgate output` command implementation

use super::{load_policy, read_text};
use crate::output::{OutputFormat, decision_label, print_json, print_list};
use colored::Colorize;
use govgate_foundation::governance::GovernanceGate;
use govgate_kernel::governance::{GateAction, GovernanceVerdict};
use std::path::Path;

/// Execute `govgate input`; returns whether the text passed.
pub async fn run_input(config: Option<&Path>, text: &str, format: OutputFormat) -> anyhow::Result<bool> {
    run(config, GateAction::ValidateInput, text, format).await
}

/// Execute `govgate output`; returns whether the text passed.
pub async fn run_output(config: Option<&Path>, text: &str, format: OutputFormat) -> anyhow::Result<bool> {
    run(config, GateAction::ValidateOutput, text, format).await
}

async fn run(
    config: Option<&Path>,
    action: GateAction,
    text: &str,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let policy = load_policy(config)?;
    let gate = GovernanceGate::from_config(policy)
        .map_err(|report| anyhow::anyhow!("{report:?}"))?;

    let text = read_text(text)?;
    let verdict = match action {
        GateAction::ValidateInput => gate.validate_input(&text).await,
        GateAction::ValidateOutput => gate.validate_output(&text).await,
    };

    match format {
        OutputFormat::Json => print_json(&verdict)?,
        OutputFormat::Text => print_verdict(action, &verdict),
    }
    Ok(verdict.passed)
}

fn print_verdict(action: GateAction, verdict: &GovernanceVerdict) {
    println!(
        "{} {}  {}",
        action.to_string().cyan(),
        decision_label(verdict.passed),
        verdict.timestamp.to_rfc3339().dimmed()
    );
    print_list("Violations:", &verdict.violations);
}

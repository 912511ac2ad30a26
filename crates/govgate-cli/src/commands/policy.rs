//! `govgate policy` command implementation

use super::load_policy;
use crate::cli::PolicyFormat;
use anyhow::Context;
use govgate_kernel::config::render;
use std::path::Path;

/// Execute `govgate policy`
pub fn run(config: Option<&Path>, format: PolicyFormat) -> anyhow::Result<()> {
    let mut policy = load_policy(config)?;
    policy.validate().context("policy is invalid")?;

    if policy.content_safety.api_key.is_some() {
        policy.content_safety.api_key = Some("<redacted>".to_string());
    }

    let text = render(&policy, format.into()).context("failed to render policy")?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

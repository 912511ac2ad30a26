//! CLI command implementations

pub mod audit;
pub mod gate;
pub mod policy;
pub mod redact;
pub mod scan;

use anyhow::Context;
use govgate_kernel::config::load_config;
use govgate_kernel::governance::GovernanceConfig;
use std::io::Read;
use std::path::Path;

/// Load the policy file if one was given, else the defaults; environment
/// credentials for the remote classifier are applied on top either way.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<GovernanceConfig> {
    let config = match path {
        Some(path) => load_config::<GovernanceConfig>(path)
            .with_context(|| format!("failed to load policy from {}", path.display()))?,
        None => GovernanceConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Resolve a text argument; `-` reads all of stdin.
pub fn read_text(arg: &str) -> anyhow::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

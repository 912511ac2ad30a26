//! Policy configuration loading
//!
//! Governance policy (pattern tables, standards, remote classifier settings,
//! audit sink) is plain serde data and can be kept in any of the formats the
//! `config` crate understands: YAML, TOML, JSON, INI, RON, JSON5.
//!
//! - Format is detected from the file extension
//! - `${VAR}` references are substituted from the environment before
//!   parsing, so credentials never need to live in the file; `$${VAR}` is
//!   kept as the literal text `${VAR}` and a bare `$VAR` is never touched
//! - Several files can be layered, later ones overriding earlier ones

use config::{Config as Cfg, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

#[cfg(test)]
mod tests;

pub use config::FileFormat as Format;

/// `${NAME}`, or `$${NAME}` when escaped.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$?)\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"));

/// Errors raised while locating, reading or decoding a policy file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Detect configuration format from file extension.
///
/// `.yaml`/`.yml`, `.toml`, `.json`, `.ini`, `.ron` and `.json5` are
/// recognised; anything else is [`ConfigError::UnsupportedFormat`].
pub fn detect_format(path: impl AsRef<Path>) -> ConfigResult<FileFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ConfigError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        "ini" => Ok(FileFormat::Ini),
        "ron" => Ok(FileFormat::Ron),
        "json5" => Ok(FileFormat::Json5),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Substitute environment variables in a string.
///
/// Only the braced form (`${AZURE_CONTENT_SAFETY_KEY}`) is resolved, so
/// pattern tables can match a literal `$NAME`. `$${NAME}` escapes to the
/// literal `${NAME}`. Unset variables are left verbatim so the parse error
/// points at the offending reference.
pub fn substitute_env_vars(content: &str) -> String {
    ENV_REF.replace_all(content, env_or_literal).into_owned()
}

fn env_or_literal(caps: &Captures<'_>) -> String {
    if !caps[1].is_empty() {
        return format!("${{{}}}", &caps[2]);
    }
    std::env::var(&caps[2]).unwrap_or_else(|_| caps[0].to_string())
}

fn read_source(path: &Path) -> ConfigResult<(String, FileFormat)> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    Ok((substitute_env_vars(&content), format))
}

fn finish<T>(builder: ConfigBuilder<DefaultState>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let config = builder
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::Serialization(e.to_string()))
}

/// Load configuration from a single file.
///
/// ```rust,ignore
/// use govgate_kernel::config::load_config;
/// use govgate_kernel::GovernanceConfig;
///
/// let policy: GovernanceConfig = load_config("governance.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let (content, format) = read_source(path.as_ref())?;
    finish(Cfg::builder().add_source(File::from_str(&content, format)))
}

/// Load configuration from an in-memory string with an explicit format.
pub fn from_str<T>(content: &str, format: FileFormat) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let substituted = substitute_env_vars(content);
    finish(Cfg::builder().add_source(File::from_str(&substituted, format)))
}

/// Layer several in-memory sources; later sources override earlier ones.
pub fn merge_configs<T>(sources: &[(&str, FileFormat)]) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let builder = sources
        .iter()
        .fold(Cfg::builder(), |builder, (content, format)| {
            builder.add_source(File::from_str(&substitute_env_vars(content), *format))
        });
    finish(builder)
}

/// Layer several policy files; later files override earlier ones.
///
/// Typical use is a shipped `defaults.toml` followed by a deployment
/// specific override file.
pub fn load_merged<P, T>(paths: &[P]) -> ConfigResult<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let mut builder = Cfg::builder();
    for path in paths {
        let (content, format) = read_source(path.as_ref())?;
        builder = builder.add_source(File::from_str(&content, format));
    }
    finish(builder)
}

/// Load a file and apply `PREFIX_SECTION__FIELD` environment overrides.
///
/// ```rust,ignore
/// // GOVGATE_CONTENT_SAFETY__TIMEOUT_MS=1500 overrides content_safety.timeout_ms
/// let policy: GovernanceConfig = load_with_env("governance.toml", "GOVGATE")?;
/// ```
pub fn load_with_env<T>(path: impl AsRef<Path>, env_prefix: &str) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let (content, format) = read_source(path.as_ref())?;
    finish(
        Cfg::builder()
            .add_source(File::from_str(&content, format))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
    )
}

/// Serialize a policy back to text, e.g. to print the effective policy.
///
/// Only JSON, YAML and TOML are writable.
pub fn render<T>(value: &T, format: FileFormat) -> ConfigResult<String>
where
    T: Serialize,
{
    match format {
        FileFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| ConfigError::Serialization(e.to_string())),
        FileFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| ConfigError::Serialization(e.to_string()))
        }
        FileFormat::Toml => {
            toml::to_string_pretty(value).map_err(|e| ConfigError::Serialization(e.to_string()))
        }
        other => Err(ConfigError::UnsupportedFormat(format!("{other:?}").to_lowercase())),
    }
}

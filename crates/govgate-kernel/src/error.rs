//! Crate-level error types for `govgate-kernel`.
//!
//! Provides a unified [`KernelError`] that composes errors from every
//! sub-module (governance, config) together with
//! [`error_stack::Report`] for rich, context-carrying error propagation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use govgate_kernel::error::{KernelError, KernelResult};
//! use govgate_kernel::governance::GovernanceConfig;
//! use error_stack::ResultExt;
//!
//! fn check_policy(config: &GovernanceConfig) -> KernelResult<()> {
//!     config
//!         .validate()
//!         .map_err(KernelError::from)
//!         .map_err(error_stack::Report::new)
//!         .attach("validating governance policy")
//! }
//! ```

use crate::governance::SecurityError;
use thiserror::Error;

/// Crate-level error type for `govgate-kernel`.
///
/// Wraps each sub-module's typed error via `#[from]` so that the `?`
/// operator converts them automatically. Use
/// [`error_stack::Report<KernelError>`] (via [`KernelResult`]) to attach
/// human-readable context as the error propagates up the call stack.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// An error originating from the governance layer.
    #[error("Governance error: {0}")]
    Security(#[from] SecurityError),

    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Convenience result alias using [`error_stack::Report`].
///
/// Equivalent to `Result<T, error_stack::Report<KernelError>>`.
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;

//! GovGate Foundation
//!
//! Detectors, validators and the governance gate built on the contracts in
//! `govgate-kernel`.

// governance implementations
pub mod governance;

pub use governance::*;

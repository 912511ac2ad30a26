//! GovGate Kernel
//!
//! Contracts and value types for the content-governance gate that sits in
//! front of (and behind) the product-search retrieval pipeline. Concrete
//! detectors, validators and the gate itself live in `govgate-foundation`.

// governance contracts and policy
pub mod governance;
pub use governance::*;

// error module
pub mod error;

// multi-format configuration loader
#[cfg(feature = "config")]
pub mod config;

//! Governance Module — Foundation Implementations
//!
//! Concrete implementations of the contracts defined in
//! `govgate-kernel::governance`.
//!
//! - **`regex_pii`**: Regex-based PII detection and redaction
//! - **`keyword_scanner`**: Keyword content scanner and prompt guard
//! - **`content_safety`**: Azure AI Content Safety client
//! - **`safety_validator`**: Three-stage safety validation
//! - **`compliance`**: Regulatory compliance over detected PII
//! - **`audit_log`**: In-memory and JSON Lines audit sinks
//! - **`gate`**: The governance gate and its builder

pub mod audit_log;
pub mod compliance;
pub mod content_safety;
pub mod gate;
pub mod keyword_scanner;
pub mod regex_pii;
pub mod safety_validator;

// Re-export main types for convenience
pub use audit_log::{InMemoryAuditLog, JsonlAuditLog, audit_sink_from_config};
pub use compliance::ComplianceChecker;
pub use content_safety::{AzureContentSafetyClassifier, DisabledClassifier, classifier_from_config};
pub use gate::{GovernanceGate, GovernanceGateBuilder};
pub use keyword_scanner::{KeywordSafetyScanner, RegexPromptGuard};
pub use regex_pii::RegexPiiDetector;
pub use safety_validator::SafetyValidator;

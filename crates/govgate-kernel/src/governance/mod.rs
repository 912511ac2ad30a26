//! Content Governance Module
//!
//! Kernel-level contracts for the governance gate:
//! - **PII**: detect and redact personally identifiable information
//! - **Content Safety**: local keyword scanning and prompt-injection matching
//! - **Remote Classifier**: optional, fail-open external safety check
//! - **Audit**: append-only record of every gate decision
//! - **Policy**: data-driven pattern tables and regulatory standards
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │             govgate-kernel/governance            │
//! │  ┌────────────┐  ┌──────────────┐  ┌──────────┐  │
//! │  │ PiiDetector│  │SafetyScanner │  │  Safety  │  │
//! │  │ PiiRedactor│  │ PromptGuard  │  │Classifier│  │
//! │  └────────────┘  └──────────────┘  └──────────┘  │
//! │  ┌────────────────────┐  ┌─────────────────────┐ │
//! │  │  GovernanceConfig  │  │      AuditSink      │ │
//! │  └────────────────────┘  └─────────────────────┘ │
//! └──────────────────────────────────────────────────┘
//!                        ▲ traits
//!                        │
//! ┌──────────────────────────────────────────────────┐
//! │          govgate-foundation/governance           │
//! │  RegexPiiDetector   KeywordSafetyScanner         │
//! │  RegexPromptGuard   AzureContentSafetyClassifier │
//! │  SafetyValidator    ComplianceChecker            │
//! │  InMemoryAuditLog   JsonlAuditLog                │
//! │  ┌──────────────────────────────────────────────┐│
//! │  │               GovernanceGate                 ││
//! │  └──────────────────────────────────────────────┘│
//! └──────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod classifier;
pub mod detection;
pub mod policy;
pub mod types;

pub use audit::AuditSink;
pub use classifier::SafetyClassifier;
pub use detection::{PiiDetector, PiiRedactor, PromptGuard, SafetyScanner};
pub use policy::{
    AuditSinkConfig, ComplianceStandard, CompliancePolicy, ContentSafetyConfig, GovernanceConfig,
    KeywordCategory, PiiPattern, PiiPolicy, PolicyBuilder, SafetyPolicy,
};
pub use types::{
    AuditEntry, AuditOutcome, CategorySeverity, ComplianceResult, DetectionEntity, FlagSource,
    GateAction, GovernanceVerdict, KeywordFlag, KeywordScan, PiiKind, PiiScan, RedactionResult,
    RedactionStrategy, Remediation, SafetyFlag, SafetyVerdict, SecurityError, SecurityResult,
    Severity,
};

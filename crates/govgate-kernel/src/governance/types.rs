//! Governance core types
//!
//! Value types shared by the PII detector, the safety stages, the compliance
//! checker and the gate. Every result type is a fresh value per call; none of
//! them hold references back into the component that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Severity
// =============================================================================

/// Ordinal ranking of a violation, lowest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing was flagged
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

// =============================================================================
// PII Types
// =============================================================================

/// Kinds of personally identifiable information the detector recognises.
///
/// Serialized as the plain kind name (`"email"`, `"zip_code"`, ...). Any name
/// that is not a built-in kind deserializes to [`PiiKind::Custom`], which is
/// how externally loaded pattern tables add new kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[non_exhaustive]
pub enum PiiKind {
    /// Email addresses
    Email,
    /// Phone numbers (North American shapes)
    Phone,
    /// National identifier numbers (US SSN shape)
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// Postal codes (US ZIP / ZIP+4)
    ZipCode,
    /// IPv4 addresses
    IpAddress,
    /// Domain-specific kind loaded from configuration
    Custom(String),
}

impl PiiKind {
    /// Canonical lowercase name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::CreditCard => "credit_card",
            Self::ZipCode => "zip_code",
            Self::IpAddress => "ip_address",
            Self::Custom(name) => name,
        }
    }

    /// Token substituted for a match of this kind during redaction.
    #[must_use]
    pub fn placeholder(&self) -> String {
        match self {
            Self::Email => "[EMAIL_REDACTED]".to_string(),
            Self::Phone => "[PHONE_REDACTED]".to_string(),
            Self::Ssn => "[SSN_REDACTED]".to_string(),
            Self::CreditCard => "[CARD_REDACTED]".to_string(),
            other => format!("[{}_REDACTED]", other.name().to_uppercase()),
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for PiiKind {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "phone" => Self::Phone,
            "ssn" => Self::Ssn,
            "credit_card" => Self::CreditCard,
            "zip_code" => Self::ZipCode,
            "ip_address" => Self::IpAddress,
            _ => Self::Custom(name),
        }
    }
}

impl From<&str> for PiiKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<PiiKind> for String {
    fn from(kind: PiiKind) -> Self {
        match kind {
            PiiKind::Custom(name) => name,
            other => other.name().to_string(),
        }
    }
}

/// A single PII hit within a scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEntity {
    /// Kind of the matched pattern
    pub kind: PiiKind,
    /// The matched text
    pub matched_value: String,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset of the match end (exclusive)
    pub end: usize,
}

impl DetectionEntity {
    /// `(start, end)` byte span of the match.
    #[must_use]
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// Result of a PII scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiScan {
    pub has_pii: bool,
    /// Ordered by kind registration, then by position within each kind
    pub entities: Vec<DetectionEntity>,
    pub count: usize,
}

impl PiiScan {
    #[must_use]
    pub fn new(entities: Vec<DetectionEntity>) -> Self {
        Self {
            has_pii: !entities.is_empty(),
            count: entities.len(),
            entities,
        }
    }
}

/// How matched PII is rewritten by a redactor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RedactionStrategy {
    /// Kind-specific token such as `[EMAIL_REDACTED]`
    #[default]
    Placeholder,
    /// Partial masking that keeps some structure (`j***@example.com`)
    Mask,
    /// First 8 hex chars of the SHA-256 of the value, in brackets
    Hash,
    /// Drop the value entirely
    Remove,
    /// Fixed replacement text
    Replace(String),
}

/// Result of a redaction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub original_text: String,
    pub redacted_text: String,
    /// Entities found in the original text
    pub entities: Vec<DetectionEntity>,
}

impl RedactionResult {
    #[must_use]
    pub fn has_redactions(&self) -> bool {
        !self.entities.is_empty()
    }

    #[must_use]
    pub fn redaction_count(&self) -> usize {
        self.entities.len()
    }
}

// =============================================================================
// Safety Types
// =============================================================================

/// One keyword hit from the local content scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFlag {
    pub category: String,
    pub keyword: String,
    pub severity: Severity,
}

/// Result of a local keyword scan. `is_safe` holds exactly when `flags` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordScan {
    pub is_safe: bool,
    pub flags: Vec<KeywordFlag>,
    /// Highest flag severity, or `none`
    pub severity: Severity,
}

impl KeywordScan {
    #[must_use]
    pub fn from_flags(flags: Vec<KeywordFlag>) -> Self {
        let severity = flags
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::None);
        Self {
            is_safe: flags.is_empty(),
            flags,
            severity,
        }
    }
}

/// Which safety stage raised a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    LocalKeyword,
    InjectionPattern,
    RemoteClassifier,
}

/// A safety violation raised by one of the validator stages.
///
/// `Display` renders the human-readable reason handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyFlag {
    pub source: FlagSource,
    pub category: String,
    /// Matched keyword, matched injection pattern, or remote severity level
    pub detail: String,
    pub severity: Severity,
}

impl SafetyFlag {
    #[must_use]
    pub fn keyword(flag: &KeywordFlag) -> Self {
        Self {
            source: FlagSource::LocalKeyword,
            category: flag.category.clone(),
            detail: flag.keyword.clone(),
            severity: flag.severity,
        }
    }

    #[must_use]
    pub fn injection(pattern: impl Into<String>) -> Self {
        Self {
            source: FlagSource::InjectionPattern,
            category: "prompt_injection".to_string(),
            detail: pattern.into(),
            severity: Severity::High,
        }
    }

    #[must_use]
    pub fn remote(analysis: &CategorySeverity) -> Self {
        Self {
            source: FlagSource::RemoteClassifier,
            category: analysis.category.clone(),
            detail: analysis.severity.to_string(),
            severity: Severity::High,
        }
    }
}

impl fmt::Display for SafetyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            FlagSource::LocalKeyword => {
                write!(f, "Unsafe Keyword ({}): {}", self.category, self.detail)
            }
            FlagSource::InjectionPattern => write!(f, "Prompt Injection Detected: {}", self.detail),
            FlagSource::RemoteClassifier => write!(
                f,
                "Azure Content Safety Violation: {} ({})",
                self.category, self.detail
            ),
        }
    }
}

/// One category of a remote classifier response, on the service's own
/// ordinal scale (0 = none, higher = worse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeverity {
    pub category: String,
    pub severity: u8,
}

impl CategorySeverity {
    #[must_use]
    pub fn new(category: impl Into<String>, severity: u8) -> Self {
        Self {
            category: category.into(),
            severity,
        }
    }
}

/// Combined verdict of every safety stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_safe: bool,
    /// Keyword flags, then injection flags, then remote flags
    pub flags: Vec<SafetyFlag>,
    /// `high` when unsafe, `low` otherwise
    pub severity: Severity,
}

impl SafetyVerdict {
    #[must_use]
    pub fn from_flags(flags: Vec<SafetyFlag>) -> Self {
        let is_safe = flags.is_empty();
        Self {
            is_safe,
            flags,
            severity: if is_safe { Severity::Low } else { Severity::High },
        }
    }

    /// Rendered reasons, in stage order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.flags.iter().map(ToString::to_string).collect()
    }
}

// =============================================================================
// Compliance Types
// =============================================================================

/// Action a caller should take on a non-clean compliance result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remediation {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Redact PII")]
    RedactPii,
}

impl fmt::Display for Remediation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::RedactPii => f.write_str("Redact PII"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub compliant: bool,
    pub violations: Vec<String>,
    pub remediation: Remediation,
    /// Raw entity count, independent of the requested standards
    pub detected_pii_count: usize,
}

// =============================================================================
// Gate & Audit Types
// =============================================================================

/// Aggregated decision returned by the governance gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceVerdict {
    pub passed: bool,
    /// Safety reasons first, then compliance violations
    pub violations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Gate entry point that produced an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    ValidateInput,
    ValidateOutput,
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidateInput => f.write_str("validate_input"),
            Self::ValidateOutput => f.write_str("validate_output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOutcome {
    Pass,
    Fail,
}

impl From<bool> for AuditOutcome {
    fn from(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }
}

/// Immutable record of one gate decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: GateAction,
    pub outcome: AuditOutcome,
    pub verdict: GovernanceVerdict,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    #[must_use]
    pub fn record(action: GateAction, verdict: GovernanceVerdict) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            outcome: verdict.passed.into(),
            verdict,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors from the governance layer.
///
/// Detection itself never fails; these surface while building components
/// from policy, from the remote classifier, or from audit persistence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecurityError {
    /// A pattern in the policy table does not compile
    #[error("Invalid pattern for {name}: {reason}")]
    InvalidPattern { name: String, reason: String },

    /// The remote classifier could not be reached
    #[error("Content safety service unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The remote classifier answered with an error or an unreadable body
    #[error("Content safety request failed: {0}")]
    ClassifierFailed(String),

    /// The remote classifier did not answer in time
    #[error("Content safety request timed out after {0} ms")]
    ClassifierTimeout(u64),

    /// Audit entry could not be persisted or read back
    #[error("Audit log error: {0}")]
    Audit(String),

    /// Policy configuration error
    #[error("Invalid governance policy: {0}")]
    ConfigurationError(String),
}

/// Result type alias for governance operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

// =============================================================================
// Tests
// =============================================================================

//! Governance gate
//!
//! Orchestrates the safety validator and the compliance checker for both
//! directions of traffic and records every decision in its audit sink.
//!
//! ```rust,ignore
//! let gate = GovernanceGate::builder()
//!     .with_config(GovernanceConfig::from_env())
//!     .build()?;
//!
//! let verdict = gate.validate_input("Find waterproof hiking boots").await;
//! assert!(verdict.passed);
//! ```

use super::audit_log::{InMemoryAuditLog, audit_sink_from_config};
use super::compliance::ComplianceChecker;
use super::safety_validator::SafetyValidator;
use chrono::Utc;
use error_stack::{Report, ResultExt};
use govgate_kernel::error::{KernelError, KernelResult};
use govgate_kernel::governance::{
    AuditEntry, AuditSink, GateAction, GovernanceConfig, GovernanceVerdict, SafetyClassifier,
};
use std::sync::Arc;
use tracing::{error, info};

/// Inbound/outbound content gate.
///
/// `Send + Sync`; share it behind an `Arc`. The gate is the only writer of
/// its audit sink.
pub struct GovernanceGate {
    safety: SafetyValidator,
    compliance: ComplianceChecker,
    standards: Vec<String>,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for GovernanceGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceGate")
            .field("safety", &self.safety)
            .field("standards", &self.standards)
            .field("audit_entries", &self.audit.len())
            .finish_non_exhaustive()
    }
}

impl Default for GovernanceGate {
    /// Reference policy, remote stage disabled, in-memory audit log.
    fn default() -> Self {
        let config = GovernanceConfig::default();
        Self {
            safety: SafetyValidator::default(),
            compliance: ComplianceChecker::default(),
            standards: config.compliance.gate_standards,
            audit: Arc::new(InMemoryAuditLog::new()),
        }
    }
}

impl GovernanceGate {
    #[must_use]
    pub fn builder() -> GovernanceGateBuilder {
        GovernanceGateBuilder::new()
    }

    /// Build a gate from a complete policy.
    pub fn from_config(config: GovernanceConfig) -> KernelResult<Self> {
        Self::builder().with_config(config).build()
    }

    /// Check text arriving from a user before it reaches retrieval or a model.
    pub async fn validate_input(&self, text: &str) -> GovernanceVerdict {
        self.evaluate(GateAction::ValidateInput, text).await
    }

    /// Check generated text before it is returned to the user.
    pub async fn validate_output(&self, text: &str) -> GovernanceVerdict {
        self.evaluate(GateAction::ValidateOutput, text).await
    }

    /// Snapshot of every decision so far, in append order.
    #[must_use]
    pub fn get_audit_log(&self) -> Vec<AuditEntry> {
        self.audit.entries()
    }

    #[must_use]
    pub fn audit_sink(&self) -> &Arc<dyn AuditSink> {
        &self.audit
    }

    /// Standards applied to every call.
    #[must_use]
    pub fn standards(&self) -> &[String] {
        &self.standards
    }

    #[must_use]
    pub fn safety_validator(&self) -> &SafetyValidator {
        &self.safety
    }

    #[must_use]
    pub fn compliance_checker(&self) -> &ComplianceChecker {
        &self.compliance
    }

    async fn evaluate(&self, action: GateAction, text: &str) -> GovernanceVerdict {
        let safety = self.safety.validate(text).await;
        let compliance = self
            .compliance
            .check_compliance(text, &self.standards, "general");

        let passed = safety.is_safe && compliance.compliant;
        let mut violations = safety.messages();
        violations.extend(compliance.violations);

        let verdict = GovernanceVerdict {
            passed,
            violations,
            timestamp: Utc::now(),
        };

        info!(
            action = %action,
            passed,
            violations = verdict.violations.len(),
            "governance verdict"
        );

        let entry = AuditEntry::record(action, verdict.clone());
        if let Err(e) = self.audit.append(&entry) {
            error!(action = %action, entry_id = %entry.id, error = %e, "failed to persist audit entry");
        }

        verdict
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`GovernanceGate`] from a policy plus optional overrides.
#[derive(Default)]
pub struct GovernanceGateBuilder {
    config: GovernanceConfig,
    classifier: Option<Arc<dyn SafetyClassifier>>,
    audit: Option<Arc<dyn AuditSink>>,
    standards: Option<Vec<String>>,
}

impl GovernanceGateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: GovernanceConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this classifier instead of the one the policy would configure.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn SafetyClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use this sink instead of the one the policy would configure.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Override `compliance.gate_standards`.
    #[must_use]
    pub fn with_standards<I, S>(mut self, standards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.standards = Some(standards.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> KernelResult<GovernanceGate> {
        let mut config = self.config;
        if let Some(standards) = self.standards {
            config.compliance.gate_standards = standards;
        }

        config
            .validate()
            .map_err(KernelError::from)
            .map_err(Report::new)
            .attach("validating governance policy")?;

        let mut safety = SafetyValidator::from_config(&config)
            .map_err(KernelError::from)
            .map_err(Report::new)
            .attach("building safety validator")?;
        if let Some(classifier) = self.classifier {
            safety = safety.with_classifier(classifier);
        }

        let compliance = ComplianceChecker::from_config(&config)
            .map_err(KernelError::from)
            .map_err(Report::new)
            .attach("building compliance checker")?;

        let audit = match self.audit {
            Some(sink) => sink,
            None => audit_sink_from_config(&config.audit)
                .map_err(KernelError::from)
                .map_err(Report::new)
                .attach("opening audit sink")?,
        };

        info!(
            standards = ?config.compliance.gate_standards,
            remote = safety.remote_enabled(),
            "governance gate ready"
        );

        Ok(GovernanceGate {
            safety,
            compliance,
            standards: config.compliance.gate_standards,
            audit,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Regulatory compliance check over detected PII

use super::regex_pii::RegexPiiDetector;
use govgate_kernel::governance::{
    CompliancePolicy, ComplianceResult, GovernanceConfig, PiiDetector, Remediation,
    SecurityResult,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a text may pass under a set of regulatory standards.
///
/// Any detected PII produces one violation message and a `Redact PII`
/// remediation; the text is non-compliant only when at least one requested
/// standard is declared zero-PII.
#[derive(Clone)]
pub struct ComplianceChecker {
    detector: Arc<dyn PiiDetector>,
    policy: CompliancePolicy,
}

impl std::fmt::Debug for ComplianceChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceChecker")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for ComplianceChecker {
    fn default() -> Self {
        Self::new(Arc::new(RegexPiiDetector::default()), CompliancePolicy::default())
    }
}

impl ComplianceChecker {
    #[must_use]
    pub fn new(detector: Arc<dyn PiiDetector>, policy: CompliancePolicy) -> Self {
        Self { detector, policy }
    }

    pub fn from_config(config: &GovernanceConfig) -> SecurityResult<Self> {
        Ok(Self::new(
            Arc::new(RegexPiiDetector::from_policy(&config.pii)?),
            config.compliance.clone(),
        ))
    }

    #[must_use]
    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    /// Check `text` against `standards`. `industry` is recorded in logs only.
    pub fn check_compliance<S: AsRef<str>>(
        &self,
        text: &str,
        standards: &[S],
        industry: &str,
    ) -> ComplianceResult {
        let scan = self.detector.detect(text);

        if !scan.has_pii {
            return ComplianceResult {
                compliant: true,
                violations: Vec::new(),
                remediation: Remediation::None,
                detected_pii_count: 0,
            };
        }

        let listed: Vec<String> = scan
            .entities
            .iter()
            .take(self.policy.max_listed_entities)
            .map(|e| format!("{}: {}", e.kind, e.matched_value))
            .collect();
        let violation = format!("PII Detected: {}...", listed.join(", "));

        let strict = standards.iter().map(AsRef::as_ref).any(|name| {
            match self.policy.find(name) {
                Some(standard) => standard.requires_zero_pii,
                None => {
                    warn!(standard = name, "unknown compliance standard, treated as non-strict");
                    false
                }
            }
        });

        debug!(
            industry,
            entities = scan.count,
            strict,
            "compliance check found PII"
        );

        ComplianceResult {
            compliant: !strict,
            violations: vec![violation],
            remediation: Remediation::RedactPii,
            detected_pii_count: scan.count,
        }
    }
}

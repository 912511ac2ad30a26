//! Multi-stage safety validation
//!
//! Three stages run in order and accumulate: local keyword scan, prompt
//! injection patterns, and the optional remote classifier. No stage
//! short-circuits another. The remote stage fails open: any error or a
//! timeout is logged and the verdict is decided by the local stages alone.

use super::content_safety::{DisabledClassifier, classifier_from_config};
use super::keyword_scanner::{KeywordSafetyScanner, RegexPromptGuard};
use govgate_kernel::governance::{
    ContentSafetyConfig, GovernanceConfig, PromptGuard, SafetyClassifier, SafetyFlag,
    SafetyScanner, SafetyVerdict, SecurityError, SecurityResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Combines the local scanner, the injection guard and a remote classifier.
#[derive(Clone)]
pub struct SafetyValidator {
    scanner: Arc<dyn SafetyScanner>,
    guard: Arc<dyn PromptGuard>,
    classifier: Arc<dyn SafetyClassifier>,
    severity_threshold: u8,
    remote_timeout: Duration,
}

impl std::fmt::Debug for SafetyValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyValidator")
            .field("classifier", &self.classifier.name())
            .field("severity_threshold", &self.severity_threshold)
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for SafetyValidator {
    /// Default tables, remote stage disabled.
    fn default() -> Self {
        let remote = ContentSafetyConfig::default();
        Self {
            scanner: Arc::new(KeywordSafetyScanner::default()),
            guard: Arc::new(RegexPromptGuard::default()),
            classifier: Arc::new(DisabledClassifier),
            severity_threshold: remote.severity_threshold,
            remote_timeout: Duration::from_millis(remote.timeout_ms),
        }
    }
}

impl SafetyValidator {
    /// Build every stage from a policy. The remote stage is enabled only when
    /// the policy carries both an endpoint and a key.
    pub fn from_config(config: &GovernanceConfig) -> SecurityResult<Self> {
        Ok(Self {
            scanner: Arc::new(KeywordSafetyScanner::new(&config.safety)),
            guard: Arc::new(RegexPromptGuard::new(&config.safety)?),
            classifier: classifier_from_config(&config.content_safety)?,
            severity_threshold: config.content_safety.severity_threshold,
            remote_timeout: Duration::from_millis(config.content_safety.timeout_ms),
        })
    }

    #[must_use]
    pub fn with_scanner(mut self, scanner: Arc<dyn SafetyScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: Arc<dyn PromptGuard>) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn SafetyClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Remote categories strictly above this level are violations.
    #[must_use]
    pub fn with_severity_threshold(mut self, threshold: u8) -> Self {
        self.severity_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    #[must_use]
    pub fn remote_enabled(&self) -> bool {
        self.classifier.is_enabled()
    }

    pub async fn validate(&self, text: &str) -> SafetyVerdict {
        let mut flags: Vec<SafetyFlag> = self
            .scanner
            .scan(text)
            .flags
            .iter()
            .map(SafetyFlag::keyword)
            .collect();

        flags.extend(
            self.guard
                .matched_patterns(text)
                .into_iter()
                .map(SafetyFlag::injection),
        );

        if self.classifier.is_enabled() {
            match self.classify_remote(text).await {
                Ok(remote) => flags.extend(remote),
                Err(e) => warn!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "remote safety check failed, continuing with local verdict"
                ),
            }
        }

        let verdict = SafetyVerdict::from_flags(flags);
        debug!(
            is_safe = verdict.is_safe,
            flags = verdict.flags.len(),
            "safety validation complete"
        );
        verdict
    }

    async fn classify_remote(&self, text: &str) -> SecurityResult<Vec<SafetyFlag>> {
        let timeout_ms = u64::try_from(self.remote_timeout.as_millis()).unwrap_or(u64::MAX);
        let analysis = tokio::time::timeout(self.remote_timeout, self.classifier.classify(text))
            .await
            .map_err(|_| SecurityError::ClassifierTimeout(timeout_ms))??;

        Ok(analysis
            .iter()
            .filter(|c| c.severity > self.severity_threshold)
            .map(SafetyFlag::remote)
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

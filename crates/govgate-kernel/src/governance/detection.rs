//! Local detection contracts
//!
//! PII detection, redaction, keyword scanning and prompt-injection matching
//! are pure CPU work over a borrowed string, so these contracts are
//! synchronous and infallible: "nothing found" is an empty result, never an
//! error.

use super::types::{KeywordScan, PiiScan, RedactionResult, RedactionStrategy};

// =============================================================================
// PII
// =============================================================================

/// Detects personally identifiable information in text.
///
/// ```rust,ignore
/// let detector = RegexPiiDetector::default();
/// let scan = detector.detect("Email me at jane@example.com");
/// assert_eq!(scan.count, 1);
/// assert_eq!(scan.entities[0].kind, PiiKind::Email);
/// ```
pub trait PiiDetector: Send + Sync {
    /// Scan `text` and return every match, grouped by kind registration order.
    fn detect(&self, text: &str) -> PiiScan;
}

/// Rewrites detected PII according to a [`RedactionStrategy`].
pub trait PiiRedactor: Send + Sync {
    fn redact(&self, text: &str, strategy: &RedactionStrategy) -> RedactionResult;
}

// =============================================================================
// Safety
// =============================================================================

/// Local keyword / phrase scanner for unsafe language.
pub trait SafetyScanner: Send + Sync {
    fn scan(&self, text: &str) -> KeywordScan;

    /// Heuristic score in `[0, 1]`: `1.0` when clean, minus `0.2` per flag,
    /// floored at zero. Not a calibrated probability.
    fn safety_score(&self, text: &str) -> f64 {
        let scan = self.scan(text);
        if scan.is_safe {
            return 1.0;
        }
        (1.0 - 0.2 * scan.flags.len() as f64).max(0.0)
    }
}

/// Matches prompt-injection / jailbreak phrasing.
pub trait PromptGuard: Send + Sync {
    /// Source text of every pattern that matched, in table order.
    fn matched_patterns(&self, text: &str) -> Vec<String>;
}

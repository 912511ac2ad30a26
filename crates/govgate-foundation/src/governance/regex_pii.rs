//! Regex-based PII detection and redaction
//!
//! `RegexPiiDetector` compiles an ordered [`PiiPolicy`] once and implements
//! both [`PiiDetector`] and [`PiiRedactor`]. The default registry is compiled
//! lazily and shared between every default-constructed detector.
//!
//! Redaction precedence: kinds are rewritten one at a time, in registration
//! order, over the already-rewritten text. When two patterns overlap (an
//! email whose local part is five digits also matches `zip_code`), the kind
//! registered first wins and the later pattern sees only its placeholder.

use govgate_kernel::governance::{
    DetectionEntity, PiiDetector, PiiKind, PiiPattern, PiiPolicy, PiiRedactor, PiiScan,
    RedactionResult, RedactionStrategy, SecurityError, SecurityResult,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

static DEFAULT_REGISTRY: Lazy<Arc<[CompiledPattern]>> = Lazy::new(|| {
    compile(&PiiPolicy::default().patterns).expect("built-in PII patterns compile")
});

#[derive(Debug, Clone)]
struct CompiledPattern {
    kind: PiiKind,
    regex: Regex,
}

fn compile(patterns: &[PiiPattern]) -> SecurityResult<Arc<[CompiledPattern]>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(&p.pattern)
                .map(|regex| CompiledPattern {
                    kind: p.kind.clone(),
                    regex,
                })
                .map_err(|e| SecurityError::InvalidPattern {
                    name: p.kind.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect::<SecurityResult<Vec<_>>>()
        .map(Arc::from)
}

// =============================================================================
// RegexPiiDetector
// =============================================================================

/// Pattern-registry PII detector and redactor.
///
/// Patterns are deliberately broad (any five-digit run is a `zip_code`);
/// callers that need precision should filter the scan by kind.
#[derive(Debug, Clone)]
pub struct RegexPiiDetector {
    registry: Arc<[CompiledPattern]>,
}

impl Default for RegexPiiDetector {
    fn default() -> Self {
        Self {
            registry: Arc::clone(&DEFAULT_REGISTRY),
        }
    }
}

impl RegexPiiDetector {
    /// Compile a detector from a policy table.
    pub fn from_policy(policy: &PiiPolicy) -> SecurityResult<Self> {
        Ok(Self {
            registry: compile(&policy.patterns)?,
        })
    }

    /// Default registry restricted to the given kinds, keeping registry order.
    #[must_use]
    pub fn with_kinds(kinds: &[PiiKind]) -> Self {
        let registry: Vec<CompiledPattern> = DEFAULT_REGISTRY
            .iter()
            .filter(|p| kinds.contains(&p.kind))
            .cloned()
            .collect();
        Self {
            registry: Arc::from(registry),
        }
    }

    /// Registered kinds, in scan order.
    pub fn kinds(&self) -> impl Iterator<Item = &PiiKind> {
        self.registry.iter().map(|p| &p.kind)
    }

    /// Replace every match with its kind placeholder.
    #[must_use]
    pub fn redact_text(&self, text: &str) -> String {
        self.redact(text, &RedactionStrategy::Placeholder).redacted_text
    }

    fn replacement(kind: &PiiKind, value: &str, strategy: &RedactionStrategy) -> String {
        match strategy {
            RedactionStrategy::Placeholder => kind.placeholder(),
            RedactionStrategy::Mask => Self::mask_value(kind, value),
            RedactionStrategy::Hash => {
                let digest = hex::encode(Sha256::digest(value.as_bytes()));
                format!("[{}]", &digest[..8])
            }
            RedactionStrategy::Remove => String::new(),
            RedactionStrategy::Replace(text) => text.clone(),
            _ => kind.placeholder(),
        }
    }

    fn mask_value(kind: &PiiKind, value: &str) -> String {
        let last_four = || {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            (digits.len() >= 4).then(|| digits[digits.len() - 4..].to_string())
        };

        match kind {
            PiiKind::Email => match (value.chars().next(), value.find('@')) {
                (Some(first), Some(at)) => format!("{first}***{}", &value[at..]),
                _ => "***@***".to_string(),
            },
            PiiKind::Phone => match last_four() {
                Some(tail) => format!("***-***-{tail}"),
                None => "***-***-****".to_string(),
            },
            PiiKind::CreditCard => match last_four() {
                Some(tail) => format!("****-****-****-{tail}"),
                None => "****-****-****-****".to_string(),
            },
            PiiKind::Ssn => "***-**-****".to_string(),
            PiiKind::ZipCode => "*****".to_string(),
            PiiKind::IpAddress => "***.***.***.***".to_string(),
            _ => "*".repeat(value.chars().count()),
        }
    }
}

impl PiiDetector for RegexPiiDetector {
    fn detect(&self, text: &str) -> PiiScan {
        let entities: Vec<DetectionEntity> = self
            .registry
            .iter()
            .flat_map(|p| {
                p.regex.find_iter(text).map(move |m| DetectionEntity {
                    kind: p.kind.clone(),
                    matched_value: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();

        if !entities.is_empty() {
            debug!(count = entities.len(), "PII detected");
        }
        PiiScan::new(entities)
    }
}

impl PiiRedactor for RegexPiiDetector {
    fn redact(&self, text: &str, strategy: &RedactionStrategy) -> RedactionResult {
        let entities = self.detect(text).entities;

        let mut redacted = text.to_string();
        if !entities.is_empty() {
            for p in self.registry.iter() {
                redacted = p
                    .regex
                    .replace_all(&redacted, |caps: &Captures<'_>| {
                        Self::replacement(&p.kind, &caps[0], strategy)
                    })
                    .into_owned();
            }
        }

        RedactionResult {
            original_text: text.to_string(),
            redacted_text: redacted,
            entities,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

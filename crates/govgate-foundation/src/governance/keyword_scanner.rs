//! Keyword-based content scanning and prompt injection guard
//!
//! Provides `KeywordSafetyScanner` and `RegexPromptGuard`, the two local
//! stages of the safety validator. Both are built from a [`SafetyPolicy`].

use govgate_kernel::governance::{
    KeywordCategory, KeywordFlag, KeywordScan, PromptGuard, SafetyPolicy, SafetyScanner,
    SecurityError, SecurityResult, Severity,
};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::debug;

static DEFAULT_SCANNER: Lazy<KeywordSafetyScanner> =
    Lazy::new(|| KeywordSafetyScanner::from_categories(&SafetyPolicy::default().keyword_categories));

static DEFAULT_INJECTION_PATTERNS: Lazy<Arc<[InjectionPattern]>> = Lazy::new(|| {
    compile_injection(&SafetyPolicy::default().injection_patterns)
        .expect("built-in injection patterns compile")
});

// =============================================================================
// KeywordSafetyScanner
// =============================================================================

#[derive(Debug, Clone)]
struct ScannedCategory {
    name: String,
    severity: Severity,
    /// (original, lowercase) pairs
    keywords: Vec<(String, String)>,
}

/// Case-insensitive substring scanner over an ordered category table.
///
/// Keywords are lowercased once at construction. Matching is plain substring
/// containment, so `hell` also fires on `hello`; the tables are tuned to
/// over-report rather than miss.
#[derive(Debug, Clone)]
pub struct KeywordSafetyScanner {
    categories: Arc<[ScannedCategory]>,
}

impl Default for KeywordSafetyScanner {
    fn default() -> Self {
        DEFAULT_SCANNER.clone()
    }
}

impl KeywordSafetyScanner {
    #[must_use]
    pub fn new(policy: &SafetyPolicy) -> Self {
        Self::from_categories(&policy.keyword_categories)
    }

    #[must_use]
    pub fn from_categories(categories: &[KeywordCategory]) -> Self {
        let categories: Vec<ScannedCategory> = categories
            .iter()
            .map(|c| ScannedCategory {
                name: c.name.clone(),
                severity: c.severity,
                keywords: c
                    .keywords
                    .iter()
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| (k.clone(), k.to_lowercase()))
                    .collect(),
            })
            .collect();
        Self {
            categories: Arc::from(categories),
        }
    }

    /// Category names, in scan order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

impl SafetyScanner for KeywordSafetyScanner {
    fn scan(&self, text: &str) -> KeywordScan {
        let lower = text.to_lowercase();

        let flags: Vec<KeywordFlag> = self
            .categories
            .iter()
            .flat_map(|category| {
                category
                    .keywords
                    .iter()
                    .filter(|(_, keyword)| lower.contains(keyword.as_str()))
                    .map(move |(original, _)| KeywordFlag {
                        category: category.name.clone(),
                        keyword: original.clone(),
                        severity: category.severity,
                    })
            })
            .collect();

        if !flags.is_empty() {
            debug!(flags = flags.len(), "unsafe keywords found");
        }
        KeywordScan::from_flags(flags)
    }
}

// =============================================================================
// RegexPromptGuard
// =============================================================================

#[derive(Debug, Clone)]
struct InjectionPattern {
    source: String,
    regex: Regex,
}

fn compile_injection(patterns: &[String]) -> SecurityResult<Arc<[InjectionPattern]>> {
    patterns
        .iter()
        .map(|source| {
            RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .map(|regex| InjectionPattern {
                    source: source.clone(),
                    regex,
                })
                .map_err(|e| SecurityError::InvalidPattern {
                    name: format!("injection '{source}'"),
                    reason: e.to_string(),
                })
        })
        .collect::<SecurityResult<Vec<_>>>()
        .map(Arc::from)
}

/// Regex-based prompt injection detector.
///
/// Patterns are compiled case-insensitively; a hit is reported by the
/// pattern's source text.
#[derive(Debug, Clone)]
pub struct RegexPromptGuard {
    patterns: Arc<[InjectionPattern]>,
}

impl Default for RegexPromptGuard {
    fn default() -> Self {
        Self {
            patterns: Arc::clone(&DEFAULT_INJECTION_PATTERNS),
        }
    }
}

impl RegexPromptGuard {
    pub fn new(policy: &SafetyPolicy) -> SecurityResult<Self> {
        Self::from_patterns(&policy.injection_patterns)
    }

    pub fn from_patterns(patterns: &[String]) -> SecurityResult<Self> {
        Ok(Self {
            patterns: compile_injection(patterns)?,
        })
    }

    #[must_use]
    pub fn is_injection(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(text))
    }
}

impl PromptGuard for RegexPromptGuard {
    fn matched_patterns(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.source.clone())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

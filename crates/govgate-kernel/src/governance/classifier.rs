//! Remote content-safety classifier contract
//!
//! The remote stage is best effort. Callers select a disabled implementation
//! when no endpoint is configured and treat every `Err` as "no additional
//! flags".

use super::types::{CategorySeverity, SecurityResult};
use async_trait::async_trait;

/// Submits text to an external classifier and returns its per-category
/// severities on the service's ordinal scale.
///
/// ```rust,ignore
/// let classifier = AzureContentSafetyClassifier::new(&config.content_safety)?;
/// for analysis in classifier.classify("some product description").await? {
///     println!("{} => {}", analysis.category, analysis.severity);
/// }
/// ```
#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// `false` for the null implementation; the validator skips the stage.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn classify(&self, text: &str) -> SecurityResult<Vec<CategorySeverity>>;
}

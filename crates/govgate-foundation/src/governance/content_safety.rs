//! Remote content-safety classifiers
//!
//! [`AzureContentSafetyClassifier`] speaks the Azure AI Content Safety text
//! analysis REST API. [`DisabledClassifier`] stands in when no endpoint or
//! key is configured so the validator never has to special-case absence.

use async_trait::async_trait;
use govgate_kernel::governance::{
    CategorySeverity, ContentSafetyConfig, SafetyClassifier, SecurityError, SecurityResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Serialize)]
struct AnalyzeTextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTextResponse {
    #[serde(default)]
    categories_analysis: Vec<CategoryAnalysis>,
}

#[derive(Debug, Deserialize)]
struct CategoryAnalysis {
    category: String,
    #[serde(default)]
    severity: Option<u8>,
}

impl From<CategoryAnalysis> for CategorySeverity {
    fn from(analysis: CategoryAnalysis) -> Self {
        CategorySeverity::new(analysis.category, analysis.severity.unwrap_or(0))
    }
}

// =============================================================================
// AzureContentSafetyClassifier
// =============================================================================

/// Client for `POST {endpoint}/contentsafety/text:analyze`.
///
/// One attempt per call. The HTTP client carries the configured timeout;
/// the validator applies the same bound around the whole call.
pub struct AzureContentSafetyClassifier {
    client: reqwest::Client,
    url: String,
    api_key: String,
    timeout_ms: u64,
}

impl std::fmt::Debug for AzureContentSafetyClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureContentSafetyClassifier")
            .field("url", &self.url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl AzureContentSafetyClassifier {
    pub fn new(config: &ContentSafetyConfig) -> SecurityResult<Self> {
        let (Some(endpoint), Some(api_key)) = (config.endpoint.as_deref(), config.api_key.as_deref())
        else {
            return Err(SecurityError::ConfigurationError(
                "content safety endpoint and key are both required".into(),
            ));
        };
        if !config.is_configured() {
            return Err(SecurityError::ConfigurationError(
                "content safety endpoint or key is blank".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SecurityError::ConfigurationError(format!("http client: {e}")))?;

        Ok(Self {
            client,
            url: Self::analyze_url(endpoint, &config.api_version),
            api_key: api_key.trim().to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn analyze_url(endpoint: &str, api_version: &str) -> String {
        format!(
            "{}/contentsafety/text:analyze?api-version={}",
            endpoint.trim().trim_end_matches('/'),
            api_version
        )
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_error(&self, err: reqwest::Error) -> SecurityError {
        if err.is_timeout() {
            SecurityError::ClassifierTimeout(self.timeout_ms)
        } else if err.is_connect() || err.is_request() {
            SecurityError::ClassifierUnavailable(err.to_string())
        } else {
            SecurityError::ClassifierFailed(err.to_string())
        }
    }
}

#[async_trait]
impl SafetyClassifier for AzureContentSafetyClassifier {
    fn name(&self) -> &str {
        "azure-content-safety"
    }

    async fn classify(&self, text: &str) -> SecurityResult<Vec<CategorySeverity>> {
        let resp = self
            .client
            .post(&self.url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .json(&AnalyzeTextRequest { text })
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_error(e))?;

        if !status.is_success() {
            return Err(SecurityError::ClassifierFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: AnalyzeTextResponse = serde_json::from_str(&body)
            .map_err(|e| SecurityError::ClassifierFailed(format!("invalid response: {e}")))?;

        debug!(
            categories = parsed.categories_analysis.len(),
            "content safety analysis received"
        );
        Ok(parsed
            .categories_analysis
            .into_iter()
            .map(CategorySeverity::from)
            .collect())
    }
}

// =============================================================================
// DisabledClassifier
// =============================================================================

/// No-op classifier used when the remote stage is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClassifier;

#[async_trait]
impl SafetyClassifier for DisabledClassifier {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn classify(&self, _text: &str) -> SecurityResult<Vec<CategorySeverity>> {
        Ok(Vec::new())
    }
}

/// Remote classifier for a policy: the Azure client when configured,
/// otherwise [`DisabledClassifier`].
pub fn classifier_from_config(
    config: &ContentSafetyConfig,
) -> SecurityResult<Arc<dyn SafetyClassifier>> {
    if config.is_configured() {
        Ok(Arc::new(AzureContentSafetyClassifier::new(config)?))
    } else {
        debug!("content safety not configured, remote stage disabled");
        Ok(Arc::new(DisabledClassifier))
    }
}

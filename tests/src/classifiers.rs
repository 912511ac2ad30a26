use async_trait::async_trait;
use govgate_kernel::governance::{CategorySeverity, SafetyClassifier, SecurityError, SecurityResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A classifier returning a stubbed analysis.
///
/// Records every text it was asked to classify.
#[derive(Clone, Default)]
pub struct MockClassifier {
    /// Analysis returned by every call
    pub stubbed_result: Arc<RwLock<Vec<CategorySeverity>>>,
    /// Texts passed to `classify`, in call order
    pub call_history: Arc<RwLock<Vec<String>>>,
}

impl MockClassifier {
    pub fn new(result: Vec<CategorySeverity>) -> Self {
        Self {
            stubbed_result: Arc::new(RwLock::new(result)),
            call_history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_result(&self, result: Vec<CategorySeverity>) {
        *self.stubbed_result.write().await = result;
    }

    pub async fn history(&self) -> Vec<String> {
        self.call_history.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.call_history.read().await.len()
    }
}

#[async_trait]
impl SafetyClassifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, text: &str) -> SecurityResult<Vec<CategorySeverity>> {
        self.call_history.write().await.push(text.to_string());
        Ok(self.stubbed_result.read().await.clone())
    }
}

/// A classifier whose every call fails as if the service were unreachable.
#[derive(Debug, Clone, Default)]
pub struct FailingClassifier;

#[async_trait]
impl SafetyClassifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn classify(&self, _text: &str) -> SecurityResult<Vec<CategorySeverity>> {
        Err(SecurityError::ClassifierUnavailable(
            "connection refused".into(),
        ))
    }
}

/// A classifier that answers only after `delay`.
#[derive(Debug, Clone)]
pub struct SlowClassifier {
    delay: Duration,
    result: Vec<CategorySeverity>,
}

impl SlowClassifier {
    pub fn new(delay: Duration, result: Vec<CategorySeverity>) -> Self {
        Self { delay, result }
    }
}

#[async_trait]
impl SafetyClassifier for SlowClassifier {
    fn name(&self) -> &str {
        "slow"
    }

    async fn classify(&self, _text: &str) -> SecurityResult<Vec<CategorySeverity>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.result.clone())
    }
}

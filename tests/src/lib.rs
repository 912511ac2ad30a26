//! GovGate Testing Framework
//!
//! Test doubles for the remote safety classifier and a local HTTP stub of
//! the content-safety endpoint, so gate behaviour can be exercised without
//! live credentials.

pub mod classifiers;
pub mod server;

pub use classifiers::{FailingClassifier, MockClassifier, SlowClassifier};
pub use server::{ContentSafetyStub, RecordedRequest, RunningStub, categories_body};

/// Assert how many decisions a gate has recorded.
#[macro_export]
macro_rules! assert_audited {
    ($gate:expr, $expected_count:expr) => {
        let count = $gate.get_audit_log().len();
        assert_eq!(
            count, $expected_count,
            "Expected {} audit entries, found {}",
            $expected_count, count
        );
    };
}

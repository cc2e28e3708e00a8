//! Error types for collaborator calls and the pipeline boundary.

use thiserror::Error;

/// Failures surfaced by object and record stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("object {container}/{key} not found")]
    NotFound { container: String, key: String },

    #[error("write rejected: {0}")]
    WriteRejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures surfaced by the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("no topic matches name {0:?}")]
    TopicUnresolved(String),

    #[error("delivery rejected: {0}")]
    DeliveryRejected(String),
}

/// Invocation-level failures reported to the invoking environment.
/// Retry, if any, is the environment's redelivery mechanism, never ours.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    #[error("event payload malformed: {0}")]
    InputMalformed(String),

    #[error("upstream call failed: {0}")]
    UpstreamUnavailable(String),

    #[error("notification topic unresolved: {0:?}")]
    TopicUnresolved(String),
}

impl From<StoreError> for ProcessorError {
    fn from(err: StoreError) -> Self {
        ProcessorError::UpstreamUnavailable(err.to_string())
    }
}

impl From<PublishError> for ProcessorError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::TopicUnresolved(name) => ProcessorError::TopicUnresolved(name),
            PublishError::DeliveryRejected(reason) => ProcessorError::UpstreamUnavailable(
                format!("notification delivery rejected: {reason}"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_surface_as_upstream_failures() {
        let err: ProcessorError = StoreError::NotFound {
            container: "incoming-logs-dev".into(),
            key: "service.log".into(),
        }
        .into();
        assert!(matches!(err, ProcessorError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("incoming-logs-dev/service.log"));
    }

    #[test]
    fn unresolved_topic_keeps_its_own_kind() {
        let err: ProcessorError = PublishError::TopicUnresolved("alerts".into()).into();
        assert_eq!(err, ProcessorError::TopicUnresolved("alerts".into()));
    }
}

//! Error types for the reconciliation core
//!
//! Errors are structured with fields to aid debugging in production. Each
//! variant carries the context the host controller needs to decide whether a
//! failed pass should be requeued.

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for reconciliation operations
#[derive(Debug, Error)]
pub enum Error {
    /// A cloud API call failed
    #[error("cloud API error [{service}/{operation}]: {message}")]
    CloudApi {
        /// Cloud service the call targeted (e.g. "ELBV2")
        service: String,
        /// API operation that failed (e.g. "CreateRule")
        operation: String,
        /// Description of what failed
        message: String,
    },

    /// Invalid routing spec or collaborator state
    #[error("validation error: {message}")]
    Validation {
        /// Description of what's invalid
        message: String,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g. "rule-delete")
        context: String,
    },
}

impl Error {
    /// Create a cloud API error for an ELBV2 operation
    pub fn elbv2(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::CloudApi {
            service: crate::metrics::SERVICE_ELBV2.to_string(),
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a cloud API error with an explicit service
    pub fn cloud_api(
        service: impl Into<String>,
        operation: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::CloudApi {
            service: service.into(),
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an internal error with the given message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: UNKNOWN_CONTEXT.to_string(),
        }
    }

    /// Create an internal error with context
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Cloud API failures are retryable: the next reconciliation pass rebuilds
    /// desired/current state from scratch and converges idempotently.
    /// Validation errors require a config fix and are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::CloudApi { .. } => true,
            Error::Validation { .. } => false,
            Error::Internal { .. } => true,
        }
    }

    /// Get the failed cloud operation if this error came from a cloud call
    pub fn operation(&self) -> Option<&str> {
        match self {
            Error::CloudApi { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Story Tests: Error Propagation in Rule Reconciliation
    // ==========================================================================
    //
    // These tests demonstrate how errors flow through the system during a
    // reconciliation pass. Each error type represents a different failure
    // category with specific handling requirements.

    /// Story: cloud API failures surface the failed operation for retry
    ///
    /// When CreateRule/DeleteRule/ModifyRule fails, the error names the
    /// service and operation so the host controller can requeue the pass
    /// and the operator can correlate it with the failure metric.
    #[test]
    fn story_cloud_api_failures_are_retryable() {
        // Scenario: rule creation rejected by the cloud
        let err = Error::elbv2("CreateRule", "PriorityInUse: priority 5 is already in use");
        assert!(err.to_string().contains("ELBV2/CreateRule"));
        assert!(err.to_string().contains("PriorityInUse"));
        assert_eq!(err.operation(), Some("CreateRule"));
        assert!(err.is_retryable());

        // Scenario: delete of an already-removed rule
        let err = Error::elbv2("DeleteRule", "RuleNotFound");
        assert_eq!(err.operation(), Some("DeleteRule"));
        assert!(err.is_retryable());

        // Cloud API errors are categorized correctly
        match Error::cloud_api("ELBV2", "ModifyRule", "throttled") {
            Error::CloudApi {
                service, operation, ..
            } => {
                assert_eq!(service, "ELBV2");
                assert_eq!(operation, "ModifyRule");
            }
            _ => panic!("Expected CloudApi variant"),
        }
    }

    /// Story: validation errors fail the pass permanently
    ///
    /// A listener with no target groups cannot forward traffic; retrying
    /// without a config change would fail identically.
    #[test]
    fn story_validation_errors_are_not_retryable() {
        let err = Error::validation("listener has no target groups to forward to");
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("no target groups"));
        assert!(!err.is_retryable());
        assert_eq!(err.operation(), None);
    }

    /// Story: internal errors carry the context where they occurred
    #[test]
    fn story_internal_errors_carry_context() {
        let err = Error::internal_with_context("rule-delete", "current rule has no ARN");
        assert!(err.to_string().contains("[rule-delete]"));
        assert!(err.to_string().contains("no ARN"));
        assert!(err.is_retryable());

        let err = Error::internal("unexpected state");
        assert!(err.to_string().contains(&format!("[{}]", UNKNOWN_CONTEXT)));
    }

    /// Story: error helper functions accept both String and &str
    #[test]
    fn story_error_construction_ergonomics() {
        let dynamic_msg = format!("service {} not found", "svc-api");
        let err = Error::validation(dynamic_msg);
        assert!(err.to_string().contains("svc-api"));

        let err = Error::elbv2("CreateRule", "static message");
        assert!(err.to_string().contains("static message"));
    }
}

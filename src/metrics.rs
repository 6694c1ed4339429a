//! Metrics for cloud API interactions
//!
//! Provides OpenTelemetry counters for the cloud calls issued by the rule
//! reconciler. Every failed call increments [`CLOUD_API_ERRORS`] labeled with
//! the service and the request that failed, matching the alerting contract of
//! the surrounding controller.

use once_cell::sync::Lazy;
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Meter};
use opentelemetry::KeyValue;

/// Global meter for trellis metrics
static METER: Lazy<Meter> = Lazy::new(|| global::meter("trellis"));

/// Service label value for Elastic Load Balancing v2 calls
pub const SERVICE_ELBV2: &str = "ELBV2";

/// Counter of cloud API calls issued
///
/// Labels:
/// - `service`: cloud service name (e.g. "ELBV2")
/// - `request`: API operation (CreateRule, DeleteRule, ModifyRule)
pub static CLOUD_API_CALLS: Lazy<Counter<u64>> = Lazy::new(|| {
    METER
        .u64_counter("trellis_cloud_api_calls_total")
        .with_description("Total number of cloud API calls issued")
        .with_unit("{calls}")
        .build()
});

/// Counter of cloud API call failures
///
/// Labels:
/// - `service`: cloud service name (e.g. "ELBV2")
/// - `request`: API operation that failed
pub static CLOUD_API_ERRORS: Lazy<Counter<u64>> = Lazy::new(|| {
    METER
        .u64_counter("trellis_cloud_api_errors_total")
        .with_description("Total number of failed cloud API calls")
        .with_unit("{errors}")
        .build()
});

/// Record an issued cloud API call
pub fn record_api_call(service: &str, request: &str) {
    CLOUD_API_CALLS.add(
        1,
        &[
            KeyValue::new("service", service.to_string()),
            KeyValue::new("request", request.to_string()),
        ],
    );
}

/// Record a failed cloud API call
pub fn record_api_error(service: &str, request: &str) {
    CLOUD_API_ERRORS.add(
        1,
        &[
            KeyValue::new("service", service.to_string()),
            KeyValue::new("request", request.to_string()),
        ],
    );
}

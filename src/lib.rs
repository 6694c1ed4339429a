//! Trellis - rule-level reconciliation core for an ELBv2 ingress controller
//!
//! Trellis converges the routing rules declared by a cluster Ingress onto the
//! rules actually present on a cloud load balancer's listener. For each HTTP
//! path an Ingress declares, the core computes a desired routing rule,
//! compares it against the rule observed on the listener, and issues the
//! minimal create/modify/delete operation needed to converge them.
//!
//! # Architecture
//!
//! One [`elbv2::Rule`] is constructed per Ingress path per reconciliation
//! pass. An external fetch step populates the current-state snapshot from the
//! cloud; [`elbv2::Rule::sync`] then drives the state machine, issuing at
//! most one cloud mutation per pass through the [`elbv2::Elbv2Api`]
//! collaborator. The surrounding controller owns scheduling, credentials,
//! telemetry initialization, and the listener/target-group reconciliation
//! loops.
//!
//! # Modules
//!
//! - [`ingress`] - upstream input: (path, backend-service) pairs per Ingress
//! - [`elbv2`] - routing-rule types, cloud API trait, and the sync state machine
//! - [`fingerprint`] - canonical ordering + content hashing over tag/string sets
//! - [`cache`] - capacity/TTL-bounded memoization of fingerprint-derived values
//! - [`metrics`] - cloud API failure counters
//! - [`error`] - error types for the reconciliation core

#![deny(missing_docs)]

pub mod cache;
pub mod elbv2;
pub mod error;
pub mod fingerprint;
pub mod ingress;
pub mod metrics;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// The Ingress path that maps onto a listener's default rule
pub const ROOT_PATH: &str = "/";

//! Canonical ordering and content hashing for tag and string collections
//!
//! Cloud APIs return tag sets and identifier lists in arbitrary order, so any
//! comparison or memoization key built from them must first normalize that
//! order. This module provides typed containers whose canonical form is an
//! ascending sort (by key for tags, lexicographic for strings) and whose
//! fingerprint is a SHA-256 digest over that canonical form: permutations of
//! the same entries always digest identically, while any changed key or value
//! yields a different digest.
//!
//! Fingerprints are used elsewhere in the controller to detect tag drift on
//! cloud resources and membership change in cluster node-identifier sets, and
//! as keys for the [`crate::cache::FingerprintCache`].

use std::collections::HashMap;
use std::fmt::Write;

use aws_lc_rs::digest;
use serde::{Deserialize, Serialize};

/// Shared capability of the canonicalizable containers: sort into canonical
/// ascending order, and digest the canonical form.
pub trait Fingerprintable {
    /// Sort entries into canonical ascending order in place.
    fn canonicalize(&mut self);

    /// Compute the content digest over the canonical form.
    ///
    /// The receiver is not mutated; the digest is computed over a canonically
    /// sorted copy, so any permutation of the same entries produces the same
    /// fingerprint.
    fn fingerprint(&self) -> String;
}

/// Hex-encode a digest the stable way (no DefaultHasher, which is not
/// guaranteed stable across Rust releases).
fn hex_encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
            let _ = write!(s, "{:02x}", b);
            s
        })
}

// =============================================================================
// Tags
// =============================================================================

/// A single key/value tag entry on a cloud resource
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value
    pub value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An unordered collection of tags with canonical (key-ascending) form
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a tag set from a map, sorted ascending by key regardless of the
    /// map's iteration order
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let mut set = Self(
            map.iter()
                .map(|(k, v)| Tag::new(k.clone(), v.clone()))
                .collect(),
        );
        set.canonicalize();
        set
    }

    /// Add a tag
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    /// Look up a tag value by key, reporting whether it was present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tags in their current order
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }
}

impl From<Vec<Tag>> for TagSet {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Fingerprintable for TagSet {
    fn canonicalize(&mut self) {
        self.0.sort_by(|a, b| a.key.cmp(&b.key));
    }

    fn fingerprint(&self) -> String {
        let mut sorted = self.clone();
        sorted.canonicalize();

        let mut ctx = digest::Context::new(&digest::SHA256);
        for tag in &sorted.0 {
            ctx.update(tag.key.as_bytes());
            ctx.update(b"=");
            ctx.update(tag.value.as_bytes());
            ctx.update(b"\n");
        }
        hex_encode(ctx.finish().as_ref())
    }
}

// =============================================================================
// Strings
// =============================================================================

/// An unordered collection of strings with canonical (lexicographic) form
///
/// Used for cluster node-identifier sets and subnet-ID lists.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StringSet(Vec<String>);

impl StringSet {
    /// Create an empty string set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a string
    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    /// Whether the set contains the given value
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|s| s == value)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the entries in their current order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume the set, yielding its entries
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for StringSet {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl FromIterator<String> for StringSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Fingerprintable for StringSet {
    fn canonicalize(&mut self) {
        self.0.sort();
    }

    fn fingerprint(&self) -> String {
        let mut sorted = self.clone();
        sorted.canonicalize();

        let mut ctx = digest::Context::new(&digest::SHA256);
        for value in &sorted.0 {
            ctx.update(value.as_bytes());
            ctx.update(b"\n");
        }
        hex_encode(ctx.finish().as_ref())
    }
}

// =============================================================================
// Placement projections
// =============================================================================

/// A load balancer availability-zone entry
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailabilityZone {
    /// Zone name (e.g. "us-east-1a"); empty when projected from a bare subnet
    pub zone_name: String,
    /// Subnet ID backing the zone
    pub subnet_id: String,
}

/// Availability-zone list as reported on a load balancer
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailabilityZones(
    /// Zone entries in cloud order
    pub Vec<AvailabilityZone>,
);

/// Subnet-ID list, the other cloud representation of the same placement
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Subnets(
    /// Subnet IDs backing the placement
    pub StringSet,
);

impl AvailabilityZones {
    /// Project the zone list down to its subnet IDs
    pub fn as_subnets(&self) -> Subnets {
        Subnets(self.0.iter().map(|az| az.subnet_id.clone()).collect())
    }
}

impl Subnets {
    /// Project the subnet IDs up to availability-zone entries
    ///
    /// Zone names are left empty; subnet IDs are the only placement
    /// information a bare subnet list carries.
    pub fn as_availability_zones(&self) -> AvailabilityZones {
        AvailabilityZones(
            self.0
                .as_slice()
                .iter()
                .map(|subnet_id| AvailabilityZone {
                    zone_name: String::new(),
                    subnet_id: subnet_id.clone(),
                })
                .collect(),
        )
    }

    /// Fingerprint of the subnet set (order-independent)
    pub fn fingerprint(&self) -> String {
        self.0.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(entries: &[(&str, &str)]) -> TagSet {
        entries.iter().map(|(k, v)| Tag::new(*k, *v)).collect()
    }

    #[test]
    fn test_tag_permutations_digest_identically() {
        let a = tags(&[("a", "1"), ("b", "2")]);
        let b = tags(&[("b", "2"), ("a", "1")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_changed_key_or_value_changes_digest() {
        let base = tags(&[("a", "1"), ("b", "2")]);
        let changed_value = tags(&[("a", "1"), ("b", "3")]);
        let changed_key = tags(&[("a", "1"), ("c", "2")]);

        assert_ne!(base.fingerprint(), changed_value.fingerprint());
        assert_ne!(base.fingerprint(), changed_key.fingerprint());
        assert_ne!(changed_value.fingerprint(), changed_key.fingerprint());
    }

    #[test]
    fn test_fingerprint_does_not_mutate_order() {
        let set = tags(&[("z", "26"), ("a", "1")]);
        let _ = set.fingerprint();
        // Insertion order survives; only the digest is canonical
        assert_eq!(set.iter().next().unwrap().key, "z");
    }

    #[test]
    fn test_from_map_sorts_ascending_by_key() {
        let mut map = HashMap::new();
        map.insert("zone".to_string(), "us-east-1a".to_string());
        map.insert("cluster".to_string(), "prod".to_string());
        map.insert("managed-by".to_string(), "trellis".to_string());

        let set = TagSet::from_map(&map);
        let keys: Vec<&str> = set.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["cluster", "managed-by", "zone"]);
    }

    #[test]
    fn test_tag_lookup_reports_presence() {
        let set = tags(&[("cluster", "prod"), ("zone", "us-east-1a")]);
        assert_eq!(set.get("cluster"), Some("prod"));
        assert_eq!(set.get("missing"), None);
    }

    #[test]
    fn test_string_set_permutations_digest_identically() {
        let a = StringSet::from(vec!["i-0b".to_string(), "i-0a".to_string()]);
        let b = StringSet::from(vec!["i-0a".to_string(), "i-0b".to_string()]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = StringSet::from(vec!["i-0a".to_string(), "i-0c".to_string()]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_string_set_canonicalize_sorts_in_place() {
        let mut set = StringSet::from(vec![
            "subnet-c".to_string(),
            "subnet-a".to_string(),
            "subnet-b".to_string(),
        ]);
        set.canonicalize();
        assert_eq!(set.as_slice(), ["subnet-a", "subnet-b", "subnet-c"]);
    }

    #[test]
    fn test_empty_sets_have_stable_digests() {
        assert_eq!(TagSet::new().fingerprint(), TagSet::new().fingerprint());
        assert_eq!(
            StringSet::new().fingerprint(),
            StringSet::new().fingerprint()
        );
    }

    #[test]
    fn test_zone_subnet_projections() {
        let zones = AvailabilityZones(vec![
            AvailabilityZone {
                zone_name: "us-east-1a".to_string(),
                subnet_id: "subnet-a".to_string(),
            },
            AvailabilityZone {
                zone_name: "us-east-1b".to_string(),
                subnet_id: "subnet-b".to_string(),
            },
        ]);

        let subnets = zones.as_subnets();
        assert_eq!(subnets.0.as_slice(), ["subnet-a", "subnet-b"]);

        let back = subnets.as_availability_zones();
        assert_eq!(back.0.len(), 2);
        assert_eq!(back.0[0].subnet_id, "subnet-a");
        // Zone names are not recoverable from a bare subnet list
        assert!(back.0[0].zone_name.is_empty());
    }
}

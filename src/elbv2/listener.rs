//! The listener a rule attaches to
//!
//! The listener itself is owned by a sibling reconciliation loop; rules only
//! need its ARN and its rule-priority counter. The counter is the one piece
//! of mutable state shared across rules on the same listener, so it lives
//! behind a mutex that rule creation holds across the whole cloud call:
//! read-for-request and increment-on-success must not interleave between
//! concurrent creations, or two rules would land on the same priority.

use tokio::sync::{Mutex, MutexGuard};

/// Listener handle exposing what rule reconciliation needs
#[derive(Debug)]
pub struct Listener {
    arn: String,
    last_rule_priority: Mutex<i64>,
}

impl Listener {
    /// Create a handle for the listener with the given ARN; `next_priority`
    /// is the priority the next created rule will receive
    pub fn new(arn: impl Into<String>, next_priority: i64) -> Self {
        Self {
            arn: arn.into(),
            last_rule_priority: Mutex::new(next_priority),
        }
    }

    /// ARN rules attach to
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Lock the priority counter for the duration of a rule creation
    ///
    /// The guard must be held until the creation either fails (counter left
    /// unchanged) or succeeds (counter advanced by exactly one).
    pub(crate) async fn lock_priority(&self) -> MutexGuard<'_, i64> {
        self.last_rule_priority.lock().await
    }

    /// Priority the next created rule would receive
    pub async fn next_priority(&self) -> i64 {
        *self.last_rule_priority.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counter_starts_at_configured_value() {
        let listener = Listener::new("arn:listener/1", 5);
        assert_eq!(listener.arn(), "arn:listener/1");
        assert_eq!(listener.next_priority().await, 5);
    }

    #[tokio::test]
    async fn test_guard_serializes_increment_and_read() {
        let listener = Listener::new("arn:listener/1", 1);
        {
            let mut guard = listener.lock_priority().await;
            *guard += 1;
        }
        assert_eq!(listener.next_priority().await, 2);
    }
}

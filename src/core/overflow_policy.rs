//! What an [`AsyncCore`](super::AsyncCore) does when its queue is full

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy applied to a record that finds the async queue full
///
/// Records of [`LogPriority::Critical`] are never subject to the policy:
/// they are written synchronously on the caller's thread instead.
///
/// # Example
///
/// ```
/// use subsystem_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the record, counting it in the metrics only
    DropNewest,

    /// Wait for queue space; applies backpressure to the logging thread
    Block,

    /// Wait up to the timeout, then drop with an alert
    BlockWithTimeout(Duration),

    /// Drop the record, alert on stderr and through the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Preservation priority of a record under overflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogPriority {
    /// Trace, Debug, Info
    #[default]
    Normal = 0,
    /// Warn
    High = 1,
    /// Error, Fatal: never dropped
    Critical = 2,
}

/// Called with the running total of dropped records
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
    }

    #[test]
    fn test_overflow_policy_deserialize() {
        let policy: OverflowPolicy = serde_json::from_str("\"drop_newest\"").unwrap();
        assert_eq!(policy, OverflowPolicy::DropNewest);

        let policy: OverflowPolicy =
            serde_json::from_str(r#"{"block_with_timeout":{"secs":0,"nanos":5000000}}"#).unwrap();
        assert_eq!(policy, OverflowPolicy::BlockWithTimeout(Duration::from_millis(5)));
    }

    #[test]
    fn test_log_priority_ordering() {
        assert!(LogPriority::Normal < LogPriority::High);
        assert!(LogPriority::High < LogPriority::Critical);
        assert_eq!(LogPriority::default(), LogPriority::Normal);
    }
}

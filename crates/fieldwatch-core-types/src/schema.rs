//! Canonical schema constants for structured logging and events
//!
//! These constants keep field keys consistent between the logging macros
//! and the assertions made against captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Tracker counters
pub const FIELD_TRACKED_LEN: &str = "tracked_len";
pub const FIELD_SNAPSHOT_LEN: &str = "snapshot_len";
pub const FIELD_CHANGED_LEN: &str = "changed_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_TRACKER_NEW: &str = "tracker_new";
pub const OP_TRACKER_CHANGES: &str = "tracker_changes";
pub const OP_TRACKER_DIFF: &str = "tracker_diff";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_CHANGED_LEN.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_op_names_are_distinct() {
        assert_ne!(OP_TRACKER_NEW, OP_TRACKER_CHANGES);
        assert_ne!(OP_TRACKER_CHANGES, OP_TRACKER_DIFF);
    }
}

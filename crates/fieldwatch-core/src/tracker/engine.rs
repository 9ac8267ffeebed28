//! Change tracker engine.
//!
//! [`ChangeTracker::new`] captures the tracked fields of a source record;
//! [`ChangeTracker::changes`] reports which of them differ on a later record,
//! together with their snapshot-time values.

use crate::config::{TrackerConfig, UncapturedFieldPolicy};
use crate::core_types::schema::{OP_TRACKER_CHANGES, OP_TRACKER_DIFF, OP_TRACKER_NEW};
use crate::errors::{ExError, Result, TrackerError};
use crate::record::{read_fields, FieldValue, RecordRole};
use crate::tracker::model::{ChangeSet, FieldChange, FieldDiff, PriorValue};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use serde_json::Map;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Field name → value captured at construction.
pub type Snapshot = BTreeMap<String, FieldValue>;

/// Snapshots a set of named fields and reports later changes to them.
///
/// A `Default` tracker is uninitialized: every query on it fails with
/// `NotInitialized`. A tracker returned by [`ChangeTracker::new`] is frozen;
/// its tracked set and snapshot never change, so queries are pure and the
/// tracker can be shared across threads by reference.
///
/// ```
/// use fieldwatch_core::ChangeTracker;
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let mut person = Person { name: "Alice".into(), age: 30 };
/// let tracker = ChangeTracker::new(&person, ["age"]).unwrap();
///
/// person.age = 31;
/// let changes = tracker.changes(&person).unwrap();
/// assert_eq!(changes.get("age").and_then(|p| p.captured()), Some(&json!(30)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    tracked: BTreeSet<String>,
    snapshot: Option<Snapshot>,
    policy: UncapturedFieldPolicy,
}

impl ChangeTracker {
    /// Capture `fields` of `source`.
    ///
    /// Tracked names that `source` does not have are kept in the tracked set
    /// but get no snapshot entry.
    ///
    /// # Errors
    ///
    /// - `InvalidSourceKind` when `source` is not a structured record
    /// - `Serialization` when a tracked field cannot be converted or
    ///   `source`'s `Serialize` impl fails
    pub fn new<T, I, S>(source: &T, fields: I) -> Result<Self>
    where
        T: Serialize + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tracked = fields.into_iter().map(Into::into).collect();
        Self::capture(source, tracked, UncapturedFieldPolicy::default())
    }

    /// Capture the fields named by `config`, using its uncaptured-field policy.
    ///
    /// # Errors
    ///
    /// Same as [`ChangeTracker::new`].
    pub fn from_config<T>(source: &T, config: &TrackerConfig) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let tracked = config.fields.iter().cloned().collect();
        Self::capture(source, tracked, config.uncaptured_fields)
    }

    fn capture<T>(
        source: &T,
        tracked: BTreeSet<String>,
        policy: UncapturedFieldPolicy,
    ) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        log_op_start!(OP_TRACKER_NEW, tracked_len = tracked.len() as u64);
        let start = Instant::now();

        let mut fields = read_fields(source, &tracked, RecordRole::Source).map_err(|e| {
            log_op_error!(
                OP_TRACKER_NEW,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e.with_op(OP_TRACKER_NEW)
        })?;

        let snapshot: Snapshot = tracked
            .iter()
            .filter_map(|name| fields.remove(name).map(|value| (name.clone(), value)))
            .collect();

        for name in tracked.iter().filter(|n| !snapshot.contains_key(*n)) {
            tracing::debug!(field = %name, "tracked field not present on source");
        }

        log_op_end!(
            OP_TRACKER_NEW,
            duration_ms = start.elapsed().as_millis() as u64,
            tracked_len = tracked.len() as u64,
            snapshot_len = snapshot.len() as u64
        );

        Ok(Self {
            tracked,
            snapshot: Some(snapshot),
            policy,
        })
    }

    /// Report tracked fields whose value on `current` differs from the
    /// snapshot, mapped to their snapshot-time value.
    ///
    /// Fields missing from `current` are not reported. Fields present on
    /// `current` but never captured are reported as `PriorValue::NotCaptured`
    /// unless the policy is `Ignore`.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` when the tracker was never constructed
    /// - `InvalidCurrentKind` when `current` is not a structured record
    /// - `Serialization` when a tracked field cannot be converted or
    ///   `current`'s `Serialize` impl fails
    pub fn changes<T>(&self, current: &T) -> Result<ChangeSet>
    where
        T: Serialize + ?Sized,
    {
        log_op_start!(OP_TRACKER_CHANGES, tracked_len = self.tracked.len() as u64);
        let start = Instant::now();

        let result: Result<ChangeSet> =
            self.compare(current, |set: &mut ChangeSet, name, old, _new| {
                set.record(name, old);
            });

        match result {
            Ok(set) => {
                log_op_end!(
                    OP_TRACKER_CHANGES,
                    duration_ms = start.elapsed().as_millis() as u64,
                    changed_len = set.len() as u64
                );
                Ok(set)
            }
            Err(e) => {
                log_op_error!(
                    OP_TRACKER_CHANGES,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e.with_op(OP_TRACKER_CHANGES))
            }
        }
    }

    /// Like [`ChangeTracker::changes`], but each entry also carries the
    /// current value.
    ///
    /// # Errors
    ///
    /// Same as [`ChangeTracker::changes`].
    pub fn diff<T>(&self, current: &T) -> Result<FieldDiff>
    where
        T: Serialize + ?Sized,
    {
        log_op_start!(OP_TRACKER_DIFF, tracked_len = self.tracked.len() as u64);
        let start = Instant::now();

        let result: Result<FieldDiff> =
            self.compare(current, |diff: &mut FieldDiff, name, old, new| {
                diff.insert(
                    name.to_string(),
                    FieldChange {
                        old,
                        new: new.clone(),
                    },
                );
            });

        match result {
            Ok(diff) => {
                log_op_end!(
                    OP_TRACKER_DIFF,
                    duration_ms = start.elapsed().as_millis() as u64,
                    changed_len = diff.len() as u64
                );
                Ok(diff)
            }
            Err(e) => {
                log_op_error!(
                    OP_TRACKER_DIFF,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e.with_op(OP_TRACKER_DIFF))
            }
        }
    }

    /// Whether any tracked field changed.
    ///
    /// # Errors
    ///
    /// Same as [`ChangeTracker::changes`].
    pub fn has_changes<T>(&self, current: &T) -> Result<bool>
    where
        T: Serialize + ?Sized,
    {
        Ok(!self.changes(current)?.is_empty())
    }

    /// Walk the tracked set against `current`, handing each changed field to
    /// `emit`.
    fn compare<T, R, F>(&self, current: &T, mut emit: F) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: Default,
        F: FnMut(&mut R, &str, PriorValue, &FieldValue),
    {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| ExError::from(TrackerError::NotInitialized))?;
        let current: Map<String, FieldValue> =
            read_fields(current, &self.tracked, RecordRole::Current)?;

        let mut out = R::default();
        for name in &self.tracked {
            let Some(now) = current.get(name) else {
                continue;
            };
            match snapshot.get(name) {
                Some(then) if then == now => {}
                Some(then) => emit(&mut out, name, PriorValue::Captured(then.clone()), now),
                None => match self.policy {
                    UncapturedFieldPolicy::Report => {
                        emit(&mut out, name, PriorValue::NotCaptured, now)
                    }
                    UncapturedFieldPolicy::Ignore => {}
                },
            }
        }
        Ok(out)
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Tracked field names in ascending order
    pub fn tracked_fields(&self) -> impl Iterator<Item = &str> {
        self.tracked.iter().map(String::as_str)
    }

    /// The frozen snapshot; `None` while uninitialized
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn policy(&self) -> UncapturedFieldPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use serde_json::json;

    #[derive(Serialize)]
    struct Pair {
        x: i64,
        y: String,
    }

    #[test]
    fn test_default_tracker_is_uninitialized() {
        let tracker = ChangeTracker::default();
        assert!(!tracker.is_initialized());
        assert!(tracker.snapshot().is_none());
        let err = tracker
            .changes(&Pair {
                x: 1,
                y: "a".into(),
            })
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotInitialized);
        assert_eq!(err.op(), Some(OP_TRACKER_CHANGES));
    }

    #[test]
    fn test_not_initialized_checked_before_current_kind() {
        let err = ChangeTracker::default().changes(&7).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotInitialized);
    }

    #[test]
    fn test_duplicates_collapse() {
        let source = Pair {
            x: 1,
            y: "a".into(),
        };
        let tracker = ChangeTracker::new(&source, ["x", "x", "x"]).unwrap();
        assert_eq!(tracker.tracked_fields().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(tracker.snapshot().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_missing_tracked_field_gets_no_snapshot_entry() {
        let source = Pair {
            x: 1,
            y: "a".into(),
        };
        let tracker = ChangeTracker::new(&source, ["x", "nope"]).unwrap();
        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.get("x"), Some(&json!(1)));
        assert!(!snapshot.contains_key("nope"));
        assert_eq!(tracker.tracked_fields().count(), 2);
    }

    #[test]
    fn test_diff_carries_new_value() {
        let tracker = ChangeTracker::new(
            &Pair {
                x: 1,
                y: "a".into(),
            },
            ["x", "y"],
        )
        .unwrap();
        let diff = tracker
            .diff(&Pair {
                x: 2,
                y: "a".into(),
            })
            .unwrap();
        assert_eq!(diff.len(), 1);
        let change = &diff["x"];
        assert_eq!(change.old, PriorValue::Captured(json!(1)));
        assert_eq!(change.new, json!(2));
    }

    #[test]
    fn test_tracker_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeTracker>();
    }
}

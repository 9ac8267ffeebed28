//! Change report output types.
//!
//! Collections use `BTreeMap` so iteration and serialization are ordered by
//! field name.

use crate::record::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The snapshot-time value of a changed field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum PriorValue {
    /// The value captured at construction
    Captured(FieldValue),
    /// The field was tracked but absent from the source record, so nothing
    /// was captured for it
    NotCaptured,
}

impl PriorValue {
    /// The captured value, if one exists
    pub fn captured(&self) -> Option<&FieldValue> {
        match self {
            PriorValue::Captured(v) => Some(v),
            PriorValue::NotCaptured => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, PriorValue::Captured(_))
    }
}

/// Changed field name → prior value.
///
/// Empty when nothing changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: BTreeMap<String, PriorValue>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, field: impl Into<String>, prior: PriorValue) {
        self.changes.insert(field.into(), prior);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Prior value of a changed field; `None` if the field did not change
    pub fn get(&self, field: &str) -> Option<&PriorValue> {
        self.changes.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.changes.contains_key(field)
    }

    /// Changed field names in ascending order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriorValue)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Plain field → original value map, dropping `NotCaptured` entries.
    pub fn into_original_values(self) -> BTreeMap<String, FieldValue> {
        self.changes
            .into_iter()
            .filter_map(|(k, v)| match v {
                PriorValue::Captured(value) => Some((k, value)),
                PriorValue::NotCaptured => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = (&'a String, &'a PriorValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PriorValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Old/new values for a changed field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    /// Value at snapshot time
    pub old: PriorValue,
    /// Value on the current record
    pub new: FieldValue,
}

/// Changed field name → old/new pair.
pub type FieldDiff = BTreeMap<String, FieldChange>;

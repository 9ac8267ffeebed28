//! Record views over arbitrary values.
//!
//! A *record* is anything that serializes as a struct or a map: a
//! `#[derive(Serialize)]` struct (unit and empty structs included), a map,
//! or an explicit [`RecordFields`] mapping. References, `Box`, `Rc`, `Arc`,
//! `Some` and newtype structs serialize as their target, so indirection is
//! transparent. Scalars, sequences, `None`/`()` and enum variants of every
//! form are not records.
//!
//! Field names are the *serialized* names, so `#[serde(rename)]` and
//! `rename_all` apply. A field skipped by `skip_serializing_if` is absent
//! from the view for that instance. Map keys that are not strings are
//! rendered as their JSON text (`(0, 1)` becomes `"[0,1]"`).
//!
//! Only the requested fields are converted to [`FieldValue`]. Non-finite
//! floats are kept as tagged markers (see [`NON_FINITE_FLOAT_TAG`]) so that
//! `INFINITY`, `NEG_INFINITY` and `NaN` stay distinct from each other and
//! from `null`.

mod reader;
mod value;

pub use value::NON_FINITE_FLOAT_TAG;

use crate::errors::{ExError, Result, TrackerError};
use reader::RecordReader;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use value::{ReadError, ValueSerializer};

/// A dynamically-typed field value with deep structural equality.
pub type FieldValue = Value;

/// Which side of a comparison a record was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRole {
    /// The record a tracker is constructed from
    Source,
    /// The record a change report is computed against
    Current,
}

impl RecordRole {
    fn reject(self, kind: &str) -> TrackerError {
        match self {
            RecordRole::Source => TrackerError::InvalidSourceKind {
                kind: kind.to_string(),
            },
            RecordRole::Current => TrackerError::InvalidCurrentKind {
                kind: kind.to_string(),
            },
        }
    }

    fn map_err(self, err: ReadError) -> ExError {
        match err {
            ReadError::NotARecord(kind) => self.reject(kind).into(),
            ReadError::Field { field, message } => {
                ExError::from(TrackerError::Serialization { message }).with_field(field)
            }
            ReadError::Custom(message) => TrackerError::Serialization { message }.into(),
        }
    }
}

/// Read the fields of `record` named in `wanted`.
///
/// Fields outside `wanted` are skipped without conversion. Wanted names the
/// record does not have are absent from the result.
///
/// # Errors
///
/// - `InvalidSourceKind` / `InvalidCurrentKind` (depending on `role`) when the
///   value is not a record
/// - `Serialization` when a wanted field cannot be converted (the error
///   carries the field name), or the record's `Serialize` impl fails
pub fn read_fields<T>(
    record: &T,
    wanted: &BTreeSet<String>,
    role: RecordRole,
) -> Result<Map<String, FieldValue>>
where
    T: Serialize + ?Sized,
{
    record
        .serialize(RecordReader { wanted })
        .map_err(|e| role.map_err(e))
}

/// Convert any serializable value to a [`FieldValue`].
///
/// # Errors
///
/// `Serialization` when `value`'s `Serialize` impl fails or an integer
/// does not fit in 64 bits.
pub fn to_field_value<T>(value: &T) -> Result<FieldValue>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer).map_err(|e| {
        ExError::from(TrackerError::Serialization {
            message: e.to_string(),
        })
    })
}

/// An explicit field name → value mapping.
///
/// Lets callers track values whose types do not implement `Serialize`, or
/// present a hand-picked view of a larger structure.
///
/// ```
/// use fieldwatch_core::RecordFields;
///
/// let person = RecordFields::new()
///     .with("Name", "Alice")
///     .with("Age", 30);
/// assert_eq!(person.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordFields(BTreeMap<String, FieldValue>);

impl RecordFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, builder style
    ///
    /// `FieldValue::from` turns a non-finite float into `null`; use
    /// [`RecordFields::try_with`] to keep it.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a field from any serializable value
    ///
    /// # Errors
    ///
    /// `Serialization` when `value`'s `Serialize` impl fails.
    pub fn try_with<V>(mut self, name: impl Into<String>, value: &V) -> Result<Self>
    where
        V: Serialize + ?Sized,
    {
        let value = to_field_value(value)?;
        self.0.insert(name.into(), value);
        Ok(self)
    }

    /// Add or replace a field, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RecordFields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn wanted(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_struct_reads_wanted_fields_only() {
        let fields = read_fields(&Point { x: 1, y: 2 }, &wanted(&["x", "z"]), RecordRole::Source)
            .unwrap();
        assert_eq!(fields.get("x"), Some(&json!(1)));
        assert!(!fields.contains_key("y"));
        assert!(!fields.contains_key("z"));
    }

    #[test]
    fn test_reference_and_box_are_transparent() {
        let all = wanted(&["x", "y"]);
        let p = Point { x: 3, y: 4 };
        let by_ref = &&p;
        assert_eq!(read_fields(by_ref, &all, RecordRole::Source).unwrap().len(), 2);
        let boxed = Box::new(Point { x: 3, y: 4 });
        assert_eq!(read_fields(&boxed, &all, RecordRole::Source).unwrap().len(), 2);
    }

    #[test]
    fn test_newtype_struct_is_transparent() {
        #[derive(Serialize)]
        struct Wrapper(Point);

        let fields =
            read_fields(&Wrapper(Point { x: 5, y: 6 }), &wanted(&["y"]), RecordRole::Current)
                .unwrap();
        assert_eq!(fields.get("y"), Some(&json!(6)));
    }

    #[test]
    fn test_non_record_rejected_with_role_specific_kind() {
        let any = wanted(&["x"]);
        let err = read_fields(&42, &any, RecordRole::Source).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidSourceKind);
        assert_eq!(err.value_kind(), Some("number"));

        let err = read_fields(&vec![1, 2], &any, RecordRole::Current).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidCurrentKind);
        assert_eq!(err.value_kind(), Some("array"));

        let err = read_fields(&(1, 2), &any, RecordRole::Current).unwrap_err();
        assert_eq!(err.value_kind(), Some("array"));
    }

    #[test]
    fn test_enum_variants_are_not_records() {
        #[derive(Serialize)]
        enum Shape {
            Dot,
            Num(i32),
            Pair(i32, i32),
            Rect { w: i32, h: i32 },
        }

        let any = wanted(&["w"]);
        for shape in [Shape::Dot, Shape::Num(5), Shape::Pair(1, 2), Shape::Rect { w: 1, h: 2 }] {
            let err = read_fields(&shape, &any, RecordRole::Source).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidSourceKind);
            assert_eq!(err.value_kind(), Some("enum variant"));
        }
    }

    #[test]
    fn test_unit_and_empty_structs_are_empty_records() {
        #[derive(Serialize)]
        struct Unit;
        #[derive(Serialize)]
        struct Braced {}

        let any = wanted(&["x"]);
        assert!(read_fields(&Unit, &any, RecordRole::Source).unwrap().is_empty());
        assert!(read_fields(&Braced {}, &any, RecordRole::Source).unwrap().is_empty());
        let err = read_fields(&(), &any, RecordRole::Source).unwrap_err();
        assert_eq!(err.value_kind(), Some("null"));
    }

    #[test]
    fn test_none_is_not_a_record() {
        let any = wanted(&["x"]);
        let missing: Option<Point> = None;
        let err = read_fields(&missing, &any, RecordRole::Source).unwrap_err();
        assert_eq!(err.value_kind(), Some("null"));
        assert!(read_fields(&Some(Point { x: 0, y: 0 }), &any, RecordRole::Source).is_ok());
    }

    #[test]
    fn test_unrepresentable_field_only_fails_when_wanted() {
        #[derive(Serialize)]
        struct Ledger {
            total: u128,
            cells: HashMap<(u8, u8), u8>,
            name: String,
        }

        let ledger = Ledger {
            total: u128::MAX,
            cells: HashMap::from([((1, 2), 3)]),
            name: "main".into(),
        };
        let fields = read_fields(&ledger, &wanted(&["name"]), RecordRole::Source).unwrap();
        assert_eq!(fields.get("name"), Some(&json!("main")));

        let fields = read_fields(&ledger, &wanted(&["cells"]), RecordRole::Source).unwrap();
        assert_eq!(fields.get("cells"), Some(&json!({"[1,2]": 3})));

        let err = read_fields(&ledger, &wanted(&["total"]), RecordRole::Source).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.field(), Some("total"));
    }

    #[test]
    fn test_map_with_non_string_keys_is_a_record() {
        let map = BTreeMap::from([(1u32, "one"), (2u32, "two")]);
        let fields = read_fields(&map, &wanted(&["2"]), RecordRole::Current).unwrap();
        assert_eq!(fields.get("2"), Some(&json!("two")));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_non_finite_float_field_is_preserved() {
        #[derive(Serialize)]
        struct Reading {
            value: f64,
        }

        let fields = read_fields(
            &Reading {
                value: f64::INFINITY,
            },
            &wanted(&["value"]),
            RecordRole::Source,
        )
        .unwrap();
        assert_eq!(fields.get("value"), Some(&json!({"$f64": "inf"})));
    }

    #[test]
    fn test_record_fields_builder() {
        let mut fields = RecordFields::new().with("a", 1).with("b", "two");
        assert_eq!(fields.get("b"), Some(&json!("two")));
        assert_eq!(fields.insert("a", 5), Some(json!(1)));
        assert_eq!(fields.remove("b"), Some(json!("two")));
        assert_eq!(fields.len(), 1);

        let view = read_fields(&fields, &wanted(&["a"]), RecordRole::Current).unwrap();
        assert_eq!(view.get("a"), Some(&json!(5)));
    }

    #[test]
    fn test_record_fields_try_with_nested() {
        let fields = RecordFields::new()
            .try_with("tags", &vec!["x", "y"])
            .unwrap()
            .try_with("ratio", &f64::NAN)
            .unwrap();
        assert_eq!(fields.get("tags"), Some(&json!(["x", "y"])));
        assert_eq!(fields.get("ratio"), Some(&json!({"$f64": "NaN"})));
    }

    #[test]
    fn test_record_fields_from_iter() {
        let fields: RecordFields = [("k1", 1), ("k2", 2)].into_iter().collect();
        assert_eq!(fields.len(), 2);
        assert!(!fields.is_empty());
    }
}

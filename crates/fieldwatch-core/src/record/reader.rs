//! Top-level record reader.
//!
//! Decides whether a value is a record from its serde data-model shape and
//! converts only the fields a caller asks for. Untracked fields are skipped
//! without being converted, so a value that [`ValueSerializer`] cannot
//! represent only matters when it sits in a tracked field.

use super::value::{key_string, ReadError, ValueSerializer};
use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

type Fields = Map<String, Value>;
type Reject = Impossible<Fields, ReadError>;

pub(crate) struct RecordReader<'a> {
    pub(crate) wanted: &'a BTreeSet<String>,
}

impl<'a> RecordReader<'a> {
    fn reject<R>(kind: &'static str) -> Result<R, ReadError> {
        Err(ReadError::NotARecord(kind))
    }
}

impl<'a> ser::Serializer for RecordReader<'a> {
    type Ok = Fields;
    type Error = ReadError;

    type SerializeSeq = Reject;
    type SerializeTuple = Reject;
    type SerializeTupleStruct = Reject;
    type SerializeTupleVariant = Reject;
    type SerializeMap = FieldPicker<'a>;
    type SerializeStruct = FieldPicker<'a>;
    type SerializeStructVariant = Reject;

    fn serialize_bool(self, _v: bool) -> Result<Fields, ReadError> {
        Self::reject("bool")
    }

    fn serialize_i8(self, _v: i8) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_i16(self, _v: i16) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_i32(self, _v: i32) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_i64(self, _v: i64) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_i128(self, _v: i128) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_u8(self, _v: u8) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_u16(self, _v: u16) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_u32(self, _v: u32) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_u64(self, _v: u64) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_u128(self, _v: u128) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_f32(self, _v: f32) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_f64(self, _v: f64) -> Result<Fields, ReadError> {
        Self::reject("number")
    }

    fn serialize_char(self, _v: char) -> Result<Fields, ReadError> {
        Self::reject("string")
    }

    fn serialize_str(self, _v: &str) -> Result<Fields, ReadError> {
        Self::reject("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Fields, ReadError> {
        Self::reject("bytes")
    }

    fn serialize_none(self) -> Result<Fields, ReadError> {
        Self::reject("null")
    }

    fn serialize_some<T>(self, value: &T) -> Result<Fields, ReadError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Fields, ReadError> {
        Self::reject("null")
    }

    // `struct Empty;` is a record with no fields.
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Fields, ReadError> {
        Ok(Fields::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<Fields, ReadError> {
        Self::reject("enum variant")
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Fields, ReadError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Fields, ReadError>
    where
        T: ?Sized + Serialize,
    {
        Self::reject("enum variant")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Reject, ReadError> {
        Self::reject("array")
    }

    fn serialize_tuple(self, _len: usize) -> Result<Reject, ReadError> {
        Self::reject("array")
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Reject, ReadError> {
        Self::reject("array")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Reject, ReadError> {
        Self::reject("enum variant")
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<FieldPicker<'a>, ReadError> {
        Ok(FieldPicker::new(self.wanted))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<FieldPicker<'a>, ReadError> {
        Ok(FieldPicker::new(self.wanted))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Reject, ReadError> {
        Self::reject("enum variant")
    }
}

/// Collects the wanted fields of a struct or map.
pub(crate) struct FieldPicker<'a> {
    wanted: &'a BTreeSet<String>,
    fields: Fields,
    pending_key: Option<String>,
}

impl<'a> FieldPicker<'a> {
    fn new(wanted: &'a BTreeSet<String>) -> Self {
        Self {
            wanted,
            fields: Fields::new(),
            pending_key: None,
        }
    }

    fn pick<T>(&mut self, key: String, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        let value = value
            .serialize(ValueSerializer)
            .map_err(|e| e.in_field(&key))?;
        self.fields.insert(key, value);
        Ok(())
    }
}

impl ser::SerializeStruct for FieldPicker<'_> {
    type Ok = Fields;
    type Error = ReadError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        if self.wanted.contains(key) {
            self.pick(key.to_string(), value)?;
        }
        Ok(())
    }

    fn end(self) -> Result<Fields, ReadError> {
        Ok(self.fields)
    }
}

impl ser::SerializeMap for FieldPicker<'_> {
    type Ok = Fields;
    type Error = ReadError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        let key = key_string(key.serialize(ValueSerializer)?);
        self.pending_key = self.wanted.contains(&key).then_some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        match self.pending_key.take() {
            Some(key) => self.pick(key, value),
            None => Ok(()),
        }
    }

    fn end(self) -> Result<Fields, ReadError> {
        Ok(self.fields)
    }
}

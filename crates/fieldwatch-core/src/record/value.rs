//! Field value conversion.
//!
//! Turns any `Serialize` value into a [`FieldValue`] tree. Follows the shape
//! of `serde_json::to_value` with two differences: non-finite floats are kept
//! as tagged markers instead of collapsing to `null`, and map keys of any
//! serializable type are rendered to strings instead of being rejected.

use serde::ser::{self, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Key of the tagged object that stands in for a non-finite float.
///
/// `f64::INFINITY` becomes `{"$f64": "inf"}`, `f64::NEG_INFINITY` becomes
/// `{"$f64": "-inf"}` and any NaN becomes `{"$f64": "NaN"}`.
pub const NON_FINITE_FLOAT_TAG: &str = "$f64";

/// Failure while reading a record or converting one of its fields.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// The top-level value is not a struct or map; carries its shape
    NotARecord(&'static str),
    /// A tracked field failed to convert
    Field { field: String, message: String },
    /// Any other `Serialize` failure
    Custom(String),
}

impl ReadError {
    pub(crate) fn in_field(self, field: &str) -> Self {
        match self {
            ReadError::Custom(message) => ReadError::Field {
                field: field.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NotARecord(kind) => write!(f, "not a record: {}", kind),
            ReadError::Field { field, message } => write!(f, "field `{}`: {}", field, message),
            ReadError::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ReadError {}

impl ser::Error for ReadError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ReadError::Custom(msg.to_string())
    }
}

fn float_value(f: f64) -> Value {
    match Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None => {
            let label = if f.is_nan() {
                "NaN"
            } else if f.is_sign_positive() {
                "inf"
            } else {
                "-inf"
            };
            let mut tagged = Map::new();
            tagged.insert(NON_FINITE_FLOAT_TAG.to_string(), Value::from(label));
            Value::Object(tagged)
        }
    }
}

/// Render a converted map key as a field name.
pub(crate) fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn wrap_variant(variant: &'static str, inner: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert(variant.to_string(), inner);
    Value::Object(wrapped)
}

/// Serializer producing a [`FieldValue`](crate::record::FieldValue).
pub(crate) struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ReadError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = MapBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value, ReadError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ReadError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ReadError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ReadError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, ReadError> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, ReadError> {
        i64::try_from(v)
            .map(Value::from)
            .map_err(|_| ReadError::Custom(format!("integer {} is out of range", v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ReadError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ReadError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ReadError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, ReadError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, ReadError> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| ReadError::Custom(format!("integer {} is out of range", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ReadError> {
        Ok(float_value(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ReadError> {
        Ok(float_value(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ReadError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ReadError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ReadError> {
        Ok(Value::Array(v.iter().map(|b| Value::from(*b)).collect()))
    }

    fn serialize_none(self) -> Result<Value, ReadError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, ReadError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ReadError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ReadError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, ReadError> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value, ReadError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ReadError>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, ReadError> {
        Ok(SeqBuilder::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, ReadError> {
        Ok(SeqBuilder::new(len, None))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, ReadError> {
        Ok(SeqBuilder::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, ReadError> {
        Ok(SeqBuilder::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder, ReadError> {
        Ok(MapBuilder::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapBuilder, ReadError> {
        Ok(MapBuilder::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapBuilder, ReadError> {
        Ok(MapBuilder::new(Some(variant)))
    }
}

pub(crate) struct SeqBuilder {
    items: Vec<Value>,
    variant: Option<&'static str>,
}

impl SeqBuilder {
    fn new(len: usize, variant: Option<&'static str>) -> Self {
        Self {
            items: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> Result<Value, ReadError> {
        let array = Value::Array(self.items);
        Ok(match self.variant {
            Some(variant) => wrap_variant(variant, array),
            None => array,
        })
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

pub(crate) struct MapBuilder {
    map: Map<String, Value>,
    pending_key: Option<String>,
    variant: Option<&'static str>,
}

impl MapBuilder {
    fn new(variant: Option<&'static str>) -> Self {
        Self {
            map: Map::new(),
            pending_key: None,
            variant,
        }
    }

    fn insert<T>(&mut self, key: String, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(ValueSerializer)?;
        self.map.insert(key, value);
        Ok(())
    }

    fn finish(self) -> Result<Value, ReadError> {
        let object = Value::Object(self.map);
        Ok(match self.variant {
            Some(variant) => wrap_variant(variant, object),
            None => object,
        })
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key_string(key.serialize(ValueSerializer)?));
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ReadError::Custom("map value serialized before its key".into()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for MapBuilder {
    type Ok = Value;
    type Error = ReadError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ReadError>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value, ReadError> {
        self.finish()
    }
}

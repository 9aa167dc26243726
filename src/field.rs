use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Closed set of value kinds a [`TypedField`] can carry.
///
/// The kind decides which storage slot of the field is authoritative:
/// every integer-like kind (including `Bool` and `Duration`) reads the
/// integer slot, `String` reads the string slot and `Interface` reads the
/// interface slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Bool,
    UInt16,
    UInt32,
    UInt64,
    Int,
    Int16,
    Int32,
    Int64,
    Duration,
    Interface,
}

/// Value that can be rendered by a backend at emission time.
///
/// This is the slow path behind [`TypedField::interface`]: rendering goes
/// through generic serde reflection instead of a typed slot.
pub trait Reflect: fmt::Debug + Send + Sync {
    fn reflect(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl<T> Reflect for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn reflect(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A single strongly-typed key/value attached to a log record.
///
/// Fields are plain values: built right before an emission call,
/// translated by the adapter and then dropped. Keys are not validated;
/// an empty key is forwarded as-is and duplicates are resolved when the
/// record is emitted.
#[derive(Debug, Clone)]
pub struct TypedField {
    pub key: Cow<'static, str>,
    pub kind: FieldKind,
    pub integer: i64,
    pub string: Cow<'static, str>,
    pub interface: Option<Arc<dyn Reflect>>,
}

impl TypedField {
    fn integer(key: impl Into<Cow<'static, str>>, kind: FieldKind, integer: i64) -> Self {
        Self {
            key: key.into(),
            kind,
            integer,
            string: Cow::Borrowed(""),
            interface: None,
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::String,
            integer: 0,
            string: value.into(),
            interface: None,
        }
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::integer(key, FieldKind::Bool, i64::from(value))
    }

    pub fn uint16(key: impl Into<Cow<'static, str>>, value: u16) -> Self {
        Self::integer(key, FieldKind::UInt16, i64::from(value))
    }

    pub fn uint32(key: impl Into<Cow<'static, str>>, value: u32) -> Self {
        Self::integer(key, FieldKind::UInt32, i64::from(value))
    }

    /// Stored bit-for-bit in the signed slot; backends cast it back.
    pub fn uint64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::integer(key, FieldKind::UInt64, value as i64)
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: isize) -> Self {
        Self::integer(key, FieldKind::Int, value as i64)
    }

    pub fn int16(key: impl Into<Cow<'static, str>>, value: i16) -> Self {
        Self::integer(key, FieldKind::Int16, i64::from(value))
    }

    pub fn int32(key: impl Into<Cow<'static, str>>, value: i32) -> Self {
        Self::integer(key, FieldKind::Int32, i64::from(value))
    }

    pub fn int64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::integer(key, FieldKind::Int64, value)
    }

    /// Floats are pre-formatted with six fixed decimals and carried as a
    /// `String` field, so no backend applies its own float encoding.
    pub fn float32(key: impl Into<Cow<'static, str>>, value: f32) -> Self {
        Self::string(key, format!("{:.6}", value))
    }

    pub fn float64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::string(key, format!("{:.6}", value))
    }

    /// Always whole milliseconds. Sub-millisecond resolution is truncated,
    /// never rounded.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        let millis = i64::try_from(value.as_millis()).unwrap_or(i64::MAX);
        Self::integer(key, FieldKind::Duration, millis)
    }

    /// Escape hatch for values with no typed constructor. The backend
    /// renders them through serde reflection, which is noticeably slower
    /// than every other kind.
    pub fn interface<T>(key: impl Into<Cow<'static, str>>, value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            kind: FieldKind::Interface,
            integer: 0,
            string: Cow::Borrowed(""),
            interface: Some(Arc::new(value)),
        }
    }
}

/// Field constructors exposed on every facade value.
///
/// Typed fields are much cheaper than [`TypedLogger::interface`], so they
/// should be the preferred way to attach data to a record.
pub trait TypedLogger {
    fn string(&self, key: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> TypedField
    where
        Self: Sized,
    {
        TypedField::string(key, value)
    }

    fn bool(&self, key: impl Into<Cow<'static, str>>, value: bool) -> TypedField
    where
        Self: Sized,
    {
        TypedField::bool(key, value)
    }

    fn uint16(&self, key: impl Into<Cow<'static, str>>, value: u16) -> TypedField
    where
        Self: Sized,
    {
        TypedField::uint16(key, value)
    }

    fn uint32(&self, key: impl Into<Cow<'static, str>>, value: u32) -> TypedField
    where
        Self: Sized,
    {
        TypedField::uint32(key, value)
    }

    fn uint64(&self, key: impl Into<Cow<'static, str>>, value: u64) -> TypedField
    where
        Self: Sized,
    {
        TypedField::uint64(key, value)
    }

    fn float32(&self, key: impl Into<Cow<'static, str>>, value: f32) -> TypedField
    where
        Self: Sized,
    {
        TypedField::float32(key, value)
    }

    fn float64(&self, key: impl Into<Cow<'static, str>>, value: f64) -> TypedField
    where
        Self: Sized,
    {
        TypedField::float64(key, value)
    }

    fn int(&self, key: impl Into<Cow<'static, str>>, value: isize) -> TypedField
    where
        Self: Sized,
    {
        TypedField::int(key, value)
    }

    fn int16(&self, key: impl Into<Cow<'static, str>>, value: i16) -> TypedField
    where
        Self: Sized,
    {
        TypedField::int16(key, value)
    }

    fn int32(&self, key: impl Into<Cow<'static, str>>, value: i32) -> TypedField
    where
        Self: Sized,
    {
        TypedField::int32(key, value)
    }

    fn int64(&self, key: impl Into<Cow<'static, str>>, value: i64) -> TypedField
    where
        Self: Sized,
    {
        TypedField::int64(key, value)
    }

    fn duration(&self, key: impl Into<Cow<'static, str>>, value: Duration) -> TypedField
    where
        Self: Sized,
    {
        TypedField::duration(key, value)
    }

    fn interface<T>(&self, key: impl Into<Cow<'static, str>>, value: T) -> TypedField
    where
        Self: Sized,
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        TypedField::interface(key, value)
    }
}

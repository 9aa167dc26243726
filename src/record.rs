use crate::backend::NativeLevel;
use crate::caller::Caller;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One encoded-ready record as the native engine sees it.
///
/// Fields are kept as an ordered list rather than a map: the adapter has
/// already removed duplicate keys and the output must follow argument
/// order.
///
/// User fields are written after `level`, `ts`, `caller` and `msg` without
/// renaming, so a field using one of those keys shows up as a second JSON
/// key of the same name. Most JSON parsers keep the last one.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: String,
    pub level: NativeLevel,
    pub caller: Option<Caller>,
    pub message: &'a str,
    pub fields: Vec<(&'a str, serde_json::Value)>,
}

/// Ordered key/value pairs serialized as one map, keeping duplicates.
struct OrderedFields<'r, 'a>(&'r [(&'a str, serde_json::Value)]);

impl Serialize for OrderedFields<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Render ordered key/value pairs as one JSON object.
pub fn fields_json(fields: &[(&str, serde_json::Value)]) -> String {
    // String keys and `Value`s always serialize.
    serde_json::to_string(&OrderedFields(fields)).unwrap_or_else(|_| String::from("{}"))
}

impl LogRecord<'_> {
    /// Fields rendered as a JSON object, in order.
    pub fn fields_json(&self) -> String {
        fields_json(&self.fields)
    }
}

impl Serialize for LogRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", self.level.as_str())?;
        map.serialize_entry("ts", &self.timestamp)?;
        if let Some(caller) = &self.caller {
            map.serialize_entry("caller", &caller.to_string())?;
        }
        map.serialize_entry("msg", self.message)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

//! Per-field text converters for the delimited-file store
//!
//! Without a codec a field is written with the generic string form of its
//! value and read back as a string. Register a [`FieldCodec`] to preserve
//! numeric or boolean types across a write/read cycle.

use datapoint_core::{DatapointError, DatapointResult, Value};
use std::fmt;
use std::sync::Arc;

type ToText = dyn Fn(&Value) -> String + Send + Sync;
type FromText = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// Converts a field's values to and from text cells
#[derive(Clone)]
pub struct FieldCodec {
    name: &'static str,
    to_text: Arc<ToText>,
    from_text: Arc<FromText>,
}

impl FieldCodec {
    /// Build a codec from a pair of conversion functions
    pub fn new<T, F>(to_text: T, from_text: F) -> Self
    where
        T: Fn(&Value) -> String + Send + Sync + 'static,
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            to_text: Arc::new(to_text),
            from_text: Arc::new(from_text),
        }
    }

    /// Strings in, strings out
    pub fn string() -> Self {
        Self::builtin("string", |s| Ok(Value::String(s.to_string())))
    }

    /// 64-bit signed integers
    pub fn integer() -> Self {
        Self::builtin("integer", |s| {
            s.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string())
        })
    }

    /// 64-bit floats; the shortest round-trip representation is written
    pub fn float() -> Self {
        Self::builtin("float", |s| {
            s.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| e.to_string())
        })
    }

    /// Booleans; accepts `true`/`false` in any case and `1`/`0`
    pub fn boolean() -> Self {
        Self::builtin("boolean", |s| match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            other => Err(format!("'{other}' is not a boolean")),
        })
    }

    fn builtin(
        name: &'static str,
        from_text: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            to_text: Arc::new(|v: &Value| v.to_string()),
            from_text: Arc::new(from_text),
        }
    }

    /// Render a value as a cell
    pub fn encode(&self, value: &Value) -> String {
        (self.to_text)(value)
    }

    /// Parse a non-empty cell for `field`
    pub fn decode(&self, field: &str, text: &str) -> DatapointResult<Value> {
        (self.from_text)(text).map_err(|message| DatapointError::conversion(field, message))
    }
}

impl fmt::Debug for FieldCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCodec").field("name", &self.name).finish()
    }
}

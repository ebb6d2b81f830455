//! Before/after payloads attached to drift events.
//!
//! The engine sends `before`/`after` as arbitrary JSON. [`DiffValue`] closes
//! that over three cases so display code can branch exhaustively and render
//! structured values through one stable serialization.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One side of a diff.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DiffValue {
    /// Missing or `null`.
    #[default]
    Absent,
    /// Plain text (script source, header value, ...).
    Text(String),
    /// Any other JSON value.
    Structured(Value),
}

impl DiffValue {
    /// Whether this side carries content worth showing.
    ///
    /// Empty text counts as absent. Structured values are always present,
    /// including `false`, `0`, `[]` and `{}`.
    pub fn is_present(&self) -> bool {
        match self {
            DiffValue::Absent => false,
            DiffValue::Text(s) => !s.is_empty(),
            DiffValue::Structured(_) => true,
        }
    }

    /// Display text: raw for strings, two-space pretty JSON otherwise.
    pub fn display_text(&self) -> String {
        match self {
            DiffValue::Absent => String::new(),
            DiffValue::Text(s) => s.clone(),
            DiffValue::Structured(v) => {
                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
            }
        }
    }

    /// Display text split into lines, with empty lines dropped.
    pub fn display_lines(&self) -> Vec<String> {
        self.display_text()
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl From<Value> for DiffValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DiffValue::Absent,
            Value::String(s) => DiffValue::Text(s),
            other => DiffValue::Structured(other),
        }
    }
}

impl From<&str> for DiffValue {
    fn from(s: &str) -> Self {
        DiffValue::Text(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for DiffValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(DiffValue::from)
    }
}

impl Serialize for DiffValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DiffValue::Absent => serializer.serialize_none(),
            DiffValue::Text(s) => serializer.serialize_str(s),
            DiffValue::Structured(v) => v.serialize(serializer),
        }
    }
}

/// The `diff` object on a [`TimelineEvent`](crate::TimelineEvent).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDiff {
    #[serde(default)]
    pub before: DiffValue,
    #[serde(default)]
    pub after: DiffValue,
}

impl EventDiff {
    pub fn new(before: impl Into<DiffValue>, after: impl Into<DiffValue>) -> Self {
        Self { before: before.into(), after: after.into() }
    }
}

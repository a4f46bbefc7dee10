//! Runtime values, produced by evaluating templates and received from the
//! service under test and from the datastore.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Number;

pub type Map = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// A datastore identifier. Normalizes to its string form.
    Id(String),
    Array(Vec<Value>),
    /// An array the comparator must match index by index.
    Ordered(Vec<Value>),
    Object(Map),
    /// A type assertion, only meaningful as an expected value.
    Type(Kind),
}

/// The runtime types a type assertion can check for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Date,
    RegExp,
    ObjectId,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::String,
        Kind::Number,
        Kind::Boolean,
        Kind::Object,
        Kind::Array,
        Kind::Date,
        Kind::RegExp,
        Kind::ObjectId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "String",
            Kind::Number => "Number",
            Kind::Boolean => "Boolean",
            Kind::Object => "Object",
            Kind::Array => "Array",
            Kind::Date => "Date",
            Kind::RegExp => "RegExp",
            Kind::ObjectId => "ObjectId",
        }
    }

    /// Check the (already normalized) value is an instance of this type.
    /// Dates, regular expressions and identifiers travel through JSON as
    /// strings, so those are recognized by their textual shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Kind::String, Value::String(_)) => true,
            (Kind::Number, Value::Number(_)) => true,
            (Kind::Boolean, Value::Bool(_)) => true,
            // arrays are objects too, as far as JSON documents go
            (Kind::Object, Value::Object(_) | Value::Array(_) | Value::Ordered(_)) => true,
            (Kind::Array, Value::Array(_) | Value::Ordered(_)) => true,
            (Kind::Date, Value::String(text)) => {
                let re = regex!(
                    r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$"
                );
                re.is_match(text)
            }
            (Kind::RegExp, Value::String(text)) => {
                let re = regex!(r"^/.+/[dgimsuy]*$");
                re.is_match(text)
            }
            (Kind::ObjectId, Value::Id(_)) => true,
            (Kind::ObjectId, Value::String(text)) => {
                let re = regex!(r"^[0-9a-fA-F]{24}$");
                re.is_match(text)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Value {
    /// Convert a float into a Number value, preferring the integral form so
    /// that `3` and `6 / 2` compare equal.
    pub fn from_f64(float: f64) -> Option<Value> {
        if float.fract() == 0.0 && float.abs() < 9007199254740992.0 {
            Some(Value::Number(Number::from(float as i64)))
        } else {
            Number::from_f64(float).map(Value::Number)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    /// The value an identifier assigned by the datastore takes in the
    /// context: strings are tagged as Ids, anything else is kept as is.
    pub fn from_id(id: serde_json::Value) -> Value {
        match id {
            serde_json::Value::String(text) => Value::Id(text),
            other => Value::from(other),
        }
    }

    /// The normalization hook applied before comparing.
    pub fn normalize(&self) -> Cow<'_, Value> {
        match self {
            Value::Id(id) => Cow::Owned(Value::String(id.clone())),
            _ => Cow::Borrowed(self),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Id(_) => "id",
            Value::Array(_) | Value::Ordered(_) => "array",
            Value::Object(_) => "object",
            Value::Type(_) => "type",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(number) => number
                .as_f64()
                .map_or(false, |f| f != 0.0 && !f.is_nan()),
            Value::String(text) => !text.is_empty(),
            _ => true,
        }
    }

    /// Text used when a value is concatenated onto a string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(number) => number.to_string(),
            Value::String(text) | Value::Id(text) => text.clone(),
            Value::Type(kind) => kind
                .name()
                .to_string(),
            other => other
                .to_json()
                .to_string(),
        }
    }

    /// Serialize for the wire. Type assertions have no JSON form and are
    /// sent as their names.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(number) => serde_json::Value::Number(number.clone()),
            Value::String(text) | Value::Id(text) => serde_json::Value::String(text.clone()),
            Value::Array(items) | Value::Ordered(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect(),
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Type(kind) => serde_json::Value::String(
                kind.name()
                    .to_string(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(number) => Value::Number(number),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from)
                    .collect(),
            ),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(Number::from(number))
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(Number::from(number))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

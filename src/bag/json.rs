//! JSON → event bag conversion for pushes recorded outside the host

use super::{EventBag, EventValue};
use serde_json::{Map, Value};

/// Build a bag from a JSON object, keeping document order.
///
/// Integral numbers become integers, other numbers floats; arrays become
/// lists and nested objects nested maps.
pub fn from_json(object: &Map<String, Value>) -> EventBag {
    object
        .iter()
        .map(|(k, v)| (k.clone(), EventValue::from(v)))
        .collect()
}

impl From<&Value> for EventValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(from_json(map)),
        }
    }
}

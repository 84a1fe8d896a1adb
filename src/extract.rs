//! Typed extraction from event bags
//!
//! Every lookup answers "value or absence" and never fails: a missing key,
//! a null value and a value that cannot be coerced all read as absent.
//! Callers decide what absence means.

use crate::bag::{EventBag, EventValue, Handle};
use crate::models::{item, LineItem};
use chrono::{DateTime, TimeZone, Utc};

/// Coercion from a loosely-typed value. `None` means "cannot be read as `Self`".
pub trait FromEventValue: Sized {
    fn from_event_value(value: &EventValue) -> Option<Self>;
}

impl FromEventValue for String {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Null => None,
            EventValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl FromEventValue for i64 {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Int(n) => Some(*n),
            // `as` saturates at the bounds of i64
            EventValue::Float(x) if x.is_finite() => Some(x.trunc() as i64),
            EventValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromEventValue for i32 {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        i64::from_event_value(value).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromEventValue for u32 {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        i64::from_event_value(value).and_then(|n| u32::try_from(n).ok())
    }
}

impl FromEventValue for f64 {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Float(x) => Some(*x),
            EventValue::Int(n) => Some(*n as f64),
            EventValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromEventValue for f32 {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        f64::from_event_value(value).map(|x| x as f32)
    }
}

impl FromEventValue for bool {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Bool(b) => Some(*b),
            EventValue::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            EventValue::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

/// Dates arrive as date values, epoch milliseconds, or RFC 3339 text.
impl FromEventValue for DateTime<Utc> {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Date(d) => Some(*d),
            EventValue::Int(millis) => Utc.timestamp_millis_opt(*millis).single(),
            EventValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl FromEventValue for Handle {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Handle(h) => Some(h.clone()),
            _ => None,
        }
    }
}

impl FromEventValue for EventBag {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::Map(bag) => Some(bag.clone()),
            _ => None,
        }
    }
}

/// A line item is either a handle wrapping a `LineItem` or a nested map
/// with all six fields. Any other shape, or an item with a negative
/// price, is absent.
impl FromEventValue for LineItem {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        let line_item = match value {
            EventValue::Handle(h) => h.downcast_ref::<LineItem>().cloned()?,
            EventValue::Map(fields) => LineItem {
                id: get(fields, item::ID)?,
                name: get(fields, item::NAME)?,
                category: get(fields, item::CATEGORY)?,
                currency_code: get(fields, item::CURRENCY_CODE)?,
                price: get(fields, item::PRICE)?,
                quantity: get(fields, item::QUANTITY)?,
            },
            _ => return None,
        };
        line_item.is_well_formed().then_some(line_item)
    }
}

/// All-or-nothing: one element that cannot be coerced makes the whole
/// list absent.
impl<T: FromEventValue> FromEventValue for Vec<T> {
    fn from_event_value(value: &EventValue) -> Option<Self> {
        match value {
            EventValue::List(items) => items.iter().map(T::from_event_value).collect(),
            _ => None,
        }
    }
}

/// Look up `key` and coerce it. Null reads as absent.
pub fn get<T: FromEventValue>(bag: &EventBag, key: &str) -> Option<T> {
    match bag.get(key)? {
        EventValue::Null => None,
        value => T::from_event_value(value),
    }
}

/// Look up `key`, falling back to `default` when absent or not coercible.
pub fn get_or<T: FromEventValue>(bag: &EventBag, key: &str, default: T) -> T {
    get(bag, key).unwrap_or(default)
}

pub fn get_string(bag: &EventBag, key: &str) -> Option<String> {
    get(bag, key)
}

pub fn get_long(bag: &EventBag, key: &str, default: i64) -> i64 {
    get_or(bag, key, default)
}

pub fn get_int(bag: &EventBag, key: &str, default: i32) -> i32 {
    get_or(bag, key, default)
}

pub fn get_double(bag: &EventBag, key: &str, default: f64) -> f64 {
    get_or(bag, key, default)
}

pub fn get_bool(bag: &EventBag, key: &str, default: bool) -> bool {
    get_or(bag, key, default)
}

pub fn get_date(bag: &EventBag, key: &str) -> Option<DateTime<Utc>> {
    get(bag, key)
}

pub fn get_list<T: FromEventValue>(bag: &EventBag, key: &str) -> Option<Vec<T>> {
    get(bag, key)
}

/// Extract a required value, recording `key` in `missing` when absent.
///
/// Lets a handler check every required parameter before bailing out, so
/// one diagnostic names all of them.
pub fn required<'k, T: FromEventValue>(
    bag: &EventBag,
    key: &'k str,
    missing: &mut Vec<&'k str>,
) -> Option<T> {
    let value = get(bag, key);
    if value.is_none() {
        missing.push(key);
    }
    value
}

/// Presence check over a set of required keys: `Err` lists the keys that
/// are absent or null.
pub fn require_present<'k>(bag: &EventBag, keys: &[&'k str]) -> Result<(), Vec<&'k str>> {
    let missing: Vec<&'k str> = keys
        .iter()
        .copied()
        .filter(|key| bag.get(key).map_or(true, EventValue::is_null))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

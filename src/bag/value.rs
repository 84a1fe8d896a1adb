//! Values carried by an event bag

use super::EventBag;
use chrono::{DateTime, SecondsFormat, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque, externally-owned platform object (intent, activity, or a
/// typed model object such as a line item).
///
/// The bag never inspects the payload; consumers downcast it.
#[derive(Clone)]
pub struct Handle {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Handle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Attempt to downcast the payload to a specific type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Fully qualified name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.type_name)
    }
}

/// Two handles are equal when they point at the same object.
impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A loosely-typed parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventValue {
    #[default]
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<EventValue>),
    Map(EventBag),
    Handle(Handle),
}

impl EventValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Handle(_) => "handle",
        }
    }
}

/// The natural textual form of a value. String coercion goes through this.
impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Map(bag) => {
                write!(f, "{{")?;
                for (i, (key, value)) in bag.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Self::Handle(h) => write!(f, "<{}>", h.type_name()),
        }
    }
}

impl From<&str> for EventValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for EventValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for EventValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for EventValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for EventValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for EventValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<f32> for EventValue {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<bool> for EventValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for EventValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<EventBag> for EventValue {
    fn from(bag: EventBag) -> Self {
        Self::Map(bag)
    }
}

impl From<Handle> for EventValue {
    fn from(h: Handle) -> Self {
        Self::Handle(h)
    }
}

impl<T: Into<EventValue>> From<Vec<T>> for EventValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<EventValue>> From<Option<T>> for EventValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

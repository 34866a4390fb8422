//! # Route Params
//!
//! Params are mostly plain data, but hosts are allowed to pass opaque values
//! (callbacks, native handles) through them. Opaque values cannot be
//! persisted, so the router warns about them without rejecting the route.
//!
//! ```text
//! ParamValue
//! ├── Null | Bool | Integer | Number | String   // primitives
//! ├── List(Vec<ParamValue>)           // sequences
//! ├── Record(BTreeMap<..>)            // records
//! └── Opaque(Rc<dyn Any>)             // host value, not serializable
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

#[derive(Clone)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    List(Vec<ParamValue>),
    Record(BTreeMap<String, ParamValue>),
    Opaque(Rc<dyn Any>),
}

impl ParamValue {
    /// Wraps a host value that should travel with the route but can't be serialized.
    pub fn opaque<T: Any>(value: T) -> Self {
        ParamValue::Opaque(Rc::new(value))
    }

    /// True if this value and everything nested in it is plain data.
    pub fn is_serializable(&self) -> bool {
        match self {
            ParamValue::Opaque(_) => false,
            ParamValue::List(items) => items.iter().all(ParamValue::is_serializable),
            ParamValue::Record(fields) => fields.values().all(ParamValue::is_serializable),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(n) => Some(*n as f64),
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

// Deep equality. Opaque values compare by identity, NaN equals NaN, and an
// integer equals a float only when the float holds exactly that integer.
impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Null, ParamValue::Null) => true,
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a == b,
            (ParamValue::Integer(a), ParamValue::Integer(b)) => a == b,
            (ParamValue::Number(a), ParamValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (ParamValue::Integer(i), ParamValue::Number(n))
            | (ParamValue::Number(n), ParamValue::Integer(i)) => {
                n.fract() == 0.0 && *n as i128 == *i as i128
            }
            (ParamValue::String(a), ParamValue::String(b)) => a == b,
            (ParamValue::List(a), ParamValue::List(b)) => a == b,
            (ParamValue::Record(a), ParamValue::Record(b)) => a == b,
            (ParamValue::Opaque(a), ParamValue::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Integer(n) => write!(f, "{n}"),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::String(s) => write!(f, "{s:?}"),
            ParamValue::List(items) => f.debug_list().entries(items).finish(),
            ParamValue::Record(fields) => f.debug_map().entries(fields).finish(),
            ParamValue::Opaque(_) => write!(f, "<opaque>"),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Null | ParamValue::Opaque(_) => serializer.serialize_none(),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Integer(n) => serializer.serialize_i64(*n),
            ParamValue::Number(n) => serializer.serialize_f64(*n),
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ParamValue::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParamValue::Null,
            serde_json::Value::Bool(b) => ParamValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Integer(i),
                None => ParamValue::Number(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => ParamValue::String(s),
            serde_json::Value::Array(items) => {
                ParamValue::List(items.into_iter().map(ParamValue::from).collect())
            }
            serde_json::Value::Object(fields) => ParamValue::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, ParamValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// The params of one route, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Returns a copy with `other`'s entries laid over this one's.
    pub fn merged_with(&self, other: &Params) -> Params {
        let mut merged = self.0.clone();
        for (k, v) in &other.0 {
            merged.insert(k.clone(), v.clone());
        }
        Params(merged)
    }

    /// Keys whose values (recursively) hold opaque host values.
    pub fn non_serializable_keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_serializable())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Params {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Params(
            map.into_iter()
                .map(|(k, v)| (k, ParamValue::from(v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

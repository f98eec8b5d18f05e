//! Dynamic value graphs.
//!
//! [`Value`] models data whose containers may be shared and may form cycles:
//! arrays and objects live behind `Rc<RefCell<..>>`, so two slots can point
//! at the same container and a container can (transitively) contain itself.
//! Cloning a `Value` with `Clone` copies the handle, not the graph; use
//! [`Cloner`](super::Cloner) for deep copies.

use std::{
    any::Any,
    cell::RefCell,
    collections::{BTreeMap, HashSet},
    fmt,
    rc::Rc,
};

use chrono::{DateTime, Utc};
use regex::Regex;

use super::Cloneable;

/// Shared, mutable array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable object storage.
pub type ObjectRef = Rc<RefCell<BTreeMap<String, Value>>>;

/// A node of a dynamic value graph.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(DateTime<Utc>),
    Regex(Regex),
    Array(ArrayRef),
    Object(ObjectRef),
    /// A type with its own deep-copy logic.
    Custom(Rc<dyn Cloneable>),
    /// Anything else. Carried along but never cloned.
    Opaque(OpaqueValue),
}

/// A foreign value the cloner cannot copy.
#[derive(Clone)]
pub struct OpaqueValue {
    inner: Rc<dyn Any>,
    type_name: &'static str,
}

impl OpaqueValue {
    /// Name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The wrapped value, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    fn identity(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

impl Value {
    /// A new array holding `items`.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// A new object holding `entries`.
    pub fn object<S: Into<String>>(entries: impl IntoIterator<Item = (S, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Wraps a custom cloneable type.
    pub fn custom(value: impl Cloneable + 'static) -> Self {
        Value::Custom(Rc::new(value))
    }

    /// Wraps a value the cloner must reject.
    pub fn opaque<T: Any>(value: T) -> Self {
        Value::Opaque(OpaqueValue {
            inner: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Human-readable name of the variant, or of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::Regex(_) => "regex",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Custom(custom) => custom.type_name(),
            Value::Opaque(opaque) => opaque.type_name(),
        }
    }

    /// Address of the shared container, for values that have one.
    ///
    /// Two values with the same identity are the same container.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Object(fields) => Some(Rc::as_ptr(fields) as *const () as usize),
            Value::Custom(custom) => Some(Rc::as_ptr(custom) as *const () as usize),
            Value::Opaque(opaque) => Some(opaque.identity()),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same shared container.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The array storage, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The object storage, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The element at `index` of an array.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        self.as_array()?.borrow().get(index).cloned()
    }

    /// The field `key` of an object.
    pub fn get_field(&self, key: &str) -> Option<Value> {
        self.as_object()?.borrow().get(key).cloned()
    }

    /// Appends to an array. Returns `false` for non-arrays.
    pub fn push(&self, value: Value) -> bool {
        match self {
            Value::Array(items) => {
                items.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Sets a field of an object. Returns `false` for non-objects.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Object(fields) => {
                fields.borrow_mut().insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Structural equality that terminates on cycles.
    ///
    /// Custom values compare through [`Cloneable::view`] when both expose
    /// one, by identity otherwise.
    pub fn deep_eq(&self, other: &Value) -> bool {
        deep_eq(self, other, &mut HashSet::new())
    }
}

fn deep_eq(a: &Value, b: &Value, assumed: &mut HashSet<(usize, usize)>) -> bool {
    if let (Some(ia), Some(ib)) = (a.identity(), b.identity()) {
        if ia == ib || !assumed.insert((ia, ib)) {
            return true;
        }
    }

    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Regex(x), Value::Regex(y)) => x.as_str() == y.as_str(),
        (Value::Array(x), Value::Array(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| deep_eq(l, r, assumed))
        }
        (Value::Object(x), Value::Object(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((lk, lv), (rk, rv))| {
                    lk == rk && deep_eq(lv, rv, assumed)
                })
        }
        (Value::Custom(x), Value::Custom(y)) => {
            x.type_name() == y.type_name()
                && match (x.view(), y.view()) {
                    (Some(l), Some(r)) => deep_eq(&l, &r, assumed),
                    _ => false,
                }
        }
        _ => false,
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, &mut Vec::new())
    }
}

fn write_value(value: &Value, f: &mut fmt::Formatter<'_>, open: &mut Vec<usize>) -> fmt::Result {
    if let Some(id) = value.identity() {
        if open.contains(&id) {
            return f.write_str("<cycle>");
        }
    }

    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{x:?}"),
        Value::Text(s) => write!(f, "{s:?}"),
        Value::Date(d) => write!(f, "Date({})", d.to_rfc3339()),
        Value::Regex(re) => write!(f, "/{}/", re.as_str()),
        Value::Array(items) => {
            open.push(Rc::as_ptr(items) as *const () as usize);
            f.write_str("[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(item, f, open)?;
            }
            open.pop();
            f.write_str("]")
        }
        Value::Object(fields) => {
            open.push(Rc::as_ptr(fields) as *const () as usize);
            f.write_str("{")?;
            for (i, (key, item)) in fields.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                write_value(item, f, open)?;
            }
            open.pop();
            f.write_str("}")
        }
        Value::Custom(custom) => write!(f, "{}(..)", custom.type_name()),
        Value::Opaque(opaque) => fmt::Debug::fmt(opaque, f),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Regex> for Value {
    fn from(re: Regex) -> Self {
        Value::Regex(re)
    }
}

/// Builds a fresh, acyclic graph from JSON.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

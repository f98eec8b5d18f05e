//! Deep copies of value graphs that keep shared references and cycles.
//!
//! [`Cloner`] walks a [`Value`] graph and copies every container exactly
//! once. A container reached twice in the original is reached twice in the
//! copy through the same new container, and a cycle in the original becomes
//! the same cycle among the copies, never a link back into the original.
//!
//! ```
//! use gumpkit::cloner::{Value, clone_value};
//!
//! let v = Value::array([Value::Int(1)]);
//! v.push(v.clone());
//!
//! let copy = clone_value(&v).unwrap();
//! assert!(!copy.ptr_eq(&v));
//! assert!(copy.get_index(1).unwrap().ptr_eq(&copy));
//! ```
//!
//! Graphs with cycles are built from `Rc`s and keep themselves alive; break
//! the cycle (e.g. by clearing an array) to free them.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use tracing::{debug, trace};

use crate::Result;

pub mod errors;
pub mod value;

pub use errors::ClonerError;
pub use value::{ArrayRef, ObjectRef, OpaqueValue, Value};

/// A type that knows how to deep-copy itself.
///
/// Implementations should route nested values through the given cloner so
/// sharing and cycles stay intact across the boundary. A type that can be
/// part of a cycle registers its copy with [`Cloner::register`] before
/// cloning its children.
pub trait Cloneable {
    /// Returns a deep copy of `original`, whose payload is `self`.
    fn clone_with(&self, original: &Value, cloner: &mut Cloner) -> Result<Value>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// A structural view used by [`Value::deep_eq`].
    fn view(&self) -> Option<Value> {
        None
    }
}

/// Cycle-aware deep copier.
///
/// The identity-to-copy context lives for one outermost
/// [`clone_value`](Cloner::clone_value) call and is cleared when it returns.
/// It holds each original next to its copy, so an identity cannot be freed
/// and handed to another value while the context is live.
#[derive(Debug, Default)]
pub struct Cloner {
    recursion_level: usize,
    context: HashMap<usize, (Value, Value)>,
}

impl Cloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth; 0 outside of a clone.
    pub fn depth(&self) -> usize {
        self.recursion_level
    }

    /// Deep-copies `value`.
    ///
    /// # Errors
    ///
    /// [`ClonerError::Unsupported`] if the graph contains an opaque value,
    /// or whatever a [`Cloneable`] implementation returns.
    pub fn clone_value(&mut self, value: &Value) -> Result<Value> {
        self.recursion_level += 1;
        let result = self.clone_inner(value);
        self.recursion_level -= 1;

        if self.recursion_level == 0 {
            self.context.clear();
        }
        result
    }

    /// Records `copy` as the clone of `original` for the rest of this clone.
    ///
    /// Values without identity are ignored.
    pub fn register(&mut self, original: &Value, copy: &Value) {
        if let Some(id) = original.identity() {
            self.context.insert(id, (original.clone(), copy.clone()));
        }
    }

    /// The copy already made of `original` in this clone, if any.
    pub fn lookup(&self, original: &Value) -> Option<Value> {
        let (_, copy) = self.context.get(&original.identity()?)?;
        Some(copy.clone())
    }

    fn clone_inner(&mut self, value: &Value) -> Result<Value> {
        if let Some(copy) = self.lookup(value) {
            trace!(type_name = value.type_name(), "reusing copy of shared value");
            return Ok(copy);
        }

        match value {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Text(_)
            | Value::Date(_)
            | Value::Regex(_) => Ok(value.clone()),
            Value::Array(items) => {
                let copy: ArrayRef = Rc::new(RefCell::new(Vec::new()));
                self.register(value, &Value::Array(Rc::clone(&copy)));

                let items = items.borrow();
                let mut cloned = Vec::with_capacity(items.len());
                for item in items.iter() {
                    cloned.push(self.clone_value(item)?);
                }
                *copy.borrow_mut() = cloned;
                Ok(Value::Array(copy))
            }
            Value::Object(fields) => {
                let copy: ObjectRef = Rc::new(RefCell::new(BTreeMap::new()));
                self.register(value, &Value::Object(Rc::clone(&copy)));

                let fields = fields.borrow();
                let mut cloned = BTreeMap::new();
                for (key, item) in fields.iter() {
                    cloned.insert(key.clone(), self.clone_value(item)?);
                }
                *copy.borrow_mut() = cloned;
                Ok(Value::Object(copy))
            }
            Value::Custom(custom) => {
                let copy = custom.clone_with(value, self)?;
                self.register(value, &copy);
                Ok(copy)
            }
            Value::Opaque(opaque) => {
                debug!(type_name = opaque.type_name(), "rejecting opaque value");
                Err(ClonerError::Unsupported {
                    type_name: opaque.type_name().to_string(),
                }
                .into())
            }
        }
    }
}

/// Deep-copies `value` with a fresh [`Cloner`].
pub fn clone_value(value: &Value) -> Result<Value> {
    Cloner::new().clone_value(value)
}

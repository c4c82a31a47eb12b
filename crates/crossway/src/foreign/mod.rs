//! The foreign runtime as the bridge sees it
//!
//! The foreign runtime has copy-on-write scalars and arrays and aliases only
//! through explicit reference slots ([`ForeignRef`]). Objects, classes and
//! callables are supplied by the embedding through the traits in this
//! module; [`model`] is a small scriptable implementation of them.

mod array;
mod exception;
pub mod model;
mod slot;
mod traits;

pub use array::{ArrayKey, ForeignArray};
pub use exception::ForeignException;
pub use slot::{ForeignRef, SlotBusy};
pub use traits::{ForeignCallable, ForeignClass, ForeignCompiler, ForeignObject};

use std::fmt;
use std::rc::Rc;

/// Nesting limit used by [`ForeignValue::loose_eq`].
pub const DEFAULT_EQ_DEPTH: usize = 512;

/// A value owned by the foreign runtime.
///
/// Scalars and arrays are plain values: cloning an array is O(1) and any
/// later mutation through [`ForeignValue::array_mut`] copies on write, so
/// two clones never alias. Objects, classes and callables are handles whose
/// identity is the identity of the shared allocation.
#[derive(Clone)]
pub enum ForeignValue {
    /// The null value
    Null,

    /// Boolean
    Bool(bool),

    /// Integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Immutable string
    Str(Rc<str>),

    /// Ordered map, copy-on-write
    Array(Rc<ForeignArray>),

    /// Object instance
    Object(Rc<dyn ForeignObject>),

    /// Class, callable as a constructor
    Class(Rc<dyn ForeignClass>),

    /// Function, bound method or closure
    Callable(Rc<dyn ForeignCallable>),
}

impl ForeignValue {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        ForeignValue::Str(Rc::from(s.into()))
    }

    /// Create an array value.
    pub fn array(array: ForeignArray) -> Self {
        ForeignValue::Array(Rc::new(array))
    }

    /// Create a list-shaped array keyed `0..n`.
    pub fn list(items: impl IntoIterator<Item = ForeignValue>) -> Self {
        ForeignValue::array(items.into_iter().collect())
    }

    /// Foreign type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ForeignValue::Null => "null",
            ForeignValue::Bool(_) => "bool",
            ForeignValue::Int(_) => "int",
            ForeignValue::Float(_) => "float",
            ForeignValue::Str(_) => "string",
            ForeignValue::Array(_) => "array",
            ForeignValue::Object(_) => "object",
            ForeignValue::Class(_) => "class",
            ForeignValue::Callable(_) => "callable",
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ForeignValue::Null)
    }

    /// Extract integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ForeignValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ForeignValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the array, if this is one.
    pub fn as_array(&self) -> Option<&ForeignArray> {
        match self {
            ForeignValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable access to the array, copying it first if it is shared.
    pub fn array_mut(&mut self) -> Option<&mut ForeignArray> {
        match self {
            ForeignValue::Array(a) => Some(Rc::make_mut(a)),
            _ => None,
        }
    }

    /// Borrow the object handle, if this is one.
    pub fn as_object(&self) -> Option<&Rc<dyn ForeignObject>> {
        match self {
            ForeignValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Identity comparison: true when both values are the same foreign
    /// entity. Scalars and arrays have no identity and never compare true.
    pub fn is_identical(&self, other: &ForeignValue) -> bool {
        match (self, other) {
            (ForeignValue::Object(a), ForeignValue::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (ForeignValue::Class(a), ForeignValue::Class(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (ForeignValue::Callable(a), ForeignValue::Callable(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }

    /// The foreign runtime's loose equality.
    ///
    /// Integers and floats compare numerically, arrays compare key by key,
    /// objects are equal when identical or when they share a class and
    /// their property tables are loosely equal. Classes and callables only
    /// equal themselves.
    ///
    /// Nesting deeper than [`DEFAULT_EQ_DEPTH`] compares unequal; see
    /// [`ForeignValue::loose_eq_within`].
    pub fn loose_eq(&self, other: &ForeignValue) -> bool {
        self.loose_eq_within(other, DEFAULT_EQ_DEPTH)
    }

    /// Loose equality that walks at most `max_depth` levels of arrays and
    /// object properties.
    ///
    /// A pair of objects met again while their properties are still being
    /// compared (objects that reach each other through properties) compares
    /// unequal, as does anything past `max_depth`.
    pub fn loose_eq_within(&self, other: &ForeignValue, max_depth: usize) -> bool {
        let mut in_progress = Vec::new();
        self.loose_eq_at(other, &mut in_progress, max_depth)
    }

    fn loose_eq_at(
        &self,
        other: &ForeignValue,
        in_progress: &mut Vec<(*const (), *const ())>,
        remaining: usize,
    ) -> bool {
        match (self, other) {
            (ForeignValue::Null, ForeignValue::Null) => true,
            (ForeignValue::Bool(a), ForeignValue::Bool(b)) => a == b,
            (ForeignValue::Int(a), ForeignValue::Int(b)) => a == b,
            (ForeignValue::Float(a), ForeignValue::Float(b)) => a == b,
            (ForeignValue::Int(a), ForeignValue::Float(b))
            | (ForeignValue::Float(b), ForeignValue::Int(a)) => (*a as f64) == *b,
            (ForeignValue::Str(a), ForeignValue::Str(b)) => a == b,
            (ForeignValue::Array(a), ForeignValue::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let Some(remaining) = remaining.checked_sub(1) else {
                    return false;
                };
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.get(k)
                            .is_some_and(|other| v.loose_eq_at(other, in_progress, remaining))
                    })
            }
            (ForeignValue::Object(a), ForeignValue::Object(b)) => {
                if self.is_identical(other) {
                    return true;
                }
                if a.class_name() != b.class_name() {
                    return false;
                }
                let Some(remaining) = remaining.checked_sub(1) else {
                    return false;
                };
                let pair = (Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ());
                if in_progress.contains(&pair) {
                    return false;
                }

                in_progress.push(pair);
                let left = a.properties();
                let right = b.properties();
                let equal = left.len() == right.len()
                    && left.iter().all(|(name, value)| {
                        right.iter().any(|(other_name, other_value)| {
                            name == other_name
                                && value.loose_eq_at(other_value, in_progress, remaining)
                        })
                    });
                in_progress.pop();
                equal
            }
            _ => self.is_identical(other),
        }
    }
}

impl fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignValue::Null => write!(f, "null"),
            ForeignValue::Bool(b) => write!(f, "{}", b),
            ForeignValue::Int(n) => write!(f, "{}", n),
            ForeignValue::Float(n) => write!(f, "{:?}", n),
            ForeignValue::Str(s) => write!(f, "{:?}", s.as_ref()),
            ForeignValue::Array(a) => {
                write!(f, "array(")?;
                for (i, (key, value)) in a.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match key {
                        ArrayKey::Int(n) => write!(f, "{} => {:?}", n, value)?,
                        ArrayKey::Str(s) => write!(f, "{:?} => {:?}", s.as_ref(), value)?,
                    }
                }
                write!(f, ")")
            }
            ForeignValue::Object(o) => write!(f, "object({})", o.class_name()),
            ForeignValue::Class(c) => write!(f, "class({})", c.name()),
            ForeignValue::Callable(c) => write!(f, "callable({})", c.name()),
        }
    }
}

/// The foreign runtime's string conversion.
impl fmt::Display for ForeignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignValue::Null => Ok(()),
            ForeignValue::Bool(true) => write!(f, "1"),
            ForeignValue::Bool(false) => Ok(()),
            ForeignValue::Int(n) => write!(f, "{}", n),
            ForeignValue::Float(n) => write!(f, "{}", n),
            ForeignValue::Str(s) => write!(f, "{}", s),
            ForeignValue::Array(_) => write!(f, "Array"),
            ForeignValue::Object(o) => write!(f, "Object({})", o.class_name()),
            ForeignValue::Class(c) => write!(f, "{}", c.name()),
            ForeignValue::Callable(c) => write!(f, "{}", c.name()),
        }
    }
}

impl From<bool> for ForeignValue {
    fn from(b: bool) -> Self {
        ForeignValue::Bool(b)
    }
}

impl From<i64> for ForeignValue {
    fn from(n: i64) -> Self {
        ForeignValue::Int(n)
    }
}

impl From<f64> for ForeignValue {
    fn from(n: f64) -> Self {
        ForeignValue::Float(n)
    }
}

impl From<&str> for ForeignValue {
    fn from(s: &str) -> Self {
        ForeignValue::Str(Rc::from(s))
    }
}

impl From<String> for ForeignValue {
    fn from(s: String) -> Self {
        ForeignValue::string(s)
    }
}

impl From<ForeignArray> for ForeignValue {
    fn from(array: ForeignArray) -> Self {
        ForeignValue::array(array)
    }
}

/// One argument as the foreign runtime receives it.
#[derive(Debug, Clone)]
pub enum ForeignArg {
    /// An independent value
    Value(ForeignValue),

    /// An aliasing slot shared with the caller
    Ref(ForeignRef),
}

impl ForeignArg {
    /// The argument's current value (dereferencing a slot).
    pub fn value(&self) -> Result<ForeignValue, SlotBusy> {
        match self {
            ForeignArg::Value(v) => Ok(v.clone()),
            ForeignArg::Ref(slot) => slot.get(),
        }
    }

    /// The aliasing slot, if the argument was passed by reference.
    pub fn slot(&self) -> Option<&ForeignRef> {
        match self {
            ForeignArg::Value(_) => None,
            ForeignArg::Ref(slot) => Some(slot),
        }
    }

    /// Check if the argument was passed by reference
    pub fn is_ref(&self) -> bool {
        matches!(self, ForeignArg::Ref(_))
    }

    /// Assign to the parameter.
    ///
    /// A by-reference parameter writes through to the caller's slot; a
    /// by-value parameter only rebinds the callee's local copy.
    pub fn assign(&mut self, value: ForeignValue) -> Result<(), SlotBusy> {
        match self {
            ForeignArg::Value(v) => {
                *v = value;
                Ok(())
            }
            ForeignArg::Ref(slot) => slot.set(value),
        }
    }

    /// Mutate the parameter in place, copy-on-write for local arrays.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut ForeignValue) -> R) -> Result<R, SlotBusy> {
        match self {
            ForeignArg::Value(v) => Ok(f(v)),
            ForeignArg::Ref(slot) => slot.update(f),
        }
    }
}

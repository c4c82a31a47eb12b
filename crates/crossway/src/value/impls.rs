//! HostValue trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl HostValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        HostValue::Str(Rc::from(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<HostValue>) -> Self {
        HostValue::List(Rc::new(RefCell::new(items)))
    }

    /// Create a dict value
    pub fn dict(entries: impl IntoIterator<Item = (HostKey, HostValue)>) -> Self {
        HostValue::Dict(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    /// Create an empty dict
    pub fn empty_dict() -> Self {
        HostValue::Dict(Rc::new(RefCell::new(IndexMap::new())))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is the "no value" singleton
    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    /// Check if value is a reference cell.
    ///
    /// Callers test this before handing an argument to marshaling.
    pub fn is_ref(&self) -> bool {
        matches!(self, HostValue::Ref(_))
    }

    /// Check if value is callable (function, foreign callable, or foreign
    /// object/class adapter)
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            HostValue::Function(_) | HostValue::Callable(_) | HostValue::Object(_)
        )
    }

    /// Check if value wraps a foreign entity
    pub fn is_adapter(&self) -> bool {
        matches!(self, HostValue::Object(_) | HostValue::Callable(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as f64 (converts from integers)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            HostValue::Float(n) => Some(*n),
            HostValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the reference cell
    pub fn as_ref_cell(&self) -> Option<&ReferenceCell> {
        match self {
            HostValue::Ref(cell) => Some(cell),
            _ => None,
        }
    }

    /// Extract the object adapter
    pub fn as_object(&self) -> Option<&ObjectAdapter> {
        match self {
            HostValue::Object(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// Extract the callable adapter
    pub fn as_callable(&self) -> Option<&CallableAdapter> {
        match self {
            HostValue::Callable(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// Snapshot of a list's items (shallow clone)
    pub fn list_items(&self) -> Option<Vec<HostValue>> {
        match self {
            HostValue::List(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Look up a dict entry
    pub fn dict_get(&self, key: &HostKey) -> Option<HostValue> {
        match self {
            HostValue::Dict(entries) => entries.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Item by position for lists, by integer key for dicts
    pub fn item(&self, index: i64) -> Option<HostValue> {
        match self {
            HostValue::List(items) => usize::try_from(index)
                .ok()
                .and_then(|i| items.borrow().get(i).cloned()),
            HostValue::Dict(_) => self.dict_get(&HostKey::Int(index)),
            _ => None,
        }
    }

    /// Number of items in a list or dict
    pub fn len(&self) -> Option<usize> {
        match self {
            HostValue::List(items) => Some(items.borrow().len()),
            HostValue::Dict(entries) => Some(entries.borrow().len()),
            _ => None,
        }
    }

    /// Whether a list or dict is empty
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// True when both values are the same host object.
    ///
    /// Scalars have no identity and are never identical.
    pub fn is_identical(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::List(a), HostValue::List(b)) => Rc::ptr_eq(a, b),
            (HostValue::Dict(a), HostValue::Dict(b)) => Rc::ptr_eq(a, b),
            (HostValue::Function(a), HostValue::Function(b)) => a.ptr_eq(b),
            (HostValue::Object(a), HostValue::Object(b)) => a.is_same(b),
            (HostValue::Callable(a), HostValue::Callable(b)) => a.is_same(b),
            (HostValue::Ref(a), HostValue::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::None, HostValue::None) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,

            // Numbers compare across int/float
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Int(a), HostValue::Float(b)) | (HostValue::Float(b), HostValue::Int(a)) => {
                (*a as f64) == *b
            }

            (HostValue::Str(a), HostValue::Str(b)) => a == b,

            // Containers: identity short-circuit, then element-wise
            (HostValue::List(a), HostValue::List(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (HostValue::Dict(a), HostValue::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }

            // Adapters: foreign equality for objects, identity for callables
            (HostValue::Object(a), HostValue::Object(b)) => a == b,
            (HostValue::Callable(a), HostValue::Callable(b)) => a.is_same(b),

            (HostValue::Function(a), HostValue::Function(b)) => a.ptr_eq(b),
            (HostValue::Ref(a), HostValue::Ref(b)) => a.ptr_eq(b),

            // Different types are never equal
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<()> for HostValue {
    fn from(_: ()) -> Self {
        HostValue::None
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Int(n)
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::Float(n)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(Rc::from(s))
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::string(s)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(items: Vec<HostValue>) -> Self {
        HostValue::list(items)
    }
}

impl From<HostFunction> for HostValue {
    fn from(f: HostFunction) -> Self {
        HostValue::Function(f)
    }
}

impl From<ReferenceCell> for HostValue {
    fn from(cell: ReferenceCell) -> Self {
        HostValue::Ref(cell)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::None, Into::into)
    }
}

//! Host namespaces that embedded foreign functions are bound into

use indexmap::IndexMap;

use crate::value::HostValue;

/// Where the embedding hook installs a callable.
///
/// The bridge only produces values; deciding where a value lives is the
/// host's business. Implement this for the host's global or object-local
/// namespace.
pub trait Namespace {
    /// Bind `value` under `name`, replacing an existing binding.
    fn bind(&mut self, name: &str, value: HostValue);

    /// Look up the value bound under `name`.
    fn lookup(&self, name: &str) -> Option<HostValue>;
}

/// A flat host namespace keeping names in first-bound order.
///
/// # Example
///
/// ```
/// use crossway::{HostValue, Namespace, Scope};
///
/// let mut scope = Scope::new();
/// scope.bind("x", HostValue::Int(1));
/// scope.bind("x", HostValue::Int(2));
///
/// assert_eq!(scope.len(), 1);
/// assert_eq!(scope.lookup("x"), Some(HostValue::Int(2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: IndexMap<String, HostValue>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the value bound under `name`.
    pub fn get(&self, name: &str) -> Option<&HostValue> {
        self.bindings.get(name)
    }

    /// Check if `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Remove a binding, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<HostValue> {
        self.bindings.shift_remove(name)
    }

    /// Bound names in first-bound order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Namespace for Scope {
    fn bind(&mut self, name: &str, value: HostValue) {
        self.bindings.insert(name.to_string(), value);
    }

    fn lookup(&self, name: &str) -> Option<HostValue> {
        self.bindings.get(name).cloned()
    }
}

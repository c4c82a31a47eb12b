//! Contracts the foreign runtime provides to the bridge

use std::rc::Rc;

use super::{ForeignArg, ForeignException, ForeignValue};
use crate::value::HostFunction;

/// A foreign function, bound method or closure.
///
/// The per-parameter needs-ref declaration is part of the callable's own
/// definition; the bridge reads it once when it wraps the callable.
pub trait ForeignCallable {
    /// Display name used in error messages.
    fn name(&self) -> &str;

    /// Number of declared parameters.
    fn param_count(&self) -> usize;

    /// Whether the parameter at `position` (0-based) takes an aliasing
    /// slot instead of a value.
    fn needs_ref(&self, position: usize) -> bool;

    /// Invoke with a fully marshaled argument list.
    fn call_with_args(&self, args: Vec<ForeignArg>) -> Result<ForeignValue, ForeignException>;

    /// The host function behind this callable, when it is an exported
    /// host function rather than foreign code.
    fn host_function(&self) -> Option<&HostFunction> {
        None
    }
}

/// A foreign object instance.
///
/// Lookups are visibility-aware and all-or-nothing: a member the caller may
/// not see is reported as absent.
pub trait ForeignObject {
    /// The object's class name.
    fn class_name(&self) -> &str;

    /// Read a visible property.
    fn property(&self, name: &str) -> Option<ForeignValue>;

    /// Assign a property under the foreign runtime's own rules.
    fn set_property(&self, name: &str, value: ForeignValue) -> Result<(), ForeignException>;

    /// Look up a visible method, bound to this object.
    fn method(&self, name: &str) -> Option<Rc<dyn ForeignCallable>>;

    /// Snapshot of every property, used by loose equality.
    fn properties(&self) -> Vec<(String, ForeignValue)>;
}

/// A foreign class.
pub trait ForeignClass {
    /// The class name.
    fn name(&self) -> &str;

    /// Read a visible static property.
    fn static_property(&self, name: &str) -> Option<ForeignValue>;

    /// Assign a static property.
    fn set_static_property(&self, name: &str, value: ForeignValue)
        -> Result<(), ForeignException>;

    /// Look up a visible static method.
    fn static_method(&self, name: &str) -> Option<Rc<dyn ForeignCallable>>;

    /// Create an instance, running the constructor with `args`.
    fn instantiate(&self, args: Vec<ForeignValue>) -> Result<ForeignValue, ForeignException>;
}

/// Turns foreign source text into a callable.
///
/// Parsing and compiling foreign code is the foreign runtime's business;
/// the bridge only wraps what comes back. How the source declares
/// by-reference parameters is up to the compiler, as long as the result
/// answers [`ForeignCallable::needs_ref`].
pub trait ForeignCompiler {
    /// Compile one function definition.
    fn compile_function(&self, source: &str) -> Result<Rc<dyn ForeignCallable>, ForeignException>;
}

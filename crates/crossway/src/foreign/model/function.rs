//! Closure-backed foreign functions

use std::fmt;
use std::rc::Rc;

use super::{check_arity, mark_ref};
use crate::foreign::{ForeignArg, ForeignCallable, ForeignException, ForeignValue};

/// Body of a [`NativeFunction`].
pub type NativeBody = Rc<dyn Fn(Vec<ForeignArg>) -> Result<ForeignValue, ForeignException>>;

/// A named foreign function implemented in Rust.
///
/// Parameters are by value unless marked with [`NativeFunction::by_ref`],
/// the equivalent of a `&$param` declaration in foreign source.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    param_count: usize,
    ref_params: Vec<bool>,
    body: NativeBody,
}

impl NativeFunction {
    /// Create a function taking `param_count` by-value parameters.
    pub fn new(
        name: impl Into<String>,
        param_count: usize,
        body: impl Fn(Vec<ForeignArg>) -> Result<ForeignValue, ForeignException> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            param_count,
            ref_params: Vec::new(),
            body: Rc::new(body),
        }
    }

    /// Declare the parameter at `position` (0-based) as by-reference.
    pub fn by_ref(mut self, position: usize) -> Self {
        mark_ref(&mut self.ref_params, position);
        self.param_count = self.param_count.max(position + 1);
        self
    }

    /// Wrap as a shared callable handle.
    pub fn into_callable(self) -> Rc<dyn ForeignCallable> {
        Rc::new(self)
    }

    /// Wrap as a foreign value.
    pub fn into_value(self) -> ForeignValue {
        ForeignValue::Callable(self.into_callable())
    }
}

impl ForeignCallable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn param_count(&self) -> usize {
        self.param_count
    }

    fn needs_ref(&self, position: usize) -> bool {
        self.ref_params.get(position).copied().unwrap_or(false)
    }

    fn call_with_args(&self, args: Vec<ForeignArg>) -> Result<ForeignValue, ForeignException> {
        check_arity(&self.name, self.param_count, args.len())?;
        (self.body)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({}/{})", self.name, self.param_count)
    }
}

//! Foreign callables invoked from the host

use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace};

use crate::bridge::Bridge;
use crate::error::{BridgeError, PassMode, Result, Runtime};
use crate::foreign::{ForeignArg, ForeignCallable, ForeignValue};
use crate::translate::translate_foreign_exception;
use crate::value::HostValue;

/// A foreign function, method or closure callable with host syntax.
///
/// The callee's per-parameter needs-ref declarations are read once, when
/// the adapter is built, into an immutable side table. Every call then
/// checks each positional argument against it:
///
/// | needs-ref | argument            | forwarded as                   |
/// |-----------|---------------------|--------------------------------|
/// | yes       | `HostValue::Ref`    | the cell's own slot            |
/// | yes       | anything else       | error: pass by reference       |
/// | no        | `HostValue::Ref`    | error: pass by value           |
/// | no        | anything else       | a converted independent copy   |
///
/// All arguments are checked before the callee runs, so a rejected call
/// has no side effects.
#[derive(Clone)]
pub struct CallableAdapter {
    bridge: Bridge,
    callable: Rc<dyn ForeignCallable>,
    ref_params: Rc<[bool]>,
}

impl CallableAdapter {
    pub(crate) fn new(bridge: Bridge, callable: Rc<dyn ForeignCallable>) -> Self {
        let ref_params = (0..callable.param_count())
            .map(|position| callable.needs_ref(position))
            .collect();
        Self {
            bridge,
            callable,
            ref_params,
        }
    }

    /// The foreign callable's display name.
    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// The wrapped foreign callable.
    pub fn get_wrapped(&self) -> Rc<dyn ForeignCallable> {
        Rc::clone(&self.callable)
    }

    /// Whether the parameter at `position` (0-based) is by-reference.
    pub fn needs_ref(&self, position: usize) -> bool {
        match self.ref_params.get(position) {
            Some(needs_ref) => *needs_ref,
            // Positions past the declared parameters (variadic tails)
            None => self.callable.needs_ref(position),
        }
    }

    /// True when both adapters wrap the same foreign callable.
    pub fn is_same(&self, other: &CallableAdapter) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callable), Rc::as_ptr(&other.callable))
    }

    /// Invoke with positional arguments.
    ///
    /// # Errors
    ///
    /// - `PassModeMismatch` naming the 1-based position of the first
    ///   argument whose kind disagrees with the declaration
    /// - `ReferenceByValue` if a by-value argument contains a cell
    /// - `Foreign` if the callee raised
    pub fn call(&self, args: &[HostValue]) -> Result<HostValue> {
        let args = self.marshal_args(args)?;
        invoke_foreign(&self.bridge, self.callable.as_ref(), args)
    }

    /// Invoke with positional and named arguments.
    ///
    /// The foreign call model has no named arguments, so any entry in
    /// `keywords` fails with `KeywordArguments` before anything else is
    /// checked.
    pub fn call_with_keywords(
        &self,
        args: &[HostValue],
        keywords: &[(String, HostValue)],
    ) -> Result<HostValue> {
        if !keywords.is_empty() {
            return Err(BridgeError::KeywordArguments {
                callable: self.name().to_string(),
            });
        }
        self.call(args)
    }

    fn marshal_args(&self, args: &[HostValue]) -> Result<Vec<ForeignArg>> {
        args.iter()
            .enumerate()
            .map(|(position, arg)| -> Result<ForeignArg> {
                let needs_ref = self.needs_ref(position);
                trace!(
                    target: "marshal",
                    callable = self.name(),
                    position,
                    needs_ref,
                    is_ref = arg.is_ref(),
                    "marshaling argument"
                );
                match (needs_ref, arg) {
                    (true, HostValue::Ref(cell)) => Ok(ForeignArg::Ref(cell.slot().clone())),
                    (true, _) => Err(self.mismatch(position, PassMode::Reference)),
                    (false, HostValue::Ref(_)) => Err(self.mismatch(position, PassMode::Value)),
                    (false, value) => Ok(ForeignArg::Value(self.bridge.to_foreign(value)?)),
                }
            })
            .collect()
    }

    fn mismatch(&self, position: usize, expected: PassMode) -> BridgeError {
        BridgeError::PassModeMismatch {
            position: position + 1,
            callable: self.name().to_string(),
            runtime: Runtime::Foreign,
            expected,
        }
    }
}

impl fmt::Debug for CallableAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableAdapter")
            .field("name", &self.name())
            .field("ref_params", &self.ref_params)
            .finish()
    }
}

/// Run a foreign callable on already-marshaled arguments.
///
/// Counts against the bridge's call depth for the duration of the call.
/// A foreign exception is translated, never swallowed.
pub(crate) fn invoke_foreign(
    bridge: &Bridge,
    callable: &dyn ForeignCallable,
    args: Vec<ForeignArg>,
) -> Result<HostValue> {
    let _guard = bridge.enter_call()?;
    let _span = debug_span!("foreign_call", callable = callable.name()).entered();
    debug!(args = args.len(), depth = bridge.call_depth(), "calling into foreign runtime");

    let result = callable
        .call_with_args(args)
        .map_err(|exception| translate_foreign_exception(bridge, exception))?;
    bridge.to_host(&result)
}

/// Convert arguments for a callee that takes everything by value.
///
/// `callable` names the callee in the error for a reference argument.
pub(crate) fn marshal_by_value(
    bridge: &Bridge,
    callable: &str,
    args: &[HostValue],
) -> Result<Vec<ForeignValue>> {
    args.iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            HostValue::Ref(_) => Err(BridgeError::PassModeMismatch {
                position: position + 1,
                callable: callable.to_string(),
                runtime: Runtime::Foreign,
                expected: PassMode::Value,
            }),
            value => bridge.to_foreign(value),
        })
        .collect()
}

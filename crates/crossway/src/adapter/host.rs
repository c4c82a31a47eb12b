//! Host functions invoked from foreign code

use std::fmt;

use tracing::{debug, debug_span, trace};

use crate::bridge::Bridge;
use crate::cell::ReferenceCell;
use crate::error::{BridgeError, PassMode, Result, Runtime};
use crate::foreign::{ForeignArg, ForeignCallable, ForeignException, ForeignValue};
use crate::translate::translate_host_error;
use crate::value::{HostFunction, HostValue};

/// A [`HostFunction`] exposed to the foreign runtime as a callable.
///
/// Arguments are marshaled by the host function's own declarations:
/// a by-reference parameter must receive a foreign slot and sees it as a
/// [`HostValue::Ref`] sharing that slot; a by-value parameter receives a
/// converted copy, dereferencing a slot if the caller passed one. Host
/// failures reach the foreign caller as exceptions.
pub struct HostFunctionAdapter {
    bridge: Bridge,
    function: HostFunction,
}

impl HostFunctionAdapter {
    /// Wrap `function` for foreign callers.
    pub fn new(bridge: Bridge, function: HostFunction) -> Self {
        Self { bridge, function }
    }

    fn marshal_args(&self, args: Vec<ForeignArg>) -> Result<Vec<HostValue>> {
        args.into_iter()
            .enumerate()
            .map(|(position, arg)| -> Result<HostValue> {
                let needs_ref = self.function.needs_ref(position);
                trace!(
                    target: "marshal",
                    callable = self.function.name(),
                    position,
                    needs_ref,
                    is_ref = arg.is_ref(),
                    "marshaling argument"
                );
                match (needs_ref, arg) {
                    (true, ForeignArg::Ref(slot)) => Ok(HostValue::Ref(ReferenceCell::from_slot(
                        self.bridge.clone(),
                        slot,
                    ))),
                    (true, ForeignArg::Value(_)) => Err(BridgeError::PassModeMismatch {
                        position: position + 1,
                        callable: self.function.name().to_string(),
                        runtime: Runtime::Host,
                        expected: PassMode::Reference,
                    }),
                    (false, arg) => self.bridge.to_host(&arg.value()?),
                }
            })
            .collect()
    }

    fn call_host(&self, args: Vec<ForeignArg>) -> Result<ForeignValue> {
        self.function.check_arity(args.len())?;
        let args = self.marshal_args(args)?;

        let _guard = self.bridge.enter_call()?;
        let _span = debug_span!("host_call", callable = self.function.name()).entered();
        debug!(args = args.len(), depth = self.bridge.call_depth(), "calling into host runtime");

        let result = self.function.invoke(&args)?;
        self.bridge.to_foreign(&result)
    }
}

impl ForeignCallable for HostFunctionAdapter {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn param_count(&self) -> usize {
        self.function.param_count()
    }

    fn needs_ref(&self, position: usize) -> bool {
        self.function.needs_ref(position)
    }

    fn call_with_args(&self, args: Vec<ForeignArg>) -> std::result::Result<ForeignValue, ForeignException> {
        self.call_host(args)
            .map_err(|error| translate_host_error(&self.bridge, error))
    }

    fn host_function(&self) -> Option<&HostFunction> {
        Some(&self.function)
    }
}

impl fmt::Debug for HostFunctionAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostFunctionAdapter")
            .field(&self.function)
            .finish()
    }
}

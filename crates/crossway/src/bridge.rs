//! The bridge handle: configuration, call depth and adapter factory

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::adapter::{CallableAdapter, HostFunctionAdapter, ObjectAdapter};
use crate::cell::ReferenceCell;
use crate::context::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::foreign::{
    ForeignCallable, ForeignClass, ForeignCompiler, ForeignObject, ForeignRef, ForeignValue,
};
use crate::namespace::Namespace;
use crate::translate::translate_foreign_exception;
use crate::value::{HostFunction, HostValue};

/// Shared state for one pair of connected runtimes.
///
/// Every cell and adapter keeps a handle to the bridge that created it, so
/// limits and call depth are shared across the whole object graph. Cloning
/// is cheap and yields the same bridge.
///
/// # Example
///
/// ```
/// use crossway::{Bridge, BridgeConfig, HostValue};
///
/// let bridge = Bridge::with_config(BridgeConfig::new().with_max_call_depth(64));
/// let cell = bridge.new_reference(&HostValue::Int(1)).unwrap();
/// cell.set(&HostValue::Int(2)).unwrap();
/// assert_eq!(cell.get().unwrap(), HostValue::Int(2));
/// ```
#[derive(Clone)]
pub struct Bridge {
    inner: Rc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    call_depth: Cell<usize>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create a bridge with default limits.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a bridge with explicit limits.
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            inner: Rc::new(BridgeInner {
                config,
                call_depth: Cell::new(0),
            }),
        }
    }

    /// The bridge's limits.
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// True when both handles are the same bridge.
    pub fn ptr_eq(&self, other: &Bridge) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking
    // ═══════════════════════════════════════════════════════════════════

    /// Number of cross-runtime calls currently on the stack.
    pub fn call_depth(&self) -> usize {
        self.inner.call_depth.get()
    }

    /// Enter a cross-runtime call. The depth drops again when the returned
    /// guard goes out of scope, on every exit path.
    ///
    /// # Errors
    ///
    /// Returns `CallDepthExceeded` if the configured limit is reached.
    pub fn enter_call(&self) -> Result<CallGuard> {
        let depth = self.inner.call_depth.get();
        let max = self.inner.config.max_call_depth;
        if depth >= max {
            warn!(depth, max, "cross-runtime call depth exceeded");
            return Err(BridgeError::CallDepthExceeded { max });
        }
        self.inner.call_depth.set(depth + 1);
        Ok(CallGuard {
            bridge: self.clone(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reference Cells
    // ═══════════════════════════════════════════════════════════════════

    /// Create a reference cell holding `initial`.
    ///
    /// The value is converted to foreign representation once, so both
    /// runtimes share one canonical slot.
    ///
    /// # Errors
    ///
    /// Returns `NestedReference` if `initial` is itself a cell, or any
    /// conversion error for its contents.
    pub fn new_reference(&self, initial: &HostValue) -> Result<ReferenceCell> {
        if initial.is_ref() {
            return Err(BridgeError::NestedReference);
        }
        let value = self.to_foreign(initial)?;
        Ok(self.new_foreign_reference(value))
    }

    /// Create a reference cell around a value already in foreign
    /// representation.
    pub fn new_foreign_reference(&self, initial: ForeignValue) -> ReferenceCell {
        ReferenceCell::from_slot(self.clone(), ForeignRef::new(initial))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Adapter Factory
    // ═══════════════════════════════════════════════════════════════════

    /// Wrap a foreign callable for host-side invocation.
    pub fn wrap_callable(&self, callable: Rc<dyn ForeignCallable>) -> CallableAdapter {
        CallableAdapter::new(self.clone(), callable)
    }

    /// Wrap a foreign object instance.
    pub fn wrap_instance(&self, object: Rc<dyn ForeignObject>) -> ObjectAdapter {
        ObjectAdapter::instance(self.clone(), object)
    }

    /// Wrap a foreign class.
    pub fn wrap_class(&self, class: Rc<dyn ForeignClass>) -> ObjectAdapter {
        ObjectAdapter::class(self.clone(), class)
    }

    /// Wrap a foreign value that denotes an object or a class.
    ///
    /// Returns `None` for every other kind of value.
    pub fn wrap_object(&self, value: &ForeignValue) -> Option<ObjectAdapter> {
        match value {
            ForeignValue::Object(object) => Some(self.wrap_instance(Rc::clone(object))),
            ForeignValue::Class(class) => Some(self.wrap_class(Rc::clone(class))),
            _ => None,
        }
    }

    /// Make a host function callable from foreign code.
    ///
    /// Converting the result back with [`Bridge::to_host`] yields the same
    /// `HostFunction`.
    pub fn export_host_function(&self, function: HostFunction) -> ForeignValue {
        ForeignValue::Callable(Rc::new(HostFunctionAdapter::new(self.clone(), function)))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Embedding Hooks
    // ═══════════════════════════════════════════════════════════════════

    /// Compile one foreign function definition and wrap it.
    ///
    /// # Errors
    ///
    /// A compile failure surfaces as a translated foreign exception.
    pub fn embed_function(
        &self,
        compiler: &dyn ForeignCompiler,
        source: &str,
    ) -> Result<CallableAdapter> {
        let callable = compiler
            .compile_function(source)
            .map_err(|exception| translate_foreign_exception(self, exception))?;
        debug!(callable = callable.name(), "embedded foreign function");
        Ok(self.wrap_callable(callable))
    }

    /// Compile one foreign function definition and bind it under its own
    /// name in `namespace`.
    pub fn embed_function_global(
        &self,
        compiler: &dyn ForeignCompiler,
        source: &str,
        namespace: &mut dyn Namespace,
    ) -> Result<CallableAdapter> {
        let adapter = self.embed_function(compiler, source)?;
        namespace.bind(adapter.name(), HostValue::Callable(adapter.clone()));
        Ok(adapter)
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.inner.config)
            .field("call_depth", &self.inner.call_depth.get())
            .finish()
    }
}

/// RAII guard for one cross-runtime call.
///
/// Created by [`Bridge::enter_call`]; decrements the call depth on drop.
#[derive(Debug)]
pub struct CallGuard {
    bridge: Bridge,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        let depth = &self.bridge.inner.call_depth;
        depth.set(depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign::model::NativeFunction;
    use crate::foreign::ForeignException;

    #[test]
    fn test_call_guard_restores_depth() {
        let bridge = Bridge::new();
        {
            let _outer = bridge.enter_call().unwrap();
            let _inner = bridge.enter_call().unwrap();
            assert_eq!(bridge.call_depth(), 2);
        }
        assert_eq!(bridge.call_depth(), 0);
    }

    #[test]
    fn test_call_depth_limit() {
        let bridge = Bridge::with_config(BridgeConfig::new().with_max_call_depth(1));
        let _guard = bridge.enter_call().unwrap();
        let err = bridge.enter_call().unwrap_err();
        assert!(matches!(err, BridgeError::CallDepthExceeded { max: 1 }));
        assert_eq!(bridge.call_depth(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let bridge = Bridge::new();
        let clone = bridge.clone();
        let _guard = clone.enter_call().unwrap();
        assert_eq!(bridge.call_depth(), 1);
        assert!(bridge.ptr_eq(&clone));
        assert!(!bridge.ptr_eq(&Bridge::new()));
    }

    #[test]
    fn test_new_reference_rejects_cells() {
        let bridge = Bridge::new();
        let cell = bridge.new_reference(&HostValue::Int(1)).unwrap();
        let err = bridge.new_reference(&HostValue::Ref(cell)).unwrap_err();
        assert!(matches!(err, BridgeError::NestedReference));
    }

    #[test]
    fn test_wrap_object_only_accepts_objects_and_classes() {
        let bridge = Bridge::new();
        assert!(bridge.wrap_object(&ForeignValue::Int(1)).is_none());
        let f = NativeFunction::new("f", 0, |_| Ok(ForeignValue::Null)).into_value();
        assert!(bridge.wrap_object(&f).is_none());
    }

    struct FailingCompiler;

    impl ForeignCompiler for FailingCompiler {
        fn compile_function(
            &self,
            _source: &str,
        ) -> std::result::Result<Rc<dyn ForeignCallable>, ForeignException> {
            Err(ForeignException::with_message("ParseError", "syntax error"))
        }
    }

    #[test]
    fn test_embed_function_translates_compile_errors() {
        let bridge = Bridge::new();
        let err = bridge
            .embed_function(&FailingCompiler, "function (")
            .unwrap_err();
        let foreign = err.as_foreign().unwrap();
        assert_eq!(foreign.class_name, "ParseError");
        assert_eq!(foreign.payload, HostValue::string("syntax error"));
    }
}

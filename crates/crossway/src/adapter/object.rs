//! Foreign objects and classes under host syntax

use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span};

use super::callable::marshal_by_value;
use super::HostOperator;
use crate::bridge::Bridge;
use crate::error::{BridgeError, Result};
use crate::foreign::{ForeignCallable, ForeignClass, ForeignObject, ForeignValue};
use crate::translate::translate_foreign_exception;
use crate::value::HostValue;

/// Name of the foreign method that makes an instance callable.
const INVOKE_METHOD: &str = "__invoke";

/// A foreign object instance or class presented to host code.
///
/// The adapter holds the one wrapped handle and nothing else. Two adapters
/// over the same foreign object are equal, whichever conversion produced
/// them.
#[derive(Clone)]
pub struct ObjectAdapter {
    bridge: Bridge,
    target: Target,
}

#[derive(Clone)]
enum Target {
    Instance(Rc<dyn ForeignObject>),
    Class(Rc<dyn ForeignClass>),
}

impl ObjectAdapter {
    pub(crate) fn instance(bridge: Bridge, object: Rc<dyn ForeignObject>) -> Self {
        Self {
            bridge,
            target: Target::Instance(object),
        }
    }

    pub(crate) fn class(bridge: Bridge, class: Rc<dyn ForeignClass>) -> Self {
        Self {
            bridge,
            target: Target::Class(class),
        }
    }

    /// The wrapped foreign object or class.
    pub fn get_wrapped(&self) -> ForeignValue {
        match &self.target {
            Target::Instance(object) => ForeignValue::Object(Rc::clone(object)),
            Target::Class(class) => ForeignValue::Class(Rc::clone(class)),
        }
    }

    /// Check if the adapter wraps a class rather than an instance
    pub fn is_class(&self) -> bool {
        matches!(self.target, Target::Class(_))
    }

    /// Name of the wrapped object's class, or of the wrapped class.
    pub fn class_name(&self) -> &str {
        match &self.target {
            Target::Instance(object) => object.class_name(),
            Target::Class(class) => class.name(),
        }
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match &self.target {
            Target::Instance(object) => format!("instance of '{}'", object.class_name()),
            Target::Class(class) => format!("class '{}'", class.name()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Attributes
    // ═══════════════════════════════════════════════════════════════════

    /// Read an attribute: a visible property if there is one, otherwise a
    /// visible method bound as a callable adapter.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchAttribute` when neither exists. Members the foreign
    /// side hides are reported the same way.
    pub fn get_attr(&self, name: &str) -> Result<HostValue> {
        if let Some(value) = self.property(name) {
            return self.bridge.to_host(&value);
        }
        if let Some(method) = self.method(name) {
            return Ok(HostValue::Callable(self.bridge.wrap_callable(method)));
        }
        Err(BridgeError::NoSuchAttribute {
            target: self.describe(),
            attribute: name.to_string(),
        })
    }

    /// Assign an attribute on the foreign side.
    ///
    /// Returns the host "no value" singleton on success.
    pub fn set_attr(&self, name: &str, value: &HostValue) -> Result<HostValue> {
        let value = self.bridge.to_foreign(value)?;
        let assigned = match &self.target {
            Target::Instance(object) => object.set_property(name, value),
            Target::Class(class) => class.set_static_property(name, value),
        };
        assigned.map_err(|exception| translate_foreign_exception(&self.bridge, exception))?;
        Ok(HostValue::None)
    }

    fn property(&self, name: &str) -> Option<ForeignValue> {
        match &self.target {
            Target::Instance(object) => object.property(name),
            Target::Class(class) => class.static_property(name),
        }
    }

    fn method(&self, name: &str) -> Option<Rc<dyn ForeignCallable>> {
        match &self.target {
            Target::Instance(object) => object.method(name),
            Target::Class(class) => class.static_method(name),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════════

    /// Call the wrapped value.
    ///
    /// A class is instantiated with every argument passed by value. An
    /// instance is invoked through its `__invoke` method, with the full
    /// per-argument marshaling of
    /// [`CallableAdapter::call`](super::CallableAdapter::call).
    ///
    /// # Errors
    ///
    /// Returns `NotCallable` for an instance without `__invoke`.
    pub fn call(&self, args: &[HostValue]) -> Result<HostValue> {
        match &self.target {
            Target::Class(class) => self.instantiate(class.as_ref(), args),
            Target::Instance(object) => match object.method(INVOKE_METHOD) {
                Some(invoke) => self.bridge.wrap_callable(invoke).call(args),
                None => Err(BridgeError::NotCallable {
                    target: self.describe(),
                }),
            },
        }
    }

    /// Call with positional and named arguments. Any named argument fails
    /// with `KeywordArguments`.
    pub fn call_with_keywords(
        &self,
        args: &[HostValue],
        keywords: &[(String, HostValue)],
    ) -> Result<HostValue> {
        if !keywords.is_empty() {
            let callable = match &self.target {
                Target::Class(class) => class.name().to_string(),
                Target::Instance(object) => format!("{}::{}", object.class_name(), INVOKE_METHOD),
            };
            return Err(BridgeError::KeywordArguments { callable });
        }
        self.call(args)
    }

    fn instantiate(&self, class: &dyn ForeignClass, args: &[HostValue]) -> Result<HostValue> {
        let constructor = format!("{}::__construct", class.name());
        let args = marshal_by_value(&self.bridge, &constructor, args)?;

        let _guard = self.bridge.enter_call()?;
        let _span = debug_span!("instantiate", class = class.name()).entered();
        debug!(args = args.len(), "instantiating foreign class");

        let object = class
            .instantiate(args)
            .map_err(|exception| translate_foreign_exception(&self.bridge, exception))?;
        self.bridge.to_host(&object)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Operators
    // ═══════════════════════════════════════════════════════════════════

    /// Forward a call to the foreign method `method`.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMethod` naming `method` when the foreign side has no
    /// visible method of that name.
    pub fn apply(&self, method: &str, args: &[HostValue]) -> Result<HostValue> {
        let callable = self.method(method).ok_or_else(|| BridgeError::NoSuchMethod {
            target: self.describe(),
            method: method.to_string(),
        })?;
        self.bridge.wrap_callable(callable).call(args)
    }

    /// Apply a unary operator.
    pub fn unary(&self, op: HostOperator) -> Result<HostValue> {
        self.operate(op, &[])
    }

    /// Apply a binary operator with the adapter as left operand.
    pub fn binary(&self, op: HostOperator, other: &HostValue) -> Result<HostValue> {
        self.operate(op, std::slice::from_ref(other))
    }

    fn operate(&self, op: HostOperator, operands: &[HostValue]) -> Result<HostValue> {
        match (op, operands) {
            (HostOperator::Eq, [other]) => Ok(HostValue::Bool(self.equals(other))),
            (HostOperator::Ne, [other]) => Ok(HostValue::Bool(self.not_equals(other))),
            _ => match op.foreign_method() {
                Some(method) => self.apply(method, operands),
                None => Err(BridgeError::NoSuchMethod {
                    target: self.describe(),
                    method: op.host_method().to_string(),
                }),
            },
        }
    }

    /// String conversion through the foreign `__toString` method.
    pub fn to_host_string(&self) -> Result<String> {
        match self.unary(HostOperator::Str)? {
            HostValue::Str(s) => Ok(s.to_string()),
            other => Ok(other.to_string()),
        }
    }

    /// Host equality: true only for another adapter whose wrapped value is
    /// loosely equal under the foreign runtime's rules.
    pub fn equals(&self, other: &HostValue) -> bool {
        match other {
            HostValue::Object(other) => self == other,
            _ => false,
        }
    }

    /// Negation of [`ObjectAdapter::equals`].
    pub fn not_equals(&self, other: &HostValue) -> bool {
        !self.equals(other)
    }

    /// True when both adapters wrap the identical foreign entity.
    pub fn is_same(&self, other: &ObjectAdapter) -> bool {
        self.get_wrapped().is_identical(&other.get_wrapped())
    }
}

impl PartialEq for ObjectAdapter {
    fn eq(&self, other: &Self) -> bool {
        let max_depth = self.bridge.config().max_conversion_depth;
        self.get_wrapped()
            .loose_eq_within(&other.get_wrapped(), max_depth)
    }
}

impl fmt::Debug for ObjectAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectAdapter({})", self.describe())
    }
}

//! Error types for bridge operations

use std::fmt;

use thiserror::Error;

use crate::foreign::{ForeignException, SlotBusy};
use crate::value::HostValue;

/// How a parameter expects its argument to cross the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassMode {
    /// The callee receives an independent copy
    Value,
    /// The callee receives an aliasing handle
    Reference,
}

impl fmt::Display for PassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassMode::Value => write!(f, "value"),
            PassMode::Reference => write!(f, "reference"),
        }
    }
}

/// Which runtime owns the callable named in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    /// The identity-based runtime issuing calls through adapters
    Host,
    /// The copy-on-write runtime with explicit reference slots
    Foreign,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Host => write!(f, "host"),
            Runtime::Foreign => write!(f, "foreign"),
        }
    }
}

/// Coarse classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller violated the marshaling contract
    Usage,
    /// An attribute, method or parameter does not exist or is not visible
    Lookup,
    /// The wrapped foreign value has no invocation target
    NotCallable,
    /// The foreign callable raised during execution
    ForeignRuntime,
    /// Host code raised an exception of its own
    Host,
    /// A configured depth limit was exceeded
    Limit,
}

/// A foreign exception surfaced into host code.
///
/// This is the single dedicated host-side type for foreign failures. The
/// payload has already been converted to the host representation; the
/// original exception is kept so it can be re-raised unchanged if the
/// error travels back into foreign code.
#[derive(Debug, Clone)]
pub struct ForeignError {
    /// Class name of the foreign exception
    pub class_name: String,

    /// The exception's carried value, converted to host representation
    pub payload: HostValue,

    /// The exception as the foreign runtime raised it
    pub original: ForeignException,
}

impl ForeignError {
    /// The foreign exception's message.
    pub fn message(&self) -> String {
        self.original.message()
    }
}

impl fmt::Display for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "foreign exception {}: {}", self.class_name, self.message())
    }
}

/// An exception raised by host code, typically inside a [`HostFunction`]
/// body.
///
/// [`HostFunction`]: crate::value::HostFunction
#[derive(Debug, Clone)]
pub struct HostException {
    /// Host exception class name
    pub class_name: String,

    /// The carried value
    pub payload: HostValue,
}

impl HostException {
    /// Create an exception with an arbitrary payload.
    pub fn new(class_name: impl Into<String>, payload: HostValue) -> Self {
        Self {
            class_name: class_name.into(),
            payload,
        }
    }

    /// Create a plain `Exception` carrying a message string.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new("Exception", HostValue::string(message.into()))
    }
}

impl fmt::Display for HostException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host exception {}: {}", self.class_name, self.payload)
    }
}

/// Main error type for bridge operations.
///
/// Every misuse the bridge detects is reported through this type at the
/// call site that triggered it; nothing is retried or recovered internally.
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Named arguments were supplied to a foreign callable
    #[error("cannot use keyword arguments when invoking foreign callable '{callable}'")]
    KeywordArguments {
        /// Name of the callable being invoked
        callable: String,
    },

    /// An argument's pass mode does not match the parameter's declaration
    #[error("argument {position} of {runtime} callable '{callable}' is pass by {expected}")]
    PassModeMismatch {
        /// 1-based argument position
        position: usize,
        /// Name of the callable being invoked
        callable: String,
        /// The runtime that owns the callable
        runtime: Runtime,
        /// What the parameter declares
        expected: PassMode,
    },

    /// A host callable received fewer arguments than it declares
    #[error("host callable '{callable}' expects at least {expected} arguments, got {given}")]
    TooFewArguments {
        /// Name of the host callable
        callable: String,
        /// Declared parameter count
        expected: usize,
        /// Arguments supplied
        given: usize,
    },

    /// A reference cell was handed to the value converter
    #[error("reference cells cannot be passed by value")]
    ReferenceByValue,

    /// A reference cell was used as the initial value of another cell
    #[error("cannot wrap a reference cell in another reference cell")]
    NestedReference,

    /// A by-reference declaration names a parameter the function lacks
    #[error("host callable '{callable}' has no parameter named '{parameter}'")]
    UnknownParameter {
        /// Name of the host callable
        callable: String,
        /// The undeclared parameter name
        parameter: String,
    },

    /// Attribute lookup found neither a property nor a method
    #[error("wrapped foreign {target} has no attribute '{attribute}'")]
    NoSuchAttribute {
        /// Description of the wrapped object or class
        target: String,
        /// The requested attribute
        attribute: String,
    },

    /// Operator forwarding found no matching foreign method
    #[error("wrapped foreign {target} has no {method} method")]
    NoSuchMethod {
        /// Description of the wrapped object or class
        target: String,
        /// The foreign method name the operator maps to
        method: String,
    },

    /// A reference slot was reached again while it was being updated
    #[error(transparent)]
    SlotBusy(#[from] SlotBusy),

    /// The wrapped value cannot be invoked
    #[error("wrapped foreign {target} is not callable")]
    NotCallable {
        /// Description of the wrapped value
        target: String,
    },

    /// A host value that is not callable was called
    #[error("host value of type '{type_name}' is not callable")]
    NotCallableValue {
        /// Host type name of the value
        type_name: &'static str,
    },

    /// The foreign callable raised
    #[error("{0}")]
    Foreign(ForeignError),

    /// Host code raised
    #[error("{0}")]
    Host(HostException),

    /// Too many nested cross-runtime calls
    #[error("cross-runtime call depth exceeded (max {max})")]
    CallDepthExceeded {
        /// Configured limit
        max: usize,
    },

    /// A value is nested deeper than the converter will walk
    #[error("value nesting exceeds conversion depth limit of {max}")]
    ConversionDepthExceeded {
        /// Configured limit
        max: usize,
    },
}

impl BridgeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::KeywordArguments { .. }
            | BridgeError::PassModeMismatch { .. }
            | BridgeError::TooFewArguments { .. }
            | BridgeError::ReferenceByValue
            | BridgeError::NestedReference
            | BridgeError::SlotBusy(_) => ErrorKind::Usage,
            BridgeError::UnknownParameter { .. }
            | BridgeError::NoSuchAttribute { .. }
            | BridgeError::NoSuchMethod { .. } => ErrorKind::Lookup,
            BridgeError::NotCallable { .. } | BridgeError::NotCallableValue { .. } => {
                ErrorKind::NotCallable
            }
            BridgeError::Foreign(_) => ErrorKind::ForeignRuntime,
            BridgeError::Host(_) => ErrorKind::Host,
            BridgeError::CallDepthExceeded { .. } | BridgeError::ConversionDepthExceeded { .. } => {
                ErrorKind::Limit
            }
        }
    }

    /// The wrapped foreign exception, if this error came from foreign code.
    pub fn as_foreign(&self) -> Option<&ForeignError> {
        match self {
            BridgeError::Foreign(e) => Some(e),
            _ => None,
        }
    }

    /// The payload carried by a foreign or host exception.
    pub fn payload(&self) -> Option<&HostValue> {
        match self {
            BridgeError::Foreign(e) => Some(&e.payload),
            BridgeError::Host(e) => Some(&e.payload),
            _ => None,
        }
    }
}

impl From<HostException> for BridgeError {
    fn from(exception: HostException) -> Self {
        BridgeError::Host(exception)
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Get the host-level type name of a value for error messages.
pub fn type_name(value: &HostValue) -> &'static str {
    match value {
        HostValue::None => "NoneType",
        HostValue::Bool(_) => "bool",
        HostValue::Int(_) => "int",
        HostValue::Float(_) => "float",
        HostValue::Str(_) => "str",
        HostValue::List(_) => "list",
        HostValue::Dict(_) => "dict",
        HostValue::Function(_) => "function",
        HostValue::Object(_) => "ForeignObject",
        HostValue::Callable(_) => "ForeignCallable",
        HostValue::Ref(_) => "ReferenceCell",
    }
}

//! Adapters presenting one runtime's entities under the other's syntax
//!
//! - [`CallableAdapter`]: a foreign callable invoked with host call syntax
//! - [`ObjectAdapter`]: a foreign object or class under host attribute,
//!   call and operator syntax
//! - [`HostFunctionAdapter`]: a host function invoked by foreign code
//!
//! Adapters hold one wrapped handle and never copy it.

mod callable;
mod host;
mod object;
mod operator;

pub use callable::CallableAdapter;
pub use host::HostFunctionAdapter;
pub use object::ObjectAdapter;
pub use operator::HostOperator;

use crate::error::{type_name, BridgeError, Result};
use crate::value::HostValue;

/// Call any callable host value with positional arguments.
///
/// # Errors
///
/// Returns `NotCallableValue` if `callee` cannot be invoked, otherwise
/// whatever the invoked callable reports.
pub fn call_value(callee: &HostValue, args: &[HostValue]) -> Result<HostValue> {
    match callee {
        HostValue::Callable(adapter) => adapter.call(args),
        HostValue::Object(adapter) => adapter.call(args),
        HostValue::Function(function) => function.invoke(args),
        other => Err(BridgeError::NotCallableValue {
            type_name: type_name(other),
        }),
    }
}

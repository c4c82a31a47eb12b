//! # Crossway
//!
//! A value and call bridge between two language runtimes with incompatible
//! aliasing models.
//!
//! The **host** runtime uses pervasive object identity: lists and dicts are
//! shared mutable containers and every binding of one list sees the same
//! object. The **foreign** runtime uses copy-on-write scalars and arrays and
//! only aliases through explicit reference slots. Crossway lets values and
//! callables from one runtime be used naturally by the other while keeping
//! each side's parameter-passing rules intact.
//!
//! ## Architecture
//!
//! - **Value Converter** ([`Bridge::to_foreign`], [`Bridge::to_host`]):
//!   structural copies for scalars and containers, wrapping for objects
//!   and callables
//! - **Reference Cell** ([`ReferenceCell`]): a shared slot both runtimes
//!   read and write, the only way to alias across the boundary
//! - **Object Adapter** ([`ObjectAdapter`]): host attribute, call and
//!   operator syntax forwarded to a foreign object or class
//! - **Callable Adapter** ([`CallableAdapter`]): the per-argument
//!   by-value/by-reference marshaling protocol
//! - **Error Bridge** ([`translate_foreign_exception`],
//!   [`translate_host_error`]): exceptions cross in both directions with
//!   their payload preserved
//!
//! The foreign runtime itself is an external collaborator, reached through
//! the traits in [`foreign`]. A small scriptable object model lives in
//! [`foreign::model`] for embedders and tests.
//!
//! ## Example
//!
//! ```
//! use crossway::foreign::model::NativeFunction;
//! use crossway::{Bridge, HostValue};
//!
//! let bridge = Bridge::new();
//!
//! // A foreign function that assigns 666 to its by-reference parameter.
//! let mutate = NativeFunction::new("mutate", 1, |mut args| {
//!     args[0].assign(crossway::ForeignValue::Int(666))?;
//!     Ok(crossway::ForeignValue::Null)
//! })
//! .by_ref(0);
//! let mutate = bridge.wrap_callable(mutate.into_callable());
//!
//! let cell = bridge.new_reference(&HostValue::Int(1337)).unwrap();
//! mutate.call(&[HostValue::Ref(cell.clone())]).unwrap();
//! assert_eq!(cell.get().unwrap(), HostValue::Int(666));
//!
//! // Plain values are rejected where a reference is declared.
//! let err = mutate.call(&[HostValue::Int(1)]).unwrap_err();
//! assert!(err.to_string().contains("pass by reference"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod bridge;
pub mod cell;
pub mod context;
pub mod convert;
pub mod error;
pub mod foreign;
pub mod namespace;
pub mod translate;
pub mod value;

// Re-export main types
pub use adapter::{call_value, CallableAdapter, HostFunctionAdapter, HostOperator, ObjectAdapter};
pub use bridge::{Bridge, CallGuard};
pub use cell::ReferenceCell;
pub use context::BridgeConfig;
pub use error::{
    BridgeError, ErrorKind, ForeignError, HostException, PassMode, Result, Runtime,
};
pub use foreign::{
    ArrayKey, ForeignArg, ForeignArray, ForeignCallable, ForeignClass, ForeignCompiler,
    ForeignException, ForeignObject, ForeignRef, ForeignValue, SlotBusy,
};
pub use namespace::{Namespace, Scope};
pub use translate::{translate_foreign_exception, translate_host_error};
pub use value::{HostFnBody, HostFunction, HostKey, HostValue};

/// Crossway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}

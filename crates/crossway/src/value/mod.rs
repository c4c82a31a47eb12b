//! Host runtime value representation

mod display;
mod function;
mod impls;
mod key;

pub use function::{HostFnBody, HostFunction};
pub use key::HostKey;

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::adapter::{CallableAdapter, ObjectAdapter};
use crate::cell::ReferenceCell;

/// A value native to the host runtime.
///
/// Values are organized into three tiers:
/// - Tier 1: Scalars (no shared identity)
/// - Tier 2: Shared mutable containers (`Rc<RefCell<..>>`), so every
///   binding of one list observes the others' mutations
/// - Tier 3: Callables, adapters and reference cells, which carry identity
#[derive(Clone)]
pub enum HostValue {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// The "no value" singleton
    None,

    /// Boolean
    Bool(bool),

    /// Integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Immutable string
    Str(Rc<str>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Mutable sequence
    List(Rc<RefCell<Vec<HostValue>>>),

    /// Mutable insertion-ordered mapping
    Dict(Rc<RefCell<IndexMap<HostKey, HostValue>>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Identity-Carrying Values
    // ═══════════════════════════════════════════════════════════════════
    /// Host-native function
    Function(HostFunction),

    /// Adapter over a foreign object or class
    Object(ObjectAdapter),

    /// Adapter over a foreign callable
    Callable(CallableAdapter),

    /// Reference cell shared with the foreign runtime
    Ref(ReferenceCell),
}

//! A scriptable foreign object model
//!
//! Rust-closure-backed implementations of the foreign collaborator traits:
//! functions with by-reference parameter declarations, and classes with
//! visibility-checked properties and methods. Embedders use it to expose
//! Rust-defined foreign entities; the test suite uses it to stand in for a
//! foreign interpreter.

mod class;
mod function;

pub use class::{MethodBody, ScriptClass, ScriptClassBuilder, ScriptMethod, ScriptObject, Visibility};
pub use function::{NativeBody, NativeFunction};

use super::ForeignException;

/// Reject calls that supply fewer arguments than declared parameters.
///
/// Extra arguments are accepted, as the foreign runtime does.
pub(crate) fn check_arity(name: &str, expected: usize, got: usize) -> Result<(), ForeignException> {
    if got < expected {
        return Err(ForeignException::with_message(
            "ArgumentCountError",
            format!(
                "Too few arguments to function {}(), {} passed and exactly {} expected",
                name, got, expected
            ),
        ));
    }
    Ok(())
}

/// Mark `position` in a needs-ref side table, growing it as needed.
pub(crate) fn mark_ref(ref_params: &mut Vec<bool>, position: usize) {
    if ref_params.len() <= position {
        ref_params.resize(position + 1, false);
    }
    ref_params[position] = true;
}

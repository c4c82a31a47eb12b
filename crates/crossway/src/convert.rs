//! Value conversion between the two runtimes
//!
//! Scalars map directly. Containers are deep-copied into a fresh container
//! on the target side, so later mutation on either side never reaches the
//! other. Objects and callables are wrapped, never copied, and unwrap back
//! to the same entity.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::bridge::Bridge;
use crate::error::{BridgeError, Result};
use crate::foreign::{ArrayKey, ForeignArray, ForeignValue};
use crate::value::{HostKey, HostValue};

impl Bridge {
    /// Convert a host value to foreign representation.
    ///
    /// Dict keys are normalized the way foreign array keys are, so `1` and
    /// `"1"` name the same entry. When a dict holds both, the foreign array
    /// keeps one entry at the first key's position with the value of the
    /// key iterated last.
    ///
    /// # Errors
    ///
    /// - `ReferenceByValue` if `value` is or contains a reference cell
    /// - `ConversionDepthExceeded` if containers nest deeper than the
    ///   configured limit (including a list that contains itself)
    pub fn to_foreign(&self, value: &HostValue) -> Result<ForeignValue> {
        self.to_foreign_at(value, 0)
    }

    /// Convert a foreign value to host representation.
    ///
    /// Arrays keyed exactly `0..n` in order become lists; every other
    /// array becomes a dict.
    ///
    /// # Errors
    ///
    /// Returns `ConversionDepthExceeded` if arrays nest deeper than the
    /// configured limit.
    pub fn to_host(&self, value: &ForeignValue) -> Result<HostValue> {
        self.to_host_at(value, 0)
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        let max = self.config().max_conversion_depth;
        if depth >= max {
            return Err(BridgeError::ConversionDepthExceeded { max });
        }
        Ok(())
    }

    fn to_foreign_at(&self, value: &HostValue, depth: usize) -> Result<ForeignValue> {
        let converted = match value {
            HostValue::None => ForeignValue::Null,
            HostValue::Bool(b) => ForeignValue::Bool(*b),
            HostValue::Int(n) => ForeignValue::Int(*n),
            HostValue::Float(n) => ForeignValue::Float(*n),
            HostValue::Str(s) => ForeignValue::Str(Rc::clone(s)),

            HostValue::List(items) => {
                self.check_depth(depth)?;
                let items = items.borrow();
                let mut array = ForeignArray::with_capacity(items.len());
                for (index, item) in (0..).zip(items.iter()) {
                    array.insert(ArrayKey::Int(index), self.to_foreign_at(item, depth + 1)?);
                }
                ForeignValue::array(array)
            }

            HostValue::Dict(entries) => {
                self.check_depth(depth)?;
                let entries = entries.borrow();
                let mut array = ForeignArray::with_capacity(entries.len());
                for (key, item) in entries.iter() {
                    let item = self.to_foreign_at(item, depth + 1)?;
                    if array.insert(ArrayKey::from(key), item).is_some() {
                        trace!(target: "convert", key = ?key, "dict key collides after normalization");
                    }
                }
                ForeignValue::array(array)
            }

            HostValue::Function(function) => self.export_host_function(function.clone()),
            HostValue::Object(adapter) => adapter.get_wrapped(),
            HostValue::Callable(adapter) => ForeignValue::Callable(adapter.get_wrapped()),

            HostValue::Ref(_) => return Err(BridgeError::ReferenceByValue),
        };
        Ok(converted)
    }

    fn to_host_at(&self, value: &ForeignValue, depth: usize) -> Result<HostValue> {
        let converted = match value {
            ForeignValue::Null => HostValue::None,
            ForeignValue::Bool(b) => HostValue::Bool(*b),
            ForeignValue::Int(n) => HostValue::Int(*n),
            ForeignValue::Float(n) => HostValue::Float(*n),
            ForeignValue::Str(s) => HostValue::Str(Rc::clone(s)),

            ForeignValue::Array(array) => {
                self.check_depth(depth)?;
                if array.is_list() {
                    let items = array
                        .values()
                        .map(|item| self.to_host_at(item, depth + 1))
                        .collect::<Result<Vec<_>>>()?;
                    HostValue::list(items)
                } else {
                    let mut entries = IndexMap::with_capacity(array.len());
                    for (key, item) in array.iter() {
                        entries.insert(HostKey::from(key), self.to_host_at(item, depth + 1)?);
                    }
                    HostValue::dict(entries)
                }
            }

            ForeignValue::Object(object) => HostValue::Object(self.wrap_instance(Rc::clone(object))),
            ForeignValue::Class(class) => HostValue::Object(self.wrap_class(Rc::clone(class))),

            ForeignValue::Callable(callable) => match callable.host_function() {
                Some(function) => HostValue::Function(function.clone()),
                None => HostValue::Callable(self.wrap_callable(Rc::clone(callable))),
            },
        };
        trace!(target: "convert", from = value.type_name(), depth, "converted to host");
        Ok(converted)
    }
}

//! Foreign reference slots

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use super::ForeignValue;

/// A slot was reached again while an [`ForeignRef::update`] on it was still
/// running.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("reference slot is in use by an update in progress")]
pub struct SlotBusy;

/// An aliasing slot holding one foreign value.
///
/// Every clone of a `ForeignRef` is the same slot: a `set` through one is
/// observed by all. The slot is released when the last holder drops it,
/// whichever runtime that holder belongs to. Both runtimes are single
/// threaded, so the slot is a plain shared box; reentrant access during an
/// update fails with [`SlotBusy`].
#[derive(Clone)]
pub struct ForeignRef(Rc<RefCell<ForeignValue>>);

impl ForeignRef {
    /// Create a slot holding `value`.
    pub fn new(value: ForeignValue) -> Self {
        ForeignRef(Rc::new(RefCell::new(value)))
    }

    /// Read the current value.
    pub fn get(&self) -> Result<ForeignValue, SlotBusy> {
        let value = self.0.try_borrow().map_err(|_| SlotBusy)?;
        Ok(value.clone())
    }

    /// Overwrite the current value.
    pub fn set(&self, value: ForeignValue) -> Result<(), SlotBusy> {
        *self.0.try_borrow_mut().map_err(|_| SlotBusy)? = value;
        Ok(())
    }

    /// Overwrite the current value and return the previous one.
    pub fn replace(&self, value: ForeignValue) -> Result<ForeignValue, SlotBusy> {
        let mut slot = self.0.try_borrow_mut().map_err(|_| SlotBusy)?;
        Ok(std::mem::replace(&mut *slot, value))
    }

    /// Mutate the held value in place.
    ///
    /// While `f` runs the slot is borrowed; any access to it from inside
    /// `f`, including through another handle, fails with [`SlotBusy`].
    pub fn update<R>(&self, f: impl FnOnce(&mut ForeignValue) -> R) -> Result<R, SlotBusy> {
        let mut slot = self.0.try_borrow_mut().map_err(|_| SlotBusy)?;
        Ok(f(&mut slot))
    }

    /// True when both handles are the same slot.
    pub fn ptr_eq(&self, other: &ForeignRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this slot, across both runtimes.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Debug for ForeignRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => write!(f, "&{:?}", value),
            Err(_) => write!(f, "&<busy>"),
        }
    }
}

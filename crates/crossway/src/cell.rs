//! Reference cells: the host view of a foreign aliasing slot

use std::fmt;

use tracing::trace;

use crate::bridge::Bridge;
use crate::error::Result;
use crate::foreign::{ForeignRef, ForeignValue};
use crate::value::HostValue;

/// A shared mutable box usable from both runtimes.
///
/// The payload is stored once, in foreign representation, inside a
/// [`ForeignRef`]. Passing the cell where a foreign callable declares a
/// by-reference parameter hands the callee that same slot, so writes made
/// on either side are observed by every holder. Cells are created only by
/// [`Bridge::new_reference`] or by the bridge itself when a foreign caller
/// passes a slot into a host function.
///
/// Clones are the same cell.
#[derive(Clone)]
pub struct ReferenceCell {
    slot: ForeignRef,
    bridge: Bridge,
}

impl ReferenceCell {
    pub(crate) fn from_slot(bridge: Bridge, slot: ForeignRef) -> Self {
        Self { slot, bridge }
    }

    /// Read the current payload, converted to host representation.
    ///
    /// Containers come back as fresh host copies; objects and callables as
    /// adapters over the stored entity.
    ///
    /// # Errors
    ///
    /// Returns `SlotBusy` if called while a foreign update of this slot is
    /// still running.
    pub fn get(&self) -> Result<HostValue> {
        self.bridge.to_host(&self.slot.get()?)
    }

    /// Convert `value` and store it.
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be converted (for instance, it is or
    /// contains another reference cell), or with `SlotBusy` during a
    /// foreign update of the slot. The slot is left unchanged.
    pub fn set(&self, value: &HostValue) -> Result<()> {
        let converted = self.bridge.to_foreign(value)?;
        trace!(value = ?converted, "reference cell set");
        self.slot.set(converted)?;
        Ok(())
    }

    /// Read the payload in foreign representation.
    pub fn get_foreign(&self) -> Result<ForeignValue> {
        Ok(self.slot.get()?)
    }

    /// Store a foreign value directly.
    pub fn set_foreign(&self, value: ForeignValue) -> Result<()> {
        Ok(self.slot.set(value)?)
    }

    /// The underlying foreign slot.
    pub fn slot(&self) -> &ForeignRef {
        &self.slot
    }

    /// True when both handles are the same cell.
    pub fn ptr_eq(&self, other: &ReferenceCell) -> bool {
        self.slot.ptr_eq(&other.slot)
    }

    /// Number of live holders of the slot, host and foreign side together.
    pub fn holders(&self) -> usize {
        self.slot.holders()
    }
}

impl fmt::Debug for ReferenceCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReferenceCell").field(&self.slot).finish()
    }
}

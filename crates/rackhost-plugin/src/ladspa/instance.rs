//! Foreign instance handles of one adapter.
//!
//! A plugin normally runs as a single instance. Forced stereo duplicates the
//! instance instead of the port, so there are one or two slots; control ports
//! are bound to every slot, audio ports only to their own.

use super::ffi::{LadspaData, LadspaHandle};
use super::library::Descriptor;
use smallvec::SmallVec;
use std::ffi::c_ulong;

pub const PRIMARY: usize = 0;
pub const SECONDARY: usize = 1;

#[derive(Debug, Clone, Copy)]
struct Handle(LadspaHandle);

pub struct InstanceSlots {
    descriptor: Descriptor,
    slots: SmallVec<[Handle; 2]>,
}

// SAFETY: LADSPA handles carry no thread affinity. The adapter only calls into
// them from one thread at a time (control thread during reload, audio thread
// during process), which `&mut self` on every call enforces.
unsafe impl Send for InstanceSlots {}

impl InstanceSlots {
    /// Instantiate the primary slot. `None` if the plugin returns a null handle.
    pub fn instantiate(descriptor: Descriptor, sample_rate: f64) -> Option<Self> {
        let handle = Self::create(&descriptor, sample_rate)?;
        let mut slots = SmallVec::new();
        slots.push(handle);
        Some(Self { descriptor, slots })
    }

    fn create(descriptor: &Descriptor, sample_rate: f64) -> Option<Handle> {
        let instantiate = descriptor.raw().instantiate?;
        // SAFETY: the descriptor comes from a loaded library; LADSPA takes the
        // rate as an integer.
        let handle = unsafe { instantiate(descriptor.as_ptr(), sample_rate as c_ulong) };
        (!handle.is_null()).then_some(Handle(handle))
    }

    /// Create the secondary slot if it does not exist yet.
    pub fn ensure_secondary(&mut self, sample_rate: f64) -> bool {
        if self.slots.len() > SECONDARY {
            return true;
        }
        match Self::create(&self.descriptor, sample_rate) {
            Some(handle) => {
                self.slots.push(handle);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn has_secondary(&self) -> bool {
        self.slots.len() > SECONDARY
    }

    /// Bind `port` on one slot. `data` may be null to leave the port unconnected.
    pub fn connect_port(&mut self, slot: usize, port: u32, data: *mut LadspaData) {
        let (Some(connect), Some(handle)) = (self.descriptor.raw().connect_port, self.slots.get(slot))
        else {
            return;
        };
        // SAFETY: `data` is null or stays valid until the port is rebound or
        // the slot is cleaned up; callers uphold this.
        unsafe { connect(handle.0, port as c_ulong, data) };
    }

    /// Bind `port` on every slot (control ports).
    pub fn connect_port_all(&mut self, port: u32, data: *mut LadspaData) {
        for slot in 0..self.slots.len() {
            self.connect_port(slot, port, data);
        }
    }

    pub fn activate(&mut self, slot: usize) {
        if let (Some(activate), Some(handle)) = (self.descriptor.raw().activate, self.slots.get(slot)) {
            // SAFETY: every port of the slot is connected before activation.
            unsafe { activate(handle.0) };
        }
    }

    pub fn deactivate(&mut self, slot: usize) {
        if let (Some(deactivate), Some(handle)) =
            (self.descriptor.raw().deactivate, self.slots.get(slot))
        {
            // SAFETY: handle is live.
            unsafe { deactivate(handle.0) };
        }
    }

    pub fn activate_all(&mut self) {
        for slot in 0..self.slots.len() {
            self.activate(slot);
        }
    }

    pub fn deactivate_all(&mut self) {
        for slot in 0..self.slots.len() {
            self.deactivate(slot);
        }
    }

    pub fn run(&mut self, slot: usize, frames: u32) {
        if let (Some(run), Some(handle)) = (self.descriptor.raw().run, self.slots.get(slot)) {
            // SAFETY: connected buffers hold at least `frames` samples.
            unsafe { run(handle.0, frames as c_ulong) };
        }
    }

    pub fn run_all(&mut self, frames: u32) {
        for slot in 0..self.slots.len() {
            self.run(slot, frames);
        }
    }
}

impl Drop for InstanceSlots {
    fn drop(&mut self) {
        let Some(cleanup) = self.descriptor.raw().cleanup else {
            return;
        };
        for handle in self.slots.drain(..) {
            // SAFETY: each handle is cleaned up exactly once, here.
            unsafe { cleanup(handle.0) };
        }
    }
}

impl std::fmt::Debug for InstanceSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceSlots")
            .field("descriptor", &self.descriptor)
            .field("slots", &self.slots.len())
            .finish()
    }
}

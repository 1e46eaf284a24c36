//! Audio/event port bindings and the scratch buffers plugins run on.
//!
//! Scratch buffers are handed to foreign code as raw pointers, so they are
//! allocated once per reload or buffer-size change and addressed only through
//! that pointer afterwards.

use rackhost_core::{PortId, ProcessMode};
use std::ptr::NonNull;

/// One logical audio channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPort {
    pub engine_handle: PortId,
    pub foreign_index: u32,
    /// Instance slot the channel is wired to.
    pub slot: usize,
}

/// Heap block of samples with a fixed length.
pub struct ScratchBuffer {
    ptr: NonNull<f32>,
    len: usize,
}

// SAFETY: the buffer is uniquely owned; sharing with foreign code happens only
// through pointers handed out while the owner is borrowed mutably.
unsafe impl Send for ScratchBuffer {}

impl ScratchBuffer {
    pub fn zeroed(len: usize) -> Self {
        let boxed: Box<[f32]> = vec![0.0; len.max(1)].into_boxed_slice();
        let len = boxed.len();
        let ptr = NonNull::from(Box::leak(boxed)).cast::<f32>();
        Self { ptr, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer for binding to a foreign port.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.ptr.as_ptr()
    }

    /// First `frames` samples (capped to the buffer length).
    #[inline]
    pub fn head(&self, frames: usize) -> &[f32] {
        // SAFETY: `ptr` owns `len` initialized floats.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), frames.min(self.len)) }
    }

    #[inline]
    pub fn head_mut(&mut self, frames: usize) -> &mut [f32] {
        // SAFETY: as above, and `&mut self` makes the borrow unique.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), frames.min(self.len)) }
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        let slice = std::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len);
        // SAFETY: reconstructs the box leaked in `zeroed`.
        drop(unsafe { Box::from_raw(slice) });
    }
}

impl std::fmt::Debug for ScratchBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchBuffer").field("len", &self.len).finish()
    }
}

/// Per-channel scratch storage, keyed by port position.
#[derive(Debug, Default)]
pub struct ScratchArena {
    frames: u32,
    pub inputs: Vec<ScratchBuffer>,
    pub outputs: Vec<ScratchBuffer>,
}

impl ScratchArena {
    /// Replace every buffer. Foreign bindings must be redone afterwards.
    pub fn reallocate(&mut self, inputs: usize, outputs: usize, frames: u32) {
        self.frames = frames;
        self.inputs = (0..inputs).map(|_| ScratchBuffer::zeroed(frames as usize)).collect();
        self.outputs = (0..outputs).map(|_| ScratchBuffer::zeroed(frames as usize)).collect();
    }

    #[inline]
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

/// Port layout of one adapter, rebuilt on every reload.
#[derive(Debug, Default)]
pub struct PortSet {
    pub audio_in: Vec<AudioPort>,
    pub audio_out: Vec<AudioPort>,
    pub event_in: Option<PortId>,
    pub event_out: Option<PortId>,
    pub scratch: ScratchArena,
    /// Input history used for latency compensation, one block per input.
    latency_history: Vec<Box<[f32]>>,
}

impl PortSet {
    #[inline]
    pub fn audio_in_count(&self) -> usize {
        self.audio_in.len()
    }

    #[inline]
    pub fn audio_out_count(&self) -> usize {
        self.audio_out.len()
    }

    pub fn recreate_latency_history(&mut self, latency: u32) {
        self.latency_history = if latency == 0 {
            Vec::new()
        } else {
            (0..self.audio_in.len())
                .map(|_| vec![0.0; latency as usize].into_boxed_slice())
                .collect()
        };
    }

    pub fn clear_latency_history(&mut self) {
        for history in &mut self.latency_history {
            history.fill(0.0);
        }
    }

    pub fn latency_history(&self, channel: usize) -> Option<&[f32]> {
        self.latency_history.get(channel).map(|h| &h[..])
    }

    /// Bind every audio port's scratch buffer on its slot.
    pub fn bind_audio(&mut self, mut connect: impl FnMut(usize, u32, *mut f32)) {
        for (port, buffer) in self.audio_in.iter().zip(self.scratch.inputs.iter_mut()) {
            connect(port.slot, port.foreign_index, buffer.as_mut_ptr());
        }
        for (port, buffer) in self.audio_out.iter().zip(self.scratch.outputs.iter_mut()) {
            connect(port.slot, port.foreign_index, buffer.as_mut_ptr());
        }
    }
}

/// Engine-facing name of a port: `"<plugin>:<port>"` in single-client mode,
/// cut to `max_len` bytes on a character boundary.
pub fn port_name(mode: ProcessMode, plugin: &str, port: &str, max_len: usize) -> String {
    let mut name = if mode.prefixes_port_names() {
        format!("{plugin}:{port}")
    } else {
        port.to_owned()
    };
    truncate_on_char_boundary(&mut name, max_len);
    name
}

/// Name of the duplicated channel under forced stereo.
pub fn stereo_pair_name(base: &str, max_len: usize) -> String {
    let mut name = format!("{base}_2");
    truncate_on_char_boundary(&mut name, max_len);
    name
}

fn truncate_on_char_boundary(name: &mut String, max_len: usize) {
    if name.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    name.truncate(cut);
}

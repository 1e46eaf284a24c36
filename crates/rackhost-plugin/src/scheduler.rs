//! Sample-accurate splitting of a block around incoming events.

use crate::postproc::balance_from_cc;
use rackhost_core::{midi_cc, EngineEvent};

/// One step of a block walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    /// Run the plugin over `[offset, offset + frames)`.
    Run { offset: u32, frames: u32 },
    /// Apply an event at the current position.
    Event(&'a EngineEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventScheduler {
    /// When false the block is run once at the end, after every event is applied.
    pub sample_accurate: bool,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self {
            sample_accurate: true,
        }
    }
}

impl EventScheduler {
    pub fn new(sample_accurate: bool) -> Self {
        Self { sample_accurate }
    }

    /// Walk `events` over a block of `frames` samples starting at `frames_offset`.
    ///
    /// Event times are absolute; events outside `[frames_offset,
    /// frames_offset + frames)` are skipped. Run steps cover the block exactly
    /// once, split at every event that lands later than the previous split.
    pub fn walk<'a>(
        &self,
        events: &'a [EngineEvent],
        frames: u32,
        frames_offset: u32,
        mut step: impl FnMut(Step<'a>),
    ) {
        let mut time_offset = 0u32;

        for event in events {
            let time = event.time.wrapping_sub(frames_offset);
            if time >= frames {
                continue;
            }
            // An event earlier than the last split applies at that split.
            if time > time_offset && self.sample_accurate {
                step(Step::Run {
                    offset: time_offset,
                    frames: time - time_offset,
                });
                time_offset = time;
            }

            step(Step::Event(event));
        }

        if frames > time_offset {
            step(Step::Run {
                offset: time_offset,
                frames: frames - time_offset,
            });
        }
    }
}

/// Capability flags that gate the reserved controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservedCaps {
    pub dry_wet: bool,
    pub volume: bool,
    pub balance: bool,
}

/// A controller change consumed by the host itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReservedControl {
    DryWet(f32),
    Volume(f32),
    Balance { left: f32, right: f32 },
}

/// Map a normalized controller change on the control channel to a host control.
///
/// `None` means the change belongs to plugin parameters.
pub fn route_reserved(cc: u16, value: f32, caps: ReservedCaps) -> Option<ReservedControl> {
    match cc {
        midi_cc::BREATH_CONTROLLER if caps.dry_wet => Some(ReservedControl::DryWet(value)),
        midi_cc::CHANNEL_VOLUME if caps.volume => {
            Some(ReservedControl::Volume(value * 127.0 / 100.0))
        }
        midi_cc::BALANCE if caps.balance => {
            let (left, right) = balance_from_cc(value);
            Some(ReservedControl::Balance { left, right })
        }
        _ => None,
    }
}

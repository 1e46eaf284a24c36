//! Engine events and the fixed-capacity event ports that carry them.

use serde::{Deserialize, Serialize};

/// Events an [`EventPort`] can hold per callback.
pub const MAX_EVENTS_PER_PORT: usize = 512;

/// Number of MIDI channels.
pub const MAX_MIDI_CHANNELS: u8 = 16;

/// Reserved MIDI controller numbers.
pub mod midi_cc {
    /// Drives dry/wet.
    pub const BREATH_CONTROLLER: u16 = 0x02;
    /// Drives volume.
    pub const CHANNEL_VOLUME: u16 = 0x07;
    /// Drives balance (pan law over the output pairs).
    pub const BALANCE: u16 = 0x08;
    /// Highest valid controller number.
    pub const MAX: u16 = 0x77;
}

/// Control event flavours, as written with [`EventPort::write_control_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlEventType {
    Parameter,
    MidiBank,
    MidiProgram,
    AllSoundOff,
    AllNotesOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Controller change; `value` is normalized to `[0, 1]`.
    ControlChange { param: u16, value: f32 },
    MidiBank(u16),
    MidiProgram(u16),
    AllSoundOff,
    AllNotesOff,
    /// Raw MIDI bytes (note data etc.).
    Midi { data: [u8; 4], size: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    /// Absolute frame time; adapters subtract the callback's base offset.
    pub time: u32,
    pub channel: u8,
    pub kind: EventKind,
}

impl EngineEvent {
    pub fn control_change(time: u32, channel: u8, param: u16, value: f32) -> Self {
        Self {
            time,
            channel,
            kind: EventKind::ControlChange { param, value },
        }
    }

    pub fn all_sound_off(time: u32, channel: u8) -> Self {
        Self {
            time,
            channel,
            kind: EventKind::AllSoundOff,
        }
    }

    pub fn midi(time: u32, channel: u8, bytes: &[u8]) -> Self {
        let mut data = [0u8; 4];
        let size = bytes.len().min(4);
        data[..size].copy_from_slice(&bytes[..size]);
        Self {
            time,
            channel,
            kind: EventKind::Midi {
                data,
                size: size as u8,
            },
        }
    }
}

/// Shared event port.
///
/// Storage is reserved once; writes beyond [`MAX_EVENTS_PER_PORT`] are dropped,
/// so both sides can use it from the audio thread.
#[derive(Debug, Clone)]
pub struct EventPort {
    is_input: bool,
    events: Vec<EngineEvent>,
}

impl EventPort {
    pub fn new(is_input: bool) -> Self {
        Self {
            is_input,
            events: Vec::with_capacity(MAX_EVENTS_PER_PORT),
        }
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        self.is_input
    }

    #[inline]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn event(&self, index: usize) -> Option<&EngineEvent> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Append an event. Returns false when the port is full.
    #[inline]
    pub fn push(&mut self, event: EngineEvent) -> bool {
        if self.events.len() >= MAX_EVENTS_PER_PORT {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Write a control event.
    ///
    /// `value` must already be normalized; it is clamped to `[0, 1]`.
    pub fn write_control_event(
        &mut self,
        time: u32,
        channel: u8,
        kind: ControlEventType,
        param: u16,
        value: f32,
    ) -> bool {
        if channel >= MAX_MIDI_CHANNELS {
            return false;
        }
        let kind = match kind {
            ControlEventType::Parameter => EventKind::ControlChange {
                param,
                value: value.clamp(0.0, 1.0),
            },
            ControlEventType::MidiBank => EventKind::MidiBank(param),
            ControlEventType::MidiProgram => EventKind::MidiProgram(param),
            ControlEventType::AllSoundOff => EventKind::AllSoundOff,
            ControlEventType::AllNotesOff => EventKind::AllNotesOff,
        };
        self.push(EngineEvent {
            time,
            channel,
            kind,
        })
    }

    /// Called by the engine between callbacks.
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

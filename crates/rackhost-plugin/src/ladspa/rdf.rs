//! Auxiliary plugin metadata (LADSPA RDF).
//!
//! Supplied by the caller alongside the library; it adds units, scale points,
//! defaults and a classification that the binary descriptor lacks. Ports are
//! matched by order, so metadata that disagrees with the descriptor is dropped.

use super::library::Descriptor;
use crate::metadata::PluginCategory;
use serde::{Deserialize, Serialize};

/// RDF plugin classes. A plugin may belong to several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdfClass {
    Utility,
    Generator,
    Simulator,
    Oscillator,
    Time,
    Delay,
    Phaser,
    Flanger,
    Chorus,
    Reverb,
    Frequency,
    FrequencyMeter,
    Filter,
    Lowpass,
    Highpass,
    Bandpass,
    Comb,
    Allpass,
    Eq,
    ParaEq,
    MultiEq,
    Amplitude,
    Pitch,
    Amplifier,
    Waveshaper,
    Modulator,
    Distortion,
    Dynamics,
    Compressor,
    Expander,
    Limiter,
    Gate,
    Spectral,
}

impl RdfClass {
    fn in_dynamics(self) -> bool {
        matches!(
            self,
            Self::Dynamics | Self::Compressor | Self::Expander | Self::Limiter | Self::Gate
        )
    }

    fn in_amplitude(self) -> bool {
        matches!(
            self,
            Self::Amplitude
                | Self::Amplifier
                | Self::Waveshaper
                | Self::Modulator
                | Self::Distortion
        ) || self.in_dynamics()
    }

    fn in_eq(self) -> bool {
        matches!(self, Self::Eq | Self::ParaEq | Self::MultiEq)
    }

    fn in_filter(self) -> bool {
        matches!(
            self,
            Self::Filter
                | Self::Lowpass
                | Self::Highpass
                | Self::Bandpass
                | Self::Comb
                | Self::Allpass
        ) || self.in_eq()
    }

    fn in_frequency(self) -> bool {
        matches!(
            self,
            Self::Frequency | Self::FrequencyMeter | Self::Pitch | Self::Spectral
        ) || self.in_filter()
    }

    fn in_simulator(self) -> bool {
        matches!(self, Self::Simulator | Self::Reverb)
    }

    fn in_time(self) -> bool {
        matches!(
            self,
            Self::Time | Self::Delay | Self::Phaser | Self::Flanger | Self::Chorus | Self::Reverb
        )
    }

    fn in_generator(self) -> bool {
        matches!(self, Self::Generator | Self::Oscillator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdfUnit {
    Db,
    Coef,
    Hz,
    Seconds,
    Milliseconds,
    Minutes,
}

impl RdfUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            RdfUnit::Db => "dB",
            RdfUnit::Coef => "(coef)",
            RdfUnit::Hz => "Hz",
            RdfUnit::Seconds => "s",
            RdfUnit::Milliseconds => "ms",
            RdfUnit::Minutes => "min",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalePoint {
    pub value: f32,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdfPort {
    pub label: Option<String>,
    pub default: Option<f32>,
    pub unit: Option<RdfUnit>,
    pub scale_points: Vec<ScalePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdfDescriptor {
    pub unique_id: u64,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub classes: Vec<RdfClass>,
    /// One entry per descriptor port, in port order.
    pub ports: Vec<RdfPort>,
}

impl RdfDescriptor {
    /// Whether this metadata describes `descriptor`.
    pub fn matches(&self, descriptor: &Descriptor) -> bool {
        self.unique_id == descriptor.unique_id()
            && self.ports.len() == descriptor.port_count() as usize
    }

    pub fn port(&self, index: u32) -> Option<&RdfPort> {
        self.ports.get(index as usize)
    }

    pub fn category(&self) -> Option<PluginCategory> {
        let any = |f: fn(RdfClass) -> bool| self.classes.iter().any(|&c| f(c));

        // Specific classes win over the broad groups they belong to.
        if any(|c| matches!(c, RdfClass::Delay | RdfClass::Reverb)) {
            return Some(PluginCategory::Delay);
        }
        if any(|c| matches!(c, RdfClass::Phaser | RdfClass::Flanger | RdfClass::Chorus)) {
            return Some(PluginCategory::Modulator);
        }
        if any(|c| c == RdfClass::Amplifier) {
            return Some(PluginCategory::Dynamics);
        }
        if any(|c| {
            matches!(
                c,
                RdfClass::Utility | RdfClass::Spectral | RdfClass::FrequencyMeter
            )
        }) {
            return Some(PluginCategory::Utility);
        }

        if any(RdfClass::in_dynamics) {
            return Some(PluginCategory::Dynamics);
        }
        if any(RdfClass::in_amplitude) {
            return Some(PluginCategory::Modulator);
        }
        if any(RdfClass::in_eq) {
            return Some(PluginCategory::Eq);
        }
        if any(RdfClass::in_filter) {
            return Some(PluginCategory::Filter);
        }
        if any(RdfClass::in_frequency) {
            return Some(PluginCategory::Utility);
        }
        if any(RdfClass::in_simulator) {
            return Some(PluginCategory::Other);
        }
        if any(RdfClass::in_time) {
            return Some(PluginCategory::Delay);
        }
        if any(RdfClass::in_generator) {
            return Some(PluginCategory::Synth);
        }
        None
    }
}

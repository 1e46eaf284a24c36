//! Descriptive information about a loaded plugin.

use crate::adapter::PluginType;
use serde::{Deserialize, Serialize};

/// Audio I/O configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioIO {
    /// Number of audio input channels
    pub inputs: usize,
    /// Number of audio output channels
    pub outputs: usize,
}

impl AudioIO {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginCategory {
    #[default]
    None,
    Synth,
    Delay,
    Eq,
    Filter,
    Dynamics,
    Modulator,
    Utility,
    Other,
}

impl PluginCategory {
    /// Guess a category from a plugin's display name.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

        if has(&["delay", "echo", "reverb"]) {
            return PluginCategory::Delay;
        }
        if has(&["filter", "lowpass", "highpass", "bandpass"]) {
            return PluginCategory::Filter;
        }
        if has(&[
            "dynamic",
            "amplifier",
            "compressor",
            "enhancer",
            "exciter",
            "gate",
            "limiter",
        ]) {
            return PluginCategory::Dynamics;
        }
        if has(&[
            "modulator",
            "chorus",
            "flanger",
            "phaser",
            "saturator",
            "tremolo",
            "vibrato",
        ]) {
            return PluginCategory::Modulator;
        }
        if name.contains("equalizer") || name.split_whitespace().any(|w| w == "eq") {
            return PluginCategory::Eq;
        }
        if has(&["utility", "analyzer", "converter", "meter", "mixer"]) {
            return PluginCategory::Utility;
        }
        if has(&["synth", "generator", "oscillator"]) {
            return PluginCategory::Synth;
        }
        PluginCategory::None
    }
}

/// Plugin description as presented to the host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub plugin_type: PluginType,

    /// Unique display name given by the engine
    pub name: String,

    /// Descriptor name, or the auxiliary title when one is known
    pub real_name: String,

    pub label: String,

    pub maker: String,

    pub copyright: String,

    pub unique_id: u64,

    pub category: PluginCategory,

    /// Audio I/O after the last reload (forced stereo included)
    pub audio_io: AudioIO,

    /// Plugin latency in samples
    pub latency_samples: u32,
}

impl PluginMetadata {
    pub fn new(plugin_type: PluginType, name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            plugin_type,
            real_name: name.clone(),
            name,
            label: label.into(),
            maker: String::new(),
            copyright: String::new(),
            unique_id: 0,
            category: PluginCategory::None,
            audio_io: AudioIO::default(),
            latency_samples: 0,
        }
    }

    pub fn real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = real_name.into();
        self
    }

    pub fn maker(mut self, maker: impl Into<String>) -> Self {
        self.maker = maker.into();
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn unique_id(mut self, unique_id: u64) -> Self {
        self.unique_id = unique_id;
        self
    }

    pub fn category(mut self, category: PluginCategory) -> Self {
        self.category = category;
        self
    }
}

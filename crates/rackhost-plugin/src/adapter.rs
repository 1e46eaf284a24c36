//! Format-independent plugin interface and the factory that builds adapters.

use crate::error::{PluginError, Result};
use crate::handle::PluginHandle;
use crate::ladspa::{self, LadspaLibrary, RdfDescriptor};
use crate::metadata::PluginMetadata;
use crate::postproc::PostCaps;
use crate::scheduler::ReservedCaps;
use rackhost_core::{Engine, EventPort, Parameter, PoolConfig, ProcessMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginType {
    Ladspa,
    Dssi,
    Lv2,
    Vst,
}

impl std::fmt::Display for PluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginType::Ladspa => write!(f, "LADSPA"),
            PluginType::Dssi => write!(f, "DSSI"),
            PluginType::Lv2 => write!(f, "LV2"),
            PluginType::Vst => write!(f, "VST"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Run a second instance so a mono plugin presents a stereo pair.
    pub force_stereo: bool,
    /// Apply events, then run the whole block once (no sample-accurate splits).
    pub fixed_buffer: bool,
    /// Sizing of the post-event and parameter-edit pools.
    pub event_pool: PoolConfig,
}

/// What to load.
#[derive(Debug, Clone)]
pub struct Initializer {
    pub plugin_type: PluginType,
    pub filename: PathBuf,
    /// Requested display name; falls back to the metadata title, descriptor name, then label.
    pub name: Option<String>,
    pub label: String,
    pub options: PluginOptions,
    pub rdf: Option<RdfDescriptor>,
}

impl Initializer {
    pub fn ladspa(filename: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            plugin_type: PluginType::Ladspa,
            filename: filename.into(),
            name: None,
            label: label.into(),
            options: PluginOptions::default(),
            rdf: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn options(mut self, options: PluginOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rdf(mut self, rdf: RdfDescriptor) -> Self {
        self.rdf = Some(rdf);
        self
    }
}

/// Capabilities derived from the audio port layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginCaps {
    pub dry_wet: bool,
    pub volume: bool,
    pub balance: bool,
    pub force_stereo: bool,
}

impl PluginCaps {
    pub fn from_layout(audio_ins: usize, audio_outs: usize) -> Self {
        Self {
            dry_wet: audio_outs > 0 && (audio_ins == audio_outs || audio_ins == 1),
            volume: audio_outs > 0,
            balance: audio_outs >= 2 && audio_outs % 2 == 0,
            force_stereo: audio_ins <= 2
                && audio_outs <= 2
                && (audio_ins == audio_outs || audio_ins == 0 || audio_outs == 0),
        }
    }

    pub fn post(self) -> PostCaps {
        PostCaps {
            dry_wet: self.dry_wet,
            volume: self.volume,
            balance: self.balance,
        }
    }

    pub fn reserved(self) -> ReservedCaps {
        ReservedCaps {
            dry_wet: self.dry_wet,
            volume: self.volume,
            balance: self.balance,
        }
    }
}

/// Event ports and timing of one callback.
#[derive(Debug, Default)]
pub struct ProcessContext<'a> {
    pub event_in: Option<&'a EventPort>,
    pub event_out: Option<&'a mut EventPort>,
    /// Absolute frame of the block start; event times are relative to the same origin.
    pub frames_offset: u32,
}

impl<'a> ProcessContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(mut self, port: &'a EventPort) -> Self {
        self.event_in = Some(port);
        self
    }

    pub fn output(mut self, port: &'a mut EventPort) -> Self {
        self.event_out = Some(port);
        self
    }

    pub fn offset(mut self, frames_offset: u32) -> Self {
        self.frames_offset = frames_offset;
        self
    }
}

/// Common interface of every plugin format.
///
/// `reload`, the `set_*` methods and the info getters run on the control
/// thread; `process` runs on the audio thread and never fails.
pub trait PluginAdapter: Send {
    fn plugin_type(&self) -> PluginType;

    fn metadata(&self) -> &PluginMetadata;

    fn caps(&self) -> PluginCaps;

    /// Control handle sharing this adapter's state.
    fn handle(&self) -> PluginHandle;

    /// Rebuild ports and parameters from the plugin descriptor.
    fn reload(&mut self);

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: u32,
        ctx: &mut ProcessContext<'_>,
    );

    fn buffer_size_changed(&mut self, frames: u32);

    fn sample_rate_changed(&mut self, sample_rate: f64) -> Result<()>;

    fn audio_in_count(&self) -> usize;

    fn audio_out_count(&self) -> usize;

    fn latency(&self) -> u32;

    fn parameter_count(&self) -> u32;

    fn parameter(&self, id: u32) -> Option<&Parameter>;

    fn parameter_value(&self, id: u32) -> f32;

    /// Fix `value` to the parameter's range and hints, store it, return what was stored.
    fn set_parameter_value(&mut self, id: u32, value: f32) -> Option<f32>;

    fn set_parameter_midi(&mut self, id: u32, channel: u8, cc: i16) -> bool;

    fn parameter_name(&self, id: u32) -> Option<String>;

    fn parameter_symbol(&self, id: u32) -> Option<String>;

    fn parameter_unit(&self, id: u32) -> Option<String>;

    fn parameter_scale_point_count(&self, id: u32) -> u32;

    fn parameter_scale_point(&self, id: u32, point: u32) -> Option<(f32, String)>;

    /// Channel on which the reserved controllers and all-sound-off are honored.
    fn ctrl_in_channel(&self) -> u8;

    fn set_ctrl_in_channel(&mut self, channel: u8);
}

impl std::fmt::Debug for dyn PluginAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginAdapter")
            .field("type", &self.plugin_type())
            .field("name", &self.metadata().name)
            .finish_non_exhaustive()
    }
}

/// Load and reload a plugin described by `init`.
///
/// On failure the engine's last error holds a readable message.
pub fn new_plugin(engine: Arc<dyn Engine>, init: &Initializer) -> Result<Box<dyn PluginAdapter>> {
    match init.plugin_type {
        PluginType::Ladspa => {
            let library = LadspaLibrary::open(&init.filename).inspect_err(|e| {
                engine.set_last_error(&e.to_string());
            })?;
            let plugin = ladspa::new_ladspa(engine, library, init)?;
            Ok(Box::new(plugin))
        }
        other => {
            let err = PluginError::Unsupported(format!("{other} plugins are not supported"));
            engine.set_last_error(&err.to_string());
            Err(err)
        }
    }
}

/// Reject plugins a continuous rack cannot host.
pub(crate) fn check_rack_mode(engine: &dyn Engine, caps: PluginCaps) -> Result<()> {
    if engine.process_mode() == ProcessMode::ContinuousRack && !caps.force_stereo {
        let err =
            PluginError::Unsupported("rack mode can only work with mono or stereo plugins".into());
        engine.set_last_error(&err.to_string());
        return Err(err);
    }
    Ok(())
}

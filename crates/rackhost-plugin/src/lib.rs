//! Plugin adapters for rackhost
//!
//! Loads foreign audio plugins and runs them with sample-accurate automation,
//! optional forced stereo, and dry/wet, volume and balance post-processing.
//! Only the LADSPA format is implemented; the other [`PluginType`]s are
//! recognized and rejected.
//!
//! ## Usage
//!
//! ```ignore
//! use rackhost_core::{OfflineEngine, EventPort, HostConfig};
//! use rackhost_plugin::{new_plugin, Initializer, ProcessContext};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(OfflineEngine::new(&HostConfig::default()));
//! let mut plugin = new_plugin(engine, &Initializer::ladspa("/usr/lib/ladspa/amp.so", "amp_mono"))?;
//!
//! // Control thread: activate, then drive from the audio thread
//! let handle = plugin.handle();
//! handle.set_active(true).set_dry_wet(0.5);
//!
//! let input = vec![0.0f32; 512];
//! let mut output = vec![0.0f32; 512];
//! plugin.process(&[&input], &mut [&mut output], 512, &mut ProcessContext::new());
//! ```

pub mod error;
pub use error::{LoadStage, PluginError, Result};

mod adapter;
pub use adapter::{
    new_plugin, Initializer, PluginAdapter, PluginCaps, PluginOptions, PluginType,
    ProcessContext,
};

mod handle;
pub use handle::PluginHandle;

pub mod ladspa;
pub use ladspa::{LadspaLibrary, LadspaPlugin, RdfDescriptor};

mod metadata;
pub use metadata::{AudioIO, PluginCategory, PluginMetadata};

pub mod ports;
pub use ports::{AudioPort, PortSet};

pub mod postproc;
pub use postproc::{PostCaps, PostProcessor, PostState};

pub mod scheduler;
pub use scheduler::{EventScheduler, ReservedCaps, ReservedControl, Step};

mod shared;
pub use shared::{reserved, ParamEdit, PostEvent, PostEventKind};

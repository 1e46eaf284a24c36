//! # rackhost - realtime plugin host
//!
//! Umbrella crate over:
//! - **rackhost-core** - realtime pools and lists, parameters, event ports, engine contracts
//! - **rackhost-plugin** - plugin adapters (LADSPA), post-processing, event scheduling
//!
//! ## Quick Start
//!
//! ```ignore
//! use rackhost::prelude::*;
//!
//! let host = RackHost::builder()
//!     .sample_rate(48000.0)
//!     .buffer_size(256)
//!     .build()?;
//!
//! let (mut plugin, handle) = host
//!     .ladspa("/usr/lib/ladspa/amp.so", "amp_mono")
//!     .active(true)
//!     .build()?;
//!
//! handle.set_volume(0.8);
//! plugin.process(&[&input], &mut [&mut output], 256, &mut ProcessContext::new());
//!
//! for event in handle.drain_post_events() {
//!     println!("{event:?}");
//! }
//! ```

/// Re-export of rackhost-core for direct access
pub use rackhost_core as core;

/// Re-export of rackhost-plugin for direct access
pub use rackhost_plugin as plugin;

pub use rackhost_core::{
    EngineEvent, EventKind, EventPort, HostConfig, OfflineEngine, Parameter, ParameterType,
    PoolConfig, ProcessMode,
};
pub use rackhost_plugin::{
    Initializer, PluginAdapter, PluginCaps, PluginHandle, PluginMetadata, PluginOptions,
    PluginType, PostEvent, ProcessContext,
};

mod builder;
mod builders;
mod error;
mod host;

pub use builder::RackHostBuilder;
pub use builders::PluginBuilder;
pub use error::{Error, Result};
pub use host::RackHost;

/// Common imports for hosting plugins.
pub mod prelude {
    pub use crate::{
        EngineEvent, Error, EventKind, EventPort, PluginAdapter, PluginHandle, ProcessContext,
        ProcessMode, RackHost, Result,
    };
}

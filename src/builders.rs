//! Fluent builders for plugin loading.
//!
//! # Example
//!
//! ```ignore
//! let (mut amp, handle) = host
//!     .ladspa("/usr/lib/ladspa/amp.so", "amp_mono")
//!     .force_stereo(true)
//!     .param(0, 0.5)
//!     .active(true)
//!     .build()?;
//!
//! amp.process(&inputs, &mut outputs, frames, &mut ProcessContext::new());
//! ```

use crate::{RackHost, Result};
use rackhost_plugin::ladspa::ffi::DescriptorFn;
use rackhost_plugin::ladspa::{self, LadspaLibrary, RdfDescriptor};
use rackhost_plugin::{new_plugin, Initializer, PluginAdapter, PluginHandle};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Load a LADSPA plugin on the host's engine and apply the initial settings.
fn load_plugin(
    host: &RackHost,
    init: &Initializer,
    entry: Option<DescriptorFn>,
    params: &[(u32, f32)],
    active: bool,
) -> Result<(Box<dyn PluginAdapter>, PluginHandle)> {
    let mut plugin: Box<dyn PluginAdapter> = match entry {
        Some(entry) => {
            let library = LadspaLibrary::from_entry(init.filename.clone(), entry);
            Box::new(ladspa::new_ladspa(host.engine(), library, init)?)
        }
        None => new_plugin(host.engine(), init)?,
    };

    for &(id, value) in params {
        let name = plugin.metadata().name.clone();
        match plugin.set_parameter_value(id, value) {
            Some(stored) => debug!(plugin = %name, id, stored, "initial parameter"),
            None => warn!(plugin = %name, id, "no such parameter, ignoring"),
        }
    }

    let handle = plugin.handle();
    handle.set_active(active);
    Ok((plugin, handle))
}

/// Fluent builder for LADSPA plugins.
///
/// Created via [`RackHost::ladspa`]. Forced stereo defaults to the host's
/// configuration; everything else to off.
pub struct PluginBuilder<'a> {
    host: &'a RackHost,
    init: Initializer,
    entry: Option<DescriptorFn>,
    params: Vec<(u32, f32)>,
    active: bool,
}

impl<'a> PluginBuilder<'a> {
    pub(crate) fn new(host: &'a RackHost, path: PathBuf, label: String) -> Self {
        let mut init = Initializer::ladspa(path, label);
        init.options.force_stereo = host.config().force_stereo;
        init.options.event_pool = host.config().post_event_pool;
        Self {
            host,
            init,
            entry: None,
            params: Vec::new(),
            active: false,
        }
    }

    /// Requested client name; made unique by the engine.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.init = self.init.name(name);
        self
    }

    pub fn force_stereo(mut self, enabled: bool) -> Self {
        self.init.options.force_stereo = enabled;
        self
    }

    /// Run each block in one piece instead of splitting at event times.
    pub fn fixed_buffer(mut self, enabled: bool) -> Self {
        self.init.options.fixed_buffer = enabled;
        self
    }

    /// Auxiliary metadata (units, scale points, defaults) for the descriptor.
    pub fn rdf(mut self, rdf: RdfDescriptor) -> Self {
        self.init = self.init.rdf(rdf);
        self
    }

    /// Use a descriptor entry point linked into the binary instead of
    /// opening the path as a shared library.
    pub fn entry(mut self, entry: DescriptorFn) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Set a parameter by index once the plugin is loaded.
    pub fn param(mut self, id: u32, value: f32) -> Self {
        self.params.push((id, value));
        self
    }

    /// Start processing from the first callback. Default: inactive.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn build(self) -> Result<(Box<dyn PluginAdapter>, PluginHandle)> {
        load_plugin(
            self.host,
            &self.init,
            self.entry,
            &self.params,
            self.active,
        )
    }
}

use crate::metadata::PluginMetadata;
use crate::shared::{PluginShared, PostEvent};
use std::sync::Arc;

/// Control-thread handle for a loaded plugin (activation, mix controls, parameters).
/// Clone is cheap (Arc-based). Action methods return `&Self` for chaining.
#[derive(Clone)]
pub struct PluginHandle {
    shared: Arc<PluginShared>,
    metadata: PluginMetadata,
}

impl PluginHandle {
    pub(crate) fn new(shared: Arc<PluginShared>, metadata: PluginMetadata) -> Self {
        Self { shared, metadata }
    }

    /// Takes effect at the next callback; the edge activates or deactivates the plugin.
    pub fn set_active(&self, active: bool) -> &Self {
        self.shared.active.set(active);
        self
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }

    /// False while a reload is rebuilding the plugin.
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.get()
    }

    /// Clamped to `[0, 1]`.
    pub fn set_dry_wet(&self, value: f32) -> &Self {
        self.shared.set_dry_wet(value);
        self
    }

    /// Clamped to `[0, 1.27]`.
    pub fn set_volume(&self, value: f32) -> &Self {
        self.shared.set_volume(value);
        self
    }

    /// Clamped to `[-1, 1]`.
    pub fn set_balance_left(&self, value: f32) -> &Self {
        self.shared.set_balance_left(value);
        self
    }

    /// Clamped to `[-1, 1]`.
    pub fn set_balance_right(&self, value: f32) -> &Self {
        self.shared.set_balance_right(value);
        self
    }

    pub fn dry_wet(&self) -> f32 {
        self.shared.dry_wet.get()
    }

    pub fn volume(&self) -> f32 {
        self.shared.volume.get()
    }

    pub fn balance(&self) -> (f32, f32) {
        (
            self.shared.balance_left.get(),
            self.shared.balance_right.get(),
        )
    }

    /// Queue a parameter change for the audio thread; applied at the start of the
    /// next callback. Dropped (with a warning) if the edit pool is exhausted.
    pub fn set_parameter_rt(&self, param_id: u32, value: f32) -> &Self {
        if let Err(e) = self.shared.post_param_edit(param_id, value) {
            tracing::warn!(plugin = %self.metadata.name, param_id, error = %e, "parameter edit dropped");
        }
        self
    }

    /// Notifications raised by the audio thread since the last call, in order.
    pub fn drain_post_events(&self) -> Vec<PostEvent> {
        self.shared.post_events.drain()
    }

    pub fn latency(&self) -> u32 {
        self.shared.latency.get()
    }

    /// Metadata as of handle creation.
    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("name", &self.metadata.name)
            .field("active", &self.is_active())
            .finish()
    }
}

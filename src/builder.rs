//! Builder for configuring and constructing a `RackHost`.

use crate::{RackHost, Result};
use rackhost_core::{HostConfig, PoolConfig, ProcessMode};

/// Fluent configuration for a [`RackHost`].
///
/// # Example
///
/// ```
/// use rackhost::RackHost;
/// use rackhost::core::ProcessMode;
///
/// let host = RackHost::builder()
///     .sample_rate(44100.0)
///     .buffer_size(256)
///     .process_mode(ProcessMode::ContinuousRack)
///     .build()
///     .unwrap();
///
/// assert_eq!(host.sample_rate(), 44100.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RackHostBuilder {
    config: HostConfig,
}

impl RackHostBuilder {
    /// Start from an existing configuration (e.g. deserialized from disk).
    pub fn from_config(config: HostConfig) -> Self {
        Self { config }
    }

    /// Default: 48000
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Default: 512
    pub fn buffer_size(mut self, frames: u32) -> Self {
        self.config.buffer_size = frames;
        self
    }

    /// Default: [`ProcessMode::MultipleClients`]
    pub fn process_mode(mut self, mode: ProcessMode) -> Self {
        self.config.process_mode = mode;
        self
    }

    pub fn max_port_name_size(mut self, len: usize) -> Self {
        self.config.max_port_name_size = len;
        self
    }

    /// Load mono plugins as stereo pairs unless a plugin builder overrides it.
    pub fn force_stereo(mut self, enabled: bool) -> Self {
        self.config.force_stereo = enabled;
        self
    }

    pub fn post_event_pool(mut self, pool: PoolConfig) -> Self {
        self.config.post_event_pool = pool;
        self
    }

    pub fn build(self) -> Result<RackHost> {
        self.config.validate()?;
        Ok(RackHost::new(self.config))
    }
}

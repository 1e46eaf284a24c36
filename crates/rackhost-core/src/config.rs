//! Host configuration.

use crate::engine::ProcessMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sizing of a realtime node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub min_preallocated: usize,
    pub max_preallocated: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_preallocated: 128,
            max_preallocated: 512,
        }
    }
}

/// Configuration for an engine hosting plugins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub sample_rate: f64,
    pub buffer_size: u32,
    pub process_mode: ProcessMode,
    pub max_port_name_size: usize,
    /// Duplicate mono plugins into a stereo pair by default.
    pub force_stereo: bool,
    /// Pool backing post-callback notifications and queued parameter edits.
    pub post_event_pool: PoolConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            buffer_size: 512,
            process_mode: ProcessMode::MultipleClients,
            max_port_name_size: 255,
            force_stereo: false,
            post_event_pool: PoolConfig::default(),
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8000.0 || self.sample_rate > 384000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.buffer_size == 0 {
            return Err(Error::InvalidConfig("buffer_size must be > 0".into()));
        }
        if self.max_port_name_size == 0 {
            return Err(Error::InvalidConfig(
                "max_port_name_size must be > 0".into(),
            ));
        }
        let pool = &self.post_event_pool;
        if pool.max_preallocated == 0 || pool.min_preallocated > pool.max_preallocated {
            return Err(Error::InvalidConfig(format!(
                "post_event_pool {}..{} is not a valid range",
                pool.min_preallocated, pool.max_preallocated
            )));
        }
        Ok(())
    }
}

//! RackHost owns the engine plugins register on.

use crate::builder::RackHostBuilder;
use crate::builders::PluginBuilder;
use rackhost_core::{Engine, HostConfig, OfflineEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Entry point for loading and driving plugins.
///
/// The engine is in-process and deterministic: the caller drives every
/// callback through [`rackhost_plugin::PluginAdapter::process`].
///
/// # Example
///
/// ```
/// use rackhost::RackHost;
///
/// let host = RackHost::builder().buffer_size(128).build().unwrap();
///
/// // No such library: the error is also kept on the engine.
/// assert!(host.ladspa("/nonexistent/amp.so", "amp").build().is_err());
/// assert!(host.last_error().contains("opening library"));
/// ```
pub struct RackHost {
    config: HostConfig,
    engine: Arc<OfflineEngine>,
}

impl RackHost {
    pub fn builder() -> RackHostBuilder {
        RackHostBuilder::default()
    }

    pub(crate) fn new(config: HostConfig) -> Self {
        let engine = Arc::new(OfflineEngine::new(&config));
        tracing::debug!(
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            mode = ?config.process_mode,
            "rack host created"
        );
        Self { config, engine }
    }

    pub fn sample_rate(&self) -> f64 {
        self.engine.sample_rate()
    }

    pub fn buffer_size(&self) -> u32 {
        self.engine.buffer_size()
    }

    /// Configuration the host was built with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The engine as adapters see it.
    pub fn engine(&self) -> Arc<dyn Engine> {
        self.engine.clone()
    }

    /// The engine with its inspection API (clients, ports, latency).
    pub fn offline(&self) -> &OfflineEngine {
        &self.engine
    }

    /// Message of the most recent load failure.
    pub fn last_error(&self) -> String {
        self.engine.last_error()
    }

    /// Start loading the descriptor labelled `label` from a LADSPA library.
    pub fn ladspa(&self, path: impl Into<PathBuf>, label: impl Into<String>) -> PluginBuilder<'_> {
        PluginBuilder::new(self, path.into(), label.into())
    }
}

impl std::fmt::Debug for RackHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RackHost")
            .field("config", &self.config)
            .field("clients", &self.engine.client_count())
            .finish()
    }
}

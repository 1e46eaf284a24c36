//! Contracts between plugin adapters and the engine hosting them.
//!
//! The engine owns timing (sample rate, block size), client and port
//! registration, and the last-error string surfaced to users. Adapters only
//! see these traits; [`crate::offline::OfflineEngine`] is the in-process
//! implementation.

use serde::{Deserialize, Serialize};

/// How plugin clients are exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProcessMode {
    /// One engine client shared by every plugin; port names carry a plugin prefix.
    SingleClient,
    /// One engine client per plugin.
    #[default]
    MultipleClients,
    /// Fixed stereo rack; only mono/stereo plugins are accepted.
    ContinuousRack,
    Patchbay,
    Bridge,
}

impl ProcessMode {
    /// Whether port names must be prefixed with the owning plugin's name.
    #[inline]
    pub fn prefixes_port_names(self) -> bool {
        matches!(self, Self::SingleClient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    Audio,
    Event,
}

/// Engine-side port identifier, stable for the lifetime of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(pub u32);

/// Engine services used by adapters. Control thread only.
pub trait Engine: Send + Sync {
    fn sample_rate(&self) -> f64;

    fn buffer_size(&self) -> u32;

    /// Longest port name the backend accepts, in bytes.
    fn max_port_name_size(&self) -> usize;

    fn process_mode(&self) -> ProcessMode;

    fn set_last_error(&self, message: &str);

    fn last_error(&self) -> String;

    /// Derive a display name from `hint` that no hosted plugin uses yet.
    fn unique_plugin_name(&self, hint: &str) -> String;

    /// Register a client. `None` when the backend refuses.
    fn add_client(&self, name: &str) -> Option<Box<dyn EngineClient>>;
}

/// Per-plugin registration on the engine.
pub trait EngineClient: Send {
    /// False if registration succeeded only partially and the client is unusable.
    fn is_ok(&self) -> bool;

    fn is_active(&self) -> bool;

    fn activate(&mut self);

    fn deactivate(&mut self);

    fn add_port(&mut self, kind: PortKind, name: &str, is_input: bool) -> PortId;

    /// Unregister every port added so far.
    fn clear_ports(&mut self);

    fn latency(&self) -> u32;

    fn set_latency(&mut self, samples: u32);
}

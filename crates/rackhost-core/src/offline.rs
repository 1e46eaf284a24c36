//! Deterministic in-process engine.
//!
//! No audio backend: the caller drives processing by hand. Client state is
//! kept inspectable so tests can assert on registered ports, latency and
//! activation.

use crate::config::HostConfig;
use crate::engine::{Engine, EngineClient, PortId, PortKind, ProcessMode};
use parking_lot::Mutex;
use std::sync::Arc;

/// A port as registered on an [`OfflineEngine`] client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub id: PortId,
    pub kind: PortKind,
    pub name: String,
    pub is_input: bool,
}

/// Snapshot of a client registered on an [`OfflineEngine`].
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub name: String,
    pub active: bool,
    pub latency: u32,
    pub ports: Vec<PortInfo>,
    /// Cleared when the owning adapter drops its client.
    pub registered: bool,
}

impl ClientInfo {
    pub fn ports_of(&self, kind: PortKind, is_input: bool) -> impl Iterator<Item = &PortInfo> {
        self.ports
            .iter()
            .filter(move |p| p.kind == kind && p.is_input == is_input)
    }
}

struct OfflineState {
    sample_rate: f64,
    buffer_size: u32,
    last_error: String,
    reject_clients: bool,
    clients: Vec<Arc<Mutex<ClientInfo>>>,
}

pub struct OfflineEngine {
    process_mode: ProcessMode,
    max_port_name_size: usize,
    state: Mutex<OfflineState>,
}

impl Default for OfflineEngine {
    fn default() -> Self {
        Self::new(&HostConfig::default())
    }
}

impl OfflineEngine {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            process_mode: config.process_mode,
            max_port_name_size: config.max_port_name_size,
            state: Mutex::new(OfflineState {
                sample_rate: config.sample_rate,
                buffer_size: config.buffer_size,
                last_error: String::new(),
                reject_clients: false,
                clients: Vec::new(),
            }),
        }
    }

    pub fn with_mode(process_mode: ProcessMode) -> Self {
        Self::new(&HostConfig {
            process_mode,
            ..Default::default()
        })
    }

    /// Make every following [`Engine::add_client`] call fail.
    pub fn set_reject_clients(&self, reject: bool) {
        self.state.lock().reject_clients = reject;
    }

    /// Adapters must be told separately (`buffer_size_changed`).
    pub fn set_buffer_size(&self, frames: u32) {
        self.state.lock().buffer_size = frames;
    }

    pub fn set_sample_rate(&self, rate: f64) {
        self.state.lock().sample_rate = rate;
    }

    /// Snapshot of the most recent registered client called `name`.
    pub fn client(&self, name: &str) -> Option<ClientInfo> {
        let state = self.state.lock();
        state
            .clients
            .iter()
            .rev()
            .map(|c| c.lock())
            .find(|c| c.registered && c.name == name)
            .map(|c| c.clone())
    }

    pub fn client_count(&self) -> usize {
        let state = self.state.lock();
        state.clients.iter().filter(|c| c.lock().registered).count()
    }
}

impl Engine for OfflineEngine {
    fn sample_rate(&self) -> f64 {
        self.state.lock().sample_rate
    }

    fn buffer_size(&self) -> u32 {
        self.state.lock().buffer_size
    }

    fn max_port_name_size(&self) -> usize {
        self.max_port_name_size
    }

    fn process_mode(&self) -> ProcessMode {
        self.process_mode
    }

    fn set_last_error(&self, message: &str) {
        self.state.lock().last_error = message.to_owned();
    }

    fn last_error(&self) -> String {
        self.state.lock().last_error.clone()
    }

    fn unique_plugin_name(&self, hint: &str) -> String {
        let state = self.state.lock();
        let taken = |name: &str| {
            state
                .clients
                .iter()
                .any(|c| {
                    let c = c.lock();
                    c.registered && c.name == name
                })
        };

        if !taken(hint) {
            return hint.to_owned();
        }
        (2u32..)
            .map(|n| format!("{hint} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| hint.to_owned())
    }

    fn add_client(&self, name: &str) -> Option<Box<dyn EngineClient>> {
        let mut state = self.state.lock();
        if state.reject_clients {
            tracing::debug!(client = name, "offline engine rejected client");
            return None;
        }

        let info = Arc::new(Mutex::new(ClientInfo {
            name: name.to_owned(),
            registered: true,
            ..Default::default()
        }));
        state.clients.push(Arc::clone(&info));

        Some(Box::new(OfflineClient {
            info,
            next_port: 0,
        }))
    }
}

struct OfflineClient {
    info: Arc<Mutex<ClientInfo>>,
    next_port: u32,
}

impl EngineClient for OfflineClient {
    fn is_ok(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        self.info.lock().active
    }

    fn activate(&mut self) {
        self.info.lock().active = true;
    }

    fn deactivate(&mut self) {
        self.info.lock().active = false;
    }

    fn add_port(&mut self, kind: PortKind, name: &str, is_input: bool) -> PortId {
        let id = PortId(self.next_port);
        self.next_port += 1;
        self.info.lock().ports.push(PortInfo {
            id,
            kind,
            name: name.to_owned(),
            is_input,
        });
        id
    }

    fn clear_ports(&mut self) {
        self.info.lock().ports.clear();
    }

    fn latency(&self) -> u32 {
        self.info.lock().latency
    }

    fn set_latency(&mut self, samples: u32) {
        self.info.lock().latency = samples;
    }
}

impl Drop for OfflineClient {
    fn drop(&mut self) {
        let mut info = self.info.lock();
        info.registered = false;
        info.active = false;
    }
}

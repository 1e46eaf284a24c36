//! Realtime primitives and engine contracts for plugin hosting.
//!
//! # Primary API
//!
//! - [`RtMemoryPool`] / [`RtList`]: pool-backed list usable from the audio thread
//! - [`deferred_queue`] / [`rt_inbox`]: audio ↔ control hand-off built on [`RtList`]
//! - [`ParameterTable`]: normalized control description plus value storage
//! - [`Engine`] / [`EngineClient`]: what adapters need from the hosting engine
//! - [`EventPort`]: per-callback control/MIDI event storage
//! - [`OfflineEngine`]: in-process engine for tests and tools
//!
//! # Example
//!
//! ```
//! use rackhost_core::{RtList, RtMemoryPool};
//!
//! let pool = RtMemoryPool::new(8, 32);
//! let mut pending = RtList::new(&pool);
//! let mut shared = RtList::new(&pool);
//!
//! pending.append(1).unwrap();
//! pending.append(2).unwrap();
//! shared.splice_append(&mut pending).unwrap();
//!
//! assert!(pending.is_empty());
//! assert_eq!(shared.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
//! ```

pub mod error;
pub use error::{Error, Result, RtListError};

pub mod config;
pub use config::{HostConfig, PoolConfig};

pub mod engine;
pub use engine::{Engine, EngineClient, PortId, PortKind, ProcessMode};

pub mod event;
pub use event::{
    midi_cc, ControlEventType, EngineEvent, EventKind, EventPort, MAX_EVENTS_PER_PORT,
    MAX_MIDI_CHANNELS,
};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat, AtomicFrames};

pub mod offline;
pub use offline::{ClientInfo, OfflineEngine, PortInfo};

pub mod parameter;
pub use parameter::{
    Parameter, ParameterHints, ParameterRange, ParameterTable, ParameterType, RANGE_EPSILON,
};

pub mod rt;
pub use rt::{
    deferred_queue, rt_inbox, DeferredQueue, DeferredReceiver, PoolId, RtInbox, RtInboxSender,
    RtList, RtMemoryPool,
};

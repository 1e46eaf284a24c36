//! Centralized error type for the rackhost umbrella crate.
//!
//! Wraps both subsystem errors so `?` propagates across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] rackhost_core::Error),

    #[error("Plugin: {0}")]
    Plugin(#[from] rackhost_plugin::PluginError),
}

pub type Result<T> = std::result::Result<T, Error>;

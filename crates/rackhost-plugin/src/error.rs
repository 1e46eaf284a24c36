//! Error types for plugin adapters

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Opening,
    Symbol,
    Lookup,
    Registration,
    Instantiation,
    Reload,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Opening => write!(f, "opening library"),
            LoadStage::Symbol => write!(f, "resolving entry point"),
            LoadStage::Lookup => write!(f, "looking up label"),
            LoadStage::Registration => write!(f, "registering client"),
            LoadStage::Instantiation => write!(f, "creating instance"),
            LoadStage::Reload => write!(f, "reloading"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin load failed at {stage} stage: {path}\n  Reason: {reason}")]
    LoadFailed {
        path: PathBuf,
        stage: LoadStage,
        reason: String,
    },

    #[error("Could not find the LADSPA descriptor '{symbol}' in the plugin library {path}")]
    MissingSymbol { path: PathBuf, symbol: &'static str },

    #[error("Could not find the requested plugin label '{label}' in the plugin library")]
    LabelNotFound { label: String },

    #[error("Failed to register plugin client '{name}'")]
    RegistrationFailed { name: String },

    #[error("Plugin '{label}' failed to initialize ({stage})")]
    InstantiateFailed { label: String, stage: LoadStage },

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Core(#[from] rackhost_core::Error),
}

impl PluginError {
    pub fn stage(&self) -> Option<LoadStage> {
        match self {
            PluginError::LoadFailed { stage, .. } => Some(*stage),
            PluginError::MissingSymbol { .. } => Some(LoadStage::Symbol),
            PluginError::LabelNotFound { .. } => Some(LoadStage::Lookup),
            PluginError::RegistrationFailed { .. } => Some(LoadStage::Registration),
            PluginError::InstantiateFailed { stage, .. } => Some(*stage),
            PluginError::Unsupported(_) | PluginError::Core(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;

//! State shared between an adapter (audio thread) and its control handle.

use crate::postproc::{
    MAX_VOLUME, NEUTRAL_BALANCE_LEFT, NEUTRAL_BALANCE_RIGHT, NEUTRAL_DRY_WET, NEUTRAL_VOLUME,
};
use rackhost_core::{
    AtomicFlag, AtomicFloat, AtomicFrames, DeferredReceiver, RtInboxSender, RtListError,
};

/// Post-event indices that do not name a plugin parameter.
pub mod reserved {
    pub const ACTIVE: i32 = -2;
    pub const DRYWET: i32 = -3;
    pub const VOLUME: i32 = -4;
    pub const BALANCE_LEFT: i32 = -5;
    pub const BALANCE_RIGHT: i32 = -6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PostEventKind {
    ParameterChange,
}

/// Notification raised on the audio thread, delivered to the control thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostEvent {
    pub kind: PostEventKind,
    /// Parameter index, or one of [`reserved`].
    pub index: i32,
    pub value: f32,
}

impl PostEvent {
    pub fn parameter(index: i32, value: f32) -> Self {
        Self {
            kind: PostEventKind::ParameterChange,
            index,
            value,
        }
    }
}

/// Parameter edit queued for the audio thread.
pub type ParamEdit = (u32, f32);

pub(crate) struct PluginShared {
    pub enabled: AtomicFlag,
    pub active: AtomicFlag,
    pub dry_wet: AtomicFloat,
    pub volume: AtomicFloat,
    pub balance_left: AtomicFloat,
    pub balance_right: AtomicFloat,
    /// Latency reported by the last reload.
    pub latency: AtomicFrames,
    pub post_events: DeferredReceiver<PostEvent>,
    pub param_edits: RtInboxSender<ParamEdit>,
}

impl PluginShared {
    pub fn new(
        post_events: DeferredReceiver<PostEvent>,
        param_edits: RtInboxSender<ParamEdit>,
    ) -> Self {
        Self {
            enabled: AtomicFlag::new(false),
            active: AtomicFlag::new(false),
            dry_wet: AtomicFloat::new(NEUTRAL_DRY_WET),
            volume: AtomicFloat::new(NEUTRAL_VOLUME),
            balance_left: AtomicFloat::new(NEUTRAL_BALANCE_LEFT),
            balance_right: AtomicFloat::new(NEUTRAL_BALANCE_RIGHT),
            latency: AtomicFrames::new(0),
            post_events,
            param_edits,
        }
    }

    pub fn set_dry_wet(&self, value: f32) -> f32 {
        let value = value.clamp(0.0, 1.0);
        self.dry_wet.set(value);
        value
    }

    pub fn set_volume(&self, value: f32) -> f32 {
        let value = value.clamp(0.0, MAX_VOLUME);
        self.volume.set(value);
        value
    }

    pub fn set_balance_left(&self, value: f32) -> f32 {
        let value = value.clamp(-1.0, 1.0);
        self.balance_left.set(value);
        value
    }

    pub fn set_balance_right(&self, value: f32) -> f32 {
        let value = value.clamp(-1.0, 1.0);
        self.balance_right.set(value);
        value
    }

    pub fn post_param_edit(&self, index: u32, value: f32) -> Result<(), RtListError> {
        self.param_edits.post((index, value))
    }
}

/// Keeps the plugin disabled while the audio topology is rebuilt.
///
/// Restores the previous enabled state on drop, including early returns.
pub(crate) struct ScopedDisabler<'a> {
    shared: &'a PluginShared,
    was_enabled: bool,
}

impl<'a> ScopedDisabler<'a> {
    pub fn new(shared: &'a PluginShared) -> Self {
        let was_enabled = shared.enabled.swap(false);
        Self {
            shared,
            was_enabled,
        }
    }
}

impl Drop for ScopedDisabler<'_> {
    fn drop(&mut self) {
        self.shared.enabled.set(self.was_enabled);
    }
}

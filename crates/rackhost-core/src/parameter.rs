//! Normalized description of every control a hosted plugin exposes.
//!
//! Values are stored in a fixed block owned by [`ParameterTable`]; foreign
//! plugins get bound to those cells directly, so the block is never resized
//! after construction.
//!
//! # Example
//!
//! ```
//! use rackhost_core::{ParameterHints, ParameterRange};
//!
//! let (range, corrected) = ParameterRange::sanitized(0.0, 100.0, 50.0);
//! assert!(!corrected);
//!
//! let range = range.with_steps(&ParameterHints::default());
//! assert_eq!(range.step, 1.0);
//! assert_eq!(range.normalize(25.0), 0.25);
//! ```

use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Width given to a range whose bounds collapsed onto one value.
pub const RANGE_EPSILON: f32 = 0.1;

/// Role of a control port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterType {
    #[default]
    Unknown,
    Input,
    Output,
    /// Reports processing delay in samples. Not automatable, hidden.
    Latency,
    /// Reports the operating sample rate. Not automatable, hidden.
    SampleRate,
}

impl ParameterType {
    /// Meta-parameters are excluded from normal parameter iteration.
    #[inline]
    pub fn is_meta(self) -> bool {
        matches!(self, ParameterType::Latency | ParameterType::SampleRate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterHints {
    pub enabled: bool,
    pub automatable: bool,
    pub boolean: bool,
    pub integer: bool,
    pub logarithmic: bool,
    pub uses_sample_rate: bool,
    pub uses_scale_points: bool,
}

/// Numeric range of a parameter. Invariant: `min <= default <= max`, `max > min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
    pub step_small: f32,
    pub step_large: f32,
}

impl ParameterRange {
    /// Build a range from raw bounds, repairing them when they are inverted,
    /// equal or not finite.
    ///
    /// A non-finite lower bound becomes `0`, a non-finite upper bound `1`.
    /// Equal bounds are widened by [`RANGE_EPSILON`], or by a few ulps of
    /// `min` where that epsilon would vanish. Returns the range and whether a
    /// correction was applied.
    pub fn sanitized(min: f32, max: f32, default: f32) -> (Self, bool) {
        let mut corrected = false;
        let mut min = min;
        let mut max = max;
        if !min.is_finite() {
            min = 0.0;
            corrected = true;
        }
        if !max.is_finite() {
            max = 1.0;
            corrected = true;
        }
        if min > max {
            max = min;
        }
        if max <= min {
            (min, max) = widen(min);
            corrected = true;
        }

        let default = if default.is_finite() { default } else { min };
        let range = Self {
            min,
            max,
            default: default.clamp(min, max),
            step: 0.0,
            step_small: 0.0,
            step_large: 0.0,
        };
        (range.with_steps(&ParameterHints::default()), corrected)
    }

    /// Derive step sizes from the parameter's hints.
    ///
    /// Boolean: the full range. Integer: `1 / 1 / 10`. Continuous: a
    /// hundredth, thousandth and tenth of the range.
    pub fn with_steps(mut self, hints: &ParameterHints) -> Self {
        let span = self.span();
        if hints.boolean {
            self.step = span;
            self.step_small = span;
            self.step_large = span;
        } else if hints.integer {
            self.step = 1.0;
            self.step_small = 1.0;
            self.step_large = 10.0;
        } else {
            self.step = span / 100.0;
            self.step_small = span / 1000.0;
            self.step_large = span / 10.0;
        }
        self
    }

    /// Scale every bound by `factor` (sample-rate relative ports), repairing
    /// the result like [`ParameterRange::sanitized`]. Steps are recomputed
    /// for a continuous range.
    pub fn scaled(self, factor: f32) -> Self {
        Self::sanitized(self.min * factor, self.max * factor, self.default * factor).0
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Clamp into range; NaN maps to `min`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Map a real value onto `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Map `[0, 1]` back onto the range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * self.span()
    }

    #[inline]
    pub fn default_normalized(&self) -> f32 {
        self.normalize(self.default)
    }
}

/// Non-empty range starting at `min`, shifted down when `min` sits at the top of `f32`.
fn widen(min: f32) -> (f32, f32) {
    let width = RANGE_EPSILON.max(min.abs() * f32::EPSILON * 4.0);
    let max = min + width;
    if max.is_finite() {
        (min, max)
    } else {
        (min - width, min)
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::sanitized(0.0, 1.0, 0.0).0
    }
}

/// One exposed control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Position in the [`ParameterTable`].
    pub index: u32,
    /// Port index inside the foreign descriptor.
    pub foreign_index: i32,
    pub kind: ParameterType,
    pub hints: ParameterHints,
    pub range: ParameterRange,
    /// Automation source: MIDI channel (0-15).
    pub midi_channel: u8,
    /// Automation source: controller number, `-1` when unbound.
    pub midi_cc: i16,
}

impl Parameter {
    pub fn new(index: u32, foreign_index: i32) -> Self {
        Self {
            index,
            foreign_index,
            kind: ParameterType::Unknown,
            hints: ParameterHints::default(),
            range: ParameterRange::default(),
            midi_channel: 0,
            midi_cc: -1,
        }
    }

    /// Clamp into range, snapping booleans to an end and rounding integers.
    ///
    /// Idempotent: `fix_value(fix_value(x)) == fix_value(x)`.
    pub fn fix_value(&self, value: f32) -> f32 {
        let range = &self.range;
        let value = range.clamp(value);

        if self.hints.boolean {
            let middle = range.min + range.span() / 2.0;
            return if value >= middle { range.max } else { range.min };
        }
        if self.hints.integer {
            return range.clamp(value.round());
        }
        value
    }

    /// Whether an incoming control event on `channel`/`cc` drives this parameter.
    #[inline]
    pub fn listens_to(&self, channel: u8, cc: u16) -> bool {
        self.kind == ParameterType::Input
            && self.hints.automatable
            && self.midi_channel == channel
            && i32::from(self.midi_cc) == i32::from(cc)
    }

    /// Real value for a normalized automation value.
    pub fn value_from_normalized(&self, normalized: f32) -> f32 {
        let range = &self.range;
        if self.hints.boolean {
            return if normalized < 0.5 { range.min } else { range.max };
        }
        let value = normalized * range.span() + range.min;
        if self.hints.integer {
            value.round()
        } else {
            value
        }
    }
}

/// Every parameter of one plugin instance plus the value cells bound to the plugin.
#[derive(Debug, Default)]
pub struct ParameterTable {
    params: Vec<Parameter>,
    values: Box<[Cell<f32>]>,
}

impl ParameterTable {
    /// Build the table, starting every value at its default.
    pub fn new(params: Vec<Parameter>) -> Self {
        let values = params.iter().map(|p| Cell::new(p.range.default)).collect();
        Self { params, values }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.params.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<&Parameter> {
        self.params.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Parameters shown to users: everything but latency / sample-rate reporters.
    pub fn visible(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| !p.kind.is_meta())
    }

    pub fn automatable(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.hints.automatable)
    }

    pub fn find_kind(&self, kind: ParameterType) -> Option<&Parameter> {
        self.params.iter().find(|p| p.kind == kind)
    }

    pub fn has_kind(&self, kind: ParameterType) -> bool {
        self.find_kind(kind).is_some()
    }

    /// Current value; `0.0` for an unknown index.
    #[inline]
    pub fn value(&self, index: u32) -> f32 {
        self.values
            .get(index as usize)
            .map(Cell::get)
            .unwrap_or(0.0)
    }

    /// Store a value as-is.
    #[inline]
    pub fn set_value(&self, index: u32, value: f32) {
        if let Some(cell) = self.values.get(index as usize) {
            cell.set(value);
        }
    }

    /// Fix `value` against the parameter's range and hints, store it, return it.
    pub fn set_value_fixed(&self, index: u32, value: f32) -> Option<f32> {
        let param = self.params.get(index as usize)?;
        let fixed = param.fix_value(value);
        self.values[index as usize].set(fixed);
        Some(fixed)
    }

    pub fn fix_value(&self, index: u32, value: f32) -> Option<f32> {
        self.get(index).map(|p| p.fix_value(value))
    }

    pub fn normalized_value(&self, index: u32) -> f32 {
        self.get(index)
            .map(|p| p.range.normalize(self.value(index)))
            .unwrap_or(0.0)
    }

    pub fn set_midi(&mut self, index: u32, channel: u8, cc: i16) -> bool {
        match self.params.get_mut(index as usize) {
            Some(param) => {
                param.midi_channel = channel;
                param.midi_cc = cc;
                true
            }
            None => false,
        }
    }

    /// Address of the value cell, for binding to a foreign control port.
    ///
    /// Stable for the lifetime of the table.
    #[inline]
    pub fn value_ptr(&self, index: u32) -> Option<*mut f32> {
        self.values.get(index as usize).map(Cell::as_ptr)
    }
}

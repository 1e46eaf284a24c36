//! Test helpers and fixtures for rackhost integration tests
//!
//! Plugins come from the linked fixture library in [`plugins`]; the host is
//! offline, so every callback is driven by hand.
//!
//! ## Tolerance Levels
//!
//! - `FLOAT_EPSILON` (1e-6): exact operations (passthrough, unity gain)
//! - `MIX_EPSILON` (1e-5): mixes and chained gains

#![allow(dead_code)]

pub mod tolerances;

use rackhost::prelude::*;
use rackhost::PluginBuilder;

pub use plugins::{calls, reset_calls, CallLog};

/// Default test sample rate
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Block size every test host is configured with
pub const TEST_BUFFER_SIZE: u32 = 256;

/// Host with the test sample rate and block size.
pub fn test_host() -> RackHost {
    test_host_with(ProcessMode::MultipleClients)
}

pub fn test_host_with(mode: ProcessMode) -> RackHost {
    RackHost::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .buffer_size(TEST_BUFFER_SIZE)
        .process_mode(mode)
        .build()
        .expect("Failed to create test host")
}

/// Builder for a fixture plugin, already active.
pub fn fixture<'a>(host: &'a RackHost, label: &str) -> PluginBuilder<'a> {
    host.ladspa("fixtures.so", label)
        .entry(plugins::fixture_descriptor)
        .active(true)
}

/// Load a fixture plugin with default options.
pub fn load(host: &RackHost, label: &str) -> (Box<dyn PluginAdapter>, PluginHandle) {
    fixture(host, label)
        .build()
        .expect("Failed to load fixture plugin")
}

/// Run one callback and return the plugin's output channels.
pub fn process(
    plugin: &mut dyn PluginAdapter,
    inputs: &[Vec<f32>],
    frames: u32,
    ctx: &mut ProcessContext<'_>,
) -> Vec<Vec<f32>> {
    let ins: Vec<&[f32]> = inputs.iter().map(Vec::as_slice).collect();
    let mut outs = vec![vec![0.0; frames as usize]; plugin.audio_out_count()];
    let mut out_refs: Vec<&mut [f32]> = outs.iter_mut().map(Vec::as_mut_slice).collect();
    plugin.process(&ins, &mut out_refs, frames, ctx);
    outs
}

/// Run one callback without events.
pub fn process_plain(
    plugin: &mut dyn PluginAdapter,
    inputs: &[Vec<f32>],
    frames: u32,
) -> Vec<Vec<f32>> {
    process(plugin, inputs, frames, &mut ProcessContext::new())
}

/// Generate a DC offset signal (constant value).
pub fn generate_dc(value: f32, num_samples: usize) -> Vec<f32> {
    vec![value; num_samples]
}

/// Generate an integer staircase signal [0, 1, 2, ..., n-1] as f32.
pub fn generate_integer_staircase(num_samples: usize) -> Vec<f32> {
    (0..num_samples).map(|i| i as f32).collect()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Assert that every sample equals `expected` within `tolerance`.
pub fn assert_constant(samples: &[f32], expected: f32, tolerance: f32) {
    for (i, s) in samples.iter().enumerate() {
        assert!(
            (s - expected).abs() <= tolerance,
            "sample {i} was {s}, expected {expected}"
        );
    }
}

/// Assert that a signal is silent.
pub fn assert_silence(samples: &[f32]) {
    let max = peak(samples);
    assert!(
        max <= tolerances::FLOAT_EPSILON,
        "Expected silence, but peak amplitude was {max}"
    );
}

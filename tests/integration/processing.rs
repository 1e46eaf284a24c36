//! Activation, post-processing and engine-driven changes on the process path.

use crate::helpers::plugins::{GAIN, RANGES, SINGLETON};
use crate::helpers::tolerances::{FLOAT_EPSILON, MIX_EPSILON};
use crate::helpers::*;
use approx::assert_relative_eq;
use rackhost::plugin::{LoadStage, PluginError};
use rackhost::prelude::*;

/// Process with outputs pre-filled with garbage.
fn process_dirty(plugin: &mut dyn PluginAdapter, input: &[f32], frames: u32) -> Vec<f32> {
    let mut out = vec![9.0; frames as usize];
    let mut ctx = ProcessContext::new();
    plugin.process(&[input], &mut [out.as_mut_slice()], frames, &mut ctx);
    out
}

#[test]
fn test_inactive_plugin_is_silent_and_deactivates_once() {
    let host = test_host();
    reset_calls();

    let (mut plugin, handle) = load(&host, GAIN);
    let input = generate_dc(0.8, 64);

    assert_constant(&process_dirty(plugin.as_mut(), &input, 64), 0.4, FLOAT_EPSILON);
    assert_eq!(calls().activated, 1);

    handle.set_active(false);
    assert_silence(&process_dirty(plugin.as_mut(), &input, 64));
    assert_silence(&process_dirty(plugin.as_mut(), &input, 64));
    assert_eq!(calls().deactivated, 1);
    assert_eq!(calls().runs.len(), 1, "inactive plugins are not run");

    handle.set_active(true);
    assert_constant(&process_dirty(plugin.as_mut(), &input, 64), 0.4, FLOAT_EPSILON);
    assert_eq!(calls().activated, 2);
}

#[test]
fn test_never_activated_plugin() {
    let host = test_host();
    reset_calls();

    let (mut plugin, handle) = fixture(&host, GAIN).active(false).build().unwrap();
    assert!(!handle.is_active());

    assert_silence(&process_dirty(plugin.as_mut(), &generate_dc(1.0, 32), 32));
    drop(plugin);

    let log = calls();
    assert_eq!((log.activated, log.deactivated), (0, 0));
    assert_eq!(log.cleaned_up, 1);
}

#[test]
fn test_queued_parameter_edit_applies_next_callback() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    handle.set_parameter_rt(0, 100.0);
    assert_eq!(plugin.parameter_value(0), 50.0);

    let out = process_plain(plugin.as_mut(), &[generate_dc(0.3, 32)], 32);
    assert_eq!(plugin.parameter_value(0), 100.0);
    assert_constant(&out[0], 0.3, FLOAT_EPSILON);

    handle.set_parameter_rt(0, 500.0).set_parameter_rt(0, -1.0);
    process_plain(plugin.as_mut(), &[generate_dc(0.3, 32)], 32);
    assert_eq!(plugin.parameter_value(0), 0.0, "edits apply in order, fixed to range");
}

#[test]
fn test_dry_wet_mix() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    handle.set_dry_wet(0.5);
    let out = process_plain(plugin.as_mut(), &[generate_dc(0.8, 64)], 64);
    // wet 0.4 and dry 0.8, half each
    assert_constant(&out[0], 0.6, MIX_EPSILON);

    handle.set_dry_wet(0.0);
    let input = generate_integer_staircase(64);
    let out = process_plain(plugin.as_mut(), &[input.clone()], 64);
    for (o, i) in out[0].iter().zip(&input) {
        assert_relative_eq!(*o, *i, epsilon = MIX_EPSILON);
    }
}

#[test]
fn test_volume_is_clamped_and_applied() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    handle.set_volume(0.5);
    let out = process_plain(plugin.as_mut(), &[generate_dc(0.8, 64)], 64);
    assert_constant(&out[0], 0.2, MIX_EPSILON);

    handle.set_volume(4.0);
    assert_relative_eq!(handle.volume(), 1.27);
    let out = process_plain(plugin.as_mut(), &[generate_dc(0.8, 64)], 64);
    assert_constant(&out[0], 0.4 * 1.27, MIX_EPSILON);
}

#[test]
fn test_balance_folds_right_into_left() {
    let host = test_host();
    let (mut plugin, handle) = fixture(&host, GAIN)
        .force_stereo(true)
        .param(0, 100.0)
        .build()
        .unwrap();

    handle.set_balance_left(-1.0).set_balance_right(-1.0);
    assert_eq!(handle.balance(), (-1.0, -1.0));

    let out = process_plain(
        plugin.as_mut(),
        &[generate_dc(0.2, 64), generate_dc(0.6, 64)],
        64,
    );
    assert_constant(&out[0], 0.8, MIX_EPSILON);
    assert_silence(&out[1]);
}

#[test]
fn test_buffer_size_change() {
    let host = test_host();
    let (mut plugin, _) = load(&host, GAIN);

    host.offline().set_buffer_size(1024);
    plugin.buffer_size_changed(1024);

    let out = process_plain(plugin.as_mut(), &[generate_dc(1.0, 1024)], 1024);
    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
}

#[test]
fn test_sample_rate_change_reinstantiates() {
    let host = test_host();
    reset_calls();

    let (mut plugin, _) = load(&host, RANGES);
    process_plain(plugin.as_mut(), &[generate_dc(0.1, 32)], 32);

    host.offline().set_sample_rate(96000.0);
    plugin.sample_rate_changed(96000.0).unwrap();

    let log = calls();
    assert_eq!(log.rates, [48000, 96000]);
    assert_eq!(log.live(), 1);
    assert_eq!(log.activated, log.deactivated);

    assert_relative_eq!(plugin.parameter(3).unwrap().range.max, 48000.0);
    assert_eq!(plugin.parameter_value(5), 96000.0);

    let out = process_plain(plugin.as_mut(), &[generate_dc(0.1, 32)], 32);
    assert_constant(&out[0], 0.1, FLOAT_EPSILON);
}

#[test]
fn test_sample_rate_change_scales_ranges_before_engine_update() {
    let host = test_host();
    let (mut plugin, _) = load(&host, RANGES);

    // The engine still reports the old rate.
    plugin.sample_rate_changed(96000.0).unwrap();
    assert_eq!(host.sample_rate(), TEST_SAMPLE_RATE);
    assert_relative_eq!(plugin.parameter(3).unwrap().range.max, 48000.0);
    assert_eq!(plugin.parameter_value(5), 96000.0);

    // A later reload follows the instance rate.
    plugin.reload();
    assert_relative_eq!(plugin.parameter(3).unwrap().range.max, 48000.0);
    assert_eq!(plugin.parameter_value(5), 96000.0);
}

#[test]
fn test_sample_rate_change_failure_keeps_plugin() {
    let host = test_host();
    let (mut plugin, _) = load(&host, SINGLETON);

    let err = plugin.sample_rate_changed(44100.0).unwrap_err();
    assert!(matches!(err, PluginError::InstantiateFailed { .. }));
    assert_eq!(err.stage(), Some(LoadStage::Reload));
    assert!(host.last_error().contains(SINGLETON));

    let out = process_plain(plugin.as_mut(), &[generate_dc(1.0, 16)], 16);
    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
}

#[test]
fn test_reload_while_running() {
    let host = test_host();
    reset_calls();

    let (mut plugin, handle) = load(&host, GAIN);
    process_plain(plugin.as_mut(), &[generate_dc(1.0, 16)], 16);
    plugin.set_parameter_value(0, 80.0);

    plugin.reload();
    assert_eq!(calls().deactivated, 1);
    assert!(handle.is_enabled());
    assert_eq!(plugin.parameter_value(0), 50.0, "reload rebuilds parameters from defaults");
    assert_eq!(host.offline().client("Mono Gain").unwrap().ports.len(), 3);

    let out = process_plain(plugin.as_mut(), &[generate_dc(1.0, 16)], 16);
    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
    assert_eq!(calls().activated, 2);
}

#[test]
fn test_short_block_leaves_tail_untouched() {
    let host = test_host();
    let (mut plugin, _) = load(&host, GAIN);

    let input = generate_dc(1.0, 64);
    let mut out = vec![9.0; 64];
    let mut ctx = ProcessContext::new();
    plugin.process(&[input.as_slice()], &mut [out.as_mut_slice()], 32, &mut ctx);

    assert_constant(&out[..32], 0.5, FLOAT_EPSILON);
    assert_constant(&out[32..], 9.0, FLOAT_EPSILON);
}

#[test]
fn test_oversized_block_is_cut_to_buffer_size() {
    let host = test_host();
    let (mut plugin, _) = load(&host, GAIN);
    let frames = TEST_BUFFER_SIZE as usize * 2;

    let input = generate_dc(1.0, frames);
    let mut out = vec![9.0; frames];
    let mut ctx = ProcessContext::new();
    plugin.process(
        &[input.as_slice()],
        &mut [out.as_mut_slice()],
        frames as u32,
        &mut ctx,
    );

    let cut = TEST_BUFFER_SIZE as usize;
    assert_constant(&out[..cut], 0.5, FLOAT_EPSILON);
    assert_constant(&out[cut..], 9.0, FLOAT_EPSILON);
}

//! Automation, reserved controllers and control outputs.

use crate::helpers::plugins::{GAIN, RANGES};
use crate::helpers::tolerances::{FLOAT_EPSILON, MIX_EPSILON};
use crate::helpers::*;
use approx::assert_relative_eq;
use rackhost::core::midi_cc::{BALANCE, BREATH_CONTROLLER, CHANNEL_VOLUME};
use rackhost::plugin::reserved;
use rackhost::prelude::*;
use rackhost::PostEvent;

fn port_with(events: &[EngineEvent]) -> EventPort {
    let mut port = EventPort::new(true);
    for event in events {
        assert!(port.push(*event));
    }
    port
}

#[test]
fn test_cc_automation_is_sample_accurate() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);
    assert!(plugin.set_parameter_midi(0, 0, 20));

    let events = port_with(&[EngineEvent::control_change(100, 0, 20, 1.0)]);
    reset_calls();
    let out = process(
        plugin.as_mut(),
        &[generate_dc(1.0, 256)],
        256,
        &mut ProcessContext::new().events(&events),
    );

    assert_eq!(calls().runs, [100, 156]);
    assert_constant(&out[0][..100], 0.5, FLOAT_EPSILON);
    assert_constant(&out[0][100..], 1.0, FLOAT_EPSILON);
    assert_eq!(plugin.parameter_value(0), 100.0);
    assert_eq!(handle.drain_post_events(), [PostEvent::parameter(0, 100.0)]);
    assert!(handle.drain_post_events().is_empty());
}

#[test]
fn test_cc_on_other_channel_is_ignored() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);
    plugin.set_parameter_midi(0, 0, 20);

    let events = port_with(&[EngineEvent::control_change(100, 3, 20, 1.0)]);
    let out = process(
        plugin.as_mut(),
        &[generate_dc(1.0, 256)],
        256,
        &mut ProcessContext::new().events(&events),
    );

    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
    assert_eq!(plugin.parameter_value(0), 50.0);
    assert!(handle.drain_post_events().is_empty());
}

#[test]
fn test_fixed_buffer_runs_whole_block() {
    let host = test_host();
    let (mut plugin, _) = fixture(&host, GAIN).fixed_buffer(true).build().unwrap();
    plugin.set_parameter_midi(0, 0, 20);

    let events = port_with(&[EngineEvent::control_change(100, 0, 20, 0.0)]);
    reset_calls();
    let out = process(
        plugin.as_mut(),
        &[generate_dc(1.0, 256)],
        256,
        &mut ProcessContext::new().events(&events),
    );

    assert_eq!(calls().runs, [256]);
    assert_silence(&out[0]);
}

#[test]
fn test_event_times_are_absolute() {
    let host = test_host();
    let (mut plugin, _) = load(&host, GAIN);
    plugin.set_parameter_midi(0, 0, 20);

    // 900 falls before this block, 1300 after it.
    let events = port_with(&[
        EngineEvent::control_change(900, 0, 20, 0.0),
        EngineEvent::control_change(1064, 0, 20, 1.0),
        EngineEvent::control_change(1300, 0, 20, 0.0),
    ]);
    reset_calls();
    let out = process(
        plugin.as_mut(),
        &[generate_dc(1.0, 256)],
        256,
        &mut ProcessContext::new().events(&events).offset(1000),
    );

    assert_eq!(calls().runs, [64, 192]);
    assert_constant(&out[0][..64], 0.5, FLOAT_EPSILON);
    assert_constant(&out[0][64..], 1.0, FLOAT_EPSILON);
}

#[test]
fn test_toggle_and_integer_automation() {
    let host = test_host();
    let (mut plugin, _) = load(&host, RANGES);
    plugin.set_parameter_midi(1, 0, 21);
    plugin.set_parameter_midi(2, 0, 22);

    let events = port_with(&[
        EngineEvent::control_change(0, 0, 21, 0.7),
        EngineEvent::control_change(0, 0, 22, 0.33),
    ]);
    process(
        plugin.as_mut(),
        &[generate_dc(0.0, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );

    assert_eq!(plugin.parameter_value(1), 1.0);
    assert_eq!(plugin.parameter_value(2), 3.0);
}

#[test]
fn test_midi_binding_validation() {
    let host = test_host();
    let (mut plugin, _) = load(&host, GAIN);

    assert!(!plugin.set_parameter_midi(0, 16, 20));
    assert!(!plugin.set_parameter_midi(0, 0, 0x78));
    assert!(!plugin.set_parameter_midi(0, 0, -2));
    assert!(!plugin.set_parameter_midi(9, 0, 20));

    assert!(plugin.set_parameter_midi(0, 15, 0x77));
    assert_eq!(plugin.parameter(0).unwrap().midi_channel, 15);
    assert!(plugin.set_parameter_midi(0, 0, -1));
    assert_eq!(plugin.parameter(0).unwrap().midi_cc, -1);
}

#[test]
fn test_reserved_dry_wet_and_volume() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    let events = port_with(&[
        EngineEvent::control_change(0, 0, BREATH_CONTROLLER, 0.5),
        EngineEvent::control_change(0, 0, CHANNEL_VOLUME, 0.5),
    ]);
    let out = process(
        plugin.as_mut(),
        &[generate_dc(0.8, 64)],
        64,
        &mut ProcessContext::new().events(&events),
    );

    assert_relative_eq!(handle.dry_wet(), 0.5);
    assert_relative_eq!(handle.volume(), 0.635);
    // (0.4 wet + 0.8 dry) / 2, then volume
    assert_constant(&out[0], 0.6 * 0.635, MIX_EPSILON);

    let posted = handle.drain_post_events();
    assert_eq!(posted.len(), 2);
    assert_eq!(posted[0].index, reserved::DRYWET);
    assert_eq!(posted[1].index, reserved::VOLUME);
    assert_relative_eq!(posted[1].value, 0.635);
}

#[test]
fn test_reserved_cc_wins_over_parameter_mapping() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);
    plugin.set_parameter_midi(0, 0, CHANNEL_VOLUME as i16);

    let events = port_with(&[EngineEvent::control_change(0, 0, CHANNEL_VOLUME, 1.0)]);
    process(
        plugin.as_mut(),
        &[generate_dc(0.8, 64)],
        64,
        &mut ProcessContext::new().events(&events),
    );
    assert_eq!(plugin.parameter_value(0), 50.0);
    assert_relative_eq!(handle.volume(), 1.27);

    // Off the control channel the same controller reaches the parameter.
    plugin.set_ctrl_in_channel(5);
    assert_eq!(plugin.ctrl_in_channel(), 5);
    process(
        plugin.as_mut(),
        &[generate_dc(0.8, 64)],
        64,
        &mut ProcessContext::new().events(&events),
    );
    assert_eq!(plugin.parameter_value(0), 100.0);

    plugin.set_ctrl_in_channel(16);
    assert_eq!(plugin.ctrl_in_channel(), 5);
}

#[test]
fn test_balance_controller_needs_stereo() {
    let host = test_host();
    let events = port_with(&[EngineEvent::control_change(0, 0, BALANCE, 0.25)]);

    let (mut mono, mono_handle) = load(&host, GAIN);
    process(
        mono.as_mut(),
        &[generate_dc(0.5, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );
    assert_eq!(mono_handle.balance(), (-1.0, 1.0));
    assert!(mono_handle.drain_post_events().is_empty());

    let (mut stereo, handle) = fixture(&host, GAIN).force_stereo(true).build().unwrap();
    process(
        stereo.as_mut(),
        &[generate_dc(0.5, 32), generate_dc(0.5, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );
    assert_eq!(handle.balance(), (-1.0, 0.0));
    assert_eq!(
        handle.drain_post_events(),
        [
            PostEvent::parameter(reserved::BALANCE_LEFT, -1.0),
            PostEvent::parameter(reserved::BALANCE_RIGHT, 0.0),
        ]
    );
}

#[test]
fn test_all_sound_off_restarts_instances() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    let events = port_with(&[EngineEvent::all_sound_off(10, 0)]);
    reset_calls();
    process(
        plugin.as_mut(),
        &[generate_dc(0.5, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );

    let log = calls();
    assert_eq!((log.activated, log.deactivated), (2, 1));
    assert_eq!(
        handle.drain_post_events(),
        [
            PostEvent::parameter(reserved::ACTIVE, 0.0),
            PostEvent::parameter(reserved::ACTIVE, 1.0),
        ]
    );
    assert!(handle.is_active());

    // Only honored on the control channel.
    let events = port_with(&[EngineEvent::all_sound_off(10, 4)]);
    process(
        plugin.as_mut(),
        &[generate_dc(0.5, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );
    assert_eq!(calls().deactivated, 1);
    assert!(handle.drain_post_events().is_empty());
}

#[test]
fn test_note_data_is_ignored() {
    let host = test_host();
    let (mut plugin, handle) = load(&host, GAIN);

    let events = port_with(&[EngineEvent::midi(8, 0, &[0x90, 60, 100])]);
    let out = process(
        plugin.as_mut(),
        &[generate_dc(1.0, 32)],
        32,
        &mut ProcessContext::new().events(&events),
    );
    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
    assert!(handle.drain_post_events().is_empty());
}

#[test]
fn test_control_outputs_reported() {
    let host = test_host();
    let (mut plugin, _) = load(&host, RANGES);
    assert!(plugin.set_parameter_midi(4, 2, 20));

    let mut out_port = EventPort::new(false);
    let mut ctx = ProcessContext::new().output(&mut out_port).offset(512);
    process(plugin.as_mut(), &[generate_dc(0.5, 64)], 64, &mut ctx);

    assert_eq!(plugin.parameter_value(4), 0.5);
    assert_eq!(
        out_port.events().to_vec(),
        vec![EngineEvent::control_change(512, 2, 20, 0.5)]
    );
}

#[test]
fn test_unmapped_control_outputs_stay_quiet() {
    let host = test_host();
    let (mut plugin, _) = load(&host, RANGES);

    let mut out_port = EventPort::new(false);
    let mut ctx = ProcessContext::new().output(&mut out_port);
    process(plugin.as_mut(), &[generate_dc(0.5, 64)], 64, &mut ctx);

    assert_eq!(out_port.event_count(), 0);
    assert_eq!(plugin.parameter_value(4), 0.5);
}

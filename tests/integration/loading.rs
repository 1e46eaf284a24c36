//! Descriptor lookup, parameter translation, port layout and load failures.

use crate::helpers::plugins::{
    self, BROKEN, GAIN, GAIN_ID, LATENCY, LATENCY_SAMPLES, NO_RUN, QUAD, RANGES, SINGLETON,
    SOURCE, SOURCE_LEVEL,
};
use crate::helpers::tolerances::FLOAT_EPSILON;
use crate::helpers::*;
use approx::assert_relative_eq;
use rackhost::core::{Engine, ParameterType, PortKind, RANGE_EPSILON};
use rackhost::plugin::ladspa::{
    self, LadspaLibrary, LadspaPlugin, RdfClass, RdfDescriptor, RdfPort, RdfUnit, ScalePoint,
};
use rackhost::plugin::{PluginCategory, PluginError, PluginOptions};
use rackhost::prelude::*;
use rackhost::{Initializer, PluginType};

fn port_names(host: &RackHost, client: &str, kind: PortKind, is_input: bool) -> Vec<String> {
    host.offline()
        .client(client)
        .expect("client registered")
        .ports_of(kind, is_input)
        .map(|p| p.name.clone())
        .collect()
}

#[test]
fn test_gain_plugin_end_to_end() {
    let host = test_host();
    let (plugin, handle) = load(&host, GAIN);

    assert_eq!(plugin.plugin_type(), PluginType::Ladspa);
    assert_eq!(plugin.audio_in_count(), 1);
    assert_eq!(plugin.audio_out_count(), 1);
    assert_eq!(plugin.latency(), 0);

    assert_eq!(plugin.parameter_count(), 1);
    let gain = plugin.parameter(0).unwrap();
    assert_eq!(gain.kind, ParameterType::Input);
    assert_eq!(gain.foreign_index, 2);
    assert_eq!((gain.range.min, gain.range.max), (0.0, 100.0));
    assert!(gain.hints.automatable && gain.hints.enabled);
    assert_eq!(plugin.parameter_value(0), 50.0);
    assert_eq!(plugin.parameter_name(0).as_deref(), Some("gain"));
    assert_eq!(plugin.parameter_symbol(0), None);
    assert_eq!(plugin.parameter_scale_point_count(0), 0);

    let meta = plugin.metadata();
    assert_eq!(meta.name, "Mono Gain");
    assert_eq!(meta.label, GAIN);
    assert_eq!(meta.unique_id, GAIN_ID);
    assert_eq!(meta.maker, "rackhost tests");
    assert_eq!((meta.audio_io.inputs, meta.audio_io.outputs), (1, 1));

    let caps = plugin.caps();
    assert!(caps.dry_wet && caps.volume && caps.force_stereo);
    assert!(!caps.balance);

    assert!(handle.is_enabled());
    assert!(host.offline().client("Mono Gain").unwrap().active);
    assert_eq!(port_names(&host, "Mono Gain", PortKind::Audio, true), ["in"]);
    assert_eq!(port_names(&host, "Mono Gain", PortKind::Audio, false), ["out"]);
    assert_eq!(port_names(&host, "Mono Gain", PortKind::Event, true), ["event-in"]);
    assert!(port_names(&host, "Mono Gain", PortKind::Event, false).is_empty());

    let mut plugin = plugin;
    let out = process_plain(plugin.as_mut(), &[generate_dc(0.8, 256)], 256);
    assert_constant(&out[0], 0.4, FLOAT_EPSILON);
}

#[test]
fn test_forced_stereo_runs_two_instances() {
    let host = test_host();
    reset_calls();

    let (mut plugin, _) = fixture(&host, GAIN).force_stereo(true).build().unwrap();
    assert_eq!(calls().live(), 2);
    assert_eq!(plugin.audio_in_count(), 2);
    assert_eq!(plugin.audio_out_count(), 2);
    assert_eq!(plugin.parameter_count(), 1);
    assert!(plugin.caps().balance);

    assert_eq!(port_names(&host, "Mono Gain", PortKind::Audio, true), ["in", "in_2"]);
    assert_eq!(port_names(&host, "Mono Gain", PortKind::Audio, false), ["out", "out_2"]);

    let out = process_plain(
        plugin.as_mut(),
        &[generate_dc(0.2, 128), generate_dc(0.6, 128)],
        128,
    );
    assert_constant(&out[0], 0.1, FLOAT_EPSILON);
    assert_constant(&out[1], 0.3, FLOAT_EPSILON);

    // Both instances see the shared control value.
    plugin.set_parameter_value(0, 100.0);
    let out = process_plain(
        plugin.as_mut(),
        &[generate_dc(0.2, 128), generate_dc(0.6, 128)],
        128,
    );
    assert_constant(&out[0], 0.2, FLOAT_EPSILON);
    assert_constant(&out[1], 0.6, FLOAT_EPSILON);
}

#[test]
fn test_forced_stereo_ports_share_foreign_index() {
    let host = test_host();
    let library = LadspaLibrary::from_entry("fixtures.so", plugins::fixture_descriptor);
    let init = Initializer::ladspa("fixtures.so", GAIN).options(PluginOptions {
        force_stereo: true,
        ..Default::default()
    });

    let plugin = ladspa::new_ladspa(host.engine(), library, &init).unwrap();
    assert_eq!(plugin.instance_count(), 2);

    let ins = &plugin.ports().audio_in;
    assert_eq!(ins[0].foreign_index, ins[1].foreign_index);
    assert_ne!(ins[0].slot, ins[1].slot);
    let outs = &plugin.ports().audio_out;
    assert_eq!(outs[0].foreign_index, outs[1].foreign_index);
    assert_ne!(outs[0].slot, outs[1].slot);
}

#[test]
fn test_forced_stereo_generator() {
    let host = test_host();
    let (mut plugin, _) = fixture(&host, SOURCE).force_stereo(true).build().unwrap();

    assert_eq!(plugin.audio_in_count(), 0);
    assert_eq!(plugin.audio_out_count(), 2);

    let out = process_plain(plugin.as_mut(), &[], 64);
    assert_constant(&out[0], SOURCE_LEVEL, FLOAT_EPSILON);
    assert_constant(&out[1], SOURCE_LEVEL, FLOAT_EPSILON);
}

#[test]
fn test_forced_stereo_leaves_multichannel_alone() {
    let host = test_host();
    reset_calls();

    let (plugin, _) = fixture(&host, QUAD).force_stereo(true).build().unwrap();
    assert_eq!(calls().live(), 1);
    assert_eq!(plugin.audio_in_count(), 4);
    assert_eq!(plugin.audio_out_count(), 4);
}

#[test]
fn test_forced_stereo_falls_back_to_mono() {
    let host = test_host();
    reset_calls();

    let (mut plugin, _) = fixture(&host, SINGLETON).force_stereo(true).build().unwrap();
    assert_eq!(calls().instantiated, 2);
    assert_eq!(calls().live(), 1);
    assert_eq!(plugin.audio_out_count(), 1);

    let out = process_plain(plugin.as_mut(), &[generate_dc(1.0, 32)], 32);
    assert_constant(&out[0], 0.5, FLOAT_EPSILON);
}

#[test]
fn test_latency_is_probed_and_reported() {
    let host = test_host();
    reset_calls();

    let (plugin, handle) = load(&host, LATENCY);

    assert_eq!(plugin.latency(), LATENCY_SAMPLES);
    assert_eq!(handle.latency(), LATENCY_SAMPLES);
    assert_eq!(plugin.metadata().latency_samples, LATENCY_SAMPLES);
    assert_eq!(
        host.offline().client("Latency Reporter").unwrap().latency,
        LATENCY_SAMPLES
    );

    let latency = plugin.parameter(0).unwrap();
    assert_eq!(latency.kind, ParameterType::Latency);
    assert!(!latency.hints.automatable);

    // The probe is a short activate/run/deactivate on the primary instance.
    let log = calls();
    assert_eq!(log.runs, [2]);
    assert_eq!((log.activated, log.deactivated), (1, 1));
}

#[test]
fn test_parameter_ranges_and_hints() {
    let host = test_host();
    let (plugin, _) = load(&host, RANGES);
    assert_eq!(plugin.parameter_count(), 6);

    let flat = plugin.parameter(0).unwrap();
    assert_eq!(flat.range.min, 5.0);
    assert_relative_eq!(flat.range.max, 5.0 + RANGE_EPSILON);
    assert_eq!(flat.range.default, 5.0);

    let bypass = plugin.parameter(1).unwrap();
    assert!(bypass.hints.boolean);
    assert_eq!(bypass.range.step, 1.0);
    assert_eq!(plugin.parameter_value(1), 0.0);

    let steps = plugin.parameter(2).unwrap();
    assert!(steps.hints.integer);
    assert_eq!(steps.range.default, 5.0);
    assert_eq!((steps.range.step, steps.range.step_large), (1.0, 10.0));

    let cutoff = plugin.parameter(3).unwrap();
    assert!(cutoff.hints.uses_sample_rate);
    assert_relative_eq!(cutoff.range.max, 24000.0);
    assert_relative_eq!(cutoff.range.default, 18000.0);
    assert_eq!(plugin.parameter_name(3).as_deref(), Some("cutoff"));

    let level = plugin.parameter(4).unwrap();
    assert_eq!(level.kind, ParameterType::Output);

    let rate = plugin.parameter(5).unwrap();
    assert_eq!(rate.kind, ParameterType::SampleRate);
    assert_eq!(plugin.parameter_value(5), TEST_SAMPLE_RATE as f32);

    // An output control port gets an event-out port.
    assert_eq!(
        port_names(&host, "Range Zoo", PortKind::Event, false),
        ["event-out"]
    );
}

#[test]
fn test_set_parameter_value_fixes_values() {
    let host = test_host();
    let (mut plugin, _) = load(&host, RANGES);

    assert_eq!(plugin.set_parameter_value(1, 0.7), Some(1.0));
    assert_eq!(plugin.set_parameter_value(1, 0.2), Some(0.0));
    assert_eq!(plugin.set_parameter_value(2, 3.6), Some(4.0));
    assert_eq!(plugin.set_parameter_value(2, -3.0), Some(0.0));
    assert_eq!(plugin.set_parameter_value(42, 1.0), None);
    assert_eq!(plugin.parameter_value(2), 0.0);
}

#[test]
fn test_rdf_metadata_applied() {
    let host = test_host();
    let rdf = RdfDescriptor {
        unique_id: GAIN_ID,
        title: Some("Studio Gain".into()),
        creator: Some("Jane Doe".into()),
        classes: vec![RdfClass::Amplifier],
        ports: vec![
            RdfPort::default(),
            RdfPort::default(),
            RdfPort {
                label: Some("level".into()),
                default: Some(25.0),
                unit: Some(RdfUnit::Db),
                scale_points: vec![
                    ScalePoint {
                        value: 0.0,
                        label: "mute".into(),
                    },
                    ScalePoint {
                        value: 100.0,
                        label: "full".into(),
                    },
                ],
            },
        ],
    };

    let (plugin, _) = fixture(&host, GAIN).rdf(rdf).build().unwrap();
    let meta = plugin.metadata();
    assert_eq!(meta.name, "Studio Gain");
    assert_eq!(meta.real_name, "Studio Gain");
    assert_eq!(meta.maker, "Jane Doe");
    assert_eq!(meta.category, PluginCategory::Dynamics);

    assert_eq!(plugin.parameter_value(0), 25.0);
    assert!(plugin.parameter(0).unwrap().hints.uses_scale_points);
    assert_eq!(plugin.parameter_symbol(0).as_deref(), Some("level"));
    assert_eq!(plugin.parameter_unit(0).as_deref(), Some("dB"));
    assert_eq!(plugin.parameter_scale_point_count(0), 2);
    assert_eq!(
        plugin.parameter_scale_point(0, 1),
        Some((100.0, "full".to_string()))
    );
    assert_eq!(plugin.parameter_scale_point(0, 2), None);
}

#[test]
fn test_rdf_for_other_descriptor_ignored() {
    let host = test_host();
    let rdf = RdfDescriptor {
        unique_id: GAIN_ID + 1,
        title: Some("Wrong".into()),
        ports: vec![RdfPort::default(); 3],
        ..Default::default()
    };

    let (plugin, _) = fixture(&host, GAIN).rdf(rdf).build().unwrap();
    assert_eq!(plugin.metadata().name, "Mono Gain");
    assert_eq!(plugin.parameter_value(0), 50.0);
    assert_eq!(plugin.parameter_unit(0), None);
}

#[test]
fn test_unknown_label() {
    let host = test_host();
    let err = fixture(&host, "missing").build().unwrap_err();

    assert!(matches!(
        err,
        Error::Plugin(PluginError::LabelNotFound { ref label }) if label == "missing"
    ));
    assert!(host.last_error().contains("'missing'"));
    assert_eq!(host.offline().client_count(), 0);
}

#[test]
fn test_empty_library() {
    let host = test_host();
    let err = host
        .ladspa("empty.so", GAIN)
        .entry(plugins::empty_descriptor)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Plugin(PluginError::LabelNotFound { .. })));
}

#[test]
fn test_descriptor_without_run_rejected() {
    let host = test_host();
    let err = fixture(&host, NO_RUN).build().unwrap_err();

    assert!(matches!(
        err,
        Error::Plugin(PluginError::InstantiateFailed { .. })
    ));
    assert!(host.last_error().contains(NO_RUN));
}

#[test]
fn test_instantiation_failure_releases_client() {
    let host = test_host();
    reset_calls();

    let err = fixture(&host, BROKEN).build().unwrap_err();
    assert!(matches!(
        err,
        Error::Plugin(PluginError::InstantiateFailed { .. })
    ));
    assert_eq!(calls().instantiated, 1);
    assert_eq!(host.offline().client_count(), 0);
    assert!(!host.last_error().is_empty());
}

#[test]
fn test_client_registration_rejected() {
    let host = test_host();
    host.offline().set_reject_clients(true);

    let err = fixture(&host, GAIN).build().unwrap_err();
    assert!(matches!(
        err,
        Error::Plugin(PluginError::RegistrationFailed { .. })
    ));
    assert!(host.last_error().contains("register"));
}

#[test]
fn test_not_a_library() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bogus.so");
    std::fs::write(&path, b"definitely not an ELF object").unwrap();

    let host = test_host();
    let err = host.ladspa(path.clone(), GAIN).build().unwrap_err();

    assert!(matches!(
        err,
        Error::Plugin(PluginError::LoadFailed { .. })
    ));
    assert!(host.last_error().contains("opening library"));
}

#[test]
fn test_rack_mode_accepts_only_mono_or_stereo() {
    let host = test_host_with(ProcessMode::ContinuousRack);

    assert!(fixture(&host, GAIN).build().is_ok());

    let err = fixture(&host, QUAD).build().unwrap_err();
    assert!(matches!(err, Error::Plugin(PluginError::Unsupported(_))));
    assert_eq!(
        host.last_error(),
        "rack mode can only work with mono or stereo plugins"
    );
}

#[test]
fn test_unique_client_names() {
    let host = test_host();

    let (first, _) = load(&host, GAIN);
    let (second, _) = load(&host, GAIN);
    assert_eq!(first.metadata().name, "Mono Gain");
    assert_eq!(second.metadata().name, "Mono Gain (2)");
    assert_eq!(host.offline().client_count(), 2);

    drop(first);
    let (third, _) = load(&host, GAIN);
    assert_eq!(third.metadata().name, "Mono Gain");
}

#[test]
fn test_single_client_prefixes_port_names() {
    let host = test_host_with(ProcessMode::SingleClient);
    let _plugin = load(&host, GAIN);

    assert_eq!(
        port_names(&host, "Mono Gain", PortKind::Audio, true),
        ["Mono Gain:in"]
    );
    assert_eq!(
        port_names(&host, "Mono Gain", PortKind::Event, true),
        ["Mono Gain:event-in"]
    );
}

#[test]
fn test_drop_releases_instances_and_client() {
    let host = test_host();
    reset_calls();

    let (mut plugin, _) = fixture(&host, GAIN).force_stereo(true).build().unwrap();
    process_plain(plugin.as_mut(), &[generate_dc(0.1, 16), generate_dc(0.1, 16)], 16);
    drop(plugin);

    let log = calls();
    assert_eq!(log.cleaned_up, 2);
    assert_eq!(log.activated, log.deactivated);
    assert_eq!(host.offline().client_count(), 0);
}

#[test]
fn test_init_then_reload() {
    let host = test_host();
    let engine = host.engine();
    let init = Initializer::ladspa("fixtures.so", GAIN);

    let mut plugin =
        LadspaPlugin::init_static(engine.clone(), plugins::fixture_descriptor, &init).unwrap();
    assert_eq!(plugin.parameter_count(), 0, "no ports before the first reload");

    plugin.reload();
    assert_eq!(plugin.parameter_count(), 1);
    assert_eq!(plugin.parameters().value(0), 50.0);
    assert_eq!(plugin.library().path().to_str(), Some("fixtures.so"));

    let missing = Initializer::ladspa("/nonexistent.so", GAIN);
    assert!(LadspaPlugin::init(engine.clone(), &missing).is_err());
    assert!(engine.last_error().contains("opening library"));
}

#[test]
fn test_reload_keeps_latency_history_sized() {
    let host = test_host();
    let init = Initializer::ladspa("fixtures.so", LATENCY);
    let mut plugin =
        LadspaPlugin::init_static(host.engine(), plugins::fixture_descriptor, &init).unwrap();

    for _ in 0..2 {
        plugin.reload();
        assert_eq!(plugin.latency(), LATENCY_SAMPLES);
        let history = plugin.ports().latency_history(0).map(<[f32]>::len);
        assert_eq!(history, Some(LATENCY_SAMPLES as usize));
    }
}

#[test]
fn test_descriptor_properties() {
    let library = LadspaLibrary::from_entry("fixtures.so", plugins::fixture_descriptor);
    let gain = library.find(GAIN).unwrap();

    assert!(gain.is_hard_rt_capable());
    assert!(!gain.is_realtime());
    assert!(!gain.is_inplace_broken());
}

//! Inspect a LADSPA library
//!
//! `ladspa-info <library> [label]` lists every descriptor in the library, or
//! loads the one labelled `label` into an offline engine and prints its ports
//! and parameters.

use rackhost_core::{Engine, HostConfig, OfflineEngine};
use rackhost_plugin::ladspa::{self, LadspaLibrary};
use rackhost_plugin::{Initializer, PluginAdapter, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: ladspa-info <library> [label]");
        std::process::exit(2);
    };

    let library = LadspaLibrary::open(&path)?;

    match args.next() {
        None => list(&library),
        Some(label) => {
            let engine: Arc<dyn Engine> = Arc::new(OfflineEngine::new(&HostConfig::default()));
            let init = Initializer::ladspa(path, label);
            let plugin = ladspa::new_ladspa(engine, library, &init)?;
            show(&plugin);
        }
    }

    Ok(())
}

fn list(library: &LadspaLibrary) {
    let descriptors = library.descriptors();
    tracing::info!(
        path = %library.path().display(),
        count = descriptors.len(),
        "descriptors"
    );

    for descriptor in descriptors {
        let mut flags = Vec::new();
        if descriptor.is_realtime() {
            flags.push("realtime");
        }
        if descriptor.is_inplace_broken() {
            flags.push("inplace-broken");
        }
        if descriptor.is_hard_rt_capable() {
            flags.push("hard-rt");
        }
        println!(
            "{:>8}  {:<24} {} ({} ports) [{}]",
            descriptor.unique_id(),
            descriptor.label().unwrap_or("?"),
            descriptor.name().unwrap_or(""),
            descriptor.port_count(),
            flags.join(", "),
        );
    }
}

fn show(plugin: &dyn PluginAdapter) {
    let meta = plugin.metadata();
    println!("{} [{}]", meta.name, meta.label);
    println!("  maker:     {}", meta.maker);
    println!("  copyright: {}", meta.copyright);
    println!("  unique id: {}", meta.unique_id);
    println!("  category:  {:?}", meta.category);
    println!(
        "  audio:     {} in / {} out",
        plugin.audio_in_count(),
        plugin.audio_out_count()
    );
    println!("  latency:   {} samples", plugin.latency());

    let caps = plugin.caps();
    println!(
        "  caps:      dry/wet={} volume={} balance={} force-stereo={}",
        caps.dry_wet, caps.volume, caps.balance, caps.force_stereo
    );

    for id in 0..plugin.parameter_count() {
        let Some(param) = plugin.parameter(id) else {
            continue;
        };
        let name = plugin.parameter_name(id).unwrap_or_default();
        let unit = plugin.parameter_unit(id).unwrap_or_default();
        println!(
            "  #{id:<3} {name:<24} {:?} [{} .. {}] default {} {unit}",
            param.kind, param.range.min, param.range.max, param.range.default,
        );
    }
}

//! LADSPA adapter: descriptor introspection, topology reload and the
//! realtime process path.

use super::ffi::{
    default_port_value, DescriptorFn, HINT_BOUNDED_ABOVE, HINT_BOUNDED_BELOW, HINT_INTEGER,
    HINT_LOGARITHMIC, HINT_SAMPLE_RATE, HINT_TOGGLED,
};
use super::instance::{InstanceSlots, PRIMARY, SECONDARY};
use super::library::{Descriptor, LadspaLibrary, PortDecl};
use super::rdf::{RdfDescriptor, RdfPort};
use crate::adapter::{
    check_rack_mode, Initializer, PluginAdapter, PluginCaps, PluginOptions, PluginType,
    ProcessContext,
};
use crate::error::{LoadStage, PluginError, Result};
use crate::handle::PluginHandle;
use crate::metadata::{AudioIO, PluginCategory, PluginMetadata};
use crate::ports::{port_name, stereo_pair_name, AudioPort, PortSet, ScratchBuffer};
use crate::postproc::{PostProcessor, PostState};
use crate::scheduler::{route_reserved, EventScheduler, ReservedControl, Step};
use crate::shared::{reserved, ParamEdit, PluginShared, PostEvent, ScopedDisabler};
use rackhost_core::{
    deferred_queue, midi_cc, rt_inbox, ControlEventType, DeferredQueue, Engine, EngineClient,
    EngineEvent, EventKind, EventPort, Parameter, ParameterHints, ParameterRange,
    ParameterTable, ParameterType, PortKind, RtInbox, RtMemoryPool,
    MAX_MIDI_CHANNELS,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Frames the latency probe runs the plugin for.
const LATENCY_PROBE_FRAMES: u32 = 2;

/// A loaded LADSPA plugin.
///
/// Fields drop in declaration order: foreign instances are cleaned up first,
/// the library is closed last.
pub struct LadspaPlugin {
    instance: InstanceSlots,
    client: Box<dyn EngineClient>,
    engine: Arc<dyn Engine>,
    shared: Arc<PluginShared>,
    params: ParameterTable,
    ports: PortSet,
    post: PostProcessor,
    post_events: DeferredQueue<PostEvent>,
    param_inbox: RtInbox<ParamEdit>,
    scheduler: EventScheduler,
    caps: PluginCaps,
    options: PluginOptions,
    metadata: PluginMetadata,
    rdf: Option<RdfDescriptor>,
    ctrl_in_channel: u8,
    active_before: bool,
    latency: u32,
    /// Rate the foreign instances were created at.
    sample_rate: f64,
    descriptor: Descriptor,
    library: LadspaLibrary,
}

/// Load, reload and validate a plugin from an opened library.
pub fn new_ladspa(
    engine: Arc<dyn Engine>,
    library: LadspaLibrary,
    init: &Initializer,
) -> Result<LadspaPlugin> {
    let mut plugin = LadspaPlugin::init_with(Arc::clone(&engine), library, init)?;
    plugin.reload();
    check_rack_mode(engine.as_ref(), plugin.caps)?;
    Ok(plugin)
}

impl LadspaPlugin {
    /// Open `init.filename` and instantiate the descriptor labelled `init.label`.
    ///
    /// The plugin still needs a [`PluginAdapter::reload`] before it can process.
    pub fn init(engine: Arc<dyn Engine>, init: &Initializer) -> Result<Self> {
        let library = LadspaLibrary::open(&init.filename).inspect_err(|e| {
            engine.set_last_error(&e.to_string());
        })?;
        Self::init_with(engine, library, init)
    }

    /// Like [`LadspaPlugin::init`], for a descriptor entry point linked into the binary.
    pub fn init_static(
        engine: Arc<dyn Engine>,
        entry: DescriptorFn,
        init: &Initializer,
    ) -> Result<Self> {
        let library = LadspaLibrary::from_entry(init.filename.clone(), entry);
        Self::init_with(engine, library, init)
    }

    fn init_with(
        engine: Arc<dyn Engine>,
        library: LadspaLibrary,
        init: &Initializer,
    ) -> Result<Self> {
        let fail = |err: PluginError| {
            engine.set_last_error(&err.to_string());
            err
        };

        let descriptor = library.find(&init.label).map_err(fail)?;
        if !descriptor.is_usable() {
            return Err(fail(PluginError::InstantiateFailed {
                label: init.label.clone(),
                stage: LoadStage::Instantiation,
            }));
        }

        let rdf = init.rdf.clone().filter(|rdf| {
            let matches = rdf.matches(&descriptor);
            if !matches {
                debug!(
                    label = %init.label,
                    rdf_id = rdf.unique_id,
                    "ignoring auxiliary metadata for a different descriptor"
                );
            }
            matches
        });

        let requested = init
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| rdf.as_ref().and_then(|r| r.title.clone()))
            .or_else(|| descriptor.name().map(str::to_owned))
            .unwrap_or_else(|| init.label.clone());
        let name = engine.unique_plugin_name(&requested);

        let client = engine
            .add_client(&name)
            .filter(|client| client.is_ok())
            .ok_or_else(|| PluginError::RegistrationFailed { name: name.clone() })
            .map_err(fail)?;

        let sample_rate = engine.sample_rate();
        let instance = InstanceSlots::instantiate(descriptor, sample_rate)
            .ok_or_else(|| PluginError::InstantiateFailed {
                label: init.label.clone(),
                stage: LoadStage::Instantiation,
            })
            .map_err(fail)?;

        let category = rdf
            .as_ref()
            .and_then(RdfDescriptor::category)
            .unwrap_or_else(|| PluginCategory::from_name(&name));
        let label = descriptor.label().unwrap_or(init.label.as_str());
        let metadata = PluginMetadata::new(PluginType::Ladspa, name, label)
            .real_name(
                rdf.as_ref()
                    .and_then(|r| r.title.as_deref())
                    .or(descriptor.name())
                    .unwrap_or(init.label.as_str()),
            )
            .maker(
                rdf.as_ref()
                    .and_then(|r| r.creator.as_deref())
                    .or(descriptor.maker())
                    .unwrap_or_default(),
            )
            .copyright(descriptor.copyright().unwrap_or_default())
            .unique_id(descriptor.unique_id())
            .category(category);

        let pools = init.options.event_pool;
        let (post_events, post_receiver) = deferred_queue(&RtMemoryPool::from_config(&pools));
        let (edit_sender, param_inbox) = rt_inbox(&RtMemoryPool::from_config(&pools));
        let shared = Arc::new(PluginShared::new(post_receiver, edit_sender));
        shared.enabled.set(true);

        debug!(
            plugin = %metadata.name,
            label = %metadata.label,
            path = %library.path().display(),
            "LADSPA plugin initialized"
        );

        Ok(Self {
            instance,
            client,
            engine,
            shared,
            params: ParameterTable::default(),
            ports: PortSet::default(),
            post: PostProcessor::default(),
            post_events,
            param_inbox,
            scheduler: EventScheduler::new(!init.options.fixed_buffer),
            caps: PluginCaps::default(),
            options: init.options,
            metadata,
            rdf,
            ctrl_in_channel: 0,
            active_before: false,
            latency: 0,
            sample_rate,
            descriptor,
            library,
        })
    }

    /// Parameter table built by the last reload.
    pub fn parameters(&self) -> &ParameterTable {
        &self.params
    }

    /// Port layout built by the last reload.
    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    /// Number of live foreign instances (2 under forced stereo).
    pub fn instance_count(&self) -> usize {
        self.instance.slot_count()
    }

    pub fn library(&self) -> &LadspaLibrary {
        &self.library
    }

    fn rdf_port(&self, id: u32) -> Option<&RdfPort> {
        let param = self.params.get(id)?;
        let rdf = self.rdf.as_ref()?;
        rdf.port(u32::try_from(param.foreign_index).ok()?)
    }

    /// Run the primary instance once on silence so it publishes its latency.
    fn probe_latency(&mut self, latency_index: u32) {
        let primary_ports: Vec<AudioPort> = self
            .ports
            .audio_in
            .iter()
            .chain(self.ports.audio_out.iter())
            .filter(|port| port.slot == PRIMARY)
            .copied()
            .collect();
        let mut probe: Vec<ScratchBuffer> = primary_ports
            .iter()
            .map(|_| ScratchBuffer::zeroed(LATENCY_PROBE_FRAMES as usize))
            .collect();

        for (port, buffer) in primary_ports.iter().zip(probe.iter_mut()) {
            self.instance
                .connect_port(PRIMARY, port.foreign_index, buffer.as_mut_ptr());
        }

        self.instance.activate(PRIMARY);
        self.instance.run(PRIMARY, LATENCY_PROBE_FRAMES);
        self.instance.deactivate(PRIMARY);

        // Audio ports are rebound to the scratch arena before `probe` goes away.
        let latency = self.params.value(latency_index).round().max(0.0) as u32;
        if latency != self.latency {
            debug!(plugin = %self.metadata.name, latency, "plugin latency changed");
            self.latency = latency;
            self.client.set_latency(latency);
            self.shared.latency.set(latency);
        }
    }

    /// Apply one event at the current position of the block.
    fn apply_event(&mut self, event: &EngineEvent) {
        match event.kind {
            EventKind::ControlChange { param, value } => {
                if event.channel == self.ctrl_in_channel {
                    if let Some(control) = route_reserved(param, value, self.caps.reserved()) {
                        self.apply_reserved(control);
                        return;
                    }
                }

                for p in self.params.iter().filter(|p| p.listens_to(event.channel, param)) {
                    let fixed = p.fix_value(p.value_from_normalized(value));
                    self.params.set_value(p.index, fixed);
                    self.post_events
                        .post_rt(PostEvent::parameter(p.index as i32, fixed));
                }
            }
            EventKind::AllSoundOff if event.channel == self.ctrl_in_channel => {
                self.instance.deactivate_all();
                self.instance.activate_all();
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::ACTIVE, 0.0));
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::ACTIVE, 1.0));
            }
            // Banks, programs and note data mean nothing to a LADSPA plugin.
            _ => {}
        }
    }

    fn apply_reserved(&mut self, control: ReservedControl) {
        match control {
            ReservedControl::DryWet(value) => {
                let value = self.shared.set_dry_wet(value);
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::DRYWET, value));
            }
            ReservedControl::Volume(value) => {
                let value = self.shared.set_volume(value);
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::VOLUME, value));
            }
            ReservedControl::Balance { left, right } => {
                let left = self.shared.set_balance_left(left);
                let right = self.shared.set_balance_right(right);
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::BALANCE_LEFT, left));
                self.post_events
                    .post_rt(PostEvent::parameter(reserved::BALANCE_RIGHT, right));
            }
        }
    }

    /// Run `[offset, offset + frames)` of the block through every instance.
    fn process_single(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        offset: u32,
        frames: u32,
    ) {
        let start = offset as usize;
        let len = frames as usize;

        for (i, buffer) in self.ports.scratch.inputs.iter_mut().enumerate() {
            let scratch = buffer.head_mut(len);
            let n = scratch.len();
            match inputs.get(i).and_then(|input| input.get(start..start + n)) {
                Some(input) => scratch.copy_from_slice(input),
                None => scratch.fill(0.0),
            }
        }
        for buffer in &mut self.ports.scratch.outputs {
            buffer.head_mut(len).fill(0.0);
        }

        self.instance.run_all(frames);

        for (i, buffer) in self.ports.scratch.outputs.iter().enumerate() {
            let scratch = buffer.head(len);
            if let Some(output) = outputs
                .get_mut(i)
                .and_then(|output| output.get_mut(start..start + scratch.len()))
            {
                output.copy_from_slice(scratch);
            }
        }
    }

    /// Report output control values on the event-out port.
    fn write_control_outputs(&self, out: &mut EventPort, frames_offset: u32) {
        for p in self.params.iter().filter(|p| p.kind == ParameterType::Output) {
            let value = p.fix_value(self.params.value(p.index));
            self.params.set_value(p.index, value);

            if p.midi_cc > 0 {
                out.write_control_event(
                    frames_offset,
                    p.midi_channel,
                    ControlEventType::Parameter,
                    p.midi_cc as u16,
                    p.range.normalize(value),
                );
            }
        }
    }

    /// Rebuild ports and parameters for the rate the instances run at.
    fn rebuild(&mut self) {
        let sample_rate = self.sample_rate;
        debug!(plugin = %self.metadata.name, "reloading");

        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.shared);
        let _disabled = ScopedDisabler::new(&shared);

        if self.active_before {
            self.instance.deactivate_all();
            self.active_before = false;
        }
        if self.client.is_active() {
            self.client.deactivate();
        }

        self.client.clear_ports();
        self.post_events.clear();

        let mode = engine.process_mode();
        let max_name = engine.max_port_name_size();
        let plugin_name = self.metadata.name.clone();
        let descriptor = self.descriptor;

        let (mut audio_ins, mut audio_outs) = (0usize, 0usize);
        for port in descriptor.ports() {
            if port.descriptor.is_audio() {
                if port.descriptor.is_input() {
                    audio_ins += 1;
                } else if port.descriptor.is_output() {
                    audio_outs += 1;
                }
            }
        }

        let mut force_stereo = false;
        if self.options.force_stereo
            && audio_ins <= 1
            && audio_outs <= 1
            && (audio_ins == 1 || audio_outs == 1)
        {
            if self.instance.ensure_secondary(sample_rate) {
                force_stereo = true;
            } else {
                warn!(plugin = %plugin_name, "second instance failed, staying mono");
            }
        }

        let mut ports = PortSet::default();
        let mut params = Vec::new();
        let mut unbound = Vec::new();
        let mut needs_ctrl_in = false;
        let mut needs_ctrl_out = false;

        for port in descriptor.ports() {
            let kind = port.descriptor;
            if kind.is_audio() {
                if !kind.is_input() && !kind.is_output() {
                    warn!(plugin = %plugin_name, port = port.name, "audio port has no direction");
                    unbound.push(port.index);
                    continue;
                }
                let is_input = kind.is_input();
                let name = port_name(mode, &plugin_name, port.name, max_name);
                let channels = if is_input {
                    &mut ports.audio_in
                } else {
                    needs_ctrl_in = true;
                    &mut ports.audio_out
                };

                channels.push(AudioPort {
                    engine_handle: self.client.add_port(PortKind::Audio, &name, is_input),
                    foreign_index: port.index,
                    slot: PRIMARY,
                });
                if force_stereo {
                    let pair = stereo_pair_name(&name, max_name);
                    channels.push(AudioPort {
                        engine_handle: self.client.add_port(PortKind::Audio, &pair, is_input),
                        foreign_index: port.index,
                        slot: SECONDARY,
                    });
                }
            } else if kind.is_control() {
                let rdf_port = self.rdf.as_ref().and_then(|rdf| rdf.port(port.index));
                let param =
                    build_parameter(params.len() as u32, &port, rdf_port, sample_rate as f32);
                match param.kind {
                    ParameterType::Input => needs_ctrl_in = true,
                    ParameterType::Output => needs_ctrl_out = true,
                    _ => {}
                }
                params.push(param);
            } else {
                error!(
                    plugin = %plugin_name,
                    port = port.name,
                    "port is neither audio nor control"
                );
                unbound.push(port.index);
            }
        }

        self.params = ParameterTable::new(params);
        for p in self.params.iter() {
            if let Some(ptr) = self.params.value_ptr(p.index) {
                self.instance.connect_port_all(p.foreign_index as u32, ptr);
            }
        }
        for port in unbound {
            self.instance.connect_port_all(port, std::ptr::null_mut());
        }

        if needs_ctrl_in {
            let name = port_name(mode, &plugin_name, "event-in", max_name);
            ports.event_in = Some(self.client.add_port(PortKind::Event, &name, true));
        }
        if needs_ctrl_out {
            let name = port_name(mode, &plugin_name, "event-out", max_name);
            ports.event_out = Some(self.client.add_port(PortKind::Event, &name, false));
        }

        self.caps = PluginCaps::from_layout(ports.audio_in_count(), ports.audio_out_count());
        self.ports = ports;

        if self.caps.dry_wet {
            if let Some(index) = self.params.find_kind(ParameterType::Latency).map(|p| p.index) {
                self.probe_latency(index);
            }
        }
        // Fresh port set: size its history for the current latency.
        self.ports.recreate_latency_history(self.latency);

        self.metadata.audio_io =
            AudioIO::new(self.ports.audio_in_count(), self.ports.audio_out_count());
        self.metadata.latency_samples = self.latency;

        self.buffer_size_changed(engine.buffer_size());
        self.client.activate();

        debug!(
            plugin = %plugin_name,
            audio_ins = self.ports.audio_in_count(),
            audio_outs = self.ports.audio_out_count(),
            params = self.params.count(),
            instances = self.instance.slot_count(),
            "reload complete"
        );
    }
}

/// Translate one control port into a host parameter.
fn build_parameter(
    index: u32,
    port: &PortDecl<'_>,
    rdf: Option<&RdfPort>,
    sample_rate: f32,
) -> Parameter {
    let hint = &port.hint;
    let mut param = Parameter::new(index, port.index as i32);

    let min = if hint.has(HINT_BOUNDED_BELOW) {
        hint.lower_bound
    } else {
        0.0
    };
    let max = if hint.has(HINT_BOUNDED_ABOVE) {
        hint.upper_bound
    } else {
        1.0
    };

    let (bounds, corrected) = ParameterRange::sanitized(min, max, min);
    if corrected {
        warn!(
            port = port.name,
            min,
            max,
            "control port has an empty or non-finite range, repairing it"
        );
    }

    let default = rdf
        .and_then(|p| p.default)
        .unwrap_or_else(|| default_port_value(hint, bounds.min, bounds.max));
    let mut range = ParameterRange {
        default: bounds.clamp(default),
        ..bounds
    };

    let mut hints = ParameterHints {
        boolean: hint.has(HINT_TOGGLED),
        integer: hint.has(HINT_INTEGER),
        ..Default::default()
    };
    if hint.has(HINT_SAMPLE_RATE) {
        range = range.scaled(sample_rate);
        hints.uses_sample_rate = true;
    }
    range = range.with_steps(&hints);

    if port.descriptor.is_input() {
        param.kind = ParameterType::Input;
        hints.enabled = true;
        hints.automatable = true;
    } else if port.descriptor.is_output() {
        match port.name {
            "latency" | "_latency" => {
                param.kind = ParameterType::Latency;
                range = ParameterRange {
                    min: 0.0,
                    max: sample_rate,
                    default: 0.0,
                    step: 1.0,
                    step_small: 1.0,
                    step_large: 1.0,
                };
                hints = ParameterHints::default();
            }
            "_sample-rate" => {
                param.kind = ParameterType::SampleRate;
                range = ParameterRange {
                    max: range.max.max(sample_rate),
                    default: sample_rate,
                    step: 1.0,
                    step_small: 1.0,
                    step_large: 1.0,
                    ..range
                };
                hints = ParameterHints::default();
            }
            _ => {
                param.kind = ParameterType::Output;
                hints.enabled = true;
                hints.automatable = true;
            }
        }
    } else {
        warn!(port = port.name, "control port is neither input nor output");
    }

    hints.logarithmic = hint.has(HINT_LOGARITHMIC);
    hints.uses_scale_points = rdf.is_some_and(|p| p.scale_points.len() > 1);

    param.hints = hints;
    param.range = range;
    param
}

fn silence(outputs: &mut [&mut [f32]], frames: u32) {
    for output in outputs.iter_mut() {
        let n = output.len().min(frames as usize);
        output[..n].fill(0.0);
    }
}

impl PluginAdapter for LadspaPlugin {
    fn plugin_type(&self) -> PluginType {
        PluginType::Ladspa
    }

    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn caps(&self) -> PluginCaps {
        self.caps
    }

    fn handle(&self) -> PluginHandle {
        PluginHandle::new(Arc::clone(&self.shared), self.metadata.clone())
    }

    fn reload(&mut self) {
        self.rebuild();
    }

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: u32,
        ctx: &mut ProcessContext<'_>,
    ) {
        if !self.shared.enabled.get() {
            silence(outputs, frames);
            return;
        }

        self.param_inbox.fetch();
        while let Some((index, value)) = self.param_inbox.pop() {
            self.params.set_value_fixed(index, value);
        }

        if !self.shared.active.get() {
            silence(outputs, frames);
            if self.active_before {
                self.instance.deactivate_all();
            }
            self.active_before = false;
            return;
        }

        if !self.active_before {
            self.ports.clear_latency_history();
            self.instance.activate_all();
        }

        // Blocks longer than the scratch buffers are cut; the tail is left untouched.
        let frames = frames.min(self.ports.scratch.frames());

        if self.ports.event_in.is_some() {
            let events = ctx.event_in.map(EventPort::events).unwrap_or(&[]);
            let scheduler = self.scheduler;
            scheduler.walk(events, frames, ctx.frames_offset, |step| match step {
                Step::Run { offset, frames } => {
                    self.process_single(inputs, outputs, offset, frames)
                }
                Step::Event(event) => self.apply_event(event),
            });
        } else {
            self.process_single(inputs, outputs, 0, frames);
        }

        let state = PostState {
            dry_wet: self.shared.dry_wet.get(),
            volume: self.shared.volume.get(),
            balance_left: self.shared.balance_left.get(),
            balance_right: self.shared.balance_right.get(),
        };
        self.post
            .process(self.caps.post(), state, inputs, outputs, frames as usize);

        if self.ports.event_out.is_some() {
            if let Some(out) = ctx.event_out.as_deref_mut() {
                self.write_control_outputs(out, ctx.frames_offset);
            }
        }

        self.post_events.try_flush();
        self.active_before = true;
    }

    fn buffer_size_changed(&mut self, frames: u32) {
        self.ports.scratch.reallocate(
            self.ports.audio_in_count(),
            self.ports.audio_out_count(),
            frames,
        );
        self.post.resize(frames);

        let instance = &mut self.instance;
        self.ports
            .bind_audio(|slot, port, data| instance.connect_port(slot, port, data));
    }

    fn sample_rate_changed(&mut self, sample_rate: f64) -> Result<()> {
        debug!(plugin = %self.metadata.name, sample_rate, "re-instantiating for new sample rate");

        if self.active_before {
            self.instance.deactivate_all();
            self.active_before = false;
        }

        // LADSPA binds the rate at instantiation; assigning drops (cleans up) the old slots.
        self.instance = InstanceSlots::instantiate(self.descriptor, sample_rate)
            .ok_or_else(|| PluginError::InstantiateFailed {
                label: self.metadata.label.clone(),
                stage: LoadStage::Reload,
            })
            .inspect_err(|e| self.engine.set_last_error(&e.to_string()))?;

        self.sample_rate = sample_rate;
        self.rebuild();
        Ok(())
    }

    fn audio_in_count(&self) -> usize {
        self.ports.audio_in_count()
    }

    fn audio_out_count(&self) -> usize {
        self.ports.audio_out_count()
    }

    fn latency(&self) -> u32 {
        self.latency
    }

    fn parameter_count(&self) -> u32 {
        self.params.count()
    }

    fn parameter(&self, id: u32) -> Option<&Parameter> {
        self.params.get(id)
    }

    fn parameter_value(&self, id: u32) -> f32 {
        self.params.value(id)
    }

    fn set_parameter_value(&mut self, id: u32, value: f32) -> Option<f32> {
        self.params.set_value_fixed(id, value)
    }

    fn set_parameter_midi(&mut self, id: u32, channel: u8, cc: i16) -> bool {
        if channel >= MAX_MIDI_CHANNELS || cc < -1 || cc > midi_cc::MAX as i16 {
            return false;
        }
        self.params.set_midi(id, channel, cc)
    }

    fn parameter_name(&self, id: u32) -> Option<String> {
        let param = self.params.get(id)?;
        let port = self.descriptor.port(u32::try_from(param.foreign_index).ok()?)?;
        Some(port.name.to_owned())
    }

    fn parameter_symbol(&self, id: u32) -> Option<String> {
        self.rdf_port(id)?.label.clone()
    }

    fn parameter_unit(&self, id: u32) -> Option<String> {
        self.rdf_port(id)?.unit.map(|unit| unit.symbol().to_owned())
    }

    fn parameter_scale_point_count(&self, id: u32) -> u32 {
        self.rdf_port(id)
            .map(|p| p.scale_points.len() as u32)
            .unwrap_or(0)
    }

    fn parameter_scale_point(&self, id: u32, point: u32) -> Option<(f32, String)> {
        let point = self.rdf_port(id)?.scale_points.get(point as usize)?;
        Some((point.value, point.label.clone()))
    }

    fn ctrl_in_channel(&self) -> u8 {
        self.ctrl_in_channel
    }

    fn set_ctrl_in_channel(&mut self, channel: u8) {
        if channel < MAX_MIDI_CHANNELS {
            self.ctrl_in_channel = channel;
        } else {
            warn!(plugin = %self.metadata.name, channel, "invalid control channel");
        }
    }
}

impl Drop for LadspaPlugin {
    fn drop(&mut self) {
        if self.active_before {
            self.instance.deactivate_all();
        }
        if self.client.is_active() {
            self.client.deactivate();
        }
        debug!(plugin = %self.metadata.name, "LADSPA plugin unloaded");
    }
}

impl std::fmt::Debug for LadspaPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LadspaPlugin")
            .field("name", &self.metadata.name)
            .field("descriptor", &self.descriptor)
            .field("instances", &self.instance.slot_count())
            .field("params", &self.params.count())
            .finish_non_exhaustive()
    }
}

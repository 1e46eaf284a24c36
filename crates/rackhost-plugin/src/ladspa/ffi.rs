//! LADSPA binary interface.
//!
//! Layout follows `ladspa.h` version 1.1. Plugins export a single
//! `ladspa_descriptor` function enumerating their descriptors.

use std::ffi::{c_char, c_int, c_ulong, c_void, CStr};

pub type LadspaData = f32;
pub type LadspaHandle = *mut c_void;
pub type PortDescriptorBits = c_int;
pub type HintDescriptorBits = c_int;

/// Symbol exported by every LADSPA library.
pub const DESCRIPTOR_SYMBOL: &str = "ladspa_descriptor";

pub type DescriptorFn = unsafe extern "C" fn(index: c_ulong) -> *const LadspaDescriptor;

// Plugin properties
pub const PROPERTY_REALTIME: c_int = 0x1;
pub const PROPERTY_INPLACE_BROKEN: c_int = 0x2;
pub const PROPERTY_HARD_RT_CAPABLE: c_int = 0x4;

// Port descriptors
pub const PORT_INPUT: PortDescriptorBits = 0x1;
pub const PORT_OUTPUT: PortDescriptorBits = 0x2;
pub const PORT_CONTROL: PortDescriptorBits = 0x4;
pub const PORT_AUDIO: PortDescriptorBits = 0x8;

// Range hints
pub const HINT_BOUNDED_BELOW: HintDescriptorBits = 0x1;
pub const HINT_BOUNDED_ABOVE: HintDescriptorBits = 0x2;
pub const HINT_TOGGLED: HintDescriptorBits = 0x4;
pub const HINT_SAMPLE_RATE: HintDescriptorBits = 0x8;
pub const HINT_LOGARITHMIC: HintDescriptorBits = 0x10;
pub const HINT_INTEGER: HintDescriptorBits = 0x20;

pub const HINT_DEFAULT_MASK: HintDescriptorBits = 0x3C0;
pub const HINT_DEFAULT_NONE: HintDescriptorBits = 0x0;
pub const HINT_DEFAULT_MINIMUM: HintDescriptorBits = 0x40;
pub const HINT_DEFAULT_LOW: HintDescriptorBits = 0x80;
pub const HINT_DEFAULT_MIDDLE: HintDescriptorBits = 0xC0;
pub const HINT_DEFAULT_HIGH: HintDescriptorBits = 0x100;
pub const HINT_DEFAULT_MAXIMUM: HintDescriptorBits = 0x140;
pub const HINT_DEFAULT_0: HintDescriptorBits = 0x200;
pub const HINT_DEFAULT_1: HintDescriptorBits = 0x240;
pub const HINT_DEFAULT_100: HintDescriptorBits = 0x280;
pub const HINT_DEFAULT_440: HintDescriptorBits = 0x2C0;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct LadspaPortRangeHint {
    pub hint_descriptor: HintDescriptorBits,
    pub lower_bound: LadspaData,
    pub upper_bound: LadspaData,
}

#[repr(C)]
pub struct LadspaDescriptor {
    pub unique_id: c_ulong,
    pub label: *const c_char,
    pub properties: c_int,
    pub name: *const c_char,
    pub maker: *const c_char,
    pub copyright: *const c_char,
    pub port_count: c_ulong,
    pub port_descriptors: *const PortDescriptorBits,
    pub port_names: *const *const c_char,
    pub port_range_hints: *const LadspaPortRangeHint,
    pub implementation_data: *mut c_void,
    pub instantiate:
        Option<unsafe extern "C" fn(*const LadspaDescriptor, c_ulong) -> LadspaHandle>,
    pub connect_port: Option<unsafe extern "C" fn(LadspaHandle, c_ulong, *mut LadspaData)>,
    pub activate: Option<unsafe extern "C" fn(LadspaHandle)>,
    pub run: Option<unsafe extern "C" fn(LadspaHandle, c_ulong)>,
    pub run_adding: Option<unsafe extern "C" fn(LadspaHandle, c_ulong)>,
    pub set_run_adding_gain: Option<unsafe extern "C" fn(LadspaHandle, LadspaData)>,
    pub deactivate: Option<unsafe extern "C" fn(LadspaHandle)>,
    pub cleanup: Option<unsafe extern "C" fn(LadspaHandle)>,
}

/// Direction and type bits of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDescriptor(pub PortDescriptorBits);

impl PortDescriptor {
    #[inline]
    pub fn is_input(self) -> bool {
        self.0 & PORT_INPUT != 0
    }

    #[inline]
    pub fn is_output(self) -> bool {
        self.0 & PORT_OUTPUT != 0
    }

    #[inline]
    pub fn is_control(self) -> bool {
        self.0 & PORT_CONTROL != 0
    }

    #[inline]
    pub fn is_audio(self) -> bool {
        self.0 & PORT_AUDIO != 0
    }
}

impl LadspaPortRangeHint {
    #[inline]
    pub fn has(&self, hint: HintDescriptorBits) -> bool {
        self.hint_descriptor & hint != 0
    }

    #[inline]
    pub fn default_kind(&self) -> HintDescriptorBits {
        self.hint_descriptor & HINT_DEFAULT_MASK
    }
}

/// Default value a port advertises through its range hints.
///
/// Without a default hint: `0` when the range straddles zero, else `min`.
pub fn default_port_value(hint: &LadspaPortRangeHint, min: f32, max: f32) -> f32 {
    let logarithmic = hint.has(HINT_LOGARITHMIC) && min > 0.0 && max > 0.0;
    let mix = |low_weight: f32| {
        if logarithmic {
            (min.ln() * low_weight + max.ln() * (1.0 - low_weight)).exp()
        } else {
            min * low_weight + max * (1.0 - low_weight)
        }
    };

    match hint.default_kind() {
        HINT_DEFAULT_MINIMUM => min,
        HINT_DEFAULT_LOW => mix(0.75),
        HINT_DEFAULT_MIDDLE => mix(0.5),
        HINT_DEFAULT_HIGH => mix(0.25),
        HINT_DEFAULT_MAXIMUM => max,
        HINT_DEFAULT_0 => 0.0,
        HINT_DEFAULT_1 => 1.0,
        HINT_DEFAULT_100 => 100.0,
        HINT_DEFAULT_440 => 440.0,
        _ if min < 0.0 && max > 0.0 => 0.0,
        _ => min,
    }
}

/// Borrow a C string field, treating null and invalid UTF-8 as absent.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: caller guarantees a valid NUL-terminated string.
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

//! Tolerance constants for audio assertions.

/// Exact operations (passthrough, unity gain, silence).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Chains of gain stages (dry/wet mix followed by volume).
pub const MIX_EPSILON: f32 = 1e-5;

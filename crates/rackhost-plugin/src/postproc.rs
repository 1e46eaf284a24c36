//! Dry/wet, balance and volume applied to a plugin's raw output.

/// Neutral values: wet only, unity gain, centered balance.
pub const NEUTRAL_DRY_WET: f32 = 1.0;
pub const NEUTRAL_VOLUME: f32 = 1.0;
pub const NEUTRAL_BALANCE_LEFT: f32 = -1.0;
pub const NEUTRAL_BALANCE_RIGHT: f32 = 1.0;

pub const MAX_VOLUME: f32 = 1.27;

/// Snapshot of the post-processing controls for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostState {
    pub dry_wet: f32,
    pub volume: f32,
    pub balance_left: f32,
    pub balance_right: f32,
}

impl Default for PostState {
    fn default() -> Self {
        Self {
            dry_wet: NEUTRAL_DRY_WET,
            volume: NEUTRAL_VOLUME,
            balance_left: NEUTRAL_BALANCE_LEFT,
            balance_right: NEUTRAL_BALANCE_RIGHT,
        }
    }
}

/// Which transforms the plugin's port layout allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostCaps {
    pub dry_wet: bool,
    pub volume: bool,
    pub balance: bool,
}

/// Balance pair for a normalized balance controller value.
///
/// `0.5` is center; below it the right channel folds left, above it the left
/// channel folds right.
pub fn balance_from_cc(value: f32) -> (f32, f32) {
    let v = value / 0.5 - 1.0;
    if v < 0.0 {
        (-1.0, v * 2.0 + 1.0)
    } else if v > 0.0 {
        (v * 2.0 - 1.0, 1.0)
    } else {
        (-1.0, 1.0)
    }
}

/// Applies the transforms in place; owns the left-channel copy balance needs.
#[derive(Debug, Default)]
pub struct PostProcessor {
    old_left: Vec<f32>,
}

impl PostProcessor {
    pub fn new(max_frames: u32) -> Self {
        let mut post = Self::default();
        post.resize(max_frames);
        post
    }

    /// Control thread only.
    pub fn resize(&mut self, max_frames: u32) {
        self.old_left = vec![0.0; max_frames as usize];
    }

    /// Transform `outputs[..][..frames]`.
    ///
    /// Dry signal comes from `inputs[0]` when there is a single input,
    /// otherwise from the input with the same index. Missing inputs count as
    /// silence.
    pub fn process(
        &mut self,
        caps: PostCaps,
        state: PostState,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
    ) {
        let do_dry_wet = caps.dry_wet && state.dry_wet != NEUTRAL_DRY_WET;
        let do_volume = caps.volume && state.volume != NEUTRAL_VOLUME;
        let do_balance = caps.balance
            && (state.balance_left != NEUTRAL_BALANCE_LEFT
                || state.balance_right != NEUTRAL_BALANCE_RIGHT);

        if !(do_dry_wet || do_volume || do_balance) {
            return;
        }

        let frames = frames.min(self.old_left.len());
        let single_input = inputs.len() == 1;
        let bal_l = (state.balance_left + 1.0) / 2.0;
        let bal_r = (state.balance_right + 1.0) / 2.0;
        let channels = outputs.len();

        for i in 0..channels {
            if do_dry_wet {
                let dry = inputs.get(if single_input { 0 } else { i }).copied();
                let wet = state.dry_wet;
                for (k, out) in outputs[i].iter_mut().take(frames).enumerate() {
                    let dry = dry.and_then(|d| d.get(k)).copied().unwrap_or(0.0);
                    *out = *out * wet + dry * (1.0 - wet);
                }
            }

            if do_balance {
                if i % 2 == 0 {
                    if i + 1 < channels {
                        let (head, tail) = outputs.split_at_mut(i + 1);
                        let n = frames.min(head[i].len()).min(tail[0].len());
                        let left = &mut head[i][..n];
                        let right = &tail[0][..n];
                        let old_left = &mut self.old_left[..n];
                        old_left.copy_from_slice(left);
                        for ((l, old), r) in left.iter_mut().zip(old_left.iter()).zip(right) {
                            *l = old * (1.0 - bal_l) + r * (1.0 - bal_r);
                        }
                    }
                } else {
                    for (k, r) in outputs[i].iter_mut().take(frames).enumerate() {
                        let old = self.old_left.get(k).copied().unwrap_or(0.0);
                        *r = *r * bal_r + old * bal_l;
                    }
                }
            }

            if do_volume {
                for out in outputs[i].iter_mut().take(frames) {
                    *out *= state.volume;
                }
            }
        }
    }
}

//! The audio engine: patch binding and the per-sample routing loop.

use pedalera_core::{db_to_linear, lerp, mono_sum};

use crate::board::PedalboardRuntime;
use crate::error::PatchError;
use crate::patch::{ChannelPolicy, EffectType, MAX_SLOTS, PatchDesc, ROUTE_INPUT};
use crate::pools::EffectPools;
use pedalera_core::TempoSource;

/// Bypass crossfade time: full transition in 5 ms.
const FADE_SECONDS: f32 = 0.005;

/// Outcome of a patch application.
///
/// Pool exhaustion is non-fatal: affected slots degrade to passthrough and
/// are recorded here so the UI can warn the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchReport {
    /// Slots that received a pool instance.
    pub bound: u8,
    /// Bitmask of slots degraded to passthrough because their pool ran out.
    pub degraded: u16,
}

impl PatchReport {
    /// Whether any slot fell back to passthrough.
    pub fn is_degraded(&self) -> bool {
        self.degraded != 0
    }

    /// Whether the given slot fell back to passthrough.
    pub fn slot_degraded(&self, slot: usize) -> bool {
        slot < MAX_SLOTS && self.degraded & (1 << slot) != 0
    }
}

/// Owns the board, the pools, and the routing loop.
///
/// Construction fixes the sample rate and performs every allocation the
/// engine will ever make; from then on [`process_block`](Self::process_block)
/// is allocation-free and panic-free. `apply_patch` and `process_block`
/// both require `&mut self`, so the rebind can never be observed mid-update
/// by the audio path; on firmware the control path wraps `apply_patch` in
/// its critical section, and the bounded twelve-slot rebind fits the
/// real-time budget.
#[derive(Debug)]
pub struct AudioEngine {
    board: PedalboardRuntime,
    pools: EffectPools,
    fade_step: f32,
    input_gain: f32,
    output_gain: f32,
    input_peak: f32,
    output_peak: f32,
}

impl AudioEngine {
    /// Build the engine at a fixed sample rate; must happen before the
    /// first block is processed. Tempo-synced pool instances read `tempo`.
    pub fn new(sample_rate: f32, tempo: &'static TempoSource) -> Self {
        Self {
            board: PedalboardRuntime::new(sample_rate),
            pools: EffectPools::new(sample_rate, tempo),
            fade_step: 1.0 / (FADE_SECONDS * sample_rate),
            input_gain: 1.0,
            output_gain: 1.0,
            input_peak: 0.0,
            output_peak: 0.0,
        }
    }

    /// The processing sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.board.sample_rate
    }

    /// The live board state.
    pub fn board(&self) -> &PedalboardRuntime {
        &self.board
    }

    /// Input gain staging in dB (instrument to line level).
    pub fn set_input_gain_db(&mut self, db: f32) {
        self.input_gain = db_to_linear(db);
    }

    /// Output gain staging in dB.
    pub fn set_output_gain_db(&mut self, db: f32) {
        self.output_gain = db_to_linear(db);
    }

    /// Highest absolute sample seen at the (post-gain) input and output
    /// since the last [`reset_peaks`](Self::reset_peaks).
    pub fn peak_levels(&self) -> (f32, f32) {
        (self.input_peak, self.output_peak)
    }

    /// Clear the peak meters.
    pub fn reset_peaks(&mut self) {
        self.input_peak = 0.0;
        self.output_peak = 0.0;
    }

    /// Toggle a slot's logical enable. The bypass crossfade handles the
    /// transition click-free; slots without a bound effect ignore toggles.
    pub fn set_slot_enabled(&mut self, slot: usize, enabled: bool) {
        if slot < MAX_SLOTS && self.board.slots[slot].effect.is_some() {
            self.board.slots[slot].enabled = enabled;
        }
    }

    /// Rebuild the board from a patch.
    ///
    /// Validation runs before any mutation: a patch that violates the
    /// routing invariant is rejected whole and the previous board keeps
    /// running. On success every pool cursor is reset (wholesale
    /// invalidation of previous bindings), all slots are cleared to the
    /// serial-chain default, and each configured slot is bound in order.
    /// A slot whose pool is exhausted degrades to passthrough and is
    /// flagged in the returned [`PatchReport`].
    pub fn apply_patch(&mut self, patch: &PatchDesc) -> Result<PatchReport, PatchError> {
        patch.validate()?;

        self.pools.reset_cursors();
        for (i, slot) in self.board.slots.iter_mut().enumerate() {
            *slot = PedalboardRuntime::serial_slot(i);
        }
        self.board.reset_frame_buffers();

        let mut report = PatchReport::default();
        for (i, desc) in patch.slots().iter().enumerate() {
            let slot = &mut self.board.slots[i];
            slot.effect_type = desc.effect;
            slot.input_l = desc.input_l;
            slot.input_r = desc.input_r;
            slot.sum_to_mono = desc.sum_to_mono;
            slot.dry = desc.dry;
            slot.wet = desc.wet;
            slot.policy = desc.policy;

            if desc.effect == EffectType::Off {
                continue;
            }

            match self.pools.instantiate(desc.effect) {
                Some(handle) => {
                    let effect = self.pools.effect_mut(handle);
                    effect.set_sample_rate(self.board.sample_rate);
                    // Instance configuration is fully patch-determined:
                    // start from descriptor defaults, then apply the
                    // patch's own assignments, then snap/clear
                    for idx in 0..effect.param_count() {
                        if let Some(info) = effect.param_info(idx) {
                            effect.set_param(idx, info.default);
                        }
                    }
                    for param in desc.params() {
                        effect.set_param_normalized(param.id as usize, param.value);
                    }
                    effect.reset();

                    let slot = &mut self.board.slots[i];
                    slot.effect = Some(handle);
                    slot.enabled = desc.enabled;
                    slot.enabled_fade = if desc.enabled { 1.0 } else { 0.0 };
                    report.bound += 1;
                }
                None => {
                    report.degraded |= 1 << i;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(slot = i, ty = ?desc.effect, "pool exhausted; slot degraded to passthrough");
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            slots = patch.slot_count,
            bound = report.bound,
            degraded = report.degraded,
            "patch applied"
        );

        Ok(report)
    }

    /// Process one block of audio through the board, frame by frame.
    ///
    /// Buffers are split L/R; length mismatches truncate to the shortest.
    pub fn process_block(
        &mut self,
        in_l: &[f32],
        in_r: &[f32],
        out_l: &mut [f32],
        out_r: &mut [f32],
    ) {
        let frames = in_l
            .len()
            .min(in_r.len())
            .min(out_l.len())
            .min(out_r.len());
        for n in 0..frames {
            let (l, r) = self.process_frame(in_l[n], in_r[n]);
            out_l[n] = l;
            out_r[n] = r;
        }
    }

    /// Run every slot once, in board order, and return the terminal slot's
    /// output. Earlier slots' outputs are published to the board's taps as
    /// they are computed; the routing invariant guarantees each slot only
    /// reads taps already written this frame.
    fn process_frame(&mut self, in_l: f32, in_r: f32) -> (f32, f32) {
        let in_l = in_l * self.input_gain;
        let in_r = in_r * self.input_gain;
        self.input_peak = self.input_peak.max(in_l.abs()).max(in_r.abs());

        for i in 0..MAX_SLOTS {
            let slot = self.board.slots[i];

            let mut src_l = read_tap(slot.input_l, in_l, &self.board.out_l);
            let mut src_r = read_tap(slot.input_r, in_r, &self.board.out_r);
            if slot.sum_to_mono {
                let mono = mono_sum(src_l, src_r);
                src_l = mono;
                src_r = mono;
            }

            let target = if slot.enabled { 1.0 } else { 0.0 };
            let fade = step_toward(slot.enabled_fade, target, self.fade_step);
            self.board.slots[i].enabled_fade = fade;

            let mut proc_l = src_l;
            let mut proc_r = src_r;
            if fade > 0.0
                && let Some(handle) = slot.effect
            {
                (proc_l, proc_r) = self.pools.effect_mut(handle).process_stereo(src_l, src_r);

                // Mono-voiced slots fold the processed pair back to center
                let force_mono = matches!(slot.policy, ChannelPolicy::ForceMono)
                    || (matches!(slot.policy, ChannelPolicy::Auto) && slot.sum_to_mono);
                if force_mono {
                    let mono = mono_sum(proc_l, proc_r);
                    proc_l = mono;
                    proc_r = mono;
                }
            }

            let blended_l = slot.dry * src_l + slot.wet * proc_l;
            let blended_r = slot.dry * src_r + slot.wet * proc_r;

            self.board.out_l[i] = lerp(src_l, blended_l, fade);
            self.board.out_r[i] = lerp(src_r, blended_r, fade);
        }

        let out_l = self.board.out_l[MAX_SLOTS - 1] * self.output_gain;
        let out_r = self.board.out_r[MAX_SLOTS - 1] * self.output_gain;
        self.output_peak = self.output_peak.max(out_l.abs()).max(out_r.abs());
        (out_l, out_r)
    }
}

#[inline]
fn read_tap(source: u8, input: f32, taps: &[f32; MAX_SLOTS]) -> f32 {
    if source == ROUTE_INPUT {
        input
    } else {
        taps[source as usize]
    }
}

#[inline]
fn step_toward(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

//! Two-branch stereo mixer with cross-coupling.
//!
//! The routing layer feeds two independent branches into this effect: the
//! left input carries branch A, the right input carries branch B. The mixer
//! levels each branch, optionally cross-couples them, and peak-normalizes
//! the result so parallel chains cannot clip the output stage.

use pedalera_core::{Effect, ParamDescriptor, ParamUnit, ParameterInfo, SmoothedParam, mono_sum};

/// Branch mixer: L input = branch A, R input = branch B.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Mix A | 0–1 | 0.5 |
/// | 1 | Mix B | 0–1 | 0.5 |
/// | 2 | Cross | 0–1 | 0.0 |
#[derive(Debug, Clone)]
pub struct StereoMixer {
    mix_a: SmoothedParam,
    mix_b: SmoothedParam,
    cross: SmoothedParam,
}

impl StereoMixer {
    /// Create a mixer with both branches at half level and no coupling.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mix_a: SmoothedParam::standard(0.5, sample_rate),
            mix_b: SmoothedParam::standard(0.5, sample_rate),
            cross: SmoothedParam::standard(0.0, sample_rate),
        }
    }

    /// Set branch A level (0–1).
    pub fn set_mix_a(&mut self, level: f32) {
        self.mix_a.set_target(level.clamp(0.0, 1.0));
    }

    /// Set branch B level (0–1).
    pub fn set_mix_b(&mut self, level: f32) {
        self.mix_b.set_target(level.clamp(0.0, 1.0));
    }

    /// Set the cross-coupling amount (0 = isolated branches, 1 = swapped).
    pub fn set_cross(&mut self, cross: f32) {
        self.cross.set_target(cross.clamp(0.0, 1.0));
    }
}

impl Effect for StereoMixer {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        mono_sum(l, r)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let a = left * self.mix_a.advance();
        let b = right * self.mix_b.advance();
        let cross = self.cross.advance();

        let mut out_l = (1.0 - cross) * a + cross * b;
        let mut out_r = (1.0 - cross) * b + cross * a;

        // Keep parallel sums out of the clipping range
        let peak = out_l.abs().max(out_r.abs());
        if peak > 1.0 {
            let g = 1.0 / peak;
            out_l *= g;
            out_r *= g;
        }

        (out_l, out_r)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.mix_a.set_sample_rate(sample_rate);
        self.mix_b.set_sample_rate(sample_rate);
        self.cross.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.mix_a.snap_to_target();
        self.mix_b.snap_to_target();
        self.cross.snap_to_target();
    }
}

impl ParameterInfo for StereoMixer {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Mix A",
                short_name: "MixA",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            1 => Some(ParamDescriptor {
                name: "Mix B",
                short_name: "MixB",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            2 => Some(ParamDescriptor {
                name: "Cross",
                short_name: "Xfer",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.0,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.mix_a.target(),
            1 => self.mix_b.target(),
            2 => self.cross.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_mix_a(value),
            1 => self.set_mix_b(value),
            2 => self.set_cross(value),
            _ => {}
        }
    }
}

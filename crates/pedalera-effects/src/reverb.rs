//! Schroeder reverb: predelay into parallel damped combs and series
//! allpass diffusers, with a small right-channel spread for stereo width.

use pedalera_core::{
    AllpassFilter, CombFilter, Effect, InterpolatedDelay, ParamDescriptor, ParamUnit,
    ParameterInfo, SmoothedParam, mono_sum, ms_to_samples,
};

/// Comb loop tunings in samples at the reference rate (mutually prime so
/// the echo patterns never align).
const COMB_TUNINGS: [usize; 4] = [1116, 1188, 1277, 1356];

/// Allpass diffuser tunings at the reference rate.
const ALLPASS_TUNINGS: [usize; 2] = [556, 441];

/// Tunings are quoted at this rate and scaled to the running rate.
const REFERENCE_RATE: f32 = 44100.0;

/// Extra loop delay on the right tank, decorrelating the channels.
const STEREO_SPREAD: usize = 23;

/// Room size scales comb loops over [0.5x, 1.5x] of the tuning table.
const SIZE_SCALE_MIN: f32 = 0.5;
const SIZE_SCALE_MAX: f32 = 1.5;

const MAX_PREDELAY_MS: f32 = 80.0;

/// Algorithmic reverb with predelay, decay, damping, and room size.
///
/// The input is mono-summed and pre-delayed, then fed to two parallel tanks
/// (four damped combs plus two allpasses each); the right tank runs slightly
/// longer loops so the tail decorrelates into stereo.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Mix | 0–1 | 0.3 |
/// | 1 | Decay | 0.2–0.95 | 0.7 |
/// | 2 | Damping | 0–0.8 | 0.3 |
/// | 3 | PreDelay | 0–80 ms | 20.0 |
/// | 4 | Size | 0–1 | 0.7 |
#[derive(Debug, Clone)]
pub struct Reverb {
    predelay: InterpolatedDelay,
    combs_l: [CombFilter; 4],
    combs_r: [CombFilter; 4],
    allpasses_l: [AllpassFilter; 2],
    allpasses_r: [AllpassFilter; 2],
    mix: SmoothedParam,
    decay: f32,
    damping: f32,
    predelay_ms: f32,
    size: f32,
    sample_rate: f32,
}

fn scale_to_rate(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32) * sample_rate / REFERENCE_RATE) as usize + 1
}

impl Reverb {
    /// Create a reverb at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        // Capacity covers the largest room size; update_tank only shrinks
        let comb_capacity = |tuning: usize| {
            (scale_to_rate(tuning, sample_rate) as f32 * SIZE_SCALE_MAX) as usize + 1
        };
        let combs_l = core::array::from_fn(|i| CombFilter::new(comb_capacity(COMB_TUNINGS[i])));
        let combs_r = core::array::from_fn(|i| {
            CombFilter::new(comb_capacity(COMB_TUNINGS[i] + STEREO_SPREAD))
        });
        let allpasses_l = core::array::from_fn(|i| {
            AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS[i], sample_rate))
        });
        let allpasses_r = core::array::from_fn(|i| {
            AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS[i] + STEREO_SPREAD, sample_rate))
        });

        let mut reverb = Self {
            predelay: InterpolatedDelay::from_time(sample_rate, MAX_PREDELAY_MS / 1000.0 + 0.005),
            combs_l,
            combs_r,
            allpasses_l,
            allpasses_r,
            mix: SmoothedParam::standard(0.3, sample_rate),
            decay: 0.7,
            damping: 0.3,
            predelay_ms: 20.0,
            size: 0.7,
            sample_rate,
        };
        reverb.update_tank();
        reverb
    }

    /// Set wet/dry mix (0–1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set tail decay (0.2–0.95); maps onto comb feedback.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.2, 0.95);
        self.update_tank();
    }

    /// Set high-frequency damping (0–0.8).
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 0.8);
        self.update_tank();
    }

    /// Set predelay in milliseconds (0–80).
    pub fn set_predelay_ms(&mut self, ms: f32) {
        self.predelay_ms = ms.clamp(0.0, MAX_PREDELAY_MS);
    }

    /// Set room size (0–1); scales the comb loop lengths.
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(0.0, 1.0);
        self.update_tank();
    }

    fn update_tank(&mut self) {
        let scale = SIZE_SCALE_MIN + self.size * (SIZE_SCALE_MAX - SIZE_SCALE_MIN);
        for (i, comb) in self.combs_l.iter_mut().enumerate() {
            let base = scale_to_rate(COMB_TUNINGS[i], self.sample_rate) as f32;
            comb.set_delay_samples((base * scale) as usize);
            comb.set_feedback(self.decay);
            comb.set_damp(self.damping);
        }
        for (i, comb) in self.combs_r.iter_mut().enumerate() {
            let base = scale_to_rate(COMB_TUNINGS[i] + STEREO_SPREAD, self.sample_rate) as f32;
            comb.set_delay_samples((base * scale) as usize);
            comb.set_feedback(self.decay);
            comb.set_damp(self.damping);
        }
    }

    #[inline]
    fn tank(
        combs: &mut [CombFilter; 4],
        allpasses: &mut [AllpassFilter; 2],
        input: f32,
    ) -> f32 {
        let mut wet = 0.0;
        for comb in combs.iter_mut() {
            wet += comb.process(input);
        }
        wet *= 0.25;
        for allpass in allpasses.iter_mut() {
            wet = allpass.process(wet);
        }
        wet
    }
}

impl Effect for Reverb {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        mono_sum(l, r)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mix = self.mix.advance();

        let pre = ms_to_samples(self.predelay_ms, self.sample_rate);
        let delayed = self.predelay.read(pre);
        self.predelay.write(mono_sum(left, right));

        let wet_l = Self::tank(&mut self.combs_l, &mut self.allpasses_l, delayed);
        let wet_r = Self::tank(&mut self.combs_r, &mut self.allpasses_r, delayed);

        let dry = 1.0 - mix;
        (left * dry + wet_l * mix, right * dry + wet_r * mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.mix.set_sample_rate(sample_rate);
        self.update_tank();
    }

    fn reset(&mut self) {
        self.predelay.clear();
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
        for allpass in self
            .allpasses_l
            .iter_mut()
            .chain(self.allpasses_r.iter_mut())
        {
            allpass.clear();
        }
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Reverb {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Mix",
                short_name: "Mix",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.3,
            }),
            1 => Some(ParamDescriptor {
                name: "Decay",
                short_name: "Decay",
                unit: ParamUnit::Amount,
                min: 0.2,
                max: 0.95,
                default: 0.7,
            }),
            2 => Some(ParamDescriptor {
                name: "Damping",
                short_name: "Damp",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 0.8,
                default: 0.3,
            }),
            3 => Some(ParamDescriptor {
                name: "PreDelay",
                short_name: "Pre",
                unit: ParamUnit::Milliseconds,
                min: 0.0,
                max: MAX_PREDELAY_MS,
                default: 20.0,
            }),
            4 => Some(ParamDescriptor {
                name: "Size",
                short_name: "Size",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.7,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.mix.target(),
            1 => self.decay,
            2 => self.damping,
            3 => self.predelay_ms,
            4 => self.size,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_mix(value),
            1 => self.set_decay(value),
            2 => self.set_damping(value),
            3 => self.set_predelay_ms(value),
            4 => self.set_size(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_produces_a_tail() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_predelay_ms(0.0);
        reverb.reset();

        reverb.process_stereo(1.0, 1.0);
        let mut energy = 0.0_f32;
        for _ in 0..48000 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            energy += l * l + r * r;
        }
        assert!(energy > 0.01, "reverb tail expected, energy {energy}");
    }

    #[test]
    fn tail_decays() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_decay(0.5);
        reverb.set_predelay_ms(0.0);
        reverb.reset();

        reverb.process_stereo(1.0, 1.0);
        let window = |reverb: &mut Reverb, n: usize| {
            let mut e = 0.0_f32;
            for _ in 0..n {
                let (l, r) = reverb.process_stereo(0.0, 0.0);
                e += l * l + r * r;
            }
            e
        };
        let early = window(&mut reverb, 12000);
        let late = window(&mut reverb, 12000);
        assert!(late < early * 0.5, "tail must decay: early {early}, late {late}");
    }

    #[test]
    fn predelay_postpones_onset() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_predelay_ms(50.0); // 2400 samples
        reverb.reset();

        reverb.process_stereo(1.0, 1.0);
        // Well before predelay + shortest comb there must be silence
        for _ in 0..2400 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            assert!(l.abs() < 1e-6 && r.abs() < 1e-6, "early output before predelay");
        }
    }

    #[test]
    fn channels_decorrelate() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_predelay_ms(0.0);
        reverb.reset();

        reverb.process_stereo(1.0, 1.0);
        let mut diff = 0.0_f32;
        for _ in 0..24000 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            diff += (l - r).abs();
        }
        assert!(diff > 0.1, "stereo spread should separate the channels");
    }

    #[test]
    fn dry_mix_is_identity() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(0.0);
        reverb.reset();
        let (l, r) = reverb.process_stereo(0.4, -0.2);
        assert!((l - 0.4).abs() < 1e-6);
        assert!((r + 0.2).abs() < 1e-6);
    }

    #[test]
    fn stays_finite_at_max_settings() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_decay(0.95);
        reverb.set_size(1.0);
        reverb.reset();
        for n in 0..48000 {
            let x = if n % 100 == 0 { 1.0 } else { 0.0 };
            let (l, r) = reverb.process_stereo(x, x);
            assert!(l.is_finite() && r.is_finite());
        }
    }

    #[test]
    fn param_roundtrip() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_param(1, 0.9);
        assert!((reverb.get_param(1) - 0.9).abs() < 1e-6);
        reverb.set_param(3, 40.0);
        assert!((reverb.get_param(3) - 40.0).abs() < 1e-6);
        // Decay clamps to its floor
        reverb.set_param(1, 0.0);
        assert!((reverb.get_param(1) - 0.2).abs() < 1e-6);
    }
}

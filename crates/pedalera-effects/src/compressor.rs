//! Dynamics compressor with per-channel peak detection and makeup gain.

use pedalera_core::{
    Effect, EnvelopeFollower, ParamDescriptor, ParamUnit, ParameterInfo, db_to_linear,
    linear_to_db,
};

/// Feed-forward peak compressor.
///
/// Each channel runs its own envelope follower; gain reduction is computed
/// in the dB domain from the amount the envelope exceeds the threshold,
/// divided by the ratio.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Threshold | -40–0 dB | -20.0 |
/// | 1 | Ratio | 1–20 | 4.0 |
/// | 2 | Attack | 0.1–100 ms | 10.0 |
/// | 3 | Release | 10–1000 ms | 100.0 |
/// | 4 | Makeup | 0–24 dB | 0.0 |
#[derive(Debug, Clone)]
pub struct Compressor {
    env_l: EnvelopeFollower,
    env_r: EnvelopeFollower,
    threshold_db: f32,
    ratio: f32,
    attack_ms: f32,
    release_ms: f32,
    makeup: f32,
    makeup_db: f32,
}

impl Compressor {
    /// Create a compressor at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            env_l: EnvelopeFollower::with_times(sample_rate, 10.0, 100.0),
            env_r: EnvelopeFollower::with_times(sample_rate, 10.0, 100.0),
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 10.0,
            release_ms: 100.0,
            makeup: 1.0,
            makeup_db: 0.0,
        }
    }

    /// Set threshold in dB (-40–0).
    pub fn set_threshold_db(&mut self, db: f32) {
        self.threshold_db = db.clamp(-40.0, 0.0);
    }

    /// Set compression ratio (1–20).
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Set attack time in milliseconds (0.1–100).
    pub fn set_attack_ms(&mut self, ms: f32) {
        self.attack_ms = ms.clamp(0.1, 100.0);
        self.env_l.set_attack_ms(self.attack_ms);
        self.env_r.set_attack_ms(self.attack_ms);
    }

    /// Set release time in milliseconds (10–1000).
    pub fn set_release_ms(&mut self, ms: f32) {
        self.release_ms = ms.clamp(10.0, 1000.0);
        self.env_l.set_release_ms(self.release_ms);
        self.env_r.set_release_ms(self.release_ms);
    }

    /// Set makeup gain in dB (0–24).
    pub fn set_makeup_db(&mut self, db: f32) {
        self.makeup_db = db.clamp(0.0, 24.0);
        self.makeup = db_to_linear(self.makeup_db);
    }

    /// Gain multiplier for an envelope level.
    #[inline]
    fn gain_for(&self, envelope: f32) -> f32 {
        if envelope < 1e-10 {
            return self.makeup;
        }
        let env_db = linear_to_db(envelope);
        let over_db = env_db - self.threshold_db;
        if over_db <= 0.0 {
            return self.makeup;
        }
        let compressed_db = over_db / self.ratio;
        db_to_linear(compressed_db - over_db) * self.makeup
    }
}

impl Effect for Compressor {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let env = self.env_l.process(input);
        input * self.gain_for(env)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let env_l = self.env_l.process(left);
        let env_r = self.env_r.process(right);
        (left * self.gain_for(env_l), right * self.gain_for(env_r))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.env_l.set_sample_rate(sample_rate);
        self.env_r.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.env_l.reset();
        self.env_r.reset();
    }
}

impl ParameterInfo for Compressor {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Threshold",
                short_name: "Thres",
                unit: ParamUnit::Decibels,
                min: -40.0,
                max: 0.0,
                default: -20.0,
            }),
            1 => Some(ParamDescriptor {
                name: "Ratio",
                short_name: "Ratio",
                unit: ParamUnit::Ratio,
                min: 1.0,
                max: 20.0,
                default: 4.0,
            }),
            2 => Some(ParamDescriptor {
                name: "Attack",
                short_name: "Atk",
                unit: ParamUnit::Milliseconds,
                min: 0.1,
                max: 100.0,
                default: 10.0,
            }),
            3 => Some(ParamDescriptor {
                name: "Release",
                short_name: "Rel",
                unit: ParamUnit::Milliseconds,
                min: 10.0,
                max: 1000.0,
                default: 100.0,
            }),
            4 => Some(ParamDescriptor {
                name: "Makeup",
                short_name: "Make",
                unit: ParamUnit::Decibels,
                min: 0.0,
                max: 24.0,
                default: 0.0,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.threshold_db,
            1 => self.ratio,
            2 => self.attack_ms,
            3 => self.release_ms,
            4 => self.makeup_db,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_threshold_db(value),
            1 => self.set_ratio(value),
            2 => self.set_attack_ms(value),
            3 => self.set_release_ms(value),
            4 => self.set_makeup_db(value),
            _ => {}
        }
    }
}

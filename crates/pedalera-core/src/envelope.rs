//! Amplitude envelope follower for dynamics processing.

use libm::expf;

/// Peak envelope follower with separate attack and release times.
///
/// Rising input is tracked with the attack coefficient, falling input with
/// the release coefficient:
///
/// ```text
/// y[n] = coeff * y[n-1] + (1 - coeff) * |x[n]|
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
}

impl EnvelopeFollower {
    /// Create a follower with the given attack/release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut env = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            attack_ms,
            release_ms,
            sample_rate,
        };
        env.recalculate();
        env
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.0);
        self.recalculate();
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(0.0);
        self.recalculate();
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Advance one sample and return the envelope level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rectified = input.abs();
        let coeff = if rectified > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * rectified;
        self.envelope
    }

    /// Current envelope level without consuming a sample.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to silence.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate(&mut self) {
        self.attack_coeff = time_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = time_coeff(self.release_ms, self.sample_rate);
    }
}

fn time_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 || sample_rate <= 0.0 {
        0.0
    } else {
        expf(-1.0 / (time_ms * 0.001 * sample_rate))
    }
}

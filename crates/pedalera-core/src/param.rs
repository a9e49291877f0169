//! Parameter smoothing for zipper-free changes.
//!
//! Audible parameters (mix, feedback, gain) need smooth transitions to avoid
//! zipper noise when a knob or patch change moves them. [`SmoothedParam`]
//! provides sample-accurate exponential smoothing.
//!
//! ```rust
//! use pedalera_core::SmoothedParam;
//!
//! let mut mix = SmoothedParam::standard(0.5, 48000.0);
//! mix.set_target(1.0);
//!
//! // In the audio loop, advance once per sample
//! for _ in 0..480 {
//!     let value = mix.advance();
//!     let _ = value;
//! }
//! ```

use libm::expf;

/// A parameter with built-in one-pole exponential smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// Per-sample smoothing coefficient (0 = frozen, 1 = instant).
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

/// Default smoothing time for [`SmoothedParam::standard`].
const STANDARD_SMOOTHING_MS: f32 = 15.0;

/// Smoothing time for [`SmoothedParam::fast`] (gain-like params).
const FAST_SMOOTHING_MS: f32 = 5.0;

impl SmoothedParam {
    /// Create a smoothed parameter with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Standard smoothing (15 ms) — good for mix, feedback, tone.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, STANDARD_SMOOTHING_MS)
    }

    /// Fast smoothing (5 ms) — good for gain and crossfade-style params.
    pub fn fast(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, FAST_SMOOTHING_MS)
    }

    /// Set the target value the parameter smooths towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and snap to it immediately (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Skip ahead to the target value immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Whether the parameter has effectively reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    // coeff = 1 - exp(-1 / (tau * sr)), tau in seconds: the value covers
    // ~63% of the remaining distance per time constant.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let tau_samples = self.smoothing_time_ms * 0.001 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / tau_samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_target() {
        let mut p = SmoothedParam::standard(0.0, 48000.0);
        p.set_target(1.0);
        // 10 time constants is far more than enough
        for _ in 0..48000 {
            p.advance();
        }
        assert!((p.get() - 1.0).abs() < 1e-4);
        assert!(p.is_settled());
    }

    #[test]
    fn moves_monotonically() {
        let mut p = SmoothedParam::standard(0.0, 48000.0);
        p.set_target(1.0);
        let mut prev = p.get();
        for _ in 0..1000 {
            let v = p.advance();
            assert!(v >= prev, "smoothing must be monotonic upward");
            prev = v;
        }
        assert!(prev < 1.0, "exponential approach never overshoots");
    }

    #[test]
    fn reaches_63_percent_after_one_time_constant() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 10.0);
        p.set_target(1.0);
        let tau_samples = 480; // 10 ms at 48 kHz
        let mut v = 0.0;
        for _ in 0..tau_samples {
            v = p.advance();
        }
        assert!((v - 0.632).abs() < 0.01, "expected ~63% after one tau, got {v}");
    }

    #[test]
    fn snap_and_immediate() {
        let mut p = SmoothedParam::standard(0.0, 48000.0);
        p.set_target(0.8);
        p.snap_to_target();
        assert_eq!(p.get(), 0.8);
        p.set_immediate(0.2);
        assert_eq!(p.get(), 0.2);
        assert_eq!(p.target(), 0.2);
    }

    #[test]
    fn zero_smoothing_is_instant() {
        let mut p = SmoothedParam::with_config(0.0, 48000.0, 0.0);
        p.set_target(1.0);
        assert_eq!(p.advance(), 1.0);
    }
}

//! Damped feedback comb filter for reverb tanks.

use alloc::vec;
use alloc::vec::Vec;

use crate::math::flush_denormal;

/// Feedback comb filter with one-pole damping in the loop.
///
/// The damping lowpass sits inside the feedback path, so high frequencies
/// decay faster than lows — the behavior that makes Schroeder tanks sound
/// like rooms instead of metal springs.
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    /// Active loop length; at most `buffer.len()`.
    length: usize,
    index: usize,
    feedback: f32,
    damp: f32,
    lowpass_state: f32,
}

impl CombFilter {
    /// Create a comb with the given loop delay in samples.
    ///
    /// # Panics
    ///
    /// Panics if `delay_samples` is 0. Construction-time only.
    pub fn new(delay_samples: usize) -> Self {
        assert!(delay_samples > 0, "comb delay must be > 0");
        Self {
            buffer: vec![0.0; delay_samples],
            length: delay_samples,
            index: 0,
            feedback: 0.7,
            damp: 0.2,
            lowpass_state: 0.0,
        }
    }

    /// Set the active loop length in samples, clamped to [1, capacity].
    ///
    /// Lets one allocation serve a range of room sizes; the skipped tail
    /// keeps its old content until the loop grows back over it.
    pub fn set_delay_samples(&mut self, delay_samples: usize) {
        self.length = delay_samples.clamp(1, self.buffer.len());
        if self.index >= self.length {
            self.index = 0;
        }
    }

    /// Set loop feedback (decay); clamped to [0, 0.98] to stay stable.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    /// Set in-loop damping amount in [0, 1]; higher is darker.
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.lowpass_state = flush_denormal(
            output * (1.0 - self.damp) + self.lowpass_state * self.damp,
        );
        self.buffer[self.index] = flush_denormal(input + self.lowpass_state * self.feedback);
        self.index += 1;
        if self.index >= self.length {
            self.index = 0;
        }
        output
    }

    /// Clear the loop to silence.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
        self.lowpass_state = 0.0;
    }

    /// Active loop delay in samples.
    pub fn delay_samples(&self) -> usize {
        self.length
    }

    /// Maximum loop delay this allocation supports.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_at_loop_delay() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);
        let mut outputs = [0.0_f32; 30];
        outputs[0] = comb.process(1.0);
        for out in outputs.iter_mut().skip(1) {
            *out = comb.process(0.0);
        }
        // First pass through the loop arrives after 10 samples
        assert!(outputs[..10].iter().all(|v| v.abs() < 1e-6));
        assert!((outputs[10] - 1.0).abs() < 1e-6);
        // Second echo at 2x the delay, attenuated by feedback
        assert!((outputs[20] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn feedback_clamped_stable() {
        let mut comb = CombFilter::new(8);
        comb.set_feedback(5.0);
        for _ in 0..10000 {
            let v = comb.process(0.1);
            assert!(v.is_finite());
            assert!(v.abs() < 100.0, "comb must stay stable, got {v}");
        }
    }

    #[test]
    fn damping_darkens_decay() {
        let run = |damp: f32| {
            let mut comb = CombFilter::new(10);
            comb.set_feedback(0.9);
            comb.set_damp(damp);
            comb.process(1.0);
            let mut energy = 0.0;
            for _ in 0..1000 {
                let v = comb.process(0.0);
                energy += v * v;
            }
            energy
        };
        assert!(run(0.8) < run(0.0), "damping should remove energy");
    }

    #[test]
    fn clear_silences() {
        let mut comb = CombFilter::new(4);
        comb.process(1.0);
        comb.clear();
        for _ in 0..8 {
            assert_eq!(comb.process(0.0), 0.0);
        }
    }

    #[test]
    fn shortened_loop_echoes_sooner() {
        let mut comb = CombFilter::new(20);
        comb.set_feedback(0.0);
        comb.set_damp(0.0);
        comb.set_delay_samples(5);
        comb.clear();
        comb.process(1.0);
        for _ in 0..4 {
            assert_eq!(comb.process(0.0), 0.0);
        }
        assert!((comb.process(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_delay_clamps_to_capacity() {
        let mut comb = CombFilter::new(10);
        comb.set_delay_samples(1000);
        assert_eq!(comb.delay_samples(), 10);
        comb.set_delay_samples(0);
        assert_eq!(comb.delay_samples(), 1);
    }
}

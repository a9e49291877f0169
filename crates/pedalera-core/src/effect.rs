//! Core [`Effect`] trait: the per-frame processing contract.
//!
//! Every effect family implements this trait. The board engine drives the
//! stereo entry point once per sample for each bound slot; mono `process`
//! exists for effects (and tests) that have no channel interaction.

use crate::math::mono_sum;

/// Core trait for all audio effects.
///
/// Effects process normalized floating-point samples one frame at a time.
/// The trait is object-safe so preallocated pool instances can be dispatched
/// through `&mut dyn` without heap allocation in the audio path.
///
/// # Example
///
/// ```rust
/// use pedalera_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single mono sample.
    ///
    /// For effects with internal state (filters, delays, etc.) this advances
    /// the state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    ///
    /// Default implementation mono-sums the pair, processes once, and
    /// duplicates the result. Stereo effects override this; it is the entry
    /// point the board engine calls.
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let out = self.process(mono_sum(left, right));
        (out, out)
    }

    /// Update the sample rate.
    ///
    /// Effects recalculate any rate-dependent coefficients (delay times in
    /// samples, envelope coefficients, LFO increments).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal audio state without changing parameters.
    ///
    /// Called when an instance is (re)bound to a slot so stale delay-line or
    /// filter content from a previous patch never bleeds into the new one.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn mono_processing() {
        let mut gain = Gain(2.0);
        assert_eq!(gain.process(0.5), 1.0);
    }

    #[test]
    fn default_stereo_mono_sums() {
        let mut gain = Gain(2.0);
        let (l, r) = gain.process_stereo(1.0, 0.0);
        assert_eq!(l, 1.0);
        assert_eq!(r, 1.0);
    }
}

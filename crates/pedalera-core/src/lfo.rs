//! Low-frequency oscillator for modulation (chorus, pan sweeps).

use libm::sinf;

/// LFO output waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoWaveform {
    /// Sine wave.
    #[default]
    Sine,
    /// Triangle wave.
    Triangle,
}

/// Phase-accumulating low-frequency oscillator.
///
/// Output is bipolar in [-1, 1]; [`next_unipolar`](Lfo::next_unipolar)
/// rescales to [0, 1] for delay/pan modulation.
#[derive(Debug, Clone)]
pub struct Lfo {
    waveform: LfoWaveform,
    /// Phase in turns, [0, 1).
    phase: f32,
    increment: f32,
    freq_hz: f32,
    sample_rate: f32,
}

impl Lfo {
    /// Create an LFO at the given rate.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut lfo = Self {
            waveform: LfoWaveform::Sine,
            phase: 0.0,
            increment: 0.0,
            freq_hz,
            sample_rate,
        };
        lfo.recalculate_increment();
        lfo
    }

    /// Set the oscillation frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq_hz = freq_hz.max(0.0);
        self.recalculate_increment();
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq_hz
    }

    /// Select the output waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Set the phase directly, in turns [0, 1). Used for stereo quadrature
    /// offsets between paired LFOs.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase - libm::floorf(phase);
    }

    /// Restart from phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance one sample and return the bipolar output in [-1, 1].
    #[inline]
    pub fn next(&mut self) -> f32 {
        let out = match self.waveform {
            LfoWaveform::Sine => sinf(core::f32::consts::TAU * self.phase),
            LfoWaveform::Triangle => {
                // 0→1→0→-1→0 over one turn
                if self.phase < 0.25 {
                    4.0 * self.phase
                } else if self.phase < 0.75 {
                    2.0 - 4.0 * self.phase
                } else {
                    4.0 * self.phase - 4.0
                }
            }
        };
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    /// Advance one sample and return the unipolar output in [0, 1].
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        0.5 * (self.next() + 1.0)
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_increment();
    }

    fn recalculate_increment(&mut self) {
        self.increment = if self.sample_rate > 0.0 {
            self.freq_hz / self.sample_rate
        } else {
            0.0
        };
    }
}

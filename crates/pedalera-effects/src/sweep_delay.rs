//! Stereo sweep delay: mono-summed repeats panned across the field by an LFO.

use pedalera_core::{
    Effect, InterpolatedDelay, Lfo, NoteDivision, ParamDescriptor, ParamUnit, ParameterInfo,
    SmoothedParam, TempoSource, flush_denormal, mono_sum, ms_to_samples,
};

const MAX_DELAY_SECONDS: f32 = 2.0;
const FREE_TIME_MIN_MS: f32 = 10.0;
const FREE_TIME_MAX_MS: f32 = 2000.0;
const PAN_RATE_MIN_HZ: f32 = 0.05;
const PAN_RATE_MAX_HZ: f32 = 5.0;

/// Tempo-synced delay whose wet signal sweeps between the channels.
///
/// The input is mono-summed into both delay lines; a sine LFO pans the
/// delayed signal left-to-right. At zero pan depth both channels receive
/// equal halves of the wet signal.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Free Time | 10–2000 ms | 250.0 |
/// | 1 | Division | 0–7 | 0 (quarter) |
/// | 2 | Synced | 0/1 | 1 |
/// | 3 | Feedback | 0–0.95 | 0.4 |
/// | 4 | Mix | 0–1 | 0.6 |
/// | 5 | Pan Depth | 0–1 | 1.0 |
/// | 6 | Pan Rate | 0.05–5 Hz | 0.5 |
#[derive(Debug, Clone)]
pub struct SweepDelay {
    line_l: InterpolatedDelay,
    line_r: InterpolatedDelay,
    pan_lfo: Lfo,
    tempo: Option<&'static TempoSource>,
    synced: bool,
    division: NoteDivision,
    free_time_ms: f32,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    pan_depth: SmoothedParam,
    sample_rate: f32,
}

impl SweepDelay {
    /// Create a sweep delay at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line_l: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_SECONDS),
            line_r: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_SECONDS),
            pan_lfo: Lfo::new(sample_rate, 0.5),
            tempo: None,
            synced: true,
            division: NoteDivision::Quarter,
            free_time_ms: 250.0,
            feedback: SmoothedParam::standard(0.4, sample_rate),
            mix: SmoothedParam::standard(0.6, sample_rate),
            pan_depth: SmoothedParam::standard(1.0, sample_rate),
            sample_rate,
        }
    }

    /// Attach (or detach) the shared tempo the synced mode follows.
    pub fn set_tempo_source(&mut self, tempo: Option<&'static TempoSource>) {
        self.tempo = tempo;
    }

    /// Set the free-running delay time in milliseconds.
    pub fn set_free_time_ms(&mut self, ms: f32) {
        self.free_time_ms = ms.clamp(FREE_TIME_MIN_MS, FREE_TIME_MAX_MS);
    }

    /// Select the tempo-synced note division.
    pub fn set_division(&mut self, division: NoteDivision) {
        self.division = division;
    }

    /// Enable or disable tempo sync.
    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    /// Set feedback amount (0–0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set wet/dry mix (0–1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set pan sweep depth (0 = centered, 1 = full width).
    pub fn set_pan_depth(&mut self, depth: f32) {
        self.pan_depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Set pan sweep rate in Hz (0.05–5).
    pub fn set_pan_rate_hz(&mut self, rate_hz: f32) {
        self.pan_lfo
            .set_frequency(rate_hz.clamp(PAN_RATE_MIN_HZ, PAN_RATE_MAX_HZ));
    }

    fn period_samples(&self) -> f32 {
        let samples = match (self.synced, self.tempo.and_then(TempoSource::bpm)) {
            (true, Some(bpm)) => self.division.to_samples(bpm, self.sample_rate),
            _ => ms_to_samples(self.free_time_ms, self.sample_rate),
        };
        samples.clamp(1.0, (self.line_l.capacity() - 1) as f32)
    }
}

impl Effect for SweepDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        mono_sum(l, r)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let period = self.period_samples();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();
        let depth = self.pan_depth.advance();

        let delayed_l = self.line_l.read(period);
        let delayed_r = self.line_r.read(period);

        // Repeats are fed mono so the sweep fully owns the stereo image
        let mono = mono_sum(left, right);
        self.line_l.write(flush_denormal(mono + delayed_l * feedback));
        self.line_r.write(flush_denormal(mono + delayed_r * feedback));

        // Equal-sum pan: depth 0 holds both sides at 0.5
        let pan = self.pan_lfo.next_unipolar();
        let pan_l = (1.0 - depth) * 0.5 + depth * (1.0 - pan);
        let pan_r = (1.0 - depth) * 0.5 + depth * pan;

        let dry = 1.0 - mix;
        (
            left * dry + delayed_l * pan_l * mix,
            right * dry + delayed_r * pan_r * mix,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.pan_lfo.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.pan_depth.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.pan_lfo.reset();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
        self.pan_depth.snap_to_target();
    }
}

impl ParameterInfo for SweepDelay {
    fn param_count(&self) -> usize {
        7
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Free Time",
                short_name: "Time",
                unit: ParamUnit::Milliseconds,
                min: FREE_TIME_MIN_MS,
                max: FREE_TIME_MAX_MS,
                default: 250.0,
            }),
            1 => Some(ParamDescriptor {
                name: "Division",
                short_name: "Div",
                unit: ParamUnit::Index,
                min: 0.0,
                max: 7.0,
                default: 0.0,
            }),
            2 => Some(ParamDescriptor {
                name: "Synced",
                short_name: "Sync",
                unit: ParamUnit::Index,
                min: 0.0,
                max: 1.0,
                default: 1.0,
            }),
            3 => Some(ParamDescriptor {
                name: "Feedback",
                short_name: "Fdbk",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 0.95,
                default: 0.4,
            }),
            4 => Some(ParamDescriptor {
                name: "Mix",
                short_name: "Mix",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.6,
            }),
            5 => Some(ParamDescriptor {
                name: "Pan Depth",
                short_name: "Depth",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 1.0,
            }),
            6 => Some(ParamDescriptor {
                name: "Pan Rate",
                short_name: "Rate",
                unit: ParamUnit::Hertz,
                min: PAN_RATE_MIN_HZ,
                max: PAN_RATE_MAX_HZ,
                default: 0.5,
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.free_time_ms,
            1 => f32::from(self.division.index()),
            2 => f32::from(u8::from(self.synced)),
            3 => self.feedback.target(),
            4 => self.mix.target(),
            5 => self.pan_depth.target(),
            6 => self.pan_lfo.frequency(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_free_time_ms(value),
            1 => self.set_division(NoteDivision::from_index((value + 0.5) as u8)),
            2 => self.set_synced(value >= 0.5),
            3 => self.set_feedback(value),
            4 => self.set_mix(value),
            5 => self.set_pan_depth(value),
            6 => self.set_pan_rate_hz(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_running(sample_rate: f32) -> SweepDelay {
        let mut sweep = SweepDelay::new(sample_rate);
        sweep.set_synced(false);
        sweep
    }

    #[test]
    fn wet_signal_is_mono_summed_into_lines() {
        let mut sweep = free_running(48000.0);
        sweep.set_free_time_ms(10.0); // 480 samples
        sweep.set_mix(1.0);
        sweep.set_feedback(0.0);
        sweep.set_pan_depth(0.0);
        sweep.reset();

        // Hard-left input; the echo must appear on both channels
        sweep.process_stereo(1.0, 0.0);
        for _ in 0..480 {
            sweep.process_stereo(0.0, 0.0);
        }
        let (l, r) = sweep.process_stereo(0.0, 0.0);
        // mono sum 0.5, centered pan 0.5 each side
        assert!((l - 0.25).abs() < 0.01, "left echo {l}");
        assert!((r - 0.25).abs() < 0.01, "right echo {r}");
    }

    #[test]
    fn pan_depth_zero_keeps_channels_equal() {
        let mut sweep = free_running(48000.0);
        sweep.set_free_time_ms(20.0);
        sweep.set_mix(1.0);
        sweep.set_pan_depth(0.0);
        sweep.set_feedback(0.5);
        sweep.reset();

        sweep.process_stereo(1.0, 1.0);
        for _ in 0..10000 {
            let (l, r) = sweep.process_stereo(0.0, 0.0);
            assert!((l - r).abs() < 1e-5, "channels must match at depth 0");
        }
    }

    #[test]
    fn full_depth_sweeps_the_image() {
        let mut sweep = free_running(48000.0);
        sweep.set_free_time_ms(10.0);
        sweep.set_mix(1.0);
        sweep.set_pan_depth(1.0);
        sweep.set_pan_rate_hz(5.0);
        sweep.set_feedback(0.9);
        sweep.reset();

        // Drive repeats and watch the L/R balance move both ways
        let mut bias_l = false;
        let mut bias_r = false;
        for n in 0..48000 {
            let input = if n % 480 == 0 { 1.0 } else { 0.0 };
            let (l, r) = sweep.process_stereo(input, input);
            if l - r > 0.05 {
                bias_l = true;
            }
            if r - l > 0.05 {
                bias_r = true;
            }
        }
        assert!(bias_l && bias_r, "sweep should favor each side in turn");
    }

    #[test]
    fn output_stays_finite_at_extremes() {
        let mut sweep = free_running(48000.0);
        sweep.set_feedback(0.95);
        sweep.set_mix(1.0);
        sweep.set_free_time_ms(10.0);
        sweep.reset();
        for _ in 0..20000 {
            let (l, r) = sweep.process_stereo(1.0, -1.0);
            assert!(l.is_finite() && r.is_finite());
        }
    }

    #[test]
    fn param_roundtrip() {
        let mut sweep = SweepDelay::new(48000.0);
        sweep.set_param(5, 0.7);
        assert!((sweep.get_param(5) - 0.7).abs() < 1e-6);
        sweep.set_param(6, 2.0);
        assert!((sweep.get_param(6) - 2.0).abs() < 1e-6);
        // Rate clamps to its range
        sweep.set_param(6, 100.0);
        assert!((sweep.get_param(6) - PAN_RATE_MAX_HZ).abs() < 1e-6);
    }
}

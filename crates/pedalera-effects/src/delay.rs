//! Tempo-synced stereo feedback delay.

use pedalera_core::{
    Effect, InterpolatedDelay, NoteDivision, ParamDescriptor, ParamUnit, ParameterInfo,
    SmoothedParam, TempoSource, flush_denormal, ms_to_samples,
};

/// Maximum delay period in seconds (two full seconds of buffer per channel).
const MAX_DELAY_SECONDS: f32 = 2.0;

/// Free-running delay time range in milliseconds.
const FREE_TIME_MIN_MS: f32 = 10.0;
const FREE_TIME_MAX_MS: f32 = 2000.0;

/// Stereo feedback delay that follows the shared tap tempo.
///
/// When synced and a valid tempo is available, the delay period tracks the
/// selected [`NoteDivision`] at the published BPM; otherwise the free time
/// knob is used. Both channels run independent delay lines.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Free Time | 10–2000 ms | 250.0 |
/// | 1 | Division | 0–7 | 0 (quarter) |
/// | 2 | Synced | 0/1 | 1 |
/// | 3 | Feedback | 0–0.95 | 0.4 |
/// | 4 | Mix | 0–1 | 0.5 |
#[derive(Debug, Clone)]
pub struct Delay {
    line_l: InterpolatedDelay,
    line_r: InterpolatedDelay,
    tempo: Option<&'static TempoSource>,
    synced: bool,
    division: NoteDivision,
    free_time_ms: f32,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Delay {
    /// Create a delay at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line_l: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_SECONDS),
            line_r: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_SECONDS),
            tempo: None,
            synced: true,
            division: NoteDivision::Quarter,
            free_time_ms: 250.0,
            feedback: SmoothedParam::standard(0.4, sample_rate),
            mix: SmoothedParam::standard(0.5, sample_rate),
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

    /// Current delay period in samples, after sync resolution.
    fn period_samples(&self) -> f32 {
        let samples = match (self.synced, self.tempo.and_then(TempoSource::bpm)) {
            (true, Some(bpm)) => self.division.to_samples(bpm, self.sample_rate),
            _ => ms_to_samples(self.free_time_ms, self.sample_rate),
        };
        samples.clamp(1.0, (self.line_l.capacity() - 1) as f32)
    }
}

impl Effect for Delay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let period = self.period_samples();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        let delayed = self.line_l.read(period);
        self.line_l.write(flush_denormal(input + delayed * feedback));

        input * (1.0 - mix) + delayed * mix
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let period = self.period_samples();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        let delayed_l = self.line_l.read(period);
        let delayed_r = self.line_r.read(period);
        self.line_l.write(flush_denormal(left + delayed_l * feedback));
        self.line_r.write(flush_denormal(right + delayed_r * feedback));

        let dry = 1.0 - mix;
        (left * dry + delayed_l * mix, right * dry + delayed_r * mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Delay {
    fn param_count(&self) -> usize {
        5
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
            _ => {}
        }
    }
}

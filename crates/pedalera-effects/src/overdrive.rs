//! Soft-clipping overdrive with auto-leveled gain staging.

use pedalera_core::{
    DcBlocker, Effect, ParamDescriptor, ParamUnit, ParameterInfo, soft_clip,
};

/// Musical overdrive: polynomial pre-gain curve into a cubic soft clipper,
/// with a post-gain computed so perceived level stays roughly constant as
/// drive increases.
///
/// The tone control blends the clipped signal against a one-pole lowpassed
/// copy — low settings are warm, high settings bright. A DC blocker on each
/// channel removes the offset the waveshaper can introduce.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Drive | 0–1 | 0.5 |
/// | 1 | Tone | 0–1 | 0.5 |
#[derive(Debug, Clone)]
pub struct Overdrive {
    drive: f32,
    tone: f32,
    pre_gain: f32,
    post_gain: f32,
    lp_l: f32,
    lp_r: f32,
    dc_l: DcBlocker,
    dc_r: DcBlocker,
}

impl Overdrive {
    /// Create an overdrive. The sample rate does not affect the waveshaper;
    /// the argument keeps the constructor uniform across families.
    pub fn new(_sample_rate: f32) -> Self {
        let mut od = Self {
            drive: 0.5,
            tone: 0.5,
            pre_gain: 1.0,
            post_gain: 1.0,
            lp_l: 0.0,
            lp_r: 0.0,
            dc_l: DcBlocker::new(),
            dc_r: DcBlocker::new(),
        };
        od.set_drive(0.5);
        od
    }

    /// Set the drive amount (0–1) and recompute the gain staging.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(0.0, 1.0);
        let d = 2.0 * self.drive;

        // Polynomial pre-gain curve: gentle at low drive, steep at the top
        let d2 = d * d;
        let pre_a = d * 0.5;
        let pre_b = d2 * d2 * d * 24.0;
        self.pre_gain = pre_a + (pre_b - pre_a) * d2;

        // Auto-leveling: normalize against the clipped level of a reference
        // amplitude so the output volume tracks the input volume
        let drive_squashed = d * (2.0 - d);
        self.post_gain = 1.0 / soft_clip(0.33 + drive_squashed * (self.pre_gain - 0.33));
    }

    /// Set the tone (0 = dark, 1 = bright).
    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone.clamp(0.0, 1.0);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        soft_clip(x * self.pre_gain) * self.post_gain
    }

    #[inline]
    fn tone_blend(tone: f32, shaped: f32, lp: &mut f32) -> f32 {
        let coeff = 0.05 + 0.4 * (1.0 - tone);
        *lp += coeff * (shaped - *lp);
        tone * shaped + (1.0 - tone) * *lp
    }
}

impl Effect for Overdrive {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let shaped = self.shape(input);
        let out = Self::tone_blend(self.tone, shaped, &mut self.lp_l);
        self.dc_l.process(out)
    }

    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let shaped_l = self.shape(left);
        let shaped_r = self.shape(right);

        let out_l = Self::tone_blend(self.tone, shaped_l, &mut self.lp_l);
        let out_r = Self::tone_blend(self.tone, shaped_r, &mut self.lp_r);

        (self.dc_l.process(out_l), self.dc_r.process(out_r))
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.lp_l = 0.0;
        self.lp_r = 0.0;
        self.dc_l.reset();
        self.dc_r.reset();
    }
}

impl ParameterInfo for Overdrive {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Drive",
                short_name: "Drive",
                unit: ParamUnit::Amount,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            1 => Some(ParamDescriptor {
                name: "Tone",
                short_name: "Tone",
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
            0 => self.drive,
            1 => self.tone,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_drive(value),
            1 => self.set_tone(value),
            _ => {}
        }
    }
}

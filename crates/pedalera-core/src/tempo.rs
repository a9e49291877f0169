//! Shared tempo state and musical subdivisions for tempo-synced effects.
//!
//! [`TempoSource`] is written by the control path (tap tempo, MIDI clock)
//! and read from the audio interrupt by tempo-synced delays. Both fields are
//! individually atomic, so a reader can never observe a torn BPM value;
//! staleness of one update is acceptable by design.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use libm::floorf;

/// Lowest BPM a publisher may store.
pub const BPM_MIN: f32 = 40.0;

/// Highest BPM a publisher may store.
pub const BPM_MAX: f32 = 240.0;

/// Cross-thread shared tempo value.
///
/// The BPM is stored as an `f32` bit pattern in an `AtomicU32`. Publication
/// order is bpm-then-valid with Release stores; readers check `valid` with
/// an Acquire load before reading the bpm, so a `Some` result always carries
/// a fully published value.
///
/// # Example
///
/// ```rust
/// use pedalera_core::TempoSource;
///
/// static TEMPO: TempoSource = TempoSource::new();
///
/// TEMPO.publish(120.0);
/// assert_eq!(TEMPO.bpm(), Some(120.0));
/// ```
#[derive(Debug)]
pub struct TempoSource {
    bpm_bits: AtomicU32,
    valid: AtomicBool,
}

impl TempoSource {
    /// Create an invalid (no tempo yet) source. `const` so the source can
    /// live in a `static` with no runtime initialization.
    pub const fn new() -> Self {
        Self {
            bpm_bits: AtomicU32::new(0),
            valid: AtomicBool::new(false),
        }
    }

    /// Publish a new tempo and mark the source valid.
    ///
    /// Callers are responsible for clamping to [[`BPM_MIN`], [`BPM_MAX`]];
    /// the estimator does this before publishing.
    pub fn publish(&self, bpm: f32) {
        debug_assert!((BPM_MIN..=BPM_MAX).contains(&bpm));
        self.bpm_bits.store(bpm.to_bits(), Ordering::Release);
        self.valid.store(true, Ordering::Release);
    }

    /// Mark the source invalid (e.g. on estimator reset).
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Current tempo, or `None` when no valid tempo has been published.
    pub fn bpm(&self) -> Option<f32> {
        if self.valid.load(Ordering::Acquire) {
            Some(f32::from_bits(self.bpm_bits.load(Ordering::Acquire)))
        } else {
            None
        }
    }

    /// Current tempo, falling back to `default` when invalid.
    pub fn bpm_or(&self, default: f32) -> f32 {
        self.bpm().unwrap_or(default)
    }
}

impl Default for TempoSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Musical note divisions for tempo-synced delay times.
///
/// The set matches the compiled-in division table of the pedal firmware:
/// straight divisions down to a sixty-fourth plus the two most useful
/// dotted/triplet feels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteDivision {
    /// Quarter note (1 beat).
    #[default]
    Quarter,
    /// Eighth note (1/2 beat).
    Eighth,
    /// Sixteenth note (1/4 beat).
    Sixteenth,
    /// Thirty-second note (1/8 beat).
    ThirtySecond,
    /// Sixty-fourth note (1/16 beat).
    SixtyFourth,
    /// Dotted eighth note (3/8 beat).
    DottedEighth,
    /// Triplet sixteenth note (1/6 beat).
    TripletSixteenth,
    /// Triplet eighth note (1/3 beat).
    TripletEighth,
}

/// Number of divisions in the wire table.
pub const NUM_DIVISIONS: u8 = 8;

impl NoteDivision {
    /// Beats this division represents.
    pub fn beats(self) -> f32 {
        match self {
            NoteDivision::Quarter => 1.0,
            NoteDivision::Eighth => 0.5,
            NoteDivision::Sixteenth => 0.25,
            NoteDivision::ThirtySecond => 0.125,
            NoteDivision::SixtyFourth => 0.0625,
            NoteDivision::DottedEighth => 0.375,
            NoteDivision::TripletSixteenth => 1.0 / 6.0,
            NoteDivision::TripletEighth => 1.0 / 3.0,
        }
    }

    /// Period of this division in seconds at the given tempo.
    pub fn to_seconds(self, bpm: f32) -> f32 {
        let quarter = 60.0 / bpm.max(1.0);
        quarter * self.beats()
    }

    /// Period of this division in samples at the given tempo and rate.
    pub fn to_samples(self, bpm: f32, sample_rate: f32) -> f32 {
        self.to_seconds(bpm) * sample_rate
    }

    /// Map a wire index (0..8) to a division; out-of-range saturates to the
    /// last entry.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => NoteDivision::Quarter,
            1 => NoteDivision::Eighth,
            2 => NoteDivision::Sixteenth,
            3 => NoteDivision::ThirtySecond,
            4 => NoteDivision::SixtyFourth,
            5 => NoteDivision::DottedEighth,
            6 => NoteDivision::TripletSixteenth,
            _ => NoteDivision::TripletEighth,
        }
    }

    /// Wire index of this division.
    pub fn index(self) -> u8 {
        match self {
            NoteDivision::Quarter => 0,
            NoteDivision::Eighth => 1,
            NoteDivision::Sixteenth => 2,
            NoteDivision::ThirtySecond => 3,
            NoteDivision::SixtyFourth => 4,
            NoteDivision::DottedEighth => 5,
            NoteDivision::TripletSixteenth => 6,
            NoteDivision::TripletEighth => 7,
        }
    }

    /// Map a normalized [0, 1] wire value onto the division table.
    pub fn from_normalized(t: f32) -> Self {
        let scaled = floorf(t.clamp(0.0, 1.0) * (NUM_DIVISIONS - 1) as f32 + 0.5);
        Self::from_index(scaled as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_invalid() {
        let tempo = TempoSource::new();
        assert_eq!(tempo.bpm(), None);
        assert_eq!(tempo.bpm_or(120.0), 120.0);
    }

    #[test]
    fn publish_and_read() {
        let tempo = TempoSource::new();
        tempo.publish(92.5);
        assert_eq!(tempo.bpm(), Some(92.5));
        assert_eq!(tempo.bpm_or(120.0), 92.5);
    }

    #[test]
    fn invalidate_hides_value() {
        let tempo = TempoSource::new();
        tempo.publish(100.0);
        tempo.invalidate();
        assert_eq!(tempo.bpm(), None);
    }

    #[test]
    fn works_as_static() {
        static TEMPO: TempoSource = TempoSource::new();
        TEMPO.publish(140.0);
        assert_eq!(TEMPO.bpm(), Some(140.0));
        TEMPO.invalidate();
    }

    #[test]
    fn division_seconds_at_120() {
        // 120 BPM: quarter = 0.5 s, eighth = 0.25 s
        assert!((NoteDivision::Quarter.to_seconds(120.0) - 0.5).abs() < 1e-6);
        assert!((NoteDivision::Eighth.to_seconds(120.0) - 0.25).abs() < 1e-6);
        assert!((NoteDivision::DottedEighth.to_seconds(120.0) - 0.1875).abs() < 1e-6);
    }

    #[test]
    fn division_samples() {
        // 120 BPM at 48 kHz: quarter note = 24000 samples
        assert!((NoteDivision::Quarter.to_samples(120.0, 48000.0) - 24000.0).abs() < 0.5);
    }

    #[test]
    fn index_roundtrip() {
        for i in 0..NUM_DIVISIONS {
            assert_eq!(NoteDivision::from_index(i).index(), i);
        }
        // Saturation past the table end
        assert_eq!(NoteDivision::from_index(200), NoteDivision::TripletEighth);
    }

    #[test]
    fn normalized_maps_endpoints() {
        assert_eq!(NoteDivision::from_normalized(0.0), NoteDivision::Quarter);
        assert_eq!(NoteDivision::from_normalized(1.0), NoteDivision::TripletEighth);
    }
}

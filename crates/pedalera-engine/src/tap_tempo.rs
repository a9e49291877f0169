//! Tap-tempo estimation.
//!
//! Converts footswitch tap timestamps into a smoothed BPM, publishes it to
//! the shared [`TempoSource`], and notifies a broadcast listener (the MIDI
//! side) exactly once per accepted tap.

use pedalera_core::{BPM_MAX, BPM_MIN, TempoSource};

/// Shortest plausible tap interval: 0.1 s, i.e. 600 taps per minute.
pub const MIN_TAP_INTERVAL_US: u32 = 100_000;

/// Longest plausible tap interval: 2 s, i.e. 30 taps per minute.
pub const MAX_TAP_INTERVAL_US: u32 = 2_000_000;

/// Inactivity window after which the estimator should be expired by the
/// control loop. Sits above [`MAX_TAP_INTERVAL_US`] so an in-tempo tap can
/// never be expired; a stale first tap then costs nothing instead of one
/// rejected interval.
pub const TAP_IDLE_TIMEOUT_US: u32 = 3_000_000;

/// Receiver for accepted tempo updates (e.g. a MIDI broadcaster).
pub trait TempoListener {
    /// Called once per accepted tap with the newly published BPM.
    fn tempo_changed(&mut self, bpm: f32);
}

impl TempoListener for () {
    fn tempo_changed(&mut self, _bpm: f32) {}
}

/// Tap-interval tempo estimator.
///
/// Needs at least two taps to produce an estimate. Intervals outside the
/// plausible window are treated as noise: the running average is dropped
/// (the next tap starts a fresh one) and nothing is published. Accepted
/// intervals update the average with 75/25 exponential smoothing; the
/// resulting BPM is clamped to [[`BPM_MIN`], [`BPM_MAX`]] before
/// publication.
///
/// # Example
///
/// ```rust
/// use pedalera_core::TempoSource;
/// use pedalera_engine::TapTempo;
///
/// static TEMPO: TempoSource = TempoSource::new();
///
/// let mut tap = TapTempo::new(&TEMPO);
/// assert_eq!(tap.tap(1_000_000), None); // first tap arms
/// assert_eq!(tap.tap(1_500_000), Some(120.0)); // 500 ms interval
/// assert_eq!(TEMPO.bpm(), Some(120.0));
/// ```
#[derive(Debug)]
pub struct TapTempo<L = ()> {
    tempo: &'static TempoSource,
    listener: Option<L>,
    last_tap_us: u32,
    avg_tap_us: u32,
}

impl TapTempo {
    /// Create an estimator publishing to `tempo`, with no listener.
    pub fn new(tempo: &'static TempoSource) -> Self {
        Self {
            tempo,
            listener: None,
            last_tap_us: 0,
            avg_tap_us: 0,
        }
    }
}

impl<L: TempoListener> TapTempo<L> {
    /// Create an estimator that also notifies `listener` on every accepted
    /// tap.
    pub fn with_listener(tempo: &'static TempoSource, listener: L) -> Self {
        Self {
            tempo,
            listener: Some(listener),
            last_tap_us: 0,
            avg_tap_us: 0,
        }
    }

    /// Access the listener (for draining queued broadcasts in tests or the
    /// control loop).
    pub fn listener_mut(&mut self) -> Option<&mut L> {
        self.listener.as_mut()
    }

    /// Clear all tap history. The next tap arms a fresh measurement.
    pub fn reset(&mut self) {
        self.last_tap_us = 0;
        self.avg_tap_us = 0;
    }

    /// Expire the estimator if no tap has arrived within
    /// [`TAP_IDLE_TIMEOUT_US`]. The control loop polls this so a tap that
    /// arrives minutes after the last one is treated as a first tap rather
    /// than rejected as an implausible interval. Returns whether a reset
    /// happened.
    pub fn expire_if_idle(&mut self, now_us: u32) -> bool {
        if self.last_tap_us != 0 && now_us.wrapping_sub(self.last_tap_us) > TAP_IDLE_TIMEOUT_US {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Register a tap at the given monotonic microsecond timestamp.
    ///
    /// Returns the newly published BPM for an accepted tap, `None` for the
    /// arming first tap or a rejected interval. Every `Some` return has
    /// published to the shared tempo and notified the listener exactly
    /// once.
    pub fn tap(&mut self, now_us: u32) -> Option<f32> {
        if self.last_tap_us == 0 {
            self.last_tap_us = now_us;
            self.avg_tap_us = 0;
            return None;
        }

        let dt = now_us.wrapping_sub(self.last_tap_us);
        self.last_tap_us = now_us;

        if !(MIN_TAP_INTERVAL_US..=MAX_TAP_INTERVAL_US).contains(&dt) {
            // Noise: drop the average, keep the timestamp so the next
            // interval is measured from this tap
            self.avg_tap_us = 0;
            return None;
        }

        self.avg_tap_us = if self.avg_tap_us == 0 {
            dt
        } else {
            (self.avg_tap_us * 3 + dt) / 4
        };

        let seconds = self.avg_tap_us as f32 / 1e6;
        let bpm = (60.0 / seconds).clamp(BPM_MIN, BPM_MAX);

        self.tempo.publish(bpm);
        if let Some(listener) = &mut self.listener {
            listener.tempo_changed(bpm);
        }
        Some(bpm)
    }
}

//! Fixed-capacity effect instance pools.
//!
//! Every family gets a preallocated array sized to the worst case a patch
//! may request; memory for delay lines and reverb tanks is claimed once at
//! construction. A per-family cursor hands out instances in ascending
//! order, and resetting the cursors invalidates every previous binding
//! wholesale — there is no individual free.

use pedalera_core::{EffectWithParams, TempoSource};
use pedalera_effects::{Chorus, Compressor, Delay, Overdrive, Reverb, StereoMixer, SweepDelay};

use crate::patch::EffectType;

/// Pool capacities, bounded by SDRAM (delay buffers dominate).
pub const MAX_DELAYS: usize = 2;
/// Sweep delay pool capacity.
pub const MAX_SWEEPS: usize = 2;
/// Overdrive pool capacity.
pub const MAX_OVERDRIVES: usize = 4;
/// Mixer pool capacity.
pub const MAX_MIXERS: usize = 2;
/// Reverb pool capacity.
pub const MAX_REVERBS: usize = 2;
/// Compressor pool capacity.
pub const MAX_COMPRESSORS: usize = 4;
/// Chorus pool capacity.
pub const MAX_CHORUSES: usize = 4;

/// Non-owning reference to one pool instance.
///
/// A handle stays structurally valid across pool resets (the index is
/// always within capacity); logically it belongs to the patch application
/// that created it, and every patch application starts by invalidating all
/// previous bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectHandle {
    /// Which family's pool.
    pub ty: EffectType,
    /// Index within that pool.
    pub index: u8,
}

/// The preallocated instance pools for all seven families.
#[derive(Debug)]
pub struct EffectPools {
    delays: [Delay; MAX_DELAYS],
    sweeps: [SweepDelay; MAX_SWEEPS],
    overdrives: [Overdrive; MAX_OVERDRIVES],
    mixers: [StereoMixer; MAX_MIXERS],
    reverbs: [Reverb; MAX_REVERBS],
    compressors: [Compressor; MAX_COMPRESSORS],
    choruses: [Chorus; MAX_CHORUSES],

    delay_next: u8,
    sweep_next: u8,
    overdrive_next: u8,
    mixer_next: u8,
    reverb_next: u8,
    compressor_next: u8,
    chorus_next: u8,
}

impl EffectPools {
    /// Allocate every pool instance at the given sample rate. Tempo-synced
    /// families are wired to the shared tempo here, once.
    pub fn new(sample_rate: f32, tempo: &'static TempoSource) -> Self {
        Self {
            delays: core::array::from_fn(|_| {
                let mut delay = Delay::new(sample_rate);
                delay.set_tempo_source(Some(tempo));
                delay
            }),
            sweeps: core::array::from_fn(|_| {
                let mut sweep = SweepDelay::new(sample_rate);
                sweep.set_tempo_source(Some(tempo));
                sweep
            }),
            overdrives: core::array::from_fn(|_| Overdrive::new(sample_rate)),
            mixers: core::array::from_fn(|_| StereoMixer::new(sample_rate)),
            reverbs: core::array::from_fn(|_| Reverb::new(sample_rate)),
            compressors: core::array::from_fn(|_| Compressor::new(sample_rate)),
            choruses: core::array::from_fn(|_| Chorus::new(sample_rate)),
            delay_next: 0,
            sweep_next: 0,
            overdrive_next: 0,
            mixer_next: 0,
            reverb_next: 0,
            compressor_next: 0,
            chorus_next: 0,
        }
    }

    /// Invalidate all previous bindings; the next patch starts from the
    /// bottom of every pool.
    pub fn reset_cursors(&mut self) {
        self.delay_next = 0;
        self.sweep_next = 0;
        self.overdrive_next = 0;
        self.mixer_next = 0;
        self.reverb_next = 0;
        self.compressor_next = 0;
        self.chorus_next = 0;
    }

    /// Hand out the next free instance of `ty`, or `None` when the pool is
    /// exhausted (the caller degrades that slot to passthrough).
    pub fn instantiate(&mut self, ty: EffectType) -> Option<EffectHandle> {
        let cursor = match ty {
            EffectType::Off => return None,
            EffectType::Delay => take_cursor(&mut self.delay_next, MAX_DELAYS),
            EffectType::SweepDelay => take_cursor(&mut self.sweep_next, MAX_SWEEPS),
            EffectType::Overdrive => take_cursor(&mut self.overdrive_next, MAX_OVERDRIVES),
            EffectType::Mixer => take_cursor(&mut self.mixer_next, MAX_MIXERS),
            EffectType::Reverb => take_cursor(&mut self.reverb_next, MAX_REVERBS),
            EffectType::Compressor => take_cursor(&mut self.compressor_next, MAX_COMPRESSORS),
            EffectType::Chorus => take_cursor(&mut self.chorus_next, MAX_CHORUSES),
        };
        cursor.map(|index| EffectHandle { ty, index })
    }

    /// Resolve a handle to its instance.
    pub fn effect_mut(&mut self, handle: EffectHandle) -> &mut dyn EffectWithParams {
        let i = handle.index as usize;
        match handle.ty {
            EffectType::Delay => &mut self.delays[i],
            EffectType::SweepDelay => &mut self.sweeps[i],
            EffectType::Overdrive => &mut self.overdrives[i],
            EffectType::Mixer => &mut self.mixers[i],
            EffectType::Reverb => &mut self.reverbs[i],
            EffectType::Compressor => &mut self.compressors[i],
            EffectType::Chorus => &mut self.choruses[i],
            // `instantiate` never builds an Off handle; resolve to a unity
            // mixer rather than panic if a stale one slips through
            EffectType::Off => &mut self.mixers[0],
        }
    }

    /// Capacity of the pool backing `ty`.
    pub fn capacity(ty: EffectType) -> usize {
        match ty {
            EffectType::Off => 0,
            EffectType::Delay => MAX_DELAYS,
            EffectType::SweepDelay => MAX_SWEEPS,
            EffectType::Overdrive => MAX_OVERDRIVES,
            EffectType::Mixer => MAX_MIXERS,
            EffectType::Reverb => MAX_REVERBS,
            EffectType::Compressor => MAX_COMPRESSORS,
            EffectType::Chorus => MAX_CHORUSES,
        }
    }
}

fn take_cursor(next: &mut u8, capacity: usize) -> Option<u8> {
    if (*next as usize) < capacity {
        let index = *next;
        *next += 1;
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEMPO: TempoSource = TempoSource::new();

    #[test]
    fn allocation_is_ascending_and_bounded() {
        let mut pools = EffectPools::new(48000.0, &TEMPO);
        let a = pools.instantiate(EffectType::Overdrive).unwrap();
        let b = pools.instantiate(EffectType::Overdrive).unwrap();
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);

        for _ in 2..MAX_OVERDRIVES {
            assert!(pools.instantiate(EffectType::Overdrive).is_some());
        }
        assert!(pools.instantiate(EffectType::Overdrive).is_none());
    }

    #[test]
    fn pools_are_independent() {
        let mut pools = EffectPools::new(48000.0, &TEMPO);
        for _ in 0..MAX_DELAYS {
            assert!(pools.instantiate(EffectType::Delay).is_some());
        }
        assert!(pools.instantiate(EffectType::Delay).is_none());
        // Exhausting delays must not affect reverbs
        assert!(pools.instantiate(EffectType::Reverb).is_some());
    }

    #[test]
    fn reset_reclaims_everything() {
        let mut pools = EffectPools::new(48000.0, &TEMPO);
        for _ in 0..MAX_CHORUSES {
            pools.instantiate(EffectType::Chorus);
        }
        assert!(pools.instantiate(EffectType::Chorus).is_none());
        pools.reset_cursors();
        let again = pools.instantiate(EffectType::Chorus).unwrap();
        assert_eq!(again.index, 0);
    }

    #[test]
    fn off_never_allocates() {
        let mut pools = EffectPools::new(48000.0, &TEMPO);
        assert!(pools.instantiate(EffectType::Off).is_none());
    }

    #[test]
    fn handles_resolve_to_working_instances() {
        let mut pools = EffectPools::new(48000.0, &TEMPO);
        let handle = pools.instantiate(EffectType::Compressor).unwrap();
        let effect = pools.effect_mut(handle);
        effect.reset();
        let (l, r) = effect.process_stereo(0.1, 0.1);
        assert!(l.is_finite() && r.is_finite());
    }
}

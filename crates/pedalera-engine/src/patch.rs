//! Patch description: which effects occupy which slots and how slots route.
//!
//! A patch arrives from the host (MIDI editor, preset storage) as an ordered
//! sequence of per-slot records. Everything here is plain `Copy` data; the
//! live board is built from it by [`AudioEngine::apply_patch`](crate::AudioEngine::apply_patch).

use crate::error::PatchError;

/// Routing sentinel: "read from the hardware input", not from a slot.
pub const ROUTE_INPUT: u8 = 255;

/// Number of pedalboard slots (compiled constant).
pub const MAX_SLOTS: usize = 12;

/// Maximum effect-intrinsic parameters a patch can set per slot.
pub const MAX_PARAMS_PER_SLOT: usize = 8;

/// How a slot treats its stereo channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPolicy {
    /// Follow the effect's natural behavior; mono-summed inputs collapse
    /// the processed signal to mono as well.
    #[default]
    Auto,
    /// Collapse the processed signal to mono regardless of input.
    ForceMono,
    /// Keep both channels independent.
    ForceStereo,
}

impl ChannelPolicy {
    /// Lossy wire decoding; unknown values fall back to `Auto`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ChannelPolicy::ForceMono,
            2 => ChannelPolicy::ForceStereo,
            _ => ChannelPolicy::Auto,
        }
    }
}

/// The compiled-in effect families, tagged with their wire type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectType {
    /// Empty slot: pure passthrough.
    #[default]
    Off,
    /// Tempo-synced stereo delay.
    Delay,
    /// Soft-clipping overdrive.
    Overdrive,
    /// Delay with stereo pan sweep.
    SweepDelay,
    /// Two-branch stereo mixer.
    Mixer,
    /// Schroeder reverb.
    Reverb,
    /// Peak compressor.
    Compressor,
    /// Dual-LFO chorus.
    Chorus,
}

impl EffectType {
    /// Wire type id of this family.
    pub fn id(self) -> u8 {
        match self {
            EffectType::Off => 0,
            EffectType::Delay => 1,
            EffectType::Overdrive => 10,
            EffectType::SweepDelay => 12,
            EffectType::Mixer => 13,
            EffectType::Reverb => 14,
            EffectType::Compressor => 15,
            EffectType::Chorus => 16,
        }
    }

    /// Decode a wire type id; unknown ids map to `Off` so a patch from a
    /// newer host degrades to passthrough instead of failing.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => EffectType::Delay,
            10 => EffectType::Overdrive,
            12 => EffectType::SweepDelay,
            13 => EffectType::Mixer,
            14 => EffectType::Reverb,
            15 => EffectType::Compressor,
            16 => EffectType::Chorus,
            _ => EffectType::Off,
        }
    }
}

/// One effect-intrinsic parameter assignment.
///
/// `value` is normalized to [0, 1] on the wire and mapped to real units
/// through the target effect's parameter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlotParam {
    /// Parameter index within the effect.
    pub id: u8,
    /// Normalized value in [0, 1].
    pub value: f32,
}

/// Per-slot patch record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotDesc {
    /// Which effect family to bind (or `Off` for passthrough).
    pub effect: EffectType,
    /// Logical enable; disabled slots crossfade to their routed input.
    pub enabled: bool,
    /// Left-channel routing source: [`ROUTE_INPUT`] or an earlier slot index.
    pub input_l: u8,
    /// Right-channel routing source.
    pub input_r: u8,
    /// Collapse the routed input to mono before processing.
    pub sum_to_mono: bool,
    /// Dry mix coefficient.
    pub dry: f32,
    /// Wet mix coefficient.
    pub wet: f32,
    /// Channel handling mode.
    pub policy: ChannelPolicy,
    /// Effect-intrinsic parameter assignments.
    pub params: [SlotParam; MAX_PARAMS_PER_SLOT],
    /// Number of valid entries in `params`.
    pub param_count: u8,
}

impl SlotDesc {
    /// An empty slot: disabled passthrough routed from the hardware input.
    pub const fn passthrough() -> Self {
        Self {
            effect: EffectType::Off,
            enabled: false,
            input_l: ROUTE_INPUT,
            input_r: ROUTE_INPUT,
            sum_to_mono: false,
            dry: 0.0,
            wet: 1.0,
            policy: ChannelPolicy::Auto,
            params: [SlotParam { id: 0, value: 0.0 }; MAX_PARAMS_PER_SLOT],
            param_count: 0,
        }
    }

    /// Route both channels of this slot from `source`.
    pub fn routed_from(mut self, source: u8) -> Self {
        self.input_l = source;
        self.input_r = source;
        self
    }

    /// Set the wet/dry coefficients.
    pub fn with_mix(mut self, dry: f32, wet: f32) -> Self {
        self.dry = dry;
        self.wet = wet;
        self
    }

    /// Bind an effect family and enable the slot.
    pub fn with_effect(mut self, effect: EffectType) -> Self {
        self.effect = effect;
        self.enabled = true;
        self
    }

    /// Append a normalized parameter assignment (ignored once full).
    pub fn with_param(mut self, id: u8, value: f32) -> Self {
        if (self.param_count as usize) < MAX_PARAMS_PER_SLOT {
            self.params[self.param_count as usize] = SlotParam { id, value };
            self.param_count += 1;
        }
        self
    }

    /// The valid parameter assignments. A count beyond capacity (possible
    /// on a malformed wire record) is clamped rather than trusted.
    pub fn params(&self) -> &[SlotParam] {
        let count = (self.param_count as usize).min(MAX_PARAMS_PER_SLOT);
        &self.params[..count]
    }
}

impl Default for SlotDesc {
    fn default() -> Self {
        Self::passthrough()
    }
}

/// A complete patch: up to [`MAX_SLOTS`] slot records, in board order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchDesc {
    /// Slot records; only the first `slot_count` are meaningful.
    pub slots: [SlotDesc; MAX_SLOTS],
    /// Number of configured slots.
    pub slot_count: u8,
}

impl PatchDesc {
    /// An empty patch (no configured slots).
    pub const fn empty() -> Self {
        Self {
            slots: [SlotDesc::passthrough(); MAX_SLOTS],
            slot_count: 0,
        }
    }

    /// Build a patch from a slice of slot records.
    ///
    /// Returns [`PatchError::TooManySlots`] when the slice exceeds the
    /// board's capacity.
    pub fn from_slots(slots: &[SlotDesc]) -> Result<Self, PatchError> {
        if slots.len() > MAX_SLOTS {
            return Err(PatchError::TooManySlots(slots.len()));
        }
        let mut patch = Self::empty();
        for (i, desc) in slots.iter().enumerate() {
            patch.slots[i] = *desc;
        }
        patch.slot_count = slots.len() as u8;
        Ok(patch)
    }

    /// The configured slot records. A count beyond the board's capacity is
    /// clamped rather than trusted.
    pub fn slots(&self) -> &[SlotDesc] {
        let count = (self.slot_count as usize).min(MAX_SLOTS);
        &self.slots[..count]
    }

    /// Check the routing invariant: every source is the hardware input or a
    /// strictly earlier slot. Forward and self references would read output
    /// taps that have not been computed this frame, so such a patch is
    /// rejected before it can reach the live board.
    pub fn validate(&self) -> Result<(), PatchError> {
        for (i, slot) in self.slots().iter().enumerate() {
            for source in [slot.input_l, slot.input_r] {
                if source != ROUTE_INPUT && source as usize >= i {
                    return Err(PatchError::RouteNotEarlier {
                        slot: i as u8,
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for PatchDesc {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_type_wire_roundtrip() {
        for ty in [
            EffectType::Off,
            EffectType::Delay,
            EffectType::Overdrive,
            EffectType::SweepDelay,
            EffectType::Mixer,
            EffectType::Reverb,
            EffectType::Compressor,
            EffectType::Chorus,
        ] {
            assert_eq!(EffectType::from_id(ty.id()), ty);
        }
    }

    #[test]
    fn unknown_type_id_is_off() {
        assert_eq!(EffectType::from_id(99), EffectType::Off);
        assert_eq!(EffectType::from_id(2), EffectType::Off);
    }

    #[test]
    fn channel_policy_wire_decoding() {
        assert_eq!(ChannelPolicy::from_u8(0), ChannelPolicy::Auto);
        assert_eq!(ChannelPolicy::from_u8(1), ChannelPolicy::ForceMono);
        assert_eq!(ChannelPolicy::from_u8(2), ChannelPolicy::ForceStereo);
        assert_eq!(ChannelPolicy::from_u8(200), ChannelPolicy::Auto);
    }

    #[test]
    fn serial_chain_validates() {
        let slots = [
            SlotDesc::passthrough().with_effect(EffectType::Overdrive),
            SlotDesc::passthrough()
                .with_effect(EffectType::Delay)
                .routed_from(0),
            SlotDesc::passthrough()
                .with_effect(EffectType::Reverb)
                .routed_from(1),
        ];
        let patch = PatchDesc::from_slots(&slots).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn self_reference_rejected() {
        let slots = [SlotDesc::passthrough()
            .with_effect(EffectType::Delay)
            .routed_from(0)];
        let patch = PatchDesc::from_slots(&slots).unwrap();
        assert_eq!(
            patch.validate(),
            Err(PatchError::RouteNotEarlier { slot: 0, source: 0 })
        );
    }

    #[test]
    fn forward_reference_rejected() {
        let slots = [
            SlotDesc::passthrough()
                .with_effect(EffectType::Overdrive)
                .routed_from(2),
            SlotDesc::passthrough().with_effect(EffectType::Delay),
        ];
        let patch = PatchDesc::from_slots(&slots).unwrap();
        assert_eq!(
            patch.validate(),
            Err(PatchError::RouteNotEarlier { slot: 0, source: 2 })
        );
    }

    #[test]
    fn mixed_channel_routing_is_checked_per_channel() {
        let mut desc = SlotDesc::passthrough().with_effect(EffectType::Mixer);
        desc.input_l = ROUTE_INPUT;
        desc.input_r = 5; // forward reference on the right channel only
        let patch = PatchDesc::from_slots(&[desc]).unwrap();
        assert_eq!(
            patch.validate(),
            Err(PatchError::RouteNotEarlier { slot: 0, source: 5 })
        );
    }

    #[test]
    fn too_many_slots_rejected() {
        let slots = [SlotDesc::passthrough(); MAX_SLOTS + 1];
        assert_eq!(
            PatchDesc::from_slots(&slots),
            Err(PatchError::TooManySlots(MAX_SLOTS + 1))
        );
    }

    #[test]
    fn param_builder_caps_at_capacity() {
        let mut desc = SlotDesc::passthrough();
        for i in 0..12 {
            desc = desc.with_param(i, 0.5);
        }
        assert_eq!(desc.params().len(), MAX_PARAMS_PER_SLOT);
    }
}

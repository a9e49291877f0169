//! Factory patches.
//!
//! Canonical board setups shipped with the device: an empty serial chain
//! ready for host configuration, a bare passthrough, and a small playable
//! drive-into-delay chain.

use crate::patch::{EffectType, MAX_SLOTS, PatchDesc, ROUTE_INPUT, SlotDesc};

/// Twelve empty slots wired as a serial chain (slot 0 from the hardware
/// input, each later slot from its predecessor), wet-only. The host editor
/// fills in effects over this skeleton.
pub fn default_patch() -> PatchDesc {
    let mut patch = PatchDesc::empty();
    for i in 0..MAX_SLOTS {
        let source = if i == 0 { ROUTE_INPUT } else { (i - 1) as u8 };
        patch.slots[i] = SlotDesc::passthrough()
            .routed_from(source)
            .with_mix(0.0, 1.0);
    }
    patch.slot_count = MAX_SLOTS as u8;
    patch
}

/// Direct stereo passthrough: no configured slots at all.
pub fn passthrough_patch() -> PatchDesc {
    PatchDesc::empty()
}

/// A playable starter chain: overdrive into a tempo-synced delay with a
/// little parallel dry.
pub fn overdrive_delay_patch() -> PatchDesc {
    let drive = SlotDesc::passthrough()
        .with_effect(EffectType::Overdrive)
        .with_mix(0.0, 1.0)
        .with_param(0, 0.6) // drive
        .with_param(1, 0.7); // tone
    let delay = SlotDesc::passthrough()
        .with_effect(EffectType::Delay)
        .routed_from(0)
        .with_mix(0.6, 0.4)
        .with_param(2, 1.0) // synced
        .with_param(3, 0.4); // feedback

    // Validated by construction: serial routing over two slots
    PatchDesc::from_slots(&[drive, delay]).unwrap_or_else(|_| PatchDesc::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_patches_validate() {
        assert!(default_patch().validate().is_ok());
        assert!(passthrough_patch().validate().is_ok());
        assert!(overdrive_delay_patch().validate().is_ok());
    }

    #[test]
    fn default_patch_is_a_full_serial_chain() {
        let patch = default_patch();
        assert_eq!(patch.slot_count as usize, MAX_SLOTS);
        assert_eq!(patch.slots[0].input_l, ROUTE_INPUT);
        for i in 1..MAX_SLOTS {
            assert_eq!(patch.slots[i].input_l, (i - 1) as u8);
        }
        // Every slot is an empty wet-only passthrough
        for slot in patch.slots() {
            assert_eq!(slot.effect, EffectType::Off);
            assert_eq!(slot.dry, 0.0);
            assert_eq!(slot.wet, 1.0);
        }
    }

    #[test]
    fn starter_chain_shape() {
        let patch = overdrive_delay_patch();
        assert_eq!(patch.slot_count, 2);
        assert_eq!(patch.slots[0].effect, EffectType::Overdrive);
        assert_eq!(patch.slots[1].effect, EffectType::Delay);
        assert_eq!(patch.slots[1].input_l, 0);
    }
}

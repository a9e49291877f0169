//! Live pedalboard state shared between patch binding and the audio loop.

use crate::patch::{ChannelPolicy, EffectType, MAX_SLOTS, ROUTE_INPUT};
use crate::pools::EffectHandle;

/// Runtime state of one pedalboard slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRuntime {
    /// Bound pool instance, or `None` for passthrough.
    pub effect: Option<EffectHandle>,
    /// Family the binding came from (mirrors the patch record).
    pub effect_type: EffectType,
    /// Logical enable toggle.
    pub enabled: bool,
    /// Click-free bypass position: 1.0 = fully processed, 0.0 = fully
    /// bypassed. Ramps toward `enabled` a bounded step per sample.
    pub enabled_fade: f32,
    /// Left-channel routing source ([`ROUTE_INPUT`] or an earlier slot).
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
}

impl SlotRuntime {
    /// Passthrough slot routed from the given source.
    pub const fn passthrough(source: u8) -> Self {
        Self {
            effect: None,
            effect_type: EffectType::Off,
            enabled: false,
            enabled_fade: 0.0,
            input_l: source,
            input_r: source,
            sum_to_mono: false,
            dry: 0.0,
            wet: 1.0,
            policy: ChannelPolicy::Auto,
        }
    }
}

impl Default for SlotRuntime {
    fn default() -> Self {
        Self::passthrough(ROUTE_INPUT)
    }
}

/// The live board: slot array plus per-slot output taps.
///
/// `out_l`/`out_r` hold each slot's most recently computed output; later
/// slots read them as routing sources within the same frame, which is safe
/// because the routing invariant guarantees sources were processed first.
#[derive(Debug, Clone)]
pub struct PedalboardRuntime {
    /// Processing sample rate in Hz.
    pub sample_rate: f32,
    /// Slot state in board order.
    pub slots: [SlotRuntime; MAX_SLOTS],
    /// Per-slot left output taps.
    pub out_l: [f32; MAX_SLOTS],
    /// Per-slot right output taps.
    pub out_r: [f32; MAX_SLOTS],
}

impl PedalboardRuntime {
    /// Create a board with serial default routing (slot 0 from the hardware
    /// input, each later slot from its predecessor).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            slots: core::array::from_fn(Self::serial_slot),
            out_l: [0.0; MAX_SLOTS],
            out_r: [0.0; MAX_SLOTS],
        }
    }

    /// The serial-chain default for slot `index`.
    pub fn serial_slot(index: usize) -> SlotRuntime {
        let source = if index == 0 {
            ROUTE_INPUT
        } else {
            (index - 1) as u8
        };
        SlotRuntime::passthrough(source)
    }

    /// Clear the output taps. Needed when reinitializing the board, not per
    /// audio frame: every slot rewrites its tap each frame.
    pub fn reset_frame_buffers(&mut self) {
        self.out_l = [0.0; MAX_SLOTS];
        self.out_r = [0.0; MAX_SLOTS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routing_is_serial() {
        let board = PedalboardRuntime::new(48000.0);
        assert_eq!(board.slots[0].input_l, ROUTE_INPUT);
        for i in 1..MAX_SLOTS {
            assert_eq!(board.slots[i].input_l, (i - 1) as u8);
            assert_eq!(board.slots[i].input_r, (i - 1) as u8);
        }
    }

    #[test]
    fn passthrough_slots_start_bypassed() {
        let board = PedalboardRuntime::new(48000.0);
        for slot in &board.slots {
            assert!(slot.effect.is_none());
            assert!(!slot.enabled);
            assert_eq!(slot.enabled_fade, 0.0);
        }
    }

    #[test]
    fn reset_clears_taps() {
        let mut board = PedalboardRuntime::new(48000.0);
        board.out_l[3] = 0.7;
        board.out_r[5] = -0.2;
        board.reset_frame_buffers();
        assert!(board.out_l.iter().all(|&v| v == 0.0));
        assert!(board.out_r.iter().all(|&v| v == 0.0));
    }
}

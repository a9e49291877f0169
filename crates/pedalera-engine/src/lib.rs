//! Pedalera Engine - the patch-driven pedalboard runtime
//!
//! This crate binds everything together: a patch describes which effect
//! families occupy which of the board's twelve slots and how slots route
//! into each other; the engine builds that board from fixed preallocated
//! effect pools and runs it once per sample inside the audio callback.
//!
//! # Components
//!
//! - [`PatchDesc`]/[`SlotDesc`] - the device-side patch description
//! - [`EffectPools`] - fixed-capacity instance pools, reset wholesale on
//!   every patch application
//! - [`PedalboardRuntime`]/[`SlotRuntime`] - per-slot routing, mix, and
//!   bypass state plus the per-slot output taps later slots route from
//! - [`AudioEngine`] - patch binding ([`AudioEngine::apply_patch`]) and the
//!   per-sample routing loop ([`AudioEngine::process_block`])
//! - [`TapTempo`] - converts tap timestamps into a smoothed BPM, publishes
//!   it to the shared [`TempoSource`](pedalera_core::TempoSource), and
//!   notifies a [`TempoListener`] (MIDI broadcast) once per accepted tap
//! - [`presets`] - factory patches
//!
//! # Real-time discipline
//!
//! [`AudioEngine::process_block`] never allocates, never locks, and has no
//! failure path; every index it touches is bounded by construction. Patch
//! application takes the same `&mut AudioEngine` the audio callback needs,
//! so the two can never interleave in safe Rust; firmware runs
//! `apply_patch` inside its platform critical section, and the bounded
//! twelve-slot rebind fits comfortably inside a block deadline.
//!
//! # Example
//!
//! ```rust
//! use pedalera_core::TempoSource;
//! use pedalera_engine::{AudioEngine, presets};
//!
//! static TEMPO: TempoSource = TempoSource::new();
//!
//! let mut engine = AudioEngine::new(48000.0, &TEMPO);
//! engine.apply_patch(&presets::overdrive_delay_patch()).unwrap();
//!
//! let input = [0.1f32; 48];
//! let mut out_l = [0.0f32; 48];
//! let mut out_r = [0.0f32; 48];
//! engine.process_block(&input, &input, &mut out_l, &mut out_r);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod board;
pub mod engine;
pub mod error;
pub mod patch;
pub mod pools;
pub mod presets;
pub mod tap_tempo;

// Re-export main types at crate root
pub use board::{PedalboardRuntime, SlotRuntime};
pub use engine::{AudioEngine, PatchReport};
pub use error::PatchError;
pub use patch::{
    ChannelPolicy, EffectType, MAX_PARAMS_PER_SLOT, MAX_SLOTS, PatchDesc, ROUTE_INPUT, SlotDesc,
    SlotParam,
};
pub use pools::{EffectHandle, EffectPools};
pub use tap_tempo::{
    MAX_TAP_INTERVAL_US, MIN_TAP_INTERVAL_US, TAP_IDLE_TIMEOUT_US, TapTempo, TempoListener,
};

//! Pedalera Core - DSP primitives for the patch-driven pedal engine
//!
//! This crate provides the foundational building blocks the effect families
//! and the board engine are built from, designed for real-time processing
//! with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for per-frame audio processing
//! - [`ParameterInfo`] - Descriptor-driven parameter access
//! - [`EffectWithParams`] - Object-safe umbrella over both
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - Exponential smoothing for zipper-free changes
//!
//! ## Delay Lines & Filters
//!
//! - [`InterpolatedDelay`] - Variable-length delay with fractional reads
//! - [`CombFilter`] - Damped feedback comb for reverb tanks
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//! - [`DcBlocker`] - First-order DC removal
//!
//! ## Modulation & Dynamics
//!
//! - [`Lfo`] - Low-frequency oscillator
//! - [`EnvelopeFollower`] - Amplitude envelope detection
//!
//! ## Tempo
//!
//! - [`TempoSource`] - Cross-thread shared tempo (atomic fields)
//! - [`NoteDivision`] - Musical subdivisions for tempo-synced effects
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pedalera-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Object-safe traits**: Dynamic dispatch over preallocated instances

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod dc_blocker;
pub mod delay_line;
pub mod effect;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;
pub mod tempo;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use dc_blocker::DcBlocker;
pub use delay_line::{Interpolation, InterpolatedDelay};
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    db_to_linear, flush_denormal, lerp, linear_to_db, mono_sum, ms_to_samples, samples_to_ms,
    soft_clip, soft_limit,
};
pub use param::SmoothedParam;
pub use param_info::{EffectWithParams, ParamDescriptor, ParamUnit, ParameterInfo};
pub use tempo::{BPM_MAX, BPM_MIN, NUM_DIVISIONS, NoteDivision, TempoSource};

//! Pedalera Effects - the compiled-in effect families
//!
//! The seven families a patch can place into a pedalboard slot:
//!
//! - [`Delay`] - Tempo-synced stereo feedback delay
//! - [`SweepDelay`] - Mono-in delay with a stereo pan sweep on the wet path
//! - [`Overdrive`] - Soft-clipping overdrive with auto-leveling and tone
//! - [`StereoMixer`] - Two-branch mixer with cross-coupling
//! - [`Reverb`] - Schroeder reverb with predelay, damping, and size
//! - [`Compressor`] - Per-channel peak compressor with makeup gain
//! - [`Chorus`] - Dual-LFO modulated delay chorus
//!
//! Every family implements [`Effect`](pedalera_core::Effect) for per-frame
//! processing and [`ParameterInfo`](pedalera_core::ParameterInfo) so patch
//! application can configure instances by parameter index. Instances
//! allocate their delay buffers once at construction and never in the audio
//! path.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod overdrive;
pub mod reverb;
pub mod stereo_mixer;
pub mod sweep_delay;

// Re-export main types at crate root
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use delay::Delay;
pub use overdrive::Overdrive;
pub use reverb::Reverb;
pub use stereo_mixer::StereoMixer;
pub use sweep_delay::SweepDelay;

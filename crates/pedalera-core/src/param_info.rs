//! Parameter descriptors and runtime parameter access.
//!
//! Effects expose their knobs through [`ParameterInfo`] so patch application
//! and control surfaces can set parameters by index without knowing the
//! concrete type. Wire values travel normalized in [0, 1] and are mapped to
//! real units through [`ParamDescriptor::denormalize`].

use crate::effect::Effect;

/// Unit of a parameter, for display and range interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Dimensionless 0..1-style amount.
    Amount,
    /// Milliseconds.
    Milliseconds,
    /// Hertz.
    Hertz,
    /// Decibels.
    Decibels,
    /// Percentage (0-100).
    Percent,
    /// Ratio (e.g. compression ratio).
    Ratio,
    /// Discrete index into a fixed set (division tables, toggles).
    Index,
}

/// Static description of one effect parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Human-readable name.
    pub name: &'static str,
    /// Short name for constrained displays.
    pub short_name: &'static str,
    /// Unit of the real value.
    pub unit: ParamUnit,
    /// Minimum real value.
    pub min: f32,
    /// Maximum real value.
    pub max: f32,
    /// Default real value.
    pub default: f32,
}

impl ParamDescriptor {
    /// Map a normalized wire value in [0, 1] to the real range.
    #[inline]
    pub fn denormalize(&self, t: f32) -> f32 {
        self.min + t.clamp(0.0, 1.0) * (self.max - self.min)
    }

    /// Map a real value to its normalized [0, 1] position.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        if (self.max - self.min).abs() < f32::EPSILON {
            0.0
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }
}

/// Runtime parameter access for an effect.
///
/// Values passed to [`set_param`](Self::set_param) are in real units; the
/// effect clamps them to the descriptor range.
pub trait ParameterInfo {
    /// Number of parameters this effect exposes.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current real value of the parameter at `index` (0.0 past the end).
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index` to a real value. Out-of-range indices
    /// are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Set the parameter at `index` from a normalized [0, 1] wire value.
    fn set_param_normalized(&mut self, index: usize, t: f32) {
        if let Some(desc) = self.param_info(index) {
            self.set_param(index, desc.denormalize(t));
        }
    }
}

/// Object-safe umbrella over [`Effect`] + [`ParameterInfo`].
///
/// Pools hand out `&mut dyn EffectWithParams` so the engine can process and
/// configure bound instances without knowing their concrete family.
pub trait EffectWithParams: Effect + ParameterInfo {}

impl<T: Effect + ParameterInfo> EffectWithParams for T {}

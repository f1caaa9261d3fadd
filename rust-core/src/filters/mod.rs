//! Band-pass filter design and zero-phase filtering

pub mod design;
pub mod iir;
pub mod zero_phase;

pub use design::{design, BandpassCoefficients, FilterSpec, DEFAULT_ORDER};
pub use iir::IirFilter;
pub use zero_phase::apply;

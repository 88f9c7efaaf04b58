//! Spectrum visualizer: latest-frame sampling at a capped render cadence,
//! plus the four render modes.

mod modes;
mod sampler;

pub use modes::{Shape, VizMode, render};
pub use sampler::{BANDS, MAG_MAX, VizSampler};

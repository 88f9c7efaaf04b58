//! Playback engine adapter.
//!
//! Wraps `rodio` decode/playback in a dedicated thread driven by commands
//! and observed through events; also produces the spectrum-frame feed for
//! the visualizer.

mod engine;
mod sink;
mod spectrum;
mod thread;
mod types;

pub use engine::AudioEngine;
pub use types::{
    DB_FLOOR, EngineCmd, EngineEvent, EngineStatus, SPECTRUM_BANDS, SpectrumFrame,
};

#[cfg(test)]
mod tests;

//! Latest-value spectrum sampling, decoupled from the frame arrival rate.
//!
//! Frames arrive whenever the engine emits them (engine-driven, roughly
//! every 50 ms, possibly irregular); the render tick runs at the UI cadence
//! and is capped near 60 Hz. Only the newest frame is retained; the buffer
//! is a single-slot cache, not a queue. Writer (frame arrival) and reader
//! (tick) both live on the control context, so no locking is involved.

use std::time::{Duration, Instant};

use crate::audio::SPECTRUM_BANDS;

use super::modes::VizMode;

pub const BANDS: usize = SPECTRUM_BANDS;

/// Top of the shifted magnitude scale; render modes clamp against this.
pub const MAG_MAX: f32 = 60.0;

/// Raw engine magnitudes are dB-like in `[-60, 0]`; shifting by +60 makes
/// them non-negative.
const MAG_SHIFT: f32 = 60.0;

/// Minimum spacing between accepted render ticks (~60 FPS).
const FRAME_INTERVAL: Duration = Duration::from_micros(16_600);

pub struct VizSampler {
    levels: [f32; BANDS],
    last_render: Option<Instant>,
    mode: VizMode,
}

impl VizSampler {
    pub fn new(mode: VizMode) -> Self {
        Self {
            levels: [0.0; BANDS],
            last_render: None,
            mode,
        }
    }

    /// Store an incoming spectrum frame, wholesale. Missing bands read as
    /// zero; extra bands are dropped.
    pub fn on_frame(&mut self, raw: &[f32]) {
        for (i, level) in self.levels.iter_mut().enumerate() {
            *level = raw.get(i).map(|m| (m + MAG_SHIFT).max(0.0)).unwrap_or(0.0);
        }
    }

    /// Frame-rate cap: true when enough time has passed to render again.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_render {
            if now.duration_since(last) < FRAME_INTERVAL {
                return false;
            }
        }
        self.last_render = Some(now);
        true
    }

    pub fn levels(&self) -> &[f32; BANDS] {
        &self.levels
    }

    /// Zero the snapshot, e.g. when playback stops.
    pub fn reset(&mut self) {
        self.levels = [0.0; BANDS];
    }

    pub fn mode(&self) -> VizMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: VizMode) {
        self.mode = mode;
    }

    /// Mode switches take effect on the next accepted tick.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.cycle();
    }
}

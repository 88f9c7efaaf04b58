//! Engine command/event types.
//!
//! The engine thread consumes `EngineCmd` and reports back exclusively via
//! `EngineEvent` messages. Events are drained on the control context, so
//! shared playback state is never touched from the engine side.

use std::path::PathBuf;
use std::time::Duration;

use crate::library::TrackId;

/// Number of magnitude bands in a spectrum frame.
pub const SPECTRUM_BANDS: usize = 64;

/// Floor of the dB-like magnitude scale carried by spectrum frames; frames
/// hold values in `[DB_FLOOR, 0]`.
pub const DB_FLOOR: f32 = -60.0;

#[derive(Debug)]
pub enum EngineCmd {
    /// Tear down any current session, then decode and (optionally) start
    /// the given file.
    Load {
        track_id: TrackId,
        path: PathBuf,
        autoplay: bool,
    },
    /// Resume a paused session.
    Play,
    /// Pause the current session.
    Pause,
    /// Halt playback and release the session.
    Stop,
    /// Seek to an absolute position in the current session.
    Seek(Duration),
    /// Set output volume in `[0, 1]`.
    SetVolume(f32),
    /// Stop playback and exit the engine thread.
    Shutdown,
}

/// Engine-reported transport status; the single source of truth for
/// "is playing".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Stopped,
    Playing,
    Paused,
}

/// One spectrum-analysis snapshot, emitted while audio is playing.
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    pub magnitudes: [f32; SPECTRUM_BANDS],
}

#[derive(Debug)]
pub enum EngineEvent {
    /// A session was loaded; `duration` is absent when the container does
    /// not report one up front.
    Ready {
        track_id: TrackId,
        duration: Option<Duration>,
    },
    Position(Duration),
    Status(EngineStatus),
    EndOfMedia,
    Error(String),
    Spectrum(SpectrumFrame),
}

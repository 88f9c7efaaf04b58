//! The playback controller: single authority for which track is active and
//! what happens next.
//!
//! The controller runs on the control context. It sends commands to the
//! engine thread and consumes the engine's event stream; transport status
//! is synced strictly from engine-reported status, so commands and hardware
//! can disagree transiently without the UI drifting.

use std::sync::mpsc::Sender;
use std::time::Duration;

use rand::RngExt;

use crate::audio::{EngineCmd, EngineEvent, EngineStatus};
use crate::library::Catalog;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    None,
    /// Wrap around at either end of the queue.
    All,
    /// Replay the current track on every transition.
    One,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

/// Tri-state transport status; the play control derives its action from
/// this rather than a boolean.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What `previous()` does at the start of the queue without repeat-all.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PreviousAtStart {
    /// Restart the current track in place.
    #[default]
    Restart,
    /// Do nothing.
    Stay,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Trigger {
    EndOfTrack,
    Next,
    Previous,
}

/// The transition decision: which index plays next, or `None` for "no
/// further advance". Pure apart from the shuffle draw.
pub(crate) fn decide(
    trigger: Trigger,
    current: Option<usize>,
    len: usize,
    shuffle: bool,
    repeat: RepeatMode,
    previous_at_start: PreviousAtStart,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    // Repeat-one replays the current track regardless of shuffle.
    if repeat == RepeatMode::One {
        if let Some(i) = current {
            return Some(i);
        }
    }

    if shuffle {
        if len == 1 {
            return Some(0);
        }
        // Rejection sampling: uniform over all indices except the current.
        let mut rng = rand::rng();
        loop {
            let candidate = rng.random_range(0..len);
            if Some(candidate) != current {
                return Some(candidate);
            }
        }
    }

    match trigger {
        Trigger::Next | Trigger::EndOfTrack => {
            let Some(i) = current else {
                return Some(0);
            };
            if i + 1 < len {
                Some(i + 1)
            } else if repeat == RepeatMode::All {
                Some(0)
            } else {
                None
            }
        }
        Trigger::Previous => {
            let i = current?;
            if i > 0 {
                Some(i - 1)
            } else if repeat == RepeatMode::All {
                Some(len - 1)
            } else {
                match previous_at_start {
                    PreviousAtStart::Restart => Some(i),
                    PreviousAtStart::Stay => None,
                }
            }
        }
    }
}

pub struct Player {
    engine: Sender<EngineCmd>,
    current: Option<usize>,
    transport: Transport,
    shuffle: bool,
    repeat: RepeatMode,
    previous_at_start: PreviousAtStart,
    seeking: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    last_error: Option<String>,
}

impl Player {
    pub fn new(engine: Sender<EngineCmd>) -> Self {
        Self {
            engine,
            current: None,
            transport: Transport::Stopped,
            shuffle: false,
            repeat: RepeatMode::default(),
            previous_at_start: PreviousAtStart::default(),
            seeking: false,
            position: Duration::ZERO,
            duration: None,
            volume: 0.5,
            last_error: None,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport == Transport::Playing
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Policy toggles take effect on the next transition decision; they
    /// never interrupt current playback.
    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
    }

    pub fn set_previous_at_start(&mut self, policy: PreviousAtStart) {
        self.previous_at_start = policy;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let _ = self.engine.send(EngineCmd::SetVolume(self.volume));
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// The merged play/pause control: the action derives from the current
    /// transport status.
    pub fn toggle_play(&mut self, catalog: &Catalog) {
        match self.transport {
            Transport::Playing => {
                let _ = self.engine.send(EngineCmd::Pause);
            }
            Transport::Paused => {
                let _ = self.engine.send(EngineCmd::Play);
            }
            Transport::Stopped => {
                let index = self.current.unwrap_or(0);
                self.load_and_play(index, catalog);
            }
        }
    }

    /// Halt playback and reset the position; the queue position stays.
    pub fn stop(&mut self) {
        let _ = self.engine.send(EngineCmd::Stop);
        self.position = Duration::ZERO;
    }

    /// Replace the active track. Out-of-range indices are a no-op. The
    /// engine tears down the previous session before starting the new one.
    pub fn load_and_play(&mut self, index: usize, catalog: &Catalog) {
        let Some(track) = catalog.get(index) else {
            return;
        };

        self.current = Some(index);
        self.position = Duration::ZERO;
        // The catalog duration (if resolved) is a usable display value until
        // the engine reports its own.
        self.duration = (track.duration() > Duration::ZERO).then(|| track.duration());
        self.last_error = None;

        let _ = self.engine.send(EngineCmd::Load {
            track_id: track.id(),
            path: track.path().to_path_buf(),
            autoplay: true,
        });
    }

    pub fn next(&mut self, catalog: &Catalog) {
        if let Some(i) = self.decide_transition(Trigger::Next, catalog.len()) {
            self.load_and_play(i, catalog);
        }
    }

    pub fn previous(&mut self, catalog: &Catalog) {
        if let Some(i) = self.decide_transition(Trigger::Previous, catalog.len()) {
            self.load_and_play(i, catalog);
        }
    }

    /// Map a fraction of the track to an absolute seek. No-op while nothing
    /// is loaded or the duration is unknown.
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if self.transport == Transport::Stopped {
            return;
        }
        let Some(duration) = self.duration else {
            return;
        };
        let target = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.position = target;
        let _ = self.engine.send(EngineCmd::Seek(target));
    }

    /// Scrub relative to the current position, expressed through the
    /// fractional seek.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let Some(duration) = self.duration else {
            return;
        };
        if duration.is_zero() {
            return;
        }
        let current = self.position.as_secs_f64();
        let target = (current + delta_secs as f64).max(0.0);
        self.seek_to_fraction(target / duration.as_secs_f64());
    }

    /// Seeking guard: while set, position events from the engine do not
    /// overwrite the user-visible position.
    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    pub fn end_seek(&mut self) {
        self.seeking = false;
    }

    pub fn seeking(&self) -> bool {
        self.seeking
    }

    /// Re-point the queue position after the catalog order changed under
    /// the active track (reorder or removal). Playback itself is untouched.
    pub fn set_current_index(&mut self, index: Option<usize>) {
        self.current = index;
    }

    /// Adopt a duration that resolved after the session became ready,
    /// e.g. from late tag extraction.
    pub fn adopt_duration(&mut self, duration: Duration) {
        if self.duration.is_none() && !duration.is_zero() {
            self.duration = Some(duration);
        }
    }

    /// Forget the active track, e.g. after the catalog was replaced.
    pub fn reset(&mut self) {
        let _ = self.engine.send(EngineCmd::Stop);
        self.current = None;
        self.position = Duration::ZERO;
        self.duration = None;
        self.last_error = None;
    }

    /// React to one engine event. Spectrum frames are routed to the
    /// visualizer before reaching the controller.
    pub fn handle_event(&mut self, event: EngineEvent, catalog: &Catalog) {
        match event {
            EngineEvent::Ready { track_id, duration } => {
                let is_current = self
                    .current
                    .and_then(|i| catalog.get(i))
                    .is_some_and(|t| t.id() == track_id);
                if is_current {
                    self.duration = duration.or(self.duration);
                }
            }
            EngineEvent::Position(pos) => {
                if !self.seeking {
                    self.position = pos;
                }
            }
            EngineEvent::Status(status) => {
                self.transport = match status {
                    EngineStatus::Stopped => Transport::Stopped,
                    EngineStatus::Playing => Transport::Playing,
                    EngineStatus::Paused => Transport::Paused,
                };
            }
            EngineEvent::EndOfMedia => {
                match self.decide_transition(Trigger::EndOfTrack, catalog.len()) {
                    Some(i) => self.load_and_play(i, catalog),
                    // End of queue: stay stopped on the same track.
                    None => self.position = Duration::ZERO,
                }
            }
            EngineEvent::Error(message) => {
                // Real playback failure, not end-of-track: report it and
                // keep the queue position so the user can retry or skip.
                self.last_error = Some(message);
                self.transport = Transport::Stopped;
                self.position = Duration::ZERO;
            }
            EngineEvent::Spectrum(_) => {}
        }
    }

    fn decide_transition(&self, trigger: Trigger, len: usize) -> Option<usize> {
        decide(
            trigger,
            self.current,
            len,
            self.shuffle,
            self.repeat,
            self.previous_at_start,
        )
    }
}

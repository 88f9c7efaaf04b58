use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::library::TrackId;

use super::sink::create_sink_at;
use super::spectrum::{self, SampleRing};
use super::types::{EngineCmd, EngineEvent, EngineStatus};

/// Cadence of the idle tick: position events, spectrum frames and
/// end-of-media detection all run on it.
const TICK: Duration = Duration::from_millis(50);

/// The engine thread: owns the output stream and the current sink, executes
/// commands, and reports everything that happens as events. It never
/// decides what plays next; end of media is reported, not acted on.
pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    events: Sender<EngineEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = events.send(EngineEvent::Error(format!("no audio output device: {e}")));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut loaded: Option<(TrackId, PathBuf)> = None;
        let mut paused = true;
        let mut volume: f32 = 1.0;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let ring: SampleRing = spectrum::new_ring();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(EngineCmd::Load {
                    track_id,
                    path,
                    autoplay,
                }) => {
                    // Tear down the previous session before starting a new
                    // one; two live sinks would play simultaneously.
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    if let Ok(mut r) = ring.lock() {
                        r.clear();
                    }
                    started_at = None;
                    accumulated = Duration::ZERO;

                    match create_sink_at(&stream, &path, Duration::ZERO, ring.clone()) {
                        Ok((new_sink, duration)) => {
                            new_sink.set_volume(volume);
                            let _ = events.send(EngineEvent::Ready { track_id, duration });
                            if autoplay {
                                new_sink.play();
                                paused = false;
                                started_at = Some(Instant::now());
                                let _ = events.send(EngineEvent::Status(EngineStatus::Playing));
                                let _ = events.send(EngineEvent::Position(Duration::ZERO));
                            } else {
                                paused = true;
                                let _ = events.send(EngineEvent::Status(EngineStatus::Paused));
                            }
                            sink = Some(new_sink);
                            loaded = Some((track_id, path));
                        }
                        Err(e) => {
                            paused = true;
                            loaded = None;
                            let _ = events.send(EngineEvent::Error(e.to_string()));
                            let _ = events.send(EngineEvent::Status(EngineStatus::Stopped));
                        }
                    }
                }

                Ok(EngineCmd::Play) => {
                    if let Some(s) = &sink {
                        if paused {
                            s.play();
                            paused = false;
                            started_at = Some(Instant::now());
                            let _ = events.send(EngineEvent::Status(EngineStatus::Playing));
                        }
                    }
                }

                Ok(EngineCmd::Pause) => {
                    if let Some(s) = &sink {
                        if !paused {
                            s.pause();
                            if let Some(st) = started_at.take() {
                                accumulated += st.elapsed();
                            }
                            paused = true;
                            let _ = events.send(EngineEvent::Status(EngineStatus::Paused));
                        }
                    }
                }

                Ok(EngineCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    paused = true;
                    started_at = None;
                    accumulated = Duration::ZERO;
                    let _ = events.send(EngineEvent::Position(Duration::ZERO));
                    let _ = events.send(EngineEvent::Status(EngineStatus::Stopped));
                }

                Ok(EngineCmd::Seek(pos)) => {
                    // Scrubbing rebuilds the sink and skips into the file.
                    if sink.is_none() {
                        continue;
                    }
                    let Some((_, path)) = loaded.clone() else {
                        continue;
                    };

                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    if let Ok(mut r) = ring.lock() {
                        r.clear();
                    }

                    match create_sink_at(&stream, &path, pos, ring.clone()) {
                        Ok((new_sink, _)) => {
                            new_sink.set_volume(volume);
                            if paused {
                                started_at = None;
                            } else {
                                new_sink.play();
                                started_at = Some(Instant::now());
                            }
                            accumulated = pos;
                            sink = Some(new_sink);
                            let _ = events.send(EngineEvent::Position(pos));
                        }
                        Err(e) => {
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                            let _ = events.send(EngineEvent::Error(e.to_string()));
                            let _ = events.send(EngineEvent::Status(EngineStatus::Stopped));
                        }
                    }
                }

                Ok(EngineCmd::SetVolume(v)) => {
                    volume = v.clamp(0.0, 1.0);
                    if let Some(s) = &sink {
                        s.set_volume(volume);
                    }
                }

                Ok(EngineCmd::Shutdown) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    let _ = events.send(EngineEvent::Status(EngineStatus::Stopped));
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    let Some(s) = &sink else {
                        continue;
                    };
                    if paused {
                        continue;
                    }

                    if s.empty() {
                        // Natural end of the session. Report it and release;
                        // the controller decides the transition.
                        sink = None;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        let _ = events.send(EngineEvent::Status(EngineStatus::Stopped));
                        let _ = events.send(EngineEvent::EndOfMedia);
                        continue;
                    }

                    let elapsed =
                        accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                    let _ = events.send(EngineEvent::Position(elapsed));

                    if let Some(frame) = spectrum::analyze(&ring) {
                        let _ = events.send(EngineEvent::Spectrum(frame));
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

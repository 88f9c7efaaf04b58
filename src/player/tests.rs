use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use super::controller::{Player, PreviousAtStart, RepeatMode, Transport, Trigger, decide};
use crate::audio::{EngineCmd, EngineEvent, EngineStatus};
use crate::library::Catalog;

fn catalog(n: usize) -> Catalog {
    let mut c = Catalog::new();
    for i in 0..n {
        c.add(PathBuf::from(format!("/tmp/track{i}.mp3")));
    }
    c
}

fn player() -> (Player, Receiver<EngineCmd>) {
    let (tx, rx) = mpsc::channel();
    (Player::new(tx), rx)
}

fn drain(rx: &Receiver<EngineCmd>) -> Vec<EngineCmd> {
    let mut cmds = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        cmds.push(cmd);
    }
    cmds
}

#[test]
fn repeat_all_sequential_visits_every_index_and_wraps() {
    for start in 0..4 {
        let mut visited = Vec::new();
        let mut current = Some(start);
        for _ in 0..4 {
            current = decide(
                Trigger::EndOfTrack,
                current,
                4,
                false,
                RepeatMode::All,
                PreviousAtStart::Restart,
            );
            visited.push(current.unwrap());
        }
        let expected: Vec<usize> = (1..=4).map(|k| (start + k) % 4).collect();
        assert_eq!(visited, expected);
    }
}

#[test]
fn shuffle_never_selects_the_current_index() {
    for _ in 0..200 {
        let next = decide(
            Trigger::EndOfTrack,
            Some(2),
            5,
            true,
            RepeatMode::None,
            PreviousAtStart::Restart,
        );
        assert!(next.is_some());
        assert_ne!(next, Some(2));
    }
}

#[test]
fn shuffle_with_a_single_track_replays_it() {
    let next = decide(
        Trigger::Next,
        Some(0),
        1,
        true,
        RepeatMode::None,
        PreviousAtStart::Restart,
    );
    assert_eq!(next, Some(0));
}

#[test]
fn repeat_one_always_returns_the_current_index() {
    for shuffle in [false, true] {
        for trigger in [Trigger::EndOfTrack, Trigger::Next, Trigger::Previous] {
            let next = decide(
                trigger,
                Some(3),
                7,
                shuffle,
                RepeatMode::One,
                PreviousAtStart::Restart,
            );
            assert_eq!(next, Some(3));
        }
    }
}

#[test]
fn previous_at_zero_with_repeat_all_lands_on_the_last_index() {
    let next = decide(
        Trigger::Previous,
        Some(0),
        5,
        false,
        RepeatMode::All,
        PreviousAtStart::Restart,
    );
    assert_eq!(next, Some(4));
}

#[test]
fn previous_at_zero_without_repeat_follows_the_configured_policy() {
    let restart = decide(
        Trigger::Previous,
        Some(0),
        5,
        false,
        RepeatMode::None,
        PreviousAtStart::Restart,
    );
    assert_eq!(restart, Some(0));

    let stay = decide(
        Trigger::Previous,
        Some(0),
        5,
        false,
        RepeatMode::None,
        PreviousAtStart::Stay,
    );
    assert_eq!(stay, None);
}

#[test]
fn end_of_track_at_the_end_of_the_queue_stops() {
    let next = decide(
        Trigger::EndOfTrack,
        Some(4),
        5,
        false,
        RepeatMode::None,
        PreviousAtStart::Restart,
    );
    assert_eq!(next, None);
}

#[test]
fn next_with_nothing_loaded_starts_at_the_top() {
    let next = decide(
        Trigger::Next,
        None,
        3,
        false,
        RepeatMode::None,
        PreviousAtStart::Restart,
    );
    assert_eq!(next, Some(0));
}

#[test]
fn empty_catalog_never_produces_a_transition() {
    for trigger in [Trigger::EndOfTrack, Trigger::Next, Trigger::Previous] {
        assert_eq!(
            decide(
                trigger,
                None,
                0,
                true,
                RepeatMode::All,
                PreviousAtStart::Restart
            ),
            None
        );
    }
}

#[test]
fn load_and_play_is_bounds_checked() {
    let c = catalog(2);
    let (mut p, rx) = player();

    p.load_and_play(5, &c);
    assert_eq!(p.current(), None);
    assert!(drain(&rx).is_empty());

    p.load_and_play(1, &c);
    assert_eq!(p.current(), Some(1));
    let cmds = drain(&rx);
    assert_eq!(cmds.len(), 1);
    assert!(matches!(
        &cmds[0],
        EngineCmd::Load { autoplay: true, .. }
    ));
}

#[test]
fn toggle_play_derives_its_action_from_transport_status() {
    let c = catalog(3);
    let (mut p, rx) = player();

    // Stopped with nothing loaded: load track 0.
    p.toggle_play(&c);
    assert_eq!(p.current(), Some(0));
    assert!(matches!(drain(&rx)[0], EngineCmd::Load { .. }));

    // Engine confirms playback; toggling now pauses.
    p.handle_event(EngineEvent::Status(EngineStatus::Playing), &c);
    assert!(p.is_playing());
    p.toggle_play(&c);
    assert!(matches!(drain(&rx)[0], EngineCmd::Pause));

    // Engine confirms the pause; toggling now resumes.
    p.handle_event(EngineEvent::Status(EngineStatus::Paused), &c);
    assert_eq!(p.transport(), Transport::Paused);
    p.toggle_play(&c);
    assert!(matches!(drain(&rx)[0], EngineCmd::Play));

    // Stopped with a track loaded: restart it from the top.
    p.handle_event(EngineEvent::Status(EngineStatus::Stopped), &c);
    p.toggle_play(&c);
    assert!(matches!(drain(&rx)[0], EngineCmd::Load { .. }));
    assert_eq!(p.current(), Some(0));
}

#[test]
fn transport_syncs_only_from_engine_status_events() {
    let c = catalog(1);
    let (mut p, _rx) = player();

    p.load_and_play(0, &c);
    // Commands alone do not flip the status...
    assert_eq!(p.transport(), Transport::Stopped);
    // ...the engine's report does.
    p.handle_event(EngineEvent::Status(EngineStatus::Playing), &c);
    assert_eq!(p.transport(), Transport::Playing);
}

#[test]
fn seeking_guard_suppresses_position_feedback() {
    let c = catalog(1);
    let (mut p, _rx) = player();
    p.load_and_play(0, &c);
    p.handle_event(
        EngineEvent::Ready {
            track_id: c.get(0).unwrap().id(),
            duration: Some(Duration::from_secs(100)),
        },
        &c,
    );

    p.handle_event(EngineEvent::Position(Duration::from_secs(5)), &c);
    assert_eq!(p.position(), Duration::from_secs(5));

    // A user drag is in progress: engine positions must not move the
    // displayed progress.
    p.begin_seek();
    p.handle_event(EngineEvent::Position(Duration::from_secs(42)), &c);
    assert_eq!(p.position(), Duration::from_secs(5));

    p.end_seek();
    p.handle_event(EngineEvent::Position(Duration::from_secs(43)), &c);
    assert_eq!(p.position(), Duration::from_secs(43));
}

#[test]
fn seek_to_fraction_requires_a_loaded_duration() {
    let c = catalog(1);
    let (mut p, rx) = player();

    // Nothing loaded: no-op.
    p.seek_to_fraction(0.5);
    assert!(drain(&rx).is_empty());

    p.load_and_play(0, &c);
    p.handle_event(EngineEvent::Status(EngineStatus::Playing), &c);
    drain(&rx);

    // Duration still unknown: no-op.
    p.seek_to_fraction(0.5);
    assert!(drain(&rx).is_empty());

    p.handle_event(
        EngineEvent::Ready {
            track_id: c.get(0).unwrap().id(),
            duration: Some(Duration::from_secs(200)),
        },
        &c,
    );
    p.seek_to_fraction(0.25);
    let cmds = drain(&rx);
    assert!(matches!(cmds[0], EngineCmd::Seek(d) if d == Duration::from_secs(50)));
    assert_eq!(p.position(), Duration::from_secs(50));

    // Fractions clamp to [0, 1].
    p.seek_to_fraction(7.0);
    let cmds = drain(&rx);
    assert!(matches!(cmds[0], EngineCmd::Seek(d) if d == Duration::from_secs(200)));
}

#[test]
fn end_of_media_advances_and_at_the_boundary_stays_put() {
    let c = catalog(2);
    let (mut p, rx) = player();
    p.load_and_play(0, &c);
    p.handle_event(EngineEvent::Status(EngineStatus::Playing), &c);
    drain(&rx);

    p.handle_event(EngineEvent::EndOfMedia, &c);
    assert_eq!(p.current(), Some(1));
    assert!(matches!(drain(&rx)[0], EngineCmd::Load { .. }));

    // Last track ends, repeat off: remain stopped, queue position kept.
    p.handle_event(EngineEvent::Status(EngineStatus::Stopped), &c);
    p.handle_event(EngineEvent::EndOfMedia, &c);
    assert_eq!(p.current(), Some(1));
    assert_eq!(p.position(), Duration::ZERO);
    assert!(drain(&rx).is_empty());
}

#[test]
fn manual_next_at_the_end_without_repeat_is_a_noop() {
    let c = catalog(2);
    let (mut p, rx) = player();
    p.load_and_play(1, &c);
    drain(&rx);

    p.next(&c);
    assert_eq!(p.current(), Some(1));
    assert!(drain(&rx).is_empty());
}

#[test]
fn playback_error_reports_and_keeps_the_queue_position() {
    let c = catalog(3);
    let (mut p, rx) = player();
    p.load_and_play(2, &c);
    drain(&rx);

    p.handle_event(EngineEvent::Error("decode failed".into()), &c);
    assert_eq!(p.last_error(), Some("decode failed"));
    assert_eq!(p.transport(), Transport::Stopped);
    // No auto-advance on error, unlike end-of-track.
    assert_eq!(p.current(), Some(2));
    assert!(drain(&rx).is_empty());
}

#[test]
fn policy_toggles_do_not_interrupt_playback() {
    let c = catalog(3);
    let (mut p, rx) = player();
    p.load_and_play(0, &c);
    p.handle_event(EngineEvent::Status(EngineStatus::Playing), &c);
    drain(&rx);

    p.set_shuffle(true);
    p.set_repeat(RepeatMode::One);
    p.cycle_repeat();
    assert!(drain(&rx).is_empty());
    assert!(p.is_playing());
}

#[test]
fn ready_for_a_stale_track_does_not_adopt_its_duration() {
    let mut c = catalog(2);
    let (mut p, _rx) = player();
    p.load_and_play(0, &c);

    let stale = c.remove(1).unwrap();
    p.handle_event(
        EngineEvent::Ready {
            track_id: stale.id(),
            duration: Some(Duration::from_secs(999)),
        },
        &c,
    );
    assert_eq!(p.duration(), None);
}

#[test]
fn volume_clamps_and_reaches_the_engine() {
    let (mut p, rx) = player();

    p.set_volume(1.7);
    assert_eq!(p.volume(), 1.0);
    p.adjust_volume(-0.25);
    assert_eq!(p.volume(), 0.75);

    let cmds = drain(&rx);
    assert!(matches!(cmds[0], EngineCmd::SetVolume(v) if v == 1.0));
    assert!(matches!(cmds[1], EngineCmd::SetVolume(v) if v == 0.75));
}

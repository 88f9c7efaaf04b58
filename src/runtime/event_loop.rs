use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::EngineEvent;
use crate::config::Settings;
use crate::library::{MetadataUpdate, playlist};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Player, Transport};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;
use crate::viz::VizSampler;

/// State tracked by the event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
    /// Last-known playing index as emitted to MPRIS.
    last_mpris_index: Option<usize>,
    /// Last-known transport as emitted to MPRIS.
    last_mpris_transport: Transport,
    /// Transport seen on the previous iteration; used to blank the
    /// visualizer when playback stops.
    last_transport: Transport,
}

impl EventLoopState {
    pub fn new(player: &Player) -> Self {
        Self {
            pending_gg: false,
            last_mpris_index: None,
            last_mpris_transport: player.transport(),
            last_transport: player.transport(),
        }
    }
}

/// The control context: drains engine events, resolver results and remote
/// commands, handles input, and redraws at the capped render cadence. All
/// shared state is mutated here and only here.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    player: &mut Player,
    viz: &mut VizSampler,
    engine_events: &Receiver<EngineEvent>,
    meta_updates: &Receiver<MetadataUpdate>,
    mpris: &MprisHandle,
    control_tx: &Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Engine events arrive from the engine thread; applying them here
        // keeps all playback state single-threaded.
        while let Ok(ev) = engine_events.try_recv() {
            match ev {
                EngineEvent::Spectrum(frame) => viz.on_frame(&frame.magnitudes),
                other => player.handle_event(other, &app.catalog),
            }
        }

        if state.last_transport != player.transport() {
            if player.transport() == Transport::Stopped {
                viz.reset();
            }
            state.last_transport = player.transport();
        }

        // Resolver results; stale updates for removed tracks are discarded
        // inside the catalog.
        while let Ok(update) = meta_updates.try_recv() {
            let id = update.id;
            if app.catalog.apply_metadata(id, update.meta) {
                // A duration resolving after Ready still feeds the
                // progress display of the active track.
                if let Some(track) = player.current().and_then(|i| app.catalog.get(i)) {
                    if track.id() == id {
                        player.adopt_duration(track.duration());
                    }
                }
            }
        }

        // Cursor follows the active track unless the user moved away.
        if let Some(idx) = player.current() {
            if app.follow_playback && !app.filter_mode {
                if let Some(pending) = app.pending_follow_index {
                    if pending == idx {
                        app.clear_pending_follow_index();
                        if app.selected != idx {
                            app.set_selected(idx);
                        }
                    }
                } else if app.selected != idx {
                    app.set_selected(idx);
                }
            }
        }

        // Keep MPRIS in sync even when changes come from media keys or
        // auto-advance.
        if player.current() != state.last_mpris_index
            || player.transport() != state.last_mpris_transport
        {
            update_mpris(mpris, app, player);
            state.last_mpris_index = player.current();
            state.last_mpris_transport = player.transport();
        }

        // The frame-rate cap lives in the sampler; the poll below bounds
        // how often we even ask.
        if viz.tick(Instant::now()) {
            terminal.draw(|f| ui::draw(f, app, player, viz, settings))?;
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, player) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, viz, control_tx, state) {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns true when the loop should exit.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, player: &mut Player) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if !player.is_playing() {
                player.toggle_play(&app.catalog);
            }
        }
        ControlCmd::Pause => {
            if player.is_playing() {
                player.toggle_play(&app.catalog);
            }
        }
        ControlCmd::PlayPause => player.toggle_play(&app.catalog),
        ControlCmd::Stop => player.stop(),
        ControlCmd::Next => player.next(&app.catalog),
        ControlCmd::Prev => player.previous(&app.catalog),
    }
    false
}

/// Returns true when the loop should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &Settings,
    app: &mut App,
    player: &mut Player,
    viz: &mut VizSampler,
    control_tx: &Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => {
                if !app.catalog.visible().is_empty() {
                    app.exit_filter_mode();
                    app.follow_playback_on();
                    app.set_pending_follow_index(app.selected);
                    player.load_and_play(app.selected, &app.catalog);
                }
            }
            KeyCode::Down => {
                app.follow_playback_off();
                app.select_next();
            }
            KeyCode::Up => {
                app.follow_playback_off();
                app.select_prev();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_filter_mode();
        }
        KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('n') | KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('p') | KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            player.toggle_shuffle();
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            player.cycle_repeat();
        }
        KeyCode::Char('v') => {
            state.pending_gg = false;
            viz.cycle_mode();
        }
        KeyCode::Char('V') => {
            state.pending_gg = false;
            app.toggle_viz();
        }
        KeyCode::Char('m') => {
            state.pending_gg = false;
            app.toggle_compact();
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            scrub(player, settings.controls.scrub_seconds as i64);
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            scrub(player, -(settings.controls.scrub_seconds as i64));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            player.adjust_volume(settings.controls.volume_step as f32 / 100.0);
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            player.adjust_volume(-(settings.controls.volume_step as f32) / 100.0);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.select_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.select_prev();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                if let Some(&first) = app.catalog.visible().first() {
                    app.set_selected(first);
                }
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            if let Some(&last) = app.catalog.visible().last() {
                app.set_selected(last);
            }
        }
        KeyCode::Char('J') => {
            state.pending_gg = false;
            move_selected(app, player, 1);
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            move_selected(app, player, -1);
        }
        KeyCode::Char('d') => {
            state.pending_gg = false;
            remove_selected(app, player);
        }
        KeyCode::Char('w') => {
            state.pending_gg = false;
            save_playlist(app);
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if app.has_tracks() {
                app.follow_playback_on();
                app.set_pending_follow_index(app.selected);
                player.load_and_play(app.selected, &app.catalog);
            }
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

/// Relative scrub expressed through the fractional seek, with the guard
/// held while the command is issued so stale position events cannot fight
/// the new target.
fn scrub(player: &mut Player, delta_secs: i64) {
    player.begin_seek();
    player.seek_by(delta_secs);
    player.end_seek();
}

/// Reorder the selected track, keeping cursor and queue position attached
/// to the same tracks.
fn move_selected(app: &mut App, player: &mut Player, delta: isize) {
    // Reordering the filtered view would be ambiguous; require full view.
    if !app.catalog.filter().trim().is_empty() {
        return;
    }
    let from = app.selected;
    let to = from as isize + delta;
    if to < 0 || to as usize >= app.catalog.len() {
        return;
    }
    let to = to as usize;

    let playing_id = player.current().and_then(|i| app.catalog.get(i)).map(|t| t.id());
    app.catalog.move_track(from, to);
    app.selected = to;
    if let Some(id) = playing_id {
        player.set_current_index(app.catalog.index_of(id));
    }
}

fn remove_selected(app: &mut App, player: &mut Player) {
    if !app.has_tracks() {
        return;
    }
    let index = app.selected;

    if player.current() == Some(index) {
        // Removing the active track tears the session down.
        player.reset();
    }
    let playing_id = player.current().and_then(|i| app.catalog.get(i)).map(|t| t.id());
    app.catalog.remove(index);
    if let Some(id) = playing_id {
        player.set_current_index(app.catalog.index_of(id));
    }
    app.ensure_selected_visible();
    if app.selected >= app.catalog.len() && !app.catalog.is_empty() {
        app.selected = app.catalog.len() - 1;
    }
}

fn save_playlist(app: &mut App) {
    let path = app
        .current_dir
        .as_deref()
        .map(|d| PathBuf::from(d).join("playlist.m3u"))
        .unwrap_or_else(|| PathBuf::from("playlist.m3u"));

    match playlist::save(&path, &app.catalog) {
        Ok(()) => app.set_status(format!("playlist saved to {}", path.display())),
        Err(e) => app.set_status(format!("playlist save failed: {e}")),
    }
}

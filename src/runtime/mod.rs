use std::env;
use std::path::Path;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioEngine, EngineEvent};
use crate::library::{Catalog, MetadataResolver, MetadataUpdate, playlist, scan};
use crate::mpris::ControlCmd;
use crate::player::Player;
use crate::viz::{VizMode, VizSampler};

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let source = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    // One argument: either a playlist file or a directory to scan.
    let mut catalog = Catalog::new();
    let source_path = Path::new(&source);
    let current_dir;
    if source_path.is_file()
        && source_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("m3u"))
    {
        let entries = playlist::load(source_path)?;
        catalog.replace_all(entries.into_iter().map(playlist::PlaylistEntry::into_parts));
        current_dir = source_path
            .parent()
            .and_then(|p| p.to_str())
            .unwrap_or(".")
            .to_string();
    } else {
        for path in scan(source_path, &settings.library) {
            catalog.add(path);
        }
        current_dir = source.clone();
    }

    let (engine_tx, engine_rx) = mpsc::channel::<EngineEvent>();
    let (meta_tx, meta_rx) = mpsc::channel::<MetadataUpdate>();
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();

    let engine = AudioEngine::spawn(engine_tx);
    let mut player = Player::new(engine.command_sender());
    let mut viz = VizSampler::new(VizMode::default());

    let mut resolver = MetadataResolver::spawn(meta_tx);
    for track in catalog.iter() {
        resolver.resolve(track.id(), track.path().to_path_buf());
    }

    let mut app = App::new(catalog);
    app.set_current_dir(current_dir);

    startup::apply_defaults(&mut app, &mut player, &mut viz, &settings);

    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &app, &player);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&player);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &mut viz,
            &engine_rx,
            &meta_rx,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    // Orderly teardown: stop playback and the engine thread, then stop
    // accepting resolver work (in-flight jobs finish into a dead channel).
    player.stop();
    engine.shutdown();
    resolver.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

use crate::app::App;
use crate::config::{
    PreviousAtStartSetting, RepeatModeSetting, Settings, VizModeSetting,
};
use crate::player::{Player, PreviousAtStart, RepeatMode};
use crate::viz::{VizMode, VizSampler};

/// Seed app, controller and visualizer state from configuration.
pub fn apply_defaults(app: &mut App, player: &mut Player, viz: &mut VizSampler, settings: &Settings) {
    app.follow_playback = settings.ui.follow_playback;
    app.compact = settings.ui.compact;
    app.show_viz = settings.viz.enabled;

    player.set_shuffle(settings.playback.shuffle);
    player.set_repeat(match settings.playback.repeat_mode {
        RepeatModeSetting::None => RepeatMode::None,
        RepeatModeSetting::All => RepeatMode::All,
        RepeatModeSetting::One => RepeatMode::One,
    });
    player.set_previous_at_start(match settings.playback.previous_at_start {
        PreviousAtStartSetting::Restart => PreviousAtStart::Restart,
        PreviousAtStartSetting::Stay => PreviousAtStart::Stay,
    });
    player.set_volume(settings.audio.volume.min(100) as f32 / 100.0);

    viz.set_mode(match settings.viz.mode {
        VizModeSetting::Bars => VizMode::Bars,
        VizModeSetting::Circle => VizMode::Circle,
        VizModeSetting::Wave => VizMode::Wave,
        VizModeSetting::Spectrum => VizMode::Spectrum,
    });
}

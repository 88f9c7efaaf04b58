use crate::app::App;
use crate::mpris::MprisHandle;
use crate::player::Player;

/// Publish the current track title and transport status to MPRIS.
pub fn update_mpris(mpris: &MprisHandle, app: &App, player: &Player) {
    let title = player
        .current()
        .and_then(|i| app.catalog.get(i))
        .map(|t| t.display_title());
    mpris.set_title(title);
    mpris.set_transport(player.transport());
}

use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a list-row string for a track according to the configured `fields`
/// and separator.
///
/// Sentinel values ("Unknown Artist"/"Unknown Album") and empty fields are
/// skipped; when nothing is produced the plain title is used.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                parts.push(track.display_title());
            }
            TrackDisplayField::Title => {
                if !track.title().trim().is_empty() {
                    parts.push(track.title().trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if track.is_resolved() {
                    parts.push(track.artist().to_string());
                }
            }
            TrackDisplayField::Album => {
                if track.album() != super::model::UNKNOWN_ALBUM {
                    parts.push(track.album().to_string());
                }
            }
            TrackDisplayField::Genre => {
                if !track.genre().is_empty() {
                    parts.push(track.genre().to_string());
                }
            }
            TrackDisplayField::Year => {
                if !track.year().is_empty() {
                    parts.push(track.year().to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = track.path().file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                parts.push(track.path().display().to_string());
            }
        }
    }

    if parts.is_empty() {
        track.title().to_string()
    } else {
        parts.join(sep)
    }
}

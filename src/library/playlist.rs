//! Extended M3U playlist reading and writing.
//!
//! Format: a `#EXTM3U` header, then repeating pairs of
//! `#EXTINF:<seconds>,<display title>` and an absolute file path. The
//! loader is tolerant: blank lines and plain comments are skipped, a path
//! without a preceding `#EXTINF` takes its file stem as title, and paths
//! that no longer exist on disk are dropped silently.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::model::Catalog;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub struct PlaylistEntry {
    pub path: PathBuf,
    pub title: Option<String>,
    pub duration: Duration,
}

impl PlaylistEntry {
    /// Shape expected by `Catalog::replace_all`.
    pub fn into_parts(self) -> (PathBuf, Option<String>, Duration) {
        (self.path, self.title, self.duration)
    }
}

/// Write the whole catalog (unfiltered order) to `path`.
pub fn save(path: &Path, catalog: &Catalog) -> Result<(), PlaylistError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "#EXTM3U")?;
    for track in catalog.iter() {
        let abs = track
            .path()
            .canonicalize()
            .unwrap_or_else(|_| track.path().to_path_buf());
        writeln!(
            out,
            "#EXTINF:{},{}",
            track.duration().as_secs(),
            track.display_title()
        )?;
        writeln!(out, "{}", abs.display())?;
    }
    out.flush()?;
    Ok(())
}

/// Parse `path` into playlist entries. Invalid entries are skipped and
/// parsing continues; only an unreadable file is an error, so a caller that
/// replaces its catalog on success never applies a partial result.
pub fn load(path: &Path) -> Result<Vec<PlaylistEntry>, PlaylistError> {
    let text = fs::read_to_string(path)?;
    let mut entries = Vec::new();

    // Title/duration from the most recent #EXTINF, consumed by the next
    // path line.
    let mut pending: Option<(Duration, Option<String>)> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("#EXTINF:") {
            pending = Some(parse_extinf(rest));
            continue;
        }
        if line.starts_with('#') {
            // Header or plain comment.
            continue;
        }

        let track_path = PathBuf::from(line);
        let (duration, title) = pending.take().unwrap_or((Duration::ZERO, None));
        if !track_path.exists() {
            continue;
        }
        entries.push(PlaylistEntry {
            path: track_path,
            title,
            duration,
        });
    }

    Ok(entries)
}

fn parse_extinf(rest: &str) -> (Duration, Option<String>) {
    let (secs, title) = match rest.split_once(',') {
        Some((secs, title)) => (secs, title),
        None => (rest, ""),
    };
    let duration = secs
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|s| *s > 0)
        .map(|s| Duration::from_secs(s as u64))
        .unwrap_or(Duration::ZERO);
    let title = title.trim();
    let title = (!title.is_empty()).then(|| title.to_string());
    (duration, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, b"stub").unwrap();
        p
    }

    #[test]
    fn parse_extinf_handles_duration_and_title() {
        let (d, t) = parse_extinf("185,Artist - Song");
        assert_eq!(d, Duration::from_secs(185));
        assert_eq!(t.as_deref(), Some("Artist - Song"));

        let (d, t) = parse_extinf("-1,Live Stream");
        assert_eq!(d, Duration::ZERO);
        assert_eq!(t.as_deref(), Some("Live Stream"));

        let (d, t) = parse_extinf("12,");
        assert_eq!(d, Duration::from_secs(12));
        assert_eq!(t, None);

        let (d, t) = parse_extinf("garbage");
        assert_eq!(d, Duration::ZERO);
        assert_eq!(t, None);
    }

    #[test]
    fn load_skips_blanks_comments_and_missing_files() {
        let dir = tempdir().unwrap();
        let real = touch(dir.path(), "real.mp3");

        let m3u = dir.path().join("list.m3u");
        fs::write(
            &m3u,
            format!(
                "#EXTM3U\n\n# a comment\n#EXTINF:10,Gone\n{}/missing.mp3\n#EXTINF:42,Real Title\n{}\n",
                dir.path().display(),
                real.display()
            ),
        )
        .unwrap();

        let entries = load(&m3u).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, real);
        assert_eq!(entries[0].title.as_deref(), Some("Real Title"));
        assert_eq!(entries[0].duration, Duration::from_secs(42));
    }

    #[test]
    fn load_uses_file_stem_when_extinf_is_missing() {
        let dir = tempdir().unwrap();
        let real = touch(dir.path(), "bare.mp3");

        let m3u = dir.path().join("list.m3u");
        fs::write(&m3u, format!("#EXTM3U\n{}\n", real.display())).unwrap();

        let entries = load(&m3u).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, None);

        let mut catalog = Catalog::new();
        catalog.replace_all(entries.into_iter().map(PlaylistEntry::into_parts));
        assert_eq!(catalog.get(0).unwrap().title(), "bare");
    }

    #[test]
    fn save_then_load_round_trips_paths_and_titles() {
        let dir = tempdir().unwrap();
        let a = touch(dir.path(), "alpha.mp3");
        let b = touch(dir.path(), "beta.mp3");

        let mut catalog = Catalog::new();
        catalog.add_entry(a.clone(), Some("Alpha".into()), Duration::from_secs(100));
        catalog.add_entry(b.clone(), Some("Beta".into()), Duration::from_secs(200));

        let m3u = dir.path().join("out.m3u");
        save(&m3u, &catalog).unwrap();

        let text = fs::read_to_string(&m3u).unwrap();
        assert!(text.starts_with("#EXTM3U\n"));
        assert!(text.contains("#EXTINF:100,Alpha"));

        let entries = load(&m3u).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("Alpha"));
        assert_eq!(entries[1].title.as_deref(), Some("Beta"));
        assert_eq!(entries[0].path.canonicalize().unwrap(), a.canonicalize().unwrap());
        assert_eq!(entries[1].path.canonicalize().unwrap(), b.canonicalize().unwrap());
        // Durations survive the trip even before any re-resolution.
        assert_eq!(entries[0].duration, Duration::from_secs(100));
    }
}

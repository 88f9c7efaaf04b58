//! Track and catalog types.
//!
//! A `Track` is one playable audio item: its path is fixed identity, the
//! descriptive fields are filled in later by the metadata resolver. The
//! `Catalog` owns the ordered track list and a derived filtered view.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Catalog-assigned identity, stable across reorders and filtering.
pub type TrackId = u64;

/// Optional tag fields produced by the metadata resolver. Absent fields
/// leave the track's current value untouched.
#[derive(Debug, Default, Clone)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub duration: Option<Duration>,
    pub cover: Option<Vec<u8>>,
}

#[derive(Clone)]
pub struct Track {
    id: TrackId,
    path: PathBuf,
    title: String,
    artist: String,
    album: String,
    genre: String,
    year: String,
    duration: Duration,
    cover: Option<Vec<u8>>,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

impl Track {
    fn new(id: TrackId, path: PathBuf) -> Self {
        let title = file_stem(&path);
        Self {
            id,
            path,
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            genre: String::new(),
            year: String::new(),
            duration: Duration::ZERO,
            cover: None,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn cover(&self) -> Option<&[u8]> {
        self.cover.as_deref()
    }

    /// An empty title falls back to the file stem.
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        self.title = if title.is_empty() {
            file_stem(&self.path)
        } else {
            title.to_string()
        };
    }

    /// An empty artist falls back to the sentinel.
    pub fn set_artist(&mut self, artist: &str) {
        let artist = artist.trim();
        self.artist = if artist.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            artist.to_string()
        };
    }

    /// An empty album falls back to the sentinel.
    pub fn set_album(&mut self, album: &str) {
        let album = album.trim();
        self.album = if album.is_empty() {
            UNKNOWN_ALBUM.to_string()
        } else {
            album.to_string()
        };
    }

    pub fn set_genre(&mut self, genre: &str) {
        self.genre = genre.trim().to_string();
    }

    pub fn set_year(&mut self, year: &str) {
        self.year = year.trim().to_string();
    }

    /// True once the resolver produced a real artist for this track.
    pub fn is_resolved(&self) -> bool {
        self.artist != UNKNOWN_ARTIST
    }

    /// `"artist - title"` when the artist is known, plain title otherwise.
    pub fn display_title(&self) -> String {
        if self.artist != UNKNOWN_ARTIST && !self.artist.is_empty() {
            format!("{} - {}", self.artist, self.title)
        } else {
            self.title.clone()
        }
    }

    fn apply(&mut self, meta: TrackMetadata) {
        if let Some(t) = meta.title {
            self.set_title(&t);
        }
        if let Some(a) = meta.artist {
            self.set_artist(&a);
        }
        if let Some(a) = meta.album {
            self.set_album(&a);
        }
        if let Some(g) = meta.genre {
            self.set_genre(&g);
        }
        if let Some(y) = meta.year {
            self.set_year(&y);
        }
        if let Some(d) = meta.duration {
            self.duration = d;
        }
        if meta.cover.is_some() {
            self.cover = meta.cover;
        }
    }
}

/// Ordered track collection plus its filtered view.
///
/// The view is a list of indices into the underlying order; filtering never
/// reorders or removes tracks from the source collection.
pub struct Catalog {
    tracks: Vec<Track>,
    visible: Vec<usize>,
    filter: String,
    next_id: TrackId,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            visible: Vec::new(),
            filter: String::new(),
            next_id: 0,
        }
    }

    pub fn add(&mut self, path: PathBuf) -> TrackId {
        self.add_entry(path, None, Duration::ZERO)
    }

    /// Add a track with an optional pre-set title and duration (playlist
    /// entries carry both).
    pub fn add_entry(
        &mut self,
        path: PathBuf,
        title: Option<String>,
        duration: Duration,
    ) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;

        let mut track = Track::new(id, path);
        if let Some(t) = title {
            track.set_title(&t);
        }
        track.duration = duration;

        self.tracks.push(track);
        self.recompute_view();
        id
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.recompute_view();
    }

    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (PathBuf, Option<String>, Duration)>,
    {
        self.clear();
        for (path, title, duration) in entries {
            self.add_entry(path, title, duration);
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let track = self.tracks.remove(index);
        self.recompute_view();
        Some(track)
    }

    /// Reorder a track within the underlying order.
    pub fn move_track(&mut self, from: usize, to: usize) {
        if from >= self.tracks.len() || to >= self.tracks.len() || from == to {
            return;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        self.recompute_view();
    }

    /// Identity-based position lookup; titles may be duplicated, ids not.
    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn get_by_id(&self, id: TrackId) -> Option<&Track> {
        self.index_of(id).and_then(|i| self.tracks.get(i))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Apply a resolver result. Returns false when the track has since been
    /// removed; stale updates are discarded rather than applied to a
    /// dangling index.
    pub fn apply_metadata(&mut self, id: TrackId, meta: TrackMetadata) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.tracks[index].apply(meta);
        true
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        self.recompute_view();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Indices (into the underlying order) currently visible.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    fn recompute_view(&mut self) {
        let query = self.filter.trim().to_lowercase();
        self.visible = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| query.is_empty() || Self::matches(t, &query))
            .map(|(i, _)| i)
            .collect();
    }

    fn matches(track: &Track, query_lower: &str) -> bool {
        track.title.to_lowercase().contains(query_lower)
            || track.artist.to_lowercase().contains(query_lower)
            || track.album.to_lowercase().contains(query_lower)
    }
}

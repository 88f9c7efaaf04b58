//! Asynchronous tag extraction.
//!
//! A small fixed pool of worker threads reads tags with `lofty` off the
//! control context. Workers never touch catalog state: each result travels
//! back as a `MetadataUpdate` message that the control context applies (or
//! discards, when the track has since been removed). Extraction failure is
//! best-effort: the track keeps its defaults and no message is
//! sent.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};

use super::model::{TrackId, TrackMetadata};

const WORKER_COUNT: usize = 4;

/// A resolved tag set addressed to one track by identity.
pub struct MetadataUpdate {
    pub id: TrackId,
    pub meta: TrackMetadata,
}

struct Job {
    id: TrackId,
    path: PathBuf,
}

pub struct MetadataResolver {
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl MetadataResolver {
    /// Spawn the worker pool. Results arrive on `results`; if the receiver
    /// is gone, completions turn into dead-letter sends and are dropped.
    pub fn spawn(results: Sender<MetadataUpdate>) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let jobs_rx = Arc::new(Mutex::new(jobs_rx));

        let workers = (0..WORKER_COUNT)
            .map(|_| {
                let jobs_rx = jobs_rx.clone();
                let results = results.clone();
                thread::spawn(move || {
                    loop {
                        // Hold the lock only for the receive itself.
                        let job = match jobs_rx.lock() {
                            Ok(rx) => rx.recv(),
                            Err(_) => break,
                        };
                        let Ok(job) = job else {
                            break;
                        };
                        if let Some(meta) = extract(&job.path) {
                            let _ = results.send(MetadataUpdate { id: job.id, meta });
                        }
                    }
                })
            })
            .collect();

        Self {
            jobs: Some(jobs_tx),
            workers,
        }
    }

    /// Queue a track for extraction. A no-op after `shutdown`.
    pub fn resolve(&self, id: TrackId, path: PathBuf) {
        if let Some(jobs) = &self.jobs {
            let _ = jobs.send(Job { id, path });
        }
    }

    /// Stop accepting new jobs and wait for in-flight extractions.
    pub fn shutdown(&mut self) {
        self.jobs = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for MetadataResolver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn extract(path: &std::path::Path) -> Option<TrackMetadata> {
    let tagged = lofty::read_from_path(path).ok()?;

    let mut meta = TrackMetadata {
        duration: Some(tagged.properties().duration()),
        ..TrackMetadata::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        let field = |key: ItemKey| {
            tag.get_string(&key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        meta.title = field(ItemKey::TrackTitle);
        meta.artist = field(ItemKey::TrackArtist);
        meta.album = field(ItemKey::AlbumTitle);
        meta.genre = field(ItemKey::Genre);
        // Prefer a plain year tag; fall back to the leading year of a full
        // recording date.
        meta.year = field(ItemKey::Year).or_else(|| {
            field(ItemKey::RecordingDate).map(|d| d.chars().take(4).collect())
        });
        meta.cover = tag.pictures().first().map(|p| p.data().to_vec());
    }

    Some(meta)
}

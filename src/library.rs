//! Library subsystem: track model, catalog, folder scanning, playlist I/O
//! and the asynchronous metadata resolver.

mod display;
mod model;
pub mod playlist;
mod resolver;
mod scan;

pub use display::display_from_fields;
pub use model::{Catalog, Track, TrackId, TrackMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
pub use resolver::{MetadataResolver, MetadataUpdate};
pub use scan::scan;

//! Playback controller: queue position, shuffle/repeat policy, transport
//! status and the reactions to engine events.

mod controller;

pub use controller::{Player, PreviousAtStart, RepeatMode, Transport};

#[cfg(test)]
mod tests;

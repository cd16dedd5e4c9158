//! Host capability surface: playback control, timers, events, tracks and probes
//!
//! The ad core never owns the player. Every operation borrows an implementation
//! of [`Player`] for the duration of one call. Hosts adapt their own media
//! stack to this trait; [`sim::SimPlayer`] is a deterministic in-memory host
//! used by tests and the `rfads` CLI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

pub mod device;
pub mod media;
pub mod sim;
pub mod tracks;

pub use device::Platform;
pub use media::{MediaSource, ReadyState, TechElement, TimeRanges};
pub use sim::{SimPlayer, SimTech};
pub use tracks::{TextTrack, TextTrackKind, TextTrackMode, TrackHandle};

/// Handle returned by [`Player::set_timeout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Host events the core subscribes to while restoring content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Content metadata loaded; text tracks are safe to touch
    ContentLoadedMetadata,
    /// Content can play; seeking should be possible
    ContentCanPlay,
    Other(String),
}

impl PlayerEvent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "contentloadedmetadata" => PlayerEvent::ContentLoadedMetadata,
            "contentcanplay" => PlayerEvent::ContentCanPlay,
            other => PlayerEvent::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlayerEvent::ContentLoadedMetadata => "contentloadedmetadata",
            PlayerEvent::ContentCanPlay => "contentcanplay",
            PlayerEvent::Other(name) => name,
        }
    }
}

/// The live player/tech object the ad core operates on
pub trait Player {
    // --- playback control ---

    fn current_time(&self) -> f64;

    /// Seek. Hosts may refuse when the element is not ready.
    fn set_current_time(&mut self, seconds: f64) -> Result<()>;

    fn duration(&self) -> f64;

    fn ended(&self) -> bool;

    /// Source as last assigned through `set_src`
    fn src(&self) -> String;

    /// Source the element is actually playing
    fn current_src(&self) -> String;

    /// MIME type of the current source
    fn current_type(&self) -> String;

    fn set_src(&mut self, source: MediaSource);

    /// Ask the tech to pick up a changed source
    fn load(&mut self);

    fn play(&mut self) -> Result<()>;

    fn seekable(&self) -> TimeRanges;

    // --- text tracks ---

    fn remote_text_tracks(&self) -> Vec<TrackHandle>;

    /// All tracks, which on most hosts includes the remote ones
    fn text_tracks(&self) -> Vec<TrackHandle>;

    // --- tech element ---

    /// Currently active playback element. Re-resolve after a source change,
    /// the tech may have swapped it.
    fn tech(&self) -> Option<&dyn TechElement>;

    fn tech_mut(&mut self) -> Option<&mut dyn TechElement>;

    // --- events and timers ---

    fn trigger(&mut self, event: &str);

    fn add_class(&mut self, class: &str);

    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    fn clear_timeout(&mut self, id: TimerId);

    // --- probes ---

    fn platform(&self) -> Platform;

    fn is_live(&self) -> bool;

    /// Whether the content element or source was replaced for ad playback
    fn video_element_recycled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_event_names_roundtrip() {
        for name in ["contentloadedmetadata", "contentcanplay", "adstart"] {
            assert_eq!(PlayerEvent::from_name(name).name(), name);
        }
        assert_eq!(
            PlayerEvent::from_name("contentcanplay"),
            PlayerEvent::ContentCanPlay
        );
    }
}

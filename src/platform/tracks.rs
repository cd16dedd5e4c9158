//! Text tracks as seen by the ad core
//!
//! Tracks are owned by the host. The core only keeps `Rc` back-references so it
//! can force a track's mode during an ad break and put it back afterwards.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackMode {
    #[default]
    Disabled,
    Hidden,
    Showing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackKind {
    #[default]
    Subtitles,
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

#[derive(Debug)]
pub struct TextTrack {
    id: String,
    kind: TextTrackKind,
    mode: Cell<TextTrackMode>,
}

/// Shared handle to a host-owned text track
pub type TrackHandle = Rc<TextTrack>;

impl TextTrack {
    pub fn new(id: impl Into<String>, kind: TextTrackKind, mode: TextTrackMode) -> TrackHandle {
        Rc::new(TextTrack {
            id: id.into(),
            kind,
            mode: Cell::new(mode),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TextTrackKind {
        self.kind
    }

    pub fn mode(&self) -> TextTrackMode {
        self.mode.get()
    }

    pub fn set_mode(&self, mode: TextTrackMode) {
        self.mode.set(mode);
    }
}

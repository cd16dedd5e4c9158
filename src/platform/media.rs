//! Media primitives shared by the player and its playback tech

use serde::{Deserialize, Serialize};

/// A source assignment: URL plus MIME type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaSource {
    pub src: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl MediaSource {
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        MediaSource {
            src: src.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Ordered set of `[start, end]` intervals in seconds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    pub fn new(ranges: Vec<(f64, f64)>) -> Self {
        TimeRanges { ranges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|r| r.0)
    }

    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|r| r.1)
    }
}

/// How much media data the element has, mirroring `HTMLMediaElement.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Anything past metadata can be seeked without the element throwing
    pub fn can_seek(self) -> bool {
        self > ReadyState::HaveMetadata
    }
}

/// The concrete element backing the active playback tech
pub trait TechElement {
    /// Native `poster` attribute, empty when unset
    fn poster(&self) -> String;
    fn set_poster(&mut self, poster: &str);

    /// Inline `style` attribute, `None` when the attribute is absent
    fn style(&self) -> Option<String>;
    fn set_style(&mut self, style: &str);

    fn ready_state(&self) -> ReadyState;

    /// Seekable ranges, or `None` when the element does not expose them
    fn seekable(&self) -> Option<TimeRanges>;
}

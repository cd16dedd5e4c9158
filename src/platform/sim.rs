//! Deterministic in-memory host used by tests and the CLI
//!
//! `SimPlayer` keeps every observable side effect (seeks, play calls, emitted
//! events, added classes) so callers can assert on them, and runs timers on a
//! virtual clock that only advances when a timer is popped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
    MediaSource, Platform, Player, ReadyState, TechElement, TextTrack, TextTrackKind,
    TextTrackMode, TimeRanges, TimerId, TrackHandle,
};
use crate::{Error, Result};

/// In-memory playback element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTech {
    pub poster: String,
    pub style: Option<String>,
    pub ready_state: ReadyState,
    pub seekable: Option<TimeRanges>,
}

impl TechElement for SimTech {
    fn poster(&self) -> String {
        self.poster.clone()
    }

    fn set_poster(&mut self, poster: &str) {
        self.poster = poster.to_string();
    }

    fn style(&self) -> Option<String> {
        self.style.clone()
    }

    fn set_style(&mut self, style: &str) {
        self.style = Some(style.to_string());
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn seekable(&self) -> Option<TimeRanges> {
        self.seekable.clone()
    }
}

/// Track description used when building a `SimPlayer` from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTrackConfig {
    pub id: String,
    pub kind: TextTrackKind,
    pub mode: TextTrackMode,
    pub remote: bool,
}

/// Serializable description of a `SimPlayer`'s initial state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimPlayerConfig {
    pub platform: Platform,
    pub live: bool,
    pub src: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub current_time: f64,
    pub duration: f64,
    pub ended: bool,
    pub seekable: TimeRanges,
    pub tech: Option<SimTech>,
    pub tracks: Vec<SimTrackConfig>,
}

#[derive(Debug)]
pub struct SimPlayer {
    platform: Platform,
    live: bool,
    recycled: bool,
    current_time: f64,
    duration: f64,
    ended: bool,
    source: MediaSource,
    current_src: String,
    seekable: TimeRanges,
    tech: Option<SimTech>,
    remote_tracks: Vec<TrackHandle>,
    tracks: Vec<TrackHandle>,
    classes: Vec<String>,
    events: Vec<String>,
    play_calls: usize,
    loads: usize,
    seeks: Vec<f64>,
    play_failure: Option<String>,
    fail_seeks: bool,
    now: Duration,
    next_timer: u64,
    timers: Vec<(TimerId, Duration)>,
}

impl SimPlayer {
    /// A desktop, non-live player with a default tech element
    pub fn new(source: MediaSource) -> Self {
        SimPlayer {
            platform: Platform::desktop(),
            live: false,
            recycled: false,
            current_time: 0.0,
            duration: 0.0,
            ended: false,
            current_src: source.src.clone(),
            source,
            seekable: TimeRanges::empty(),
            tech: Some(SimTech::default()),
            remote_tracks: Vec::new(),
            tracks: Vec::new(),
            classes: Vec::new(),
            events: Vec::new(),
            play_calls: 0,
            loads: 0,
            seeks: Vec::new(),
            play_failure: None,
            fail_seeks: false,
            now: Duration::ZERO,
            next_timer: 1,
            timers: Vec::new(),
        }
    }

    pub fn from_config(config: &SimPlayerConfig) -> Self {
        let mut player = SimPlayer::new(MediaSource::new(&config.src, &config.mime_type))
            .with_platform(config.platform)
            .with_live(config.live)
            .with_current_time(config.current_time)
            .with_duration(config.duration)
            .with_seekable(config.seekable.clone());
        player.ended = config.ended;
        player.tech = config.tech.clone();
        for t in &config.tracks {
            player.add_track(&t.id, t.kind, t.mode, t.remote);
        }
        player
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn with_current_time(mut self, seconds: f64) -> Self {
        self.current_time = seconds;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_seekable(mut self, seekable: TimeRanges) -> Self {
        self.seekable = seekable;
        self
    }

    pub fn with_tech(mut self, tech: Option<SimTech>) -> Self {
        self.tech = tech;
        self
    }

    /// Remote tracks are listed in both the remote and the full track list
    pub fn add_track(
        &mut self,
        id: &str,
        kind: TextTrackKind,
        mode: TextTrackMode,
        remote: bool,
    ) -> TrackHandle {
        let track = TextTrack::new(id, kind, mode);
        if remote {
            self.remote_tracks.push(TrackHandle::clone(&track));
        }
        self.tracks.push(TrackHandle::clone(&track));
        track
    }

    /// Replace the playback element, as a tech does when switching sources
    pub fn swap_tech(&mut self, tech: SimTech) {
        self.tech = Some(tech);
        self.recycled = true;
    }

    /// Point the element at an ad source without going through `set_src`
    pub fn load_ad_source(&mut self, source: MediaSource) {
        self.current_src = source.src.clone();
        self.source = source;
        self.current_time = 0.0;
        self.ended = false;
        self.recycled = true;
    }

    pub fn set_ended(&mut self, ended: bool) {
        self.ended = ended;
    }

    pub fn set_recycled(&mut self, recycled: bool) {
        self.recycled = recycled;
    }

    pub fn set_seekable(&mut self, seekable: TimeRanges) {
        self.seekable = seekable;
    }

    pub fn tech_state_mut(&mut self) -> Option<&mut SimTech> {
        self.tech.as_mut()
    }

    /// Make every following `play` call fail with `reason`
    pub fn fail_play(&mut self, reason: impl Into<String>) {
        self.play_failure = Some(reason.into());
    }

    pub fn fail_seeks(&mut self, fail: bool) {
        self.fail_seeks = fail;
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls
    }

    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Pending timers ordered by deadline
    pub fn pending_timers(&self) -> Vec<TimerId> {
        let mut pending = self.timers.clone();
        pending.sort_by_key(|(id, at)| (*at, *id));
        pending.into_iter().map(|(id, _)| id).collect()
    }

    /// Remove the earliest timer and advance the virtual clock to its deadline
    pub fn pop_due_timer(&mut self) -> Option<TimerId> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(_, (id, at))| (*at, *id))
            .map(|(i, _)| i)?;
        let (id, at) = self.timers.remove(index);
        self.now = self.now.max(at);
        Some(id)
    }
}

impl Player for SimPlayer {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<()> {
        if self.fail_seeks {
            return Err(Error::Seek(seconds));
        }
        self.current_time = seconds;
        self.seeks.push(seconds);
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn ended(&self) -> bool {
        self.ended
    }

    fn src(&self) -> String {
        self.source.src.clone()
    }

    fn current_src(&self) -> String {
        self.current_src.clone()
    }

    fn current_type(&self) -> String {
        self.source.mime_type.clone()
    }

    fn set_src(&mut self, source: MediaSource) {
        self.current_src = source.src.clone();
        self.source = source;
        self.recycled = false;
    }

    fn load(&mut self) {
        self.loads += 1;
    }

    fn play(&mut self) -> Result<()> {
        if let Some(reason) = &self.play_failure {
            return Err(Error::Playback(reason.clone()));
        }
        self.play_calls += 1;
        self.ended = false;
        Ok(())
    }

    fn seekable(&self) -> TimeRanges {
        self.seekable.clone()
    }

    fn remote_text_tracks(&self) -> Vec<TrackHandle> {
        self.remote_tracks.clone()
    }

    fn text_tracks(&self) -> Vec<TrackHandle> {
        self.tracks.clone()
    }

    fn tech(&self) -> Option<&dyn TechElement> {
        self.tech.as_ref().map(|t| t as &dyn TechElement)
    }

    fn tech_mut(&mut self) -> Option<&mut dyn TechElement> {
        self.tech.as_mut().map(|t| t as &mut dyn TechElement)
    }

    fn trigger(&mut self, event: &str) {
        self.events.push(event.to_string());
    }

    fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.push((id, self.now + delay));
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|(t, _)| *t != id);
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn video_element_recycled(&self) -> bool {
        self.recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_pop_in_deadline_order() {
        let mut p = SimPlayer::new(MediaSource::new("a.mp4", "video/mp4"));
        let slow = p.set_timeout(Duration::from_millis(2000));
        let fast = p.set_timeout(Duration::from_millis(50));
        assert_eq!(p.pending_timers(), vec![fast, slow]);
        assert_eq!(p.pop_due_timer(), Some(fast));
        assert_eq!(p.now(), Duration::from_millis(50));
        p.clear_timeout(slow);
        assert_eq!(p.pop_due_timer(), None);
    }

    #[test]
    fn set_src_clears_recycled_flag() {
        let mut p = SimPlayer::new(MediaSource::new("content.mp4", "video/mp4"));
        p.load_ad_source(MediaSource::new("ad.mp4", "video/mp4"));
        assert!(p.video_element_recycled());
        assert_eq!(p.current_src(), "ad.mp4");
        p.set_src(MediaSource::new("content.mp4", "video/mp4"));
        assert!(!p.video_element_recycled());
        assert_eq!(p.current_type(), "video/mp4");
    }

    #[test]
    fn remote_tracks_are_also_text_tracks() {
        let mut p = SimPlayer::new(MediaSource::default());
        p.add_track("en", TextTrackKind::Captions, TextTrackMode::Showing, true);
        p.add_track("meta", TextTrackKind::Metadata, TextTrackMode::Hidden, false);
        assert_eq!(p.remote_text_tracks().len(), 1);
        assert_eq!(p.text_tracks().len(), 2);
    }

    #[test]
    fn failures_are_reported() {
        let mut p = SimPlayer::new(MediaSource::default());
        p.fail_play("NotAllowedError");
        p.fail_seeks(true);
        assert!(matches!(p.play(), Err(Error::Playback(_))));
        assert!(matches!(p.set_current_time(3.0), Err(Error::Seek(_))));
        assert_eq!(p.play_calls(), 0);
        assert!(p.seeks().is_empty());
    }
}

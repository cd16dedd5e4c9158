//! Saving player state before an ad and restoring it afterwards
//!
//! [`capture_snapshot`] records what playback looked like right before the ad
//! took over the player and disables every text track so the ad source cannot
//! fire stray cues. [`restore_snapshot`] puts it all back. When the ad replaced
//! the content element or source, restoring is asynchronous: the content
//! source is reloaded and a [`RestoreTask`] waits for the new element to be
//! seekable before seeking and resuming.

use std::rc::Rc;

use log::{debug, warn};

use crate::context::AdsContext;
use crate::platform::{MediaSource, Player, PlayerEvent, TextTrackMode, TimerId, TrackHandle};
use crate::{AdsConfig, Result};

/// A track whose mode was forced to `Disabled` for the ad break
#[derive(Debug, Clone)]
pub struct SuppressedTrack {
    pub track: TrackHandle,
    pub mode: TextTrackMode,
}

/// Playback state captured before an ad break
#[derive(Debug, Clone)]
pub struct Snapshot {
    ended: bool,
    current_src: String,
    src: String,
    current_time: f64,
    mime_type: String,
    native_poster: Option<String>,
    style: Option<String>,
    suppressed_remote_tracks: Vec<SuppressedTrack>,
    suppressed_tracks: Vec<SuppressedTrack>,
}

impl Snapshot {
    /// Whether content had ended, i.e. this snapshot precedes a postroll
    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn current_src(&self) -> &str {
        &self.current_src
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    /// Seconds into the content. On iOS live streams this is an offset from
    /// the live edge and is usually negative.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn native_poster(&self) -> Option<&str> {
        self.native_poster.as_deref()
    }

    /// `Some` whenever a tech element existed at capture time, even if it had
    /// no inline style.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn suppressed_remote_tracks(&self) -> &[SuppressedTrack] {
        &self.suppressed_remote_tracks
    }

    pub fn suppressed_tracks(&self) -> &[SuppressedTrack] {
        &self.suppressed_tracks
    }

    /// Put every suppressed track back to its saved mode, remote tracks first
    fn restore_tracks(&self) {
        for saved in self
            .suppressed_remote_tracks
            .iter()
            .chain(self.suppressed_tracks.iter())
        {
            saved.track.set_mode(saved.mode);
        }
    }
}

fn is_ios_live<P: Player + ?Sized>(player: &P) -> bool {
    player.platform().is_ios && player.is_live()
}

fn suppress(tracks: Vec<TrackHandle>, skip: &[SuppressedTrack]) -> Vec<SuppressedTrack> {
    tracks
        .into_iter()
        .filter(|t| !skip.iter().any(|s| Rc::ptr_eq(&s.track, t)))
        .map(|track| {
            let mode = track.mode();
            track.set_mode(TextTrackMode::Disabled);
            SuppressedTrack { track, mode }
        })
        .collect()
}

/// Capture the parts of player state relevant to content playback.
///
/// Side effect: every remote and in-band text track is disabled until the
/// snapshot is restored.
pub fn capture_snapshot<P: Player + ?Sized>(player: &P) -> Snapshot {
    // iOS live streams reset their timeline when the tech swaps sources, so
    // only the distance from the live edge survives an ad.
    let current_time = if is_ios_live(player) {
        match player.seekable().end(0) {
            Some(end) => player.current_time() - end,
            None => player.current_time(),
        }
    } else {
        player.current_time()
    };

    let (native_poster, style) = match player.tech() {
        Some(tech) => (Some(tech.poster()), Some(tech.style().unwrap_or_default())),
        None => (None, None),
    };

    let suppressed_remote_tracks = suppress(player.remote_text_tracks(), &[]);
    let suppressed_tracks = suppress(player.text_tracks(), &suppressed_remote_tracks);

    let snapshot = Snapshot {
        ended: player.ended(),
        current_src: player.current_src(),
        src: player.src(),
        current_time,
        mime_type: player.current_type(),
        native_poster,
        style,
        suppressed_remote_tracks,
        suppressed_tracks,
    };
    debug!(
        "Captured snapshot at {}s of {} ({} tracks suppressed)",
        snapshot.current_time,
        snapshot.current_src,
        snapshot.suppressed_remote_tracks.len() + snapshot.suppressed_tracks.len()
    );
    snapshot
}

/// Return the player to the state recorded in `snapshot`.
///
/// Returns a [`RestoreTask`] when the content element was recycled for the ad
/// and resumption has to wait for host events or timers. The caller forwards
/// those to the task until [`RestoreTask::is_idle`] reports nothing is left.
pub fn restore_snapshot<P: Player + ?Sized>(
    player: &mut P,
    ads: &mut AdsContext,
    snapshot: Snapshot,
    config: &AdsConfig,
) -> Option<RestoreTask> {
    if ads.disable_next_snapshot_restore {
        debug!("Snapshot restore disabled for this ad break");
        ads.disable_next_snapshot_restore = false;
        return None;
    }

    if let Some(tech) = player.tech_mut() {
        if let Some(poster) = snapshot.native_poster().filter(|p| !p.is_empty()) {
            tech.set_poster(poster);
        }
        // Overwrite the whole attribute; an empty saved style must clear
        if let Some(style) = snapshot.style() {
            tech.set_style(style);
        }
    }

    // With a custom ad display or burned-in ads the content element was never
    // touched, and only tracks and playback need restoring.
    if player.video_element_recycled() {
        debug!("Content element recycled, reloading {}", snapshot.current_src);
        player.set_src(MediaSource::new(
            snapshot.current_src.clone(),
            snapshot.mime_type.clone(),
        ));
        // Some engines ignore a source change until load() is called
        player.load();

        // Firefox does not always fire canplay, so race it with a timer
        ads.try_to_resume_timeout = Some(player.set_timeout(config.restore_timeout()));
        return Some(RestoreTask::new(snapshot, config));
    }

    if !player.ended() || !snapshot.ended {
        snapshot.restore_tracks();
        if let Err(e) = player.play() {
            warn!("Failed to resume the content after an advertisement: {}", e);
        }
    }
    None
}

/// How a restore task finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    Resumed,
    /// Seeking or playing failed. Playback may stay paused.
    Failed,
}

/// Pending restore after the content element was recycled.
///
/// The task is subscribed to `contentloadedmetadata` (restore tracks) and
/// raced between `contentcanplay` and the restore timeout (try to resume).
/// Whichever trigger fires first disarms the other, so resumption runs at
/// most once per trigger pair; after that only the task's own poll timer can
/// call back into it.
#[derive(Debug)]
pub struct RestoreTask {
    snapshot: Snapshot,
    attempts: u32,
    poll_interval: std::time::Duration,
    awaiting_metadata: bool,
    awaiting_canplay: bool,
    poll_timer: Option<TimerId>,
    resume_checks: u32,
    outcome: Option<ResumeOutcome>,
}

impl RestoreTask {
    fn new(snapshot: Snapshot, config: &AdsConfig) -> Self {
        RestoreTask {
            snapshot,
            attempts: config.resume_poll_attempts,
            poll_interval: config.poll_interval(),
            awaiting_metadata: true,
            awaiting_canplay: true,
            poll_timer: None,
            resume_checks: 0,
            outcome: None,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// `None` until the task has finished trying to resume
    pub fn outcome(&self) -> Option<ResumeOutcome> {
        self.outcome
    }

    /// Poll attempts left before resuming regardless of readiness
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts
    }

    /// Number of readiness checks run so far
    pub fn resume_checks(&self) -> u32 {
        self.resume_checks
    }

    /// Nothing left to wait for: resumed (or failed) and tracks restored
    pub fn is_idle(&self) -> bool {
        self.outcome.is_some() && !self.awaiting_metadata
    }

    /// Feed a host event to the task. Returns `true` if the task used it.
    pub fn handle_event<P: Player + ?Sized>(
        &mut self,
        player: &mut P,
        ads: &mut AdsContext,
        event: &PlayerEvent,
    ) -> bool {
        match event {
            // On iOS 7, touching text tracks too early crashes Safari
            PlayerEvent::ContentLoadedMetadata if self.awaiting_metadata => {
                self.awaiting_metadata = false;
                self.snapshot.restore_tracks();
                true
            }
            PlayerEvent::ContentCanPlay if self.awaiting_canplay => {
                self.try_to_resume(player, ads);
                true
            }
            _ => false,
        }
    }

    /// Feed a fired timer to the task. Returns `true` if the timer was ours.
    pub fn handle_timer<P: Player + ?Sized>(
        &mut self,
        player: &mut P,
        ads: &mut AdsContext,
        id: TimerId,
    ) -> bool {
        if self.awaiting_canplay && ads.try_to_resume_timeout == Some(id) {
            self.try_to_resume(player, ads);
            return true;
        }
        if self.poll_timer == Some(id) {
            self.poll_timer = None;
            self.try_to_resume(player, ads);
            return true;
        }
        false
    }

    fn try_to_resume<P: Player + ?Sized>(&mut self, player: &mut P, ads: &mut AdsContext) {
        // Reached through canplay or the timeout; disarm whichever did not fire
        self.awaiting_canplay = false;
        if let Some(id) = ads.try_to_resume_timeout.take() {
            player.clear_timeout(id);
        }
        self.resume_checks += 1;

        if Self::ready_to_seek(player) {
            self.finish(player);
            return;
        }

        if self.attempts > 0 {
            self.attempts -= 1;
            debug!(
                "Content not seekable yet, retrying in {:?} ({} attempts left)",
                self.poll_interval, self.attempts
            );
            self.poll_timer = Some(player.set_timeout(self.poll_interval));
        } else {
            debug!("Out of attempts waiting for content, resuming anyway");
            self.finish(player);
        }
    }

    /// The element may differ from the one present before the reload, so it
    /// is resolved again on every check.
    fn ready_to_seek<P: Player + ?Sized>(player: &P) -> bool {
        let Some(tech) = player.tech() else {
            return true;
        };
        if tech.ready_state().can_seek() {
            return true;
        }
        match tech.seekable() {
            // No seekable introspection: nothing to wait on
            None => true,
            Some(ranges) => !ranges.is_empty(),
        }
    }

    fn finish<P: Player + ?Sized>(&mut self, player: &mut P) {
        self.outcome = Some(match resume(player, &self.snapshot) {
            Ok(()) => ResumeOutcome::Resumed,
            Err(e) => {
                warn!("Failed to resume the content after an advertisement: {}", e);
                ResumeOutcome::Failed
            }
        });
    }
}

/// Seek back to the saved position and resume unless this was a postroll
fn resume<P: Player + ?Sized>(player: &mut P, snapshot: &Snapshot) -> Result<()> {
    if is_ios_live(player) {
        if snapshot.current_time < 0.0 {
            // Playback was behind the live edge, keep the same distance
            let target = match player.seekable().end(0) {
                Some(end) => end + snapshot.current_time,
                None => player.current_time(),
            };
            player.set_current_time(target)?;
        }
    } else if snapshot.ended {
        let duration = player.duration();
        player.set_current_time(duration)?;
    } else {
        player.set_current_time(snapshot.current_time)?;
    }

    if !snapshot.ended {
        player.play()?;
    }
    Ok(())
}

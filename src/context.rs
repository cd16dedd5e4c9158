//! Ad-session context shared by the state machine, the snapshot subsystem and
//! the play middleware.
//!
//! These are the flags an ad integration needs to see across states and
//! across an ad break. They live here, passed by reference, instead of being
//! hung off the player.

use crate::platform::TimerId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdsContext {
    /// Written by the ad states, read by the play middleware
    pub should_block_play: bool,

    /// One-shot override: the next `restore_snapshot` consumes it and skips
    /// restoration entirely.
    pub disable_next_snapshot_restore: bool,

    /// Race timer armed by a recycled restore, cleared by whichever of the
    /// timer and `contentcanplay` fires first.
    pub try_to_resume_timeout: Option<TimerId>,
}

impl AdsContext {
    pub fn new() -> Self {
        Self::default()
    }
}

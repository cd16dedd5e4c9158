//! RFox Ads
//!
//! Ad-insertion lifecycle management for media players: a state machine that
//! decides when content may start around prerolls, and a snapshot/restore
//! protocol that puts the player back exactly where it was after an ad break.
//!
//! The core never owns the player. Hosts implement [`platform::Player`] over
//! their own media stack and hand it to the core one call at a time.
//!
//! # Example
//!
//! ```
//! use rfads::platform::{MediaSource, SimPlayer};
//! use rfads::{AdSession, AdsConfig, Signal};
//!
//! let player = SimPlayer::new(MediaSource::new("content.mp4", "video/mp4"))
//!     .with_current_time(30.0)
//!     .with_duration(600.0);
//! let mut session = AdSession::start(player, AdsConfig::default());
//! assert!(session.ads().should_block_play);
//!
//! session.dispatch(Signal::AdsReady);
//! session.dispatch(Signal::Play);
//! assert_eq!(session.state_name(), "Preroll");
//!
//! session.begin_ad_break();
//! // ... the ad plays on the same element ...
//! session.end_ad_break();
//! assert_eq!(session.player().play_calls(), 1);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod context;
pub mod error;
pub mod middleware;
pub mod platform;
pub mod session;
pub mod snapshot;
pub mod states;

pub use context::AdsContext;
pub use error::{Error, Result};
pub use middleware::{is_middleware_mediator_supported, HostCapabilities, PlayDecision, PlayMiddleware};
pub use session::AdSession;
pub use snapshot::{capture_snapshot, restore_snapshot, RestoreTask, ResumeOutcome, Snapshot};
pub use states::{AdState, Signal, StateContext, StateMachine};

/// Timing knobs for restoring content after an ad
///
/// The defaults match what desktop and mobile browsers need in practice:
/// - `restore_timeout_ms` bounds the wait for `contentcanplay`, which some
///   browsers never fire after a source reload
/// - readiness is then polled every `resume_poll_interval_ms`, up to
///   `resume_poll_attempts` times, before resuming regardless
///
/// # Examples
///
/// ```
/// let cfg = rfads::AdsConfig::from_json_str(r#"{ "resume_poll_attempts": 5 }"#).unwrap();
/// assert_eq!(cfg.resume_poll_attempts, 5);
/// assert_eq!(cfg.restore_timeout_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdsConfig {
    /// Race timer against `contentcanplay`, in milliseconds
    pub restore_timeout_ms: u64,
    /// Delay between readiness polls, in milliseconds
    pub resume_poll_interval_ms: u64,
    /// Readiness polls before resuming anyway
    pub resume_poll_attempts: u32,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            restore_timeout_ms: 2000,
            resume_poll_interval_ms: 50,
            resume_poll_attempts: 20,
        }
    }
}

impl AdsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn restore_timeout(&self) -> Duration {
        Duration::from_millis(self.restore_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.resume_poll_interval_ms)
    }
}

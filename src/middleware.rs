//! Play interception hook
//!
//! Hosts that support middleware mediators let the ad core veto the tech-level
//! play call while content is blocked, instead of letting content start and
//! pausing it right after. [`is_middleware_mediator_supported`] tells whether
//! that path is usable on the current host.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::AdsContext;
use crate::platform::{MediaSource, Platform, Player};

/// What the host exposes for interception, as probed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    pub platform: Platform,
    /// A generic middleware registration hook is present
    pub has_middleware_hook: bool,
    /// The host defines the sentinel that stops the middleware chain
    pub has_terminator: bool,
}

/// Mediators only work on desktop, and only when the host has both the
/// registration hook and the terminator sentinel.
pub fn is_middleware_mediator_supported(host: &HostCapabilities) -> bool {
    if host.platform.is_mobile() {
        return false;
    }
    host.has_middleware_hook && host.has_terminator
}

/// Answer to a `call_play` mediation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayDecision {
    Proceed,
    /// Stop the chain; the tech never sees the play call
    Terminate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayMiddleware;

impl PlayMiddleware {
    pub fn new() -> Self {
        PlayMiddleware
    }

    pub fn set_source(&self, source: MediaSource) -> MediaSource {
        source
    }

    pub fn call_play(&self, ads: &AdsContext) -> PlayDecision {
        if ads.should_block_play {
            debug!("Using playMiddleware to block content playback");
            return PlayDecision::Terminate;
        }
        PlayDecision::Proceed
    }

    /// After the chain ran. A terminated call still has to look like the
    /// user's play to everyone listening on the player.
    pub fn play(&self, player: &mut dyn Player, terminated: bool) {
        if !terminated {
            return;
        }
        debug!("Play call to Tech was terminated.");
        // The tech was never told to play, so this only informs listeners
        player.trigger("play");
        player.add_class("vjs-has-started");
    }
}

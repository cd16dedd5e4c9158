//! Preroll state: entered on the first play request
//!
//! Flags gathered before play arrive as constructor arguments. What happens
//! during preroll playback is up to the ad integration driving the session.

use log::debug;

use super::{AdState, Signal, StateContext};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preroll {
    ads_ready: bool,
    should_resume_to_content: bool,
}

impl Preroll {
    pub fn new(ads_ready: bool, should_resume_to_content: bool) -> Self {
        Preroll {
            ads_ready,
            should_resume_to_content,
        }
    }

    /// `adsready` was seen before the play request
    pub fn ads_ready(&self) -> bool {
        self.ads_ready
    }

    /// Ads were canceled, errored, skipped or absent before play
    pub fn should_resume_to_content(&self) -> bool {
        self.should_resume_to_content
    }

    pub(super) fn init(&mut self, cx: &mut StateContext<'_>) {
        debug!(
            "Entering Preroll (adsReady: {}, shouldResumeToContent: {})",
            self.ads_ready, self.should_resume_to_content
        );
        cx.ads.should_block_play = true;
    }

    pub(super) fn handle(&mut self, _cx: &mut StateContext<'_>, _signal: Signal) -> Option<AdState> {
        None
    }
}

//! Initial state for a player with ads enabled
//!
//! The player stays here until a play request arrives, then moves to
//! [`Preroll`] to check for prerolls whether or not any will actually play.

use log::debug;

use super::{AdState, Preroll, Signal, StateContext};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeforePreroll {
    ads_ready: bool,
    should_resume_to_content: bool,
}

impl BeforePreroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ads_ready(&self) -> bool {
        self.ads_ready
    }

    pub fn should_resume_to_content(&self) -> bool {
        self.should_resume_to_content
    }

    pub(super) fn init(&mut self, cx: &mut StateContext<'_>) {
        self.ads_ready = false;
        self.should_resume_to_content = false;

        // Content stays blocked until ads have played or we know there are none
        cx.ads.should_block_play = true;
    }

    pub(super) fn handle(&mut self, cx: &mut StateContext<'_>, signal: Signal) -> Option<AdState> {
        match signal {
            Signal::AdsReady => self.on_ads_ready(),
            Signal::Play => return Some(self.on_play()),
            Signal::AdsCanceled => self.on_ads_canceled(),
            Signal::AdsError => self.on_ads_error(),
            Signal::NoPreroll => self.on_no_preroll(),
            Signal::SkipLinearAdMode => self.skip_linear_ad_mode(cx),
            Signal::ContentChanged => self.on_content_changed(),
            _ => {}
        }
        None
    }

    /// The integration may be ready before the play request. Remember it so
    /// Preroll does not wait for `adsready` again.
    fn on_ads_ready(&mut self) {
        debug!("Received adsready event (BeforePreroll)");
        self.ads_ready = true;
    }

    /// Ad mode begins on the play request: from here on, blocking content is
    /// a deliberate act rather than a side effect of not having started.
    fn on_play(&mut self) -> AdState {
        debug!("Received play event (BeforePreroll)");
        AdState::Preroll(Preroll::new(self.ads_ready, self.should_resume_to_content))
    }

    fn on_ads_canceled(&mut self) {
        debug!("adscanceled (BeforePreroll)");
        self.should_resume_to_content = true;
    }

    fn on_ads_error(&mut self) {
        debug!("adserror (BeforePreroll)");
        self.should_resume_to_content = true;
    }

    /// No prerolls: do not wait for the integration once play arrives
    fn on_no_preroll(&mut self) {
        debug!("Skipping prerolls due to nopreroll event (BeforePreroll)");
        self.should_resume_to_content = true;
    }

    fn skip_linear_ad_mode(&mut self, cx: &mut StateContext<'_>) {
        cx.player.trigger("adskip");
        debug!("skipLinearAdMode (BeforePreroll)");
        self.should_resume_to_content = true;
    }

    // Source changes before the preroll are not handled yet. Once play
    // arrives the flow continues as if the source never changed.
    fn on_content_changed(&mut self) {}
}

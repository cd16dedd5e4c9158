//! Ad-insertion state machine
//!
//! The machine holds exactly one [`AdState`] at a time. Signals are routed to
//! the current state's handler table; a handler that wants to move on returns
//! the next state, already constructed with whatever it needs to carry over.
//! The machine then drops the old state and runs the new state's `init`
//! before the next signal can be delivered.
//!
//! Nothing survives a transition except constructor arguments and the flags on
//! [`AdsContext`].

use log::debug;

use crate::context::AdsContext;
use crate::platform::Player;

mod before_preroll;
mod preroll;

pub use before_preroll::BeforePreroll;
pub use preroll::Preroll;

/// Everything a state handler may touch while it runs
pub struct StateContext<'a> {
    pub player: &'a mut dyn Player,
    pub ads: &'a mut AdsContext,
}

impl<'a> StateContext<'a> {
    pub fn new(player: &'a mut dyn Player, ads: &'a mut AdsContext) -> Self {
        StateContext { player, ads }
    }
}

/// Signals an ad state can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Play,
    Playing,
    Ended,
    AdsReady,
    AdsError,
    AdsCanceled,
    AdTimeout,
    AdStarted,
    ContentChanged,
    ContentResumed,
    ReadyForPostroll,
    NoPreroll,
    NoPostroll,
    StartLinearAdMode,
    SkipLinearAdMode,
    EndLinearAdMode,
}

impl Signal {
    pub const ALL: [Signal; 16] = [
        Signal::Play,
        Signal::Playing,
        Signal::Ended,
        Signal::AdsReady,
        Signal::AdsError,
        Signal::AdsCanceled,
        Signal::AdTimeout,
        Signal::AdStarted,
        Signal::ContentChanged,
        Signal::ContentResumed,
        Signal::ReadyForPostroll,
        Signal::NoPreroll,
        Signal::NoPostroll,
        Signal::StartLinearAdMode,
        Signal::SkipLinearAdMode,
        Signal::EndLinearAdMode,
    ];

    /// Event or method name the signal is delivered under
    pub fn name(self) -> &'static str {
        match self {
            Signal::Play => "play",
            Signal::Playing => "playing",
            Signal::Ended => "ended",
            Signal::AdsReady => "adsready",
            Signal::AdsError => "adserror",
            Signal::AdsCanceled => "adscanceled",
            Signal::AdTimeout => "adtimeout",
            Signal::AdStarted => "adstarted",
            Signal::ContentChanged => "contentchanged",
            Signal::ContentResumed => "contentresumed",
            Signal::ReadyForPostroll => "readyforpostroll",
            Signal::NoPreroll => "nopreroll",
            Signal::NoPostroll => "nopostroll",
            Signal::StartLinearAdMode => "startLinearAdMode",
            Signal::SkipLinearAdMode => "skipLinearAdMode",
            Signal::EndLinearAdMode => "endLinearAdMode",
        }
    }

    pub fn from_name(name: &str) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// The closed set of ad-insertion states
#[derive(Debug, Clone, PartialEq)]
pub enum AdState {
    BeforePreroll(BeforePreroll),
    Preroll(Preroll),
}

impl AdState {
    pub fn name(&self) -> &'static str {
        match self {
            AdState::BeforePreroll(_) => "BeforePreroll",
            AdState::Preroll(_) => "Preroll",
        }
    }

    fn init(&mut self, cx: &mut StateContext<'_>) {
        match self {
            AdState::BeforePreroll(s) => s.init(cx),
            AdState::Preroll(s) => s.init(cx),
        }
    }

    /// Run the handler for `signal`, returning the state to transition to
    fn handle(&mut self, cx: &mut StateContext<'_>, signal: Signal) -> Option<AdState> {
        match self {
            AdState::BeforePreroll(s) => s.handle(cx, signal),
            AdState::Preroll(s) => s.handle(cx, signal),
        }
    }
}

pub struct StateMachine {
    current: AdState,
}

impl StateMachine {
    /// Enter `initial` and run its `init`
    pub fn start(initial: AdState, cx: &mut StateContext<'_>) -> Self {
        let mut current = initial;
        debug!("Starting in state {}", current.name());
        current.init(cx);
        StateMachine { current }
    }

    pub fn current(&self) -> &AdState {
        &self.current
    }

    pub fn state_name(&self) -> &'static str {
        self.current.name()
    }

    /// Deliver a signal to the current state. Signals the state has no
    /// handler for are ignored.
    pub fn dispatch(&mut self, cx: &mut StateContext<'_>, signal: Signal) {
        if let Some(next) = self.current.handle(cx, signal) {
            self.transition(cx, next);
        }
    }

    /// Dispatch by name. Returns `false` for names that are not signals.
    pub fn dispatch_named(&mut self, cx: &mut StateContext<'_>, name: &str) -> bool {
        match Signal::from_name(name) {
            Some(signal) => {
                self.dispatch(cx, signal);
                true
            }
            None => {
                debug!("Ignoring unknown signal '{}' ({})", name, self.state_name());
                false
            }
        }
    }

    fn transition(&mut self, cx: &mut StateContext<'_>, next: AdState) {
        debug!("{} -> {}", self.current.name(), next.name());
        self.current = next;
        self.current.init(cx);
    }
}

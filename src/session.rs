//! Glue that owns a player for the lifetime of an ad-enabled session
//!
//! `AdSession` wires the pieces together the way an ad integration would:
//! signals go to the state machine, ad breaks capture and restore snapshots,
//! and host events and timers are forwarded to any restore still in flight.

use log::debug;

use crate::context::AdsContext;
use crate::middleware::{is_middleware_mediator_supported, HostCapabilities, PlayDecision, PlayMiddleware};
use crate::platform::{Player, PlayerEvent, SimPlayer, TimerId};
use crate::snapshot::{capture_snapshot, restore_snapshot, RestoreTask, Snapshot};
use crate::states::{AdState, BeforePreroll, Signal, StateContext, StateMachine};
use crate::AdsConfig;

pub struct AdSession<P: Player> {
    player: P,
    ads: AdsContext,
    machine: StateMachine,
    config: AdsConfig,
    middleware: Option<PlayMiddleware>,
    snapshot: Option<Snapshot>,
    restore: Option<RestoreTask>,
}

impl<P: Player> AdSession<P> {
    /// Take over `player` and enter `BeforePreroll`
    pub fn start(mut player: P, config: AdsConfig) -> Self {
        let mut ads = AdsContext::new();
        let machine = {
            let mut cx = StateContext::new(&mut player, &mut ads);
            StateMachine::start(AdState::BeforePreroll(BeforePreroll::new()), &mut cx)
        };
        AdSession {
            player,
            ads,
            machine,
            config,
            middleware: None,
            snapshot: None,
            restore: None,
        }
    }

    /// Install the play middleware if the host can run it
    pub fn with_middleware(mut self, host: &HostCapabilities) -> Self {
        if is_middleware_mediator_supported(host) {
            self.middleware = Some(PlayMiddleware::new());
        } else {
            debug!("Play middleware not supported on this platform");
        }
        self
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn ads(&self) -> &AdsContext {
        &self.ads
    }

    pub fn ads_mut(&mut self) -> &mut AdsContext {
        &mut self.ads
    }

    pub fn config(&self) -> &AdsConfig {
        &self.config
    }

    pub fn state(&self) -> &AdState {
        self.machine.current()
    }

    pub fn state_name(&self) -> &'static str {
        self.machine.state_name()
    }

    pub fn uses_middleware(&self) -> bool {
        self.middleware.is_some()
    }

    pub fn dispatch(&mut self, signal: Signal) {
        let mut cx = StateContext::new(&mut self.player, &mut self.ads);
        self.machine.dispatch(&mut cx, signal);
    }

    pub fn dispatch_named(&mut self, name: &str) -> bool {
        let mut cx = StateContext::new(&mut self.player, &mut self.ads);
        self.machine.dispatch_named(&mut cx, name)
    }

    /// A play request reached the player. With middleware installed, a
    /// blocked request is terminated before the tech sees it; either way the
    /// play intent is delivered to the state machine.
    pub fn intercept_play(&mut self) -> PlayDecision {
        let decision = match self.middleware {
            Some(mw) => {
                let decision = mw.call_play(&self.ads);
                mw.play(&mut self.player, decision == PlayDecision::Terminate);
                decision
            }
            None => PlayDecision::Proceed,
        };
        self.dispatch(Signal::Play);
        decision
    }

    /// Capture player state as an ad takes over the player
    pub fn begin_ad_break(&mut self) -> &Snapshot {
        self.snapshot.insert(capture_snapshot(&self.player))
    }

    /// Restore the state captured by `begin_ad_break`. Returns `true` when
    /// restoration continues asynchronously.
    pub fn end_ad_break(&mut self) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            debug!("end_ad_break without a snapshot, nothing to restore");
            return false;
        };
        self.restore = restore_snapshot(&mut self.player, &mut self.ads, snapshot, &self.config);
        self.restore_pending()
    }

    /// Skip restoring the next snapshot, e.g. when the source is about to change
    pub fn disable_next_snapshot_restore(&mut self) {
        self.ads.disable_next_snapshot_restore = true;
    }

    pub fn pending_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Most recent asynchronous restore, finished or not
    pub fn restore(&self) -> Option<&RestoreTask> {
        self.restore.as_ref()
    }

    pub fn restore_pending(&self) -> bool {
        self.restore.as_ref().is_some_and(|r| !r.is_idle())
    }

    /// Forward a host event. Returns `true` if something consumed it.
    pub fn handle_event(&mut self, event: &PlayerEvent) -> bool {
        match self.restore.as_mut() {
            Some(task) => task.handle_event(&mut self.player, &mut self.ads, event),
            None => false,
        }
    }

    /// Forward a fired host timer. Returns `true` if it belonged to a restore.
    pub fn fire_timer(&mut self, id: TimerId) -> bool {
        match self.restore.as_mut() {
            Some(task) => task.handle_timer(&mut self.player, &mut self.ads, id),
            None => false,
        }
    }
}

impl AdSession<SimPlayer> {
    /// Fire simulated timers in deadline order until none are left
    pub fn run_timers(&mut self) -> usize {
        let mut fired = 0;
        while let Some(id) = self.player.pop_due_timer() {
            self.fire_timer(id);
            fired += 1;
        }
        fired
    }
}

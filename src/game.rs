//! Game driver
//!
//! Owns a [`Session`] plus the timers it needs. Intents from the UI and the
//! host's per-frame `update` go in; the effects the host must perform (audio,
//! prize fetches) come out. Deferred events and countdown ticks never leave
//! the driver.

use crate::consts::TICK_MS;
use crate::i18n::Language;
use crate::platform::{Countdown, DeferredQueue};
use crate::sim::{
    Deferred, DonutPatch, PowerupKind, Prize, Session, SessionEffect, SessionEvent, SessionState,
};

/// Game instance holding the session and its timers
#[derive(Debug, Clone)]
pub struct Game {
    session: Session,
    countdown: Countdown,
    deferred: DeferredQueue<Deferred>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            session: Session::new(seed),
            countdown: Countdown::new(TICK_MS),
            deferred: DeferredQueue::new(),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn seed(&self) -> u64 {
        self.session.seed()
    }

    /// True while the countdown timer is armed
    pub fn clock_armed(&self) -> bool {
        self.countdown.is_armed()
    }

    // === Intents ===

    pub fn start_game(&mut self, now: f64) -> Vec<SessionEffect> {
        // A restart gets a fresh timer, never the previous game's cadence
        self.countdown.cancel();
        self.deferred.clear();
        self.deferred.thaw(now);
        self.dispatch(SessionEvent::Start, now)
    }

    pub fn update_selection(&mut self, patch: DonutPatch, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::UpdateSelection(patch), now)
    }

    pub fn serve(&mut self, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::Serve, now)
    }

    pub fn toggle_pause(&mut self, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::TogglePause, now)
    }

    pub fn continue_after_prize(&mut self, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::Continue, now)
    }

    pub fn set_volume(&mut self, volume: f32, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::SetVolume(volume), now)
    }

    pub fn set_language(&mut self, language: Language, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::SetLanguage(language), now)
    }

    pub fn activate_powerup(&mut self, kind: PowerupKind, now: f64) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::ActivatePowerup(kind), now)
    }

    /// Feed back the answer to a `FetchPrize` effect
    pub fn deliver_prize(
        &mut self,
        ticket: u32,
        prize: Option<Prize>,
        now: f64,
    ) -> Vec<SessionEffect> {
        self.dispatch(SessionEvent::PrizeReady { ticket, prize }, now)
    }

    /// Advance timers to `now` (call once per frame)
    pub fn update(&mut self, now: f64) -> Vec<SessionEffect> {
        let mut out = Vec::new();

        if self.countdown.poll(now) {
            out.extend(self.dispatch(SessionEvent::Tick, now));
        }

        for deferred in self.deferred.poll(now) {
            out.extend(self.dispatch(deferred.into_event(), now));
        }

        out
    }

    /// Run one event through the session, keep the timers in step with the
    /// resulting state, and return the effects meant for the host.
    fn dispatch(&mut self, event: SessionEvent, now: f64) -> Vec<SessionEffect> {
        let effects = self.session.handle(event, now);

        let mut out = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                SessionEffect::Schedule { event, delay_ms } => {
                    self.deferred.schedule(event, now, delay_ms);
                }
                SessionEffect::Cancel(event) => self.deferred.cancel(event),
                other => out.push(other),
            }
        }

        self.sync_timers(now);
        out
    }

    fn sync_timers(&mut self, now: f64) {
        let state = self.session.state();

        if state.clock_running() {
            self.countdown.arm(now);
        } else {
            self.countdown.cancel();
        }

        if state.is_paused {
            self.deferred.freeze(now);
        } else {
            self.deferred.thaw(now);
        }
    }
}

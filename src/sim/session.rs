//! Session state machine
//!
//! `Session::handle` is the only way the state changes. Each event yields the
//! side effects the host should carry out (sounds, music, deferred events,
//! prize requests); the session itself never touches timers or audio.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::donut::{DonutConfig, DonutPatch};
use super::order::generate_order;
use super::scoring::{ServeContext, ServeOutcome, round_time, score_serve};
use super::state::{Feedback, Inventory, PowerupKind, Prize, SessionPhase, SessionState};
use crate::consts::*;
use crate::i18n::Language;

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// New game (also "try again")
    Start,
    /// One second of countdown elapsed
    Tick,
    UpdateSelection(DonutPatch),
    Serve,
    /// Feedback animation finished after a correct serve
    LevelComplete,
    /// Prize service answered (None on any failure)
    PrizeReady { ticket: u32, prize: Option<Prize> },
    /// Leave the prize screen for the next level
    Continue,
    TogglePause,
    SetVolume(f32),
    SetLanguage(Language),
    ActivatePowerup(PowerupKind),
    ClearFeedback,
    ClearBonusMessage,
}

/// Events the session asks to have delivered later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deferred {
    LevelComplete,
    ClearFeedback,
    ClearBonusMessage,
}

impl Deferred {
    pub fn into_event(self) -> SessionEvent {
        match self {
            Deferred::LevelComplete => SessionEvent::LevelComplete,
            Deferred::ClearFeedback => SessionEvent::ClearFeedback,
            Deferred::ClearBonusMessage => SessionEvent::ClearBonusMessage,
        }
    }
}

/// Sound cues the presentation layer plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Click,
    Dough,
    Glaze,
    Sprinkles,
    Filling,
    Success,
    Win,
    Prize,
    Fail,
    GameOver,
    Tick,
    Serve,
    Bonus,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    Sound(SoundCue),
    StartMusic,
    StopMusic,
    SuspendAudio,
    ResumeAudio,
    SetMusicVolume(f32),
    /// Deliver `event` after `delay_ms` (replaces a pending one of the same kind)
    Schedule { event: Deferred, delay_ms: f64 },
    /// Drop a pending deferred event
    Cancel(Deferred),
    /// Ask the prize service for a prize; answer with `PrizeReady`
    FetchPrize { ticket: u32 },
}

/// The session state machine
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    rng: Pcg32,
    seed: u64,
}

impl Session {
    /// Create an idle session; orders are drawn from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            state: SessionState::default(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Read-only snapshot of the current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply one event at time `now` (ms)
    pub fn handle(&mut self, event: SessionEvent, now: f64) -> Vec<SessionEffect> {
        let mut fx = Vec::new();
        match event {
            SessionEvent::Start => self.start(now, &mut fx),
            SessionEvent::Tick => self.tick(now, &mut fx),
            SessionEvent::UpdateSelection(patch) => self.update_selection(&patch, &mut fx),
            SessionEvent::Serve => self.serve(now, &mut fx),
            SessionEvent::LevelComplete => self.level_complete(&mut fx),
            SessionEvent::PrizeReady { ticket, prize } => self.prize_ready(ticket, prize, &mut fx),
            SessionEvent::Continue => self.continue_level(now, &mut fx),
            SessionEvent::TogglePause => self.toggle_pause(now, &mut fx),
            SessionEvent::SetVolume(volume) => {
                let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
                self.state.music_volume = volume;
                fx.push(SessionEffect::SetMusicVolume(volume));
            }
            SessionEvent::SetLanguage(language) => {
                self.state.language = language;
            }
            SessionEvent::ActivatePowerup(kind) => self.activate_powerup(kind, now, &mut fx),
            SessionEvent::ClearFeedback => self.state.last_feedback = None,
            SessionEvent::ClearBonusMessage => self.state.bonus_message = None,
        }
        fx
    }

    fn start(&mut self, now: f64, fx: &mut Vec<SessionEffect>) {
        let music_volume = self.state.music_volume;
        let language = self.state.language;

        let order = generate_order(1, &mut self.rng);
        self.state = SessionState {
            phase: SessionPhase::Playing,
            current_order: Some(order),
            time_left: ROUND_SECONDS,
            order_start_time: now,
            inventory: Inventory::starting(),
            music_volume,
            language,
            ..SessionState::default()
        };

        log::info!("Session started (seed {}), first order {:?}", self.seed, order);
        fx.push(SessionEffect::Cancel(Deferred::LevelComplete));
        fx.push(SessionEffect::Cancel(Deferred::ClearFeedback));
        fx.push(SessionEffect::Cancel(Deferred::ClearBonusMessage));
        fx.push(SessionEffect::Sound(SoundCue::Success));
        fx.push(SessionEffect::StartMusic);
    }

    fn tick(&mut self, now: f64, fx: &mut Vec<SessionEffect>) {
        if !self.state.clock_running() {
            log::debug!("Tick ignored in {:?} (paused: {})", self.state.phase, self.state.is_paused);
            return;
        }
        if self.state.active_effects.is_active(PowerupKind::TimeFreeze, now) {
            return;
        }

        if self.state.time_left <= 1 {
            self.state.time_left = 0;
            self.state.phase = SessionPhase::GameOver;
            log::info!(
                "Out of time at level {} with score {}",
                self.state.level,
                self.state.score
            );
            fx.push(SessionEffect::Sound(SoundCue::GameOver));
            fx.push(SessionEffect::StopMusic);
            return;
        }

        if self.state.time_left <= LOW_TIME_WARNING_SECS {
            fx.push(SessionEffect::Sound(SoundCue::Tick));
        }
        self.state.time_left -= 1;
    }

    fn update_selection(&mut self, patch: &DonutPatch, fx: &mut Vec<SessionEffect>) {
        if self.state.is_paused || self.state.phase != SessionPhase::Playing {
            return;
        }

        let cue = if patch.dough.is_some() {
            SoundCue::Dough
        } else if patch.topping.is_some() {
            SoundCue::Glaze
        } else if patch.sprinkles.is_some() {
            SoundCue::Sprinkles
        } else if patch.filling.is_some() {
            SoundCue::Filling
        } else {
            SoundCue::Click
        };
        fx.push(SessionEffect::Sound(cue));

        self.state.current_donut.apply(patch);
    }

    fn serve(&mut self, now: f64, fx: &mut Vec<SessionEffect>) {
        if self.state.is_paused || self.state.phase != SessionPhase::Playing {
            log::debug!("Serve ignored in {:?}", self.state.phase);
            return;
        }
        let Some(order) = self.state.current_order else {
            return;
        };

        let outcome = score_serve(&ServeContext {
            donut: &self.state.current_donut,
            order: &order,
            level: self.state.level,
            streak: self.state.streak,
            time_left: self.state.time_left,
            order_start_time: self.state.order_start_time,
            now,
            double_points: self
                .state
                .active_effects
                .is_active(PowerupKind::DoublePoints, now),
        });

        match outcome {
            ServeOutcome::Correct {
                points,
                streak,
                multiplier,
                bonus,
            } => {
                self.state.score += points;
                self.state.streak = streak;
                self.state.multiplier = multiplier;
                self.state.last_feedback = Some(Feedback::Success);
                self.state.phase = SessionPhase::LevelCleared;

                fx.push(SessionEffect::Sound(SoundCue::Serve));
                fx.push(SessionEffect::Sound(SoundCue::Success));

                if let Some(bonus) = bonus {
                    self.state.pending_time_bonus += bonus.seconds();
                    self.state.bonus_message = Some(bonus);
                    fx.push(SessionEffect::Sound(SoundCue::Bonus));
                    fx.push(SessionEffect::Schedule {
                        event: Deferred::ClearBonusMessage,
                        delay_ms: BONUS_MESSAGE_MS,
                    });
                }

                log::info!(
                    "Order served: +{} (streak {}, x{}, bonus {:?})",
                    points,
                    streak,
                    multiplier,
                    bonus
                );
                fx.push(SessionEffect::Schedule {
                    event: Deferred::ClearFeedback,
                    delay_ms: FEEDBACK_MS,
                });
                fx.push(SessionEffect::Schedule {
                    event: Deferred::LevelComplete,
                    delay_ms: LEVEL_COMPLETE_DELAY_MS,
                });
            }
            ServeOutcome::Wrong { time_left } => {
                self.state.time_left = time_left;
                self.state.streak = 0;
                self.state.multiplier = 1;
                self.state.last_feedback = Some(Feedback::Error);

                fx.push(SessionEffect::Sound(SoundCue::Fail));
                fx.push(SessionEffect::Schedule {
                    event: Deferred::ClearFeedback,
                    delay_ms: FEEDBACK_MS,
                });
            }
        }
    }

    fn level_complete(&mut self, fx: &mut Vec<SessionEffect>) {
        if self.state.phase != SessionPhase::LevelCleared {
            return;
        }
        self.state.phase = SessionPhase::LoadingPrize;
        self.state.prize_ticket = self.state.prize_ticket.wrapping_add(1);

        fx.push(SessionEffect::StopMusic);
        fx.push(SessionEffect::Sound(SoundCue::Prize));
        fx.push(SessionEffect::FetchPrize {
            ticket: self.state.prize_ticket,
        });
    }

    fn prize_ready(&mut self, ticket: u32, prize: Option<Prize>, fx: &mut Vec<SessionEffect>) {
        if self.state.phase != SessionPhase::LoadingPrize || ticket != self.state.prize_ticket {
            log::debug!("Dropping stale prize (ticket {})", ticket);
            return;
        }

        let prize = match prize {
            Some(prize) => {
                fx.push(SessionEffect::Sound(SoundCue::Win));
                prize
            }
            None => {
                log::warn!("Prize service gave nothing, using fallback prize");
                Prize::fallback()
            }
        };
        log::info!("Level {} prize: {}", self.state.level, prize.name);
        self.state.prize = Some(prize);
        self.state.phase = SessionPhase::Reveal;
    }

    fn continue_level(&mut self, now: f64, fx: &mut Vec<SessionEffect>) {
        if self.state.phase != SessionPhase::Reveal {
            return;
        }

        let level = self.state.level + 1;
        let order = generate_order(level, &mut self.rng);

        self.state.level = level;
        self.state.time_left = round_time(level, self.state.pending_time_bonus);
        self.state.current_donut = DonutConfig::INITIAL;
        self.state.current_order = Some(order);
        self.state.prize = None;
        self.state.pending_time_bonus = 0;
        self.state.last_feedback = None;
        self.state.order_start_time = now;
        self.state.phase = SessionPhase::Playing;

        log::info!(
            "Level {} ({}s): order {:?}",
            level,
            self.state.time_left,
            order
        );
        fx.push(SessionEffect::Sound(SoundCue::Click));
        fx.push(SessionEffect::StartMusic);
    }

    fn toggle_pause(&mut self, now: f64, fx: &mut Vec<SessionEffect>) {
        if !self.state.can_pause() {
            return;
        }
        fx.push(SessionEffect::Sound(SoundCue::Click));

        if self.state.is_paused {
            let paused_for = self
                .state
                .paused_at
                .take()
                .map_or(0.0, |at| (now - at).max(0.0));
            self.state.is_paused = false;
            // Paused time counts against neither power-ups nor the speed bonus
            self.state.active_effects.shift(paused_for);
            self.state.order_start_time += paused_for;
            fx.push(SessionEffect::ResumeAudio);
        } else {
            self.state.is_paused = true;
            self.state.paused_at = Some(now);
            fx.push(SessionEffect::SuspendAudio);
        }
    }

    fn activate_powerup(&mut self, kind: PowerupKind, now: f64, fx: &mut Vec<SessionEffect>) {
        if self.state.is_paused || self.state.phase != SessionPhase::Playing {
            return;
        }
        if !self.state.inventory.take(kind) {
            log::debug!("No {:?} left", kind);
            return;
        }

        self.state.active_effects.activate(kind, now + kind.duration_ms());
        if kind == PowerupKind::InstantCook {
            if let Some(order) = self.state.current_order {
                self.state.current_donut = order;
            }
        }

        log::info!("Power-up {:?} active until {}", kind, now + kind.duration_ms());
        fx.push(SessionEffect::Sound(SoundCue::Bonus));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::donut::{Filling, Shape, Sprinkles};
    use crate::sim::scoring::SpeedBonus;

    fn started(seed: u64) -> Session {
        let mut session = Session::new(seed);
        session.handle(SessionEvent::Start, 0.0);
        session
    }

    /// Make the selection match the current order
    fn build_order(session: &mut Session) {
        let order = session.state().current_order.expect("order");
        session.handle(SessionEvent::UpdateSelection(DonutPatch::full(&order)), 0.0);
        assert!(session.state().current_donut.matches(&order));
    }

    /// Make the selection differ from the order in exactly one field
    fn build_wrong(session: &mut Session) {
        let order = session.state().current_order.expect("order");
        let sprinkles = if order.sprinkles == Sprinkles::Gold {
            Sprinkles::Rainbow
        } else {
            Sprinkles::Gold
        };
        let patch = DonutPatch {
            sprinkles: Some(sprinkles),
            ..DonutPatch::full(&order)
        };
        session.handle(SessionEvent::UpdateSelection(patch), 0.0);
    }

    fn tick_n(session: &mut Session, n: u32, now: f64) {
        for _ in 0..n {
            session.handle(SessionEvent::Tick, now);
        }
    }

    #[test]
    fn test_start() {
        let mut session = Session::new(1);
        assert_eq!(session.state().phase, SessionPhase::Idle);

        let fx = session.handle(SessionEvent::Start, 500.0);
        let state = session.state();
        assert_eq!(state.phase, SessionPhase::Playing);
        assert!(state.is_playing());
        assert_eq!(state.level, 1);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.order_start_time, 500.0);
        assert!(state.current_order.is_some());
        assert_eq!(state.inventory, Inventory::starting());
        assert!(fx.contains(&SessionEffect::StartMusic));
    }

    #[test]
    fn test_correct_serve_end_to_end() {
        let mut session = started(42);
        build_order(&mut session);
        tick_n(&mut session, 5, 0.0);
        assert_eq!(session.state().time_left, 55);

        let fx = session.handle(SessionEvent::Serve, 20_000.0);
        let state = session.state();
        assert_eq!(state.score, 37);
        assert_eq!(state.streak, 1);
        assert_eq!(state.multiplier, 1);
        assert_eq!(state.last_feedback, Some(Feedback::Success));
        assert_eq!(state.phase, SessionPhase::LevelCleared);
        assert!(fx.contains(&SessionEffect::Schedule {
            event: Deferred::LevelComplete,
            delay_ms: LEVEL_COMPLETE_DELAY_MS,
        }));
    }

    #[test]
    fn test_wrong_serve() {
        let mut session = started(42);
        build_wrong(&mut session);
        tick_n(&mut session, 48, 0.0);
        assert_eq!(session.state().time_left, 12);

        let fx = session.handle(SessionEvent::Serve, 1_000.0);
        let state = session.state();
        assert_eq!(state.time_left, 7);
        assert_eq!(state.streak, 0);
        assert_eq!(state.multiplier, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.last_feedback, Some(Feedback::Error));
        assert_eq!(state.phase, SessionPhase::Playing);
        assert!(fx.contains(&SessionEffect::Sound(SoundCue::Fail)));
    }

    #[test]
    fn test_penalty_to_zero_waits_for_tick() {
        let mut session = started(3);
        build_wrong(&mut session);
        tick_n(&mut session, 57, 0.0);
        assert_eq!(session.state().time_left, 3);

        session.handle(SessionEvent::Serve, 0.0);
        assert_eq!(session.state().time_left, 0);
        assert_eq!(session.state().phase, SessionPhase::Playing);

        let fx = session.handle(SessionEvent::Tick, 0.0);
        assert!(session.state().is_game_over());
        assert!(fx.contains(&SessionEffect::StopMusic));
    }

    #[test]
    fn test_countdown_to_game_over() {
        let mut session = started(5);
        tick_n(&mut session, 49, 0.0);
        // Warning ticks start at ten seconds
        let fx = session.handle(SessionEvent::Tick, 0.0);
        assert_eq!(session.state().time_left, 10);
        assert!(!fx.contains(&SessionEffect::Sound(SoundCue::Tick)));
        let fx = session.handle(SessionEvent::Tick, 0.0);
        assert!(fx.contains(&SessionEffect::Sound(SoundCue::Tick)));

        tick_n(&mut session, 9, 0.0);
        let state = session.state();
        assert_eq!(state.time_left, 0);
        assert!(state.is_game_over());
        assert!(!state.is_playing());

        // Game over is terminal until restart
        session.handle(SessionEvent::Serve, 0.0);
        session.handle(SessionEvent::Tick, 0.0);
        assert!(session.state().is_game_over());
        session.handle(SessionEvent::Start, 0.0);
        assert_eq!(session.state().phase, SessionPhase::Playing);
        assert_eq!(session.state().time_left, 60);
    }

    #[test]
    fn test_streak_builds_multiplier() {
        let mut session = started(11);
        for _ in 0..3 {
            build_order(&mut session);
            session.handle(SessionEvent::Serve, 60_000.0);
            session.handle(SessionEvent::LevelComplete, 0.0);
            let ticket = session.state().prize_ticket;
            session.handle(SessionEvent::PrizeReady { ticket, prize: None }, 0.0);
            session.handle(SessionEvent::Continue, 0.0);
        }
        assert_eq!(session.state().streak, 3);
        assert_eq!(session.state().multiplier, 2);

        build_wrong(&mut session);
        session.handle(SessionEvent::Serve, 0.0);
        assert_eq!(session.state().streak, 0);
        assert_eq!(session.state().multiplier, 1);
    }

    #[test]
    fn test_level_cycle_applies_pending_bonus_on_continue() {
        let mut session = started(8);
        build_order(&mut session);
        // Served 3 seconds into the order
        session.handle(SessionEvent::Serve, 3_000.0);
        let state = session.state();
        assert_eq!(state.bonus_message, Some(SpeedBonus::Speed));
        assert_eq!(state.pending_time_bonus, 5);
        // Not applied to the running clock
        assert_eq!(state.time_left, 60);

        let fx = session.handle(SessionEvent::LevelComplete, 4_000.0);
        assert!(session.state().is_loading_prize());
        let ticket = session.state().prize_ticket;
        assert!(fx.contains(&SessionEffect::FetchPrize { ticket }));

        let prize = Prize {
            name: "Neon Dreidel".into(),
            description: "Spins forever.".into(),
            image: "data:image/png;base64,AAAA".into(),
        };
        let fx = session.handle(
            SessionEvent::PrizeReady {
                ticket,
                prize: Some(prize.clone()),
            },
            5_000.0,
        );
        assert_eq!(session.state().phase, SessionPhase::Reveal);
        assert_eq!(session.state().prize, Some(prize));
        assert!(fx.contains(&SessionEffect::Sound(SoundCue::Win)));

        session.handle(SessionEvent::Continue, 9_000.0);
        let state = session.state();
        assert_eq!(state.level, 2);
        assert_eq!(state.time_left, 50 + 5);
        assert_eq!(state.pending_time_bonus, 0);
        assert_eq!(state.prize, None);
        assert_eq!(state.last_feedback, None);
        assert_eq!(state.current_donut, DonutConfig::INITIAL);
        assert_eq!(state.order_start_time, 9_000.0);
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_failed_prize_falls_back() {
        let mut session = started(9);
        build_order(&mut session);
        session.handle(SessionEvent::Serve, 30_000.0);
        session.handle(SessionEvent::LevelComplete, 0.0);
        let ticket = session.state().prize_ticket;
        let fx = session.handle(SessionEvent::PrizeReady { ticket, prize: None }, 0.0);
        assert_eq!(session.state().prize, Some(Prize::fallback()));
        assert_eq!(session.state().phase, SessionPhase::Reveal);
        assert!(!fx.contains(&SessionEffect::Sound(SoundCue::Win)));
    }

    #[test]
    fn test_stale_prize_is_dropped() {
        let mut session = started(9);
        build_order(&mut session);
        session.handle(SessionEvent::Serve, 30_000.0);
        session.handle(SessionEvent::LevelComplete, 0.0);
        let ticket = session.state().prize_ticket;

        session.handle(
            SessionEvent::PrizeReady {
                ticket: ticket + 7,
                prize: None,
            },
            0.0,
        );
        assert!(session.state().is_loading_prize());
        assert_eq!(session.state().prize, None);
    }

    #[test]
    fn test_clock_stops_outside_playing() {
        let mut session = started(4);
        build_order(&mut session);
        session.handle(SessionEvent::Serve, 30_000.0);
        let before = session.state().time_left;
        tick_n(&mut session, 3, 0.0);
        assert_eq!(session.state().time_left, before);

        session.handle(SessionEvent::LevelComplete, 0.0);
        tick_n(&mut session, 3, 0.0);
        assert_eq!(session.state().time_left, before);
    }

    #[test]
    fn test_pause_blocks_input_and_clock() {
        let mut session = started(6);
        let fx = session.handle(SessionEvent::TogglePause, 1_000.0);
        assert!(session.state().is_paused);
        assert!(fx.contains(&SessionEffect::SuspendAudio));

        let donut = session.state().current_donut;
        session.handle(SessionEvent::UpdateSelection(DonutPatch::shape(Shape::Filled)), 1_100.0);
        assert_eq!(session.state().current_donut, donut);

        tick_n(&mut session, 5, 1_200.0);
        assert_eq!(session.state().time_left, 60);

        session.handle(SessionEvent::Serve, 1_300.0);
        assert_eq!(session.state().last_feedback, None);

        let fx = session.handle(SessionEvent::TogglePause, 4_000.0);
        assert!(!session.state().is_paused);
        assert!(fx.contains(&SessionEffect::ResumeAudio));
        // Speed bonus clock skips the pause
        assert_eq!(session.state().order_start_time, 3_000.0);
    }

    #[test]
    fn test_pause_available_while_prize_loads() {
        let mut session = started(6);
        build_order(&mut session);
        session.handle(SessionEvent::Serve, 30_000.0);
        session.handle(SessionEvent::LevelComplete, 0.0);

        session.handle(SessionEvent::TogglePause, 0.0);
        assert!(session.state().is_paused);
        let ticket = session.state().prize_ticket;
        session.handle(SessionEvent::PrizeReady { ticket, prize: None }, 0.0);
        assert_eq!(session.state().phase, SessionPhase::Reveal);
    }

    #[test]
    fn test_pause_ignored_when_idle_or_over() {
        let mut session = Session::new(1);
        assert!(session.handle(SessionEvent::TogglePause, 0.0).is_empty());
        assert!(!session.state().is_paused);
    }

    #[test]
    fn test_ring_selection_drops_filling() {
        let mut session = started(2);
        session.handle(
            SessionEvent::UpdateSelection(DonutPatch {
                shape: Some(Shape::Filled),
                filling: Some(Filling::Blueberry),
                ..Default::default()
            }),
            0.0,
        );
        assert_eq!(session.state().current_donut.filling, Filling::Blueberry);
        let fx = session.handle(SessionEvent::UpdateSelection(DonutPatch::shape(Shape::Ring)), 0.0);
        assert_eq!(session.state().current_donut.filling, Filling::None);
        assert_eq!(fx, vec![SessionEffect::Sound(SoundCue::Click)]);
    }

    #[test]
    fn test_time_freeze() {
        let mut session = started(12);
        session.handle(SessionEvent::ActivatePowerup(PowerupKind::TimeFreeze), 1_000.0);
        assert_eq!(session.state().inventory.time_freeze, STARTING_POWERUPS - 1);

        session.handle(SessionEvent::Tick, 2_000.0);
        session.handle(SessionEvent::Tick, 10_999.0);
        assert_eq!(session.state().time_left, 60);

        session.handle(SessionEvent::Tick, 11_000.0);
        assert_eq!(session.state().time_left, 59);
    }

    #[test]
    fn test_powerup_requires_inventory() {
        let mut session = started(12);
        for _ in 0..STARTING_POWERUPS {
            session.handle(SessionEvent::ActivatePowerup(PowerupKind::DoublePoints), 0.0);
        }
        let before = session.state().clone();
        let fx = session.handle(SessionEvent::ActivatePowerup(PowerupKind::DoublePoints), 99_000.0);
        assert!(fx.is_empty());
        assert_eq!(session.state().inventory.double_points, 0);
        assert_eq!(session.state().active_effects, before.active_effects);
    }

    #[test]
    fn test_double_points() {
        let mut session = started(13);
        session.handle(SessionEvent::ActivatePowerup(PowerupKind::DoublePoints), 0.0);
        build_order(&mut session);
        session.handle(SessionEvent::Serve, 10_000.0);
        assert_eq!(session.state().score, (10 + 30) * 2);
    }

    #[test]
    fn test_instant_cook_fills_selection() {
        let mut session = started(14);
        session.handle(SessionEvent::ActivatePowerup(PowerupKind::InstantCook), 0.0);
        let order = session.state().current_order.expect("order");
        assert!(session.state().current_donut.matches(&order));

        session.handle(SessionEvent::Serve, 10_000.0);
        assert_eq!(session.state().last_feedback, Some(Feedback::Success));
    }

    #[test]
    fn test_pause_extends_powerups() {
        let mut session = started(15);
        session.handle(SessionEvent::ActivatePowerup(PowerupKind::TimeFreeze), 0.0);
        session.handle(SessionEvent::TogglePause, 5_000.0);
        session.handle(SessionEvent::TogglePause, 65_000.0);
        assert!(
            session
                .state()
                .active_effects
                .is_active(PowerupKind::TimeFreeze, 69_000.0)
        );
        session.handle(SessionEvent::Tick, 69_000.0);
        assert_eq!(session.state().time_left, 60);
    }

    #[test]
    fn test_restart_keeps_preferences() {
        let mut session = started(16);
        session.handle(SessionEvent::SetVolume(1.7), 0.0);
        session.handle(SessionEvent::SetLanguage(Language::He), 0.0);
        assert_eq!(session.state().music_volume, 1.0);

        session.handle(SessionEvent::Start, 0.0);
        assert_eq!(session.state().music_volume, 1.0);
        assert_eq!(session.state().language, Language::He);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = started(77);
        let mut b = started(77);
        assert_eq!(a.state(), b.state());
        build_order(&mut a);
        build_order(&mut b);
        a.handle(SessionEvent::Serve, 10_000.0);
        b.handle(SessionEvent::Serve, 10_000.0);
        assert_eq!(a.state(), b.state());
    }
}

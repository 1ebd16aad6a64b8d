//! Session state and core game types
//!
//! Everything the presentation layer renders lives here. The state is owned
//! by [`Session`](super::Session); outside code only ever sees `&SessionState`.

use serde::{Deserialize, Serialize};

use super::donut::DonutConfig;
use super::scoring::SpeedBonus;
use crate::consts::*;
use crate::i18n::Language;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, no game running
    #[default]
    Idle,
    /// Countdown running, player building a donut
    Playing,
    /// Correct serve, feedback animating before the prize request
    LevelCleared,
    /// Waiting for the prize service
    LoadingPrize,
    /// Prize on screen, waiting for "continue"
    Reveal,
    /// Clock ran out
    GameOver,
}

/// Result banner of the last serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Success,
    Error,
}

/// Consumable power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerupKind {
    /// Countdown stops while active
    TimeFreeze,
    /// Serve points are doubled while active
    DoublePoints,
    /// Current selection becomes the order
    InstantCook,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::TimeFreeze,
        PowerupKind::DoublePoints,
        PowerupKind::InstantCook,
    ];

    /// Effect duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerupKind::TimeFreeze => TIME_FREEZE_MS,
            PowerupKind::DoublePoints => DOUBLE_POINTS_MS,
            PowerupKind::InstantCook => INSTANT_COOK_MS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::TimeFreeze => "time_freeze",
            PowerupKind::DoublePoints => "double_points",
            PowerupKind::InstantCook => "instant_cook",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "time_freeze" | "freeze" => Some(PowerupKind::TimeFreeze),
            "double_points" | "double" => Some(PowerupKind::DoublePoints),
            "instant_cook" | "instant" => Some(PowerupKind::InstantCook),
            _ => None,
        }
    }
}

/// Power-up counts held by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub time_freeze: u32,
    pub double_points: u32,
    pub instant_cook: u32,
}

impl Inventory {
    /// Loadout a new session starts with
    pub fn starting() -> Self {
        Self {
            time_freeze: STARTING_POWERUPS,
            double_points: STARTING_POWERUPS,
            instant_cook: STARTING_POWERUPS,
        }
    }

    pub fn count(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::TimeFreeze => self.time_freeze,
            PowerupKind::DoublePoints => self.double_points,
            PowerupKind::InstantCook => self.instant_cook,
        }
    }

    fn slot_mut(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::TimeFreeze => &mut self.time_freeze,
            PowerupKind::DoublePoints => &mut self.double_points,
            PowerupKind::InstantCook => &mut self.instant_cook,
        }
    }

    /// Consume one power-up; false if none left
    pub fn take(&mut self, kind: PowerupKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn add(&mut self, kind: PowerupKind, n: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(n);
    }
}

/// Expiry timestamps (ms) of activated power-ups
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub time_freeze: Option<f64>,
    pub double_points: Option<f64>,
    pub instant_cook: Option<f64>,
}

impl ActiveEffects {
    pub fn expiry(&self, kind: PowerupKind) -> Option<f64> {
        match kind {
            PowerupKind::TimeFreeze => self.time_freeze,
            PowerupKind::DoublePoints => self.double_points,
            PowerupKind::InstantCook => self.instant_cook,
        }
    }

    /// An effect is active strictly before its expiry
    pub fn is_active(&self, kind: PowerupKind, now: f64) -> bool {
        self.expiry(kind).is_some_and(|until| until > now)
    }

    pub fn activate(&mut self, kind: PowerupKind, until: f64) {
        let slot = match kind {
            PowerupKind::TimeFreeze => &mut self.time_freeze,
            PowerupKind::DoublePoints => &mut self.double_points,
            PowerupKind::InstantCook => &mut self.instant_cook,
        };
        *slot = Some(until);
    }

    /// Push every expiry later by `delta_ms` (time spent paused)
    pub fn shift(&mut self, delta_ms: f64) {
        for slot in [
            &mut self.time_freeze,
            &mut self.double_points,
            &mut self.instant_cook,
        ] {
            if let Some(until) = slot {
                *until += delta_ms;
            }
        }
    }

    /// Milliseconds left on an effect (0 if inactive)
    pub fn remaining_ms(&self, kind: PowerupKind, now: f64) -> f64 {
        self.expiry(kind).map_or(0.0, |until| (until - now).max(0.0))
    }
}

/// Level-completion reward from the prize service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub name: String,
    pub description: String,
    /// URL or `data:` URI
    pub image: String,
}

impl Prize {
    /// Shown whenever the prize service has nothing for us
    pub fn fallback() -> Self {
        Self {
            name: "Mystery Token".to_string(),
            description: "A strange glitch in the matrix...".to_string(),
            image: "https://picsum.photos/500".to_string(),
        }
    }
}

/// Complete session state (read-only outside the session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub level: u32,
    /// Countdown seconds
    pub time_left: u32,
    pub phase: SessionPhase,
    pub is_paused: bool,
    /// Target for this round (None on the title screen)
    pub current_order: Option<DonutConfig>,
    /// Player selection
    pub current_donut: DonutConfig,
    pub prize: Option<Prize>,
    pub last_feedback: Option<Feedback>,
    pub streak: u32,
    pub multiplier: u32,
    /// Bonus seconds banked for the next round
    pub pending_time_bonus: u32,
    pub bonus_message: Option<SpeedBonus>,
    /// When the current order was shown (ms)
    pub order_start_time: f64,
    pub music_volume: f32,
    pub language: Language,
    pub inventory: Inventory,
    pub active_effects: ActiveEffects,
    /// When the current pause began (ms)
    pub paused_at: Option<f64>,
    /// Identifies the outstanding prize request
    pub prize_ticket: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            time_left: ROUND_SECONDS,
            phase: SessionPhase::Idle,
            is_paused: false,
            current_order: None,
            current_donut: DonutConfig::INITIAL,
            prize: None,
            last_feedback: None,
            streak: 0,
            multiplier: 1,
            pending_time_bonus: 0,
            bonus_message: None,
            order_start_time: 0.0,
            music_volume: DEFAULT_MUSIC_VOLUME,
            language: Language::default(),
            inventory: Inventory::default(),
            active_effects: ActiveEffects::default(),
            paused_at: None,
            prize_ticket: 0,
        }
    }
}

impl SessionState {
    /// Round in progress (countdown or level transition)
    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Playing | SessionPhase::LevelCleared
        )
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn is_loading_prize(&self) -> bool {
        self.phase == SessionPhase::LoadingPrize
    }

    /// The countdown should be running
    pub fn clock_running(&self) -> bool {
        self.phase == SessionPhase::Playing && !self.is_paused
    }

    /// Pause is meaningful in this phase
    pub fn can_pause(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Playing
                | SessionPhase::LevelCleared
                | SessionPhase::LoadingPrize
                | SessionPhase::Reveal
        )
    }
}

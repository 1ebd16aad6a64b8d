//! Donut Dash - A countdown donut-baking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game core (orders, scoring, session state machine)
//! - `platform`: Timers driving the countdown and delayed transitions
//! - `game`: Glue between the session, its timers and the host
//! - `prize`: Level-completion prizes from a generative-AI service
//! - `settings`: Persisted player preferences
//! - `i18n`: UI languages
//! - `audio`: Procedural sound effects and music (web only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod i18n;
pub mod platform;
pub mod prize;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use i18n::Language;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown for the first round (seconds)
    pub const ROUND_SECONDS: u32 = 60;
    /// Each level shortens the round by this much
    pub const ROUND_SECONDS_PER_LEVEL: u32 = 5;
    /// Rounds never get shorter than this (before bonuses)
    pub const MIN_ROUND_SECONDS: u32 = 20;
    /// Time lost on a wrong serve
    pub const MISS_PENALTY_SECS: u32 = 5;
    /// Tick sound plays at or below this many seconds
    pub const LOW_TIME_WARNING_SECS: u32 = 10;

    /// Serve faster than this for the big speed bonus
    pub const SPEED_BONUS_WINDOW_SECS: f64 = 5.0;
    /// Serve faster than this for the small speed bonus
    pub const FAST_BONUS_WINDOW_SECS: f64 = 8.0;

    /// Countdown tick interval (ms)
    pub const TICK_MS: f64 = 1000.0;
    /// Delay between a correct serve and the prize request (ms)
    pub const LEVEL_COMPLETE_DELAY_MS: f64 = 1000.0;
    /// Serve feedback banner lifetime (ms)
    pub const FEEDBACK_MS: f64 = 1000.0;
    /// Speed bonus banner lifetime (ms)
    pub const BONUS_MESSAGE_MS: f64 = 2000.0;

    /// Power-up durations (ms)
    pub const TIME_FREEZE_MS: f64 = 10_000.0;
    pub const DOUBLE_POINTS_MS: f64 = 15_000.0;
    pub const INSTANT_COOK_MS: f64 = 1_500.0;
    /// Each power-up a new session starts with
    pub const STARTING_POWERUPS: u32 = 1;

    /// Background music level
    pub const DEFAULT_MUSIC_VOLUME: f32 = 0.05;
}

//! Serve scoring
//!
//! Pure functions only: the session feeds in a snapshot of the round and
//! applies the returned outcome.

use serde::{Deserialize, Serialize};

use super::donut::DonutConfig;
use crate::consts::*;

/// Speed bonus earned by serving quickly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedBonus {
    /// Served in under 5 seconds
    Speed,
    /// Served in under 8 seconds
    Fast,
}

impl SpeedBonus {
    /// Classify the time taken (seconds) to serve an order
    pub fn for_time_taken(secs: f64) -> Option<Self> {
        if secs < SPEED_BONUS_WINDOW_SECS {
            Some(SpeedBonus::Speed)
        } else if secs < FAST_BONUS_WINDOW_SECS {
            Some(SpeedBonus::Fast)
        } else {
            None
        }
    }

    /// Seconds added to the next round
    pub fn seconds(&self) -> u32 {
        match self {
            SpeedBonus::Speed => 5,
            SpeedBonus::Fast => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedBonus::Speed => "speed",
            SpeedBonus::Fast => "fast",
        }
    }
}

/// Multiplier tier for a streak length
pub fn multiplier_for_streak(streak: u32) -> u32 {
    match streak {
        0..=2 => 1,
        3..=5 => 2,
        6..=9 => 3,
        _ => 4,
    }
}

/// Points for a correct serve before power-up doubling
pub fn order_score(level: u32, time_left: u32, multiplier: u32) -> u64 {
    let base = 10 * level as u64;
    let time_score = (time_left / 2) as u64;
    (base + time_score) * multiplier as u64
}

/// Countdown for a round at `level`, including any banked bonus seconds
pub fn round_time(level: u32, bonus_secs: u32) -> u32 {
    let base = ROUND_SECONDS.saturating_sub(level.saturating_mul(ROUND_SECONDS_PER_LEVEL));
    base.max(MIN_ROUND_SECONDS) + bonus_secs
}

/// Everything the scoring rules look at for one serve
#[derive(Debug, Clone, Copy)]
pub struct ServeContext<'a> {
    pub donut: &'a DonutConfig,
    pub order: &'a DonutConfig,
    pub level: u32,
    pub streak: u32,
    pub time_left: u32,
    /// When the current order was shown (ms)
    pub order_start_time: f64,
    /// Time of the serve (ms)
    pub now: f64,
    /// Double-points power-up active
    pub double_points: bool,
}

/// Result of scoring a serve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServeOutcome {
    Correct {
        points: u64,
        streak: u32,
        multiplier: u32,
        bonus: Option<SpeedBonus>,
    },
    Wrong {
        time_left: u32,
    },
}

impl ServeOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, ServeOutcome::Correct { .. })
    }
}

/// Score a serve.
///
/// A wrong serve only costs time; the clamp at zero never ends the game by
/// itself, the next countdown tick does.
pub fn score_serve(ctx: &ServeContext<'_>) -> ServeOutcome {
    if !ctx.donut.matches(ctx.order) {
        return ServeOutcome::Wrong {
            time_left: ctx.time_left.saturating_sub(MISS_PENALTY_SECS),
        };
    }

    let streak = ctx.streak + 1;
    let multiplier = multiplier_for_streak(streak);
    let time_taken = (ctx.now - ctx.order_start_time) / 1000.0;
    let bonus = SpeedBonus::for_time_taken(time_taken);

    let mut points = order_score(ctx.level, ctx.time_left, multiplier);
    if ctx.double_points {
        points *= 2;
    }

    ServeOutcome::Correct {
        points,
        streak,
        multiplier,
        bonus,
    }
}

//! Deterministic game core
//!
//! All gameplay rules live here. This module must stay pure and deterministic:
//! - Time comes in as explicit millisecond timestamps
//! - Seeded RNG only
//! - No timers, audio, network or platform dependencies

pub mod donut;
pub mod order;
pub mod scoring;
pub mod session;
pub mod state;

pub use donut::{DonutConfig, DonutPatch, DoughFlavor, Filling, Shape, Sprinkles, Topping};
pub use order::{OrderDice, generate_order};
pub use scoring::{
    ServeContext, ServeOutcome, SpeedBonus, multiplier_for_streak, order_score, round_time,
    score_serve,
};
pub use session::{Deferred, Session, SessionEffect, SessionEvent, SoundCue};
pub use state::{
    ActiveEffects, Feedback, Inventory, PowerupKind, Prize, SessionPhase, SessionState,
};

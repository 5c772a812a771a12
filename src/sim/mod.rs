//! Deterministic countdown module
//!
//! All game-flow logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick()`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Countdown, GameController, Phase, PhaseChange};

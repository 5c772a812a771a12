//! Tick Tack Boom - a pass-the-bomb party game
//!
//! Core modules:
//! - `sim`: Deterministic countdown state machine (phases, seeded RNG)
//! - `session`: Real-time driver (one tick per second, feedback, finish delay)
//! - `feedback`: Audio/haptic cue sink and its errors
//! - `ui`: Per-frame presentation of the current phase
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod feedback;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use feedback::{FeedbackError, FeedbackSink, Silent};
pub use session::Session;
pub use settings::Settings;
pub use sim::{GameController, Phase, PhaseChange};

/// Game configuration constants
pub mod consts {
    use std::ops::RangeInclusive;

    /// Shortest possible fuse (seconds)
    pub const COUNTDOWN_MIN_SECS: u32 = 20;
    /// Longest possible fuse (seconds)
    pub const COUNTDOWN_MAX_SECS: u32 = 45;
    /// Inclusive range the hidden countdown target is drawn from
    pub const COUNTDOWN_RANGE: RangeInclusive<u32> = COUNTDOWN_MIN_SECS..=COUNTDOWN_MAX_SECS;

    /// Real time between two countdown ticks (seconds)
    pub const TICK_INTERVAL: f32 = 1.0;
    /// Largest frame delta accepted by the session (tab switches, stalls).
    /// Never above `TICK_INTERVAL`, so one update issues at most one tick.
    pub const MAX_FRAME_DT: f32 = TICK_INTERVAL;

    /// Time the explosion screen stays up before returning to the title
    pub const FINISH_DELAY: f32 = 5.0;
    /// Length of the explosion vibration (seconds)
    pub const HAPTIC_DURATION: f32 = 1.0;

    /// Bomb bounce: one leg of the up/down motion (seconds)
    pub const BOUNCE_HALF_PERIOD: f32 = 0.25;
    /// Bomb bounce: vertical offset at either extreme (pixels)
    pub const BOUNCE_AMPLITUDE: f32 = 10.0;
    /// Background pulse: one leg of the blue/red fade (seconds)
    pub const PULSE_HALF_PERIOD: f32 = 1.0;

    /// Icon sizes (pixels)
    pub const TITLE_ICON_SIZE: f32 = 100.0;
    pub const STAGE_ICON_SIZE: f32 = 200.0;
}

/// Ease-in-out ping-pong between 0 and 1 with the given half period
#[inline]
pub fn ping_pong(t: f32, half_period: f32) -> f32 {
    use std::f32::consts::PI;
    if half_period <= 0.0 {
        return 0.0;
    }
    0.5 - 0.5 * (PI * t / half_period).cos()
}

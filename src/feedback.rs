//! Audio/haptic feedback sink
//!
//! Every cue is best-effort: errors are reported to the caller, which logs
//! them and carries on. Looping cues are scoped handles that stop on drop.

use thiserror::Error;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Looping "tick tack" while the fuse burns
    Tick,
    /// Explosion
    Blast,
}

/// Failure to produce a cue
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// No audio output could be opened
    #[error("audio output unavailable")]
    AudioUnavailable,

    /// Device cannot vibrate
    #[error("haptics not supported on this device")]
    HapticsUnsupported,

    /// Audio output exists but the cue could not be played
    #[error("failed to play {effect:?}: {reason}")]
    Playback { effect: SoundEffect, reason: String },

    /// Haptic engine refused the pattern
    #[error("haptic playback failed: {0}")]
    Haptic(String),
}

/// Audio/haptic cues fired by the session
pub trait FeedbackSink {
    /// Handle of a running tick loop; dropping it stops the sound
    type TickLoop;

    /// Start the looping tick sound for an active round
    fn start_ticking(&mut self) -> Result<Self::TickLoop, FeedbackError>;

    /// Play the explosion sound once
    fn play_blast(&mut self) -> Result<(), FeedbackError>;

    /// Vibrate for `duration` seconds
    fn vibrate(&mut self, duration: f32) -> Result<(), FeedbackError>;
}

/// Sink that produces no output
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl FeedbackSink for Silent {
    type TickLoop = ();

    fn start_ticking(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn play_blast(&mut self) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn vibrate(&mut self, _duration: f32) -> Result<(), FeedbackError> {
        Ok(())
    }
}

//! One-second countdown tick
//!
//! The only way time advances inside the controller.

use super::state::{GameController, Phase, PhaseChange};

impl<R> GameController<R> {
    /// Advance the countdown by one second
    ///
    /// No-op unless active. Returns the `Active -> Finished` change when the
    /// fuse runs out; the caller must stop its timer at that point.
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if self.phase != Phase::Active || !self.ticking {
            return None;
        }
        let target = self.target?;

        self.elapsed += 1;
        log::trace!("tick {}/{}", self.elapsed, target);

        if self.elapsed >= target {
            self.phase = Phase::Finished;
            self.ticking = false;
            return Some(PhaseChange::new(Phase::Active, Phase::Finished));
        }

        None
    }
}

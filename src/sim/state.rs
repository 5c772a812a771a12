//! Game state and core countdown types
//!
//! The controller is pure: no clocks, no I/O. Time only advances through
//! `tick()`, randomness only comes from the injected RNG.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::COUNTDOWN_RANGE;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Title screen, waiting for the player to start
    #[default]
    Idle,
    /// Fuse is burning, bomb is being passed around
    Active,
    /// Bomb went off
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Active => "Active",
            Phase::Finished => "Finished",
        }
    }
}

/// A transition performed by one of the controller operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

impl PhaseChange {
    pub fn new(from: Phase, to: Phase) -> Self {
        Self { from, to }
    }
}

/// Elapsed/target snapshot of a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub elapsed: u32,
    pub target: u32,
}

/// The countdown state machine
///
/// `Idle --start--> Active --tick (elapsed reaches target)--> Finished
/// --acknowledge_finish--> Idle`
#[derive(Debug, Clone)]
pub struct GameController<R = Pcg32> {
    pub(super) phase: Phase,
    /// Seconds counted in the current round
    pub(super) elapsed: u32,
    /// Fuse length of the current round, `None` while idle
    pub(super) target: Option<u32>,
    pub(super) ticking: bool,
    rng: R,
}

impl GameController<Pcg32> {
    /// Create an idle controller with a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameController<R> {
    /// Create an idle controller drawing targets from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed: 0,
            target: None,
            ticking: false,
            rng,
        }
    }

    /// Start a round (from any phase) with a freshly drawn fuse
    ///
    /// Calling this while already active restarts the round.
    pub fn start(&mut self) -> PhaseChange {
        let from = self.phase;
        let target = self.rng.random_range(COUNTDOWN_RANGE);

        if from == Phase::Active {
            log::debug!("Round restarted while active (new target {}s)", target);
        }

        self.target = Some(target);
        self.elapsed = 0;
        self.phase = Phase::Active;
        self.ticking = true;

        PhaseChange::new(from, Phase::Active)
    }

    /// Return to the title after the explosion; no-op unless finished
    pub fn acknowledge_finish(&mut self) -> Option<PhaseChange> {
        if self.phase != Phase::Finished {
            return None;
        }

        self.phase = Phase::Idle;
        self.elapsed = 0;
        self.target = None;
        self.ticking = false;

        Some(PhaseChange::new(Phase::Finished, Phase::Idle))
    }
}

impl<R> GameController<R> {
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    /// Whether the controller still wants ticks
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Current countdown, only while active
    pub fn countdown(&self) -> Option<Countdown> {
        match (self.phase, self.target) {
            (Phase::Active, Some(target)) => Some(Countdown {
                elapsed: self.elapsed,
                target,
            }),
            _ => None,
        }
    }
}

//! Real-time game session
//!
//! Owns the controller and turns frame deltas into one-second ticks using a
//! fixed-step accumulator. Side effects (tick loop, blast, vibration) happen
//! here, at the boundary, never inside the controller.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::feedback::FeedbackSink;
use crate::sim::{Countdown, GameController, Phase, PhaseChange};
use crate::ui::{self, Frame};

/// A running game: controller, timer source and feedback
pub struct Session<F: FeedbackSink, R = Pcg32> {
    controller: GameController<R>,
    feedback: F,
    /// Vibrate on explosion
    haptics: bool,
    /// Freeze screen animations
    reduced_motion: bool,
    /// Unspent time towards the next tick (seconds)
    accumulator: f32,
    /// Seconds since the current phase began
    phase_time: f32,
    /// Seconds left on the explosion screen
    finish_timer: Option<f32>,
    /// Tick sound; held only while active
    tick_loop: Option<F::TickLoop>,
}

impl<F: FeedbackSink> Session<F, Pcg32> {
    /// Create an idle session with a seeded controller
    pub fn new(seed: u64, feedback: F) -> Self {
        Self::with_controller(GameController::new(seed), feedback)
    }
}

impl<F: FeedbackSink, R: Rng> Session<F, R> {
    pub fn with_controller(controller: GameController<R>, feedback: F) -> Self {
        Self {
            controller,
            feedback,
            haptics: true,
            reduced_motion: false,
            accumulator: 0.0,
            phase_time: 0.0,
            finish_timer: None,
            tick_loop: None,
        }
    }

    /// Apply the feedback-related settings
    pub fn configure(&mut self, settings: &crate::Settings) {
        self.haptics = settings.haptics;
        self.reduced_motion = settings.reduced_motion;
    }

    /// Start (or restart) a round
    pub fn start(&mut self) -> PhaseChange {
        // Drop any previous loop before opening a new one
        self.tick_loop = None;

        let change = self.controller.start();
        self.accumulator = 0.0;
        self.phase_time = 0.0;
        self.finish_timer = None;

        match self.feedback.start_ticking() {
            Ok(handle) => self.tick_loop = Some(handle),
            Err(e) => log::warn!("Tick sound unavailable: {}", e),
        }

        log::info!("Round started ({} -> {})", change.from.as_str(), change.to.as_str());
        change
    }

    /// Advance real time by `dt` seconds
    ///
    /// Returns the phase change caused by this update, if any.
    pub fn update(&mut self, dt: f32) -> Option<PhaseChange> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.phase_time += dt;

        match self.controller.current_phase() {
            Phase::Idle => None,
            Phase::Active => {
                self.accumulator += dt;
                if self.accumulator < TICK_INTERVAL {
                    return None;
                }

                self.accumulator -= TICK_INTERVAL;
                let change = self.controller.tick();
                if change.is_some() {
                    self.explode();
                }
                change
            }
            Phase::Finished => {
                let remaining = self.finish_timer.unwrap_or(FINISH_DELAY) - dt;
                if remaining > 0.0 {
                    self.finish_timer = Some(remaining);
                    return None;
                }

                self.finish_timer = None;
                let change = self.controller.acknowledge_finish();
                if change.is_some() {
                    self.phase_time = 0.0;
                    log::info!("Back to title");
                }
                change
            }
        }
    }

    /// Enter the explosion screen: stop ticking, fire blast and vibration once
    fn explode(&mut self) {
        self.tick_loop = None;
        self.accumulator = 0.0;
        self.phase_time = 0.0;
        self.finish_timer = Some(FINISH_DELAY);

        log::info!("Boom! after {}s", self.controller.elapsed());

        if let Err(e) = self.feedback.play_blast() {
            log::warn!("Blast sound failed: {}", e);
        }
        if self.haptics {
            if let Err(e) = self.feedback.vibrate(HAPTIC_DURATION) {
                log::warn!("Vibration failed: {}", e);
            }
        }
    }
}

impl<F: FeedbackSink, R> Session<F, R> {
    pub fn phase(&self) -> Phase {
        self.controller.current_phase()
    }

    pub fn controller(&self) -> &GameController<R> {
        &self.controller
    }

    /// Hidden countdown, for hosts that want to show it anyway
    pub fn countdown(&self) -> Option<Countdown> {
        self.controller.countdown()
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Whether the tick sound is currently held
    pub fn is_ticking_audible(&self) -> bool {
        self.tick_loop.is_some()
    }

    /// Seconds since the current phase began
    pub fn phase_time(&self) -> f32 {
        self.phase_time
    }

    /// Render hook for the current state
    pub fn frame(&self) -> Frame {
        ui::frame(self.phase(), self.phase_time, self.reduced_motion)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::feedback::FeedbackError;
    use crate::ui::Screen;

    /// Sink recording every call; optionally failing all of them
    #[derive(Default)]
    struct Recorder {
        fail: bool,
        loops_started: u32,
        blasts: u32,
        vibrations: Vec<f32>,
        /// Number of tick loops currently alive
        live_loops: Rc<Cell<u32>>,
    }

    struct LoopGuard(Rc<Cell<u32>>);

    impl Drop for LoopGuard {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    impl FeedbackSink for Recorder {
        type TickLoop = LoopGuard;

        fn start_ticking(&mut self) -> Result<LoopGuard, FeedbackError> {
            if self.fail {
                return Err(FeedbackError::AudioUnavailable);
            }
            self.loops_started += 1;
            self.live_loops.set(self.live_loops.get() + 1);
            Ok(LoopGuard(self.live_loops.clone()))
        }

        fn play_blast(&mut self) -> Result<(), FeedbackError> {
            self.blasts += 1;
            if self.fail {
                return Err(FeedbackError::AudioUnavailable);
            }
            Ok(())
        }

        fn vibrate(&mut self, duration: f32) -> Result<(), FeedbackError> {
            self.vibrations.push(duration);
            if self.fail {
                return Err(FeedbackError::HapticsUnsupported);
            }
            Ok(())
        }
    }

    /// Feed whole seconds until the phase leaves Active
    fn run_until_finished<F: FeedbackSink>(session: &mut Session<F>) -> u32 {
        let mut seconds = 0;
        while session.phase() == Phase::Active {
            session.update(1.0);
            seconds += 1;
            assert!(seconds <= COUNTDOWN_MAX_SECS, "fuse never ran out");
        }
        seconds
    }

    #[test]
    fn test_idle_update_does_nothing() {
        let mut session = Session::new(1, Recorder::default());
        for _ in 0..100 {
            assert_eq!(session.update(1.0), None);
        }
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.feedback().loops_started, 0);
    }

    #[test]
    fn test_one_tick_per_second() {
        let mut session = Session::new(8, Recorder::default());
        session.start();

        // 60 frames of 1/60 s add up to one tick
        for _ in 0..59 {
            session.update(1.0 / 60.0);
        }
        assert_eq!(session.controller().elapsed(), 0);
        session.update(2.0 / 60.0);
        assert_eq!(session.controller().elapsed(), 1);
    }

    #[test]
    fn test_full_round() {
        let mut session = Session::new(2024, Recorder::default());
        session.start();
        assert!(session.is_ticking_audible());
        assert_eq!(session.feedback().live_loops.get(), 1);

        let target = session.countdown().unwrap().target;
        let seconds = run_until_finished(&mut session);
        assert_eq!(seconds, target);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.controller().elapsed(), target);

        // Tick loop released, blast and vibration fired once
        assert!(!session.is_ticking_audible());
        assert_eq!(session.feedback().live_loops.get(), 0);
        assert_eq!(session.feedback().blasts, 1);
        assert_eq!(session.feedback().vibrations, vec![HAPTIC_DURATION]);

        // Explosion screen holds for the finish delay
        for _ in 0..4 {
            assert_eq!(session.update(1.0), None);
            assert_eq!(session.phase(), Phase::Finished);
        }
        assert_eq!(
            session.update(1.0),
            Some(PhaseChange::new(Phase::Finished, Phase::Idle))
        );
        assert_eq!(session.frame().screen, Screen::Title);
        assert_eq!(session.feedback().blasts, 1);
    }

    #[test]
    fn test_failing_feedback_still_returns_to_title() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut session = Session::new(31337, recorder);
        session.start();
        assert!(!session.is_ticking_audible());

        run_until_finished(&mut session);
        assert_eq!(session.feedback().blasts, 1);
        assert_eq!(session.feedback().vibrations.len(), 1);

        for _ in 0..5 {
            session.update(1.0);
        }
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_haptics_disabled() {
        let mut session = Session::new(4, Recorder::default());
        session.configure(&crate::Settings {
            haptics: false,
            ..Default::default()
        });
        session.start();
        run_until_finished(&mut session);

        assert_eq!(session.feedback().blasts, 1);
        assert!(session.feedback().vibrations.is_empty());
    }

    #[test]
    fn test_large_frame_is_clamped() {
        let mut session = Session::new(9, Recorder::default());
        session.start();

        // A 30 s stall only counts as one frame of MAX_FRAME_DT
        session.update(30.0);
        assert_eq!(session.controller().elapsed(), 1);
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_restart_replaces_tick_loop() {
        let mut session = Session::new(10, Recorder::default());
        session.start();
        session.update(1.0);
        session.update(1.0);

        session.start();
        assert_eq!(session.controller().elapsed(), 0);
        assert_eq!(session.feedback().loops_started, 2);
        assert_eq!(session.feedback().live_loops.get(), 1);
    }

    #[test]
    fn test_frame_tracks_phase_time() {
        let mut session = Session::new(11, Recorder::default());
        session.update(0.5);
        session.start();
        assert_eq!(session.phase_time(), 0.0);
        assert_eq!(session.frame().screen, Screen::Countdown);

        session.update(0.25);
        assert!((session.phase_time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_leftover_time_carries_over() {
        let mut session = Session::new(13, Recorder::default());
        session.start();

        session.update(0.75);
        assert_eq!(session.controller().elapsed(), 0);
        // 1.5 s banked: one tick, 0.5 s left over
        session.update(0.75);
        assert_eq!(session.controller().elapsed(), 1);
        session.update(0.5);
        assert_eq!(session.controller().elapsed(), 2);

        // Never more than one tick per update
        for expected in 3..=5 {
            session.update(MAX_FRAME_DT + 5.0);
            assert_eq!(session.controller().elapsed(), expected);
        }
    }

    #[test]
    fn test_start_from_finished_cancels_return_to_title() {
        let mut session = Session::new(14, Recorder::default());
        session.start();
        run_until_finished(&mut session);
        session.update(1.0);
        session.update(1.0);
        assert_eq!(session.phase(), Phase::Finished);

        let change = session.start();
        assert_eq!(change, PhaseChange::new(Phase::Finished, Phase::Active));
        assert_eq!(session.controller().elapsed(), 0);
        assert!(session.is_ticking_audible());

        // The old finish delay must not send the new round to the title
        for _ in 0..10 {
            session.update(1.0);
            assert_ne!(session.phase(), Phase::Idle);
        }
        assert_eq!(session.controller().elapsed(), 10);
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_finish_delay_at_sixty_fps() {
        let mut session = Session::new(15, Recorder::default());
        session.start();
        run_until_finished(&mut session);

        let mut frames = 0;
        while session.phase() == Phase::Finished {
            session.update(1.0 / 60.0);
            frames += 1;
            assert!(frames <= 301, "explosion screen never cleared");
        }
        assert!((299..=301).contains(&frames));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_silent_sink_round() {
        let mut session = Session::new(12, crate::Silent);
        session.start();
        run_until_finished(&mut session);
        assert_eq!(session.frame().screen, Screen::Explosion);
    }
}

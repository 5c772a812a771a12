//! Tick Tack Boom entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use tick_tack_boom::audio::WebFeedback;
    use tick_tack_boom::sim::Phase;
    use tick_tack_boom::ui::{Frame, Screen};
    use tick_tack_boom::{Session, Settings};

    const SCREENS: [Screen; 3] = [Screen::Title, Screen::Countdown, Screen::Explosion];

    /// Game instance holding all state
    struct Game {
        session: Session<WebFeedback>,
        last_time: f64,
        /// Screen currently visible in the DOM
        shown: Option<Screen>,
    }

    impl Game {
        fn new(seed: u64, settings: &Settings) -> Self {
            let mut session = Session::new(seed, WebFeedback::new(settings));
            session.configure(settings);
            Self {
                session,
                last_time: 0.0,
                shown: None,
            }
        }

        /// Start a round from the title screen
        fn start(&mut self) {
            if self.session.phase() != Phase::Idle {
                return;
            }
            self.session.feedback().resume();
            self.session.start();
        }

        /// Advance the session by the frame delta
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            if let Some(change) = self.session.update(dt) {
                log::info!("{} -> {}", change.from.as_str(), change.to.as_str());
            }
        }

        /// Apply the current frame to the DOM
        fn render(&mut self, document: &Document) {
            let frame = self.session.frame();

            if self.shown != Some(frame.screen) {
                for screen in SCREENS {
                    if let Some(el) = document.get_element_by_id(screen.element_id()) {
                        let class = if screen == frame.screen { "screen" } else { "screen hidden" };
                        let _ = el.set_attribute("class", class);
                    }
                }
                self.shown = Some(frame.screen);
            }

            if let Some(stage) = document.get_element_by_id("stage") {
                let _ = stage.set_attribute(
                    "style",
                    &format!("background-color: {};", frame.background.to_css()),
                );
            }

            apply_icon(document, &frame);
        }
    }

    /// Size and offset the icon of the visible screen
    fn apply_icon(document: &Document, frame: &Frame) {
        let id = match frame.screen {
            Screen::Title => "icon-title",
            Screen::Countdown => "icon-bomb",
            Screen::Explosion => "icon-explosion",
        };
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute(
                "style",
                &format!(
                    "font-size: {}px; transform: translateY({:.1}px);",
                    frame.icon_size, frame.icon_offset_y
                ),
            );
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Tick Tack Boom starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, &settings)));

        log::info!("Game initialized with seed: {}", seed);

        setup_start_button(&document, game.clone());
        setup_keyboard(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Tick Tack Boom running!");
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("start-btn") else {
            log::error!("Missing #start-btn");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().start();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                " " | "Enter" => game.borrow_mut().start(),
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::io::{self, BufRead, Write};
    use std::sync::mpsc::{self, Receiver, TryRecvError};
    use std::thread;
    use std::time::{Duration, Instant};

    use tick_tack_boom::consts::BOUNCE_AMPLITUDE;
    use tick_tack_boom::feedback::{FeedbackError, FeedbackSink, SoundEffect};
    use tick_tack_boom::sim::Phase;
    use tick_tack_boom::ui::{Frame, Screen};
    use tick_tack_boom::{Session, Settings};

    /// Terminal redraw period (20 Hz)
    const FRAME_TIME: Duration = Duration::from_millis(50);
    /// Columns the bomb travels while bouncing
    const BOUNCE_COLUMNS: f32 = 6.0;

    enum Command {
        Start,
        Quit,
    }

    /// Feedback through the terminal: bell for the blast, no haptics
    #[derive(Default)]
    struct TerminalFeedback;

    /// Tick loop marker; the ticking itself is drawn in the status line
    struct TerminalTickLoop;

    impl Drop for TerminalTickLoop {
        fn drop(&mut self) {
            log::debug!("Tick loop stopped");
        }
    }

    impl FeedbackSink for TerminalFeedback {
        type TickLoop = TerminalTickLoop;

        fn start_ticking(&mut self) -> Result<TerminalTickLoop, FeedbackError> {
            log::debug!("Tick loop started");
            Ok(TerminalTickLoop)
        }

        fn play_blast(&mut self) -> Result<(), FeedbackError> {
            let mut out = io::stdout();
            out.write_all(b"\x07")
                .and_then(|_| out.flush())
                .map_err(|e| FeedbackError::Playback {
                    effect: SoundEffect::Blast,
                    reason: e.to_string(),
                })
        }

        fn vibrate(&mut self, _duration: f32) -> Result<(), FeedbackError> {
            Err(FeedbackError::HapticsUnsupported)
        }
    }

    /// Read commands from stdin on a background thread
    fn spawn_input() -> Receiver<Command> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let command = match line.trim() {
                    "q" | "quit" => Command::Quit,
                    _ => Command::Start,
                };
                let quit = matches!(command, Command::Quit);
                if tx.send(command).is_err() || quit {
                    return;
                }
            }
            let _ = tx.send(Command::Quit);
        });
        rx
    }

    /// Single status line for the current frame
    fn status_line(frame: &Frame, phase_time: f32) -> String {
        match frame.screen {
            Screen::Title => format!(
                "🔥 {}   [Enter] {}   [q] Quit",
                frame.headline.unwrap_or_default(),
                frame.button.unwrap_or_default()
            ),
            Screen::Countdown => {
                let travel = (BOUNCE_AMPLITUDE - frame.icon_offset_y) / (2.0 * BOUNCE_AMPLITUDE);
                let pad = (travel * BOUNCE_COLUMNS).round() as usize;
                let sound = if (phase_time * 2.0) as u32 % 2 == 0 { "tick" } else { "tack" };
                format!("{}💣 {}", " ".repeat(pad), sound)
            }
            Screen::Explosion => format!("💥 {} 💥", frame.headline.unwrap_or_default()),
        }
    }

    fn draw(out: &mut impl Write, line: &str) -> io::Result<()> {
        write!(out, "\r\x1b[2K{}", line)?;
        out.flush()
    }

    pub fn run(settings: &Settings) -> io::Result<()> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut session = Session::new(seed, TerminalFeedback);
        session.configure(settings);
        log::info!("Game initialized with seed: {}", seed);

        let commands = spawn_input();
        let mut out = io::stdout();
        let mut last = Instant::now();

        loop {
            match commands.try_recv() {
                Ok(Command::Start) if session.phase() == Phase::Idle => {
                    session.start();
                }
                Ok(Command::Start) | Err(TryRecvError::Empty) => {}
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => break,
            }

            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            if let Some(change) = session.update(dt) {
                log::info!("{} -> {}", change.from.as_str(), change.to.as_str());
            }

            draw(&mut out, &status_line(&session.frame(), session.phase_time()))?;
            thread::sleep(FRAME_TIME);
        }

        writeln!(out)?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tick_tack_boom::ui;

        #[test]
        fn test_title_line() {
            let line = status_line(&ui::frame(Phase::Idle, 0.0, false), 0.0);
            assert!(line.contains("Tick Tack Boom"));
            assert!(line.contains("Start Game"));
        }

        #[test]
        fn test_countdown_line_alternates() {
            let tick = status_line(&ui::frame(Phase::Active, 0.1, false), 0.1);
            let tack = status_line(&ui::frame(Phase::Active, 0.6, false), 0.6);
            assert!(tick.ends_with("tick"));
            assert!(tack.ends_with("tack"));
            assert!(!tick.contains(char::is_numeric));
        }

        #[test]
        fn test_explosion_line() {
            let line = status_line(&ui::frame(Phase::Finished, 0.0, false), 0.0);
            assert!(line.contains("Boom!"));
        }

        #[test]
        fn test_terminal_has_no_haptics() {
            let mut feedback = TerminalFeedback;
            assert!(matches!(
                feedback.vibrate(1.0),
                Err(FeedbackError::HapticsUnsupported)
            ));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tick Tack Boom (native) starting...");

    let settings = tick_tack_boom::Settings::load();
    if let Err(e) = native_game::run(&settings) {
        log::error!("Terminal error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

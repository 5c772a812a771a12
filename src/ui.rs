//! Per-frame presentation of the current phase
//!
//! Hosts turn a `Frame` into DOM styles or terminal text; nothing here
//! touches a platform API.

use crate::consts::*;
use crate::ping_pong;
use crate::sim::Phase;

/// Which screen to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Countdown,
    Explosion,
}

impl Screen {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle => Screen::Title,
            Phase::Active => Screen::Countdown,
            Phase::Finished => Screen::Explosion,
        }
    }

    /// DOM id of the screen container
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Title => "screen-title",
            Screen::Countdown => "screen-countdown",
            Screen::Explosion => "screen-explosion",
        }
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(0, 122, 255);
    pub const RED: Rgb = Rgb(255, 59, 48);

    /// Linear blend, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    pub headline: Option<&'static str>,
    /// Label of the only button, if the screen has one
    pub button: Option<&'static str>,
    pub icon_size: f32,
    /// Vertical icon offset in pixels (negative is up)
    pub icon_offset_y: f32,
    pub background: Rgb,
}

/// Build the frame for `phase`, `phase_time` seconds after entering it
pub fn frame(phase: Phase, phase_time: f32, reduced_motion: bool) -> Frame {
    let screen = Screen::for_phase(phase);
    match screen {
        Screen::Title => Frame {
            screen,
            headline: Some("Tick Tack Boom"),
            button: Some("Start Game"),
            icon_size: TITLE_ICON_SIZE,
            icon_offset_y: 0.0,
            background: Rgb::WHITE,
        },
        Screen::Countdown => {
            // Bounce starts at the bottom and eases up, background starts blue
            let (offset, pulse) = if reduced_motion {
                (0.0, 0.0)
            } else {
                let bounce = ping_pong(phase_time, BOUNCE_HALF_PERIOD);
                (
                    BOUNCE_AMPLITUDE - 2.0 * BOUNCE_AMPLITUDE * bounce,
                    ping_pong(phase_time, PULSE_HALF_PERIOD),
                )
            };
            Frame {
                screen,
                headline: None,
                button: None,
                icon_size: STAGE_ICON_SIZE,
                icon_offset_y: offset,
                background: Rgb::BLUE.lerp(Rgb::RED, pulse),
            }
        }
        Screen::Explosion => Frame {
            screen,
            headline: Some("Boom!"),
            button: None,
            icon_size: STAGE_ICON_SIZE,
            icon_offset_y: 0.0,
            background: Rgb::RED,
        },
    }
}

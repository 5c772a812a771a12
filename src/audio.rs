//! Browser feedback using the Web Audio API and `navigator.vibrate`
//!
//! Procedurally generated sound effects - no external files needed!

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::{FeedbackError, FeedbackSink, SoundEffect};
use crate::settings::Settings;

/// Milliseconds between "tick" and "tack"
const TICK_PERIOD_MS: i32 = 500;

/// Feedback manager for the browser host
pub struct WebFeedback {
    ctx: Option<Rc<AudioContext>>,
    volume: f32,
}

impl WebFeedback {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok().map(Rc::new);
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn context(&self) -> Result<Rc<AudioContext>, FeedbackError> {
        let ctx = self.ctx.clone().ok_or(FeedbackError::AudioUnavailable)?;
        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Ok(ctx)
    }
}

/// Running tick loop; clears its interval when dropped
pub struct WebTickLoop {
    interval_id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Drop for WebTickLoop {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.interval_id);
        }
    }
}

impl FeedbackSink for WebFeedback {
    type TickLoop = WebTickLoop;

    fn start_ticking(&mut self) -> Result<WebTickLoop, FeedbackError> {
        let ctx = self.context()?;
        let vol = self.volume;
        let window = web_sys::window().ok_or(FeedbackError::AudioUnavailable)?;

        let mut tack = false;
        let closure = Closure::<dyn FnMut()>::new(move || {
            play_tick(&ctx, vol, tack);
            tack = !tack;
        });

        let interval_id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TICK_PERIOD_MS,
            )
            .map_err(|e| FeedbackError::Playback {
                effect: SoundEffect::Tick,
                reason: format!("{:?}", e),
            })?;

        Ok(WebTickLoop {
            interval_id,
            _closure: closure,
        })
    }

    fn play_blast(&mut self) -> Result<(), FeedbackError> {
        let ctx = self.context()?;
        play_blast(&ctx, self.volume).ok_or_else(|| FeedbackError::Playback {
            effect: SoundEffect::Blast,
            reason: "could not build oscillator graph".to_string(),
        })
    }

    fn vibrate(&mut self, duration: f32) -> Result<(), FeedbackError> {
        let window = web_sys::window().ok_or(FeedbackError::HapticsUnsupported)?;
        let ms = (duration * 1000.0).round() as u32;
        if window.navigator().vibrate_with_duration(ms) {
            Ok(())
        } else {
            Err(FeedbackError::HapticsUnsupported)
        }
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Clock tick - short wooden click, "tack" pitched lower
fn play_tick(ctx: &AudioContext, vol: f32, tack: bool) {
    if vol <= 0.0 {
        return;
    }
    let freq = if tack { 1400.0 } else { 1900.0 };
    let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.25, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.03)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.04).ok();
}

/// Explosion - long descending rumble with a crack on top
fn play_blast(ctx: &AudioContext, vol: f32) -> Option<()> {
    if vol <= 0.0 {
        return Some(());
    }
    let t = ctx.current_time();

    let (osc, gain) = create_osc(ctx, 120.0, OscillatorType::Sawtooth)?;
    gain.gain().set_value_at_time(vol * 0.6, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 1.5)
        .ok();
    osc.frequency().set_value_at_time(120.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(25.0, t + 1.5)
        .ok();
    osc.start().ok();
    osc.stop_with_when(t + 1.6).ok();

    // Sub-bass thump
    if let Some((osc, gain)) = create_osc(ctx, 55.0, OscillatorType::Sine) {
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.7).ok();
    }

    // High frequency crack
    if let Some((osc, gain)) = create_osc(ctx, 1500.0, OscillatorType::Square) {
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(1500.0, t).ok();
        osc.frequency().set_value_at_time(3200.0, t + 0.02).ok();
        osc.frequency().set_value_at_time(900.0, t + 0.05).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    Some(())
}

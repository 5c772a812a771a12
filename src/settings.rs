//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web, in a JSON file named by
//! `TICK_TACK_BOOM_SETTINGS` on native.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all sounds
    pub muted: bool,

    // === Haptics ===
    /// Vibrate when the bomb explodes
    pub haptics: bool,

    // === Accessibility ===
    /// Freeze the bounce and background pulse
    pub reduced_motion: bool,

    // === Debug ===
    /// Fixed RNG seed (random per launch when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics: true,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "tick_tack_boom_settings";

    /// Environment variable naming the settings file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    const PATH_ENV: &'static str = "TICK_TACK_BOOM_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    ///
    /// Defaults are written back on first run so the stored copy can be edited.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = &storage {
            match storage.get_item(Self::STORAGE_KEY) {
                Ok(Some(json)) => match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring invalid stored settings: {}", e),
                },
                Ok(None) => {
                    let settings = Self::default();
                    settings.save();
                    return settings;
                }
                Err(_) => {}
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `TICK_TACK_BOOM_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var_os(Self::PATH_ENV) {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, falling back to defaults
    ///
    /// A missing file is created with the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                match settings.save_to(path) {
                    Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                    Err(e) => log::warn!("Cannot write settings {}: {}", path.display(), e),
                }
                return settings;
            }
            Err(e) => {
                log::warn!("Cannot read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as JSON to `path`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

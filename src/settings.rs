//! User settings
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to defaults so
//! older saved settings keep loading.

use serde::{Deserialize, Serialize};

use crate::scene::CameraMode;

/// Viewer settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Logical canvas width (CSS pixels)
    pub canvas_width: u32,
    /// Logical canvas height (CSS pixels)
    pub canvas_height: u32,

    // === HUD ===
    /// Show the FPS counter
    pub show_stats: bool,

    // === Camera ===
    /// Camera framing at startup
    pub camera_mode: CameraMode,
    /// Allow mouse-wheel zoom
    pub enable_zoom: bool,
    /// Orbit rotation per dragged pixel (radians)
    pub orbit_sensitivity: f32,
    /// Distance change per wheel unit (fraction)
    pub zoom_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 1360,
            canvas_height: 700,

            show_stats: true,

            camera_mode: CameraMode::Side,
            enable_zoom: true,
            orbit_sensitivity: 0.005,
            zoom_speed: 0.001,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "box_walker_settings";

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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

        if let (Some(storage), Some(json)) = (storage, self.to_json()) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

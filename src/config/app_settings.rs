//! General application settings (`app_settings.yml`)
//!
//! ```text
//! general_settings:
//!   display_name: Application Template
//!   long_startup_process: false
//!   target_fps: 30
//!   window:
//!     width: 800
//!     height: 600
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::constants::config::{APP_SETTINGS_FILE, GENERAL_SECTION, WINDOW_SECTION};
use crate::constants::{defaults, validation};
use crate::serializer::{self, Mode, Session};

/// Window geometry used when the dashboard starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: defaults::WINDOW_WIDTH,
            height: defaults::WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSettings {
    /// Window title
    pub display_name: String,
    /// Run initialization on a background thread behind a splash UI
    pub long_startup_process: bool,
    pub target_fps: u16,
    pub window: WindowSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            display_name: defaults::DISPLAY_NAME.to_string(),
            long_startup_process: false,
            target_fps: defaults::TARGET_FPS,
            window: WindowSettings::default(),
        }
    }
}

impl AppSettings {
    /// Load from `dir`. Missing file, section or keys keep their defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut settings = Self::default();
        let mut session = Session::init(dir, APP_SETTINGS_FILE, GENERAL_SECTION, Mode::Load)
            .with_context(|| format!("Failed to open app settings in {}", dir.display()))?;
        if !session.section_found() {
            info!(path = %session.path().display(), "No general settings stored yet, using defaults");
        }
        settings
            .describe(&mut session)
            .context("Failed to read app settings")?;
        session.shutdown()?;

        settings.validate_and_clamp();
        Ok(settings)
    }

    /// Write every setting to `dir`, keeping unrelated content of the file.
    /// Values are clamped the same way `load` clamps them.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let mut copy = self.clone();
        copy.validate_and_clamp();
        let mut session = Session::init(dir, APP_SETTINGS_FILE, GENERAL_SECTION, Mode::Save)
            .with_context(|| format!("Failed to open app settings in {}", dir.display()))?;
        copy.describe(&mut session)
            .context("Failed to store app settings")?;
        session
            .shutdown()
            .with_context(|| format!("Failed to write {}", session.path().display()))?;
        info!(path = %session.path().display(), "Saved app settings");
        Ok(())
    }

    /// Layout of the settings file, shared by load and save
    fn describe(&mut self, session: &mut Session) -> serializer::Result<()> {
        session.entry_str(
            "display_name",
            &mut self.display_name,
            validation::MAX_DISPLAY_NAME_LEN,
        )?;
        session.entry("long_startup_process", &mut self.long_startup_process)?;
        session.entry("target_fps", &mut self.target_fps)?;

        session.subsection_begin(WINDOW_SECTION)?;
        session.entry("width", &mut self.window.width)?;
        session.entry("height", &mut self.window.height)?;
        session.subsection_end()
    }

    /// Clamp loaded values to usable ranges
    fn validate_and_clamp(&mut self) {
        use validation::*;

        if self.display_name.trim().is_empty() {
            warn!(using = defaults::DISPLAY_NAME, "display_name is empty, using default");
            self.display_name = defaults::DISPLAY_NAME.to_string();
        } else if self.display_name.trim().len() != self.display_name.len() {
            self.display_name = self.display_name.trim().to_string();
        }

        if self.target_fps < MIN_TARGET_FPS {
            warn!(target_fps = self.target_fps, min = MIN_TARGET_FPS, "target_fps below minimum, clamping");
            self.target_fps = MIN_TARGET_FPS;
        } else if self.target_fps > MAX_TARGET_FPS {
            warn!(target_fps = self.target_fps, max = MAX_TARGET_FPS, "target_fps exceeds maximum, clamping");
            self.target_fps = MAX_TARGET_FPS;
        }

        let window = &mut self.window;
        for (name, value) in [("width", &mut window.width), ("height", &mut window.height)] {
            if *value < MIN_WINDOW_DIMENSION {
                warn!(dimension = name, value = *value, min = MIN_WINDOW_DIMENSION, "window dimension below minimum, clamping");
                *value = MIN_WINDOW_DIMENSION;
            } else if *value > MAX_WINDOW_DIMENSION {
                warn!(dimension = name, value = *value, max = MAX_WINDOW_DIMENSION, "window dimension exceeds maximum, clamping");
                *value = MAX_WINDOW_DIMENSION;
            }
        }
    }

    /// Seconds per frame at the configured rate
    pub fn frame_duration_secs(&self) -> f32 {
        1.0 / f32::from(self.target_fps.max(1))
    }
}

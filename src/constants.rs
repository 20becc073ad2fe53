//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Section-scoped serializer constants
pub mod serializer {
    /// Section names must be strictly shorter than this (in bytes)
    pub const MAX_SECTION_NAME_LEN: usize = 128;

    /// Initial slot count of the header stack (grows geometrically)
    pub const HEADER_STACK_INITIAL_CAPACITY: usize = 2;

    /// Indentation written for one nesting level
    pub const INDENT_UNIT: &str = "  ";

    /// Marker for comment lines, ignored by every structural scan
    pub const COMMENT_PREFIX: char = '#';
}

/// Config file locations
pub mod config {
    /// Directory name under the platform config dir
    pub const APP_DIR: &str = "vn-dashboard";

    /// Directory name next to the executable
    pub const EXECUTABLE_SUBDIR: &str = "config";

    /// Environment variable overriding the config directory
    pub const CONFIG_DIR_ENV: &str = "VN_DASHBOARD_CONFIG_DIR";

    /// File holding the general application settings
    pub const APP_SETTINGS_FILE: &str = "app_settings.yml";

    /// Root section of the application settings file
    pub const GENERAL_SECTION: &str = "general_settings";

    /// Subsection holding the window geometry
    pub const WINDOW_SECTION: &str = "window";
}

/// Fallback values used when the settings file lacks a key
pub mod defaults {
    /// Window title used when none is configured
    pub const DISPLAY_NAME: &str = "Application Template";

    pub const WINDOW_WIDTH: u32 = 800;

    pub const WINDOW_HEIGHT: u32 = 600;

    pub const TARGET_FPS: u16 = 30;
}

/// Ranges enforced after loading settings
pub mod validation {
    pub const MIN_WINDOW_DIMENSION: u32 = 200;

    pub const MAX_WINDOW_DIMENSION: u32 = 8192;

    pub const MIN_TARGET_FPS: u16 = 1;

    pub const MAX_TARGET_FPS: u16 = 240;

    /// Longest accepted window title (bytes)
    pub const MAX_DISPLAY_NAME_LEN: usize = 256;
}

//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used
//! throughout the customization core, providing a single source of truth
//! for constant values.

/// Tile rail constants
pub mod rails {
    /// Maximum number of tile slots per rail
    pub const MAX_TILES_PER_SIDE: usize = 6;

    /// Forward-compat marker written into every persisted tile document
    pub const CONFIG_VERSION: u32 = 1;
}

/// Responsive breakpoint thresholds (CSS pixels)
pub mod breakpoints {
    /// Widths at or below this classify as Mobile
    pub const MOBILE_MAX_WIDTH: u32 = 768;

    /// Widths at or below this (and above mobile) classify as Tablet
    pub const TABLET_MAX_WIDTH: u32 = 1024;
}

/// Local key-value store keys
pub mod storage {
    /// Key holding the serialized tile config document
    pub const TILE_CONFIG_KEY: &str = "powerflow-dash.tiles";

    /// Prefix for per-breakpoint layout snapshot keys
    /// (full key is prefix + breakpoint name, e.g. "...layout.mobile")
    pub const LAYOUT_KEY_PREFIX: &str = "powerflow-dash.layout.";

    /// Directory under the user config dir used by the file-backed store
    pub const APP_DIR: &str = "powerflow-dash";
}

/// Debounce windows
pub mod debounce {
    use std::time::Duration;

    /// Quiet window before a mutated tile config is pushed to the remote store
    pub const REMOTE_SYNC: Duration = Duration::from_millis(2000);

    /// Quiet window before a viewport resize is re-evaluated
    pub const RESIZE: Duration = Duration::from_millis(300);
}

/// Resize noise filtering
pub mod resize {
    /// Minimum width delta (px) considered a genuine resize
    pub const WIDTH_THRESHOLD: u32 = 24;

    /// Minimum height delta (px) considered a genuine resize
    /// Much larger than the width threshold: mobile browser chrome
    /// showing/hiding produces spurious height-only resizes
    pub const HEIGHT_THRESHOLD: u32 = 180;
}

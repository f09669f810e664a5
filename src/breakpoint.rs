//! Responsive breakpoint classification
//!
//! A breakpoint is a coarse device-class bucket derived from viewport
//! width. It is never persisted as data; its name is the partition key
//! under which per-breakpoint layouts are stored.

use serde::{Deserialize, Serialize};

use crate::constants::breakpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// Classify a viewport width. Pure, no side effects.
    pub fn classify(width: u32) -> Self {
        if width <= breakpoints::MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if width <= breakpoints::TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    /// Stable name used as the layout storage-key suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

//! Unit controller configuration with documented constants
//!
//! All timing and placement numbers live here so the sequencer never
//! carries magic literals. Defaults reproduce the reference visual timing.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::Result;

/// What a newer `speak` does to hide timers scheduled by earlier calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakHidePolicy {
    /// Every hide timer fires on its own schedule, even if the text it was
    /// scheduled for has since been replaced.
    #[default]
    Independent,
    /// Only the hide timer of the most recent `speak` may hide the overlay.
    Supersede,
}

/// Configuration for a battle unit's sequencer and overlay placement
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    // === TIMING ===
    /// How long a move keeps the walk clip before settling to idle (ms)
    ///
    /// The completion signal of `move_by` resolves when this elapses.
    pub walk_delay_ms: u64,

    /// Delay before a `speak` completion resolves (ms)
    ///
    /// This is what unblocks the turn driver. It is deliberately much shorter
    /// than `speak_hide_delay_ms` so several lines can be read in sequence.
    pub speak_ack_delay_ms: u64,

    /// Delay before the speech overlay hides again (ms)
    pub speak_hide_delay_ms: u64,

    /// Handling of overlapping speech hide timers
    pub hide_policy: SpeakHidePolicy,

    // === PLACEMENT ===
    /// Horizontal pixel offset added to the hex geometry's left edge
    pub render_offset_x: f32,

    /// Vertical pixel offset added to the hex geometry's top edge
    pub render_offset_y: f32,

    /// Magnitude of the horizontal offset for id and speech labels
    ///
    /// The sign comes from the unit's side: positive for left, negative for right.
    pub label_offset_x: f32,

    // === STATE ===
    /// Health every unit starts with
    pub default_health: f32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            walk_delay_ms: 300,
            speak_ack_delay_ms: 300,
            speak_hide_delay_ms: 2000,
            hide_policy: SpeakHidePolicy::Independent,
            render_offset_x: -32.0,
            render_offset_y: 8.0,
            label_offset_x: 10.0,
            default_health: 100.0,
        }
    }
}

impl UnitConfig {
    pub fn walk_delay(&self) -> Duration {
        Duration::from_millis(self.walk_delay_ms)
    }

    pub fn speak_ack_delay(&self) -> Duration {
        Duration::from_millis(self.speak_ack_delay_ms)
    }

    pub fn speak_hide_delay(&self) -> Duration {
        Duration::from_millis(self.speak_hide_delay_ms)
    }

    /// Parse a config from TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

//! Tunable thresholds and timings for the swipe deck.
//!
//! Units are abstract layout units (points on a phone) and milliseconds.
//! Every field has a default, so a partial TOML table is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds, animation timings and feed sizing for a swipe deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Horizontal displacement that commits a swipe on release (default: 120).
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
    /// Horizontal release velocity in units/ms that commits a swipe (default: 0.3).
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
    /// Displacement at which the live like/dislike intent appears (default: 20).
    #[serde(default = "default_intent_threshold")]
    pub intent_threshold: f64,
    /// Displacement at which the card reaches full rotation (default: 200).
    #[serde(default = "default_rotation_range")]
    pub rotation_range: f64,
    /// Card rotation in degrees at `rotation_range` (default: 30).
    #[serde(default = "default_max_rotation_deg")]
    pub max_rotation_deg: f64,
    /// Width of the viewport the card leaves (default: 390).
    #[serde(default = "default_screen_width")]
    pub screen_width: f64,
    /// Extra distance beyond the screen edge for the exit target (default: 140).
    #[serde(default = "default_exit_margin")]
    pub exit_margin: f64,
    /// Downward drift applied during the exit animation (default: 20).
    #[serde(default = "default_exit_drift")]
    pub exit_drift: f64,
    /// Duration of the gesture exit animation in ms (default: 260).
    #[serde(default = "default_exit_duration_ms")]
    pub exit_duration_ms: u64,
    /// Duration of the springback to rest in ms (default: 300).
    #[serde(default = "default_springback_duration_ms")]
    pub springback_duration_ms: u64,
    /// Spring phase of the button pop animation in ms (default: 250).
    #[serde(default = "default_pop_spring_ms")]
    pub pop_spring_ms: u64,
    /// Settle phase of the button pop animation in ms (default: 200).
    #[serde(default = "default_pop_settle_ms")]
    pub pop_settle_ms: u64,
    /// Delay between swipe completion and re-enabling feed sync, in ms (default: 350).
    #[serde(default = "default_release_delay_ms")]
    pub release_delay_ms: u64,
    /// Number of upcoming profiles whose primary photo is prefetched (default: 5).
    #[serde(default = "default_prefetch_window")]
    pub prefetch_window: usize,
    /// Feed page size (default: 10).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Deck size at or below which the next page is requested (default: 2).
    #[serde(default = "default_low_water_mark")]
    pub low_water_mark: usize,
}

fn default_distance_threshold() -> f64 {
    120.0
}

fn default_velocity_threshold() -> f64 {
    0.3
}

fn default_intent_threshold() -> f64 {
    20.0
}

fn default_rotation_range() -> f64 {
    200.0
}

fn default_max_rotation_deg() -> f64 {
    30.0
}

fn default_screen_width() -> f64 {
    390.0
}

fn default_exit_margin() -> f64 {
    140.0
}

fn default_exit_drift() -> f64 {
    20.0
}

fn default_exit_duration_ms() -> u64 {
    260
}

fn default_springback_duration_ms() -> u64 {
    300
}

fn default_pop_spring_ms() -> u64 {
    250
}

fn default_pop_settle_ms() -> u64 {
    200
}

fn default_release_delay_ms() -> u64 {
    350
}

fn default_prefetch_window() -> usize {
    5
}

fn default_page_size() -> u32 {
    10
}

fn default_low_water_mark() -> usize {
    2
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            velocity_threshold: default_velocity_threshold(),
            intent_threshold: default_intent_threshold(),
            rotation_range: default_rotation_range(),
            max_rotation_deg: default_max_rotation_deg(),
            screen_width: default_screen_width(),
            exit_margin: default_exit_margin(),
            exit_drift: default_exit_drift(),
            exit_duration_ms: default_exit_duration_ms(),
            springback_duration_ms: default_springback_duration_ms(),
            pop_spring_ms: default_pop_spring_ms(),
            pop_settle_ms: default_pop_settle_ms(),
            release_delay_ms: default_release_delay_ms(),
            prefetch_window: default_prefetch_window(),
            page_size: default_page_size(),
            low_water_mark: default_low_water_mark(),
        }
    }
}

impl SwipeConfig {
    /// Gesture exit animation duration.
    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    /// Springback animation duration.
    pub fn springback_duration(&self) -> Duration {
        Duration::from_millis(self.springback_duration_ms)
    }

    /// Total button pop animation duration (spring + settle).
    pub fn pop_duration(&self) -> Duration {
        Duration::from_millis(self.pop_spring_ms + self.pop_settle_ms)
    }

    /// Delay before feed sync is re-enabled after a swipe.
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

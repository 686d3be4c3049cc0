// src/visualization/mod.rs

pub mod plotter;
pub mod window;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VisualizationConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// How often the feed thread pushes a batch.
    pub feed_interval_ms: u64,
    /// Hover readout next to the guide line.
    pub show_tooltip: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            title: "Telemetry".to_string(),
            window_width: 900,
            window_height: 360,
            feed_interval_ms: 200,
            show_tooltip: true,
        }
    }
}

// src/config/mod.rs
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to write config file: {0}")]
    Write(std::io::Error),

    #[error("Config overrides must be a mapping")]
    NotAMapping,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub id: String,
    pub line_color: String,
    pub avg_line_color: String,
    pub width: f64,
    #[serde(rename = "height_ratio")]
    pub height_ratio: f64,
    pub y_min_val: f64,
    pub y_max_val: f64,
    #[serde(rename = "main_line_stroke_width")]
    pub main_line_stroke_width: f64,
    pub y_unit: String,
    /// Seconds displayed in the collapsed view.
    pub collapsed_limit: f64,
    /// Seconds retained in memory, and displayed in the expanded view.
    pub expanded_limit: f64,
    /// Seconds currently displayed.
    pub current_limit: f64,
    pub scale_change_animation_duration: f64,
    pub cycle_animation_duration: f64,
    pub wipe_animation_duration: f64,
    pub margin: Margin,
    pub dimension: Dimension,
    /// Seconds the window moves back per rewind.
    pub rewind: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub x_axis: f64,
    pub y_axis: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            line_color: "#40C669".to_string(),
            avg_line_color: "#4A90E2".to_string(),
            width: 800.0,
            height_ratio: 0.28,
            y_min_val: 0.0,
            y_max_val: 70.0,
            main_line_stroke_width: 3.0,
            y_unit: "V".to_string(),
            collapsed_limit: 50.0,
            expanded_limit: 100.0,
            current_limit: 50.0,
            scale_change_animation_duration: 500.0,
            cycle_animation_duration: 1000.0,
            wipe_animation_duration: 250.0,
            margin: Margin {
                top: 10.0,
                bottom: 10.0,
                left: 35.0,
                right: 10.0,
            },
            dimension: Dimension {
                x_axis: 20.0,
                y_axis: 20.0,
            },
            rewind: 10.0,
            extra: BTreeMap::new(),
        }
    }
}

impl ChartConfig {
    pub fn graph_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn graph_height(&self) -> f64 {
        self.width * self.height_ratio - self.margin.bottom - self.dimension.x_axis
    }

    /// Overwrites every key present in `overrides`, descending into nested
    /// mappings. Values are not range checked.
    pub fn merge(&mut self, overrides: Mapping) -> Result<(), ConfigError> {
        let mut merged = serde_yaml::to_value(&*self)?;
        merge_value(&mut merged, Value::Mapping(overrides));
        *self = serde_yaml::from_value(merged)?;
        Ok(())
    }

    pub fn merge_yaml(&mut self, overrides: &str) -> Result<(), ConfigError> {
        match serde_yaml::from_str::<Value>(overrides)? {
            Value::Mapping(map) => self.merge(map),
            Value::Null => Ok(()),
            _ => Err(ConfigError::NotAMapping),
        }
    }
}

fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(ConfigError::Read)?;

    let mut config = ChartConfig::default();
    config.merge_yaml(&config_str)?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &ChartConfig, path: P) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config)?;

    fs::write(path, yaml).map_err(ConfigError::Write)
}

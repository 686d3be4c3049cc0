use super::buffer::SeriesBuffer;
use super::sample::Sample;
use super::scale::{LinearScale, TimeScale};
use super::tooltip::format_clock;
use super::transition::Geometry;
use crate::config::ChartConfig;
use serde::Serialize;
use std::collections::HashMap;

const AVG_STROKE_FACTOR: f64 = 0.7;
const AVG_OPACITY: f64 = 0.5;
const TIME_TICKS: usize = 5;
const VALUE_TICKS: usize = 5;

/// One series laid out in pixels: x from the left edge of the graph area,
/// y from its top edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFrame {
    pub key: String,
    pub color: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Everything a renderer needs for one repaint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub domain: (f64, f64),
    pub translate_x: f64,
    pub axis_opacity: f64,
    pub graph_width: f64,
    pub graph_height: f64,
    pub paths: Vec<PathFrame>,
    /// Paths removed by a wipe, still sliding out.
    pub retiring: Vec<PathFrame>,
    pub time_ticks: Vec<AxisTick>,
    pub value_ticks: Vec<AxisTick>,
}

/// Snapshot of the paths on screen when the data was wiped.
#[derive(Debug, Clone)]
pub(crate) struct Retiring {
    pub paths: Vec<PathFrame>,
    pub started_at: i64,
    pub duration_ms: f64,
    /// Total slide to the right, in pixels.
    pub distance: f64,
}

impl Retiring {
    fn progress(&self, now: i64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) as f64 / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now: i64) -> bool {
        self.progress(now) >= 1.0
    }

    /// The snapshot moved along its own linear slide. The shared geometry is
    /// left alone.
    pub fn paths_at(&self, now: i64) -> Vec<PathFrame> {
        let offset = self.distance * self.progress(now);
        self.paths
            .iter()
            .cloned()
            .map(|mut path| {
                for point in path.points.iter_mut() {
                    point[0] += offset;
                }
                path
            })
            .collect()
    }
}

pub(crate) fn value_scale(config: &ChartConfig) -> LinearScale {
    LinearScale::new(
        (config.y_min_val, config.y_max_val),
        (config.graph_height(), 0.0),
    )
}

pub(crate) fn time_scale(config: &ChartConfig, domain: (f64, f64)) -> TimeScale {
    TimeScale::new(domain, (0.0, config.graph_width()))
}

/// Lays out every series from the current buffer contents. Series with no
/// samples produce no path.
pub(crate) fn bind_paths(
    buffer: &SeriesBuffer,
    config: &ChartConfig,
    geometry: &Geometry,
    first_seen: &HashMap<String, i64>,
    now: i64,
) -> Vec<PathFrame> {
    let x = time_scale(config, geometry.domain);
    let y = value_scale(config);

    buffer
        .iter()
        .filter(|(_, samples)| !samples.is_empty())
        .map(|(key, samples)| {
            let fade = first_seen
                .get(key)
                .map(|seen| fade_in(now - seen, config.scale_change_animation_duration))
                .unwrap_or(1.0);
            let (color, stroke_width, base_opacity) = if Sample::is_average_key(key) {
                (
                    config.avg_line_color.clone(),
                    config.main_line_stroke_width * AVG_STROKE_FACTOR,
                    AVG_OPACITY,
                )
            } else {
                (config.line_color.clone(), config.main_line_stroke_width, 1.0)
            };

            PathFrame {
                key: key.to_string(),
                color,
                stroke_width,
                opacity: base_opacity * fade * geometry.path_opacity,
                points: samples
                    .iter()
                    .map(|s| [x.map(s.time as f64) + geometry.translate_x, y.map(s.value)])
                    .collect(),
            }
        })
        .collect()
}

fn fade_in(elapsed_ms: i64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms as f64 / duration_ms).clamp(0.0, 1.0)
}

pub(crate) fn time_ticks(config: &ChartConfig, geometry: &Geometry) -> Vec<AxisTick> {
    let x = time_scale(config, geometry.domain);
    x.ticks(TIME_TICKS)
        .into_iter()
        .map(|t| AxisTick {
            position: x.map(t) + geometry.translate_x,
            label: format_clock(t as i64),
        })
        .collect()
}

pub(crate) fn value_ticks(config: &ChartConfig) -> Vec<AxisTick> {
    let y = value_scale(config);
    y.ticks(VALUE_TICKS)
        .into_iter()
        .map(|v| AxisTick {
            position: y.map(v),
            label: format!("{}{}", v, config.y_unit),
        })
        .collect()
}

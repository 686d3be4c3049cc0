use super::frame::{self, Retiring};
use super::TelemetryChart;
use crate::error::ChartError;
use log::{debug, info};
use serde_yaml::Mapping;

impl TelemetryChart {
    /// Stops scrolling immediately and keeps it stopped until [`resume`].
    ///
    /// [`resume`]: TelemetryChart::resume
    pub fn pause(&mut self) {
        let now = self.now();
        self.cycle.interrupt(now);
        self.flags.external_stop = true;
        self.tick(now);
        info!("chart `{}` paused", self.config.id);
    }

    /// Clears the pause, zoom and rewind vetoes and returns to live data.
    pub fn resume(&mut self) {
        let now = self.now();
        self.flags.external_stop = false;
        self.flags.zoomed_in = false;
        self.flags.rewound = false;
        self.window.snap_to_live(now);
        self.draw(now);
        info!("chart `{}` resumed", self.config.id);
    }

    /// Steps the window back by the configured rewind and holds it there.
    pub fn rewind(&mut self) {
        let now = self.now();
        self.cycle.interrupt(now);
        self.flags.rewound = true;
        self.tick(now);
        self.window.shift_back(self.config.rewind);
        self.draw(now);
        info!(
            "chart `{}` rewound to {}",
            self.config.id,
            self.window.end_time()
        );
    }

    /// Switches between the collapsed and expanded window width.
    pub fn resize_chart(&mut self, expanded: bool) {
        let now = self.now();
        let limit = if expanded {
            self.config.expanded_limit
        } else {
            self.config.collapsed_limit
        };
        self.config.current_limit = limit;
        self.window.set_limit(limit);
        if !expanded {
            self.flags.zoomed_in = false;
        }

        if self.flags.all_clear() {
            self.window.snap_to_live(now);
            self.draw(now);
        } else if !self.flags.zoomed_in {
            self.window.respan();
            self.draw(now);
        }
        debug!("chart `{}` window set to {} s", self.config.id, limit);
    }

    /// Empties the buffer. Paths on screen slide out to the right and are
    /// gone once the slide finishes. Data arriving meanwhile is drawn in
    /// place.
    pub fn wipe_data(&mut self) {
        let now = self.now();
        let geometry = self.cycle.geometry(now);
        let paths = frame::bind_paths(&self.buffer, &self.config, &geometry, &self.first_seen, now);
        let removed = self.buffer.sample_count();

        self.buffer.wipe();
        self.first_seen.clear();
        self.retiring = Some(Retiring {
            paths,
            started_at: now,
            duration_ms: self.config.wipe_animation_duration,
            distance: self.config.graph_width(),
        });
        info!("chart `{}` wiped {} samples", self.config.id, removed);
    }

    /// Deep-merges `overrides` into the config, then re-syncs the window.
    /// A failed merge leaves the config as it was.
    pub fn update_config(&mut self, overrides: Mapping) -> Result<(), ChartError> {
        self.config.merge(overrides)?;
        self.sync_config();
        Ok(())
    }

    pub fn update_config_yaml(&mut self, overrides: &str) -> Result<(), ChartError> {
        self.config.merge_yaml(overrides)?;
        self.sync_config();
        Ok(())
    }

    fn sync_config(&mut self) {
        self.window.set_limit(self.config.current_limit);
        self.window.set_graph_width(self.config.graph_width());
        if !self.flags.zoomed_in {
            self.window.respan();
        }
        info!("chart `{}` config updated", self.config.id);
    }

    /// Zooms to a brushed pixel extent. An empty selection changes nothing.
    pub fn on_brush_end(&mut self, selection: Option<(f64, f64)>) -> bool {
        let Some((x0, x1)) = selection.filter(|(x0, x1)| x0 != x1) else {
            debug!("empty brush selection ignored");
            return false;
        };
        // pixels are read against what is on screen, mid-scroll included
        let geometry = self.cycle.geometry(self.now());
        let scale = frame::time_scale(&self.config, geometry.domain);
        let t0 = scale.invert(x0 - geometry.translate_x).round() as i64;
        let t1 = scale.invert(x1 - geometry.translate_x).round() as i64;
        self.set_zoom_extent(t0, t1);
        true
    }

    pub fn set_zoom_extent(&mut self, t0: i64, t1: i64) {
        let now = self.now();
        self.window.set_extent(t0, t1);
        self.flags.zoomed_in = true;
        self.draw(now);
        debug!("chart `{}` zoomed to {}..{}", self.config.id, t0.min(t1), t0.max(t1));
    }

    /// Leaves the zoom and returns to the live window.
    pub fn on_double_click(&mut self) {
        let now = self.now();
        self.flags.zoomed_in = false;
        self.window.snap_to_live(now);
        self.draw(now);
    }

    /// Tab or window visibility. Hiding an unvetoed chart blanks it; showing
    /// it again restarts scrolling if nothing else holds it.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        let now = self.now();
        if hidden {
            if self.flags.all_clear() {
                self.cycle.slot_mut().force_opacity(0.0, 0.0);
            }
            self.flags.hidden = true;
            return;
        }

        self.flags.hidden = false;
        if self.flags.all_clear() {
            self.tick(now);
        } else {
            self.cycle.slot_mut().force_opacity(1.0, 1.0);
        }
    }

    pub fn set_container_hidden(&mut self, hidden: bool) {
        if self.container_hidden == hidden {
            return;
        }
        self.container_hidden = hidden;
        self.on_visibility_change(hidden);
    }
}

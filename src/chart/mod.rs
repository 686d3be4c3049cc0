pub mod animation;
pub mod buffer;
pub mod clock;
pub mod frame;
pub mod interaction;
pub mod sample;
pub mod scale;
pub mod tooltip;
pub mod transition;
pub mod window;

use crate::config::ChartConfig;
use crate::error::ChartError;
use animation::{AnimationCycle, CycleState, TickOutcome};
use buffer::SeriesBuffer;
use clock::{Clock, SystemClock};
use frame::{Frame, Retiring};
use log::{debug, error};
use sample::Sample;
use std::collections::HashMap;
use tooltip::Tooltip;
use transition::{Easing, Geometry, TransitionKind};
use window::{FlagSet, TimeWindow};

/// One scrolling chart: the sample buffer, the visible window, the veto
/// flags and the animation driving the rendered geometry.
///
/// Nothing moves on its own. The host calls [`TelemetryChart::advance`]
/// from its frame loop so finished transitions can schedule the next step,
/// then renders [`TelemetryChart::frame`].
pub struct TelemetryChart {
    config: ChartConfig,
    buffer: SeriesBuffer,
    window: TimeWindow,
    flags: FlagSet,
    cycle: AnimationCycle,
    /// When each series was first bound, for the fade-in.
    first_seen: HashMap<String, i64>,
    retiring: Option<Retiring>,
    container_hidden: bool,
    clock: Box<dyn Clock>,
}

impl TelemetryChart {
    pub fn new(config: ChartConfig) -> Result<Self, ChartError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Fails when the config names no container, leaving nothing initialised.
    pub fn with_clock(config: ChartConfig, clock: Box<dyn Clock>) -> Result<Self, ChartError> {
        if config.id.trim().is_empty() {
            error!("chart container id is empty, chart not initialised");
            return Err(ChartError::MissingContainer(config.id));
        }

        let now = clock.now_ms();
        let window = TimeWindow::new(now, config.current_limit, config.graph_width());
        let cycle = AnimationCycle::new(window.domain());
        debug!(
            "chart `{}` created with a {} s window",
            config.id, config.current_limit
        );

        Ok(Self {
            config,
            buffer: SeriesBuffer::new(),
            window,
            flags: FlagSet::default(),
            cycle,
            first_seen: HashMap::new(),
            retiring: None,
            container_hidden: false,
            clock,
        })
    }

    pub fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Stores a batch, prunes by the expanded limit and redraws unless the
    /// container is hidden.
    pub fn update<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        let now = self.now();
        self.buffer.extend(samples);
        self.buffer.prune(now, self.config.expanded_limit);

        if self.container_hidden {
            return;
        }
        self.refresh(now);
    }

    /// Advances the animation to the current clock.
    pub fn advance(&mut self) -> CycleState {
        let now = self.now();
        self.advance_to(now)
    }

    /// Completes a due transition and runs what follows it. At most one
    /// completion is handled per call. A finished wipe slide is dropped and
    /// followed by a gated tick if nothing is running.
    pub fn advance_to(&mut self, now: i64) -> CycleState {
        if self.cycle.poll(now).is_some() {
            self.tick(now);
        }
        if self.retiring.as_ref().is_some_and(|r| r.is_done(now)) {
            self.retiring = None;
            if !self.cycle.is_animating() {
                self.tick(now);
            }
        }
        self.cycle.state()
    }

    pub fn frame(&self) -> Frame {
        self.frame_at(self.now())
    }

    /// Paths are bound from the buffer on every call, so pruned samples
    /// never linger on screen.
    pub fn frame_at(&self, now: i64) -> Frame {
        let geometry = self.cycle.geometry(now);
        let retiring = self
            .retiring
            .as_ref()
            .map(|r| r.paths_at(now))
            .unwrap_or_default();

        Frame {
            domain: geometry.domain,
            translate_x: geometry.translate_x,
            axis_opacity: geometry.axis_opacity,
            graph_width: self.config.graph_width(),
            graph_height: self.config.graph_height(),
            paths: frame::bind_paths(&self.buffer, &self.config, &geometry, &self.first_seen, now),
            retiring,
            time_ticks: frame::time_ticks(&self.config, &geometry),
            value_ticks: frame::value_ticks(&self.config),
        }
    }

    /// Readout for pixel `x` measured from the left edge of the graph area.
    pub fn tooltip(&self, x: f64) -> Option<Tooltip> {
        self.tooltip_at(self.now(), x)
    }

    pub fn tooltip_at(&self, now: i64, x: f64) -> Option<Tooltip> {
        let geometry = self.cycle.geometry(now);
        let scale = frame::time_scale(&self.config, geometry.domain);
        let mut tooltip = tooltip::hit_test(&self.buffer, &scale, x - geometry.translate_x)?;
        tooltip.guide_x += geometry.translate_x;
        Some(tooltip)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    pub fn is_animating(&self) -> bool {
        self.cycle.is_animating()
    }

    pub fn state(&self) -> CycleState {
        self.cycle.state()
    }

    pub fn geometry(&self) -> Geometry {
        self.cycle.geometry(self.now())
    }

    pub fn is_container_hidden(&self) -> bool {
        self.container_hidden
    }

    /// Binds series that appeared since the last call, then starts the
    /// cycle if it is not already running.
    fn refresh(&mut self, now: i64) {
        let mut entered = false;
        for key in self.buffer.keys() {
            if !self.first_seen.contains_key(key) {
                self.first_seen.insert(key.to_string(), now);
                entered = true;
            }
        }

        if self.cycle.is_animating() {
            return;
        }

        if entered && self.flags.all_clear() && self.cycle.slot().active().is_none() {
            self.window.snap_to_live(now);
            let to = Geometry {
                domain: self.window.domain(),
                translate_x: 0.0,
                ..self.cycle.geometry(now)
            };
            debug!("new series entering, holding for the fade-in");
            self.cycle.one_shot(
                now,
                TransitionKind::Enter,
                to,
                self.config.scale_change_animation_duration,
                Easing::Linear,
            );
        } else {
            self.tick(now);
        }
    }

    fn tick(&mut self, now: i64) -> TickOutcome {
        self.cycle.tick(
            now,
            &self.flags,
            &mut self.window,
            self.config.cycle_animation_duration,
        )
    }

    /// One-shot move of the geometry to the current window.
    fn draw(&mut self, now: i64) {
        let current = self.cycle.geometry(now);
        let to = if self.flags.hidden {
            Geometry {
                domain: self.window.domain(),
                translate_x: 0.0,
                ..current
            }
        } else {
            Geometry::at_domain(self.window.domain())
        };
        self.cycle.one_shot(
            now,
            TransitionKind::Rescale,
            to,
            self.config.scale_change_animation_duration,
            Easing::ElasticOut,
        );
    }
}

use super::scale::TimeScale;
use serde::Serialize;

/// Independent vetoes on continuous scrolling. The cycle may only run
/// while every flag is false; several can be set at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagSet {
    pub zoomed_in: bool,
    pub hidden: bool,
    pub external_stop: bool,
    pub rewound: bool,
}

impl FlagSet {
    pub fn all_clear(&self) -> bool {
        !(self.zoomed_in || self.hidden || self.external_stop || self.rewound)
    }
}

/// Visible time range, kept in lock-step with the time scale domain.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    start_time: i64,
    end_time: i64,
    current_limit: f64,
    scale: TimeScale,
}

impl TimeWindow {
    pub fn new(now: i64, current_limit: f64, graph_width: f64) -> Self {
        let mut window = Self {
            start_time: now,
            end_time: now,
            current_limit,
            scale: TimeScale::new((now as f64, now as f64), (0.0, graph_width)),
        };
        window.snap_to_live(now);
        window
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn current_limit(&self) -> f64 {
        self.current_limit
    }

    pub fn limit_ms(&self) -> i64 {
        (self.current_limit * 1000.0).round() as i64
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.start_time as f64, self.end_time as f64)
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    /// Right edge at `now`, width of the current limit.
    pub fn snap_to_live(&mut self, now: i64) {
        self.end_time = now;
        self.start_time = now - self.limit_ms();
        self.sync_scale();
    }

    /// Keeps the right edge and resizes the left one to the current limit.
    pub fn respan(&mut self) {
        self.start_time = self.end_time - self.limit_ms();
        self.sync_scale();
    }

    /// Arbitrary sub-range, e.g. from a brush selection. Bounds may come in
    /// either order.
    pub fn set_extent(&mut self, t0: i64, t1: i64) {
        self.start_time = t0.min(t1);
        self.end_time = t0.max(t1);
        self.sync_scale();
    }

    /// Changes the displayed width; bounds move on the next snap.
    pub fn set_limit(&mut self, seconds: f64) {
        self.current_limit = seconds;
    }

    pub fn shift_back(&mut self, seconds: f64) {
        let step = (seconds * 1000.0).round() as i64;
        self.start_time -= step;
        self.end_time -= step;
        self.sync_scale();
    }

    pub fn set_graph_width(&mut self, graph_width: f64) {
        self.scale.set_range((0.0, graph_width));
    }

    fn sync_scale(&mut self) {
        self.scale.set_domain(self.domain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_veto_with_and_semantics() {
        let mut flags = FlagSet::default();
        assert!(flags.all_clear());

        flags.hidden = true;
        flags.external_stop = true;
        assert!(!flags.all_clear());

        flags.hidden = false;
        assert!(!flags.all_clear());
        flags.external_stop = false;
        assert!(flags.all_clear());
    }

    #[test]
    fn snap_to_live_spans_current_limit() {
        let mut window = TimeWindow::new(100_000, 50.0, 500.0);
        assert_eq!(window.end_time() - window.start_time(), 50_000);

        window.set_limit(100.0);
        window.snap_to_live(300_000);
        assert_eq!(window.end_time(), 300_000);
        assert_eq!(window.start_time(), 200_000);
        assert_eq!(window.scale().domain(), (200_000.0, 300_000.0));
    }

    #[test]
    fn extent_is_ordered_and_mirrored_in_scale() {
        let mut window = TimeWindow::new(100_000, 50.0, 500.0);
        window.set_extent(90_000, 70_000);
        assert_eq!((window.start_time(), window.end_time()), (70_000, 90_000));
        assert_eq!(window.scale().domain(), (70_000.0, 90_000.0));
    }

    #[test]
    fn respan_keeps_right_edge() {
        let mut window = TimeWindow::new(100_000, 50.0, 500.0);
        window.shift_back(10.0);
        window.set_limit(100.0);
        window.respan();
        assert_eq!((window.start_time(), window.end_time()), (-10_000, 90_000));
        assert_eq!(window.scale().domain(), window.domain());
    }

    #[test]
    fn shift_back_keeps_width() {
        let mut window = TimeWindow::new(100_000, 50.0, 500.0);
        window.shift_back(10.0);
        window.shift_back(10.0);
        assert_eq!(window.end_time(), 80_000);
        assert_eq!(window.end_time() - window.start_time(), 50_000);
        assert_eq!(window.scale().domain(), window.domain());
    }
}

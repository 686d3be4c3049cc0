use rstest::{fixture, rstest};
use telemetry_chart::chart::animation::CycleState;
use telemetry_chart::chart::clock::ManualClock;
use telemetry_chart::chart::transition::TransitionKind;
use telemetry_chart::{ChartConfig, Sample, TelemetryChart};

const START: i64 = 1_700_000_000_000;

struct Harness {
    clock: ManualClock,
    chart: TelemetryChart,
}

impl Harness {
    fn step(&mut self, ms: i64) -> CycleState {
        self.clock.advance(ms);
        self.chart.advance()
    }

    fn feed(&mut self, category: &str, value: f64) {
        let now = self.chart.now();
        self.chart.update(vec![Sample::new(now, value, category)]);
    }

    fn width(&self) -> i64 {
        self.chart.window().end_time() - self.chart.window().start_time()
    }
}

#[fixture]
fn harness() -> Harness {
    let clock = ManualClock::new(START);
    let config = ChartConfig {
        id: "telemetry".to_string(),
        ..ChartConfig::default()
    };
    let chart = TelemetryChart::with_clock(config, Box::new(clock.clone())).unwrap();
    Harness { clock, chart }
}

#[fixture]
fn scrolling(mut harness: Harness) -> Harness {
    harness.feed("cell_voltage", 3.2);
    assert_eq!(harness.step(500), CycleState::ContinuousScroll);
    harness
}

#[rstest]
fn out_of_order_samples_are_stored_sorted(mut harness: Harness) {
    let t = START - 5_000;
    harness.chart.update(vec![
        Sample::new(t, 1.0, "A"),
        Sample::new(t + 1_000, 2.0, "A"),
        Sample::new(t + 500, 3.0, "A"),
    ]);

    let stored: Vec<(i64, f64)> = harness
        .chart
        .buffer()
        .get("A")
        .unwrap()
        .iter()
        .map(|s| (s.time, s.value))
        .collect();
    assert_eq!(stored, vec![(t, 1.0), (t + 500, 3.0), (t + 1_000, 2.0)]);
}

#[rstest]
fn pause_then_update_stores_without_scrolling(mut scrolling: Harness) {
    scrolling.chart.pause();
    scrolling.clock.advance(2_000);

    scrolling.feed("cell_voltage", 3.4);
    scrolling.feed("bus_current", 1.1);

    assert_eq!(scrolling.chart.buffer().sample_count(), 3);
    assert!(!scrolling.chart.is_animating());
    assert_eq!(scrolling.step(5_000), CycleState::Idle);
    assert!(!scrolling.chart.is_animating());

    scrolling.chart.resume();
    assert_eq!(scrolling.step(500), CycleState::ContinuousScroll);
    assert!(scrolling.chart.is_animating());
}

#[rstest]
fn rewinding_twice_steps_back_twenty_seconds(mut scrolling: Harness) {
    let live_end = scrolling.chart.window().end_time();

    scrolling.chart.rewind();
    assert!(scrolling.chart.flags().rewound);
    scrolling.step(200);
    scrolling.chart.rewind();
    assert!(scrolling.chart.flags().rewound);

    assert_eq!(scrolling.chart.window().end_time(), live_end - 20_000);
    assert_eq!(scrolling.width(), 50_000);

    for _ in 0..5 {
        scrolling.step(1_000);
        assert_eq!(scrolling.chart.state(), CycleState::Idle);
        assert!(!scrolling.chart.is_animating());
        assert!(scrolling.chart.flags().rewound);
    }
    assert_eq!(scrolling.chart.window().end_time(), live_end - 20_000);

    scrolling.chart.resume();
    assert!(!scrolling.chart.flags().rewound);
    assert_eq!(scrolling.chart.window().end_time(), scrolling.chart.now());
}

#[rstest]
#[case(None)]
#[case(Some((120.0, 120.0)))]
fn empty_brush_changes_nothing(mut scrolling: Harness, #[case] selection: Option<(f64, f64)>) {
    let window = scrolling.chart.window().clone();
    let flags = scrolling.chart.flags();
    let state = scrolling.chart.state();

    assert!(!scrolling.chart.on_brush_end(selection));

    assert_eq!(scrolling.chart.window(), &window);
    assert_eq!(scrolling.chart.flags(), flags);
    assert_eq!(scrolling.chart.state(), state);
}

#[rstest]
fn zoom_holds_until_double_click(mut scrolling: Harness) {
    assert!(scrolling.chart.on_brush_end(Some((100.0, 300.0))));
    let zoomed = scrolling.chart.window().clone();
    assert!(scrolling.width() < 50_000);

    scrolling.step(500);
    scrolling.step(1_000);
    assert_eq!(scrolling.chart.window(), &zoomed);
    assert!(!scrolling.chart.is_animating());

    scrolling.chart.on_double_click();
    assert_eq!(scrolling.width(), 50_000);
    assert_eq!(scrolling.step(500), CycleState::ContinuousScroll);
}

#[rstest]
fn window_spans_current_limit_outside_zoom(mut scrolling: Harness) {
    scrolling.chart.resize_chart(true);
    assert_eq!(scrolling.width(), 100_000);
    scrolling.chart.rewind();
    assert_eq!(scrolling.width(), 100_000);
    scrolling.chart.resize_chart(false);
    assert_eq!(scrolling.width(), 50_000);
    scrolling.chart.resume();
    assert_eq!(scrolling.width(), 50_000);
}

#[rstest]
fn only_one_transition_drives_the_geometry(mut scrolling: Harness) {
    scrolling.chart.resize_chart(true);
    scrolling.clock.advance(100);
    scrolling.chart.rewind();
    scrolling.clock.advance(100);
    scrolling.chart.on_brush_end(Some((10.0, 20.0)));

    assert_eq!(
        scrolling.chart.state(),
        CycleState::OneShotTransition(TransitionKind::Rescale)
    );
    // the superseded transitions never complete
    assert_eq!(scrolling.step(500), CycleState::Idle);
    assert_eq!(scrolling.step(5_000), CycleState::Idle);
}

#[rstest]
fn hidden_tab_suspends_and_restores(mut scrolling: Harness) {
    scrolling.chart.pause();
    scrolling.chart.on_visibility_change(true);
    scrolling.chart.on_visibility_change(false);
    assert!(!scrolling.chart.is_animating());

    scrolling.chart.on_visibility_change(true);
    scrolling.chart.resume();
    scrolling.step(500);
    assert!(!scrolling.chart.is_animating());

    scrolling.clock.advance(30_000);
    scrolling.chart.on_visibility_change(false);
    assert!(scrolling.chart.is_animating());
    assert_eq!(scrolling.chart.window().end_time(), scrolling.chart.now());
}

#[rstest]
fn retention_is_independent_of_the_visible_window(mut scrolling: Harness) {
    for _ in 0..150 {
        scrolling.step(1_000);
        scrolling.feed("cell_voltage", 3.3);
    }

    let now = scrolling.chart.now();
    let samples = scrolling.chart.buffer().get("cell_voltage").unwrap();
    assert!(samples.iter().all(|s| now - s.time <= 100_000));
    assert_eq!(samples.len(), 101);
    // the collapsed window shows half of what is retained
    let frame = scrolling.chart.frame();
    let visible = frame.paths[0]
        .points
        .iter()
        .filter(|p| (0.0..=frame.graph_width).contains(&p[0]))
        .count();
    assert!(visible < samples.len());
}

#[rstest]
fn tooltip_reads_every_series(mut scrolling: Harness) {
    scrolling.chart.pause();
    let now = scrolling.chart.now();
    scrolling.chart.update(vec![
        Sample::new(now - 2_000, 1.0, "cell_voltage"),
        Sample::new(now - 2_000, 10.0, "AVG_cell_voltage"),
        Sample::new(now - 1_000, 2.0, "cell_voltage"),
        Sample::new(now - 1_000, 20.0, "AVG_cell_voltage"),
    ]);

    let tooltip = scrolling
        .chart
        .tooltip(frame_x(&scrolling, (now - 1_000) as f64))
        .unwrap();

    assert_eq!(tooltip.time, now - 1_000);
    assert_eq!(tooltip.lines.len(), 3);
    assert_eq!(tooltip.lines[1], "AVG_cell_voltage: 20.00");
    assert!(tooltip.lines[0].starts_with("TimeStamp: "));
    assert_eq!(tooltip.rows[0].label, "Avg. cell voltage");
}

fn frame_x(harness: &Harness, time: f64) -> f64 {
    let geometry = harness.chart.geometry();
    let (d0, d1) = geometry.domain;
    let width = harness.chart.config().graph_width();
    (time - d0) / (d1 - d0) * width + geometry.translate_x
}

#[rstest]
fn wipe_clears_data_and_rebinds_fresh_series(mut scrolling: Harness) {
    scrolling.chart.wipe_data();
    assert!(scrolling.chart.buffer().is_empty());
    assert!(scrolling.chart.frame().paths.is_empty());

    assert_eq!(scrolling.step(250), CycleState::ContinuousScroll);
    assert!(scrolling.chart.frame().retiring.is_empty());

    scrolling.feed("bus_current", 0.4);
    let frame = scrolling.chart.frame();
    assert_eq!(frame.paths.len(), 1);
    assert_eq!(frame.paths[0].key, "bus_current");
}

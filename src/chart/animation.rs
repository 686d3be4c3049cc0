use super::transition::{
    Completion, Easing, Geometry, TransitionKind, TransitionSlot, TransitionSpec,
};
use super::window::{FlagSet, TimeWindow};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    OneShotTransition(TransitionKind),
    ContinuousScroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A veto flag was set; nothing was scheduled.
    Halted,
    /// A scroll cycle was scheduled.
    Scrolling,
}

/// Suspend/resume machine driving the scrolling redraws.
///
/// `animating` records whether a cycle is in progress; the [`FlagSet`]
/// decides whether one may run.
#[derive(Debug, Clone)]
pub struct AnimationCycle {
    slot: TransitionSlot,
    animating: bool,
}

impl AnimationCycle {
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            slot: TransitionSlot::new(Geometry::at_domain(domain)),
            animating: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn state(&self) -> CycleState {
        match self.slot.active_kind() {
            None => CycleState::Idle,
            Some(TransitionKind::Scroll) => CycleState::ContinuousScroll,
            Some(kind) => CycleState::OneShotTransition(kind),
        }
    }

    pub fn slot(&self) -> &TransitionSlot {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut TransitionSlot {
        &mut self.slot
    }

    pub fn geometry(&self, now: i64) -> Geometry {
        self.slot.current(now)
    }

    /// The gated step. Halts when any flag is set, otherwise advances the
    /// window to `now`, redraws at zero offset and schedules one cycle of
    /// leftward motion whose completion ticks again.
    pub fn tick(
        &mut self,
        now: i64,
        flags: &FlagSet,
        window: &mut TimeWindow,
        cycle_ms: f64,
    ) -> TickOutcome {
        if !flags.all_clear() {
            if self.animating {
                debug!("animation halted by {:?}", flags);
            }
            self.animating = false;
            return TickOutcome::Halted;
        }
        self.animating = true;

        window.snap_to_live(now);
        let scale = window.scale();
        let distance = scale.map(0.0) - scale.map(cycle_ms);

        let current = self.slot.current(now);
        let from = Geometry {
            domain: window.domain(),
            translate_x: 0.0,
            ..current
        };
        self.slot.jump(now, from);
        self.slot.start(
            now,
            TransitionSpec {
                kind: TransitionKind::Scroll,
                to: Geometry {
                    translate_x: distance,
                    path_opacity: 1.0,
                    axis_opacity: 1.0,
                    ..from
                },
                duration_ms: cycle_ms,
                easing: Easing::Linear,
            },
        );
        TickOutcome::Scrolling
    }

    /// Interpolates to `to` and ticks when done. Flags are not consulted;
    /// callers set them beforehand.
    pub fn one_shot(
        &mut self,
        now: i64,
        kind: TransitionKind,
        to: Geometry,
        duration_ms: f64,
        easing: Easing,
    ) {
        self.animating = true;
        self.slot.start(
            now,
            TransitionSpec {
                kind,
                to,
                duration_ms,
                easing,
            },
        );
    }

    pub fn interrupt(&mut self, now: i64) -> Option<TransitionKind> {
        self.slot.interrupt(now)
    }

    /// Pops a due completion. Interrupted transitions are gone from the slot
    /// and never complete.
    pub fn poll(&mut self, now: i64) -> Option<Completion> {
        self.slot.poll(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_window(now: i64) -> TimeWindow {
        TimeWindow::new(now, 50.0, 500.0)
    }

    #[test]
    fn tick_with_any_flag_halts_without_touching_geometry() {
        let now = 100_000;
        let mut window = live_window(now);
        let mut cycle = AnimationCycle::new(window.domain());
        cycle.one_shot(
            now,
            TransitionKind::Rescale,
            Geometry::at_domain((0.0, 10.0)),
            500.0,
            Easing::Linear,
        );
        let before = cycle.geometry(now + 100);
        let generation = cycle.slot().generation();

        let flags = FlagSet {
            hidden: true,
            ..FlagSet::default()
        };
        assert_eq!(cycle.tick(now + 100, &flags, &mut window, 1000.0), TickOutcome::Halted);
        assert_eq!(cycle.tick(now + 100, &flags, &mut window, 1000.0), TickOutcome::Halted);

        assert!(!cycle.is_animating());
        assert_eq!(cycle.geometry(now + 100), before);
        assert_eq!(cycle.slot().generation(), generation);
        assert_eq!(window.end_time(), now);
    }

    #[test]
    fn clear_tick_scrolls_one_cycle_left() {
        let mut window = live_window(0);
        let mut cycle = AnimationCycle::new(window.domain());

        let outcome = cycle.tick(200_000, &FlagSet::default(), &mut window, 1000.0);

        assert_eq!(outcome, TickOutcome::Scrolling);
        assert!(cycle.is_animating());
        assert_eq!(cycle.state(), CycleState::ContinuousScroll);
        assert_eq!(window.end_time(), 200_000);
        let start = cycle.geometry(200_000);
        assert_eq!(start.translate_x, 0.0);
        assert_eq!(start.domain, (150_000.0, 200_000.0));
        // 50 s over 500 px is 10 px per second
        assert!((cycle.geometry(201_000).translate_x + 10.0).abs() < 1e-9);
    }

    #[test]
    fn completion_requests_another_tick() {
        let mut window = live_window(0);
        let mut cycle = AnimationCycle::new(window.domain());
        cycle.tick(1_000, &FlagSet::default(), &mut window, 1000.0);

        assert!(cycle.poll(1_500).is_none());
        let completion = cycle.poll(2_000).unwrap();
        assert_eq!(completion.kind, TransitionKind::Scroll);
        assert_eq!(cycle.state(), CycleState::Idle);
    }

    #[test]
    fn interrupted_cycle_never_completes() {
        let mut window = live_window(0);
        let mut cycle = AnimationCycle::new(window.domain());
        cycle.tick(1_000, &FlagSet::default(), &mut window, 1000.0);

        assert_eq!(cycle.interrupt(1_400), Some(TransitionKind::Scroll));
        assert!(cycle.poll(10_000).is_none());
        assert!((cycle.geometry(10_000).translate_x + 4.0).abs() < 1e-9);
    }
}

use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Overshooting spring, amplitude 1 and period 0.3.
    ElasticOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::ElasticOut => {
                const PERIOD: f64 = 0.3 / TAU;
                // asin(1 / amplitude) with amplitude 1
                const SHIFT: f64 = FRAC_PI_2 * PERIOD;
                let decay = (2f64.powf(-10.0 * t) - 0.0009765625) * 1.0009775171065494;
                1.0 - decay * ((t + SHIFT) / PERIOD).sin()
            }
        }
    }
}

/// Visual attributes shared by the axis and every series path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Time domain the axis and paths are laid out against.
    pub domain: (f64, f64),
    /// Horizontal offset of the paths in pixels.
    pub translate_x: f64,
    pub path_opacity: f64,
    pub axis_opacity: f64,
}

impl Geometry {
    pub fn at_domain(domain: (f64, f64)) -> Self {
        Self {
            domain,
            translate_x: 0.0,
            path_opacity: 1.0,
            axis_opacity: 1.0,
        }
    }

    pub fn interpolate(&self, to: &Geometry, k: f64) -> Geometry {
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        Geometry {
            domain: (lerp(self.domain.0, to.domain.0), lerp(self.domain.1, to.domain.1)),
            translate_x: lerp(self.translate_x, to.translate_x),
            path_opacity: lerp(self.path_opacity, to.path_opacity),
            axis_opacity: lerp(self.axis_opacity, to.axis_opacity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// One-shot move to a new window (zoom, rewind, resume, resize, reset).
    Rescale,
    /// One-shot hold while freshly arrived series fade in.
    Enter,
    /// One cycle of continuous scrolling.
    Scroll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub from: Geometry,
    pub to: Geometry,
    pub started_at: i64,
    pub duration_ms: f64,
    pub easing: Easing,
    token: u64,
}

impl Transition {
    pub fn progress(&self, now: i64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) as f64 / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: i64) -> Geometry {
        let k = self.easing.apply(self.progress(now));
        self.from.interpolate(&self.to, k)
    }

    pub fn is_done(&self, now: i64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub kind: TransitionKind,
    pub token: u64,
}

/// Owns the rendered geometry and the single transition allowed to drive it.
///
/// Starting a transition interrupts the previous one first, freezing the
/// geometry where it was. Every start or interrupt bumps the generation,
/// so a completion carrying an older token is stale.
#[derive(Debug, Clone)]
pub struct TransitionSlot {
    resting: Geometry,
    active: Option<Transition>,
    generation: u64,
}

pub struct TransitionSpec {
    pub kind: TransitionKind,
    pub to: Geometry,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl TransitionSlot {
    pub fn new(resting: Geometry) -> Self {
        Self {
            resting,
            active: None,
            generation: 0,
        }
    }

    pub fn start(&mut self, now: i64, spec: TransitionSpec) -> u64 {
        self.interrupt(now);
        self.generation += 1;
        self.active = Some(Transition {
            kind: spec.kind,
            from: self.resting,
            to: spec.to,
            started_at: now,
            duration_ms: spec.duration_ms,
            easing: spec.easing,
            token: self.generation,
        });
        self.generation
    }

    /// Stops the active transition where it currently is.
    pub fn interrupt(&mut self, now: i64) -> Option<TransitionKind> {
        let transition = self.active.take()?;
        self.resting = transition.sample(now);
        self.generation += 1;
        Some(transition.kind)
    }

    /// Sets attributes immediately, interrupting whatever was running.
    pub fn jump(&mut self, now: i64, geometry: Geometry) {
        self.interrupt(now);
        self.resting = geometry;
    }

    /// Forces opacities on both the resting state and the running transition,
    /// without interrupting it.
    pub fn force_opacity(&mut self, path_opacity: f64, axis_opacity: f64) {
        self.resting.path_opacity = path_opacity;
        self.resting.axis_opacity = axis_opacity;
        if let Some(active) = self.active.as_mut() {
            for g in [&mut active.from, &mut active.to] {
                g.path_opacity = path_opacity;
                g.axis_opacity = axis_opacity;
            }
        }
    }

    /// Finishes the active transition if it is due.
    pub fn poll(&mut self, now: i64) -> Option<Completion> {
        if !self.active.as_ref()?.is_done(now) {
            return None;
        }
        let transition = self.active.take()?;
        self.resting = transition.to;
        Some(Completion {
            kind: transition.kind,
            token: transition.token,
        })
    }

    pub fn current(&self, now: i64) -> Geometry {
        match &self.active {
            Some(transition) => transition.sample(now),
            None => self.resting,
        }
    }

    pub fn resting(&self) -> Geometry {
        self.resting
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    pub fn active_kind(&self) -> Option<TransitionKind> {
        self.active.as_ref().map(|t| t.kind)
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use web_time::Instant;

use crate::{Color, Rect};

/// Damping ratio presets, matching the usual spring vocabulary.
pub mod damping {
    pub const HIGH_BOUNCY: f32 = 0.2;
    pub const MEDIUM_BOUNCY: f32 = 0.5;
    pub const LOW_BOUNCY: f32 = 0.75;
    pub const NO_BOUNCY: f32 = 1.0;
}

/// Stiffness presets.
pub mod stiffness {
    pub const HIGH: f32 = 10_000.0;
    pub const MEDIUM: f32 = 1_500.0;
    pub const MEDIUM_LOW: f32 = 400.0;
    pub const LOW: f32 = 200.0;
    pub const VERY_LOW: f32 = 50.0;
}

/// Spring parameters in the ratio/stiffness form (unit mass).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSpec {
    pub damping_ratio: f32,
    pub stiffness: f32,
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
        }
    }

    /// Damping coefficient for unit mass: `2 * ratio * sqrt(stiffness)`.
    pub fn damping_coefficient(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.max(0.0).sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: damping::NO_BOUNCY,
            stiffness: stiffness::MEDIUM_LOW,
        }
    }
}

/// One-dimensional spring integrated with RK4.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    spec: SpringSpec,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Value and velocity thresholds below which the spring is considered at rest.
    pub const VALUE_EPSILON: f32 = 0.001;
    pub const VELOCITY_EPSILON: f32 = 0.01;
    // Larger frame gaps are split so stiff springs stay stable.
    const MAX_SUBSTEP: f32 = 1.0 / 120.0;

    pub fn new(spec: SpringSpec, initial: f32) -> Self {
        Self {
            spec,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn spec(&self) -> SpringSpec {
        self.spec
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` at rest.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < Self::VALUE_EPSILON
            && self.velocity.abs() < Self::VELOCITY_EPSILON
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let mut remaining = dt;
        while remaining > 0.0 {
            if self.is_settled() {
                self.snap_to(self.target);
                return;
            }
            let h = remaining.min(Self::MAX_SUBSTEP);
            self.rk4(h);
            remaining -= h;
        }
    }

    fn rk4(&mut self, dt: f32) {
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        -self.spec.stiffness * (x - self.target) - self.spec.damping_coefficient() * v
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        // Springs overshoot; keep channels in range.
        let ch = |a: u8, b: u8| {
            (a as f32 + (b as f32 - a as f32) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color(
            ch(self.0, other.0),
            ch(self.1, other.1),
            ch(self.2, other.2),
            ch(self.3, other.3),
        )
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Rect {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
            w: self.w.interpolate(&other.w, t).max(0.0),
            h: self.h.interpolate(&other.h, t).max(0.0),
        }
    }
}

// Animation clock
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

thread_local! {
    static CLOCK: RefCell<Option<Rc<dyn Clock>>> = const { RefCell::new(None) };
}

/// Install the animation clock for this thread. Hosts use `SystemClock`; tests install `TestClock`.
pub fn set_clock(clock: impl Clock) {
    CLOCK.with(|c| *c.borrow_mut() = Some(Rc::new(clock)));
}

pub fn now() -> Instant {
    let clock = CLOCK.with(|c| c.borrow().clone());
    clock.map(|c| c.now()).unwrap_or_else(Instant::now)
}

/// A test clock you can drive deterministically.
#[derive(Clone)]
pub struct TestClock {
    pub t: Instant,
}
impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t
    }
}

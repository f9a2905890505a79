use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use gumbex_core::{Container, Point, Randomness, Token};
use gumbex_timing::{Scheduler, TickHandle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percent of the globe width travelled per frame.
pub const DEFAULT_SPEED: f64 = 0.18;

/// A token together with its constant-speed velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub token: Token,
    pub vx: f64,
    pub vy: f64,
}

impl MotionState {
    pub fn with_heading(token: Token, speed: f64, angle: f64) -> Self {
        Self {
            token,
            vx: speed * angle.cos(),
            vy: speed * angle.sin(),
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Moves one frame and bounces off the rim. Returns true on a bounce.
    pub fn advance(&mut self, container: &Container) -> bool {
        let p = &mut self.token.position;
        p.x += self.vx;
        p.y += self.vy;

        let dx = p.x - container.center.x;
        let dy = p.y - container.center.y;
        let dist = dx.hypot(dy);
        if dist <= container.radius {
            return false;
        }

        let (nx, ny) = (dx / dist, dy / dist);
        // v' = v - 2 (v . n) n
        let dot = self.vx * nx + self.vy * ny;
        self.vx -= 2.0 * dot * nx;
        self.vy -= 2.0 * dot * ny;

        // pull back along the normal by the overshoot, i.e. onto the rim
        *p = Point::new(
            container.center.x + nx * container.radius,
            container.center.y + ny * container.radius,
        );
        true
    }
}

/// Advances every state by one frame. Tokens never interact, so order is irrelevant.
pub fn step(states: &mut [MotionState], container: &Container) -> usize {
    states
        .iter_mut()
        .map(|s| s.advance(container))
        .filter(|bounced| *bounced)
        .count()
}

/// View onto a running animation. Cloning shares the same token states.
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    tick: TickHandle,
    states: Rc<RefCell<Vec<MotionState>>>,
    running: Rc<Cell<bool>>,
}

impl AnimationHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Current token positions, e.g. for drawing a frame.
    pub fn tokens(&self) -> Vec<Token> {
        self.states.borrow().iter().map(|s| s.token).collect()
    }

    pub fn tick_handle(&self) -> TickHandle {
        self.tick
    }

    /// Cancels the tick callback. Every clone observes the stop; calling it
    /// again does nothing.
    pub fn stop<S: Scheduler>(&self, scheduler: &mut S) {
        if self.running.replace(false) {
            scheduler.cancel(self.tick);
            debug!(tick = ?self.tick, "globe animation stopped");
        }
    }
}

/// Owns at most one animation for a single globe.
#[derive(Debug, Default)]
pub struct MotionSimulator {
    active: Option<AnimationHandle>,
}

impl MotionSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating `tokens` inside `container`, replacing whatever was
    /// running before.
    ///
    /// Each token gets an independent random heading at `speed`. With no
    /// tokens or no container nothing is scheduled and `None` is returned.
    pub fn start<S, R>(
        &mut self,
        tokens: &[Token],
        container: Option<Container>,
        speed: f64,
        rng: &mut R,
        scheduler: &mut S,
    ) -> Option<AnimationHandle>
    where
        S: Scheduler,
        R: Randomness,
    {
        self.stop_active(scheduler);

        let container = container?;
        if tokens.is_empty() {
            return None;
        }

        let states: Vec<MotionState> = tokens
            .iter()
            .map(|t| MotionState::with_heading(*t, speed, rng.uniform() * TAU))
            .collect();
        let states = Rc::new(RefCell::new(states));
        let running = Rc::new(Cell::new(true));

        let tick = {
            let states = Rc::clone(&states);
            scheduler.schedule_repeating(Box::new(move || {
                step(&mut states.borrow_mut(), &container);
            }))
        };
        debug!(tokens = tokens.len(), speed, ?tick, "globe animation started");

        let handle = AnimationHandle {
            tick,
            states,
            running,
        };
        self.active = Some(handle.clone());
        Some(handle)
    }

    /// Stops the animation behind `handle` and releases it if it is the
    /// active one. Stopping a finished animation is a no-op.
    pub fn stop<S: Scheduler>(&mut self, handle: &AnimationHandle, scheduler: &mut S) {
        handle.stop(scheduler);
        if self.active.as_ref().is_some_and(|a| a.tick == handle.tick) {
            self.active = None;
        }
    }

    /// Stops whatever is running. Safe to call when nothing is.
    pub fn stop_active<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.active.take() {
            handle.stop(scheduler);
        }
    }

    pub fn active(&self) -> Option<&AnimationHandle> {
        self.active.as_ref()
    }
}

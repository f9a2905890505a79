use std::time::Duration;

use tracing::trace;

use crate::timer::{HighPrecisionTimer, Timer};

/// Identifies one repeating callback registered with a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Per-frame callback source.
///
/// Everything runs on the thread that drives the scheduler; callbacks are
/// invoked once per frame until cancelled.
pub trait Scheduler {
    fn schedule_repeating(&mut self, callback: Box<dyn FnMut()>) -> TickHandle;

    /// Deregisters `handle`. Returns false if it was not registered.
    fn cancel(&mut self, handle: TickHandle) -> bool;

    fn is_scheduled(&self, handle: TickHandle) -> bool;
}

/// Scheduler driven by explicit [`FrameScheduler::tick`] calls.
#[derive(Default)]
pub struct FrameScheduler {
    next_id: u64,
    frame: u64,
    callbacks: Vec<(TickHandle, Box<dyn FnMut()>)>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every registered callback once, in registration order.
    pub fn tick(&mut self) {
        self.frame += 1;
        for (_, callback) in self.callbacks.iter_mut() {
            callback();
        }
    }

    /// Ticks `frames` times. With a `budget` each frame is stretched to that
    /// duration on `timer`; without one frames run back to back.
    pub fn run_frames(
        &mut self,
        frames: u64,
        timer: &mut HighPrecisionTimer,
        budget: Option<Duration>,
    ) {
        for _ in 0..frames {
            let start = timer.now();
            self.tick();
            if let Some(budget) = budget {
                timer.pace(start, budget);
            }
            timer.record_frame(timer.elapsed(start));
        }
        trace!(frames, total = self.frame, "frames run");
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn active_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl Scheduler for FrameScheduler {
    fn schedule_repeating(&mut self, callback: Box<dyn FnMut()>) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.callbacks.push((handle, callback));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(h, _)| *h != handle);
        self.callbacks.len() != before
    }

    fn is_scheduled(&self, handle: TickHandle) -> bool {
        self.callbacks.iter().any(|(h, _)| *h == handle)
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("frame", &self.frame)
            .field("active", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn callbacks_run_each_tick_until_cancelled() {
        let mut s = FrameScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = {
            let hits = Rc::clone(&hits);
            s.schedule_repeating(Box::new(move || hits.set(hits.get() + 1)))
        };
        s.tick();
        s.tick();
        assert_eq!(hits.get(), 2);
        assert!(s.is_scheduled(h));

        assert!(s.cancel(h));
        s.tick();
        assert_eq!(hits.get(), 2);
        assert_eq!(s.active_count(), 0);
        assert_eq!(s.frame_count(), 3);
    }

    #[test]
    fn cancelling_twice_is_harmless() {
        let mut s = FrameScheduler::new();
        let h = s.schedule_repeating(Box::new(|| {}));
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(!s.is_scheduled(h));
    }

    #[test]
    fn handles_are_unique() {
        let mut s = FrameScheduler::new();
        let a = s.schedule_repeating(Box::new(|| {}));
        let b = s.schedule_repeating(Box::new(|| {}));
        assert_ne!(a, b);
        s.cancel(a);
        let c = s.schedule_repeating(Box::new(|| {}));
        assert_ne!(a, c);
        assert!(s.is_scheduled(b));
    }

    #[test]
    fn run_frames_records_timing() {
        let mut s = FrameScheduler::new();
        let mut timer = HighPrecisionTimer::new();
        s.run_frames(5, &mut timer, None);
        assert_eq!(s.frame_count(), 5);
        assert_eq!(timer.frame_count(), 5);
    }
}

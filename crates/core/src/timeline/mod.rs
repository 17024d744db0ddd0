use std::collections::VecDeque;

use crate::{AnimationController, FrameOutcome, PathSink};

/// Opaque ticket for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame scheduler (`requestAnimationFrame` and friends).
///
/// A requested frame is later delivered to
/// [`AnimationController::on_frame`] with a monotonically increasing
/// timestamp in milliseconds.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Millisecond clock driven by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaybackClock {
    pub time_ms: f64,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.time_ms = 0.0;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.time_ms = (self.time_ms + delta_ms).max(self.time_ms);
    }
}

/// Deterministic scheduler: frames are only delivered when the clock is
/// advanced explicitly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    clock: PlaybackClock,
    next_handle: u64,
    pending: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at `time_ms` instead of zero.
    pub fn starting_at(time_ms: f64) -> Self {
        Self {
            clock: PlaybackClock { time_ms },
            ..Self::default()
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.time_ms
    }

    /// Number of requested frames not yet delivered or cancelled.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Advances the clock and hands back every frame that is now due,
    /// stamped with the new time.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<(FrameHandle, f64)> {
        self.clock.advance(delta_ms);
        let now = self.clock.time_ms;
        self.pending.drain(..).map(|handle| (handle, now)).collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|pending| *pending != handle);
    }
}

/// Advances the controller's manual clock by one interval and delivers the
/// frames that came due. Returns the outcome of the last delivered frame.
pub fn tick<K: PathSink>(
    controller: &mut AnimationController<ManualScheduler, K>,
    interval_ms: f64,
) -> Option<FrameOutcome> {
    let due = controller.scheduler_mut().advance(interval_ms);
    due.into_iter()
        .map(|(handle, timestamp)| controller.on_frame(handle, timestamp))
        .last()
}

/// Ticks at a fixed interval until no frame is outstanding or `max_frames`
/// intervals have elapsed. Returns the number of intervals ticked.
pub fn run_until_idle<K: PathSink>(
    controller: &mut AnimationController<ManualScheduler, K>,
    interval_ms: f64,
    max_frames: usize,
) -> usize {
    let mut frames = 0;
    while frames < max_frames && controller.scheduler().outstanding() > 0 {
        tick(controller, interval_ms);
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = PlaybackClock::default();
        clock.advance(16.0);
        clock.advance(-5.0);
        assert_eq!(clock.time_ms, 16.0);
        clock.reset();
        assert_eq!(clock.time_ms, 0.0);
    }

    #[test]
    fn delivers_requested_frames_once() {
        let mut scheduler = ManualScheduler::starting_at(100.0);
        let first = scheduler.request_frame();
        let second = scheduler.request_frame();
        assert_ne!(first, second);
        assert_eq!(scheduler.outstanding(), 2);

        let due = scheduler.advance(16.0);
        assert_eq!(due, vec![(first, 116.0), (second, 116.0)]);
        assert_eq!(scheduler.outstanding(), 0);
        assert!(scheduler.advance(16.0).is_empty());
    }

    #[test]
    fn cancelled_frames_are_not_delivered() {
        let mut scheduler = ManualScheduler::new();
        let cancelled = scheduler.request_frame();
        let kept = scheduler.request_frame();
        scheduler.cancel_frame(cancelled);

        assert_eq!(scheduler.outstanding(), 1);
        assert_eq!(scheduler.advance(10.0), vec![(kept, 10.0)]);
    }
}

//! Pull/release state machine.
//!
//! The controller owns the animation state, at most one outstanding frame
//! request and the capabilities it talks to. Every trigger cancels the frame
//! in flight before requesting a new one, so there is never more than one.
//! The arithmetic of a single frame lives in [`step`], which is pure.

use std::rc::Rc;

use serde::Serialize;

use crate::{
    motion::{ReducedMotionPolicy, ReducedMotionSource},
    timing::{decay, pull_ease, LinearInterpolator},
    wave, FrameHandle, FrameScheduler, PathSink, PluckConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Pulling,
    Releasing,
}

/// What happened to a delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The phase is still running and another frame was requested.
    Continued,
    /// The phase reached its target and the controller is idle.
    Finished,
    /// The handle was cancelled or already delivered; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
struct AnimationState {
    phase: Phase,
    current_amplitude: f64,
    interpolator: Option<LinearInterpolator>,
    session_start: Option<f64>,
    scheduled: Option<FrameHandle>,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            current_amplitude: 0.0,
            interpolator: None,
            session_start: None,
            scheduled: None,
        }
    }
}

/// Everything one frame needs to know.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub phase: Phase,
    pub interpolator: LinearInterpolator,
    pub elapsed: f64,
    pub pull_duration: f64,
    pub release_duration: f64,
    pub decay_freq: f64,
    pub effective_max_amplitude: f64,
    /// Read live on every frame, so a flip mid-release switches curves.
    pub reduced_motion: bool,
}

/// Result of one frame: the new amplitude and whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub amplitude: f64,
    pub keep_running: bool,
}

/// Amplitude for one frame of the active phase.
///
/// When `keep_running` is false the caller snaps to the phase target
/// (`effective_max_amplitude` for a pull, zero for a release).
pub fn step(input: &FrameInput) -> FrameStep {
    match input.phase {
        Phase::Pulling => {
            let progress = input.elapsed / input.pull_duration;
            let amplitude = input.interpolator.at(pull_ease(progress));
            FrameStep {
                amplitude,
                keep_running: input.elapsed < input.pull_duration
                    && amplitude < input.effective_max_amplitude,
            }
        }
        Phase::Releasing => {
            let (amplitude, release_time) = if input.reduced_motion {
                let progress = input.elapsed / input.pull_duration;
                (
                    pull_ease(1.0 - progress) * input.effective_max_amplitude,
                    input.pull_duration,
                )
            } else {
                let progress = input.elapsed / input.release_duration;
                (
                    input
                        .interpolator
                        .at(1.0 - decay(progress, input.decay_freq)),
                    input.release_duration,
                )
            };
            FrameStep {
                amplitude,
                keep_running: input.elapsed < release_time,
            }
        }
        Phase::Idle => FrameStep {
            amplitude: input.interpolator.from,
            keep_running: false,
        },
    }
}

/// Drives the underline amplitude for one underline instance.
pub struct AnimationController<S, K> {
    config: PluckConfig,
    staged_config: Option<PluckConfig>,
    policy: ReducedMotionPolicy,
    state: AnimationState,
    scheduler: S,
    sink: K,
}

impl<S: FrameScheduler, K: PathSink> AnimationController<S, K> {
    /// Creates an idle controller. Nothing is emitted until [`Self::init`].
    pub fn new(
        config: PluckConfig,
        reduced_motion: Rc<dyn ReducedMotionSource>,
        scheduler: S,
        sink: K,
    ) -> Self {
        let policy = ReducedMotionPolicy::new(reduced_motion, config.amplitude);
        Self {
            config,
            staged_config: None,
            policy,
            state: AnimationState::default(),
            scheduler,
            sink,
        }
    }

    /// Puts the underline at rest and emits the flat baseline once.
    pub fn init(&mut self) {
        self.cancel_scheduled();
        self.apply_staged_config();
        self.policy.refresh();
        self.state.phase = Phase::Idle;
        self.state.interpolator = None;
        self.state.current_amplitude = 0.0;
        self.emit_current();
    }

    /// Starts the pull towards the effective maximum amplitude.
    pub fn pull(&mut self) {
        self.begin(Phase::Pulling);
    }

    /// Starts the release back to rest.
    pub fn release(&mut self) {
        self.begin(Phase::Releasing);
    }

    fn begin(&mut self, phase: Phase) {
        self.cancel_scheduled();
        // Read the ceiling after this: a staged amplitude may move it.
        self.apply_staged_config();
        let target = match phase {
            Phase::Pulling => self.policy.effective_max_amplitude(),
            _ => 0.0,
        };

        self.state.interpolator = Some(LinearInterpolator::new(
            self.state.current_amplitude,
            target,
        ));
        self.state.phase = phase;
        self.state.scheduled = Some(self.scheduler.request_frame());
        tracing::debug!(
            ?phase,
            from = self.state.current_amplitude,
            to = target,
            "animation started"
        );
    }

    /// Delivers a frame requested from the scheduler.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) -> FrameOutcome {
        if self.state.scheduled != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame");
            return FrameOutcome::Stale;
        }
        self.state.scheduled = None;

        let Some(interpolator) = self.state.interpolator else {
            return FrameOutcome::Stale;
        };
        let start = *self.state.session_start.get_or_insert(timestamp);

        let input = FrameInput {
            phase: self.state.phase,
            interpolator,
            elapsed: timestamp - start,
            pull_duration: self.config.pull_duration,
            release_duration: self.config.release_duration,
            decay_freq: self.config.decay_freq,
            effective_max_amplitude: self.policy.effective_max_amplitude(),
            reduced_motion: self.policy.is_active(),
        };
        let frame = step(&input);

        self.state.current_amplitude = frame.amplitude;
        self.emit_current();
        tracing::trace!(
            elapsed = input.elapsed,
            amplitude = frame.amplitude,
            "animation frame"
        );

        if frame.keep_running {
            self.state.scheduled = Some(self.scheduler.request_frame());
            return FrameOutcome::Continued;
        }

        self.state.current_amplitude = match self.state.phase {
            Phase::Pulling => input.effective_max_amplitude,
            _ => 0.0,
        };
        self.emit_current();
        tracing::debug!(
            phase = ?self.state.phase,
            amplitude = self.state.current_amplitude,
            "animation finished"
        );
        self.state.phase = Phase::Idle;
        self.state.interpolator = None;
        self.state.session_start = None;
        FrameOutcome::Finished
    }

    /// Stages a new configuration. It takes effect immediately when idle and
    /// otherwise at the next trigger, so a running phase never sees it.
    pub fn set_config(&mut self, config: PluckConfig) {
        self.staged_config = Some(config);
        if self.state.phase == Phase::Idle {
            self.apply_staged_config();
        }
    }

    pub fn config(&self) -> &PluckConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_amplitude(&self) -> f64 {
        self.state.current_amplitude
    }

    pub fn effective_max_amplitude(&self) -> f64 {
        self.policy.effective_max_amplitude()
    }

    /// Handle of the frame currently awaited, if any.
    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        self.state.scheduled
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    fn cancel_scheduled(&mut self) {
        if let Some(handle) = self.state.scheduled.take() {
            tracing::trace!(?handle, "cancelling frame in flight");
            self.scheduler.cancel_frame(handle);
        }
        self.state.session_start = None;
    }

    fn apply_staged_config(&mut self) {
        if let Some(config) = self.staged_config.take() {
            if config.amplitude != self.config.amplitude {
                self.policy.set_amplitude(config.amplitude);
            }
            self.config = config;
        }
    }

    fn emit_current(&mut self) {
        let path = wave::generate(self.state.current_amplitude, self.config.num_half_waves);
        self.sink.emit(&path);
    }
}

impl<S: std::fmt::Debug, K> std::fmt::Debug for AnimationController<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

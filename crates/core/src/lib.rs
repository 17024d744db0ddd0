//! Core library for the plucked wavy underline.
//!
//! The crate holds the amplitude animation engine: the bezier wave generator
//! ([`wave`]), the easing and decay curves ([`timing`]), the reduced-motion
//! policy ([`motion`]) and the pull/release state machine ([`controller`]).
//! Everything the engine needs from its host (frame scheduling, path
//! rendering, the accessibility preference) comes in through small traits so
//! the engine can be driven with synthetic timestamps.

pub mod config;
pub mod controller;
pub mod error;
pub mod motion;
pub mod render;
pub mod timeline;
pub mod timing;
pub mod wave;

pub use config::PluckConfig;
pub use controller::{AnimationController, FrameInput, FrameOutcome, FrameStep, Phase};
pub use error::{PluckyError, Result};
pub use motion::{ReducedMotionPolicy, ReducedMotionSignal, ReducedMotionSource};
pub use render::{svg_document, PathSink, RecordingSink};
pub use timeline::{FrameHandle, FrameScheduler, ManualScheduler, PlaybackClock};
pub use timing::{decay, pull_ease, LinearInterpolator};
pub use wave::{CubicCurve, PathDescription, Point};

//! Timing curves and the amplitude interpolator.
//!
//! - [`pull_ease`]: exponential ease-in for the pull, fast rise then a soft
//!   settle just short of 1.
//! - [`decay`]: damped cosine for the release, starting at 1 and ringing
//!   inside an `e^(-5t)` envelope.
//! - [`LinearInterpolator`]: maps normalised progress onto an amplitude range.
//!
//! All of these are total over `f64`; progress outside `[0, 1]` is allowed.

use std::f64::consts::{E, PI};

const PULL_BASE: f64 = 2.3;
const PULL_RATE: f64 = 6.0;
const DECAY_RATE: f64 = 5.0;

/// `1 - 2.3^(-6t)`
#[inline]
pub fn pull_ease(t: f64) -> f64 {
    1.0 - PULL_BASE.powf(-PULL_RATE * t)
}

/// `e^(-5t) · cos(2π · freq · t)`
#[inline]
pub fn decay(t: f64, freq: f64) -> f64 {
    decay_envelope(t) * (2.0 * PI * freq * t).cos()
}

/// Upper bound of `|decay(t, _)|`.
#[inline]
pub fn decay_envelope(t: f64) -> f64 {
    E.powf(-DECAY_RATE * t)
}

/// Linear map from progress `t` to the range `from..to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearInterpolator {
    pub from: f64,
    pub to: f64,
}

impl LinearInterpolator {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// `t·(to - from) + from`
    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        t * (self.to - self.from) + self.from
    }

    /// Closure form, for callers that only want a `Fn(f64) -> f64`.
    pub fn into_fn(self) -> impl Fn(f64) -> f64 {
        move |t| self.at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn pull_ease_starts_at_zero_and_falls_short_of_one() {
        assert_eq!(pull_ease(0.0), 0.0);
        let end = pull_ease(1.0);
        assert!((end - (1.0 - 2.3_f64.powi(-6))).abs() < EPS);
        assert!((end - 0.993245).abs() < 1e-6);
        assert!(end < 1.0);
        assert!(pull_ease(10.0) < 1.0);
    }

    #[test]
    fn pull_ease_is_strictly_increasing() {
        let mut previous = pull_ease(0.0);
        for i in 1..=1000 {
            let value = pull_ease(i as f64 / 1000.0);
            assert!(value > previous, "not increasing at step {i}");
            previous = value;
        }
    }

    #[test]
    fn decay_starts_at_one_inside_its_envelope() {
        assert_eq!(decay(0.0, 8.0), 1.0);
        for i in 0..=2000 {
            let t = i as f64 / 1000.0;
            assert!(decay(t, 8.0).abs() <= decay_envelope(t) + EPS);
            if i > 0 {
                assert!(decay_envelope(t) < decay_envelope(t - 0.001));
            }
        }
    }

    #[test]
    fn decay_oscillates() {
        // Half a cycle in, the cosine is at its trough.
        let t = 0.5 / 8.0;
        assert!(decay(t, 8.0) < 0.0);
        assert!((decay(t, 8.0) + decay_envelope(t)).abs() < EPS);
    }

    #[test]
    fn interpolator_maps_unit_range() {
        let lerp = LinearInterpolator::new(0.1, 0.3);
        assert!((lerp.at(0.0) - 0.1).abs() < EPS);
        assert!((lerp.at(1.0) - 0.3).abs() < EPS);
        assert!((lerp.at(0.5) - 0.2).abs() < EPS);

        let down = LinearInterpolator::new(0.3, 0.0).into_fn();
        assert_eq!(down(1.0), 0.0);
        assert!((down(2.0) + 0.3).abs() < EPS);
    }
}

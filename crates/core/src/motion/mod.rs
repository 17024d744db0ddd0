//! Reduced-motion accessibility preference.
//!
//! The preference is owned by the host and can flip at any time. The engine
//! consumes it through [`ReducedMotionSource`]; [`ReducedMotionSignal`] is a
//! settable single-threaded implementation for tests and the CLI.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Multiplier applied to the configured amplitude while reduced motion is on.
pub const REDUCED_AMPLITUDE_FACTOR: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type MotionListener = Rc<dyn Fn(bool)>;

/// Host-provided view of the "prefers reduced motion" preference.
pub trait ReducedMotionSource {
    /// Current value of the preference.
    fn is_active(&self) -> bool;

    /// Registers `listener`, called with the new value on every change.
    fn subscribe(&self, listener: MotionListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct SignalState {
    active: bool,
    next_id: u64,
    listeners: Vec<(SubscriptionId, MotionListener)>,
}

/// Shared, settable preference. Clones observe and drive the same value.
#[derive(Clone, Default)]
pub struct ReducedMotionSignal {
    state: Rc<RefCell<SignalState>>,
}

impl ReducedMotionSignal {
    pub fn new(active: bool) -> Self {
        let signal = Self::default();
        signal.state.borrow_mut().active = active;
        signal
    }

    /// Updates the preference and notifies listeners if it changed.
    pub fn set(&self, active: bool) {
        let listeners: Vec<MotionListener> = {
            let mut state = self.state.borrow_mut();
            if state.active == active {
                return;
            }
            state.active = active;
            state
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect()
        };

        tracing::debug!(active, listeners = listeners.len(), "reduced motion changed");
        for listener in listeners {
            listener(active);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }
}

impl ReducedMotionSource for ReducedMotionSignal {
    fn is_active(&self) -> bool {
        self.state.borrow().active
    }

    fn subscribe(&self, listener: MotionListener) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(existing, _)| *existing != id);
    }
}

impl fmt::Debug for ReducedMotionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ReducedMotionSignal")
            .field("active", &state.active)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Configured amplitude and the ceiling derived from it.
#[derive(Debug, Default)]
struct Ceiling {
    configured: Cell<f64>,
    effective: Cell<f64>,
}

impl Ceiling {
    fn recompute(&self, reduced: bool) {
        let factor = if reduced { REDUCED_AMPLITUDE_FACTOR } else { 1.0 };
        self.effective.set(self.configured.get() * factor);
    }
}

/// Keeps the effective maximum amplitude in step with the preference.
///
/// Subscribes to the source on construction and unsubscribes on drop.
pub struct ReducedMotionPolicy {
    source: Rc<dyn ReducedMotionSource>,
    ceiling: Rc<Ceiling>,
    subscription: SubscriptionId,
}

impl ReducedMotionPolicy {
    pub fn new(source: Rc<dyn ReducedMotionSource>, amplitude: f64) -> Self {
        let ceiling = Rc::new(Ceiling::default());
        ceiling.configured.set(amplitude);
        ceiling.recompute(source.is_active());

        let observed = Rc::downgrade(&ceiling);
        let subscription = source.subscribe(Rc::new(move |reduced: bool| {
            if let Some(ceiling) = observed.upgrade() {
                ceiling.recompute(reduced);
            }
        }));

        Self {
            source,
            ceiling,
            subscription,
        }
    }

    /// Live value of the preference. Not cached.
    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    /// `amplitude`, scaled by 1/3 while reduced motion is on.
    pub fn effective_max_amplitude(&self) -> f64 {
        self.ceiling.effective.get()
    }

    pub fn set_amplitude(&self, amplitude: f64) {
        self.ceiling.configured.set(amplitude);
        self.refresh();
    }

    /// Re-reads the source and recomputes the ceiling.
    pub fn refresh(&self) {
        self.ceiling.recompute(self.source.is_active());
    }
}

impl Drop for ReducedMotionPolicy {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

impl fmt::Debug for ReducedMotionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducedMotionPolicy")
            .field("active", &self.is_active())
            .field("configured", &self.ceiling.configured.get())
            .field("effective", &self.ceiling.effective.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_amplitude_when_active() {
        let signal = ReducedMotionSignal::new(true);
        let policy = ReducedMotionPolicy::new(Rc::new(signal), 0.3);

        assert!(policy.is_active());
        assert!((policy.effective_max_amplitude() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn follows_signal_changes() {
        let signal = ReducedMotionSignal::new(false);
        let policy = ReducedMotionPolicy::new(Rc::new(signal.clone()), 0.9);
        assert_eq!(policy.effective_max_amplitude(), 0.9);

        signal.set(true);
        assert!((policy.effective_max_amplitude() - 0.3).abs() < 1e-12);

        signal.set(false);
        assert_eq!(policy.effective_max_amplitude(), 0.9);

        policy.set_amplitude(0.6);
        assert_eq!(policy.effective_max_amplitude(), 0.6);
    }

    #[test]
    fn unsubscribes_on_drop() {
        let signal = ReducedMotionSignal::new(false);
        let policy = ReducedMotionPolicy::new(Rc::new(signal.clone()), 0.3);
        assert_eq!(signal.listener_count(), 1);

        drop(policy);
        assert_eq!(signal.listener_count(), 0);
        signal.set(true);
    }

    #[test]
    fn unchanged_value_does_not_notify() {
        let signal = ReducedMotionSignal::new(false);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        signal.subscribe(Rc::new(move |_: bool| counter.set(counter.get() + 1)));

        signal.set(false);
        signal.set(true);
        signal.set(true);
        assert_eq!(calls.get(), 1);
    }
}

//! Progress-observer trait for session events.
//!
//! Inject an [`std::sync::Arc<dyn SessionObserver>`] into
//! [`crate::session::ProcessingSession::process`] to receive events as the
//! pipeline moves through its phases.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a UI state store, or a log —
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` because the cosmetic upload
//! ticker fires from a spawned task while the request is in flight.
//!
//! # The percentage is cosmetic
//!
//! [`SessionObserver::on_progress`] during the `uploading` phase reports a
//! timed sweep, not bytes on the wire — the transport is a single awaited
//! round trip with no transfer events. Render it; do not measure against it.

use std::sync::Arc;

use crate::state::ProcessingState;

/// Called by the session driver as it moves through the pipeline.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SessionObserver: Send + Sync {
    /// A phase boundary was crossed; `state` is the full snapshot.
    fn on_state_change(&self, state: &ProcessingState) {
        let _ = state;
    }

    /// The cosmetic upload sweep advanced. May fire concurrently with the
    /// in-flight request; implementations must synchronise shared state.
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Convenience alias for the type the session driver takes.
pub type Observer = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;
    use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    struct TrackingObserver {
        changes: AtomicUsize,
        last_percent: AtomicU8,
    }

    impl SessionObserver for TrackingObserver {
        fn on_state_change(&self, _state: &ProcessingState) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_progress(&self, percent: u8) {
            self.last_percent.store(percent, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        let mut state = ProcessingState::default();
        state.advance(Phase::Validating, 5, "Checking…");
        obs.on_state_change(&state);
        obs.on_progress(42);
    }

    #[test]
    fn tracking_observer_receives_events() {
        let obs = TrackingObserver {
            changes: AtomicUsize::new(0),
            last_percent: AtomicU8::new(0),
        };

        let mut state = ProcessingState::default();
        state.advance(Phase::Validating, 5, "Checking…");
        obs.on_state_change(&state);
        state.advance(Phase::Uploading, 10, "Uploading…");
        obs.on_state_change(&state);
        obs.on_progress(55);

        assert_eq!(obs.changes.load(Ordering::SeqCst), 2);
        assert_eq!(obs.last_percent.load(Ordering::SeqCst), 55);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: Observer = Arc::new(NoopObserver);
        obs.on_progress(10);
    }
}

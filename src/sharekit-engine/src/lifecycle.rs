//! Surface lifecycle bridge.
//!
//! Raw surface notifications are ambiguous on their own: the first
//! "dispatch surface activated" for a session means "begin the platform
//! hand-off", while a later one means "the user came back and the
//! platform never reported". The bridge owns that interpretation and
//! turns notifications into unambiguous session signals.

use tracing::trace;

/// What a "dispatch surface activated" notification means for the
/// current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivationSignal {
    /// The dispatch surface reached the foreground for the first time;
    /// initialize the platform hand-off on it.
    BeginDispatch,
    /// The dispatch surface resumed after the hand-off began, with no
    /// terminal callback received in between.
    ImplicitResume,
}

/// Tracks one session's relationship to its surfaces.
///
/// Owned by the session and driven only from the primary lane. Once
/// detached, every notification is dropped; detaching twice, or after
/// the session terminated, is a no-op.
#[derive(Debug, Default)]
pub(crate) struct SurfaceLifecycleBridge {
    /// A dispatch surface was requested from the presentation layer.
    delegated: bool,
    /// `begin_share` has been invoked for the current attempt.
    dispatch_begun: bool,
    detached: bool,
}

impl SurfaceLifecycleBridge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that surface activation was delegated to the
    /// presentation layer.
    pub(crate) fn mark_delegated(&mut self) {
        self.delegated = true;
    }

    /// Record that the platform hand-off began without a dispatch
    /// surface (in-process platform).
    pub(crate) fn mark_dispatch_begun(&mut self) {
        self.dispatch_begun = true;
    }

    /// Interpret a "dispatch surface activated" notification.
    pub(crate) fn on_dispatch_activated(&mut self) -> Option<ActivationSignal> {
        if self.detached {
            trace!("dispatch activation after detach ignored");
            return None;
        }
        if !self.delegated {
            trace!("dispatch activation without delegation ignored");
            return None;
        }
        if self.dispatch_begun {
            Some(ActivationSignal::ImplicitResume)
        } else {
            self.dispatch_begun = true;
            Some(ActivationSignal::BeginDispatch)
        }
    }

    /// Interpret an "initiating surface destroyed" notification.
    /// Returns `true` when the session must be torn down.
    pub(crate) fn on_surface_destroyed(&mut self) -> bool {
        if self.detached {
            trace!("surface destruction after detach ignored");
            return false;
        }
        true
    }

    /// Stop interpreting notifications. Idempotent.
    pub(crate) fn detach(&mut self) {
        self.detached = true;
    }
}

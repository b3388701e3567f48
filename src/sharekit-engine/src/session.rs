//! Share session state machine.
//!
//! A session owns one share attempt end-to-end. It is created per
//! `start_share` call, lives in the engine's single active-session
//! slot, and is discarded after termination; it is never reused.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use sharekit_protocol::{SessionId, ShareObject, ShareTarget};

use crate::lifecycle::{ActivationSignal, SurfaceLifecycleBridge};
use crate::outcome::{OutcomeListener, ShareOutcome, ShareStatus};
use crate::platform::PlatformHandle;
use crate::surface::SurfaceContext;

/// Lifecycle phase of one share session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// The interceptor pipeline is running.
    Preparing,
    /// Pipeline done; hand-off not yet initiated.
    AwaitingDispatch,
    /// Hand-off initiated; waiting on a terminal signal.
    Dispatched,
    /// Absorbing final state.
    Terminated,
}

impl SessionState {
    /// Whether the session has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// One in-flight share attempt.
pub(crate) struct ShareSession {
    id: SessionId,
    state: SessionState,
    target: ShareTarget,
    object: ShareObject,
    listener: Option<Box<dyn OutcomeListener>>,
    cancel: CancellationToken,
    surface: SurfaceContext,
    handle: Option<Arc<dyn PlatformHandle>>,
    bridge: SurfaceLifecycleBridge,
}

impl ShareSession {
    pub(crate) fn new(
        target: ShareTarget,
        object: ShareObject,
        listener: Box<dyn OutcomeListener>,
        surface: SurfaceContext,
    ) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::Idle,
            target,
            object,
            listener: Some(listener),
            cancel: CancellationToken::new(),
            surface,
            handle: None,
            bridge: SurfaceLifecycleBridge::new(),
        }
    }

    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn target(&self) -> ShareTarget {
        self.target
    }

    pub(crate) fn object(&self) -> &ShareObject {
        &self.object
    }

    pub(crate) fn set_object(&mut self, object: ShareObject) {
        self.object = object;
    }

    pub(crate) fn surface(&self) -> &SurfaceContext {
        &self.surface
    }

    pub(crate) fn handle(&self) -> Option<Arc<dyn PlatformHandle>> {
        self.handle.clone()
    }

    pub(crate) fn set_handle(&mut self, handle: Arc<dyn PlatformHandle>) {
        self.handle = Some(handle);
    }

    /// A clone of the session's cancellation scope.
    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start preparing: emits the `Started` notification.
    pub(crate) fn begin(&mut self) {
        debug_assert_eq!(self.state, SessionState::Idle);
        self.state = SessionState::Preparing;
        self.emit(ShareStatus::Started);
    }

    pub(crate) fn advance_to_awaiting_dispatch(&mut self) {
        debug_assert_eq!(self.state, SessionState::Preparing);
        self.state = SessionState::AwaitingDispatch;
    }

    pub(crate) fn mark_dispatched(&mut self) {
        debug_assert_eq!(self.state, SessionState::AwaitingDispatch);
        self.state = SessionState::Dispatched;
    }

    pub(crate) fn mark_delegated(&mut self) {
        self.bridge.mark_delegated();
    }

    pub(crate) fn mark_dispatch_begun(&mut self) {
        self.bridge.mark_dispatch_begun();
    }

    pub(crate) fn signal_dispatch_activated(&mut self) -> Option<ActivationSignal> {
        self.bridge.on_dispatch_activated()
    }

    pub(crate) fn signal_surface_destroyed(&mut self) -> bool {
        self.bridge.on_surface_destroyed()
    }

    /// Enter the absorbing `Terminated` state exactly once.
    ///
    /// `Some(status)` delivers the terminal notification; `None` is the
    /// quiet path for supersession and forced teardown, where there is
    /// nobody left to notify. Either way the cancellation scope fires,
    /// the bridge detaches, and the listener and platform handle are
    /// dropped. Calling this on an already-terminated session is a
    /// no-op.
    pub(crate) fn terminate(&mut self, status: Option<ShareStatus>) {
        if self.state == SessionState::Terminated {
            debug!(session = %self.id, "terminate on terminated session ignored");
            return;
        }
        self.state = SessionState::Terminated;
        self.cancel.cancel();
        self.bridge.detach();
        match status {
            Some(status) => {
                debug_assert!(status.is_terminal());
                info!(session = %self.id, status = status.name(), "share session terminated");
                self.emit(status);
            }
            None => {
                info!(session = %self.id, "share session released without notification");
            }
        }
        self.listener = None;
        self.handle = None;
    }

    fn emit(&mut self, status: ShareStatus) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_outcome(ShareOutcome {
                target: self.target,
                object: self.object.clone(),
                status,
            });
        }
    }
}

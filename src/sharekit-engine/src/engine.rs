//! Engine front-end and the primary-lane command loop.
//!
//! The engine is split the same way the rest of the crate models the
//! world: a cheap-clone [`ShareEngine`] handle that posts commands, and
//! one spawned loop task that owns every piece of mutable session
//! state. State transitions, listener delivery, and dispatch all
//! happen on that task (the primary lane); only the interceptor
//! pipeline runs elsewhere.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use sharekit_protocol::{DispatchRequest, SessionId, ShareObject, ShareTarget};

use crate::config::{EngineConfig, HandoffResumePolicy};
use crate::error::ShareError;
use crate::interceptor::{InterceptContext, PipelineRun, ShareInterceptor, run_pipeline};
use crate::lifecycle::ActivationSignal;
use crate::outcome::{OutcomeListener, ShareStatus};
use crate::platform::{PlatformFactory, PlatformRegistry, PlatformSink, TerminalSignal};
use crate::session::{SessionState, ShareSession};
use crate::surface::SurfaceContext;
use crate::validation::validate;

/// Commands processed by the engine loop.
pub(crate) enum EngineCommand {
    StartShare {
        surface: SurfaceContext,
        target: ShareTarget,
        object: ShareObject,
        listener: Box<dyn OutcomeListener>,
    },
    PipelineFinished {
        session: SessionId,
        result: PipelineRun,
    },
    PlatformSignal {
        session: SessionId,
        terminal: TerminalSignal,
    },
    DispatchActivated {
        surface: SurfaceContext,
    },
    SurfaceDestroyed,
    Shutdown,
}

/// Cheap-clone handle to a running share engine.
///
/// Every method is fire-and-forget: it posts a command onto the
/// engine's primary lane and returns immediately. All results arrive
/// at the listener passed to [`ShareEngine::start_share`].
#[derive(Clone)]
pub struct ShareEngine {
    commands: UnboundedSender<EngineCommand>,
}

impl ShareEngine {
    /// Start building an engine.
    pub fn builder() -> ShareEngineBuilder {
        ShareEngineBuilder::new()
    }

    /// Start a share.
    ///
    /// Any prior non-terminated session is superseded: its scope is
    /// cancelled, its resources released, and its listener never hears
    /// another word - last call wins.
    pub fn start_share(
        &self,
        surface: SurfaceContext,
        target: ShareTarget,
        object: ShareObject,
        listener: impl OutcomeListener + 'static,
    ) {
        self.post(EngineCommand::StartShare {
            surface,
            target,
            object,
            listener: Box::new(listener),
        });
    }

    /// The secondary dispatch surface reached the foreground.
    ///
    /// The first activation for a delegated session triggers platform
    /// initialization on that surface; a later one, with no terminal
    /// callback in between, settles the session per the configured
    /// [`HandoffResumePolicy`].
    pub fn notify_dispatch_activated(&self, surface: SurfaceContext) {
        self.post(EngineCommand::DispatchActivated { surface });
    }

    /// The initiating surface was destroyed; tear the active session
    /// down without delivering any further notifications.
    pub fn notify_surface_destroyed(&self) {
        self.post(EngineCommand::SurfaceDestroyed);
    }

    /// Stop the engine loop. The active session, if any, is released
    /// quietly.
    pub fn shutdown(&self) {
        self.post(EngineCommand::Shutdown);
    }

    fn post(&self, command: EngineCommand) {
        if self.commands.send(command).is_err() {
            warn!(error = %ShareError::EngineClosed, "engine command dropped");
        }
    }
}

/// Builder for [`ShareEngine`].
#[derive(Default)]
pub struct ShareEngineBuilder {
    config: EngineConfig,
    registry: PlatformRegistry,
    interceptors: Vec<Arc<dyn ShareInterceptor>>,
}

impl ShareEngineBuilder {
    /// An empty builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a platform factory.
    pub fn register_platform(mut self, factory: impl PlatformFactory + 'static) -> Self {
        self.registry.register(factory);
        self
    }

    /// Append an interceptor to the pipeline. Stages run in
    /// registration order.
    pub fn register_interceptor(mut self, interceptor: impl ShareInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Spawn the engine loop and return its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> ShareEngine {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let engine_loop = EngineLoop {
            commands: commands_rx,
            loopback: commands_tx.clone(),
            config: self.config,
            registry: self.registry,
            interceptors: Arc::new(self.interceptors),
            active: None,
        };
        tokio::spawn(engine_loop.run());
        ShareEngine {
            commands: commands_tx,
        }
    }
}

/// The primary lane: owns the single active-session slot.
struct EngineLoop {
    commands: UnboundedReceiver<EngineCommand>,
    /// Sender handed to pipeline tasks and platform sinks.
    loopback: UnboundedSender<EngineCommand>,
    config: EngineConfig,
    registry: PlatformRegistry,
    interceptors: Arc<Vec<Arc<dyn ShareInterceptor>>>,
    active: Option<ShareSession>,
}

impl EngineLoop {
    async fn run(mut self) {
        debug!("share engine loop started");
        while let Some(command) = self.commands.recv().await {
            match command {
                EngineCommand::StartShare {
                    surface,
                    target,
                    object,
                    listener,
                } => self.handle_start_share(surface, target, object, listener),
                EngineCommand::PipelineFinished { session, result } => {
                    self.handle_pipeline_finished(session, result).await;
                }
                EngineCommand::PlatformSignal { session, terminal } => {
                    self.handle_platform_signal(session, terminal);
                }
                EngineCommand::DispatchActivated { surface } => {
                    self.handle_dispatch_activated(surface).await;
                }
                EngineCommand::SurfaceDestroyed => self.handle_surface_destroyed(),
                EngineCommand::Shutdown => break,
            }
        }
        // Host teardown: there is nobody left to notify.
        if let Some(mut session) = self.active.take() {
            debug!(session = %session.id(), "engine stopping with an active session");
            session.terminate(None);
        }
        debug!("share engine loop stopped");
    }

    fn handle_start_share(
        &mut self,
        surface: SurfaceContext,
        target: ShareTarget,
        object: ShareObject,
        listener: Box<dyn OutcomeListener>,
    ) {
        if let Some(mut superseded) = self.active.take() {
            debug!(
                session = %superseded.id(),
                reason = %ShareError::Superseded,
                "active session superseded"
            );
            superseded.terminate(None);
        }

        let mut session = ShareSession::new(target, object, listener, surface);
        info!(session = %session.id(), %target, "share session started");
        session.begin();

        // Availability gates the whole attempt; checked before any
        // pipeline work is spent on it.
        let handle = match self.registry.resolve(target) {
            Ok(handle) => handle,
            Err(error) => {
                session.terminate(Some(ShareStatus::Failed(error)));
                return;
            }
        };
        if !handle.is_available(session.surface()) {
            session.terminate(Some(ShareStatus::Failed(ShareError::NotInstalled { target })));
            return;
        }
        session.set_handle(handle);

        let interceptors = Arc::clone(&self.interceptors);
        let cx = InterceptContext::new(session.id(), target);
        let object = session.object().clone();
        let cancel = session.cancel_token();
        let loopback = self.loopback.clone();
        let id = session.id();
        tokio::spawn(async move {
            let result = run_pipeline(&interceptors, cx, object, &cancel).await;
            let _ = loopback.send(EngineCommand::PipelineFinished {
                session: id,
                result,
            });
        });

        self.active = Some(session);
    }

    async fn handle_pipeline_finished(&mut self, session: SessionId, result: PipelineRun) {
        let Some(active) = self.active_for(session) else {
            return;
        };
        if active.state() != SessionState::Preparing {
            debug!(
                session = %active.id(),
                state = ?active.state(),
                "pipeline result in unexpected state ignored"
            );
            return;
        }
        match result {
            PipelineRun::Cancelled => {
                // The scope only fires on supersession or teardown, and
                // both clear the slot first; reaching here means the
                // cancel raced the last stage. Nothing to deliver.
                debug!(session = %active.id(), "cancelled pipeline result dropped");
            }
            PipelineRun::Failed(error) => self.finish_active(ShareStatus::Failed(error)),
            PipelineRun::Transformed(object) => {
                active.set_object(object);
                active.advance_to_awaiting_dispatch();
                if let Err(error) = validate(active.target(), active.object()) {
                    self.finish_active(ShareStatus::Failed(error));
                    return;
                }
                self.begin_dispatch().await;
            }
        }
    }

    async fn begin_dispatch(&mut self) {
        let Some(session) = self.active.as_mut() else {
            return;
        };
        let Some(handle) = session.handle() else {
            debug!(session = %session.id(), "dispatch without a platform handle ignored");
            return;
        };

        if handle.requires_dispatch_surface() {
            let request =
                DispatchRequest::share(session.id(), session.target(), session.object().clone());
            session.mark_delegated();
            session.mark_dispatched();
            info!(session = %session.id(), "delegating hand-off to a dispatch surface");
            if let Err(error) = session.surface().launch_dispatch_surface(request) {
                self.finish_active(ShareStatus::Failed(ShareError::Platform(error)));
            }
        } else {
            session.mark_dispatch_begun();
            session.mark_dispatched();
            let sink = PlatformSink::new(session.id(), self.loopback.clone());
            let surface = session.surface().clone();
            let target = session.target();
            let object = session.object().clone();
            info!(session = %session.id(), "beginning in-process hand-off");
            if let Err(error) = handle.begin_share(&surface, target, &object, sink).await {
                self.finish_active(ShareStatus::Failed(ShareError::Platform(error)));
            }
        }
    }

    async fn handle_dispatch_activated(&mut self, surface: SurfaceContext) {
        let Some(session) = self.active.as_mut() else {
            debug!("dispatch surface activated with no active session");
            return;
        };
        if session.state() != SessionState::Dispatched {
            debug!(
                session = %session.id(),
                state = ?session.state(),
                "dispatch activation in unexpected state ignored"
            );
            return;
        }
        match session.signal_dispatch_activated() {
            Some(ActivationSignal::BeginDispatch) => {
                let Some(handle) = session.handle() else {
                    debug!(session = %session.id(), "activation without a platform handle ignored");
                    return;
                };
                let sink = PlatformSink::new(session.id(), self.loopback.clone());
                let target = session.target();
                let object = session.object().clone();
                info!(
                    session = %session.id(),
                    surface = surface.describe(),
                    "beginning delegated hand-off"
                );
                if let Err(error) = handle.begin_share(&surface, target, &object, sink).await {
                    self.finish_active(ShareStatus::Failed(ShareError::Platform(error)));
                }
            }
            Some(ActivationSignal::ImplicitResume) => {
                let status = match self.config.handoff_resume_policy {
                    HandoffResumePolicy::AssumeSuccess => ShareStatus::Succeeded,
                    HandoffResumePolicy::AssumeFailure => {
                        ShareStatus::Failed(ShareError::AbandonedInTarget)
                    }
                };
                info!(
                    session = %session.id(),
                    policy = ?self.config.handoff_resume_policy,
                    "dispatch surface resumed without a terminal callback"
                );
                self.finish_active(status);
            }
            None => {}
        }
    }

    fn handle_platform_signal(&mut self, session: SessionId, terminal: TerminalSignal) {
        let Some(active) = self.active_for(session) else {
            return;
        };
        if active.state() != SessionState::Dispatched {
            debug!(
                session = %active.id(),
                state = ?active.state(),
                "terminal callback in unexpected state ignored"
            );
            return;
        }
        let status = match terminal {
            TerminalSignal::Succeeded => ShareStatus::Succeeded,
            TerminalSignal::Cancelled => ShareStatus::Cancelled,
            TerminalSignal::Failed(error) => ShareStatus::Failed(error),
        };
        self.finish_active(status);
    }

    fn handle_surface_destroyed(&mut self) {
        let Some(session) = self.active.as_mut() else {
            debug!("surface destroyed with no active session");
            return;
        };
        if session.signal_surface_destroyed() {
            info!(session = %session.id(), "initiating surface destroyed; tearing session down");
            if let Some(mut session) = self.active.take() {
                session.terminate(None);
            }
        }
    }

    /// The active session, if `session` still identifies it.
    ///
    /// Signals carrying any other id come from attempts that already
    /// ended; they are logged and dropped.
    fn active_for(&mut self, session: SessionId) -> Option<&mut ShareSession> {
        match self.active.as_mut() {
            Some(active) if active.id() == session => Some(active),
            Some(active) => {
                debug!(
                    current = %active.id(),
                    stale = %session,
                    "signal for stale session ignored"
                );
                None
            }
            None => {
                debug!(stale = %session, "signal with no active session ignored");
                None
            }
        }
    }

    fn finish_active(&mut self, status: ShareStatus) {
        if let Some(mut session) = self.active.take() {
            session.terminate(Some(status));
        }
    }
}

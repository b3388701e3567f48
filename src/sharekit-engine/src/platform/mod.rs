//! Platform handle SPI, terminal sink, and registry.
//!
//! A platform handle knows how to talk to one sharing target. The
//! engine consumes handles through this SPI only: it asks whether the
//! target is available, begins the hand-off, and then waits on the
//! sink for exactly one terminal callback - which may never come.

mod sms;

pub use sms::{SmsPlatform, SmsPlatformFactory};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use sharekit_protocol::{PlatformKind, SessionId, ShareObject, ShareTarget};

use crate::engine::EngineCommand;
use crate::error::{Result, ShareError};

/// Terminal signal reported by a platform handle.
#[derive(Debug)]
pub(crate) enum TerminalSignal {
    Succeeded,
    Cancelled,
    Failed(ShareError),
}

/// Event sink a platform handle reports its terminal outcome through.
///
/// Every sink is tagged with the session that subscribed it, so a
/// callback from a stale attempt is recognized by identity instead of
/// being confused with the current session. A handle must report at
/// most one terminal signal per `begin_share`; the sink drops any
/// extras, and the engine additionally ignores signals for sessions
/// that already terminated.
#[derive(Clone)]
pub struct PlatformSink {
    session: SessionId,
    commands: UnboundedSender<EngineCommand>,
    fired: Arc<AtomicBool>,
}

impl PlatformSink {
    pub(crate) fn new(session: SessionId, commands: UnboundedSender<EngineCommand>) -> Self {
        Self {
            session,
            commands,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The session this sink reports for.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Report that the hand-off completed.
    pub fn succeeded(&self) {
        self.emit(TerminalSignal::Succeeded);
    }

    /// Report that the user backed out of the hand-off.
    pub fn cancelled(&self) {
        self.emit(TerminalSignal::Cancelled);
    }

    /// Report that the hand-off failed.
    pub fn failed(&self, error: anyhow::Error) {
        self.emit(TerminalSignal::Failed(ShareError::Platform(error)));
    }

    fn emit(&self, terminal: TerminalSignal) {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!(session = %self.session, ?terminal, "duplicate terminal callback dropped");
            return;
        }
        let command = EngineCommand::PlatformSignal {
            session: self.session,
            terminal,
        };
        if self.commands.send(command).is_err() {
            debug!(session = %self.session, "terminal callback after engine shutdown dropped");
        }
    }
}

/// Capability interface to one external sharing target.
#[async_trait]
pub trait PlatformHandle: Send + Sync {
    /// The platform this handle talks to.
    fn platform(&self) -> PlatformKind;

    /// Whether the target application is present and usable.
    fn is_available(&self, surface: &crate::surface::SurfaceContext) -> bool;

    /// Whether the hand-off needs its own foreground surface.
    ///
    /// When `true`, the engine delegates surface activation to the
    /// presentation layer and calls [`Self::begin_share`] only once the
    /// dispatch surface reports in; when `false`, `begin_share` runs
    /// immediately against the initiating surface.
    fn requires_dispatch_surface(&self) -> bool;

    /// Begin the hand-off.
    ///
    /// The terminal result is reported through `sink`, possibly long
    /// after this method returns - or never. An `Err` return means the
    /// hand-off could not be started at all.
    async fn begin_share(
        &self,
        surface: &crate::surface::SurfaceContext,
        target: ShareTarget,
        object: &ShareObject,
        sink: PlatformSink,
    ) -> anyhow::Result<()>;
}

/// Creates platform handles for the targets it supports.
pub trait PlatformFactory: Send + Sync {
    /// The platform the produced handles talk to.
    fn platform(&self) -> PlatformKind;

    /// Whether this factory serves the given target.
    fn supports(&self, target: ShareTarget) -> bool;

    /// Create a fresh handle.
    fn create(&self) -> Arc<dyn PlatformHandle>;
}

/// Registry of platform factories, consulted at dispatch time.
#[derive(Default)]
pub struct PlatformRegistry {
    factories: Vec<Box<dyn PlatformFactory>>,
}

impl PlatformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Factories are consulted in registration
    /// order; the first one supporting a target wins.
    pub fn register(&mut self, factory: impl PlatformFactory + 'static) {
        self.factories.push(Box::new(factory));
    }

    /// Resolve a handle for `target`.
    pub fn resolve(&self, target: ShareTarget) -> Result<Arc<dyn PlatformHandle>> {
        self.factories
            .iter()
            .find(|factory| factory.supports(target))
            .map(|factory| factory.create())
            .ok_or(ShareError::NotInstalled { target })
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_resolves_to_not_installed() {
        let registry = PlatformRegistry::new();
        let err = registry.resolve(ShareTarget::Sms).err().expect("no factory");
        assert!(matches!(
            err,
            ShareError::NotInstalled {
                target: ShareTarget::Sms
            }
        ));
    }

    #[test]
    fn test_registry_resolves_supported_target() {
        let mut registry = PlatformRegistry::new();
        registry.register(SmsPlatformFactory);
        assert_eq!(registry.len(), 1);
        let handle = registry.resolve(ShareTarget::Sms).expect("sms handle");
        assert_eq!(handle.platform(), PlatformKind::System);
        assert!(registry.resolve(ShareTarget::MicroblogFeed).is_err());
    }
}

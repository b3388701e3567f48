//! Surface capability trait consumed by the engine.
//!
//! The engine never renders anything itself. Everything it needs from
//! the presentation layer - bringing up the secondary dispatch surface
//! for a delegated hand-off, or opening an external URI for in-process
//! system targets - goes through [`ShareSurface`].

use std::sync::Arc;

use sharekit_protocol::DispatchRequest;

/// Capability handle for a foreground surface.
///
/// The session holds its surface handles only while it is alive and
/// drops them on termination; hosts must not rely on the engine to
/// keep a surface reachable.
pub trait ShareSurface: Send + Sync {
    /// Human-readable label used in logs.
    fn describe(&self) -> &str;

    /// Bring up the secondary dispatch surface for a delegated
    /// hand-off. The surface forwards its own foreground transition
    /// back into the engine via `notify_dispatch_activated`.
    fn launch_dispatch_surface(&self, request: DispatchRequest) -> anyhow::Result<()>;

    /// Open an external URI (system SMS composer, browser, ...).
    fn launch_external(&self, uri: &str) -> anyhow::Result<()>;
}

/// Shared handle to a [`ShareSurface`].
pub type SurfaceContext = Arc<dyn ShareSurface>;

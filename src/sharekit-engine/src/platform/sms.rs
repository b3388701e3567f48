//! System SMS platform.

use std::sync::Arc;

use async_trait::async_trait;

use sharekit_protocol::{PlatformKind, ShareObject, SharePayload, ShareTarget};

use crate::surface::SurfaceContext;

use super::{PlatformFactory, PlatformHandle, PlatformSink};

/// In-process handle for [`ShareTarget::Sms`].
///
/// Composes an `smsto:` URI from the payload and opens it through the
/// initiating surface; the system composer takes it from there, so the
/// hand-off is reported successful as soon as the composer opens.
pub struct SmsPlatform;

#[async_trait]
impl PlatformHandle for SmsPlatform {
    fn platform(&self) -> PlatformKind {
        PlatformKind::System
    }

    fn is_available(&self, _surface: &SurfaceContext) -> bool {
        true
    }

    fn requires_dispatch_surface(&self) -> bool {
        false
    }

    async fn begin_share(
        &self,
        surface: &SurfaceContext,
        _target: ShareTarget,
        object: &ShareObject,
        sink: PlatformSink,
    ) -> anyhow::Result<()> {
        let SharePayload::Sms { phone, body } = &object.payload else {
            anyhow::bail!("sms platform requires an sms payload, got {}", object.payload.kind());
        };
        if phone.trim().is_empty() {
            anyhow::bail!("empty recipient");
        }

        let uri = if body.is_empty() {
            format!("smsto:{phone}")
        } else {
            format!("smsto:{phone}?body={}", urlencoding::encode(body))
        };
        surface.launch_external(&uri)?;
        sink.succeeded();
        Ok(())
    }
}

/// Factory for [`SmsPlatform`].
pub struct SmsPlatformFactory;

impl PlatformFactory for SmsPlatformFactory {
    fn platform(&self) -> PlatformKind {
        PlatformKind::System
    }

    fn supports(&self, target: ShareTarget) -> bool {
        target == ShareTarget::Sms
    }

    fn create(&self) -> Arc<dyn PlatformHandle> {
        Arc::new(SmsPlatform)
    }
}

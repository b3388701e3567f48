//! Interceptor SPI and the cancellable transform pipeline.
//!
//! Interceptors run strictly in registration order on a background
//! task, so a slow stage (a thumbnail download, say) never blocks the
//! surface that initiated the share. The pipeline's result is posted
//! back onto the primary lane before dispatch.

mod thumbnail;

pub use thumbnail::ThumbnailInterceptor;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sharekit_protocol::{SessionId, ShareObject, ShareTarget};

use crate::error::ShareError;

/// Context available to pipeline stages.
#[derive(Debug, Clone)]
pub struct InterceptContext {
    session: SessionId,
    target: ShareTarget,
}

impl InterceptContext {
    pub(crate) fn new(session: SessionId, target: ShareTarget) -> Self {
        Self { session, target }
    }

    /// The session this pipeline run belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The target the transformed object will be dispatched to.
    pub fn target(&self) -> ShareTarget {
        self.target
    }
}

/// One stage of the share transform pipeline.
#[async_trait]
pub trait ShareInterceptor: Send + Sync {
    /// Stage name, used for error classification and logs.
    fn name(&self) -> &str;

    /// Transform the object.
    ///
    /// Return `Ok(Some(replacement))` to replace the object for the
    /// following stages, or `Ok(None)` to pass the previous object
    /// forward unchanged. Implementations must not retain the object
    /// beyond the call.
    async fn intercept(
        &self,
        cx: &InterceptContext,
        object: &ShareObject,
    ) -> anyhow::Result<Option<ShareObject>>;
}

/// Result of one pipeline run.
#[derive(Debug)]
pub(crate) enum PipelineRun {
    /// Every stage ran; this is the transformed object.
    Transformed(ShareObject),
    /// The session's scope was cancelled; no partial result.
    Cancelled,
    /// A stage failed and the remaining chain was aborted.
    Failed(ShareError),
}

/// Run the interceptor chain over `object`.
///
/// The cancellation token is checked before every stage; a cancelled
/// scope stops the run before the next interceptor executes.
pub(crate) async fn run_pipeline(
    interceptors: &[Arc<dyn ShareInterceptor>],
    cx: InterceptContext,
    mut object: ShareObject,
    cancel: &CancellationToken,
) -> PipelineRun {
    for interceptor in interceptors {
        if cancel.is_cancelled() {
            debug!(
                session = %cx.session(),
                stage = interceptor.name(),
                "pipeline cancelled before next stage"
            );
            return PipelineRun::Cancelled;
        }
        match interceptor.intercept(&cx, &object).await {
            Ok(Some(replacement)) => object = replacement,
            Ok(None) => {}
            Err(cause) => {
                return PipelineRun::Failed(ShareError::Interceptor {
                    stage: interceptor.name().to_string(),
                    cause,
                });
            }
        }
    }
    PipelineRun::Transformed(object)
}

//! Pipeline ordering, carry-forward, abort, and cancellation tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use sharekit_protocol::{SessionId, ShareObject, ShareTarget};

use crate::error::ShareError;
use crate::interceptor::{InterceptContext, PipelineRun, ShareInterceptor, run_pipeline};

fn cx() -> InterceptContext {
    InterceptContext::new(SessionId::new(), ShareTarget::MessengerChat)
}

/// Replaces the object's title with this stage's tag.
struct TitleStage {
    tag: &'static str,
}

#[async_trait]
impl ShareInterceptor for TitleStage {
    fn name(&self) -> &str {
        self.tag
    }

    async fn intercept(
        &self,
        _cx: &InterceptContext,
        object: &ShareObject,
    ) -> anyhow::Result<Option<ShareObject>> {
        Ok(Some(object.clone().with_title(self.tag)))
    }
}

/// Counts invocations, changes nothing.
struct CountingStage {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ShareInterceptor for CountingStage {
    fn name(&self) -> &str {
        "counting"
    }

    async fn intercept(
        &self,
        _cx: &InterceptContext,
        _object: &ShareObject,
    ) -> anyhow::Result<Option<ShareObject>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

struct FailingStage;

#[async_trait]
impl ShareInterceptor for FailingStage {
    fn name(&self) -> &str {
        "failing"
    }

    async fn intercept(
        &self,
        _cx: &InterceptContext,
        _object: &ShareObject,
    ) -> anyhow::Result<Option<ShareObject>> {
        anyhow::bail!("stage blew up")
    }
}

#[tokio::test]
async fn test_empty_chain_passes_object_through() {
    let object = ShareObject::text("hi");
    let result = run_pipeline(&[], cx(), object.clone(), &CancellationToken::new()).await;
    match result {
        PipelineRun::Transformed(out) => assert_eq!(out, object),
        other => panic!("unexpected run result: {other:?}"),
    }
}

#[tokio::test]
async fn test_stages_run_in_order_and_carry_forward() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Arc<dyn ShareInterceptor>> = vec![
        Arc::new(TitleStage { tag: "first" }),
        Arc::new(CountingStage {
            calls: Arc::clone(&calls),
        }),
        Arc::new(TitleStage { tag: "second" }),
    ];

    let result = run_pipeline(
        &stages,
        cx(),
        ShareObject::text("hi"),
        &CancellationToken::new(),
    )
    .await;

    match result {
        PipelineRun::Transformed(out) => {
            // The counting stage returned None; the first stage's
            // object carried forward into the last one.
            assert_eq!(out.title.as_deref(), Some("second"));
        }
        other => panic!("unexpected run result: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stage_error_aborts_remaining_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Arc<dyn ShareInterceptor>> = vec![
        Arc::new(FailingStage),
        Arc::new(CountingStage {
            calls: Arc::clone(&calls),
        }),
    ];

    let result = run_pipeline(
        &stages,
        cx(),
        ShareObject::text("hi"),
        &CancellationToken::new(),
    )
    .await;

    match result {
        PipelineRun::Failed(ShareError::Interceptor { stage, cause }) => {
            assert_eq!(stage, "failing");
            assert!(cause.to_string().contains("stage blew up"));
        }
        other => panic!("unexpected run result: {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancelled_scope_stops_before_next_stage() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Arc<dyn ShareInterceptor>> = vec![Arc::new(CountingStage {
        calls: Arc::clone(&calls),
    })];

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = run_pipeline(&stages, cx(), ShareObject::text("hi"), &cancel).await;

    assert!(matches!(result, PipelineRun::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

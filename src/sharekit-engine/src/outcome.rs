//! Share outcomes and the listener that receives them.

use sharekit_protocol::{ShareObject, ShareTarget};

use crate::error::ShareError;

/// Progress of a share attempt as seen by the caller.
#[derive(Debug)]
pub enum ShareStatus {
    /// The session was accepted and is being prepared.
    Started,
    /// The platform completed the hand-off.
    Succeeded,
    /// The user backed out of the hand-off.
    Cancelled,
    /// The attempt failed; see the carried error.
    Failed(ShareError),
}

impl ShareStatus {
    /// Whether this status ends the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started)
    }

    /// Short status name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }
}

/// One notification delivered to an [`OutcomeListener`].
///
/// Carries the target and the object snapshot at the moment the status
/// was produced. A listener observes at most one `Started` outcome
/// followed by exactly one terminal outcome, unless its session is
/// superseded, in which case the terminal outcome never arrives.
#[derive(Debug)]
pub struct ShareOutcome {
    /// The share target of the session.
    pub target: ShareTarget,
    /// Object snapshot at the time the status was produced.
    pub object: ShareObject,
    /// The status being reported.
    pub status: ShareStatus,
}

impl ShareOutcome {
    /// A non-terminal progress notification.
    pub fn started(target: ShareTarget, object: ShareObject) -> Self {
        Self {
            target,
            object,
            status: ShareStatus::Started,
        }
    }

    /// A successful terminal notification.
    pub fn succeeded(target: ShareTarget, object: ShareObject) -> Self {
        Self {
            target,
            object,
            status: ShareStatus::Succeeded,
        }
    }

    /// A cancelled terminal notification.
    pub fn cancelled(target: ShareTarget, object: ShareObject) -> Self {
        Self {
            target,
            object,
            status: ShareStatus::Cancelled,
        }
    }

    /// A failed terminal notification.
    pub fn failed(target: ShareTarget, object: ShareObject, error: ShareError) -> Self {
        Self {
            target,
            object,
            status: ShareStatus::Failed(error),
        }
    }

    /// Whether this outcome ends the session.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Receives the outcome notifications of one share session.
///
/// Listeners are invoked on the engine's primary lane; implementations
/// should hand heavy work off instead of blocking the engine.
pub trait OutcomeListener: Send {
    /// Called for the `Started` notification and once more for the
    /// terminal notification.
    fn on_outcome(&mut self, outcome: ShareOutcome);
}

impl OutcomeListener for tokio::sync::mpsc::UnboundedSender<ShareOutcome> {
    fn on_outcome(&mut self, outcome: ShareOutcome) {
        if self.send(outcome).is_err() {
            tracing::debug!("outcome receiver dropped; notification discarded");
        }
    }
}

/// Adapter turning a closure into an [`OutcomeListener`].
pub struct FnListener<F>(F);

impl<F> FnListener<F>
where
    F: FnMut(ShareOutcome) + Send,
{
    /// Wrap a closure as a listener.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> OutcomeListener for FnListener<F>
where
    F: FnMut(ShareOutcome) + Send,
{
    fn on_outcome(&mut self, outcome: ShareOutcome) {
        (self.0)(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_is_not_terminal() {
        let outcome = ShareOutcome::started(ShareTarget::Sms, ShareObject::sms("5550100", "hi"));
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.status.name(), "started");
    }

    #[test]
    fn test_terminal_statuses() {
        let object = ShareObject::text("hi");
        assert!(ShareOutcome::succeeded(ShareTarget::Clipboard, object.clone()).is_terminal());
        assert!(ShareOutcome::cancelled(ShareTarget::Clipboard, object.clone()).is_terminal());
        assert!(
            ShareOutcome::failed(
                ShareTarget::Clipboard,
                object,
                ShareError::Validation("empty text".to_string()),
            )
            .is_terminal()
        );
    }

    #[test]
    fn test_fn_listener_invokes_closure() {
        let mut seen = Vec::new();
        {
            let mut listener = FnListener::new(|outcome: ShareOutcome| {
                seen.push(outcome.status.name());
            });
            listener.on_outcome(ShareOutcome::started(
                ShareTarget::Sms,
                ShareObject::sms("5550100", "hi"),
            ));
        }
        assert_eq!(seen, vec!["started"]);
    }
}

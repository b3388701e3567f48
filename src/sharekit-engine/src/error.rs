//! Error types for the share engine.

use thiserror::Error;

use sharekit_protocol::ShareTarget;

/// Result type alias for share-engine operations.
pub type Result<T> = std::result::Result<T, ShareError>;

/// Terminal error taxonomy for share sessions.
///
/// Every variant except [`ShareError::Superseded`] and
/// [`ShareError::EngineClosed`] can reach a listener inside a
/// `ShareStatus::Failed` outcome. None of them is retried by the
/// engine; the caller may start a fresh share.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Object/target mismatch or a missing required field.
    ///
    /// Raised before dispatch and before any UI-producing side effect.
    #[error("invalid share object: {0}")]
    Validation(String),

    /// The target application is not present or no platform is
    /// registered for the target.
    #[error("target application not available: {target}")]
    NotInstalled {
        /// The unavailable target.
        target: ShareTarget,
    },

    /// A pipeline stage failed; the remaining chain was aborted.
    #[error("interceptor stage '{stage}' failed: {cause}")]
    Interceptor {
        /// Name of the failing stage.
        stage: String,
        /// Underlying cause.
        cause: anyhow::Error,
    },

    /// The platform handle reported a failure, passed through verbatim.
    #[error("platform hand-off failed: {0}")]
    Platform(anyhow::Error),

    /// The dispatch surface resumed without a terminal callback and the
    /// engine is configured to treat that as the user staying in the
    /// target application.
    #[error("share hand-off abandoned in the target application")]
    AbandonedInTarget,

    /// The session was replaced by a newer `start_share` call.
    ///
    /// Internal classification only: a superseded session receives no
    /// outcome at all, so this variant is never delivered to a listener.
    #[error("share session superseded")]
    Superseded,

    /// The engine loop is no longer running.
    #[error("share engine is closed")]
    EngineClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ShareError::Validation("empty recipient".to_string());
        assert_eq!(err.to_string(), "invalid share object: empty recipient");

        let err = ShareError::NotInstalled {
            target: ShareTarget::MicroblogFeed,
        };
        assert_eq!(
            err.to_string(),
            "target application not available: microblog_feed"
        );
    }

    #[test]
    fn test_interceptor_error_carries_cause() {
        let err = ShareError::Interceptor {
            stage: "thumbnail".to_string(),
            cause: anyhow::anyhow!("connection refused"),
        };
        let message = err.to_string();
        assert!(message.contains("thumbnail"));
        assert!(message.contains("connection refused"));
    }
}

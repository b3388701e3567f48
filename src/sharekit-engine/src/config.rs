//! Engine configuration.

use serde::{Deserialize, Serialize};

/// How to settle a hand-off whose platform never reported back.
///
/// When a share is delegated to another application, the terminal
/// callback may simply never arrive: the dispatch surface returns to
/// the foreground and nothing else happens. Whether that means the
/// share went through or the user bailed out is inherently ambiguous,
/// so the interpretation is a configuration choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffResumePolicy {
    /// The target application accepted the hand-off and the user simply
    /// returned; report success.
    #[default]
    AssumeSuccess,
    /// The user stayed in the other application without completing the
    /// share; report failure.
    AssumeFailure,
}

/// Configuration for a [`crate::ShareEngine`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Policy applied when a dispatch surface resumes without a
    /// terminal platform callback.
    #[serde(default)]
    pub handoff_resume_policy: HandoffResumePolicy,
}

impl EngineConfig {
    /// Configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resume-without-callback policy.
    pub fn with_handoff_resume_policy(mut self, policy: HandoffResumePolicy) -> Self {
        self.handoff_resume_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_optimistic() {
        assert_eq!(
            EngineConfig::new().handoff_resume_policy,
            HandoffResumePolicy::AssumeSuccess
        );
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"handoff_resume_policy":"assume_failure"}"#).expect("parse");
        assert_eq!(
            config.handoff_resume_policy,
            HandoffResumePolicy::AssumeFailure
        );
    }

    #[test]
    fn test_policy_defaults_when_absent() {
        let config: EngineConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(
            config.handoff_resume_policy,
            HandoffResumePolicy::AssumeSuccess
        );
    }
}

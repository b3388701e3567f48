//! Share targets and the platforms that own them.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::object::SharePayload;

/// Integration point that owns one or more share targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlatformKind {
    /// Messaging application (chat, timeline, and favorites sub-channels).
    Messenger,
    /// Microblogging application.
    Microblog,
    /// Targets served by the host system itself.
    System,
}

/// Where a share is delivered: an integration point plus sub-channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShareTarget {
    /// A direct chat conversation in the messaging app.
    MessengerChat,
    /// The messaging app's public timeline.
    MessengerTimeline,
    /// The messaging app's favorites/bookmarks.
    MessengerFavorites,
    /// The microblog feed.
    MicroblogFeed,
    /// The system SMS composer.
    Sms,
    /// The system clipboard.
    Clipboard,
}

impl ShareTarget {
    /// The platform that serves this target.
    pub fn platform(&self) -> PlatformKind {
        match self {
            Self::MessengerChat | Self::MessengerTimeline | Self::MessengerFavorites => {
                PlatformKind::Messenger
            }
            Self::MicroblogFeed => PlatformKind::Microblog,
            Self::Sms | Self::Clipboard => PlatformKind::System,
        }
    }

    /// Whether this target can deliver the given payload kind.
    ///
    /// Incompatibility is reported by the engine as a validation
    /// failure, never a panic.
    pub fn accepts(&self, payload: &SharePayload) -> bool {
        match self {
            Self::Sms => matches!(payload, SharePayload::Sms { .. }),
            Self::Clipboard => {
                matches!(payload, SharePayload::Text { .. } | SharePayload::Link { .. })
            }
            Self::MessengerChat
            | Self::MessengerTimeline
            | Self::MessengerFavorites
            | Self::MicroblogFeed => !matches!(payload, SharePayload::Sms { .. }),
        }
    }
}

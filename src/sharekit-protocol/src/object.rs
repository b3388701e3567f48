//! Share payloads and the object that carries them through the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Path or URI pointing at a piece of media.
///
/// A locator is either a local filesystem path or a remote `http(s)`
/// URI; pipeline stages that localize media (e.g. thumbnail fetch)
/// rewrite remote locators to local ones before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaLocator(String);

impl MediaLocator {
    /// Create a locator from a path or URI.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Whether the locator points at a remote HTTP(S) resource.
    pub fn is_remote(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// The locator as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaLocator {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MediaLocator {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// What is being shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SharePayload {
    /// Plain text.
    Text {
        /// The text to share.
        text: String,
    },
    /// A local or remote image.
    Image {
        /// The image itself.
        image: MediaLocator,
        /// Optional preview thumbnail.
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail: Option<MediaLocator>,
    },
    /// An arbitrary file.
    File {
        /// File location.
        path: MediaLocator,
        /// MIME type, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        mime: Option<String>,
    },
    /// A structured link.
    Link {
        /// Link destination.
        url: String,
        /// Optional preview thumbnail.
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail: Option<MediaLocator>,
    },
    /// An SMS draft.
    Sms {
        /// Recipient phone number.
        phone: String,
        /// Message body.
        body: String,
    },
}

impl SharePayload {
    /// Short kind name used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::File { .. } => "file",
            Self::Link { .. } => "link",
            Self::Sms { .. } => "sms",
        }
    }

    /// The thumbnail locator, for payload kinds that carry one.
    pub fn thumbnail(&self) -> Option<&MediaLocator> {
        match self {
            Self::Image { thumbnail, .. } | Self::Link { thumbnail, .. } => thumbnail.as_ref(),
            Self::Text { .. } | Self::File { .. } | Self::Sms { .. } => None,
        }
    }

    /// Replace the thumbnail locator.
    ///
    /// Returns `false` (leaving the payload untouched) for kinds that
    /// do not carry a thumbnail.
    pub fn set_thumbnail(&mut self, locator: MediaLocator) -> bool {
        match self {
            Self::Image { thumbnail, .. } | Self::Link { thumbnail, .. } => {
                *thumbnail = Some(locator);
                true
            }
            Self::Text { .. } | Self::File { .. } | Self::Sms { .. } => false,
        }
    }
}

/// The value moving through the share pipeline.
///
/// Mutable only by pipeline stages; once the pipeline completes it is
/// treated as read-only input to the platform handle. It has no
/// identity beyond its value and is owned exclusively by the active
/// session while in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareObject {
    /// The payload being shared.
    pub payload: SharePayload,
    /// Optional display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional display description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ShareObject {
    fn with_payload(payload: SharePayload) -> Self {
        Self {
            payload,
            title: None,
            description: None,
        }
    }

    /// A plain-text share.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_payload(SharePayload::Text { text: text.into() })
    }

    /// An image share.
    pub fn image(image: impl Into<MediaLocator>) -> Self {
        Self::with_payload(SharePayload::Image {
            image: image.into(),
            thumbnail: None,
        })
    }

    /// A file share.
    pub fn file(path: impl Into<MediaLocator>) -> Self {
        Self::with_payload(SharePayload::File {
            path: path.into(),
            mime: None,
        })
    }

    /// A structured-link share.
    pub fn link(url: impl Into<String>) -> Self {
        Self::with_payload(SharePayload::Link {
            url: url.into(),
            thumbnail: None,
        })
    }

    /// An SMS share.
    pub fn sms(phone: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_payload(SharePayload::Sms {
            phone: phone.into(),
            body: body.into(),
        })
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the display description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the preview thumbnail, for payload kinds that carry one.
    pub fn with_thumbnail(mut self, locator: impl Into<MediaLocator>) -> Self {
        self.payload.set_thumbnail(locator.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_locator_remote_detection() {
        assert!(MediaLocator::new("https://cdn.example.com/a.png").is_remote());
        assert!(MediaLocator::new("HTTP://cdn.example.com/a.png").is_remote());
        assert!(!MediaLocator::new("/tmp/a.png").is_remote());
        assert!(!MediaLocator::new("file:///tmp/a.png").is_remote());
    }

    #[test]
    fn test_set_thumbnail_only_where_supported() {
        let mut link = ShareObject::link("https://example.com").payload;
        assert!(link.set_thumbnail(MediaLocator::new("/tmp/t.png")));
        assert_eq!(link.thumbnail().map(MediaLocator::as_str), Some("/tmp/t.png"));

        let mut sms = ShareObject::sms("5550100", "hi").payload;
        assert!(!sms.set_thumbnail(MediaLocator::new("/tmp/t.png")));
        assert!(sms.thumbnail().is_none());
    }
}

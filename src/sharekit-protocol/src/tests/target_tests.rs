//! Comprehensive tests for ShareTarget compatibility.

use crate::object::ShareObject;
use crate::target::{PlatformKind, ShareTarget};

#[test]
fn test_every_target_has_a_platform() {
    let targets = [
        ShareTarget::MessengerChat,
        ShareTarget::MessengerTimeline,
        ShareTarget::MessengerFavorites,
        ShareTarget::MicroblogFeed,
        ShareTarget::Sms,
        ShareTarget::Clipboard,
    ];
    for target in targets {
        // Exhaustiveness is the point; platform() must not panic.
        let _ = target.platform();
    }
}

#[test]
fn test_clipboard_accepts_text_and_links_only() {
    let clipboard = ShareTarget::Clipboard;
    assert!(clipboard.accepts(&ShareObject::text("hi").payload));
    assert!(clipboard.accepts(&ShareObject::link("https://x").payload));
    assert!(!clipboard.accepts(&ShareObject::image("/a.png").payload));
    assert!(!clipboard.accepts(&ShareObject::file("/a.pdf").payload));
    assert!(!clipboard.accepts(&ShareObject::sms("5550100", "hi").payload));
}

#[test]
fn test_messenger_targets_reject_sms_payloads() {
    let sms = ShareObject::sms("5550100", "hi").payload;
    assert!(!ShareTarget::MessengerChat.accepts(&sms));
    assert!(!ShareTarget::MessengerTimeline.accepts(&sms));
    assert!(!ShareTarget::MessengerFavorites.accepts(&sms));
    assert!(!ShareTarget::MicroblogFeed.accepts(&sms));
}

#[test]
fn test_messenger_targets_accept_rich_payloads() {
    let targets = [
        ShareTarget::MessengerChat,
        ShareTarget::MessengerTimeline,
        ShareTarget::MicroblogFeed,
    ];
    for target in targets {
        assert!(target.accepts(&ShareObject::text("hi").payload));
        assert!(target.accepts(&ShareObject::image("/a.png").payload));
        assert!(target.accepts(&ShareObject::link("https://x").payload));
        assert_ne!(target.platform(), PlatformKind::System);
    }
}

#[test]
fn test_target_serde_names() {
    let json = serde_json::to_string(&ShareTarget::MessengerTimeline).expect("serialize");
    assert_eq!(json, "\"messenger_timeline\"");
    let parsed: ShareTarget = serde_json::from_str("\"sms\"").expect("deserialize");
    assert_eq!(parsed, ShareTarget::Sms);
}

#[test]
fn test_target_display() {
    assert_eq!(ShareTarget::MicroblogFeed.to_string(), "microblog_feed");
    assert_eq!(PlatformKind::Messenger.to_string(), "messenger");
}

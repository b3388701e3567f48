//! Pre-dispatch parameter validation.
//!
//! Runs on the primary lane after the pipeline and before any
//! UI-producing side effect; a failure here terminates the session
//! with `ShareError::Validation` and the platform handle is never
//! invoked.

use sharekit_protocol::{ShareObject, SharePayload, ShareTarget};

use crate::error::{Result, ShareError};

/// Check that `object` can be dispatched to `target`.
pub fn validate(target: ShareTarget, object: &ShareObject) -> Result<()> {
    if !target.accepts(&object.payload) {
        return Err(ShareError::Validation(format!(
            "{} payload is not deliverable to target {target}",
            object.payload.kind()
        )));
    }

    match &object.payload {
        SharePayload::Text { text } => {
            if text.is_empty() {
                return Err(ShareError::Validation("empty text".to_string()));
            }
        }
        SharePayload::Image { image, .. } => {
            if image.as_str().is_empty() {
                return Err(ShareError::Validation("empty image locator".to_string()));
            }
        }
        SharePayload::File { path, .. } => {
            if path.as_str().is_empty() {
                return Err(ShareError::Validation("empty file path".to_string()));
            }
        }
        SharePayload::Link { url, .. } => {
            if url.is_empty() {
                return Err(ShareError::Validation("empty url".to_string()));
            }
        }
        SharePayload::Sms { phone, .. } => {
            if phone.trim().is_empty() {
                return Err(ShareError::Validation("empty recipient".to_string()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_objects_pass() {
        assert!(validate(ShareTarget::MessengerChat, &ShareObject::text("hi")).is_ok());
        assert!(validate(ShareTarget::Sms, &ShareObject::sms("5550100", "hi")).is_ok());
        assert!(validate(ShareTarget::Clipboard, &ShareObject::link("https://x")).is_ok());
    }

    #[test]
    fn test_empty_recipient_is_rejected() {
        let err = validate(ShareTarget::Sms, &ShareObject::sms("", "hi")).expect_err("rejected");
        match err {
            ShareError::Validation(message) => assert_eq!(message, "empty recipient"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_target_mismatch_is_rejected() {
        let err = validate(ShareTarget::Sms, &ShareObject::text("hi")).expect_err("rejected");
        assert!(matches!(err, ShareError::Validation(_)));

        let err = validate(ShareTarget::MessengerTimeline, &ShareObject::sms("5550100", "hi"))
            .expect_err("rejected");
        assert!(matches!(err, ShareError::Validation(_)));
    }

    #[test]
    fn test_missing_required_fields_are_rejected() {
        assert!(validate(ShareTarget::MessengerChat, &ShareObject::text("")).is_err());
        assert!(validate(ShareTarget::MessengerChat, &ShareObject::image("")).is_err());
        assert!(validate(ShareTarget::MessengerChat, &ShareObject::file("")).is_err());
        assert!(validate(ShareTarget::Clipboard, &ShareObject::link("")).is_err());
    }
}

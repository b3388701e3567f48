//! Dispatch envelope handed to a secondary surface.
//!
//! When a platform needs its own foreground surface to complete a
//! hand-off, the engine delegates activation to the presentation layer
//! together with a [`DispatchRequest`] describing exactly what the
//! surface should do once it reaches the foreground.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::object::ShareObject;
use crate::session_id::SessionId;
use crate::target::ShareTarget;

/// What a dispatch surface is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum DispatchAction {
    /// Begin a platform share hand-off.
    Share,
}

/// Everything a dispatch surface needs to begin a platform hand-off.
///
/// The `session` field ties the request to the share session that
/// produced it; the engine drops activations whose session no longer
/// matches the active one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// Requested action.
    pub action: DispatchAction,
    /// Owning share session.
    pub session: SessionId,
    /// Share target to hand off to.
    pub target: ShareTarget,
    /// Object snapshot at the time of delegation.
    pub object: ShareObject,
}

impl DispatchRequest {
    /// Build a share dispatch request.
    pub fn share(session: SessionId, target: ShareTarget, object: ShareObject) -> Self {
        Self {
            action: DispatchAction::Share,
            session,
            target,
            object,
        }
    }
}

//! HTTP request handlers.
//!
//! Shared authorization helpers live here; every signaling handler first
//! resolves the owning live class through the directory, then checks the
//! caller's relationship to it, then touches the store.

pub mod health;
pub mod participation;
pub mod signaling;

pub use health::health_check;
pub use participation::{join_live_class, leave_live_class};
pub use signaling::{
    fetch_answer, fetch_ice_candidates, fetch_offer, publish_answer, publish_ice_candidate,
    publish_offer,
};

use crate::auth::{Claims, Role};
use crate::errors::SignalingError;
use crate::live_class::LiveClassSummary;
use crate::routes::AppState;
use tracing::warn;

/// Resolve the live class owning `class_id`, or fail with NotFound.
pub(crate) async fn resolve_class(
    state: &AppState,
    class_id: &str,
) -> Result<LiveClassSummary, SignalingError> {
    state
        .directory
        .find(class_id)
        .await?
        .ok_or_else(|| SignalingError::NotFound("Live class not found".to_string()))
}

/// Broadcaster check: the class's registered educator, or an administrator.
///
/// Gates publish-offer and fetch-answer.
pub(crate) fn require_broadcaster(
    claims: &Claims,
    class: &LiveClassSummary,
) -> Result<(), SignalingError> {
    if claims.is_admin() || (claims.role == Role::Educator && class.is_educator(&claims.sub)) {
        return Ok(());
    }

    warn!(
        target: "signaling.handlers",
        user_id = %claims.sub,
        class_id = %class.class_id,
        "Caller is not the broadcasting educator for this live class"
    );
    Err(SignalingError::Forbidden(
        "Only the class educator may perform this operation".to_string(),
    ))
}

/// Participant check: enrolled student, the owning educator, or an
/// administrator.
///
/// Gates fetch-offer, publish-answer and the candidate exchange.
pub(crate) fn require_participant(
    claims: &Claims,
    class: &LiveClassSummary,
) -> Result<(), SignalingError> {
    if claims.is_admin() || class.is_educator(&claims.sub) || class.is_enrolled(&claims.sub) {
        return Ok(());
    }

    warn!(
        target: "signaling.handlers",
        user_id = %claims.sub,
        class_id = %class.class_id,
        "Caller is not authorized against this live class"
    );
    Err(SignalingError::Forbidden(
        "You must be enrolled in the course to access this live class".to_string(),
    ))
}

//! Join/leave handlers.
//!
//! These mutate the live-class aggregate's participant list and never touch
//! the signaling store; conversely the signaling handlers never touch the
//! participant list. The two pieces of state are deliberately not
//! cross-mutated by any single call.

use super::resolve_class;
use crate::auth::Claims;
use crate::errors::SignalingError;
use crate::models::{AckResponse, JoinResponse, LiveClassView};
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Handler for `POST /api/v1/live-classes/{id}/join`.
///
/// Records the caller on the participant list. A repeat join within the
/// duplicate window is a no-op reported via `already_joined`; a rejoin
/// after leaving (or after the window) refreshes the record and clears the
/// departure timestamp.
///
/// # Authorization
///
/// Enrolled students and administrators only.
#[instrument(skip_all, name = "signaling.class.join", fields(class_id = %class_id))]
pub async fn join_live_class(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
) -> Result<Json<JoinResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;

    if !claims.is_admin() && !class.is_enrolled(&claims.sub) {
        warn!(
            target: "signaling.handlers",
            user_id = %claims.sub,
            class_id = %class_id,
            "Join attempt by non-enrolled caller"
        );
        return Err(SignalingError::Forbidden(
            "You must be enrolled in the course to join".to_string(),
        ));
    }

    let outcome = state
        .directory
        .record_join(&class_id, &claims.sub, Utc::now())
        .await?;

    if !outcome.already_joined {
        info!(
            target: "signaling.handlers",
            user_id = %claims.sub,
            class_id = %class_id,
            "Participant joined live class"
        );
    }

    let message = if outcome.already_joined {
        "You have already joined this live class"
    } else {
        "Successfully joined the live class"
    };

    Ok(Json(JoinResponse {
        message,
        already_joined: outcome.already_joined,
        live_class: LiveClassView {
            class_id: outcome.live_class.class_id,
            title: outcome.live_class.title,
            educator_id: outcome.live_class.educator_id,
            participants: outcome.participants,
        },
    }))
}

/// Handler for `POST /api/v1/live-classes/{id}/leave`.
///
/// Sets the caller's departure timestamp. Leaving without having joined is
/// an acknowledged no-op; only a missing live class is an error.
#[instrument(skip_all, name = "signaling.class.leave", fields(class_id = %class_id))]
pub async fn leave_live_class(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
) -> Result<Json<AckResponse>, SignalingError> {
    resolve_class(&state, &class_id).await?;

    state
        .directory
        .record_leave(&class_id, &claims.sub, Utc::now())
        .await?;

    info!(
        target: "signaling.handlers",
        user_id = %claims.sub,
        class_id = %class_id,
        "Participant left live class"
    );
    Ok(Json(AckResponse {
        message: "Left live class successfully",
    }))
}

//! WebRTC signaling handlers: offer/answer/candidate publish and poll.
//!
//! The educator publishes an offer, viewers poll for it, viewers publish
//! answers, the educator polls for them, and both sides exchange ICE
//! candidates - all over plain request/response polling, no held
//! connections. Payloads are relayed as opaque JSON; validating SDP or
//! candidate contents is the peers' problem.

use super::{require_broadcaster, require_participant, resolve_class};
use crate::auth::Claims;
use crate::errors::SignalingError;
use crate::models::{
    AckResponse, AnswerResponse, CandidatesResponse, OfferResponse, PublishAnswerRequest,
    PublishCandidateRequest, PublishOfferRequest,
};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Deserialize a publish body, mapping malformed JSON to a 400 rather than
/// Axum's default 422.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, SignalingError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(target: "signaling.handlers", error = %e, "Invalid request body");
        SignalingError::BadRequest("Invalid request body".to_string())
    })
}

/// An explicit `null` payload is as useless to the peers as a missing one.
fn require_payload(payload: &Value, field: &str) -> Result<(), SignalingError> {
    if payload.is_null() {
        return Err(SignalingError::BadRequest(format!(
            "Missing {field} payload"
        )));
    }
    Ok(())
}

/// Handler for `POST /api/v1/live-classes/{id}/offer`.
///
/// The broadcasting educator (or an admin) publishes a session description.
/// Only the latest offer is retained.
#[instrument(skip_all, name = "signaling.offer.publish", fields(class_id = %class_id))]
pub async fn publish_offer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
    body: Bytes,
) -> Result<Json<AckResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_broadcaster(&claims, &class)?;

    let request: PublishOfferRequest = parse_body(&body)?;
    require_payload(&request.offer, "offer")?;

    state.store.put_offer(&class_id, &claims.sub, request.offer);

    debug!(
        target: "signaling.handlers",
        class_id = %class_id,
        user_id = %claims.sub,
        "Offer stored"
    );
    Ok(Json(AckResponse {
        message: "Offer stored",
    }))
}

/// Handler for `GET /api/v1/live-classes/{id}/offer`.
///
/// Any authorized participant polls for the broadcaster's offer. A null
/// offer means the broadcaster has not published yet; callers poll again.
#[instrument(skip_all, name = "signaling.offer.fetch", fields(class_id = %class_id))]
pub async fn fetch_offer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
) -> Result<Json<OfferResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_participant(&claims, &class)?;

    Ok(Json(OfferResponse {
        offer: state.store.offer(&class_id),
    }))
}

/// Handler for `POST /api/v1/live-classes/{id}/answer`.
///
/// A viewer publishes its session description. At most one answer is kept
/// per viewer; resubmission replaces it.
#[instrument(skip_all, name = "signaling.answer.publish", fields(class_id = %class_id))]
pub async fn publish_answer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
    body: Bytes,
) -> Result<Json<AckResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_participant(&claims, &class)?;

    let request: PublishAnswerRequest = parse_body(&body)?;
    require_payload(&request.answer, "answer")?;

    state
        .store
        .put_answer(&class_id, &claims.sub, request.answer);

    debug!(
        target: "signaling.handlers",
        class_id = %class_id,
        user_id = %claims.sub,
        "Answer stored"
    );
    Ok(Json(AckResponse {
        message: "Answer stored",
    }))
}

/// Handler for `GET /api/v1/live-classes/{id}/answer`.
///
/// The broadcaster polls for the most recent answer across all viewers -
/// one shared slot, not one per negotiation (see
/// `SignalingStore::latest_answer`).
#[instrument(skip_all, name = "signaling.answer.fetch", fields(class_id = %class_id))]
pub async fn fetch_answer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
) -> Result<Json<AnswerResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_broadcaster(&claims, &class)?;

    Ok(Json(AnswerResponse {
        answer: state.store.latest_answer(&class_id),
    }))
}

/// Handler for `POST /api/v1/live-classes/{id}/ice-candidate`.
#[instrument(skip_all, name = "signaling.candidate.publish", fields(class_id = %class_id))]
pub async fn publish_ice_candidate(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
    body: Bytes,
) -> Result<Json<AckResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_participant(&claims, &class)?;

    let request: PublishCandidateRequest = parse_body(&body)?;
    require_payload(&request.candidate, "candidate")?;

    state
        .store
        .put_ice_candidate(&class_id, &claims.sub, request.candidate);

    Ok(Json(AckResponse {
        message: "ICE candidate stored",
    }))
}

/// Handler for `GET /api/v1/live-classes/{id}/ice-candidates`.
///
/// Returns candidates from every submitter except the caller. The poll is
/// non-destructive; callers de-duplicate repeats by payload identity.
#[instrument(skip_all, name = "signaling.candidate.fetch", fields(class_id = %class_id))]
pub async fn fetch_ice_candidates(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(class_id): Path<String>,
) -> Result<Json<CandidatesResponse>, SignalingError> {
    let class = resolve_class(&state, &class_id).await?;
    require_participant(&claims, &class)?;

    Ok(Json(CandidatesResponse {
        candidates: state.store.ice_candidates(&class_id, &claims.sub),
    }))
}

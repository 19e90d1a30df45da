//! Request and response types for the signaling API.
//!
//! Offer, answer and candidate payloads are opaque JSON blobs; the service
//! relays them without interpreting their contents.

use crate::live_class::ParticipantRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/v1/live-classes/{id}/offer`.
#[derive(Debug, Deserialize)]
pub struct PublishOfferRequest {
    pub offer: Value,
}

/// Body of `POST /api/v1/live-classes/{id}/answer`.
#[derive(Debug, Deserialize)]
pub struct PublishAnswerRequest {
    pub answer: Value,
}

/// Body of `POST /api/v1/live-classes/{id}/ice-candidate`.
#[derive(Debug, Deserialize)]
pub struct PublishCandidateRequest {
    pub candidate: Value,
}

/// Generic acknowledgement for publish and leave calls.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

/// Response of `GET /api/v1/live-classes/{id}/offer`.
///
/// `offer` is null when the broadcaster has not published yet (or the
/// session was evicted); that is a success, not an error.
#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub offer: Option<Value>,
}

/// Response of `GET /api/v1/live-classes/{id}/answer`.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: Option<Value>,
}

/// Response of `GET /api/v1/live-classes/{id}/ice-candidates`.
///
/// Candidates from every submitter except the caller, in original
/// submission order. Polling is non-destructive, so callers de-duplicate.
#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<Value>,
}

/// Live-class state returned to a joining participant.
#[derive(Debug, Serialize)]
pub struct LiveClassView {
    pub class_id: String,
    pub title: String,
    pub educator_id: String,
    pub participants: Vec<ParticipantRecord>,
}

/// Response of `POST /api/v1/live-classes/{id}/join`.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub message: &'static str,
    pub already_joined: bool,
    pub live_class: LiveClassView,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Signaling sessions currently resident in memory.
    pub resident_sessions: usize,
}

//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, validates it as
//! an HS256 JWT against the platform's shared secret, and injects the
//! caller's [`Claims`] into request extensions for downstream handlers.
//!
//! The platform mints these tokens at login; this service only verifies
//! them. Role and ownership checks against a specific live class happen in
//! the handlers, not here.

use crate::config::Config;
use crate::errors::SignalingError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Platform roles carried in caller tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Educator,
    Admin,
}

/// Claims carried by caller JWTs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's user identifier.
    pub sub: String,
    /// Caller's platform role.
    pub role: Role,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Whether the caller holds the administrator role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway_seconds;
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the caller's claims.
    pub fn validate(&self, token: &str) -> Result<Claims, SignalingError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(target: "signaling.middleware.auth", error = %e, "JWT validation failed");
                SignalingError::InvalidToken("Invalid or expired token".to_string())
            })
    }
}

/// Extract Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, SignalingError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "signaling.middleware.auth", "Missing Authorization header");
            SignalingError::InvalidToken("Missing Authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "signaling.middleware.auth", "Invalid Authorization header format");
        SignalingError::InvalidToken("Invalid Authorization header format".to_string())
    })
}

/// Authentication middleware for caller tokens.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing or invalid
/// - Continues to the next handler with [`Claims`] in extensions otherwise
#[instrument(skip_all, name = "signaling.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, SignalingError> {
    let token = extract_bearer_token(&req)?;
    let claims = state.validate(token)?;

    // Store claims in request extensions for downstream handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

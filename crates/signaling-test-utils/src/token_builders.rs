//! Builder for test caller tokens.
//!
//! Mints HS256 JWTs matching the service's `Claims` shape, signed with
//! [`crate::server_harness::TEST_JWT_SECRET`].

use crate::server_harness::TEST_JWT_SECRET;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use signaling_service::auth::{Claims, Role};

/// Builder for creating test JWTs.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::student("student-a")
///     .expires_in(60)
///     .build();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    role: Role,
    exp: i64,
    iat: i64,
    secret: String,
}

impl TestTokenBuilder {
    fn with_role(subject: &str, role: Role) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            role,
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            secret: TEST_JWT_SECRET.to_string(),
        }
    }

    /// Token for a student caller.
    pub fn student(subject: &str) -> Self {
        Self::with_role(subject, Role::Student)
    }

    /// Token for an educator caller.
    pub fn educator(subject: &str) -> Self {
        Self::with_role(subject, Role::Educator)
    }

    /// Token for an administrator caller.
    pub fn admin(subject: &str) -> Self {
        Self::with_role(subject, Role::Admin)
    }

    /// Set expiration in seconds from now (negative values produce an
    /// already-expired token).
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Sign with a different secret (to produce tokens the service must
    /// reject).
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build the signed token.
    pub fn build(self) -> String {
        let claims = Claims {
            sub: self.sub,
            role: self.role,
            exp: self.exp,
            iat: self.iat,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("failed to sign test token")
    }
}

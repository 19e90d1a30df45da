//! # Signaling Test Utilities
//!
//! Shared test utilities for the live-class signaling service.
//!
//! This crate provides:
//! - Server test harness (`TestSignalingServer` for E2E tests)
//! - Test token builder (`TestTokenBuilder` minting caller JWTs)
//! - Live-class fixtures (seeded classes with enrolled students)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use signaling_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestSignalingServer::spawn().await?;
//!     server.seed_default_class();
//!
//!     let token = TestTokenBuilder::educator(EDUCATOR_ID).build();
//!     // ... reqwest against server.url() with `Bearer {token}` ...
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use fixtures::{default_class, CLASS_ID, EDUCATOR_ID, STUDENT_A, STUDENT_B, STUDENT_C};
pub use server_harness::{TestSignalingServer, TEST_JWT_SECRET};
pub use token_builders::TestTokenBuilder;

//! Live-class signaling service library.
//!
//! HTTP gateway in front of the in-memory signaling store: enforces caller
//! identity and live-class ownership rules, then delegates storage and
//! eviction to `signaling-store` and participant bookkeeping to the
//! live-class aggregate behind [`live_class::LiveClassDirectory`].
//!
//! # Modules
//!
//! - `auth` - Bearer JWT validation middleware and caller claims
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `live_class` - Seam to the external live-class aggregate
//! - `models` - Request/response types
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod live_class;
pub mod models;
pub mod routes;

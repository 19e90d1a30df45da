//! In-memory WebRTC signaling store for live classes.
//!
//! This crate owns the transient rendezvous state that lets a broadcasting
//! educator and viewing students exchange session descriptions and ICE
//! candidates through short-lived polling requests:
//!
//! - [`SignalingStore`] - the concurrency-safe session map (one offer slot,
//!   one answer per submitter, bounded candidate queues per submitter)
//! - [`sweeper`] - the cancellable background task that evicts sessions
//!   with no recent writes
//!
//! Nothing here is durable. A process restart clears all signaling state,
//! which is an accepted property of the relay, and peers that stop polling
//! simply stop observing. The store never inspects payloads: offers,
//! answers and candidates are opaque JSON blobs.

pub mod store;
pub mod sweeper;

pub use store::{SignalingStore, MAX_CANDIDATES_PER_USER};
pub use sweeper::{start_signaling_sweeper, SweeperConfig};

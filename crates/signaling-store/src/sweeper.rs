//! Eviction sweeper background task.
//!
//! Periodically removes signaling sessions with no recent writes. A session
//! may remain resident up to roughly (sweep interval + staleness threshold)
//! after its true last activity, which is acceptable for a best-effort
//! relay.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task exits cleanly; the owner is expected to
//! await the task handle during process shutdown.

use crate::store::SignalingStore;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Default sweep interval in seconds (30 minutes).
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 1800;

/// Default staleness threshold in seconds (1 hour without a write).
const DEFAULT_STALE_AFTER_SECONDS: u64 = 3600;

/// Configuration for the eviction sweeper task.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Sweep interval in seconds.
    pub sweep_interval_seconds: u64,
    /// Seconds without a write before a session is eligible for eviction.
    pub stale_after_seconds: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            stale_after_seconds: DEFAULT_STALE_AFTER_SECONDS,
        }
    }
}

impl SweeperConfig {
    /// Create config from environment variables.
    ///
    /// Environment variables:
    /// - `SIGNALING_SWEEP_INTERVAL_SECONDS` - Sweep interval (default: 1800)
    /// - `SIGNALING_STALE_AFTER_SECONDS` - Staleness threshold (default: 3600)
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let sweep_interval_seconds = std::env::var("SIGNALING_SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECONDS);

        let stale_after_seconds = std::env::var("SIGNALING_STALE_AFTER_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_STALE_AFTER_SECONDS);

        Self {
            sweep_interval_seconds,
            stale_after_seconds,
        }
    }

    /// Staleness threshold as a chrono duration, saturating on overflow.
    fn stale_after(&self) -> ChronoDuration {
        i64::try_from(self.stale_after_seconds)
            .ok()
            .and_then(ChronoDuration::try_seconds)
            .unwrap_or(ChronoDuration::MAX)
    }
}

/// Start the eviction sweeper background task.
///
/// Runs [`run_sweep`] at the configured interval until the cancellation
/// token is triggered, then returns.
#[instrument(skip_all, name = "signaling.task.sweeper")]
pub async fn start_signaling_sweeper(
    store: Arc<SignalingStore>,
    config: SweeperConfig,
    cancel_token: CancellationToken,
) {
    info!(
        target: "signaling.task.sweeper",
        sweep_interval_seconds = config.sweep_interval_seconds,
        stale_after_seconds = config.stale_after_seconds,
        "Starting signaling eviction sweeper"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.sweep_interval_seconds));
    // The first tick fires immediately; an empty map sweep is harmless.

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_sweep(&store, &config);
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "signaling.task.sweeper",
                    "Sweeper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "signaling.task.sweeper", "Signaling eviction sweeper stopped");
}

/// Run a single sweep iteration.
///
/// Separated from the main loop to allow direct testing.
pub fn run_sweep(store: &SignalingStore, config: &SweeperConfig) {
    let evicted = store.evict_stale_sessions(Utc::now(), config.stale_after());
    if evicted > 0 {
        info!(
            target: "signaling.task.sweeper",
            evicted,
            resident = store.session_count(),
            "Evicted stale signaling sessions"
        );
    } else {
        debug!(
            target: "signaling.task.sweeper",
            resident = store.session_count(),
            "Sweep found no stale sessions"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    // Mutex to ensure env var tests don't run in parallel
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = SweeperConfig::default();
        assert_eq!(config.sweep_interval_seconds, DEFAULT_SWEEP_INTERVAL_SECONDS);
        assert_eq!(config.stale_after_seconds, DEFAULT_STALE_AFTER_SECONDS);
    }

    #[test]
    fn test_from_env_with_valid_values() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("SIGNALING_SWEEP_INTERVAL_SECONDS", "60");
        std::env::set_var("SIGNALING_STALE_AFTER_SECONDS", "120");

        let config = SweeperConfig::from_env();

        std::env::remove_var("SIGNALING_SWEEP_INTERVAL_SECONDS");
        std::env::remove_var("SIGNALING_STALE_AFTER_SECONDS");

        assert_eq!(config.sweep_interval_seconds, 60);
        assert_eq!(config.stale_after_seconds, 120);
    }

    #[test]
    fn test_from_env_with_invalid_values_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();

        std::env::set_var("SIGNALING_SWEEP_INTERVAL_SECONDS", "not-a-number");
        std::env::set_var("SIGNALING_STALE_AFTER_SECONDS", "");

        let config = SweeperConfig::from_env();

        std::env::remove_var("SIGNALING_SWEEP_INTERVAL_SECONDS");
        std::env::remove_var("SIGNALING_STALE_AFTER_SECONDS");

        assert_eq!(config.sweep_interval_seconds, DEFAULT_SWEEP_INTERVAL_SECONDS);
        assert_eq!(config.stale_after_seconds, DEFAULT_STALE_AFTER_SECONDS);
    }

    #[test]
    fn test_run_sweep_evicts_only_stale_sessions() {
        let store = SignalingStore::new();
        store.put_offer("live-stale", "educator-1", json!({"sdp": "O1"}));

        // Zero threshold: anything written before "now" is stale.
        let config = SweeperConfig {
            sweep_interval_seconds: 1800,
            stale_after_seconds: 0,
        };
        run_sweep(&store, &config);
        assert_eq!(store.session_count(), 0);

        // Generous threshold: fresh sessions survive the sweep.
        store.put_offer("live-fresh", "educator-1", json!({"sdp": "O2"}));
        let config = SweeperConfig::default();
        run_sweep(&store, &config);
        assert_eq!(store.session_count(), 1);
    }

    /// The sweeper task starts and stops gracefully on cancellation.
    #[tokio::test]
    async fn test_sweeper_starts_and_stops() {
        let store = Arc::new(SignalingStore::new());
        let cancel_token = CancellationToken::new();
        let cancel_clone = cancel_token.clone();

        let config = SweeperConfig {
            sweep_interval_seconds: 1,
            stale_after_seconds: 3600,
        };

        let handle = tokio::spawn(start_signaling_sweeper(store, config, cancel_token));

        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel_clone.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), handle).await;
        assert!(
            result.is_ok(),
            "Sweeper should stop within 2 seconds after cancellation"
        );
        result.unwrap().expect("Task should not panic");
    }

    /// A write that lands between cutoff computation and the sweep's pass
    /// over the map must keep the session alive.
    #[tokio::test]
    async fn test_sweep_never_removes_concurrently_refreshed_session() {
        let store = Arc::new(SignalingStore::new());
        store.put_offer("live-42", "educator-1", json!({"sdp": "O1"}));

        // The eviction pass re-checks last_activity under the entry lock,
        // so a refresh that wins the lock first survives the sweep.
        let writer = {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || {
                store.put_offer("live-42", "educator-1", json!({"sdp": "O2"}));
            })
        };
        writer.await.expect("writer task");

        let config = SweeperConfig {
            sweep_interval_seconds: 1800,
            stale_after_seconds: 3600,
        };
        run_sweep(&store, &config);
        assert_eq!(store.session_count(), 1);
    }
}

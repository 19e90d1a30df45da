//! Per-session signaling state and its exclusive owner, [`SignalingStore`].
//!
//! Sessions are keyed by the live-class identifier and created lazily on
//! first write. Reads never create sessions and never fail for unknown
//! identifiers. The map is sharded (dashmap), so writes to different
//! sessions do not contend on a common lock, and all mutations of one
//! session happen under that entry's write lock - a reader observes either
//! the state before a write or after it, never a torn intermediate.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;

/// Maximum stored ICE candidates per submitter within one session.
///
/// On reaching the cap the submitter's entire queue is dropped and replaced
/// with only the newly arrived candidate (burst-clear). This is intentional
/// and mirrors the relay's long-standing behavior; it is not a sliding
/// window.
pub const MAX_CANDIDATES_PER_USER: usize = 50;

/// The broadcaster's session description, latest write only.
#[derive(Debug, Clone)]
#[allow(dead_code)] // submitter_id/stored_at surface in Debug dumps when diagnosing sessions
struct OfferEntry {
    payload: Value,
    submitter_id: String,
    stored_at: DateTime<Utc>,
}

/// One viewer's session description. Resubmission replaces the prior entry.
#[derive(Debug, Clone)]
#[allow(dead_code)] // stored_at surfaces in Debug dumps when diagnosing sessions
struct AnswerEntry {
    payload: Value,
    stored_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Debug, Clone)]
#[allow(dead_code)] // stored_at surfaces in Debug dumps when diagnosing sessions
struct CandidateEntry {
    payload: Value,
    stored_at: DateTime<Utc>,
    seq: u64,
}

/// All signaling state for one live class.
///
/// `next_seq` is a session-local counter stamped onto answers and
/// candidates. Wall-clock timestamps can collide under load; the counter
/// makes "most recent answer across submitters" and "candidates in original
/// submission order" exact.
#[derive(Debug)]
struct SessionState {
    offer: Option<OfferEntry>,
    answers: HashMap<String, AnswerEntry>,
    candidates: HashMap<String, Vec<CandidateEntry>>,
    last_activity: DateTime<Utc>,
    next_seq: u64,
}

impl SessionState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            offer: None,
            answers: HashMap::new(),
            candidates: HashMap::new(),
            last_activity: now,
            next_seq: 0,
        }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        seq
    }
}

/// Concurrency-safe, in-memory owner of all per-session signaling state.
///
/// All operations take `&self` and are safe to call from any number of
/// concurrent request handlers. Writes always (re)create the session, so a
/// write racing the eviction sweeper wins: eviction can never silently drop
/// an in-flight publish.
#[derive(Debug, Default)]
pub struct SignalingStore {
    sessions: DashMap<String, SessionState>,
}

impl SignalingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the session's state under its entry lock, creating
    /// the session if absent and refreshing `last_activity`. Every write
    /// path funnels through here.
    fn write_session<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let now = Utc::now();
        let mut entry = self
            .sessions
            .entry(session_id.to_owned())
            .or_insert_with(|| SessionState::new(now));
        entry.last_activity = now;
        f(entry.value_mut())
    }

    /// Replace the session's sole offer slot. Only the latest offer is
    /// retained, however many preceded it.
    pub fn put_offer(&self, session_id: &str, submitter_id: &str, payload: Value) {
        self.write_session(session_id, |session| {
            session.offer = Some(OfferEntry {
                payload,
                submitter_id: submitter_id.to_owned(),
                stored_at: Utc::now(),
            });
        });
    }

    /// Current offer payload, or `None` when nobody has published one (or
    /// the session was evicted). Never creates a session.
    pub fn offer(&self, session_id: &str) -> Option<Value> {
        self.sessions
            .get(session_id)
            .and_then(|session| session.offer.as_ref().map(|entry| entry.payload.clone()))
    }

    /// Upsert the submitter's answer: at most one stored answer per user,
    /// resubmission replaces the prior entry.
    pub fn put_answer(&self, session_id: &str, submitter_id: &str, payload: Value) {
        self.write_session(session_id, |session| {
            let seq = session.bump_seq();
            session.answers.insert(
                submitter_id.to_owned(),
                AnswerEntry {
                    payload,
                    stored_at: Utc::now(),
                    seq,
                },
            );
        });
    }

    /// The most recently written answer across *all* submitters.
    ///
    /// This is a single shared slot, not one answer per negotiating pair:
    /// when several viewers answer concurrently, later answers shadow
    /// earlier ones from other users. Callers polling this endpoint get
    /// whatever arrived last. Known sharp edge, kept deliberately - see
    /// DESIGN.md.
    pub fn latest_answer(&self, session_id: &str) -> Option<Value> {
        self.sessions.get(session_id).and_then(|session| {
            session
                .answers
                .values()
                .max_by_key(|entry| entry.seq)
                .map(|entry| entry.payload.clone())
        })
    }

    /// Append to the submitter's candidate queue. At
    /// [`MAX_CANDIDATES_PER_USER`] stored entries the queue is cleared
    /// first and the new candidate becomes its sole element.
    pub fn put_ice_candidate(&self, session_id: &str, submitter_id: &str, payload: Value) {
        self.write_session(session_id, |session| {
            let seq = session.bump_seq();
            let queue = session.candidates.entry(submitter_id.to_owned()).or_default();
            if queue.len() >= MAX_CANDIDATES_PER_USER {
                queue.clear();
            }
            queue.push(CandidateEntry {
                payload,
                stored_at: Utc::now(),
                seq,
            });
        });
    }

    /// Every stored candidate belonging to submitters other than
    /// `requester_id`, in original submission order across submitters.
    ///
    /// Non-destructive: repeated polls re-return previously seen
    /// candidates, so callers de-duplicate by payload identity.
    pub fn ice_candidates(&self, session_id: &str, requester_id: &str) -> Vec<Value> {
        let Some(session) = self.sessions.get(session_id) else {
            return Vec::new();
        };

        let mut entries: Vec<(u64, Value)> = session
            .candidates
            .iter()
            .filter(|(submitter_id, _)| submitter_id.as_str() != requester_id)
            .flat_map(|(_, queue)| queue.iter().map(|c| (c.seq, c.payload.clone())))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, payload)| payload).collect()
    }

    /// Remove every session whose `last_activity` predates `now -
    /// threshold`. Returns the number of sessions removed.
    ///
    /// The pass locks one shard at a time and re-checks `last_activity`
    /// under the entry lock, so a session refreshed by a concurrent write
    /// after the cutoff was computed is never removed, and no session is
    /// ever observed half-deleted: the offer, all answers and all
    /// candidates go together.
    pub fn evict_stale_sessions(&self, now: DateTime<Utc>, threshold: Duration) -> usize {
        let cutoff = now - threshold;
        let mut evicted = 0usize;
        self.sessions.retain(|_, session| {
            if session.last_activity < cutoff {
                evicted += 1;
                false
            } else {
                true
            }
        });
        evicted
    }

    /// Number of resident sessions. Observability only.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

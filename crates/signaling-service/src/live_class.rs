//! Seam to the external live-class aggregate.
//!
//! The signaling gateway never owns course or live-class records; it only
//! asks the platform who teaches a class, who is enrolled, and delegates
//! participant bookkeeping (join/leave) there. [`LiveClassDirectory`] is
//! that contract. [`InMemoryLiveClassDirectory`] is the in-process
//! implementation used by the bundled binary and by tests; a deployment
//! embedding this service into the wider platform wires its own aggregate
//! behind the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

/// A rejoin attempt within this window (with no recorded departure) is a
/// duplicate and leaves the participant record untouched.
pub const DUPLICATE_JOIN_WINDOW_MINUTES: i64 = 5;

/// Ownership and enrollment facts about one live class.
#[derive(Debug, Clone, Serialize)]
pub struct LiveClassSummary {
    /// Live class identifier; doubles as the signaling session id.
    pub class_id: String,
    /// Display title.
    pub title: String,
    /// The educator who owns the class (the broadcasting peer).
    pub educator_id: String,
    /// Students enrolled in the owning course.
    pub enrolled_student_ids: Vec<String>,
}

impl LiveClassSummary {
    /// Whether `user_id` is enrolled in the owning course.
    pub fn is_enrolled(&self, user_id: &str) -> bool {
        self.enrolled_student_ids.iter().any(|id| id == user_id)
    }

    /// Whether `user_id` is the owning educator.
    pub fn is_educator(&self, user_id: &str) -> bool {
        self.educator_id == user_id
    }
}

/// One attendee's participation record inside the live-class aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRecord {
    pub student_id: String,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    pub attendance: bool,
}

/// Result of a join request against the aggregate.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// True when the caller had already joined within the duplicate window.
    pub already_joined: bool,
    pub live_class: LiveClassSummary,
    pub participants: Vec<ParticipantRecord>,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("live class not found")]
    NotFound,

    #[error("live class backend unavailable: {0}")]
    Unavailable(String),
}

/// Contract with the platform's live-class aggregate.
///
/// Only ownership/enrollment lookups and participant-list bookkeeping;
/// signaling state never crosses this boundary.
#[async_trait]
pub trait LiveClassDirectory: Send + Sync {
    /// Resolve the live class owning a signaling session.
    async fn find(&self, class_id: &str) -> Result<Option<LiveClassSummary>, DirectoryError>;

    /// Record the caller joining the class.
    ///
    /// An existing record with no departure and a join timestamp less than
    /// [`DUPLICATE_JOIN_WINDOW_MINUTES`] old is a duplicate join: nothing
    /// changes and the outcome reports `already_joined`. Otherwise the
    /// record's join timestamp is refreshed (or the record created), any
    /// departure timestamp is cleared, and attendance is marked.
    async fn record_join(
        &self,
        class_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, DirectoryError>;

    /// Record the caller leaving the class: sets the departure timestamp on
    /// the caller's record, no-op when no record exists.
    async fn record_leave(
        &self,
        class_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DirectoryError>;
}

#[derive(Debug)]
struct LiveClassState {
    summary: LiveClassSummary,
    participants: Vec<ParticipantRecord>,
}

/// In-process live-class aggregate.
#[derive(Debug, Default)]
pub struct InMemoryLiveClassDirectory {
    classes: DashMap<String, LiveClassState>,
}

impl InMemoryLiveClassDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live class. Replaces any prior record with the same id.
    pub fn insert_class(&self, summary: LiveClassSummary) {
        self.classes.insert(
            summary.class_id.clone(),
            LiveClassState {
                summary,
                participants: Vec::new(),
            },
        );
    }

    /// Current participant records for a class (tests and diagnostics).
    pub fn participants(&self, class_id: &str) -> Option<Vec<ParticipantRecord>> {
        self.classes
            .get(class_id)
            .map(|state| state.participants.clone())
    }
}

#[async_trait]
impl LiveClassDirectory for InMemoryLiveClassDirectory {
    async fn find(&self, class_id: &str) -> Result<Option<LiveClassSummary>, DirectoryError> {
        Ok(self.classes.get(class_id).map(|state| state.summary.clone()))
    }

    async fn record_join(
        &self,
        class_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, DirectoryError> {
        let mut entry = self
            .classes
            .get_mut(class_id)
            .ok_or(DirectoryError::NotFound)?;
        let state = entry.value_mut();

        let mut already_joined = false;
        if let Some(record) = state
            .participants
            .iter_mut()
            .find(|p| p.student_id == user_id)
        {
            let window = Duration::minutes(DUPLICATE_JOIN_WINDOW_MINUTES);
            if record.left_at.is_none() && now - record.joined_at < window {
                already_joined = true;
            } else {
                record.joined_at = now;
                record.left_at = None;
                record.attendance = true;
            }
        } else {
            state.participants.push(ParticipantRecord {
                student_id: user_id.to_owned(),
                joined_at: now,
                left_at: None,
                attendance: true,
            });
        }

        Ok(JoinOutcome {
            already_joined,
            live_class: state.summary.clone(),
            participants: state.participants.clone(),
        })
    }

    async fn record_leave(
        &self,
        class_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        let mut entry = self
            .classes
            .get_mut(class_id)
            .ok_or(DirectoryError::NotFound)?;

        if let Some(record) = entry
            .value_mut()
            .participants
            .iter_mut()
            .find(|p| p.student_id == user_id)
        {
            record.left_at = Some(now);
        }

        Ok(())
    }
}

//! Fixed live-class fixtures for tests.

use signaling_service::live_class::LiveClassSummary;

/// Default live-class identifier used across tests.
pub const CLASS_ID: &str = "live-42";

/// The educator owning [`CLASS_ID`].
pub const EDUCATOR_ID: &str = "educator-1";

/// Enrolled students.
pub const STUDENT_A: &str = "student-a";
pub const STUDENT_B: &str = "student-b";
pub const STUDENT_C: &str = "student-c";

/// A live class with one educator and three enrolled students.
pub fn default_class() -> LiveClassSummary {
    LiveClassSummary {
        class_id: CLASS_ID.to_string(),
        title: "Algebra II - Live Session".to_string(),
        educator_id: EDUCATOR_ID.to_string(),
        enrolled_student_ids: vec![
            STUDENT_A.to_string(),
            STUDENT_B.to_string(),
            STUDENT_C.to_string(),
        ],
    }
}

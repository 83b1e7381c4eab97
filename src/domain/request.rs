//! Enrollment request domain entity: a student's solicitation to enroll,
//! awaiting the course teacher's decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request decision status. Terminal once accepted or rejected; a rejected
/// request does not block a later re-request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl From<&str> for RequestStatus {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => RequestStatus::Accepted,
            "rejected" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Enrollment request domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub message: String,
    pub status: RequestStatus,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrollmentRequest {
    pub fn is_owned_by_teacher(&self, teacher_id: Uuid) -> bool {
        self.teacher_id == teacher_id
    }

    /// Default message synthesized when a student submits none.
    pub fn default_message(course_title: &str) -> String {
        format!("I would like to enroll in {course_title}")
    }
}

/// Fields required to create an enrollment request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_undecided_status() {
        assert!(!RequestStatus::Pending.is_decided());
        assert!(RequestStatus::Accepted.is_decided());
        assert!(RequestStatus::Rejected.is_decided());
    }

    #[test]
    fn default_message_names_the_course() {
        assert_eq!(
            EnrollmentRequest::default_message("Algebra I"),
            "I would like to enroll in Algebra I"
        );
    }
}

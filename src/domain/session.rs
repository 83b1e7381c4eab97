//! Session domain entity: a single scheduled teaching meeting tied to a
//! trial or active enrollment.

use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Started,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Started => "started",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

impl From<&str> for SessionStatus {
    fn from(s: &str) -> Self {
        match s {
            "started" => SessionStatus::Started,
            "completed" => SessionStatus::Completed,
            "cancelled" => SessionStatus::Cancelled,
            _ => SessionStatus::Scheduled,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video-conferencing platform for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeetingPlatform {
    Zoom,
    GoogleMeet,
    MicrosoftTeams,
    Other,
}

impl MeetingPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingPlatform::Zoom => "zoom",
            MeetingPlatform::GoogleMeet => "google_meet",
            MeetingPlatform::MicrosoftTeams => "microsoft_teams",
            MeetingPlatform::Other => "other",
        }
    }
}

impl From<&str> for MeetingPlatform {
    fn from(s: &str) -> Self {
        match s {
            "zoom" => MeetingPlatform::Zoom,
            "google_meet" => MeetingPlatform::GoogleMeet,
            "microsoft_teams" => MeetingPlatform::MicrosoftTeams,
            _ => MeetingPlatform::Other,
        }
    }
}

impl std::fmt::Display for MeetingPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Meeting coordinates: the platform is mandatory, everything else is
/// free-form. Stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct MeetingDetails {
    pub platform: MeetingPlatform,
    #[serde(default)]
    pub meeting_id: String,
    #[serde(default)]
    pub meeting_password: String,
    #[serde(default)]
    pub meeting_url: String,
    #[serde(default)]
    pub meeting_number: String,
}

/// Post-hoc attendance record, stored as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct Attendance {
    #[serde(default)]
    pub student_attended: bool,
    #[serde(default)]
    pub teacher_attended: bool,
    #[serde(default)]
    pub duration_attended_minutes: i32,
}

/// One side's rating and comment for a finished (or not) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackEntry {
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// Feedback from either side. Recording feedback is independent of the
/// session status (preserved source behavior). Stored as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct SessionFeedback {
    pub student: Option<FeedbackEntry>,
    pub teacher: Option<FeedbackEntry>,
}

/// Links and file paths handed out for a session, stored as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct SessionMaterials {
    #[serde(default)]
    pub items: Vec<String>,
}

/// Session domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: SessionStatus,
    pub meeting: MeetingDetails,
    pub description: String,
    pub materials: SessionMaterials,
    pub notes: String,
    pub homework: String,
    pub attendance: Attendance,
    pub feedback: SessionFeedback,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Only sessions that never happened may be removed.
    pub fn is_deletable(&self) -> bool {
        self.status == SessionStatus::Scheduled
    }

    pub fn is_owned_by(&self, teacher_id: Uuid) -> bool {
        self.teacher_id == teacher_id
    }
}

/// Fields required to schedule a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting: MeetingDetails,
    pub description: String,
    pub materials: SessionMaterials,
    pub notes: String,
    pub homework: String,
}

/// Teacher-side session update; `None` fields are left untouched.
/// Attendance and feedback may be recorded regardless of status.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub status: Option<SessionStatus>,
    pub meeting: Option<MeetingDetails>,
    pub description: Option<String>,
    pub materials: Option<SessionMaterials>,
    pub notes: Option<String>,
    pub homework: Option<String>,
    pub attendance: Option<Attendance>,
    pub feedback: Option<SessionFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_known_values() {
        assert_eq!(MeetingPlatform::from("zoom"), MeetingPlatform::Zoom);
        assert_eq!(
            MeetingPlatform::from("google_meet"),
            MeetingPlatform::GoogleMeet
        );
        assert_eq!(MeetingPlatform::from("webex"), MeetingPlatform::Other);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            SessionStatus::Scheduled,
            SessionStatus::Started,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::from(status.as_str()), status);
        }
    }
}

//! Enrollment domain entity - the core state machine.
//!
//! Lifecycle: `trial -> active -> completed | cancelled`. An elapsed trial
//! is not stored as a status transition; it is a derived fact evaluated
//! lazily at read time through [`needs_payment`]. The `expired` value is
//! kept as a declared terminal state for data imported from older systems
//! but is never written by this application.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Trial,
    Active,
    Completed,
    Cancelled,
    Expired,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Trial => "trial",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Expired => "expired",
        }
    }

    /// Trial and active enrollments occupy a course seat.
    pub fn is_live(&self) -> bool {
        matches!(self, EnrollmentStatus::Trial | EnrollmentStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EnrollmentStatus::Completed | EnrollmentStatus::Cancelled | EnrollmentStatus::Expired
        )
    }
}

impl From<&str> for EnrollmentStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => EnrollmentStatus::Active,
            "completed" => EnrollmentStatus::Completed,
            "cancelled" => EnrollmentStatus::Cancelled,
            "expired" => EnrollmentStatus::Expired,
            _ => EnrollmentStatus::Trial,
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a single recorded payment against an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Pending,
    Paid,
    Failed,
}

/// One entry in an enrollment's payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentRecord {
    #[schema(value_type = String, example = "20")]
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub session_count: i32,
    pub status: PaymentRecordStatus,
}

/// Payment history, stored as a JSON column on the enrollment row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct PaymentHistory {
    #[serde(default)]
    pub records: Vec<PaymentRecord>,
}

/// Running payment state embedded in an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentState {
    #[schema(value_type = String, example = "160")]
    pub total_amount: Decimal,
    #[schema(value_type = String, example = "20")]
    pub paid_amount: Decimal,
    pub sessions_completed: i32,
    pub history: PaymentHistory,
}

/// Enrollment domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub trial_ends_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub payment: PaymentState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The needs-payment predicate, the single reusable unit the rest of the
/// system consults. An enrollment is blocked pending payment exactly when
/// it is still in trial and either the course demands upfront payment or
/// the trial window has elapsed.
pub fn needs_payment(
    now: DateTime<Utc>,
    status: EnrollmentStatus,
    trial_ends_at: DateTime<Utc>,
    upfront_payment: bool,
) -> bool {
    status == EnrollmentStatus::Trial && (upfront_payment || now > trial_ends_at)
}

impl Enrollment {
    /// Whether this enrollment currently occupies a course seat.
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    pub fn is_owned_by(&self, student_id: Uuid) -> bool {
        self.student_id == student_id
    }

    /// Whether the trial window has elapsed, regardless of status.
    pub fn trial_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.trial_ends_at
    }

    /// Evaluate the needs-payment predicate for this enrollment.
    pub fn needs_payment(&self, now: DateTime<Utc>, upfront_payment: bool) -> bool {
        needs_payment(now, self.status, self.trial_ends_at, upfront_payment)
    }
}

/// Fields required to open a trial enrollment from an accepted request.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub trial_ends_at: DateTime<Utc>,
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn trial_within_window_does_not_need_payment() {
        let t = now();
        assert!(!needs_payment(
            t,
            EnrollmentStatus::Trial,
            t + Duration::days(3),
            false
        ));
    }

    #[test]
    fn trial_past_window_needs_payment() {
        let t = now();
        assert!(needs_payment(
            t,
            EnrollmentStatus::Trial,
            t - Duration::days(1),
            false
        ));
    }

    #[test]
    fn upfront_course_needs_payment_even_during_trial() {
        let t = now();
        assert!(needs_payment(
            t,
            EnrollmentStatus::Trial,
            t + Duration::days(3),
            true
        ));
    }

    #[test]
    fn settled_states_never_need_payment() {
        let t = now();
        let elapsed = t - Duration::days(10);
        for status in [
            EnrollmentStatus::Active,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Cancelled,
            EnrollmentStatus::Expired,
        ] {
            assert!(!needs_payment(t, status, elapsed, true));
            assert!(!needs_payment(t, status, elapsed, false));
        }
    }

    #[test]
    fn zero_day_trial_is_immediately_due() {
        let t = now();
        // trial_ends_at == acceptance time, evaluated a moment later
        assert!(needs_payment(
            t + Duration::seconds(1),
            EnrollmentStatus::Trial,
            t,
            false
        ));
    }

    #[test]
    fn live_states() {
        assert!(EnrollmentStatus::Trial.is_live());
        assert!(EnrollmentStatus::Active.is_live());
        assert!(!EnrollmentStatus::Cancelled.is_live());
        assert!(!EnrollmentStatus::Expired.is_live());
    }
}

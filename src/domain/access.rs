//! Capability checks shared by every service.
//!
//! A single `(actor, action)` check replaces per-handler role string
//! comparisons. Ownership is checked separately: listings and lookups are
//! already scoped to the caller, and mutating operations consult
//! `ensure_owner` where the resource carries an owner id.

use uuid::Uuid;

use super::user::UserRole;
use crate::errors::{AppError, AppResult};

/// The authenticated caller, as resolved from JWT claims.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

/// Everything an actor can be asked to do against the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, update, publish, and delete owned courses
    ManageCourses,
    /// Accept or reject enrollment requests
    DecideRequests,
    /// Schedule, update, and delete sessions for owned courses
    ManageSessions,
    /// Mark payments completed/failed/refunded for owned courses
    SettlePayments,
    /// Ask to enroll in a published course
    RequestEnrollment,
    /// Create a payment for an own enrollment
    MakePayments,
    /// Cancel an own enrollment
    CancelEnrollment,
    /// Submit or update a teacher review
    SubmitReviews,
    /// Platform administration (user management, analytics)
    Administer,
}

fn role_allows(role: UserRole, action: Action) -> bool {
    match role {
        // Admins hold every capability.
        UserRole::Admin => true,
        UserRole::Teacher => matches!(
            action,
            Action::ManageCourses
                | Action::DecideRequests
                | Action::ManageSessions
                | Action::SettlePayments
        ),
        UserRole::Student => matches!(
            action,
            Action::RequestEnrollment
                | Action::MakePayments
                | Action::CancelEnrollment
                | Action::SubmitReviews
        ),
    }
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn can(&self, action: Action) -> bool {
        role_allows(self.role, action)
    }

    /// Check a capability, Forbidden otherwise.
    pub fn ensure(&self, action: Action) -> AppResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Check ownership of a resource, Forbidden otherwise. Admins pass.
    pub fn ensure_owner(&self, owner_id: Uuid) -> AppResult<()> {
        if self.id == owner_id || self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn admin_holds_every_capability() {
        let admin = actor(UserRole::Admin);
        for action in [
            Action::ManageCourses,
            Action::DecideRequests,
            Action::ManageSessions,
            Action::SettlePayments,
            Action::RequestEnrollment,
            Action::MakePayments,
            Action::CancelEnrollment,
            Action::SubmitReviews,
            Action::Administer,
        ] {
            assert!(admin.can(action));
        }
    }

    #[test]
    fn teacher_cannot_act_as_student() {
        let teacher = actor(UserRole::Teacher);
        assert!(teacher.can(Action::ManageCourses));
        assert!(teacher.can(Action::SettlePayments));
        assert!(!teacher.can(Action::RequestEnrollment));
        assert!(!teacher.can(Action::SubmitReviews));
        assert!(!teacher.can(Action::Administer));
    }

    #[test]
    fn student_cannot_decide_requests() {
        let student = actor(UserRole::Student);
        assert!(student.can(Action::RequestEnrollment));
        assert!(student.can(Action::CancelEnrollment));
        assert!(!student.can(Action::DecideRequests));
        assert!(!student.can(Action::Administer));
    }

    #[test]
    fn ensure_owner_admits_owner_and_admin_only() {
        let owner_id = Uuid::new_v4();
        let owner = Actor::new(owner_id, UserRole::Teacher);
        let stranger = actor(UserRole::Teacher);
        let admin = actor(UserRole::Admin);

        assert!(owner.ensure_owner(owner_id).is_ok());
        assert!(admin.ensure_owner(owner_id).is_ok());
        assert!(matches!(
            stranger.ensure_owner(owner_id),
            Err(AppError::Forbidden)
        ));
    }
}

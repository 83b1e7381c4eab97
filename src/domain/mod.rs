//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! marketplace concepts independent of infrastructure concerns:
//! users, courses, enrollment requests, enrollments, payments,
//! sessions, and reviews, plus the capability checks and the
//! needs-payment predicate shared by the services.

pub mod access;
pub mod course;
pub mod enrollment;
pub mod password;
pub mod payment;
pub mod request;
pub mod review;
pub mod session;
pub mod user;

pub use access::{Action, Actor};
pub use course::{
    AvailabilitySlot, CatalogFilter, Course, CourseCapacity, CourseContent, CoursePricing,
    CourseSchedule, CourseStatus, CourseUpdate, NewCourse, WeeklyAvailability,
};
pub use enrollment::{
    needs_payment, Enrollment, EnrollmentStatus, NewEnrollment, PaymentHistory, PaymentRecord,
    PaymentRecordStatus, PaymentState,
};
pub use password::Password;
pub use payment::{
    CardSnapshot, NewPayment, Payment, PaymentFilter, PaymentMethod, PaymentPatch, PaymentStatus,
};
pub use request::{EnrollmentRequest, NewRequest, RequestStatus};
pub use review::{Review, ReviewSummary};
pub use session::{
    Attendance, FeedbackEntry, MeetingDetails, MeetingPlatform, NewSession, Session,
    SessionFeedback, SessionMaterials, SessionStatus, SessionUpdate,
};
pub use user::{NewUser, TeachingProfile, User, UserFilter, UserResponse, UserRole, UserUpdate};

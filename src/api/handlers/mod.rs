//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod payment_handler;
pub mod request_handler;
pub mod review_handler;
pub mod session_handler;
pub mod stats_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::catalog_routes;
pub use course_handler::course_routes;
pub use enrollment_handler::enrollment_routes;
pub use payment_handler::payment_routes;
pub use request_handler::request_routes;
pub use review_handler::{public_review_routes, review_routes};
pub use session_handler::session_routes;
pub use stats_handler::stats_routes;
pub use user_handler::user_routes;

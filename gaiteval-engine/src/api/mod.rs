//! HTTP API handlers for the evaluation service
//!
//! Read-only surface; session creation, uploads, and authentication
//! belong to the external collaborators.

pub mod health;
pub mod history;
pub mod report;

pub use health::health_routes;
pub use history::history_routes;
pub use report::report_routes;

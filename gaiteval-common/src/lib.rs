//! # Gaiteval Common Library
//!
//! Shared code for the gait metric evaluation service including:
//! - Domain types (camera angles, sides, session listings, result sets)
//! - Common error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AnalysisSession, CameraAngle, FrameSeries, ResultSet, SessionListing, SessionStatus, Side,
};

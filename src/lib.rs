//! Staff appraisal service: template libraries, assignment dispatch,
//! self/reviewer submission tracking, and normalized scoring, exposed
//! over an axum HTTP surface.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

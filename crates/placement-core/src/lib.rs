//! Campus placement core: eligibility evaluation, the interview-stage pipeline, and the
//! service facade that composes them for recruiter workflows.

pub mod config;
pub mod error;
pub mod placement;
pub mod telemetry;

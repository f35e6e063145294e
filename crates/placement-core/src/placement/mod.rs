//! Candidate eligibility, interview-stage pipeline and bulk shortlisting for placement drives.
//!
//! The evaluator and pipeline are free functions over passed-in values; state lives with
//! whichever collaborator implements the repository traits.

pub mod domain;
pub mod eligibility;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod service;
pub mod shortlist;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    calendar_date, ApplicationId, Branch, CandidateId, CandidateProfile, DriveId,
    DriveRequirements, PlacementDrive, ValidationError,
};
pub use eligibility::{evaluate, CheckDetail, CheckValue, EligibilityCheck, EligibilityResult};
pub use pipeline::{
    advance, advance_at, is_advanceable, reject, Application, ApplicationStatus,
    InvalidTransitionError, Transition,
};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, PlacementDirectory, RepositoryError,
};
pub use router::placement_router;
pub use service::{
    ApplicantEvaluation, ApplicantFilter, ApplicationServiceError, DriveEligibility,
    PlacementService, ShortlistReport,
};
pub use shortlist::{auto_shortlist, plan_shortlist};
pub use summary::PipelineSummary;

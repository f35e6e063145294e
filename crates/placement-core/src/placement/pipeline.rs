//! Interview-stage state machine.
//!
//! ```text
//! Applied -> Shortlisted -> Round1 -> Round2 -> HrInterview -> Selected
//!    |            |            |         |            |
//!    +------------+------------+---------+------------+--> Rejected
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, CandidateId, DriveId};

/// Recruitment stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Round1,
    Round2,
    HrInterview,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    /// The linear chain, excluding the `Rejected` side state.
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Applied,
            Self::Shortlisted,
            Self::Round1,
            Self::Round2,
            Self::HrInterview,
            Self::Selected,
        ]
    }

    /// Every status, chain first then `Rejected`.
    pub const fn all() -> [Self; 7] {
        [
            Self::Applied,
            Self::Shortlisted,
            Self::Round1,
            Self::Round2,
            Self::HrInterview,
            Self::Selected,
            Self::Rejected,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Shortlisted => "shortlisted",
            Self::Round1 => "round1",
            Self::Round2 => "round2",
            Self::HrInterview => "hr_interview",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Shortlisted => "Shortlisted",
            Self::Round1 => "Round 1 (Aptitude)",
            Self::Round2 => "Round 2 (Technical)",
            Self::HrInterview => "HR Interview",
            Self::Selected => "Selected",
            Self::Rejected => "Rejected",
        }
    }

    /// Next stage in the chain; `None` for terminal states.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Applied => Some(Self::Shortlisted),
            Self::Shortlisted => Some(Self::Round1),
            Self::Round1 => Some(Self::Round2),
            Self::Round2 => Some(Self::HrInterview),
            Self::HrInterview => Some(Self::Selected),
            Self::Selected | Self::Rejected => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Selected | Self::Rejected)
    }

    pub const fn is_advanceable(self) -> bool {
        self.next().is_some()
    }

    pub const fn can_reject(self) -> bool {
        !self.is_terminal()
    }

    /// Zero-based position in the chain; `None` for `Rejected`.
    pub const fn stage_index(self) -> Option<usize> {
        match self {
            Self::Applied => Some(0),
            Self::Shortlisted => Some(1),
            Self::Round1 => Some(2),
            Self::Round2 => Some(3),
            Self::HrInterview => Some(4),
            Self::Selected => Some(5),
            Self::Rejected => None,
        }
    }

    /// Round-tracker completion. A rejected application counts as fully progressed.
    pub const fn progress_percent(self) -> u8 {
        let stages = Self::ordered().len();
        match self.stage_index() {
            Some(index) => ((index + 1) * 100 / stages) as u8,
            None => 100,
        }
    }
}

/// Shorthand for [`ApplicationStatus::is_advanceable`].
pub const fn is_advanceable(status: ApplicationStatus) -> bool {
    status.is_advanceable()
}

/// A candidate's application to one drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub drive_id: DriveId,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Application {
    /// New application in the initial `Applied` stage.
    pub fn new(
        id: ApplicationId,
        candidate_id: CandidateId,
        drive_id: DriveId,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id,
            drive_id,
            status: ApplicationStatus::Applied,
            applied_date: applied_at,
            last_updated: applied_at,
        }
    }

    /// Whether this application still blocks a new one for the same candidate and drive.
    pub fn is_open_for(&self, candidate_id: &CandidateId, drive_id: &DriveId) -> bool {
        &self.candidate_id == candidate_id
            && &self.drive_id == drive_id
            && !self.status.is_terminal()
    }

    fn transitioned(&self, status: ApplicationStatus, at: DateTime<Utc>) -> Self {
        Self {
            status,
            last_updated: at,
            ..self.clone()
        }
    }
}

/// Requested pipeline move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Advance,
    Reject,
}

impl Transition {
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Reject => "reject",
        }
    }
}

/// Raised when a transition is requested from a state that has no such edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {} application {application_id} from terminal status {}", .transition.verb(), .from.label())]
pub struct InvalidTransitionError {
    pub application_id: ApplicationId,
    pub from: ApplicationStatus,
    pub transition: Transition,
}

/// Move one step forward in the chain, stamping `last_updated` with the current time.
pub fn advance(application: &Application) -> Result<Application, InvalidTransitionError> {
    advance_at(application, Utc::now())
}

pub fn advance_at(
    application: &Application,
    at: DateTime<Utc>,
) -> Result<Application, InvalidTransitionError> {
    match application.status.next() {
        Some(next) => Ok(application.transitioned(next, at)),
        None => Err(InvalidTransitionError {
            application_id: application.id.clone(),
            from: application.status,
            transition: Transition::Advance,
        }),
    }
}

/// Move to `Rejected` from any non-terminal stage.
pub fn reject(application: &Application) -> Result<Application, InvalidTransitionError> {
    reject_at(application, Utc::now())
}

pub fn reject_at(
    application: &Application,
    at: DateTime<Utc>,
) -> Result<Application, InvalidTransitionError> {
    if !application.status.can_reject() {
        return Err(InvalidTransitionError {
            application_id: application.id.clone(),
            from: application.status,
            transition: Transition::Reject,
        });
    }
    Ok(application.transitioned(ApplicationStatus::Rejected, at))
}

/// Apply either transition; used by callers that receive the move as data.
pub fn transition_at(
    application: &Application,
    transition: Transition,
    at: DateTime<Utc>,
) -> Result<Application, InvalidTransitionError> {
    match transition {
        Transition::Advance => advance_at(application, at),
        Transition::Reject => reject_at(application, at),
    }
}

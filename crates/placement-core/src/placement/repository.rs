use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicationId, CandidateId, CandidateProfile, DriveId, PlacementDrive};
use super::pipeline::{Application, ApplicationStatus};

/// Storage abstraction for applications so the service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    /// Store a new application. Refuses with [`RepositoryError::OpenApplication`] when the
    /// candidate already holds a non-terminal application for the same drive; the check and
    /// the write must happen under one lock or transaction.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError>;
    fn for_candidate(&self, candidate_id: &CandidateId)
        -> Result<Vec<Application>, RepositoryError>;

    /// Compare-and-swap on the status field: store `application` only if the stored copy
    /// is still in `expected`. Implementations must perform the check and the write under
    /// one lock or transaction.
    fn replace_if_status(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError>;
}

/// Read access to candidate profiles and published drives, owned by the profile and
/// drive management collaborators.
pub trait PlacementDirectory: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError>;
    fn drive(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError>;
    fn drives(&self) -> Result<Vec<PlacementDrive>, RepositoryError>;
    fn publish_drive(&self, drive: PlacementDrive) -> Result<PlacementDrive, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("open application {existing} already exists")]
    OpenApplication { existing: ApplicationId },
    #[error("record not found")]
    NotFound,
    #[error("status changed concurrently: expected {}, found {}", .expected.label(), .actual.label())]
    StaleStatus {
        expected: ApplicationStatus,
        actual: ApplicationStatus,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public representation of an application's position in the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub drive_id: DriveId,
    pub status: &'static str,
    pub status_label: &'static str,
    pub progress_percent: u8,
    pub terminal: bool,
    pub applied_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<&Application> for ApplicationStatusView {
    fn from(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            candidate_id: application.candidate_id.clone(),
            drive_id: application.drive_id.clone(),
            status: application.status.key(),
            status_label: application.status.label(),
            progress_percent: application.status.progress_percent(),
            terminal: application.status.is_terminal(),
            applied_date: application.applied_date,
            last_updated: application.last_updated,
        }
    }
}

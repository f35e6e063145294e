use serde::Serialize;

use super::domain::DriveId;
use super::pipeline::{Application, ApplicationStatus};

/// Applications per stage for one drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub status: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Recruiter dashboard rollup for a drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub drive_id: DriveId,
    pub total: usize,
    /// Past `Applied` and not rejected, `Selected` included.
    pub in_progress: usize,
    pub selected: usize,
    pub rejected: usize,
    pub stages: Vec<StageCount>,
}

impl PipelineSummary {
    pub fn from_applications(drive_id: DriveId, applications: &[Application]) -> Self {
        let count = |status: ApplicationStatus| {
            applications
                .iter()
                .filter(|application| application.status == status)
                .count()
        };

        let stages = ApplicationStatus::all()
            .into_iter()
            .map(|status| StageCount {
                status: status.key(),
                label: status.label(),
                count: count(status),
            })
            .collect();

        let in_progress = applications
            .iter()
            .filter(|application| {
                !matches!(
                    application.status,
                    ApplicationStatus::Applied | ApplicationStatus::Rejected
                )
            })
            .count();

        Self {
            drive_id,
            total: applications.len(),
            in_progress,
            selected: count(ApplicationStatus::Selected),
            rejected: count(ApplicationStatus::Rejected),
            stages,
        }
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.stages
            .iter()
            .find(|stage| stage.status == status.key())
            .map(|stage| stage.count)
            .unwrap_or(0)
    }
}

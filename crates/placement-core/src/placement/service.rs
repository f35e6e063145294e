use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    ApplicationId, CandidateId, CandidateProfile, DriveId, PlacementDrive, ValidationError,
};
use super::eligibility::{evaluate, EligibilityResult};
use super::pipeline::{
    advance_at, transition_at, Application, ApplicationStatus, InvalidTransitionError, Transition,
};
use super::repository::{
    ApplicationRepository, ApplicationStatusView, PlacementDirectory, RepositoryError,
};
use super::shortlist::{shortlist_decision, ShortlistDecision, ShortlistSkip};
use super::summary::PipelineSummary;

/// Service composing the application store, the drive/profile directory, the evaluator
/// and the stage pipeline.
pub struct PlacementService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
    sequence: AtomicU64,
}

/// Result of an automatic shortlist pass over one drive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShortlistReport {
    pub shortlisted: Vec<ApplicationId>,
    pub ineligible: Vec<ApplicationId>,
    pub missing_profile: Vec<ApplicationId>,
    /// Changed by another writer between the snapshot and the commit.
    pub stale: Vec<ApplicationId>,
}

impl ShortlistReport {
    pub fn is_noop(&self) -> bool {
        self.shortlisted.is_empty()
    }
}

/// A candidate's standing against one published drive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveEligibility {
    pub drive_id: DriveId,
    pub company_name: String,
    pub role: String,
    pub result: EligibilityResult,
}

/// Which applicants a drive listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantFilter {
    #[default]
    All,
    Eligible,
    Ineligible,
}

impl ApplicantFilter {
    /// Applicants without a profile have no verdict and only appear under `All`.
    pub fn admits(self, eligibility: Option<&EligibilityResult>) -> bool {
        match (self, eligibility) {
            (Self::All, _) => true,
            (Self::Eligible, Some(result)) => result.is_eligible,
            (Self::Ineligible, Some(result)) => !result.is_eligible,
            (_, None) => false,
        }
    }
}

/// One row of a drive's applicant listing.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantEvaluation {
    pub application: ApplicationStatusView,
    pub candidate_name: Option<String>,
    pub eligibility: Option<EligibilityResult>,
    pub reason: String,
}

impl<R, D> PlacementService<R, D>
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            repository,
            directory,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_application_id(&self) -> ApplicationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApplicationId(format!("app-{id:06}"))
    }

    fn require_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateProfile, ApplicationServiceError> {
        self.directory
            .candidate(candidate_id)?
            .ok_or_else(|| ApplicationServiceError::UnknownCandidate(candidate_id.clone()))
    }

    fn require_drive(&self, drive_id: &DriveId) -> Result<PlacementDrive, ApplicationServiceError> {
        self.directory
            .drive(drive_id)?
            .ok_or_else(|| ApplicationServiceError::UnknownDrive(drive_id.clone()))
    }

    /// Validate and publish a new drive.
    pub fn publish_drive(
        &self,
        drive: PlacementDrive,
    ) -> Result<PlacementDrive, ApplicationServiceError> {
        drive.requirements.validate()?;
        let stored = self.directory.publish_drive(drive)?;
        info!(drive_id = %stored.id, company = %stored.company_name, "drive published");
        Ok(stored)
    }

    /// Open a new application in the `Applied` stage. A candidate may hold only one
    /// non-terminal application per drive.
    pub fn apply(
        &self,
        candidate_id: &CandidateId,
        drive_id: &DriveId,
    ) -> Result<Application, ApplicationServiceError> {
        self.require_candidate(candidate_id)?;
        self.require_drive(drive_id)?;

        if let Some(existing) = self
            .repository
            .for_candidate(candidate_id)?
            .into_iter()
            .find(|application| application.is_open_for(candidate_id, drive_id))
        {
            return Err(ApplicationServiceError::DuplicateApplication {
                candidate_id: candidate_id.clone(),
                drive_id: drive_id.clone(),
                existing: existing.id,
            });
        }

        let application = Application::new(
            self.next_application_id(),
            candidate_id.clone(),
            drive_id.clone(),
            Utc::now(),
        );
        let stored = match self.repository.insert(application) {
            Ok(stored) => stored,
            Err(RepositoryError::OpenApplication { existing }) => {
                return Err(ApplicationServiceError::DuplicateApplication {
                    candidate_id: candidate_id.clone(),
                    drive_id: drive_id.clone(),
                    existing,
                });
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            application_id = %stored.id,
            candidate_id = %stored.candidate_id,
            drive_id = %stored.drive_id,
            "application received"
        );
        Ok(stored)
    }

    /// Evaluate a stored candidate against a stored drive.
    pub fn evaluate(
        &self,
        candidate_id: &CandidateId,
        drive_id: &DriveId,
    ) -> Result<EligibilityResult, ApplicationServiceError> {
        let profile = self.require_candidate(candidate_id)?;
        let drive = self.require_drive(drive_id)?;
        Ok(evaluate(&profile, &drive.requirements))
    }

    /// Evaluate a candidate against every published drive.
    pub fn eligibility_overview(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<DriveEligibility>, ApplicationServiceError> {
        let profile = self.require_candidate(candidate_id)?;
        let overview = self
            .directory
            .drives()?
            .into_iter()
            .map(|drive| DriveEligibility {
                result: evaluate(&profile, &drive.requirements),
                drive_id: drive.id,
                company_name: drive.company_name,
                role: drive.role,
            })
            .collect();
        Ok(overview)
    }

    pub fn advance(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.apply_transition(application_id, Transition::Advance)
    }

    pub fn reject(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.apply_transition(application_id, Transition::Reject)
    }

    fn apply_transition(
        &self,
        application_id: &ApplicationId,
        transition: Transition,
    ) -> Result<Application, ApplicationServiceError> {
        let current = self.get(application_id)?;
        let next = transition_at(&current, transition, Utc::now())?;
        self.repository
            .replace_if_status(next.clone(), current.status)?;

        info!(
            application_id = %next.id,
            from = current.status.key(),
            to = next.status.key(),
            "application status changed"
        );
        Ok(next)
    }

    /// Shortlist every eligible `Applied` application of a drive.
    ///
    /// Works from a snapshot of the drive's applications and commits each transition with
    /// a compare-and-swap; applications changed by another writer in the meantime are
    /// reported as stale rather than retried.
    pub fn auto_shortlist(
        &self,
        drive_id: &DriveId,
    ) -> Result<ShortlistReport, ApplicationServiceError> {
        let drive = self.require_drive(drive_id)?;
        let applications = self.repository.for_drive(drive_id)?;

        let mut profiles = HashMap::new();
        for application in &applications {
            if application.status != ApplicationStatus::Applied
                || profiles.contains_key(&application.candidate_id)
            {
                continue;
            }
            if let Some(profile) = self.directory.candidate(&application.candidate_id)? {
                profiles.insert(application.candidate_id.clone(), profile);
            }
        }

        let mut report = ShortlistReport::default();
        let now = Utc::now();

        for application in &applications {
            match shortlist_decision(application, &profiles, &drive) {
                ShortlistDecision::Shortlist => {}
                ShortlistDecision::Skip(ShortlistSkip::Ineligible) => {
                    report.ineligible.push(application.id.clone());
                    continue;
                }
                ShortlistDecision::Skip(ShortlistSkip::MissingProfile) => {
                    report.missing_profile.push(application.id.clone());
                    continue;
                }
                ShortlistDecision::Skip(_) => continue,
            }

            let next = advance_at(application, now)?;
            match self
                .repository
                .replace_if_status(next, ApplicationStatus::Applied)
            {
                Ok(()) => report.shortlisted.push(application.id.clone()),
                Err(RepositoryError::StaleStatus { actual, .. }) => {
                    warn!(
                        application_id = %application.id,
                        found = actual.key(),
                        "skipping application changed during shortlist"
                    );
                    report.stale.push(application.id.clone());
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            drive_id = %drive.id,
            shortlisted = report.shortlisted.len(),
            ineligible = report.ineligible.len(),
            missing_profile = report.missing_profile.len(),
            stale = report.stale.len(),
            "auto shortlist complete"
        );
        Ok(report)
    }

    /// Fetch an application for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.repository
            .fetch(application_id)?
            .ok_or_else(|| ApplicationServiceError::UnknownApplication(application_id.clone()))
    }

    /// A candidate's applications, oldest first.
    pub fn applications_for_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        self.require_candidate(candidate_id)?;
        let mut applications = self.repository.for_candidate(candidate_id)?;
        applications.sort_by(|left, right| {
            left.applied_date
                .cmp(&right.applied_date)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(applications)
    }

    /// Every application for a drive, evaluated against its requirements and filtered.
    pub fn drive_applicants(
        &self,
        drive_id: &DriveId,
        filter: ApplicantFilter,
    ) -> Result<Vec<ApplicantEvaluation>, ApplicationServiceError> {
        let drive = self.require_drive(drive_id)?;
        let mut listing = Vec::new();

        for application in self.repository.for_drive(&drive.id)? {
            let profile = self.directory.candidate(&application.candidate_id)?;
            let eligibility = profile
                .as_ref()
                .map(|profile| evaluate(profile, &drive.requirements));
            if !filter.admits(eligibility.as_ref()) {
                continue;
            }

            let reason = match &eligibility {
                Some(result) => result.summary(),
                None => format!("no profile on record for {}", application.candidate_id),
            };
            listing.push(ApplicantEvaluation {
                application: ApplicationStatusView::from(&application),
                candidate_name: profile.map(|profile| profile.name),
                eligibility,
                reason,
            });
        }

        Ok(listing)
    }

    pub fn drive_summary(
        &self,
        drive_id: &DriveId,
    ) -> Result<PipelineSummary, ApplicationServiceError> {
        let drive = self.require_drive(drive_id)?;
        let applications = self.repository.for_drive(&drive.id)?;
        Ok(PipelineSummary::from_applications(drive.id, &applications))
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Transition(#[from] InvalidTransitionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("candidate {0} not found")]
    UnknownCandidate(CandidateId),
    #[error("drive {0} not found")]
    UnknownDrive(DriveId),
    #[error("application {0} not found")]
    UnknownApplication(ApplicationId),
    #[error("candidate {candidate_id} already has open application {existing} for drive {drive_id}")]
    DuplicateApplication {
        candidate_id: CandidateId,
        drive_id: DriveId,
        existing: ApplicationId,
    },
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::domain::{ApplicationId, CandidateId, CandidateProfile, PlacementDrive};
use super::eligibility::evaluate;
use super::pipeline::{advance_at, Application, ApplicationStatus};

/// Why an application was left out of a shortlist pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortlistSkip {
    /// Already past `Applied`, or terminal.
    NotPending,
    /// Belongs to another drive.
    OtherDrive,
    /// No profile supplied for the candidate.
    MissingProfile,
    /// Candidate failed at least one rule.
    Ineligible,
}

/// Classification of one application during a shortlist pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortlistDecision {
    Shortlist,
    Skip(ShortlistSkip),
}

/// Decide whether a single application qualifies for automatic shortlisting.
pub fn shortlist_decision(
    application: &Application,
    profiles: &HashMap<CandidateId, CandidateProfile>,
    drive: &PlacementDrive,
) -> ShortlistDecision {
    if application.drive_id != drive.id {
        return ShortlistDecision::Skip(ShortlistSkip::OtherDrive);
    }
    if application.status != ApplicationStatus::Applied {
        return ShortlistDecision::Skip(ShortlistSkip::NotPending);
    }
    let Some(profile) = profiles.get(&application.candidate_id) else {
        return ShortlistDecision::Skip(ShortlistSkip::MissingProfile);
    };

    if evaluate(profile, &drive.requirements).is_eligible {
        ShortlistDecision::Shortlist
    } else {
        ShortlistDecision::Skip(ShortlistSkip::Ineligible)
    }
}

/// Ids of the applications that an automatic shortlist pass would advance.
pub fn plan_shortlist(
    applications: &[Application],
    profiles: &HashMap<CandidateId, CandidateProfile>,
    drive: &PlacementDrive,
) -> Vec<ApplicationId> {
    applications
        .iter()
        .filter(|application| {
            shortlist_decision(application, profiles, drive) == ShortlistDecision::Shortlist
        })
        .map(|application| application.id.clone())
        .collect()
}

/// Advance every eligible `Applied` application of `drive` to `Shortlisted`.
///
/// Each application is judged on its own, so the outcome does not depend on input
/// order. An empty result means there was nothing to shortlist.
pub fn auto_shortlist(
    applications: &mut [Application],
    profiles: &HashMap<CandidateId, CandidateProfile>,
    drive: &PlacementDrive,
) -> Vec<ApplicationId> {
    auto_shortlist_at(applications, profiles, drive, Utc::now())
}

pub fn auto_shortlist_at(
    applications: &mut [Application],
    profiles: &HashMap<CandidateId, CandidateProfile>,
    drive: &PlacementDrive,
    at: DateTime<Utc>,
) -> Vec<ApplicationId> {
    let mut shortlisted = Vec::new();

    for application in applications.iter_mut() {
        match shortlist_decision(application, profiles, drive) {
            ShortlistDecision::Shortlist => {}
            ShortlistDecision::Skip(ShortlistSkip::MissingProfile) => {
                warn!(
                    application_id = %application.id,
                    candidate_id = %application.candidate_id,
                    "no profile supplied; application left in place"
                );
                continue;
            }
            ShortlistDecision::Skip(reason) => {
                debug!(application_id = %application.id, ?reason, "not shortlisted");
                continue;
            }
        }

        // `Applied` always has a successor, so this only fails if the decision above is wrong.
        match advance_at(application, at) {
            Ok(next) => {
                *application = next;
                shortlisted.push(application.id.clone());
            }
            Err(err) => warn!(error = %err, "shortlist transition refused"),
        }
    }

    shortlisted
}

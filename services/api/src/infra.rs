use chrono::{DateTime, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_core::placement::{
    advance_at, calendar_date, Application, ApplicationId, ApplicationRepository,
    ApplicationServiceError, ApplicationStatus, Branch, CandidateId, CandidateProfile, DriveId,
    DriveRequirements, PlacementDirectory, PlacementDrive, RepositoryError, ValidationError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        if let Some(open) = guard.values().find(|stored| {
            stored.is_open_for(&application.candidate_id, &application.drive_id)
        }) {
            return Err(RepositoryError::OpenApplication {
                existing: open.id.clone(),
            });
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| &application.drive_id == drive_id)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(applications)
    }

    fn for_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| &application.candidate_id == candidate_id)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(applications)
    }

    fn replace_if_status(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard
            .get_mut(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected {
            return Err(RepositoryError::StaleStatus {
                expected,
                actual: stored.status,
            });
        }
        *stored = application;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    candidates: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
    drives: Arc<Mutex<Vec<PlacementDrive>>>,
}

impl InMemoryDirectory {
    pub(crate) fn add_candidate(&self, profile: CandidateProfile) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.candidates)?;
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    pub(crate) fn candidates(&self) -> Result<Vec<CandidateProfile>, RepositoryError> {
        let guard = lock(&self.candidates)?;
        let mut profiles: Vec<CandidateProfile> = guard.values().cloned().collect();
        profiles.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(profiles)
    }
}

impl PlacementDirectory for InMemoryDirectory {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        let guard = lock(&self.candidates)?;
        Ok(guard.get(id).cloned())
    }

    fn drive(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError> {
        let guard = lock(&self.drives)?;
        Ok(guard.iter().find(|drive| &drive.id == id).cloned())
    }

    fn drives(&self) -> Result<Vec<PlacementDrive>, RepositoryError> {
        let guard = lock(&self.drives)?;
        Ok(guard.clone())
    }

    fn publish_drive(&self, drive: PlacementDrive) -> Result<PlacementDrive, RepositoryError> {
        let mut guard = lock(&self.drives)?;
        if guard.iter().any(|existing| existing.id == drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(drive.clone());
        Ok(drive)
    }
}

fn skills(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|skill| skill.to_string()).collect()
}

/// Seed instant at 09:00 UTC on the given day.
fn timestamp(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, ValidationError> {
    calendar_date(year, month, day)?
        .and_hms_opt(9, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or(ValidationError::CalendarDate { year, month, day })
}

pub(crate) fn demo_candidates() -> Vec<CandidateProfile> {
    vec![
        CandidateProfile {
            id: CandidateId("s1".to_string()),
            name: "Aiden Vance".to_string(),
            roll_no: "21CS1045".to_string(),
            branch: Branch::Cse,
            year: 3,
            cgpa: 8.4,
            backlogs: 0,
            skills: skills(&["React", "Node.js", "Python", "Tailwind"]),
            resume_url: Some("#".to_string()),
        },
        CandidateProfile {
            id: CandidateId("s2".to_string()),
            name: "Priya Raman".to_string(),
            roll_no: "21IT0212".to_string(),
            branch: Branch::It,
            year: 3,
            cgpa: 9.1,
            backlogs: 0,
            skills: skills(&["TypeScript", "node.js"]),
            resume_url: None,
        },
        CandidateProfile {
            id: CandidateId("s3".to_string()),
            name: "Tomas Keller".to_string(),
            roll_no: "20ME0087".to_string(),
            branch: Branch::Mechanical,
            year: 4,
            cgpa: 7.6,
            backlogs: 1,
            skills: skills(&["C++", "SolidWorks"]),
            resume_url: None,
        },
    ]
}

pub(crate) fn demo_drives() -> Result<Vec<PlacementDrive>, ValidationError> {
    Ok(vec![
        PlacementDrive {
            id: DriveId("d1".to_string()),
            company_name: "Stellar Tech".to_string(),
            role: "Software Engineer".to_string(),
            package: "24 LPA".to_string(),
            location: "Bangalore, India".to_string(),
            deadline: calendar_date(2024, 12, 15)?,
            requirements: DriveRequirements {
                min_cgpa: 8.0,
                allowed_branches: vec![Branch::Cse, Branch::It, Branch::Ece],
                max_backlogs: 0,
                required_skills: skills(&["React", "Node.js"]),
                min_year: 3,
            },
        },
        PlacementDrive {
            id: DriveId("d2".to_string()),
            company_name: "Lumina Dynamics".to_string(),
            role: "Full Stack Developer".to_string(),
            package: "18 LPA".to_string(),
            location: "Remote".to_string(),
            deadline: calendar_date(2024, 12, 20)?,
            requirements: DriveRequirements {
                min_cgpa: 7.5,
                allowed_branches: vec![Branch::Cse, Branch::It],
                max_backlogs: 1,
                required_skills: skills(&["JavaScript", "TypeScript"]),
                min_year: 3,
            },
        },
        PlacementDrive {
            id: DriveId("d3".to_string()),
            company_name: "RoboCore Systems".to_string(),
            role: "Embedded Systems Engineer".to_string(),
            package: "15 LPA".to_string(),
            location: "Pune, India".to_string(),
            deadline: calendar_date(2024, 12, 10)?,
            requirements: DriveRequirements {
                min_cgpa: 7.0,
                allowed_branches: vec![Branch::Ece, Branch::Eee, Branch::Mechanical],
                max_backlogs: 0,
                required_skills: skills(&["C++", "Python"]),
                min_year: 4,
            },
        },
    ])
}

/// Applications already in flight when the demo data is loaded, walked through the pipeline
/// from `Applied` one stage per day.
fn demo_applications() -> Result<Vec<Application>, ApplicationServiceError> {
    let mut in_round_two = Application::new(
        ApplicationId("app-seed-1".to_string()),
        CandidateId("s1".to_string()),
        DriveId("d2".to_string()),
        timestamp(2024, 11, 20)?,
    );
    for day in 21..=23 {
        in_round_two = advance_at(&in_round_two, timestamp(2024, 11, day)?)?;
    }
    Ok(vec![in_round_two])
}

/// In-memory stores preloaded with the demo candidates, drives and applications.
pub(crate) fn seeded_stores(
) -> Result<(InMemoryApplicationRepository, InMemoryDirectory), ApplicationServiceError> {
    let repository = InMemoryApplicationRepository::default();
    let directory = InMemoryDirectory::default();

    for profile in demo_candidates() {
        profile.validate()?;
        directory.add_candidate(profile)?;
    }
    for drive in demo_drives()? {
        drive.requirements.validate()?;
        directory.publish_drive(drive)?;
    }
    for application in demo_applications()? {
        repository.insert(application)?;
    }

    Ok((repository, directory))
}

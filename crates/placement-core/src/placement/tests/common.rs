use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::placement::domain::{
    ApplicationId, Branch, CandidateId, CandidateProfile, DriveId, DriveRequirements,
    PlacementDrive,
};
use crate::placement::pipeline::{Application, ApplicationStatus};
use crate::placement::repository::{ApplicationRepository, PlacementDirectory, RepositoryError};
use crate::placement::{placement_router, PlacementService};

pub(super) fn applied_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 20, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 22, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn student() -> CandidateProfile {
    CandidateProfile {
        id: CandidateId("s1".to_string()),
        name: "Aiden Vance".to_string(),
        roll_no: "21CS1045".to_string(),
        branch: Branch::Cse,
        year: 3,
        cgpa: 8.4,
        backlogs: 0,
        skills: vec!["React".to_string(), "Node.js".to_string()],
        resume_url: None,
    }
}

pub(super) fn candidate(id: &str, cgpa: f64, skills: &[&str]) -> CandidateProfile {
    CandidateProfile {
        id: CandidateId(id.to_string()),
        name: format!("Candidate {id}"),
        roll_no: format!("21CS{id}"),
        cgpa,
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        ..student()
    }
}

pub(super) fn stellar_requirements() -> DriveRequirements {
    DriveRequirements {
        min_cgpa: 8.0,
        allowed_branches: vec![Branch::Cse, Branch::It, Branch::Ece],
        max_backlogs: 0,
        required_skills: vec!["React".to_string(), "Node.js".to_string()],
        min_year: 3,
    }
}

pub(super) fn lumina_requirements() -> DriveRequirements {
    DriveRequirements {
        min_cgpa: 7.5,
        allowed_branches: vec![Branch::Cse, Branch::It],
        max_backlogs: 1,
        required_skills: vec!["JavaScript".to_string(), "TypeScript".to_string()],
        min_year: 3,
    }
}

pub(super) fn drive(id: &str, requirements: DriveRequirements) -> PlacementDrive {
    PlacementDrive {
        id: DriveId(id.to_string()),
        company_name: "Stellar Tech".to_string(),
        role: "Software Engineer".to_string(),
        package: "24 LPA".to_string(),
        location: "Bangalore, India".to_string(),
        deadline: NaiveDate::from_ymd_opt(2024, 12, 15).expect("valid date"),
        requirements,
    }
}

pub(super) fn stellar_drive() -> PlacementDrive {
    drive("d1", stellar_requirements())
}

pub(super) fn application(id: &str, candidate: &str, drive: &str) -> Application {
    Application::new(
        ApplicationId(id.to_string()),
        CandidateId(candidate.to_string()),
        DriveId(drive.to_string()),
        applied_at(),
    )
}

pub(super) fn application_in(status: ApplicationStatus) -> Application {
    Application {
        status,
        ..application("app-1", "s1", "d1")
    }
}

pub(super) fn profiles(candidates: Vec<CandidateProfile>) -> HashMap<CandidateId, CandidateProfile> {
    candidates
        .into_iter()
        .map(|profile| (profile.id.clone(), profile))
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, application: Application) {
        self.records
            .lock()
            .expect("lock")
            .insert(application.id.clone(), application);
    }

    pub(super) fn status_of(&self, id: &str) -> ApplicationStatus {
        self.records
            .lock()
            .expect("lock")
            .get(&ApplicationId(id.to_string()))
            .map(|application| application.status)
            .expect("application seeded")
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
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
        Ok(self.records.lock().expect("lock").get(id).cloned())
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
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
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|application| &application.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    fn replace_if_status(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
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

/// Repository whose stored copy has always moved on by commit time.
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
    pub(super) moved_to: ApplicationStatus,
}

impl ApplicationRepository for RacingRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_drive(drive_id)
    }

    fn for_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_candidate(candidate_id)
    }

    fn replace_if_status(
        &self,
        _application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::StaleStatus {
            expected,
            actual: self.moved_to,
        })
    }
}

/// Repository that holds every `for_candidate` reader at a barrier after its snapshot, so
/// concurrent callers all observe the same pre-insert state.
pub(super) struct SnapshotBarrierRepository {
    pub(super) inner: MemoryRepository,
    pub(super) barrier: Barrier,
}

impl SnapshotBarrierRepository {
    pub(super) fn new(inner: MemoryRepository, readers: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(readers),
        }
    }
}

impl ApplicationRepository for SnapshotBarrierRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.for_drive(drive_id)
    }

    fn for_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let snapshot = self.inner.for_candidate(candidate_id)?;
        self.barrier.wait();
        Ok(snapshot)
    }

    fn replace_if_status(
        &self,
        application: Application,
        expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        self.inner.replace_if_status(application, expected)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn for_drive(&self, _drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn for_candidate(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn replace_if_status(
        &self,
        _application: Application,
        _expected: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    candidates: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
    drives: Arc<Mutex<Vec<PlacementDrive>>>,
}

impl MemoryDirectory {
    pub(super) fn with(candidates: Vec<CandidateProfile>, drives: Vec<PlacementDrive>) -> Self {
        let directory = Self::default();
        *directory.candidates.lock().expect("lock") = profiles(candidates);
        *directory.drives.lock().expect("lock") = drives;
        directory
    }
}

impl PlacementDirectory for MemoryDirectory {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        Ok(self.candidates.lock().expect("lock").get(id).cloned())
    }

    fn drive(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError> {
        Ok(self
            .drives
            .lock()
            .expect("lock")
            .iter()
            .find(|drive| &drive.id == id)
            .cloned())
    }

    fn drives(&self) -> Result<Vec<PlacementDrive>, RepositoryError> {
        Ok(self.drives.lock().expect("lock").clone())
    }

    fn publish_drive(&self, drive: PlacementDrive) -> Result<PlacementDrive, RepositoryError> {
        let mut guard = self.drives.lock().expect("lock");
        if guard.iter().any(|existing| existing.id == drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(drive.clone());
        Ok(drive)
    }
}

pub(super) type TestService = PlacementService<MemoryRepository, MemoryDirectory>;

/// Service over the demo candidate plus two classmates and the Stellar and Lumina drives.
pub(super) fn build_service() -> (Arc<TestService>, MemoryRepository, MemoryDirectory) {
    let repository = MemoryRepository::default();
    let directory = MemoryDirectory::with(
        vec![
            student(),
            candidate("s2", 8.9, &["node.js", "Go"]),
            candidate("s3", 6.1, &["React"]),
        ],
        vec![stellar_drive(), drive("d2", lumina_requirements())],
    );
    let service = Arc::new(PlacementService::new(
        Arc::new(repository.clone()),
        Arc::new(directory.clone()),
    ));
    (service, repository, directory)
}

pub(super) fn router() -> (axum::Router, MemoryRepository) {
    let (service, repository, _) = build_service();
    (placement_router(service), repository)
}

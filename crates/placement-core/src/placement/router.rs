use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationId, CandidateId, DriveId, PlacementDrive};
use super::repository::{
    ApplicationRepository, ApplicationStatusView, PlacementDirectory, RepositoryError,
};
use super::service::{ApplicantFilter, ApplicationServiceError, PlacementService};

type SharedService<R, D> = Arc<PlacementService<R, D>>;

/// Router builder exposing the drive, eligibility and pipeline endpoints.
pub fn placement_router<R, D>(service: SharedService<R, D>) -> Router
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    Router::new()
        .route("/api/v1/drives", post(publish_drive_handler::<R, D>))
        .route(
            "/api/v1/drives/:drive_id/applications",
            post(apply_handler::<R, D>),
        )
        .route(
            "/api/v1/drives/:drive_id/shortlist",
            post(shortlist_handler::<R, D>),
        )
        .route(
            "/api/v1/drives/:drive_id/summary",
            get(summary_handler::<R, D>),
        )
        .route(
            "/api/v1/drives/:drive_id/applicants",
            get(applicants_handler::<R, D>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/applications",
            get(candidate_applications_handler::<R, D>),
        )
        .route("/api/v1/eligibility", post(eligibility_handler::<R, D>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, D>),
        )
        .route(
            "/api/v1/applications/:application_id/advance",
            post(advance_handler::<R, D>),
        )
        .route(
            "/api/v1/applications/:application_id/reject",
            post(reject_handler::<R, D>),
        )
        .with_state(service)
}

impl ApplicationServiceError {
    /// HTTP status a collaborating API layer should report for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationServiceError::Transition(_)
            | ApplicationServiceError::DuplicateApplication { .. }
            | ApplicationServiceError::Repository(RepositoryError::Conflict)
            | ApplicationServiceError::Repository(RepositoryError::OpenApplication { .. })
            | ApplicationServiceError::Repository(RepositoryError::StaleStatus { .. }) => {
                StatusCode::CONFLICT
            }
            ApplicationServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationServiceError::UnknownCandidate(_)
            | ApplicationServiceError::UnknownDrive(_)
            | ApplicationServiceError::UnknownApplication(_)
            | ApplicationServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ApplicationServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), Json(payload)).into_response()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub candidate_id: CandidateId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantQuery {
    #[serde(default)]
    pub filter: ApplicantFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub candidate_id: CandidateId,
    pub drive_id: DriveId,
}

pub(crate) async fn publish_drive_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Json(drive): Json<PlacementDrive>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.publish_drive(drive) {
        Ok(drive) => (StatusCode::CREATED, Json(drive)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(drive_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.apply(&request.candidate_id, &DriveId(drive_id)) {
        Ok(application) => {
            let view = ApplicationStatusView::from(&application);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn shortlist_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.auto_shortlist(&DriveId(drive_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(drive_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.drive_summary(&DriveId(drive_id)) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applicants_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(drive_id): Path<String>,
    Query(query): Query<ApplicantQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.drive_applicants(&DriveId(drive_id), query.filter) {
        Ok(applicants) => (StatusCode::OK, Json(applicants)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidate_applications_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.applications_for_candidate(&CandidateId(candidate_id)) {
        Ok(applications) => {
            let views: Vec<ApplicationStatusView> =
                applications.iter().map(ApplicationStatusView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Json(request): Json<EligibilityRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.evaluate(&request.candidate_id, &request.drive_id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => {
            (StatusCode::OK, Json(ApplicationStatusView::from(&application))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn advance_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.advance(&ApplicationId(application_id)) {
        Ok(application) => {
            (StatusCode::OK, Json(ApplicationStatusView::from(&application))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, D>(
    State(service): State<SharedService<R, D>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    D: PlacementDirectory + 'static,
{
    match service.reject(&ApplicationId(application_id)) {
        Ok(application) => {
            (StatusCode::OK, Json(ApplicationStatusView::from(&application))).into_response()
        }
        Err(error) => error_response(error),
    }
}

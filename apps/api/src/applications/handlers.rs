use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::repository::{self, NewApplication};
use crate::applications::stats::{compute_stats, ApplicationStats};
use crate::applications::status::ApplicationStatus;
use crate::documents::repository::get_owned_document;
use crate::errors::AppError;
use crate::jobs::repository::get_owned_job;
use crate::models::application::{ApplicationEventRow, ApplicationRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateApplicationRequest {
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub job_id: Option<Uuid>,
    pub document_id: Option<Uuid>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub user_id: Uuid,
    pub status: String,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateApplicationRequest {
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub document_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ApplicationDetail {
    pub application: ApplicationRow,
    pub events: Vec<ApplicationEventRow>,
}

/// New applications may start anywhere short of a terminal status.
fn initial_status(raw: Option<&str>) -> Result<ApplicationStatus, AppError> {
    let status = match raw {
        Some(s) => s.parse()?,
        None => ApplicationStatus::Saved,
    };
    if status.is_terminal() {
        return Err(AppError::Validation(format!(
            "an application cannot start as {status}"
        )));
    }
    Ok(status)
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    if req.company.trim().is_empty() || req.role.trim().is_empty() {
        return Err(AppError::Validation(
            "company and role must not be empty".to_string(),
        ));
    }
    let status = initial_status(req.status.as_deref())?;
    if let Some(job_id) = req.job_id {
        get_owned_job(&state.db, req.user_id, job_id).await?;
    }
    if let Some(document_id) = req.document_id {
        get_owned_document(&state.db, req.user_id, document_id).await?;
    }

    let row = repository::create_application(
        &state.db,
        NewApplication {
            user_id: req.user_id,
            company: req.company.trim(),
            role: req.role.trim(),
            job_id: req.job_id,
            document_id: req.document_id,
            status,
            notes: req.notes.as_deref(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;
    Ok(Json(
        repository::list_applications(&state.db, params.user_id, status).await?,
    ))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application = repository::get_owned_application(&state.db, params.user_id, id).await?;
    let events = repository::list_events(&state.db, id).await?;
    Ok(Json(ApplicationDetail {
        application,
        events,
    }))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let next: ApplicationStatus = req.status.parse()?;
    Ok(Json(
        repository::change_status(&state.db, req.user_id, id, next, req.note.as_deref()).await?,
    ))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    if let Some(document_id) = req.document_id {
        get_owned_document(&state.db, req.user_id, document_id).await?;
    }
    Ok(Json(
        repository::update_details(
            &state.db,
            req.user_id,
            id,
            req.notes.as_deref(),
            req.document_id,
        )
        .await?,
    ))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_application(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/applications/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationStats>, AppError> {
    let summaries = repository::status_summaries(&state.db, params.user_id).await?;
    Ok(Json(compute_stats(&summaries)))
}

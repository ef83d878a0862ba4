use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{EducationRow, ExperienceRow, ProfileRow, ProfileSnapshot, SkillRow};
use crate::parser::parse_resume;
use crate::profile::completeness::{compute_completeness_report, CompletenessReport};
use crate::profile::import::{apply_import, plan_import, ImportSummary};
use crate::profile::inputs::{
    EducationFields, ExperienceFields, ProfileHeaderRequest, Scoped, SkillFields,
};
use crate::profile::repository;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub user_id: Uuid,
    pub text: String,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileSnapshot>, AppError> {
    Ok(Json(repository::get_snapshot(&state.db, params.user_id).await?))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileHeaderRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    req.validate()?;
    Ok(Json(repository::upsert_header(&state.db, &req).await?))
}

/// GET /api/v1/profile/completeness
pub async fn handle_completeness(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CompletenessReport>, AppError> {
    let snapshot = repository::get_snapshot(&state.db, params.user_id).await?;
    Ok(Json(compute_completeness_report(&snapshot)))
}

/// POST /api/v1/profile/import
pub async fn handle_import(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let parsed = parse_resume(&req.text);
    let existing = repository::get_snapshot(&state.db, req.user_id).await?;
    let plan = plan_import(&existing, &parsed);
    Ok(Json(apply_import(&state.db, req.user_id, &plan).await?))
}

// ── experiences ─────────────────────────────────────────────────────────────

/// POST /api/v1/profile/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Json(req): Json<Scoped<ExperienceFields>>,
) -> Result<(StatusCode, Json<ExperienceRow>), AppError> {
    req.fields.validate()?;
    let row = repository::insert_experience(&state.db, req.user_id, &req.fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/profile/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<Scoped<ExperienceFields>>,
) -> Result<Json<ExperienceRow>, AppError> {
    req.fields.validate()?;
    Ok(Json(
        repository::update_experience(&state.db, req.user_id, id, &req.fields).await?,
    ))
}

/// DELETE /api/v1/profile/experiences/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_experience(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── educations ──────────────────────────────────────────────────────────────

/// POST /api/v1/profile/educations
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(req): Json<Scoped<EducationFields>>,
) -> Result<(StatusCode, Json<EducationRow>), AppError> {
    req.fields.validate()?;
    let row = repository::insert_education(&state.db, req.user_id, &req.fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/profile/educations/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<Scoped<EducationFields>>,
) -> Result<Json<EducationRow>, AppError> {
    req.fields.validate()?;
    Ok(Json(
        repository::update_education(&state.db, req.user_id, id, &req.fields).await?,
    ))
}

/// DELETE /api/v1/profile/educations/:id
pub async fn handle_delete_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_education(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── skills ──────────────────────────────────────────────────────────────────

/// POST /api/v1/profile/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<Scoped<SkillFields>>,
) -> Result<(StatusCode, Json<SkillRow>), AppError> {
    req.fields.validate()?;
    let row = repository::upsert_skill(&state.db, req.user_id, &req.fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/profile/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<Scoped<SkillFields>>,
) -> Result<Json<SkillRow>, AppError> {
    req.fields.validate()?;
    Ok(Json(
        repository::update_skill(&state.db, req.user_id, id, &req.fields).await?,
    ))
}

/// DELETE /api/v1/profile/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_skill(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::fit_scoring::FitReport;
use crate::jobs::keywords::{extract_keywords, Keyword};
use crate::jobs::repository::{self, NewJobPosting};
use crate::models::job::JobPostingRow;
use crate::profile::repository::get_snapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub top_n: Option<usize>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub keywords: Vec<Keyword>,
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub url: Option<String>,
    pub description: String,
}

impl CreateJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct ScoreByIdRequest {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ScoreTextRequest {
    pub user_id: Uuid,
    pub text: String,
}

/// A missing or zero `top_n` falls back to the configured default.
fn resolve_top_n(requested: Option<usize>, default: usize) -> usize {
    requested.filter(|n| *n > 0).unwrap_or(default)
}

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let top_n = resolve_top_n(req.top_n, state.config.keyword_top_n);
    Ok(Json(AnalyzeResponse {
        keywords: extract_keywords(&req.text, top_n),
    }))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    req.validate()?;

    let keywords = extract_keywords(&req.description, state.config.keyword_top_n);
    let job = repository::insert_job(
        &state.db,
        NewJobPosting {
            user_id: req.user_id,
            title: req.title.trim(),
            company: req.company.as_deref(),
            url: req.url.as_deref(),
            description: &req.description,
            keywords,
        },
    )
    .await?;

    info!(
        "Stored job posting {} for user {} ({} keywords)",
        job.id,
        job.user_id,
        job.keywords.len()
    );
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    Ok(Json(repository::list_jobs(&state.db, params.user_id).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobPostingRow>, AppError> {
    Ok(Json(
        repository::get_owned_job(&state.db, params.user_id, id).await?,
    ))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_job(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/score
pub async fn handle_score_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScoreByIdRequest>,
) -> Result<Json<FitReport>, AppError> {
    let job = repository::get_owned_job(&state.db, req.user_id, id).await?;
    let profile = get_snapshot(&state.db, req.user_id).await?;
    let report = state.fit_scorer.score(&profile, &job.keywords.0).await?;
    Ok(Json(report))
}

/// POST /api/v1/jobs/score
pub async fn handle_score_text(
    State(state): State<AppState>,
    Json(req): Json<ScoreTextRequest>,
) -> Result<Json<FitReport>, AppError> {
    let keywords = extract_keywords(&req.text, state.config.keyword_top_n);
    let profile = get_snapshot(&state.db, req.user_id).await?;
    let report = state.fit_scorer.score(&profile, &keywords).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(title: &str, description: &str) -> CreateJobRequest {
        serde_json::from_value(json!({
            "user_id": Uuid::nil(),
            "title": title,
            "description": description,
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_requires_title_and_description() {
        assert!(create_request("Backend Engineer", "Rust and Postgres").validate().is_ok());
        assert!(matches!(
            create_request("  ", "Rust and Postgres").validate(),
            Err(AppError::Validation(msg)) if msg.contains("title")
        ));
        assert!(matches!(
            create_request("Backend Engineer", "\n").validate(),
            Err(AppError::Validation(msg)) if msg.contains("description")
        ));
    }

    #[test]
    fn test_create_request_optional_fields_default_to_none() {
        let req = create_request("Backend Engineer", "Rust");
        assert!(req.company.is_none());
        assert!(req.url.is_none());
    }

    #[test]
    fn test_top_n_falls_back_to_default() {
        assert_eq!(resolve_top_n(None, 20), 20);
        assert_eq!(resolve_top_n(Some(0), 20), 20);
        assert_eq!(resolve_top_n(Some(5), 20), 5);
    }
}

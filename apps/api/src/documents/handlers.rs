use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::repository;
use crate::documents::templates::{render, DocumentTemplate, Tailoring};
use crate::documents::versioning::append_version;
use crate::errors::AppError;
use crate::jobs::repository::get_owned_job;
use crate::models::document::{DocumentRow, DocumentVersionRow};
use crate::profile::repository::get_snapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateDocumentRequest {
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub job_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct RenderRequest {
    pub user_id: Uuid,
    pub template: Option<String>,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub document: DocumentRow,
    pub latest_version: DocumentVersionRow,
}

/// Renders the caller's current profile, tailored to the job when there is one.
async fn render_for(
    state: &AppState,
    user_id: Uuid,
    template: DocumentTemplate,
    job_id: Option<Uuid>,
) -> Result<String, AppError> {
    let snapshot = get_snapshot(&state.db, user_id).await?;
    let tailoring = match job_id {
        Some(id) => {
            let job = get_owned_job(&state.db, user_id, id).await?;
            Some(Tailoring {
                keywords: job.keywords.0.iter().map(|k| k.term.clone()).collect(),
            })
        }
        None => None,
    };
    Ok(render(template, &snapshot, tailoring.as_ref()))
}

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    let template = DocumentTemplate::parse(&req.template)?;
    let content = render_for(&state, req.user_id, template, req.job_id).await?;

    let mut tx = state.db.begin().await?;
    let document =
        repository::insert_document(&mut *tx, req.user_id, title, template.as_str(), req.job_id)
            .await?;
    let latest_version = append_version(
        &mut tx,
        &state.s3,
        &state.config.s3_bucket,
        &document,
        template.as_str(),
        &content,
    )
    .await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse {
            document,
            latest_version,
        }),
    ))
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DocumentRow>>, AppError> {
    Ok(Json(repository::list_documents(&state.db, params.user_id).await?))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = repository::get_owned_document(&state.db, params.user_id, id).await?;
    let latest_version = repository::latest_version(&state.db, id).await?;
    Ok(Json(DocumentResponse {
        document,
        latest_version,
    }))
}

/// POST /api/v1/documents/:id/render
pub async fn handle_render_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = repository::get_owned_document(&state.db, req.user_id, id).await?;
    let template = match req.template.as_deref() {
        Some(t) => DocumentTemplate::parse(t)?,
        None => DocumentTemplate::parse(&document.template)?,
    };
    let content = render_for(&state, req.user_id, template, document.job_id).await?;

    let mut tx = state.db.begin().await?;
    let latest_version = append_version(
        &mut tx,
        &state.s3,
        &state.config.s3_bucket,
        &document,
        template.as_str(),
        &content,
    )
    .await?;
    tx.commit().await?;

    let document = repository::get_owned_document(&state.db, req.user_id, id).await?;
    Ok(Json(DocumentResponse {
        document,
        latest_version,
    }))
}

/// GET /api/v1/documents/:id/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DocumentVersionRow>>, AppError> {
    repository::get_owned_document(&state.db, params.user_id, id).await?;
    Ok(Json(repository::list_versions(&state.db, id).await?))
}

/// GET /api/v1/documents/:id/versions/:v
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(Uuid, i32)>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DocumentVersionRow>, AppError> {
    repository::get_owned_document(&state.db, params.user_id, id).await?;
    Ok(Json(repository::get_version(&state.db, id, version).await?))
}

/// GET /api/v1/documents/:id/export
pub async fn handle_export_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let document = repository::get_owned_document(&state.db, params.user_id, id).await?;
    let version = repository::latest_version(&state.db, id).await?;
    let disposition = format!(
        "attachment; filename=\"{}-v{}.md\"",
        export_slug(&document.title),
        version.version
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        version.content,
    )
        .into_response())
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    repository::delete_document(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// ASCII file-name stem for the export header.
fn export_slug(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume".to_string()
    } else {
        slug
    }
}

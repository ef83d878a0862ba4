use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::{ensure_owner, AppError};
use crate::models::document::{DocumentRow, DocumentVersionRow};

pub async fn insert_document(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    title: &str,
    template: &str,
    job_id: Option<Uuid>,
) -> Result<DocumentRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO documents (id, user_id, title, template, job_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(template)
    .bind(job_id)
    .fetch_one(exec)
    .await?)
}

pub async fn list_documents(pool: &PgPool, user_id: Uuid) -> Result<Vec<DocumentRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM documents WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// NotFound when the document does not exist, Forbidden when it is someone else's.
pub async fn get_owned_document(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<DocumentRow, AppError> {
    let doc: Option<DocumentRow> = sqlx::query_as("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let doc = doc.ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    ensure_owner(doc.user_id, user_id)?;
    Ok(doc)
}

pub async fn latest_version(
    pool: &PgPool,
    document_id: Uuid,
) -> Result<DocumentVersionRow, AppError> {
    let row: Option<DocumentVersionRow> = sqlx::query_as(
        "SELECT * FROM document_versions WHERE document_id = $1 ORDER BY version DESC LIMIT 1",
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Document {document_id} has no versions")))
}

pub async fn list_versions(
    pool: &PgPool,
    document_id: Uuid,
) -> Result<Vec<DocumentVersionRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM document_versions WHERE document_id = $1 ORDER BY version ASC",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_version(
    pool: &PgPool,
    document_id: Uuid,
    version: i32,
) -> Result<DocumentVersionRow, AppError> {
    let row: Option<DocumentVersionRow> = sqlx::query_as(
        "SELECT * FROM document_versions WHERE document_id = $1 AND version = $2",
    )
    .bind(document_id)
    .bind(version)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| {
        AppError::NotFound(format!("Version {version} of document {document_id} not found"))
    })
}

pub async fn delete_document(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    get_owned_document(pool, user_id, id).await?;
    sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

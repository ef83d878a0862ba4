//! Append-only document versions with a Markdown snapshot in S3.
//!
//! A render never updates an existing version row; it inserts version N+1.

use aws_sdk_s3::primitives::ByteStream;
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentRow, DocumentVersionRow};

pub fn version_key(user_id: Uuid, document_id: Uuid, version: i32) -> String {
    format!("documents/{user_id}/{document_id}/v{version}.md")
}

pub async fn upload_snapshot(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    content: &str,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(content.as_bytes().to_vec()))
        .content_type("text/markdown")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload of {key} failed: {e}")))?;
    info!("Uploaded document snapshot to s3://{bucket}/{key}");
    Ok(())
}

/// Inserts the next version of `document` inside `tx`.
///
/// The document row is locked first so concurrent renders serialize on it.
/// The snapshot is uploaded before the row is written; if the insert then
/// fails the transaction rolls back and the object is simply orphaned.
pub async fn append_version(
    tx: &mut Transaction<'_, Postgres>,
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    document: &DocumentRow,
    template: &str,
    content: &str,
) -> Result<DocumentVersionRow, AppError> {
    sqlx::query("SELECT id FROM documents WHERE id = $1 FOR UPDATE")
        .bind(document.id)
        .execute(&mut **tx)
        .await?;

    let current: Option<i32> =
        sqlx::query_scalar("SELECT MAX(version) FROM document_versions WHERE document_id = $1")
            .bind(document.id)
            .fetch_one(&mut **tx)
            .await?;
    let version = current.unwrap_or(0) + 1;

    let s3_key = version_key(document.user_id, document.id, version);
    upload_snapshot(s3, bucket, &s3_key, content).await?;

    let row: DocumentVersionRow = sqlx::query_as(
        r#"
        INSERT INTO document_versions (id, document_id, version, template, content, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(document.id)
    .bind(version)
    .bind(template)
    .bind(content)
    .bind(&s3_key)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("UPDATE documents SET template = $2, updated_at = now() WHERE id = $1")
        .bind(document.id)
        .bind(template)
        .execute(&mut **tx)
        .await?;

    info!("Appended version {version} to document {}", document.id);
    Ok(row)
}

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{ensure_owner, AppError};
use crate::jobs::keywords::Keyword;
use crate::models::job::JobPostingRow;

pub struct NewJobPosting<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub company: Option<&'a str>,
    pub url: Option<&'a str>,
    pub description: &'a str,
    pub keywords: Vec<Keyword>,
}

pub async fn insert_job(pool: &PgPool, job: NewJobPosting<'_>) -> Result<JobPostingRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO job_postings (id, user_id, title, company, url, description, keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.user_id)
    .bind(job.title)
    .bind(job.company)
    .bind(job.url)
    .bind(job.description)
    .bind(Json(job.keywords))
    .fetch_one(pool)
    .await?)
}

pub async fn list_jobs(pool: &PgPool, user_id: Uuid) -> Result<Vec<JobPostingRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM job_postings WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Loads a posting: NotFound when missing, Forbidden when owned by someone else.
pub async fn get_owned_job(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<JobPostingRow, AppError> {
    let job: Option<JobPostingRow> = sqlx::query_as("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))?;
    ensure_owner(job.user_id, user_id)?;
    Ok(job)
}

pub async fn delete_job(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    get_owned_job(pool, user_id, id).await?;
    sqlx::query("DELETE FROM job_postings WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

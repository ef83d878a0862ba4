//! Application rows plus their append-only status history.

use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::applications::stats::StatusSummary;
use crate::applications::status::ApplicationStatus;
use crate::errors::{ensure_owner, AppError};
use crate::models::application::{ApplicationEventRow, ApplicationRow};

pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub company: &'a str,
    pub role: &'a str,
    pub job_id: Option<Uuid>,
    pub document_id: Option<Uuid>,
    pub status: ApplicationStatus,
    pub notes: Option<&'a str>,
}

async fn insert_event(
    exec: impl PgExecutor<'_>,
    application_id: Uuid,
    from: Option<ApplicationStatus>,
    to: ApplicationStatus,
    note: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO application_events (id, application_id, from_status, to_status, note)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(from.map(|s| s.as_str()))
    .bind(to.as_str())
    .bind(note)
    .execute(exec)
    .await?;
    Ok(())
}

/// Inserts the application and its opening event in one transaction.
pub async fn create_application(
    pool: &PgPool,
    app: NewApplication<'_>,
) -> Result<ApplicationRow, AppError> {
    let mut tx = pool.begin().await?;
    let row: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications
            (id, user_id, company, role, job_id, document_id, status, notes, applied_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                CASE WHEN $7 = 'saved' THEN NULL ELSE now() END)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(app.user_id)
    .bind(app.company)
    .bind(app.role)
    .bind(app.job_id)
    .bind(app.document_id)
    .bind(app.status.as_str())
    .bind(app.notes)
    .fetch_one(&mut *tx)
    .await?;
    insert_event(&mut *tx, row.id, None, app.status, None).await?;
    tx.commit().await?;
    Ok(row)
}

pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationRow>, AppError> {
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM applications
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?)
}

pub async fn get_owned_application(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let row: Option<ApplicationRow> = sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    let row = row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    ensure_owner(row.user_id, user_id)?;
    Ok(row)
}

pub async fn list_events(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<ApplicationEventRow>, AppError> {
    Ok(sqlx::query_as(
        "SELECT * FROM application_events WHERE application_id = $1 ORDER BY created_at ASC",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?)
}

/// Validates and applies a status change, appending the event in the same transaction.
pub async fn change_status(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    next: ApplicationStatus,
    note: Option<&str>,
) -> Result<ApplicationRow, AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<ApplicationRow> =
        sqlx::query_as("SELECT * FROM applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let row = row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    ensure_owner(row.user_id, user_id)?;

    let current: ApplicationStatus = row.status.parse()?;
    let next = current.transition(next)?;

    let updated: ApplicationRow = sqlx::query_as(
        r#"
        UPDATE applications SET
            status = $2,
            applied_at = CASE WHEN $2 = 'applied' THEN COALESCE(applied_at, now()) ELSE applied_at END,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(next.as_str())
    .fetch_one(&mut *tx)
    .await?;
    insert_event(&mut *tx, id, Some(current), next, note).await?;

    tx.commit().await?;
    info!("Application {id}: {current} -> {next}");
    Ok(updated)
}

pub async fn update_details(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    notes: Option<&str>,
    document_id: Option<Uuid>,
) -> Result<ApplicationRow, AppError> {
    get_owned_application(pool, user_id, id).await?;
    Ok(sqlx::query_as(
        r#"
        UPDATE applications SET
            notes = COALESCE($2, notes),
            document_id = COALESCE($3, document_id),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(notes)
    .bind(document_id)
    .fetch_one(pool)
    .await?)
}

pub async fn delete_application(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    get_owned_application(pool, user_id, id).await?;
    sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn status_summaries(pool: &PgPool, user_id: Uuid) -> Result<Vec<StatusSummary>, AppError> {
    let rows: Vec<(String, bool, bool)> = sqlx::query_as(
        r#"
        SELECT a.status,
               a.applied_at IS NOT NULL,
               EXISTS (
                   SELECT 1 FROM application_events e
                   WHERE e.application_id = a.id
                     AND e.to_status IN ('interviewing', 'offer', 'hired')
               )
        FROM applications a
        WHERE a.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(status, submitted, reached_interview)| {
            Ok(StatusSummary {
                status: status.parse()?,
                submitted,
                reached_interview,
            })
        })
        .collect()
}

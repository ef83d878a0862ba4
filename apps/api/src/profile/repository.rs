//! Hand-written SQL for the profile tables.
//!
//! Every mutation is scoped by `user_id`; callers turn "no row" into NotFound.
//! Functions taking a `PgExecutor` run equally on the pool or inside a
//! transaction (see `profile::import`).

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{EducationRow, ExperienceRow, ProfileRow, ProfileSnapshot, SkillRow};
use crate::profile::inputs::{
    EducationFields, ExperienceFields, ProfileHeaderRequest, SkillFields,
};

/// Header fields to fill; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub summary: Option<String>,
}

impl HeaderPatch {
    pub fn filled_count(&self) -> usize {
        [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.linkedin_url,
            &self.summary,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Loads the full profile. A user without a header row gets an empty one.
pub async fn get_snapshot(pool: &PgPool, user_id: Uuid) -> Result<ProfileSnapshot, AppError> {
    let profile: Option<ProfileRow> =
        sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let experiences: Vec<ExperienceRow> = sqlx::query_as(
        r#"
        SELECT * FROM experiences
        WHERE user_id = $1
        ORDER BY is_current DESC, end_date DESC NULLS FIRST, start_date DESC NULLS LAST, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let educations: Vec<EducationRow> = sqlx::query_as(
        "SELECT * FROM educations WHERE user_id = $1 ORDER BY end_year DESC NULLS FIRST, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let skills: Vec<SkillRow> =
        sqlx::query_as("SELECT * FROM skills WHERE user_id = $1 ORDER BY created_at ASC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(ProfileSnapshot {
        profile: profile.unwrap_or(ProfileRow {
            user_id,
            ..Default::default()
        }),
        experiences,
        educations,
        skills,
    })
}

pub async fn upsert_header(
    exec: impl PgExecutor<'_>,
    req: &ProfileHeaderRequest,
) -> Result<ProfileRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO profiles
            (user_id, full_name, headline, email, phone, location, linkedin_url, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            headline = EXCLUDED.headline,
            email = EXCLUDED.email,
            phone = EXCLUDED.phone,
            location = EXCLUDED.location,
            linkedin_url = EXCLUDED.linkedin_url,
            summary = EXCLUDED.summary,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(req.user_id)
    .bind(&req.full_name)
    .bind(&req.headline)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.location)
    .bind(&req.linkedin_url)
    .bind(&req.summary)
    .fetch_one(exec)
    .await?)
}

/// Fills header fields without overwriting anything already stored.
pub async fn fill_header(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    patch: &HeaderPatch,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, full_name, email, phone, linkedin_url, summary)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE SET
            full_name = COALESCE(NULLIF(profiles.full_name, ''), EXCLUDED.full_name),
            email = COALESCE(NULLIF(profiles.email, ''), EXCLUDED.email),
            phone = COALESCE(NULLIF(profiles.phone, ''), EXCLUDED.phone),
            linkedin_url = COALESCE(NULLIF(profiles.linkedin_url, ''), EXCLUDED.linkedin_url),
            summary = COALESCE(NULLIF(profiles.summary, ''), EXCLUDED.summary),
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&patch.full_name)
    .bind(&patch.email)
    .bind(&patch.phone)
    .bind(&patch.linkedin_url)
    .bind(&patch.summary)
    .execute(exec)
    .await?;
    Ok(())
}

// ── experiences ─────────────────────────────────────────────────────────────

pub async fn insert_experience(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    exp: &ExperienceFields,
) -> Result<ExperienceRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO experiences
            (id, user_id, title, company, location, start_date, end_date, is_current, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&exp.title)
    .bind(&exp.company)
    .bind(&exp.location)
    .bind(exp.start_date)
    .bind(exp.end_date)
    .bind(exp.is_current)
    .bind(&exp.description)
    .fetch_one(exec)
    .await?)
}

pub async fn update_experience(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
    exp: &ExperienceFields,
) -> Result<ExperienceRow, AppError> {
    let row: Option<ExperienceRow> = sqlx::query_as(
        r#"
        UPDATE experiences SET
            title = $3, company = $4, location = $5, start_date = $6,
            end_date = $7, is_current = $8, description = $9
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&exp.title)
    .bind(&exp.company)
    .bind(&exp.location)
    .bind(exp.start_date)
    .bind(exp.end_date)
    .bind(exp.is_current)
    .bind(&exp.description)
    .fetch_optional(exec)
    .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Experience {id} not found")))
}

pub async fn delete_experience(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM experiences WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Experience {id} not found")));
    }
    Ok(())
}

// ── educations ──────────────────────────────────────────────────────────────

pub async fn insert_education(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    edu: &EducationFields,
) -> Result<EducationRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO educations
            (id, user_id, institution, degree, field_of_study, start_year, end_year)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&edu.institution)
    .bind(&edu.degree)
    .bind(&edu.field_of_study)
    .bind(edu.start_year)
    .bind(edu.end_year)
    .fetch_one(exec)
    .await?)
}

pub async fn update_education(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
    edu: &EducationFields,
) -> Result<EducationRow, AppError> {
    let row: Option<EducationRow> = sqlx::query_as(
        r#"
        UPDATE educations SET
            institution = $3, degree = $4, field_of_study = $5, start_year = $6, end_year = $7
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&edu.institution)
    .bind(&edu.degree)
    .bind(&edu.field_of_study)
    .bind(edu.start_year)
    .bind(edu.end_year)
    .fetch_optional(exec)
    .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Education {id} not found")))
}

pub async fn delete_education(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM educations WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Education {id} not found")));
    }
    Ok(())
}

// ── skills ──────────────────────────────────────────────────────────────────

/// Case-insensitive upsert: adding "rust" when "Rust" exists only updates the level.
pub async fn upsert_skill(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    skill: &SkillFields,
) -> Result<SkillRow, AppError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO skills (id, user_id, name, level)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, lower(name)) DO UPDATE SET
            level = COALESCE(EXCLUDED.level, skills.level)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(skill.name.trim())
    .bind(&skill.level)
    .fetch_one(exec)
    .await?)
}

pub async fn update_skill(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
    skill: &SkillFields,
) -> Result<SkillRow, AppError> {
    let row: Option<SkillRow> = sqlx::query_as(
        "UPDATE skills SET name = $3, level = $4 WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(skill.name.trim())
    .bind(&skill.level)
    .fetch_optional(exec)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("Skill '{}' already exists", skill.name.trim()))
        }
        _ => AppError::Database(e),
    })?;
    row.ok_or_else(|| AppError::NotFound(format!("Skill {id} not found")))
}

pub async fn delete_skill(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Skill {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_patch_counts_filled_fields() {
        let patch = HeaderPatch {
            full_name: Some("Ana".to_string()),
            phone: Some("+55 11 91234-5678".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.filled_count(), 2);
        assert_eq!(HeaderPatch::default().filled_count(), 0);
    }
}

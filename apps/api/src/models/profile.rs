use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub summary: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything a template, scorer or generator needs to know about one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub profile: ProfileRow,
    pub experiences: Vec<ExperienceRow>,
    pub educations: Vec<EducationRow>,
    pub skills: Vec<SkillRow>,
}

impl ProfileSnapshot {
    /// Free text searched by keyword matching: headline, summary,
    /// experience titles/descriptions and education degrees/fields.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(h) = self.profile.headline.as_deref() {
            parts.push(h);
        }
        if let Some(s) = self.profile.summary.as_deref() {
            parts.push(s);
        }
        for exp in &self.experiences {
            parts.push(&exp.title);
            parts.push(&exp.description);
        }
        for edu in &self.educations {
            parts.push(&edu.degree);
            if let Some(f) = edu.field_of_study.as_deref() {
                parts.push(f);
            }
        }
        parts.join("\n").to_lowercase()
    }

    pub fn display_name(&self) -> &str {
        self.profile
            .full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Candidate")
    }
}

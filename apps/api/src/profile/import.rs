//! Merges a parsed résumé into a stored profile.
//!
//! Planning is pure; applying runs the whole plan in one transaction.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileSnapshot;
use crate::parser::ParsedResume;
use crate::profile::inputs::{EducationFields, ExperienceFields, SkillFields};
use crate::profile::repository::{self, HeaderPatch};

#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub header: HeaderPatch,
    pub experiences: Vec<ExperienceFields>,
    pub educations: Vec<EducationFields>,
    pub skills: Vec<String>,
    pub skipped_skills: usize,
    /// Parsed experiences and educations missing a required field.
    pub skipped_entries: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImportSummary {
    pub header_fields_filled: usize,
    pub experiences_added: usize,
    pub educations_added: usize,
    pub skills_added: usize,
    pub skills_skipped: usize,
    pub entries_skipped: usize,
}

/// Decides what a parsed résumé adds to the profile.
///
/// Header fields only fill blanks. Experiences and educations are appended,
/// skipping exact (case-insensitive) duplicates of stored entries and any
/// entry that would fail the same validation as a manual edit. Skills merge
/// by case-insensitive name.
pub fn plan_import(existing: &ProfileSnapshot, parsed: &ParsedResume) -> ImportPlan {
    let p = &existing.profile;
    let fill = |current: &Option<String>, incoming: &Option<String>| -> Option<String> {
        let blank = current.as_deref().map_or(true, |v| v.trim().is_empty());
        if blank {
            incoming.clone().filter(|v| !v.trim().is_empty())
        } else {
            None
        }
    };
    let header = HeaderPatch {
        full_name: fill(&p.full_name, &parsed.name),
        email: fill(&p.email, &parsed.contact.email),
        phone: fill(&p.phone, &parsed.contact.phone),
        linkedin_url: fill(&p.linkedin_url, &parsed.contact.linkedin),
        summary: fill(&p.summary, &parsed.summary),
    };

    let mut seen_experiences: HashSet<(String, String)> = existing
        .experiences
        .iter()
        .map(|e| (e.title.to_lowercase(), e.company.to_lowercase()))
        .collect();
    let mut skipped_entries = 0;
    let experiences: Vec<ExperienceFields> = parsed
        .experiences
        .iter()
        .map(|e| {
            let start_date = e.start.and_then(|d| d.to_naive_date());
            let end_date = if e.is_current {
                None
            } else {
                e.end.and_then(|d| d.to_naive_date())
            };
            // Stored rows enforce end >= start.
            let end_date = match (start_date, end_date) {
                (Some(s), Some(end)) if end < s => None,
                (_, end) => end,
            };
            ExperienceFields {
                title: e.title.clone().unwrap_or_default(),
                company: e.company.clone().unwrap_or_default(),
                location: None,
                start_date,
                end_date,
                is_current: e.is_current,
                description: e.description.clone(),
            }
        })
        .filter(|e| {
            let valid = e.validate().is_ok();
            skipped_entries += usize::from(!valid);
            valid
        })
        .filter(|e| seen_experiences.insert((e.title.to_lowercase(), e.company.to_lowercase())))
        .collect();

    let mut seen_educations: HashSet<(String, String)> = existing
        .educations
        .iter()
        .map(|e| (e.institution.to_lowercase(), e.degree.to_lowercase()))
        .collect();
    let educations: Vec<EducationFields> = parsed
        .educations
        .iter()
        .map(|e| EducationFields {
            institution: e.institution.clone().unwrap_or_default(),
            degree: e.degree.clone().unwrap_or_default(),
            field_of_study: e.field_of_study.clone(),
            start_year: e.start_year,
            end_year: match (e.start_year, e.end_year) {
                (Some(s), Some(end)) if end < s => None,
                (_, end) => end,
            },
        })
        .filter(|e| {
            let valid = e.validate().is_ok();
            skipped_entries += usize::from(!valid);
            valid
        })
        .filter(|e| seen_educations.insert((e.institution.to_lowercase(), e.degree.to_lowercase())))
        .collect();

    let mut known: HashSet<String> = existing.skills.iter().map(|s| s.name.to_lowercase()).collect();
    let mut skills = Vec::new();
    let mut skipped_skills = 0;
    for name in &parsed.skills {
        if known.insert(name.to_lowercase()) {
            skills.push(name.clone());
        } else {
            skipped_skills += 1;
        }
    }

    ImportPlan {
        header,
        experiences,
        educations,
        skills,
        skipped_skills,
        skipped_entries,
    }
}

/// Writes the plan atomically. Nothing is stored if any insert fails.
pub async fn apply_import(
    pool: &PgPool,
    user_id: Uuid,
    plan: &ImportPlan,
) -> Result<ImportSummary, AppError> {
    let mut tx = pool.begin().await?;

    if plan.header.filled_count() > 0 {
        repository::fill_header(&mut *tx, user_id, &plan.header).await?;
    }
    for exp in &plan.experiences {
        repository::insert_experience(&mut *tx, user_id, exp).await?;
    }
    for edu in &plan.educations {
        repository::insert_education(&mut *tx, user_id, edu).await?;
    }
    for name in &plan.skills {
        let skill = SkillFields {
            name: name.clone(),
            level: None,
        };
        repository::upsert_skill(&mut *tx, user_id, &skill).await?;
    }

    tx.commit().await?;

    let summary = ImportSummary {
        header_fields_filled: plan.header.filled_count(),
        experiences_added: plan.experiences.len(),
        educations_added: plan.educations.len(),
        skills_added: plan.skills.len(),
        skills_skipped: plan.skipped_skills,
        entries_skipped: plan.skipped_entries,
    };
    info!("Imported résumé for user {user_id}: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{ExperienceRow, ProfileRow, SkillRow};
    use crate::parser::dates::PartialDate;
    use crate::parser::entries::{ParsedEducation, ParsedExperience};
    use chrono::{NaiveDate, Utc};

    fn existing() -> ProfileSnapshot {
        ProfileSnapshot {
            profile: ProfileRow {
                user_id: Uuid::nil(),
                full_name: Some("Ana Souza".to_string()),
                email: Some(String::new()),
                ..Default::default()
            },
            experiences: vec![ExperienceRow {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                location: None,
                start_date: None,
                end_date: None,
                is_current: false,
                description: String::new(),
                created_at: Utc::now(),
            }],
            educations: vec![],
            skills: vec![SkillRow {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                name: "Rust".to_string(),
                level: None,
                created_at: Utc::now(),
            }],
        }
    }

    fn parsed() -> ParsedResume {
        let mut p = ParsedResume {
            name: Some("Ana S.".to_string()),
            summary: Some("Backend engineer".to_string()),
            skills: vec!["rust".to_string(), "Go".to_string(), "go".to_string()],
            ..Default::default()
        };
        p.contact.email = Some("ana@example.com".to_string());
        p.experiences = vec![
            ParsedExperience {
                title: Some("engineer".to_string()),
                company: Some("ACME".to_string()),
                ..Default::default()
            },
            ParsedExperience {
                title: Some("Developer".to_string()),
                company: Some("Globex".to_string()),
                start: Some(PartialDate { year: 2021, month: Some(3) }),
                end: Some(PartialDate { year: 2023, month: None }),
                is_current: true,
                description: "Built things".to_string(),
            },
        ];
        p.educations = vec![ParsedEducation {
            institution: Some("USP".to_string()),
            degree: Some("Bacharelado".to_string()),
            ..Default::default()
        }];
        p
    }

    #[test]
    fn test_header_fills_only_blanks() {
        let plan = plan_import(&existing(), &parsed());
        assert_eq!(plan.header.full_name, None);
        assert_eq!(plan.header.email.as_deref(), Some("ana@example.com"));
        assert_eq!(plan.header.summary.as_deref(), Some("Backend engineer"));
        assert_eq!(plan.header.filled_count(), 2);
    }

    #[test]
    fn test_duplicate_experience_skipped() {
        let plan = plan_import(&existing(), &parsed());
        assert_eq!(plan.experiences.len(), 1);
        let exp = &plan.experiences[0];
        assert_eq!(exp.title, "Developer");
        assert_eq!(exp.company, "Globex");
        assert_eq!(exp.start_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        // Current positions never carry an end date.
        assert_eq!(exp.end_date, None);
    }

    #[test]
    fn test_skills_merge_case_insensitively() {
        let plan = plan_import(&existing(), &parsed());
        assert_eq!(plan.skills, vec!["Go"]);
        assert_eq!(plan.skipped_skills, 2);
    }

    #[test]
    fn test_educations_appended() {
        let plan = plan_import(&existing(), &parsed());
        assert_eq!(plan.educations.len(), 1);
        assert_eq!(plan.educations[0].institution, "USP");
    }

    #[test]
    fn test_entries_missing_required_fields_skipped() {
        let mut p = ParsedResume::default();
        p.experiences.push(ParsedExperience {
            title: Some("Software Engineer".to_string()),
            description: "Built services".to_string(),
            ..Default::default()
        });
        p.educations.push(ParsedEducation {
            degree: Some("MBA".to_string()),
            ..Default::default()
        });
        let plan = plan_import(&ProfileSnapshot::default(), &p);
        assert!(plan.experiences.is_empty());
        assert!(plan.educations.is_empty());
        assert_eq!(plan.skipped_entries, 2);
    }

    #[test]
    fn test_planned_entries_pass_validation() {
        let parsed = crate::parser::parse_resume(
            "Experience\nSoftware Engineer\nBuilt services used by 2 million people.\n\nData Analyst at Itaú | 2018 - 2020\nWrote reports.",
        );
        let plan = plan_import(&ProfileSnapshot::default(), &parsed);
        assert!(plan.experiences.iter().all(|e| e.validate().is_ok()));
        assert!(plan.experiences.iter().all(|e| !e.company.trim().is_empty()));
    }

    #[test]
    fn test_reversed_education_years_drop_end() {
        let mut p = ParsedResume::default();
        p.educations.push(ParsedEducation {
            institution: Some("USP".to_string()),
            degree: Some("Bacharelado".to_string()),
            start_year: Some(2016),
            end_year: Some(2012),
            ..Default::default()
        });
        let plan = plan_import(&ProfileSnapshot::default(), &p);
        assert_eq!(plan.educations.len(), 1);
        assert_eq!(plan.educations[0].end_year, None);
    }

    #[test]
    fn test_reversed_dates_drop_end() {
        let mut p = ParsedResume::default();
        p.experiences.push(ParsedExperience {
            title: Some("Analyst".to_string()),
            company: Some("Initech".to_string()),
            start: Some(PartialDate { year: 2020, month: Some(6) }),
            end: Some(PartialDate { year: 2020, month: None }),
            ..Default::default()
        });
        let plan = plan_import(&ProfileSnapshot::default(), &p);
        assert_eq!(plan.experiences[0].end_date, None);
    }
}

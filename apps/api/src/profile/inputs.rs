use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileHeaderRequest {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub summary: Option<String>,
}

impl ProfileHeaderRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                return Err(AppError::Validation(format!("invalid email: {email}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
}

impl ExperienceFields {
    pub fn validate(&self) -> Result<(), AppError> {
        require("title", &self.title)?;
        require("company", &self.company)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }
        if self.is_current && self.end_date.is_some() {
            return Err(AppError::Validation(
                "a current position cannot have an end_date".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationFields {
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl EducationFields {
    pub fn validate(&self) -> Result<(), AppError> {
        require("institution", &self.institution)?;
        require("degree", &self.degree)?;
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if end < start {
                return Err(AppError::Validation(
                    "end_year must not be before start_year".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillFields {
    pub name: String,
    pub level: Option<String>,
}

impl SkillFields {
    pub fn validate(&self) -> Result<(), AppError> {
        require("name", &self.name)
    }
}

/// Request bodies for the entry mutations: the caller plus the entry fields.
#[derive(Debug, Deserialize)]
pub struct Scoped<T> {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: T,
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn experience() -> ExperienceFields {
        ExperienceFields {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2022, 6, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_experience() {
        assert!(experience().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let exp = ExperienceFields {
            title: "  ".to_string(),
            ..experience()
        };
        assert!(matches!(exp.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let exp = ExperienceFields {
            end_date: NaiveDate::from_ymd_opt(2019, 1, 1),
            ..experience()
        };
        assert!(exp.validate().is_err());
    }

    #[test]
    fn test_current_with_end_date_rejected() {
        let exp = ExperienceFields {
            is_current: true,
            ..experience()
        };
        assert!(exp.validate().is_err());
    }

    #[test]
    fn test_education_years_ordered() {
        let edu = EducationFields {
            institution: "USP".to_string(),
            degree: "Bacharelado".to_string(),
            start_year: Some(2016),
            end_year: Some(2012),
            ..Default::default()
        };
        assert!(edu.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let req = ProfileHeaderRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_scoped_request_flattens_fields() {
        let body = json!({
            "user_id": "6f1c1f4e-8a52-4c7a-9d0c-3b1f0a6f9e11",
            "name": "Rust",
            "level": "advanced"
        });
        let req: Scoped<SkillFields> = serde_json::from_value(body).unwrap();
        assert_eq!(req.fields.name, "Rust");
        assert_eq!(req.fields.level.as_deref(), Some("advanced"));
    }
}

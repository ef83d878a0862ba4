use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileSnapshot;
use crate::profile::impact::check_description;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: ProfileSection,
    pub weight: f64,
    pub score: f64,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Weighted 0.0–1.0 score across all sections.
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<ProfileSection>,
}

const SECTION_WEIGHTS: &[(ProfileSection, f64)] = &[
    (ProfileSection::Header, 0.15),
    (ProfileSection::Summary, 0.10),
    (ProfileSection::Experience, 0.40),
    (ProfileSection::Education, 0.15),
    (ProfileSection::Skills, 0.20),
];

/// Skill count at which the skills section scores full marks.
const TARGET_SKILLS: usize = 8;
/// Summary length (words) at which the summary scores full marks.
const TARGET_SUMMARY_WORDS: usize = 40;

pub fn compute_completeness_report(snapshot: &ProfileSnapshot) -> CompletenessReport {
    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted = 0.0;

    for &(section, weight) in SECTION_WEIGHTS {
        let (score, recommendations) = match section {
            ProfileSection::Header => header_health(snapshot),
            ProfileSection::Summary => summary_health(snapshot),
            ProfileSection::Experience => experience_health(snapshot),
            ProfileSection::Education => education_health(snapshot),
            ProfileSection::Skills => skills_health(snapshot),
        };
        let score = score.clamp(0.0, 1.0);
        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s >= 0.2 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section);
        }
        weighted += score * weight;
        sections.push(SectionHealth {
            section,
            weight,
            score,
            status,
            recommendations,
        });
    }

    CompletenessReport {
        overall_score: weighted.clamp(0.0, 1.0),
        sections,
        missing_sections,
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn header_health(s: &ProfileSnapshot) -> (f64, Vec<String>) {
    let p = &s.profile;
    let fields = [
        ("name", &p.full_name),
        ("headline", &p.headline),
        ("email", &p.email),
        ("phone", &p.phone),
        ("location", &p.location),
        ("LinkedIn", &p.linkedin_url),
    ];
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| !filled(v))
        .map(|(name, _)| *name)
        .collect();
    let score = (fields.len() - missing.len()) as f64 / fields.len() as f64;
    let recs = if missing.is_empty() {
        vec![]
    } else {
        vec![format!("Complete your header: {}", missing.join(", "))]
    };
    (score, recs)
}

fn summary_health(s: &ProfileSnapshot) -> (f64, Vec<String>) {
    let words = s
        .profile
        .summary
        .as_deref()
        .map(|t| t.split_whitespace().count())
        .unwrap_or(0);
    match words {
        0 => (0.0, vec!["Write a short professional summary".to_string()]),
        n if n < TARGET_SUMMARY_WORDS / 2 => (
            0.5,
            vec!["Expand your summary with your focus area and strongest results".to_string()],
        ),
        n if n < TARGET_SUMMARY_WORDS => (0.8, vec![]),
        _ => (1.0, vec![]),
    }
}

fn experience_health(s: &ProfileSnapshot) -> (f64, Vec<String>) {
    if s.experiences.is_empty() {
        return (0.0, vec!["Add at least one work experience".to_string()]);
    }

    let mut recs = Vec::new();
    let mut entry_scores = Vec::with_capacity(s.experiences.len());
    let mut unquantified_lines = 0;
    let mut without_description = 0;

    for exp in &s.experiences {
        let checks = check_description(&exp.description);
        if checks.is_empty() {
            without_description += 1;
            entry_scores.push(0.4);
            continue;
        }
        let passed = checks.iter().filter(|c| c.passed).count();
        unquantified_lines += checks.len() - passed;
        entry_scores.push(0.4 + 0.6 * passed as f64 / checks.len() as f64);
    }

    let mean = entry_scores.iter().sum::<f64>() / entry_scores.len() as f64;
    let coverage = if s.experiences.len() >= 2 { 1.0 } else { 0.8 };

    if without_description > 0 {
        recs.push(format!(
            "{without_description} experience entries have no description"
        ));
    }
    if unquantified_lines > 0 {
        recs.push(format!(
            "{unquantified_lines} experience description lines lack quantified impact"
        ));
    }
    if s.experiences.len() < 2 {
        recs.push("Add more experience entries to build a complete picture".to_string());
    }
    (mean * coverage, recs)
}

fn education_health(s: &ProfileSnapshot) -> (f64, Vec<String>) {
    if s.educations.is_empty() {
        return (0.0, vec!["Add your education".to_string()]);
    }
    let detailed = s
        .educations
        .iter()
        .filter(|e| filled(&e.field_of_study) || e.end_year.is_some())
        .count();
    if detailed == s.educations.len() {
        (1.0, vec![])
    } else {
        (
            0.8,
            vec!["Add field of study and graduation year to your education".to_string()],
        )
    }
}

fn skills_health(s: &ProfileSnapshot) -> (f64, Vec<String>) {
    let count = s.skills.len();
    let score = (count as f64 / TARGET_SKILLS as f64).min(1.0);
    let recs = match count {
        0 => vec!["List the skills you want recruiters to find".to_string()],
        n if n < TARGET_SKILLS => vec![format!(
            "Add {} more skills to reach {TARGET_SKILLS}",
            TARGET_SKILLS - n
        )],
        _ => vec![],
    };
    (score, recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{EducationRow, ExperienceRow, ProfileRow, SkillRow};
    use chrono::Utc;
    use uuid::Uuid;

    fn experience(description: &str) -> ExperienceRow {
        ExperienceRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            start_date: None,
            end_date: None,
            is_current: true,
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }

    fn skill(name: &str) -> SkillRow {
        SkillRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            level: None,
            created_at: Utc::now(),
        }
    }

    fn full_profile() -> ProfileSnapshot {
        let some = |s: &str| Some(s.to_string());
        ProfileSnapshot {
            profile: ProfileRow {
                user_id: Uuid::nil(),
                full_name: some("Ana Souza"),
                headline: some("Backend Engineer"),
                email: some("ana@example.com"),
                phone: some("+55 11 91234-5678"),
                location: some("São Paulo"),
                linkedin_url: some("linkedin.com/in/ana"),
                summary: some(&"word ".repeat(45)),
                updated_at: None,
            },
            experiences: vec![
                experience("Cut latency by 40%"),
                experience("Shipped 3 services"),
            ],
            educations: vec![EducationRow {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                institution: "USP".to_string(),
                degree: "Bacharelado".to_string(),
                field_of_study: Some("Computação".to_string()),
                start_year: Some(2012),
                end_year: Some(2016),
                created_at: Utc::now(),
            }],
            skills: (0..8).map(|i| skill(&format!("skill{i}"))).collect(),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_profile_all_missing() {
        let report = compute_completeness_report(&ProfileSnapshot::default());
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.missing_sections.len(), 5);
        assert!(report.sections.iter().all(|s| s.status == SectionStatus::Missing));
    }

    #[test]
    fn test_full_profile_is_strong() {
        let report = compute_completeness_report(&full_profile());
        assert!((report.overall_score - 1.0).abs() < 1e-9, "{}", report.overall_score);
        assert!(report.sections.iter().all(|s| s.status == SectionStatus::Strong));
        assert!(report.sections.iter().all(|s| s.recommendations.is_empty()));
    }

    #[test]
    fn test_unquantified_lines_reported() {
        let mut snap = full_profile();
        snap.experiences = vec![
            experience("Helped the team\nWorked on APIs"),
            experience("Grew revenue 20%"),
        ];
        let report = compute_completeness_report(&snap);
        let exp = report
            .sections
            .iter()
            .find(|s| s.section == ProfileSection::Experience)
            .unwrap();
        // Entry scores 0.4 and 1.0.
        assert!((exp.score - 0.7).abs() < 1e-9);
        assert_eq!(exp.status, SectionStatus::Moderate);
        assert!(exp.recommendations[0].contains("2 experience description lines"));
    }

    #[test]
    fn test_partial_skills() {
        let mut snap = full_profile();
        snap.skills.truncate(2);
        let report = compute_completeness_report(&snap);
        let skills = report
            .sections
            .iter()
            .find(|s| s.section == ProfileSection::Skills)
            .unwrap();
        assert!((skills.score - 0.25).abs() < 1e-9);
        assert_eq!(skills.status, SectionStatus::Weak);
        assert_eq!(skills.recommendations, vec!["Add 6 more skills to reach 8"]);
    }
}

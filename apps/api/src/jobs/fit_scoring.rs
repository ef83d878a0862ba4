//! Fit scoring: a pluggable, trait-based scorer that measures a profile against job keywords.
//!
//! Default: `KeywordFitScorer` (pure-Rust, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn FitScorer>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::keywords::Keyword;
use crate::models::profile::{ProfileSnapshot, SkillRow};

const SKILL_MATCH_STRENGTH: f32 = 1.0;
const TEXT_MATCH_STRENGTH: f32 = 0.6;
const STRONG_THRESHOLD: f32 = 0.8;
const PARTIAL_THRESHOLD: f32 = 0.4;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A job keyword that the profile covers, fully or partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitMatch {
    pub keyword: String,
    pub evidence: String,
    pub strength: f32, // 0.0 – 1.0
}

/// A job keyword the profile does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub keyword: String,
    pub frequency: u32,
    pub suggestion: Option<String>, // closest existing skill, if any
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub overall_score: u32,             // 0 – 100
    pub strong_matches: Vec<FitMatch>,  // strength ≥ 0.8
    pub partial_matches: Vec<FitMatch>, // 0.4 – 0.79
    pub gaps: Vec<Gap>,                 // strength < 0.4
    pub recommendation: String,
    pub scorer_backend: String,
}

impl FitReport {
    pub fn matched_keywords(&self) -> Vec<String> {
        self.strong_matches
            .iter()
            .chain(self.partial_matches.iter())
            .map(|m| m.keyword.clone())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(
        &self,
        profile: &ProfileSnapshot,
        keywords: &[Keyword],
    ) -> Result<FitReport, AppError>;
}

/// Keyword-overlap scorer.
///
/// 1. For each job keyword:
///    - skill name exact match → 1.0
///    - substring of the profile's free text → 0.6
///    - otherwise → 0.0
/// 2. overall_score = Σ(strength × weight) / Σ(weight) × 100
/// 3. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)
pub struct KeywordFitScorer;

#[async_trait]
impl FitScorer for KeywordFitScorer {
    async fn score(
        &self,
        profile: &ProfileSnapshot,
        keywords: &[Keyword],
    ) -> Result<FitReport, AppError> {
        Ok(compute_keyword_fit(profile, keywords))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword fit algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn compute_keyword_fit(profile: &ProfileSnapshot, keywords: &[Keyword]) -> FitReport {
    if keywords.is_empty() {
        return FitReport {
            overall_score: 0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: "No keywords found in the job posting, so fit cannot be scored.".to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    let skills: Vec<String> = profile.skills.iter().map(|s| s.name.to_lowercase()).collect();
    let text = profile.searchable_text();

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weight = 0.0_f32;
    let mut total_score = 0.0_f32;

    for keyword in keywords {
        let term = keyword.term.to_lowercase();
        total_weight += keyword.weight;

        let (strength, evidence) = if skills.iter().any(|s| *s == term) {
            (SKILL_MATCH_STRENGTH, format!("skill '{}'", keyword.term))
        } else if text.contains(&term) {
            (TEXT_MATCH_STRENGTH, "profile text".to_string())
        } else {
            (0.0, String::new())
        };

        total_score += strength * keyword.weight;

        let fit_match = FitMatch {
            keyword: keyword.term.clone(),
            evidence,
            strength,
        };

        if strength >= STRONG_THRESHOLD {
            strong_matches.push(fit_match);
        } else if strength >= PARTIAL_THRESHOLD {
            partial_matches.push(fit_match);
        } else {
            gaps.push(Gap {
                keyword: keyword.term.clone(),
                frequency: keyword.frequency,
                suggestion: find_closest_skill(&profile.skills, &term),
            });
        }
    }

    let overall_score = if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    let recommendation = build_recommendation(overall_score, &gaps);

    FitReport {
        overall_score,
        strong_matches,
        partial_matches,
        gaps,
        recommendation,
        scorer_backend: "keyword".to_string(),
    }
}

/// Finds the skill whose name overlaps the keyword most closely, for gap
/// suggestions. Closeness is the length difference; ties keep profile order.
fn find_closest_skill(skills: &[SkillRow], keyword: &str) -> Option<String> {
    skills
        .iter()
        .filter_map(|s| {
            let name = s.name.to_lowercase();
            (name.contains(keyword) || keyword.contains(&name))
                .then(|| (name.len().abs_diff(keyword.len()), s))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, s)| s.name.clone())
}

fn build_recommendation(score: u32, gaps: &[Gap]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        "Strong fit. Your profile directly covers the key requirements of this posting.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate fit ({score}/100). Consider highlighting: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({score}/100). Missing: {}. Tailor your résumé before applying.",
            top_gaps.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::keywords::KeywordKind;
    use crate::models::profile::ExperienceRow;
    use chrono::Utc;
    use uuid::Uuid;

    fn skill(name: &str) -> SkillRow {
        SkillRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            level: None,
            created_at: Utc::now(),
        }
    }

    fn experience(title: &str, description: &str) -> ExperienceRow {
        ExperienceRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            start_date: None,
            end_date: None,
            is_current: true,
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }

    fn keywords(items: &[(&str, u32)]) -> Vec<Keyword> {
        items
            .iter()
            .map(|(t, f)| Keyword {
                term: t.to_string(),
                frequency: *f,
                kind: KeywordKind::Unigram,
                weight: *f as f32,
            })
            .collect()
    }

    #[test]
    fn test_skill_match_scores_strong() {
        let profile = ProfileSnapshot {
            skills: vec![skill("Rust"), skill("Docker")],
            ..Default::default()
        };
        let report = compute_keyword_fit(&profile, &keywords(&[("rust", 3), ("docker", 1)]));
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.strong_matches.len(), 2);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_text_match_scores_partial() {
        let profile = ProfileSnapshot {
            experiences: vec![experience("Engenheiro", "Deploys em Kubernetes")],
            ..Default::default()
        };
        let report = compute_keyword_fit(&profile, &keywords(&[("kubernetes", 2)]));
        assert_eq!(report.partial_matches.len(), 1);
        assert_eq!(report.overall_score, 60);
    }

    #[test]
    fn test_gap_carries_closest_skill() {
        let profile = ProfileSnapshot {
            skills: vec![skill("PostgreSQL")],
            ..Default::default()
        };
        let report = compute_keyword_fit(&profile, &keywords(&[("sql", 2)]));
        // Skills are not part of the free text, so a partial overlap is a gap.
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].suggestion.as_deref(), Some("PostgreSQL"));
    }

    #[test]
    fn test_closest_skill_prefers_nearest_length() {
        let skills = vec![skill("Microsoft SQL Server"), skill("MySQL"), skill("PostgreSQL")];
        assert_eq!(find_closest_skill(&skills, "sql").as_deref(), Some("MySQL"));
        assert_eq!(find_closest_skill(&skills, "kafka"), None);
    }

    #[test]
    fn test_weighting_by_frequency() {
        let profile = ProfileSnapshot {
            skills: vec![skill("rust")],
            ..Default::default()
        };
        // rust weight 3 matched, java weight 1 missing → 75
        let report = compute_keyword_fit(&profile, &keywords(&[("rust", 3), ("java", 1)]));
        assert_eq!(report.overall_score, 75);
        assert_eq!(report.gaps[0].keyword, "java");
    }

    #[test]
    fn test_empty_keywords_returns_zero_score() {
        let report = compute_keyword_fit(&ProfileSnapshot::default(), &[]);
        assert_eq!(report.overall_score, 0);
        assert!(report.recommendation.contains("No keywords"));
    }

    #[test]
    fn test_matched_keywords_lists_strong_and_partial() {
        let profile = ProfileSnapshot {
            skills: vec![skill("rust")],
            experiences: vec![experience("Dev", "usei docker")],
            ..Default::default()
        };
        let report = compute_keyword_fit(&profile, &keywords(&[("rust", 1), ("docker", 1), ("go", 1)]));
        assert_eq!(report.matched_keywords(), vec!["rust", "docker"]);
    }

    #[tokio::test]
    async fn test_keyword_scorer_trait_delegates() {
        let profile = ProfileSnapshot {
            skills: vec![skill("rust")],
            ..Default::default()
        };
        let report = KeywordFitScorer
            .score(&profile, &keywords(&[("rust", 1)]))
            .await
            .unwrap();
        assert_eq!(report.scorer_backend, "keyword");
        assert_eq!(report.overall_score, 100);
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(build_recommendation(85, &[]).contains("Strong fit"));
        let gaps = vec![Gap {
            keyword: "Kafka".to_string(),
            frequency: 2,
            suggestion: None,
        }];
        let moderate = build_recommendation(65, &gaps);
        assert!(moderate.contains("65") && moderate.contains("Kafka"));
        assert!(build_recommendation(20, &gaps).contains("Low fit"));
    }
}

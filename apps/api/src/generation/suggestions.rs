//! Improvement suggestions for a profile, optionally measured against a job.
//!
//! The rule-based suggestions always run. LLM rewrites are layered on top
//! when a client is configured; a failed rewrite call is logged and skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::generation::prompts::{BULLET_REWRITE_PROMPT_TEMPLATE, BULLET_REWRITE_ROLE};
use crate::jobs::fit_scoring::FitReport;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileSnapshot;
use crate::profile::completeness::{CompletenessReport, ProfileSection};
use crate::profile::impact::check_description;

/// Bullets sent to the model in one rewrite call.
const MAX_REWRITES: usize = 5;
/// Gap keywords turned into suggestions, highest frequency first.
const MAX_KEYWORD_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Impact,
    MissingKeyword,
    ProfileGap,
    Rewrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    /// What the suggestion is about: an experience, a keyword or a profile section.
    pub target: String,
    pub message: String,
    pub original: Option<String>,
    pub proposed: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    pub completeness_score: f64,
    pub fit_score: Option<u32>,
    pub rewrites_generated: bool,
}

#[derive(Debug, Deserialize)]
struct RewritePair {
    original: String,
    rewrite: String,
}

/// One failing bullet per experience line.
pub fn impact_suggestions(profile: &ProfileSnapshot) -> Vec<Suggestion> {
    profile
        .experiences
        .iter()
        .flat_map(|exp| {
            let target = format!("{} at {}", exp.title, exp.company);
            check_description(&exp.description)
                .into_iter()
                .filter(|c| !c.passed)
                .map(move |c| Suggestion {
                    kind: SuggestionKind::Impact,
                    target: target.clone(),
                    message: match (c.reason, c.suggestion) {
                        (Some(r), Some(s)) => format!("{r}. {s}"),
                        (Some(r), None) => r,
                        (None, _) => "Add a measurable outcome".to_string(),
                    },
                    original: Some(c.bullet),
                    proposed: None,
                })
        })
        .collect()
}

pub fn keyword_suggestions(fit: &FitReport) -> Vec<Suggestion> {
    let mut gaps: Vec<_> = fit.gaps.iter().collect();
    gaps.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    gaps.into_iter()
        .take(MAX_KEYWORD_SUGGESTIONS)
        .map(|gap| {
            let times = if gap.frequency == 1 {
                "once".to_string()
            } else {
                format!("{} times", gap.frequency)
            };
            let message = match &gap.suggestion {
                Some(skill) => format!(
                    "The posting mentions '{}' {times}. If your '{skill}' experience covers it, name it explicitly",
                    gap.keyword
                ),
                None => format!(
                    "The posting mentions '{}' {times} but your profile never does. Add it where you have real experience",
                    gap.keyword
                ),
            };
            Suggestion {
                kind: SuggestionKind::MissingKeyword,
                target: gap.keyword.clone(),
                message,
                original: None,
                proposed: None,
            }
        })
        .collect()
}

/// Completeness recommendations, minus the experience quantification note
/// that the impact suggestions already cover line by line.
pub fn profile_gap_suggestions(report: &CompletenessReport) -> Vec<Suggestion> {
    report
        .sections
        .iter()
        .flat_map(|section| {
            section
                .recommendations
                .iter()
                .filter(move |r| {
                    !(section.section == ProfileSection::Experience
                        && r.contains("lack quantified impact"))
                })
                .map(move |r| Suggestion {
                    kind: SuggestionKind::ProfileGap,
                    target: section_label(section.section).to_string(),
                    message: r.clone(),
                    original: None,
                    proposed: None,
                })
        })
        .collect()
}

/// Asks the model to rewrite the first few failing bullets.
/// Returns nothing when the call or its output is unusable.
pub async fn rewrite_suggestions(
    llm: &LlmClient,
    impact: &[Suggestion],
    keywords: &[String],
) -> Vec<Suggestion> {
    let candidates: Vec<&Suggestion> = impact
        .iter()
        .filter(|s| s.original.is_some())
        .take(MAX_REWRITES)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let bullets = candidates
        .iter()
        .filter_map(|s| s.original.as_deref())
        .map(|b| format!("- {b}"))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = build_rewrite_prompt(&bullets, keywords);
    let system = format!("{BULLET_REWRITE_ROLE} {JSON_ONLY_SYSTEM}");

    let pairs: Vec<RewritePair> = match llm.call_json(&prompt, &system).await {
        Ok(pairs) => pairs,
        Err(e) => {
            warn!("Bullet rewrite call failed, skipping rewrites: {e}");
            return Vec::new();
        }
    };

    let rewrites = match_rewrites(&candidates, pairs);
    debug!("Received {} usable bullet rewrites", rewrites.len());
    rewrites
}

fn build_rewrite_prompt(bullets: &str, keywords: &[String]) -> String {
    let keywords = if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    };
    BULLET_REWRITE_PROMPT_TEMPLATE
        .replace("{keywords}", &keywords)
        .replace("{bullets}", bullets)
}

/// Keeps only rewrites whose `original` is one of the bullets we sent.
fn match_rewrites(candidates: &[&Suggestion], pairs: Vec<RewritePair>) -> Vec<Suggestion> {
    pairs
        .into_iter()
        .filter(|p| !p.rewrite.trim().is_empty())
        .filter_map(|p| {
            let source = candidates.iter().find(|s| {
                s.original
                    .as_deref()
                    .is_some_and(|o| o.trim().eq_ignore_ascii_case(p.original.trim()))
            })?;
            Some(Suggestion {
                kind: SuggestionKind::Rewrite,
                target: source.target.clone(),
                message: "Suggested rewrite. Replace any [placeholder] with your real figure"
                    .to_string(),
                original: source.original.clone(),
                proposed: Some(p.rewrite.trim().to_string()),
            })
        })
        .collect()
}

fn section_label(section: ProfileSection) -> &'static str {
    match section {
        ProfileSection::Header => "header",
        ProfileSection::Summary => "summary",
        ProfileSection::Experience => "experience",
        ProfileSection::Education => "education",
        ProfileSection::Skills => "skills",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::fit_scoring::Gap;
    use crate::models::profile::ExperienceRow;
    use crate::profile::completeness::compute_completeness_report;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile_with(description: &str) -> ProfileSnapshot {
        let user_id = Uuid::new_v4();
        ProfileSnapshot {
            experiences: vec![ExperienceRow {
                id: Uuid::new_v4(),
                user_id,
                title: "Data Analyst".into(),
                company: "Itaú".into(),
                location: None,
                start_date: None,
                end_date: None,
                is_current: false,
                description: description.into(),
                created_at: Utc::now(),
            }],
            ..Default::default()
        }
    }

    fn impact(bullet: &str) -> Suggestion {
        Suggestion {
            kind: SuggestionKind::Impact,
            target: "Data Analyst at Itaú".into(),
            message: String::new(),
            original: Some(bullet.into()),
            proposed: None,
        }
    }

    #[test]
    fn test_impact_suggestions_flag_only_failing_lines() {
        let profile = profile_with("Helped the sales team\nBuilt 12 dashboards");
        let suggestions = impact_suggestions(&profile);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].target, "Data Analyst at Itaú");
        assert_eq!(suggestions[0].original.as_deref(), Some("Helped the sales team"));
        assert!(suggestions[0].message.contains("'helped'"));
    }

    #[test]
    fn test_keyword_suggestions_order_by_frequency() {
        let fit = FitReport {
            overall_score: 20,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![
                Gap {
                    keyword: "airflow".into(),
                    frequency: 1,
                    suggestion: None,
                },
                Gap {
                    keyword: "dbt".into(),
                    frequency: 3,
                    suggestion: Some("SQL".into()),
                },
            ],
            recommendation: String::new(),
            scorer_backend: "keyword".into(),
        };
        let suggestions = keyword_suggestions(&fit);

        assert_eq!(suggestions[0].target, "dbt");
        assert!(suggestions[0].message.contains("3 times"));
        assert!(suggestions[0].message.contains("'SQL'"));
        assert!(suggestions[1].message.contains("once but your profile never does"));
    }

    #[test]
    fn test_profile_gaps_skip_quantification_note() {
        let profile = profile_with("Helped the sales team");
        let report = compute_completeness_report(&profile);
        let gaps = profile_gap_suggestions(&report);

        assert!(gaps.iter().all(|g| g.kind == SuggestionKind::ProfileGap));
        assert!(gaps.iter().any(|g| g.target == "education"));
        assert!(!gaps.iter().any(|g| g.message.contains("quantified")));
    }

    #[test]
    fn test_match_rewrites_drops_unknown_and_empty() {
        let a = impact("Helped the sales team");
        let candidates = vec![&a];
        let pairs: Vec<RewritePair> = serde_json::from_value(serde_json::json!([
            {"original": "helped the sales team ", "rewrite": "Built reports that lifted sales [N%]"},
            {"original": "Invented bullet", "rewrite": "Something"},
            {"original": "Helped the sales team", "rewrite": "  "}
        ]))
        .unwrap();

        let rewrites = match_rewrites(&candidates, pairs);
        assert_eq!(rewrites.len(), 1);
        assert_eq!(rewrites[0].kind, SuggestionKind::Rewrite);
        assert_eq!(rewrites[0].original.as_deref(), Some("Helped the sales team"));
        assert_eq!(
            rewrites[0].proposed.as_deref(),
            Some("Built reports that lifted sales [N%]")
        );
    }

    #[test]
    fn test_rewrite_prompt_lists_bullets() {
        let prompt = build_rewrite_prompt("- Helped the sales team", &[]);
        assert!(prompt.contains("BULLETS:\n- Helped the sales team"));
        assert!(prompt.contains("job keywords only where the original supports them: (none)"));
    }
}

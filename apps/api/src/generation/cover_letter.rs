//! Cover letter generation.
//!
//! With an LLM configured the letter is written by the model, grounded in the
//! rendered profile. Without one, or when the call fails, a deterministic
//! letter is assembled from the profile and the fit report.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::templates::{render, DocumentTemplate};
use crate::generation::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::generation::tone::CoverLetterTone;
use crate::jobs::fit_scoring::FitReport;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::profile::{ExperienceRow, ProfileSnapshot};
use crate::profile::impact::check_bullet;

/// Matched keywords mentioned by name in the template letter.
const TEMPLATE_KEYWORDS: usize = 5;
/// Skills listed when nothing in the posting matched.
const TEMPLATE_SKILLS: usize = 4;
/// Job text sent to the model is cut at this many characters.
const MAX_JOB_CHARS: usize = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterSource {
    Llm,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub content: String,
    pub source: LetterSource,
    pub matched_keywords: Vec<String>,
}

/// Inputs for one letter.
pub struct LetterContext<'a> {
    pub profile: &'a ProfileSnapshot,
    pub job_text: &'a str,
    pub company: Option<&'a str>,
    pub role: Option<&'a str>,
    pub tone: CoverLetterTone,
    pub fit: &'a FitReport,
}

impl LetterContext<'_> {
    fn company(&self) -> &str {
        non_blank(self.company).unwrap_or("your company")
    }

    fn role(&self) -> &str {
        non_blank(self.role).unwrap_or("open")
    }
}

pub async fn write_cover_letter(llm: Option<&LlmClient>, ctx: &LetterContext<'_>) -> CoverLetter {
    let matched_keywords = ctx.fit.matched_keywords();

    if let Some(llm) = llm {
        let prompt = build_prompt(ctx, &matched_keywords);
        match llm.call_text(&prompt, COVER_LETTER_SYSTEM).await {
            Ok(content) => {
                info!(
                    "Cover letter ({}) generated by {} ({} chars)",
                    ctx.tone.as_str(),
                    llm.model(),
                    content.len()
                );
                return CoverLetter {
                    content,
                    source: LetterSource::Llm,
                    matched_keywords,
                };
            }
            Err(e) => warn!("Cover letter LLM call failed, using template: {e}"),
        }
    }

    CoverLetter {
        content: template_letter(ctx, &matched_keywords),
        source: LetterSource::Template,
        matched_keywords,
    }
}

fn build_prompt(ctx: &LetterContext<'_>, matched_keywords: &[String]) -> String {
    let keywords = if matched_keywords.is_empty() {
        "(none)".to_string()
    } else {
        matched_keywords.join(", ")
    };
    let job_text: String = ctx.job_text.chars().take(MAX_JOB_CHARS).collect();

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{role}", ctx.role())
        .replace("{company}", ctx.company())
        .replace("{tone_guidance}", ctx.tone.guidance())
        .replace("{grounding}", GROUNDING_INSTRUCTION)
        .replace("{name}", ctx.profile.display_name())
        .replace("{matched_keywords}", &keywords)
        .replace("{profile}", &render(DocumentTemplate::Classic, ctx.profile, None))
        .replace("{job_text}", &job_text)
}

/// Deterministic letter built only from what the profile states.
pub fn template_letter(ctx: &LetterContext<'_>, matched_keywords: &[String]) -> String {
    let phrases = ctx.tone.phrases();
    let (role, company) = (ctx.role(), ctx.company());
    let mut paragraphs: Vec<String> = vec![phrases.greeting.to_string()];

    paragraphs.push(match ctx.tone {
        CoverLetterTone::Formal => {
            format!("I am writing to apply for the {role} position at {company}.")
        }
        CoverLetterTone::Enthusiastic => format!(
            "I was excited to see the {role} opening at {company} and would love to be considered."
        ),
        CoverLetterTone::Concise => format!("I'm applying for the {role} role at {company}."),
    });

    let mut body = Vec::new();
    if let Some(exp) = ctx.profile.experiences.first() {
        body.push(experience_sentence(exp));
        if ctx.tone != CoverLetterTone::Concise {
            if let Some(highlight) = first_quantified_line(&exp.description) {
                body.push(format!("One result I am proud of: {highlight}"));
            }
        }
    }
    if !matched_keywords.is_empty() {
        let named: Vec<&str> = matched_keywords
            .iter()
            .take(TEMPLATE_KEYWORDS)
            .map(String::as_str)
            .collect();
        body.push(format!(
            "My background covers {}, all of which your posting calls for.",
            join_list(&named)
        ));
    } else if !ctx.profile.skills.is_empty() {
        let named: Vec<&str> = ctx
            .profile
            .skills
            .iter()
            .take(TEMPLATE_SKILLS)
            .map(|s| s.name.as_str())
            .collect();
        body.push(format!("My core skills include {}.", join_list(&named)));
    }
    if !body.is_empty() {
        paragraphs.push(body.join(" "));
    }

    paragraphs.push(phrases.closing.to_string());
    paragraphs.push(format!(
        "{}\n{}",
        phrases.sign_off,
        ctx.profile.display_name()
    ));
    paragraphs.join("\n\n")
}

fn experience_sentence(exp: &ExperienceRow) -> String {
    if exp.is_current {
        format!(
            "In my current role as {} at {}, I work on problems close to the ones this team is solving.",
            exp.title, exp.company
        )
    } else {
        format!("Most recently, I worked as {} at {}.", exp.title, exp.company)
    }
}

fn first_quantified_line(description: &str) -> Option<String> {
    description
        .lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|l| !l.is_empty())
        .find(|l| check_bullet(l).passed)
        .map(|l| {
            let mut line = l.to_string();
            if !line.ends_with('.') {
                line.push('.');
            }
            line
        })
}

/// "a", "a and b", "a, b and c"
fn join_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::fit_scoring::FitMatch;
    use crate::models::profile::{ProfileRow, SkillRow};
    use chrono::Utc;
    use uuid::Uuid;

    fn snapshot() -> ProfileSnapshot {
        let user_id = Uuid::new_v4();
        ProfileSnapshot {
            profile: ProfileRow {
                user_id,
                full_name: Some("Ana Souza".into()),
                ..Default::default()
            },
            experiences: vec![ExperienceRow {
                id: Uuid::new_v4(),
                user_id,
                title: "Backend Engineer".into(),
                company: "Nubank".into(),
                location: None,
                start_date: None,
                end_date: None,
                is_current: true,
                description: "- Worked on payments\n- Cut p99 latency by 40%".into(),
                created_at: Utc::now(),
            }],
            educations: vec![],
            skills: ["Rust", "Kafka"]
                .iter()
                .map(|n| SkillRow {
                    id: Uuid::new_v4(),
                    user_id,
                    name: n.to_string(),
                    level: None,
                    created_at: Utc::now(),
                })
                .collect(),
        }
    }

    fn report(matched: &[&str]) -> FitReport {
        FitReport {
            overall_score: 70,
            strong_matches: matched
                .iter()
                .map(|k| FitMatch {
                    keyword: k.to_string(),
                    evidence: "skill".into(),
                    strength: 1.0,
                })
                .collect(),
            partial_matches: vec![],
            gaps: vec![],
            recommendation: String::new(),
            scorer_backend: "keyword".into(),
        }
    }

    fn ctx<'a>(
        profile: &'a ProfileSnapshot,
        fit: &'a FitReport,
        tone: CoverLetterTone,
    ) -> LetterContext<'a> {
        LetterContext {
            profile,
            job_text: "We need Rust and Kafka experience.",
            company: Some("Stone"),
            role: Some("Platform Engineer"),
            tone,
            fit,
        }
    }

    #[tokio::test]
    async fn test_without_llm_falls_back_to_template() {
        let profile = snapshot();
        let fit = report(&["rust", "kafka"]);
        let letter = write_cover_letter(None, &ctx(&profile, &fit, CoverLetterTone::Formal)).await;

        assert_eq!(letter.source, LetterSource::Template);
        assert_eq!(letter.matched_keywords, vec!["rust", "kafka"]);
        assert!(letter.content.starts_with("Dear Hiring Manager,"));
        assert!(letter
            .content
            .contains("I am writing to apply for the Platform Engineer position at Stone."));
        assert!(letter.content.contains("My background covers rust and kafka"));
        assert!(letter.content.ends_with("Sincerely,\nAna Souza"));
    }

    #[test]
    fn test_template_quotes_quantified_line_only() {
        let profile = snapshot();
        let fit = report(&[]);
        let letter = template_letter(&ctx(&profile, &fit, CoverLetterTone::Enthusiastic), &[]);

        assert!(letter.contains("One result I am proud of: Cut p99 latency by 40%."));
        assert!(!letter.contains("Worked on payments"));
        assert!(letter.contains("My core skills include Rust and Kafka."));
    }

    #[test]
    fn test_concise_letter_skips_highlight() {
        let profile = snapshot();
        let fit = report(&[]);
        let letter = template_letter(&ctx(&profile, &fit, CoverLetterTone::Concise), &[]);

        assert!(letter.starts_with("Hi,"));
        assert!(letter.contains("I'm applying for the Platform Engineer role at Stone."));
        assert!(!letter.contains("proud of"));
    }

    #[test]
    fn test_template_defaults_for_missing_company_and_empty_profile() {
        let profile = ProfileSnapshot::default();
        let fit = report(&[]);
        let context = LetterContext {
            profile: &profile,
            job_text: "",
            company: Some("  "),
            role: None,
            tone: CoverLetterTone::Formal,
            fit: &fit,
        };
        let letter = template_letter(&context, &[]);
        assert!(letter.contains("the open position at your company"));
        assert!(letter.ends_with("Candidate"));
    }

    #[test]
    fn test_prompt_carries_profile_and_keywords() {
        let profile = snapshot();
        let fit = report(&["rust"]);
        let context = ctx(&profile, &fit, CoverLetterTone::Concise);
        let prompt = build_prompt(&context, &fit.matched_keywords());

        assert!(prompt.contains("Platform Engineer position at Stone"));
        assert!(prompt.contains("Ana Souza"));
        assert!(prompt.contains("Backend Engineer"));
        assert!(prompt.contains("keywords the profile already covers, where they fit naturally: rust"));
        assert!(!prompt.contains("{job_text}"));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&["a"]), "a");
        assert_eq!(join_list(&["a", "b"]), "a and b");
        assert_eq!(join_list(&["a", "b", "c"]), "a, b and c");
    }
}

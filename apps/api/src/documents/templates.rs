//! Markdown résumé templates.
//!
//! Each template renders a `ProfileSnapshot`. When a document targets a job
//! posting, skills matching the posting's keywords move to the front and the
//! keywords are emphasised in the summary.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{EducationRow, ExperienceRow, ProfileSnapshot, SkillRow};

/// Experience description lines kept by the compact template.
const COMPACT_MAX_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTemplate {
    Classic,
    Modern,
    Compact,
}

impl DocumentTemplate {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "modern" => Ok(Self::Modern),
            "compact" => Ok(Self::Compact),
            other => Err(AppError::Validation(format!(
                "unknown template '{other}' (expected classic, modern or compact)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Compact => "compact",
        }
    }
}

/// Job keywords a rendered document is tailored to.
#[derive(Debug, Clone, Default)]
pub struct Tailoring {
    pub keywords: Vec<String>,
}

impl Tailoring {
    fn matches_skill(&self, skill: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(skill))
    }
}

pub fn render(
    template: DocumentTemplate,
    snapshot: &ProfileSnapshot,
    tailoring: Option<&Tailoring>,
) -> String {
    let skills = ordered_skills(&snapshot.skills, tailoring);
    let summary = snapshot
        .profile
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| match tailoring {
            Some(t) => emphasize(s.trim(), &t.keywords),
            None => s.trim().to_string(),
        });

    match template {
        DocumentTemplate::Classic => render_classic(snapshot, summary.as_deref(), &skills),
        DocumentTemplate::Modern => render_modern(snapshot, summary.as_deref(), &skills),
        DocumentTemplate::Compact => render_compact(snapshot, summary.as_deref(), &skills),
    }
}

fn render_classic(s: &ProfileSnapshot, summary: Option<&str>, skills: &[&str]) -> String {
    let mut md = format!("# {}\n", s.display_name());
    if let Some(h) = non_empty(&s.profile.headline) {
        let _ = writeln!(md, "{h}");
    }
    let contact = contact_parts(s);
    if !contact.is_empty() {
        let _ = writeln!(md, "{}", contact.join(" · "));
    }

    if let Some(summary) = summary {
        let _ = write!(md, "\n## Summary\n\n{summary}\n");
    }

    if !s.experiences.is_empty() {
        md.push_str("\n## Experience\n");
        for exp in &s.experiences {
            let _ = write!(md, "\n### {}\n", role_line(exp, ", ", false));
            let period = format_period(exp.start_date, exp.end_date, exp.is_current);
            if !period.is_empty() {
                let _ = writeln!(md, "*{period}*");
            }
            for line in description_lines(&exp.description) {
                let _ = writeln!(md, "- {line}");
            }
        }
    }

    if !s.educations.is_empty() {
        md.push_str("\n## Education\n\n");
        for edu in &s.educations {
            let _ = writeln!(md, "- {}", education_line(edu));
        }
    }

    if !skills.is_empty() {
        let _ = write!(md, "\n## Skills\n\n{}\n", skills.join(", "));
    }
    md
}

fn render_modern(s: &ProfileSnapshot, summary: Option<&str>, skills: &[&str]) -> String {
    let mut md = match non_empty(&s.profile.headline) {
        Some(h) => format!("# {} | {h}\n", s.display_name()),
        None => format!("# {}\n", s.display_name()),
    };
    let contact = contact_parts(s);
    if !contact.is_empty() {
        let _ = writeln!(md, "\n**Contact:** {}", contact.join(" | "));
    }
    if let Some(summary) = summary {
        let _ = writeln!(md, "\n> {summary}");
    }

    if !skills.is_empty() {
        let tags: Vec<String> = skills.iter().map(|k| format!("`{k}`")).collect();
        let _ = write!(md, "\n## Skills\n\n{}\n", tags.join(" · "));
    }

    if !s.experiences.is_empty() {
        md.push_str("\n## Experience\n");
        for exp in &s.experiences {
            let period = format_period(exp.start_date, exp.end_date, exp.is_current);
            let _ = write!(md, "\n{}", role_line(exp, " @ ", true));
            if !period.is_empty() {
                let _ = write!(md, " · {period}");
            }
            md.push('\n');
            for line in description_lines(&exp.description) {
                let _ = writeln!(md, "- {line}");
            }
        }
    }

    if !s.educations.is_empty() {
        md.push_str("\n## Education\n\n");
        for edu in &s.educations {
            let _ = writeln!(md, "- {}", education_line(edu));
        }
    }
    md
}

fn render_compact(s: &ProfileSnapshot, summary: Option<&str>, skills: &[&str]) -> String {
    let mut md = format!("# {}\n", s.display_name());
    let mut contact = contact_parts(s);
    if let Some(h) = non_empty(&s.profile.headline) {
        contact.insert(0, h.to_string());
    }
    if !contact.is_empty() {
        let _ = writeln!(md, "{}", contact.join(" | "));
    }
    if let Some(summary) = summary {
        let _ = write!(md, "\n{summary}\n");
    }

    if !s.experiences.is_empty() {
        md.push_str("\n## Experience\n");
        for exp in &s.experiences {
            let period = format_period(exp.start_date, exp.end_date, exp.is_current);
            let mut line = format!("- {}", role_line(exp, ", ", true));
            if !period.is_empty() {
                let _ = write!(line, " ({period})");
            }
            let details: Vec<&str> = description_lines(&exp.description)
                .take(COMPACT_MAX_LINES)
                .collect();
            if !details.is_empty() {
                let _ = write!(line, ": {}", details.join("; "));
            }
            let _ = writeln!(md, "{line}");
        }
    }

    if !s.educations.is_empty() {
        md.push_str("\n## Education\n");
        for edu in &s.educations {
            let _ = writeln!(md, "- {}", education_line(edu));
        }
    }

    if !skills.is_empty() {
        let _ = write!(md, "\n**Skills:** {}\n", skills.join(", "));
    }
    md
}

/// Matched skills first, each group in stored order.
fn ordered_skills<'a>(skills: &'a [SkillRow], tailoring: Option<&Tailoring>) -> Vec<&'a str> {
    let Some(t) = tailoring else {
        return skills.iter().map(|s| s.name.as_str()).collect();
    };
    let (matched, rest): (Vec<&SkillRow>, Vec<&SkillRow>) =
        skills.iter().partition(|s| t.matches_skill(&s.name));
    matched
        .into_iter()
        .chain(rest)
        .map(|s| s.name.as_str())
        .collect()
}

/// Wraps whole-term keyword occurrences in `**`. Longer keywords win.
fn emphasize(text: &str, keywords: &[String]) -> String {
    let mut terms: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if terms.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let pattern = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = Regex::new(&format!("(?i){pattern}")) else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in re.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(is_term_char) || after.is_some_and(is_term_char) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str("**");
        out.push_str(m.as_str());
        out.push_str("**");
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '*')
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contact_parts(s: &ProfileSnapshot) -> Vec<String> {
    let p = &s.profile;
    [&p.email, &p.phone, &p.location, &p.linkedin_url]
        .into_iter()
        .filter_map(non_empty)
        .map(str::to_string)
        .collect()
}

/// Title and company joined by `sep`; only the title is ever bolded.
fn role_line(exp: &ExperienceRow, sep: &str, bold_title: bool) -> String {
    let title = match exp.title.trim() {
        "" => String::new(),
        t if bold_title => format!("**{t}**"),
        t => t.to_string(),
    };
    match (title.as_str(), exp.company.trim()) {
        ("", company) => company.to_string(),
        (_, "") => title,
        (_, company) => format!("{title}{sep}{company}"),
    }
}

fn education_line(edu: &EducationRow) -> String {
    let degree = match non_empty(&edu.field_of_study) {
        Some(field) if !edu.degree.trim().is_empty() => format!("{} in {field}", edu.degree.trim()),
        Some(field) => field.to_string(),
        None => edu.degree.trim().to_string(),
    };
    let mut line = match (degree.is_empty(), edu.institution.trim()) {
        (true, inst) => inst.to_string(),
        (false, "") => format!("**{degree}**"),
        (false, inst) => format!("**{degree}**, {inst}"),
    };
    match (edu.start_year, edu.end_year) {
        (Some(s), Some(e)) => {
            let _ = write!(line, " ({s}–{e})");
        }
        (None, Some(y)) | (Some(y), None) => {
            let _ = write!(line, " ({y})");
        }
        (None, None) => {}
    }
    line
}

fn description_lines(description: &str) -> impl Iterator<Item = &str> {
    description.lines().map(str::trim).filter(|l| !l.is_empty())
}

pub fn format_period(start: Option<NaiveDate>, end: Option<NaiveDate>, is_current: bool) -> String {
    let fmt = |d: NaiveDate| d.format("%b %Y").to_string();
    match (start, end, is_current) {
        (Some(s), _, true) => format!("{} – Present", fmt(s)),
        (None, _, true) => "Present".to_string(),
        (Some(s), Some(e), false) => format!("{} – {}", fmt(s), fmt(e)),
        (Some(s), None, false) => fmt(s),
        (None, Some(e), false) => fmt(e),
        (None, None, false) => String::new(),
    }
}

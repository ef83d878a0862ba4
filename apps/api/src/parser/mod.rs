//! Résumé text parser: best-effort heuristic extraction from pasted or PDF-extracted text.
//!
//! Flow: normalize → contact regexes → section split → name → summary →
//! experience → education → skills → languages.
//!
//! Nothing here fails: a pass that finds nothing leaves its field empty.

pub mod contact;
pub mod dates;
pub mod entries;
pub mod handlers;
pub mod normalize;
pub mod sections;
pub mod skills;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::parser::contact::{extract_contact, has_contact_token, ContactInfo};
use crate::parser::entries::{extract_educations, extract_experiences, ParsedEducation, ParsedExperience};
use crate::parser::normalize::normalize_text;
use crate::parser::sections::{header_kind, split_sections, SectionKind};
use crate::parser::skills::{detect_known_skills, split_items};

/// Only the first few non-empty lines are candidates for the name.
const NAME_SEARCH_LINES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub contact: ContactInfo,
    pub summary: Option<String>,
    pub experiences: Vec<ParsedExperience>,
    pub educations: Vec<ParsedEducation>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub sections_found: Vec<SectionKind>,
}

/// Parses résumé text into structured fields.
pub fn parse_resume(raw: &str) -> ParsedResume {
    let text = normalize_text(raw);
    let split = split_sections(&text);

    let skills = if split.kinds().contains(&SectionKind::Skills) {
        split_items(split.lines_of(SectionKind::Skills))
    } else {
        detect_known_skills(&text)
    };

    let parsed = ParsedResume {
        name: extract_name(&split.preamble),
        contact: extract_contact(&text),
        summary: join_paragraph(split.lines_of(SectionKind::Summary)),
        experiences: extract_experiences(split.lines_of(SectionKind::Experience)),
        educations: extract_educations(split.lines_of(SectionKind::Education)),
        skills,
        languages: split_items(split.lines_of(SectionKind::Languages)),
        sections_found: split.kinds(),
    };

    debug!(
        "Parsed résumé: name={} experiences={} educations={} skills={} sections={:?}",
        parsed.name.is_some(),
        parsed.experiences.len(),
        parsed.educations.len(),
        parsed.skills.len(),
        parsed.sections_found
    );
    parsed
}

/// Extracts plain text from an uploaded PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    // pdf-extract panics on some malformed files instead of returning an error.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| AppError::UnprocessableEntity("Could not read PDF".to_string()))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "PDF contains no extractable text (scanned image?)".to_string(),
        ));
    }
    Ok(text)
}

fn extract_name(preamble: &[&str]) -> Option<String> {
    preamble
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .take(NAME_SEARCH_LINES)
        .find(|l| is_plausible_name(l))
        .map(|l| l.to_string())
}

fn is_plausible_name(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (2..=5).contains(&words)
        && !has_contact_token(line)
        && header_kind(line).is_none()
        && line
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-'))
}

fn join_paragraph(lines: &[&str]) -> Option<String> {
    let joined = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

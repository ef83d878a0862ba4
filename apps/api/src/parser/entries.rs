//! Experience and education entry extraction from section bodies.

use serde::{Deserialize, Serialize};

use crate::parser::dates::{find_date_range, find_years, PartialDate};

/// Separators tried, in order, to split "Title <sep> Company".
const TITLE_COMPANY_SEPARATORS: &[&str] = &[" at ", " em ", " @ ", " | ", " - ", ", "];

const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "ph.d", "doctor", "mba", "b.sc", "m.sc", "bsc", "msc",
    "associate", "diploma", "bacharelado", "bacharel", "licenciatura", "mestrado", "doutorado",
    "tecnólogo", "tecnologo", "graduação", "graduacao", "pós-graduação", "pos-graduacao",
    "especialização", "especializacao", "técnico", "tecnico", "engenharia", "degree",
];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "university", "universidade", "universidad", "college", "institute", "instituto",
    "school", "escola", "faculdade", "faculty", "centro universitário", "fatec", "senai",
    "usp", "unicamp", "ufrj", "ufmg", "puc", "mit",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedExperience {
    pub title: Option<String>,
    pub company: Option<String>,
    pub start: Option<PartialDate>,
    pub end: Option<PartialDate>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEducation {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ExperienceDraft {
    header: Vec<String>,
    body: Vec<String>,
    start: Option<PartialDate>,
    end: Option<PartialDate>,
    is_current: bool,
    has_dates: bool,
}

impl ExperienceDraft {
    fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty()
    }

    fn finish(self) -> Option<ParsedExperience> {
        let mut header = self.header.into_iter();
        let first = header.next().unwrap_or_default();
        let (mut title, mut company) = split_title_company(&first);
        if company.is_none() {
            company = header.next().filter(|l| !l.is_empty());
        }
        // A leftover header line is description, not metadata.
        let mut body: Vec<String> = header.collect();
        body.extend(self.body);

        if title.as_deref().is_some_and(str::is_empty) {
            title = None;
        }
        if title.is_none() && company.is_none() {
            return None;
        }
        Some(ParsedExperience {
            title,
            company,
            start: self.start,
            end: self.end,
            is_current: self.is_current,
            description: body.join("\n"),
        })
    }
}

/// Extracts experience entries from the Experience section body.
///
/// An entry starts at a line carrying a date range, or after a blank line
/// once the current entry already has a description.
pub fn extract_experiences(lines: &[&str]) -> Vec<ParsedExperience> {
    let mut entries = Vec::new();
    let mut draft = ExperienceDraft::default();
    let mut saw_blank = false;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            saw_blank = true;
            continue;
        }

        let range = find_date_range(line);
        let starts_new = match &range {
            Some(_) => draft.has_dates || !draft.body.is_empty(),
            None => saw_blank && !draft.body.is_empty(),
        };
        if starts_new {
            entries.extend(std::mem::take(&mut draft).finish());
        }
        saw_blank = false;

        match range {
            Some(r) => {
                draft.start = Some(r.start);
                draft.end = r.end;
                draft.is_current = r.is_current;
                draft.has_dates = true;
                let rest = strip_span(line, r.span);
                if !rest.is_empty() {
                    draft.header.push(rest);
                }
            }
            None if wants_header_line(&draft, line) => draft.header.push(line.to_string()),
            None => draft.body.push(line.to_string()),
        }
    }
    if !draft.is_empty() {
        entries.extend(draft.finish());
    }
    entries
}

/// Up to two short header lines (title, company) precede the description.
fn wants_header_line(draft: &ExperienceDraft, line: &str) -> bool {
    let header_complete = draft.header.len() >= 2
        || draft
            .header
            .first()
            .is_some_and(|h| split_title_company(h).1.is_some());
    !header_complete && draft.body.is_empty() && !looks_like_sentence(line)
}

/// Removes the matched date range from the line along with dangling separators.
fn strip_span(line: &str, span: (usize, usize)) -> String {
    let (before, after) = (&line[..span.0], &line[span.1..]);
    trim_separators(&format!("{} {}", before.trim(), after.trim())).to_string()
}

/// Trims whitespace and separator punctuation together, so "Acme ( )" ends as "Acme".
fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | '-' | ',' | '(' | ')' | '·'))
}

fn split_title_company(line: &str) -> (Option<String>, Option<String>) {
    if line.is_empty() {
        return (None, None);
    }
    for sep in TITLE_COMPANY_SEPARATORS {
        if let Some((left, right)) = line.split_once(sep) {
            let (left, right) = (left.trim(), right.trim());
            if !left.is_empty() && !right.is_empty() {
                return (Some(left.to_string()), Some(right.to_string()));
            }
        }
    }
    (Some(line.to_string()), None)
}

/// Description lines read like sentences: long, or ending with a full stop.
fn looks_like_sentence(line: &str) -> bool {
    line.split_whitespace().count() > 8 || line.ends_with('.')
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

/// Extracts education entries. Blocks are separated by blank lines, or by
/// a new line carrying a year once the current block already has years.
pub fn extract_educations(lines: &[&str]) -> Vec<ParsedEducation> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_has_years = false;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
                current_has_years = false;
            }
            continue;
        }
        let has_years = !find_years(line).is_empty();
        let is_institution = contains_any(line, INSTITUTION_KEYWORDS);
        if (has_years && current_has_years) || (is_institution && block_has_institution(&current))
        {
            blocks.push(std::mem::take(&mut current));
            current_has_years = false;
        }
        current_has_years |= has_years;
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks.iter().filter_map(|b| education_from_block(b)).collect()
}

fn block_has_institution(block: &[&str]) -> bool {
    block.iter().any(|l| contains_any(l, INSTITUTION_KEYWORDS))
}

fn education_from_block(block: &[&str]) -> Option<ParsedEducation> {
    let mut entry = ParsedEducation::default();
    let mut years: Vec<i32> = Vec::new();

    for line in block {
        years.extend(find_years(line));
        let cleaned = strip_years(line);
        if cleaned.is_empty() {
            continue;
        }
        // Lines such as "Bacharelado em Ciência da Computação - Universidade X"
        // carry both parts.
        if let Some((left, right)) = cleaned.split_once(" - ").or_else(|| cleaned.split_once(" | ")) {
            if contains_any(left, DEGREE_KEYWORDS) && contains_any(right, INSTITUTION_KEYWORDS) {
                fill_degree(&mut entry, left.trim());
                entry.institution.get_or_insert_with(|| right.trim().to_string());
                continue;
            }
            if contains_any(left, INSTITUTION_KEYWORDS) && contains_any(right, DEGREE_KEYWORDS) {
                entry.institution.get_or_insert_with(|| left.trim().to_string());
                fill_degree(&mut entry, right.trim());
                continue;
            }
        }
        if entry.institution.is_none() && contains_any(&cleaned, INSTITUTION_KEYWORDS) {
            entry.institution = Some(cleaned);
        } else if entry.degree.is_none() && contains_any(&cleaned, DEGREE_KEYWORDS) {
            fill_degree(&mut entry, &cleaned);
        }
    }

    if entry.institution.is_none() && entry.degree.is_none() {
        return None;
    }
    entry.start_year = years.first().copied();
    entry.end_year = if years.len() > 1 { years.last().copied() } else { None };
    Some(entry)
}

fn fill_degree(entry: &mut ParsedEducation, line: &str) {
    if entry.degree.is_some() {
        return;
    }
    for sep in [" in ", " em ", " de ", ", "] {
        if let Some((degree, field)) = line.split_once(sep) {
            if contains_any(degree, DEGREE_KEYWORDS) && !field.trim().is_empty() {
                entry.degree = Some(degree.trim().to_string());
                entry.field_of_study = Some(field.trim().to_string());
                return;
            }
        }
    }
    entry.degree = Some(line.to_string());
}

fn strip_years(line: &str) -> String {
    let without: String = match find_date_range(line) {
        Some(r) => strip_span(line, r.span),
        None => line.to_string(),
    };
    let years = find_years(&without);
    let mut out = without;
    for y in years {
        out = out.replace(&y.to_string(), "");
    }
    trim_separators(&out).to_string()
}

fn contains_any(line: &str, needles: &[&str]) -> bool {
    let lower = line.to_lowercase();
    needles.iter().any(|n| {
        lower
            .split(|c: char| !(c.is_alphanumeric() || c == '.' || c == '-'))
            .any(|word| word.trim_end_matches('.') == *n)
            || (n.contains(' ') && lower.contains(n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_with_inline_dates() {
        let lines = [
            "Senior Engineer at Acme Corp | Jan 2020 - Present",
            "Built payment APIs in Rust",
            "Reduced latency by 40%",
            "",
            "Backend Developer - Globex | 2017 - 2019",
            "Maintained Django services",
        ];
        let entries = extract_experiences(&lines);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(entries[0].company.as_deref(), Some("Acme Corp"));
        assert!(entries[0].is_current);
        assert_eq!(entries[0].start, Some(PartialDate { year: 2020, month: Some(1) }));
        assert_eq!(
            entries[0].description,
            "Built payment APIs in Rust\nReduced latency by 40%"
        );

        assert_eq!(entries[1].title.as_deref(), Some("Backend Developer"));
        assert_eq!(entries[1].company.as_deref(), Some("Globex"));
        assert_eq!(entries[1].end.map(|d| d.year), Some(2019));
        assert!(!entries[1].is_current);
    }

    #[test]
    fn test_experience_company_on_next_line() {
        let lines = [
            "Desenvolvedora Backend",
            "Nubank",
            "Mar 2021 - Atual",
            "Desenvolvi microsserviços em Clojure atendendo 10 milhões de clientes.",
        ];
        let entries = extract_experiences(&lines);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Desenvolvedora Backend"));
        assert_eq!(entries[0].company.as_deref(), Some("Nubank"));
        assert!(entries[0].is_current);
        assert!(entries[0].description.contains("Clojure"));
    }

    #[test]
    fn test_experience_header_after_dates_starts_new_entry() {
        let lines = [
            "2019 - 2020",
            "Analyst at Initech",
            "Wrote reports.",
            "2020 - 2021",
            "Engineer at Hooli",
        ];
        let entries = extract_experiences(&lines);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].company.as_deref(), Some("Hooli"));
    }

    #[test]
    fn test_parenthesised_range_leaves_clean_company() {
        let lines = [
            "Senior Engineer at Acme (Jan 2020 - Present)",
            "Built payment APIs in Rust",
        ];
        let entries = extract_experiences(&lines);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(entries[0].company.as_deref(), Some("Acme"));
        assert!(entries[0].is_current);
    }

    #[test]
    fn test_strip_span_removes_dangling_brackets() {
        let line = "Acme (2019 - 2021) |";
        let start = line.find("2019").unwrap();
        let end = line.find(')').unwrap();
        assert_eq!(strip_span(line, (start, end)), "Acme");
    }

    #[test]
    fn test_experience_without_header_dropped() {
        assert!(extract_experiences(&["", ""]).is_empty());
    }

    #[test]
    fn test_education_combined_line() {
        let lines = ["Bacharelado em Ciência da Computação - Universidade de São Paulo", "2012 - 2016"];
        let entries = extract_educations(&lines);
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.degree.as_deref(), Some("Bacharelado"));
        assert_eq!(e.field_of_study.as_deref(), Some("Ciência da Computação"));
        assert_eq!(e.institution.as_deref(), Some("Universidade de São Paulo"));
        assert_eq!((e.start_year, e.end_year), (Some(2012), Some(2016)));
    }

    #[test]
    fn test_education_two_blocks() {
        let lines = [
            "Stanford University",
            "Master of Science in Computer Science, 2018 - 2020",
            "",
            "Universidade Federal de Minas Gerais",
            "Bacharelado em Sistemas de Informação",
            "2013 - 2017",
        ];
        let entries = extract_educations(&lines);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].institution.as_deref(), Some("Stanford University"));
        assert_eq!(entries[0].degree.as_deref(), Some("Master of Science"));
        assert_eq!(entries[0].field_of_study.as_deref(), Some("Computer Science"));
        assert_eq!(entries[0].end_year, Some(2020));
        assert_eq!(entries[1].degree.as_deref(), Some("Bacharelado"));
        assert_eq!(entries[1].start_year, Some(2013));
    }

    #[test]
    fn test_education_noise_dropped() {
        assert!(extract_educations(&["Lorem ipsum dolor"]).is_empty());
    }

    #[test]
    fn test_split_title_company_prefers_at() {
        assert_eq!(
            split_title_company("Engineer at Foo - Bar"),
            (Some("Engineer".to_string()), Some("Foo - Bar".to_string()))
        );
    }
}

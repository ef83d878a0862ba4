use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_ITEM_CHARS: usize = 40;

static ITEM_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;|•·\n]+").expect("invalid skill split regex"));

/// Matches a leading "Label:" such as "Languages:" or "Frameworks:".
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} /&]{2,30}:\s*").expect("invalid label regex"));

/// Technologies recognized when a résumé has no Skills section.
const KNOWN_SKILLS: &[&str] = &[
    "Rust", "Go", "Python", "Java", "Kotlin", "Scala", "JavaScript", "TypeScript", "C++", "C#",
    "Ruby", "PHP", "Elixir", "Clojure", "Swift", "SQL", "PostgreSQL", "MySQL", "MongoDB",
    "Redis", "Kafka", "RabbitMQ", "Docker", "Kubernetes", "Terraform", "AWS", "GCP", "Azure",
    "Linux", "Git", "React", "Angular", "Vue", "Node.js", "Next.js", "Django", "Flask",
    "FastAPI", "Spring", "Rails", "GraphQL", "REST", "gRPC", "CI/CD", "Figma", "Excel",
    "Power BI", "Tableau", "Spark", "Pandas", "TensorFlow", "PyTorch", "Scrum", "Kanban",
];

/// Dictionary entries that are also everyday words; these only match as written.
const CASE_SENSITIVE_SKILLS: &[&str] = &["Go", "Swift", "Git", "Spring", "Rails", "REST", "Excel", "Scrum"];

/// Splits a Skills (or Languages) section body into deduplicated items.
pub fn split_items(lines: &[&str]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::new();

    for line in lines {
        let line = LABEL_RE.replace(line.trim(), "");
        for raw in ITEM_SPLIT_RE.split(&line) {
            let item = raw.trim().trim_end_matches('.').trim();
            if item.is_empty() || item.chars().count() > MAX_ITEM_CHARS {
                continue;
            }
            if seen.insert(item.to_lowercase()) {
                items.push(item.to_string());
            }
        }
    }
    items
}

/// Dictionary scan used when no Skills section exists.
pub fn detect_known_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KNOWN_SKILLS
        .iter()
        .filter(|skill| {
            if CASE_SENSITIVE_SKILLS.contains(skill) {
                contains_term(text, skill)
            } else {
                contains_term(&lower, &skill.to_lowercase())
            }
        })
        .map(|s| s.to_string())
        .collect()
}

/// Whole-term containment: the neighbours of a hit must not be word characters.
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + term.len()..].chars().next();
        !before.is_some_and(is_term_char) && !after.is_some_and(is_term_char)
    })
}

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

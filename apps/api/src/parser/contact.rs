use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("invalid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{2,3}\)|\d{2,3})[\s.\-]?\d{3,5}[\s.\-]?\d{4}\b")
        .expect("invalid phone regex")
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[A-Za-z0-9_\-%]+/?")
        .expect("invalid linkedin regex")
});

static GITHUB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_\-]+/?")
        .expect("invalid github regex")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.)[^\s,;|]+").expect("invalid url regex")
});

const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

/// Pulls contact details out of the whole résumé. First match of each kind wins.
pub fn extract_contact(text: &str) -> ContactInfo {
    let linkedin = LINKEDIN_RE.find(text).map(|m| trim_url(m.as_str()));
    let github = GITHUB_RE.find(text).map(|m| trim_url(m.as_str()));
    let website = URL_RE
        .find_iter(text)
        .map(|m| trim_url(m.as_str()))
        .find(|u| {
            let lower = u.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com")
        });

    ContactInfo {
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: find_phone(text),
        linkedin,
        github,
        website,
    }
}

/// True when the line carries any contact token; such lines are never a name.
pub fn has_contact_token(line: &str) -> bool {
    EMAIL_RE.is_match(line)
        || LINKEDIN_RE.is_match(line)
        || GITHUB_RE.is_match(line)
        || URL_RE.is_match(line)
        || find_phone(line).is_some()
}

fn find_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .filter(|m| !text[..m.start()].ends_with(|c: char| c.is_ascii_digit()))
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| candidate.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS)
}

fn trim_url(raw: &str) -> String {
    raw.trim_end_matches(|c: char| matches!(c, '.' | ')' | '/'))
        .to_string()
}

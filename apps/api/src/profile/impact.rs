//! Impact check for experience bullets: does the line state a measurable outcome?

use serde::{Deserialize, Serialize};

const VAGUE_VERBS: &[&str] = &[
    "improved", "enhanced", "helped", "worked on", "assisted", "supported", "participated",
    "involved", "responsible for", "melhorei", "ajudei", "auxiliei", "apoiei", "participei",
    "trabalhei em", "responsável por", "atuei em", "contribuí",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant", "major", "large", "huge", "massive", "substantial", "considerable", "many",
    "numerous", "various", "several", "significativo", "significativa", "grande", "enorme",
    "diversos", "diversas", "vários", "várias", "muitos", "muitas",
];

const MULTIPLIER_SUFFIXES: &[&str] = &["x faster", "x more", "x less", "x improvement", "x mais", "x menos", "vezes"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCheck {
    pub bullet: String,
    pub passed: bool,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

/// Checks one bullet. A bullet passes when it carries a number, a
/// percentage, a currency sign, a `~N` estimate or a multiplier.
pub fn check_bullet(bullet: &str) -> ImpactCheck {
    let lower = bullet.to_lowercase();
    let has_digit = bullet.chars().any(|c| c.is_ascii_digit());
    let has_currency = ['$', '€', '£'].iter().any(|c| bullet.contains(*c));
    let has_multiplier = has_digit && MULTIPLIER_SUFFIXES.iter().any(|m| lower.contains(m));
    let has_estimate = lower.contains('~') && has_digit;

    if has_digit || bullet.contains('%') || has_currency || has_multiplier || has_estimate {
        return ImpactCheck {
            bullet: bullet.to_string(),
            passed: true,
            reason: None,
            suggestion: None,
        };
    }

    let (reason, suggestion) = if let Some(verb) = find_phrase(&lower, VAGUE_VERBS) {
        (
            format!("Vague verb '{verb}' without a measurable result"),
            format!("Say how much: '{verb} ... by 30%', '... saving 4 hours a week'"),
        )
    } else if let Some(word) = find_phrase(&lower, VAGUE_SCALE_WORDS) {
        (
            format!("Vague scale word '{word}' instead of a number"),
            format!("Replace '{word}' with a concrete figure such as '12 clients' or '3x'"),
        )
    } else {
        (
            "No quantified outcome".to_string(),
            "Add a number, percentage, amount or time saved".to_string(),
        )
    };

    ImpactCheck {
        bullet: bullet.to_string(),
        passed: false,
        reason: Some(reason),
        suggestion: Some(suggestion),
    }
}

/// Checks every non-empty line of an experience description.
pub fn check_description(description: &str) -> Vec<ImpactCheck> {
    description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(check_bullet)
        .collect()
}

/// Whole-word phrase lookup, so "grande" does not fire inside "grandeza".
fn find_phrase<'a>(lower: &str, phrases: &[&'a str]) -> Option<&'a str> {
    phrases.iter().copied().find(|p| {
        lower.match_indices(p).any(|(idx, _)| {
            let before = lower[..idx].chars().next_back();
            let after = lower[idx + p.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_with_percentage() {
        assert!(check_bullet("Reduced latency by 40% through caching").passed);
    }

    #[test]
    fn test_pass_with_currency() {
        assert!(check_bullet("Saved $50k annually by tuning queries").passed);
        assert!(check_bullet("Gerou R$ 2 milhões em receita").passed);
    }

    #[test]
    fn test_pass_with_count() {
        assert!(check_bullet("Trained 15 engineers on the new deploy process").passed);
    }

    #[test]
    fn test_pass_with_estimate() {
        assert!(check_bullet("Cut deploy time by ~2 hours").passed);
    }

    #[test]
    fn test_fail_vague_verb() {
        let c = check_bullet("Improved the user experience");
        assert!(!c.passed);
        assert!(c.reason.unwrap().contains("'improved'"));
    }

    #[test]
    fn test_fail_portuguese_vague_verb() {
        let c = check_bullet("Ajudei o time a entregar projetos");
        assert!(!c.passed);
        assert!(c.reason.unwrap().contains("'ajudei'"));
    }

    #[test]
    fn test_fail_vague_scale_word() {
        let c = check_bullet("Led various initiatives across teams");
        assert!(!c.passed);
        assert!(c.reason.unwrap().contains("'various'"));
    }

    #[test]
    fn test_scale_word_inside_other_word_ignored() {
        let c = check_bullet("Documentei a grandeza do sistema");
        assert_eq!(c.reason.as_deref(), Some("No quantified outcome"));
    }

    #[test]
    fn test_fail_without_any_hint() {
        let c = check_bullet("Architected the authentication system");
        assert!(!c.passed);
        assert!(c.suggestion.is_some());
    }

    #[test]
    fn test_check_description_skips_blank_lines() {
        let checks = check_description("Reduced costs by 20%\nHelped the team\n\nShipped 3 features");
        assert_eq!(checks.len(), 3);
        assert_eq!(checks.iter().filter(|c| c.passed).count(), 2);
    }
}

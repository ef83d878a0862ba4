//! Text cleanup applied before any extraction pass.

use once_cell::sync::Lazy;
use regex::Regex;

/// A leading bullet glyph, or a dash followed by a space or directly by a
/// letter ("-Built"). The letter is captured so the replacement keeps it;
/// "-5%" and "--" are left alone.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:[•●▪◦■►‣∙·*]|-\s)\s*|-(\p{L}))").expect("invalid bullet regex")
});

static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("invalid spaces regex"));

/// Normalizes extracted résumé text while keeping its line structure.
///
/// Blank lines survive (collapsed to one) because later passes use them as
/// block separators.
pub fn normalize_text(raw: &str) -> String {
    let unified: String = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{200b}' | '\u{feff}' => ' ',
            _ => c,
        })
        .collect();

    let mut lines: Vec<String> = Vec::new();
    for line in unified.lines() {
        let stripped = BULLET_RE.replace(line, "${1}");
        let collapsed = SPACES_RE.replace_all(&stripped, " ").trim().to_string();
        if collapsed.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_stripped() {
        let text = "• Built APIs\n- Reduced latency\n* Led team";
        assert_eq!(normalize_text(text), "Built APIs\nReduced latency\nLed team");
    }

    #[test]
    fn test_dash_glued_to_word_stripped() {
        assert_eq!(normalize_text("-Built APIs\n-Led team"), "Built APIs\nLed team");
    }

    #[test]
    fn test_leading_negative_number_kept() {
        assert_eq!(normalize_text("-5% churn"), "-5% churn");
    }

    #[test]
    fn test_dash_inside_line_kept() {
        assert_eq!(normalize_text("Engineer - Acme"), "Engineer - Acme");
    }

    #[test]
    fn test_smart_punctuation_unified() {
        assert_eq!(normalize_text("Jan 2020 – Mar 2021"), "Jan 2020 - Mar 2021");
        assert_eq!(normalize_text("\u{201C}quoted\u{201D}"), "\"quoted\"");
    }

    #[test]
    fn test_blank_lines_collapsed_and_trimmed() {
        let text = "\r\nA\r\n\r\n\r\n  B   C \n\n";
        assert_eq!(normalize_text(text), "A\n\nB C");
    }
}

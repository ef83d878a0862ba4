//! Section header detection and splitting.

use serde::{Deserialize, Serialize};

/// Longest line (in chars) still considered a possible header.
const MAX_HEADER_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Projects,
}

const ALIASES: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary", "professional summary", "profile", "about", "about me", "objective",
            "resumo", "resumo profissional", "sobre", "sobre mim", "perfil", "perfil profissional",
            "objetivo", "objetivo profissional",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience", "work experience", "professional experience", "employment",
            "employment history", "work history", "experiência", "experiencia",
            "experiência profissional", "experiencia profissional", "experiências",
            "histórico profissional", "historico profissional",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education", "academic background", "academic education", "formação",
            "formacao", "formação acadêmica", "formacao academica", "educação", "educacao",
            "escolaridade",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills", "technical skills", "core skills", "technologies", "tech stack",
            "competencies", "habilidades", "competências", "competencias", "tecnologias",
            "conhecimentos", "conhecimentos técnicos", "habilidades técnicas",
        ],
    ),
    (SectionKind::Languages, &["languages", "idiomas", "línguas", "linguas"]),
    (
        SectionKind::Certifications,
        &[
            "certifications", "certificates", "courses", "certificações", "certificacoes",
            "cursos", "cursos e certificações",
        ],
    ),
    (SectionKind::Projects, &["projects", "projetos", "personal projects", "projetos pessoais"]),
];

/// A section body: the lines between its header and the next header.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub lines: Vec<&'a str>,
}

/// The résumé cut into an untitled preamble and titled sections.
#[derive(Debug, Clone, Default)]
pub struct SplitResume<'a> {
    pub preamble: Vec<&'a str>,
    pub sections: Vec<Section<'a>>,
}

impl<'a> SplitResume<'a> {
    /// Lines of the first section of this kind; empty when absent.
    pub fn lines_of(&self, kind: SectionKind) -> &[&'a str] {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        let mut kinds: Vec<SectionKind> = Vec::new();
        for section in &self.sections {
            if !kinds.contains(&section.kind) {
                kinds.push(section.kind);
            }
        }
        kinds
    }
}

/// Classifies a line as a section header, if it is one.
pub fn header_kind(line: &str) -> Option<SectionKind> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADER_CHARS {
        return None;
    }
    let key = trimmed.trim_end_matches(':').trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&key.as_str()))
        .map(|(kind, _)| *kind)
}

/// Splits normalized text into preamble + sections. Blank lines are kept
/// inside section bodies as entry separators.
pub fn split_sections(text: &str) -> SplitResume<'_> {
    let mut split = SplitResume::default();
    let mut current: Option<Section<'_>> = None;

    for line in text.lines() {
        if let Some(kind) = header_kind(line) {
            if let Some(done) = current.take() {
                split.sections.push(done);
            }
            current = Some(Section {
                kind,
                lines: Vec::new(),
            });
            continue;
        }
        match current.as_mut() {
            Some(section) => section.lines.push(line),
            None => split.preamble.push(line),
        }
    }
    if let Some(done) = current {
        split.sections.push(done);
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_kind_english_and_portuguese() {
        assert_eq!(header_kind("EXPERIENCE"), Some(SectionKind::Experience));
        assert_eq!(header_kind("Experiência Profissional:"), Some(SectionKind::Experience));
        assert_eq!(header_kind("Formação Acadêmica"), Some(SectionKind::Education));
        assert_eq!(header_kind("Habilidades"), Some(SectionKind::Skills));
        assert_eq!(header_kind("Idiomas"), Some(SectionKind::Languages));
    }

    #[test]
    fn test_sentence_mentioning_skills_is_not_header() {
        assert_eq!(header_kind("I have strong skills in Rust"), None);
    }

    #[test]
    fn test_split_sections_preamble_and_bodies() {
        let text = "Ana Souza\nana@example.com\nResumo\nEngenheira backend\nHabilidades\nRust, Go";
        let split = split_sections(text);
        assert_eq!(split.preamble, vec!["Ana Souza", "ana@example.com"]);
        assert_eq!(split.lines_of(SectionKind::Summary), &["Engenheira backend"]);
        assert_eq!(split.lines_of(SectionKind::Skills), &["Rust, Go"]);
        assert!(split.lines_of(SectionKind::Education).is_empty());
        assert_eq!(
            split.kinds(),
            vec![SectionKind::Summary, SectionKind::Skills]
        );
    }
}

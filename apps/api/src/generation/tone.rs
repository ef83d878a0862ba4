//! Cover letter tone: maps the requested tone to phrasing for both the
//! LLM prompt and the template fallback.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverLetterTone {
    #[default]
    Formal,
    Enthusiastic,
    Concise,
}

/// Fixed phrasing used when the letter is built without an LLM.
#[derive(Debug, Clone)]
pub struct TonePhrases {
    pub greeting: &'static str,
    pub sign_off: &'static str,
    pub closing: &'static str,
}

impl CoverLetterTone {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "formal" => Ok(CoverLetterTone::Formal),
            "enthusiastic" => Ok(CoverLetterTone::Enthusiastic),
            "concise" => Ok(CoverLetterTone::Concise),
            other => Err(AppError::Validation(format!(
                "Unknown tone '{other}'; expected formal, enthusiastic or concise"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoverLetterTone::Formal => "formal",
            CoverLetterTone::Enthusiastic => "enthusiastic",
            CoverLetterTone::Concise => "concise",
        }
    }

    /// Style instruction injected into the cover letter prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            CoverLetterTone::Formal => {
                "Professional and measured. Full sentences, no exclamation marks, \
                 three to four short paragraphs."
            }
            CoverLetterTone::Enthusiastic => {
                "Warm and energetic, showing genuine interest in the company. \
                 At most one exclamation mark, three short paragraphs."
            }
            CoverLetterTone::Concise => {
                "Direct and brief. Two short paragraphs, under 150 words in total."
            }
        }
    }

    pub fn phrases(self) -> TonePhrases {
        match self {
            CoverLetterTone::Formal => TonePhrases {
                greeting: "Dear Hiring Manager,",
                closing: "Thank you for your consideration. I would welcome the opportunity \
                          to discuss how I can contribute to your team.",
                sign_off: "Sincerely,",
            },
            CoverLetterTone::Enthusiastic => TonePhrases {
                greeting: "Hello,",
                closing: "I would love to talk about how I can help the team. \
                          Thank you for your time!",
                sign_off: "Best regards,",
            },
            CoverLetterTone::Concise => TonePhrases {
                greeting: "Hi,",
                closing: "Thanks for your time.",
                sign_off: "Best,",
            },
        }
    }
}

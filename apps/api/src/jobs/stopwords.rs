//! Stopword lists used by the keyword extractor.
//!
//! Job postings in this product are mostly Portuguese, often with English
//! tech vocabulary mixed in, so both lists apply to every posting.

use std::collections::HashSet;

use once_cell::sync::Lazy;

const PORTUGUESE: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois",
    "do", "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram",
    "essa", "essas", "esse", "esses", "esta", "está", "estão", "estas", "estava", "este",
    "estes", "eu", "foi", "for", "foram", "há", "isso", "isto", "já", "lhe", "lhes", "mais",
    "mas", "me", "mesmo", "meu", "minha", "muito", "na", "não", "nas", "nem", "no", "nos",
    "nós", "nossa", "nossas", "nosso", "nossos", "num", "numa", "o", "os", "ou", "para",
    "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "que", "quem", "são", "se",
    "seja", "sem", "ser", "será", "seu", "seus", "só", "sua", "suas", "também", "te", "tem",
    "têm", "ter", "teu", "tua", "um", "uma", "umas", "uns", "você", "vocês", "vos",
    // recruiting filler
    "vaga", "vagas", "empresa", "oportunidade", "buscamos", "procuramos", "requisitos",
    "desejável", "desejáveis", "diferencial", "diferenciais", "conhecimento",
    "conhecimentos", "experiência", "atividades", "responsabilidades", "benefícios",
    "local", "trabalho", "candidato", "candidata", "pessoa", "profissional", "área",
    "anos", "ano", "bem", "sobre", "sempre", "cada", "todos", "todas", "outros", "outras",
    "nível", "forma", "parte", "time", "equipe",
];

const ENGLISH: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "do", "for",
    "from", "has", "have", "in", "into", "is", "it", "its", "of", "on", "or", "our", "that",
    "the", "their", "this", "to", "we", "will", "with", "you", "your", "who", "what", "which",
    "all", "any", "also", "more", "must", "should", "would", "able", "across", "about",
    // recruiting filler
    "job", "role", "position", "candidate", "company", "team", "work", "working",
    "experience", "requirements", "responsibilities", "benefits", "years", "year",
    "strong", "plus", "etc", "including", "looking", "join",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PORTUGUESE.iter().chain(ENGLISH.iter()).copied().collect());

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_articles_are_stopwords() {
        for word in ["de", "para", "com", "não", "você"] {
            assert!(is_stopword(word), "{word} should be a stopword");
        }
    }

    #[test]
    fn test_tech_terms_are_not_stopwords() {
        for word in ["rust", "python", "kubernetes", "sql"] {
            assert!(!is_stopword(word), "{word} should not be a stopword");
        }
    }
}

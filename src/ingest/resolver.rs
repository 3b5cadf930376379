//! # Resolvedor de Sintomas
//!
//! Converte o que o usuário digitou em nomes do universo de sintomas da KB.
//!
//! ## Estratégia
//!
//! ```text
//! entrada "shortnes of breath"
//!   ├── 1. title case + comparação exata (sem caixa) → Exact
//!   ├── 2. candidato mais parecido com razão ≥ 0.6    → Suggestion
//!   └── 3. nada parecido                              → Unknown
//! ```
//!
//! A razão de similaridade é a de Ratcliff/Obershelp: `2·M / T`, onde `M`
//! é o total de caracteres em blocos comuns e `T` a soma dos comprimentos.
//!
//! Sugestões não são aceitas aqui: quem chama decide (perguntando ao
//! usuário ou aceitando automaticamente).

use regex::Regex;

use crate::core::{EvidenceSet, KnowledgeBase};

use super::title_case;

/// Similaridade mínima para sugerir um sintoma.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Resultado da resolução de um nome.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Nome canônico da KB.
    Exact(String),
    /// Candidato próximo, pendente de confirmação.
    Suggestion {
        input: String,
        candidate: String,
        score: f64,
    },
    /// Nenhum candidato acima do corte.
    Unknown(String),
}

/// Frase composta: `"<nome> has A and B, therefore they might have X or Y"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSentence {
    pub subject: String,
    pub symptoms: Vec<String>,
    pub diseases: Vec<String>,
}

pub struct InputResolver {
    universe: Vec<String>,
}

impl InputResolver {
    pub fn new(kb: &KnowledgeBase) -> Self {
        Self {
            universe: kb.symptom_universe().into_iter().map(String::from).collect(),
        }
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn resolve(&self, raw: &str) -> Resolution {
        let name = title_case(raw.trim());
        let lower = name.to_lowercase();
        if let Some(exact) = self.universe.iter().find(|s| s.to_lowercase() == lower) {
            return Resolution::Exact(exact.clone());
        }

        let best = self
            .universe
            .iter()
            .map(|candidate| (similarity_ratio(&name, candidate), candidate))
            .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
            .max_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.1.cmp(b.1))
            });

        match best {
            Some((score, candidate)) => Resolution::Suggestion {
                input: name,
                candidate: candidate.clone(),
                score,
            },
            None => Resolution::Unknown(name),
        }
    }

    /// Resolve uma lista aceitando só correspondências exatas.
    ///
    /// Devolve a evidência e as resoluções que precisam de decisão.
    pub fn resolve_exact<'a, I>(&self, raws: I) -> (EvidenceSet, Vec<Resolution>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut evidence = EvidenceSet::default();
        let mut pending = Vec::new();
        for raw in raws {
            match self.resolve(raw) {
                Resolution::Exact(name) => {
                    evidence.push(name);
                }
                other => pending.push(other),
            }
        }
        (evidence, pending)
    }
}

/// Interpretador de frases compostas.
///
/// As regexes são compiladas uma única vez em [`new()`](SentenceParser::new)
/// e reutilizadas em todas as chamadas a [`parse()`](SentenceParser::parse).
pub struct SentenceParser {
    /// A palavra `has` que separa o sujeito dos sintomas.
    has_re: Regex,
    /// Separadores de sintomas: vírgula ou `and`.
    and_re: Regex,
    /// `they/he/she might have` antes das doenças suspeitas.
    pronoun_re: Regex,
    /// Separadores de doenças: vírgula ou `or`.
    or_re: Regex,
}

impl Default for SentenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceParser {
    pub fn new() -> Self {
        Self {
            has_re: Regex::new(r"\bhas\b").expect("regex de 'has' inválida"),
            and_re: Regex::new(r",|\band\b").expect("regex de 'and' inválida"),
            pronoun_re: Regex::new(r"\b(?:they|he|she)\s+might\s+have\b")
                .expect("regex de pronome inválida"),
            or_re: Regex::new(r",|\bor\b").expect("regex de 'or' inválida"),
        }
    }

    /// Interpreta uma frase composta; `None` se o formato não bate.
    ///
    /// Exige exatamente um `therefore` e um `has`. Sintomas são separados por
    /// `and` ou vírgula; doenças por `or` ou vírgula.
    pub fn parse(&self, sentence: &str) -> Option<ComplexSentence> {
        let lower = sentence.to_lowercase().replace('.', "");
        let (before, after) = lower.split_once("therefore")?;
        if after.contains("therefore") {
            return None;
        }

        let mut parts = self.has_re.splitn(before, 3);
        let subject = parts.next()?.trim();
        let symptoms_part = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let symptoms = split_names(&self.and_re, symptoms_part);
        if symptoms.is_empty() {
            return None;
        }

        let diseases = split_names(&self.or_re, &self.pronoun_re.replace_all(after, ""));

        Some(ComplexSentence {
            subject: title_case(subject),
            symptoms,
            diseases,
        })
    }
}

fn split_names(separator: &Regex, text: &str) -> Vec<String> {
    separator
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(title_case)
        .collect()
}

/// Razão de similaridade de Ratcliff/Obershelp em `[0, 1]`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Maior bloco comum `(início em a, início em b, tamanho)`; empate → mais à esquerda.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut current = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let run = previous[j] + 1;
                current[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        previous = current;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> InputResolver {
        InputResolver::new(&KnowledgeBase::builtin())
    }

    #[test]
    fn exact_match_ignores_case() {
        assert_eq!(resolver().resolve("fever"), Resolution::Exact("Fever".into()));
        assert_eq!(
            resolver().resolve("shortness of breath"),
            Resolution::Exact("Shortness of Breath".into())
        );
    }

    /// Erro de digitação vira sugestão
    #[test]
    fn typo_becomes_suggestion() {
        match resolver().resolve("Caugh") {
            Resolution::Suggestion { candidate, score, .. } => {
                assert_eq!(candidate, "Cough");
                assert!((score - 0.8).abs() < 1e-12);
            }
            other => panic!("esperava sugestão, veio {other:?}"),
        }
    }

    #[test]
    fn unrelated_input_is_unknown() {
        assert_eq!(resolver().resolve("xyz"), Resolution::Unknown("Xyz".into()));
    }

    #[test]
    fn ratio_matches_reference_values() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        assert!((similarity_ratio("Fevr", "Fever") - 8.0 / 9.0).abs() < 1e-12);
        assert_eq!(similarity_ratio("Rash", "Rash"), 1.0);
    }

    #[test]
    fn resolve_exact_splits_pending() {
        let (evidence, pending) = resolver().resolve_exact(["fever", "Caugh", "cough", "fever"]);
        assert_eq!(evidence.as_slice(), ["Fever", "Cough"]);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn parses_complex_sentence() {
        let parsed = SentenceParser::new()
            .parse("John has fever and cough, therefore he might have Flu or COVID-19.")
            .unwrap();
        assert_eq!(parsed.subject, "John");
        assert_eq!(parsed.symptoms, vec!["Fever", "Cough"]);
        assert_eq!(parsed.diseases, vec!["Flu", "Covid-19"]);
    }

    /// O mesmo interpretador serve várias frases
    #[test]
    fn parser_is_reusable() {
        let parser = SentenceParser::new();
        let first = parser.parse("Ana has chills, therefore she might have malaria").unwrap();
        let second = parser.parse("Rui has rash and fever, therefore dengue").unwrap();
        assert_eq!(first.diseases, vec!["Malaria"]);
        assert_eq!(second.symptoms, vec!["Rash", "Fever"]);
        assert_eq!(second.diseases, vec!["Dengue"]);
    }

    #[test]
    fn rejects_malformed_sentences() {
        let parser = SentenceParser::new();
        assert!(parser.parse("John has fever and cough").is_none());
        assert!(parser.parse("John feels bad, therefore flu").is_none());
        assert!(parser.parse("John has fever, therefore x, therefore y").is_none());
        assert!(parser.parse("John has , therefore flu").is_none());
    }
}

//! # Carregador de Conhecimento — Declarações em Texto Livre
//!
//! O [`KnowledgeLoader`] lê declarações no formato
//!
//! ```text
//! Migraine has symptoms headache, nausea, sensitivity to light.
//! ```
//!
//! e as mescla numa [`KnowledgeBase`] **antes** de qualquer consulta.
//!
//! ## Regras de Extração
//!
//! - Linhas sem o marcador `has symptoms` (qualquer caixa) são ignoradas
//! - Doença = texto antes da primeira palavra `has`, em title case
//! - Sintomas = lista separada por vírgulas após o marcador, sem pontos
//!
//! ## Política de Mescla
//!
//! | Situação | Efeito |
//! |----------|--------|
//! | Doença nova | nova entrada com os sintomas na ordem lida |
//! | Doença existente | acrescenta só sintomas ainda não listados |
//! | Sintoma sem força | recebe [`DEFAULT_STRENGTH`] |
//! | Sintoma com força | mantém a força existente |
//!
//! Nomes que já existem na KB com outra caixa (`"Shortness Of Breath"` vs
//! `"Shortness of Breath"`) reaproveitam a grafia da KB.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::{DiseaseEntry, KnowledgeBase};

use super::title_case;

/// Força atribuída a sintomas declarados sem valor.
pub const DEFAULT_STRENGTH: f64 = 0.7;

/// Arquivo de conhecimento padrão (relativo ao diretório de trabalho).
pub const KNOWLEDGE_FILE: &str = "knowledge.txt";

/// Uma declaração `doença has symptoms ...` já normalizada.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub disease: String,
    pub symptoms: Vec<String>,
}

/// Contadores de uma carga.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub lines_read: usize,
    pub statements: usize,
    pub diseases_added: usize,
    pub symptoms_added: usize,
}

pub struct KnowledgeLoader {
    /// Tudo antes da primeira palavra `has`.
    disease_re: Regex,
    /// O marcador `has symptoms`.
    marker_re: Regex,
}

impl Default for KnowledgeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeLoader {
    pub fn new() -> Self {
        Self {
            disease_re: Regex::new(r"(?i)^\s*(.*?)\s*\bhas\b").expect("regex de doença inválida"),
            marker_re: Regex::new(r"(?i)\bhas\s+symptoms\b").expect("regex de marcador inválida"),
        }
    }

    /// Interpreta uma linha; `None` se ela não é uma declaração.
    pub fn parse_line(&self, line: &str) -> Option<Statement> {
        let line = line.trim();
        let marker = self.marker_re.find(line)?;

        let disease = self
            .disease_re
            .captures(line)
            .and_then(|cap| cap.get(1))
            .map(|m| title_case(m.as_str().trim()))
            .filter(|d| !d.is_empty())?;

        let symptoms: Vec<String> = line[marker.end()..]
            .replace('.', "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(title_case)
            .collect();

        if symptoms.is_empty() {
            return None;
        }
        Some(Statement { disease, symptoms })
    }

    /// Mescla todas as declarações de `text` na KB.
    pub fn merge_text(&self, kb: &mut KnowledgeBase, text: &str) -> LoadReport {
        let mut report = LoadReport::default();
        let mut universe: Vec<String> = kb.symptom_universe().into_iter().map(String::from).collect();
        let mut diseases: Vec<String> = kb.diseases().map(|(name, _)| name.to_string()).collect();

        for line in text.lines() {
            report.lines_read += 1;
            let Some(statement) = self.parse_line(line) else {
                continue;
            };
            report.statements += 1;

            let disease = canonical(&diseases, statement.disease);
            let symptoms: Vec<String> = statement
                .symptoms
                .into_iter()
                .map(|s| {
                    let s = canonical(&universe, s);
                    if !universe.contains(&s) {
                        universe.push(s.clone());
                    }
                    s
                })
                .collect();

            let added_disease = kb.get(&disease).is_none();
            if added_disease {
                kb.insert(disease.clone(), DiseaseEntry::default());
                diseases.push(disease.clone());
                report.diseases_added += 1;
            }
            if let Some(entry) = kb.get_mut(&disease) {
                for symptom in symptoms {
                    if !entry.symptoms.contains(&symptom) {
                        entry.symptoms.push(symptom.clone());
                        report.symptoms_added += 1;
                    }
                    entry.strengths.entry(symptom).or_insert(DEFAULT_STRENGTH);
                }
            }
            tracing::debug!(disease = %disease, new = added_disease, "Declaração mesclada");
        }

        tracing::info!(
            statements = report.statements,
            diseases_added = report.diseases_added,
            symptoms_added = report.symptoms_added,
            "Conhecimento textual carregado"
        );
        report
    }

    /// Lê e mescla um arquivo de declarações.
    ///
    /// Arquivo inexistente não é erro: a KB fica como está.
    pub fn load_file(&self, path: &Path, kb: &mut KnowledgeBase) -> Result<LoadReport> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Nenhum arquivo de conhecimento encontrado");
            return Ok(LoadReport::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler {}", path.display()))?;
        Ok(self.merge_text(kb, &text))
    }
}

/// Reaproveita a grafia existente de `name` (comparação sem caixa).
fn canonical(known: &[String], name: String) -> String {
    let lower = name.to_lowercase();
    known
        .iter()
        .find(|k| k.to_lowercase() == lower)
        .cloned()
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statement() {
        let loader = KnowledgeLoader::new();
        let statement = loader
            .parse_line("migraine has symptoms headache, nausea, sensitivity to light.")
            .unwrap();
        assert_eq!(statement.disease, "Migraine");
        assert_eq!(
            statement.symptoms,
            vec!["Headache", "Nausea", "Sensitivity To Light"]
        );
    }

    #[test]
    fn skips_non_statements() {
        let loader = KnowledgeLoader::new();
        assert!(loader.parse_line("").is_none());
        assert!(loader.parse_line("Flu is common in winter").is_none());
        assert!(loader.parse_line("Flu HAS SYMPTOMS").is_none());
    }

    /// Doença nova entra com força padrão
    #[test]
    fn merges_new_disease() {
        let loader = KnowledgeLoader::new();
        let mut kb = KnowledgeBase::builtin();
        let report = loader.merge_text(&mut kb, "Migraine has symptoms headache, nausea.\n");
        assert_eq!(report.diseases_added, 1);
        assert_eq!(report.symptoms_added, 2);
        let migraine = kb.get("Migraine").unwrap();
        assert_eq!(migraine.symptoms, vec!["Headache", "Nausea"]);
        assert_eq!(migraine.strength("Nausea"), Some(DEFAULT_STRENGTH));
        assert!(kb.validate().is_ok());
    }

    /// Doença existente ganha só sintomas novos; forças antigas ficam
    #[test]
    fn extends_existing_disease() {
        let loader = KnowledgeLoader::new();
        let mut kb = KnowledgeBase::builtin();
        let report = loader.merge_text(&mut kb, "flu has symptoms fever, fatigue");
        assert_eq!(report.diseases_added, 0);
        assert_eq!(report.symptoms_added, 1);
        let flu = kb.get("Flu").unwrap();
        assert_eq!(flu.symptoms, vec!["Fever", "Cough", "Headache", "Fatigue"]);
        assert_eq!(flu.strength("Fever"), Some(0.8));
        assert_eq!(flu.strength("Fatigue"), Some(DEFAULT_STRENGTH));
    }

    #[test]
    fn reuses_existing_spelling() {
        let loader = KnowledgeLoader::new();
        let mut kb = KnowledgeBase::builtin();
        loader.merge_text(&mut kb, "covid-19 has symptoms shortness of breath, fatigue");
        let covid = kb.get("COVID-19").unwrap();
        assert!(covid.symptoms.contains(&"Fatigue".to_string()));
        assert_eq!(
            covid.symptoms.iter().filter(|s| s.as_str() == "Shortness of Breath").count(),
            1
        );
        assert!(kb.get("Covid-19").is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let loader = KnowledgeLoader::new();
        let mut kb = KnowledgeBase::builtin();
        let before = kb.clone();
        let report = loader
            .load_file(Path::new("/nonexistent/knowledge.txt"), &mut kb)
            .unwrap();
        assert_eq!(report, LoadReport::default());
        assert_eq!(kb, before);
    }
}

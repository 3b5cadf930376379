//! # KnowledgeBase — Tabela Doença → Sintomas
//!
//! A [`KnowledgeBase`] é a fonte de todo o conhecimento do motor: para cada
//! doença, a lista **ordenada** de sintomas associados e a força indicadora
//! de cada um (`P(sintoma se manifesta | doença)`, sempre em `(0, 1)`).
//!
//! ## Propriedade
//!
//! O núcleo só **lê** a KB. Quem a altera é o carregador de conhecimento
//! ([`crate::ingest::loader`]) antes de qualquer consulta. Não existe KB
//! global: ela é passada explicitamente a cada chamada de
//! [`infer()`](crate::diagnosis::infer).
//!
//! ## Formato JSON
//!
//! ```json
//! {
//!   "Flu": {
//!     "symptoms": ["Fever", "Cough", "Headache"],
//!     "strengths": { "Fever": 0.8, "Cough": 0.7, "Headache": 0.6 }
//!   }
//! }
//! ```
//!
//! O campo `strengths` também aceita o nome legado `prob`.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use diagnostico_bayesiano::core::{DiseaseEntry, KnowledgeBase};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.insert("Flu", DiseaseEntry::from_pairs([("Fever", 0.8), ("Cough", 0.7)]));
//! assert!(kb.validate().is_ok());
//! assert!(kb.contains_symptom("Cough"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::KnowledgeBaseError;

/// Sintomas e forças indicadoras de uma doença.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    /// Sintomas na ordem em que se tornam pais no modelo.
    pub symptoms: Vec<String>,
    /// Força indicadora de cada sintoma listado.
    #[serde(alias = "prob")]
    pub strengths: HashMap<String, f64>,
}

impl DiseaseEntry {
    /// Monta uma entrada a partir de pares `(sintoma, força)`, preservando a ordem.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut entry = Self::default();
        for (symptom, strength) in pairs {
            let symptom = symptom.into();
            entry.strengths.insert(symptom.clone(), strength);
            entry.symptoms.push(symptom);
        }
        entry
    }

    /// Força indicadora de `symptom`, se cadastrada.
    pub fn strength(&self, symptom: &str) -> Option<f64> {
        self.strengths.get(symptom).copied()
    }

    /// Verifica o contrato de uma entrada.
    ///
    /// Todo sintoma listado precisa de força finita em `(0, 1)` e não pode
    /// aparecer duas vezes (viraria um pai duplicado na CPT). Forças de
    /// sintomas não listados são ignoradas. Uma lista vazia é válida: a
    /// doença nunca ganha pais e fica fora de todo modelo.
    pub fn validate(&self, disease: &str) -> Result<(), KnowledgeBaseError> {
        let mut seen = BTreeSet::new();
        for symptom in &self.symptoms {
            if !seen.insert(symptom.as_str()) {
                return Err(KnowledgeBaseError::DuplicateSymptom {
                    disease: disease.to_string(),
                    symptom: symptom.clone(),
                });
            }
            let value = self
                .strength(symptom)
                .ok_or_else(|| KnowledgeBaseError::MissingStrength {
                    disease: disease.to_string(),
                    symptom: symptom.clone(),
                })?;
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(KnowledgeBaseError::StrengthOutOfRange {
                    disease: disease.to_string(),
                    symptom: symptom.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Base de conhecimento in-memory: nome da doença → [`DiseaseEntry`].
///
/// As doenças ficam num `BTreeMap`, então a ordem de iteração (e com ela a
/// ordem dos nós do modelo) é sempre a mesma para a mesma KB.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    diseases: BTreeMap<String, DiseaseEntry>,
}

impl KnowledgeBase {
    /// Cria uma KB vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabela de sementes com as dez doenças de referência.
    ///
    /// É um valor novo a cada chamada; nada aqui é compartilhado entre consultas.
    pub fn builtin() -> Self {
        let mut kb = Self::new();
        for (disease, pairs) in BUILTIN_TABLE {
            kb.insert(*disease, DiseaseEntry::from_pairs(pairs.iter().copied()));
        }
        kb
    }

    /// Insere (ou substitui) uma doença e devolve a entrada anterior, se houver.
    ///
    /// Não valida: entradas malformadas são rejeitadas em [`validate()`](Self::validate),
    /// chamado pelo construtor do modelo antes de qualquer inferência.
    pub fn insert(&mut self, disease: impl Into<String>, entry: DiseaseEntry) -> Option<DiseaseEntry> {
        let disease = disease.into();
        tracing::debug!(disease = %disease, symptoms = entry.symptoms.len(), "KB: doença armazenada");
        self.diseases.insert(disease, entry)
    }

    pub fn get(&self, disease: &str) -> Option<&DiseaseEntry> {
        self.diseases.get(disease)
    }

    pub fn get_mut(&mut self, disease: &str) -> Option<&mut DiseaseEntry> {
        self.diseases.get_mut(disease)
    }

    /// Itera sobre `(doença, entrada)` em ordem alfabética.
    pub fn diseases(&self) -> impl Iterator<Item = (&str, &DiseaseEntry)> {
        self.diseases.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Universo de sintomas: todo sintoma listado por alguma doença.
    pub fn symptom_universe(&self) -> BTreeSet<&str> {
        self.diseases
            .values()
            .flat_map(|entry| entry.symptoms.iter().map(String::as_str))
            .collect()
    }

    /// `true` se `symptom` pertence ao universo de sintomas (comparação exata).
    pub fn contains_symptom(&self, symptom: &str) -> bool {
        self.diseases
            .values()
            .any(|entry| entry.symptoms.iter().any(|s| s == symptom))
    }

    /// Valida todas as entradas; a primeira violação interrompe.
    pub fn validate(&self) -> Result<(), KnowledgeBaseError> {
        for (disease, entry) in &self.diseases {
            if disease.trim().is_empty() {
                return Err(KnowledgeBaseError::EmptyDiseaseName);
            }
            entry.validate(disease)?;
        }
        Ok(())
    }

    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }
}

/// Sementes: (doença, [(sintoma, força)]) na ordem de cadastro dos sintomas.
const BUILTIN_TABLE: &[(&str, &[(&str, f64)])] = &[
    ("Flu", &[("Fever", 0.8), ("Cough", 0.7), ("Headache", 0.6)]),
    (
        "COVID-19",
        &[
            ("Fever", 0.85),
            ("Cough", 0.65),
            ("Shortness of Breath", 0.75),
            ("Loss of Smell", 0.8),
        ],
    ),
    ("Cold", &[("Sneezing", 0.9), ("Runny Nose", 0.8), ("Cough", 0.4)]),
    ("Malaria", &[("Fever", 0.9), ("Chills", 0.85), ("Sweating", 0.75)]),
    (
        "Typhoid",
        &[("Fever", 0.8), ("Headache", 0.7), ("Abdominal Pain", 0.6)],
    ),
    (
        "Asthma",
        &[("Cough", 0.7), ("Shortness of Breath", 0.8), ("Wheezing", 0.9)],
    ),
    (
        "Allergy",
        &[("Sneezing", 0.8), ("Runny Nose", 0.7), ("Itchy Eyes", 0.6)],
    ),
    (
        "Dengue",
        &[
            ("Fever", 0.95),
            ("Headache", 0.85),
            ("Muscle Pain", 0.8),
            ("Rash", 0.7),
        ],
    ),
    (
        "Pneumonia",
        &[
            ("Fever", 0.9),
            ("Cough", 0.8),
            ("Chest Pain", 0.7),
            ("Shortness of Breath", 0.6),
        ],
    ),
    (
        "Tuberculosis",
        &[
            ("Cough", 0.85),
            ("Weight Loss", 0.75),
            ("Night Sweats", 0.65),
            ("Fever", 0.9),
        ],
    ),
];

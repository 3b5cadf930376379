//! # EvidenceSet — Sintomas Observados
//!
//! Coleção ordenada e sem duplicatas de sintomas observados como
//! **presentes** (estado `1`) numa consulta. O modelo aqui nunca observa
//! um sintoma como ausente.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Estado binário "presente".
pub const PRESENT: u8 = 1;

/// Sintomas observados numa consulta, na ordem em que foram informados.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceSet {
    symptoms: Vec<String>,
}

impl EvidenceSet {
    /// Cria o conjunto descartando repetições (mantém a primeira ocorrência).
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for symptom in symptoms {
            set.push(symptom);
        }
        set
    }

    /// Adiciona um sintoma; retorna `false` se ele já estava presente.
    pub fn push(&mut self, symptom: impl Into<String>) -> bool {
        let symptom = symptom.into();
        if self.contains(&symptom) {
            return false;
        }
        self.symptoms.push(symptom);
        true
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Atribuição `sintoma → 1` para o motor de inferência.
    pub fn as_assignment(&self) -> BTreeMap<String, u8> {
        self.symptoms
            .iter()
            .map(|s| (s.clone(), PRESENT))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_preserving_order() {
        let evidence = EvidenceSet::new(["Fever", "Cough", "Fever", "Headache"]);
        assert_eq!(evidence.as_slice(), ["Fever", "Cough", "Headache"]);
    }

    #[test]
    fn assignment_marks_everything_present() {
        let evidence = EvidenceSet::new(["Fever", "Cough"]);
        let assignment = evidence.as_assignment();
        assert_eq!(assignment.len(), 2);
        assert!(assignment.values().all(|state| *state == PRESENT));
    }
}

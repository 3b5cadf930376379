//! # Eliminação de Variáveis
//!
//! Inferência **exata** de marginais sobre um [`Model`].
//!
//! ## Algoritmo
//!
//! ```text
//! query(Q, evidência e):
//!   1. fatores ← um por CPT do modelo (forma conferida)
//!   2. reduz cada fator fixando as variáveis de e
//!   3. enquanto houver variável fora de {Q}:
//!        X ← variável com menor vizinhança (empate → ordem alfabética)
//!        ψ ← Π fatores que contêm X
//!        substitui esses fatores por Σ_X ψ
//!   4. φ ← Π fatores restantes (escopo ⊆ {Q})
//!   5. P(Q | e) ← φ / Σ φ
//! ```
//!
//! Doenças não ligadas à consulta viram fatores constantes depois da soma e
//! somem na normalização. Sintomas não observados são marginalizados pelo
//! prior. Com todos os sintomas observados, o resultado coincide com a
//! linha da CPT da doença consultada.
//!
//! Cada consulta é independente: o motor é `Sync` e pode ser usado em
//! paralelo por várias doenças.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::InferenceError;
use crate::model::Model;

use super::factor::Factor;

/// Distribuição marginal de uma variável binária.
#[derive(Clone, Debug, PartialEq)]
pub struct Marginal {
    pub variable: String,
    /// `[P(ausente), P(presente)]`
    pub values: [f64; 2],
}

impl Marginal {
    pub fn present(&self) -> f64 {
        self.values[1]
    }
}

/// Motor de eliminação de variáveis sobre um modelo validado.
pub struct VariableElimination<'m> {
    model: &'m Model,
}

impl<'m> VariableElimination<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self { model }
    }

    /// Calcula `P(variable | evidence)`.
    ///
    /// `evidence` mapeia variável → estado (`0` ou `1`). Toda variável de
    /// evidência precisa existir no modelo.
    pub fn query(&self, variable: &str, evidence: &BTreeMap<String, u8>) -> Result<Marginal, InferenceError> {
        if !self.model.contains(variable) {
            return Err(InferenceError::UnknownVariable {
                variable: variable.to_string(),
            });
        }
        if evidence.contains_key(variable) {
            return Err(InferenceError::QueryIsEvidence {
                variable: variable.to_string(),
            });
        }
        for (name, state) in evidence {
            if !self.model.contains(name) {
                return Err(InferenceError::UnknownEvidence {
                    variable: name.clone(),
                });
            }
            if *state > 1 {
                return Err(InferenceError::InvalidState {
                    variable: name.clone(),
                    state: *state,
                });
            }
        }

        let mut factors: Vec<Factor> = self
            .model
            .cpts()
            .map(|cpt| -> Result<Factor, InferenceError> {
                let factor = Factor::from_cpt(cpt)?;
                Ok(evidence
                    .iter()
                    .fold(factor, |f, (name, state)| f.reduce(name, *state)))
            })
            .collect::<Result<_, InferenceError>>()?;

        while let Some(next) = next_to_eliminate(&factors, variable) {
            let (involved, rest): (Vec<Factor>, Vec<Factor>) =
                factors.into_iter().partition(|f| f.contains(&next));
            let mut psi = Factor::unit();
            for factor in &involved {
                psi = psi.product(factor)?;
            }
            factors = rest;
            factors.push(psi.sum_out(&next));
        }

        let mut joint = Factor::unit();
        for factor in &factors {
            joint = joint.product(factor)?;
        }

        if joint.variables() != [variable] {
            return Err(InferenceError::NoEliminationOrder {
                variable: variable.to_string(),
                scope: joint.variables().to_vec(),
            });
        }

        let normalized = joint.normalize(variable)?;
        let values = [normalized.values()[0], normalized.values()[1]];
        tracing::trace!(variable, present = values[1], "Marginal calculada");
        Ok(Marginal {
            variable: variable.to_string(),
            values,
        })
    }
}

/// Escolhe a próxima variável a eliminar pelo critério de menor vizinhança.
fn next_to_eliminate(factors: &[Factor], query: &str) -> Option<String> {
    let candidates: BTreeSet<&str> = factors
        .iter()
        .flat_map(|f| f.variables().iter().map(String::as_str))
        .filter(|v| *v != query)
        .collect();

    candidates
        .into_iter()
        .min_by_key(|candidate| {
            factors
                .iter()
                .filter(|f| f.contains(candidate))
                .flat_map(|f| f.variables().iter().map(String::as_str))
                .collect::<BTreeSet<_>>()
                .len()
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cpt, DiseaseNode, SymptomNode};

    fn evidence(names: &[&str]) -> BTreeMap<String, u8> {
        names.iter().map(|n| (n.to_string(), 1)).collect()
    }

    fn disease(name: &str, parents: &[(&str, f64)]) -> DiseaseNode {
        let parents: Vec<(String, f64)> = parents.iter().map(|(n, p)| (n.to_string(), *p)).collect();
        DiseaseNode {
            name: name.to_string(),
            parents: parents.iter().map(|(n, _)| n.clone()).collect(),
            cpt: Cpt::noisy_conjunction(name, &parents).unwrap(),
        }
    }

    fn flu_model() -> Model {
        Model::new(
            vec![
                SymptomNode::new("Fever"),
                SymptomNode::new("Cough"),
                SymptomNode::new("Headache"),
            ],
            vec![disease("Flu", &[("Fever", 0.8), ("Cough", 0.7), ("Headache", 0.6)])],
        )
        .unwrap()
    }

    /// Todos os pais observados: resultado é exatamente a linha da CPT
    #[test]
    fn fully_observed_is_row_lookup() {
        let model = flu_model();
        let engine = VariableElimination::new(&model);
        let marginal = engine
            .query("Flu", &evidence(&["Fever", "Cough", "Headache"]))
            .unwrap();
        assert!((marginal.present() - 0.8 * 0.7 * 0.6).abs() < 1e-12);
        assert!((marginal.values[0] + marginal.values[1] - 1.0).abs() < 1e-12);
    }

    /// Sintoma não observado é marginalizado pelo prior uniforme
    #[test]
    fn unobserved_parent_is_marginalized() {
        let model = Model::new(
            vec![SymptomNode::new("Fever"), SymptomNode::new("Cough")],
            vec![disease("Flu", &[("Fever", 0.8), ("Cough", 0.7)])],
        )
        .unwrap();
        let engine = VariableElimination::new(&model);
        let marginal = engine.query("Flu", &evidence(&["Fever"])).unwrap();
        // P(Flu=1 | Fever=1) = 0.5·0.56 + 0.5·0.24 = 0.40
        assert!((marginal.present() - 0.4).abs() < 1e-12);
    }

    /// Sem evidência, a marginal é a média das linhas sob o prior
    #[test]
    fn no_evidence_averages_rows() {
        let model = Model::new(
            vec![SymptomNode::new("Fever")],
            vec![disease("Flu", &[("Fever", 0.8)])],
        )
        .unwrap();
        let engine = VariableElimination::new(&model);
        let marginal = engine.query("Flu", &BTreeMap::new()).unwrap();
        assert!((marginal.present() - 0.5).abs() < 1e-12);
    }

    /// Doenças desconectadas não afetam a consulta
    #[test]
    fn disconnected_diseases_do_not_interfere() {
        let model = Model::new(
            vec![
                SymptomNode::new("Fever"),
                SymptomNode::new("Sneezing"),
                SymptomNode::new("Cough"),
            ],
            vec![
                disease("Flu", &[("Fever", 0.8), ("Cough", 0.7)]),
                disease("Cold", &[("Sneezing", 0.9), ("Cough", 0.4)]),
            ],
        )
        .unwrap();
        let engine = VariableElimination::new(&model);
        let marginal = engine.query("Flu", &evidence(&["Fever", "Sneezing"])).unwrap();
        assert!((marginal.present() - 0.4).abs() < 1e-12);
        let cold = engine.query("Cold", &evidence(&["Fever", "Sneezing"])).unwrap();
        // 0.5·0.9·0.4 + 0.5·0.9·0.6 = 0.45
        assert!((cold.present() - 0.45).abs() < 1e-12);
    }

    /// Observar um sintoma como ausente usa a linha complementar
    #[test]
    fn absent_observation_uses_complement() {
        let model = flu_model();
        let engine = VariableElimination::new(&model);
        let mut obs = evidence(&["Fever", "Cough"]);
        obs.insert("Headache".into(), 0);
        let marginal = engine.query("Flu", &obs).unwrap();
        assert!((marginal.present() - 0.8 * 0.7 * 0.4).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_queries() {
        let model = flu_model();
        let engine = VariableElimination::new(&model);
        assert!(matches!(
            engine.query("Malaria", &BTreeMap::new()),
            Err(InferenceError::UnknownVariable { .. })
        ));
        assert!(matches!(
            engine.query("Fever", &evidence(&["Fever"])),
            Err(InferenceError::QueryIsEvidence { .. })
        ));
        assert!(matches!(
            engine.query("Flu", &evidence(&["Rash"])),
            Err(InferenceError::UnknownEvidence { .. })
        ));
        let mut bad = BTreeMap::new();
        bad.insert("Fever".to_string(), 2);
        assert!(matches!(
            engine.query("Flu", &bad),
            Err(InferenceError::InvalidState { state: 2, .. })
        ));
    }

    /// Evidência impossível gera massa zero, reportada como erro
    #[test]
    fn impossible_evidence_is_degenerate() {
        let cpt = Cpt::from_rows(
            "Flu",
            vec!["Fever".into()],
            vec![[1.0, 0.0], [1.0, 0.0]],
        );
        let model = Model::new(
            vec![SymptomNode::new("Fever"), SymptomNode::new("Rash")],
            vec![
                DiseaseNode {
                    name: "Flu".into(),
                    parents: vec!["Fever".into()],
                    cpt,
                },
                disease("Measles", &[("Rash", 0.9)]),
            ],
        )
        .unwrap();
        let engine = VariableElimination::new(&model);
        let mut obs = evidence(&["Fever"]);
        obs.insert("Flu".into(), 1);
        assert!(matches!(
            engine.query("Measles", &obs),
            Err(InferenceError::Degenerate { .. })
        ));
    }
}

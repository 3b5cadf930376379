//! # Diagnóstico — Da Evidência ao Resultado Posterior
//!
//! Ponto de entrada da biblioteca: [`infer()`] recebe a KB e a evidência e
//! devolve `doença → P(doença = 1 | evidência)`, arredondado em duas casas.
//!
//! ## Fluxo
//!
//! ```text
//! infer(kb, evidência)
//!   ├── ModelBuilder::build          → KnowledgeBaseError / ModelConstructionError abortam
//!   ├── query_diseases (rayon)       → Result<f64, InferenceError> por doença
//!   └── fronteira do resultado
//!       ├── Ok(p)  → round(p, 2)
//!       └── Err(_) → 0.0 (só para a doença afetada)
//! ```
//!
//! Doenças sem nenhum sintoma observado não entram no modelo e portanto não
//! aparecem no resultado (nem como `0.0`).

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{EvidenceSet, KnowledgeBase};
use crate::error::{DiagnosisError, InferenceError};
use crate::inference::VariableElimination;
use crate::model::{Model, ModelBuilder};

/// Casas decimais dos posteriores reportados.
pub const POSTERIOR_DECIMALS: usize = 2;

/// Resultado de uma consulta: a evidência usada e os posteriores por doença.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub evidence: EvidenceSet,
    pub posteriors: BTreeMap<String, f64>,
}

impl Diagnosis {
    /// Doenças ordenadas por probabilidade decrescente (empate → nome).
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .posteriors
            .iter()
            .map(|(name, p)| (name.as_str(), *p))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}

/// `infer(knowledge_base, evidence_set) -> doença → probabilidade`.
pub fn infer(kb: &KnowledgeBase, evidence: &EvidenceSet) -> Result<BTreeMap<String, f64>, DiagnosisError> {
    diagnose(kb, evidence).map(|diagnosis| diagnosis.posteriors)
}

/// Igual a [`infer()`], mas devolve o [`Diagnosis`] completo para o sink.
pub fn diagnose(kb: &KnowledgeBase, evidence: &EvidenceSet) -> Result<Diagnosis, DiagnosisError> {
    let model = ModelBuilder::new(kb).build(evidence)?;

    let posteriors = query_diseases(&model, evidence)
        .into_iter()
        .map(|(disease, outcome)| {
            let p = match outcome {
                Ok(p) => round_posterior(p),
                Err(e) => {
                    tracing::warn!(disease = %disease, error = %e, "Inferência falhou, posterior 0.0");
                    0.0
                }
            };
            (disease, p)
        })
        .collect::<BTreeMap<_, _>>();

    tracing::info!(
        evidence = evidence.len(),
        diseases = posteriors.len(),
        "Diagnóstico concluído"
    );

    Ok(Diagnosis {
        evidence: evidence.clone(),
        posteriors,
    })
}

/// Consulta cada doença do modelo de forma independente.
///
/// Devolve o resultado bruto (sem arredondar) ou o erro de cada doença.
/// Doenças cujo nome também está na evidência são puladas. Sintomas de
/// evidência que não são nós do modelo ficam fora da atribuição.
pub fn query_diseases(model: &Model, evidence: &EvidenceSet) -> BTreeMap<String, Result<f64, InferenceError>> {
    let engine = VariableElimination::new(model);
    let assignment: BTreeMap<String, u8> = evidence
        .as_assignment()
        .into_iter()
        .filter(|(name, _)| model.contains(name))
        .collect();

    model
        .diseases()
        .par_iter()
        .filter(|node| !evidence.contains(&node.name))
        .map(|node| {
            let outcome = engine
                .query(&node.name, &assignment)
                .map(|marginal| marginal.present());
            (node.name.clone(), outcome)
        })
        .collect()
}

/// Arredonda para [`POSTERIOR_DECIMALS`] casas.
///
/// Arredonda o valor binário exato (empate exato → par), sem escalar antes:
/// `0.85 × 0.7` vale `0.59499…` e vira `0.59`, não `0.6`.
pub fn round_posterior(p: f64) -> f64 {
    format!("{:.*}", POSTERIOR_DECIMALS, p).parse().unwrap_or(p)
}

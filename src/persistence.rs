//! # Persistência — KB em JSON e Registro de Diagnósticos
//!
//! Dois lados da fronteira com o disco:
//!
//! - **Entrada**: [`load_knowledge_base()`] lê uma [`KnowledgeBase`] em JSON
//! - **Saída**: o [`ResultSink`] recebe cada [`Diagnosis`] concluído; o
//!   [`JsonFileSink`] acumula os registros num array JSON
//!
//! ## Formato do Registro
//!
//! ```json
//! {
//!   "id": "6f1c…",
//!   "recorded_at": "2026-10-18T12:00:00Z",
//!   "evidence": ["Fever", "Cough"],
//!   "posteriors": { "Flu": 0.56 },
//!   "indications": [
//!     { "symptom": "Fever", "disease": "Flu", "probability": 0.56 }
//!   ]
//! }
//! ```
//!
//! `indications` liga cada sintoma observado a cada doença com posterior
//! maior que zero, com a probabilidade da doença.
//!
//! ## ⚠️ Atomicidade
//!
//! A escrita reescreve o arquivo inteiro e **não é atômica**.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::KnowledgeBase;
use crate::diagnosis::Diagnosis;

/// Caminho padrão do registro de diagnósticos.
pub const DIAGNOSES_PATH: &str = "data/diagnoses.json";

/// Relação "sintoma possivelmente indica doença".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indication {
    pub symptom: String,
    pub disease: String,
    pub probability: f64,
}

/// Um diagnóstico como fica gravado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub evidence: Vec<String>,
    pub posteriors: BTreeMap<String, f64>,
    pub indications: Vec<Indication>,
}

impl DiagnosisRecord {
    pub fn from_diagnosis(diagnosis: &Diagnosis) -> Self {
        let indications = diagnosis
            .posteriors
            .iter()
            .filter(|(_, p)| **p > 0.0)
            .flat_map(|(disease, p)| {
                diagnosis.evidence.iter().map(move |symptom| Indication {
                    symptom: symptom.to_string(),
                    disease: disease.clone(),
                    probability: *p,
                })
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            evidence: diagnosis.evidence.as_slice().to_vec(),
            posteriors: diagnosis.posteriors.clone(),
            indications,
        }
    }
}

/// Destino dos diagnósticos concluídos.
pub trait ResultSink {
    fn record(&mut self, diagnosis: &Diagnosis) -> Result<()>;
}

/// Sink que acumula registros num array JSON pretty-printed.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê todos os registros gravados (vazio se o arquivo não existe).
    pub fn records(&self) -> Result<Vec<DiagnosisRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Falha ao ler {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Falha ao desserializar {}", self.path.display()))
    }
}

impl ResultSink for JsonFileSink {
    fn record(&mut self, diagnosis: &Diagnosis) -> Result<()> {
        let mut records = self.records()?;
        let record = DiagnosisRecord::from_diagnosis(diagnosis);
        tracing::debug!(id = %record.id, indications = record.indications.len(), "Registrando diagnóstico");
        records.push(record);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&records)
            .context("Falha ao serializar diagnósticos")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Falha ao escrever {}", self.path.display()))?;
        Ok(())
    }
}

/// Carrega uma KnowledgeBase de um arquivo JSON.
///
/// Não valida as entradas; isso acontece na construção do modelo.
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let kb: KnowledgeBase = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    tracing::info!(path = %path.display(), diseases = kb.disease_count(), "KB carregada do disco");
    Ok(kb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EvidenceSet;

    fn sample() -> Diagnosis {
        let mut posteriors = BTreeMap::new();
        posteriors.insert("Flu".to_string(), 0.56);
        posteriors.insert("Cold".to_string(), 0.0);
        Diagnosis {
            evidence: EvidenceSet::new(["Fever", "Cough"]),
            posteriors,
        }
    }

    /// Só doenças com posterior > 0 geram indicações
    #[test]
    fn record_links_symptoms_to_positive_diseases() {
        let record = DiagnosisRecord::from_diagnosis(&sample());
        assert_eq!(record.indications.len(), 2);
        assert!(record.indications.iter().all(|i| i.disease == "Flu"));
        assert_eq!(record.posteriors.len(), 2);
    }

    #[test]
    fn sink_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("nested/diagnoses.json"));
        sink.record(&sample()).unwrap();
        sink.record(&sample()).unwrap();
        let records = sink.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
        assert_eq!(records[0].evidence, vec!["Fever", "Cough"]);
    }

    #[test]
    fn loads_knowledge_base_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");
        std::fs::write(&path, serde_json::to_string(&KnowledgeBase::builtin()).unwrap()).unwrap();
        let kb = load_knowledge_base(&path).unwrap();
        assert_eq!(kb, KnowledgeBase::builtin());
    }

    #[test]
    fn missing_knowledge_base_is_an_error() {
        assert!(load_knowledge_base(Path::new("/nonexistent/kb.json")).is_err());
    }
}

//! # Diagnóstico Bayesiano
//!
//! Inferência de posteriores de doenças a partir de sintomas observados,
//! sobre uma rede bayesiana bipartida construída por consulta.
//!
//! ## Arquitetura
//!
//! ```text
//!  knowledge.txt ──► ingest::KnowledgeLoader ──┐
//!  kb.json ───────► persistence ───────────────┤
//!                                              ▼
//!                                        KnowledgeBase
//!                                              │
//!  entrada do usuário ─► ingest::InputResolver ─► EvidenceSet
//!                                              │
//!                                              ▼
//!                        model::ModelBuilder (CPTs noisy-AND, check_model)
//!                                              │
//!                                              ▼
//!                        inference::VariableElimination (uma consulta por doença)
//!                                              │
//!                                              ▼
//!                        diagnosis::Diagnosis ─► persistence::ResultSink
//! ```
//!
//! ## Camadas
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`core`] | KnowledgeBase e EvidenceSet |
//! | [`model`] | CPTs e construção/validação da rede |
//! | [`inference`] | Fatores e eliminação de variáveis |
//! | [`diagnosis`] | `infer()`: fronteira do resultado |
//! | [`ingest`] | Texto livre → valores do núcleo |
//! | [`persistence`] | KB em JSON e registro de diagnósticos |
//! | [`error`] | Taxonomia de erros |
//! | [`config`] | Linha de comando |
//!
//! ## Exemplo
//!
//! ```
//! use diagnostico_bayesiano::{infer, EvidenceSet, KnowledgeBase};
//!
//! let kb = KnowledgeBase::builtin();
//! let posteriors = infer(&kb, &EvidenceSet::new(["Wheezing"])).unwrap();
//! assert_eq!(posteriors.get("Asthma"), Some(&0.9));
//! assert_eq!(posteriors.len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod diagnosis;
pub mod error;
pub mod inference;
pub mod ingest;
pub mod model;
pub mod persistence;

pub use crate::core::{DiseaseEntry, EvidenceSet, KnowledgeBase};
pub use crate::diagnosis::{diagnose, infer, Diagnosis};
pub use crate::error::{DiagnosisError, InferenceError, KnowledgeBaseError, ModelConstructionError};

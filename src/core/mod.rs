//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Os dois valores que entram em toda consulta:
//!
//! - [`KnowledgeBase`] — doenças, seus sintomas e forças indicadoras
//! - [`EvidenceSet`] — sintomas observados como presentes
//!
//! ```text
//! KnowledgeBase ──┐
//!                 ├──▶ Model ──▶ VariableElimination ──▶ posterior por doença
//! EvidenceSet ────┘
//! ```

/// Sub-módulo com [`KnowledgeBase`] e [`DiseaseEntry`].
pub mod knowledge_base;

/// Sub-módulo com [`EvidenceSet`].
pub mod evidence;

pub use evidence::EvidenceSet;
pub use knowledge_base::{DiseaseEntry, KnowledgeBase};

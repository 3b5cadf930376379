//! # Módulo Inference — Inferência Exata por Eliminação de Variáveis
//!
//! Calcula `P(doença = 1 | sintomas observados)` sobre um
//! [`Model`](crate::model::Model) já validado.
//!
//! ## Exemplo
//!
//! ```text
//! Evidência: Fever=1, Cough=1, Headache=1
//! CPT de Flu, linha 111: 0.8 × 0.7 × 0.6 = 0.336
//! P(Flu=1 | evidência) = 0.336
//! ```
//!
//! Veja [`VariableElimination`] para o algoritmo.

/// Sub-módulo dos fatores e suas operações.
pub mod factor;

/// Sub-módulo do motor de eliminação de variáveis.
pub mod elimination;

pub use elimination::{Marginal, VariableElimination};
pub use factor::Factor;

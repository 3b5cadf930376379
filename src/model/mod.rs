//! # Módulo Model — Da Tabela de Conhecimento à Rede Bayesiana
//!
//! | Sub-módulo | Responsabilidade |
//! |------------|------------------|
//! | [`cpt`] | CPTs de conjunção ruidosa e prior uniforme dos sintomas |
//! | [`network`] | Nós, arestas, [`ModelBuilder`] e `check_model` |

/// Sub-módulo das tabelas de probabilidade condicional.
pub mod cpt;

/// Sub-módulo da rede bipartida sintoma → doença.
pub mod network;

pub use cpt::Cpt;
pub use network::{DiseaseNode, Model, ModelBuilder, SymptomNode};

//! # Erros — Taxonomia de Falhas do Motor de Diagnóstico
//!
//! Cada camada do sistema tem seu próprio tipo de erro, derivado com
//! `thiserror`:
//!
//! | Tipo | Camada | Política |
//! |------|--------|----------|
//! | [`KnowledgeBaseError`] | Base de conhecimento | Aborta a consulta inteira |
//! | [`ModelConstructionError`] | Construção do modelo | Aborta a consulta inteira |
//! | [`InferenceError`] | Eliminação de variáveis | Degrada para `0.0` **só** na doença afetada |
//!
//! [`DiagnosisError`] envolve apenas os dois primeiros: uma falha numérica
//! numa doença não impede o relatório das demais.

use thiserror::Error;

/// Entrada malformada na base de conhecimento.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeBaseError {
    #[error("doença sem nome na base de conhecimento")]
    EmptyDiseaseName,

    #[error("doença '{disease}': sintoma '{symptom}' sem força indicadora")]
    MissingStrength { disease: String, symptom: String },

    #[error("doença '{disease}': força de '{symptom}' fora de (0, 1): {value}")]
    StrengthOutOfRange {
        disease: String,
        symptom: String,
        value: f64,
    },

    #[error("doença '{disease}': sintoma '{symptom}' listado mais de uma vez")]
    DuplicateSymptom { disease: String, symptom: String },
}

/// Falha estrutural ou numérica na validação do modelo (`check_model`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelConstructionError {
    #[error("nó '{node}' declarado mais de uma vez")]
    DuplicateNode { node: String },

    #[error("'{node}' aparece como sintoma e como doença ao mesmo tempo")]
    NameCollision { node: String },

    #[error("aresta inválida '{parent}' → '{child}': só são permitidas arestas sintoma → doença")]
    InvalidEdge { parent: String, child: String },

    #[error("nó '{node}' referenciado por uma aresta não possui CPT")]
    MissingCpt { node: String },

    #[error("CPT de '{node}' pertence à variável '{found}'")]
    CptVariableMismatch { node: String, found: String },

    #[error("CPT de '{node}' tem evidências {cpt:?}, mas os pais são {parents:?}")]
    ParentMismatch {
        node: String,
        parents: Vec<String>,
        cpt: Vec<String>,
    },

    #[error("CPT de '{node}' tem {actual} linhas, esperado {expected}")]
    RowCountMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },

    #[error("CPT de '{node}', linha {row}: probabilidades somam {sum}")]
    RowNotNormalized { node: String, row: usize, sum: f64 },

    #[error("CPT de '{node}', linha {row}: probabilidade inválida {value}")]
    InvalidProbability { node: String, row: usize, value: f64 },

    #[error("doença '{node}' tem {count} pais; o limite é {limit}")]
    TooManyParents {
        node: String,
        count: usize,
        limit: usize,
    },
}

/// Falha de inferência para **uma** variável consultada.
///
/// Nunca atravessa a fronteira de [`crate::diagnosis::infer`]: lá ela vira
/// posterior `0.0` para a doença afetada.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("variável '{variable}' não existe no modelo")]
    UnknownVariable { variable: String },

    #[error("evidência '{variable}' não existe no modelo")]
    UnknownEvidence { variable: String },

    #[error("variável '{variable}' é evidência e não pode ser consultada")]
    QueryIsEvidence { variable: String },

    #[error("estado {state} inválido para '{variable}' (variáveis são binárias)")]
    InvalidState { variable: String, state: u8 },

    #[error("fator com {actual} valores, esperado {expected}")]
    FactorShape { expected: usize, actual: usize },

    #[error("escopo de fator grande demais: {size} variáveis")]
    ScopeTooLarge { size: usize },

    #[error("nenhuma ordem de eliminação isola '{variable}' (escopo final {scope:?})")]
    NoEliminationOrder { variable: String, scope: Vec<String> },

    #[error("normalização degenerada para '{variable}': soma {total}")]
    Degenerate { variable: String, total: f64 },
}

/// Erro de topo de uma consulta de diagnóstico.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error(transparent)]
    Model(#[from] ModelConstructionError),
}

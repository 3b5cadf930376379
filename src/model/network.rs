//! # Model — Rede Bayesiana Bipartida Sintoma → Doença
//!
//! O [`Model`] é um DAG de duas camadas: nós de sintoma (sem pais, prior
//! uniforme) apontando para nós de doença (CPT de conjunção ruidosa).
//!
//! ## Construção por Consulta
//!
//! O [`ModelBuilder`] monta um modelo novo a cada consulta:
//!
//! ```text
//! 1. Seleção de arestas
//!    └── para cada doença, mantém só os sintomas presentes na evidência
//!
//! 2. Montagem dos nós
//!    ├── um SymptomNode por sintoma de evidência usado em alguma aresta
//!    └── um DiseaseNode por doença com ≥ 1 pai mantido
//!
//! 3. check_model
//!    ├── arestas só sintoma → doença (aciclicidade)
//!    ├── exatamente uma CPT por nó, com evidências == pais
//!    ├── 2^(#pais) linhas por CPT
//!    └── cada linha soma 1 (tolerância 1e-6)
//! ```
//!
//! Consequência da etapa 1: o conjunto de nós de sintoma é sempre um
//! subconjunto da evidência. Sintomas de evidência desconhecidos pela KB
//! simplesmente não viram nós.

use std::collections::BTreeSet;

use crate::core::{EvidenceSet, KnowledgeBase};
use crate::error::{DiagnosisError, KnowledgeBaseError, ModelConstructionError};

use super::cpt::Cpt;

/// Tolerância para a soma das linhas de uma CPT.
pub const ROW_TOLERANCE: f64 = 1e-6;

/// Limite de pais por doença (a CPT cresce como `2^k`).
pub const MAX_PARENTS: usize = 20;

/// Nó de sintoma: variável binária sem pais.
#[derive(Clone, Debug, PartialEq)]
pub struct SymptomNode {
    pub name: String,
    pub cpt: Cpt,
}

impl SymptomNode {
    /// Sintoma com o prior uniforme.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let cpt = Cpt::uniform_prior(name.clone());
        Self { name, cpt }
    }
}

/// Nó de doença: variável binária cujos pais são sintomas.
#[derive(Clone, Debug, PartialEq)]
pub struct DiseaseNode {
    pub name: String,
    pub parents: Vec<String>,
    pub cpt: Cpt,
}

/// Rede bayesiana validada.
///
/// Só é obtida via [`Model::new`] ou [`ModelBuilder::build`], ambos
/// passando por [`check_model`](Model::check_model).
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    symptoms: Vec<SymptomNode>,
    diseases: Vec<DiseaseNode>,
    edges: Vec<(String, String)>,
}

impl Model {
    /// Monta e valida um modelo a partir dos nós.
    ///
    /// As arestas são derivadas dos pais de cada doença. Aceita sintomas
    /// que não serão observados, o que permite consultas com observação
    /// parcial.
    pub fn new(symptoms: Vec<SymptomNode>, diseases: Vec<DiseaseNode>) -> Result<Self, ModelConstructionError> {
        let edges = diseases
            .iter()
            .flat_map(|d| d.parents.iter().map(move |p| (p.clone(), d.name.clone())))
            .collect();
        let model = Self {
            symptoms,
            diseases,
            edges,
        };
        model.check_model()?;
        Ok(model)
    }

    /// Verifica as invariantes estruturais e numéricas do modelo.
    pub fn check_model(&self) -> Result<(), ModelConstructionError> {
        let mut symptom_names = BTreeSet::new();
        for node in &self.symptoms {
            if !symptom_names.insert(node.name.as_str()) {
                return Err(ModelConstructionError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
            check_cpt(&node.name, &[], &node.cpt)?;
        }

        let mut disease_names = BTreeSet::new();
        for node in &self.diseases {
            if symptom_names.contains(node.name.as_str()) {
                return Err(ModelConstructionError::NameCollision {
                    node: node.name.clone(),
                });
            }
            if !disease_names.insert(node.name.as_str()) {
                return Err(ModelConstructionError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
        }

        for node in &self.diseases {
            if node.parents.len() > MAX_PARENTS {
                return Err(ModelConstructionError::TooManyParents {
                    node: node.name.clone(),
                    count: node.parents.len(),
                    limit: MAX_PARENTS,
                });
            }
            let mut seen = BTreeSet::new();
            for parent in &node.parents {
                // doença → doença fecharia a porta para ciclos
                if disease_names.contains(parent.as_str()) {
                    return Err(ModelConstructionError::InvalidEdge {
                        parent: parent.clone(),
                        child: node.name.clone(),
                    });
                }
                if !symptom_names.contains(parent.as_str()) {
                    return Err(ModelConstructionError::MissingCpt {
                        node: parent.clone(),
                    });
                }
                if !seen.insert(parent.as_str()) {
                    return Err(ModelConstructionError::DuplicateNode {
                        node: parent.clone(),
                    });
                }
            }
            check_cpt(&node.name, &node.parents, &node.cpt)?;
        }

        Ok(())
    }

    pub fn symptoms(&self) -> &[SymptomNode] {
        &self.symptoms
    }

    pub fn diseases(&self) -> &[DiseaseNode] {
        &self.diseases
    }

    /// Arestas `(sintoma, doença)`.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    pub fn disease(&self, name: &str) -> Option<&DiseaseNode> {
        self.diseases.iter().find(|d| d.name == name)
    }

    /// `true` se existe um nó (sintoma ou doença) com esse nome.
    pub fn contains(&self, name: &str) -> bool {
        self.symptoms.iter().any(|s| s.name == name) || self.disease(name).is_some()
    }

    /// Todas as CPTs: sintomas primeiro, depois doenças.
    pub fn cpts(&self) -> impl Iterator<Item = &Cpt> {
        self.symptoms
            .iter()
            .map(|s| &s.cpt)
            .chain(self.diseases.iter().map(|d| &d.cpt))
    }
}

/// Confere uma CPT contra o nó dono e seus pais.
fn check_cpt(node: &str, parents: &[String], cpt: &Cpt) -> Result<(), ModelConstructionError> {
    if cpt.variable() != node {
        return Err(ModelConstructionError::CptVariableMismatch {
            node: node.to_string(),
            found: cpt.variable().to_string(),
        });
    }
    if cpt.evidence() != parents {
        return Err(ModelConstructionError::ParentMismatch {
            node: node.to_string(),
            parents: parents.to_vec(),
            cpt: cpt.evidence().to_vec(),
        });
    }

    let expected = 1usize << parents.len();
    if cpt.row_count() != expected {
        return Err(ModelConstructionError::RowCountMismatch {
            node: node.to_string(),
            expected,
            actual: cpt.row_count(),
        });
    }

    for (row, values) in cpt.rows().iter().enumerate() {
        if let Some(value) = values
            .iter()
            .copied()
            .find(|v| !v.is_finite() || *v < 0.0 || *v > 1.0)
        {
            return Err(ModelConstructionError::InvalidProbability {
                node: node.to_string(),
                row,
                value,
            });
        }
        let sum = values[0] + values[1];
        if (sum - 1.0).abs() > ROW_TOLERANCE {
            return Err(ModelConstructionError::RowNotNormalized {
                node: node.to_string(),
                row,
                sum,
            });
        }
    }
    Ok(())
}

/// Constrói o [`Model`] de uma consulta a partir da KB e da evidência.
pub struct ModelBuilder<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Monta o modelo para `evidence`.
    ///
    /// Valida a KB inteira antes de montar qualquer nó: uma entrada
    /// malformada aborta a construção sem modelo parcial. Reconstruir com a
    /// mesma KB e a mesma evidência produz sempre o mesmo modelo.
    pub fn build(&self, evidence: &EvidenceSet) -> Result<Model, DiagnosisError> {
        self.kb.validate()?;

        let mut symptoms: Vec<SymptomNode> = Vec::new();
        let mut diseases = Vec::new();

        for (disease, entry) in self.kb.diseases() {
            let relevant = entry
                .symptoms
                .iter()
                .filter(|s| evidence.contains(s))
                .map(|s| {
                    entry
                        .strength(s)
                        .map(|p| (s.clone(), p))
                        .ok_or_else(|| KnowledgeBaseError::MissingStrength {
                            disease: disease.to_string(),
                            symptom: s.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if relevant.len() > MAX_PARENTS {
                return Err(ModelConstructionError::TooManyParents {
                    node: disease.to_string(),
                    count: relevant.len(),
                    limit: MAX_PARENTS,
                }
                .into());
            }

            let Some(cpt) = Cpt::noisy_conjunction(disease, &relevant) else {
                tracing::debug!(disease, "Doença sem sintomas observados, fora do modelo");
                continue;
            };

            for (symptom, _) in &relevant {
                if !symptoms.iter().any(|n| &n.name == symptom) {
                    symptoms.push(SymptomNode::new(symptom.clone()));
                }
            }

            tracing::debug!(disease, parents = relevant.len(), rows = cpt.row_count(), "CPT montada");
            diseases.push(DiseaseNode {
                name: disease.to_string(),
                parents: relevant.into_iter().map(|(name, _)| name).collect(),
                cpt,
            });
        }

        for symptom in evidence.iter() {
            if !self.kb.contains_symptom(symptom) {
                tracing::warn!(symptom, "Sintoma fora da base de conhecimento, ignorado");
            }
        }

        let model = Model::new(symptoms, diseases)?;
        tracing::debug!(
            symptoms = model.symptoms().len(),
            diseases = model.diseases().len(),
            edges = model.edges().len(),
            "Modelo construído"
        );
        Ok(model)
    }
}

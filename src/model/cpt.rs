//! # CPT — Tabelas de Probabilidade Condicional
//!
//! Uma [`Cpt`] guarda `P(variável | atribuição dos pais)` para todas as
//! `2^k` atribuições binárias dos `k` pais.
//!
//! ## Ordem das Linhas
//!
//! A linha `i` corresponde à atribuição cujos bits, do **mais significativo**
//! para o menos, são os estados dos pais na ordem da lista de evidências:
//!
//! ```text
//! pais = [Fever, Cough]
//!
//! linha 0 → Fever=0, Cough=0
//! linha 1 → Fever=0, Cough=1
//! linha 2 → Fever=1, Cough=0
//! linha 3 → Fever=1, Cough=1
//! ```
//!
//! Cada linha é `[P(ausente), P(presente)]`. Consultas por linha
//! dependem dessa ordem, então ela é parte do contrato.
//!
//! ## Modelo de Conjunção Ruidosa
//!
//! Para uma doença com sintomas-pai `s₁..s_k` e forças `p₁..p_k`:
//!
//! ```text
//! P(doença=1 | a) = Π_i ( p_i  se a_i = 1
//!                         1-p_i se a_i = 0 )
//! P(doença=0 | a) = 1 - P(doença=1 | a)
//! ```
//!
//! Cada sintoma é tratado como indicador independente da doença. É uma
//! hipótese de modelagem, não uma estimativa de frequência populacional.

/// Prior não-informativo dos nós de sintoma: `P(1) = P(0) = 0.5`.
pub const SYMPTOM_PRIOR: f64 = 0.5;

/// Tabela de probabilidade condicional de uma variável binária.
#[derive(Clone, Debug, PartialEq)]
pub struct Cpt {
    variable: String,
    evidence: Vec<String>,
    rows: Vec<[f64; 2]>,
}

impl Cpt {
    /// Monta uma CPT a partir de linhas já calculadas.
    ///
    /// Não valida nada; a consistência é verificada por
    /// [`Model::check_model`](crate::model::Model::check_model).
    pub fn from_rows(variable: impl Into<String>, evidence: Vec<String>, rows: Vec<[f64; 2]>) -> Self {
        Self {
            variable: variable.into(),
            evidence,
            rows,
        }
    }

    /// CPT sem pais com o prior uniforme dos sintomas.
    pub fn uniform_prior(variable: impl Into<String>) -> Self {
        Self::from_rows(variable, Vec::new(), vec![[SYMPTOM_PRIOR, 1.0 - SYMPTOM_PRIOR]])
    }

    /// Constrói a CPT de conjunção ruidosa de uma doença.
    ///
    /// `parents` são pares `(sintoma, força)` já na ordem final. Com `k = 0`
    /// não há CPT: a doença fica fora do modelo.
    pub fn noisy_conjunction(variable: impl Into<String>, parents: &[(String, f64)]) -> Option<Self> {
        if parents.is_empty() {
            return None;
        }

        let k = parents.len();
        let rows = (0..1usize << k)
            .map(|assignment| {
                let present = parents
                    .iter()
                    .enumerate()
                    .map(|(i, (_, p))| if bit(assignment, i, k) == 1 { *p } else { 1.0 - p })
                    .product::<f64>();
                [1.0 - present, present]
            })
            .collect();

        let evidence = parents.iter().map(|(name, _)| name.clone()).collect();
        Some(Self::from_rows(variable, evidence, rows))
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Pais da variável, na ordem dos bits das linhas.
    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    pub fn rows(&self) -> &[[f64; 2]] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Bit do pai `i` (de `k`) na atribuição `assignment`, MSB primeiro.
fn bit(assignment: usize, i: usize, k: usize) -> u8 {
    ((assignment >> (k - 1 - i)) & 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flu_parents() -> Vec<(String, f64)> {
        vec![
            ("Fever".to_string(), 0.8),
            ("Cough".to_string(), 0.7),
            ("Headache".to_string(), 0.6),
        ]
    }

    /// Sem pais relevantes não há CPT
    #[test]
    fn no_parents_no_cpt() {
        assert!(Cpt::noisy_conjunction("Flu", &[]).is_none());
    }

    #[test]
    fn has_one_row_per_assignment() {
        let cpt = Cpt::noisy_conjunction("Flu", &flu_parents()).unwrap();
        assert_eq!(cpt.row_count(), 8);
        assert_eq!(cpt.evidence(), ["Fever", "Cough", "Headache"]);
    }

    /// O bit mais significativo corresponde ao primeiro pai
    #[test]
    fn rows_follow_msb_first_order() {
        let cpt = Cpt::noisy_conjunction("Flu", &flu_parents()).unwrap();
        let rows = cpt.rows();
        // 000 → (1-0.8)(1-0.7)(1-0.6)
        assert!((rows[0][1] - 0.2 * 0.3 * 0.4).abs() < 1e-12);
        // 100 → Fever presente apenas
        assert!((rows[4][1] - 0.8 * 0.3 * 0.4).abs() < 1e-12);
        // 001 → Headache presente apenas
        assert!((rows[1][1] - 0.2 * 0.3 * 0.6).abs() < 1e-12);
        // 111 → todos presentes
        assert!((rows[7][1] - 0.8 * 0.7 * 0.6).abs() < 1e-12);
    }

    #[test]
    fn every_row_sums_to_one() {
        let cpt = Cpt::noisy_conjunction("Flu", &flu_parents()).unwrap();
        for row in cpt.rows() {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bit_reads_msb_first() {
        assert_eq!(bit(0b100, 0, 3), 1);
        assert_eq!(bit(0b100, 2, 3), 0);
        assert_eq!(bit(0b001, 2, 3), 1);
    }

    #[test]
    fn uniform_prior_is_half_half() {
        let cpt = Cpt::uniform_prior("Fever");
        assert_eq!(cpt.rows(), [[0.5, 0.5]]);
        assert!(cpt.evidence().is_empty());
    }
}

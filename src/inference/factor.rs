//! # Factor — Tabelas sobre Variáveis Binárias
//!
//! Um [`Factor`] é uma função `φ(x₁..x_n) ≥ 0` tabelada sobre `n` variáveis
//! binárias. O índice de um valor é a atribuição lida com `x₁` no bit mais
//! significativo, a mesma convenção das [`Cpt`]s.
//!
//! As três operações da eliminação de variáveis:
//!
//! | Operação | Efeito |
//! |----------|--------|
//! | [`reduce`](Factor::reduce) | fixa uma variável observada e a remove do escopo |
//! | [`product`](Factor::product) | produto ponto a ponto sobre a união dos escopos |
//! | [`sum_out`](Factor::sum_out) | marginaliza uma variável somando seus dois estados |

use crate::error::InferenceError;
use crate::model::Cpt;

/// Maior escopo aceito num fator (tabelas de `2^24` valores).
pub const MAX_SCOPE: usize = 24;

#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    variables: Vec<String>,
    values: Vec<f64>,
}

impl Factor {
    pub fn new(variables: Vec<String>, values: Vec<f64>) -> Result<Self, InferenceError> {
        if variables.len() > MAX_SCOPE {
            return Err(InferenceError::ScopeTooLarge {
                size: variables.len(),
            });
        }
        let expected = 1usize << variables.len();
        if values.len() != expected {
            return Err(InferenceError::FactorShape {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { variables, values })
    }

    /// Fator constante `1` sem variáveis.
    pub fn unit() -> Self {
        Self {
            variables: Vec::new(),
            values: vec![1.0],
        }
    }

    /// Converte uma CPT no fator `φ(pais..., variável)`.
    ///
    /// A variável fica no bit menos significativo, então o índice é
    /// `(linha << 1) | estado`. Uma CPT com número de linhas errado vira
    /// [`InferenceError::FactorShape`].
    pub fn from_cpt(cpt: &Cpt) -> Result<Self, InferenceError> {
        let mut variables = cpt.evidence().to_vec();
        variables.push(cpt.variable().to_string());
        let values = cpt.rows().iter().flat_map(|row| row.iter().copied()).collect();
        Self::new(variables, values)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.variables.iter().any(|v| v == variable)
    }

    /// Fixa `variable = state` e remove a variável do escopo.
    ///
    /// Se a variável não está no escopo, devolve uma cópia.
    pub fn reduce(&self, variable: &str, state: u8) -> Self {
        let Some(position) = self.position(variable) else {
            return self.clone();
        };
        let shift = self.variables.len() - 1 - position;
        let values = self
            .values
            .iter()
            .enumerate()
            .filter(|(index, _)| ((index >> shift) & 1) as u8 == state)
            .map(|(_, value)| *value)
            .collect();
        let mut variables = self.variables.clone();
        variables.remove(position);
        Self { variables, values }
    }

    /// Produto ponto a ponto.
    ///
    /// O escopo resultante é o escopo de `self` seguido das variáveis de
    /// `other` que ainda não apareciam.
    pub fn product(&self, other: &Factor) -> Result<Self, InferenceError> {
        let mut variables = self.variables.clone();
        let self_positions: Vec<usize> = (0..self.variables.len()).collect();
        let other_positions: Vec<usize> = other
            .variables
            .iter()
            .map(|v| match variables.iter().position(|x| x == v) {
                Some(position) => position,
                None => {
                    variables.push(v.clone());
                    variables.len() - 1
                }
            })
            .collect();

        let n = variables.len();
        if n > MAX_SCOPE {
            return Err(InferenceError::ScopeTooLarge { size: n });
        }

        let project = |index: usize, positions: &[usize]| {
            positions
                .iter()
                .fold(0usize, |acc, p| (acc << 1) | ((index >> (n - 1 - p)) & 1))
        };

        let values = (0..1usize << n)
            .map(|index| {
                self.values[project(index, &self_positions)]
                    * other.values[project(index, &other_positions)]
            })
            .collect();

        Ok(Self { variables, values })
    }

    /// Soma os dois estados de `variable`, removendo-a do escopo.
    pub fn sum_out(&self, variable: &str) -> Self {
        let Some(position) = self.position(variable) else {
            return self.clone();
        };
        let shift = self.variables.len() - 1 - position;
        let low_mask = (1usize << shift) - 1;
        let mut values = vec![0.0; self.values.len() / 2];
        for (index, value) in self.values.iter().enumerate() {
            let reduced = ((index >> (shift + 1)) << shift) | (index & low_mask);
            values[reduced] += value;
        }
        let mut variables = self.variables.clone();
        variables.remove(position);
        Self { variables, values }
    }

    /// Normaliza para somar 1.
    ///
    /// `label` só aparece no erro. Soma zero, negativa ou não finita é
    /// [`InferenceError::Degenerate`].
    pub fn normalize(&self, label: &str) -> Result<Self, InferenceError> {
        let total: f64 = self.values.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(InferenceError::Degenerate {
                variable: label.to_string(),
                total,
            });
        }
        Ok(Self {
            variables: self.variables.clone(),
            values: self.values.iter().map(|v| v / total).collect(),
        })
    }

    fn position(&self, variable: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(vars: &[&str]) -> Vec<String> {
        vars.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn from_cpt_places_variable_last() {
        let cpt = Cpt::noisy_conjunction("Flu", &[("Fever".into(), 0.8)]).unwrap();
        let factor = Factor::from_cpt(&cpt).unwrap();
        assert_eq!(factor.variables(), ["Fever", "Flu"]);
        // Fever=1, Flu=1
        assert!((factor.values()[3] - 0.8).abs() < 1e-12);
        // Fever=0, Flu=1
        assert!((factor.values()[1] - 0.2).abs() < 1e-12);
    }

    /// CPT sem a validação do modelo: linhas faltando
    #[test]
    fn from_cpt_rejects_missing_rows() {
        let cpt = Cpt::from_rows("Flu", vec!["Fever".into()], vec![[0.2, 0.8]]);
        assert_eq!(
            Factor::from_cpt(&cpt),
            Err(InferenceError::FactorShape {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn new_checks_shape() {
        assert_eq!(
            Factor::new(names(&["A"]), vec![1.0]),
            Err(InferenceError::FactorShape {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn reduce_keeps_matching_entries() {
        // φ(A, B) = [a0b0, a0b1, a1b0, a1b1]
        let factor = Factor::new(names(&["A", "B"]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let a1 = factor.reduce("A", 1);
        assert_eq!(a1.variables(), ["B"]);
        assert_eq!(a1.values(), [3.0, 4.0]);
        let b0 = factor.reduce("B", 0);
        assert_eq!(b0.variables(), ["A"]);
        assert_eq!(b0.values(), [1.0, 3.0]);
        assert_eq!(factor.reduce("C", 1), factor);
    }

    #[test]
    fn sum_out_marginalizes() {
        let factor = Factor::new(names(&["A", "B"]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(factor.sum_out("A").values(), [4.0, 6.0]);
        assert_eq!(factor.sum_out("B").values(), [3.0, 7.0]);
        assert_eq!(factor.sum_out("A").sum_out("B").values(), [10.0]);
    }

    /// Produto sobre escopos parcialmente sobrepostos
    #[test]
    fn product_aligns_shared_variables() {
        let ab = Factor::new(names(&["A", "B"]), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let bc = Factor::new(names(&["B", "C"]), vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let abc = ab.product(&bc).unwrap();
        assert_eq!(abc.variables(), ["A", "B", "C"]);
        // A=1, B=0, C=1 → φ1(1,0)·φ2(0,1) = 3·6
        assert_eq!(abc.values()[0b101], 18.0);
        // A=0, B=1, C=0 → 2·7
        assert_eq!(abc.values()[0b010], 14.0);
    }

    #[test]
    fn product_with_unit_is_identity() {
        let a = Factor::new(names(&["A"]), vec![0.3, 0.7]).unwrap();
        assert_eq!(Factor::unit().product(&a).unwrap().values(), a.values());
    }

    #[test]
    fn normalize_rejects_zero_mass() {
        let zero = Factor::new(names(&["A"]), vec![0.0, 0.0]).unwrap();
        assert!(matches!(
            zero.normalize("A"),
            Err(InferenceError::Degenerate { .. })
        ));
        let a = Factor::new(names(&["A"]), vec![1.0, 3.0]).unwrap();
        assert_eq!(a.normalize("A").unwrap().values(), [0.25, 0.75]);
    }
}

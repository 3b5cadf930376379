//! # Módulo Ingest — Fronteira de Texto Livre
//!
//! Tudo o que transforma texto em valores do núcleo fica aqui, fora do
//! motor de inferência:
//!
//! | Sub-módulo | Produz | A partir de |
//! |------------|--------|-------------|
//! | [`loader`] | entradas da [`KnowledgeBase`](crate::core::KnowledgeBase) | linhas `"X has symptoms A, B."` |
//! | [`resolver`] | nomes de sintomas canônicos | entrada do usuário, frases compostas |
//!
//! Os nomes seguem a convenção *title case* (ver [`title_case()`]); o núcleo
//! compara nomes por igualdade exata.

/// Sub-módulo do carregador de conhecimento em texto livre.
pub mod loader;

/// Sub-módulo do resolvedor de sintomas informados pelo usuário.
pub mod resolver;

use unicode_normalization::UnicodeNormalization;

pub use loader::{KnowledgeLoader, LoadReport};
pub use resolver::{InputResolver, Resolution, SentenceParser};

/// Normaliza para NFC e capitaliza cada palavra.
///
/// Uma letra vira maiúscula quando o caractere anterior não é letra, e
/// minúscula caso contrário: `"covid-19"` → `"Covid-19"`,
/// `"runny nose"` → `"Runny Nose"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.nfc() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(title_case("runny nose"), "Runny Nose");
        assert_eq!(title_case("SHORTNESS OF BREATH"), "Shortness Of Breath");
        assert_eq!(title_case("covid-19"), "Covid-19");
    }

    /// Formas decompostas são recompostas antes de capitalizar
    #[test]
    fn normalizes_to_nfc() {
        assert_eq!(title_case("e\u{301}nfase"), "\u{c9}nfase");
    }
}

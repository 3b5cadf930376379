//! # Configuração — Linha de Comando e Variáveis de Ambiente
//!
//! Todas as opções aceitam flag ou variável de ambiente. O nível de log
//! segue `RUST_LOG` (padrão `info`).
//!
//! ```bash
//! # Sintomas avulsos, aceitando sugestões automaticamente
//! diagnostico --symptom fever --symptom caugh --yes
//!
//! # Frase composta
//! diagnostico --sentence "Ana has fever and chills, therefore she might have Malaria"
//!
//! # KB própria, sem gravar o resultado
//! DIAGNOSTICO_KB=minha_kb.json diagnostico --symptom rash --no-sink
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::ingest::loader::KNOWLEDGE_FILE;
use crate::persistence::DIAGNOSES_PATH;

/// Diagnóstico probabilístico de doenças a partir de sintomas observados.
#[derive(Debug, Clone, Parser)]
#[command(name = "diagnostico", version, about)]
pub struct Config {
    /// Base de conhecimento em JSON (padrão: tabela embutida).
    #[arg(long, env = "DIAGNOSTICO_KB")]
    pub kb: Option<PathBuf>,

    /// Declarações "X has symptoms A, B." mescladas na KB.
    #[arg(long, env = "DIAGNOSTICO_KNOWLEDGE", default_value = KNOWLEDGE_FILE)]
    pub knowledge: PathBuf,

    /// Sintoma observado (repetível).
    #[arg(long = "symptom", short = 's')]
    pub symptoms: Vec<String>,

    /// Frase composta: "<nome> has A and B, therefore they might have X or Y".
    #[arg(long, conflicts_with = "symptoms")]
    pub sentence: Option<String>,

    /// Aceita sugestões de correção sem perguntar.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Arquivo onde os diagnósticos são registrados.
    #[arg(long, env = "DIAGNOSTICO_OUT", default_value = DIAGNOSES_PATH)]
    pub out: PathBuf,

    /// Não registra o diagnóstico.
    #[arg(long)]
    pub no_sink: bool,
}

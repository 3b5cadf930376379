//! # diagnostico — Linha de Comando
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG, padrão info)
//!   ├── Lê Config (flags + variáveis de ambiente)
//!   ├── Carrega KB (--kb ou tabela embutida) + knowledge.txt
//!   ├── Coleta sintomas (--sentence, --symptom ou stdin até "done")
//!   ├── Resolve nomes (sugestões: --yes ou pergunta yes/no)
//!   ├── diagnose()
//!   └── Imprime ranking e registra no JsonFileSink
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use diagnostico_bayesiano::config::Config;
use diagnostico_bayesiano::ingest::{InputResolver, KnowledgeLoader, Resolution, SentenceParser};
use diagnostico_bayesiano::persistence::{self, JsonFileSink, ResultSink};
use diagnostico_bayesiano::{diagnose, EvidenceSet, KnowledgeBase};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();

    let mut kb = match &config.kb {
        Some(path) => persistence::load_knowledge_base(path)?,
        None => KnowledgeBase::builtin(),
    };
    if let Err(e) = KnowledgeLoader::new().load_file(&config.knowledge, &mut kb) {
        tracing::warn!(error = %e, "Falha ao carregar conhecimento textual, seguindo sem ele");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let raw_symptoms = collect_symptoms(&config, &mut input)?;
    let resolver = InputResolver::new(&kb);
    let evidence = resolve_symptoms(&resolver, &raw_symptoms, config.yes, &mut input)?;

    if evidence.is_empty() {
        println!("No valid symptoms entered.");
        return Ok(());
    }

    let diagnosis = diagnose(&kb, &evidence)?;

    println!("Symptoms: {}", evidence.as_slice().join(", "));
    if diagnosis.posteriors.is_empty() {
        println!("No disease matches the observed symptoms.");
    }
    for (disease, p) in diagnosis.ranked() {
        println!("  {disease:<24} {p:.2}");
    }

    if !config.no_sink {
        let mut sink = JsonFileSink::new(&config.out);
        sink.record(&diagnosis)
            .with_context(|| format!("Falha ao registrar diagnóstico em {}", config.out.display()))?;
        tracing::info!(path = %config.out.display(), "Diagnóstico registrado");
    }

    Ok(())
}

/// Sintomas brutos, na ordem em que o usuário os informou.
fn collect_symptoms(config: &Config, input: &mut impl BufRead) -> Result<Vec<String>> {
    if let Some(sentence) = &config.sentence {
        let parsed = SentenceParser::new()
            .parse(sentence)
            .with_context(|| format!("Frase não reconhecida: {sentence:?}"))?;
        tracing::info!(
            subject = %parsed.subject,
            suspected = ?parsed.diseases,
            "Frase composta interpretada"
        );
        return Ok(parsed.symptoms);
    }
    if !config.symptoms.is_empty() {
        return Ok(config.symptoms.clone());
    }

    let mut symptoms = Vec::new();
    loop {
        let Some(line) = prompt(input, "Enter a symptom (or 'done' to finish): ")? else {
            break;
        };
        if line.eq_ignore_ascii_case("done") {
            break;
        }
        if !line.is_empty() {
            symptoms.push(line);
        }
    }
    Ok(symptoms)
}

fn resolve_symptoms(
    resolver: &InputResolver,
    raws: &[String],
    accept_suggestions: bool,
    input: &mut impl BufRead,
) -> Result<EvidenceSet> {
    let mut evidence = EvidenceSet::default();
    for raw in raws {
        match resolver.resolve(raw) {
            Resolution::Exact(name) => {
                evidence.push(name);
            }
            Resolution::Suggestion { input: typed, candidate, score } => {
                let accepted = accept_suggestions
                    || prompt(input, &format!("Did you mean '{candidate}' instead of '{typed}'? (yes/no): "))?
                        .is_some_and(|answer| answer.eq_ignore_ascii_case("yes"));
                tracing::debug!(typed = %typed, candidate = %candidate, score, accepted, "Sugestão");
                if accepted {
                    evidence.push(candidate);
                }
            }
            Resolution::Unknown(name) => {
                tracing::warn!(symptom = %name, "Sintoma desconhecido, ignorado");
                println!("Symptom '{name}' not recognized.");
            }
        }
    }
    Ok(evidence)
}

/// Escreve a pergunta e lê uma linha; `None` no fim da entrada.
fn prompt(input: &mut impl BufRead, question: &str) -> Result<Option<String>> {
    print!("{question}");
    io::stdout().flush().context("Falha ao escrever no stdout")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Falha ao ler stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

//! # Pipeline de Re-etiquetagem — Orquestrador com Eventos Observáveis
//!
//! O pipeline guarda um detector por família, na ordem de prioridade, e roda
//! todos sobre a mesma sequência de tags. Cada detector enxerga as tags já
//! gravadas pelos anteriores, então quem vem primeiro fica com o token.
//!
//! Como no restante do crate, as entradas do chamador nunca são alteradas:
//! [`RetagPipeline::retag`] devolve uma sequência de tags nova.
//!
//! Cada passo pode ser emitido como [`PipelineEvent`] por um canal `mpsc`,
//! o que permite ao servidor WebSocket transmitir o progresso em tempo real.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use retag_core::pipeline::RetagPipeline;
//!
//! let pipeline = RetagPipeline::new().unwrap();
//! let tokens = ["call", "555-123-4567", "or", "mail", "ops@example.org"];
//! let tags = ["O"; 5];
//! let tags = pipeline.retag("call 555-123-4567 or mail ops@example.org", &tokens, &tags).unwrap();
//! assert_eq!(tags, vec!["O", "TEL", "O", "O", "MAIL"]);
//! ```

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::align::token_offsets;
use crate::config::EngineConfig;
use crate::detector::{Detection, Detector, DetectorBuilder};
use crate::error::{NerError, Result};
use crate::matcher::RawSpan;
use crate::tags::{apply_label, tags_to_spans, EntityKind, EntitySpan, TaggedToken, OUTSIDE};
use crate::tokenizer::{join_tokens, tokenize, Token};
use crate::{date, email, link, telephone};

/// Eventos emitidos durante uma re-etiquetagem.
///
/// Permitem que a UI mostre, família por família, o que cada detector
/// encontrou e quais tokens mudaram de tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// Um detector começou a rodar. `position` é a posição na prioridade.
    DetectorStarted {
        entity: EntityKind,
        position: usize,
    },
    /// Spans que sobreviveram aos filtros da família (pode ser vazio).
    SpansFound {
        entity: EntityKind,
        spans: Vec<RawSpan>,
    },
    /// Um token livre recebeu o label de uma família.
    TagAssigned {
        token_index: usize,
        token_text: String,
        tag: String,
        entity: EntityKind,
    },
    /// **Conclusão**: sequência final de tags e entidades agrupadas.
    Done {
        tags: Vec<String>,
        entities: Vec<EntitySpan>,
        total_tokens: usize,
        processing_ms: u64,
    },
    /// **Falha**: entrada malformada; nenhuma tag foi alterada.
    Error {
        message: String,
    },
}

/// Uma frase tokenizada e etiquetada, unidade de trabalho do modo em lote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl Document {
    /// Tokeniza por espaços e começa com todas as tags `O`.
    ///
    /// `text` guarda a reconstrução `join_tokens`, não o texto cru: espaços
    /// repetidos desalinhariam os offsets dos detectores.
    pub fn from_text(text: impl AsRef<str>) -> Self {
        let tokens: Vec<String> = tokenize(text.as_ref()).into_iter().map(|t| t.text).collect();
        let tags = vec![OUTSIDE.to_string(); tokens.len()];
        Self {
            text: join_tokens(&tokens),
            tokens,
            tags,
        }
    }
}

/// O pipeline de re-etiquetagem.
///
/// Imutável depois de construído: pode ser compartilhado entre threads
/// (ex: atrás de um `Arc` no servidor web) sem lock.
#[derive(Debug, Clone)]
pub struct RetagPipeline {
    detectors: Vec<Detector>,
}

impl RetagPipeline {
    /// Os quatro detectores com as tabelas embutidas, na prioridade padrão.
    pub fn new() -> Result<Self> {
        Self::from_config(&EngineConfig::default())
    }

    /// Monta o pipeline a partir da configuração.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let detectors = config
            .priority
            .iter()
            .map(|&kind| {
                let mut builder = default_builder(kind);
                if let Some(table) = config.table_for(kind) {
                    builder = builder.table(table.clone());
                }
                if kind == EntityKind::Date {
                    builder = builder.skip_phrases(&config.date_skip_phrases);
                }
                builder
                    .max_input_bytes(config.max_input_bytes)
                    .size_limit(config.regex_size_limit)
                    .build()
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            priority = ?config.priority,
            overrides = config.tables.len(),
            "pipeline de re-etiquetagem pronto"
        );
        Ok(Self { detectors })
    }

    /// Detectores na ordem de prioridade.
    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn priority(&self) -> Vec<EntityKind> {
        self.detectors.iter().map(Detector::entity).collect()
    }

    /// Detector de uma família, se ela estiver na prioridade configurada.
    pub fn detector(&self, kind: EntityKind) -> Result<&Detector> {
        self.detectors
            .iter()
            .find(|d| d.entity() == kind)
            .ok_or(NerError::MissingDetector(kind))
    }

    /// Índices que a família `kind` marcaria. Não grava nada.
    pub fn detect<T, G>(&self, kind: EntityKind, text: &str, tokens: &[T], tags: &[G]) -> Result<Vec<usize>>
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        self.detector(kind)?.match_indices(text, tokens, tags)
    }

    /// Como [`RetagPipeline::detect`], com tokens e spans encontrados.
    pub fn detect_verbose<T, G>(&self, kind: EntityKind, text: &str, tokens: &[T], tags: &[G]) -> Result<Detection>
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        self.detector(kind)?.detect(text, tokens, tags)
    }

    /// Roda todos os detectores em ordem e devolve a nova sequência de tags.
    pub fn retag<T, G>(&self, text: &str, tokens: &[T], tags: &[G]) -> Result<Vec<String>>
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        self.run(text, tokens, tags, |_| {})
    }

    /// Executa a re-etiquetagem enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. Para cada família: `DetectorStarted`, `SpansFound` e um
    ///    `TagAssigned` por token marcado.
    /// 2. `Done` com a sequência final, ou `Error` se a entrada for inválida.
    pub fn retag_streaming<T, G>(&self, text: &str, tokens: &[T], tags: &[G], tx: mpsc::Sender<PipelineEvent>)
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        let start = Instant::now();
        let result = self.run(text, tokens, tags, |event| {
            let _ = tx.send(event);
        });

        let event = match result {
            Ok(tags) => {
                let tagged = tagged_from_parts(tokens, &tags);
                let entities = tags_to_spans(&tagged, &join_tokens(tokens));
                PipelineEvent::Done {
                    total_tokens: tags.len(),
                    tags,
                    entities,
                    processing_ms: start.elapsed().as_millis() as u64,
                }
            }
            Err(err) => PipelineEvent::Error {
                message: err.to_string(),
            },
        };
        let _ = tx.send(event);
    }

    /// Atalho sem tagger a montante: tokeniza por espaços, parte de tudo
    /// `O` e devolve os tokens etiquetados e as entidades agrupadas.
    ///
    /// Os detectores recebem a reconstrução `join_tokens`, não o texto cru,
    /// para que espaços repetidos não desalinhem os offsets. As entidades
    /// apontam para o texto original.
    pub fn analyze(&self, text: &str) -> Result<(Vec<TaggedToken>, Vec<EntitySpan>)> {
        let tokens = tokenize(text);
        let tags = vec![OUTSIDE; tokens.len()];
        let final_tags = self.retag(&join_tokens(&tokens), &tokens, &tags)?;

        let tagged: Vec<TaggedToken> = tokens
            .into_iter()
            .zip(final_tags)
            .map(|(token, tag)| TaggedToken { token, tag })
            .collect();
        let entities = tags_to_spans(&tagged, text);
        debug!(tokens = tagged.len(), entities = entities.len(), "texto analisado");
        Ok((tagged, entities))
    }

    /// Re-etiqueta documentos independentes em paralelo.
    ///
    /// O resultado de cada documento é idêntico ao de [`RetagPipeline::retag`]
    /// e vem na mesma ordem da entrada.
    pub fn retag_batch(&self, documents: &[Document]) -> Vec<Result<Vec<String>>> {
        documents
            .par_iter()
            .map(|doc| self.retag(&doc.text, &doc.tokens, &doc.tags))
            .collect()
    }

    fn run<T, G, F>(&self, text: &str, tokens: &[T], tags: &[G], mut emit: F) -> Result<Vec<String>>
    where
        T: AsRef<str>,
        G: AsRef<str>,
        F: FnMut(PipelineEvent),
    {
        let mut current: Vec<String> = tags.iter().map(|t| t.as_ref().to_string()).collect();

        for (position, detector) in self.detectors.iter().enumerate() {
            let entity = detector.entity();
            emit(PipelineEvent::DetectorStarted { entity, position });

            let detection = detector.detect(text, tokens, &current)?;
            emit(PipelineEvent::SpansFound {
                entity,
                spans: detection.spans,
            });

            for &i in &detection.indices {
                emit(PipelineEvent::TagAssigned {
                    token_index: i,
                    token_text: tokens.get(i).map(|t| t.as_ref().to_string()).unwrap_or_default(),
                    tag: detector.label().to_string(),
                    entity,
                });
            }
            apply_label(&mut current, &detection.indices, detector.label());
        }

        Ok(current)
    }
}

/// Builder com tabela e filtros embutidos da família.
fn default_builder(kind: EntityKind) -> DetectorBuilder {
    match kind {
        EntityKind::Date => date::builder(),
        EntityKind::Mail => email::builder(),
        EntityKind::Link => link::builder(),
        EntityKind::Tel => telephone::builder(),
    }
}

/// Tokens com offsets na reconstrução `join_tokens`, já com a tag final.
fn tagged_from_parts<T: AsRef<str>>(tokens: &[T], tags: &[String]) -> Vec<TaggedToken> {
    tokens
        .iter()
        .zip(token_offsets(tokens))
        .zip(tags)
        .enumerate()
        .map(|(index, ((token, start), tag))| {
            let text = token.as_ref().to_string();
            TaggedToken {
                token: Token {
                    start,
                    end: start + text.len(),
                    text,
                    index,
                },
                tag: tag.clone(),
            }
        })
        .collect()
}

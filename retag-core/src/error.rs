//! Erros do motor de re-etiquetagem.
//!
//! Só existem duas classes de falha de verdade: entrada malformada
//! (tokens e tags desalinhados, texto acima do limite) e tabela de padrões
//! inválida, detectada na construção do detector. "Nenhuma entidade
//! encontrada" nunca é erro: é uma lista vazia.

use thiserror::Error;

use crate::tags::EntityKind;

/// Erros que podem ocorrer ao construir ou chamar um detector.
#[derive(Debug, Error)]
pub enum NerError {
    #[error("tokens e tags com tamanhos diferentes: {tokens} tokens, {tags} tags")]
    LengthMismatch { tokens: usize, tags: usize },

    #[error("padrão '{name}' da tabela {entity} não compila: {source}")]
    PatternCompile {
        entity: EntityKind,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("tabela de padrões de {found} entregue ao detector de {expected}")]
    TableMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("texto com {len} bytes excede o limite de {limit} bytes")]
    InputTooLong { len: usize, limit: usize },

    #[error("entidade desconhecida: {0}")]
    UnknownEntity(String),

    #[error("entidade {0} repetida na ordem de prioridade")]
    DuplicatePriority(EntityKind),

    #[error("mais de uma tabela de padrões para {0}")]
    DuplicateTable(EntityKind),

    #[error("nenhum detector configurado para {0}")]
    MissingDetector(EntityKind),

    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NerError>;

//! # Busca de Spans
//!
//! Roda cada padrão da tabela sobre o texto normalizado e coleta todos os
//! matches **não sobrepostos daquele padrão** (varredura gulosa da esquerda
//! para a direita). Padrões diferentes podem casar o mesmo trecho: quem
//! resolve a sobreposição é a união de conjuntos no [`crate::resolver`].
//!
//! ## Convenção de offsets
//!
//! Os padrões ancoram em `(?:\s|^)` e `(?:\s|$)`, então o match bruto costuma
//! carregar o espaço vizinho. O span guarda o match **sem o whitespace das
//! pontas**, com `start` inclusivo e `end` exclusivo.

use serde::{Deserialize, Serialize};

use crate::patterns::CompiledPattern;

/// Trecho do texto normalizado que um padrão reconheceu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Offset de byte inicial (inclusivo)
    pub start: usize,
    /// Offset de byte final (exclusivo)
    pub end: usize,
    /// Texto casado, sem o whitespace das pontas
    pub text: String,
}

/// Normalização aplicada antes da busca: remove whitespace das pontas do
/// texto inteiro e passa para minúsculas.
///
/// A conversão é só ASCII, que nunca muda o tamanho em bytes; assim o texto
/// continua alinhado com a reconstrução dos tokens. Todas as tabelas são ASCII.
pub fn normalize(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}

/// Todos os spans de todos os padrões, na ordem da tabela.
pub fn find_spans(patterns: &[CompiledPattern], text: &str) -> Vec<RawSpan> {
    let mut spans = Vec::new();

    for pattern in patterns {
        for m in pattern.regex().find_iter(text) {
            let matched = m.as_str();
            let trimmed = matched.trim();
            if trimmed.is_empty() {
                continue;
            }
            let start = m.start() + (matched.len() - matched.trim_start().len());
            spans.push(RawSpan {
                start,
                end: start + trimmed.len(),
                text: trimmed.to_string(),
            });
        }
    }

    spans
}

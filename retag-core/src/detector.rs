//! # Motor de Detecção Compartilhado
//!
//! As quatro famílias (data, e-mail, link, telefone) executam exatamente o
//! mesmo algoritmo; o que muda é configuração:
//!
//! - a tabela de padrões ([`PatternTable`]);
//! - um filtro opcional por span ([`SpanFilter`]), que vê o texto normalizado;
//! - um filtro opcional por token resolvido ([`TokenFilter`]), que vê o token
//!   original do chamador;
//! - frases de exclusão que, se presentes no texto, suprimem a chamada inteira.
//!
//! ## Fluxo de uma chamada
//!
//! 1. Rejeita `tokens`/`tags` de tamanhos diferentes **antes** de qualquer busca.
//! 2. Normaliza o texto; texto vazio ou só com espaços retorna vazio.
//! 3. Busca spans ([`crate::matcher`]) e aplica o filtro de span.
//! 4. Alinha ([`crate::align`]) e resolve ([`crate::resolver`]) para índices.
//! 5. Aplica o filtro de token e devolve os índices ordenados.
//!
//! O detector é imutável depois de construído e pode ser compartilhado entre
//! threads sem lock.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::align::CharMap;
use crate::error::{NerError, Result};
use crate::matcher::{find_spans, normalize, RawSpan};
use crate::patterns::{CompiledPattern, PatternTable, DEFAULT_SIZE_LIMIT};
use crate::resolver::resolve;
use crate::tags::EntityKind;

/// Decide se um span bruto segue adiante. Recebe o texto normalizado inteiro.
pub type SpanFilter = fn(normalized: &str, span: &RawSpan) -> bool;

/// Decide se um token resolvido recebe o label. Recebe o token original.
pub type TokenFilter = fn(token: &str) -> bool;

/// Resultado detalhado de uma chamada (modo verboso).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub entity: EntityKind,
    /// Índices que devem receber o label, em ordem crescente
    pub indices: Vec<usize>,
    /// Texto literal dos tokens em `indices`, para diagnóstico
    pub matched_tokens: Vec<String>,
    /// Spans que sobreviveram ao filtro de span
    pub spans: Vec<RawSpan>,
}

impl Detection {
    fn empty(entity: EntityKind) -> Self {
        Self {
            entity,
            indices: Vec::new(),
            matched_tokens: Vec::new(),
            spans: Vec::new(),
        }
    }
}

/// Configura e compila um [`Detector`].
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    entity: EntityKind,
    table: PatternTable,
    skip_phrases: Vec<String>,
    span_filter: Option<SpanFilter>,
    token_filter: Option<TokenFilter>,
    max_input_bytes: Option<usize>,
    size_limit: usize,
}

impl DetectorBuilder {
    /// Começa um detector para a família da tabela.
    pub fn new(table: PatternTable) -> Self {
        Self {
            entity: table.entity,
            table,
            skip_phrases: Vec::new(),
            span_filter: None,
            token_filter: None,
            max_input_bytes: None,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }

    /// Troca a tabela de padrões. A família precisa ser a mesma do builder.
    pub fn table(mut self, table: PatternTable) -> Self {
        self.table = table;
        self
    }

    /// Frases que, se aparecerem no texto normalizado, suprimem a detecção.
    pub fn skip_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entity = self.entity;
        self.skip_phrases = phrases
            .into_iter()
            .filter_map(|phrase| {
                let phrase = normalize(phrase.as_ref());
                if phrase.is_empty() {
                    warn!(entity = %entity, "frase de exclusão vazia ignorada");
                    None
                } else {
                    Some(phrase)
                }
            })
            .collect();
        self
    }

    pub fn span_filter(mut self, filter: SpanFilter) -> Self {
        self.span_filter = Some(filter);
        self
    }

    pub fn token_filter(mut self, filter: TokenFilter) -> Self {
        self.token_filter = Some(filter);
        self
    }

    /// Limite opcional do texto de entrada, em bytes.
    pub fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Limite do programa compilado de cada regex.
    pub fn size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    /// Compila a tabela. Qualquer padrão inválido impede a construção.
    pub fn build(self) -> Result<Detector> {
        if self.table.entity != self.entity {
            return Err(NerError::TableMismatch {
                expected: self.entity,
                found: self.table.entity,
            });
        }

        let patterns = self.table.compile(self.size_limit)?;
        debug!(
            entity = %self.entity,
            version = %self.table.version,
            patterns = patterns.len(),
            "detector compilado"
        );

        Ok(Detector {
            entity: self.entity,
            version: self.table.version,
            patterns,
            skip_phrases: self.skip_phrases,
            span_filter: self.span_filter,
            token_filter: self.token_filter,
            max_input_bytes: self.max_input_bytes,
        })
    }
}

/// Detector de uma família de entidade estruturada.
#[derive(Debug, Clone)]
pub struct Detector {
    entity: EntityKind,
    version: String,
    patterns: Vec<CompiledPattern>,
    skip_phrases: Vec<String>,
    span_filter: Option<SpanFilter>,
    token_filter: Option<TokenFilter>,
    max_input_bytes: Option<usize>,
}

impl Detector {
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn label(&self) -> &'static str {
        self.entity.label()
    }

    /// Versão da tabela de padrões compilada
    pub fn table_version(&self) -> &str {
        &self.version
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn skip_phrases(&self) -> &[String] {
        &self.skip_phrases
    }

    /// Spans aceitos no texto **já normalizado**.
    pub fn find_spans(&self, normalized: &str) -> Vec<RawSpan> {
        let mut spans = find_spans(&self.patterns, normalized);
        if let Some(keep) = self.span_filter {
            spans.retain(|span| keep(normalized, span));
        }
        spans
    }

    /// Índices de token que passam a qualificar para o label desta família.
    ///
    /// Contrato público de todo detector: nunca altera as entradas, nunca
    /// devolve índice cuja tag atual não seja `"O"`.
    pub fn match_indices<T, G>(&self, text: &str, tokens: &[T], tags: &[G]) -> Result<Vec<usize>>
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        Ok(self.detect(text, tokens, tags)?.indices)
    }

    /// Como [`Detector::match_indices`], mas devolve também os tokens e spans
    /// encontrados.
    pub fn detect<T, G>(&self, text: &str, tokens: &[T], tags: &[G]) -> Result<Detection>
    where
        T: AsRef<str>,
        G: AsRef<str>,
    {
        if tokens.len() != tags.len() {
            return Err(NerError::LengthMismatch {
                tokens: tokens.len(),
                tags: tags.len(),
            });
        }
        if let Some(limit) = self.max_input_bytes {
            if text.len() > limit {
                return Err(NerError::InputTooLong {
                    len: text.len(),
                    limit,
                });
            }
        }

        let normalized = normalize(text);
        if normalized.is_empty() {
            return Ok(Detection::empty(self.entity));
        }
        if let Some(phrase) = self
            .skip_phrases
            .iter()
            .find(|phrase| normalized.contains(phrase.as_str()))
        {
            debug!(entity = %self.entity, phrase = %phrase, "texto contém frase de exclusão");
            return Ok(Detection::empty(self.entity));
        }

        let spans = self.find_spans(&normalized);
        if spans.is_empty() {
            return Ok(Detection::empty(self.entity));
        }

        let map = CharMap::build(tokens);
        let mut indices = resolve(&spans, &map, tags);
        if let Some(keep) = self.token_filter {
            indices.retain(|&i| tokens.get(i).is_some_and(|t| keep(t.as_ref())));
        }

        let matched_tokens: Vec<String> = indices
            .iter()
            .filter_map(|&i| tokens.get(i).map(|t| t.as_ref().to_string()))
            .collect();

        if !matched_tokens.is_empty() {
            debug!(
                entity = %self.entity,
                spans = spans.len(),
                matched = ?matched_tokens,
                "tokens re-etiquetados"
            );
        }

        Ok(Detection {
            entity: self.entity,
            indices,
            matched_tokens,
            spans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_table() -> PatternTable {
        PatternTable::new(EntityKind::Tel, "test")
            .with_pattern("three", r"(?:\s|^)(\d{3})(?:\s|$)")
            .with_pattern("dashed", r"(?:\s|^)(\d{3}-\d{4})(?:\s|$)")
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let detector = DetectorBuilder::new(digits_table()).build().unwrap();
        let err = detector
            .match_indices("call 555", &["call", "555"], &["O"])
            .unwrap_err();
        assert!(matches!(err, NerError::LengthMismatch { tokens: 2, tags: 1 }));
    }

    #[test]
    fn test_length_mismatch_checked_even_for_blank_text() {
        let detector = DetectorBuilder::new(digits_table()).build().unwrap();
        assert!(detector.match_indices("", &["a"], &[] as &[&str]).is_err());
    }

    #[test]
    fn test_blank_text_short_circuits() {
        let detector = DetectorBuilder::new(digits_table()).build().unwrap();
        let empty: [&str; 0] = [];
        assert!(detector.match_indices("", &empty, &empty).unwrap().is_empty());
        assert!(detector.match_indices("   ", &empty, &empty).unwrap().is_empty());
    }

    #[test]
    fn test_builtin_detectors_ignore_blank_text() {
        let empty: [&str; 0] = [];
        let detectors = [
            crate::date::detector().unwrap(),
            crate::email::detector().unwrap(),
            crate::link::detector().unwrap(),
            crate::telephone::detector().unwrap(),
        ];
        for detector in &detectors {
            for text in ["", "   "] {
                let detection = detector.detect(text, &empty, &empty).unwrap();
                assert!(detection.indices.is_empty(), "{} {text:?}", detector.label());
                assert!(detection.spans.is_empty());
            }
        }
    }

    #[test]
    fn test_basic_detection() {
        let detector = DetectorBuilder::new(digits_table()).build().unwrap();
        let tokens = ["call", "555-1234", "or", "911"];
        let tags = ["O"; 4];
        let detection = detector.detect("call 555-1234 or 911", &tokens, &tags).unwrap();
        assert_eq!(detection.indices, vec![1, 3]);
        assert_eq!(detection.matched_tokens, vec!["555-1234", "911"]);
        assert_eq!(detection.entity, EntityKind::Tel);
    }

    #[test]
    fn test_table_mismatch() {
        let table = PatternTable::new(EntityKind::Mail, "1");
        let err = DetectorBuilder::new(digits_table()).table(table).build().unwrap_err();
        assert!(matches!(
            err,
            NerError::TableMismatch { expected: EntityKind::Tel, found: EntityKind::Mail }
        ));
    }

    #[test]
    fn test_input_limit() {
        let detector = DetectorBuilder::new(digits_table())
            .max_input_bytes(Some(4))
            .build()
            .unwrap();
        let err = detector.match_indices("call 555", &["call", "555"], &["O", "O"]).unwrap_err();
        assert!(matches!(err, NerError::InputTooLong { len: 8, limit: 4 }));
    }

    #[test]
    fn test_skip_phrases_suppress_call() {
        let detector = DetectorBuilder::new(digits_table())
            .skip_phrases(["  Ref NO ", ""])
            .build()
            .unwrap();
        assert_eq!(detector.skip_phrases(), &["ref no".to_string()]);

        let tokens = ["ref", "no", "555"];
        let tags = ["O"; 3];
        assert!(detector.match_indices("REF NO 555", &tokens, &tags).unwrap().is_empty());
        assert_eq!(
            detector.match_indices("ref 555", &["ref", "555"], &["O", "O"]).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_filters_are_applied() {
        fn no_nines(_: &str, span: &RawSpan) -> bool {
            !span.text.starts_with('9')
        }
        fn not_first_token(token: &str) -> bool {
            token != "555-1234"
        }

        let detector = DetectorBuilder::new(digits_table())
            .span_filter(no_nines)
            .build()
            .unwrap();
        let tokens = ["555-1234", "911"];
        let tags = ["O", "O"];
        assert_eq!(detector.match_indices("555-1234 911", &tokens, &tags).unwrap(), vec![0]);

        let detector = DetectorBuilder::new(digits_table())
            .token_filter(not_first_token)
            .build()
            .unwrap();
        assert_eq!(detector.match_indices("555-1234 911", &tokens, &tags).unwrap(), vec![1]);
    }

    #[test]
    fn test_detector_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Detector>();
    }
}

//! # Resolução de Spans em Índices de Token
//!
//! Converte spans de caracteres em índices de token usando o [`CharMap`]:
//!
//! 1. Para cada span, coleta os donos de todos os offsets em `[start, end)`.
//! 2. Une os conjuntos de todos os spans da chamada (é aqui que padrões
//!    redundantes colapsam).
//! 3. Remove todo índice cuja tag atual não é `"O"`: uma tag existente nunca
//!    é sobrescrita, qualquer que seja a prioridade da família.
//! 4. Devolve os índices restantes em ordem crescente, sem repetição.

use std::collections::BTreeSet;

use crate::align::CharMap;
use crate::matcher::RawSpan;
use crate::tags::is_outside;

/// Tokens tocados por um único span.
pub fn candidate_indices(span: &RawSpan, map: &CharMap) -> BTreeSet<usize> {
    map.owners_in(span.start..span.end).collect()
}

/// Índices que podem receber o label da família.
///
/// Um índice sem tag correspondente (sequência de tags curta demais) é
/// tratado como ocupado.
pub fn resolve<T: AsRef<str>>(spans: &[RawSpan], map: &CharMap, tags: &[T]) -> Vec<usize> {
    let candidates: BTreeSet<usize> = spans
        .iter()
        .flat_map(|span| map.owners_in(span.start..span.end))
        .collect();

    candidates
        .into_iter()
        .filter(|&i| tags.get(i).is_some_and(|tag| is_outside(tag.as_ref())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> RawSpan {
        RawSpan { start, end, text: String::new() }
    }

    #[test]
    fn test_candidate_indices_skip_separators() {
        // "ab cd ef"
        let map = CharMap::build(&["ab", "cd", "ef"]);
        let got: Vec<usize> = candidate_indices(&span(1, 7), &map).into_iter().collect();
        assert_eq!(got, vec![0, 1, 2]);
        // só o espaço entre "ab" e "cd"
        assert!(candidate_indices(&span(2, 3), &map).is_empty());
    }

    #[test]
    fn test_resolve_unions_and_sorts() {
        let map = CharMap::build(&["ab", "cd", "ef", "gh"]);
        let tags = ["O"; 4];
        let spans = vec![span(9, 11), span(0, 4), span(3, 5)];
        assert_eq!(resolve(&spans, &map, &tags), vec![0, 1, 3]);
    }

    #[test]
    fn test_resolve_never_overwrites_existing_tags() {
        let map = CharMap::build(&["call", "555-123-4567", "now"]);
        let tags = ["O", "DATE", "O"];
        let spans = vec![span(0, 21)];
        assert_eq!(resolve(&spans, &map, &tags), vec![0, 2]);
    }

    #[test]
    fn test_resolve_treats_missing_tags_as_taken() {
        let map = CharMap::build(&["ab", "cd"]);
        let tags = ["O"];
        assert_eq!(resolve(&[span(0, 5)], &map, &tags), vec![0]);
    }

    #[test]
    fn test_resolve_span_past_reconstruction() {
        let map = CharMap::build(&["ab"]);
        let tags = ["O"];
        assert!(resolve(&[span(10, 20)], &map, &tags).is_empty());
    }
}

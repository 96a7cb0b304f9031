//! # Alinhamento Caractere → Token
//!
//! Os padrões rodam sobre o texto inteiro, mas o resultado precisa ser uma
//! lista de índices de token. A ponte é um mapa de offsets construído sobre a
//! reconstrução `tokens[0] + " " + tokens[1] + " " + ...`.
//!
//! ```text
//! tokens:   ["ab", "cd", "ef"]
//! texto:     a b _ c d _ e f
//! offset:    0 1 2 3 4 5 6 7
//! dono:      0 0 - 1 1 - 2 2
//! ```
//!
//! O espaço separador não pertence a nenhum token, e offsets além do fim da
//! reconstrução também não. Offsets são contados em bytes UTF-8, a mesma
//! unidade que o crate `regex` devolve.

use std::ops::Range;

/// Mapa total de offset de byte para índice do token dono.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharMap {
    owners: Vec<Option<usize>>,
}

impl CharMap {
    /// Constrói o mapa em uma única passada, O(tamanho total dos tokens).
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
        let total: usize = tokens.iter().map(|t| t.as_ref().len()).sum::<usize>()
            + tokens.len().saturating_sub(1);
        let mut owners = Vec::with_capacity(total);

        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                owners.push(None);
            }
            owners.extend(std::iter::repeat(Some(index)).take(token.as_ref().len()));
        }

        Self { owners }
    }

    /// Token dono do offset, ou `None` para separadores e offsets fora do texto.
    pub fn owner(&self, offset: usize) -> Option<usize> {
        self.owners.get(offset).copied().flatten()
    }

    /// Donos de cada offset em `range`, na ordem dos offsets (com repetições).
    pub fn owners_in(&self, range: Range<usize>) -> impl Iterator<Item = usize> + '_ {
        let end = range.end.min(self.owners.len());
        let start = range.start.min(end);
        self.owners[start..end].iter().filter_map(|owner| *owner)
    }

    /// Tamanho em bytes da reconstrução.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Offset inicial de cada token na reconstrução.
///
/// # Exemplo
/// `["ab", "cd", "ef"]` -> `[0, 3, 6]`
pub fn token_offsets<S: AsRef<str>>(tokens: &[S]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tokens.len());
    let mut next = 0;
    for token in tokens {
        offsets.push(next);
        next += token.as_ref().len() + 1;
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_map_basic() {
        let map = CharMap::build(&["ab", "cd", "ef"]);
        let owners: Vec<Option<usize>> = (0..9).map(|o| map.owner(o)).collect();
        assert_eq!(
            owners,
            vec![Some(0), Some(0), None, Some(1), Some(1), None, Some(2), Some(2), None]
        );
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_empty_tokens_give_empty_map() {
        let map = CharMap::build::<&str>(&[]);
        assert!(map.is_empty());
        assert_eq!(map.owner(0), None);
    }

    #[test]
    fn test_every_token_offset_maps_to_exactly_its_token() {
        let tokens = ["contact", "john.doe@example.com", "now", "é"];
        let map = CharMap::build(&tokens);
        let offsets = token_offsets(&tokens);

        for (i, token) in tokens.iter().enumerate() {
            for o in offsets[i]..offsets[i] + token.len() {
                assert_eq!(map.owner(o), Some(i), "offset {o}");
            }
            // o separador depois de cada token não tem dono
            assert_eq!(map.owner(offsets[i] + token.len()), None);
        }
    }

    #[test]
    fn test_owners_in_clamps_range() {
        let map = CharMap::build(&["ab", "cd"]);
        let owners: Vec<usize> = map.owners_in(1..100).collect();
        assert_eq!(owners, vec![0, 1, 1]);
        assert_eq!(map.owners_in(50..60).count(), 0);
    }

    #[test]
    fn test_token_offsets() {
        assert_eq!(token_offsets(&["ab", "cd", "ef"]), vec![0, 3, 6]);
        assert!(token_offsets::<&str>(&[]).is_empty());
    }
}

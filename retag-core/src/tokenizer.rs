//! # Tokenizador por Espaços
//!
//! Em produção a tokenização vem de fora (o mesmo tokenizador que alimentou o
//! tagger estatístico). Este módulo existe para quem chama o motor sem ter um:
//! a interface web, os testes e o modo `analyze` do pipeline.
//!
//! A única garantia que o motor exige dos tokens é que **não contenham espaços**,
//! porque o alinhamento reconstrói o texto juntando os tokens com um espaço.
//! Dividir apenas por whitespace satisfaz isso e mantém e-mails, URLs e
//! números de telefone com hífen inteiros.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use retag_core::tokenizer::{join_tokens, tokenize};
//!
//! let tokens = tokenize("ligue  555-123-4567 hoje");
//! assert_eq!(tokens[1].text, "555-123-4567");
//! assert_eq!(join_tokens(&tokens), "ligue 555-123-4567 hoje");
//! ```

use serde::{Deserialize, Serialize};

/// Um token extraído do texto original.
///
/// Mantém a posição exata no texto de origem (`start` e `end`) para que a UI
/// possa destacar a entidade sem alterar a formatação.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "john.doe@example.com").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Divide o texto em tokens nas fronteiras de whitespace.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start: Option<usize> = None;

    for (byte_pos, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = current_start.take() {
                push_token(&mut tokens, text, start, byte_pos);
            }
        } else if current_start.is_none() {
            current_start = Some(byte_pos);
        }
    }

    if let Some(start) = current_start {
        push_token(&mut tokens, text, start, text.len());
    }

    tokens
}

/// Reconstrói o texto que o alinhador assume: tokens separados por um espaço.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
    let index = tokens.len();
    tokens.push(Token {
        text: text[start..end].to_string(),
        start,
        end,
        index,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_structured_tokens_whole() {
        let tokens = tokenize("contact john.doe@example.com or www.google.com/?q=1");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["contact", "john.doe@example.com", "or", "www.google.com/?q=1"]
        );
    }

    #[test]
    fn test_tokenize_offsets_and_indices() {
        let text = "  meet\ton 12/05/2023\n";
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 3);
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.index, i);
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(join_tokens(&["ab", "cd", "ef"]), "ab cd ef");
        assert_eq!(join_tokens::<&str>(&[]), "");
    }
}

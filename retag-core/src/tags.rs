//! # Vocabulário de Tags e Famílias de Entidade
//!
//! O tagger estatístico a montante produz uma tag por token. Este crate só
//! conhece duas coisas sobre essas tags:
//!
//! | Tag      | Significado                                         |
//! |----------|-----------------------------------------------------|
//! | `O`      | Token livre, ainda sem entidade                     |
//! | qualquer outra | Token já reivindicado por uma etapa anterior  |
//!
//! As famílias estruturadas que os detectores podem atribuir:
//!
//! | Label  | Família    | Exemplos                                   |
//! |--------|------------|--------------------------------------------|
//! | DATE   | Data       | 12/05/2023, 3rd of march 2021              |
//! | MAIL   | E-mail     | john.doe@example.com                       |
//! | LINK   | Link       | https://example.org/path, www.google.com   |
//! | TEL    | Telefone   | 555-123-4567, tel: +44 20 7946 0958        |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NerError;
use crate::tokenizer::Token;

/// Tag de um token que ainda não pertence a nenhuma entidade.
pub const OUTSIDE: &str = "O";

/// Famílias de entidade estruturada reconhecidas por regex.
///
/// A ordem das variantes é a ordem de prioridade padrão do pipeline:
/// quem roda primeiro "ganha" o token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    /// **Data**: formatos numéricos e com nome do mês, com hora e fuso opcionais.
    Date,
    /// **E-mail**: endereços derivados da RFC 5322.
    Mail,
    /// **Link**: URLs com protocolo ou domínios nus com TLD conhecido.
    Link,
    /// **Telefone**: agrupamentos NANP e formatos específicos de países.
    Tel,
}

impl EntityKind {
    /// Todas as famílias, na ordem de prioridade padrão.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Date,
        EntityKind::Mail,
        EntityKind::Link,
        EntityKind::Tel,
    ];

    /// Label escrito na sequência de tags (ex: "DATE")
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Date => "DATE",
            EntityKind::Mail => "MAIL",
            EntityKind::Link => "LINK",
            EntityKind::Tel => "TEL",
        }
    }

    /// Cor CSS para highlight na UI
    pub fn color(&self) -> &'static str {
        match self {
            EntityKind::Date => "#f59e0b", // âmbar
            EntityKind::Mail => "#3b82f6", // azul
            EntityKind::Link => "#10b981", // verde esmeralda
            EntityKind::Tel => "#8b5cf6",  // violeta
        }
    }

    /// Ícone emoji para a família
    pub fn icon(&self) -> &'static str {
        match self {
            EntityKind::Date => "📅",
            EntityKind::Mail => "✉️",
            EntityKind::Link => "🔗",
            EntityKind::Tel => "📞",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = NerError;

    /// Aceita o label em qualquer caixa (ex: "date", "TEL")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NerError::UnknownEntity(s.to_string()))
    }
}

/// `true` se a tag marca um token livre.
pub fn is_outside(tag: &str) -> bool {
    tag == OUTSIDE
}

/// Escreve `label` nas posições `indices` de uma sequência de tags.
///
/// Índices fora da sequência são ignorados. Os detectores nunca chamam isto:
/// quem decide gravar o resultado é o chamador (ou o pipeline).
pub fn apply_label(tags: &mut [String], indices: &[usize], label: &str) {
    for &i in indices {
        if let Some(tag) = tags.get_mut(i) {
            *tag = label.to_string();
        }
    }
}

/// Um token com a tag final depois da re-etiquetagem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub tag: String,
}

/// Uma entidade agrupada para exibição (tokens consecutivos com o mesmo label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Texto coberto pela entidade (ex: "12 may 2023")
    pub text: String,
    /// Label da entidade (ex: "DATE")
    pub label: String,
    /// Índice do primeiro token
    pub start_token: usize,
    /// Índice do último token (inclusivo)
    pub end_token: usize,
    /// Posição de byte inicial no texto original
    pub start: usize,
    /// Posição de byte final no texto original (exclusiva)
    pub end: usize,
}

/// Agrupa tokens etiquetados em spans de entidade.
///
/// Como as tags aqui não seguem BIO, tokens vizinhos com o mesmo label
/// são tratados como uma única entidade. Tokens `O` encerram o span atual.
///
/// # Exemplo
/// `[O, DATE, DATE, O, MAIL]` -> `[EntitySpan(DATE, 1..=2), EntitySpan(MAIL, 4..=4)]`
pub fn tags_to_spans(tagged: &[TaggedToken], original_text: &str) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tagged.len() {
        if is_outside(&tagged[i].tag) {
            i += 1;
            continue;
        }

        let label = &tagged[i].tag;
        let mut j = i + 1;
        while j < tagged.len() && tagged[j].tag == *label {
            j += 1;
        }

        let first = &tagged[i].token;
        let last = &tagged[j - 1].token;
        let text = original_text
            .get(first.start..last.end)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| {
                tagged[i..j]
                    .iter()
                    .map(|t| t.token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        spans.push(EntitySpan {
            text,
            label: label.clone(),
            start_token: first.index,
            end_token: last.index,
            start: first.start,
            end: last.end,
        });
        i = j;
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_entity_labels() {
        assert_eq!(EntityKind::Date.label(), "DATE");
        assert_eq!(EntityKind::Mail.label(), "MAIL");
        assert_eq!(EntityKind::Link.label(), "LINK");
        assert_eq!(EntityKind::Tel.label(), "TEL");
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("DATE".parse::<EntityKind>().unwrap(), EntityKind::Date);
        assert_eq!("tel".parse::<EntityKind>().unwrap(), EntityKind::Tel);
        assert!(matches!(
            "PER".parse::<EntityKind>(),
            Err(NerError::UnknownEntity(s)) if s == "PER"
        ));
    }

    #[test]
    fn test_entity_serde_uses_labels() {
        let json = serde_json::to_string(&EntityKind::Mail).unwrap();
        assert_eq!(json, "\"MAIL\"");
        let back: EntityKind = serde_json::from_str("\"LINK\"").unwrap();
        assert_eq!(back, EntityKind::Link);
    }

    #[test]
    fn test_apply_label_ignores_out_of_range() {
        let mut tags = vec!["O".to_string(); 3];
        apply_label(&mut tags, &[0, 2, 7], "TEL");
        assert_eq!(tags, vec!["TEL", "O", "TEL"]);
    }

    #[test]
    fn test_tags_to_spans_groups_neighbours() {
        let text = "meet on 12 may 2023 or mail a@b.com";
        let labels = ["O", "O", "DATE", "DATE", "DATE", "O", "O", "MAIL"];
        let tagged: Vec<TaggedToken> = tokenize(text)
            .into_iter()
            .zip(labels)
            .map(|(token, tag)| TaggedToken { token, tag: tag.to_string() })
            .collect();

        let spans = tags_to_spans(&tagged, text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "12 may 2023");
        assert_eq!(spans[0].label, "DATE");
        assert_eq!((spans[0].start_token, spans[0].end_token), (2, 4));
        assert_eq!(spans[1].text, "a@b.com");
        assert_eq!(spans[1].label, "MAIL");
    }
}

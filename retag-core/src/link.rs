//! # Família LINK
//!
//! URLs com protocolo (`http`, `https` e os typos `htps`/`hitp` de OCR) ou
//! domínios nus terminados em um TLD da lista fixa abaixo.
//!
//! Dois filtros próprios da família:
//!
//! - **Guarda de `@`**: um span colado em `@` é a metade de um e-mail, não
//!   um link ([`not_next_to_at`]). Vale para os dois ramos do padrão, inclusive
//!   URLs com caminho: `user@example.com/path` também é rejeitado, não só o
//!   domínio nu.
//! - **Filtro por token** ([`is_link_token`]): o conteúdo só-letras do token
//!   precisa ter pelo menos 6 letras e caixa uniforme. Isso derruba palavras
//!   curtas ou capitalizadas que parecem domínio por acaso ("ab.co", "Dr.Who").

use crate::detector::{Detector, DetectorBuilder};
use crate::error::Result;
use crate::matcher::RawSpan;
use crate::patterns::PatternTable;
use crate::tags::EntityKind;

pub const TABLE_VERSION: &str = "1";

/// Tamanho mínimo do conteúdo alfabético de um token de link.
pub const MIN_ALPHA_LEN: usize = 6;

const HTTP_PROTOCOL: &str = "h[it]tps?:";

const TOP_LEVEL_DOMAINS: &[&str] = &[
    "com", "net", "org", "edu", "gov", "mil", "aero", "asia", "biz", "cat", "coop", "info", "int",
    "jobs", "mobi", "museum", "name", "post", "pro", "tel", "travel", "xxx", "ac", "ad", "ae",
    "af", "ag", "ai", "al", "am", "an", "ao", "aq", "ar", "as", "at", "au", "aw", "ax", "az",
    "ba", "bb", "bd", "be", "bf", "bg", "bh", "bi", "bj", "bm", "bn", "bo", "br", "bs", "bt",
    "bv", "bw", "by", "bz", "ca", "cc", "cd", "cf", "cg", "ch", "ci", "ck", "cl", "cm", "cn",
    "co", "cr", "cs", "cu", "cv", "cx", "cy", "cz", "dd", "de", "dj", "dk", "dm", "do", "dz",
    "ec", "ee", "eg", "eh", "er", "es", "et", "eu", "fi", "fj", "fk", "fm", "fo", "fr", "ga",
    "gb", "gd", "ge", "gf", "gg", "gh", "gi", "gl", "gm", "gn", "gp", "gq", "gr", "gs", "gt",
    "gu", "gw", "gy", "hk", "hm", "hn", "hr", "ht", "hu", "id", "ie", "il", "im", "in", "io",
    "iq", "ir", "is", "it", "je", "jm", "jo", "jp", "ke", "kg", "kh", "ki", "km", "kn", "kp",
    "kr", "kw", "ky", "kz", "la", "lb", "lc", "li", "lk", "lr", "ls", "lt", "lu", "lv", "ly",
    "ma", "mc", "md", "me", "mg", "mh", "mk", "ml", "mm", "mn", "mo", "mp", "mq", "mr", "ms",
    "mt", "mu", "mv", "mw", "mx", "my", "mz", "na", "nc", "ne", "nf", "ng", "ni", "nl", "no",
    "np", "nr", "nu", "nz", "om", "pa", "pe", "pf", "pg", "ph", "pk", "pl", "pm", "pn", "pr",
    "ps", "pt", "pw", "py", "qa", "re", "ro", "rs", "ru", "rw", "sa", "sb", "sc", "sd", "se",
    "sg", "sh", "si", "sj", "ja", "sk", "sl", "sm", "sn", "so", "sr", "ss", "st", "su", "sv",
    "sx", "sy", "sz", "tc", "td", "tf", "tg", "th", "tj", "tk", "tl", "tm", "tn", "to", "tp",
    "tr", "tt", "tv", "tw", "tz", "ua", "ug", "uk", "us", "uy", "uz", "va", "vc", "ve", "vg",
    "vi", "vn", "vu", "wf", "ws", "ye", "yt", "yu", "za", "zm", "zw",
];

/// Parênteses balanceados com um nível de aninhamento, como em URLs da Wikipedia.
const BALANCED_PARENS: &str = r"\([^\s()]*?\([^\s()]+\)[^\s()]*?\)|\([^\s]+?\)";

/// Tabela padrão da família LINK.
pub fn pattern_table() -> PatternTable {
    let tld = format!("(?:{})", TOP_LEVEL_DOMAINS.join("|"));
    let with_path = format!(
        r#"(?:{HTTP_PROTOCOL}(?:/{{1,3}}|[a-z0-9%])|[a-z0-9.\-]+[.]{tld}/)(?:[^\s()<>{{}}\[\]]+|{BALANCED_PARENS})+(?:{BALANCED_PARENS}|[^\s`!()\[\]{{}};:'".,<>?«»“”‘’])"#
    );
    let bare_domain = format!(r"(?:[a-z0-9]+(?:[.\-][a-z0-9]+)*[.]{tld}\b/?)");

    PatternTable::new(EntityKind::Link, TABLE_VERSION)
        .with_pattern("url", format!(r"(?i)\b(?:{with_path}|{bare_domain})"))
}

/// Rejeita spans imediatamente precedidos ou seguidos de `@`.
pub fn not_next_to_at(normalized: &str, span: &RawSpan) -> bool {
    let bytes = normalized.as_bytes();
    let before = span.start.checked_sub(1).and_then(|i| bytes.get(i));
    let after = bytes.get(span.end);
    before != Some(&b'@') && after != Some(&b'@')
}

/// Mantém só tokens com ao menos [`MIN_ALPHA_LEN`] letras ASCII, todas
/// minúsculas ou todas maiúsculas.
pub fn is_link_token(token: &str) -> bool {
    let letters: Vec<char> = token.chars().filter(char::is_ascii_alphabetic).collect();
    if letters.len() < MIN_ALPHA_LEN {
        return false;
    }
    letters.iter().all(char::is_ascii_lowercase) || letters.iter().all(char::is_ascii_uppercase)
}

pub fn builder() -> DetectorBuilder {
    DetectorBuilder::new(pattern_table())
        .span_filter(not_next_to_at)
        .token_filter(is_link_token)
}

/// Detector LINK com a configuração padrão.
pub fn detector() -> Result<Detector> {
    builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<usize> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let tags = vec!["O"; tokens.len()];
        detector().unwrap().match_indices(text, &tokens, &tags).unwrap()
    }

    #[test]
    fn test_short_domain_is_rejected() {
        let tokens = ["go", "to", "ab.co", "now"];
        let tags = ["O"; 4];
        let got = detector()
            .unwrap()
            .match_indices("go to ab.co now", &tokens, &tags)
            .unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_protocol_and_bare_links() {
        assert_eq!(run("see https://example.org/docs/index.html for more"), vec![1]);
        assert_eq!(run("visit www.google.com/?search now"), vec![1]);
        assert_eq!(run("mirror at downloads.example.net"), vec![2]);
    }

    #[test]
    fn test_mixed_case_token_is_rejected() {
        assert!(run("see Example.com today").is_empty());
        assert_eq!(run("see EXAMPLE.COM today"), vec![1]);
    }

    #[test]
    fn test_email_domain_is_not_a_link() {
        assert!(run("contact john.doe@example.com now").is_empty());
    }

    #[test]
    fn test_unknown_tld_is_not_a_link() {
        assert!(run("open readme.txtfile please").is_empty());
    }

    #[test]
    fn test_upper_and_lower_case_agree() {
        let text = "docs at https://docs.example.org/guide today";
        assert_eq!(run(&text.to_uppercase()), run(&text.to_lowercase()));
        assert_eq!(run(text), vec![2]);
    }

    #[test]
    fn test_is_link_token() {
        assert!(is_link_token("www.google.com"));
        assert!(is_link_token("WWW.GOOGLE.COM"));
        assert!(!is_link_token("Google.com"));
        assert!(!is_link_token("ab.co"));
        assert!(!is_link_token("1234.56"));
    }

    #[test]
    fn test_not_next_to_at() {
        let text = "a@example.com";
        let span = RawSpan { start: 2, end: 13, text: "example.com".into() };
        assert!(!not_next_to_at(text, &span));
        let span = RawSpan { start: 0, end: 1, text: "a".into() };
        assert!(!not_next_to_at(text, &span));
        let text = "example.com";
        let span = RawSpan { start: 0, end: 11, text: "example.com".into() };
        assert!(not_next_to_at(text, &span));
    }

    #[test]
    fn test_path_url_after_at_is_rejected() {
        assert!(run("see user@example.com/path now").is_empty());
    }
}

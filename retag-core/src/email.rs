//! # Família MAIL
//!
//! Um único padrão derivado da RFC 5322 ("almost perfect email regex"):
//! parte local com átomos separados por ponto ou string entre aspas, e
//! domínio por nome ou IP literal entre colchetes.
//!
//! O texto já chega em minúsculas, então o padrão só lista `a-z`.

use crate::detector::{Detector, DetectorBuilder};
use crate::error::Result;
use crate::patterns::PatternTable;
use crate::tags::EntityKind;

pub const TABLE_VERSION: &str = "1";

const LOCAL_ATOM: &str = r"[a-z0-9!#$%\&'*+/=?^_`{|}\~\-]+";
const QUOTED_LOCAL: &str =
    r#""(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*""#;
const DOMAIN_NAME: &str = r"(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?";
const IP_OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
const GENERAL_LITERAL: &str =
    r"[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+";

/// Tabela padrão da família MAIL.
pub fn pattern_table() -> PatternTable {
    let local = format!("(?:{LOCAL_ATOM}(?:\\.{LOCAL_ATOM})*|{QUOTED_LOCAL})");
    let domain = format!(
        r"(?:{DOMAIN_NAME}|\[(?:{IP_OCTET}\.){{3}}(?:{IP_OCTET}|{GENERAL_LITERAL})\])"
    );

    PatternTable::new(EntityKind::Mail, TABLE_VERSION).with_pattern("rfc5322", format!("{local}@{domain}"))
}

pub fn builder() -> DetectorBuilder {
    DetectorBuilder::new(pattern_table())
}

/// Detector MAIL com a configuração padrão.
pub fn detector() -> Result<Detector> {
    builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, tags: &[&str]) -> Vec<usize> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        detector().unwrap().match_indices(text, &tokens, tags).unwrap()
    }

    #[test]
    fn test_simple_address() {
        let tokens = ["contact", "john.doe@example.com", "now"];
        let tags = ["O", "O", "O"];
        let got = detector()
            .unwrap()
            .match_indices("contact john.doe@example.com now", &tokens, &tags)
            .unwrap();
        assert_eq!(got, vec![1]);
    }

    #[test]
    fn test_several_addresses() {
        let text = "mailto: john.doe@gmail.com from: jane_doe+news@mail.outlook.co.uk";
        assert_eq!(run(text, &["O"; 4]), vec![1, 3]);
    }

    #[test]
    fn test_bracketed_ip_domain() {
        assert_eq!(run("root@[192.168.0.1] says hi", &["O"; 3]), vec![0]);
    }

    #[test]
    fn test_upper_case_is_normalized() {
        let lower = run("write to ops@example.org today", &["O"; 4]);
        let upper = run("WRITE TO OPS@EXAMPLE.ORG TODAY", &["O"; 4]);
        assert_eq!(lower, vec![2]);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_existing_tag_wins() {
        assert!(run("ping a@b.io", &["O", "LINK"]).is_empty());
    }

    #[test]
    fn test_no_address() {
        assert!(run("no at sign here", &["O"; 4]).is_empty());
        assert!(run("dangling@ sign", &["O"; 2]).is_empty());
    }
}

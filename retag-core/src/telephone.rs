//! # Família TEL
//!
//! Vinte variantes de padrão, deliberadamente permissivas e sobrepostas:
//!
//! - agrupamentos genéricos estilo NANP e internacionais com código de país;
//! - as mesmas formas ancoradas no texto inteiro (`^...$`), para quando a
//!   "frase" é só o número;
//! - formatos específicos de EUA, Reino Unido, Canadá, Brasil, China,
//!   Alemanha, Índia, Indonésia, Japão e Rússia.
//!
//! Quase todos aceitam um rótulo opcional antes do número ("tel:", "phone",
//! "fax to:", "mobile", "direct", "t.", "f", ...). O rótulo faz parte do
//! span, então o token do rótulo também recebe `TEL`.
//!
//! Várias variantes disparam sobre os mesmos dígitos; o resolvedor une os
//! spans e a duplicação some ali.

use crate::detector::{Detector, DetectorBuilder};
use crate::error::Result;
use crate::patterns::PatternTable;
use crate::tags::EntityKind;

pub const TABLE_VERSION: &str = "1";

const BEG: &str = r"(?:\s|^)(";
const END: &str = r")(?:\s|$)";
const LINE_START: &str = r"^(";
const LINE_END: &str = r")$";
const SEPARATOR: &str = r"(\s|-)";

/// Rótulo que costuma preceder o número. Alternativas mais longas primeiro.
const LABEL: &str = concat!(
    r"(?:telephone\s:\s|telephone\s:|telephone:\s|telephone\s|telephone\.\s|telephone",
    r"|tel\s:\s|tel\s:|tel:\s|tel\s|tel\.\s|tel\+|tel",
    r"|phone\s:\s|phone\s:|phone:\s|phone\s|phone\.\s|phone",
    r"|cell\s:\s|cell\s:|cell:\s|cell\s|cell\.\s|cell",
    r"|direct\s:\s|direct\s:|direct:\s|direct\s|direct\.\s|direct",
    r"|mobile\s:\s|mobile\s:|mobile:\s|mobile\s|mobile\.\s|mobile",
    r"|number\s:\s|number\s:|number:\s|number\.\s",
    r"|fax\sto\s:\s|fax\sto:\s|fax\s:\s|fax\s:|fax:\s|fax\s|fax\.\s|fax\+|fax",
    r"|facsimile\s:\s|facsimile\s:|facsimile:\s|facsimile\s|facsimile\.\s|facsimile",
    r"|f\s:\s|f\s:|f:\s|f\s|f\.\s|f",
    r"|t\s:\s|t\s:|t:\s|t\s|t\.\s|t)",
);

const COUNTRY_CODE: &str = concat!(
    r"\+?(9[976]\d|8[987530]\d|6[987]\d|5[90]\d|42\d|3[875]\d|2[98654321]\d",
    r"|9[8543210]|8[6421]|6[6543210]|5[87654321]|4[987654310]|3[9643210]|2[70]|7|1)",
);

const NANP_SPACED: &str = concat!(
    r"(?:(?:\+?([1-9]|[0-9]|[0-9][0-9])\s(?:[.-]\s)?)?",
    r"(?:(\s([2-9]1[02-9]|[02-8]1|[02-8][02-9])\s)|([1-9]|[0-9]1[02-9]|[02-8]1|[02-8][02-9]))",
    r"\s(?:[.-]\s)?)?",
    r"([2-9]1[02-9]|[02-9]1|[02-9]{2})\s(?:[.-]\s)?([0-9]{4})",
    r"(?:\s(?:#|x.?|ext.?|extension)\s(\d+))?",
);

/// Só no fim do texto ou da linha.
const BRAZIL: &str = r"\(?\s*(\d{2})\s*\)?\s*(9?\d{4})[\s-]?(\d{4})(?:$|\n)";

const CANADA: &str = concat!(
    r"(?:(?:\+?1\s*(?:[.-]\s*)?)?",
    r"(?:\(\s*([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9])\s*\)",
    r"|([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9]))\s*(?:[.-]\s*)?)?",
    r"([2-9]1[02-9]|[2-9][02-9]1|[2-9][02-9]{2})\s*(?:[.-]\s*)?([0-9]{4})",
    r"(?:\s*(?:#|x\.?|ext\.?|extension)\s*(\d+))?",
);

const CHINA_PREFIXED: &str = r"(13[0-9]|14[57]|15[012356789]|17[0678]|18[0-9])[0-9]{8}";
const CHINA_MOBILE: &str = r"(?:1[34578][012356789]\d{8}|134[012345678]\d{7})";
const GERMANY: &str = r"([+][0-9]{1,3}[.\-])?([(][0-9]{1,6}[)])?([0-9 .\-/]{3,20})((x|ext|extension)\s?[0-9]{1,4})?";
const INDIA: &str = r"(?:\+?(?:0-+|91)?(?:\d{12}|\d{10})|\d{5}-*\d{6})";
const INDONESIA: &str = r"\(?(?:\+62|62|0)(?:\d{2,3})?\)?[.-]?\d{2,4}[.-]?\d{2,4}[.-]?\d{2,4}";
const JAPAN: &str = r"(?:\d{10}|\d{3}-\d{3}-\d{4}|\d{2}-\d{4}-\d{4}|\d{3}-\d{4}-\d{4})";
const RUSSIA: &str = r"(?:\+7|7|8)[0-9]{10}";
const US: &str = r"1?\W*([2-9][0-8][0-9])\W*([2-9][0-9]{2})\W*([0-9]{4})(\se?x?t?(\d*))?";

const UK: &str = concat!(
    r"(?:(?:\(?(?:0(?:0|11)\)?[\s-]?\(?|\+)44\)?[\s-]?(?:\(?0\)?[\s-]?)?)|(?:\(?0))",
    r"(?:(?:\d{5}\)?[\s-]?\d{4,5})|(?:\d{4}\)?[\s-]?(?:\d{5}|\d{3}[\s-]?\d{3}))",
    r"|(?:\d{3}\)?[\s-]?\d{3}[\s-]?\d{3,4})|(?:\d{2}\)?[\s-]?\d{4}[\s-]?\d{4}))",
    r"(?:[\s-]?(?:x|ext\.?|#)\d{3,4})?",
);

/// Número cercado por espaço ou borda do texto, com rótulo opcional.
fn labelled(body: &str) -> String {
    format!("{BEG}{LABEL}?{body}{END}")
}

/// Número que ocupa o texto inteiro, sem rótulo.
fn whole_text(body: &str) -> String {
    format!("{LINE_START}{body}{LINE_END}")
}

/// Tabela padrão da família TEL.
pub fn pattern_table() -> PatternTable {
    let groups_2_4 = format!(r"{COUNTRY_CODE}{SEPARATOR}\d{{2,4}}{SEPARATOR}\d{{2,4}}{SEPARATOR}\d{{2,4}}");
    let groups_4_6 = format!(r"{COUNTRY_CODE}{SEPARATOR}\d{{4,6}}{SEPARATOR}\d{{4,6}}");
    let long_run = format!(r"{COUNTRY_CODE}{SEPARATOR}\d{{5,14}}");
    let area_7 = format!(r"{COUNTRY_CODE}{SEPARATOR}\d{{2}}{SEPARATOR}\d{{7}}");

    PatternTable::new(EntityKind::Tel, TABLE_VERSION)
        .with_pattern("nanp_spaced", labelled(NANP_SPACED))
        .with_pattern("intl_groups_2_4", labelled(&groups_2_4))
        .with_pattern("intl_groups_4_6", labelled(&groups_4_6))
        .with_pattern("intl_long_run", labelled(&long_run))
        .with_pattern("intl_area_7", labelled(&area_7))
        .with_pattern("whole_groups_2_4", whole_text(&groups_2_4))
        .with_pattern("whole_groups_4_6", whole_text(&groups_4_6))
        .with_pattern("whole_area_7", whole_text(&area_7))
        .with_pattern("whole_long_run", whole_text(&long_run))
        .with_pattern("brazil", labelled(BRAZIL))
        .with_pattern("canada", labelled(CANADA))
        .with_pattern("china_prefixed", labelled(CHINA_PREFIXED))
        .with_pattern("china_mobile", labelled(CHINA_MOBILE))
        // forma livre demais para dispensar o rótulo: sem ele casaria datas
        .with_pattern("germany", format!("{BEG}{LABEL}{GERMANY}{END}"))
        .with_pattern("india", labelled(INDIA))
        .with_pattern("indonesia", labelled(INDONESIA))
        .with_pattern("japan", labelled(JAPAN))
        .with_pattern("russia", labelled(RUSSIA))
        .with_pattern("us", labelled(US))
        .with_pattern("uk", labelled(UK))
}

pub fn builder() -> DetectorBuilder {
    DetectorBuilder::new(pattern_table())
}

/// Detector TEL com a configuração padrão.
pub fn detector() -> Result<Detector> {
    builder().build()
}

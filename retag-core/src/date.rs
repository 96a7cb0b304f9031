//! # Família DATE
//!
//! Datas numéricas e com nome do mês, em várias ordens:
//!
//! | Forma                         | Exemplos                          |
//! |-------------------------------|-----------------------------------|
//! | dia / mês / ano               | 12/05/2023, 12 - 05 - 23          |
//! | mês / dia / ano               | 05.12.2023                        |
//! | ano / mês / dia               | 2023-05-12                        |
//! | dia + nome do mês + ano       | 3rd of march 2021, 12-may-23      |
//! | nome do mês + dia + ano       | march 3rd, 2021                   |
//! | intervalo de dias             | 12-14 may 2023                    |
//! | formas curtas                 | 12/05, may-12                     |
//!
//! Todas aceitam hora (`14:30`) e fuso (`gmt`, `cet`, `cest`) opcionais no
//! fim. Alguns erros de OCR frequentes fazem parte do vocabulário (`0ct`,
//! `n0v`, `janijary`, `o` no lugar de `0` nos dias).
//!
//! O detector aceita frases de exclusão (vazias por padrão): se qualquer uma
//! aparecer no texto, nenhuma data é marcada naquela chamada.

use crate::detector::{Detector, DetectorBuilder};
use crate::error::Result;
use crate::patterns::PatternTable;
use crate::tags::EntityKind;

pub const TABLE_VERSION: &str = "1";

const SHORT_MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec|0ct|n0v";
const LONG_MONTHS: &str = "january|february|march|april|may|june|july|august|september\
                           |october|november|december|janijary";
const MONTH_NUMBER: &str = "(0?[1-9]|1[0-2])";
const DAYS: &str = "([12][o0-9]|3[o01]|[o0]?[1-9])";
const ORDINAL: &str = "(st|nd|rd|th|tm)";
const YEARS: &str = "(0[1-9]|[1-9][0-9]|19[0-9][0-9]|20[0-9][0-9])";
const YEARS4: &str = "(19[0-9][0-9]|20[0-9][0-9])";
const HOUR: &str = r"(([0-1][0-9]|2[0-3])\s?:\s?([0-5][0-9]))?";
const TIME_ZONE: &str = "(cest|cet|gmt)?";
const BEG: &str = r"(?:\s|^)(";
const END: &str = r")(?:\s|$)";
const WS: &str = r"\s?";
const SEP: &str = r"\s?[\s\.,/-]\s?";
const DASH: &str = "(/|-)";

/// Tabela padrão da família DATE.
pub fn pattern_table() -> PatternTable {
    let months = format!("({LONG_MONTHS}|{SHORT_MONTHS})");
    let all_months = format!("({months}|{MONTH_NUMBER})");
    // hora e fuso opcionais que fecham as formas completas
    let clock = format!("{WS}{HOUR}{WS}{TIME_ZONE}{WS}");

    PatternTable::new(EntityKind::Date, TABLE_VERSION)
        // 12 may 2023, 3rd of march 21, 12-may-2023, 12 may, 2023
        .with_pattern(
            "day_month_name_year",
            format!(
                r"{BEG}{DAYS}{WS}{ORDINAL}?\s?(-|\.|of)?\s?{months}[a-y]{{0,6}}\s?(-|\.|,|of)?\s?{YEARS}{clock}{END}"
            ),
        )
        // march 3rd, 2021, may - 12 - 23, may 12 of 2023
        .with_pattern(
            "month_name_day_year",
            format!(
                r"{BEG}{months}[a-y]{{0,6}}\s?[-\.]?\s?{DAYS}{WS}{ORDINAL}?\s?(,|\.|\s|of|-)\s?{YEARS}{clock}{END}"
            ),
        )
        // 12/05/2023, 12 - 05 - 2023, 12.05.23
        .with_pattern(
            "day_month_year_numeric",
            format!("{BEG}{DAYS}{SEP}{MONTH_NUMBER}{SEP}{YEARS}{clock}{END}"),
        )
        // 05/12/2023
        .with_pattern(
            "month_day_year_numeric",
            format!("{BEG}{MONTH_NUMBER}{SEP}{DAYS}{SEP}{YEARS}{clock}{END}"),
        )
        // 2023-05-12, 2023/5/12
        .with_pattern(
            "year_month_day",
            format!("{BEG}{YEARS4}{SEP}{MONTH_NUMBER}{SEP}{DAYS}{clock}{END}"),
        )
        // 12-may-23
        .with_pattern(
            "day_month_name_year_separated",
            format!("{BEG}{DAYS}{SEP}{months}{SEP}{YEARS}{clock}{END}"),
        )
        // 12-14-may-2023
        .with_pattern(
            "day_range_month_name_year",
            format!("{BEG}{DAYS}{SEP}{DAYS}{SEP}{months}{SEP}{YEARS}{clock}{END}"),
        )
        // 12may2023
        .with_pattern(
            "compact_day_month_name_year",
            format!("{BEG}{DAYS}{WS}{months}{WS}{YEARS}{clock}{END}"),
        )
        // 12th / may / 2023
        .with_pattern(
            "ordinal_day_month_name_year",
            format!("{BEG}{DAYS}{WS}{ORDINAL}{SEP}{months}{SEP}{YEARS}{clock}{END}"),
        )
        // 12/05, 12-may
        .with_pattern("short_day_month", format!("{BEG}{DAYS}{DASH}{all_months}{END}"))
        // 05/12, may-12
        .with_pattern("short_month_day", format!("{BEG}{all_months}{DASH}{DAYS}{END}"))
}

/// Builder com a tabela padrão; use para configurar frases de exclusão.
pub fn builder() -> DetectorBuilder {
    DetectorBuilder::new(pattern_table())
}

/// Detector DATE com a configuração padrão (sem frases de exclusão).
pub fn detector() -> Result<Detector> {
    builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::join_tokens;

    fn run(detector: &Detector, text: &str) -> Vec<usize> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let tags = vec!["O"; tokens.len()];
        detector.match_indices(&join_tokens(&tokens), &tokens, &tags).unwrap()
    }

    #[test]
    fn test_numeric_date() {
        let detector = detector().unwrap();
        let tokens = ["meet", "on", "12/05/2023", "please"];
        let tags = ["O"; 4];
        let got = detector
            .match_indices("meet on 12/05/2023 please", &tokens, &tags)
            .unwrap();
        assert_eq!(got, vec![2]);
    }

    #[test]
    fn test_month_name_with_ordinal() {
        let detector = detector().unwrap();
        assert_eq!(run(&detector, "The meeting is on March 3rd, 2021 at noon"), vec![4, 5, 6]);
        assert_eq!(run(&detector, "signed 3rd of march 2021 by"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_time_and_zone_are_part_of_the_date() {
        let detector = detector().unwrap();
        assert_eq!(run(&detector, "sent 12/05/2023 14:30 gmt by bob"), vec![1, 2, 3]);
    }

    #[test]
    fn test_iso_and_short_forms() {
        let detector = detector().unwrap();
        assert_eq!(run(&detector, "released 2023-05-12 worldwide"), vec![1]);
        assert_eq!(run(&detector, "due 12/05 next"), vec![1]);
        assert_eq!(run(&detector, "due may-12 next"), vec![1]);
    }

    #[test]
    fn test_plain_numbers_are_not_dates() {
        let detector = detector().unwrap();
        assert!(run(&detector, "we sold 1500 units in 42 stores").is_empty());
    }

    #[test]
    fn test_upper_and_lower_case_agree() {
        let detector = detector().unwrap();
        let text = "Signed On 12 May 2023 At Noon";
        assert_eq!(
            run(&detector, &text.to_uppercase()),
            run(&detector, &text.to_lowercase())
        );
        assert_eq!(run(&detector, &text.to_lowercase()), vec![2, 3, 4]);
    }

    #[test]
    fn test_existing_tags_are_kept() {
        let detector = detector().unwrap();
        let tokens = ["meet", "on", "12", "may", "2023"];
        let tags = ["O", "O", "O", "MONEY", "O"];
        let got = detector.match_indices("meet on 12 may 2023", &tokens, &tags).unwrap();
        assert_eq!(got, vec![2, 4]);
    }

    #[test]
    fn test_skip_phrases() {
        let plain = detector().unwrap();
        let guarded = builder().skip_phrases(["Valid Until"]).build().unwrap();
        let text = "valid until 12/05/2023";
        assert_eq!(run(&plain, text), vec![2]);
        assert!(run(&guarded, text).is_empty());
        assert_eq!(run(&guarded, "issued 12/05/2023"), vec![1]);
    }

    #[test]
    fn test_idempotent() {
        let detector = detector().unwrap();
        let text = "from 12/05/2023 to 2023-06-01";
        assert_eq!(run(&detector, text), run(&detector, text));
        assert_eq!(run(&detector, text), vec![1, 3]);
    }

    #[test]
    fn test_pattern_order_does_not_matter() {
        let forward = detector().unwrap();
        let mut table = pattern_table();
        table.patterns.reverse();
        let backward = builder().table(table).build().unwrap();

        for text in [
            "meet on 12/05/2023 please",
            "march 3rd, 2021 and 2021-03-04 or 4/5",
            "between 12-14 may 2023 only",
        ] {
            assert_eq!(run(&forward, text), run(&backward, text), "{text}");
        }
    }
}

//! # Tabelas de Padrões
//!
//! Cada família de entidade é configurada por uma tabela ordenada de regex.
//! A tabela é **dado**, não código: tem versão, serializa para JSON e pode ser
//! trocada inteira sem tocar no alinhador nem no resolvedor.
//!
//! ```json
//! {
//!   "entity": "MAIL",
//!   "version": "1",
//!   "patterns": [{ "name": "rfc5322", "regex": "..." }]
//! }
//! ```
//!
//! A compilação usa o crate `regex`, cujo motor de autômatos garante tempo de
//! busca linear no tamanho do texto. Padrões cheios de alternâncias não podem
//! explodir em backtracking; o único limite que resta configurar é o tamanho
//! do programa compilado.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};
use crate::tags::EntityKind;

/// Limite padrão para o programa compilado de cada regex (64 MiB).
///
/// As classes `\d`, `\s` e `\b` são Unicode; repetições como `\d{5,14}`
/// crescem rápido e passam do limite de 10 MiB do `regex`.
pub const DEFAULT_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Um padrão nomeado, ainda não compilado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Nome curto usado em logs e erros (ex: "day_month_year_numeric")
    pub name: String,
    /// Expressão no dialeto do crate `regex`
    pub regex: String,
}

/// Tabela ordenada de padrões de uma família.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTable {
    pub entity: EntityKind,
    pub version: String,
    pub patterns: Vec<PatternSpec>,
}

impl PatternTable {
    pub fn new(entity: EntityKind, version: impl Into<String>) -> Self {
        Self {
            entity,
            version: version.into(),
            patterns: Vec::new(),
        }
    }

    /// Acrescenta um padrão no fim da tabela.
    pub fn with_pattern(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.patterns.push(PatternSpec {
            name: name.into(),
            regex: regex.into(),
        });
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compila todos os padrões, na ordem da tabela.
    ///
    /// Falha no primeiro padrão inválido: um detector com tabela parcial
    /// nunca chega a existir.
    pub fn compile(&self, size_limit: usize) -> Result<Vec<CompiledPattern>> {
        self.patterns
            .iter()
            .map(|spec| {
                RegexBuilder::new(&spec.regex)
                    .size_limit(size_limit)
                    .build()
                    .map(|regex| CompiledPattern {
                        name: spec.name.clone(),
                        regex,
                    })
                    .map_err(|source| NerError::PatternCompile {
                        entity: self.entity,
                        name: spec.name.clone(),
                        source,
                    })
            })
            .collect()
    }
}

/// Padrão pronto para busca. Imutável depois de construído.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    name: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn new(name: impl Into<String>, regex: Regex) -> Self {
        Self {
            name: name.into(),
            regex,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

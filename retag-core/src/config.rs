//! Configuração do motor de re-etiquetagem.
//!
//! Tudo é dado: ordem de prioridade, frases de exclusão de datas, limites e
//! tabelas de padrões substitutas. A biblioteca não lê arquivos; quem tem o
//! JSON em mãos chama [`EngineConfig::from_json`].
//!
//! ```json
//! {
//!   "priority": ["MAIL", "DATE", "LINK", "TEL"],
//!   "date_skip_phrases": ["valid until"],
//!   "max_input_bytes": 65536
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{NerError, Result};
use crate::patterns::{PatternTable, DEFAULT_SIZE_LIMIT};
use crate::tags::EntityKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordem em que os detectores rodam; o primeiro a marcar um token fica com ele
    pub priority: Vec<EntityKind>,
    pub date_skip_phrases: Vec<String>,
    /// Textos maiores que isto são rejeitados com erro (sem limite se `None`)
    pub max_input_bytes: Option<usize>,
    pub regex_size_limit: usize,
    /// Tabelas que substituem as embutidas, no máximo uma por família
    pub tables: Vec<PatternTable>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            priority: EntityKind::ALL.to_vec(),
            date_skip_phrases: Vec::new(),
            max_input_bytes: None,
            regex_size_limit: DEFAULT_SIZE_LIMIT,
            tables: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Lê e valida uma configuração em JSON. Campos ausentes usam o padrão.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejeita famílias repetidas na prioridade e tabelas repetidas.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for kind in &self.priority {
            if !seen.insert(*kind) {
                return Err(NerError::DuplicatePriority(*kind));
            }
        }

        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.entity) {
                return Err(NerError::DuplicateTable(table.entity));
            }
        }
        Ok(())
    }

    /// Tabela substituta configurada para a família, se houver.
    pub fn table_for(&self, kind: EntityKind) -> Option<&PatternTable> {
        self.tables.iter().find(|table| table.entity == kind)
    }
}

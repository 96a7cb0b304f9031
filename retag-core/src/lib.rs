//! # retag-core — Re-etiquetagem de Entidades Estruturadas
//!
//! Este crate roda **depois** de um tagger NER estatístico. O tagger entrega
//! uma frase tokenizada com uma tag por token; aqui, detectores baseados em
//! expressões regulares encontram entidades de forma previsível (datas,
//! e-mails, links e telefones) e marcam os tokens que ainda estão livres.
//!
//! ## Arquitetura do Sistema
//!
//! Cada detector é o mesmo motor ([`detector`]) configurado com uma tabela de
//! padrões ([`patterns`]) e, opcionalmente, filtros próprios da família:
//!
//! 1.  **Normalização** ([`matcher`]): o texto é aparado e vai para minúsculas ASCII.
//! 2.  **Busca** ([`matcher`]): todos os padrões rodam sobre o texto; cada
//!     casamento vira um span de bytes `[start, end)`.
//! 3.  **Alinhamento** ([`align`]): o mapa de offsets diz a qual token
//!     pertence cada byte da reconstrução "tokens unidos por um espaço".
//! 4.  **Resolução** ([`resolver`]): spans viram índices de token; índices com
//!     tag diferente de `O` nunca são devolvidos.
//! 5.  **Saída**: índices ordenados. Quem grava o label é o chamador ou o
//!     [`pipeline`], que roda as quatro famílias em ordem de prioridade.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use retag_core::{EntityKind, RetagPipeline};
//!
//! // 1. Monta o pipeline com as tabelas embutidas
//! let pipeline = RetagPipeline::new().unwrap();
//!
//! // 2. Saída do tagger estatístico
//! let tokens = ["meet", "on", "12/05/2023", "please"];
//! let tags = ["O", "O", "O", "O"];
//!
//! // 3. Pergunta a uma família quais tokens ela marcaria
//! let indices = pipeline
//!     .detect(EntityKind::Date, "meet on 12/05/2023 please", &tokens, &tags)
//!     .unwrap();
//! assert_eq!(indices, vec![2]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: orquestrador com prioridade, eventos e modo em lote.
//! - [`date`], [`email`], [`link`], [`telephone`]: as quatro famílias.
//! - [`config`]: configuração serializável do motor.
//! - [`tokenizer`]: tokenização por espaços para quem não tem tagger.

pub mod align;
pub mod config;
pub mod date;
pub mod demo;
pub mod detector;
pub mod email;
pub mod error;
pub mod link;
pub mod matcher;
pub mod patterns;
pub mod pipeline;
pub mod resolver;
pub mod tags;
pub mod telephone;
pub mod tokenizer;

pub use config::EngineConfig;
pub use detector::{Detection, Detector, DetectorBuilder};
pub use error::{NerError, Result};
pub use patterns::{PatternSpec, PatternTable};
pub use pipeline::{Document, PipelineEvent, RetagPipeline};
pub use tags::{EntityKind, EntitySpan, TaggedToken, OUTSIDE};
pub use tokenizer::{Token, tokenize};

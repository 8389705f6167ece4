//! # conll-core — Conversão de Spans para CoNLL/BIO por Caractere
//!
//! Este crate transforma registros anotados por spans (offsets de caracteres) no
//! formato tabular por caractere usado para treinar modelos de rotulação de sequências.
//!
//! ## Arquitetura
//!
//! O dado flui por estágios simples, todos síncronos e em memória:
//!
//! 1.  **Entrada**: [`Record`]s (texto + camadas de spans), construídos em código ou lidos
//!     de JSON ([`read_records`]).
//! 2.  **Realinhamento** ([`realign`], opcional): compacta o texto com um [`Normalizer`] e
//!     corrige os offsets deslocados pelos caracteres removidos.
//! 3.  **Validação** ([`validate`]): spans da mesma chave não podem se sobrepor.
//! 4.  **Codificação** ([`bio`]): uma tag por caractere e por chave (`B-`, `O-`, `O`).
//! 5.  **Saída** ([`writer`]): linhas `caractere \t tags...`, registros separados por linha
//!     em branco, com remoção do arquivo parcial em caso de erro.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use conll_core::{to_conll_string_normalized, BertNormalizer, Record, Span};
//!
//! let records = vec![
//!     Record::new("AB CD").with_label("label1", vec![Span::new(0, 2, "X")]),
//! ];
//! let conll = to_conll_string_normalized(&records, &BertNormalizer::new()).unwrap();
//! assert_eq!(conll, "a\tB-X\nb\tO-X\nc\tO\nd\tO\n\n");
//! ```
//!
//! ## Módulos Principais
//!
//! - [`convert`]: pontos de entrada que escrevem em arquivo ou em memória.
//! - [`realign`]: recálculo de offsets após a normalização.
//! - [`corpus`]: registros de demonstração.

pub mod bio;
pub mod convert;
pub mod corpus;
pub mod error;
pub mod normalizer;
pub mod realign;
pub mod record;
pub mod validate;
pub mod writer;

pub use bio::{encode, BioSequences, CharTag};
pub use convert::{
    convert_to_conll, convert_to_conll_normalized, output_path, to_conll_string,
    to_conll_string_normalized, write_conll,
};
pub use error::{Error, Result};
pub use normalizer::{compact, BertNormalizer, Normalizer, WhitespaceNormalizer};
pub use realign::{realign_all, realign as realign_record};
pub use record::{read_records, LabelSet, Record, Span};
pub use validate::validate as validate_spans;

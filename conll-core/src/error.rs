//! # Erros da Conversão
//!
//! Toda falha de um registro aborta a conversão inteira: não existe sucesso parcial.

use thiserror::Error;

/// Resultado padrão das operações do crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Erros possíveis durante validação, realinhamento e escrita.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Dois spans da mesma chave de rótulo se sobrepõem.
    ///
    /// `record` carrega o registro serializado em JSON para diagnóstico.
    #[error("conflito de anotação na chave '{key}', dados: {record}")]
    LabelConflict { key: String, record: String },

    /// Span fora do intervalo `0 <= start < end <= len(text)`.
    #[error("span inválido [{start}, {end}) para texto de {len} caracteres, dados: {record}")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
        record: String,
    },

    /// Erro de sistema de arquivos (inclusive diretório de destino inexistente).
    #[error("erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    /// O normalizador externo falhou.
    #[error("falha na normalização: {0}")]
    Normalize(String),

    /// Erro ao ler ou serializar registros em JSON.
    #[error("erro de JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// `true` quando o erro é culpa dos dados de entrada (e não do ambiente).
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::LabelConflict { .. } | Error::InvalidSpan { .. })
    }
}

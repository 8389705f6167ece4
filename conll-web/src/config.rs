//! Configuração do servidor lida de variáveis de ambiente.

use std::path::PathBuf;

/// Endereço padrão de escuta.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `CONLL_ADDR`: endereço `host:porta` do servidor.
    pub addr: String,
    /// `CONLL_DATA_DIR`: diretório onde `/export` grava os arquivos. Precisa existir.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de consulta (variáveis vazias são
    /// ignoradas).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        Self {
            addr: get("CONLL_ADDR").unwrap_or(defaults.addr),
            data_dir: get("CONLL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}

//! # Normalizadores de Texto
//!
//! O realinhamento de offsets depende de uma função externa `normalize(text) -> text`,
//! normalmente o normalizador do tokenizador de sub-palavras usado no treino. Aqui ela é
//! representada pelo trait [`Normalizer`], implementado também para qualquer closure
//! `Fn(&str) -> String`.
//!
//! Depois de normalizado, o texto é **compactado**: todo espaço em branco restante é
//! removido (ver [`compact`]). É o texto compactado que vai para o arquivo CoNLL.
//!
//! ## Implementações
//!
//! - [`BertNormalizer`]: o normalizador BERT do crate `tokenizers` (limpeza de
//!   controles, espaçamento de ideogramas CJK, minúsculas e remoção de acentos).
//! - [`WhitespaceNormalizer`]: apenas colapsa sequências de espaços.
//!
//! O normalizador precisa ser monotônico (só remover caracteres, sem reordenar nem
//! expandir). Caso contrário os offsets realinhados ficam errados sem aviso.

use regex::Regex;
use tokenizers::normalizers::bert::BertNormalizer as WordPieceNormalizer;
use tokenizers::NormalizedString;

use crate::error::{Error, Result};

/// Capacidade externa de normalização de texto.
pub trait Normalizer {
    fn normalize(&self, text: &str) -> Result<String>;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, text: &str) -> Result<String> {
        Ok(self(text))
    }
}

/// Normaliza e remove todo espaço em branco do resultado.
pub fn compact<N: Normalizer + ?Sized>(normalizer: &N, text: &str) -> Result<String> {
    Ok(normalizer
        .normalize(text)?
        .split_whitespace()
        .collect::<String>())
}

/// Normalizador BERT (WordPiece) do `tokenizers`.
///
/// O padrão é o mesmo do `BertWordPieceTokenizer`: `clean_text`, `handle_chinese_chars`
/// e `lowercase` ligados, com remoção de acentos seguindo `lowercase`. Alguns caracteres
/// (ex: `'İ'`) viram mais de um caractere em minúsculas, o que quebra a monotonicidade.
#[derive(Debug, Clone, Default)]
pub struct BertNormalizer {
    inner: WordPieceNormalizer,
}

impl BertNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `strip_accents = None` segue `lowercase`.
    pub fn with_options(
        clean_text: bool,
        handle_chinese_chars: bool,
        strip_accents: Option<bool>,
        lowercase: bool,
    ) -> Self {
        Self {
            inner: WordPieceNormalizer::new(clean_text, handle_chinese_chars, strip_accents, lowercase),
        }
    }
}

impl Normalizer for BertNormalizer {
    fn normalize(&self, text: &str) -> Result<String> {
        let mut normalized = NormalizedString::from(text);
        tokenizers::Normalizer::normalize(&self.inner, &mut normalized)
            .map_err(|e| Error::Normalize(e.to_string()))?;
        Ok(normalized.get().to_string())
    }
}

/// Colapsa cada sequência de espaços em branco em um único `' '`.
#[derive(Debug, Clone)]
pub struct WhitespaceNormalizer {
    pattern: Regex,
}

impl Default for WhitespaceNormalizer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(r"\s+").expect("regex de espaços é válida"),
        }
    }
}

impl WhitespaceNormalizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Normalizer for WhitespaceNormalizer {
    fn normalize(&self, text: &str) -> Result<String> {
        Ok(self.pattern.replace_all(text, " ").into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_removes_all_whitespace() {
        let n = WhitespaceNormalizer::new();
        assert_eq!(compact(&n, " AB \t CD\n").unwrap(), "ABCD");
    }

    #[test]
    fn test_closure_is_normalizer() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(compact(&upper, "a b").unwrap(), "AB");
    }

    #[test]
    fn test_bert_clean_text_and_lowercase() {
        let n = BertNormalizer::new();
        assert_eq!(n.normalize("Olá\u{200b}\tMundo\u{0}").unwrap(), "ola mundo");
    }

    #[test]
    fn test_bert_strips_accents_with_lowercase() {
        let n = BertNormalizer::new();
        assert_eq!(n.normalize("São").unwrap(), "sao");
    }

    #[test]
    fn test_bert_removes_format_characters() {
        let n = BertNormalizer::new();
        assert_eq!(n.normalize("a\u{00ad}b").unwrap(), "ab");
    }

    #[test]
    fn test_bert_pads_chinese_chars() {
        let n = BertNormalizer::new();
        assert_eq!(n.normalize("BIO数据").unwrap(), "bio 数  据 ");
        assert_eq!(compact(&n, "BIO 数据").unwrap(), "bio数据");
    }

    #[test]
    fn test_bert_flags_can_be_disabled() {
        let n = BertNormalizer::with_options(false, false, Some(false), false);
        assert_eq!(n.normalize("AB 数\t").unwrap(), "AB 数\t");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let ws = WhitespaceNormalizer::new();
        let once = ws.normalize("a  b\n\n c").unwrap();
        assert_eq!(ws.normalize(&once).unwrap(), once);

        let bert = BertNormalizer::new();
        let once = compact(&bert, "这是 BIO  数据集\u{feff}转换").unwrap();
        assert_eq!(compact(&bert, &once).unwrap(), once);
    }
}

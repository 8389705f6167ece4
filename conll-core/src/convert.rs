//! # Conversão — Pontos de Entrada
//!
//! Orquestra os estágios: validação e codificação BIO de cada registro, escrita em
//! CoNLL e, opcionalmente, realinhamento prévio contra um normalizador.
//!
//! ```rust,no_run
//! use conll_core::{convert_to_conll, Record, Span};
//!
//! let records = vec![
//!     Record::new("这是一个测试").with_label("label1", vec![Span::new(0, 2, "ORG")]),
//! ];
//! let path = convert_to_conll(&records, "conlltest", "./data", ".txt")?;
//! println!("gerado em {}", path.display());
//! # Ok::<(), conll_core::Error>(())
//! ```
//!
//! A conversão é tudo-ou-nada: o primeiro registro inválido aborta o lote e, se um
//! arquivo estava sendo escrito, ele é removido.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bio::encode;
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::realign::realign_all;
use crate::record::Record;
use crate::writer::{ConllWriter, OutputFile};

/// Caminho de saída: `data_dir/(filename + suffix)`.
pub fn output_path(data_dir: impl AsRef<Path>, filename: &str, suffix: &str) -> PathBuf {
    data_dir.as_ref().join(format!("{}{}", filename, suffix))
}

/// Codifica e escreve todos os registros em `writer`. Retorna quantos foram escritos.
pub fn write_conll<W: Write>(records: &[Record], writer: W) -> Result<usize> {
    let mut conll = ConllWriter::new(writer);
    for (i, record) in records.iter().enumerate() {
        let sequences = encode(record)?;
        conll.write_record(&record.text, &sequences)?;
        debug!("registro {} escrito ({} caracteres)", i, sequences.len());
    }
    conll.flush()?;
    Ok(conll.records())
}

/// Converte para uma `String` em memória.
pub fn to_conll_string(records: &[Record]) -> Result<String> {
    let mut buf = Vec::new();
    write_conll(records, &mut buf)?;
    // O conteúdo vem de `&str` e separadores ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Converte os registros e grava em `data_dir/(filename + suffix)`.
///
/// O arquivo é criado ou sobrescrito; o diretório não é criado. Em caso de erro no meio
/// da escrita, o arquivo parcial é removido antes de o erro ser devolvido.
pub fn convert_to_conll(
    records: &[Record],
    filename: &str,
    data_dir: impl AsRef<Path>,
    suffix: &str,
) -> Result<PathBuf> {
    let path = output_path(data_dir, filename, suffix);
    let mut file = OutputFile::create(&path)?;
    let written = write_conll(records, &mut file)?;
    let path = file.commit()?;
    info!("{} registros convertidos em {}", written, path.display());
    Ok(path)
}

/// Realinha os registros contra `normalizer` e converte o resultado.
///
/// Todo o realinhamento (e portanto toda a validação) acontece antes de o arquivo ser
/// aberto. Em seguida os registros compactados seguem pelo caminho simples de
/// [`convert_to_conll`].
pub fn convert_to_conll_normalized<N: Normalizer + ?Sized>(
    records: &[Record],
    filename: &str,
    data_dir: impl AsRef<Path>,
    suffix: &str,
    normalizer: &N,
) -> Result<PathBuf> {
    let cleaned = realign_all(records, normalizer)?;
    convert_to_conll(&cleaned, filename, data_dir, suffix)
}

/// Versão em memória de [`convert_to_conll_normalized`].
pub fn to_conll_string_normalized<N: Normalizer + ?Sized>(
    records: &[Record],
    normalizer: &N,
) -> Result<String> {
    let cleaned = realign_all(records, normalizer)?;
    to_conll_string(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::demo_records;
    use crate::error::Error;
    use crate::normalizer::WhitespaceNormalizer;
    use crate::record::Span;
    use std::fs;

    fn column(content: &str, col: usize) -> Vec<String> {
        content
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.split('\t').nth(col).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_output_path_joins_filename_and_suffix() {
        assert_eq!(output_path("data", "train", ".conll"), Path::new("data").join("train.conll"));
    }

    #[test]
    fn test_end_to_end_with_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![Record::new("AB CD").with_label("k", vec![Span::new(0, 2, "X")])];
        let strip_spaces = |s: &str| s.replace(' ', "");

        let path = convert_to_conll_normalized(&records, "e2e", dir.path(), ".txt", &strip_spaces).unwrap();
        let content = fs::read_to_string(path).unwrap();

        assert_eq!(content, "A\tB-X\nB\tO-X\nC\tO\nD\tO\n\n");
        assert_eq!(content.lines().filter(|l| !l.is_empty()).count(), 4);
        assert_eq!(content.lines().filter(|l| l.is_empty()).count(), 1);
        assert_eq!(column(&content, 1), vec!["B-X", "O-X", "O", "O"]);
    }

    #[test]
    fn test_demo_corpus_layout() {
        let records = demo_records();
        let content = to_conll_string(&records[..2]).unwrap();
        let first: Vec<&str> = content.lines().take(3).collect();
        assert_eq!(first, vec!["这\tB-ORG\tB-Struct1", "是\tO-ORG\tO-Struct1", "一\tO\tO"]);
        // Dois registros, cada um seguido de uma linha em branco.
        let chars = records[0].char_len() + records[1].char_len();
        assert_eq!(content.lines().count(), chars + 2);
    }

    #[test]
    fn test_conflict_mid_file_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            Record::new("ok").with_label("k", vec![Span::new(0, 1, "A")]),
            Record::new("bad").with_label("k", vec![Span::new(0, 2, "A"), Span::new(1, 3, "B")]),
        ];
        let result = convert_to_conll(&records, "broken", dir.path(), ".txt");
        assert!(matches!(result, Err(Error::LabelConflict { .. })));
        assert!(!output_path(dir.path(), "broken", ".txt").exists());
    }

    #[test]
    fn test_conflict_overwrites_then_removes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), "old", "");
        fs::write(&path, "conteúdo anterior").unwrap();
        let records = vec![Record::new("ab").with_label("k", vec![Span::new(0, 2, "A"), Span::new(0, 1, "B")])];
        assert!(convert_to_conll(&records, "old", dir.path(), "").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_normalized_conflict_never_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![Record::new("a b c").with_label("k", vec![Span::new(0, 3, "A"), Span::new(2, 5, "B")])];
        let result = convert_to_conll_normalized(&records, "n", dir.path(), ".txt", &WhitespaceNormalizer::new());
        assert!(matches!(result, Err(Error::LabelConflict { .. })));
        assert!(!output_path(dir.path(), "n", ".txt").exists());
    }

    #[test]
    fn test_missing_directory_propagates_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let records = demo_records();
        let result = convert_to_conll(&records, "x", dir.path().join("nope"), ".txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_success_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), "twice", ".txt");
        fs::write(&path, "lixo\n").unwrap();
        let records = vec![Record::new("a").with_label("k", vec![])];
        convert_to_conll(&records, "twice", dir.path(), ".txt").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "a\tO\n\n");
    }

    #[test]
    fn test_string_variants_match() {
        let records = vec![Record::new("x  y").with_label("k", vec![Span::new(3, 4, "T")])];
        let plain = to_conll_string(&records).unwrap();
        assert_eq!(column(&plain, 1), vec!["O", "O", "O", "B-T"]);
        let normalized = to_conll_string_normalized(&records, &WhitespaceNormalizer::new()).unwrap();
        assert_eq!(normalized, "x\tO\ny\tB-T\n\n");
    }

    #[test]
    fn test_both_paths_reject_the_same_invalid_span() {
        let records = vec![Record::new("abc").with_label("k", vec![Span::new(2, 1, "X"), Span::new(1, 1, "Y")])];
        let identity = |s: &str| s.to_string();
        assert!(matches!(to_conll_string(&records), Err(Error::InvalidSpan { .. })));
        assert!(matches!(
            to_conll_string_normalized(&records, &identity),
            Err(Error::InvalidSpan { .. })
        ));
    }
}

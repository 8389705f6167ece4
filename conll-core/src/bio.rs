//! # Codificação BIO por Caractere
//!
//! Expande os spans de cada chave de rótulo em uma sequência de tags com exatamente
//! uma tag por caractere do texto.
//!
//! ## Esquema de Tags
//!
//! | Tag       | Significado                           |
//! |-----------|---------------------------------------|
//! | `B-TAG`   | primeiro caractere do span            |
//! | `O-TAG`   | demais caracteres do span             |
//! | `O`       | fora de qualquer span                 |
//!
//! Os caracteres internos usam o prefixo `O-` e não o `I-` do BIO convencional. Os
//! consumidores dos arquivos gerados dependem dessa string exata.

use std::fmt;

use crate::error::Result;
use crate::record::Record;
use crate::validate::{check_bounds, checked_spans};

/// Tag de um caractere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharTag {
    /// **Begin**: primeiro caractere de um span.
    Begin(String),
    /// **Interior**: qualquer caractere do span após o primeiro (renderizado como `O-TAG`).
    Interior(String),
    /// **Outside**: caractere fora de qualquer span.
    Outside,
}

impl CharTag {
    /// Representação textual da tag (ex: "B-PER", "O-PER", "O")
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parseia a representação textual. Retorna `None` para prefixos desconhecidos.
    pub fn from_label(label: &str) -> Option<Self> {
        if label == "O" {
            return Some(CharTag::Outside);
        }
        if let Some(tag) = label.strip_prefix("B-") {
            return Some(CharTag::Begin(tag.to_string()));
        }
        label
            .strip_prefix("O-")
            .map(|tag| CharTag::Interior(tag.to_string()))
    }

    pub fn is_outside(&self) -> bool {
        matches!(self, CharTag::Outside)
    }
}

impl fmt::Display for CharTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharTag::Begin(tag) => write!(f, "B-{}", tag),
            CharTag::Interior(tag) => write!(f, "O-{}", tag),
            CharTag::Outside => f.write_str("O"),
        }
    }
}

/// Sequências BIO de um registro, uma coluna por chave de rótulo.
///
/// Todas as colunas têm o mesmo comprimento: o número de caracteres do texto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioSequences {
    len: usize,
    columns: Vec<(String, Vec<CharTag>)>,
}

impl BioSequences {
    /// Número de caracteres (linhas) cobertos.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Chaves na ordem das colunas.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[CharTag]> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, tags)| tags.as_slice())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[CharTag])> {
        self.columns.iter().map(|(k, t)| (k.as_str(), t.as_slice()))
    }

    /// Tags do caractere `index`, uma por coluna.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &CharTag> + '_ {
        self.columns.iter().map(move |(_, tags)| &tags[index])
    }
}

/// Expande os spans de um registro em sequências BIO.
///
/// Para cada chave: ordena os spans, rejeita sobreposições com
/// [`Error::LabelConflict`](crate::Error::LabelConflict) e spans fora do texto com
/// [`Error::InvalidSpan`](crate::Error::InvalidSpan).
pub fn encode(record: &Record) -> Result<BioSequences> {
    let len = record.char_len();
    let mut columns = Vec::with_capacity(record.labels.len());

    for (key, spans) in record.labels.iter() {
        let sorted = checked_spans(record, key, spans)?;
        let mut tags = vec![CharTag::Outside; len];

        for span in &sorted {
            check_bounds(record, span, len)?;
            tags[span.start] = CharTag::Begin(span.tag.clone());
            for tag in &mut tags[span.start + 1..span.end] {
                *tag = CharTag::Interior(span.tag.clone());
            }
        }
        columns.push((key.to_string(), tags));
    }

    Ok(BioSequences { len, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::Span;

    fn labels(tags: &[CharTag]) -> Vec<String> {
        tags.iter().map(CharTag::label).collect()
    }

    #[test]
    fn test_tag_labels() {
        assert_eq!(CharTag::Outside.label(), "O");
        assert_eq!(CharTag::Begin("PER".into()).label(), "B-PER");
        assert_eq!(CharTag::Interior("LOC".into()).label(), "O-LOC");
    }

    #[test]
    fn test_tag_from_label() {
        assert_eq!(CharTag::from_label("O"), Some(CharTag::Outside));
        assert_eq!(CharTag::from_label("B-ORG"), Some(CharTag::Begin("ORG".into())));
        assert_eq!(CharTag::from_label("O-ORG"), Some(CharTag::Interior("ORG".into())));
        assert_eq!(CharTag::from_label("I-ORG"), None);
    }

    #[test]
    fn test_coverage_and_length() {
        let record = Record::new("abcdefg")
            .with_label("k", vec![Span::new(4, 7, "Y"), Span::new(0, 2, "X")]);
        let seqs = encode(&record).unwrap();
        assert_eq!(seqs.len(), 7);
        assert_eq!(
            labels(seqs.get("k").unwrap()),
            vec!["B-X", "O-X", "O", "O", "B-Y", "O-Y", "O-Y"]
        );
    }

    #[test]
    fn test_single_char_span_is_begin_only() {
        let record = Record::new("ab").with_label("k", vec![Span::new(1, 2, "Z")]);
        let seqs = encode(&record).unwrap();
        assert_eq!(labels(seqs.get("k").unwrap()), vec!["O", "B-Z"]);
    }

    #[test]
    fn test_keys_keep_insertion_order_and_are_independent() {
        // Mesmo intervalo em chaves diferentes não é conflito.
        let record = Record::new("这是一个测试")
            .with_label("label2", vec![Span::new(0, 2, "Struct1")])
            .with_label("label1", vec![Span::new(0, 2, "ORG")])
            .with_label("empty", vec![]);
        let seqs = encode(&record).unwrap();
        assert_eq!(seqs.keys().collect::<Vec<_>>(), vec!["label2", "label1", "empty"]);
        let row: Vec<String> = seqs.row(1).map(CharTag::label).collect();
        assert_eq!(row, vec!["O-Struct1", "O-ORG", "O"]);
        assert!(seqs.get("empty").unwrap().iter().all(CharTag::is_outside));
    }

    #[test]
    fn test_conflict_is_rejected() {
        let record = Record::new("abcdef")
            .with_label("k", vec![Span::new(0, 3, "A"), Span::new(2, 5, "B")]);
        assert!(matches!(encode(&record), Err(Error::LabelConflict { .. })));
    }

    #[test]
    fn test_out_of_range_span_is_rejected() {
        let record = Record::new("abc").with_label("k", vec![Span::new(1, 9, "A")]);
        assert!(matches!(
            encode(&record),
            Err(Error::InvalidSpan { start: 1, end: 9, len: 3, .. })
        ));
    }

    #[test]
    fn test_empty_text() {
        let record = Record::new("").with_label("k", vec![]);
        let seqs = encode(&record).unwrap();
        assert!(seqs.is_empty());
        assert_eq!(seqs.get("k").unwrap().len(), 0);
    }
}

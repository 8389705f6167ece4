//! # Modelo de Dados: Registros, Spans e Camadas de Rótulos
//!
//! Um [`Record`] é um documento a ser etiquetado: o texto bruto mais um conjunto de
//! camadas de anotação ([`LabelSet`]). Cada camada é identificada por uma chave
//! (ex: `"label1"`) e contém spans independentes das outras camadas.
//!
//! ## Formato JSON
//!
//! ```json
//! {"text": "这是一个测试", "labels": {"label1": [[0, 2, "ORG"]], "label2": [[0, 2, "Struct1"]]}}
//! ```
//!
//! Os offsets são **índices de caractere** (não de byte) e o intervalo é semiaberto:
//! `[0, 2, "ORG"]` cobre os caracteres 0 e 1.

use std::fmt;
use std::io::Read;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// Intervalo semiaberto `[start, end)` de caracteres com a tag associada.
///
/// Serializa como a tripla `[start, end, tag]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize, String)", into = "(usize, usize, String)")]
pub struct Span {
    /// Índice do caractere inicial (inclusivo)
    pub start: usize,
    /// Índice do caractere final (exclusivo)
    pub end: usize,
    /// Tag da entidade (ex: "ORG", "PER")
    pub tag: String,
}

impl Span {
    pub fn new(start: usize, end: usize, tag: impl Into<String>) -> Self {
        Self {
            start,
            end,
            tag: tag.into(),
        }
    }

    /// Número de caracteres cobertos.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<(usize, usize, String)> for Span {
    fn from((start, end, tag): (usize, usize, String)) -> Self {
        Self { start, end, tag }
    }
}

impl From<Span> for (usize, usize, String) {
    fn from(span: Span) -> Self {
        (span.start, span.end, span.tag)
    }
}

/// Mapeamento ordenado `chave -> spans`.
///
/// As chaves preservam a ordem da primeira inserção: essa ordem define a ordem das
/// colunas no arquivo CoNLL. Reinserir uma chave existente substitui seus spans sem
/// mudar a posição dela.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    layers: Vec<(String, Vec<Span>)>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere (ou substitui) os spans de uma chave. Retorna os spans anteriores, se havia.
    pub fn insert(&mut self, key: impl Into<String>, spans: Vec<Span>) -> Option<Vec<Span>> {
        let key = key.into();
        match self.layers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, spans)),
            None => {
                self.layers.push((key, spans));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Span]> {
        self.layers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, spans)| spans.as_slice())
    }

    /// Itera pelas camadas na ordem de inserção.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Span])> {
        self.layers.iter().map(|(k, s)| (k.as_str(), s.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(k, _)| k.as_str())
    }

    /// Todos os spans de todas as chaves.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.layers.iter().flat_map(|(_, s)| s.iter())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Span>)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Span>)>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for (key, spans) in iter {
            set.insert(key, spans);
        }
        set
    }
}

impl Serialize for LabelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layers.len()))?;
        for (key, spans) in &self.layers {
            map.serialize_entry(key, spans)?;
        }
        map.end()
    }
}

struct LabelSetVisitor;

impl<'de> Visitor<'de> for LabelSetVisitor {
    type Value = LabelSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("um objeto mapeando chaves de rótulo para listas de spans")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<LabelSet, A::Error> {
        let mut set = LabelSet::new();
        while let Some((key, spans)) = access.next_entry::<String, Vec<Span>>()? {
            set.insert(key, spans);
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(LabelSetVisitor)
    }
}

/// Um documento anotado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    #[serde(default)]
    pub labels: LabelSet,
}

impl Record {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            labels: LabelSet::new(),
        }
    }

    /// Builder: adiciona uma camada de rótulos.
    pub fn with_label(mut self, key: impl Into<String>, spans: Vec<Span>) -> Self {
        self.labels.insert(key, spans);
        self
    }

    /// Comprimento do texto em caracteres (a unidade dos offsets).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Representação JSON usada nas mensagens de erro.
    pub fn to_diagnostic(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Lê um array JSON de registros.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    Ok(serde_json::from_reader(reader)?)
}

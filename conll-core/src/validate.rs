//! # Validação de Spans
//!
//! Dentro de uma mesma chave de rótulo, dois spans não podem se sobrepor. Spans que
//! apenas se tocam (`a.end == b.start`) são válidos. Chaves diferentes nunca são
//! comparadas entre si.

use crate::error::{Error, Result};
use crate::record::{Record, Span};

/// Verifica se uma lista de spans **já ordenada por `start`** está livre de conflitos.
///
/// Compara apenas pares adjacentes: com a lista ordenada, qualquer sobreposição
/// aparece entre vizinhos.
pub fn validate(spans: &[Span]) -> bool {
    spans.windows(2).all(|pair| pair[0].end <= pair[1].start)
}

/// Cópia dos spans em ordem crescente de `start`.
///
/// A ordenação é estável: spans com o mesmo `start` mantêm a ordem original e ficam
/// adjacentes (e portanto são acusados como conflito).
pub fn sorted_spans(spans: &[Span]) -> Vec<Span> {
    let mut sorted = spans.to_vec();
    sorted.sort_by_key(|s| s.start);
    sorted
}

/// Ordena e valida os spans de uma chave, devolvendo a lista ordenada.
pub fn checked_spans(record: &Record, key: &str, spans: &[Span]) -> Result<Vec<Span>> {
    let sorted = sorted_spans(spans);
    if !validate(&sorted) {
        return Err(Error::LabelConflict {
            key: key.to_string(),
            record: record.to_diagnostic(),
        });
    }
    Ok(sorted)
}

/// Garante `start < end <= text_len`.
pub fn check_bounds(record: &Record, span: &Span, text_len: usize) -> Result<()> {
    if span.start < span.end && span.end <= text_len {
        Ok(())
    } else {
        Err(Error::InvalidSpan {
            start: span.start,
            end: span.end,
            len: text_len,
            record: record.to_diagnostic(),
        })
    }
}

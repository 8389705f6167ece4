//! # Realinhamento de Offsets após Normalização
//!
//! O normalizador pode remover caracteres (espaços, controles), deslocando todos os
//! offsets à direita da remoção. Este módulo recalcula os spans para que continuem
//! apontando para os mesmos caracteres no texto compactado.
//!
//! ## Algoritmo
//!
//! 1. Valida os spans de cada chave (mesma regra do encoder).
//! 2. Coleta todas as fronteiras (`start` e `end` de todos os spans de todas as chaves),
//!    ordenadas e sem repetição.
//! 3. Percorre as fronteiras da esquerda para a direita. Para cada trecho entre a
//!    fronteira anterior e a atual, o deslocamento acumulado cresce em
//!    `len(trecho) - len(compact(trecho))`.
//! 4. Cada span vira `(start - shift[start], end - shift[end], tag)`.
//!
//! ```text
//! texto:      A B ␣ C D          span [0, 2) "AB", span [3, 5) "CD"
//! fronteiras: 0   2   3   5
//! shift:      0   0   1   1
//! compactado: A B C D            span [0, 2) "AB", span [2, 4) "CD"
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::Result;
use crate::normalizer::{compact, Normalizer};
use crate::record::{LabelSet, Record, Span};
use crate::validate::{check_bounds, checked_spans};

/// Todas as posições de fronteira do conjunto de rótulos, em ordem crescente e únicas.
pub fn boundaries(labels: &LabelSet) -> Vec<usize> {
    labels
        .spans()
        .flat_map(|s| [s.start, s.end])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Deslocamento acumulado (em caracteres removidos) em cada fronteira.
///
/// `boundaries` precisa estar ordenado. Fronteiras além do fim do texto enxergam apenas
/// o que existe até o fim.
pub fn boundary_shifts<N: Normalizer + ?Sized>(
    text: &str,
    boundaries: &[usize],
    normalizer: &N,
) -> Result<BTreeMap<usize, usize>> {
    let chars: Vec<char> = text.chars().collect();
    let mut shifts = BTreeMap::new();
    let mut previous = 0;
    let mut cumulative = 0;

    for &position in boundaries {
        let from = previous.min(chars.len());
        let to = position.min(chars.len());
        let raw: String = chars[from..to].iter().collect();
        let cleaned = compact(normalizer, &raw)?;
        cumulative += (to - from).saturating_sub(cleaned.chars().count());
        shifts.insert(position, cumulative);
        previous = position;
    }
    Ok(shifts)
}

/// Reescreve um registro para o texto compactado, ajustando os offsets.
///
/// Spans precisam ser válidos no texto original (mesmas regras do encoder). Chaves sem
/// spans são mantidas (vazias). Spans válidos cujo conteúdo foi inteiramente removido
/// pela normalização são descartados.
pub fn realign<N: Normalizer + ?Sized>(record: &Record, normalizer: &N) -> Result<Record> {
    let len = record.char_len();
    let mut sorted = Vec::with_capacity(record.labels.len());
    for (key, spans) in record.labels.iter() {
        let checked = checked_spans(record, key, spans)?;
        for span in &checked {
            check_bounds(record, span, len)?;
        }
        sorted.push((key, checked));
    }

    let shifts = boundary_shifts(&record.text, &boundaries(&record.labels), normalizer)?;
    let shift_at = |position: usize| shifts.get(&position).copied().unwrap_or(0);

    let mut labels = LabelSet::new();
    for (key, spans) in sorted {
        let mut moved = Vec::with_capacity(spans.len());
        for span in spans {
            let start = span.start.saturating_sub(shift_at(span.start));
            let end = span.end.saturating_sub(shift_at(span.end));
            if start >= end {
                warn!(
                    "span [{}, {}) '{}' da chave '{}' desapareceu na normalização",
                    span.start, span.end, span.tag, key
                );
                continue;
            }
            moved.push(Span::new(start, end, span.tag));
        }
        labels.insert(key, moved);
    }

    let text = compact(normalizer, &record.text)?;
    debug!(
        "registro realinhado: {} -> {} caracteres",
        len,
        text.chars().count()
    );
    Ok(Record { text, labels })
}

/// Realinha todos os registros. O primeiro erro aborta o lote.
pub fn realign_all<N: Normalizer + ?Sized>(records: &[Record], normalizer: &N) -> Result<Vec<Record>> {
    records.iter().map(|r| realign(r, normalizer)).collect()
}

//! # Registros de Demonstração
//!
//! Pequeno conjunto de registros anotados por spans, usado pelos testes e pela
//! interface web.
//!
//! - Os dois primeiros são o exemplo clássico em chinês com duas camadas de rótulos.
//! - Os demais contêm espaços e servem para exercitar o realinhamento de offsets.

use crate::record::{Record, Span};

/// Texto do exemplo clássico (27 caracteres).
const CLASSIC_TEXT: &str = "这是一个测试数据集合，测试的是BIO数据集转换是否正常";

fn classic_record() -> Record {
    Record::new(CLASSIC_TEXT)
        .with_label(
            "label1",
            vec![Span::new(0, 2, "ORG"), Span::new(11, 17, "PER")],
        )
        .with_label(
            "label2",
            vec![Span::new(0, 2, "Struct1"), Span::new(11, 17, "Struct2")],
        )
}

/// Retorna os registros de demonstração.
pub fn demo_records() -> Vec<Record> {
    vec![
        classic_record(),
        classic_record(),
        // ===== COM ESPAÇOS (realinhamento) =====
        Record::new("O Hospital Albert Einstein fica em São Paulo.")
            .with_label(
                "entidades",
                vec![Span::new(2, 26, "ORG"), Span::new(35, 44, "LOC")],
            )
            .with_label("estrutura", vec![Span::new(0, 45, "FRASE")]),
        Record::new("Margareth  Dalcolmo\tpesquisou a Covid-19 na Fiocruz")
            .with_label(
                "entidades",
                vec![
                    Span::new(0, 19, "PER"),
                    Span::new(32, 40, "MISC"),
                    Span::new(44, 51, "ORG"),
                ],
            )
            .with_label("estrutura", vec![]),
    ]
}

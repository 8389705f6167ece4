//! Servidor web Axum para conversão de registros anotados em CoNLL/BIO

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use conll_core::{
    convert_to_conll, convert_to_conll_normalized, corpus::demo_records, to_conll_string,
    to_conll_string_normalized, BertNormalizer, Error, Record, WhitespaceNormalizer,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Config;

/// Estado compartilhado da aplicação
struct AppState {
    config: Config,
    filename_pattern: Regex,
}

impl AppState {
    fn new(config: Config) -> Self {
        Self {
            config,
            filename_pattern: Regex::new(r"^[A-Za-z0-9_.-]+$").expect("regex de nome de arquivo é válida"),
        }
    }

    /// Nome final `filename + suffix`, restrito a um único componente de caminho.
    fn checked_file_name(&self, filename: &str, suffix: &str) -> Option<String> {
        let name = format!("{}{}", filename, suffix);
        let valid = !filename.is_empty()
            && name != "."
            && name != ".."
            && self.filename_pattern.is_match(&name);
        valid.then_some(name)
    }
}

/// Normalizador aplicado antes da codificação.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NormalizerMode {
    /// Sem normalização: offsets usados como vieram.
    #[default]
    None,
    /// Limpeza estilo BERT (controles, CJK, minúsculas) + remoção de espaços.
    Bert,
    /// Apenas remoção de espaços.
    Whitespace,
}

#[derive(Deserialize)]
struct ConvertRequest {
    records: Vec<Record>,
    #[serde(default)]
    normalizer: Option<NormalizerMode>,
}

#[derive(Deserialize)]
struct ExportRequest {
    records: Vec<Record>,
    filename: String,
    #[serde(default)]
    suffix: String,
    #[serde(default)]
    normalizer: Option<NormalizerMode>,
}

#[derive(Serialize)]
struct ExportResponse {
    path: String,
    records: usize,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = config.addr.clone();
    info!("diretório de exportação: {}", config.data_dir.display());

    let app = router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!("🚀 Servidor CoNLL iniciado em http://{}", addr);
    axum::serve(listener, app).await
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/demo-records", get(demo_records_handler))
        .route("/convert", post(convert_handler))
        .route("/export", post(export_handler))
        .layer(cors)
        .with_state(state)
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Retorna os registros de demonstração
async fn demo_records_handler() -> impl IntoResponse {
    Json(demo_records())
}

/// Converte os registros e devolve o texto CoNLL
async fn convert_handler(Json(req): Json<ConvertRequest>) -> Response {
    if req.records.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Nenhum registro enviado");
    }
    let mode = req.normalizer.unwrap_or_default();
    info!("convertendo {} registros [{:?}]", req.records.len(), mode);

    let result = tokio::task::spawn_blocking(move || match mode {
        NormalizerMode::None => to_conll_string(&req.records),
        NormalizerMode::Bert => to_conll_string_normalized(&req.records, &BertNormalizer::new()),
        NormalizerMode::Whitespace => {
            to_conll_string_normalized(&req.records, &WhitespaceNormalizer::new())
        }
    })
    .await;

    match result {
        Ok(Ok(conll)) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            conll,
        )
            .into_response(),
        Ok(Err(e)) => conversion_error(e),
        Err(e) => {
            error!("tarefa de conversão falhou: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Falha interna na conversão")
        }
    }
}

/// Converte os registros e grava o arquivo em `data_dir`
async fn export_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequest>,
) -> Response {
    if req.records.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Nenhum registro enviado");
    }
    let Some(file_name) = state.checked_file_name(&req.filename, &req.suffix) else {
        return error_response(StatusCode::BAD_REQUEST, "Nome de arquivo inválido");
    };

    let mode = req.normalizer.unwrap_or_default();
    let data_dir: PathBuf = state.config.data_dir.clone();
    let count = req.records.len();
    info!("exportando {} registros para '{}' [{:?}]", count, file_name, mode);

    // O nome já validado inclui o sufixo.
    let result = tokio::task::spawn_blocking(move || {
        let records = req.records;
        match mode {
            NormalizerMode::None => convert_to_conll(&records, &file_name, &data_dir, ""),
            NormalizerMode::Bert => convert_to_conll_normalized(
                &records,
                &file_name,
                &data_dir,
                "",
                &BertNormalizer::new(),
            ),
            NormalizerMode::Whitespace => convert_to_conll_normalized(
                &records,
                &file_name,
                &data_dir,
                "",
                &WhitespaceNormalizer::new(),
            ),
        }
    })
    .await;

    match result {
        Ok(Ok(path)) => Json(ExportResponse {
            path: path.display().to_string(),
            records: count,
        })
        .into_response(),
        Ok(Err(e)) => conversion_error(e),
        Err(e) => {
            error!("tarefa de exportação falhou: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Falha interna na exportação")
        }
    }
}

/// Erros de dados viram 422; erros de ambiente (I/O) viram 500.
fn conversion_error(e: Error) -> Response {
    if e.is_data_error() {
        warn!("registro rejeitado: {}", e);
        error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    } else {
        error!("falha na conversão: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

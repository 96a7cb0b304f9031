//! Servidor web Axum com WebSocket para visualizar a re-etiquetagem em tempo real

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use retag_core::{
    demo::demo_texts,
    tokenizer::{join_tokens, tokenize},
    EngineConfig, EntityKind, EntitySpan, NerError, PipelineEvent, RetagPipeline, OUTSIDE,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: RetagPipeline,
}

#[derive(Deserialize)]
struct DetectRequest {
    entity: String,
    text: String,
    #[serde(default)]
    tokens: Option<Vec<String>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    verbose: bool,
}

#[derive(Serialize)]
struct DetectResponse {
    entity: EntityKind,
    indices: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_tokens: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RetagRequest {
    text: String,
    #[serde(default)]
    tokens: Option<Vec<String>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Serialize)]
struct RetagResponse {
    tokens: Vec<String>,
    tags: Vec<String>,
    entities: Vec<EntitySpan>,
    processing_ms: u64,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
}

#[derive(Serialize)]
struct EntityInfo {
    label: &'static str,
    color: &'static str,
    icon: &'static str,
    table_version: String,
    patterns: usize,
}

/// Linha da tabela de famílias na página principal
struct FamilyRow {
    label: &'static str,
    color: &'static str,
    icon: &'static str,
    patterns: usize,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    families: Vec<FamilyRow>,
    demos: Vec<(&'static str, &'static str)>,
}

/// Erro de requisição convertido em `400 {"error": ...}`
struct ApiError(String);

impl From<NerError> for ApiError {
    fn from(err: NerError) -> Self {
        ApiError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": self.0 }))).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("RETAG_CONFIG") {
        Ok(path) => {
            info!(%path, "carregando configuração");
            EngineConfig::from_json(&std::fs::read_to_string(&path)?)?
        }
        Err(_) => EngineConfig::default(),
    };
    let pipeline = RetagPipeline::from_config(&config)?;
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/entities", get(entities_handler))
        .route("/detect", post(detect_handler))
        .route("/retag", post(retag_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state);

    let addr = std::env::var("RETAG_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Servidor de re-etiquetagem iniciado em http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Retorna a página principal HTML
async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let page = IndexTemplate {
        families: state
            .pipeline
            .detectors()
            .iter()
            .map(|d| FamilyRow {
                label: d.label(),
                color: d.entity().color(),
                icon: d.entity().icon(),
                patterns: d.patterns().len(),
            })
            .collect(),
        demos: demo_texts(),
    };

    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            warn!(%err, "falha ao renderizar a página");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Famílias na ordem de prioridade, com a versão da tabela de cada uma
async fn entities_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entities: Vec<EntityInfo> = state
        .pipeline
        .detectors()
        .iter()
        .map(|d| EntityInfo {
            label: d.label(),
            color: d.entity().color(),
            icon: d.entity().icon(),
            table_version: d.table_version().to_string(),
            patterns: d.patterns().len(),
        })
        .collect();
    Json(entities)
}

/// Tokens e tags da requisição, completando o que faltar.
///
/// Sem tokens, o texto é tokenizado por espaços e os detectores recebem a
/// reconstrução. Sem tags, todas começam em `O`.
fn request_parts(text: &str, tokens: Option<Vec<String>>, tags: Option<Vec<String>>) -> (String, Vec<String>, Vec<String>) {
    let (text, tokens) = match tokens {
        Some(tokens) => (text.to_string(), tokens),
        None => {
            let tokens: Vec<String> = tokenize(text).into_iter().map(|t| t.text).collect();
            (join_tokens(&tokens), tokens)
        }
    };
    let tags = tags.unwrap_or_else(|| vec![OUTSIDE.to_string(); tokens.len()]);
    (text, tokens, tags)
}

/// Uma família só, sem gravar nada
async fn detect_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    let entity: EntityKind = req.entity.parse()?;
    let (text, tokens, tags) = request_parts(&req.text, req.tokens, req.tags);

    let detection = state.pipeline.detect_verbose(entity, &text, &tokens, &tags)?;
    info!(%entity, found = detection.indices.len(), "detecção via HTTP");

    Ok(Json(DetectResponse {
        entity,
        indices: detection.indices,
        matched_tokens: req.verbose.then_some(detection.matched_tokens),
    }))
}

/// Pipeline completo via HTTP POST (sem streaming)
async fn retag_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RetagRequest>,
) -> Result<Json<RetagResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError("Texto vazio".to_string()));
    }

    let (text, tokens, tags) = request_parts(&req.text, req.tokens, req.tags);
    let (tx, rx) = std::sync::mpsc::channel();
    state.pipeline.retag_streaming(&text, &tokens, &tags, tx);

    match rx.try_iter().last() {
        Some(PipelineEvent::Done {
            tags,
            entities,
            processing_ms,
            ..
        }) => Ok(Json(RetagResponse {
            tokens,
            tags,
            entities,
            processing_ms,
        })),
        Some(PipelineEvent::Error { message }) => Err(ApiError(message)),
        _ => Err(ApiError("pipeline não concluiu".to_string())),
    }
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(title, text)| {
            serde_json::json!({
                "title": title,
                "text": text
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa o pipeline e envia os eventos um a um
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text}; senão usa como texto puro
                let text = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => req.text,
                    Err(_) => text.to_string(),
                };
                let tokens: Vec<String> = tokenize(&text).into_iter().map(|t| t.text).collect();
                if tokens.is_empty() {
                    continue;
                }

                info!(tokens = tokens.len(), "re-etiquetando via WebSocket");

                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let pipeline = Arc::clone(&state);

                // O pipeline é síncrono; roda fora do runtime
                let handle = tokio::task::spawn_blocking(move || {
                    let tags = vec![OUTSIDE; tokens.len()];
                    pipeline.pipeline.retag_streaming(&join_tokens(&tokens), &tokens, &tags, tx);
                });
                if handle.await.is_err() {
                    warn!("tarefa do pipeline abortada");
                    continue;
                }

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para a animação passo a passo
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

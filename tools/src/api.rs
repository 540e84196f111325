//! HTTP surface: the chat relay plus a read-only concept catalogue.

use crate::upstream::TextGenerator;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use qviz_core::{
    concept::ConceptInfo,
    gateway::{
        parse_message, ChatReply, ErrorBody, GenerationRequest, CHAT_ROUTE, GENERATION_FAILED,
        MESSAGE_REQUIRED,
    },
    registry::ConceptRegistry,
};
use std::sync::Arc;

pub struct AppState<G> {
    generator:  Arc<G>,
    max_tokens: u32,
    catalog:    Arc<Vec<ConceptInfo>>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            generator:  Arc::clone(&self.generator),
            max_tokens: self.max_tokens,
            catalog:    Arc::clone(&self.catalog),
        }
    }
}

impl<G: TextGenerator> AppState<G> {
    pub fn new(generator: G, max_tokens: u32, registry: &ConceptRegistry) -> Self {
        Self {
            generator: Arc::new(generator),
            max_tokens,
            catalog: Arc::new(registry.catalog()),
        }
    }
}

pub fn router<G: TextGenerator>(state: AppState<G>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(chat::<G>))
        .route("/api/concepts", get(concepts::<G>))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve<G: TextGenerator>(addr: &str, state: AppState<G>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn chat<G: TextGenerator>(State(state): State<AppState<G>>, body: Bytes) -> Response {
    let Some(message) = parse_message(&body) else {
        return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(MESSAGE_REQUIRED))).into_response();
    };
    let request = GenerationRequest::for_question(message, state.max_tokens);
    match state.generator.generate(request).await {
        Ok(response) => Json(ChatReply { response }).into_response(),
        Err(e) => {
            log::error!("AI chat error: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(GENERATION_FAILED))).into_response()
        }
    }
}

async fn concepts<G: TextGenerator>(State(state): State<AppState<G>>) -> Json<Vec<ConceptInfo>> {
    Json(state.catalog.as_ref().clone())
}

async fn health() -> &'static str {
    "ok"
}

//! Upstream text generation.
//!
//! The gateway only needs "question in, text out". `TextGenerator` is
//! that seam; the production implementation talks to any
//! OpenAI-compatible `/chat/completions` endpoint.

use anyhow::{bail, Context, Result};
use qviz_core::{config::GatewayConfig, gateway::GenerationRequest};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

pub trait TextGenerator: Send + Sync + 'static {
    fn generate(&self, request: GenerationRequest) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model:      &'a str,
    max_tokens: u32,
    messages:   [WireMessage<'a>; 2],
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role:    &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompatClient {
    http:    reqwest::Client,
    url:     String,
    model:   String,
    api_key: Option<String>,
}

impl OpenAiCompatClient {
    /// Build a client from gateway config. The API key is read from the
    /// environment variable the config names.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            log::warn!("{} is not set; upstream requests will be unauthenticated", config.api_key_env);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            url: config.upstream_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

impl TextGenerator for OpenAiCompatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let body = CompletionRequest {
            model:      &self.model,
            max_tokens: request.max_tokens,
            messages:   [
                WireMessage { role: "system", content: request.system },
                WireMessage { role: "user", content: &request.prompt },
            ],
        };
        let mut call = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }
        let response = call
            .send()
            .await
            .context("upstream request failed")?
            .error_for_status()
            .context("upstream returned an error status")?;
        let parsed: CompletionResponse = response.json().await.context("decoding upstream response")?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            bail!("upstream returned an empty completion");
        }
        log::debug!("upstream generated {} chars", text.len());
        Ok(text)
    }
}

//! # gstd-model-client — Generative Fallback over Chat Completions
//!
//! Implements the pipeline's [`GenerativeFallback`] contract against an
//! OpenAI-compatible chat-completions endpoint. This crate is the only
//! place in the workspace that talks HTTP to the model provider; the
//! pipeline itself depends only on the contract.
//!
//! ## Request shape
//!
//! One call per escalated line: the ERP instruction text goes in the
//! system message, the line context in the user message, and
//! `response_format: json_object` asks the provider for the structured
//! `{tax_code, reasoning, confidence}` verdict.
//!
//! ## Token accounting
//!
//! Provider usage metadata is harvested permissively: `prompt_tokens`,
//! `completion_tokens`, and `completion_tokens_details.reasoning_tokens`
//! may each be absent and default to 0.

pub mod config;

pub use config::{ConfigError, ModelApiConfig};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gstd_agent::{FallbackError, FallbackOutcome, FallbackRequest, GenerativeFallback};
use gstd_core::TokenUsage;

// -- Wire types ---------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionTokensDetails {
    #[serde(default)]
    reasoning_tokens: u64,
}

/// The structured verdict the provider must return in the message content.
#[derive(Debug, Deserialize)]
struct StructuredVerdict {
    tax_code: String,
    reasoning: String,
    confidence: f64,
}

fn harvest_usage(usage: Option<ChatUsage>) -> TokenUsage {
    let usage = usage.unwrap_or_default();
    TokenUsage {
        prompt: usage.prompt_tokens,
        completion: usage.completion_tokens,
        reasoning: usage
            .completion_tokens_details
            .unwrap_or_default()
            .reasoning_tokens,
    }
}

// -- Client -------------------------------------------------------------------

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct ModelClient {
    http: reqwest::Client,
    base_url: url::Url,
    model: String,
}

impl ModelClient {
    /// Create a client from configuration.
    pub fn new(config: ModelApiConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_key
                    ))
                    .map_err(|_| ConfigError::InvalidApiKey)?,
                );
                headers
            })
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            model: config.model,
        })
    }
}

impl GenerativeFallback for ModelClient {
    async fn determine(
        &self,
        request: &FallbackRequest,
    ) -> Result<FallbackOutcome, FallbackError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        );

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &request.context,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        tracing::debug!(erp = %request.erp, model = %self.model, "calling fallback model");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FallbackError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(FallbackError::Api { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FallbackError::Malformed(e.to_string()))?;

        let usage = harvest_usage(parsed.usage);

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                FallbackError::Malformed("response contained no choices".to_string())
            })?;

        let verdict: StructuredVerdict = serde_json::from_str(&content).map_err(|e| {
            FallbackError::Malformed(format!("structured output did not parse: {e}"))
        })?;

        Ok(FallbackOutcome {
            tax_code: verdict.tax_code,
            reasoning: verdict.reasoning,
            confidence: verdict.confidence,
            usage,
        })
    }
}

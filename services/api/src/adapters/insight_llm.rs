//! services/api/src/adapters/insight_llm.rs
//!
//! This module contains the adapter for the pattern-analysis LLM.
//! It implements the `InsightGenerationService` port from the `core` crate against any
//! OpenAI-compatible chat-completions endpoint (Gemini's by default), constraining the
//! model to a three-field JSON schema.

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use lucid_logs_core::{
    domain::InsightResult,
    ports::{InsightGenerationService, InsightPrompt, PortError, PortResult},
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const SCHEMA_NAME: &str = "session_insight";
const MAX_LOGGED_BODY: usize = 300;

/// The only shape the model is allowed to answer with.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InsightPayload {
    summary: String,
    suggestion: String,
    caution: String,
}

impl From<InsightPayload> for InsightResult {
    fn from(payload: InsightPayload) -> Self {
        InsightResult::new(payload.summary, payload.suggestion, payload.caution)
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `InsightGenerationService` using an OpenAI-compatible LLM.
///
/// Each call is a single HTTP attempt; timeouts are whatever the HTTP client imposes.
#[derive(Clone)]
pub struct OpenAiInsightAdapter {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for OpenAiInsightAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiInsightAdapter")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiInsightAdapter {
    /// Creates a new `OpenAiInsightAdapter`.
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        api_key: Option<String>,
        model: String,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    fn build_request(&self, prompt: &InsightPrompt) -> PortResult<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system_instruction.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.contents.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: insight_schema(),
            })
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

/// Three required strings and nothing else.
fn insight_schema() -> ResponseFormatJsonSchema {
    ResponseFormatJsonSchema {
        description: Some("Pattern summary over recent journal sessions".to_string()),
        name: SCHEMA_NAME.to_string(),
        schema: Some(json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string" },
                "suggestion": { "type": "string" },
                "caution": { "type": "string" }
            },
            "required": ["summary", "suggestion", "caution"],
            "additionalProperties": false
        })),
        strict: Some(true),
    }
}

//=========================================================================================
// `InsightGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl InsightGenerationService for OpenAiInsightAdapter {
    async fn generate_insight(&self, prompt: &InsightPrompt) -> PortResult<InsightResult> {
        let api_key = self.api_key.as_deref().ok_or(PortError::Unauthorized)?;
        let request = self.build_request(prompt)?;

        debug!(
            "Sending insight request for {} sessions to {}",
            prompt.session_count, self.api_base
        );
        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PortError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "API error {}: {}",
                status,
                truncate(&body, MAX_LOGGED_BODY)
            )));
        }

        let completion: CreateChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            PortError::MalformedResponse(format!(
                "Failed to parse completion: {} - body: {}",
                e,
                truncate(&body, MAX_LOGGED_BODY)
            ))
        })?;

        // Only the first choice is considered; the request asks for one.
        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            PortError::MalformedResponse(
                "Insight LLM returned no choices in its response.".to_string(),
            )
        })?;

        if let Some(refusal) = choice.message.refusal {
            return Err(PortError::MalformedResponse(format!(
                "Insight LLM refused the request: {}",
                refusal
            )));
        }

        let content = choice.message.content.ok_or_else(|| {
            PortError::MalformedResponse(
                "Insight LLM response contained no text content.".to_string(),
            )
        })?;

        parse_insight_payload(&content)
    }
}

/// Decodes the model's text into a result, rejecting missing or extra fields.
fn parse_insight_payload(content: &str) -> PortResult<InsightResult> {
    let json = strip_markdown_json(content);
    serde_json::from_str::<InsightPayload>(json)
        .map(InsightResult::from)
        .map_err(|e| {
            PortError::MalformedResponse(format!(
                "Failed to parse insight JSON: {} - content: {}",
                e,
                truncate(json, MAX_LOGGED_BODY)
            ))
        })
}

/// Some models wrap JSON in a markdown fence even when asked not to.
fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

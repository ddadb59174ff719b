//! OpenAI-compatible completion client.
//!
//! Works against any API that speaks the OpenAI `chat/completions` wire
//! format, which covers the hosted OpenAI endpoints and most self-hosted
//! gateways.

use crate::{CompletionClient, ContentStream, Decision, ProviderError, Result};
use async_trait::async_trait;
use coachd_core::{ChatMessage, Role, ToolCallKind, ToolCallRequest, ToolDefinition};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default OpenAI API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct OpenAiClient {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: String,

    /// API base URL.
    api_base: String,

    /// Model to use.
    model: String,
}

impl OpenAiClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| ProviderError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: "gpt-4o-mini".to_string(),
        })
    }

    /// Set the API base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Convert working-history messages to the wire format.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::System => "system",
                    Role::Tool => "tool",
                };

                let tool_calls = msg.tool_calls.as_ref().map(|calls| {
                    calls
                        .iter()
                        .map(|call| WireToolCall {
                            id: call.id.clone(),
                            call_type: kind_to_wire(&call.kind),
                            function: WireFunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                        .collect()
                });

                WireMessage {
                    role: role.to_string(),
                    content: Some(msg.content.clone()),
                    tool_call_id: msg.tool_call_id.clone(),
                    tool_calls,
                }
            })
            .collect()
    }

    /// Convert tool definitions to the wire format.
    fn convert_tools(tools: &[ToolDefinition]) -> Vec<WireTool> {
        tools
            .iter()
            .map(|t| WireTool {
                tool_type: "function".to_string(),
                function: WireFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.input_schema.clone(),
                },
            })
            .collect()
    }

    async fn post_completions(&self, request: &WireRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body: WireError = response.json().await.unwrap_or_else(|_| WireError {
                error: WireErrorDetail {
                    message: "Unknown error".to_string(),
                },
            });

            return match status.as_u16() {
                401 => Err(ProviderError::auth(error_body.error.message)),
                429 => Err(ProviderError::rate_limit(error_body.error.message, None)),
                400 => Err(ProviderError::invalid_request(error_body.error.message)),
                _ => Err(ProviderError::server_error(
                    status.as_u16(),
                    error_body.error.message,
                )),
            };
        }

        Ok(response)
    }
}

fn kind_to_wire(kind: &ToolCallKind) -> String {
    match kind {
        ToolCallKind::Function => "function".to_string(),
        ToolCallKind::Other(s) => s.clone(),
    }
}

fn kind_from_wire(kind: &str) -> ToolCallKind {
    if kind == "function" {
        ToolCallKind::Function
    } else {
        ToolCallKind::Other(kind.to_string())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn decide(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Decision> {
        let request = WireRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            tools: if tools.is_empty() {
                None
            } else {
                Some(Self::convert_tools(tools))
            },
            stream: false,
        };

        debug!(model = %self.model, messages = messages.len(), "Decision call");

        let response = self.post_completions(&request).await?;
        let response: WireResponse = response.json().await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::invalid_request("No choices in response"))?;

        let content = choice.message.content.unwrap_or_default();
        let tool_calls = choice.message.tool_calls.unwrap_or_default();

        if tool_calls.is_empty() {
            return Ok(Decision::Answer { content });
        }

        let requests = tool_calls
            .into_iter()
            .map(|tc| ToolCallRequest {
                id: tc.id,
                name: tc.function.name,
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::Null),
                kind: kind_from_wire(&tc.call_type),
            })
            .collect();

        Ok(Decision::ToolCalls { content, requests })
    }

    async fn stream_final(&self, messages: &[ChatMessage]) -> Result<ContentStream> {
        // No tool catalog here: the final answer must be plain text.
        let request = WireRequest {
            model: self.model.clone(),
            messages: Self::convert_messages(messages),
            tools: None,
            stream: true,
        };

        debug!(model = %self.model, messages = messages.len(), "Final stream call");

        let response = self.post_completions(&request).await?;
        let event_stream = response.bytes_stream().eventsource();

        let stream = event_stream.filter_map(move |result| async move {
            match result {
                Ok(event) => {
                    if event.data.is_empty() || event.data == "[DONE]" {
                        return None;
                    }

                    match serde_json::from_str::<WireStreamChunk>(&event.data) {
                        Ok(chunk) => chunk
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.delta.content)
                            .filter(|delta| !delta.is_empty())
                            .map(Ok),
                        Err(e) => {
                            warn!("Failed to parse SSE event: {}", e);
                            None
                        }
                    }
                }
                Err(e) => Some(Err(ProviderError::stream(e.to_string()))),
            }
        });

        Ok(Box::pin(stream))
    }
}

// Internal wire types

#[derive(Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: WireFunction,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "default_call_type")]
    call_type: String,
    function: WireFunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Deserialize)]
struct WireErrorDetail {
    message: String,
}

// Streaming types

#[derive(Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Deserialize)]
struct WireStreamChoice {
    delta: WireStreamDelta,
}

#[derive(Deserialize)]
struct WireStreamDelta {
    content: Option<String>,
}

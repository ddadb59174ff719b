//! Web search tool.

use crate::tools::{CallerIdentity, Tool, ToolError};
use async_trait::async_trait;
use coachd_core::ToolDefinition;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Web search configuration.
#[derive(Debug, Clone, Default)]
pub struct WebSearchConfig {
    /// Search API endpoint.
    pub endpoint: Option<String>,

    /// API key for the search service.
    pub api_key: Option<String>,

    /// Maximum results to return.
    pub max_results: Option<usize>,
}

impl WebSearchConfig {
    /// Read the configuration from `COACHD_SEARCH_ENDPOINT` and
    /// `COACHD_SEARCH_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("COACHD_SEARCH_ENDPOINT").ok(),
            api_key: std::env::var("COACHD_SEARCH_API_KEY").ok(),
            max_results: None,
        }
    }
}

/// Web search tool against a generic search API.
pub struct WebSearchTool {
    /// HTTP client.
    client: Client,

    /// Search API endpoint.
    endpoint: Option<String>,

    /// API key for the search service.
    api_key: Option<String>,

    /// Maximum results to return.
    max_results: usize,
}

impl WebSearchTool {
    /// Create a new web search tool.
    pub fn new(config: WebSearchConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint,
            api_key: config.api_key,
            max_results: config.max_results.unwrap_or(10),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "web_search".to_string(),
            description: "Search the web, e.g. for exercise form cues or event dates"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of results to return (default: 10)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(
        &self,
        args: Value,
        _caller: &CallerIdentity,
    ) -> std::result::Result<Value, ToolError> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("query is required".to_string()))?;

        let num_results = args
            .get("num_results")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(self.max_results)
            .min(self.max_results);

        let (endpoint, api_key) = match (&self.endpoint, &self.api_key) {
            (Some(e), Some(k)) => (e.clone(), k.clone()),
            _ => {
                return Err(ToolError::ExecutionFailed(
                    "Web search is not configured. Set COACHD_SEARCH_ENDPOINT and \
                     COACHD_SEARCH_API_KEY environment variables."
                        .to_string(),
                ));
            }
        };

        debug!(%query, num_results, "Web search");

        let response = self
            .client
            .get(&endpoint)
            .query(&[("q", query.to_string()), ("num", num_results.to_string())])
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "Search API error: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            ToolError::ExecutionFailed(format!("Failed to parse search response: {}", e))
        })?;

        // Result array key varies across search APIs.
        let results: Vec<SearchResult> = body
            .get("results")
            .or_else(|| body.get("items"))
            .or_else(|| body.get("organic"))
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        Some(SearchResult {
                            title: item.get("title")?.as_str()?.to_string(),
                            url: item
                                .get("url")
                                .or_else(|| item.get("link"))
                                .and_then(|v| v.as_str())
                                .map(|s| s.to_string())?,
                            snippet: item
                                .get("snippet")
                                .or_else(|| item.get("description"))
                                .and_then(|v| v.as_str())
                                .map(|s| s.to_string())
                                .unwrap_or_default(),
                        })
                    })
                    .take(num_results)
                    .collect()
            })
            .unwrap_or_default();

        let count = results.len();
        Ok(json!({
            "query": query,
            "results": results,
            "count": count,
        }))
    }
}

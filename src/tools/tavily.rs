use crate::{
    config::TavilyConfig,
    error::{MedscanError, Result},
    tools::Tool,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

pub const WEB_SEARCH_TOOL: &str = "web_search_using_tavily";

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Clone)]
pub struct TavilyTools {
    client: Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilyTools {
    pub fn new(config: &TavilyConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| MedscanError::ConfigError("TAVILY_API_KEY is required".into()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        })
    }

    /// Requested result count, kept within `1..=` the configured maximum.
    pub fn effective_max_results(&self, requested: Option<u32>) -> u32 {
        let ceiling = self.max_results.max(1);
        requested.unwrap_or(ceiling).clamp(1, ceiling)
    }

    pub async fn web_search(&self, query: &str, max_results: Option<u32>) -> Result<String> {
        let max_results = self.effective_max_results(max_results);
        let payload = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
            "search_depth": "advanced",
            "include_answer": true
        });

        log::info!("🔎 Tavily search: {}", query);

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| MedscanError::RemoteError(format!("Tavily request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MedscanError::RemoteError(format!(
                "Tavily search failed: HTTP {} - {}",
                status, error_text
            )));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| MedscanError::RemoteError(format!("Tavily response unreadable: {}", e)))?;

        Ok(format_results(query, &body))
    }
}

fn format_results(query: &str, body: &TavilyResponse) -> String {
    let mut markdown = format!("# {}\n\n", query);

    if let Some(answer) = body.answer.as_deref().filter(|a| !a.is_empty()) {
        markdown.push_str("### Summary\n");
        markdown.push_str(answer);
        markdown.push_str("\n\n");
    }

    for result in &body.results {
        markdown.push_str(&format!("### [{}]({})\n", result.title, result.url));
        markdown.push_str(&result.content);
        markdown.push_str("\n\n");
    }

    markdown.trim_end().to_string()
}

#[async_trait]
impl Tool for TavilyTools {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn declaration(&self) -> Value {
        json!({
            "name": WEB_SEARCH_TOOL,
            "description": "Search the web for a query and return a markdown summary of the top results. Use it to verify medical claims, side effects, interactions and regulatory approvals.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "query": {
                        "type": "STRING",
                        "description": "Query to search for."
                    },
                    "max_results": {
                        "type": "INTEGER",
                        "description": format!(
                            "Maximum number of results to return, at most {}.",
                            self.max_results.max(1)
                        )
                    }
                },
                "required": ["query"]
            }
        })
    }

    async fn call(&self, args: &Value) -> Result<String> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| {
                MedscanError::RemoteError(format!(
                    "{} called without a query: {}",
                    WEB_SEARCH_TOOL, args
                ))
            })?;
        let max_results = args
            .get("max_results")
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32);

        self.web_search(query, max_results).await
    }
}

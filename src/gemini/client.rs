use crate::{
    config::{Config, GeminiConfig},
    error::{MedscanError, Result},
    gemini::wire::{
        Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, ToolSpec,
    },
    models::{AnalysisRequest, AnalysisResult},
    provider::ModelProvider,
    tools::{TavilyTools, Tool},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;

/// Upper bound on model → tool → model round trips for one analysis.
pub const MAX_TOOL_ROUNDS: usize = 10;

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model_id: String,
    base_url: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        if config.model_id.trim().is_empty() {
            return Err(MedscanError::ConfigError("Gemini model id is empty".into()));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model_id: config.model_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tools: Vec::new(),
        })
    }

    /// Gemini provider with Tavily search attached when a Tavily key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Self::new(&config.gemini)?;
        if config.tavily.is_enabled() {
            let tavily = TavilyTools::new(&config.tavily)?;
            Ok(provider.with_tool(Arc::new(tavily)))
        } else {
            log::warn!("⚠️  TAVILY_API_KEY not set, analysis will run without web search");
            Ok(provider)
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_id)
    }

    pub fn build_payload(
        &self,
        request: &AnalysisRequest,
        contents: Vec<Content>,
    ) -> GenerateContentRequest {
        let tools = if request.search_enabled && !self.tools.is_empty() {
            vec![ToolSpec {
                function_declarations: self.tools.iter().map(|t| t.declaration()).collect(),
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(request.system_instruction())],
            }),
            contents,
            tools,
        }
    }

    pub fn initial_contents(request: &AnalysisRequest) -> Vec<Content> {
        vec![Content::with_role(
            "user",
            vec![
                Part::text(request.task.clone()),
                Part::inline_data(
                    request.image.mime_type.clone(),
                    STANDARD.encode(&request.image.data),
                ),
            ],
        )]
    }

    async fn send(&self, payload: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| MedscanError::RemoteError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Gemini returned HTTP {}: {}", status, error_text);
            return Err(MedscanError::RemoteError(format!(
                "Gemini error: HTTP {} - {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| MedscanError::RemoteError(format!("Gemini response unreadable: {}", e)))
    }

    async fn run_tool_calls(&self, candidate: &Content) -> Result<Vec<Part>> {
        let mut responses = Vec::new();

        for call in candidate.parts.iter().filter_map(|p| p.function_call.as_ref()) {
            let tool = self
                .tools
                .iter()
                .find(|t| t.name() == call.name)
                .ok_or_else(|| {
                    MedscanError::RemoteError(format!("Model requested unknown tool: {}", call.name))
                })?;

            log::debug!("Model called {} with {}", call.name, call.args);
            let output = tool.call(&call.args).await?;
            responses.push(Part::function_response(
                call.name.clone(),
                json!({ "name": call.name, "content": output }),
            ));
        }

        Ok(responses)
    }
}

fn first_candidate(response: GenerateContentResponse) -> Result<Candidate> {
    let block_reason = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone());

    response.candidates.into_iter().next().ok_or_else(|| {
        MedscanError::RemoteError(match block_reason {
            Some(reason) => format!("Gemini blocked the request: {}", reason),
            None => "Gemini returned no candidates".to_string(),
        })
    })
}

fn collect_text(content: &Content) -> String {
    content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let mut contents = Self::initial_contents(request);

        for round in 0..=MAX_TOOL_ROUNDS {
            let payload = self.build_payload(request, contents.clone());
            log::info!(
                "Invoking model: {} (request {}, round {})",
                self.model_id,
                request.request_id,
                round
            );

            let candidate = first_candidate(self.send(&payload).await?)?;
            let content = candidate.content.unwrap_or_default();

            let wants_tools = content.parts.iter().any(|p| p.function_call.is_some());
            if !wants_tools {
                let text = collect_text(&content);
                if text.trim().is_empty() {
                    return Err(MedscanError::RemoteError(format!(
                        "Gemini returned no text (finish reason: {})",
                        candidate.finish_reason.as_deref().unwrap_or("unknown")
                    )));
                }
                return Ok(AnalysisResult {
                    content: text,
                    model: self.model_id.clone(),
                });
            }

            if round == MAX_TOOL_ROUNDS {
                break;
            }

            let tool_parts = self.run_tool_calls(&content).await?;
            contents.push(Content::with_role("model", content.parts));
            contents.push(Content::with_role("user", tool_parts));
        }

        Err(MedscanError::RemoteError(format!(
            "Gemini kept calling tools after {} rounds",
            MAX_TOOL_ROUNDS
        )))
    }
}

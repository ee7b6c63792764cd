use crate::{
    error::Result,
    logger::Timer,
    models::{AnalysisRequest, AnalysisResult, ImageAttachment, ImageFormat},
    prompts::AgentConfig,
    provider::ModelProvider,
};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Sends label images to the model with a fixed agent configuration.
///
/// Holds no per-call state, so one instance can serve any number of
/// analyses, sequential or concurrent.
#[derive(Clone)]
pub struct AnalysisClient {
    agent: Arc<AgentConfig>,
    provider: Arc<dyn ModelProvider>,
    search_enabled: bool,
}

impl AnalysisClient {
    pub fn new(agent: AgentConfig, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            agent: Arc::new(agent),
            provider,
            search_enabled: true,
        }
    }

    pub fn with_search(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    pub fn agent(&self) -> &AgentConfig {
        &self.agent
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    pub async fn analyze(&self, artifact_path: impl AsRef<Path>) -> Result<AnalysisResult> {
        let path = artifact_path.as_ref();
        let data = tokio::fs::read(path).await?;
        let mime_type = mime_type_for(path, &data);

        let request = AnalysisRequest {
            request_id: Uuid::new_v4().to_string(),
            system_prompt: self.agent.system_prompt.clone(),
            instructions: self.agent.instructions.clone(),
            task: self.agent.task.clone(),
            image: ImageAttachment { mime_type, data },
            search_enabled: self.search_enabled,
            markdown: self.agent.markdown,
        };

        log::info!(
            "🔬 Analyzing {} ({} bytes, {}) [req:{}]",
            path.display(),
            request.image.data.len(),
            request.image.mime_type,
            request.request_id
        );

        let _timer = Timer::new(&format!("analysis {}", request.request_id));
        match self.provider.generate(&request).await {
            Ok(result) => {
                log::info!(
                    "✅ Analysis {} finished with {} characters",
                    request.request_id,
                    result.content.len()
                );
                Ok(result)
            }
            Err(e) => {
                log::error!("❌ Analysis {} failed: {}", request.request_id, e);
                Err(e)
            }
        }
    }
}

fn mime_type_for(path: &Path, data: &[u8]) -> String {
    ImageFormat::from_bytes(data)
        .ok()
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .map(|f| f.mime_type())
        .unwrap_or("image/jpeg")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_prefers_content_over_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(mime_type_for(Path::new("label.jpg"), &png), "image/png");
        assert_eq!(mime_type_for(Path::new("label.png"), b"????"), "image/png");
        assert_eq!(mime_type_for(Path::new("label"), b"????"), "image/jpeg");
    }
}

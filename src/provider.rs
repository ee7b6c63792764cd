use crate::{
    error::Result,
    models::{AnalysisRequest, AnalysisResult},
};
use async_trait::async_trait;

/// The remote multimodal model, tool calls included, seen as one call.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;
}

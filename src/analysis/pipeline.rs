use crate::{
    analysis::AnalysisClient,
    config::Config,
    error::Result,
    gemini::GeminiProvider,
    imaging::ImageNormalizer,
    models::{AnalysisResult, DisplayImage, SourceImage},
    prompts::AgentConfig,
    storage::TempArtifactStore,
};
use std::sync::Arc;

/// Preview and analysis of one label image at a time.
#[derive(Clone)]
pub struct MedicineAnalyzer {
    normalizer: ImageNormalizer,
    store: TempArtifactStore,
    client: AnalysisClient,
}

impl MedicineAnalyzer {
    pub fn new(normalizer: ImageNormalizer, store: TempArtifactStore, client: AnalysisClient) -> Self {
        Self {
            normalizer,
            store,
            client,
        }
    }

    /// Gemini-backed analyzer with the default medicine agent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = GeminiProvider::from_config(config)?;
        let client = AnalysisClient::new(AgentConfig::medicine_analyzer(), Arc::new(provider))
            .with_search(config.tavily.is_enabled());

        Ok(Self::new(
            ImageNormalizer::new(config.max_image_width),
            TempArtifactStore::new(config.temp_dir.clone()),
            client,
        ))
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    pub fn preview(&self, image: &SourceImage) -> Result<DisplayImage> {
        self.normalizer.preview(image)
    }

    /// Validates, writes a temp copy, analyzes it, and always removes the copy.
    pub async fn analyze(&self, image: &SourceImage) -> Result<AnalysisResult> {
        let (width, height) = self.normalizer.validate(image)?;
        log::debug!(
            "Accepted {} image {}x{} from {}",
            image.format.extension(),
            width,
            height,
            image.origin.as_str()
        );

        let mut artifact = self.store.materialize(image)?;
        let result = self.client.analyze(artifact.path()).await;
        artifact.release();
        result
    }
}

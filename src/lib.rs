//! Medicine and supplement label analysis.
//!
//! A label photo goes through [`ImageNormalizer`] for a bounded preview, is
//! copied to a scoped [`TempArtifact`], and is sent by [`AnalysisClient`] to a
//! Gemini model that may consult Tavily web search before answering in
//! markdown.

pub mod analysis;
pub mod config;
pub mod error;
pub mod gemini;
pub mod imaging;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod storage;
pub mod tools;

pub use analysis::{AnalysisClient, MedicineAnalyzer};
pub use config::{Config, GeminiConfig, TavilyConfig};
pub use error::{MedscanError, Result};
pub use gemini::GeminiProvider;
pub use imaging::ImageNormalizer;
pub use models::{
    AnalysisRequest, AnalysisResult, DisplayImage, ImageAttachment, ImageFormat, ImageOrigin,
    SourceImage,
};
pub use prompts::AgentConfig;
pub use provider::ModelProvider;
pub use storage::{TempArtifact, TempArtifactStore};
pub use tools::{TavilyTools, Tool};

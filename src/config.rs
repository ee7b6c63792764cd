use crate::error::{MedscanError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_ID: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const MAX_IMAGE_WIDTH: u32 = 300;
pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_id: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub tavily: TavilyConfig,
    pub max_image_width: u32,
    pub temp_dir: PathBuf,
    pub log_level: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        GeminiConfig {
            api_key: non_empty_var("GOOGLE_API_KEY"),
            model_id: non_empty_var("MEDSCAN_MODEL_ID").unwrap_or(defaults.model_id),
            base_url: non_empty_var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| MedscanError::ConfigError("GOOGLE_API_KEY is required".into()))
    }
}

impl Default for TavilyConfig {
    fn default() -> Self {
        TavilyConfig {
            api_key: None,
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
        }
    }
}

impl TavilyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let max_results = match non_empty_var("MEDSCAN_SEARCH_MAX_RESULTS") {
            Some(raw) => parse_positive("MEDSCAN_SEARCH_MAX_RESULTS", &raw)?,
            None => defaults.max_results,
        };

        Ok(TavilyConfig {
            api_key: non_empty_var("TAVILY_API_KEY"),
            base_url: non_empty_var("TAVILY_BASE_URL").unwrap_or(defaults.base_url),
            max_results,
        })
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            tavily: TavilyConfig::default(),
            max_image_width: MAX_IMAGE_WIDTH,
            temp_dir: PathBuf::from("."),
            log_level: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let max_image_width = match non_empty_var("MEDSCAN_MAX_IMAGE_WIDTH") {
            Some(raw) => parse_positive("MEDSCAN_MAX_IMAGE_WIDTH", &raw)?,
            None => MAX_IMAGE_WIDTH,
        };
        let temp_dir = non_empty_var("MEDSCAN_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            gemini: GeminiConfig::from_env(),
            tavily: TavilyConfig::from_env()?,
            max_image_width,
            temp_dir,
            log_level: non_empty_var("MEDSCAN_LOG_LEVEL"),
        })
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_tavily(mut self, config: TavilyConfig) -> Self {
        self.tavily = config;
        self
    }

    pub fn with_max_image_width(mut self, width: u32) -> Self {
        self.max_image_width = width;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_positive(key: &str, raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(MedscanError::ConfigError(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.max_image_width, 300);
        assert_eq!(config.gemini.model_id, "gemini-2.0-flash-exp");
        assert!(!config.tavily.is_enabled());
        assert!(config.gemini.require_api_key().is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_gemini(GeminiConfig::new().with_credentials("g-key").with_model("gemini-pro"))
            .with_tavily(TavilyConfig::new().with_credentials("t-key").with_max_results(3))
            .with_max_image_width(640)
            .with_temp_dir("/tmp");

        assert_eq!(config.gemini.require_api_key().unwrap(), "g-key");
        assert_eq!(config.gemini.model_id, "gemini-pro");
        assert!(config.tavily.is_enabled());
        assert_eq!(config.tavily.max_results, 3);
        assert_eq!(config.max_image_width, 640);
        assert_eq!(config.temp_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("K", " 42 ").unwrap(), 42);
        assert!(parse_positive("K", "0").is_err());
        assert!(parse_positive("K", "wide").is_err());
    }
}

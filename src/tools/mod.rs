pub mod tavily;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use tavily::TavilyTools;

/// A function the remote model may call while composing its answer.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Function declaration in the Gemini `function_declarations` schema.
    fn declaration(&self) -> Value;

    async fn call(&self, args: &Value) -> Result<String>;
}

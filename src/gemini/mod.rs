pub mod client;
pub mod wire;

pub use client::{GeminiProvider, MAX_TOOL_ROUNDS};

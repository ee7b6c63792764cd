pub mod client;
pub mod pipeline;

pub use client::AnalysisClient;
pub use pipeline::MedicineAnalyzer;

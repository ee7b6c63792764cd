pub mod temp;

pub use temp::{release_path, TempArtifact, TempArtifactStore};
